use crate::core::{RawRecord, TransformedRecord};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};

/// Normalizes one row, stamping it with `processed_at`.
///
/// Steps run in a fixed order: drop `password`, parse `id`, lowercase
/// `email`, keep only alphanumeric characters of `description`.
pub fn transform_record_at(
    raw: RawRecord,
    processed_at: DateTime<Utc>,
) -> Result<TransformedRecord> {
    let RawRecord {
        id,
        name,
        email,
        password: _,
        description,
    } = raw;

    let id = parse_id(&id)?;
    let email = email.to_lowercase();
    let description = description.chars().filter(|c| c.is_alphanumeric()).collect();

    Ok(TransformedRecord {
        id,
        name,
        email,
        description,
        processed_at,
    })
}

/// Same as [`transform_record_at`] with the clock read for this row only.
pub fn transform_record(raw: RawRecord) -> Result<TransformedRecord> {
    transform_record_at(raw, Utc::now())
}

// Accepts surrounding whitespace and a leading '+', nothing else.
fn parse_id(value: &str) -> Result<i64> {
    let conversion_error = || EtlError::ConversionError {
        field: "id".to_string(),
        value: value.to_string(),
    };

    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(conversion_error());
    }

    digits.parse::<i64>().map_err(|_| conversion_error())
}

/// Transform stage as an iterator adapter over extracted rows.
pub struct Transform<I> {
    upstream: I,
    index: usize,
    started: bool,
    finished: bool,
}

impl<I> Transform<I>
where
    I: Iterator<Item = Result<RawRecord>>,
{
    pub fn new(upstream: I) -> Self {
        Self {
            upstream,
            index: 0,
            started: false,
            finished: false,
        }
    }
}

impl<I> Iterator for Transform<I>
where
    I: Iterator<Item = Result<RawRecord>>,
{
    type Item = Result<TransformedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if !self.started {
            self.started = true;
            tracing::info!("Transform started");
        }

        match self.upstream.next() {
            Some(Ok(raw)) => {
                tracing::debug!("Transform row #{}", self.index);
                self.index += 1;
                Some(transform_record(raw))
            }
            Some(Err(e)) => Some(Err(e)),
            None => {
                self.finished = true;
                tracing::info!("Transform finished: {} rows", self.index);
                None
            }
        }
    }
}

pub trait TransformExt: Iterator<Item = Result<RawRecord>> + Sized {
    fn transform_users(self) -> Transform<Self> {
        Transform::new(self)
    }
}

impl<I> TransformExt for I where I: Iterator<Item = Result<RawRecord>> {}
