use crate::core::{ConfigProvider, RawRecord};
use crate::domain::model::USER_FIELDS;
use crate::utils::error::{EtlError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Extract stage: reads the intermediate CSV file row by row.
#[derive(Debug, Clone)]
pub struct Extractor {
    path: PathBuf,
}

impl Extractor {
    pub fn new<C: ConfigProvider>(config: &C) -> Self {
        Self::from_path(config.csv_path())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Opens the source and checks its header. Every call reopens the file,
    /// so the returned iterator can only be traversed once.
    pub fn extract(&self) -> Result<ExtractIter> {
        let file = File::open(&self.path).map_err(|source| EtlError::FileAccessError {
            path: self.path.clone(),
            source,
        })?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader.headers()?.clone();
        if let Some(missing) = USER_FIELDS
            .into_iter()
            .find(|field| !headers.iter().any(|h| h == *field))
        {
            return Err(EtlError::ParseError {
                message: format!(
                    "column '{}' missing from header of {}",
                    missing,
                    self.path.display()
                ),
            });
        }

        tracing::info!("Extract started: {}", self.path.display());
        Ok(ExtractIter {
            rows: reader.into_deserialize(),
            index: 0,
            finished: false,
        })
    }
}

/// Lazy sequence of raw rows in file order.
pub struct ExtractIter {
    rows: csv::DeserializeRecordsIntoIter<File, RawRecord>,
    index: usize,
    finished: bool,
}

impl Iterator for ExtractIter {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.rows.next() {
            Some(Ok(row)) => {
                tracing::debug!("Extract row #{}", self.index);
                self.index += 1;
                Some(Ok(row))
            }
            Some(Err(e)) => Some(Err(e.into())),
            None => {
                self.finished = true;
                tracing::info!("Extract finished: {} rows", self.index);
                None
            }
        }
    }
}
