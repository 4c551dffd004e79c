use crate::domain::model::UserData;
use crate::utils::error::{EtlError, Result};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::path::Path;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Carla", "Dmitri", "Elena", "Farid", "Greta", "Hugo", "Irina", "Jonas",
    "Keiko", "Liam", "Marta", "Nikolai", "Olga", "Pavel", "Quinn", "Rosa", "Sven", "Tara",
];

const LAST_NAMES: &[&str] = &[
    "smith", "ivanova", "garcia", "novak", "muller", "rossi", "kowalski", "tanaka", "silva",
    "berg",
];

const DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.test"];

const SPECIAL_CHARS: &[u8] = b"!@#$%^&*()_+";
const DIGITS: &[u8] = b"0123456789";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

const PASSWORD_LENGTH: usize = 10;
const DESCRIPTION_LENGTH: usize = 20;

/// Produces synthetic users for the intermediate CSV file.
pub struct RecordGenerator {
    rng: StdRng,
}

impl Default for RecordGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Yields `count` users with ids `0..count`.
    pub fn produce(mut self, count: usize) -> impl Iterator<Item = UserData> {
        (0..count as u64).map(move |id| self.user(id))
    }

    /// Writes a header plus `count` generated rows to `path`, truncating it.
    pub fn write_csv(self, path: &Path, count: usize) -> Result<usize> {
        let file = File::create(path).map_err(|source| EtlError::FileAccessError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = csv::Writer::from_writer(file);

        let mut written = 0;
        for user in self.produce(count) {
            writer.serialize(&user)?;
            written += 1;
        }
        writer.flush()?;

        tracing::info!("{} records written to file {}", written, path.display());
        Ok(written)
    }

    fn user(&mut self, id: u64) -> UserData {
        let name = self.pick(FIRST_NAMES).to_string();
        let email = self.email();
        let password = self.password(PASSWORD_LENGTH);
        let description = self.password(DESCRIPTION_LENGTH);

        UserData {
            id,
            name,
            email,
            password,
            description,
        }
    }

    fn pick(&mut self, items: &[&'static str]) -> &'static str {
        items.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn email(&mut self) -> String {
        let first = self.pick(FIRST_NAMES).to_lowercase();
        let last = self.pick(LAST_NAMES);
        let suffix: u8 = self.rng.random_range(0..100);
        let domain = self.pick(DOMAINS);
        let email = format!("{}.{}{}@{}", first, last, suffix, domain);

        if self.rng.random_bool(0.5) {
            email.to_uppercase()
        } else {
            email
        }
    }

    /// One character from every class, the rest drawn from all classes, shuffled.
    fn password(&mut self, length: usize) -> String {
        let classes = [SPECIAL_CHARS, DIGITS, UPPER, LOWER];
        let all: Vec<u8> = classes.concat();

        let mut chars: Vec<u8> = classes
            .iter()
            .filter_map(|class| class.choose(&mut self.rng).copied())
            .collect();
        while chars.len() < length {
            if let Some(c) = all.choose(&mut self.rng) {
                chars.push(*c);
            }
        }
        chars.truncate(length);
        chars.shuffle(&mut self.rng);

        chars.into_iter().map(char::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::USER_FIELDS;

    #[test]
    fn test_produce_yields_sequential_ids() {
        let users: Vec<UserData> = RecordGenerator::with_seed(7).produce(5).collect();
        let ids: Vec<u64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_generated_fields_have_expected_shape() {
        for user in RecordGenerator::with_seed(42).produce(50) {
            assert!(!user.name.is_empty());
            assert!(user.email.contains('@'));
            let email_is_single_case =
                user.email == user.email.to_lowercase() || user.email == user.email.to_uppercase();
            assert!(email_is_single_case, "mixed case email {}", user.email);
            assert_eq!(user.password.chars().count(), PASSWORD_LENGTH);
            assert_eq!(user.description.chars().count(), DESCRIPTION_LENGTH);
            assert!(user.description.chars().any(|c| !c.is_alphanumeric()));
        }
    }

    #[test]
    fn test_seeded_generators_are_reproducible() {
        let a: Vec<UserData> = RecordGenerator::with_seed(1).produce(3).collect();
        let b: Vec<UserData> = RecordGenerator::with_seed(1).produce(3).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_write_csv_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");

        let written = RecordGenerator::with_seed(3).write_csv(&path, 4).unwrap();
        assert_eq!(written, 4);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, USER_FIELDS);
        assert_eq!(reader.records().count(), 4);
    }

    #[test]
    fn test_write_csv_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("users.csv");

        let err = RecordGenerator::with_seed(3).write_csv(&path, 1).unwrap_err();
        assert!(matches!(err, EtlError::FileAccessError { .. }));
    }
}
