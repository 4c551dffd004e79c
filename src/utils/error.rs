use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Cannot access file {}: {source}", path.display())]
    FileAccessError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parse error: {message}")]
    ParseError { message: String },

    #[error("Cannot convert field '{field}' value '{value}' to a non-negative integer")]
    ConversionError { field: String, value: String },

    #[error("Cannot open store {}: {source}", path.display())]
    StoreConnectionError {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Constraint violation: {message}")]
    ConstraintViolationError { message: String },

    #[error("Store error: {0}")]
    StoreError(rusqlite::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Data,
    Store,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl From<csv::Error> for EtlError {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => EtlError::IoError(io),
            _ => EtlError::ParseError { message },
        }
    }
}

impl From<rusqlite::Error> for EtlError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(ffi, message)
                if ffi.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                EtlError::ConstraintViolationError {
                    message: message.clone().unwrap_or_else(|| ffi.to_string()),
                }
            }
            _ => EtlError::StoreError(err),
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::FileAccessError { .. } | EtlError::ParseError { .. } => ErrorCategory::Source,
            EtlError::ConversionError { .. } => ErrorCategory::Data,
            EtlError::StoreConnectionError { .. }
            | EtlError::ConstraintViolationError { .. }
            | EtlError::StoreError(_) => ErrorCategory::Store,
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Source => ErrorSeverity::High,
            ErrorCategory::Store => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::FileAccessError { .. } => {
                "Check that the CSV file exists and is readable, or run without --skip-generate"
            }
            EtlError::IoError(_) => "Check disk space and file permissions",
            EtlError::ParseError { .. } => {
                "Make sure every row has the same number of columns as the header and the header lists id,name,email,password,description"
            }
            EtlError::ConversionError { .. } => "Fix the offending row so that its id is a whole number",
            EtlError::StoreConnectionError { .. } => {
                "Check that the database directory exists and is writable"
            }
            EtlError::ConstraintViolationError { .. } => {
                "Make sure name, email and description are present for every row"
            }
            EtlError::StoreError(_) => "Re-run to recreate the users table",
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => {
                "Check the command line flags and the TOML configuration file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::FileAccessError { path, .. } => {
                format!("Could not read the source file {}", path.display())
            }
            EtlError::ParseError { .. } => "The source file is not valid CSV".to_string(),
            EtlError::ConversionError { value, .. } => {
                format!("A row has an invalid id: '{}'", value)
            }
            EtlError::StoreConnectionError { path, .. } => {
                format!("Could not open the database {}", path.display())
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_parse_errors_become_parse_error() {
        let data = "id,name\n1,a,extra\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let err = reader.records().next().unwrap().unwrap_err();

        let etl: EtlError = err.into();
        assert!(matches!(etl, EtlError::ParseError { .. }));
        assert_eq!(etl.category(), ErrorCategory::Source);
    }

    #[test]
    fn test_constraint_failures_are_classified() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT NOT NULL);").unwrap();
        let err = conn
            .execute("INSERT INTO t (name) VALUES (NULL)", [])
            .unwrap_err();

        let etl: EtlError = err.into();
        assert!(matches!(etl, EtlError::ConstraintViolationError { .. }));
        assert_eq!(etl.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_conversion_error_message() {
        let err = EtlError::ConversionError {
            field: "id".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert!(err.user_friendly_message().contains("abc"));
    }
}
