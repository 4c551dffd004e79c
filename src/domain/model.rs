use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column names of the intermediate CSV file, in the order the generator writes them.
pub const USER_FIELDS: [&str; 5] = ["id", "name", "email", "password", "description"];

/// A synthetic user as produced by the record generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub description: String,
}

/// One untransformed row read back from the intermediate file.
///
/// Every value is kept as the string found in the file; typing happens in the
/// transform stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub description: String,
}

impl From<UserData> for RawRecord {
    fn from(user: UserData) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            password: user.password,
            description: user.description,
        }
    }
}

/// A row ready for the `users` table. There is deliberately no password field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformedRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub description: String,
    pub processed_at: DateTime<Utc>,
}
