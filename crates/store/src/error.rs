use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// SQLite open / query failure.
    Sqlite(String),
    /// No record of `kind` with this id in the account (or share space).
    NotFound { kind: &'static str, id: String },
    /// Stored JSON column could not be encoded or decoded.
    Encode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(msg) => write!(f, "database error: {msg}"),
            Self::NotFound { kind, id } => write!(f, "{kind} '{id}' not found"),
            Self::Encode(msg) => write!(f, "encoding error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e.to_string())
    }
}
