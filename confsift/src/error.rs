//! Error types for extraction, editing, reconstruction and storage.
//!
//! Each stage has its own error so callers can match on exactly what that
//! stage can fail with. [`Error`] collects them for code that drives a whole
//! session.

use thiserror::Error;

/// Input claimed to be JSON is not syntactically valid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid JSON at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// An edit addressed a record that does not exist.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("record index {index} out of range for {len} records")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

#[derive(Error, Debug)]
pub enum ReconstructError {
    /// A dotted path runs through a leaf, or a leaf would replace an object.
    #[error("key `{key}` collides with existing entry `{prefix}`")]
    PathCollision { key: String, prefix: String },

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("unsupported file `{file_name}`: expected a .json or .config file")]
    UnsupportedFile { file_name: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("no saved configuration `{config_id}` for application `{application}`")]
    NotFound {
        application: String,
        config_id: String,
    },
}

/// Any error produced by this crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Reconstruct(#[from] ReconstructError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
