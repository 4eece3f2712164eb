//! Error types for the collaborator boundaries (storage, file loading,
//! request parsing). The numeric core is total and never returns these.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage operation failed: {0}")]
    Storage(String),

    #[error("Input validation failed: {0}")]
    Validation(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::UnknownUser(_) | Error::Json(_)
        )
    }
}
