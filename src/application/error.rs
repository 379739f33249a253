use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::error::{FormError, ValidationError};

/// Why a submission did not produce a result.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("a submission of this form is already in progress")]
    Busy,
    #[error("failed to read attachment {path}: {source}")]
    Attachment {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid request: {0}")]
    Request(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}
