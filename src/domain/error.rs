use thiserror::Error;

/// Malformed form input, rejected before any payload is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("field `{input}` must look like name=value")]
    MissingSeparator { input: String },
    #[error("field name must not be empty in `{input}`")]
    EmptyName { input: String },
    #[error("file field `{name}` does not name a file")]
    EmptyFilePath { name: String },
}

/// Client-side required-field checks that block a submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("select a credential for {point}")]
    MissingCredential { point: &'static str },
    #[error("credential id `{value}` for {point} is not a number")]
    InvalidCredential { point: &'static str, value: String },
    #[error("select a bucket for {point}")]
    MissingBucket { point: &'static str },
    #[error("select a value for {what}")]
    MissingSelection { what: &'static str },
    #[error("{what} is required")]
    MissingValue { what: &'static str },
    #[error("invalid value for {what}: {reason}")]
    InvalidValue { what: &'static str, reason: String },
}

impl ValidationError {
    pub fn missing_selection(what: &'static str) -> Self {
        Self::MissingSelection { what }
    }
}
