//! Error results that can be returned while setting up a tokenizer
use thiserror::Error;

/// Configuration errors. Malformed CSS never ends up here: the tokenizer recovers from it and
/// reports a warning instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("json parsing error: {0}")]
    JsonSerde(#[from] serde_json::Error),
}

/// Result that can be returned which holds either T or an Error
pub type Result<T> = std::result::Result<T, Error>;
