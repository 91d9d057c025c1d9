use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] sift_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Item title cannot be empty")]
    EmptyTitle,
    #[error("File pages need an --uploader")]
    MissingUploader,
    #[error("Invalid item id: {0}")]
    InvalidItemId(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
