use thiserror::Error;

use crate::types::ArticleId;

#[derive(Error, Debug)]
pub enum ArtsimError {
    #[error("Article not found: {id}")]
    NotFound { id: ArticleId },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ArtsimError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Any failure coming out of a storage backend (I/O, encoding, driver).
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Io(_) | Self::Serialization(_) | Self::Other(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ArtsimError>;
