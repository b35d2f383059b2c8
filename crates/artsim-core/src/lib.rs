//! Shared model, error and configuration types for article-similarity.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ArtsimConfig, ServerConfig, SimilarityConfig, StorageBackend, StorageConfig};
pub use error::{ArtsimError, Result};
pub use types::{Article, ArticleId, DuplicateGroup, DuplicateGroupId};
