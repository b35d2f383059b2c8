//! Storage capability for articles and duplicate group membership rows.
//!
//! Backends:
//! - [`MemoryStorage`]: process-local, lost on restart
//! - [`JsonFileStorage`]: same semantics, snapshot persisted to a JSON file

pub mod file_store;
pub mod json;
pub mod memory;
pub mod state;
pub mod traits;

pub use json::JsonFileStorage;
pub use memory::MemoryStorage;
pub use state::StoreState;
pub use traits::Storage;

use artsim_core::config::{StorageBackend, StorageConfig};
use artsim_core::error::Result;
use std::sync::Arc;

/// Open the backend selected by `config`.
pub async fn open_storage(config: &StorageConfig) -> Result<Arc<dyn Storage>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::with_scan_limit(config.scan_limit))),
        StorageBackend::File => {
            let store = JsonFileStorage::open(&config.data_dir, config.scan_limit).await?;
            Ok(Arc::new(store))
        }
    }
}
