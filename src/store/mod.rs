//! Persistence for the tool dataset
//!
//! The dataset is always loaded and saved as a whole. A store that has never
//! been written loads as empty; anything it cannot read back is an error so
//! a run never overwrites data it failed to understand.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::catalog::ToolRecord;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dataset in {path}: {message}")]
    InvalidFormat { path: PathBuf, message: String },

    #[error("Failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub trait RecordStore: Send + Sync {
    fn load(&self) -> Result<Vec<ToolRecord>, StoreError>;

    /// Replaces the whole persisted dataset with `records`
    fn save(&self, records: &[ToolRecord]) -> Result<(), StoreError>;

    /// Human-readable location, used in logs and summaries
    fn location(&self) -> String;
}
