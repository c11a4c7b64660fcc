//! Utility modules for toolharvest

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
