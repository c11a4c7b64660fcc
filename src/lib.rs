//! toolharvest - harvests AI tool records from LLM providers
//!
//! The crate prompts one or more LLM providers for structured "AI tool"
//! records, deduplicates them, and merges them into a persisted JSON dataset.
//!
//! # Core Concepts
//!
//! - **Model Gateway**: sends a prompt to a named backend and returns text or
//!   a typed failure, never an error
//! - **Identity key**: a record's trimmed URL, or its lowercased name when
//!   the URL is empty; records sharing a key describe the same tool
//! - **Merge**: an AI-assisted reconciliation of two datasets with plain
//!   deduplication as the guaranteed fallback
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use toolharvest::config::AppConfig;
//! use toolharvest::llm::{build_gateway, ProviderSelection};
//! use toolharvest::pipeline::PipelineOrchestrator;
//! use toolharvest::store::JsonFileStore;
//!
//! # async fn harvest() -> anyhow::Result<()> {
//! let config = AppConfig::load(None)?;
//! let gateway = build_gateway(&config, &ProviderSelection::AllAvailable)?;
//! let orchestrator = PipelineOrchestrator::new(
//!     Arc::new(JsonFileStore::new(config.data_file())),
//!     Arc::new(gateway),
//!     config.crawler.max_content_length,
//! );
//!
//! let summary = orchestrator.run("AI video tools", true).await?;
//! println!("saved {} records", summary.merged);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`catalog`]: records, reply parsing, deduplication and AI-assisted merge
//! - [`llm`]: LLM clients and the model gateway
//! - [`store`]: dataset persistence
//! - [`pipeline`]: the load, extract, merge, save orchestration

pub mod catalog;
pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod store;
pub mod util;

pub use catalog::{dedupe, parse_tools, AiMerger, MergeOutcome, MergePath, ToolRecord};
pub use config::{AppConfig, ConfigError};
pub use llm::{BackendError, GatewayResult, ModelGateway, ProviderGateway};
pub use pipeline::{PipelineError, PipelineOrchestrator, RunSummary};
pub use store::{JsonFileStore, MemoryStore, RecordStore, StoreError};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
