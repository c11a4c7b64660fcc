//! The harvest pipeline: load, extract, merge, save

pub mod orchestrator;

pub use orchestrator::PipelineOrchestrator;

use crate::catalog::MergePath;
use crate::store::StoreError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Loading,
    Extracting,
    Merging,
    Saving,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Loading => "loading",
            PipelineStage::Extracting => "extracting",
            PipelineStage::Merging => "merging",
            PipelineStage::Saving => "saving",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

/// What one backend contributed during extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendReport {
    pub backend: String,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackendReport {
    fn succeeded(backend: &str, records: usize) -> Self {
        Self {
            backend: backend.to_string(),
            records,
            error: None,
        }
    }

    fn failed(backend: &str, error: impl Into<String>) -> Self {
        Self {
            backend: backend.to_string(),
            records: 0,
            error: Some(error.into()),
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Records loaded before the run
    pub existing: usize,
    /// Unique records extracted across all backends
    pub extracted: usize,
    /// Records saved
    pub merged: usize,
    pub merge_path: MergePath,
    pub backends: Vec<BackendReport>,
    pub location: String,
}
