//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { backends } => {
                info!(backends = %backends.join(","), "Starting harvest");
            }
            ProgressEvent::Loaded { records } => {
                info!(records, "Existing dataset loaded");
            }
            ProgressEvent::ExtractionStarted { backend } => {
                debug!(backend = %backend, "Requesting extraction");
            }
            ProgressEvent::ExtractionComplete {
                backend,
                records,
                error,
            } => match error {
                Some(error) => {
                    warn!(backend = %backend, error = %error, "Backend contributed no records");
                }
                None => {
                    info!(backend = %backend, records, "Extraction complete");
                }
            },
            ProgressEvent::MergeStarted { existing, incoming } => {
                debug!(existing, incoming, "Merging datasets");
            }
            ProgressEvent::MergeComplete { records, path } => {
                info!(records, path = %path, "Merge complete");
            }
            ProgressEvent::Saved { records, location } => {
                info!(records, location = %location, "Dataset saved");
            }
            ProgressEvent::Completed { total_time } => {
                info!(total_time_ms = total_time.as_millis(), "Harvest complete");
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Harvest failed");
            }
        }
    }
}
