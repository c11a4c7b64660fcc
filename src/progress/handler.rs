//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while a pipeline run progresses
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started with the given backends
    Started { backends: Vec<String> },

    /// Existing dataset loaded
    Loaded { records: usize },

    /// Extraction request sent to a backend
    ExtractionStarted { backend: String },

    /// Extraction finished for a backend; `error` is set when it contributed nothing
    ExtractionComplete {
        backend: String,
        records: usize,
        error: Option<String>,
    },

    MergeStarted { existing: usize, incoming: usize },

    MergeComplete { records: usize, path: String },

    Saved { records: usize, location: String },

    /// Run completed successfully
    Completed { total_time: Duration },

    /// Run failed
    Failed { error: String },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        NoOpHandler.on_progress(&ProgressEvent::Loaded { records: 3 });
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::Started {
            backends: vec!["deepseek".to_string()],
        });
        handler.on_progress(&ProgressEvent::ExtractionComplete {
            backend: "deepseek".to_string(),
            records: 12,
            error: None,
        });
        handler.on_progress(&ProgressEvent::Completed {
            total_time: Duration::from_secs(5),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::MergeStarted {
            existing: 4,
            incoming: 2,
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("MergeStarted"));
        assert!(debug_str.contains("existing: 4"));
    }
}
