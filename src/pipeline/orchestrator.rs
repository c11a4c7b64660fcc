use super::{BackendReport, PipelineError, PipelineStage, RunSummary};
use crate::catalog::{dedupe, parse_tools, prompts, AiMerger, ToolRecord};
use crate::llm::{GatewayResult, ModelGateway, SendOptions};
use crate::progress::{ProgressEvent, ProgressHandler};
use crate::store::RecordStore;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs load, extract, merge and save against one store and one gateway
pub struct PipelineOrchestrator {
    store: Arc<dyn RecordStore>,
    gateway: Arc<dyn ModelGateway>,
    merger: AiMerger,
    options: SendOptions,
    progress_handler: Option<Arc<dyn ProgressHandler>>,
}

impl PipelineOrchestrator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        gateway: Arc<dyn ModelGateway>,
        max_content_length: usize,
    ) -> Self {
        let merger = AiMerger::new(gateway.clone(), max_content_length);
        Self {
            store,
            gateway,
            merger,
            options: SendOptions::default(),
            progress_handler: None,
        }
    }

    pub fn with_progress(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress_handler = Some(handler);
        self
    }

    /// Options applied to both extraction and merge calls
    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self.merger = self.merger.with_options(options);
        self
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress_handler {
            handler.on_progress(&event);
        }
    }

    fn enter(&self, stage: PipelineStage) {
        debug!("Stage: {}", stage);
    }

    /// Executes one harvest
    ///
    /// With `use_all` every gateway backend is queried, otherwise only the
    /// first. Backend failures and an empty gateway are absorbed; only
    /// persistence errors fail the run.
    pub async fn run(&self, content: &str, use_all: bool) -> Result<RunSummary, PipelineError> {
        let start = Instant::now();
        let result = self.execute(content, use_all).await;

        match &result {
            Ok(_) => self.emit(ProgressEvent::Completed {
                total_time: start.elapsed(),
            }),
            Err(e) => self.emit(ProgressEvent::Failed {
                error: e.to_string(),
            }),
        }
        result
    }

    async fn execute(&self, content: &str, use_all: bool) -> Result<RunSummary, PipelineError> {
        let mut backends = self.gateway.backends();
        if !use_all {
            backends.truncate(1);
        }
        if backends.is_empty() {
            warn!("No providers available, existing records will be kept as they are");
        } else {
            info!("Starting harvest with backends: {}", backends.join(", "));
        }
        self.emit(ProgressEvent::Started {
            backends: backends.clone(),
        });

        self.enter(PipelineStage::Loading);
        let existing = self.store.load()?;
        self.emit(ProgressEvent::Loaded {
            records: existing.len(),
        });

        self.enter(PipelineStage::Extracting);
        let (candidates, reports) = self.extract(content, &backends).await;
        let extracted = dedupe(&candidates);
        info!(
            "Extracted {} unique record(s) from {} candidate(s)",
            extracted.len(),
            candidates.len()
        );

        self.enter(PipelineStage::Merging);
        self.emit(ProgressEvent::MergeStarted {
            existing: existing.len(),
            incoming: extracted.len(),
        });
        let outcome = self
            .merger
            .merge(&existing, &extracted, backends.first().map(String::as_str))
            .await;
        self.emit(ProgressEvent::MergeComplete {
            records: outcome.records.len(),
            path: outcome.path.to_string(),
        });

        self.enter(PipelineStage::Saving);
        self.store.save(&outcome.records)?;
        let location = self.store.location();
        self.emit(ProgressEvent::Saved {
            records: outcome.records.len(),
            location: location.clone(),
        });

        self.enter(PipelineStage::Done);
        Ok(RunSummary {
            existing: existing.len(),
            extracted: extracted.len(),
            merged: outcome.records.len(),
            merge_path: outcome.path,
            backends: reports,
            location,
        })
    }

    /// Queries every backend concurrently and accumulates in backend order
    async fn extract(&self, content: &str, backends: &[String]) -> (Vec<ToolRecord>, Vec<BackendReport>) {
        let prompt = prompts::extraction_prompt(content);

        let calls = backends.iter().map(|backend| {
            let prompt = prompt.as_str();
            async move {
                self.emit(ProgressEvent::ExtractionStarted {
                    backend: backend.clone(),
                });
                let result = self.gateway.send(backend, prompt, self.options).await;
                (backend, result)
            }
        });
        let settled = join_all(calls).await;

        let mut candidates = Vec::new();
        let mut reports = Vec::with_capacity(settled.len());
        for (backend, result) in settled {
            let report = match result {
                GatewayResult::Success { text, model, .. } => {
                    let tools = parse_tools(&text);
                    if tools.is_empty() {
                        warn!(backend = %backend, model = %model, "Reply parsed to no records");
                        BackendReport::failed(backend, "reply parsed to no records")
                    } else {
                        info!(backend = %backend, model = %model, records = tools.len(), "Backend contributed records");
                        let report = BackendReport::succeeded(backend, tools.len());
                        candidates.extend(tools);
                        report
                    }
                }
                GatewayResult::Failure { reason } => {
                    warn!(backend = %backend, %reason, "Extraction failed");
                    BackendReport::failed(backend, reason.to_string())
                }
            };

            self.emit(ProgressEvent::ExtractionComplete {
                backend: report.backend.clone(),
                records: report.records,
                error: report.error.clone(),
            });
            reports.push(report);
        }

        (candidates, reports)
    }
}
