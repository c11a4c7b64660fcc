use super::dedupe::dedupe;
use super::parser::parse_tools;
use super::prompts::merge_prompt;
use super::record::ToolRecord;
use crate::llm::{GatewayResult, ModelGateway, SendOptions};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Which path produced a merge result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MergePath {
    /// One side was empty and the other was returned as is
    Unchanged,
    AiMerged { backend: String },
    Deduplicated { reason: String },
}

impl fmt::Display for MergePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergePath::Unchanged => write!(f, "unchanged"),
            MergePath::AiMerged { backend } => write!(f, "ai-merged ({})", backend),
            MergePath::Deduplicated { reason } => write!(f, "deduplicated ({})", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub records: Vec<ToolRecord>,
    pub path: MergePath,
}

impl MergeOutcome {
    fn unchanged(records: &[ToolRecord]) -> Self {
        Self {
            records: records.to_vec(),
            path: MergePath::Unchanged,
        }
    }

    fn deduplicated(
        existing: &[ToolRecord],
        incoming: &[ToolRecord],
        reason: impl Into<String>,
    ) -> Self {
        let combined: Vec<ToolRecord> = existing.iter().chain(incoming).cloned().collect();
        Self {
            records: dedupe(&combined),
            path: MergePath::Deduplicated {
                reason: reason.into(),
            },
        }
    }
}

/// Gives AI-merged records back the unmodelled keys of the stored records
/// they replace
fn restore_extra(mut merged: Vec<ToolRecord>, existing: &[ToolRecord]) -> Vec<ToolRecord> {
    let stored: HashMap<String, &ToolRecord> = existing
        .iter()
        .filter(|r| !r.extra.is_empty())
        .map(|r| (r.identity_key(), r))
        .collect();
    if stored.is_empty() {
        return merged;
    }

    for record in &mut merged {
        if let Some(previous) = stored.get(&record.identity_key()) {
            record.absorb_extra(previous.extra.clone());
        }
    }
    merged
}

/// Merges two record sets through a model call, falling back to [`dedupe`]
pub struct AiMerger {
    gateway: Arc<dyn ModelGateway>,
    max_content_length: usize,
    options: SendOptions,
}

impl AiMerger {
    pub fn new(gateway: Arc<dyn ModelGateway>, max_content_length: usize) -> Self {
        Self {
            gateway,
            max_content_length,
            options: SendOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    /// Merges `incoming` into `existing`
    ///
    /// `backend` defaults to the gateway's first backend. This never fails:
    /// gateway failures and unusable replies degrade to plain deduplication.
    pub async fn merge(
        &self,
        existing: &[ToolRecord],
        incoming: &[ToolRecord],
        backend: Option<&str>,
    ) -> MergeOutcome {
        if incoming.is_empty() {
            info!("No new records; keeping {} existing", existing.len());
            return MergeOutcome::unchanged(existing);
        }
        if existing.is_empty() {
            info!("No existing records; taking {} new", incoming.len());
            return MergeOutcome::unchanged(incoming);
        }

        let backend = match backend {
            Some(name) => name.to_string(),
            None => match self.gateway.backends().into_iter().next() {
                Some(first) => first,
                None => {
                    info!("No merge backend available, deduplicating locally");
                    return MergeOutcome::deduplicated(existing, incoming, "no backend");
                }
            },
        };

        let prompt = merge_prompt(existing, incoming, self.max_content_length);
        info!(
            backend = %backend,
            existing = existing.len(),
            incoming = incoming.len(),
            "Requesting AI-assisted merge"
        );

        match self.gateway.send(&backend, &prompt, self.options).await {
            GatewayResult::Success { text, .. } => {
                let merged = parse_tools(&text);
                if merged.is_empty() {
                    warn!(backend = %backend, "Merge reply held no records, deduplicating locally");
                    return MergeOutcome::deduplicated(existing, incoming, "empty merge reply");
                }
                info!(backend = %backend, records = merged.len(), "AI merge complete");
                MergeOutcome {
                    records: restore_extra(merged, existing),
                    path: MergePath::AiMerged { backend },
                }
            }
            GatewayResult::Failure { reason } => {
                warn!(backend = %backend, %reason, "AI merge failed, deduplicating locally");
                MergeOutcome::deduplicated(existing, incoming, reason.to_string())
            }
        }
    }
}
