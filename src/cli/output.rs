//! Output formatting for multiple formats
//!
//! Every command result can be rendered as JSON, YAML or human-readable text.
//! Structured formats go through serde; the human format is hand-laid.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::AppConfig;
use crate::pipeline::RunSummary;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Availability of one configured provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProviderStatus {
    /// Builds the status list for every configured provider, in config order
    pub fn collect(config: &AppConfig) -> Vec<Self> {
        config
            .provider_names()
            .into_iter()
            .map(|name| {
                let settings = config.provider_settings(&name).cloned().unwrap_or_default();
                match config.resolve_provider(&name) {
                    Ok(resolved) => ProviderStatus {
                        name,
                        available: true,
                        model: Some(resolved.model),
                        base_url: resolved.base_url,
                        env_key: settings.env_key,
                        message: None,
                    },
                    Err(e) => ProviderStatus {
                        name,
                        available: false,
                        model: settings.default_model,
                        base_url: settings.default_base_url,
                        env_key: settings.env_key,
                        message: Some(e.to_string()),
                    },
                }
            })
            .collect()
    }
}

/// Renders command results in the configured format
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn structured<T: Serialize>(&self, value: &T, what: &str) -> Result<String> {
        if self.format == OutputFormat::Yaml {
            serde_yaml::to_string(value)
                .with_context(|| format!("Failed to serialize {} to YAML", what))
        } else {
            serde_json::to_string_pretty(value)
                .with_context(|| format!("Failed to serialize {} to JSON", what))
        }
    }

    pub fn format_summary(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(self.format_summary_human(summary)),
            _ => self.structured(summary, "run summary"),
        }
    }

    pub fn format_providers(&self, providers: &[ProviderStatus]) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(self.format_providers_human(providers)),
            _ => self.structured(&providers, "provider status"),
        }
    }

    pub fn format_config(&self, config: &AppConfig) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(config.to_string()),
            _ => {
                let map: BTreeMap<String, String> = config.to_display_map().into_iter().collect();
                self.structured(&map, "config")
            }
        }
    }

    fn format_summary_human(&self, summary: &RunSummary) -> String {
        let mut output = String::new();

        output.push_str("\u{2713} Harvest Complete\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str("Providers:\n");
        for (i, report) in summary.backends.iter().enumerate() {
            let connector = if i + 1 == summary.backends.len() {
                "\u{2514}"
            } else {
                "\u{251C}"
            };
            match &report.error {
                None => output.push_str(&format!(
                    "{}\u{2500} \u{2713} {}: {} record(s)\n",
                    connector, report.backend, report.records
                )),
                Some(error) => output.push_str(&format!(
                    "{}\u{2500} \u{2717} {}: {}\n",
                    connector, report.backend, error
                )),
            }
        }
        output.push('\n');

        output.push_str(&format!("Existing:   {}\n", summary.existing));
        output.push_str(&format!("Extracted:  {}\n", summary.extracted));
        output.push_str(&format!("Saved:      {}\n", summary.merged));
        output.push_str(&format!("Merge:      {}\n", summary.merge_path));
        output.push_str(&format!("Dataset:    {}\n", summary.location));

        output
    }

    fn format_providers_human(&self, providers: &[ProviderStatus]) -> String {
        let mut output = String::new();

        output.push_str("Provider Status\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        if providers.is_empty() {
            output.push_str("No providers configured. Add a providers section to toolharvest.yaml.\n");
            return output;
        }

        for status in providers {
            let symbol = if status.available { "\u{2713}" } else { "\u{2717}" };
            output.push_str(&format!("{} {}\n", symbol, status.name));
            if let Some(model) = &status.model {
                output.push_str(&format!("  Model:    {}\n", model));
            }
            if let Some(base_url) = &status.base_url {
                output.push_str(&format!("  Endpoint: {}\n", base_url));
            }
            if let Some(message) = &status.message {
                output.push_str(&format!("  {}\n", message));
            }
        }

        let available = providers.iter().filter(|p| p.available).count();
        output.push_str(&format!(
            "\n{} of {} provider(s) available\n",
            available,
            providers.len()
        ));

        output
    }
}
