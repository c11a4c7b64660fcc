use crate::config::{AppConfig, ConfigError, ResolvedProvider};
use crate::llm::gateway::{BackendDefaults, ProviderGateway};
use crate::llm::{GenAIClient, LLMClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Which providers a run should talk to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProviderSelection {
    /// Every provider whose credential is present; the rest are skipped
    #[default]
    AllAvailable,
    /// Exactly these providers; any missing credential is an error
    Named(Vec<String>),
}

impl ProviderSelection {
    /// Builds a selection from a comma-separated list, empty meaning all
    pub fn from_list(list: &str) -> Self {
        let names: Vec<String> = list
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if names.is_empty() {
            ProviderSelection::AllAvailable
        } else {
            ProviderSelection::Named(names)
        }
    }
}

/// Resolves the selection against the config
pub fn resolve_selection(
    config: &AppConfig,
    selection: &ProviderSelection,
) -> Result<Vec<ResolvedProvider>, ConfigError> {
    match selection {
        ProviderSelection::AllAvailable => {
            let available = config.available_providers();
            debug!(
                "Available providers: {:?}",
                available.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
            );
            Ok(available)
        }
        ProviderSelection::Named(names) => names
            .iter()
            .map(|name| config.resolve_provider(name))
            .collect(),
    }
}

/// Creates one genai client per provider and registers it in a gateway
///
/// Explicitly named providers that fail to initialize abort the build;
/// when scanning all available providers, failures are logged and skipped.
pub fn build_gateway(
    config: &AppConfig,
    selection: &ProviderSelection,
) -> Result<ProviderGateway, ConfigError> {
    let timeout = Duration::from_secs(config.crawler.request_timeout);
    let strict = matches!(selection, ProviderSelection::Named(_));
    let mut gateway = ProviderGateway::new();

    for provider in resolve_selection(config, selection)? {
        let defaults = BackendDefaults {
            temperature: provider.temperature,
            max_tokens: provider.max_tokens,
        };

        match GenAIClient::new(&provider, timeout) {
            Ok(client) => {
                info!(
                    "Using provider: {} ({})",
                    provider.name,
                    client.model_info().unwrap_or_default()
                );
                let client: Arc<dyn LLMClient> = Arc::new(client);
                gateway = gateway.with_backend(provider.name.clone(), client, defaults);
            }
            Err(e) if strict => return Err(e.into()),
            Err(e) => warn!("Failed to initialize {}: {}", provider.name, e),
        }
    }

    if gateway.is_empty() {
        warn!("No LLM provider available; extraction will yield no records");
    }

    Ok(gateway)
}
