//! Uniform "send a prompt to a named backend" capability
//!
//! The gateway never returns an error: every transport, timeout or reply
//! problem is folded into [`GatewayResult::Failure`] so callers can skip a
//! backend without unwinding.

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{LLMRequest, TokenUsage};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-call generation options; unset fields use the backend's defaults
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SendOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl SendOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Why a gateway call produced no content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Timeout { seconds: u64 },
    Transport(String),
    MalformedResponse(String),
    NotConfigured(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Timeout { seconds } => write!(f, "timeout ({}s)", seconds),
            FailureReason::Transport(message) => write!(f, "transport-error: {}", message),
            FailureReason::MalformedResponse(message) => {
                write!(f, "malformed-response: {}", message)
            }
            FailureReason::NotConfigured(backend) => write!(f, "not-configured: {}", backend),
        }
    }
}

impl From<BackendError> for FailureReason {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::TimeoutError { seconds } => FailureReason::Timeout { seconds },
            BackendError::InvalidResponse { message, .. } => {
                FailureReason::MalformedResponse(message)
            }
            other => FailureReason::Transport(other.to_string()),
        }
    }
}

/// Outcome of one gateway call
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResult {
    Success {
        text: String,
        usage: Option<TokenUsage>,
        model: String,
    },
    Failure {
        reason: FailureReason,
    },
}

impl GatewayResult {
    pub fn failure(reason: FailureReason) -> Self {
        GatewayResult::Failure { reason }
    }
}

#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Available backend names, in configuration order
    fn backends(&self) -> Vec<String>;

    async fn send(&self, backend: &str, prompt: &str, options: SendOptions) -> GatewayResult;
}

/// Backend defaults applied when [`SendOptions`] leaves a field unset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackendDefaults {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for BackendDefaults {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

struct Backend {
    name: String,
    client: Arc<dyn LLMClient>,
    defaults: BackendDefaults,
}

/// Gateway over a fixed, ordered set of [`LLMClient`]s
#[derive(Default)]
pub struct ProviderGateway {
    backends: Vec<Backend>,
}

impl ProviderGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a backend; a repeated name replaces the earlier client in place
    pub fn with_backend(
        mut self,
        name: impl Into<String>,
        client: Arc<dyn LLMClient>,
        defaults: BackendDefaults,
    ) -> Self {
        let name = name.into();
        match self.backends.iter_mut().find(|b| b.name == name) {
            Some(existing) => {
                existing.client = client;
                existing.defaults = defaults;
            }
            None => self.backends.push(Backend {
                name,
                client,
                defaults,
            }),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[async_trait]
impl ModelGateway for ProviderGateway {
    fn backends(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.name.clone()).collect()
    }

    async fn send(&self, backend: &str, prompt: &str, options: SendOptions) -> GatewayResult {
        let Some(entry) = self.backends.iter().find(|b| b.name == backend) else {
            warn!(backend, "Backend is not configured");
            return GatewayResult::failure(FailureReason::NotConfigured(backend.to_string()));
        };

        let request = LLMRequest::prompt(prompt)
            .with_temperature(options.temperature.unwrap_or(entry.defaults.temperature))
            .with_max_tokens(options.max_tokens.unwrap_or(entry.defaults.max_tokens));

        debug!(
            backend,
            prompt_chars = request.prompt_chars(),
            "Sending prompt"
        );

        match entry.client.chat(request).await {
            Ok(response) if response.content.trim().is_empty() => {
                warn!(backend, "Backend returned an empty reply");
                GatewayResult::failure(FailureReason::MalformedResponse(
                    "empty reply".to_string(),
                ))
            }
            Ok(response) => {
                let model = response
                    .model
                    .or_else(|| entry.client.model_info())
                    .unwrap_or_else(|| backend.to_string());
                info!(
                    backend,
                    model = %model,
                    chars = response.content.chars().count(),
                    response_time_ms = response.response_time.as_millis() as u64,
                    "Backend replied"
                );
                if let Some(usage) = &response.usage {
                    debug!(backend, ?usage, "Token usage");
                }
                GatewayResult::Success {
                    text: response.content,
                    usage: response.usage,
                    model,
                }
            }
            Err(error) => {
                warn!(backend, %error, "Backend call failed");
                GatewayResult::failure(error.into())
            }
        }
    }
}
