//! GenAI-based LLM client implementation
//!
//! This module provides an LLM client implementation using the `genai` crate.
//! Every configured provider gets its own client with an explicit endpoint and
//! key, so OpenAI-compatible services (DeepSeek, SiliconFlow, Kimi, Doubao)
//! work through the same adapter as the native ones.

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{ChatMessage, LLMRequest, LLMResponse, MessageRole, TokenUsage};
use crate::config::ResolvedProvider;
use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{ChatMessage as GenAIChatMessage, ChatOptions, ChatRequest as GenAIChatRequest};
use genai::resolver::{AuthData, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};
use std::time::Duration;
use tracing::{debug, error};

/// GenAI-based LLM client bound to one configured provider
pub struct GenAIClient {
    /// GenAI client instance
    client: Client,
    /// Provider name as configured (e.g. "deepseek")
    name: String,
    /// Model name
    model: String,
    /// Adapter used to talk to the provider
    adapter: AdapterKind,
    /// Request timeout
    timeout: Duration,
}

impl GenAIClient {
    /// Creates a client for a resolved provider
    ///
    /// The endpoint and key from configuration always win over genai's own
    /// environment lookup.
    pub fn new(provider: &ResolvedProvider, timeout: Duration) -> Result<Self, BackendError> {
        if provider.api_key.trim().is_empty() {
            return Err(BackendError::ConfigurationError {
                message: format!("API key for {} is empty", provider.name),
            });
        }

        let adapter = provider.adapter;
        let model = provider.model.clone();
        let api_key = provider.api_key.clone();
        let base_url = provider.base_url.clone();

        debug!(
            "Creating GenAI client: provider={}, adapter={}, model={}, endpoint={}",
            provider.name,
            adapter.as_str(),
            model,
            base_url.as_deref().unwrap_or("<adapter default>")
        );

        let model_for_resolver = model.clone();
        let resolver = ServiceTargetResolver::from_resolver_fn(
            move |service_target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
                let endpoint = match &base_url {
                    Some(url) => Endpoint::from_owned(url.clone()),
                    None => service_target.endpoint,
                };

                Ok(ServiceTarget {
                    endpoint,
                    auth: AuthData::from_single(api_key.clone()),
                    model: ModelIden::new(adapter, &model_for_resolver),
                })
            },
        );

        let client = Client::builder()
            .with_service_target_resolver(resolver)
            .build();

        Ok(Self {
            client,
            name: provider.name.clone(),
            model,
            adapter,
            timeout,
        })
    }

    /// Converts our ChatMessage to genai ChatMessage
    fn convert_message(&self, msg: &ChatMessage) -> GenAIChatMessage {
        match msg.role {
            MessageRole::System => GenAIChatMessage::system(&msg.content),
            MessageRole::User => GenAIChatMessage::user(&msg.content),
            MessageRole::Assistant => GenAIChatMessage::assistant(&msg.content),
        }
    }
}

fn to_u32(value: Option<i32>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

#[async_trait]
impl LLMClient for GenAIClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        let start = std::time::Instant::now();

        let messages: Vec<GenAIChatMessage> = request
            .messages
            .iter()
            .map(|m| self.convert_message(m))
            .collect();
        let genai_request = GenAIChatRequest::new(messages);

        let mut options = ChatOptions::default();
        if let Some(temp) = request.temperature {
            options = options.with_temperature(temp as f64);
        }
        if let Some(max_tokens) = request.max_tokens {
            options = options.with_max_tokens(max_tokens);
        }

        debug!(
            "{} request: model={}, prompt_chars={}",
            self.name,
            self.model,
            request.prompt_chars()
        );

        let response = match tokio::time::timeout(
            self.timeout,
            self.client
                .exec_chat(&self.model, genai_request, Some(&options)),
        )
        .await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                error!("{} API error: {}", self.name, e);
                return Err(BackendError::ApiError {
                    message: format!("{} request failed: {}", self.name, e),
                    status_code: None,
                });
            }
            Err(_) => {
                error!(
                    "{} request timed out after {}s",
                    self.name,
                    self.timeout.as_secs()
                );
                return Err(BackendError::TimeoutError {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let content = response.first_text().unwrap_or_default().to_string();
        if content.trim().is_empty() {
            return Err(BackendError::InvalidResponse {
                message: format!("{} returned no text content", self.name),
                raw_response: None,
            });
        }

        let usage = TokenUsage {
            prompt_tokens: to_u32(response.usage.prompt_tokens),
            completion_tokens: to_u32(response.usage.completion_tokens),
            total_tokens: to_u32(response.usage.total_tokens),
        };

        Ok(LLMResponse::text(content, start.elapsed())
            .with_usage(usage)
            .with_model(self.model.clone()))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model_info(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

impl std::fmt::Debug for GenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAIClient")
            .field("name", &self.name)
            .field("adapter", &self.adapter)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
