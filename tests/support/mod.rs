//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use toolharvest::llm::{
    BackendDefaults, FailureReason, GatewayResult, MockLLMClient, MockResponse, ModelGateway,
    ProviderGateway, SendOptions,
};
use toolharvest::ToolRecord;

/// One scripted reply, optionally delayed
#[derive(Clone)]
pub struct Scripted {
    pub result: GatewayResult,
    pub delay: Duration,
}

/// Gateway whose backends answer from per-backend queues and log every call
#[derive(Default)]
pub struct ScriptedGateway {
    order: Vec<String>,
    replies: Mutex<HashMap<String, Vec<Scripted>>>,
    calls: Mutex<Vec<(String, String)>>,
    completions: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(backends: &[&str]) -> Self {
        Self {
            order: backends.iter().map(|b| b.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn reply(self, backend: &str, text: &str) -> Self {
        self.reply_after(backend, text, Duration::ZERO)
    }

    pub fn reply_after(self, backend: &str, text: &str, delay: Duration) -> Self {
        self.push(
            backend,
            Scripted {
                result: GatewayResult::Success {
                    text: text.to_string(),
                    usage: None,
                    model: format!("{}-model", backend),
                },
                delay,
            },
        )
    }

    pub fn fail(self, backend: &str, reason: FailureReason) -> Self {
        self.push(
            backend,
            Scripted {
                result: GatewayResult::failure(reason),
                delay: Duration::ZERO,
            },
        )
    }

    fn push(self, backend: &str, scripted: Scripted) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(backend.to_string())
            .or_default()
            .push(scripted);
        self
    }

    /// (backend, prompt) pairs in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Backends in the order their replies completed
    pub fn completions(&self) -> Vec<String> {
        self.completions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    fn backends(&self) -> Vec<String> {
        self.order.clone()
    }

    async fn send(&self, backend: &str, prompt: &str, _options: SendOptions) -> GatewayResult {
        self.calls
            .lock()
            .unwrap()
            .push((backend.to_string(), prompt.to_string()));

        let scripted = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(backend) {
                Some(queue) if !queue.is_empty() => Some(queue.remove(0)),
                _ => None,
            }
        };

        let Some(scripted) = scripted else {
            return GatewayResult::failure(FailureReason::NotConfigured(backend.to_string()));
        };

        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        self.completions.lock().unwrap().push(backend.to_string());
        scripted.result
    }
}

/// A ProviderGateway over mock clients, one per name
pub fn mock_gateway(backends: &[(&str, Vec<MockResponse>)]) -> (ProviderGateway, Vec<Arc<MockLLMClient>>) {
    let mut gateway = ProviderGateway::new();
    let mut clients = Vec::new();
    for (name, responses) in backends {
        let client = Arc::new(MockLLMClient::with_name(*name));
        client.add_responses(responses.clone());
        gateway = gateway.with_backend(*name, client.clone(), BackendDefaults::default());
        clients.push(client);
    }
    (gateway, clients)
}

pub fn tool(name: &str, url: &str, description: &str, tags: &[&str]) -> ToolRecord {
    ToolRecord::new(name)
        .with_url(url)
        .with_description(description)
        .with_tags(tags.iter().copied())
}

pub fn to_json(records: &[ToolRecord]) -> String {
    serde_json::to_string(records).unwrap()
}
