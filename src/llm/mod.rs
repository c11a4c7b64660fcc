//! LLM client abstraction layer
//!
//! This module provides a trait-based abstraction for LLM communication and the
//! [`ModelGateway`] that the catalog pipeline talks to. Real providers go
//! through [`GenAIClient`]; tests script replies with [`MockLLMClient`].

mod client;
mod error;
pub mod factory;
pub mod gateway;
mod genai;
mod mock;
mod types;

pub use client::LLMClient;
pub use error::BackendError;
pub use factory::{build_gateway, resolve_selection, ProviderSelection};
pub use gateway::{
    BackendDefaults, FailureReason, GatewayResult, ModelGateway, ProviderGateway, SendOptions,
};
pub use self::genai::GenAIClient;
pub use mock::{MockLLMClient, MockResponse};
pub use types::{ChatMessage, LLMRequest, LLMResponse, MessageRole, TokenUsage};
