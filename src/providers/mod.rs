// Chat-completions provider support
//
// This module is the seam between the analysis pipeline and the hosted
// model. The pipeline talks to the `ChatProvider` trait; tests swap in
// a mock server through the provider's base URL.

use async_trait::async_trait;

pub mod openai;
mod retry;

pub use openai::OpenAiProvider;
pub use retry::with_retry;

use crate::errors::ProviderError;

/// A single analysis request: one system prompt, one user turn
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    /// Empty means the provider's default model
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            model: String::new(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// What comes back from the model
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
}

/// Trait for chat-completions providers
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a request and wait for the complete response
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// Provider name (e.g. "openai")
    fn name(&self) -> &str;

    /// Default model when the request does not name one
    fn default_model(&self) -> &str;
}
