mod client;
pub(crate) mod types;

use async_trait::async_trait;

use crate::error::AiError;
use crate::traits::{GenerationConfig, TextGenerator};
use client::ClaudeClient;
use types::*;

// =============================================================================
// Claude
// =============================================================================

#[derive(Clone)]
pub struct Claude {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
    system: Option<String>,
    config: GenerationConfig,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            system: None,
            config: GenerationConfig::default(),
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self, AiError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| AiError::Config("ANTHROPIC_API_KEY environment variable not set".into()))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn client(&self) -> Result<ClaudeClient, AiError> {
        let client = ClaudeClient::new(&self.api_key, self.config.timeout)?;
        Ok(match self.base_url {
            Some(ref url) => client.with_base_url(url),
            None => client,
        })
    }

    fn request(&self, prompt: &str) -> ChatRequest {
        let request = ChatRequest::new(&self.model)
            .message(WireMessage::user(prompt))
            .max_tokens(self.config.max_output_tokens)
            .temperature(self.config.temperature);
        match self.system {
            Some(ref system) => request.system(system.clone()),
            None => request,
        }
    }
}

#[async_trait]
impl TextGenerator for Claude {
    fn provider(&self) -> &'static str {
        "claude"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let response = self.client()?.chat(&self.request(prompt)).await?;
        response.text().ok_or(AiError::EmptyResponse("claude"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claude_new() {
        let ai = Claude::new("sk-ant-test", "claude-sonnet-4-20250514");
        assert_eq!(ai.model, "claude-sonnet-4-20250514");
        assert_eq!(ai.api_key(), "sk-ant-test");
        assert_eq!(ai.provider(), "claude");
    }

    #[test]
    fn test_claude_with_base_url() {
        let ai = Claude::new("sk-ant-test", "claude-sonnet-4-20250514")
            .with_base_url("https://custom.api.com");
        assert_eq!(ai.base_url, Some("https://custom.api.com".to_string()));
    }

    #[test]
    fn request_carries_generation_settings() {
        let ai = Claude::new("sk-ant-test", "claude-haiku-4-5-20251001")
            .with_system("Reply with JSON only.")
            .with_config(GenerationConfig {
                temperature: Some(0.2),
                max_output_tokens: 2048,
                ..GenerationConfig::default()
            });
        let request = ai.request("hello");
        assert_eq!(request.max_tokens, 2048);
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.system.as_deref(), Some("Reply with JSON only."));
        assert_eq!(request.messages.len(), 1);
    }
}
