mod client;
pub(crate) mod types;

use async_trait::async_trait;

use crate::error::AiError;
use crate::traits::{GenerationConfig, TextGenerator};
use client::GeminiClient;
use types::*;

// =============================================================================
// Gemini
// =============================================================================

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
    system: Option<String>,
    config: GenerationConfig,
}

impl Gemini {
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
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| AiError::Config("GEMINI_API_KEY environment variable not set".into()))?;
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

    fn client(&self) -> Result<GeminiClient, AiError> {
        let client = GeminiClient::new(&self.api_key, self.config.timeout)?;
        Ok(match self.base_url {
            Some(ref url) => client.with_base_url(url),
            None => client,
        })
    }

    fn request(&self, prompt: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: self.system.as_ref().map(|s| Content {
                role: None,
                parts: vec![Part {
                    text: Some(s.clone()),
                }],
            }),
            generation_config: GenerationConfigWire {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl TextGenerator for Gemini {
    fn provider(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let response = self
            .client()?
            .generate_content(&self.model, &self.request(prompt))
            .await?;

        if let Some(reason) = response.block_reason() {
            return Err(AiError::Api {
                status: 400,
                body: format!("prompt blocked: {reason}"),
            });
        }

        response.text().ok_or(AiError::EmptyResponse("gemini"))
    }
}
