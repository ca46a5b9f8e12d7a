use async_trait::async_trait;
use std::time::Duration;

use crate::error::AiError;

// =============================================================================
// Generation settings
// =============================================================================

/// Per-call settings shared by every provider.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: u32,
    /// Wall-clock limit for one call, including reading the body.
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: None,
            max_output_tokens: 4096,
            timeout: Duration::from_secs(120),
        }
    }
}

// =============================================================================
// TextGenerator Trait
// =============================================================================

/// A generative model reachable with a single text prompt.
///
/// No schema is enforced on the wire: the reply is free text and callers are
/// responsible for locating and validating any structured payload in it.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short provider name used in logs ("gemini", "claude").
    fn provider(&self) -> &'static str;

    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}
