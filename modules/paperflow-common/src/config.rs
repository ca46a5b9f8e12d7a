use crate::file_config::ProviderKind;

/// Secrets loaded from the environment (and `.env`, when present).
/// Everything non-secret lives in the TOML `FileConfig`.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let config = Self {
            gemini_api_key: non_empty_env("GEMINI_API_KEY"),
            anthropic_api_key: non_empty_env("ANTHROPIC_API_KEY"),
        };

        config.log_keys();
        config
    }

    /// The key for the configured provider, if one was supplied.
    pub fn api_key_for(&self, kind: ProviderKind) -> Option<&str> {
        match kind {
            ProviderKind::Gemini => self.gemini_api_key.as_deref(),
            ProviderKind::Claude => self.anthropic_api_key.as_deref(),
        }
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  GEMINI_API_KEY: {}", preview_opt(&self.gemini_api_key));
        tracing::info!("  ANTHROPIC_API_KEY: {}", preview_opt(&self.anthropic_api_key));
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn preview(val: &str) -> String {
    let head: String = val.chars().take(5).collect();
    format!("{}...({} chars)", head, val.chars().count())
}

fn preview_opt(val: &Option<String>) -> String {
    match val {
        Some(v) if !v.is_empty() => preview(v),
        _ => "<not set>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_redacts_all_but_prefix() {
        assert_eq!(preview("AIzaSyExampleKey"), "AIzaS...(16 chars)");
        assert_eq!(preview("abc"), "abc...(3 chars)");
        assert_eq!(preview_opt(&None), "<not set>");
    }

    #[test]
    fn api_key_follows_provider() {
        let config = AppConfig {
            gemini_api_key: Some("gm".into()),
            anthropic_api_key: None,
        };
        assert_eq!(config.api_key_for(ProviderKind::Gemini), Some("gm"));
        assert_eq!(config.api_key_for(ProviderKind::Claude), None);
    }
}
