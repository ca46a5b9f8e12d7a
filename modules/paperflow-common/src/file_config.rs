use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// TOML-backed configuration loaded from disk.
/// Secrets (API keys) stay as env vars. Every section has defaults, so a
/// partial file only needs to name what it overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub provider: ProviderConfig,
    pub arxiv: ArxivConfig,
    pub download: DownloadConfig,
    pub annotation: AnnotationConfig,
    pub screening: ScreeningConfig,
    pub shorts: ShortsConfig,
    pub prompts: PromptsConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Claude,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: u32,
    /// Per-call limit for one model request.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Gemini,
            model: "gemini-2.5-flash".to_string(),
            temperature: None,
            max_output_tokens: 4096,
            timeout_secs: 120,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArxivConfig {
    pub categories: Vec<String>,
    pub max_results_per_query: u32,
    /// Pause between category queries, per arXiv API etiquette.
    pub request_interval_secs: f64,
    pub base_url: String,
    /// Keep only papers published or updated on the run date.
    pub only_target_date: bool,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                "cs.AI".to_string(),
                "cs.LG".to_string(),
                "cs.CL".to_string(),
                "cs.CV".to_string(),
            ],
            max_results_per_query: 100,
            request_interval_secs: 3.0,
            base_url: "https://export.arxiv.org/api/query".to_string(),
            only_target_date: false,
        }
    }
}

impl ArxivConfig {
    pub fn request_interval(&self) -> Duration {
        Duration::from_secs_f64(self.request_interval_secs.max(0.0))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub concurrency: usize,
    pub max_retries: u32,
    pub backoff_factor: f64,
    /// Per-attempt limit.
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            max_retries: 3,
            backoff_factor: 2.0,
            timeout_secs: 60,
        }
    }
}

impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Fixed pause between model calls.
    pub delay_ms: u64,
    /// When set, pacing uses a rate limiter instead of the fixed pause.
    pub requests_per_minute: Option<u32>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            requests_per_minute: None,
        }
    }
}

impl AnnotationConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    pub top_n: usize,
    pub min_score: f64,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            top_n: 100,
            min_score: 5.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShortsConfig {
    pub include_mid: bool,
    pub high_threshold: f64,
    pub mid_threshold: f64,
    /// Pause between copy-generation calls; copy prompts are short.
    pub copy_delay_ms: u64,
}

impl Default for ShortsConfig {
    fn default() -> Self {
        Self {
            include_mid: true,
            high_threshold: 80.0,
            mid_threshold: 65.0,
            copy_delay_ms: 500,
        }
    }
}

/// Optional prompt template overrides, relative to the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub screening: Option<PathBuf>,
    pub shorts_score: Option<PathBuf>,
    pub translation: Option<PathBuf>,
    pub shorts_copy: Option<PathBuf>,
    pub shorts_script: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Usually a cloud-synced folder; files written here sync on their own.
    pub base_dir: PathBuf,
    pub subfolders: SubfolderConfig,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("./output"),
            subfolders: SubfolderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubfolderConfig {
    pub metadata: String,
    pub papers: String,
    pub screening: String,
    pub translated: String,
    pub shorts: String,
}

impl Default for SubfolderConfig {
    fn default() -> Self {
        Self {
            metadata: "metadata".to_string(),
            papers: "papers".to_string(),
            screening: "screening".to_string(),
            translated: "translated".to_string(),
            shorts: "shorts".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl FileConfig {
    /// Reject settings that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.download.concurrency == 0 {
            bail!("download.concurrency must be at least 1");
        }
        if self.download.max_retries == 0 {
            bail!("download.max_retries must be at least 1");
        }
        if self.download.backoff_factor < 1.0 {
            bail!(
                "download.backoff_factor must be >= 1.0, got {}",
                self.download.backoff_factor
            );
        }
        if self.shorts.mid_threshold > self.shorts.high_threshold {
            bail!(
                "shorts.mid_threshold ({}) must not exceed shorts.high_threshold ({})",
                self.shorts.mid_threshold,
                self.shorts.high_threshold
            );
        }
        if self.arxiv.categories.is_empty() {
            bail!("arxiv.categories must name at least one category");
        }
        Ok(())
    }
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Gemini);
        assert_eq!(config.download.concurrency, 5);
        assert_eq!(config.download.max_retries, 3);
        assert_eq!(config.download.backoff_factor, 2.0);
        assert_eq!(config.screening.top_n, 100);
        assert_eq!(config.shorts.high_threshold, 80.0);
        assert_eq!(config.shorts.mid_threshold, 65.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [provider]
            kind = "claude"
            model = "claude-haiku-4-5-20251001"

            [download]
            concurrency = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Claude);
        assert_eq!(config.provider.timeout_secs, 120);
        assert_eq!(config.download.concurrency, 8);
        assert_eq!(config.download.max_retries, 3);
    }

    #[test]
    fn unknown_top_level_section_is_rejected() {
        let result: std::result::Result<FileConfig, _> = toml::from_str("[gemini]\nmodel = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_inverted_tiers() {
        let mut config = FileConfig::default();
        config.shorts.mid_threshold = 90.0;
        assert!(config.validate().is_err());

        let mut config = FileConfig::default();
        config.download.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[screening]\ntop_n = 20\nmin_score = 6.5").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.screening.top_n, 20);
        assert_eq!(config.screening.min_score, 6.5);
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = load_config(Path::new("/nonexistent/paperflow.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
