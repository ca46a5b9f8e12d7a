use std::num::NonZeroU32;
use std::path::Path;
use std::sync::Arc;

use ai_client::{Claude, Gemini, GenerationConfig, TextGenerator};
use anyhow::Result;
use paperflow_annotate::{
    AnnotationSchema, FixedDelay, Pacer, PromptTemplate, RateLimitedPacer, StructuredAnnotator,
};
use paperflow_common::file_config::{AnnotationConfig, ProviderConfig};
use paperflow_common::{AppConfig, ProviderKind};
use tracing::info;

/// The configured model client, or `None` when its API key is missing.
pub fn build_generator(
    provider: &ProviderConfig,
    secrets: &AppConfig,
) -> Option<Arc<dyn TextGenerator>> {
    let api_key = secrets.api_key_for(provider.kind)?;
    let config = GenerationConfig {
        temperature: provider.temperature,
        max_output_tokens: provider.max_output_tokens,
        timeout: provider.timeout(),
    };

    let generator: Arc<dyn TextGenerator> = match provider.kind {
        ProviderKind::Gemini => Arc::new(Gemini::new(api_key, &provider.model).with_config(config)),
        ProviderKind::Claude => Arc::new(Claude::new(api_key, &provider.model).with_config(config)),
    };
    info!(
        provider = generator.provider(),
        model = generator.model(),
        "Model client ready"
    );
    Some(generator)
}

pub fn build_pacer(annotation: &AnnotationConfig) -> Arc<dyn Pacer> {
    match annotation.requests_per_minute.and_then(NonZeroU32::new) {
        Some(rpm) => {
            info!(requests_per_minute = rpm.get(), "Rate-limited pacing");
            Arc::new(RateLimitedPacer::per_minute(rpm))
        }
        None => Arc::new(FixedDelay(annotation.delay())),
    }
}

/// An annotator with its prompt override applied, if one is configured.
/// Relative override paths resolve against `config_dir`.
pub fn build_annotator<S: AnnotationSchema>(
    generator: Arc<dyn TextGenerator>,
    schema: S,
    template_override: Option<&Path>,
    config_dir: &Path,
) -> Result<StructuredAnnotator<S>> {
    let annotator = StructuredAnnotator::new(generator, schema);
    match template_override {
        Some(path) => {
            let path = config_dir.join(path);
            let template = PromptTemplate::from_file(&path, S::VARIABLES)?;
            info!(schema = S::NAME, path = %path.display(), "Using prompt override");
            Ok(annotator.with_template(template))
        }
        None => Ok(annotator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperflow_annotate::schemas::TranslationSchema;
    use paperflow_annotate::testing::{paper, MockGenerator};

    #[test]
    fn missing_key_means_no_generator() {
        let provider = ProviderConfig::default();
        assert!(build_generator(&provider, &AppConfig::default()).is_none());

        let secrets = AppConfig {
            gemini_api_key: Some("AIza-test".into()),
            anthropic_api_key: None,
        };
        let generator = build_generator(&provider, &secrets).unwrap();
        assert_eq!(generator.provider(), "gemini");
        assert_eq!(generator.model(), "gemini-2.5-flash");
    }

    #[test]
    fn override_resolves_relative_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("t.txt"), "custom {{title}}").unwrap();

        let annotator = build_annotator(
            Arc::new(MockGenerator::new()),
            TranslationSchema,
            Some(Path::new("t.txt")),
            dir.path(),
        )
        .unwrap();
        assert_eq!(annotator.build_prompt(&paper("p", "X")), "custom X");
    }

    #[test]
    fn override_with_unknown_variable_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("t.txt"), "{{best_title}}").unwrap();

        let result = build_annotator(
            Arc::new(MockGenerator::new()),
            TranslationSchema,
            Some(Path::new("t.txt")),
            dir.path(),
        );
        assert!(result.is_err());
    }
}
