use std::sync::Arc;

use ai_client::TextGenerator;
use paperflow_common::Identified;
use tracing::{debug, warn};

use crate::payload::{BraceSpanExtractor, PayloadExtractor};
use crate::result::AnnotationResult;
use crate::schema::AnnotationSchema;
use crate::template::PromptTemplate;

/// Diagnostic for a reply with no parseable payload.
pub const INVALID_FORMAT: &str = "invalid format";

/// One model call per item, turned into a typed result or an error marker.
///
/// Never fails: transport errors and unparseable replies become
/// `AnnotationResult::error` so a batch keeps going.
pub struct StructuredAnnotator<S: AnnotationSchema> {
    generator: Arc<dyn TextGenerator>,
    schema: S,
    template: PromptTemplate,
    extractor: Arc<dyn PayloadExtractor>,
}

impl<S: AnnotationSchema> StructuredAnnotator<S> {
    pub fn new(generator: Arc<dyn TextGenerator>, schema: S) -> Self {
        let template = PromptTemplate::builtin(schema.default_template());
        Self {
            generator,
            schema,
            template,
            extractor: Arc::new(BraceSpanExtractor),
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn PayloadExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn build_prompt(&self, input: &S::Input) -> String {
        self.template.render(&self.schema.variables(input))
    }

    pub async fn annotate(&self, input: &S::Input) -> AnnotationResult<S::Output> {
        let paper_id = input.id();
        let prompt = self.build_prompt(input);

        let reply = match self.generator.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    schema = S::NAME,
                    paper_id,
                    provider = self.generator.provider(),
                    error = %e,
                    "Model call failed"
                );
                return AnnotationResult::error(paper_id, e.to_string());
            }
        };

        match self.parse(paper_id, &reply) {
            Some(payload) => {
                AnnotationResult::success(paper_id, self.schema.finalize(input, payload))
            }
            None => {
                warn!(schema = S::NAME, paper_id, "Invalid response format");
                AnnotationResult::error(paper_id, INVALID_FORMAT)
            }
        }
    }

    fn parse(&self, paper_id: &str, reply: &str) -> Option<S::Output> {
        let span = self.extractor.extract(reply)?;
        match serde_json::from_str(span) {
            Ok(payload) => Some(payload),
            Err(e) => {
                debug!(schema = S::NAME, paper_id, error = %e, "Payload did not match schema");
                None
            }
        }
    }
}
