use std::sync::Arc;

use paperflow_common::Identified;
use tracing::info;

use crate::annotator::StructuredAnnotator;
use crate::pacing::Pacer;
use crate::result::AnnotationResult;
use crate::schema::AnnotationSchema;

/// Sequential annotation of a batch, each call gated by a [`Pacer`].
///
/// Output has the input's length and order; failed items stay in place as
/// error markers. Calls are never concurrent: the model quota is per account.
pub struct AnnotationPipeline<S: AnnotationSchema> {
    annotator: StructuredAnnotator<S>,
    pacer: Arc<dyn Pacer>,
}

impl<S: AnnotationSchema> AnnotationPipeline<S> {
    pub fn new(annotator: StructuredAnnotator<S>, pacer: Arc<dyn Pacer>) -> Self {
        Self { annotator, pacer }
    }

    pub fn annotator(&self) -> &StructuredAnnotator<S> {
        &self.annotator
    }

    pub async fn run(&self, inputs: &[S::Input]) -> Vec<AnnotationResult<S::Output>> {
        let total = inputs.len();
        let mut results = Vec::with_capacity(total);

        for (i, input) in inputs.iter().enumerate() {
            self.pacer.before_call(i).await;
            info!(
                schema = S::NAME,
                paper_id = input.id(),
                "Annotating {}/{}",
                i + 1,
                total
            );
            results.push(self.annotator.annotate(input).await);
        }

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        info!(
            schema = S::NAME,
            attempted = total,
            succeeded,
            failed = total - succeeded,
            "Annotation complete"
        );
        results
    }
}
