pub mod annotator;
pub mod narration;
pub mod pacing;
pub mod payload;
pub mod pipeline;
pub mod ranker;
pub mod result;
pub mod schema;
pub mod schemas;
pub mod template;
pub mod tier;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use annotator::{StructuredAnnotator, INVALID_FORMAT};
pub use narration::{narration_script, NarrationScript};
pub use pacing::{FixedDelay, Pacer, RateLimitedPacer};
pub use payload::{BraceSpanExtractor, PayloadExtractor};
pub use pipeline::AnnotationPipeline;
pub use ranker::{filter_by_verdict, SelectionRanker};
pub use result::{Annotation, AnnotationResult};
pub use schema::{AnnotationSchema, Scored};
pub use template::PromptTemplate;
pub use tier::{TierThresholds, Verdict};
