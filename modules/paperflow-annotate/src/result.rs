use paperflow_common::Identified;
use serde::{Deserialize, Serialize};

/// Exactly one of a typed payload or an error marker.
///
/// Serialized flat: a success is the payload's own fields, an error is
/// `{"error": "..."}`. `Error` is listed first so an untagged read never
/// mistakes a marker for a payload with defaulted fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Annotation<T> {
    Error { error: String },
    Success(T),
}

/// One model call's outcome, keyed by the item it was made for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationResult<T> {
    pub paper_id: String,
    #[serde(flatten)]
    pub outcome: Annotation<T>,
}

impl<T> AnnotationResult<T> {
    pub fn success(paper_id: impl Into<String>, payload: T) -> Self {
        Self {
            paper_id: paper_id.into(),
            outcome: Annotation::Success(payload),
        }
    }

    pub fn error(paper_id: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            paper_id: paper_id.into(),
            outcome: Annotation::Error {
                error: diagnostic.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Annotation::Success(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match &self.outcome {
            Annotation::Success(p) => Some(p),
            Annotation::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            Annotation::Error { error } => Some(error),
            Annotation::Success(_) => None,
        }
    }
}

impl<T> Identified for AnnotationResult<T> {
    fn id(&self) -> &str {
        &self.paper_id
    }
}
