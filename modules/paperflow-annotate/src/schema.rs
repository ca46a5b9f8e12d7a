use std::collections::HashMap;

use paperflow_common::Identified;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// One kind of structured annotation: what goes into the prompt and what
/// typed payload comes back.
///
/// The annotator and pipeline are generic over this trait, so screening,
/// translation and the shorts stages share one call path.
pub trait AnnotationSchema: Send + Sync {
    type Input: Identified + Send + Sync;
    type Output: Serialize + DeserializeOwned + Send + Sync;

    /// Used in logs and output file names.
    const NAME: &'static str;

    /// Placeholder names a template for this schema may use.
    const VARIABLES: &'static [&'static str];

    fn default_template(&self) -> &'static str;

    fn variables(&self, input: &Self::Input) -> HashMap<&'static str, String>;

    /// Post-process a parsed payload: strip line breaks from single-line
    /// fields, recompute derived values, attach input-side fields.
    fn finalize(&self, input: &Self::Input, payload: Self::Output) -> Self::Output;
}

/// Payloads carrying a rankable numeric score.
pub trait Scored {
    fn score(&self) -> f64;
}

/// Remove literal line breaks.
pub fn single_line(s: &str) -> String {
    s.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

pub(crate) fn sanitize(field: &mut String) {
    if field.contains(['\r', '\n']) {
        *field = single_line(field);
    }
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Models sometimes answer `[95, "10x"]` where strings were asked for.
pub(crate) fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect())
}
