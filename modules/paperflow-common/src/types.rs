use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Identified
// =============================================================================

/// Anything keyed by a stable, batch-unique identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

impl<T: Identified + ?Sized> Identified for &T {
    fn id(&self) -> &str {
        (**self).id()
    }
}

// =============================================================================
// Paper
// =============================================================================

/// One arXiv paper as returned by the search API.
///
/// Produced once per run by the metadata client and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// arXiv identifier including version, e.g. `2401.00001v1`.
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub primary_category: Option<String>,
    pub published: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub entry_id: String,
}

impl Paper {
    /// File stem for artifacts derived from this paper. Old-style ids
    /// (`hep-th/9901001`) contain a slash.
    pub fn file_stem(&self) -> String {
        self.id.replace('/', "_")
    }

    pub fn categories_joined(&self) -> String {
        self.categories.join(", ")
    }

    /// True when the paper was published or updated on `date` (UTC).
    pub fn touched_on(&self, date: NaiveDate) -> bool {
        self.published.date_naive() == date || self.updated.date_naive() == date
    }
}

impl Identified for Paper {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Drop later items whose identifier was already seen; order is preserved.
pub fn dedup_by_id<T: Identified>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id().to_string()))
        .collect()
}
