//! The five annotation schemas of the daily run.

pub mod screening;
pub mod shorts_copy;
pub mod shorts_score;
pub mod shorts_script;
pub mod translation;

use std::collections::HashMap;

use ai_client::truncate_chars;
use paperflow_common::Paper;

pub use screening::{Screening, ScreeningSchema};
pub use shorts_copy::{ShortsCopy, ShortsCopySchema};
pub use shorts_score::{ShortsCandidate, ShortsScore, ShortsScoreRecord, ShortsScoreSchema};
pub use shorts_script::{ScriptBlock, ShortsScript, ShortsScriptSchema};
pub use translation::{Translation, TranslationSchema};

/// `title`, `categories` and an `abstract` cut to `abstract_chars`.
fn paper_vars(paper: &Paper, abstract_chars: usize) -> HashMap<&'static str, String> {
    HashMap::from([
        ("title", paper.title.clone()),
        ("categories", paper.categories_joined()),
        (
            "abstract",
            truncate_chars(&paper.abstract_text, abstract_chars).to_string(),
        ),
    ])
}
