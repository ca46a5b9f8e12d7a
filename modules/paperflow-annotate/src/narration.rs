use serde::{Deserialize, Serialize};

use crate::result::AnnotationResult;
use crate::schemas::ShortsCopy;

const TRAILING_PUNCTUATION: &[char] = &['。', '、', '.', '!', '?', '！', '？'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationScript {
    pub paper_id: String,
    pub audio_script: String,
}

impl NarrationScript {
    /// One script per successful copy result, in order. Error markers are skipped.
    pub fn from_copies(copies: &[AnnotationResult<ShortsCopy>]) -> Vec<Self> {
        copies
            .iter()
            .filter_map(|r| {
                r.payload().map(|copy| NarrationScript {
                    paper_id: r.paper_id.clone(),
                    audio_script: narration_script(copy),
                })
            })
            .collect()
    }
}

/// Read-aloud text: each non-empty line ends in exactly one `。`, joined
/// without breaks.
pub fn narration_script(copy: &ShortsCopy) -> String {
    copy.lines()
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| format!("{}。", line.trim_end_matches(TRAILING_PUNCTUATION)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copy(hook: &str, line1: &str, line2: &str, ending: &str) -> ShortsCopy {
        ShortsCopy {
            hook: hook.into(),
            line1: line1.into(),
            line2: line2.into(),
            ending: ending.into(),
        }
    }

    #[test]
    fn joins_lines_with_single_full_stops() {
        let c = copy("医者が不要になる", "専門医を超えた！", " 99%を記録。 ", "もう戻れない…?");
        assert_eq!(
            narration_script(&c),
            "医者が不要になる。専門医を超えた。99%を記録。もう戻れない…。"
        );
    }

    #[test]
    fn empty_lines_are_skipped() {
        assert_eq!(narration_script(&copy("", "A", "  ", "B、")), "A。B。");
        assert_eq!(narration_script(&copy("", "", "", "")), "");
    }

    #[test]
    fn error_markers_are_skipped() {
        let copies = vec![
            AnnotationResult::success("p1", copy("a", "b", "c", "d")),
            AnnotationResult::error("p2", "invalid format"),
        ];
        let scripts = NarrationScript::from_copies(&copies);
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].paper_id, "p1");
        assert_eq!(scripts[0].audio_script, "a。b。c。d。");
    }
}
