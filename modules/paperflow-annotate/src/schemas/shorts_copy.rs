use std::collections::HashMap;

use ai_client::truncate_chars;
use serde::{Deserialize, Serialize};

use super::shorts_score::ShortsCandidate;
use crate::schema::{sanitize, AnnotationSchema};

const PROMPT: &str = r#"You write on-screen copy for 20 second YouTube Shorts in Japanese.
Write four lines of text for the paper below.

Rules:
- Japanese only. No questions. No emoji.
- No line breaks: every field is a single line.
- Do not exaggerate beyond what the paper supports.

hook (12-14 characters): an ending declaration, a surpassing statement or an assertion.
line1 (18-22 characters): a comparison with humans, jobs or experts.
line2 (25-30 characters): the capability or result, with a number.
ending (8-10 characters): unease, an afterglow or an assertion. No call to action.

Paper
Title: {{title}}
Abstract: {{abstract}}
Clickbait title idea: {{best_title}}
Shorts score: {{shorts_score}}

Reply with JSON only:
{
  "hook": "<12-14 characters>",
  "line1": "<18-22 characters>",
  "line2": "<25-30 characters>",
  "ending": "<8-10 characters>"
}
"#;

/// Four single-line captions for a short video template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortsCopy {
    pub hook: String,
    pub line1: String,
    pub line2: String,
    pub ending: String,
}

impl ShortsCopy {
    pub fn lines(&self) -> [&str; 4] {
        [&self.hook, &self.line1, &self.line2, &self.ending]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShortsCopySchema;

impl AnnotationSchema for ShortsCopySchema {
    type Input = ShortsCandidate;
    type Output = ShortsCopy;

    const NAME: &'static str = "shorts_copy";
    const VARIABLES: &'static [&'static str] = &["title", "abstract", "best_title", "shorts_score"];

    fn default_template(&self) -> &'static str {
        PROMPT
    }

    fn variables(&self, c: &ShortsCandidate) -> HashMap<&'static str, String> {
        HashMap::from([
            ("title", c.paper.title.clone()),
            (
                "abstract",
                truncate_chars(&c.paper.abstract_text, 1500).to_string(),
            ),
            ("best_title", c.best_title().to_string()),
            ("shorts_score", c.score.total_score.to_string()),
        ])
    }

    fn finalize(&self, _: &ShortsCandidate, mut copy: ShortsCopy) -> ShortsCopy {
        for field in [
            &mut copy.hook,
            &mut copy.line1,
            &mut copy.line2,
            &mut copy.ending,
        ] {
            sanitize(field);
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::validate_template;

    #[test]
    fn builtin_prompt_is_valid() {
        validate_template(PROMPT, ShortsCopySchema::VARIABLES).unwrap();
    }

    #[test]
    fn every_field_is_single_line() {
        let copy = ShortsCopy {
            hook: "医者が\n不要になる".into(),
            line1: "AIが\r\n専門医を超えた".into(),
            line2: "99%".into(),
            ending: "もう戻れない\n".into(),
        };
        let c = crate::testing::candidate("p1", 85.0);
        let copy = ShortsCopySchema.finalize(&c, copy);
        assert_eq!(copy.lines(), ["医者が不要になる", "AIが専門医を超えた", "99%", "もう戻れない"]);
    }

    #[test]
    fn prompt_vars_carry_the_score() {
        let c = crate::testing::candidate("p1", 85.0);
        let vars = ShortsCopySchema.variables(&c);
        assert_eq!(vars["shorts_score"], "85");
        assert_eq!(vars["best_title"], "医者が不要に");
    }
}
