use std::collections::HashMap;

use ai_client::truncate_chars;
use serde::{Deserialize, Serialize};

use super::shorts_score::ShortsCandidate;
use crate::schema::{lenient_strings, sanitize, AnnotationSchema};
use crate::tier::Verdict;

const PROMPT: &str = r##"You are a popular YouTube Shorts creator in Japan.
Turn the paper below into a 30 second Short script in Japanese.

Structure: six blocks of five seconds each.
1. hook (0-5s): a line that makes viewers stop.
2. problem (5-10s): the status quo or the usual assumption.
3. solution (10-15s): what this AI or technique does.
4. evidence (15-20s): numbers or data that back it up.
5. impact (20-25s): what happens if this spreads.
6. afterglow (25-30s): an assertion or a lingering unease. Do not ask viewers to follow.

Paper
Title: {{title}}
Abstract: {{abstract}}
Shorts score: {{shorts_score}}
Clickbait title: {{best_title}}

Reply with JSON only:
{
  "video_title": "<video title, at most 40 characters>",
  "thumbnail_text": "<thumbnail text, at most 10 characters>",
  "blocks": [
    {"block": 1, "type": "hook", "script": "<script>", "visual_note": "<visual note>"},
    {"block": 2, "type": "problem", "script": "<script>", "visual_note": "<visual note>"},
    {"block": 3, "type": "solution", "script": "<script>", "visual_note": "<visual note>"},
    {"block": 4, "type": "evidence", "script": "<script>", "visual_note": "<visual note>"},
    {"block": 5, "type": "impact", "script": "<script>", "visual_note": "<visual note>"},
    {"block": 6, "type": "afterglow", "script": "<script>", "visual_note": "<visual note>"}
  ],
  "full_script": "<the whole narration>",
  "hashtags": ["#AI", "#論文解説", "#テック"]
}
"##;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptBlock {
    pub block: u32,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub visual_note: String,
}

/// A six-block 30 second script. Score fields are attached from the
/// candidate after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortsScript {
    pub video_title: String,
    #[serde(default)]
    pub thumbnail_text: String,
    #[serde(default)]
    pub blocks: Vec<ScriptBlock>,
    #[serde(default)]
    pub full_script: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub shorts_score: f64,
    #[serde(default)]
    pub verdict: Option<Verdict>,
    #[serde(default)]
    pub best_title: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShortsScriptSchema;

impl AnnotationSchema for ShortsScriptSchema {
    type Input = ShortsCandidate;
    type Output = ShortsScript;

    const NAME: &'static str = "shorts_script";
    const VARIABLES: &'static [&'static str] = &["title", "abstract", "best_title", "shorts_score"];

    fn default_template(&self) -> &'static str {
        PROMPT
    }

    fn variables(&self, c: &ShortsCandidate) -> HashMap<&'static str, String> {
        HashMap::from([
            ("title", c.paper.title.clone()),
            (
                "abstract",
                truncate_chars(&c.paper.abstract_text, 2000).to_string(),
            ),
            ("best_title", c.best_title().to_string()),
            ("shorts_score", c.score.total_score.to_string()),
        ])
    }

    fn finalize(&self, c: &ShortsCandidate, mut s: ShortsScript) -> ShortsScript {
        sanitize(&mut s.video_title);
        sanitize(&mut s.thumbnail_text);
        s.blocks.sort_by_key(|b| b.block);
        s.shorts_score = c.score.total_score;
        s.verdict = Some(c.score.verdict);
        s.best_title = c.best_title().to_string();
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::validate_template;

    #[test]
    fn builtin_prompt_is_valid() {
        validate_template(PROMPT, ShortsScriptSchema::VARIABLES).unwrap();
    }

    #[test]
    fn builtin_prompt_ends_with_the_hashtag_example() {
        assert!(PROMPT.contains(r##""hashtags": ["#AI", "#論文解説", "#テック"]"##));
        assert!(PROMPT.trim_end().ends_with('}'));
    }

    #[test]
    fn attaches_score_fields() {
        let raw: ShortsScript = serde_json::from_str(
            r##"{"video_title": "医者\n終了", "thumbnail_text": "終了",
                "blocks": [{"block": 2, "type": "problem", "script": "b"},
                           {"block": 1, "type": "hook", "script": "a", "visual_note": "v"}],
                "full_script": "ab", "hashtags": ["#AI"], "shorts_score": 1}"##,
        )
        .unwrap();

        let c = crate::testing::candidate("p1", 85.0);
        let s = ShortsScriptSchema.finalize(&c, raw);
        assert_eq!(s.video_title, "医者終了");
        assert_eq!(s.blocks[0].kind, "hook");
        assert_eq!(s.shorts_score, 85.0);
        assert_eq!(s.verdict, Some(Verdict::AdoptHigh));
        assert_eq!(s.best_title, "医者が不要に");
    }
}
