use std::collections::HashMap;

use paperflow_common::Paper;
use serde::{Deserialize, Serialize};

use super::paper_vars;
use crate::schema::{lenient_strings, sanitize, AnnotationSchema};

const PROMPT: &str = r#"You translate and summarise academic papers for Japanese readers.
Translate the title and abstract below into natural Japanese and summarise them.

Paper
Title: {{title}}
Categories: {{categories}}
Abstract: {{abstract}}

Reply with JSON only:
{
  "title_ja": "<Japanese title>",
  "abstract_ja": "<Japanese abstract, condensed to about 200 characters>",
  "summary_3lines": [
    "<line 1: what this research is>",
    "<line 2: what is new>",
    "<line 3: what it is useful for>"
  ],
  "keywords": ["<keyword 1>", "<keyword 2>", "<keyword 3>"],
  "youtube_hook": "<catchy Japanese line for a short video, at most 20 characters>"
}
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub title_ja: String,
    #[serde(default)]
    pub abstract_ja: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub summary_3lines: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub youtube_hook: String,
    /// Copied from the paper, never from the model.
    #[serde(default)]
    pub original_title: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TranslationSchema;

impl AnnotationSchema for TranslationSchema {
    type Input = Paper;
    type Output = Translation;

    const NAME: &'static str = "translation";
    const VARIABLES: &'static [&'static str] = &["title", "categories", "abstract"];

    fn default_template(&self) -> &'static str {
        PROMPT
    }

    fn variables(&self, paper: &Paper) -> HashMap<&'static str, String> {
        paper_vars(paper, 3000)
    }

    fn finalize(&self, paper: &Paper, mut t: Translation) -> Translation {
        sanitize(&mut t.title_ja);
        sanitize(&mut t.youtube_hook);
        t.summary_3lines.iter_mut().for_each(sanitize);
        t.original_title = paper.title.clone();
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::paper;
    use crate::template::validate_template;

    #[test]
    fn builtin_prompt_is_valid() {
        validate_template(PROMPT, TranslationSchema::VARIABLES).unwrap();
    }

    #[test]
    fn attaches_original_title_and_sanitizes() {
        let raw: Translation = serde_json::from_str(
            r#"{"title_ja": "論文\nタイトル", "summary_3lines": ["一\n行目", "二行目"],
                "youtube_hook": "見て\r\n", "original_title": "spoofed"}"#,
        )
        .unwrap();

        let t = TranslationSchema.finalize(&paper("p1", "Real Title"), raw);
        assert_eq!(t.title_ja, "論文タイトル");
        assert_eq!(t.summary_3lines, vec!["一行目", "二行目"]);
        assert_eq!(t.youtube_hook, "見て");
        assert_eq!(t.original_title, "Real Title");
        assert!(t.keywords.is_empty());
    }
}
