use std::collections::HashMap;

use paperflow_common::Paper;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::paper_vars;
use crate::schema::{round2, sanitize, AnnotationSchema, Scored};

const PROMPT: &str = r#"You are an expert reviewer of academic papers.
Rate the paper below for a general audience channel that explains new research in Japanese.

Score each criterion from 1 to 10:
1. usefulness: can it be applied in real products or daily life?
2. novelty: does it add something new compared to prior work?
3. impact: could it move its field noticeably?
4. explainability: can it be explained to a non-expert in a 30 second short video?

Paper
Title: {{title}}
Categories: {{categories}}
Abstract: {{abstract}}

Reply with JSON only:
{
  "usefulness": <1-10>,
  "novelty": <1-10>,
  "impact": <1-10>,
  "explainability": <1-10>,
  "total_score": <average of the four>,
  "one_line_summary": "<one line summary in Japanese>",
  "reason": "<one or two sentences in Japanese explaining the scores>"
}
"#;

/// Usefulness screening on a 1-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screening {
    pub usefulness: f64,
    pub novelty: f64,
    pub impact: f64,
    pub explainability: f64,
    /// Mean of the four criteria, recomputed locally.
    #[serde(default)]
    pub total_score: f64,
    #[serde(default)]
    pub one_line_summary: String,
    #[serde(default)]
    pub reason: String,
}

impl Screening {
    pub fn derived_total(&self) -> f64 {
        round2((self.usefulness + self.novelty + self.impact + self.explainability) / 4.0)
    }
}

impl Scored for Screening {
    fn score(&self) -> f64 {
        self.total_score
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScreeningSchema;

impl AnnotationSchema for ScreeningSchema {
    type Input = Paper;
    type Output = Screening;

    const NAME: &'static str = "screening";
    const VARIABLES: &'static [&'static str] = &["title", "categories", "abstract"];

    fn default_template(&self) -> &'static str {
        PROMPT
    }

    fn variables(&self, paper: &Paper) -> HashMap<&'static str, String> {
        paper_vars(paper, 2000)
    }

    fn finalize(&self, paper: &Paper, mut s: Screening) -> Screening {
        let derived = s.derived_total();
        if (derived - s.total_score).abs() > 0.05 {
            debug!(
                paper_id = %paper.id,
                reported = s.total_score,
                derived,
                "Model total disagrees with criteria mean"
            );
        }
        s.total_score = derived;
        sanitize(&mut s.one_line_summary);
        sanitize(&mut s.reason);
        s
    }
}
