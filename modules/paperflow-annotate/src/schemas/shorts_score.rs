use std::collections::HashMap;

use paperflow_common::{Identified, Paper};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::paper_vars;
use crate::result::AnnotationResult;
use crate::schema::{lenient_strings, round2, sanitize, AnnotationSchema, Scored};
use crate::tier::{TierThresholds, Verdict};

const PROMPT: &str = r#"You are an editor of YouTube Shorts for a Japanese audience.
Judge whether the paper below would perform well as a 30 second Short. Score out of 100.

1. clickbait_potential (max 25, most important)
   First write three Japanese title ideas: one "X is over" style, one "humans no longer needed" style, one other high impact style.
   25: a strong title is possible without lying. 15: needs some exaggeration. 5: weak if honest. 0: impossible.
2. life_impact (max 20): would ordinary jobs, decisions or lives change if this spreads?
   20: jobs disappear or change a lot. 12: daily life affected. 5: experts only. 0: none.
3. human_comparison (max 20): is there a comparison with humans, experts, doctors or professionals?
   20: beats humans. 12: compared. 5: mentioned only. 0: none.
4. strong_numbers (max 15): accuracy above 90%, 10x faster, half the cost and similar.
   15: shocking numbers. 8: good numbers. 0: ordinary or none.
5. use_case (max 10): a concrete field such as medicine, law, education or programming.
   10: close to daily life. 5: specialist field. 0: abstract.
6. implementation (max 10): 10: usable today. 5: near future. 0: research stage.

Paper
Title: {{title}}
Abstract: {{abstract}}

Reply with JSON only:
{
  "clickbait_potential": {
    "score": <0-25>,
    "generated_titles": ["<idea 1>", "<idea 2>", "<idea 3>"],
    "best_title": "<the most usable idea>",
    "is_honest": true
  },
  "life_impact": {"score": <0-20>, "affected_jobs": ["<job>"], "reason": "<reason>"},
  "human_comparison": {"score": <0-20>, "found_keywords": [], "evidence": "<evidence>"},
  "strong_numbers": {"score": <0-15>, "numbers": [], "evidence": "<evidence>"},
  "use_case": {"score": <0-10>, "domains": []},
  "implementation": {"score": <0-10>, "availability": "<status>"},
  "total_score": <sum>,
  "one_line_hook": "<opening line of the Short in Japanese, at most 15 characters>"
}
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickbaitPotential {
    pub score: f64,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub generated_titles: Vec<String>,
    #[serde(default)]
    pub best_title: String,
    #[serde(default)]
    pub is_honest: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeImpact {
    pub score: f64,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub affected_jobs: Vec<String>,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanComparison {
    pub score: f64,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub found_keywords: Vec<String>,
    #[serde(default)]
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrongNumbers {
    pub score: f64,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub numbers: Vec<String>,
    #[serde(default)]
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseCase {
    pub score: f64,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Implementation {
    pub score: f64,
    #[serde(default)]
    pub availability: String,
}

/// Six-axis suitability for a short video, 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortsScore {
    pub clickbait_potential: ClickbaitPotential,
    pub life_impact: LifeImpact,
    pub human_comparison: HumanComparison,
    pub strong_numbers: StrongNumbers,
    pub use_case: UseCase,
    pub implementation: Implementation,
    /// Sum of the clamped axis scores, recomputed locally.
    #[serde(default)]
    pub total_score: f64,
    #[serde(default)]
    pub one_line_hook: String,
    /// Derived from `total_score`; whatever the model says is ignored.
    #[serde(default = "skip")]
    pub verdict: Verdict,
}

fn skip() -> Verdict {
    Verdict::Skip
}

impl ShortsScore {
    fn clamp_axes(&mut self) {
        self.clickbait_potential.score = self.clickbait_potential.score.clamp(0.0, 25.0);
        self.life_impact.score = self.life_impact.score.clamp(0.0, 20.0);
        self.human_comparison.score = self.human_comparison.score.clamp(0.0, 20.0);
        self.strong_numbers.score = self.strong_numbers.score.clamp(0.0, 15.0);
        self.use_case.score = self.use_case.score.clamp(0.0, 10.0);
        self.implementation.score = self.implementation.score.clamp(0.0, 10.0);
    }

    pub fn axis_sum(&self) -> f64 {
        round2(
            self.clickbait_potential.score
                + self.life_impact.score
                + self.human_comparison.score
                + self.strong_numbers.score
                + self.use_case.score
                + self.implementation.score,
        )
    }
}

impl Scored for ShortsScore {
    fn score(&self) -> f64 {
        self.total_score
    }
}

/// A paper that passed shorts scoring, input to the copy and script stages.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortsCandidate {
    pub paper: Paper,
    pub score: ShortsScore,
}

impl ShortsCandidate {
    /// The model's preferred clickbait title, or the paper title.
    pub fn best_title(&self) -> &str {
        let best = self.score.clickbait_potential.best_title.trim();
        if best.is_empty() {
            &self.paper.title
        } else {
            best
        }
    }
}

impl Identified for ShortsCandidate {
    fn id(&self) -> &str {
        &self.paper.id
    }
}

impl AnnotationResult<ShortsScore> {
    /// The scored verdict, or `SKIP` for an error marker.
    pub fn verdict(&self) -> Verdict {
        self.payload().map_or(Verdict::Skip, |s| s.verdict)
    }
}

/// Saved form of a shorts score: error markers also carry `"verdict": "SKIP"`.
#[derive(Debug, Serialize)]
pub struct ShortsScoreRecord<'a> {
    #[serde(flatten)]
    result: &'a AnnotationResult<ShortsScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verdict: Option<Verdict>,
}

impl<'a> ShortsScoreRecord<'a> {
    pub fn from_results(results: &'a [AnnotationResult<ShortsScore>]) -> Vec<Self> {
        results
            .iter()
            .map(|result| Self {
                result,
                verdict: (!result.is_success()).then_some(Verdict::Skip),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShortsScoreSchema {
    pub thresholds: TierThresholds,
}

impl ShortsScoreSchema {
    pub fn new(thresholds: TierThresholds) -> Self {
        Self { thresholds }
    }
}

impl AnnotationSchema for ShortsScoreSchema {
    type Input = Paper;
    type Output = ShortsScore;

    const NAME: &'static str = "shorts_score";
    const VARIABLES: &'static [&'static str] = &["title", "categories", "abstract"];

    fn default_template(&self) -> &'static str {
        PROMPT
    }

    fn variables(&self, paper: &Paper) -> HashMap<&'static str, String> {
        paper_vars(paper, 2500)
    }

    fn finalize(&self, paper: &Paper, mut s: ShortsScore) -> ShortsScore {
        s.clamp_axes();
        let derived = s.axis_sum();
        if (derived - s.total_score).abs() > 0.5 {
            debug!(
                paper_id = %paper.id,
                reported = s.total_score,
                derived,
                "Model total disagrees with axis sum"
            );
        }
        s.total_score = derived;
        s.verdict = self.thresholds.verdict(derived);
        sanitize(&mut s.one_line_hook);
        sanitize(&mut s.clickbait_potential.best_title);
        s
    }
}
