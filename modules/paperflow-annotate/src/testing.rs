// Test doubles for the model boundary.
//
// MockGenerator answers by matching a substring of the prompt (a paper id or
// title works well), records every prompt and when it arrived.

use std::sync::Mutex;

use ai_client::{AiError, TextGenerator};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use paperflow_common::Paper;
use tokio::time::Instant;

use crate::schemas::shorts_score::{
    ClickbaitPotential, HumanComparison, Implementation, LifeImpact, ShortsCandidate, ShortsScore,
    StrongNumbers, UseCase,
};
use crate::tier::TierThresholds;

#[derive(Clone)]
enum Reply {
    Text(String),
    Fail(u16, String),
}

pub struct MockGenerator {
    rules: Vec<(String, Reply)>,
    default: Option<Reply>,
    prompts: Mutex<Vec<(String, Instant)>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            default: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `text` when the prompt contains `needle`.
    pub fn on_prompt(mut self, needle: &str, text: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Text(text.to_string())));
        self
    }

    /// Fail with an API error when the prompt contains `needle`.
    pub fn failing_on(mut self, needle: &str, status: u16, body: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Fail(status, body.to_string())));
        self
    }

    pub fn with_default(mut self, text: &str) -> Self {
        self.default = Some(Reply::Text(text.to_string()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.prompts.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn provider(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), Instant::now()));

        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .or_else(|| self.default.clone());

        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(status, body)) => Err(AiError::Api { status, body }),
            None => Err(AiError::EmptyResponse("mock")),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn paper(id: &str, title: &str) -> Paper {
    let at = Utc.with_ymd_and_hms(2026, 1, 30, 18, 0, 0).unwrap();
    Paper {
        id: id.to_string(),
        title: title.to_string(),
        abstract_text: format!("Abstract of {title}."),
        authors: vec!["Ada Lovelace".to_string()],
        categories: vec!["cs.AI".to_string()],
        primary_category: Some("cs.AI".to_string()),
        published: at,
        updated: at,
        pdf_url: Some(format!("http://arxiv.org/pdf/{id}")),
        entry_id: format!("http://arxiv.org/abs/{id}"),
    }
}

/// A scored candidate whose whole total sits on the clickbait axis is
/// impossible (max 25), so the axes are filled greedily up to `total`.
pub fn candidate(id: &str, total: f64) -> ShortsCandidate {
    let mut remaining = total;
    let mut take = |max: f64| {
        let v = remaining.min(max);
        remaining -= v;
        v
    };
    let score = ShortsScore {
        clickbait_potential: ClickbaitPotential {
            score: take(25.0),
            generated_titles: vec!["医者が不要に".to_string()],
            best_title: "医者が不要に".to_string(),
            is_honest: true,
        },
        life_impact: LifeImpact {
            score: take(20.0),
            affected_jobs: vec![],
            reason: String::new(),
        },
        human_comparison: HumanComparison {
            score: take(20.0),
            found_keywords: vec![],
            evidence: String::new(),
        },
        strong_numbers: StrongNumbers {
            score: take(15.0),
            numbers: vec![],
            evidence: String::new(),
        },
        use_case: UseCase {
            score: take(10.0),
            domains: vec![],
        },
        implementation: Implementation {
            score: take(10.0),
            availability: String::new(),
        },
        total_score: total,
        one_line_hook: String::new(),
        verdict: TierThresholds::default().verdict(total),
    };
    ShortsCandidate {
        paper: paper(id, &format!("Paper {id}")),
        score,
    }
}
