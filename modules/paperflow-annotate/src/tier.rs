use serde::{Deserialize, Serialize};

/// Shorts adoption tier derived from a 0-100 total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    AdoptHigh,
    AdoptMid,
    Skip,
}

impl Verdict {
    pub fn is_adopted(self, include_mid: bool) -> bool {
        match self {
            Verdict::AdoptHigh => true,
            Verdict::AdoptMid => include_mid,
            Verdict::Skip => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::AdoptHigh => "ADOPT_HIGH",
            Verdict::AdoptMid => "ADOPT_MID",
            Verdict::Skip => "SKIP",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub high: f64,
    pub mid: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high: 80.0,
            mid: 65.0,
        }
    }
}

impl TierThresholds {
    pub fn verdict(&self, total: f64) -> Verdict {
        if total >= self.high {
            Verdict::AdoptHigh
        } else if total >= self.mid {
            Verdict::AdoptMid
        } else {
            Verdict::Skip
        }
    }

    /// `None` is a failed annotation, which never gets adopted.
    pub fn verdict_for(&self, total: Option<f64>) -> Verdict {
        total.map_or(Verdict::Skip, |t| self.verdict(t))
    }
}
