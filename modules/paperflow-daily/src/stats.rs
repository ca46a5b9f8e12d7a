/// Counts for one stage of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: &'static str,
    pub attempted: usize,
    pub succeeded: usize,
}

impl StageReport {
    pub fn new(stage: &'static str, attempted: usize, succeeded: usize) -> Self {
        Self {
            stage,
            attempted,
            succeeded,
        }
    }

    pub fn failed(&self) -> usize {
        self.attempted.saturating_sub(self.succeeded)
    }
}

/// Per-stage counts for a whole run, printed at the end.
#[derive(Debug, Default)]
pub struct RunReport {
    pub stages: Vec<StageReport>,
    pub skipped: Vec<(&'static str, String)>,
}

impl RunReport {
    pub fn record(&mut self, report: StageReport) {
        tracing::info!(
            stage = report.stage,
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed(),
            "Stage complete"
        );
        self.stages.push(report);
    }

    pub fn skip(&mut self, stage: &'static str, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(stage, reason = reason.as_str(), "Stage skipped");
        self.skipped.push((stage, reason));
    }

    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == name)
    }

    pub fn merge(&mut self, other: RunReport) {
        self.stages.extend(other.stages);
        self.skipped.extend(other.skipped);
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Paperflow Run Complete ===")?;
        writeln!(
            f,
            "{:<16}{:>10}{:>11}{:>8}",
            "Stage", "Attempted", "Succeeded", "Failed"
        )?;
        for s in &self.stages {
            writeln!(
                f,
                "{:<16}{:>10}{:>11}{:>8}",
                s.stage,
                s.attempted,
                s.succeeded,
                s.failed()
            )?;
        }
        if !self.skipped.is_empty() {
            writeln!(f, "\nSkipped:")?;
            for (stage, reason) in &self.skipped {
                writeln!(f, "  {stage}: {reason}")?;
            }
        }
        Ok(())
    }
}
