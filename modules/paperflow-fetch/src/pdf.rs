use std::path::{Path, PathBuf};

use paperflow_common::Paper;
use tracing::{info, warn};

use crate::batch::{BoundedBatchRunner, FetchJob, FetchOutcome};
use crate::fetcher::RetryingFetcher;

/// Bulk PDF acquisition: one `<id>.pdf` per paper under `dir`.
pub struct PdfDownloader {
    fetcher: RetryingFetcher,
    runner: BoundedBatchRunner,
    dir: PathBuf,
}

impl PdfDownloader {
    pub fn new(fetcher: RetryingFetcher, runner: BoundedBatchRunner, dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            runner,
            dir: dir.into(),
        }
    }

    pub fn runner(&self) -> &BoundedBatchRunner {
        &self.runner
    }

    pub fn destination(&self, paper: &Paper) -> PathBuf {
        pdf_path(&self.dir, paper)
    }

    pub async fn download(&self, papers: &[Paper]) -> FetchOutcome {
        info!(
            papers = papers.len(),
            dir = %self.dir.display(),
            concurrency = self.runner.concurrency(),
            "Downloading PDFs"
        );

        let jobs: Vec<FetchJob> = papers
            .iter()
            .map(|p| FetchJob {
                id: p.id.clone(),
                url: p.pdf_url.clone(),
                dest: self.destination(p),
            })
            .collect();

        let fetcher = &self.fetcher;
        self.runner
            .run(jobs, |job| async move {
                match job.url {
                    Some(ref url) => fetcher.fetch_to(url, &job.dest).await,
                    None => {
                        warn!(paper_id = %job.id, "No PDF URL for paper");
                        false
                    }
                }
            })
            .await
    }
}

pub fn pdf_path(dir: &Path, paper: &Paper) -> PathBuf {
    dir.join(format!("{}.pdf", paper.file_stem()))
}
