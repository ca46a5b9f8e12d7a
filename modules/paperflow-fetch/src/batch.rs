use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;

use futures::stream::{self, StreamExt};
use paperflow_common::{dedup_by_id, Identified};
use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

/// One unit of acquisition work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    pub id: String,
    pub url: Option<String>,
    pub dest: PathBuf,
}

impl Identified for FetchJob {
    fn id(&self) -> &str {
        &self.id
    }
}

/// identifier → success for one acquisition run. Built only by
/// `BoundedBatchRunner::run` and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FetchOutcome {
    results: HashMap<String, bool>,
}

impl FetchOutcome {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<bool> {
        self.results.get(id).copied()
    }

    pub fn succeeded(&self) -> usize {
        self.results.values().filter(|ok| **ok).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Identifiers that did not make it, sorted for stable log output.
    pub fn failed_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .results
            .iter()
            .filter(|(_, ok)| !**ok)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.results.iter().map(|(id, ok)| (id.as_str(), *ok))
    }
}

/// Side-channel view of a running batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchProgress {
    pub resolved: usize,
    pub succeeded: usize,
    pub total: usize,
}

/// Runs one fetch per item with at most `concurrency` in flight.
///
/// Every item resolves to a boolean; one failure never cancels its siblings.
/// `run` returns only after the whole batch resolved.
pub struct BoundedBatchRunner {
    concurrency: usize,
    progress: watch::Sender<BatchProgress>,
}

impl BoundedBatchRunner {
    pub fn new(concurrency: usize) -> Self {
        let (progress, _) = watch::channel(BatchProgress::default());
        Self {
            concurrency: concurrency.max(1),
            progress,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn subscribe(&self) -> watch::Receiver<BatchProgress> {
        self.progress.subscribe()
    }

    /// Items sharing an identifier are fetched once, for the first occurrence.
    pub async fn run<T, F, Fut>(&self, items: Vec<T>, fetch: F) -> FetchOutcome
    where
        T: Identified,
        F: Fn(T) -> Fut,
        Fut: Future<Output = bool>,
    {
        let items = dedup_by_id(items);
        let total = items.len();
        let log_every = (total / 10).max(1);

        let mut progress = BatchProgress {
            total,
            ..BatchProgress::default()
        };
        self.progress.send_replace(progress);

        let mut results = HashMap::with_capacity(total);
        let mut in_flight = stream::iter(items.into_iter().map(|item| {
            let id = item.id().to_string();
            let fut = fetch(item);
            async move { (id, fut.await) }
        }))
        .buffer_unordered(self.concurrency);

        while let Some((id, ok)) = in_flight.next().await {
            results.insert(id, ok);

            progress.resolved += 1;
            if ok {
                progress.succeeded += 1;
            }
            self.progress.send_replace(progress);

            if progress.resolved % log_every == 0 || progress.resolved == total {
                info!(
                    resolved = progress.resolved,
                    succeeded = progress.succeeded,
                    total,
                    "Batch progress"
                );
            }
        }

        let outcome = FetchOutcome { results };
        info!(
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            total,
            "Batch complete"
        );
        outcome
    }
}
