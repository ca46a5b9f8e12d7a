use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::error::FetchError;
use crate::retry::RetryPolicy;
use crate::transport::Transport;

/// Fetches one locator into one destination file, retrying with backoff.
///
/// A destination that already holds data counts as done, so re-running a
/// batch after a crash or a partial day only fetches what is missing.
#[derive(Clone)]
pub struct RetryingFetcher {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Returns `true` when `dest` holds the payload on return.
    pub async fn fetch_to(&self, url: &str, dest: &Path) -> bool {
        if already_present(dest).await {
            debug!(url, dest = %dest.display(), "Already present, skipping");
            return true;
        }

        for attempt in 0..self.policy.max_retries {
            match self.attempt(url, dest).await {
                Ok(bytes) => {
                    debug!(url, dest = %dest.display(), bytes, "Fetched");
                    return true;
                }
                Err(e) => {
                    let wait = self.policy.delay_for(attempt);
                    warn!(
                        url,
                        attempt = attempt + 1,
                        max_retries = self.policy.max_retries,
                        wait_secs = wait.as_secs_f64(),
                        error = %e,
                        "Fetch attempt failed, backing off"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }

        error!(url, "Fetch failed after retries");
        false
    }

    async fn attempt(&self, url: &str, dest: &Path) -> Result<usize, FetchError> {
        let body = self.transport.get(url).await?;
        write_atomic(dest, &body).await?;
        Ok(body.len())
    }
}

/// A non-empty regular file counts as present. Partial downloads never land
/// at `dest` (see `write_atomic`), so presence means complete.
pub(crate) async fn already_present(dest: &Path) -> bool {
    tokio::fs::metadata(dest)
        .await
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

/// Write to a sibling `.part` file, then rename onto `dest`.
pub(crate) async fn write_atomic(dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let partial = partial_path(dest);
    if let Err(e) = tokio::fs::write(&partial, bytes).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e);
    }
    tokio::fs::rename(&partial, dest).await
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}
