/// Why a single fetch attempt failed. Never escapes the retry loop: the
/// batch caller only ever sees a boolean per item.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Timed out after {secs}s: {url}")]
    Timeout { url: String, secs: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
