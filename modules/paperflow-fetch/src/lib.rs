pub mod arxiv;
pub mod batch;
pub mod error;
pub mod fetcher;
pub mod pdf;
pub mod retry;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use arxiv::{filter_by_date, parse_feed, ArxivClient};
pub use batch::{BatchProgress, BoundedBatchRunner, FetchJob, FetchOutcome};
pub use error::FetchError;
pub use fetcher::RetryingFetcher;
pub use pdf::PdfDownloader;
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, Transport};
