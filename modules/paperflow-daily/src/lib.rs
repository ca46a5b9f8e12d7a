pub mod export;
pub mod layout;
pub mod provider;
pub mod runner;
pub mod source;
pub mod stats;
pub mod summary;

pub use layout::OutputLayout;
pub use runner::{DailyRunner, RunOptions};
pub use source::PaperSource;
pub use stats::{RunReport, StageReport};
