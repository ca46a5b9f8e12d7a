pub mod config;
pub mod file_config;
pub mod types;

pub use config::AppConfig;
pub use file_config::{load_config, FileConfig, ProviderKind};
pub use types::{dedup_by_id, Identified, Paper};
