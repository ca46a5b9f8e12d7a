use async_trait::async_trait;
use paperflow_common::Paper;
use paperflow_fetch::ArxivClient;

/// Where the day's paper metadata comes from.
#[async_trait]
pub trait PaperSource: Send + Sync {
    async fn fetch(&self, categories: &[String], max_results: u32) -> Vec<Paper>;
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn fetch(&self, categories: &[String], max_results: u32) -> Vec<Paper> {
        self.fetch_categories(categories, max_results).await
    }
}

/// A fixed list, for tests and for re-running from saved metadata.
pub struct StaticSource(pub Vec<Paper>);

#[async_trait]
impl PaperSource for StaticSource {
    async fn fetch(&self, _categories: &[String], _max_results: u32) -> Vec<Paper> {
        self.0.clone()
    }
}
