// arXiv export API client. Atom responses are parsed with feed-rs.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use feed_rs::model::Entry;
use paperflow_common::{dedup_by_id, Paper};
use tracing::{info, warn};

const ARXIV_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ArxivClient {
    http: reqwest::Client,
    base_url: String,
    request_interval: Duration,
}

impl ArxivClient {
    pub fn new(base_url: impl Into<String>, request_interval: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(ARXIV_TIMEOUT)
            .user_agent(concat!("paperflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build arXiv HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            request_interval,
        })
    }

    /// Newest submissions in one category.
    pub async fn search_category(&self, category: &str, max_results: u32) -> Result<Vec<Paper>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("search_query", format!("cat:{category}")),
                ("start", "0".to_string()),
                ("max_results", max_results.to_string()),
                ("sortBy", "submittedDate".to_string()),
                ("sortOrder", "descending".to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("arXiv query failed for {category}"))?
            .error_for_status()
            .with_context(|| format!("arXiv returned an error status for {category}"))?;

        let body = response
            .bytes()
            .await
            .context("Failed to read arXiv response body")?;
        parse_feed(&body)
    }

    /// All categories, deduplicated across categories (first seen wins).
    /// A failing category is logged and skipped.
    pub async fn fetch_categories(&self, categories: &[String], max_results: u32) -> Vec<Paper> {
        let mut all = Vec::new();

        for (i, category) in categories.iter().enumerate() {
            info!(category = category.as_str(), "Fetching papers");
            match self.search_category(category, max_results).await {
                Ok(papers) => {
                    info!(category = category.as_str(), count = papers.len(), "Fetched category");
                    all.extend(papers);
                }
                Err(e) => {
                    warn!(category = category.as_str(), error = %e, "Category fetch failed");
                }
            }

            if i + 1 < categories.len() {
                tokio::time::sleep(self.request_interval).await;
            }
        }

        let papers = dedup_by_id(all);
        info!(count = papers.len(), "Total unique papers fetched");
        papers
    }
}

/// Parse an arXiv Atom response into papers. Entries without an id or a
/// timestamp, and API error entries, are skipped.
pub fn parse_feed(body: &[u8]) -> Result<Vec<Paper>> {
    let feed = feed_rs::parser::parse(body).context("Failed to parse arXiv Atom feed")?;
    Ok(feed.entries.into_iter().filter_map(entry_to_paper).collect())
}

fn entry_to_paper(entry: Entry) -> Option<Paper> {
    if entry.id.contains("/api/errors") {
        return None;
    }
    let id = entry.id.rsplit('/').next().filter(|s| !s.is_empty())?.to_string();

    let published = entry.published.or(entry.updated)?;
    let updated = entry.updated.unwrap_or(published);

    let pdf_url = entry
        .links
        .iter()
        .find(|l| {
            l.title.as_deref() == Some("pdf") || l.media_type.as_deref() == Some("application/pdf")
        })
        .map(|l| l.href.clone());

    let categories: Vec<String> = entry.categories.into_iter().map(|c| c.term).collect();

    Some(Paper {
        title: collapse_whitespace(&entry.title.map(|t| t.content).unwrap_or_default()),
        abstract_text: collapse_whitespace(&entry.summary.map(|t| t.content).unwrap_or_default()),
        authors: entry.authors.into_iter().map(|p| p.name).collect(),
        primary_category: categories.first().cloned(),
        categories,
        published,
        updated,
        pdf_url,
        entry_id: entry.id,
        id,
    })
}

/// Keep papers published or updated on `date`.
pub fn filter_by_date(papers: Vec<Paper>, date: NaiveDate) -> Vec<Paper> {
    let before = papers.len();
    let filtered: Vec<Paper> = papers.into_iter().filter(|p| p.touched_on(date)).collect();
    info!(before, after = filtered.len(), %date, "Filtered papers by date");
    filtered
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
