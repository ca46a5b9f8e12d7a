use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use paperflow_common::file_config::SubfolderConfig;

/// Where one day's artifacts live: `<base>/<YYYY-MM>/<subfolder>/<name>_<YYYYMMDD>.<ext>`.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    month_dir: PathBuf,
    stamp: String,
    subfolders: SubfolderConfig,
}

impl OutputLayout {
    pub fn new(base_dir: &Path, subfolders: &SubfolderConfig, date: NaiveDate) -> Self {
        Self {
            month_dir: base_dir.join(date.format("%Y-%m").to_string()),
            stamp: date.format("%Y%m%d").to_string(),
            subfolders: subfolders.clone(),
        }
    }

    pub fn month_dir(&self) -> &Path {
        &self.month_dir
    }

    pub fn papers_dir(&self) -> PathBuf {
        self.month_dir.join(&self.subfolders.papers)
    }

    fn file(&self, subfolder: &str, name: &str, ext: &str) -> PathBuf {
        self.month_dir
            .join(subfolder)
            .join(format!("{name}_{}.{ext}", self.stamp))
    }

    pub fn metadata_json(&self) -> PathBuf {
        self.file(&self.subfolders.metadata, "metadata", "json")
    }

    pub fn metadata_csv(&self) -> PathBuf {
        self.file(&self.subfolders.metadata, "metadata", "csv")
    }

    /// Metadata joined with screening scores, best first.
    pub fn merged_csv(&self) -> PathBuf {
        self.file(&self.subfolders.metadata, "papers", "csv")
    }

    pub fn screening_json(&self) -> PathBuf {
        self.file(&self.subfolders.screening, "screening", "json")
    }

    pub fn translated_json(&self) -> PathBuf {
        self.file(&self.subfolders.translated, "translated", "json")
    }

    pub fn translated_csv(&self) -> PathBuf {
        self.file(&self.subfolders.translated, "translated", "csv")
    }

    pub fn summary_md(&self) -> PathBuf {
        self.month_dir.join(format!("summary_{}.md", self.stamp))
    }

    pub fn shorts_scores_json(&self) -> PathBuf {
        self.file(&self.subfolders.shorts, "shorts_scores", "json")
    }

    pub fn shorts_scores_csv(&self) -> PathBuf {
        self.file(&self.subfolders.shorts, "shorts_scores", "csv")
    }

    pub fn shorts_copy_json(&self) -> PathBuf {
        self.file(&self.subfolders.shorts, "shorts_copy", "json")
    }

    pub fn shorts_copy_csv(&self) -> PathBuf {
        self.file(&self.subfolders.shorts, "shorts_copy", "csv")
    }

    pub fn narration_csv(&self) -> PathBuf {
        self.file(&self.subfolders.shorts, "narration", "csv")
    }

    pub fn scripts_json(&self) -> PathBuf {
        self.file(&self.subfolders.shorts, "scripts", "json")
    }
}
