// JSON and spreadsheet-friendly CSV output.
//
// CSV files start with a UTF-8 BOM so spreadsheet apps pick the right
// encoding, use CRLF row endings, and quote fields only when needed.
// List values are joined with " / ". Error markers never become rows.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use paperflow_annotate::schemas::{Screening, ShortsCopy, ShortsScore, Translation};
use paperflow_annotate::{AnnotationResult, NarrationScript};
use paperflow_common::Paper;
use serde::de::DeserializeOwned;
use serde::Serialize;

const BOM: &str = "\u{feff}";
const LIST_SEPARATOR: &str = " / ";

pub fn save_json<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize JSON")?;
    write_file(path, json.as_bytes())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn save_text(text: &str, path: &Path) -> Result<()> {
    write_file(path, text.as_bytes())
}

/// Nothing is written for an empty table.
pub fn save_csv(columns: &[&str], rows: &[Vec<String>], path: &Path) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    write_file(path, render_csv(columns, rows).as_bytes())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn render_csv(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::from(BOM);
    push_row(&mut out, columns.iter().copied());
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str));
    }
    out
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\r', '\n']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push_str("\r\n");
}

pub fn join_list(items: &[String]) -> String {
    items.join(LIST_SEPARATOR)
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

pub const METADATA_COLUMNS: &[&str] = &[
    "id",
    "title",
    "authors",
    "categories",
    "published",
    "abstract",
    "pdf_url",
];

pub fn metadata_rows(papers: &[Paper]) -> Vec<Vec<String>> {
    papers
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.title.clone(),
                join_list(&p.authors),
                join_list(&p.categories),
                p.published.to_rfc3339(),
                p.abstract_text.clone(),
                p.pdf_url.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

pub const MERGED_COLUMNS: &[&str] = &[
    "id",
    "title",
    "authors",
    "categories",
    "published",
    "total_score",
    "usefulness",
    "novelty",
    "impact",
    "explainability",
    "one_line_summary",
    "reason",
    "abstract",
    "pdf_url",
];

/// Every paper, with its screening scores when screening succeeded
/// (blank otherwise), sorted by score descending. Unscored papers sort last
/// in their original order.
pub fn merged_rows(papers: &[Paper], screening: &[AnnotationResult<Screening>]) -> Vec<Vec<String>> {
    let mut by_id: HashMap<&str, &Screening> = HashMap::new();
    for r in screening {
        if let Some(s) = r.payload() {
            by_id.entry(r.paper_id.as_str()).or_insert(s);
        }
    }

    let mut joined: Vec<(&Paper, Option<&Screening>)> = papers
        .iter()
        .map(|p| (p, by_id.get(p.id.as_str()).copied()))
        .collect();
    joined.sort_by(|a, b| {
        let score = |s: Option<&Screening>| s.map_or(f64::NEG_INFINITY, |s| s.total_score);
        score(b.1).total_cmp(&score(a.1))
    });

    joined
        .into_iter()
        .map(|(p, s)| {
            let num = |f: fn(&Screening) -> f64| s.map(|s| f(s).to_string()).unwrap_or_default();
            vec![
                p.id.clone(),
                p.title.clone(),
                join_list(&p.authors),
                join_list(&p.categories),
                p.published.to_rfc3339(),
                num(|s| s.total_score),
                num(|s| s.usefulness),
                num(|s| s.novelty),
                num(|s| s.impact),
                num(|s| s.explainability),
                s.map(|s| s.one_line_summary.clone()).unwrap_or_default(),
                s.map(|s| s.reason.clone()).unwrap_or_default(),
                p.abstract_text.clone(),
                p.pdf_url.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

pub const TRANSLATED_COLUMNS: &[&str] = &[
    "paper_id",
    "title_ja",
    "youtube_hook",
    "summary_3lines",
    "keywords",
    "original_title",
];

pub fn translated_rows(translated: &[AnnotationResult<Translation>]) -> Vec<Vec<String>> {
    translated
        .iter()
        .filter_map(|r| {
            r.payload().map(|t| {
                vec![
                    r.paper_id.clone(),
                    t.title_ja.clone(),
                    t.youtube_hook.clone(),
                    join_list(&t.summary_3lines),
                    join_list(&t.keywords),
                    t.original_title.clone(),
                ]
            })
        })
        .collect()
}

pub const SHORTS_SCORE_COLUMNS: &[&str] = &[
    "paper_id",
    "total_score",
    "verdict",
    "best_title",
    "one_line_hook",
];

pub fn shorts_score_rows(scores: &[AnnotationResult<ShortsScore>]) -> Vec<Vec<String>> {
    scores
        .iter()
        .filter_map(|r| {
            r.payload().map(|s| {
                vec![
                    r.paper_id.clone(),
                    s.total_score.to_string(),
                    s.verdict.to_string(),
                    s.clickbait_potential.best_title.clone(),
                    s.one_line_hook.clone(),
                ]
            })
        })
        .collect()
}

pub const COPY_COLUMNS: &[&str] = &["paper_id", "hook", "line1", "line2", "ending"];

pub fn copy_rows(copies: &[AnnotationResult<ShortsCopy>]) -> Vec<Vec<String>> {
    copies
        .iter()
        .filter_map(|r| {
            r.payload().map(|c| {
                vec![
                    r.paper_id.clone(),
                    c.hook.clone(),
                    c.line1.clone(),
                    c.line2.clone(),
                    c.ending.clone(),
                ]
            })
        })
        .collect()
}

pub const NARRATION_COLUMNS: &[&str] = &["paper_id", "audio_script"];

pub fn narration_rows(scripts: &[NarrationScript]) -> Vec<Vec<String>> {
    scripts
        .iter()
        .map(|s| vec![s.paper_id.clone(), s.audio_script.clone()])
        .collect()
}
