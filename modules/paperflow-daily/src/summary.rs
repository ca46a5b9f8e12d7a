use chrono::NaiveDate;
use paperflow_annotate::schemas::Translation;
use paperflow_annotate::AnnotationResult;

const TOP_PAPERS: usize = 10;

/// Markdown digest of one day: counts plus the first ten translated papers.
pub fn daily_summary(
    date: NaiveDate,
    fetched: usize,
    translated: &[AnnotationResult<Translation>],
) -> String {
    let ok: Vec<(&str, &Translation)> = translated
        .iter()
        .filter_map(|r| r.payload().map(|t| (r.paper_id.as_str(), t)))
        .collect();

    let mut lines = vec![
        format!("# arXiv Daily Summary - {}", date.format("%Y-%m-%d")),
        String::new(),
        "## Stats".to_string(),
        format!("- Papers fetched: {fetched}"),
        format!("- Papers translated: {}", ok.len()),
        String::new(),
        "## Top Papers".to_string(),
        String::new(),
    ];

    for (i, (paper_id, t)) in ok.iter().take(TOP_PAPERS).enumerate() {
        let title = if t.title_ja.is_empty() {
            &t.original_title
        } else {
            &t.title_ja
        };
        lines.push(format!("### {}. {}", i + 1, title));
        lines.push(format!("**ID**: {paper_id}"));
        if !t.youtube_hook.is_empty() {
            lines.push(format!("**Hook**: {}", t.youtube_hook));
        }
        for line in &t.summary_3lines {
            lines.push(format!("- {line}"));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translation(title_ja: &str, hook: &str) -> Translation {
        Translation {
            title_ja: title_ja.into(),
            abstract_ja: String::new(),
            summary_3lines: vec!["何か".into(), "新しい".into()],
            keywords: vec![],
            youtube_hook: hook.into(),
            original_title: "Original".into(),
        }
    }

    #[test]
    fn lists_successful_translations() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let results = vec![
            AnnotationResult::success("p1", translation("論文一", "見て")),
            AnnotationResult::error("p2", "invalid format"),
            AnnotationResult::success("p3", translation("", "")),
        ];

        let md = daily_summary(date, 42, &results);

        assert!(md.starts_with("# arXiv Daily Summary - 2026-01-31\n"));
        assert!(md.contains("- Papers fetched: 42"));
        assert!(md.contains("- Papers translated: 2"));
        assert!(md.contains("### 1. 論文一\n**ID**: p1\n**Hook**: 見て\n- 何か\n- 新しい"));
        assert!(md.contains("### 2. Original\n**ID**: p3\n- 何か"));
        assert!(!md.contains("p2"));
    }

    #[test]
    fn caps_at_ten() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let results: Vec<_> = (0..15)
            .map(|i| AnnotationResult::success(format!("p{i}"), translation("t", "")))
            .collect();
        let md = daily_summary(date, 15, &results);
        assert!(md.contains("### 10. t"));
        assert!(!md.contains("### 11."));
    }
}
