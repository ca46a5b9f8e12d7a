use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use paperflow_annotate::testing::{paper, MockGenerator};
use paperflow_annotate::FixedDelay;
use paperflow_common::{FileConfig, Paper};
use paperflow_daily::export::save_json;
use paperflow_daily::source::StaticSource;
use paperflow_daily::{DailyRunner, RunOptions};
use paperflow_fetch::testing::MockTransport;

const SCREEN_HIGH: &str = r#"{"usefulness": 9, "novelty": 8, "impact": 9, "explainability": 8,
    "total_score": 8.5, "one_line_summary": "good", "reason": "solid"}"#;
const SCREEN_LOW: &str = r#"{"usefulness": 2, "novelty": 2, "impact": 2, "explainability": 2,
    "total_score": 2, "one_line_summary": "meh", "reason": "weak"}"#;
const TRANSLATION: &str = r#"{"title_ja": "翻訳タイトル", "abstract_ja": "要約",
    "summary_3lines": ["一", "二", "三"], "keywords": ["AI"], "youtube_hook": "必見"}"#;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
}

fn config(base: &std::path::Path) -> FileConfig {
    let mut config = FileConfig::default();
    config.output.base_dir = base.to_path_buf();
    config.shorts.copy_delay_ms = 0;
    config
}

fn papers() -> Vec<Paper> {
    vec![
        paper("2601.00001v1", "Strong Paper"),
        paper("2601.00002v1", "Weak Paper"),
        paper("2601.00003v1", "Broken Paper"),
    ]
}

fn transport(papers: &[Paper]) -> MockTransport {
    papers.iter().fold(MockTransport::new(), |t, p| {
        t.on_url(p.pdf_url.as_deref().unwrap_or_default(), b"%PDF-1.7")
    })
}

/// Rules match in order; only the translation prompt mentions `title_ja`.
fn generator() -> MockGenerator {
    MockGenerator::new()
        .on_prompt("\"title_ja\"", TRANSLATION)
        .on_prompt("Title: Strong Paper", SCREEN_HIGH)
        .on_prompt("Title: Weak Paper", SCREEN_LOW)
        .on_prompt("Title: Broken Paper", "rate limited, try later")
}

#[tokio::test]
async fn full_run_writes_every_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let batch = papers();
    let transport = Arc::new(transport(&batch));

    let runner = DailyRunner::new(
        config(dir.path()),
        dir.path().to_path_buf(),
        date(),
        Arc::new(StaticSource(batch.clone())),
        transport.clone(),
        Some(Arc::new(generator())),
    )
    .with_pacer(Arc::new(FixedDelay(Duration::ZERO)));

    let report = runner.run(RunOptions::default()).await.unwrap();
    let layout = runner.layout();

    assert!(layout.metadata_json().is_file());
    assert!(layout.metadata_csv().is_file());
    assert!(layout.screening_json().is_file());
    assert!(layout.merged_csv().is_file());
    assert!(layout.translated_json().is_file());
    assert!(layout.summary_md().is_file());
    for p in &batch {
        assert!(layout.papers_dir().join(format!("{}.pdf", p.id)).is_file());
    }

    let pdf = report.stage("pdf").unwrap();
    assert_eq!((pdf.attempted, pdf.succeeded), (3, 3));

    let screening = report.stage("screening").unwrap();
    assert_eq!((screening.attempted, screening.succeeded), (3, 2));

    // Only the strong paper clears min_score 5.0.
    let translation = report.stage("translation").unwrap();
    assert_eq!((translation.attempted, translation.succeeded), (1, 1));

    let merged = std::fs::read_to_string(layout.merged_csv()).unwrap();
    assert!(merged.starts_with('\u{feff}'));
    let first_row = merged.lines().nth(1).unwrap();
    assert!(first_row.starts_with("2601.00001v1,Strong Paper"));

    let summary = std::fs::read_to_string(layout.summary_md()).unwrap();
    assert!(summary.contains("### 1. 翻訳タイトル"));
    assert!(summary.contains("- Papers fetched: 3"));
}

#[tokio::test]
async fn second_run_does_not_download_again() {
    let dir = tempfile::tempdir().unwrap();
    let batch = papers();
    let transport = Arc::new(transport(&batch));

    for _ in 0..2 {
        let runner = DailyRunner::new(
            config(dir.path()),
            dir.path().to_path_buf(),
            date(),
            Arc::new(StaticSource(batch.clone())),
            transport.clone(),
            None,
        );
        runner.run(RunOptions::default()).await.unwrap();
    }

    assert_eq!(transport.total_calls(), batch.len());
}

#[tokio::test]
async fn missing_model_key_skips_annotation_stages() {
    let dir = tempfile::tempdir().unwrap();
    let runner = DailyRunner::new(
        config(dir.path()),
        dir.path().to_path_buf(),
        date(),
        Arc::new(StaticSource(papers())),
        Arc::new(MockTransport::new()),
        None,
    );

    let report = runner
        .run(RunOptions {
            skip_download: true,
            with_shorts: false,
        })
        .await
        .unwrap();

    assert!(report.stage("metadata").is_some());
    assert!(report.stage("pdf").is_none());
    assert!(report.stage("screening").is_none());
    let skipped: Vec<&str> = report.skipped.iter().map(|(s, _)| *s).collect();
    assert_eq!(skipped, vec!["pdf", "screening", "translation"]);
    assert!(!runner.layout().screening_json().exists());
}

#[tokio::test]
async fn shorts_command_reads_saved_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let batch = papers();

    // Save metadata with a key-less run first.
    DailyRunner::new(
        config(dir.path()),
        dir.path().to_path_buf(),
        date(),
        Arc::new(StaticSource(batch.clone())),
        Arc::new(MockTransport::new()),
        None,
    )
    .run(RunOptions {
        skip_download: true,
        with_shorts: false,
    })
    .await
    .unwrap();

    let score = |axes: [u8; 6]| {
        format!(
            r#"{{"clickbait_potential": {{"score": {}, "best_title": "終わる"}},
                "life_impact": {{"score": {}}}, "human_comparison": {{"score": {}}},
                "strong_numbers": {{"score": {}}}, "use_case": {{"score": {}}},
                "implementation": {{"score": {}}}, "one_line_hook": "見て"}}"#,
            axes[0], axes[1], axes[2], axes[3], axes[4], axes[5]
        )
    };
    let generator = MockGenerator::new()
        .on_prompt("Clickbait title idea: 終わる", r#"{"hook": "医者が不要になる", "line1": "AIが専門医を超えた", "line2": "精度99%", "ending": "もう戻れない"}"#)
        .on_prompt("Clickbait title: 終わる", r##"{"video_title": "医者終了", "blocks": [], "hashtags": ["#AI"]}"##)
        .on_prompt("Title: Strong Paper", &score([25, 20, 20, 15, 10, 10]))
        .on_prompt("Title: Weak Paper", &score([5, 5, 5, 5, 5, 5]))
        .on_prompt("Title: Broken Paper", "nope");

    let runner = DailyRunner::new(
        config(dir.path()),
        dir.path().to_path_buf(),
        date(),
        Arc::new(StaticSource(Vec::new())),
        Arc::new(MockTransport::new()),
        Some(Arc::new(generator)),
    )
    .with_pacer(Arc::new(FixedDelay(Duration::ZERO)));

    let report = runner.shorts(None).await.unwrap();
    let layout = runner.layout();

    let scored = report.stage("shorts_score").unwrap();
    assert_eq!((scored.attempted, scored.succeeded), (3, 2));
    let copy = report.stage("shorts_copy").unwrap();
    assert_eq!((copy.attempted, copy.succeeded), (1, 1));
    let scripts = report.stage("shorts_script").unwrap();
    assert_eq!((scripts.attempted, scripts.succeeded), (1, 1));

    let narration = std::fs::read_to_string(layout.narration_csv()).unwrap();
    assert!(narration.contains("2601.00001v1,医者が不要になる。AIが専門医を超えた。精度99%。もう戻れない。"));
    assert!(layout.scripts_json().is_file());

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(layout.shorts_scores_json()).unwrap())
            .unwrap();
    let broken = &saved[2];
    assert_eq!(broken["paper_id"], "2601.00003v1");
    assert_eq!(broken["error"], "invalid format");
    assert_eq!(broken["verdict"], "SKIP");
    assert_eq!(saved[0]["verdict"], "ADOPT_HIGH");
}

#[tokio::test]
async fn shorts_keep_the_first_of_duplicate_metadata_entries() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(
        MockGenerator::new()
            .on_prompt("Clickbait title idea: 終わる", r#"{"hook": "a", "line1": "b", "line2": "c", "ending": "d"}"#)
            .on_prompt("Clickbait title: 終わる", r#"{"video_title": "v", "blocks": [], "hashtags": []}"#)
            .on_prompt(
                "Title: First Copy",
                r#"{"clickbait_potential": {"score": 25, "best_title": "終わる"},
                    "life_impact": {"score": 20}, "human_comparison": {"score": 20},
                    "strong_numbers": {"score": 15}, "use_case": {"score": 10},
                    "implementation": {"score": 10}, "one_line_hook": "見て"}"#,
            ),
    );
    let runner = DailyRunner::new(
        config(dir.path()),
        dir.path().to_path_buf(),
        date(),
        Arc::new(StaticSource(Vec::new())),
        Arc::new(MockTransport::new()),
        Some(generator.clone()),
    )
    .with_pacer(Arc::new(FixedDelay(Duration::ZERO)));

    let saved = vec![
        paper("2601.00001v1", "First Copy"),
        paper("2601.00001v1", "Second Copy"),
    ];
    save_json(&saved, &runner.layout().metadata_json()).unwrap();

    let report = runner.shorts(None).await.unwrap();

    let scored = report.stage("shorts_score").unwrap();
    assert_eq!((scored.attempted, scored.succeeded), (1, 1));
    assert!(generator
        .prompts()
        .iter()
        .all(|prompt| !prompt.contains("Second Copy")));
    let copy = report.stage("shorts_copy").unwrap();
    assert_eq!((copy.attempted, copy.succeeded), (1, 1));
}

#[tokio::test]
async fn shorts_without_saved_metadata_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let runner = DailyRunner::new(
        config(dir.path()),
        dir.path().to_path_buf(),
        date(),
        Arc::new(StaticSource(Vec::new())),
        Arc::new(MockTransport::new()),
        Some(Arc::new(MockGenerator::new())),
    );
    let err = runner.shorts(None).await.unwrap_err();
    assert!(format!("{err:#}").contains("No saved metadata"));
}
