use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ai_client::TextGenerator;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use paperflow_annotate::schemas::{
    ScreeningSchema, ShortsCandidate, ShortsCopySchema, ShortsScoreRecord, ShortsScoreSchema,
    ShortsScriptSchema, Translation, TranslationSchema,
};
use paperflow_annotate::{
    filter_by_verdict, AnnotationPipeline, AnnotationResult, FixedDelay, NarrationScript, Pacer,
    SelectionRanker, TierThresholds,
};
use paperflow_common::{dedup_by_id, FileConfig, Paper};
use paperflow_fetch::{
    filter_by_date, BoundedBatchRunner, PdfDownloader, RetryPolicy, RetryingFetcher, Transport,
};
use tracing::{info, warn};

use crate::export::{self, save_csv, save_json};
use crate::layout::OutputLayout;
use crate::provider::{build_annotator, build_pacer};
use crate::source::PaperSource;
use crate::stats::{RunReport, StageReport};
use crate::summary::daily_summary;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub skip_download: bool,
    pub with_shorts: bool,
}

/// One day's run. Every collaborator is passed in, so tests can swap the
/// network and the model for mocks.
pub struct DailyRunner {
    config: FileConfig,
    config_dir: PathBuf,
    date: NaiveDate,
    layout: OutputLayout,
    source: Arc<dyn PaperSource>,
    transport: Arc<dyn Transport>,
    generator: Option<Arc<dyn TextGenerator>>,
    pacer: Arc<dyn Pacer>,
}

impl DailyRunner {
    pub fn new(
        config: FileConfig,
        config_dir: PathBuf,
        date: NaiveDate,
        source: Arc<dyn PaperSource>,
        transport: Arc<dyn Transport>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        let layout = OutputLayout::new(&config.output.base_dir, &config.output.subfolders, date);
        let pacer = build_pacer(&config.annotation);
        Self {
            config,
            config_dir,
            date,
            layout,
            source,
            transport,
            generator,
            pacer,
        }
    }

    /// Override the pacing gate (tests use a zero delay).
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Fetch, download, screen, rank, translate, summarise.
    pub async fn run(&self, options: RunOptions) -> Result<RunReport> {
        let mut report = RunReport::default();
        info!(date = %self.date, out = %self.layout.month_dir().display(), "Daily run starting");

        let papers = self.fetch_metadata(&mut report).await?;

        if options.skip_download {
            report.skip("pdf", "--skip-download");
        } else {
            self.download_pdfs(&papers, &mut report).await;
        }

        let Some(generator) = self.generator.clone() else {
            report.skip("screening", "no API key for the configured provider");
            report.skip("translation", "no API key for the configured provider");
            return Ok(report);
        };

        let selected = self.screen(&generator, &papers, &mut report).await?;
        let translated = self.translate(&generator, &selected, &mut report).await?;

        let summary = daily_summary(self.date, papers.len(), &translated);
        export::save_text(&summary, &self.layout.summary_md())?;

        if options.with_shorts {
            report.merge(self.shorts_for(&generator, &papers, None).await?);
        }

        info!(date = %self.date, "Daily run complete");
        Ok(report)
    }

    /// Shorts stages over the metadata saved for this date.
    pub async fn shorts(&self, limit: Option<usize>) -> Result<RunReport> {
        let path = self.layout.metadata_json();
        let papers: Vec<Paper> = export::load_json(&path).with_context(|| {
            format!("No saved metadata for {}; run `paperflow run` first", self.date)
        })?;
        let papers = dedup_by_id(papers);

        let Some(generator) = self.generator.clone() else {
            anyhow::bail!("No API key for the configured provider; shorts need a model");
        };
        self.shorts_for(&generator, &papers, limit).await
    }

    async fn fetch_metadata(&self, report: &mut RunReport) -> Result<Vec<Paper>> {
        let arxiv = &self.config.arxiv;
        let mut papers = self
            .source
            .fetch(&arxiv.categories, arxiv.max_results_per_query)
            .await;
        if arxiv.only_target_date {
            papers = filter_by_date(papers, self.date);
        }

        save_json(&papers, &self.layout.metadata_json())?;
        save_csv(
            export::METADATA_COLUMNS,
            &export::metadata_rows(&papers),
            &self.layout.metadata_csv(),
        )?;
        report.record(StageReport::new("metadata", papers.len(), papers.len()));
        Ok(papers)
    }

    async fn download_pdfs(&self, papers: &[Paper], report: &mut RunReport) {
        let download = &self.config.download;
        let fetcher = RetryingFetcher::new(
            self.transport.clone(),
            RetryPolicy::new(download.max_retries, download.backoff_factor),
        );
        let downloader = PdfDownloader::new(
            fetcher,
            BoundedBatchRunner::new(download.concurrency),
            self.layout.papers_dir(),
        );

        let outcome = downloader.download(papers).await;
        if outcome.failed() > 0 {
            warn!(failed = ?outcome.failed_ids(), "Some PDFs could not be downloaded");
        }
        report.record(StageReport::new("pdf", outcome.len(), outcome.succeeded()));
    }

    async fn screen(
        &self,
        generator: &Arc<dyn TextGenerator>,
        papers: &[Paper],
        report: &mut RunReport,
    ) -> Result<Vec<Paper>> {
        let annotator = build_annotator(
            generator.clone(),
            ScreeningSchema,
            self.config.prompts.screening.as_deref(),
            &self.config_dir,
        )?;
        let results = AnnotationPipeline::new(annotator, self.pacer.clone())
            .run(papers)
            .await;
        record_annotations(report, "screening", &results);

        save_json(&results, &self.layout.screening_json())?;
        save_csv(
            export::MERGED_COLUMNS,
            &export::merged_rows(papers, &results),
            &self.layout.merged_csv(),
        )?;

        let screening = &self.config.screening;
        let selected: Vec<Paper> = SelectionRanker::new(screening.top_n, screening.min_score)
            .select(papers, &results)
            .into_iter()
            .map(|(paper, _)| paper.clone())
            .collect();
        info!(
            selected = selected.len(),
            top_n = screening.top_n,
            min_score = screening.min_score,
            "Selected papers for translation"
        );
        Ok(selected)
    }

    async fn translate(
        &self,
        generator: &Arc<dyn TextGenerator>,
        papers: &[Paper],
        report: &mut RunReport,
    ) -> Result<Vec<AnnotationResult<Translation>>> {
        let annotator = build_annotator(
            generator.clone(),
            TranslationSchema,
            self.config.prompts.translation.as_deref(),
            &self.config_dir,
        )?;
        let results = AnnotationPipeline::new(annotator, self.pacer.clone())
            .run(papers)
            .await;
        record_annotations(report, "translation", &results);

        save_json(&results, &self.layout.translated_json())?;
        save_csv(
            export::TRANSLATED_COLUMNS,
            &export::translated_rows(&results),
            &self.layout.translated_csv(),
        )?;
        Ok(results)
    }

    async fn shorts_for(
        &self,
        generator: &Arc<dyn TextGenerator>,
        papers: &[Paper],
        limit: Option<usize>,
    ) -> Result<RunReport> {
        let mut report = RunReport::default();
        let shorts = &self.config.shorts;
        let prompts = &self.config.prompts;
        let thresholds = TierThresholds {
            high: shorts.high_threshold,
            mid: shorts.mid_threshold,
        };

        // Scoring
        let annotator = build_annotator(
            generator.clone(),
            ShortsScoreSchema::new(thresholds),
            prompts.shorts_score.as_deref(),
            &self.config_dir,
        )?;
        let scores = AnnotationPipeline::new(annotator, self.pacer.clone())
            .run(papers)
            .await;
        record_annotations(&mut report, "shorts_score", &scores);
        save_json(
            &ShortsScoreRecord::from_results(&scores),
            &self.layout.shorts_scores_json(),
        )?;
        save_csv(
            export::SHORTS_SCORE_COLUMNS,
            &export::shorts_score_rows(&scores),
            &self.layout.shorts_scores_csv(),
        )?;

        // Candidates
        let mut by_id: HashMap<&str, &Paper> = HashMap::new();
        for p in papers {
            by_id.entry(p.id.as_str()).or_insert(p);
        }
        let mut candidates: Vec<ShortsCandidate> = filter_by_verdict(&scores, shorts.include_mid)
            .into_iter()
            .filter_map(|r| {
                let paper = by_id.get(r.paper_id.as_str())?;
                let score = r.payload()?;
                Some(ShortsCandidate {
                    paper: (*paper).clone(),
                    score: score.clone(),
                })
            })
            .collect();
        if let Some(limit) = limit {
            candidates.truncate(limit);
        }
        info!(
            candidates = candidates.len(),
            include_mid = shorts.include_mid,
            "Shorts candidates selected"
        );
        if candidates.is_empty() {
            report.skip("shorts_copy", "no adopted papers");
            report.skip("shorts_script", "no adopted papers");
            return Ok(report);
        }

        // Copy and narration
        let annotator = build_annotator(
            generator.clone(),
            ShortsCopySchema,
            prompts.shorts_copy.as_deref(),
            &self.config_dir,
        )?;
        let copy_pacer: Arc<dyn Pacer> =
            Arc::new(FixedDelay(Duration::from_millis(shorts.copy_delay_ms)));
        let copies = AnnotationPipeline::new(annotator, copy_pacer)
            .run(&candidates)
            .await;
        record_annotations(&mut report, "shorts_copy", &copies);
        save_json(&copies, &self.layout.shorts_copy_json())?;
        save_csv(
            export::COPY_COLUMNS,
            &export::copy_rows(&copies),
            &self.layout.shorts_copy_csv(),
        )?;

        let narration = NarrationScript::from_copies(&copies);
        save_csv(
            export::NARRATION_COLUMNS,
            &export::narration_rows(&narration),
            &self.layout.narration_csv(),
        )?;
        report.record(StageReport::new("narration", copies.len(), narration.len()));

        // Scripts
        let annotator = build_annotator(
            generator.clone(),
            ShortsScriptSchema,
            prompts.shorts_script.as_deref(),
            &self.config_dir,
        )?;
        let scripts = AnnotationPipeline::new(annotator, self.pacer.clone())
            .run(&candidates)
            .await;
        record_annotations(&mut report, "shorts_script", &scripts);
        save_json(&scripts, &self.layout.scripts_json())?;

        Ok(report)
    }
}

fn record_annotations<T>(
    report: &mut RunReport,
    stage: &'static str,
    results: &[AnnotationResult<T>],
) {
    let succeeded = results.iter().filter(|r| r.is_success()).count();
    report.record(StageReport::new(stage, results.len(), succeeded));
}
