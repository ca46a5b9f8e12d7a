use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use paperflow_common::file_config::LoggingConfig;
use paperflow_common::{load_config, AppConfig, FileConfig};
use paperflow_daily::provider::build_generator;
use paperflow_daily::{DailyRunner, RunOptions};
use paperflow_fetch::{ArxivClient, HttpTransport};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "paperflow", about = "Daily arXiv screening, translation and shorts pipeline")]
struct Cli {
    /// Path to config TOML file
    #[arg(long, default_value = "./config/paperflow.toml")]
    config: PathBuf,

    /// Target date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch metadata, download PDFs, screen, select and translate
    Run {
        #[arg(long)]
        skip_download: bool,
        /// Also run the shorts stages on today's papers
        #[arg(long)]
        with_shorts: bool,
    },
    /// Score saved metadata for shorts and generate copy and scripts
    Shorts {
        /// Keep at most this many adopted papers
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_found = cli.config.is_file();
    let config = if config_found {
        load_config(&cli.config)?
    } else {
        FileConfig::default()
    };
    init_tracing(&config.logging);

    if config_found {
        tracing::info!(config = %cli.config.display(), "Loaded config");
    } else {
        tracing::warn!(config = %cli.config.display(), "Config file not found, using defaults");
    }

    let secrets = AppConfig::from_env();
    let generator = build_generator(&config.provider, &secrets);
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let config_dir = cli
        .config
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let source = ArxivClient::new(&config.arxiv.base_url, config.arxiv.request_interval())?;
    let transport = HttpTransport::new(config.download.timeout())
        .context("Failed to build download client")?;

    let runner = DailyRunner::new(
        config,
        config_dir,
        date,
        Arc::new(source),
        Arc::new(transport),
        generator,
    );

    let report = match cli.command {
        Command::Run {
            skip_download,
            with_shorts,
        } => {
            runner
                .run(RunOptions {
                    skip_download,
                    with_shorts,
                })
                .await?
        }
        Command::Shorts { limit } => runner.shorts(limit).await?,
    };

    println!("{report}");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
