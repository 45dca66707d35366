//! CLI entry point for the airwatch sensor dashboard tool.
//!
//! Provides subcommands for one-shot fetches, a polling watch loop, and
//! direct comfort scoring of a temperature/humidity pair.

use airwatch::comfort;
use airwatch::fetch::{BasicClient, fetch_payload};
use airwatch::output::append_record;
use airwatch::parser::{self, MisconfiguredEndpoint, Payload};
use airwatch::readings::TimeWindow;
use airwatch::state::{AppState, render};
use airwatch::summary::DashboardSummary;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "airwatch")]
#[command(about = "A tool to watch temperature/humidity sensor feeds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and summarize a sensor feed once, from a file or URL
    Fetch {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// CSV file to append the snapshot to
        #[arg(short, long, default_value = "data.csv")]
        output: String,

        /// Recency window applied before rendering
        #[arg(short, long, value_enum, default_value_t = TimeWindow::LastHour)]
        window: TimeWindow,
    },
    /// Poll a sensor feed on a fixed cadence
    Watch {
        /// URL to poll (defaults to the SENSOR_FEED_URL environment variable)
        #[arg(value_name = "URL")]
        source: Option<String>,

        /// Sample rate: query the feed every X seconds
        #[arg(short = 'r', long, default_value_t = 60)]
        sample_rate: u64,

        /// Number of samples to collect (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 0)]
        num_samples: usize,

        /// CSV file to append snapshots to
        #[arg(short, long, default_value = "data.csv")]
        output: String,

        /// Recency window applied before rendering
        #[arg(short, long, value_enum, default_value_t = TimeWindow::LastHour)]
        window: TimeWindow,
    },
    /// Score a single temperature/humidity pair
    Score {
        /// Temperature in degrees Celsius
        #[arg(allow_negative_numbers = true)]
        temperature: f64,

        /// Relative humidity in percent
        humidity: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/airwatch.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("airwatch.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            source,
            output,
            window,
        } => {
            let mut state = AppState::new(window);
            poll_once(&source, &output, &mut state).await?;
        }
        Commands::Watch {
            source,
            sample_rate,
            num_samples,
            output,
            window,
        } => {
            let source = source
                .or_else(|| std::env::var("SENSOR_FEED_URL").ok())
                .context("no URL given and SENSOR_FEED_URL is not set")?;
            watch(&source, sample_rate, num_samples, &output, window).await?;
        }
        Commands::Score {
            temperature,
            humidity,
        } => {
            let assessment = comfort::assess(Some(temperature), Some(humidity));
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
    }

    Ok(())
}

/// Loads feed data from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %source))]
async fn fetcher(source: &str) -> Result<Payload> {
    let payload = if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_payload(&client, source).await?
    } else {
        Payload::Text(std::fs::read_to_string(source)?)
    };
    Ok(payload)
}

/// One fetch-normalize-render cycle. On success the state's rows are
/// replaced wholesale before rendering reads them; on failure the prior
/// snapshot stays on display and an error record goes to the CSV log.
async fn poll_once(source: &str, output: &str, state: &mut AppState) -> Result<()> {
    match fetcher(source).await {
        Ok(payload) => match parser::normalize(&payload) {
            Ok(rows) => {
                if rows.is_empty() {
                    warn!("Feed returned no valid rows");
                }
                state.replace_rows(rows);
                render(state);

                let summary = state.summary();
                append_record(output, &summary)?;
            }
            Err(e) => {
                if let Some(sentinel) = e.downcast_ref::<MisconfiguredEndpoint>() {
                    error!(error = %sentinel, "Endpoint is misconfigured, not empty; deploy a read-capable script");
                } else {
                    error!(error = %e, "Payload normalization failed");
                }
                let error_summary = DashboardSummary::from_error("format_error", &e.to_string());
                append_record(output, &error_summary)?;
                // keep prior rows on display
                render(state);
            }
        },
        Err(e) => {
            error!(error = %e, "Feed fetch failed");
            let error_summary = DashboardSummary::from_error("fetch_error", &e.to_string());
            append_record(output, &error_summary)?;
            render(state);
        }
    }
    Ok(())
}

/// Polls the feed sequentially at a fixed cadence.
///
/// Cycles never overlap: the next tick is scheduled only after the current
/// fetch-normalize-render completes, so the last successful poll always
/// wins and no sequencing token is needed.
#[tracing::instrument(skip(window), fields(sample_rate, num_samples))]
async fn watch(
    source: &str,
    sample_rate: u64,
    num_samples: usize,
    output: &str,
    window: TimeWindow,
) -> Result<()> {
    if num_samples == 0 {
        info!(sample_rate, "Sampling infinitely. Press Ctrl+C to stop.");
    } else {
        info!(num_samples, sample_rate, "Starting sample collection");
    }

    let mut state = AppState::new(window);
    let mut sample_count = 0;

    loop {
        if num_samples > 0 && sample_count >= num_samples {
            break;
        }
        sample_count += 1;

        info!(
            sample = sample_count,
            total = if num_samples == 0 {
                None
            } else {
                Some(num_samples)
            },
            "Starting sample round"
        );

        if let Err(e) = poll_once(source, output, &mut state).await {
            error!(error = %e, "Failed to record sample");
        }

        if num_samples == 0 || sample_count < num_samples {
            tokio::time::sleep(tokio::time::Duration::from_secs(sample_rate)).await;
        }
    }

    info!(output, "Finished watching feed");
    Ok(())
}
