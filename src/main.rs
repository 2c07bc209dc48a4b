//! CLI entry point for the earthquake monitor.
//!
//! Provides subcommands for building the dashboard once from a feed URL or
//! a local GeoJSON file, and for refreshing it on a fixed interval.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use quake_monitor::{
    config,
    dashboard::{Dashboard, run_pipeline},
    error::QuakeError,
    fetch::{BasicClient, events_from_bytes},
    filter::{TimeWindow, WeekPolicy},
    output::{SummaryRecord, append_record, print_json, print_pretty, render},
};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "quake_monitor")]
#[command(about = "Summarize a live earthquake feed", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed once and render the dashboard
    Snapshot {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Re-run the whole pipeline on a fixed interval
    Watch {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Seconds between refreshes
        #[arg(short, long, default_value_t = config::REFRESH_INTERVAL_SECS)]
        interval_secs: u64,

        /// Number of refreshes to run (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 0)]
        refreshes: usize,
    },
}

#[derive(Args)]
struct PipelineArgs {
    /// Feed URL or path to a local GeoJSON file (defaults to $QUAKE_FEED_URL or the USGS weekly feed)
    #[arg(short, long, value_name = "FILE_OR_URL")]
    source: Option<String>,

    /// Recency window applied before aggregation
    #[arg(short, long, value_enum, default_value_t = TimeWindow::Last24h)]
    window: TimeWindow,

    /// Whether the 7d window filters or passes every event through
    #[arg(long, value_enum, default_value_t = WeekPolicy::Enforce)]
    week_policy: WeekPolicy,

    /// Log the full dashboard as JSON instead of the text panels
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Optional: CSV file to append one summary record per refresh to
    #[arg(short, long)]
    output: Option<String>,

    /// Timeout around the whole fetch, in seconds
    #[arg(long, default_value_t = config::FETCH_TIMEOUT_SECS)]
    timeout_secs: u64,
}

impl PipelineArgs {
    fn source(&self) -> String {
        self.source.clone().unwrap_or_else(config::feed_url)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/quake_monitor.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("quake_monitor.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Snapshot { pipeline } => {
            let dashboard = load_dashboard(&pipeline.source(), &pipeline).await?;
            show(&dashboard, &pipeline)?;
        }
        Commands::Watch {
            pipeline,
            interval_secs,
            refreshes,
        } => {
            watch(&pipeline, interval_secs, refreshes).await?;
        }
    }

    Ok(())
}

/// Builds one dashboard from a feed URL or a local file.
#[tracing::instrument(skip(args), fields(source = %source))]
async fn load_dashboard(source: &str, args: &PipelineArgs) -> Result<Dashboard> {
    let now = Utc::now();

    if source.starts_with("http") {
        let client = BasicClient::new();
        let pass = run_pipeline(&client, source, args.window, args.week_policy, now);
        let dashboard = tokio::time::timeout(Duration::from_secs(args.timeout_secs), pass)
            .await
            .with_context(|| format!("feed fetch timed out after {}s", args.timeout_secs))??;
        Ok(dashboard)
    } else {
        let bytes =
            std::fs::read(source).with_context(|| format!("failed to read feed file {source}"))?;
        let events = events_from_bytes(&bytes)?;
        Ok(Dashboard::build(&events, args.window, args.week_policy, now))
    }
}

/// Renders a dashboard and appends its summary record when requested.
fn show(dashboard: &Dashboard, args: &PipelineArgs) -> Result<()> {
    if args.json {
        print_json(dashboard)?;
    } else {
        render(dashboard);
        print_pretty(dashboard);
    }

    if let Some(path) = &args.output {
        append_record(path, &SummaryRecord::from_dashboard(dashboard))?;
    }
    Ok(())
}

/// Maps a failed pass onto a CSV error record.
fn error_record(err: &anyhow::Error) -> SummaryRecord {
    match err.downcast_ref::<QuakeError>() {
        Some(quake) => SummaryRecord::from_quake_error(Utc::now(), quake),
        None => SummaryRecord::from_error(Utc::now(), "pipeline_error", &format!("{err:#}")),
    }
}

/// Rebuilds the dashboard every `interval_secs`. A failed refresh is logged
/// and recorded; the last good dashboard stays the one on display.
#[tracing::instrument(skip(args), fields(interval_secs, refreshes))]
async fn watch(args: &PipelineArgs, interval_secs: u64, refreshes: usize) -> Result<()> {
    let source = args.source();
    let mut refresh_count = 0;
    let mut last_good: Option<Dashboard> = None;

    if refreshes == 0 {
        info!(interval_secs, "Refreshing indefinitely. Press Ctrl+C to stop.");
    } else {
        info!(refreshes, interval_secs, "Starting refresh loop");
    }

    loop {
        // Check if we've reached the refresh limit (0 = infinite)
        if refreshes > 0 && refresh_count >= refreshes {
            break;
        }
        refresh_count += 1;

        info!(refresh = refresh_count, "Refreshing dashboard");

        match load_dashboard(&source, args).await {
            Ok(dashboard) => {
                show(&dashboard, args)?;
                last_good = Some(dashboard);
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "Dashboard refresh failed");
                if let Some(previous) = &last_good {
                    warn!(
                        generated_at = %previous.generated_at,
                        "Keeping previous dashboard"
                    );
                }
                if let Some(path) = &args.output {
                    append_record(path, &error_record(&e))?;
                }
            }
        }

        if refreshes == 0 || refresh_count < refreshes {
            tokio::time::sleep(Duration::from_secs(interval_secs)).await;
        }
    }

    info!(refresh_count, "Finished refreshing");
    Ok(())
}
