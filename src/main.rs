//! CLI entry point for the feedback pulse tool.
//!
//! Provides one subcommand per feedback platform; each polls the platform,
//! folds per-entity metrics into a weekly summary, and writes a CSV.

use anyhow::Result;
use clap::{Parser, Subcommand};
use feedback_pulse::output::{self, RowSchema};
use feedback_pulse::platforms::{EtrustedClient, ZenloopClient};
use feedback_pulse::report::run_report;
use feedback_pulse::window::ReportWindow;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "feedback_pulse")]
#[command(about = "Polls customer-feedback platforms and writes a weekly CSV summary", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize eTrusted review channels (per-channel rows plus ALL)
    Etrusted {
        /// CSV file to write the summary to
        #[arg(short, long, default_value = "weekly_summary.csv")]
        output: String,

        /// Trailing window in days for the "new feedback" count
        #[arg(short, long, default_value_t = 7)]
        window_days: i64,

        /// Also log the row set as pretty JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Summarize Zenloop surveys (per-survey rows plus ALL)
    Zenloop {
        /// CSV file to write the summary to
        #[arg(short, long, default_value = "weekly_summary_zenloop_surveys.csv")]
        output: String,

        /// Trailing window in days for the "new feedback" count
        #[arg(short, long, default_value_t = 7)]
        window_days: i64,

        /// Also log the row set as pretty JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/feedback_pulse.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("feedback_pulse.log"));

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
        Commands::Etrusted {
            output,
            window_days,
            json,
        } => {
            let window = ReportWindow::trailing_days(window_days);
            info!(
                since = %window.since_rfc3339(),
                until = %window.until_rfc3339(),
                "Starting eTrusted run"
            );

            let client = EtrustedClient::connect_from_env().await?;
            let rows = run_report(&client, &window).await?;

            if json {
                output::print_json(&rows)?;
            }
            output::write_summary(&output, RowSchema::Aggregate, &rows)?;
        }
        Commands::Zenloop {
            output,
            window_days,
            json,
        } => {
            let window = ReportWindow::trailing_days(window_days);
            info!(
                since = %window.since_rfc3339(),
                until = %window.until_rfc3339(),
                "Starting Zenloop run"
            );

            let client = ZenloopClient::from_env()?;
            let rows = run_report(&client, &window).await?;

            if json {
                output::print_json(&rows)?;
            }
            output::write_summary(&output, RowSchema::Detail, &rows)?;
        }
    }

    Ok(())
}
