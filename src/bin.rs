//! Binary entry point for `mailroom`.
//!
//! This module provides the command-line interface for mailroom with
//! options for configuration file paths, logging verbosity, and the email
//! input. It initializes the necessary components and runs one triage
//! batch.

use clap::Parser;
use mailroom::base::{
    config::Config,
    types::{Email, Void},
};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Mailroom – a multi-agent email triage helper.
///
/// Configuration can come from `config.toml` or environment variables
/// (prefixed `MAILROOM_`). Without `--emails`, the built-in sample inbox
/// is triaged.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, mailroom will look for a config file at
    /// `.hidden/config.toml` in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Path to a JSON file containing an array of emails to triage
    /// (optional; defaults to the built-in samples).
    #[arg(short, long)]
    emails: Option<std::path::PathBuf>,
    /// Write the triage results as pretty JSON to this path (optional).
    #[arg(short, long)]
    output: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Main entry point for the mailroom binary.
///
/// Sets up logging based on verbosity, loads configuration (missing
/// credentials fail here, before any email is touched), and runs the
/// batch.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stdout = tracing_subscriber::fmt::layer()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    // Prepare the otlp layer.

    let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
    let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("mailroom");
    let otel = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).init();

    let config = Config::load(args.config.as_deref())?;

    // Load the inbox.

    let emails: Vec<Email> = match &args.emails {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => mailroom::triage::samples::sample_emails(),
    };

    let results = mailroom::start(config, emails).await?;

    if let Some(path) = &args.output {
        std::fs::write(path, serde_json::to_string_pretty(&results)?)?;
    }

    Ok(())
}
