//! wfinspect - inspect a workflow process-instance snapshot
//!
//! Presents a snapshot the way the instance view would: headline, execution
//! markers on the diagram and the variable table.

use anyhow::{bail, Context, Result};
use clap::Parser;
use inspection_cli::{load_snapshot, InspectionReport};
use inspection_engine::{DiagramContainer, HeadlessFactory, InspectionConfig, InspectionSession};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// wfinspect CLI
#[derive(Parser)]
#[command(name = "wfinspect")]
#[command(about = "Inspect a workflow process-instance snapshot", long_about = None)]
#[command(version)]
struct Cli {
    /// Snapshot JSON file as returned by the workflow service
    snapshot: PathBuf,

    /// Configuration file path
    #[arg(short, long, env = "WFINSPECT_CONFIG")]
    config: Option<String>,

    /// Diagram container width
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Diagram container height
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Fit the diagram into view after loading (defaults to configuration)
    #[arg(long)]
    fit: Option<bool>,

    /// Copy the named variable's value to the system clipboard
    #[arg(long, value_name = "VARIABLE")]
    copy: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, env = "WFINSPECT_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "WFINSPECT_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout carries the report
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = InspectionConfig::load(cli.config.as_deref())?;
    let details = load_snapshot(&cli.snapshot)?;
    let fit_on_load = cli.fit.unwrap_or(config.renderer.fit_on_load);

    let container = DiagramContainer::new("wfinspect", cli.width, cli.height);
    let session: InspectionSession<HeadlessFactory> =
        InspectionSession::open(&config, &HeadlessFactory, Some(&container));

    let presented = session.present(details, fit_on_load).await;
    let report = InspectionReport::collect(&session, presented)?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to encode report")?
        );
    } else {
        print!("{}", report);
    }

    if let Some(name) = cli.copy.as_deref() {
        copy_variable(&session, name)?;
    }

    session.close();
    Ok(())
}

#[cfg(feature = "system-clipboard")]
fn copy_variable(session: &InspectionSession<HeadlessFactory>, name: &str) -> Result<()> {
    if session.copy_variable(name, &inspection_engine::SystemClipboard)? {
        tracing::info!(variable = %name, "Copied variable value to clipboard");
        Ok(())
    } else {
        bail!("Variable '{}' has no copyable value", name)
    }
}

#[cfg(not(feature = "system-clipboard"))]
fn copy_variable(_session: &InspectionSession<HeadlessFactory>, name: &str) -> Result<()> {
    bail!(
        "Cannot copy '{}': wfinspect was built without clipboard support",
        name
    )
}
