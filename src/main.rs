//! AQI Dashboard CLI
//!
//! Command-line front end for the dashboard:
//! - Show the dashboard once
//! - Watch it live with periodic refresh
//! - Probe the backend endpoints
//! - Generate a config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use aqi_dashboard::api::{AqiClient, Endpoint};
use aqi_dashboard::config::{self, Config};
use aqi_dashboard::controller::DashboardController;
use aqi_dashboard::model::Zone;
use aqi_dashboard::render::{self, DashboardView, SvgChart};
use aqi_dashboard::state::{DashboardSnapshot, DashboardStore};

#[derive(Parser)]
#[command(name = "aqi-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal dashboard for current, historical and predicted AQI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: first of the standard locations that exists)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show timestamps in UTC instead of local time
    #[arg(long, global = true)]
    pub utc: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load everything once and print the dashboard
    Show {
        /// List every historical point below the chart
        #[arg(long)]
        points: bool,
        /// Also write the historical chart as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Redraw on every change and refresh periodically
    Watch {
        /// Refresh interval in seconds (0 disables refresh)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Request each endpoint once and report the outcome
    Probe,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Show {
        points: false,
        svg: None,
    });

    if let Commands::Config { output } = &command {
        write_default_config(output.as_ref())?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if cli.utc {
        config.display.timezone = Zone::Utc;
    }
    if let Commands::Watch {
        interval: Some(secs),
    } = &command
    {
        config.refresh.interval_secs = *secs;
    }
    config.validate()?;

    aqi_dashboard::logging::init(&config.logging)?;
    tracing::debug!(base_url = %config.api.base_url, "AQI Dashboard v{}", env!("CARGO_PKG_VERSION"));

    let client = AqiClient::new(config.client_config())?;

    match command {
        Commands::Show { points, svg } => show(client, &config, cli.format, points, svg).await,
        Commands::Watch { .. } => watch(client, &config, cli.format).await,
        Commands::Probe => probe(&client, cli.format).await,
        Commands::Config { .. } => Ok(ExitCode::SUCCESS),
    }
}

async fn show(
    client: AqiClient,
    config: &Config,
    format: OutputFormat,
    points: bool,
    svg: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let view = DashboardView::new(&config.display)?.with_points(points);
    let controller = DashboardController::new(Arc::new(client), DashboardStore::new());

    let snapshot = controller.load_settled().await;

    let stdout = std::io::stdout();
    match format {
        OutputFormat::Text => print!("{}", view.render(&snapshot)),
        OutputFormat::Json => render::write_json(&snapshot, stdout.lock())?,
        OutputFormat::Csv => render::write_csv(render::loaded_series(&snapshot)?, stdout.lock())?,
    }

    if let Some(path) = svg {
        let series = render::loaded_series(&snapshot)?;
        let chart = SvgChart::default().render(series, view.formatter());
        std::fs::write(&path, chart).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "SVG chart written");
    }

    let failed = snapshot.failed_slots();
    if failed.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!(?failed, "Some dashboard data is unavailable");
        Ok(ExitCode::FAILURE)
    }
}

async fn watch(client: AqiClient, config: &Config, format: OutputFormat) -> anyhow::Result<ExitCode> {
    if format == OutputFormat::Csv {
        bail!("watch supports text and json output only");
    }

    let view = DashboardView::new(&config.display)?;
    let controller = DashboardController::new(Arc::new(client), DashboardStore::new());

    let mut rx = controller.store().subscribe();
    let redraw = tokio::spawn(async move {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            let drawn = draw(&mut std::io::stdout().lock(), &view, &snapshot, format);
            if let Err(e) = drawn {
                tracing::error!(error = %e, "Failed to draw dashboard");
                break;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    });

    controller.run(config.refresh.interval(), shutdown_signal()).await;
    redraw.abort();

    Ok(ExitCode::SUCCESS)
}

fn draw<W: Write>(
    out: &mut W,
    view: &DashboardView,
    snapshot: &DashboardSnapshot,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, snapshot)?;
            writeln!(out)?;
        }
        _ => {
            execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
            write!(out, "{}", view.render(snapshot))?;
        }
    }
    out.flush()?;
    Ok(())
}

async fn probe(client: &AqiClient, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let (current, historical, predict) = tokio::join!(
        client.probe(Endpoint::Current),
        client.probe(Endpoint::Historical),
        client.probe(Endpoint::Predict)
    );
    let reports = [current, historical, predict];

    match format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = reports
                .iter()
                .map(|r| {
                    let outcome = match &r.outcome {
                        Ok(summary) => summary,
                        Err(reason) => reason,
                    };
                    serde_json::json!({
                        "endpoint": r.endpoint.path(),
                        "status": r.status,
                        "latency_ms": r.latency.as_millis() as u64,
                        "ok": r.is_ok(),
                        "outcome": outcome,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        _ => {
            println!("{:<18} {:>6} {:>10}  Outcome", "Endpoint", "Status", "Latency");
            println!("{}", "-".repeat(60));
            for r in &reports {
                let status = r.status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
                let outcome = match &r.outcome {
                    Ok(summary) => format!("ok: {}", summary),
                    Err(reason) => format!("FAILED: {}", reason),
                };
                println!(
                    "{:<18} {:>6} {:>8}ms  {}",
                    r.endpoint.path(),
                    status,
                    r.latency.as_millis(),
                    outcome
                );
            }
        }
    }

    if reports.iter().all(|r| r.is_ok()) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let content = config::generate_default_config();

    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &content)?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping");
}
