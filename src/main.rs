//! Sales Dashboard - Interactive viewer for sales representative data
//!
//! Loads a workbook of representatives and shows tables, charts and
//! per-representative metrics filtered by region.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use sales_dashboard::config::{ConfigOverrides, DashboardConfig};
use sales_dashboard::gui::DashboardApp;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sales_dashboard", version, about = "Dashboard de Vendedores")]
struct Cli {
    /// Spreadsheet with the representative records (default: vendedores.xlsx)
    data: Option<PathBuf>,

    /// JSON config file (default: dashboard.json when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worksheet to read instead of the first one
    #[arg(short, long)]
    sheet: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = DashboardConfig::resolve(
        cli.config.as_deref(),
        ConfigOverrides {
            data_path: cli.data,
            sheet: cli.sheet,
        },
    )
    .context("failed to load configuration")?;
    info!("Starting dashboard with {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([900.0, 600.0])
            .with_title("Dashboard de Vendedores"),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard de Vendedores",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("window error: {e}"))
}
