#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

/// Message template editor with live `{{variable}}` highlighting and
/// autocomplete.
#[derive(Parser, Debug)]
#[command(name = "template-pad", version, about)]
struct Cli {
    /// Open the stored template with this id.
    #[arg(long = "template-id")]
    template_id: Option<String>,

    /// Start a new template with this body.
    #[arg(long, conflicts_with = "template_id")]
    seed: Option<String>,

    /// Variable catalog (JSON array of {name, description}).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Config file to use instead of the one next to the executable.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the template store (overrides TEMPLATE_PAD_DATA_DIR).
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting template-pad");

    let startup_args = template_pad_ui::StartupArgs {
        template_id: cli.template_id,
        seed: cli.seed,
        catalog: cli.catalog,
        config_path: cli.config,
        data_dir: cli.data_dir,
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([480.0, 320.0])
            .with_title("template-pad"),
        ..Default::default()
    };

    eframe::run_native(
        "template-pad",
        native_options,
        Box::new(move |cc| Ok(Box::new(template_pad_ui::App::new(cc, startup_args)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
