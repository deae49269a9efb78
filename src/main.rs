mod app;
mod collaborator;
mod config;
mod controller;
mod event;
mod journal;
mod theme;

use app::JournalApp;
use chrono::Local;
use clap::Parser;
use collaborator::GeminiClient;
use config::JournalConfig;
use controller::SessionController;
use eframe::egui;
use journal::store::{FileStorage, LogStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Daily five-prompt journal with AI reflection.
#[derive(Parser, Debug)]
#[command(name = "mindful")]
struct Args {
    /// Directory holding the journal file
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Extra TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn,mindful=info",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let mut config = JournalConfig::load(args.config.as_deref())?;
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = Some(data_dir);
    }
    let data_dir = config.storage.resolved_data_dir();
    info!(data_dir = %data_dir.display(), model = %config.gemini.model, "starting mindful");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("mindful-runtime")
        .build()?;

    let collaborator = GeminiClient::new(config.gemini)?;
    let today = Local::now().date_naive();
    let store = LogStore::initialize(FileStorage::new(data_dir), today);
    let controller =
        SessionController::new(store, Arc::new(collaborator), runtime.handle().clone(), today);
    let app = JournalApp::new(controller);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Mindful Journal")
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([760.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Mindful Journal",
        native_options,
        Box::new(move |creation_context| {
            app.install_theme(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
