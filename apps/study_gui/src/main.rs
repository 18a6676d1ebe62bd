mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::controller::events::UiEvent;
use crate::ui::{StartupConfig, StudyGuiApp};

#[derive(Parser, Debug)]
#[command(name = "study_gui", about = "Desktop front-end for the PDF study service")]
struct Args {
    /// Overrides `service_url` from study.toml and the environment.
    #[arg(long)]
    service_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.service_url {
        settings.service_url = url;
    }
    let startup = StartupConfig {
        service_url: settings.service_url.clone(),
    };
    tracing::info!(service_url = %startup.service_url, "starting study gui");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(cmd_rx, ui_tx, startup.service_url.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PDF Study")
            .with_inner_size([900.0, 760.0])
            .with_min_inner_size([560.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "PDF Study",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(StudyGuiApp::new(
                cmd_tx, ui_rx, startup, &settings,
            )))
        }),
    )
}
