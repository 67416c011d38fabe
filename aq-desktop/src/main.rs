//! AeroQuad Communicator
//!
//! Desktop ground station for AeroQuad flight controllers: connect over a
//! serial port, then switch between terminal, plotting, configuration,
//! firmware and route panels.

mod app;
mod host;
mod settings;

use app::CommunicatorApp;
use eframe::NativeOptions;
use settings::Settings;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum StartupError {
    #[error("failed to create tokio runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error(transparent)]
    Gui(#[from] eframe::Error),
}

fn main() -> Result<(), StartupError> {
    let settings = Settings::load();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting AeroQuad Communicator");

    let runtime = tokio::runtime::Runtime::new()?;

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("AeroQuad Communicator"),
        ..Default::default()
    };

    eframe::run_native(
        "AeroQuad Communicator",
        options,
        Box::new(move |cc| Ok(Box::new(CommunicatorApp::new(cc, settings, runtime)))),
    )?;
    Ok(())
}
