mod api;
mod cli;
mod commands;
mod config;
mod error;
mod peer;
mod session;
mod ui;
mod video;

use clap::Parser;
use cli::Cli;
use commands::run_prompt;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub use api::{HttpBackend, ScreenPayload, SessionBackend};
pub use config::{ConfigError, ViewerConfig};
pub use error::{Result, ViewerError};
pub use peer::{PeerFactory, RtcPeerFactory, ScreenPeer};
pub use session::{SessionController, SessionPhase, ToggleOutcome};
pub use ui::{ConsoleSurface, ScreenOption, SurfaceState, ToggleLabel, ViewerSurface};
pub use video::{AttachedStream, RemoteVideo, VideoPacketSender, VideoStats};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Viewer(#[from] ViewerError),
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn run() -> std::result::Result<(), RunError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .init();

    let config_path = cli.config_path();
    let mut config = ViewerConfig::load(&config_path)?;
    cli.apply(&mut config);
    if cli.save_config {
        config.save(&config_path)?;
    }

    tracing::info!("Viewing screens from {}", config.server_url);

    let backend = Arc::new(HttpBackend::new(&config)?);
    let peers = Arc::new(RtcPeerFactory::new(&config));
    let surface = Arc::new(ConsoleSurface::new());
    let controller = Arc::new(SessionController::new(backend, peers, surface.clone()));

    // A failed load is already on screen; the prompt stays usable
    let loaded = controller.load_screens().await.is_ok();

    if let Some(screen) = cli.screen {
        controller.select_screen(&screen.to_string())?;
    }
    if cli.autostart && loaded {
        match controller.toggle().await {
            Ok(outcome) => tracing::debug!("Autostart: {:?}", outcome),
            Err(e) => tracing::debug!("Autostart failed: {}", e),
        }
    }

    run_prompt(controller, surface).await?;
    Ok(())
}
