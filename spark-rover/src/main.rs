#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use spark_media::capture::ImageSequence;
use spark_rover::config::RoverConfig;
use spark_rover::control::UdpConnector;
use spark_rover::log_init;
use spark_rover::presentation::StatusBoard;
use spark_rover::server::{serve, ControlState};
use spark_rover::session::{PilotSession, SessionEvent};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "spark-rover", about = "Camera-guided line-following rover controller")]
struct Args {
    /// JSON configuration file. Missing file means defaults.
    #[arg(long, default_value = "rover.json")]
    config: PathBuf,

    /// Directory of frames to play back as the camera.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Address for the HTTP control surface.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    log_init();
    let args = Args::parse();

    let mut config = RoverConfig::load_json(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(frames) = args.frames {
        config.capture.frames_dir = frames;
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let board = StatusBoard::new();
    let source = ImageSequence::new(config.capture.frames_dir.clone());
    let (session, handle) = PilotSession::new(&config, source, UdpConnector, Arc::new(board.clone()));
    let pilot = tokio::spawn(session.run());
    info!("Pilot session started, frames from {}", config.capture.frames_dir.display());

    let state = ControlState {
        session: handle.clone(),
        board,
    };
    if let Err(e) = serve(&config.server.bind, state).await {
        error!("Control surface failed: {}", e);
    }

    let _ = handle.send(SessionEvent::Shutdown).await;
    pilot.await?;
    info!("Shut down");
    Ok(())
}
