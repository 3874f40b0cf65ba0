//! Skitter - orbit camera and centipede sandbox
//!
//! Runs a headless session: the camera rig and the centipedes are driven by a
//! scripted stream of window events against an in-memory scene.

mod session;
mod settings;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use session::{demo_script, Session};
use settings::GameSettings;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Starting Skitter...");

    let first_run = !GameSettings::exists();
    let settings = GameSettings::load();
    if first_run {
        if let Err(e) = settings.save() {
            warn!("Failed to write default settings: {}", e);
        }
    }

    let mut session = Session::new(&settings, demo_script())?;
    let frames = settings.session.frames;
    let interval = settings.session.report_interval;

    for _ in 0..frames {
        session.step(settings.session.frame_delta)?;
        if interval > 0 && session.frame() % interval == 0 {
            session.report();
        }
    }

    session.report();
    let scene = session.finish();
    info!(
        "Session over after {} frames, {} nodes left attached",
        frames,
        scene.attached_count()
    );

    Ok(())
}
