//! lumen-viewer: load a `.obj` scene, fill a framebuffer, show it in a window.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use lumen_engine::framebuffer::FrameBuffer;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::time::FrameTime;
use lumen_engine::window::Runtime;
use lumen_obj::Scene;

mod app;
mod config;
mod fill;
mod snapshot;

use app::ViewerApp;
use config::ViewerConfig;
use fill::{FrameFill, GradientFill};

/// Largest accepted framebuffer side. Matches wgpu's default
/// `max_texture_dimension_2d`.
const MAX_DIMENSION: i64 = 8192;

#[derive(Parser, Debug)]
#[command(name = "lumen-viewer")]
#[command(version, about = "Load a WaveFront .obj scene and display its framebuffer")]
pub struct Cli {
    /// Path to the `.obj` file.
    pub path: PathBuf,

    /// Framebuffer width in pixels.
    #[arg(long, default_value_t = 320, value_parser = clap::value_parser!(u32).range(1..=MAX_DIMENSION))]
    pub width: u32,

    /// Framebuffer height in pixels.
    #[arg(long, default_value_t = 240, value_parser = clap::value_parser!(u32).range(1..=MAX_DIMENSION))]
    pub height: u32,

    /// Window title. Defaults to the file name.
    #[arg(long)]
    pub title: Option<String>,

    /// Log filter (env_logger syntax). Overrides `RUST_LOG`.
    #[arg(long = "log", value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Present without waiting for vertical sync.
    #[arg(long)]
    pub no_vsync: bool,

    /// Write the first filled frame to an image (.png or .ppm).
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Fill one frame, write the snapshot and exit without opening a window.
    #[arg(long, requires = "snapshot")]
    pub headless: bool,

    /// On a load error, log it and continue with an empty scene.
    #[arg(long)]
    pub keep_going: bool,
}

fn main() -> ExitCode {
    let config = ViewerConfig::from(Cli::parse());

    init_logging(LoggingConfig {
        filter: config.log_filter.clone(),
        ..LoggingConfig::default()
    });

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: ViewerConfig) -> Result<()> {
    // Fail on a bad snapshot path before loading or opening a window.
    if let Some(path) = config.snapshot.as_deref() {
        snapshot::format_for(path)?;
    }

    let scene = load_scene(&config)?;
    let mut frame = FrameBuffer::new(config.width, config.height)?;

    if config.headless {
        return render_headless(&config, &scene, &mut frame);
    }

    let app = ViewerApp::new(scene, frame, GradientFill, config.snapshot.clone());
    Runtime::run(config.runtime(), config.gpu_init(), app)
}

fn load_scene(config: &ViewerConfig) -> Result<Scene> {
    match lumen_obj::load(&config.path) {
        Ok(scene) => Ok(scene),
        Err(e) if config.keep_going => {
            log::warn!("{e}; continuing with an empty scene");
            Ok(Scene::default())
        }
        Err(e) => Err(e.into()),
    }
}

fn render_headless(config: &ViewerConfig, scene: &Scene, frame: &mut FrameBuffer) -> Result<()> {
    let Some(path) = config.snapshot.as_deref() else {
        anyhow::bail!("--headless requires --snapshot");
    };

    GradientFill.fill(scene, frame, FrameTime::first());
    snapshot::save(frame, path)?;
    log::info!("wrote {}x{} snapshot to {}", frame.width(), frame.height(), path.display());
    Ok(())
}
