use anyhow::bail;
use clap::Parser;
use shapescope_core::camera::{CameraSource, StillImageSource};
use shapescope_core::{App, Config, LoopControl};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Live HSV color segmentation with polygon shape labels.
#[derive(Parser, Debug)]
#[command(name = "shapescope", version)]
struct Args {
    /// Configuration file [default: config/default.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Camera index, overrides the configuration
    #[arg(short, long)]
    device: Option<u32>,

    /// Read frames from a still image instead of the camera
    #[arg(short, long)]
    image: Option<PathBuf>,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::load_default(),
    };
    let mut config = loaded.as_ref().ok().cloned().unwrap_or_default();

    init_tracing(&config.system.log_level);
    tracing::info!("shapescope waking up...");
    if let Err(e) = &loaded {
        tracing::warn!(error = %e, "Using default configuration");
    }

    if let Some(device) = args.device {
        config.camera.device_id = device;
    }

    let outcome = match &args.image {
        Some(path) => {
            let source = StillImageSource::open(path, config.camera.mirror)?;
            App::new(source, &config)?.run()
        }
        None => {
            let source = CameraSource::open(config.camera.device_id, config.camera.mirror)
                .inspect_err(|e| tracing::error!(error = %e, "camera unavailable"))?;
            App::new(source, &config)?.run()
        }
    };

    if outcome == LoopControl::DeviceError {
        bail!("frame source stopped delivering frames");
    }
    Ok(())
}
