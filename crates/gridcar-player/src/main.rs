/// gridcar: a single car wandering a tiled grid
///
/// Architecture:
///   assets/: image decoding, generated fallbacks, background loader thread
///   engine/: software canvas, window loop, headless runner

mod assets;
mod engine;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use gridcar_common::AppConfig;
use gridcar_sim::{ImageId, RecordingSurface, SceneImages, Simulation};
use tracing_subscriber::EnvFilter;

use assets::{AssetLoader, AssetRequest, Fallback, ImageStore};
use engine::canvas::Canvas;

const DEFAULT_CONFIG: &str = "gridcar.toml";

const IMAGES: SceneImages = SceneImages {
    background: ImageId(0),
    car: ImageId(1),
};

#[derive(Parser, Debug)]
#[command(name = "gridcar", version, about = "A car wandering a tiled grid")]
struct Args {
    /// TOML config file (defaults to ./gridcar.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in tiles
    #[arg(long)]
    width: Option<u32>,

    /// Grid height in tiles
    #[arg(long)]
    height: Option<u32>,

    /// Tile edge length in pixels
    #[arg(long)]
    tile_size: Option<f32>,

    /// Simulation updates per second
    #[arg(long)]
    fps: Option<f64>,

    /// Ticks the car needs to reach each target
    #[arg(long)]
    speed: Option<u32>,

    /// Seed for the maneuver RNG
    #[arg(long)]
    seed: Option<u64>,

    /// Run this many updates without a window, then exit
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, source) = resolve_config(&args)?;

    let level = args.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log filter '{}'", level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("gridcar v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        Some(path) => tracing::info!("Config: {}", path.display()),
        None => tracing::info!("Config: built-in defaults"),
    }

    if let Some(ticks) = args.headless {
        let surface = RecordingSurface::with_ready(&[IMAGES.background, IMAGES.car]);
        let sim = Simulation::from_config(&config.sim, IMAGES, surface, 0.0)
            .context("Failed to build simulation")?;
        return engine::run_headless(sim, ticks);
    }

    let loader = AssetLoader::spawn(vec![
        AssetRequest {
            id: IMAGES.background,
            path: config.assets.background.clone(),
            fallback: Fallback::Background,
        },
        AssetRequest {
            id: IMAGES.car,
            path: config.assets.car.clone(),
            fallback: Fallback::Car,
        },
    ])?;

    let (w, h) = config.sim.pixel_size();
    let canvas = Canvas::new(w.ceil() as usize, h.ceil() as usize, ImageStore::new());
    let sim = Simulation::from_config(&config.sim, IMAGES, canvas, 0.0)
        .context("Failed to build simulation")?;

    engine::run(sim, loader)
}

/// Load the config file (explicit, or ./gridcar.toml if it exists), then
/// apply command-line overrides. Returns the file used, if any.
fn resolve_config(args: &Args) -> Result<(AppConfig, Option<PathBuf>)> {
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => Some(PathBuf::from(DEFAULT_CONFIG)).filter(|p| p.is_file()),
    };

    let mut config = match &path {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    let sim = &mut config.sim;
    if let Some(width) = args.width {
        sim.grid_width = width;
    }
    if let Some(height) = args.height {
        sim.grid_height = height;
    }
    if let Some(tile_size) = args.tile_size {
        sim.tile_size = tile_size;
    }
    if let Some(fps) = args.fps {
        sim.target_fps = fps;
    }
    if let Some(speed) = args.speed {
        sim.car_speed = speed;
    }
    if args.seed.is_some() {
        sim.seed = args.seed;
    }
    sim.validate().context("Invalid simulation settings")?;

    Ok((config, path))
}

fn load_config(path: &Path) -> Result<AppConfig> {
    AppConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let args = Args::parse_from([
            "gridcar", "--width", "8", "--height", "3", "--speed", "10", "--seed", "5",
        ]);
        let (config, _) = resolve_config(&args).unwrap();
        assert_eq!(config.sim.grid_width, 8);
        assert_eq!(config.sim.grid_height, 3);
        assert_eq!(config.sim.car_speed, 10);
        assert_eq!(config.sim.seed, Some(5));
        assert_eq!(config.sim.tile_size, 150.0);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = Args::parse_from(["gridcar", "--speed", "0"]);
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn oversized_playfield_is_rejected() {
        let args = Args::parse_from(["gridcar", "--tile-size", "1e20"]);
        let err = resolve_config(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("exceeds"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let args = Args::parse_from(["gridcar", "--config", "/nonexistent/gridcar.toml"]);
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn headless_flag_parses() {
        let args = Args::parse_from(["gridcar", "--headless", "500", "--log-level", "debug"]);
        assert_eq!(args.headless, Some(500));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
