use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use refurboard::calib::RefurboardConfig;
use refurboard::core::PixelCoordinate;
use serde_json::json;

/// IR whiteboard calibration and tracking tools.
#[derive(Debug, Parser)]
#[command(author, version, about = "Inspect refurboard configs and run the detector offline")]
struct Args {
    /// Log level for stderr output.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Emit `tracing` spans (filtered by RUST_LOG) instead of plain logs.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    tracing: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a default config unless one already exists.
    Init { config: PathBuf },
    /// Validate the stored calibration and print the mapping.
    Check { config: PathBuf },
    /// Project one camera pixel onto the screen.
    Project {
        config: PathBuf,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Run the blob detector on an image file.
    #[cfg(feature = "image")]
    Detect { config: PathBuf, image: PathBuf },
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    match &args.command {
        Command::Init { config } => init(config),
        Command::Check { config } => check(config),
        Command::Project { config, x, y } => project(config, PixelCoordinate::new(*x, *y)),
        #[cfg(feature = "image")]
        Command::Detect { config, image } => detect(config, image),
    }
}

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "tracing")]
    if args.tracing {
        refurboard::core::init_tracing(false);
        return Ok(());
    }
    refurboard::core::init_with_level(args.log_level.into())?;
    Ok(())
}

fn init(path: &Path) -> Result<(), Box<dyn Error>> {
    let existed = path.exists();
    RefurboardConfig::load_or_default(path)?;
    if existed {
        println!("config already present at {}", path.display());
    } else {
        println!("wrote default config to {}", path.display());
    }
    Ok(())
}

fn check(path: &Path) -> Result<(), Box<dyn Error>> {
    let cfg = RefurboardConfig::load_json(path)?;
    let mapping = cfg
        .build_mapping()
        .map_err(|e| format!("calibration invalid: {e}"))?;
    let bounds = mapping.screen_bounds();

    println!("calibration ok: {}x{} screen", bounds.width, bounds.height);
    let m = mapping.matrix();
    for row in m.chunks(3) {
        println!("  [{:>14.6} {:>14.6} {:>14.6}]", row[0], row[1], row[2]);
    }
    println!("reprojection error: {:.4} px", mapping.reprojection_error());
    if let Some(orientation) = cfg.calibration.as_ref().and_then(|p| p.camera_orientation) {
        println!("camera orientation: {} deg", orientation.degrees());
    }
    Ok(())
}

fn project(path: &Path, camera: PixelCoordinate) -> Result<(), Box<dyn Error>> {
    let cfg = RefurboardConfig::load_json(path)?;
    let mapping = cfg
        .build_mapping()
        .map_err(|e| format!("calibration invalid: {e}"))?;

    let (Some(screen), Some(normalized)) = (
        mapping.try_project(camera),
        mapping.try_project_normalized(camera),
    ) else {
        return Err(format!(
            "projection undefined for camera pixel ({}, {})",
            camera.x, camera.y
        )
        .into());
    };

    let out = json!({
        "camera_pixel": camera,
        "screen_pixel": screen,
        "screen_normalized": normalized,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

#[cfg(feature = "image")]
fn detect(config: &Path, image: &Path) -> Result<(), Box<dyn Error>> {
    use refurboard::detect::BlobSelector;

    let cfg = RefurboardConfig::load_json(config)?;
    let detector = cfg.build_detector()?;
    let frame = refurboard::frames::load_bgra_frame(image)?;
    let blobs = detector.detect(&frame.view())?;
    let selected = BlobSelector::default().select(&blobs).copied();

    let out = json!({
        "width": frame.width,
        "height": frame.height,
        "threshold": detector.params().threshold,
        "blobs": blobs,
        "selected": selected,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
