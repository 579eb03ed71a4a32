//! Sense
//!
//! Replays depth frames through a scene session: effect cycling, hand
//! placement, gesture handling and depth mesh reconstruction.

mod app;

use clap::{Parser, ValueEnum};
use sense_app::Effect;
use sense_data::BorderPolicy;
use std::path::PathBuf;

/// How the far border row and column of mesh vertices get their depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BorderArg {
    /// Reuse the nearest edge sample.
    Clamp,
    /// Place border vertices at depth zero.
    Zero,
}

impl From<BorderArg> for BorderPolicy {
    fn from(arg: BorderArg) -> Self {
        match arg {
            BorderArg::Clamp => BorderPolicy::ClampToEdge,
            BorderArg::Zero => BorderPolicy::Zero,
        }
    }
}

/// Sense - depth camera scene session
#[derive(Parser, Debug)]
#[command(name = "sense")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory of recorded depth images; a synthetic source is used if omitted
    #[arg(short, long)]
    frames: Option<PathBuf>,

    /// Synthetic source width
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Synthetic source height
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Number of frames to step
    #[arg(short, long, default_value_t = 90)]
    steps: u64,

    /// Initial effect (idle, sparkle, joint-trails, depth-mesh)
    #[arg(short, long, default_value = "depth-mesh")]
    effect: Effect,

    /// Border policy for mesh reconstruction
    #[arg(long, value_enum, default_value_t = BorderArg::Clamp)]
    border: BorderArg,

    /// Seconds between accepted gestures
    #[arg(long, default_value_t = sense_app::gesture::DEFAULT_COOLDOWN)]
    cooldown: f64,

    /// Scripted synthetic gesture, as TICK:NAME (e.g. 30:thumb_down)
    #[arg(long = "gesture", value_parser = app::parse_gesture)]
    gestures: Vec<(u64, String)>,

    /// Report every Nth synthetic frame as not ready
    #[arg(long)]
    drop_every: Option<u64>,

    /// Write the last reconstructed mesh as JSON
    #[arg(long)]
    export: Option<PathBuf>,

    /// Write the smoothed preview of the last frame as an image
    #[arg(long)]
    preview: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = app::run(&args) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
