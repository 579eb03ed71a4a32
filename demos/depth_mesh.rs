//! Depth mesh reconstruction example
//!
//! Steps a synthetic depth session with the depth mesh effect active and
//! reports the reconstructed mesh.
//!
//! Usage:
//!   cargo run --example depth_mesh -- [width] [height]

use glam::Vec3;
use sense::app::{Effect, SessionConfig, SessionManager, StepOutcome};
use sense::capture::SyntheticSource;
use sense::data::{BorderPolicy, DepthGrid, MeshScale, build_mesh};
use std::error::Error;
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let width = args.next().map(|s| s.parse()).transpose()?.unwrap_or(160);
    let height = args.next().map(|s| s.parse()).transpose()?.unwrap_or(120);

    // One-off reconstruction straight from a grid
    let grid = DepthGrid::from_fn(width, height, |x, y| {
        ((x as f32 / width as f32) + (y as f32 / height as f32)) * 0.5
    });
    let mesh = build_mesh(&grid, MeshScale::REFERENCE, BorderPolicy::ClampToEdge)?;
    info!(
        "Ramp mesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    // The same reconstruction driven frame by frame through a session
    let source = SyntheticSource::with_resolution(width, height)
        .frame_limit(30)
        .drop_every(7)
        .gesture_at(20, "thumb_down");
    let config = SessionConfig::default().with_initial_effect(Effect::DepthMesh);
    let mut manager = SessionManager::init(source, config)?;

    loop {
        match manager.step() {
            Ok(StepOutcome::Processed(report)) if report.mesh_rebuilt => {
                let (min, max) = manager
                    .mesh()
                    .vertices
                    .iter()
                    .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), v| {
                        (lo.min(*v), hi.max(*v))
                    });
                info!(
                    "Frame {}: mesh bounds {:?} .. {:?}",
                    report.frame_number, min, max
                );
            }
            Ok(_) => {}
            Err(e) if e.is_stream_end() => break,
            Err(e) => return Err(e.into()),
        }
    }

    let stats = manager.shutdown();
    info!(
        "Session finished: {} frames, {} skipped, {} meshes built",
        stats.processed, stats.skipped, stats.meshes_built
    );
    Ok(())
}
