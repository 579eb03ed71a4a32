//! Command line session loop.

use crate::Args;
use image::GrayImage;
use sense_app::{
    CpuSmoothing, PostPass, SessionConfig, SessionError, SessionManager, StepOutcome,
};
use sense_capture::{DepthSource, ImageSequenceSource, SyntheticSource};
use tracing::{info, warn};

/// Parse a scripted gesture given as `TICK:NAME`.
pub fn parse_gesture(s: &str) -> Result<(u64, String), String> {
    let (tick, name) = s
        .split_once(':')
        .ok_or_else(|| format!("expected TICK:NAME, got '{}'", s))?;
    let tick = tick
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid tick '{}': {}", tick, e))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("gesture name is empty".to_string());
    }
    Ok((tick, name.to_string()))
}

pub fn run(args: &Args) -> Result<(), SessionError> {
    let config = SessionConfig::default()
        .with_initial_effect(args.effect)
        .with_border(args.border.into())
        .with_gesture_cooldown(args.cooldown);

    match &args.frames {
        Some(dir) => {
            if !args.gestures.is_empty() || args.drop_every.is_some() {
                warn!("--gesture and --drop-every only apply to the synthetic source");
            }
            let source = ImageSequenceSource::open(dir)?;
            run_session(source, config, args)
        }
        None => {
            let mut source = SyntheticSource::with_resolution(args.width, args.height)
                .with_color(true)
                .hands(2);
            if let Some(n) = args.drop_every {
                source = source.drop_every(n);
            }
            for (tick, name) in &args.gestures {
                source = source.gesture_at(*tick, name.clone());
            }
            run_session(source, config, args)
        }
    }
}

fn run_session<S: DepthSource>(
    source: S,
    config: SessionConfig,
    args: &Args,
) -> Result<(), SessionError> {
    let mut manager = SessionManager::init(source, config)?;

    for _ in 0..args.steps {
        match manager.step() {
            Ok(StepOutcome::Processed(report)) => {
                for action in &report.actions {
                    info!("Frame {}: {:?}", report.frame_number, action);
                }
            }
            Ok(StepOutcome::Skipped) => {}
            Err(e) if e.is_stream_end() => {
                info!("Source exhausted");
                break;
            }
            Err(e) => return Err(e),
        }
    }

    if let Some(label) = manager.depth_label() {
        info!("{}", label);
    }

    if let Some(path) = &args.export {
        if manager.mesh().is_empty() {
            warn!("No depth mesh was built, nothing to export");
        } else {
            manager.mesh().write_json(path)?;
        }
    }

    if let Some(path) = &args.preview {
        match manager.display() {
            Some(display) => {
                let mut smoothed = GrayImage::new(display.width(), display.height());
                PostPass::default().apply(&mut CpuSmoothing::default(), display, &mut smoothed);
                smoothed.save(path)?;
                info!("Preview written to {}", path.display());
            }
            None => warn!("No frame was processed, nothing to preview"),
        }
    }

    let stats = manager.shutdown();
    info!(
        "Done: {} processed, {} skipped, {} meshes",
        stats.processed, stats.skipped, stats.meshes_built
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gesture() {
        assert_eq!(parse_gesture("30:thumb_down"), Ok((30, "thumb_down".to_string())));
        assert_eq!(parse_gesture(" 5 : v_sign "), Ok((5, "v_sign".to_string())));
        assert!(parse_gesture("thumb_down").is_err());
        assert!(parse_gesture("x:v_sign").is_err());
        assert!(parse_gesture("3:").is_err());
    }
}
