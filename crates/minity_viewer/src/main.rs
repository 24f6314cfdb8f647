// SPDX-License-Identifier: MIT OR Apache-2.0
//! Minity Viewer - headless keyframe animation driver
//!
//! Authors a short camera orbit around a demo model, plays it back for a
//! number of frames and logs the evaluated view state and part transforms.
//!
//! Usage: `minity_viewer [SETTINGS.ron] [FRAMES]`

mod scene;

use minity_keyframes::settings::SETTINGS_FILE_NAME;
use minity_keyframes::{AnimationSession, SettingsError, ViewerCommand, ViewerSettings};
use scene::Scene;
use std::f32::consts::TAU;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Frames played when no count is given
const DEFAULT_FRAME_COUNT: usize = 120;

/// Poses authored around the orbit
const ORBIT_POSES: usize = 5;

/// Viewer errors
#[derive(Debug, thiserror::Error)]
enum ViewerError {
    /// Settings file could not be used
    #[error("Failed to load settings: {0}")]
    Settings(#[from] SettingsError),

    /// Frame count argument is not a number
    #[error("Invalid frame count '{0}'")]
    InvalidFrameCount(String),
}

/// Command line arguments
#[derive(Debug, PartialEq)]
struct Args {
    settings_path: Option<PathBuf>,
    frames: usize,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ViewerError> {
        let settings_path = args.next().map(PathBuf::from);
        let frames = match args.next() {
            Some(value) => value
                .parse()
                .map_err(|_| ViewerError::InvalidFrameCount(value))?,
            None => DEFAULT_FRAME_COUNT,
        };
        Ok(Self {
            settings_path,
            frames,
        })
    }
}

fn load_settings(path: Option<&Path>) -> Result<ViewerSettings, ViewerError> {
    let path = path.unwrap_or_else(|| Path::new(SETTINGS_FILE_NAME));
    if !path.exists() {
        tracing::warn!("Settings file {:?} not found, using defaults", path);
        return Ok(ViewerSettings::default());
    }
    Ok(ViewerSettings::load(path)?)
}

fn run(args: &Args) -> Result<(), ViewerError> {
    let scene = Scene::demo();
    let mut settings = load_settings(args.settings_path.as_deref())?;
    settings.sync_part_count(scene.parts.len());

    let mut session = AnimationSession::with_settings(settings);

    // Author the orbit, one captured pose per frame
    for i in 0..ORBIT_POSES {
        let angle = i as f32 / ORBIT_POSES as f32 * TAU;
        let explosion = i as f32 * 0.4;
        let mut view = scene.orbit_view(angle, explosion);
        session.settings_mut().animation.explosion = explosion;
        session.queue(ViewerCommand::AddPose);
        session.frame(&mut view);
    }
    tracing::info!(
        "Authored {} poses ({} stored)",
        ORBIT_POSES,
        session.len()
    );

    let mut view = scene.orbit_view(0.0, 0.0);
    session.queue(ViewerCommand::TogglePlay);

    for frame in 0..args.frames {
        if session.frame(&mut view).is_none() {
            continue;
        }

        let transforms = session.part_transforms(&view, &scene.bounds, &scene.parts);
        tracing::debug!(
            frame,
            cursor = session.cursor(),
            explosion = view.explosion,
            "Camera at {:?}, {} parts placed",
            view.world_camera_position(),
            transforms.len()
        );
        for (index, transform) in transforms {
            tracing::trace!(
                "  {}: {:?}",
                scene.parts[index].name,
                transform.w_axis.truncate()
            );
        }
    }

    let light = session
        .settings()
        .effective_light_position(view.world_light_position());
    tracing::info!(
        "Played {} frames, cursor at {:.3}, light at {:?}",
        args.frames,
        session.cursor(),
        light
    );
    Ok(())
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("minity_viewer=debug,minity_keyframes=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Minity Viewer v{}", env!("CARGO_PKG_VERSION"));

    let result = Args::parse(std::env::args().skip(1)).and_then(|args| run(&args));
    if let Err(e) = result {
        tracing::error!("Viewer failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Result<Args, ViewerError> {
        Args::parse(values.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_defaults() {
        let parsed = args(&[]).unwrap();
        assert_eq!(parsed.settings_path, None);
        assert_eq!(parsed.frames, DEFAULT_FRAME_COUNT);
    }

    #[test]
    fn test_parse_path_and_frames() {
        let parsed = args(&["viewer.ron", "30"]).unwrap();
        assert_eq!(parsed.settings_path, Some(PathBuf::from("viewer.ron")));
        assert_eq!(parsed.frames, 30);
    }

    #[test]
    fn test_parse_rejects_bad_frame_count() {
        assert!(matches!(
            args(&["viewer.ron", "many"]),
            Err(ViewerError::InvalidFrameCount(v)) if v == "many"
        ));
    }

    #[test]
    fn test_missing_settings_file_uses_defaults() {
        let settings = load_settings(Some(Path::new("/nonexistent/minity.ron"))).unwrap();
        assert_eq!(settings, ViewerSettings::default());
    }

    #[test]
    fn test_run_plays_demo() {
        let parsed = Args {
            settings_path: Some(PathBuf::from("/nonexistent/minity.ron")),
            frames: 40,
        };
        assert!(run(&parsed).is_ok());
    }
}
