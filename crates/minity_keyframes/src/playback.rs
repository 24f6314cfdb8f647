// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame-driven playback over a pose timeline.
//!
//! The cursor is measured in whole segments: its integer part selects the
//! window start and its fractional part is the interpolation parameter.

use crate::interpolation::FrameSample;
use crate::timeline::{PoseSequence, TimelineError, MIN_PLAYABLE_LEN};

/// Minimum number of distinct authored poses for playback
pub const MIN_AUTHORED_POSES: usize = MIN_PLAYABLE_LEN - 2;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Stopped (cursor frozen, scrubbing allowed)
    #[default]
    Stopped,
    /// Advancing every tick
    Playing,
}

/// Error raised by playback control
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    /// Play requested before enough poses were authored
    #[error("Need at least {need} key frames to play animation (have {have})")]
    InsufficientKeyframes {
        /// Distinct poses authored so far
        have: usize,
        /// Distinct poses required
        need: usize,
    },

    /// Timeline invariant violated during evaluation
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

/// Playback controller for a pose timeline
#[derive(Debug, Clone, Default)]
pub struct PlaybackController {
    /// Current playback position, in segments
    cursor: f32,
    /// Playback state
    state: PlaybackState,
    /// Cursor was moved by hand and has not been evaluated yet
    scrub_pending: bool,
}

impl PlaybackController {
    /// Create a stopped controller at the start of the timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Current cursor position
    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    /// Start playing from the current cursor
    pub fn play(&mut self, sequence: &impl PoseSequence) -> Result<(), PlaybackError> {
        if !sequence.can_play() {
            return Err(PlaybackError::InsufficientKeyframes {
                have: authored_count(sequence.len()),
                need: MIN_AUTHORED_POSES,
            });
        }
        self.state = PlaybackState::Playing;
        tracing::info!("Playing animation...");
        Ok(())
    }

    /// Stop playing; the cursor keeps its position
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Playing {
            tracing::info!("Stopped animation at {:.3}", self.cursor);
        }
        self.state = PlaybackState::Stopped;
    }

    /// Toggle play/stop, returning the new state
    pub fn toggle(&mut self, sequence: &impl PoseSequence) -> Result<PlaybackState, PlaybackError> {
        match self.state {
            PlaybackState::Playing => self.stop(),
            PlaybackState::Stopped => self.play(sequence)?,
        }
        Ok(self.state)
    }

    /// Move the cursor by hand.
    ///
    /// The value is clamped to `[0, n]` where `n` is the number of window
    /// starts; `n` itself is the end of the slider and evaluates nothing.
    pub fn set_cursor(&mut self, value: f32, sequence: &impl PoseSequence) {
        self.cursor = clamp_cursor(value, sequence.segment_count());
        self.scrub_pending = true;
    }

    /// Advance the cursor by `step`, looping back to 0 at the end
    pub fn advance(&mut self, step: f32, sequence: &impl PoseSequence) {
        let segments = sequence.segment_count() as f32;
        let step = step.max(0.0);

        if self.cursor + step >= segments {
            self.cursor = 0.0;
        } else {
            self.cursor += step;
        }
    }

    /// Evaluate the timeline at the cursor without moving it
    pub fn sample(&self, sequence: &impl PoseSequence) -> Result<Option<FrameSample>, PlaybackError> {
        let segments = sequence.segment_count();
        let index = self.cursor.floor() as usize;
        if index == segments {
            return Ok(None);
        }

        let window = sequence.window_at(index)?;
        Ok(Some(FrameSample::evaluate(&window, self.cursor - index as f32)))
    }

    /// Per-frame update.
    ///
    /// While playing the cursor advances by `step` and the timeline is
    /// sampled. While stopped a sample is produced only after the cursor was
    /// moved by hand.
    pub fn tick(
        &mut self,
        step: f32,
        sequence: &impl PoseSequence,
    ) -> Result<Option<FrameSample>, PlaybackError> {
        self.cursor = clamp_cursor(self.cursor, sequence.segment_count());

        if self.is_playing() && !sequence.can_play() {
            tracing::warn!(
                "Timeline shrank below {} key frames, stopping playback",
                MIN_AUTHORED_POSES
            );
            self.stop();
        }

        match self.state {
            PlaybackState::Playing => {
                self.scrub_pending = false;
                self.advance(step, sequence);
                self.sample(sequence)
            }
            PlaybackState::Stopped if self.scrub_pending => {
                self.scrub_pending = false;
                self.sample(sequence)
            }
            PlaybackState::Stopped => Ok(None),
        }
    }
}

fn clamp_cursor(value: f32, segments: usize) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, segments as f32)
}

/// Distinct poses behind a stored length
fn authored_count(len: usize) -> usize {
    match len {
        0 | 1 => len,
        2..=4 => len - 1,
        _ => len - 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Pose, RigidTransform};
    use crate::timeline::Timeline;
    use glam::{Mat3, Vec3};

    fn timeline_with(count: usize) -> Timeline {
        let mut timeline = Timeline::new();
        for i in 0..count {
            let f = i as f32;
            let camera = RigidTransform {
                translation: Vec3::new(f, 0.0, -4.0),
                rotation: Mat3::from_rotation_y(f * 0.4),
                scale: Vec3::ONE,
            };
            timeline.add_pose(Pose::new(Vec3::splat(f * 0.1), camera, RigidTransform::IDENTITY, f));
        }
        timeline
    }

    #[test]
    fn test_play_requires_four_poses() {
        let mut playback = PlaybackController::new();
        let timeline = timeline_with(3);

        assert_eq!(
            playback.toggle(&timeline),
            Err(PlaybackError::InsufficientKeyframes { have: 3, need: 4 })
        );
        assert_eq!(playback.state(), PlaybackState::Stopped);

        let timeline = timeline_with(4);
        assert_eq!(playback.toggle(&timeline), Ok(PlaybackState::Playing));
        assert_eq!(playback.toggle(&timeline), Ok(PlaybackState::Stopped));
    }

    #[test]
    fn test_loop_resets_at_last_window() {
        let timeline = timeline_with(4);
        assert_eq!(timeline.len(), 6);

        let mut playback = PlaybackController::new();
        playback.play(&timeline).unwrap();

        let cursors: Vec<f32> = (0..3)
            .map(|_| {
                playback.tick(1.0, &timeline).unwrap();
                playback.cursor()
            })
            .collect();
        assert_eq!(cursors, vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_zero_step_holds_frame() {
        let timeline = timeline_with(4);
        let mut playback = PlaybackController::new();
        playback.play(&timeline).unwrap();
        playback.tick(0.5, &timeline).unwrap();

        let held = playback.tick(0.0, &timeline).unwrap();
        let again = playback.tick(0.0, &timeline).unwrap();
        assert!(playback.is_playing());
        assert_eq!(playback.cursor(), 0.5);
        assert_eq!(held, again);
    }

    #[test]
    fn test_negative_step_is_clamped() {
        let timeline = timeline_with(4);
        let mut playback = PlaybackController::new();
        playback.play(&timeline).unwrap();
        playback.tick(-1.0, &timeline).unwrap();
        assert_eq!(playback.cursor(), 0.0);
    }

    #[test]
    fn test_stop_keeps_cursor() {
        let timeline = timeline_with(4);
        let mut playback = PlaybackController::new();
        playback.play(&timeline).unwrap();
        playback.tick(0.7, &timeline).unwrap();
        playback.stop();

        assert_eq!(playback.cursor(), 0.7);
        assert_eq!(playback.tick(0.7, &timeline).unwrap(), None);
        playback.play(&timeline).unwrap();
        playback.tick(0.7, &timeline).unwrap();
        assert!((playback.cursor() - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_scrub_evaluates_once_while_stopped() {
        let timeline = timeline_with(4);
        let mut playback = PlaybackController::new();

        playback.set_cursor(1.0, &timeline);
        let sample = playback.tick(0.1, &timeline).unwrap().unwrap();
        // Window 1 is [A, B, C, D], so t = 0 lands on B.
        assert_eq!(sample.background_color, Vec3::splat(0.1));
        assert_eq!(playback.cursor(), 1.0);
        assert_eq!(playback.tick(0.1, &timeline).unwrap(), None);
    }

    #[test]
    fn test_scrub_is_clamped() {
        let timeline = timeline_with(4);
        let mut playback = PlaybackController::new();

        playback.set_cursor(-3.0, &timeline);
        assert_eq!(playback.cursor(), 0.0);

        playback.set_cursor(99.0, &timeline);
        assert_eq!(playback.cursor(), 3.0);
        // The end of the slider has no window and produces no sample.
        assert_eq!(playback.tick(0.1, &timeline).unwrap(), None);

        playback.set_cursor(f32::NAN, &timeline);
        assert_eq!(playback.cursor(), 0.0);
    }

    #[test]
    fn test_out_of_range_is_unreachable() {
        // Exercise every cursor position the controller can reach, for every
        // timeline size, and make sure no window lookup fails.
        for count in 0..=8 {
            let timeline = timeline_with(count);
            let mut playback = PlaybackController::new();
            let segments = timeline.segment_count() as f32;

            for i in 0..=40 {
                playback.set_cursor(i as f32 / 40.0 * (segments + 1.0), &timeline);
                assert!(playback.tick(0.0, &timeline).is_ok(), "count {count}, step {i}");
            }

            if playback.play(&timeline).is_ok() {
                for _ in 0..200 {
                    assert!(playback.tick(0.37, &timeline).is_ok());
                }
            }
        }
    }

    #[test]
    fn test_shrinking_timeline_stops_playback() {
        let mut timeline = timeline_with(4);
        let mut playback = PlaybackController::new();
        playback.play(&timeline).unwrap();
        playback.tick(1.0, &timeline).unwrap();
        playback.tick(1.0, &timeline).unwrap();

        timeline.remove_pose().unwrap();
        assert!(playback.tick(1.0, &timeline).is_ok());
        assert_eq!(playback.state(), PlaybackState::Stopped);
        assert!(playback.cursor() <= timeline.segment_count() as f32);
    }

    #[test]
    fn test_authored_count() {
        let observed: Vec<usize> = (0..=8).map(|n| authored_count(timeline_with(n).len())).collect();
        assert_eq!(observed, (0..=8).collect::<Vec<_>>());
    }
}
