// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation session: timeline, playback and settings behind one command queue.
//!
//! Input handlers queue [`ViewerCommand`]s; [`AnimationSession::frame`] applies
//! them in order before the scheduler ticks, so a pose added this frame is
//! visible to this frame's playback.

use crate::explosion::{MeshPart, ModelBounds};
use crate::interpolation::FrameSample;
use crate::playback::{PlaybackController, PlaybackError, PlaybackState};
use crate::pose::Pose;
use crate::settings::ViewerSettings;
use crate::timeline::{PoseSequence, Timeline, TimelineError};
use crate::view_state::ViewState;
use glam::Mat4;

/// A user request for the animation session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    /// Capture the current view as a new pose
    AddPose,
    /// Remove the most recent pose
    RemovePose,
    /// Start or stop playback
    TogglePlay,
    /// Scrub the cursor to a position
    SetCursor(f32),
    /// Change the per-frame step
    SetStep(f32),
}

impl ViewerCommand {
    /// Map a key name to its command
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "A" | "a" | "-" => Some(Self::AddPose),
            "M" | "m" | "/" => Some(Self::RemovePose),
            "P" | "p" => Some(Self::TogglePlay),
            _ => None,
        }
    }
}

/// Owns the pose timeline, playback state and viewer settings
#[derive(Debug, Default)]
pub struct AnimationSession {
    timeline: Timeline,
    playback: PlaybackController,
    settings: ViewerSettings,
    pending: Vec<ViewerCommand>,
    /// View state captured by `AddPose` commands
    capture_source: Option<ViewState>,
}

impl AnimationSession {
    /// Create an empty session with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session with the given settings
    pub fn with_settings(settings: ViewerSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// The pose timeline
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Viewer settings
    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    /// Mutable viewer settings
    pub fn settings_mut(&mut self) -> &mut ViewerSettings {
        &mut self.settings
    }

    /// Playback state
    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Record a command for the next frame
    pub fn queue(&mut self, command: ViewerCommand) {
        self.pending.push(command);
    }

    /// Commands waiting for the next frame
    pub fn pending(&self) -> &[ViewerCommand] {
        &self.pending
    }

    /// Run one frame.
    ///
    /// The explosion slider is copied into `view` first, so poses captured
    /// this frame record it. Queued commands are applied next, then playback
    /// ticks and any sample is written into `view`.
    pub fn frame(&mut self, view: &mut ViewState) -> Option<FrameSample> {
        view.explosion = self.settings.animation.explosion;
        self.capture_source = Some(*view);
        for command in std::mem::take(&mut self.pending) {
            self.apply(command);
        }
        self.capture_source = None;

        let step = self.settings.animation.effective_step();
        match self.playback.tick(step, &self.timeline) {
            Ok(Some(sample)) => {
                sample.apply_to(view);
                self.settings.animation.explosion = sample.explosion;
                Some(sample)
            }
            Ok(None) => None,
            Err(e) => {
                self.report_invariant_violation(e);
                None
            }
        }
    }

    fn apply(&mut self, command: ViewerCommand) {
        match command {
            ViewerCommand::AddPose => match self.capture_source {
                Some(view) => self.add_pose(&view),
                None => tracing::warn!("No view state to capture"),
            },
            ViewerCommand::RemovePose => self.remove_pose(),
            ViewerCommand::TogglePlay => self.toggle_play(),
            ViewerCommand::SetCursor(value) => self.set_cursor(value),
            ViewerCommand::SetStep(step) => self.settings.animation.step = step,
        }
    }

    /// Capture `view` and append it to the timeline
    pub fn add_pose(&mut self, view: &ViewState) {
        match Pose::capture(view) {
            Ok(pose) => {
                self.timeline.add_pose(pose);
                tracing::debug!("Added key frame ({} stored)", self.timeline.len());
            }
            Err(e) => tracing::warn!("Cannot add key frame: {e}"),
        }
    }

    /// Remove the most recent pose
    pub fn remove_pose(&mut self) {
        match self.timeline.remove_pose() {
            Ok(()) => {
                tracing::debug!("Removed key frame ({} stored)", self.timeline.len());
                if self.playback.is_playing() && !self.timeline.can_play() {
                    self.playback.stop();
                }
            }
            Err(TimelineError::EmptyTimeline) => tracing::warn!("All key frames are removed"),
            Err(e) => self.report_invariant_violation(e.into()),
        }
    }

    /// Start or stop playback
    pub fn toggle_play(&mut self) {
        if let Err(e) = self.playback.toggle(&self.timeline) {
            tracing::warn!("{e}");
        }
    }

    /// Scrub the cursor
    pub fn set_cursor(&mut self, value: f32) {
        self.playback.set_cursor(value, &self.timeline);
    }

    /// Current cursor position
    pub fn cursor(&self) -> f32 {
        self.playback.cursor()
    }

    /// Stored timeline length, duplicates included
    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    /// Whether the timeline is empty
    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Whether the timeline is long enough to play
    pub fn can_play(&self) -> bool {
        self.timeline.can_play()
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Displacement matrices for every visible part.
    ///
    /// Hidden parts are skipped, so the result pairs with the visible parts in
    /// order.
    pub fn part_transforms(
        &self,
        view: &ViewState,
        bounds: &ModelBounds,
        parts: &[MeshPart],
    ) -> Vec<(usize, Mat4)> {
        let explosion = self.settings.animation.explosion();
        let camera = view.world_camera_position();
        let center = bounds.center();

        parts
            .iter()
            .enumerate()
            .filter(|(index, _)| self.settings.is_part_visible(*index))
            .map(|(index, part)| {
                (index, explosion.part_transform(camera, center, part.center_of_mass))
            })
            .collect()
    }

    fn report_invariant_violation(&self, error: PlaybackError) {
        tracing::error!("Timeline invariant violated: {error}");
        debug_assert!(false, "timeline invariant violated: {error}");
    }
}
