// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe camera animation for the Minity model viewer.
//!
//! This crate provides:
//! - Pose capture from the live view state
//! - A padded pose timeline with four-pose evaluation windows
//! - Catmull-Rom and slerp channel interpolation
//! - Frame-driven playback with looping and scrubbing
//! - Per-part explosion displacement, optionally camera driven
//!
//! ## Architecture
//!
//! [`AnimationSession`] owns the [`Timeline`], the [`PlaybackController`] and
//! the [`ViewerSettings`]. Input is queued as [`ViewerCommand`]s and applied
//! at the start of [`AnimationSession::frame`], which then writes the
//! evaluated [`FrameSample`] into the [`ViewState`] the renderer reads.

pub mod explosion;
pub mod interpolation;
pub mod playback;
pub mod pose;
pub mod session;
pub mod settings;
pub mod timeline;
pub mod ui;
pub mod view_state;

pub use explosion::{camera_term, Explosion, ExplosionError, MeshPart, ModelBounds};
pub use interpolation::{
    CatmullRom, ChannelInterpolation, FrameSample, InnerSlerp, Interpolation, SplineValue,
};
pub use playback::{PlaybackController, PlaybackError, PlaybackState, MIN_AUTHORED_POSES};
pub use pose::{Pose, PoseError, PoseId, RigidTransform};
pub use session::{AnimationSession, ViewerCommand};
pub use settings::{
    AnimationSettings, LightingSettings, Medium, OpticsSettings, ResponseBlend, SettingsError,
    ShadingModel, ShadingSettings, SurfaceResponse, ViewerSettings,
};
pub use timeline::{PoseSequence, PoseWindow, Timeline, TimelineError};
pub use ui::{AnimationPanel, ModelPanel};
pub use view_state::ViewState;
