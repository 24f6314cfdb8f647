// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pose definitions for the keyframe timeline.

use crate::view_state::ViewState;
use glam::{Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Column lengths at or below this are treated as a collapsed axis.
const MIN_AXIS_LENGTH: f32 = 1e-6;

/// Unique identifier for an authored pose
///
/// Duplicates inserted by the timeline share the id of the pose they copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoseId(pub Uuid);

impl PoseId {
    /// Create a new random pose ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PoseId {
    fn default() -> Self {
        Self::new()
    }
}

/// Error raised while decomposing a transform
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PoseError {
    /// One of the basis vectors has zero (or non-finite) length
    #[error("Transform has a degenerate axis (scale {0:?})")]
    DegenerateTransform(Vec3),
}

/// Translation, rotation and scale parts of a view-style matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    /// Translation, expressed before the rotation is applied
    pub translation: Vec3,
    /// Orthonormal rotation
    pub rotation: Mat3,
    /// Per-axis scale
    pub scale: Vec3,
}

impl RigidTransform {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Mat3::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Split a matrix into scale, rotation and translation.
    ///
    /// The translation column is pulled back through the inner 3x3 part, so
    /// the result matches the `scale * rotation * translation` order used by
    /// [`RigidTransform::compose`].
    pub fn decompose(matrix: &Mat4) -> Result<Self, PoseError> {
        let inner = Mat3::from_mat4(*matrix);
        let scale = Vec3::new(
            inner.x_axis.length(),
            inner.y_axis.length(),
            inner.z_axis.length(),
        );

        if !scale.is_finite() || scale.min_element() <= MIN_AXIS_LENGTH {
            return Err(PoseError::DegenerateTransform(scale));
        }

        let rotation = Mat3::from_cols(
            inner.x_axis / scale.x,
            inner.y_axis / scale.y,
            inner.z_axis / scale.z,
        );
        let translation = inner.inverse() * matrix.w_axis.truncate();

        Ok(Self {
            translation,
            rotation,
            scale,
        })
    }

    /// Rebuild the matrix as `scale * rotation * translation`
    pub fn compose(&self) -> Mat4 {
        Mat4::from_scale(self.scale)
            * Mat4::from_mat3(self.rotation)
            * Mat4::from_translation(self.translation)
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One authored snapshot of camera, light, background and explosion state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Pose ID
    pub id: PoseId,
    /// Scene background color (RGB)
    pub background_color: Vec3,
    /// Camera (view) transform parts
    pub camera: RigidTransform,
    /// Light transform parts
    pub light: RigidTransform,
    /// Explosion amount, authored uniformly on all three axes
    pub explosion: Vec3,
}

impl Pose {
    /// Create a pose from already decomposed parts
    pub fn new(
        background_color: Vec3,
        camera: RigidTransform,
        light: RigidTransform,
        explosion: f32,
    ) -> Self {
        Self {
            id: PoseId::new(),
            background_color,
            camera,
            light,
            explosion: Vec3::splat(explosion),
        }
    }

    /// Snapshot the current view state
    pub fn capture(view: &ViewState) -> Result<Self, PoseError> {
        Ok(Self::new(
            view.background_color,
            RigidTransform::decompose(&view.view_transform)?,
            RigidTransform::decompose(&view.light_transform)?,
            view.explosion,
        ))
    }

    /// Representative scalar of the explosion vector
    pub fn explosion_amount(&self) -> f32 {
        self.explosion.x
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, RigidTransform::IDENTITY, RigidTransform::IDENTITY, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn assert_mat4_near(a: Mat4, b: Mat4) {
        assert!(a.abs_diff_eq(b, 1e-4), "matrices differ:\n{a}\n{b}");
    }

    #[test]
    fn test_decompose_identity() {
        let parts = RigidTransform::decompose(&Mat4::IDENTITY).unwrap();
        assert_eq!(parts, RigidTransform::IDENTITY);
    }

    #[test]
    fn test_decompose_view_matrix_round_trip() {
        let view = Mat4::look_at_rh(Vec3::new(3.0, 2.0, 5.0), Vec3::ZERO, Vec3::Y);
        let parts = RigidTransform::decompose(&view).unwrap();

        assert!(parts.scale.abs_diff_eq(Vec3::ONE, 1e-5));
        assert_mat4_near(parts.compose(), view);
    }

    #[test]
    fn test_decompose_uniform_scale() {
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::from_rotation_y(0.7),
            Vec3::new(1.0, -4.0, 0.5),
        );
        let parts = RigidTransform::decompose(&matrix).unwrap();

        assert!(parts.scale.abs_diff_eq(Vec3::splat(2.0), 1e-5));
        let rotation = Quat::from_mat3(&parts.rotation);
        assert!(rotation.dot(Quat::from_rotation_y(0.7)).abs() > 1.0 - 1e-5);
        assert_mat4_near(parts.compose(), matrix);
    }

    #[test]
    fn test_decompose_rejects_collapsed_axis() {
        let matrix = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(matches!(
            RigidTransform::decompose(&matrix),
            Err(PoseError::DegenerateTransform(_))
        ));
    }

    #[test]
    fn test_capture_uses_uniform_explosion() {
        let view = ViewState {
            background_color: Vec3::new(0.1, 0.2, 0.3),
            explosion: 1.5,
            ..ViewState::default()
        };
        let pose = Pose::capture(&view).unwrap();

        assert_eq!(pose.explosion, Vec3::splat(1.5));
        assert_eq!(pose.explosion_amount(), 1.5);
        assert_eq!(pose.background_color, view.background_color);
    }

    #[test]
    fn test_captured_poses_get_distinct_ids() {
        let view = ViewState::default();
        let a = Pose::capture(&view).unwrap();
        let b = Pose::capture(&view).unwrap();
        assert_ne!(a.id, b.id);
    }
}
