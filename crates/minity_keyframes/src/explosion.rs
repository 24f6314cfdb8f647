// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-part explosion displacement.
//!
//! Each mesh part is pushed away from the model center along the direction
//! from the center to the part's center of mass. The push is the authored
//! explosion amount, optionally plus a camera term that grows as the camera
//! direction lines up with the part direction.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Below this length a direction is treated as zero.
const MIN_DIRECTION_LENGTH: f32 = 1e-6;

/// Camera terms larger than this multiple of the distance are amplified.
const AMPLIFY_THRESHOLD: f32 = 3.0;

/// Amplification applied past the threshold.
const AMPLIFY_FACTOR: f32 = 5.0;

/// Error raised while computing the camera term
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExplosionError {
    /// Camera or part center sits at the origin, or both point the same way
    #[error("Degenerate geometry: camera term is undefined")]
    DegenerateGeometry,
}

/// Axis-aligned bounds of the whole model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelBounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl ModelBounds {
    /// Create bounds from two corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds enclosing every point, or `None` for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        points.into_iter().fold(None, |bounds, p| {
            Some(match bounds {
                None => Self::new(p, p),
                Some(b) => Self::new(b.min.min(p), b.max.max(p)),
            })
        })
    }

    /// Midpoint of the bounds
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// One independently displaced part of the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshPart {
    /// Part (group) name
    pub name: String,
    /// Center of mass in model space
    pub center_of_mass: Vec3,
}

impl MeshPart {
    /// Create a mesh part
    pub fn new(name: impl Into<String>, center_of_mass: Vec3) -> Self {
        Self {
            name: name.into(),
            center_of_mass,
        }
    }
}

/// Camera-distance term for one part.
///
/// Uses `-ln(d)` where `d` is the distance between the normalized camera
/// position and the normalized part center; terms above three times `d` are
/// multiplied by five.
pub fn camera_term(camera: Vec3, part_center: Vec3) -> Result<f32, ExplosionError> {
    let (Some(camera_dir), Some(part_dir)) = (camera.try_normalize(), part_center.try_normalize())
    else {
        return Err(ExplosionError::DegenerateGeometry);
    };

    let distance = camera_dir.distance(part_dir);
    if distance <= MIN_DIRECTION_LENGTH {
        return Err(ExplosionError::DegenerateGeometry);
    }

    let term = -distance.ln();
    if term > AMPLIFY_THRESHOLD * distance {
        Ok(term * AMPLIFY_FACTOR)
    } else {
        Ok(term)
    }
}

/// Explosion parameters for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Explosion {
    /// Authored linear amount
    pub amount: f32,
    /// Add the camera-distance term
    pub camera_driven: bool,
}

impl Explosion {
    /// Create explosion parameters
    pub fn new(amount: f32, camera_driven: bool) -> Self {
        Self {
            amount,
            camera_driven,
        }
    }

    /// Translation offset for a part with center of mass `part_center`.
    ///
    /// A degenerate camera term is dropped for this part only.
    pub fn displacement(&self, camera: Vec3, model_center: Vec3, part_center: Vec3) -> Vec3 {
        let dir = part_center - model_center;
        if dir.length_squared() <= MIN_DIRECTION_LENGTH * MIN_DIRECTION_LENGTH {
            return Vec3::ZERO;
        }

        let boost = if self.camera_driven {
            camera_term(camera, part_center).unwrap_or_else(|e| {
                tracing::trace!("Skipping camera explosion term: {e}");
                0.0
            })
        } else {
            0.0
        };

        dir * (boost + self.amount)
    }

    /// Model-space translation matrix for a part
    pub fn part_transform(&self, camera: Vec3, model_center: Vec3, part_center: Vec3) -> Mat4 {
        Mat4::from_translation(self.displacement(camera, model_center, part_center))
    }

    /// Translation matrices for every part, in order
    pub fn part_transforms(&self, camera: Vec3, bounds: &ModelBounds, parts: &[MeshPart]) -> Vec<Mat4> {
        let center = bounds.center();
        parts
            .iter()
            .map(|part| self.part_transform(camera, center, part.center_of_mass))
            .collect()
    }
}
