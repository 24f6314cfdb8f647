// SPDX-License-Identifier: MIT OR Apache-2.0
//! Live view state written by playback and read by the renderer.

use glam::{Mat4, Vec3};

/// Transforms and scene parameters for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Clear color (RGB)
    pub background_color: Vec3,
    /// Model transform
    pub model_transform: Mat4,
    /// Camera (view) transform
    pub view_transform: Mat4,
    /// Light transform
    pub light_transform: Mat4,
    /// Scalar explosion amount
    pub explosion: f32,
}

impl ViewState {
    /// View * model
    pub fn model_view(&self) -> Mat4 {
        self.view_transform * self.model_transform
    }

    /// Light * model
    pub fn model_light(&self) -> Mat4 {
        self.light_transform * self.model_transform
    }

    /// Camera position in model space
    pub fn world_camera_position(&self) -> Vec3 {
        self.model_view().inverse().transform_point3(Vec3::ZERO)
    }

    /// Light position in model space
    pub fn world_light_position(&self) -> Vec3 {
        self.model_light().inverse().transform_point3(Vec3::ZERO)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            background_color: Vec3::ZERO,
            model_transform: Mat4::IDENTITY,
            view_transform: Mat4::IDENTITY,
            light_transform: Mat4::IDENTITY,
            explosion: 0.0,
        }
    }
}
