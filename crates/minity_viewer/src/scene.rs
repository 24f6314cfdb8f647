// SPDX-License-Identifier: MIT OR Apache-2.0
//! Demo scene driven by the headless viewer.

use glam::{Mat4, Vec3};
use minity_keyframes::{MeshPart, ModelBounds, ViewState};

/// Distance of the orbit camera from the model center
const ORBIT_RADIUS: f32 = 6.0;

/// Height of the orbit camera above the model center
const ORBIT_HEIGHT: f32 = 1.5;

/// A model reduced to what the animation needs
#[derive(Debug, Clone)]
pub struct Scene {
    /// Model bounds
    pub bounds: ModelBounds,
    /// Independently exploded parts
    pub parts: Vec<MeshPart>,
}

impl Scene {
    /// Small multi-part model centered at the origin
    pub fn demo() -> Self {
        let parts = vec![
            MeshPart::new("chassis", Vec3::new(0.0, -0.2, 0.0)),
            MeshPart::new("cabin", Vec3::new(0.0, 0.6, -0.3)),
            MeshPart::new("wheel_front_left", Vec3::new(-0.9, -0.6, 1.2)),
            MeshPart::new("wheel_front_right", Vec3::new(0.9, -0.6, 1.2)),
            MeshPart::new("wheel_rear_left", Vec3::new(-0.9, -0.6, -1.2)),
            MeshPart::new("wheel_rear_right", Vec3::new(0.9, -0.6, -1.2)),
        ];
        let bounds = ModelBounds::from_points(parts.iter().map(|p| p.center_of_mass))
            .unwrap_or_else(|| ModelBounds::new(Vec3::ZERO, Vec3::ZERO));

        Self { bounds, parts }
    }

    /// View state looking at the model from `angle` radians around the Y axis
    pub fn orbit_view(&self, angle: f32, explosion: f32) -> ViewState {
        let center = self.bounds.center();
        let eye = center
            + Vec3::new(
                angle.sin() * ORBIT_RADIUS,
                ORBIT_HEIGHT,
                angle.cos() * ORBIT_RADIUS,
            );
        let light = center + Vec3::new(angle.cos() * 4.0, 5.0, angle.sin() * 4.0);

        ViewState {
            background_color: Vec3::new(0.1, 0.1, 0.1 + 0.05 * angle.sin().abs()),
            view_transform: Mat4::look_at_rh(eye, center, Vec3::Y),
            light_transform: Mat4::look_at_rh(light, center, Vec3::Y),
            explosion,
            ..ViewState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_bounds_enclose_parts() {
        let scene = Scene::demo();
        for part in &scene.parts {
            assert!(part.center_of_mass.cmpge(scene.bounds.min).all());
            assert!(part.center_of_mass.cmple(scene.bounds.max).all());
        }
    }

    #[test]
    fn test_orbit_view_keeps_radius() {
        let scene = Scene::demo();
        let view = scene.orbit_view(1.2, 0.0);
        let offset = view.world_camera_position() - scene.bounds.center();
        let planar = Vec3::new(offset.x, 0.0, offset.z).length();

        assert!((planar - ORBIT_RADIUS).abs() < 1e-3);
        assert!((offset.y - ORBIT_HEIGHT).abs() < 1e-3);
    }
}
