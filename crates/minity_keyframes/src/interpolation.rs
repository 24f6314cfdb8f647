// SPDX-License-Identifier: MIT OR Apache-2.0
//! Channel interpolation over a four-pose window.
//!
//! Vector and scalar channels (background color, translation, scale,
//! explosion) use a Catmull-Rom cubic through all four control points.
//! Rotation channels use spherical interpolation between the two inner poses
//! only; the outer poses do not shape rotation, so angular velocity can jump
//! where two segments meet. The two strategies are kept as separate types so
//! that a channel's behavior is visible from the strategy it is evaluated
//! with.

use crate::pose::{Pose, RigidTransform};
use crate::timeline::{PoseWindow, WINDOW_SIZE};
use crate::view_state::ViewState;
use glam::{Mat3, Mat4, Quat, Vec3};
use std::ops::{Add, Mul, Sub};

/// Values the Catmull-Rom cubic can be evaluated on
pub trait SplineValue:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self>
{
}

impl<T> SplineValue for T where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>
{
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Catmull-Rom cubic between `p1` (t = 0) and `p2` (t = 1)
    pub fn catmull_rom<T: SplineValue>(p0: T, p1: T, p2: T, p3: T, t: f32) -> T {
        let t2 = t * t;
        let t3 = t2 * t;

        (p1 * 2.0
            + (p2 - p0) * t
            + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
            + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
            * 0.5
    }

    /// Shortest-arc interpolation between two rotations
    pub fn slerp(a: Quat, b: Quat, t: f32) -> Quat {
        a.normalize().slerp(b.normalize(), t).normalize()
    }

    /// Shortest-arc interpolation between two rotation matrices
    pub fn slerp_mat3(a: &Mat3, b: &Mat3, t: f32) -> Mat3 {
        Mat3::from_quat(Self::slerp(Quat::from_mat3(a), Quat::from_mat3(b), t))
    }
}

/// Strategy for evaluating one channel over a window
pub trait ChannelInterpolation<T> {
    /// Evaluate the channel at local parameter `t` in `[0, 1]`
    fn interpolate(&self, window: [T; WINDOW_SIZE], t: f32) -> T;
}

/// Cubic through all four control points
#[derive(Debug, Clone, Copy, Default)]
pub struct CatmullRom;

impl<T: SplineValue> ChannelInterpolation<T> for CatmullRom {
    fn interpolate(&self, [p0, p1, p2, p3]: [T; WINDOW_SIZE], t: f32) -> T {
        Interpolation::catmull_rom(p0, p1, p2, p3, t)
    }
}

/// Spherical interpolation between the two inner control points
#[derive(Debug, Clone, Copy, Default)]
pub struct InnerSlerp;

impl ChannelInterpolation<Quat> for InnerSlerp {
    fn interpolate(&self, [_, q1, q2, _]: [Quat; WINDOW_SIZE], t: f32) -> Quat {
        Interpolation::slerp(q1, q2, t)
    }
}

impl ChannelInterpolation<Mat3> for InnerSlerp {
    fn interpolate(&self, [_, r1, r2, _]: [Mat3; WINDOW_SIZE], t: f32) -> Mat3 {
        Interpolation::slerp_mat3(&r1, &r2, t)
    }
}

/// Channels evaluated from one window at one parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Background color
    pub background_color: Vec3,
    /// Camera (view) transform
    pub view_transform: Mat4,
    /// Light transform
    pub light_transform: Mat4,
    /// Scalar explosion amount
    pub explosion: f32,
}

impl FrameSample {
    /// Evaluate every channel of `window` at `t`
    pub fn evaluate(window: &PoseWindow<'_>, t: f32) -> Self {
        let background_color = CatmullRom.interpolate(window.channel(|p| p.background_color), t);
        let explosion = CatmullRom.interpolate(window.channel(|p| p.explosion), t);

        Self {
            background_color,
            view_transform: evaluate_transform(window, t, |p| &p.camera),
            light_transform: evaluate_transform(window, t, |p| &p.light),
            explosion: explosion.x,
        }
    }

    /// Write the sample into the live view state
    pub fn apply_to(&self, view: &mut ViewState) {
        view.background_color = self.background_color;
        view.view_transform = self.view_transform;
        view.light_transform = self.light_transform;
        view.explosion = self.explosion;
    }
}

fn evaluate_transform(
    window: &PoseWindow<'_>,
    t: f32,
    part: impl Fn(&Pose) -> &RigidTransform,
) -> Mat4 {
    RigidTransform {
        translation: CatmullRom.interpolate(window.channel(|p| part(p).translation), t),
        rotation: InnerSlerp.interpolate(window.channel(|p| part(p).rotation), t),
        scale: CatmullRom.interpolate(window.channel(|p| part(p).scale), t),
    }
    .compose()
}
