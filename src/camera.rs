use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::math::Ray;

/// World axis, used when an operator overrides one coordinate of the pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Viewer pose. Roll is always zero; yaw/pitch are a YXZ Euler pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch: pitch.clamp(-FRAC_PI_2, FRAC_PI_2),
        }
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(position, 0.0, 0.0)
    }

    /// Integrate a pointer drag. Yaw is unbounded, pitch is clamped so the view never flips.
    pub fn apply_look(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw -= dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Yaw-only rotation; movement must not tilt with pitch
    pub fn heading(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Look direction (-Z in camera space)
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.heading() * Vec3::X
    }

    pub fn horizontal_forward(&self) -> Vec3 {
        self.heading() * Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    /// World-space ray through a window pixel, for pointer picking.
    /// `fov_y` is the vertical field of view in radians.
    pub fn cursor_ray(&self, cursor: (f32, f32), viewport: (f32, f32), fov_y: f32) -> Ray {
        let (w, h) = (viewport.0.max(1.0), viewport.1.max(1.0));
        let ndc_x = 2.0 * cursor.0 / w - 1.0;
        let ndc_y = 1.0 - 2.0 * cursor.1 / h;
        let tan = (fov_y * 0.5).tan();
        let local = Vec3::new(ndc_x * tan * (w / h), ndc_y * tan, -1.0);
        Ray::new(self.position, self.orientation() * local)
    }

    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.position.x = value,
            Axis::Y => self.position.y = value,
            Axis::Z => self.position.z = value,
        }
    }
}
