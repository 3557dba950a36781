//! Orbit camera around the previewed object.

use glam::{Mat4, Vec3};

/// Near clip plane distance.
pub const CAMERA_NEAR: f32 = 0.1;

/// Far clip plane distance (maps to depth 0.0 under reverse-Z).
pub const CAMERA_FAR: f32 = 100.0;

/// A camera orbiting the origin at a given distance.
///
/// At yaw 0 / pitch 0 the eye sits on +Z looking at the origin, which puts
/// the image region of every geometry directly in front of the viewer.
#[derive(Clone, Copy, Debug)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
}

impl OrbitCamera {
    pub fn new(yaw: f32, pitch: f32, distance: f32, fov_y_degrees: f32) -> Self {
        Self {
            yaw,
            pitch,
            distance,
            fov_y_degrees,
        }
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.distance * self.pitch.cos() * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            self.distance * self.pitch.cos() * self.yaw.cos(),
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    /// Reverse-Z perspective projection: near and far are swapped so the
    /// near plane lands on depth 1.0 and the far plane on 0.0.
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            aspect_ratio,
            CAMERA_FAR,
            CAMERA_NEAR,
        )
    }

    pub fn view_projection(&self, aspect_ratio: f32) -> Mat4 {
        self.projection_matrix(aspect_ratio) * self.view_matrix()
    }
}
