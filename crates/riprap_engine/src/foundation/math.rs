//! Math utilities and types
//!
//! Provides the fundamental math types used for placing stockpile instances
//! and steering the capture camera. Coordinates are Y-up: the canvas lies in
//! the XZ plane and layers stack along +Y.

pub use nalgebra::{
    Vector3,
    Quaternion,
    UnitQuaternion,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Unit quaternion type for orientations
pub type Quat = UnitQuaternion<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create a transform with the same scale factor on every axis
    pub fn with_uniform_scale(position: Vec3, rotation: Quat, scale: f32) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::new(scale, scale, scale),
        }
    }

    /// Direction the local +Z axis points to in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::z()
    }

    /// Rotate in place so the local +Z axis points at `target`
    ///
    /// Leaves the rotation untouched when `target` coincides with the position.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(rotation) = utils::look_rotation(target - self.position, Vec3::y()) {
            self.rotation = rotation;
        }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Quat, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Move `current` toward `target` by at most `max_delta` units
    ///
    /// Never overshoots: once the remaining distance fits within `max_delta`
    /// the target itself is returned.
    pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
        let offset = target - current;
        let distance = offset.norm();
        if distance <= max_delta || distance == 0.0 {
            return target;
        }
        current + offset / distance * max_delta
    }

    /// Linear interpolation between two points with `t` clamped to `[0, 1]`
    pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
        a + (b - a) * t.clamp(0.0, 1.0)
    }

    /// Rotation whose local +Z axis points along `direction`
    ///
    /// Returns `None` for a zero-length direction. When `direction` is
    /// parallel to `up` a world +Z up vector is substituted, so a camera
    /// looking straight down still gets a well-defined orientation.
    pub fn look_rotation(direction: Vec3, up: Vec3) -> Option<Quat> {
        let direction = direction.try_normalize(f32::EPSILON)?;
        let up = if direction.cross(&up).norm_squared() <= f32::EPSILON {
            Vec3::z()
        } else {
            up
        };
        Some(Quat::face_towards(&direction, &up))
    }

    /// Rotation built from Euler angles given in degrees (X, then Y, then Z)
    pub fn euler_degrees(x: f32, y: f32, z: f32) -> Quat {
        Quat::from_euler_angles(deg_to_rad(x), deg_to_rad(y), deg_to_rad(z))
    }
}
