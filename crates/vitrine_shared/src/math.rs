//! Mathematical types shared by every crate.
//!
//! Rotations are Euler angles in radians (XYZ order) stored in a [`Vec3`],
//! matching how camera rotations are authored for the showcase.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D Vector - position, Euler rotation, offset
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// 2D Vector - pointer coordinates, viewport sizes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Normalizes a window-space pointer position to `[-0.5, 0.5]` on both axes.
    ///
    /// A zero-sized window yields the centre.
    #[must_use]
    pub fn normalized_pointer(client_x: f32, client_y: f32, width: f32, height: f32) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::ZERO;
        }
        Self::new(
            (client_x / width - 0.5).clamp(-0.5, 0.5),
            (client_y / height - 0.5).clamp(-0.5, 0.5),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.to_array(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_vec3_lerp_endpoints() {
        let a = Vec3::new(0.0, 5000.0, 2.7);
        let b = Vec3::new(0.0, 2.4, 8.8);

        assert_eq!(a.lerp(b, 0.0), a);
        let end = a.lerp(b, 1.0);
        assert!((end.y - b.y).abs() < 1e-3 && (end.z - b.z).abs() < 1e-3);
    }

    #[test]
    fn test_pointer_normalization() {
        let centre = Vec2::normalized_pointer(960.0, 540.0, 1920.0, 1080.0);
        assert_eq!(centre, Vec2::ZERO);

        let corner = Vec2::normalized_pointer(0.0, 1080.0, 1920.0, 1080.0);
        assert_eq!(corner, Vec2::new(-0.5, 0.5));

        assert_eq!(Vec2::normalized_pointer(10.0, 10.0, 0.0, 0.0), Vec2::ZERO);
    }

    #[test]
    fn test_vec3_bytemuck() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 12); // 3 * 4 bytes
    }
}
