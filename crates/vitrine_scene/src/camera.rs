//! Perspective cameras and their GPU-facing uniforms.
//!
//! Matrices are column-major (`m[column][row]`), right-handed, with clip
//! depth in `[-1, 1]`.

use bytemuck::{Pod, Zeroable};
use vitrine_shared::constants::{
    CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, DETAIL_CAMERA_POSITION, DETAIL_CAMERA_ROTATION,
    PRIMARY_CAMERA_POSITION,
};
use vitrine_shared::Vec3;

/// Column-major 4x4 matrix.
type Mat4 = [[f32; 4]; 4];

/// Which of the two cameras.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CameraId {
    /// The hero camera, mounted in the parallax rig.
    Primary,
    /// The detail camera driven by showcase selections.
    Detail,
}

/// Per-frame camera data uploaded to the renderer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    /// Projection * view.
    pub view_proj: Mat4,
    /// World-space eye position (w = 1).
    pub position: [f32; 4],
}

impl CameraUniform {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// A perspective camera with an Euler (XYZ) orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Position (local to the rig for the primary camera).
    pub position: Vec3,
    /// Euler rotation in radians.
    pub rotation: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Width / height.
    pub aspect: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
}

impl Camera {
    /// Creates a camera with the shared lens settings.
    #[must_use]
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rotation,
            fov_degrees: CAMERA_FOV_DEGREES,
            aspect: 1.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }

    /// Recomputes the aspect ratio. A degenerate size leaves it unchanged.
    #[allow(clippy::cast_precision_loss)]
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Projection matrix.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        let f = 1.0 / (self.fov_degrees.to_radians() * 0.5).tan();
        let range = self.near - self.far;
        let mut m = [[0.0; 4]; 4];
        m[0][0] = f / self.aspect;
        m[1][1] = f;
        m[2][2] = (self.far + self.near) / range;
        m[2][3] = -1.0;
        m[3][2] = 2.0 * self.far * self.near / range;
        m
    }

    /// View matrix for the camera placed at `position + offset`.
    #[must_use]
    pub fn view(&self, offset: Vec3) -> Mat4 {
        let r = rotation_rows(self.rotation);
        let eye = (self.position + offset).to_array();

        let mut m = [[0.0; 4]; 4];
        for c in 0..3 {
            for row in 0..3 {
                m[c][row] = r[c][row];
            }
        }
        for row in 0..3 {
            m[3][row] = -(r[0][row] * eye[0] + r[1][row] * eye[1] + r[2][row] * eye[2]);
        }
        m[3][3] = 1.0;
        m
    }

    /// Uniform for the camera placed at `position + offset`.
    #[must_use]
    pub fn uniform(&self, offset: Vec3) -> CameraUniform {
        let eye = self.position + offset;
        CameraUniform {
            view_proj: mul(&self.projection(), &self.view(offset)),
            position: [eye.x, eye.y, eye.z, 1.0],
        }
    }
}

/// Rows of the XYZ Euler rotation matrix.
fn rotation_rows(rotation: Vec3) -> [[f32; 3]; 3] {
    let (b, a) = rotation.x.sin_cos();
    let (d, c) = rotation.y.sin_cos();
    let (f, e) = rotation.z.sin_cos();
    let (ae, af, be, bf) = (a * e, a * f, b * e, b * f);
    [
        [c * e, -c * f, d],
        [af + be * d, ae - bf * d, -b * c],
        [bf - ae * d, be + af * d, a * c],
    ]
}

/// Column-major product `a * b`.
fn mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [[0.0; 4]; 4];
    for (c, column) in out.iter_mut().enumerate() {
        for (r, cell) in column.iter_mut().enumerate() {
            *cell = (0..4).map(|k| a[k][r] * b[c][k]).sum();
        }
    }
    out
}

/// The two cameras of the scene session.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraPair {
    /// Hero camera.
    pub primary: Camera,
    /// Detail camera.
    pub detail: Camera,
}

impl CameraPair {
    /// Cameras at their authored starting placements.
    #[must_use]
    pub fn new() -> Self {
        Self {
            primary: Camera::new(PRIMARY_CAMERA_POSITION, Vec3::ZERO),
            detail: Camera::new(DETAIL_CAMERA_POSITION, DETAIL_CAMERA_ROTATION),
        }
    }

    /// Camera by id.
    #[must_use]
    pub fn get(&self, id: CameraId) -> &Camera {
        match id {
            CameraId::Primary => &self.primary,
            CameraId::Detail => &self.detail,
        }
    }

    /// Mutable camera by id.
    pub fn get_mut(&mut self, id: CameraId) -> &mut Camera {
        match id {
            CameraId::Primary => &mut self.primary,
            CameraId::Detail => &mut self.detail,
        }
    }
}

impl Default for CameraPair {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(m: &Mat4, p: [f32; 3]) -> [f32; 4] {
        let v = [p[0], p[1], p[2], 1.0];
        let mut out = [0.0; 4];
        for (r, cell) in out.iter_mut().enumerate() {
            *cell = (0..4).map(|k| m[k][r] * v[k]).sum();
        }
        out
    }

    #[test]
    fn test_view_moves_eye_to_origin() {
        let camera = Camera::new(Vec3::new(0.0, 2.4, 8.8), Vec3::new(0.0, 0.3, 0.0));
        let eye = transform(&camera.view(Vec3::ZERO), [0.0, 2.4, 8.8]);
        for component in &eye[..3] {
            assert!(component.abs() < 1e-4, "eye should map to origin: {eye:?}");
        }
    }

    #[test]
    fn test_point_ahead_lands_in_clip_volume() {
        let mut camera = Camera::new(Vec3::ZERO, Vec3::ZERO);
        camera.set_viewport(1920, 1080);
        let clip = transform(&camera.uniform(Vec3::ZERO).view_proj, [0.0, 0.0, -10.0]);
        let ndc_z = clip[2] / clip[3];
        assert!(clip[3] > 0.0);
        assert!((-1.0..=1.0).contains(&ndc_z));
    }

    #[test]
    fn test_degenerate_viewport_keeps_aspect() {
        let mut camera = Camera::new(Vec3::ZERO, Vec3::ZERO);
        camera.set_viewport(800, 400);
        camera.set_viewport(0, 400);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_uniform_is_pod() {
        let uniform = CameraPair::new().primary.uniform(Vec3::ZERO);
        assert_eq!(bytemuck::bytes_of(&uniform).len(), CameraUniform::SIZE);
    }
}
