/// Camera, projection and the user-controlled orbit around the cube
use nalgebra::{Matrix4, Point3, Vector3};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

/// Orbit angles (radians) applied to the whole cube before viewing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub pitch: f32,
    pub yaw: f32,
}

impl Orbit {
    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }

    /// Rotate by delta amounts; pitch is clamped so the cube never flips over.
    pub fn rotate(&mut self, d_pitch: f32, d_yaw: f32) {
        let limit = std::f32::consts::FRAC_PI_2;
        self.pitch = (self.pitch + d_pitch).clamp(-limit, limit);
        self.yaw += d_yaw;
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(self.pitch, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, self.yaw, 0.0));
        rx * ry
    }
}

impl Default for Orbit {
    /// Looking down at the white, blue and orange faces.
    fn default() -> Self {
        Self::new(0.5, -0.6)
    }
}

/// Perspective camera on the +Z axis looking at the origin.
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 10.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / (height.max(1) as f32 * CELL_ASPECT),
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined view and projection, computed once per frame.
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a model-space point to screen cells plus depth.
    ///
    /// Returns `None` for points outside the view volume.
    pub fn project_to_screen(
        view_projection: &Matrix4<f32>,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let ndc = (view_projection * model_matrix).transform_point(point);
        if ![ndc.x, ndc.y, ndc.z].iter().all(|c| (-1.0..=1.0).contains(c)) {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;
        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(80, 20);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
        assert!(camera.view_matrix().norm() > 0.0);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(80, 24);
        let vp = camera.view_projection();
        let (x, y, depth) =
            Camera::project_to_screen(&vp, &Point3::origin(), &Matrix4::identity(), 80, 24).unwrap();
        assert!((x - 40.0).abs() < 1e-3);
        assert!((y - 12.0).abs() < 1e-3);

        let near = Camera::project_to_screen(&vp, &Point3::new(0.0, 0.0, 1.0), &Matrix4::identity(), 80, 24)
            .unwrap();
        assert!(near.2 < depth);
    }

    #[test]
    fn test_points_behind_camera_are_clipped() {
        let vp = Camera::default().view_projection();
        let behind = Point3::new(0.0, 0.0, 20.0);
        assert!(Camera::project_to_screen(&vp, &behind, &Matrix4::identity(), 80, 24).is_none());
    }

    #[test]
    fn test_orbit_pitch_is_clamped() {
        let mut orbit = Orbit::new(0.0, 0.0);
        orbit.rotate(10.0, 0.3);
        assert_eq!(orbit.pitch, std::f32::consts::FRAC_PI_2);
        assert!((orbit.yaw - 0.3).abs() < 1e-6);
        assert!((Orbit::new(0.0, 0.0).matrix() - Matrix4::identity()).norm() < 1e-6);
    }
}
