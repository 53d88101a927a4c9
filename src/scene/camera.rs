use crate::core::math::transform::TransformFactory;
use crate::scene::navigation::NavigationInput;
use log::warn;
use nalgebra::{Matrix4, Vector3, Vector4};

/// Units per second along each translation axis.
pub const MOVE_SPEED: f32 = 10.0;
/// Radians per second per unit of yaw/pitch input.
pub const ROTATION_SPEED: f32 = 10.0 * std::f32::consts::PI / 180.0;

const BASIS_EPSILON: f32 = 1e-6;

/// First-person camera. Manages the View and Projection matrices.
///
/// The basis vectors are derived from the accumulated yaw/pitch every update and
/// are never set directly.
#[derive(Debug, Clone)]
pub struct Camera {
    // --- Pose ---
    origin: Vector3<f32>,
    forward: Vector3<f32>,
    up: Vector3<f32>,
    right: Vector3<f32>,
    total_pitch: f32,
    total_yaw: f32,

    // --- Projection Parameters ---
    fov_angle: f32,
    /// `tan(fov_angle / 2)`.
    fov: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
    projection_dirty: bool,

    // --- Cached Matrices ---
    inv_view_matrix: Matrix4<f32>,
    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,

    basis_warning_logged: bool,
}

impl Camera {
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 100.0;

    pub fn new(fov_angle_deg: f32, origin: Vector3<f32>, aspect_ratio: f32) -> Self {
        Self::with_clip_planes(
            fov_angle_deg,
            origin,
            aspect_ratio,
            Self::DEFAULT_NEAR,
            Self::DEFAULT_FAR,
        )
    }

    pub fn with_clip_planes(
        fov_angle_deg: f32,
        origin: Vector3<f32>,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut cam = Self {
            origin,
            forward: Vector3::z(),
            up: Vector3::y(),
            right: Vector3::x(),
            total_pitch: 0.0,
            total_yaw: 0.0,
            fov_angle: fov_angle_deg,
            fov: fov_tangent(fov_angle_deg),
            aspect_ratio,
            near,
            far,
            projection_dirty: false,
            inv_view_matrix: Matrix4::identity(),
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
            basis_warning_logged: false,
        };
        cam.calculate_view_matrix();
        cam.calculate_projection_matrix();
        cam
    }

    /// Applies one frame of navigation and refreshes the matrices.
    ///
    /// Translation uses the basis from the previous update; yaw/pitch then
    /// rebuild `forward` by rotating world +Z.
    pub fn update(&mut self, elapsed_sec: f32, input: &NavigationInput) {
        if !input.is_idle() {
            let step = MOVE_SPEED * elapsed_sec;
            self.origin += (self.forward * input.forward
                + self.right * input.right
                + self.up * input.up)
                * step;

            self.total_yaw += ROTATION_SPEED * elapsed_sec * input.yaw;
            self.total_pitch += ROTATION_SPEED * elapsed_sec * input.pitch;

            let rotation =
                TransformFactory::rotation_y(self.total_yaw) * TransformFactory::rotation_x(-self.total_pitch);
            self.forward = (rotation * Vector4::z()).xyz().normalize();
        }

        self.calculate_view_matrix();
        if self.projection_dirty {
            self.calculate_projection_matrix();
        }
    }

    /// Rebuilds the orthonormal basis from `forward` and inverts it into the view matrix.
    ///
    /// Yaw and pitch are already folded into `forward` by `update`; they are not composed again here.
    pub fn calculate_view_matrix(&mut self) {
        let mut right = Vector3::y().cross(&self.forward);
        if right.norm() < BASIS_EPSILON {
            if !self.basis_warning_logged {
                warn!(
                    "Camera forward {:?} is parallel to world up; using +Z as up reference",
                    self.forward
                );
                self.basis_warning_logged = true;
            }
            right = Vector3::z().cross(&self.forward);
        }
        self.right = right.normalize();
        self.up = self.forward.cross(&self.right).normalize();

        self.inv_view_matrix =
            TransformFactory::basis(&self.right, &self.up, &self.forward, &self.origin);
        match self.inv_view_matrix.try_inverse() {
            Some(view) => self.view_matrix = view,
            None => warn!("Camera basis is not invertible; keeping previous view matrix"),
        }
    }

    pub fn calculate_projection_matrix(&mut self) {
        self.projection_matrix =
            TransformFactory::perspective_lh(self.aspect_ratio, self.fov, self.near, self.far);
        self.projection_dirty = false;
    }

    /// Changes the vertical field of view; the projection is rebuilt on the next update.
    pub fn set_fov_angle(&mut self, fov_angle_deg: f32) {
        if (fov_angle_deg - self.fov_angle).abs() < f32::EPSILON {
            return;
        }
        self.fov_angle = fov_angle_deg;
        self.fov = fov_tangent(fov_angle_deg);
        self.projection_dirty = true;
    }

    pub fn origin(&self) -> Vector3<f32> {
        self.origin
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.forward
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn inv_view_matrix(&self) -> Matrix4<f32> {
        self.inv_view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }
}

fn fov_tangent(fov_angle_deg: f32) -> f32 {
    (fov_angle_deg.to_radians() / 2.0).tan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn approx(a: &Vector3<f32>, b: &Vector3<f32>) -> bool {
        (a - b).norm() < 1e-4
    }

    #[test]
    fn test_initial_camera_looks_down_z() {
        let cam = Camera::new(90.0, Vector3::zeros(), 1.0);
        assert!((cam.fov() - 1.0).abs() < 1e-6);
        assert!(approx(&cam.right(), &Vector3::x()));
        assert!(approx(&cam.up(), &Vector3::y()));
        assert!((cam.view_matrix() - Matrix4::identity()).norm() < 1e-5);
    }

    #[test]
    fn test_view_maps_origin_to_zero() {
        let cam = Camera::new(45.0, Vector3::new(0.0, 0.5, -64.0), 1.0);
        let p = cam.view_matrix().transform_point(&Point3::new(0.0, 0.5, -60.0));
        assert!(approx(&p.coords, &Vector3::new(0.0, 0.0, 4.0)));
    }

    #[test]
    fn test_forward_input_moves_along_forward() {
        let mut cam = Camera::new(60.0, Vector3::zeros(), 1.0);
        let input = NavigationInput {
            forward: 1.0,
            ..Default::default()
        };
        cam.update(0.5, &input);
        assert!(approx(&cam.origin(), &Vector3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn test_yaw_turns_forward_towards_right() {
        let mut cam = Camera::new(60.0, Vector3::zeros(), 1.0);
        // 9 units * 10 deg/s * 1 s = 90 degrees.
        let input = NavigationInput {
            yaw: 9.0,
            ..Default::default()
        };
        cam.update(1.0, &input);
        assert!(approx(&cam.forward(), &Vector3::x()));
        assert!(approx(&cam.right(), &Vector3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_basis_stays_orthonormal_after_rotation() {
        let mut cam = Camera::new(60.0, Vector3::zeros(), 1.0);
        let input = NavigationInput {
            yaw: 1.3,
            pitch: -2.1,
            ..Default::default()
        };
        cam.update(0.7, &input);
        let (f, r, u) = (cam.forward(), cam.right(), cam.up());
        assert!((f.norm() - 1.0).abs() < 1e-5);
        assert!(f.dot(&r).abs() < 1e-5);
        assert!(f.dot(&u).abs() < 1e-5);
        assert!(r.dot(&u).abs() < 1e-5);
    }

    #[test]
    fn test_looking_straight_up_keeps_finite_view() {
        let mut cam = Camera::new(60.0, Vector3::zeros(), 1.0);
        let input = NavigationInput {
            pitch: 9.0,
            ..Default::default()
        };
        cam.update(1.0, &input);
        assert!(cam.forward().y > 0.999);
        assert!(cam.view_matrix().iter().all(|v| v.is_finite()));
        assert!((cam.right().norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_fov_change_applies_on_next_update() {
        let mut cam = Camera::new(90.0, Vector3::zeros(), 1.0);
        let before = cam.projection_matrix();
        cam.set_fov_angle(60.0);
        assert_eq!(cam.projection_matrix(), before);

        cam.update(0.016, &NavigationInput::default());
        let expected = 1.0 / (30.0_f32.to_radians().tan());
        assert!((cam.projection_matrix()[(1, 1)] - expected).abs() < 1e-4);
    }
}
