use nalgebra::{Matrix4, Point2, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for creating various transformation matrices.
/// Left-handed coordinates (+Z forward), column vectors, depth mapped to [0, 1].
/// Compose as `projection * view * world * p`.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Z-axis.
    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a non-uniform scaling matrix.
    pub fn scaling_nonuniform(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Translation * (X, Y, Z rotations in degrees) * scale.
    pub fn placement(position: &Vector3<f32>, rotation_deg: &Vector3<f32>, scale: &Vector3<f32>) -> Matrix4<f32> {
        Self::translation(position)
            * Self::rotation_x(rotation_deg.x.to_radians())
            * Self::rotation_y(rotation_deg.y.to_radians())
            * Self::rotation_z(rotation_deg.z.to_radians())
            * Self::scaling_nonuniform(scale)
    }

    /// Camera-to-world matrix from an orthonormal basis and an origin.
    /// Its inverse is the view matrix.
    pub fn basis(
        right: &Vector3<f32>,
        up: &Vector3<f32>,
        forward: &Vector3<f32>,
        origin: &Vector3<f32>,
    ) -> Matrix4<f32> {
        Matrix4::new(
            right.x, up.x, forward.x, origin.x,
            right.y, up.y, forward.y, origin.y,
            right.z, up.z, forward.z, origin.z,
            0.0,     0.0,  0.0,       1.0,
        )
    }

    /// Creates a left-handed perspective projection.
    ///
    /// `fov` is `tan(fov_y / 2)`. View depth `near..far` maps to post-divide `0..1`
    /// and clip `w` equals view-space z.
    pub fn perspective_lh(aspect_ratio: f32, fov: f32, near: f32, far: f32) -> Matrix4<f32> {
        let range = far / (far - near);

        Matrix4::new(
            1.0 / (aspect_ratio * fov), 0.0,       0.0,   0.0,
            0.0,                        1.0 / fov, 0.0,   0.0,
            0.0,                        0.0,       range, -near * range,
            0.0,                        0.0,       1.0,   0.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Performs perspective division: Clip Space -> NDC.
///
/// The returned `w` holds `1 / clip.w`. A zero `w` yields non-finite
/// components, which the depth-range test rejects downstream.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Vector4<f32> {
    let w_reciprocal = 1.0 / clip.w;
    Vector4::new(
        clip.x * w_reciprocal,
        clip.y * w_reciprocal,
        clip.z * w_reciprocal,
        w_reciprocal,
    )
}

/// Converts NDC coordinates to Screen coordinates (Viewport Transform).
/// Note: Y-axis is flipped (NDC +Y is up, Screen +Y is down).
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new(
        (ndc_x + 1.0) * 0.5 * width,
        (1.0 - ndc_y) * 0.5 * height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_perspective_maps_near_and_far_to_unit_depth() {
        let fov = (45.0_f32.to_radians() / 2.0).tan();
        let proj = TransformFactory::perspective_lh(1.0, fov, 0.1, 100.0);

        let near = apply_perspective_division(&(proj * Vector4::new(0.0, 0.0, 0.1, 1.0)));
        let far = apply_perspective_division(&(proj * Vector4::new(0.0, 0.0, 100.0, 1.0)));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-5);

        // w keeps the view depth so its reciprocal can drive interpolation.
        assert!((near.w - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_points_in_front_of_near_plane_fall_outside_depth_range() {
        let proj = TransformFactory::perspective_lh(1.0, 1.0, 1.0, 10.0);
        let behind = apply_perspective_division(&(proj * Vector4::new(0.0, 0.0, -2.0, 1.0)));
        let too_close = apply_perspective_division(&(proj * Vector4::new(0.0, 0.0, 0.5, 1.0)));
        assert!(behind.z > 1.0);
        assert!(too_close.z < 0.0);
    }

    #[test]
    fn test_basis_inverse_is_view() {
        let forward = Vector3::new(1.0, 0.0, 1.0).normalize();
        let right = Vector3::y().cross(&forward).normalize();
        let up = forward.cross(&right);
        let origin = Vector3::new(3.0, -2.0, 5.0);
        let inv_view = TransformFactory::basis(&right, &up, &forward, &origin);
        let view = inv_view.try_inverse().unwrap();

        let ahead = Point3::from(origin + forward * 4.0);
        let in_view = view.transform_point(&ahead);
        assert!(in_view.x.abs() < 1e-5 && in_view.y.abs() < 1e-5);
        assert!((in_view.z - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_canonical_composition_matches_stepwise_transform() {
        let world = TransformFactory::placement(
            &Vector3::new(1.0, 2.0, 8.0),
            &Vector3::new(10.0, 45.0, -5.0),
            &Vector3::new(1.0, 2.0, 1.0),
        );
        let view = TransformFactory::translation(&Vector3::new(0.0, -0.5, 2.0));
        let proj = TransformFactory::perspective_lh(4.0 / 3.0, 0.5, 0.1, 100.0);
        let p = Vector4::new(0.3, -0.7, 1.1, 1.0);

        let stepwise = proj * (view * (world * p));
        let combined = (proj * view * world) * p;
        assert!((stepwise - combined).norm() < 1e-4);
    }

    #[test]
    fn test_ndc_to_screen_flips_y() {
        let top_left = ndc_to_screen(-1.0, 1.0, 100.0, 50.0);
        let bottom_right = ndc_to_screen(1.0, -1.0, 100.0, 50.0);
        assert_eq!(top_left, Point2::new(0.0, 0.0));
        assert_eq!(bottom_right, Point2::new(100.0, 50.0));
    }
}
