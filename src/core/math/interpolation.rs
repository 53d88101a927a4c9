use crate::core::pipeline::Interpolatable;
use nalgebra::{Point2, Vector3};

/// Doubled screen areas below this are treated as degenerate.
pub const DEGENERATE_AREA_EPSILON: f32 = 1e-5;

/// Signed double area of triangle (a, b, p): the 2D cross product `(b - a) x (p - a)`.
#[inline(always)]
pub fn edge_function(a: Point2<f32>, b: Point2<f32>, p: Point2<f32>) -> f32 {
    let ab = b - a;
    let ap = p - a;
    ab.x * ap.y - ab.y * ap.x
}

/// Calculates the barycentric weights (w0, w1, w2) of point p
/// with respect to triangle (v0, v1, v2).
///
/// Each weight is the signed area of the sub-triangle opposite its vertex divided
/// by the signed total area, so the result is independent of winding.
/// Returns `None` if the triangle is degenerate (area is near zero).
pub fn barycentric_weights(
    p: Point2<f32>,
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
) -> Option<Vector3<f32>> {
    let total_area_x2 = edge_function(v0, v1, v2);
    if total_area_x2.abs() < DEGENERATE_AREA_EPSILON {
        return None;
    }

    // Each weight gets its own cross product so a point on an edge yields an exact zero.
    let w0 = edge_function(v1, v2, p) / total_area_x2;
    let w1 = edge_function(v2, v0, p) / total_area_x2;
    let w2 = edge_function(v0, v1, p) / total_area_x2;

    Some(Vector3::new(w0, w1, w2))
}

/// Checks if the weights represent a point inside (or on the edge of) the triangle.
#[inline(always)]
pub fn is_inside_triangle(weights: &Vector3<f32>) -> bool {
    weights.x >= 0.0 && weights.y >= 0.0 && weights.z >= 0.0
}

/// Perspective-correct depth: the reciprocal of the interpolated `1/w`.
///
/// Returns `None` when the interpolated reciprocal is not strictly positive.
#[inline]
pub fn perspective_correct_depth(weights: &Vector3<f32>, w_reciprocals: &Vector3<f32>) -> Option<f32> {
    let inv_depth = weights.dot(w_reciprocals);
    (inv_depth > 0.0 && inv_depth.is_finite()).then(|| 1.0 / inv_depth)
}

/// Interpolates a per-vertex attribute with perspective correction:
/// `(A0 * w0 / W0 + A1 * w1 / W1 + A2 * w2 / W2) * depth`.
#[inline]
pub fn perspective_correct_interpolate<T: Interpolatable>(
    attributes: &[T; 3],
    weights: &Vector3<f32>,
    w_reciprocals: &Vector3<f32>,
    depth: f32,
) -> T {
    let corrected = weights.component_mul(w_reciprocals) * depth;
    attributes[0] * corrected.x + attributes[1] * corrected.y + attributes[2] * corrected.z
}

/// Plain screen-space (affine) interpolation, valid for values that are already
/// linear in screen space such as post-divide depth.
#[inline]
pub fn linear_interpolate<T: Interpolatable>(attributes: &[T; 3], weights: &Vector3<f32>) -> T {
    attributes[0] * weights.x + attributes[1] * weights.y + attributes[2] * weights.z
}
