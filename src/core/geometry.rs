use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// Represents a single vertex in local object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Per-vertex color, white unless the asset says otherwise.
    pub color: Vector3<f32>,
    /// Texture coordinates (UV).
    pub uv: Vector2<f32>,
    /// Normal vector for lighting calculations.
    pub normal: Vector3<f32>,
    /// Tangent vector (xyz) for Normal Mapping.
    pub tangent: Vector3<f32>,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            color: Vector3::new(1.0, 1.0, 1.0),
            uv: Vector2::zeros(),
            normal: Vector3::zeros(),
            tangent: Vector3::zeros(),
        }
    }
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, uv: Vector2<f32>) -> Self {
        Self {
            position,
            normal,
            uv,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Vector3<f32>) -> Self {
        self.color = color;
        self
    }

    pub fn with_tangent(mut self, tangent: Vector3<f32>) -> Self {
        self.tangent = tangent;
        self
    }
}

/// A vertex after the transform stage.
///
/// `position` holds screen-space `x`/`y` in pixels, post-divide depth `z` and
/// `w = 1 / clip.w`. The remaining attributes live in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOut {
    pub position: Vector4<f32>,
    pub color: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub normal: Vector3<f32>,
    pub tangent: Vector3<f32>,
    /// World position minus camera origin.
    pub view_direction: Vector3<f32>,
}

impl VertexOut {
    /// Reciprocal of the clip-space w, used for perspective-correct interpolation.
    #[inline(always)]
    pub fn w_reciprocal(&self) -> f32 {
        self.position.w
    }

    /// True when post-divide depth lies inside `[0, 1]`. NaN depth is never in range.
    #[inline(always)]
    pub fn is_in_depth_range(&self) -> bool {
        (0.0..=1.0).contains(&self.position.z)
    }
}
