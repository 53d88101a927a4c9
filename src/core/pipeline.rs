use nalgebra::{Vector2, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Trait for types that can be linearly interpolated across a triangle's surface.
///
/// Requirements:
/// - Copy: cheaply duplicable values for per-vertex storage and interpolation.
/// - Add + Mul<f32>: support the weighted sums used by barycentric interpolation.
/// - Send + Sync: safe to use from multiple threads during parallel rasterization.
pub trait Interpolatable: Copy + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync {}

impl<T> Interpolatable for T where T: Copy + Add<Output = T> + Mul<f32, Output = T> + Send + Sync {}

/// A decoded 2D texel grid that can be sampled.
///
/// Callers clamp `uv` to `[0, 1]` before sampling. Returned channels are in `[0, 1]`.
pub trait Sampler: Send + Sync {
    fn sample(&self, uv: Vector2<f32>) -> Vector3<f32>;
}

/// Perspective-correct surface attributes at one pixel, handed to the pixel shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    /// Pixel center x/y, post-divide z and perspective-correct view depth.
    pub position: Vector4<f32>,
    pub color: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub normal: Vector3<f32>,
    pub tangent: Vector3<f32>,
    pub view_direction: Vector3<f32>,
}

/// Per-pixel shading stage.
///
/// Implementations must be thread-safe (Send + Sync) because shading may be invoked
/// concurrently across framebuffer rows.
pub trait PixelShader: Send + Sync {
    /// Computes the final linear RGB color for a pixel that passed coverage and depth.
    /// The rasterizer scales the result into `[0, 1]` before quantizing.
    fn shade(&self, surface: &SurfacePoint) -> Vector3<f32>;
}
