use crate::core::pipeline::Sampler;
use crate::scene::texture::Texture;
use nalgebra::{Vector2, Vector3};
use std::sync::Arc;

/// The four maps the pixel shader reads.
///
/// Missing maps fall back to neutral values: no diffuse map means the
/// interpolated vertex color is used, no normal map means the geometric
/// normal, and specular/gloss default to zero.
#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    pub diffuse: Option<Arc<Texture>>,
    pub normal: Option<Arc<Texture>>,
    pub specular: Option<Arc<Texture>>,
    pub gloss: Option<Arc<Texture>>,
}

impl TextureSet {
    pub fn diffuse_or(&self, uv: Vector2<f32>, fallback: Vector3<f32>) -> Vector3<f32> {
        sample_or(self.diffuse.as_deref(), uv, fallback)
    }

    /// Tangent-space normal, decoded from `[0, 1]` texels to `[-1, 1]`.
    pub fn tangent_normal(&self, uv: Vector2<f32>) -> Option<Vector3<f32>> {
        self.normal
            .as_deref()
            .map(|tex| tex.sample(uv) * 2.0 - Vector3::new(1.0, 1.0, 1.0))
    }

    pub fn specular(&self, uv: Vector2<f32>) -> Vector3<f32> {
        sample_or(self.specular.as_deref(), uv, Vector3::zeros())
    }

    pub fn gloss(&self, uv: Vector2<f32>) -> Vector3<f32> {
        sample_or(self.gloss.as_deref(), uv, Vector3::zeros())
    }
}

#[inline]
fn sample_or(texture: Option<&Texture>, uv: Vector2<f32>, fallback: Vector3<f32>) -> Vector3<f32> {
    texture.map_or(fallback, |tex| tex.sample(uv))
}
