use crate::core::color::max_to_one;
use crate::core::pipeline::{PixelShader, SurfacePoint};
use crate::scene::light::DirectionalLight;
use crate::scene::material::TextureSet;
use nalgebra::{Vector2, Vector3};
use serde::Deserialize;
use std::f32::consts::PI;
use std::fmt;

/// Which term of the lighting model ends up in the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// Lambert cosine as grayscale.
    ObservedArea,
    Diffuse,
    Specular,
    #[default]
    Combined,
}

impl ShadingMode {
    pub const ALL: [ShadingMode; 4] = [
        ShadingMode::ObservedArea,
        ShadingMode::Diffuse,
        ShadingMode::Specular,
        ShadingMode::Combined,
    ];

    /// The following mode, wrapping after `Combined`.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShadingMode::ObservedArea => "observed area",
            ShadingMode::Diffuse => "diffuse",
            ShadingMode::Specular => "specular",
            ShadingMode::Combined => "combined",
        };
        f.write_str(name)
    }
}

/// Textured Phong shading under a single directional light.
///
/// Without a light the surface is treated as fully facing, unlit: the
/// observed area is 1, diffuse is the raw diffuse sample and specular is 0.
pub struct PhongShader<'a> {
    pub textures: &'a TextureSet,
    pub light: Option<DirectionalLight>,
    pub ambient: Vector3<f32>,
    pub shininess: f32,
    pub normal_mapping: bool,
    pub mode: ShadingMode,
}

/// The individual terms, before mode selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingTerms {
    pub observed_area: f32,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl PhongShader<'_> {
    /// Shading normal: geometric, or perturbed by the normal map in the
    /// `{tangent, bitangent, normal}` frame.
    fn shading_normal(&self, surface: &SurfacePoint, uv: Vector2<f32>) -> Vector3<f32> {
        let normal = surface.normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
        if !self.normal_mapping {
            return normal;
        }
        let Some(sample) = self.textures.tangent_normal(uv) else {
            return normal;
        };

        let tangent = surface.tangent.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
        let bitangent = normal.cross(&tangent);
        let mapped = tangent * sample.x + bitangent * sample.y + normal * sample.z;
        mapped.try_normalize(f32::EPSILON).unwrap_or(normal)
    }

    pub fn lighting(&self, surface: &SurfacePoint) -> LightingTerms {
        let uv = surface.uv.map(|c| c.clamp(0.0, 1.0));
        let diffuse_sample = self.textures.diffuse_or(uv, surface.color);

        let Some(light) = &self.light else {
            return LightingTerms {
                observed_area: 1.0,
                diffuse: diffuse_sample,
                specular: Vector3::zeros(),
            };
        };

        let normal = self.shading_normal(surface, uv);
        let observed_area = normal.dot(&light.to_light());
        let diffuse = diffuse_sample * light.intensity / PI;

        // Phong: reflect the light about the normal and compare with the direction to the eye.
        let reflected = light.direction - normal * (2.0 * normal.dot(&light.direction));
        let to_eye = -surface
            .view_direction
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        let exponent = self.textures.gloss(uv).x * self.shininess;
        let cos_reflect = reflected.dot(&to_eye);
        // powf(0.0) is 1 even for a zero base, so facing away must be cut explicitly.
        let strength = if cos_reflect > 0.0 {
            cos_reflect.powf(exponent)
        } else {
            0.0
        };
        let specular = max_to_one(self.textures.specular(uv) * strength);

        LightingTerms {
            observed_area,
            diffuse,
            specular,
        }
    }
}

impl PixelShader for PhongShader<'_> {
    fn shade(&self, surface: &SurfacePoint) -> Vector3<f32> {
        let terms = self.lighting(surface);
        let lit = terms.observed_area > 0.0;

        match self.mode {
            ShadingMode::ObservedArea if lit => Vector3::repeat(terms.observed_area),
            ShadingMode::Diffuse => terms.diffuse + self.ambient,
            ShadingMode::Specular => terms.specular,
            ShadingMode::Combined if lit => {
                (terms.diffuse + self.ambient + terms.specular) * terms.observed_area
            }
            ShadingMode::ObservedArea | ShadingMode::Combined => Vector3::zeros(),
        }
    }
}
