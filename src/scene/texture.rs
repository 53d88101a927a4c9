use crate::core::pipeline::Sampler;
use crate::error::{RenderError, Result};
use image::{Rgb, RgbImage};
use log::info;
use nalgebra::{Vector2, Vector3};
use std::path::Path;

/// A decoded 2D texel grid, sampled with nearest-neighbour lookup.
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref).map_err(|source| RenderError::Image {
            path: path_ref.to_path_buf(),
            source,
        })?;

        let texture = Self::from_image(img.to_rgb8());
        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref, texture.width, texture.height
        );

        Ok(texture)
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            image,
        }
    }

    /// A 1x1 texture returning `color` everywhere.
    pub fn solid(color: [u8; 3]) -> Self {
        Self::from_image(RgbImage::from_pixel(1, 1, Rgb(color)))
    }

    /// Texel index along one axis, clamped to the grid.
    #[inline(always)]
    fn texel(coord: f32, size: u32) -> u32 {
        let max = size.saturating_sub(1);
        // `as` saturates and maps NaN to 0.
        ((coord * size as f32) as u32).min(max)
    }
}

impl Sampler for Texture {
    /// Row 0 of the image is `v = 0`.
    fn sample(&self, uv: Vector2<f32>) -> Vector3<f32> {
        if self.width == 0 || self.height == 0 {
            return Vector3::zeros();
        }

        let x = Self::texel(uv.x, self.width);
        let y = Self::texel(uv.y, self.height);
        let pixel = self.image.get_pixel(x, y);

        Vector3::new(
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        )
    }
}
