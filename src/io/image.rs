use crate::core::color::unpack_rgb;
use crate::core::framebuffer::FrameBuffer;
use crate::error::{RenderError, Result};
use chrono::Local;
use image::{Rgb, RgbImage};
use log::info;
use std::path::{Path, PathBuf};

/// Default dump location for the diagnostic export.
pub const DEFAULT_DUMP_PATH: &str = "rasterizer_color_buffer.bmp";

/// `rasterizer_YYYYmmdd_HHMMSS.bmp` in the working directory.
pub fn timestamped_dump_path() -> PathBuf {
    PathBuf::from(format!(
        "rasterizer_{}.bmp",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Converts the packed `0x00RRGGBB` color buffer into an RGB image.
pub fn framebuffer_to_image(framebuffer: &FrameBuffer) -> Result<RgbImage> {
    let (width, height) = (framebuffer.width, framebuffer.height);
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyFramebuffer { width, height });
    }

    let pixels = framebuffer.pixels();
    Ok(RgbImage::from_fn(width as u32, height as u32, |x, y| {
        Rgb(unpack_rgb(pixels[y as usize * width + x as usize]))
    }))
}

/// Writes the color buffer to `path`; the format follows the file extension.
pub fn save_framebuffer<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let img = framebuffer_to_image(framebuffer)?;
    img.save(path).map_err(|source| RenderError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Saved {}x{} framebuffer to {:?}",
        framebuffer.width, framebuffer.height, path
    );
    Ok(path.to_path_buf())
}
