use nalgebra::Vector3;

/// Scales a color down so that no channel exceeds 1.0, preserving hue.
/// Negative channels are clamped to zero first.
pub fn max_to_one(color: Vector3<f32>) -> Vector3<f32> {
    let color = color.map(|c| c.max(0.0));
    let max = color.x.max(color.y).max(color.z);
    if max > 1.0 { color / max } else { color }
}

/// Quantizes a color to 8-bit channels, rounding to nearest after the hue-preserving clamp.
pub fn to_rgb8(color: Vector3<f32>) -> [u8; 3] {
    let c = max_to_one(color);
    [
        (c.x * 255.0).round() as u8,
        (c.y * 255.0).round() as u8,
        (c.z * 255.0).round() as u8,
    ]
}

/// Packs 8-bit channels into `0x00RRGGBB`.
#[inline]
pub fn pack_rgb([r, g, b]: [u8; 3]) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
pub fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
    ]
}

/// Converts a shaded color straight into a packed framebuffer pixel.
#[inline]
pub fn to_packed(color: Vector3<f32>) -> u32 {
    pack_rgb(to_rgb8(color))
}
