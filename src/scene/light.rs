use nalgebra::Vector3;

/// A light source infinitely far away; rays are parallel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels, normalized.
    pub direction: Vector3<f32>,
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vector3::new(0.577, -0.577, 0.577), 7.0)
    }
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f32>, intensity: f32) -> Self {
        Self {
            direction: direction.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::z),
            intensity,
        }
    }

    /// Direction FROM the surface TO the light.
    #[inline]
    pub fn to_light(&self) -> Vector3<f32> {
        -self.direction
    }
}
