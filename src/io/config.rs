use crate::error::{RenderError, Result};
use crate::pipeline::shaders::phong::ShadingMode;
use crate::scene::mesh::PrimitiveTopology;
use crate::scene::navigation::NavigationInput;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Scene and renderer settings. Every field has a default, so an empty file is valid.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub shading: ShadingConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    /// Dump path for the final frame; empty means a timestamped name.
    #[serde(default = "default_output")]
    pub output: String,

    // --- Frame Loop ---
    #[serde(default = "default_frames")]
    pub frames: usize,
    /// Simulated seconds per frame.
    #[serde(default = "default_frame_time")]
    pub frame_time: f32,

    // --- Pipeline ---
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default = "default_background")]
    pub background: [u8; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            frames: default_frames(),
            frame_time: default_frame_time(),
            parallel: true,
            background: default_background(),
        }
    }
}

fn default_width() -> usize {
    640
}
fn default_height() -> usize {
    480
}
fn default_output() -> String {
    "rasterizer_color_buffer.bmp".to_string()
}
fn default_frames() -> usize {
    1
}
fn default_frame_time() -> f32 {
    1.0 / 60.0
}
fn default_background() -> [u8; 3] {
    [100, 100, 100]
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    /// Falls back to a scene-dependent default when unset.
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Applied every frame in headless runs.
    #[serde(default)]
    pub navigation: NavigationInput,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            position: None,
            near: default_near(),
            far: default_far(),
            navigation: NavigationInput::default(),
        }
    }
}

fn default_fov() -> f32 {
    45.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}

#[derive(Debug, Deserialize)]
pub struct ShadingConfig {
    #[serde(default)]
    pub mode: ShadingMode,
    #[serde(default = "default_ambient")]
    pub ambient: f32,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    #[serde(default = "default_true")]
    pub normal_mapping: bool,
    #[serde(default)]
    pub depth_visualization: bool,
    #[serde(default = "default_true")]
    pub rotating: bool,
    /// Radians per second.
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            mode: ShadingMode::default(),
            ambient: default_ambient(),
            shininess: default_shininess(),
            normal_mapping: true,
            depth_visualization: false,
            rotating: true,
            rotation_speed: default_rotation_speed(),
        }
    }
}

fn default_ambient() -> f32 {
    0.03
}
fn default_shininess() -> f32 {
    25.0
}
fn default_rotation_speed() -> f32 {
    0.5
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_light_intensity")]
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            direction: default_light_direction(),
            intensity: default_light_intensity(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [0.577, -0.577, 0.577]
}
fn default_light_intensity() -> f32 {
    7.0
}

#[derive(Debug, Deserialize)]
pub struct ObjectConfig {
    pub path: PathBuf,
    /// OBJ files always load as lists; `strip` is rejected at scene setup.
    #[serde(default)]
    pub topology: PrimitiveTopology,

    // --- Transform ---
    #[serde(default = "default_position")]
    pub position: [f32; 3],
    /// Degrees about X, Y, Z.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],

    // --- Textures ---
    pub diffuse_texture: Option<PathBuf>,
    pub normal_texture: Option<PathBuf>,
    pub specular_texture: Option<PathBuf>,
    pub gloss_texture: Option<PathBuf>,
}

fn default_position() -> [f32; 3] {
    [0.0, 0.0, -40.0]
}
fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.render.width, 640);
        assert_eq!(config.render.background, [100, 100, 100]);
        assert_eq!(config.camera.fov, 45.0);
        assert!(config.camera.position.is_none());
        assert_eq!(config.shading.mode, ShadingMode::Combined);
        assert!((config.shading.ambient - 0.03).abs() < 1e-6);
        assert!(config.light.enabled);
        assert!(config.objects.is_empty());
    }

    #[test]
    fn test_full_scene_parses() {
        let config = Config::from_toml(
            r#"
            [render]
            width = 320
            height = 200
            frames = 3
            parallel = false

            [camera]
            fov = 60.0
            position = [0.0, 0.5, -64.0]
            navigation = { forward = 1.0, yaw = 0.5 }

            [shading]
            mode = "observed_area"
            depth_visualization = true

            [light]
            enabled = false

            [[objects]]
            path = "assets/vehicle.obj"
            topology = "strip"
            diffuse_texture = "assets/vehicle_diffuse.png"
            "#,
        )
        .unwrap();

        assert_eq!(config.render.frames, 3);
        assert!(!config.render.parallel);
        assert_eq!(config.camera.position, Some([0.0, 0.5, -64.0]));
        assert_eq!(config.camera.navigation.forward, 1.0);
        assert_eq!(config.camera.navigation.yaw, 0.5);
        assert_eq!(config.shading.mode, ShadingMode::ObservedArea);
        assert!(config.shading.depth_visualization);
        assert!(!config.light.enabled);

        let object = &config.objects[0];
        assert_eq!(object.topology, PrimitiveTopology::TriangleStrip);
        assert_eq!(object.position, [0.0, 0.0, -40.0]);
        assert_eq!(object.scale, [1.0, 1.0, 1.0]);
        assert!(object.diffuse_texture.is_some());
        assert!(object.normal_texture.is_none());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = Config::from_toml("[render]\nwidth = \"wide\"").unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load("no/such/scene.toml").unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}
