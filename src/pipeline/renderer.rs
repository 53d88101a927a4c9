use crate::core::framebuffer::FrameBuffer;
use crate::core::rasterizer::{FrameStats, Rasterizer};
use crate::error::Result;
use crate::io::config::{Config, ShadingConfig};
use crate::io::image::{DEFAULT_DUMP_PATH, save_framebuffer};
use crate::pipeline::shaders::phong::{PhongShader, ShadingMode};
use crate::pipeline::transform::{FrameTransform, transform_meshes};
use crate::scene::camera::Camera;
use crate::scene::light::DirectionalLight;
use crate::scene::loader::{build_camera, build_light, init_scene};
use crate::scene::navigation::NavigationInput;
use crate::scene::scene_object::SceneObject;
use log::{debug, info};
use nalgebra::Vector3;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Runtime switches, changed only through the toggle/cycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    depth_visualization: bool,
    rotating: bool,
    normal_mapping: bool,
    shading_mode: ShadingMode,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            depth_visualization: false,
            rotating: true,
            normal_mapping: true,
            shading_mode: ShadingMode::Combined,
        }
    }
}

impl RenderState {
    pub fn from_config(shading: &ShadingConfig) -> Self {
        Self {
            depth_visualization: shading.depth_visualization,
            rotating: shading.rotating,
            normal_mapping: shading.normal_mapping,
            shading_mode: shading.mode,
        }
    }

    pub fn depth_visualization(&self) -> bool {
        self.depth_visualization
    }

    pub fn rotating(&self) -> bool {
        self.rotating
    }

    pub fn normal_mapping(&self) -> bool {
        self.normal_mapping
    }

    pub fn shading_mode(&self) -> ShadingMode {
        self.shading_mode
    }

    pub fn toggle_depth_visualization(&mut self) {
        self.depth_visualization = !self.depth_visualization;
        info!("Depth buffer visualization: {}", on_off(self.depth_visualization));
    }

    pub fn toggle_rotation(&mut self) {
        self.rotating = !self.rotating;
        info!("Mesh rotation: {}", on_off(self.rotating));
    }

    pub fn toggle_normal_mapping(&mut self) {
        self.normal_mapping = !self.normal_mapping;
        info!("Normal mapping: {}", on_off(self.normal_mapping));
    }

    pub fn cycle_shading_mode(&mut self) {
        self.shading_mode = self.shading_mode.next();
        info!("Shading mode: {}", self.shading_mode);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

/// The high-level renderer that orchestrates the pipeline stages.
///
/// A frame is `update` (camera + mesh rotation) followed by `render`
/// (clear, vertex transform, rasterize every object in order).
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
    pub camera: Camera,
    pub objects: Vec<SceneObject>,
    pub light: Option<DirectionalLight>,
    pub ambient: Vector3<f32>,
    pub shininess: f32,
    pub background: [u8; 3],
    /// Radians per second while rotation is on.
    pub rotation_speed: f32,
    rotation_angle: f32,
    state: RenderState,
}

impl Renderer {
    pub fn new(width: usize, height: usize, camera: Camera, objects: Vec<SceneObject>) -> Self {
        let shading = ShadingConfig::default();
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
            camera,
            objects,
            light: Some(DirectionalLight::default()),
            ambient: Vector3::repeat(shading.ambient),
            shininess: shading.shininess,
            background: [100, 100, 100],
            rotation_speed: shading.rotation_speed,
            rotation_angle: 0.0,
            state: RenderState::default(),
        }
    }

    /// Builds the scene, camera, light and switches described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let objects = init_scene(config)?;
        let camera = build_camera(config);

        let mut renderer = Self::new(config.render.width, config.render.height, camera, objects);
        renderer.rasterizer.parallel = config.render.parallel;
        renderer.light = build_light(config);
        renderer.ambient = Vector3::repeat(config.shading.ambient);
        renderer.shininess = config.shading.shininess;
        renderer.background = config.render.background;
        renderer.rotation_speed = config.shading.rotation_speed;
        renderer.state = RenderState::from_config(&config.shading);
        Ok(renderer)
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RenderState {
        &mut self.state
    }

    /// Advances the camera and, while rotation is on, spins every object about its Y axis.
    pub fn update(&mut self, elapsed_sec: f32, input: &NavigationInput) {
        self.camera.update(elapsed_sec, input);

        if self.state.rotating {
            self.rotation_angle += self.rotation_speed * elapsed_sec;
        }
        let angle = self.rotation_angle;
        for object in &mut self.objects {
            object.set_rotation(angle);
        }
    }

    /// Renders one frame into the framebuffer.
    pub fn render(&mut self) -> FrameStats {
        self.framebuffer.clear(self.background);
        self.rasterizer.visualize_depth = self.state.depth_visualization;

        // 1. Vertex Transform Stage
        let frame = FrameTransform {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            camera_origin: self.camera.origin(),
            width: self.framebuffer.width,
            height: self.framebuffer.height,
        };
        transform_meshes(
            self.objects.par_iter_mut().map(|object| &mut object.mesh),
            &frame,
        );

        // 2. Rasterization, objects in submission order
        let mut stats = FrameStats::default();
        for object in &self.objects {
            let shader = PhongShader {
                textures: &object.textures,
                light: self.light,
                ambient: self.ambient,
                shininess: self.shininess,
                normal_mapping: self.state.normal_mapping,
                mode: self.state.shading_mode,
            };
            let mesh_stats = self
                .rasterizer
                .draw_mesh(&mut self.framebuffer, &object.mesh, &shader);
            stats.merge(&mesh_stats);
        }

        debug!("Frame stats: {:?}", stats);
        stats
    }

    /// Dumps the color buffer; `None` writes the default dump file.
    pub fn save_buffer_to_image(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path.unwrap_or(Path::new(DEFAULT_DUMP_PATH));
        save_framebuffer(&self.framebuffer, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::{pack_rgb, unpack_rgb};
    use crate::scene::material::TextureSet;
    use crate::scene::mesh::Mesh;
    use nalgebra::Matrix4;

    fn triangle_renderer() -> Renderer {
        let camera = Camera::new(60.0, Vector3::new(0.0, 0.0, -6.0), 1.0);
        let object = SceneObject::new(
            Mesh::create_test_triangle(),
            Matrix4::identity(),
            TextureSet::default(),
        );
        Renderer::new(64, 64, camera, vec![object])
    }

    #[test]
    fn test_toggles_flip_and_cycle() {
        let mut state = RenderState::default();
        state.toggle_depth_visualization();
        state.toggle_rotation();
        state.toggle_normal_mapping();
        assert!(state.depth_visualization());
        assert!(!state.rotating());
        assert!(!state.normal_mapping());

        for _ in 0..ShadingMode::ALL.len() {
            state.cycle_shading_mode();
        }
        assert_eq!(state.shading_mode(), ShadingMode::Combined);
        state.cycle_shading_mode();
        assert_eq!(state.shading_mode(), ShadingMode::ObservedArea);
    }

    #[test]
    fn test_render_draws_over_background() {
        let mut renderer = triangle_renderer();
        renderer.state_mut().cycle_shading_mode(); // observed area
        let stats = renderer.render();
        assert_eq!(stats.triangles_rasterized, 1);
        assert!(stats.pixels_shaded > 0);

        let background = pack_rgb([100, 100, 100]);
        assert_eq!(renderer.framebuffer.get_pixel(0, 0), Some(background));
        assert_ne!(renderer.framebuffer.get_pixel(32, 32), Some(background));
        assert!(renderer.framebuffer.get_depth(32, 32).unwrap().is_finite());
    }

    #[test]
    fn test_rotation_only_advances_while_enabled() {
        let mut renderer = triangle_renderer();
        renderer.update(1.0, &NavigationInput::default());
        let spun = renderer.objects[0].mesh.world_matrix;
        assert_ne!(spun, Matrix4::identity());

        renderer.state_mut().toggle_rotation();
        renderer.update(1.0, &NavigationInput::default());
        assert_eq!(renderer.objects[0].mesh.world_matrix, spun);
    }

    #[test]
    fn test_depth_visualization_is_grayscale() {
        let mut renderer = triangle_renderer();
        renderer.state_mut().toggle_depth_visualization();
        renderer.render();
        let [r, g, b] = unpack_rgb(renderer.framebuffer.get_pixel(32, 32).unwrap());
        assert!(r == g && g == b);
    }
}
