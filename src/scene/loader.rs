use crate::core::math::transform::TransformFactory;
use crate::error::{RenderError, Result};
use crate::io::config::{Config, ObjectConfig};
use crate::io::obj_loader::load_obj;
use crate::scene::camera::Camera;
use crate::scene::light::DirectionalLight;
use crate::scene::material::TextureSet;
use crate::scene::mesh::{Mesh, PrimitiveTopology};
use crate::scene::scene_object::SceneObject;
use crate::scene::texture::Texture;
use log::info;
use nalgebra::{Matrix4, Vector3};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Camera position for scenes built from OBJ assets.
pub const ASSET_CAMERA_POSITION: [f32; 3] = [0.0, 0.5, -64.0];
/// Camera position for the built-in triangle scene.
pub const BUILTIN_CAMERA_POSITION: [f32; 3] = [0.0, 0.0, -10.0];

/// Shares decoded textures between objects that reference the same file.
#[derive(Default)]
struct TextureCache {
    loaded: HashMap<PathBuf, Arc<Texture>>,
}

impl TextureCache {
    fn get(&mut self, path: Option<&Path>) -> Result<Option<Arc<Texture>>> {
        let Some(path) = path else {
            return Ok(None);
        };
        if let Some(texture) = self.loaded.get(path) {
            return Ok(Some(Arc::clone(texture)));
        }

        let texture = Arc::new(Texture::load(path)?);
        self.loaded.insert(path.to_path_buf(), Arc::clone(&texture));
        Ok(Some(texture))
    }

    fn texture_set(&mut self, obj_conf: &ObjectConfig) -> Result<TextureSet> {
        Ok(TextureSet {
            diffuse: self.get(obj_conf.diffuse_texture.as_deref())?,
            normal: self.get(obj_conf.normal_texture.as_deref())?,
            specular: self.get(obj_conf.specular_texture.as_deref())?,
            gloss: self.get(obj_conf.gloss_texture.as_deref())?,
        })
    }
}

/// Loads every configured object with its textures.
///
/// Any missing or unreadable asset aborts setup. With no objects configured the
/// built-in test triangle is used.
pub fn init_scene(config: &Config) -> Result<Vec<SceneObject>> {
    if config.objects.is_empty() {
        info!("No objects configured; using the built-in test triangle.");
        return Ok(vec![SceneObject::new(
            Mesh::create_test_triangle(),
            Matrix4::identity(),
            TextureSet::default(),
        )]);
    }

    let mut textures = TextureCache::default();
    let mut scene_objects = Vec::with_capacity(config.objects.len());

    for obj_conf in &config.objects {
        // OBJ faces are triangulated into a list; strip indices cannot be recovered from them.
        if obj_conf.topology == PrimitiveTopology::TriangleStrip {
            return Err(RenderError::InvalidMesh(format!(
                "{:?}: OBJ meshes load as triangle lists, strip topology is not supported",
                obj_conf.path
            )));
        }
        let mesh = load_obj(&obj_conf.path)?;
        mesh.validate()?;

        let placement = TransformFactory::placement(
            &Vector3::from(obj_conf.position),
            &Vector3::from(obj_conf.rotation),
            &Vector3::from(obj_conf.scale),
        );
        scene_objects.push(SceneObject::new(
            mesh,
            placement,
            textures.texture_set(obj_conf)?,
        ));
    }

    info!("Scene initialized with {} objects.", scene_objects.len());
    Ok(scene_objects)
}

pub fn build_camera(config: &Config) -> Camera {
    let default_position = if config.objects.is_empty() {
        BUILTIN_CAMERA_POSITION
    } else {
        ASSET_CAMERA_POSITION
    };
    let position = config.camera.position.unwrap_or(default_position);
    let aspect_ratio = config.render.width as f32 / config.render.height.max(1) as f32;

    Camera::with_clip_planes(
        config.camera.fov,
        Vector3::from(position),
        aspect_ratio,
        config.camera.near,
        config.camera.far,
    )
}

pub fn build_light(config: &Config) -> Option<DirectionalLight> {
    config.light.enabled.then(|| {
        DirectionalLight::new(Vector3::from(config.light.direction), config.light.intensity)
    })
}
