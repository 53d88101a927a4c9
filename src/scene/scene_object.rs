use crate::core::math::transform::TransformFactory;
use crate::scene::material::TextureSet;
use crate::scene::mesh::Mesh;
use nalgebra::Matrix4;

/// Represents an instance of a mesh in the scene with its own placement and textures.
pub struct SceneObject {
    pub mesh: Mesh,
    /// Translation * rotation * scale from the scene description.
    pub placement: Matrix4<f32>,
    pub textures: TextureSet,
}

impl SceneObject {
    pub fn new(mesh: Mesh, placement: Matrix4<f32>, textures: TextureSet) -> Self {
        let mesh = mesh.with_world_matrix(placement);
        Self {
            mesh,
            placement,
            textures,
        }
    }

    /// Sets the world matrix to the placement spun by `angle_rad` about local Y.
    pub fn set_rotation(&mut self, angle_rad: f32) {
        self.mesh.world_matrix = self.placement * TransformFactory::rotation_y(angle_rad);
    }
}
