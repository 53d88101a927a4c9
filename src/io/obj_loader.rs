use crate::core::geometry::Vertex;
use crate::error::{RenderError, Result};
use crate::scene::mesh::{Mesh, PrimitiveTopology};
use crate::scene::utils::compute_tangents;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file into a single triangle-list mesh.
///
/// All sub-models are merged. Texture `v` is flipped so that image row 0 is
/// `v = 0`, and tangents are derived from the UV layout.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    info!("Loading OBJ file: {:?}", path);

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    let (models, _materials) =
        tobj::load_obj(path, &load_options).map_err(|source| RenderError::Obj {
            path: path.to_path_buf(),
            source,
        })?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut index_offset = 0;

    for model in models {
        let mesh = &model.mesh;
        let num_vertices = mesh.positions.len() / 3;
        let has_normals = mesh.normals.len() == mesh.positions.len();
        let has_texcoords = mesh.texcoords.len() / 2 == num_vertices;

        if !has_normals {
            warn!(
                "Mesh '{}' is missing normals. Using default (0, 0, -1).",
                model.name
            );
        }

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            );
            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::new(0.0, 0.0, -1.0)
            };
            let uv = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };

            vertices.push(Vertex::new(position, normal, uv));
        }

        indices.extend(mesh.indices.iter().map(|index| index + index_offset));
        index_offset += num_vertices as u32;
    }

    compute_tangents(&mut vertices, &indices, PrimitiveTopology::TriangleList);

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total indices: {}",
        vertices.len(),
        indices.len()
    );

    let mesh = Mesh::new(vertices, indices, PrimitiveTopology::TriangleList);
    mesh.validate()?;
    Ok(mesh)
}
