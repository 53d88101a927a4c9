use crate::core::geometry::{Vertex, VertexOut};
use crate::error::{RenderError, Result};
use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use serde::Deserialize;

/// How the index list is grouped into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveTopology {
    /// Three indices per triangle.
    #[default]
    #[serde(alias = "list")]
    TriangleList,
    /// Sliding window of three indices with alternating winding.
    #[serde(alias = "strip")]
    TriangleStrip,
}

/// A collection of vertices and indices representing a 3D object.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// List of vertices.
    pub vertices: Vec<Vertex>,
    /// Offsets into `vertices`; grouping depends on `topology`.
    pub indices: Vec<u32>,
    pub topology: PrimitiveTopology,
    /// Local -> world transform.
    pub world_matrix: Matrix4<f32>,
    /// Transformed vertices, rebuilt every frame by the transform stage.
    pub vertices_out: Vec<VertexOut>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, topology: PrimitiveTopology) -> Self {
        Self {
            vertices,
            indices,
            topology,
            world_matrix: Matrix4::identity(),
            vertices_out: Vec::new(),
        }
    }

    pub fn with_world_matrix(mut self, world_matrix: Matrix4<f32>) -> Self {
        self.world_matrix = world_matrix;
        self
    }

    /// Checks that every index addresses a vertex.
    pub fn validate(&self) -> Result<()> {
        let count = self.vertices.len();
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(RenderError::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                bad, count
            )));
        }
        if !self.vertices.is_empty() && self.indices.len() < 3 {
            return Err(RenderError::InvalidMesh(format!(
                "{} indices cannot form a triangle",
                self.indices.len()
            )));
        }
        Ok(())
    }

    /// Number of index triples the topology yields, before degenerate skipping.
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            PrimitiveTopology::TriangleList => self.indices.len() / 3,
            PrimitiveTopology::TriangleStrip => self.indices.len().saturating_sub(2),
        }
    }

    /// The reference triangle: apex up, base below, facing the -Z viewer.
    pub fn create_test_triangle() -> Self {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let tangent = Vector3::new(1.0, 0.0, 0.0);
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 2.0, 0.0), normal, Vector2::new(0.5, 0.0))
                .with_tangent(tangent),
            Vertex::new(Point3::new(1.5, -1.0, 0.0), normal, Vector2::new(1.0, 1.0))
                .with_tangent(tangent),
            Vertex::new(Point3::new(-1.5, -1.0, 0.0), normal, Vector2::new(0.0, 1.0))
                .with_tangent(tangent),
        ];

        Self::new(vertices, vec![0, 1, 2], PrimitiveTopology::TriangleList)
    }

    /// A unit quad in the XY plane, centered at the origin.
    ///
    /// Strip order `0 1 2 3` and list order `0 1 2 1 3 2` produce the same triangles.
    pub fn create_quad(topology: PrimitiveTopology) -> Self {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let tangent = Vector3::new(1.0, 0.0, 0.0);
        let corner = |x: f32, y: f32, u: f32, v: f32| {
            Vertex::new(Point3::new(x, y, 0.0), normal, Vector2::new(u, v)).with_tangent(tangent)
        };
        let vertices = vec![
            corner(-0.5, 0.5, 0.0, 0.0),
            corner(0.5, 0.5, 1.0, 0.0),
            corner(-0.5, -0.5, 0.0, 1.0),
            corner(0.5, -0.5, 1.0, 1.0),
        ];
        let indices = match topology {
            PrimitiveTopology::TriangleList => vec![0, 1, 2, 1, 3, 2],
            PrimitiveTopology::TriangleStrip => vec![0, 1, 2, 3],
        };

        Self::new(vertices, indices, topology)
    }
}
