use crate::core::geometry::Vertex;
use crate::core::rasterizer::assemble_triangles;
use crate::scene::mesh::PrimitiveTopology;
use nalgebra::Vector3;

/// Derives per-vertex tangents from UV gradients.
///
/// Each triangle contributes its `dP/du` direction to its three vertices; the
/// sums are then Gram-Schmidt orthogonalized against the vertex normal.
/// Vertices without usable UVs get any unit vector perpendicular to the normal.
pub fn compute_tangents(vertices: &mut [Vertex], indices: &[u32], topology: PrimitiveTopology) {
    let mut accumulated = vec![Vector3::<f32>::zeros(); vertices.len()];

    for [i0, i1, i2] in assemble_triangles(indices, topology) {
        let (i0, i1, i2) = (i0 as usize, i1 as usize, i2 as usize);
        let (Some(v0), Some(v1), Some(v2)) = (vertices.get(i0), vertices.get(i1), vertices.get(i2))
        else {
            continue;
        };

        let edge1 = v1.position - v0.position;
        let edge2 = v2.position - v0.position;
        let duv1 = v1.uv - v0.uv;
        let duv2 = v2.uv - v0.uv;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < 1e-12 {
            continue;
        }
        let tangent = (edge1 * duv2.y - edge2 * duv1.y) / det;

        accumulated[i0] += tangent;
        accumulated[i1] += tangent;
        accumulated[i2] += tangent;
    }

    for (vertex, sum) in vertices.iter_mut().zip(accumulated) {
        let n = vertex.normal;
        let orthogonal = sum - n * n.dot(&sum);
        vertex.tangent = orthogonal
            .try_normalize(1e-8)
            .unwrap_or_else(|| fallback_tangent(&n));
    }
}

fn fallback_tangent(normal: &Vector3<f32>) -> Vector3<f32> {
    let reference = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    (reference - normal * normal.dot(&reference))
        .try_normalize(1e-8)
        .unwrap_or(reference)
}
