use crate::core::geometry::VertexOut;
use crate::core::math::transform::{apply_perspective_division, ndc_to_screen};
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};
use rayon::prelude::*;

/// Matrices and viewport shared by every mesh in a frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameTransform {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub camera_origin: Vector3<f32>,
    pub width: usize,
    pub height: usize,
}

/// Vertex Transform Stage: rebuilds `mesh.vertices_out` from `mesh.vertices`.
///
/// Positions go `projection * view * world`, then through the perspective
/// divide and the viewport mapping. Normals and tangents only see the world
/// rotation/scale, and the view direction is `world_position - camera_origin`.
pub fn transform_mesh(mesh: &mut Mesh, frame: &FrameTransform) {
    let world = mesh.world_matrix;
    let world_view_projection = frame.projection * frame.view * world;
    let world_linear: Matrix3<f32> = world.fixed_view::<3, 3>(0, 0).into_owned();
    let (width, height) = (frame.width as f32, frame.height as f32);

    mesh.vertices_out.clear();
    mesh.vertices_out.extend(mesh.vertices.iter().map(|vertex| {
        let local = vertex.position.to_homogeneous();

        // 1. Local -> Clip -> NDC
        let ndc = apply_perspective_division(&(world_view_projection * local));

        // 2. NDC -> Screen
        let screen = ndc_to_screen(ndc.x, ndc.y, width, height);

        let world_position = (world * local).xyz();

        VertexOut {
            position: Vector4::new(screen.x, screen.y, ndc.z, ndc.w),
            color: vertex.color,
            uv: vertex.uv,
            normal: world_linear * vertex.normal,
            tangent: world_linear * vertex.tangent,
            view_direction: world_position - frame.camera_origin,
        }
    }));
}

/// Transforms every mesh; meshes are independent, so they run on the rayon pool.
pub fn transform_meshes<'a, I>(meshes: I, frame: &FrameTransform)
where
    I: IntoParallelIterator<Item = &'a mut Mesh>,
{
    meshes
        .into_par_iter()
        .for_each(|mesh| transform_mesh(mesh, frame));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::TransformFactory;
    use crate::scene::mesh::PrimitiveTopology;

    fn frame() -> FrameTransform {
        let fov = (60.0_f32.to_radians() / 2.0).tan();
        FrameTransform {
            view: Matrix4::identity(),
            projection: TransformFactory::perspective_lh(1.0, fov, 0.1, 100.0),
            camera_origin: Vector3::zeros(),
            width: 100,
            height: 100,
        }
    }

    #[test]
    fn test_point_on_axis_lands_on_screen_center() {
        let mut mesh = Mesh::create_test_triangle()
            .with_world_matrix(TransformFactory::translation(&Vector3::new(0.0, -2.0, 5.0)));
        transform_mesh(&mut mesh, &frame());

        let apex = &mesh.vertices_out[0];
        assert!((apex.position.x - 50.0).abs() < 1e-3);
        assert!((apex.position.y - 50.0).abs() < 1e-3);
        assert!((apex.w_reciprocal() - 0.2).abs() < 1e-6);
        assert!(apex.is_in_depth_range());
    }

    #[test]
    fn test_output_preserves_order_and_attributes() {
        let mut mesh = Mesh::create_quad(PrimitiveTopology::TriangleStrip)
            .with_world_matrix(TransformFactory::translation(&Vector3::new(0.0, 0.0, 3.0)));
        transform_mesh(&mut mesh, &frame());

        assert_eq!(mesh.vertices_out.len(), mesh.vertices.len());
        for (vin, vout) in mesh.vertices.iter().zip(&mesh.vertices_out) {
            assert_eq!(vin.uv, vout.uv);
            assert_eq!(vin.color, vout.color);
            let expected = vin.position.coords + Vector3::new(0.0, 0.0, 3.0);
            assert!((vout.view_direction - expected).norm() < 1e-6);
        }
        // Top-left corner sits above and left of the center.
        assert!(mesh.vertices_out[0].position.x < 50.0);
        assert!(mesh.vertices_out[0].position.y < 50.0);
    }

    #[test]
    fn test_normals_ignore_translation_and_projection() {
        let world = TransformFactory::translation(&Vector3::new(4.0, 1.0, 9.0))
            * TransformFactory::rotation_y(std::f32::consts::FRAC_PI_2);
        let mut mesh = Mesh::create_test_triangle().with_world_matrix(world);
        transform_mesh(&mut mesh, &frame());

        // -Z rotated a quarter turn about Y is -X.
        let n = mesh.vertices_out[0].normal;
        assert!((n - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-5);
        let t = mesh.vertices_out[0].tangent;
        assert!((t - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_vertex_behind_camera_is_out_of_depth_range() {
        let mut mesh = Mesh::create_test_triangle()
            .with_world_matrix(TransformFactory::translation(&Vector3::new(0.0, 0.0, -5.0)));
        transform_mesh(&mut mesh, &frame());
        assert!(mesh.vertices_out.iter().all(|v| !v.is_in_depth_range()));
    }

    #[test]
    fn test_parallel_matches_single_mesh_transform() {
        let world = TransformFactory::translation(&Vector3::new(1.0, 0.0, 6.0));
        let mut meshes = vec![
            Mesh::create_test_triangle().with_world_matrix(world),
            Mesh::create_quad(PrimitiveTopology::TriangleList).with_world_matrix(world),
        ];
        let mut reference = meshes.clone();
        transform_meshes(meshes.par_iter_mut(), &frame());
        for mesh in &mut reference {
            transform_mesh(mesh, &frame());
        }
        for (a, b) in meshes.iter().zip(&reference) {
            assert_eq!(a.vertices_out, b.vertices_out);
        }
    }
}
