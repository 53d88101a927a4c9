use crate::core::bounding_box::TriangleBoundingBox;
use crate::core::color::to_packed;
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::VertexOut;
use crate::core::math::interpolation::{
    DEGENERATE_AREA_EPSILON, barycentric_weights, edge_function, is_inside_triangle,
    linear_interpolate, perspective_correct_depth, perspective_correct_interpolate,
};
use crate::core::pipeline::{PixelShader, SurfacePoint};
use crate::scene::mesh::{Mesh, PrimitiveTopology};
use log::debug;
use nalgebra::{Point2, Vector3, Vector4};
use std::ops::Range;

/// Lower bound of the post-divide depth band stretched to full grayscale
/// by the depth visualization.
pub const DEPTH_BAND_START: f32 = 0.995;

/// Per-mesh (or per-frame, when merged) rasterization counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles_submitted: usize,
    pub triangles_degenerate: usize,
    pub triangles_depth_rejected: usize,
    pub triangles_rasterized: usize,
    pub pixels_shaded: usize,
}

impl FrameStats {
    pub fn merge(&mut self, other: &FrameStats) {
        self.triangles_submitted += other.triangles_submitted;
        self.triangles_degenerate += other.triangles_degenerate;
        self.triangles_depth_rejected += other.triangles_depth_rejected;
        self.triangles_rasterized += other.triangles_rasterized;
        self.pixels_shaded += other.pixels_shaded;
    }
}

/// Groups an index list into triangles.
///
/// Lists consume three indices per triangle. Strips slide a window of three,
/// skip windows whose three index values are all equal and swap the last two
/// vertices on odd windows to keep the winding consistent.
pub fn assemble_triangles(indices: &[u32], topology: PrimitiveTopology) -> Vec<[u32; 3]> {
    match topology {
        PrimitiveTopology::TriangleList => indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect(),
        PrimitiveTopology::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .filter(|(_, w)| !(w[0] == w[1] && w[1] == w[2]))
            .map(|(i, w)| {
                if i % 2 == 1 {
                    [w[0], w[2], w[1]]
                } else {
                    [w[0], w[1], w[2]]
                }
            })
            .collect(),
    }
}

/// A triangle in screen space, ready for the pixel loop.
#[derive(Debug, Clone, Copy)]
pub struct ScreenTriangle<'a> {
    vertices: [&'a VertexOut; 3],
    screen: [Point2<f32>; 3],
    w_reciprocals: Vector3<f32>,
    bounds: TriangleBoundingBox,
}

impl<'a> ScreenTriangle<'a> {
    /// Returns `None` for triangles with (near) zero screen area.
    pub fn new(vertices: [&'a VertexOut; 3]) -> Option<Self> {
        let screen = vertices.map(|v| Point2::new(v.position.x, v.position.y));
        if !(edge_function(screen[0], screen[1], screen[2]).abs() >= DEGENERATE_AREA_EPSILON) {
            return None;
        }

        Some(Self {
            vertices,
            screen,
            w_reciprocals: Vector3::new(
                vertices[0].w_reciprocal(),
                vertices[1].w_reciprocal(),
                vertices[2].w_reciprocal(),
            ),
            bounds: TriangleBoundingBox::from_points(&screen),
        })
    }

    pub fn bounds(&self) -> &TriangleBoundingBox {
        &self.bounds
    }

    /// Barycentric weights of `p` when it lies inside the triangle.
    #[inline]
    pub fn coverage(&self, p: Point2<f32>) -> Option<Vector3<f32>> {
        barycentric_weights(p, self.screen[0], self.screen[1], self.screen[2])
            .filter(is_inside_triangle)
    }

    /// Perspective-correct view depth for the given weights.
    #[inline]
    pub fn depth(&self, weights: &Vector3<f32>) -> Option<f32> {
        perspective_correct_depth(weights, &self.w_reciprocals)
    }

    /// Post-divide depth, which is affine in screen space.
    #[inline]
    pub fn ndc_depth(&self, weights: &Vector3<f32>) -> f32 {
        linear_interpolate(&self.vertices.map(|v| v.position.z), weights)
    }

    /// Interpolates every vertex attribute at `p`.
    pub fn surface(&self, p: Point2<f32>, weights: &Vector3<f32>, depth: f32) -> SurfacePoint {
        let [v0, v1, v2] = self.vertices;
        let w = &self.w_reciprocals;

        SurfacePoint {
            position: Vector4::new(p.x, p.y, self.ndc_depth(weights), depth),
            color: perspective_correct_interpolate(&[v0.color, v1.color, v2.color], weights, w, depth),
            uv: perspective_correct_interpolate(&[v0.uv, v1.uv, v2.uv], weights, w, depth),
            normal: perspective_correct_interpolate(&[v0.normal, v1.normal, v2.normal], weights, w, depth),
            tangent: perspective_correct_interpolate(
                &[v0.tangent, v1.tangent, v2.tangent],
                weights,
                w,
                depth,
            ),
            view_direction: perspective_correct_interpolate(
                &[v0.view_direction, v1.view_direction, v2.view_direction],
                weights,
                w,
                depth,
            ),
        }
    }

    /// Coverage, depth and interpolation at the center of pixel (x, y).
    pub fn surface_at(&self, x: usize, y: usize) -> Option<SurfacePoint> {
        let p = pixel_center(x, y);
        let weights = self.coverage(p)?;
        let depth = self.depth(&weights)?;
        Some(self.surface(p, &weights, depth))
    }
}

#[inline(always)]
fn pixel_center(x: usize, y: usize) -> Point2<f32> {
    Point2::new(x as f32 + 0.5, y as f32 + 0.5)
}

/// Maps post-divide depth from `[DEPTH_BAND_START, 1]` onto a gray ramp.
pub fn depth_to_gray(ndc_depth: f32) -> Vector3<f32> {
    let t = ((ndc_depth - DEPTH_BAND_START) / (1.0 - DEPTH_BAND_START)).clamp(0.0, 1.0);
    Vector3::new(t, t, t)
}

/// The Rasterizer is responsible for drawing a mesh's transformed triangles onto the FrameBuffer.
pub struct Rasterizer {
    /// Spread framebuffer rows over the rayon pool.
    pub parallel: bool,
    /// Write depth as grayscale instead of invoking the pixel shader.
    pub visualize_depth: bool,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            parallel: true,
            visualize_depth: false,
        }
    }

    /// Rasterizes `mesh.vertices_out` into the framebuffer.
    ///
    /// Triangles are dropped whole when any vertex has post-divide depth outside
    /// `[0, 1]`, or when their screen area is zero. A pixel is written when its
    /// depth is less than or equal to the stored one, so on ties the later
    /// triangle in index order wins. Rows are owned by one worker each and visit
    /// triangles in index order, so the parallel result equals the sequential one.
    pub fn draw_mesh<S: PixelShader>(
        &self,
        framebuffer: &mut FrameBuffer,
        mesh: &Mesh,
        shader: &S,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        let vertices = &mesh.vertices_out;

        // 1. Primitive assembly + per-triangle rejection
        let mut triangles: Vec<(ScreenTriangle<'_>, Range<usize>, Range<usize>)> = Vec::new();
        for [i0, i1, i2] in assemble_triangles(&mesh.indices, mesh.topology) {
            stats.triangles_submitted += 1;

            let (Some(v0), Some(v1), Some(v2)) = (
                vertices.get(i0 as usize),
                vertices.get(i1 as usize),
                vertices.get(i2 as usize),
            ) else {
                stats.triangles_degenerate += 1;
                continue;
            };

            if !(v0.is_in_depth_range() && v1.is_in_depth_range() && v2.is_in_depth_range()) {
                stats.triangles_depth_rejected += 1;
                continue;
            }

            let Some(triangle) = ScreenTriangle::new([v0, v1, v2]) else {
                stats.triangles_degenerate += 1;
                continue;
            };

            let rows = triangle.bounds().rows(framebuffer.height);
            let columns = triangle.bounds().columns(framebuffer.width);
            if rows.is_empty() || columns.is_empty() {
                continue;
            }

            stats.triangles_rasterized += 1;
            triangles.push((triangle, rows, columns));
        }

        if triangles.is_empty() {
            return stats;
        }

        // 2. Pixel loop
        let visualize_depth = self.visualize_depth;
        stats.pixels_shaded = framebuffer.process_rows(self.parallel, |row| {
            let mut shaded = 0;
            for (triangle, rows, columns) in &triangles {
                if !rows.contains(&row.y) {
                    continue;
                }

                for x in columns.clone() {
                    let p = pixel_center(x, row.y);
                    let Some(weights) = triangle.coverage(p) else {
                        continue;
                    };
                    let Some(depth) = triangle.depth(&weights) else {
                        continue;
                    };

                    // Depth Test
                    if !(depth <= row.depth[x]) {
                        continue;
                    }
                    row.depth[x] = depth;

                    let color = if visualize_depth {
                        depth_to_gray(triangle.ndc_depth(&weights))
                    } else {
                        shader.shade(&triangle.surface(p, &weights, depth))
                    };
                    row.color[x] = to_packed(color);
                    shaded += 1;
                }
            }
            shaded
        });

        debug!(
            "Mesh rasterized: {} submitted, {} degenerate, {} depth-rejected, {} drawn, {} pixels",
            stats.triangles_submitted,
            stats.triangles_degenerate,
            stats.triangles_depth_rejected,
            stats.triangles_rasterized,
            stats.pixels_shaded
        );

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::unpack_rgb;
    use nalgebra::Vector2;

    /// Returns the interpolated vertex color.
    struct VertexColorShader;

    impl PixelShader for VertexColorShader {
        fn shade(&self, surface: &SurfacePoint) -> Vector3<f32> {
            surface.color
        }
    }

    fn vertex_out(x: f32, y: f32, z: f32, w: f32, color: Vector3<f32>) -> VertexOut {
        VertexOut {
            position: Vector4::new(x, y, z, 1.0 / w),
            color,
            uv: Vector2::zeros(),
            normal: Vector3::zeros(),
            tangent: Vector3::zeros(),
            view_direction: Vector3::zeros(),
        }
    }

    fn screen_mesh(vertices_out: Vec<VertexOut>, indices: Vec<u32>) -> Mesh {
        let mut mesh = Mesh::new(Vec::new(), indices, PrimitiveTopology::TriangleList);
        mesh.vertices_out = vertices_out;
        mesh
    }

    fn sequential() -> Rasterizer {
        Rasterizer {
            parallel: false,
            visualize_depth: false,
        }
    }

    #[test]
    fn test_list_assembly_consumes_triples() {
        let tris = assemble_triangles(&[0, 1, 2, 3, 4, 5, 6], PrimitiveTopology::TriangleList);
        assert_eq!(tris, vec![[0, 1, 2], [3, 4, 5]]);
    }

    #[test]
    fn test_strip_assembly_swaps_odd_windows() {
        let tris = assemble_triangles(&[0, 1, 2, 3, 4], PrimitiveTopology::TriangleStrip);
        assert_eq!(tris, vec![[0, 1, 2], [1, 3, 2], [2, 3, 4]]);
    }

    #[test]
    fn test_strip_assembly_skips_triple_equal_windows() {
        let tris = assemble_triangles(&[0, 1, 2, 2, 2, 3], PrimitiveTopology::TriangleStrip);
        // Window 2 is [2, 2, 2]; windows 1 and 3 keep their odd swap.
        assert_eq!(tris, vec![[0, 1, 2], [1, 2, 2], [2, 3, 2]]);
    }

    #[test]
    fn test_triangle_outside_depth_range_is_dropped() {
        let white = Vector3::new(1.0, 1.0, 1.0);
        let mesh = screen_mesh(
            vec![
                vertex_out(0.0, 0.0, 0.5, 2.0, white),
                vertex_out(8.0, 0.0, 1.2, 2.0, white),
                vertex_out(0.0, 8.0, 0.5, 2.0, white),
            ],
            vec![0, 1, 2],
        );
        let mut fb = FrameBuffer::new(8, 8);
        let stats = sequential().draw_mesh(&mut fb, &mesh, &VertexColorShader);
        assert_eq!(stats.triangles_depth_rejected, 1);
        assert_eq!(stats.pixels_shaded, 0);
        assert!(fb.depths().iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn test_zero_area_triangle_is_skipped() {
        let white = Vector3::new(1.0, 1.0, 1.0);
        let mesh = screen_mesh(
            vec![
                vertex_out(0.0, 0.0, 0.5, 2.0, white),
                vertex_out(4.0, 4.0, 0.5, 2.0, white),
                vertex_out(8.0, 8.0, 0.5, 2.0, white),
            ],
            vec![0, 1, 2],
        );
        let mut fb = FrameBuffer::new(8, 8);
        let stats = sequential().draw_mesh(&mut fb, &mesh, &VertexColorShader);
        assert_eq!(stats.triangles_degenerate, 1);
        assert_eq!(stats.pixels_shaded, 0);
    }

    #[test]
    fn test_depth_keeps_minimum_across_overlaps() {
        let red = Vector3::new(1.0, 0.0, 0.0);
        let green = Vector3::new(0.0, 1.0, 0.0);
        let blue = Vector3::new(0.0, 0.0, 1.0);
        let tri = |w: f32, color| {
            vec![
                vertex_out(0.0, 0.0, 0.5, w, color),
                vertex_out(8.0, 0.0, 0.5, w, color),
                vertex_out(0.0, 8.0, 0.5, w, color),
            ]
        };
        // Middle, near, far: the near one must survive.
        let mut vertices = tri(5.0, red);
        vertices.extend(tri(2.0, green));
        vertices.extend(tri(9.0, blue));
        let mesh = screen_mesh(vertices, vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);

        let mut fb = FrameBuffer::new(8, 8);
        sequential().draw_mesh(&mut fb, &mesh, &VertexColorShader);
        let depth = fb.get_depth(1, 1).unwrap();
        assert!((depth - 2.0).abs() < 1e-4);
        assert_eq!(unpack_rgb(fb.get_pixel(1, 1).unwrap()), [0, 255, 0]);
    }

    #[test]
    fn test_equal_depth_last_triangle_wins() {
        let red = Vector3::new(1.0, 0.0, 0.0);
        let blue = Vector3::new(0.0, 0.0, 1.0);
        let mut vertices = Vec::new();
        for color in [red, blue] {
            vertices.push(vertex_out(0.0, 0.0, 0.5, 3.0, color));
            vertices.push(vertex_out(8.0, 0.0, 0.5, 3.0, color));
            vertices.push(vertex_out(0.0, 8.0, 0.5, 3.0, color));
        }
        let mesh = screen_mesh(vertices, vec![0, 1, 2, 3, 4, 5]);

        for parallel in [false, true] {
            let mut fb = FrameBuffer::new(8, 8);
            let rasterizer = Rasterizer {
                parallel,
                visualize_depth: false,
            };
            rasterizer.draw_mesh(&mut fb, &mesh, &VertexColorShader);
            assert_eq!(unpack_rgb(fb.get_pixel(2, 2).unwrap()), [0, 0, 255]);
        }
    }

    #[test]
    fn test_depth_visualization_bypasses_shader() {
        struct PanicShader;
        impl PixelShader for PanicShader {
            fn shade(&self, _: &SurfacePoint) -> Vector3<f32> {
                panic!("shader must not run in depth visualization");
            }
        }

        let white = Vector3::new(1.0, 1.0, 1.0);
        let mesh = screen_mesh(
            vec![
                vertex_out(0.0, 0.0, 1.0, 2.0, white),
                vertex_out(8.0, 0.0, 1.0, 2.0, white),
                vertex_out(0.0, 8.0, 1.0, 2.0, white),
            ],
            vec![0, 1, 2],
        );
        let mut fb = FrameBuffer::new(8, 8);
        let rasterizer = Rasterizer {
            parallel: false,
            visualize_depth: true,
        };
        let stats = rasterizer.draw_mesh(&mut fb, &mesh, &PanicShader);
        assert!(stats.pixels_shaded > 0);
        assert_eq!(unpack_rgb(fb.get_pixel(1, 1).unwrap()), [255, 255, 255]);
    }

    #[test]
    fn test_depth_to_gray_band() {
        assert_eq!(depth_to_gray(0.5), Vector3::zeros());
        assert_eq!(depth_to_gray(1.0), Vector3::new(1.0, 1.0, 1.0));
        let mid = depth_to_gray(0.9975);
        assert!((mid.x - 0.5).abs() < 1e-2);
    }
}
