use crate::core::color::pack_rgb;
use rayon::prelude::*;

/// Color and depth storage for one frame.
///
/// Colors are packed `0x00RRGGBB`, row-major, no alpha. Depth holds the
/// perspective-correct view depth of the closest surface written so far.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
}

/// Mutable view over one framebuffer row. Each row is owned by exactly one
/// worker while rasterizing.
pub struct RowMut<'a> {
    pub y: usize,
    pub color: &'a mut [u32],
    pub depth: &'a mut [f32],
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: vec![0; size],
            depth_buffer: vec![f32::INFINITY; size],
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Resets every pixel to `background` and every depth to +infinity.
    pub fn clear(&mut self, background: [u8; 3]) {
        let packed = pack_rgb(background);
        self.color_buffer.fill(packed);
        self.depth_buffer.fill(f32::INFINITY);
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<u32> {
        self.in_bounds(x, y)
            .then(|| self.color_buffer[self.index(x, y)])
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        self.in_bounds(x, y)
            .then(|| self.depth_buffer[self.index(x, y)])
    }

    /// Flat packed-RGB pixels, handed to presentation after the frame completes.
    pub fn pixels(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn depths(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// Visits every row, sequentially or on the rayon pool, and sums the
    /// counts returned by `f`.
    ///
    /// Rows are disjoint, so each pixel has a single writer and the
    /// result does not depend on scheduling.
    pub fn process_rows<F>(&mut self, parallel: bool, f: F) -> usize
    where
        F: Fn(RowMut<'_>) -> usize + Send + Sync,
    {
        let width = self.width.max(1);

        if parallel {
            self.color_buffer
                .par_chunks_mut(width)
                .zip(self.depth_buffer.par_chunks_mut(width))
                .enumerate()
                .map(|(y, (color, depth))| f(RowMut { y, color, depth }))
                .sum()
        } else {
            self.color_buffer
                .chunks_mut(width)
                .zip(self.depth_buffer.chunks_mut(width))
                .enumerate()
                .map(|(y, (color, depth))| f(RowMut { y, color, depth }))
                .sum()
        }
    }
}
