use nalgebra::Point2;
use std::ops::Range;

/// Screen-space bounds of a triangle, used to restrict the pixel loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleBoundingBox {
    pub min: Point2<f32>,
    pub max: Point2<f32>,
}

impl TriangleBoundingBox {
    /// An empty box that any folded point will replace.
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f32::INFINITY, f32::INFINITY),
            max: Point2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Point2<f32>; 3]) -> Self {
        points.iter().fold(Self::empty(), |mut bb, p| {
            bb.fold(p);
            bb
        })
    }

    /// Grows the box to include `p`.
    pub fn fold(&mut self, p: &Point2<f32>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn contains(&self, p: &Point2<f32>) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x <= self.max.x && p.y <= self.max.y
    }

    /// Pixel column range covered by the box, clamped to `[0, width)`.
    pub fn columns(&self, width: usize) -> Range<usize> {
        Self::clamped_range(self.min.x, self.max.x, width)
    }

    /// Pixel row range covered by the box, clamped to `[0, height)`.
    pub fn rows(&self, height: usize) -> Range<usize> {
        Self::clamped_range(self.min.y, self.max.y, height)
    }

    fn clamped_range(min: f32, max: f32, limit: usize) -> Range<usize> {
        let limit_f = limit as f32;
        if !(min <= max) || max < 0.0 || min >= limit_f {
            return 0..0;
        }
        let start = min.max(0.0).floor() as usize;
        let end = max.min(limit_f).ceil() as usize;
        start..end.min(limit)
    }
}
