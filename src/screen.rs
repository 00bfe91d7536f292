use bytemuck::{Pod, Zeroable};
use glam::{vec2, Vec2};

/// Viewport size in pixels.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A viewport with a zero dimension has no pixels to evaluate.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Divide both dimensions by `divisor`, rounding up so that a non-empty
    /// size stays non-empty.
    pub fn scaled_down(&self, divisor: u32) -> Self {
        let divisor = divisor.max(1);
        Self {
            width: (self.width + divisor - 1) / divisor,
            height: (self.height + divisor - 1) / divisor,
        }
    }

    pub fn as_vec2(&self) -> Vec2 {
        vec2(self.width as f32, self.height as f32)
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Size {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/**
Symmetric device coordinate for a fragment.

The shorter axis spans `[-1, 1]`; the longer axis extends proportionally, so
geometry keeps its aspect ratio at any resolution. `size` must not be empty.
*/
pub fn device_coordinate(frag_coord: Vec2, size: Size) -> Vec2 {
    debug_assert!(!size.is_empty());
    let resolution = size.as_vec2();
    (frag_coord * 2.0 - resolution) / resolution.x.min(resolution.y)
}

/// Fragment coordinate of the center of image pixel (`column`, `row`).
///
/// Image rows run top to bottom; fragment coordinates have their origin at the
/// bottom-left corner, matching a GL-style rasterizer.
pub fn frag_coord(column: u32, row: u32, size: Size) -> Vec2 {
    vec2(column as f32 + 0.5, (size.height - row) as f32 - 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimension_is_empty() {
        assert!(Size::new(0, 600).is_empty());
        assert!(Size::new(800, 0).is_empty());
        assert!(!Size::new(1, 1).is_empty());
    }

    #[test]
    fn scaled_down_rounds_up() {
        assert_eq!(Size::new(801, 600).scaled_down(2), Size::new(401, 300));
        assert_eq!(Size::new(1, 1).scaled_down(4), Size::new(1, 1));
        assert_eq!(Size::new(640, 480).scaled_down(0), Size::new(640, 480));
    }

    #[test]
    fn center_maps_to_origin() {
        let size = Size::new(800, 600);
        assert_eq!(device_coordinate(vec2(400.0, 300.0), size), Vec2::ZERO);
    }

    #[test]
    fn shorter_axis_spans_unit_range() {
        let size = Size::new(800, 600);
        assert_eq!(device_coordinate(vec2(400.0, 600.0), size), vec2(0.0, 1.0));
        assert_eq!(device_coordinate(vec2(400.0, 0.0), size), vec2(0.0, -1.0));

        let left = device_coordinate(vec2(0.0, 300.0), size);
        assert!((left.x + 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn top_row_has_highest_frag_y() {
        let size = Size::new(4, 3);
        assert_eq!(frag_coord(0, 0, size), vec2(0.5, 2.5));
        assert_eq!(frag_coord(3, 2, size), vec2(3.5, 0.5));
    }
}
