//! Shared geometry for annotation rendering
//!
//! Constants and path construction used by both the interactive overlay and
//! the flattened export.

use tiny_skia::PathBuilder;

use crate::domain::{Point, Rect};

/// Dashed outline drawn around the selected annotation
pub mod selection {
    use crate::config::ShapeColor;

    /// Outward growth of the indicator around the annotation bounds
    pub const INFLATE: f32 = 4.0;
    pub const WIDTH: f32 = 1.0;
    /// Dash on, dash off
    pub const DASH: [f32; 2] = [4.0, 2.0];
    pub const COLOR: ShapeColor = ShapeColor::DODGER_BLUE;
}

/// Pending crop rectangle while crop mode is dragging
pub mod crop {
    pub const WIDTH: f32 = 2.0;
    pub const DASH: [f32; 2] = [4.0, 2.0];
    pub const STROKE_RGBA: [u8; 4] = [0, 0, 255, 255];
    pub const FILL_RGBA: [u8; 4] = [0, 0, 255, 50];
}

pub mod step {
    /// Label font size as a fraction of the marker diameter
    pub const LABEL_SCALE: f32 = 0.5;
}

pub mod magnifier {
    pub const RING_WIDTH: f32 = 3.0;
}

/// Export-only approximation of blur using mosaic cells
pub mod export_blur {
    pub const MIN_BLOCK: u32 = 3;

    pub fn block_size(radius: f32) -> u32 {
        ((radius / 2.0) as u32).max(MIN_BLOCK)
    }
}

/// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
pub const BEZIER_K: f32 = 0.552_284_8;

/// Build an ellipse path using cubic bezier curves
pub fn ellipse_path(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<tiny_skia::Path> {
    let kx = rx * BEZIER_K;
    let ky = ry * BEZIER_K;

    let mut pb = PathBuilder::new();
    pb.move_to(cx, cy - ry);
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);
    pb.close();
    pb.finish()
}

/// Ellipse inscribed in `bounds`
pub fn ellipse_in(bounds: &Rect) -> Option<tiny_skia::Path> {
    let c = bounds.center();
    ellipse_path(c.x, c.y, bounds.width.abs() / 2.0, bounds.height.abs() / 2.0)
}

/// Closed rectangle outline
pub fn rect_path(bounds: &Rect) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(bounds.x, bounds.y);
    pb.line_to(bounds.right(), bounds.y);
    pb.line_to(bounds.right(), bounds.bottom());
    pb.line_to(bounds.x, bounds.bottom());
    pb.close();
    pb.finish()
}

/// Shaft plus two head lines meeting at `end`
pub fn arrow_path(start: Point, end: Point, heads: (Point, Point)) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(start.x, start.y);
    pb.line_to(end.x, end.y);
    pb.move_to(end.x, end.y);
    pb.line_to(heads.0.x, heads.0.y);
    pb.move_to(end.x, end.y);
    pb.line_to(heads.1.x, heads.1.y);
    pb.finish()
}

/// Open polyline through `points`
pub fn polyline_path(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.finish()
}

pub fn segment_path(start: Point, end: Point) -> Option<tiny_skia::Path> {
    polyline_path(&[start, end])
}

/// Darkening rectangles covering the canvas outside `bounds`.
///
/// Up to four bands: top and bottom span the full width, left and right span
/// the height of `bounds`. Bands with no extent are omitted.
pub fn spotlight_regions(bounds: &Rect, canvas_width: f32, canvas_height: f32) -> Vec<Rect> {
    let mut regions = Vec::with_capacity(4);
    if bounds.y > 0.0 {
        regions.push(Rect::new(0.0, 0.0, canvas_width, bounds.y));
    }
    if bounds.bottom() < canvas_height {
        regions.push(Rect::new(
            0.0,
            bounds.bottom(),
            canvas_width,
            canvas_height - bounds.bottom(),
        ));
    }
    if bounds.x > 0.0 {
        regions.push(Rect::new(0.0, bounds.y, bounds.x, bounds.height));
    }
    if bounds.right() < canvas_width {
        regions.push(Rect::new(
            bounds.right(),
            bounds.y,
            canvas_width - bounds.right(),
            bounds.height,
        ));
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spotlight_regions_inside_canvas() {
        let regions = spotlight_regions(&Rect::new(10.0, 20.0, 30.0, 40.0), 100.0, 80.0);
        assert_eq!(
            regions,
            vec![
                Rect::new(0.0, 0.0, 100.0, 20.0),
                Rect::new(0.0, 60.0, 100.0, 20.0),
                Rect::new(0.0, 20.0, 10.0, 40.0),
                Rect::new(40.0, 20.0, 60.0, 40.0),
            ]
        );
    }

    #[test]
    fn test_spotlight_regions_omit_empty_sides() {
        let regions = spotlight_regions(&Rect::new(0.0, 0.0, 100.0, 50.0), 100.0, 80.0);
        assert_eq!(regions, vec![Rect::new(0.0, 50.0, 100.0, 30.0)]);

        let full = spotlight_regions(&Rect::new(0.0, 0.0, 100.0, 80.0), 100.0, 80.0);
        assert!(full.is_empty());
    }

    #[test]
    fn test_export_blur_block_size() {
        assert_eq!(export_blur::block_size(4.0), 3);
        assert_eq!(export_blur::block_size(11.0), 5);
        assert_eq!(export_blur::block_size(30.0), 15);
    }

    #[test]
    fn test_paths_require_geometry() {
        assert!(polyline_path(&[]).is_none());
        assert!(rect_path(&Rect::new(0.0, 0.0, 10.0, 10.0)).is_some());
        assert!(ellipse_in(&Rect::new(0.0, 0.0, 10.0, 6.0)).is_some());
    }
}
