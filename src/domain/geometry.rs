//! Geometric types for canvas coordinates and pixel regions

use std::num::NonZeroU32;
use std::ops::{Add, AddAssign, Neg, Sub};

/// A point in canvas coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Scale each component independently
    pub fn scale(self, sx: f32, sy: f32) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }
}

/// A translation in canvas coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
    pub dx: f32,
    pub dy: f32,
}

impl Vector {
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    pub fn length(self) -> f32 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.dx, -self.dy)
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, v: Vector) -> Point {
        Point::new(self.x + v.dx, self.y + v.dy)
    }
}

impl AddAssign<Vector> for Point {
    fn add_assign(&mut self, v: Vector) {
        self.x += v.dx;
        self.y += v.dy;
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, other: Point) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

/// Axis-aligned rectangle with origin and size in canvas coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized rectangle spanning two arbitrary corners
    pub fn from_points(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow by `dx`/`dy` on every side
    pub fn inflate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(
            self.x - dx,
            self.y - dy,
            (self.width + 2.0 * dx).max(0.0),
            (self.height + 2.0 * dy).max(0.0),
        )
    }

    /// Edge-inclusive containment test
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Edge-inclusive overlap test; touching rectangles intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        other.x <= self.right()
            && other.right() >= self.x
            && other.y <= self.bottom()
            && other.bottom() >= self.y
    }

    pub fn translate(&self, v: Vector) -> Rect {
        Rect::new(self.x + v.dx, self.y + v.dy, self.width, self.height)
    }

    /// Scale origin and size independently per axis
    pub fn scale(&self, sx: f32, sy: f32) -> Rect {
        Rect::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }

    /// Truncate to a pixel rectangle (origin floored toward zero as an integer cast)
    pub fn to_pixel_rect(&self) -> PixelRect {
        let left = self.x as i32;
        let top = self.y as i32;
        PixelRect::new(
            left,
            top,
            left + self.width as i32,
            top + self.height as i32,
        )
    }

    pub fn to_skia(&self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// Pixel rectangle in bitmap coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    /// Create a new rectangle from coordinates
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create from origin and size
    pub fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Calculate the intersection of two rectangles
    pub fn intersect(&self, other: PixelRect) -> Option<PixelRect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(PixelRect {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    /// Get the width of the rectangle
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Get the height of the rectangle
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Convert to dimensions (NonZeroU32 width and height)
    pub fn dimensions(self) -> Option<RectDimension> {
        if self.width() <= 0 || self.height() <= 0 {
            return None;
        }
        let width = NonZeroU32::new(self.width().unsigned_abs())?;
        let height = NonZeroU32::new(self.height().unsigned_abs())?;
        Some(RectDimension { width, height })
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.left as f32,
            self.top as f32,
            self.width() as f32,
            self.height() as f32,
        )
    }
}

/// Non-zero dimensions of a rectangle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectDimension {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl RectDimension {
    /// Get the width as u32
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    /// Get the height as u32
    pub fn height(&self) -> u32 {
        self.height.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_normalizes() {
        let r = Rect::from_points(Point::new(50.0, 10.0), Point::new(10.0, 40.0));
        assert_eq!(r, Rect::new(10.0, 10.0, 40.0, 30.0));
    }

    #[test]
    fn test_inflate_and_contains_edges() {
        let r = Rect::new(10.0, 10.0, 10.0, 10.0).inflate(5.0, 5.0);
        assert_eq!(r, Rect::new(5.0, 5.0, 20.0, 20.0));
        assert!(r.contains(Point::new(5.0, 25.0)));
        assert!(!r.contains(Point::new(4.9, 10.0)));
    }

    #[test]
    fn test_touching_rects_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(10.0, 10.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(10.5, 0.0, 5.0, 5.0)));
        assert!(a.intersects(&Rect::new(-5.0, -5.0, 6.0, 6.0)));
    }

    #[test]
    fn test_pixel_rect_intersect() {
        let a = PixelRect::from_xywh(0, 0, 100, 100);
        let b = PixelRect::from_xywh(90, 90, 20, 20);
        assert_eq!(a.intersect(b), Some(PixelRect::new(90, 90, 100, 100)));
        assert_eq!(a.intersect(PixelRect::from_xywh(200, 0, 5, 5)), None);
    }

    #[test]
    fn test_dimensions_rejects_empty() {
        assert!(PixelRect::from_xywh(0, 0, 0, 10).dimensions().is_none());
        let dim = PixelRect::from_xywh(3, 4, 7, 9).dimensions().unwrap();
        assert_eq!((dim.width(), dim.height()), (7, 9));
    }

    #[test]
    fn test_point_vector_ops() {
        let p = Point::new(1.0, 2.0) + Vector::new(3.0, -1.0);
        assert_eq!(p, Point::new(4.0, 1.0));
        assert_eq!(p - Point::new(1.0, 1.0), Vector::new(3.0, 0.0));
        assert_eq!(-Vector::new(1.0, -2.0), Vector::new(-1.0, 2.0));
    }
}
