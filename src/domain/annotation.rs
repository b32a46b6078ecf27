//! Annotation types for marking up captured images
//!
//! All annotation geometry is stored in canvas pixel coordinates. Each variant
//! owns its geometry exclusively and supports bounds, translation and
//! duplication through [`Annotation`].

use uuid::Uuid;

use super::geometry::{Point, Rect, Vector};
use crate::config::ShapeColor;

/// Default values for new annotations
pub mod defaults {
    /// Stroke thickness for every variant
    pub const THICKNESS: f32 = 3.0;
    /// Arrowhead line length
    pub const ARROW_HEAD_LENGTH: f32 = 15.0;
    /// Arrowhead angle from the shaft in degrees
    pub const ARROW_HEAD_ANGLE: f32 = 30.0;
    pub const FONT_FAMILY: &str = "Segoe UI";
    pub const FONT_SIZE: f32 = 16.0;
    /// Step marker diameter before stroke width is added
    pub const STEP_SIZE: f32 = 32.0;
    pub const MOSAIC_BLOCK_SIZE: u32 = 10;
    pub const BLUR_RADIUS: f32 = 10.0;
    /// Highlighter width before stroke width is added
    pub const HIGHLIGHTER_WIDTH: f32 = 20.0;
    pub const SPOTLIGHT_DARKNESS: f32 = 0.6;
    pub const MAGNIFIER_RADIUS: f32 = 50.0;
    pub const MAGNIFIER_ZOOM: f32 = 2.0;
    /// Text width estimate per character, as a fraction of font size
    pub const TEXT_CHAR_WIDTH: f32 = 0.6;
    pub const TEXT_MIN_WIDTH: f32 = 50.0;
    pub const TEXT_LINE_HEIGHT: f32 = 1.5;
}

/// Parameters derived from the current tool opacity and stroke width
pub mod derived {
    use crate::config::ShapeColor;

    /// Mosaic cell size: lower opacity gives coarser blocks
    pub fn mosaic_block_size(opacity: f32, stroke_width: f32) -> u32 {
        ((3.0 + (1.0 - opacity) * 20.0 + stroke_width) as u32).max(1)
    }

    pub fn blur_radius(opacity: f32, stroke_width: f32) -> f32 {
        5.0 + (1.0 - opacity) * 25.0 + stroke_width * 2.0
    }

    pub fn spotlight_darkness(opacity: f32) -> f32 {
        0.3 + opacity * 0.5
    }

    /// Zoom ranges from 1.5x to 3x
    pub fn magnifier_zoom(opacity: f32) -> f32 {
        1.5 + opacity * 1.5
    }

    pub fn step_size(stroke_width: f32) -> f32 {
        super::defaults::STEP_SIZE + stroke_width * 2.0
    }

    pub fn highlighter_width(stroke_width: f32) -> f32 {
        super::defaults::HIGHLIGHTER_WIDTH + stroke_width * 2.0
    }

    /// Translucent highlighter ink: alpha 128 at full opacity
    pub fn highlighter_color(color: ShapeColor, opacity: f32) -> ShapeColor {
        let alpha = (128.0 * opacity) as u8;
        color.with_alpha(alpha as f32 / 255.0)
    }

    pub fn filled_rect_color(color: ShapeColor, opacity: f32) -> ShapeColor {
        let alpha = (255.0 * opacity) as u8;
        color.with_alpha(alpha as f32 / 255.0)
    }
}

/// Opaque identity assigned when an annotation is created
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnnotationId(Uuid);

impl AnnotationId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Style shared by every annotation variant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: ShapeColor,
    pub thickness: f32,
    pub opacity: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: ShapeColor::RED,
            thickness: defaults::THICKNESS,
            opacity: 1.0,
        }
    }
}

/// Arrow with two angled head lines at the end point
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowAnnotation {
    pub start: Point,
    pub end: Point,
    pub head_length: f32,
    /// Angle between each head line and the reversed shaft, in degrees
    pub head_angle: f32,
}

impl ArrowAnnotation {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            head_length: defaults::ARROW_HEAD_LENGTH,
            head_angle: defaults::ARROW_HEAD_ANGLE,
        }
    }

    /// End points of the two head lines. A zero-length arrow collapses both
    /// onto the end point.
    pub fn head_points(&self) -> (Point, Point) {
        let direction = self.end - self.start;
        if direction.length() < 0.001 {
            return (self.end, self.end);
        }
        let base = direction.dy.atan2(direction.dx) + std::f32::consts::PI;
        let spread = self.head_angle.to_radians();
        let head = |angle: f32| {
            Point::new(
                self.end.x + self.head_length * angle.cos(),
                self.end.y + self.head_length * angle.sin(),
            )
        };
        (head(base + spread), head(base - spread))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineAnnotation {
    pub start: Point,
    pub end: Point,
}

/// Outline rectangle (no fill)
#[derive(Clone, Debug, PartialEq)]
pub struct RectangleAnnotation {
    pub bounds: Rect,
}

/// Outline ellipse inscribed in its bounds
#[derive(Clone, Debug, PartialEq)]
pub struct EllipseAnnotation {
    pub bounds: Rect,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// CSS-style numeric weight
    pub fn value(self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::Bold => 700,
        }
    }
}

/// Single-line text anchored at its top-left corner
#[derive(Clone, Debug, PartialEq)]
pub struct TextAnnotation {
    pub position: Point,
    pub text: String,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
}

impl TextAnnotation {
    pub fn new(position: Point, text: impl Into<String>, font_size: f32) -> Self {
        Self {
            position,
            text: text.into(),
            font_family: defaults::FONT_FAMILY.to_string(),
            font_size,
            font_weight: FontWeight::Normal,
        }
    }
}

/// Numbered circular marker centered on its position
#[derive(Clone, Debug, PartialEq)]
pub struct StepAnnotation {
    pub position: Point,
    pub number: u32,
    pub size: f32,
}

/// Solid rectangle, drawn without a stroke
#[derive(Clone, Debug, PartialEq)]
pub struct FilledRectAnnotation {
    pub bounds: Rect,
    pub fill: ShapeColor,
}

/// Pixelation of the underlying image
#[derive(Clone, Debug, PartialEq)]
pub struct MosaicAnnotation {
    pub bounds: Rect,
    pub block_size: u32,
}

/// Blur of the underlying image
#[derive(Clone, Debug, PartialEq)]
pub struct BlurAnnotation {
    pub bounds: Rect,
    pub radius: f32,
}

/// Freehand translucent stroke
#[derive(Clone, Debug, PartialEq)]
pub struct HighlighterAnnotation {
    pub points: Vec<Point>,
    pub width: f32,
    pub color: ShapeColor,
}

/// Darkens everything outside its bounds
#[derive(Clone, Debug, PartialEq)]
pub struct SpotlightAnnotation {
    pub bounds: Rect,
    /// Alpha of the darkening, 0.0-1.0
    pub darkness: f32,
}

/// Circular zoomed view of a source region, shown at a display position
#[derive(Clone, Debug, PartialEq)]
pub struct MagnifierAnnotation {
    pub source_center: Point,
    pub source_radius: f32,
    pub display_position: Point,
    pub zoom: f32,
}

impl MagnifierAnnotation {
    /// Side of the square the magnified view occupies
    pub fn display_size(&self) -> f32 {
        self.source_radius * self.zoom * 2.0
    }
}

/// Variant payloads
#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationKind {
    Arrow(ArrowAnnotation),
    Line(LineAnnotation),
    Rectangle(RectangleAnnotation),
    Ellipse(EllipseAnnotation),
    Text(TextAnnotation),
    Step(StepAnnotation),
    FilledRect(FilledRectAnnotation),
    Mosaic(MosaicAnnotation),
    Blur(BlurAnnotation),
    Highlighter(HighlighterAnnotation),
    Spotlight(SpotlightAnnotation),
    Magnifier(MagnifierAnnotation),
}

impl AnnotationKind {
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationKind::Arrow(_) => "Arrow",
            AnnotationKind::Line(_) => "Line",
            AnnotationKind::Rectangle(_) => "Rectangle",
            AnnotationKind::Ellipse(_) => "Ellipse",
            AnnotationKind::Text(_) => "Text",
            AnnotationKind::Step(_) => "Step",
            AnnotationKind::FilledRect(_) => "FilledRect",
            AnnotationKind::Mosaic(_) => "Mosaic",
            AnnotationKind::Blur(_) => "Blur",
            AnnotationKind::Highlighter(_) => "Highlighter",
            AnnotationKind::Spotlight(_) => "Spotlight",
            AnnotationKind::Magnifier(_) => "Magnifier",
        }
    }
}

/// Bounds of a segment grown by the stroke thickness on every side
fn segment_bounds(start: Point, end: Point, thickness: f32) -> Rect {
    Rect::new(
        start.x.min(end.x) - thickness,
        start.y.min(end.y) - thickness,
        (end.x - start.x).abs() + thickness * 2.0,
        (end.y - start.y).abs() + thickness * 2.0,
    )
}

/// A single piece of markup on the canvas
///
/// `Clone` keeps the identity and is used for snapshots of the same
/// annotation; [`Annotation::duplicate`] creates a distinct annotation.
#[derive(Clone, Debug)]
pub struct Annotation {
    id: AnnotationId,
    pub style: StrokeStyle,
    /// Transient UI flag, owned by the selection state
    pub selected: bool,
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, style: StrokeStyle) -> Self {
        Self {
            id: AnnotationId::new(),
            style,
            selected: false,
            kind,
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn is_step(&self) -> bool {
        matches!(self.kind, AnnotationKind::Step(_))
    }

    pub fn is_spotlight(&self) -> bool {
        matches!(self.kind, AnnotationKind::Spotlight(_))
    }

    /// Minimal axis-aligned rectangle enclosing the visible extent
    pub fn bounds(&self) -> Rect {
        let t = self.style.thickness;
        match &self.kind {
            AnnotationKind::Arrow(a) => segment_bounds(a.start, a.end, t),
            AnnotationKind::Line(l) => segment_bounds(l.start, l.end, t),
            AnnotationKind::Rectangle(r) => r.bounds,
            AnnotationKind::Ellipse(e) => e.bounds,
            AnnotationKind::FilledRect(f) => f.bounds,
            AnnotationKind::Mosaic(m) => m.bounds,
            AnnotationKind::Blur(b) => b.bounds,
            AnnotationKind::Spotlight(s) => s.bounds,
            AnnotationKind::Text(text) => {
                // Approximation; the rendered glyph run may differ
                let width = text.text.chars().count() as f32
                    * text.font_size
                    * defaults::TEXT_CHAR_WIDTH;
                Rect::new(
                    text.position.x,
                    text.position.y,
                    width.max(defaults::TEXT_MIN_WIDTH),
                    text.font_size * defaults::TEXT_LINE_HEIGHT,
                )
            }
            AnnotationKind::Step(s) => Rect::new(
                s.position.x - s.size / 2.0,
                s.position.y - s.size / 2.0,
                s.size,
                s.size,
            ),
            AnnotationKind::Highlighter(h) => {
                let Some(first) = h.points.first() else {
                    return Rect::default();
                };
                let (mut min, mut max) = (*first, *first);
                for p in &h.points[1..] {
                    min.x = min.x.min(p.x);
                    min.y = min.y.min(p.y);
                    max.x = max.x.max(p.x);
                    max.y = max.y.max(p.y);
                }
                let half = h.width / 2.0;
                Rect::new(
                    min.x - half,
                    min.y - half,
                    max.x - min.x + h.width,
                    max.y - min.y + h.width,
                )
            }
            AnnotationKind::Magnifier(m) => {
                let size = m.display_size();
                Rect::new(
                    m.display_position.x - size / 2.0,
                    m.display_position.y - size / 2.0,
                    size,
                    size,
                )
            }
        }
    }

    /// Translate the annotation's geometry by `delta`.
    ///
    /// A magnifier moves its display position only; the sampled source stays put.
    pub fn translate(&mut self, delta: Vector) {
        match &mut self.kind {
            AnnotationKind::Arrow(a) => {
                a.start += delta;
                a.end += delta;
            }
            AnnotationKind::Line(l) => {
                l.start += delta;
                l.end += delta;
            }
            AnnotationKind::Rectangle(r) => r.bounds = r.bounds.translate(delta),
            AnnotationKind::Ellipse(e) => e.bounds = e.bounds.translate(delta),
            AnnotationKind::FilledRect(f) => f.bounds = f.bounds.translate(delta),
            AnnotationKind::Mosaic(m) => m.bounds = m.bounds.translate(delta),
            AnnotationKind::Blur(b) => b.bounds = b.bounds.translate(delta),
            AnnotationKind::Spotlight(s) => s.bounds = s.bounds.translate(delta),
            AnnotationKind::Text(t) => t.position += delta,
            AnnotationKind::Step(s) => s.position += delta,
            AnnotationKind::Highlighter(h) => {
                for p in &mut h.points {
                    *p += delta;
                }
            }
            AnnotationKind::Magnifier(m) => m.display_position += delta,
        }
    }

    /// Independent copy with a fresh identity; the copy starts unselected
    pub fn duplicate(&self) -> Annotation {
        Annotation {
            id: AnnotationId::new(),
            style: self.style,
            selected: false,
            kind: self.kind.clone(),
        }
    }

    /// Whether the annotation has enough geometry to be kept
    pub fn is_valid(&self) -> bool {
        match &self.kind {
            AnnotationKind::Highlighter(h) => h.points.len() >= 2,
            _ => true,
        }
    }
}
