//! Drawing tools and the annotations they produce
//!
//! A drag tool creates a provisional annotation on pointer down, reshapes it
//! on every pointer move and either commits or discards it on release.

use crate::config::{ShapeColor, ToolDefaults};
use crate::domain::{
    Annotation, AnnotationKind, ArrowAnnotation, BlurAnnotation, EllipseAnnotation,
    FilledRectAnnotation, HighlighterAnnotation, LineAnnotation, MagnifierAnnotation,
    MosaicAnnotation, Point, Rect, RectangleAnnotation, SpotlightAnnotation, StepAnnotation,
    StrokeStyle, TextAnnotation, defaults, derived,
};

/// Provisional annotations smaller than this in both dimensions are dropped
pub const MIN_SHAPE_SIZE: f32 = 5.0;

/// Magnifier display offset from the bottom-right of the drag rectangle
pub const MAGNIFIER_OFFSET: f32 = 20.0;

/// Source radius of a magnifier before the pointer moves
const MAGNIFIER_INITIAL_RADIUS: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    Select,
    Arrow,
    Line,
    Rectangle,
    Ellipse,
    Text,
    Step,
    Highlighter,
    FilledRect,
    Mosaic,
    Blur,
    Spotlight,
    Magnifier,
}

impl Tool {
    pub const ALL: [Tool; 13] = [
        Tool::Select,
        Tool::Arrow,
        Tool::Line,
        Tool::Rectangle,
        Tool::Ellipse,
        Tool::Text,
        Tool::Step,
        Tool::Highlighter,
        Tool::FilledRect,
        Tool::Mosaic,
        Tool::Blur,
        Tool::Spotlight,
        Tool::Magnifier,
    ];

    /// Tools that shape an annotation by dragging
    pub fn is_drag_tool(self) -> bool {
        !matches!(self, Tool::Select | Tool::Text | Tool::Step)
    }

    pub fn name(self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Arrow => "Arrow",
            Tool::Line => "Line",
            Tool::Rectangle => "Rectangle",
            Tool::Ellipse => "Ellipse",
            Tool::Text => "Text",
            Tool::Step => "Step",
            Tool::Highlighter => "Highlighter",
            Tool::FilledRect => "Filled rectangle",
            Tool::Mosaic => "Mosaic",
            Tool::Blur => "Blur",
            Tool::Spotlight => "Spotlight",
            Tool::Magnifier => "Magnifier",
        }
    }
}

/// Active tool and the style new annotations are created with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolState {
    pub tool: Tool,
    pub color: ShapeColor,
    pub stroke_width: f32,
    /// 0.0-1.0, feeds the derived effect parameters
    pub opacity: f32,
    pub font_size: f32,
}

impl Default for ToolState {
    fn default() -> Self {
        Self::from_defaults(ToolDefaults::default())
    }
}

impl ToolState {
    pub fn from_defaults(defaults: ToolDefaults) -> Self {
        Self {
            tool: Tool::Select,
            color: defaults.color,
            stroke_width: defaults.stroke_width,
            opacity: defaults.opacity.clamp(0.0, 1.0),
            font_size: defaults::FONT_SIZE,
        }
    }

    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color,
            thickness: self.stroke_width,
            opacity: self.opacity,
        }
    }

    /// Provisional annotation for a drag starting at `point`.
    ///
    /// Returns `None` when the current tool does not draw by dragging.
    pub fn begin(&self, point: Point) -> Option<Annotation> {
        let empty = Rect::new(point.x, point.y, 0.0, 0.0);
        let (opacity, width) = (self.opacity, self.stroke_width);

        let kind = match self.tool {
            Tool::Select | Tool::Text | Tool::Step => return None,
            Tool::Arrow => AnnotationKind::Arrow(ArrowAnnotation::new(point, point)),
            Tool::Line => AnnotationKind::Line(LineAnnotation {
                start: point,
                end: point,
            }),
            Tool::Rectangle => AnnotationKind::Rectangle(RectangleAnnotation { bounds: empty }),
            Tool::Ellipse => AnnotationKind::Ellipse(EllipseAnnotation { bounds: empty }),
            Tool::Highlighter => AnnotationKind::Highlighter(HighlighterAnnotation {
                points: vec![point],
                width: derived::highlighter_width(width),
                color: derived::highlighter_color(self.color, opacity),
            }),
            Tool::FilledRect => AnnotationKind::FilledRect(FilledRectAnnotation {
                bounds: empty,
                fill: derived::filled_rect_color(self.color, opacity),
            }),
            Tool::Mosaic => AnnotationKind::Mosaic(MosaicAnnotation {
                bounds: empty,
                block_size: derived::mosaic_block_size(opacity, width),
            }),
            Tool::Blur => AnnotationKind::Blur(BlurAnnotation {
                bounds: empty,
                radius: derived::blur_radius(opacity, width),
            }),
            Tool::Spotlight => AnnotationKind::Spotlight(SpotlightAnnotation {
                bounds: empty,
                darkness: derived::spotlight_darkness(opacity),
            }),
            Tool::Magnifier => AnnotationKind::Magnifier(MagnifierAnnotation {
                source_center: point,
                source_radius: MAGNIFIER_INITIAL_RADIUS,
                display_position: point,
                zoom: derived::magnifier_zoom(opacity),
            }),
        };
        Some(Annotation::new(kind, self.style()))
    }

    /// Numbered marker centered on `point`
    pub fn step_marker(&self, point: Point, number: u32) -> Annotation {
        Annotation::new(
            AnnotationKind::Step(StepAnnotation {
                position: point,
                number,
                size: derived::step_size(self.stroke_width),
            }),
            self.style(),
        )
    }

    /// Text label at `point`; blank text yields nothing
    pub fn text_label(&self, point: Point, text: &str, font_size: f32) -> Option<Annotation> {
        if text.trim().is_empty() {
            return None;
        }
        Some(Annotation::new(
            AnnotationKind::Text(TextAnnotation::new(point, text, font_size)),
            self.style(),
        ))
    }
}

/// Reshape a provisional annotation for a drag from `start` to `current`
pub fn update_provisional(annotation: &mut Annotation, start: Point, current: Point) {
    let rect = Rect::from_points(start, current);
    match &mut annotation.kind {
        AnnotationKind::Arrow(a) => a.end = current,
        AnnotationKind::Line(l) => l.end = current,
        AnnotationKind::Rectangle(r) => r.bounds = rect,
        AnnotationKind::Ellipse(e) => e.bounds = rect,
        AnnotationKind::FilledRect(f) => f.bounds = rect,
        AnnotationKind::Mosaic(m) => m.bounds = rect,
        AnnotationKind::Blur(b) => b.bounds = rect,
        AnnotationKind::Spotlight(s) => s.bounds = rect,
        AnnotationKind::Highlighter(h) => h.points.push(current),
        AnnotationKind::Magnifier(m) => {
            m.source_center = rect.center();
            m.source_radius = rect.width.max(rect.height) / 2.0;
            m.display_position = Point::new(
                rect.right() + MAGNIFIER_OFFSET,
                rect.bottom() + MAGNIFIER_OFFSET,
            );
        }
        AnnotationKind::Text(_) | AnnotationKind::Step(_) => {}
    }
}

/// Whether a finished drag produced something worth keeping
pub fn should_commit(annotation: &Annotation) -> bool {
    if let AnnotationKind::Highlighter(_) = annotation.kind {
        return annotation.is_valid();
    }
    let bounds = annotation.bounds();
    bounds.width >= MIN_SHAPE_SIZE || bounds.height >= MIN_SHAPE_SIZE
}
