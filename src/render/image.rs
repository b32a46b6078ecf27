//! Per-variant annotation drawing onto an RgbaImage
//!
//! Vector shapes go through tiny-skia; pixel effects and text write into the
//! image directly. Both render modes share everything here except the blur.

use image::{Rgba, RgbaImage};
use tiny_skia::{
    ColorU8, FillRule, IntSize, LineCap, LineJoin, Paint, Path, Pixmap, Stroke, StrokeDash,
    Transform,
};

use super::effects;
use super::geometry::{self, export_blur, magnifier, selection, step};
use super::text::{self, FontCache};
use crate::config::ShapeColor;
use crate::domain::{Annotation, AnnotationKind, FontWeight, Rect, defaults};

/// Which of the two render passes is drawing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// On-screen preview, redrawn after every mutation
    Interactive,
    /// Flattened raster for save and clipboard
    Export,
}

/// Convert RgbaImage to a premultiplied Pixmap, apply drawing function, and copy back
pub(crate) fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let Some(size) = IntSize::from_wh(img.width(), img.height()) else {
        return;
    };
    let mut data = Vec::with_capacity(img.as_raw().len());
    for p in img.pixels() {
        let c = ColorU8::from_rgba(p[0], p[1], p[2], p[3]).premultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    let Some(mut pixmap) = Pixmap::from_vec(data, size) else {
        return;
    };

    f(&mut pixmap);

    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
}

fn paint_for(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}

/// Stroke with round caps and joins
fn stroke_path(pixmap: &mut Pixmap, path: &Path, rgba: [u8; 4], width: f32) {
    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(path, &paint_for(rgba), &stroke, Transform::identity(), None);
}

/// Outline stroke with square corners for rectangles
fn stroke_outline(pixmap: &mut Pixmap, path: &Path, rgba: [u8; 4], width: f32) {
    let stroke = Stroke {
        width,
        ..Default::default()
    };
    pixmap.stroke_path(path, &paint_for(rgba), &stroke, Transform::identity(), None);
}

fn fill_rect(pixmap: &mut Pixmap, rect: &Rect, rgba: [u8; 4]) {
    if let Some(r) = rect.to_skia() {
        pixmap.fill_rect(r, &paint_for(rgba), Transform::identity(), None);
    }
}

/// Draw a single annotation.
///
/// `base` is the current canvas bitmap that pixel effects sample from;
/// `target` already holds the base plus everything drawn before.
pub fn draw_annotation(
    target: &mut RgbaImage,
    base: &RgbaImage,
    annotation: &Annotation,
    mode: RenderMode,
    fonts: &mut FontCache,
) {
    let color = annotation.style.color.to_rgba_u8();
    let thickness = annotation.style.thickness;

    match &annotation.kind {
        AnnotationKind::Arrow(a) => {
            if let Some(path) = geometry::arrow_path(a.start, a.end, a.head_points()) {
                with_pixmap(target, |pixmap| stroke_path(pixmap, &path, color, thickness));
            }
        }
        AnnotationKind::Line(l) => {
            if let Some(path) = geometry::segment_path(l.start, l.end) {
                with_pixmap(target, |pixmap| stroke_path(pixmap, &path, color, thickness));
            }
        }
        AnnotationKind::Rectangle(r) => {
            if let Some(path) = geometry::rect_path(&r.bounds) {
                with_pixmap(target, |pixmap| stroke_outline(pixmap, &path, color, thickness));
            }
        }
        AnnotationKind::Ellipse(e) => {
            if let Some(path) = geometry::ellipse_in(&e.bounds) {
                with_pixmap(target, |pixmap| stroke_outline(pixmap, &path, color, thickness));
            }
        }
        AnnotationKind::Text(t) => {
            if let Some(font) = fonts.get(&t.font_family, t.font_weight) {
                text::draw_text(
                    target,
                    &font,
                    &t.text,
                    t.position,
                    t.font_size,
                    annotation.style.color,
                );
            }
        }
        AnnotationKind::Step(s) => {
            let radius = s.size / 2.0;
            if let Some(path) = geometry::ellipse_path(s.position.x, s.position.y, radius, radius) {
                with_pixmap(target, |pixmap| {
                    pixmap.fill_path(
                        &path,
                        &paint_for(color),
                        FillRule::Winding,
                        Transform::identity(),
                        None,
                    );
                });
            }
            if let Some(font) = fonts.get(defaults::FONT_FAMILY, FontWeight::Bold) {
                text::draw_text_centered(
                    target,
                    &font,
                    &s.number.to_string(),
                    s.position,
                    s.size * step::LABEL_SCALE,
                    ShapeColor::WHITE,
                );
            }
        }
        AnnotationKind::Highlighter(h) => {
            if h.points.len() < 2 {
                return;
            }
            if let Some(path) = geometry::polyline_path(&h.points) {
                let ink = h.color.to_rgba_u8();
                with_pixmap(target, |pixmap| stroke_path(pixmap, &path, ink, h.width));
            }
        }
        AnnotationKind::FilledRect(f) => {
            let fill = f.fill.to_rgba_u8();
            with_pixmap(target, |pixmap| fill_rect(pixmap, &f.bounds, fill));
        }
        AnnotationKind::Mosaic(m) => effects::mosaic(target, base, &m.bounds, m.block_size),
        AnnotationKind::Blur(b) => match mode {
            RenderMode::Interactive => effects::blur(target, base, &b.bounds, b.radius),
            // No blur primitive on the export path; approximate with cells
            RenderMode::Export => {
                effects::mosaic(target, base, &b.bounds, export_blur::block_size(b.radius))
            }
        },
        AnnotationKind::Spotlight(s) => {
            let regions =
                geometry::spotlight_regions(&s.bounds, base.width() as f32, base.height() as f32);
            let alpha = (255.0 * s.darkness) as u8;
            with_pixmap(target, |pixmap| {
                for region in &regions {
                    fill_rect(pixmap, region, [0, 0, 0, alpha]);
                }
            });
        }
        AnnotationKind::Magnifier(m) => {
            let display = annotation.bounds();
            effects::magnify(target, base, m, &display);
            if let Some(ring) = geometry::ellipse_in(&display) {
                with_pixmap(target, |pixmap| {
                    stroke_outline(pixmap, &ring, color, magnifier::RING_WIDTH)
                });
            }
        }
    }
}

/// Dashed outline around the bounds of a selected annotation
pub fn draw_selection_indicator(target: &mut RgbaImage, annotation: &Annotation) {
    let bounds = annotation
        .bounds()
        .inflate(selection::INFLATE, selection::INFLATE);
    if let Some(path) = geometry::rect_path(&bounds) {
        let rgba = selection::COLOR.to_rgba_u8();
        with_pixmap(target, |pixmap| {
            let stroke = Stroke {
                width: selection::WIDTH,
                dash: StrokeDash::new(selection::DASH.to_vec(), 0.0),
                ..Default::default()
            };
            pixmap.stroke_path(&path, &paint_for(rgba), &stroke, Transform::identity(), None);
        });
    }
}

/// Translucent dashed rectangle for a crop drag in progress
pub fn draw_crop_rect(target: &mut RgbaImage, rect: &Rect) {
    let Some(path) = geometry::rect_path(rect) else {
        return;
    };
    with_pixmap(target, |pixmap| {
        fill_rect(pixmap, rect, geometry::crop::FILL_RGBA);
        let stroke = Stroke {
            width: geometry::crop::WIDTH,
            dash: StrokeDash::new(geometry::crop::DASH.to_vec(), 0.0),
            ..Default::default()
        };
        pixmap.stroke_path(
            &path,
            &paint_for(geometry::crop::STROKE_RGBA),
            &stroke,
            Transform::identity(),
            None,
        );
    });
}
