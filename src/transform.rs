//! Whole-canvas crop, rotation and scaling
//!
//! Every operation produces a new bitmap together with a rewritten copy of the
//! annotation sequence. Nothing is modified in place, so a caller that only
//! swaps state on `Ok` never observes a half-transformed canvas.

use image::{RgbaImage, imageops};
use thiserror::Error;

use crate::domain::{Annotation, AnnotationKind, PixelRect, Point, Rect};

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("target size {width}x{height} is degenerate")]
    DegenerateSize { width: i64, height: i64 },
    #[error("invalid scale factors {scale_x}x{scale_y}")]
    InvalidScale { scale_x: f32, scale_y: f32 },
    #[error("crop rectangle does not overlap the canvas")]
    EmptyCrop,
}

/// Result of a canvas transform
#[derive(Debug, Clone)]
pub struct Transformed {
    pub image: RgbaImage,
    pub annotations: Vec<Annotation>,
    /// Annotations that fell off the canvas
    pub dropped: usize,
}

/// Cut the canvas down to `rect`.
///
/// The rectangle is truncated to whole pixels and clamped to the image.
/// Annotations move by the crop origin; those whose bounds no longer touch
/// the new canvas are dropped.
pub fn crop(
    image: &RgbaImage,
    annotations: &[Annotation],
    rect: Rect,
) -> Result<Transformed, TransformError> {
    let requested = rect.to_pixel_rect();
    if requested.width() <= 0 || requested.height() <= 0 {
        return Err(TransformError::DegenerateSize {
            width: requested.width() as i64,
            height: requested.height() as i64,
        });
    }
    let canvas = PixelRect::from_xywh(0, 0, image.width() as i32, image.height() as i32);
    let area = requested
        .intersect(canvas)
        .ok_or(TransformError::EmptyCrop)?;
    let dim = area.dimensions().ok_or(TransformError::EmptyCrop)?;

    let cropped =
        imageops::crop_imm(image, area.left as u32, area.top as u32, dim.width(), dim.height())
            .to_image();

    let offset = Point::default() - Point::new(area.left as f32, area.top as f32);
    let bounds = Rect::new(0.0, 0.0, dim.width() as f32, dim.height() as f32);
    let kept: Vec<Annotation> = annotations
        .iter()
        .cloned()
        .map(|mut a| {
            a.translate(offset);
            a
        })
        .filter(|a| a.bounds().intersects(&bounds))
        .collect();

    let dropped = annotations.len() - kept.len();
    log::debug!(
        "crop applied: {}x{}, {} annotations dropped",
        dim.width(),
        dim.height(),
        dropped
    );
    Ok(Transformed {
        image: cropped,
        annotations: kept,
        dropped,
    })
}

/// Rotate the canvas a quarter turn clockwise.
///
/// Point-bearing annotations map every point through `(x, y) -> (new_width - y, x)`.
/// Bounds-only annotations rotate their bottom-left corner the same way and
/// are translated by the resulting offset, keeping their width and height.
pub fn rotate_90_clockwise(
    image: &RgbaImage,
    annotations: &[Annotation],
) -> Result<Transformed, TransformError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(TransformError::DegenerateSize {
            width: image.width() as i64,
            height: image.height() as i64,
        });
    }
    let rotated = imageops::rotate90(image);
    let new_width = rotated.width() as f32;
    let turn = |p: Point| Point::new(new_width - p.y, p.x);

    let annotations = annotations
        .iter()
        .cloned()
        .map(|mut a| {
            match &mut a.kind {
                AnnotationKind::Arrow(arrow) => {
                    arrow.start = turn(arrow.start);
                    arrow.end = turn(arrow.end);
                }
                AnnotationKind::Line(line) => {
                    line.start = turn(line.start);
                    line.end = turn(line.end);
                }
                AnnotationKind::Text(text) => text.position = turn(text.position),
                AnnotationKind::Step(step) => step.position = turn(step.position),
                _ => {
                    let bounds = a.bounds();
                    let corner = turn(Point::new(bounds.x, bounds.bottom()));
                    a.translate(corner - bounds.origin());
                }
            }
            a
        })
        .collect();

    log::debug!("rotated to {}x{}", rotated.width(), rotated.height());
    Ok(Transformed {
        image: rotated,
        annotations,
        dropped: 0,
    })
}

/// Scale the canvas independently per axis.
///
/// Coordinates scale by their axis factor; text size, step size and
/// magnifier radius scale by the average of both factors.
pub fn scale(
    image: &RgbaImage,
    annotations: &[Annotation],
    scale_x: f32,
    scale_y: f32,
) -> Result<Transformed, TransformError> {
    let valid = |s: f32| s.is_finite() && s > 0.0;
    if !valid(scale_x) || !valid(scale_y) {
        return Err(TransformError::InvalidScale { scale_x, scale_y });
    }
    let width = (image.width() as f32 * scale_x).round() as i64;
    let height = (image.height() as f32 * scale_y).round() as i64;
    if width <= 0 || height <= 0 || width > u32::MAX as i64 || height > u32::MAX as i64 {
        return Err(TransformError::DegenerateSize { width, height });
    }

    let resized = imageops::resize(
        image,
        width as u32,
        height as u32,
        imageops::FilterType::Triangle,
    );
    let average = (scale_x + scale_y) / 2.0;
    let annotations = annotations
        .iter()
        .cloned()
        .map(|mut a| {
            scale_annotation(&mut a, scale_x, scale_y, average);
            a
        })
        .collect();

    log::debug!("scaled by {scale_x}x{scale_y} to {width}x{height}");
    Ok(Transformed {
        image: resized,
        annotations,
        dropped: 0,
    })
}

/// Resize the canvas to exactly `width` x `height` pixels
pub fn resize(
    image: &RgbaImage,
    annotations: &[Annotation],
    width: u32,
    height: u32,
) -> Result<Transformed, TransformError> {
    let (scale_x, scale_y) = scale_factors(image, width, height)?;
    scale(image, annotations, scale_x, scale_y)
}

/// Per-axis factors that turn the current size into `width` x `height`
pub fn scale_factors(
    image: &RgbaImage,
    width: u32,
    height: u32,
) -> Result<(f32, f32), TransformError> {
    if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
        return Err(TransformError::DegenerateSize {
            width: width as i64,
            height: height as i64,
        });
    }
    Ok((
        width as f32 / image.width() as f32,
        height as f32 / image.height() as f32,
    ))
}

fn scale_annotation(annotation: &mut Annotation, sx: f32, sy: f32, average: f32) {
    match &mut annotation.kind {
        AnnotationKind::Arrow(a) => {
            a.start = a.start.scale(sx, sy);
            a.end = a.end.scale(sx, sy);
        }
        AnnotationKind::Line(l) => {
            l.start = l.start.scale(sx, sy);
            l.end = l.end.scale(sx, sy);
        }
        AnnotationKind::Rectangle(r) => r.bounds = r.bounds.scale(sx, sy),
        AnnotationKind::Ellipse(e) => e.bounds = e.bounds.scale(sx, sy),
        AnnotationKind::FilledRect(f) => f.bounds = f.bounds.scale(sx, sy),
        AnnotationKind::Mosaic(m) => m.bounds = m.bounds.scale(sx, sy),
        AnnotationKind::Blur(b) => b.bounds = b.bounds.scale(sx, sy),
        AnnotationKind::Spotlight(s) => s.bounds = s.bounds.scale(sx, sy),
        AnnotationKind::Text(t) => {
            t.position = t.position.scale(sx, sy);
            t.font_size *= average;
        }
        AnnotationKind::Step(s) => {
            s.position = s.position.scale(sx, sy);
            s.size *= average;
        }
        AnnotationKind::Highlighter(h) => {
            for p in &mut h.points {
                *p = p.scale(sx, sy);
            }
        }
        AnnotationKind::Magnifier(m) => {
            m.source_center = m.source_center.scale(sx, sy);
            m.display_position = m.display_position.scale(sx, sy);
            m.source_radius *= average;
        }
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::domain::{
        ArrowAnnotation, RectangleAnnotation, StepAnnotation, StrokeStyle, TextAnnotation,
    };

    fn canvas(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    fn step_at(x: f32, y: f32) -> Annotation {
        Annotation::new(
            AnnotationKind::Step(StepAnnotation {
                position: Point::new(x, y),
                number: 1,
                size: 32.0,
            }),
            StrokeStyle::default(),
        )
    }

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Annotation {
        Annotation::new(
            AnnotationKind::Rectangle(RectangleAnnotation {
                bounds: Rect::new(x, y, w, h),
            }),
            StrokeStyle::default(),
        )
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "{a} != {b}");
    }

    #[test]
    fn test_crop_translates_and_drops() {
        let image = canvas(200, 200);
        let inside = step_at(30.0, 30.0);
        let outside = rect(150.0, 150.0, 20.0, 20.0);
        let inside_id = inside.id();

        let out = crop(&image, &[inside, outside], Rect::new(20.0, 20.0, 100.0, 100.0)).unwrap();
        assert_eq!((out.image.width(), out.image.height()), (100, 100));
        assert_eq!(*out.image.get_pixel(0, 0), Rgba([20, 20, 0, 255]));
        assert_eq!(out.dropped, 1);
        assert_eq!(out.annotations.len(), 1);
        assert_eq!(out.annotations[0].id(), inside_id);
        let AnnotationKind::Step(s) = &out.annotations[0].kind else {
            panic!("expected step");
        };
        assert_eq!(s.position, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_crop_keeps_partially_visible() {
        let image = canvas(100, 100);
        // Bounds end exactly on the crop origin: touching counts as visible
        let edge = rect(0.0, 0.0, 10.0, 10.0);
        let out = crop(&image, &[edge], Rect::new(10.0, 10.0, 50.0, 50.0)).unwrap();
        assert_eq!(out.annotations.len(), 1);
    }

    #[test]
    fn test_crop_rejects_degenerate() {
        let image = canvas(50, 50);
        assert_eq!(
            crop(&image, &[], Rect::new(0.0, 0.0, 0.0, 10.0)).unwrap_err(),
            TransformError::DegenerateSize {
                width: 0,
                height: 10
            }
        );
        assert_eq!(
            crop(&image, &[], Rect::new(60.0, 60.0, 10.0, 10.0)).unwrap_err(),
            TransformError::EmptyCrop
        );
    }

    #[test]
    fn test_rotate_maps_points() {
        let image = canvas(100, 50);
        let arrow = Annotation::new(
            AnnotationKind::Arrow(ArrowAnnotation::new(
                Point::new(10.0, 5.0),
                Point::new(60.0, 20.0),
            )),
            StrokeStyle::default(),
        );
        let out = rotate_90_clockwise(&image, &[arrow]).unwrap();
        assert_eq!((out.image.width(), out.image.height()), (50, 100));
        let AnnotationKind::Arrow(a) = &out.annotations[0].kind else {
            panic!("expected arrow");
        };
        assert_eq!(a.start, Point::new(45.0, 10.0));
        assert_eq!(a.end, Point::new(30.0, 60.0));
    }

    #[test]
    fn test_rotate_moves_bounds_by_bottom_left_corner() {
        let image = canvas(100, 50);
        let out = rotate_90_clockwise(&image, &[rect(10.0, 5.0, 20.0, 10.0)]).unwrap();
        // Bottom-left (10, 15) turns into (35, 10); size is unchanged
        assert_eq!(out.annotations[0].bounds(), Rect::new(35.0, 10.0, 20.0, 10.0));
    }

    #[test]
    fn test_four_rotations_restore_points() {
        let image = canvas(80, 30);
        let text = Annotation::new(
            AnnotationKind::Text(TextAnnotation::new(Point::new(12.0, 7.0), "note", 16.0)),
            StrokeStyle::default(),
        );
        let original = vec![step_at(40.0, 20.0), text];

        let mut state = Transformed {
            image,
            annotations: original.clone(),
            dropped: 0,
        };
        for _ in 0..4 {
            state = rotate_90_clockwise(&state.image, &state.annotations).unwrap();
        }
        assert_eq!((state.image.width(), state.image.height()), (80, 30));
        assert_eq!(state.image, canvas(80, 30));
        for (after, before) in state.annotations.iter().zip(&original) {
            assert_eq!(after.kind, before.kind);
        }
    }

    #[test]
    fn test_scale_round_trip() {
        let image = canvas(64, 48);
        let text = Annotation::new(
            AnnotationKind::Text(TextAnnotation::new(Point::new(12.0, 7.0), "note", 16.0)),
            StrokeStyle::default(),
        );
        let original = vec![rect(4.0, 6.0, 20.0, 10.0), step_at(30.0, 30.0), text];

        let up = scale(&image, &original, 2.0, 2.0).unwrap();
        assert_eq!((up.image.width(), up.image.height()), (128, 96));
        let down = scale(&up.image, &up.annotations, 0.5, 0.5).unwrap();
        assert_eq!((down.image.width(), down.image.height()), (64, 48));

        for (after, before) in down.annotations.iter().zip(&original) {
            let (a, b) = (after.bounds(), before.bounds());
            assert_close(a.x, b.x);
            assert_close(a.y, b.y);
            assert_close(a.width, b.width);
            assert_close(a.height, b.height);
        }
    }

    #[test]
    fn test_scale_uses_average_for_sizes() {
        let image = canvas(10, 10);
        let out = scale(&image, &[step_at(2.0, 4.0)], 3.0, 1.0).unwrap();
        let AnnotationKind::Step(s) = &out.annotations[0].kind else {
            panic!("expected step");
        };
        assert_eq!(s.position, Point::new(6.0, 4.0));
        assert_eq!(s.size, 64.0);
    }

    #[test]
    fn test_invalid_scale_and_resize() {
        let image = canvas(10, 10);
        assert!(matches!(
            scale(&image, &[], 0.0, 1.0),
            Err(TransformError::InvalidScale { .. })
        ));
        assert!(matches!(
            scale(&image, &[], 0.01, 1.0),
            Err(TransformError::DegenerateSize { .. })
        ));
        assert!(resize(&image, &[], 0, 5).is_err());

        let out = resize(&image, &[rect(1.0, 1.0, 2.0, 2.0)], 20, 5).unwrap();
        assert_eq!((out.image.width(), out.image.height()), (20, 5));
        assert_eq!(out.annotations[0].bounds(), Rect::new(2.0, 0.5, 4.0, 1.0));
    }
}
