//! Annotation rendering
//!
//! This module contains:
//! - Geometry shared by both render passes
//! - Pixel-sampling effects (mosaic, blur, magnifier)
//! - Text rasterization
//! - Per-variant drawing and the two-pass [`RenderPipeline`]

pub mod effects;
pub mod geometry;
pub mod image;
pub mod text;

use ::image::RgbaImage;

use crate::domain::{Annotation, AnnotationList, Rect};
pub use self::image::RenderMode;
use self::image::{draw_annotation, draw_crop_rect, draw_selection_indicator};
use self::text::FontCache;

/// Extra state the interactive pass shows besides the committed annotations
#[derive(Debug, Default, Clone, Copy)]
pub struct OverlayExtras<'a> {
    /// Annotation being drawn, not yet committed
    pub provisional: Option<&'a Annotation>,
    /// Crop rectangle being dragged
    pub crop: Option<Rect>,
}

/// Produces the interactive overlay and the flattened export
#[derive(Debug, Default)]
pub struct RenderPipeline {
    fonts: FontCache,
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full redraw for on-screen display.
    ///
    /// Spotlights are drawn first as an underlay, in sequence order, so their
    /// dimming never covers other markup. Everything else follows in sequence
    /// order; a selected annotation gets a dashed indicator.
    pub fn render_overlay(
        &mut self,
        base: &RgbaImage,
        annotations: &AnnotationList,
        extras: OverlayExtras<'_>,
    ) -> RgbaImage {
        let mut frame = base.clone();
        let all = || annotations.iter().chain(extras.provisional);

        for spotlight in all().filter(|a| a.is_spotlight()) {
            draw_annotation(&mut frame, base, spotlight, RenderMode::Interactive, &mut self.fonts);
        }
        for annotation in all().filter(|a| !a.is_spotlight()) {
            draw_annotation(&mut frame, base, annotation, RenderMode::Interactive, &mut self.fonts);
            if annotation.selected {
                draw_selection_indicator(&mut frame, annotation);
            }
        }
        if let Some(crop) = extras.crop {
            draw_crop_rect(&mut frame, &crop);
        }
        frame
    }

    /// One pass of base image plus every annotation in sequence order.
    ///
    /// Spotlights are not lifted into an underlay and no selection indicator
    /// is ever drawn.
    pub fn render_export(&mut self, base: &RgbaImage, annotations: &AnnotationList) -> RgbaImage {
        let mut frame = base.clone();
        for annotation in annotations {
            draw_annotation(&mut frame, base, annotation, RenderMode::Export, &mut self.fonts);
        }
        log::debug!(
            "export rendered: {}x{}, {} annotations",
            frame.width(),
            frame.height(),
            annotations.len()
        );
        frame
    }
}
