//! Region selection over a full-screen overlay
//!
//! The drag is tracked in logical overlay units; on release it is scaled to
//! physical pixels of the pre-captured screen and cropped.

use image::{RgbaImage, imageops};

use super::{CaptureError, CaptureHandoff, ScreenCapturer};
use crate::domain::{PixelRect, Point, Rect};

/// Selections must exceed this in both dimensions, logical and physical
pub const MIN_SELECTION: f32 = 5.0;

#[derive(Debug)]
pub struct RegionSelector {
    screen: RgbaImage,
    overlay_width: f32,
    overlay_height: f32,
    drag: Option<(Point, Point)>,
}

impl RegionSelector {
    /// `overlay_width`/`overlay_height` are the overlay's logical size
    pub fn new(screen: RgbaImage, overlay_width: f32, overlay_height: f32) -> Self {
        Self {
            screen,
            overlay_width,
            overlay_height,
            drag: None,
        }
    }

    /// Capture the screen first, then open the selector over it
    pub fn capture(
        capturer: &mut dyn ScreenCapturer,
        overlay_width: f32,
        overlay_height: f32,
    ) -> Result<Self, CaptureError> {
        let screen = capturer.capture_screen().ok_or(CaptureError::NoImage)?;
        if screen.width() == 0 || screen.height() == 0 {
            return Err(CaptureError::NoImage);
        }
        log::debug!("screen captured: {}x{}", screen.width(), screen.height());
        Ok(Self::new(screen, overlay_width, overlay_height))
    }

    pub fn screen(&self) -> &RgbaImage {
        &self.screen
    }

    pub fn is_selecting(&self) -> bool {
        self.drag.is_some()
    }

    pub fn press(&mut self, point: Point) {
        self.drag = Some((point, point));
    }

    pub fn drag_to(&mut self, point: Point) {
        if let Some((_, current)) = self.drag.as_mut() {
            *current = point;
        }
    }

    /// Drop the in-progress selection
    pub fn cancel(&mut self) {
        self.drag = None;
    }

    /// Current selection in logical units
    pub fn selection(&self) -> Option<Rect> {
        self.drag.map(|(start, current)| Rect::from_points(start, current))
    }

    /// Physical pixels per logical unit, per axis
    fn scale(&self) -> (f32, f32) {
        if self.overlay_width <= 0.0 || self.overlay_height <= 0.0 {
            return (1.0, 1.0);
        }
        (
            self.screen.width() as f32 / self.overlay_width,
            self.screen.height() as f32 / self.overlay_height,
        )
    }

    /// Physical size shown next to the selection while dragging
    pub fn pixel_size(&self) -> Option<(u32, u32)> {
        let rect = self.selection()?;
        let (sx, sy) = self.scale();
        Some((
            (rect.width * sx).round() as u32,
            (rect.height * sy).round() as u32,
        ))
    }

    /// Scale a logical rectangle to physical pixels and clamp it to the screen.
    ///
    /// Returns `None` when either clamped dimension is not larger than the
    /// minimum selection.
    pub fn physical_rect(&self, rect: &Rect) -> Option<PixelRect> {
        let (sx, sy) = self.scale();
        let (sw, sh) = (self.screen.width() as i32, self.screen.height() as i32);
        if sw <= 0 || sh <= 0 {
            return None;
        }

        let x = ((rect.x * sx).round() as i32).clamp(0, sw - 1);
        let y = ((rect.y * sy).round() as i32).clamp(0, sh - 1);
        let width = ((rect.width * sx).round() as i32).min(sw - x);
        let height = ((rect.height * sy).round() as i32).min(sh - y);

        if width as f32 <= MIN_SELECTION || height as f32 <= MIN_SELECTION {
            return None;
        }
        Some(PixelRect::from_xywh(x, y, width, height))
    }

    /// Finish the drag, producing the editor's initial state
    pub fn release(&mut self) -> Result<CaptureHandoff, CaptureError> {
        let region = self.selection().ok_or(CaptureError::Cancelled)?;
        self.drag = None;

        if region.width <= MIN_SELECTION || region.height <= MIN_SELECTION {
            log::debug!("selection too small: {}x{}", region.width, region.height);
            return Err(CaptureError::Cancelled);
        }
        let crop = self.physical_rect(&region).ok_or(CaptureError::Cancelled)?;
        let dim = crop.dimensions().ok_or(CaptureError::Cancelled)?;

        let image = imageops::crop_imm(
            &self.screen,
            crop.left as u32,
            crop.top as u32,
            dim.width(),
            dim.height(),
        )
        .to_image();
        log::debug!(
            "region captured: {}x{} at ({}, {})",
            image.width(),
            image.height(),
            crop.left,
            crop.top
        );
        Ok(CaptureHandoff { image, region })
    }
}
