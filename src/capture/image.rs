//! Backing bitmap of an editing session

use image::RgbaImage;

/// The canvas bitmap, with a counter bumped on every replacement.
///
/// Effects always re-sample the current bitmap; the version identifies which
/// bitmap a rendered frame was produced from.
#[derive(Clone, Debug)]
pub struct CanvasImage {
    rgba: RgbaImage,
    version: u64,
}

impl CanvasImage {
    pub fn new(rgba: RgbaImage) -> Self {
        log::debug!("CanvasImage created: {}x{} pixels", rgba.width(), rgba.height());
        Self { rgba, version: 0 }
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Swap in a new bitmap after a crop, rotate or resize
    pub fn replace(&mut self, rgba: RgbaImage) {
        self.rgba = rgba;
        self.version += 1;
    }
}
