//! Screen capture handoff
//!
//! This module contains:
//! - The session's backing bitmap (image.rs)
//! - Region selection over a pre-captured screen (region.rs)
//! - The collaborator trait that grabs the screen

pub mod image;
pub mod region;

use ::image::RgbaImage;
use thiserror::Error;

use crate::domain::Rect;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("screen capture returned no image")]
    NoImage,
    #[error("capture cancelled")]
    Cancelled,
}

/// Grabs the whole virtual screen before any selection UI is shown
pub trait ScreenCapturer {
    fn capture_screen(&mut self) -> Option<RgbaImage>;
}

/// Initial state for an editing session
#[derive(Clone, Debug)]
pub struct CaptureHandoff {
    /// Physical-pixel crop of the pre-captured screen
    pub image: RgbaImage,
    /// Selected region in logical overlay coordinates
    pub region: Rect,
}
