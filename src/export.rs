//! Saving and copying the flattened image

use std::borrow::Cow;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use thiserror::Error;

use crate::config::SaveLocation;

pub const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("png encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// `.jpg`/`.jpeg` in any case selects JPEG; everything else is PNG
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
                ImageFormat::Jpeg
            }
            _ => ImageFormat::Png,
        }
    }
}

/// `capture_YYYYMMDD_HHmmss`, without extension
pub fn default_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("capture_%Y%m%d_%H%M%S").to_string()
}

pub fn location_dir(location: SaveLocation) -> Option<PathBuf> {
    match location {
        SaveLocation::Pictures => {
            dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
        }
        SaveLocation::Documents => {
            dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
        }
    }
}

/// Default PNG path in the configured directory
pub fn default_save_path<Tz: TimeZone>(location: SaveLocation, now: &DateTime<Tz>) -> Option<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    let mut path = location_dir(location)?;
    path.push(format!("{}.png", default_file_name(now)));
    Some(path)
}

/// Write `image` to `path`, choosing the encoder by extension
pub fn save(image: &RgbaImage, path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    match ImageFormat::from_path(path) {
        ImageFormat::Png => write_png(&mut writer, image)?,
        ImageFormat::Jpeg => write_jpeg(&mut writer, image)?,
    }
    log::debug!("saved {}x{} to {}", image.width(), image.height(), path.display());
    Ok(())
}

pub fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

/// JPEG has no alpha channel; it is dropped
pub fn write_jpeg<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), image::ImageError> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut encoder = JpegEncoder::new_with_quality(w, JPEG_QUALITY);
    encoder.encode_image(&rgb)
}

/// Destination for copied images
pub trait ClipboardSink {
    fn set_image(&mut self, image: &RgbaImage) -> Result<(), ExportError>;
}

/// The desktop clipboard
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard").finish_non_exhaustive()
    }
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ExportError> {
        let inner = arboard::Clipboard::new().map_err(|e| ExportError::Clipboard(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_image(&mut self, image: &RgbaImage) -> Result<(), ExportError> {
        // arboard takes straight RGBA rows
        let data = arboard::ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Borrowed(image.as_raw()),
        };
        self.inner
            .set_image(data)
            .map_err(|e| ExportError::Clipboard(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use image::Rgba;

    use super::*;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(6, 4, |x, y| Rgba([x as u8 * 40, y as u8 * 60, 128, 255]))
    }

    #[test]
    fn test_default_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(default_file_name(&now), "capture_20240309_140507");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_path(Path::new("a.JPG")), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path(Path::new("a.jpeg")), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path(Path::new("a.png")), ImageFormat::Png);
        assert_eq!(ImageFormat::from_path(Path::new("noext")), ImageFormat::Png);
    }

    #[test]
    fn test_save_png_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        save(&sample(), &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_save_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.Jpeg");
        save(&sample(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let loaded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (6, 4));
    }

    #[test]
    fn test_save_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert!(matches!(save(&sample(), &path), Err(ExportError::Io(_))));
    }
}
