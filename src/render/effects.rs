//! Pixel-sampling effects: mosaic, blur and magnifier
//!
//! Every effect reads from the current base bitmap on each call and writes
//! into a separate render target. Nothing is cached between redraws.

use image::{Pixel, Rgba, RgbaImage, imageops};

use crate::domain::{MagnifierAnnotation, Rect};

/// Returned when a sample window cannot be taken from the source
pub const FALLBACK_GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

/// Clamp a sample window into `img`.
///
/// The origin is clamped onto the image and the size to at least one pixel,
/// so any window on a non-empty image yields a valid region.
pub fn clamp_window(img: &RgbaImage, x: i32, y: i32, w: i32, h: i32) -> Option<(u32, u32, u32, u32)> {
    let (iw, ih) = (img.width() as i32, img.height() as i32);
    if iw <= 0 || ih <= 0 {
        return None;
    }
    let x = x.clamp(0, iw - 1);
    let y = y.clamp(0, ih - 1);
    let w = w.clamp(1, iw - x);
    let h = h.clamp(1, ih - y);
    Some((x as u32, y as u32, w as u32, h as u32))
}

/// Mean RGB of the window, alpha ignored; the result is opaque
pub fn average_color(source: &RgbaImage, x: i32, y: i32, w: i32, h: i32) -> Rgba<u8> {
    let Some((x, y, w, h)) = clamp_window(source, x, y, w, h) else {
        return FALLBACK_GRAY;
    };

    let mut total_r: u64 = 0;
    let mut total_g: u64 = 0;
    let mut total_b: u64 = 0;
    for py in y..y + h {
        for px in x..x + w {
            let pixel = source.get_pixel(px, py);
            total_r += pixel[0] as u64;
            total_g += pixel[1] as u64;
            total_b += pixel[2] as u64;
        }
    }
    let count = (w as u64) * (h as u64);
    Rgba([
        (total_r / count) as u8,
        (total_g / count) as u8,
        (total_b / count) as u8,
        255,
    ])
}

/// Fill a pixel span with an opaque color, clipped to the target
fn fill_span(target: &mut RgbaImage, left: i32, top: i32, right: i32, bottom: i32, color: Rgba<u8>) {
    let left = left.max(0) as u32;
    let top = top.max(0) as u32;
    let right = right.clamp(0, target.width() as i32) as u32;
    let bottom = bottom.clamp(0, target.height() as i32) as u32;
    for py in top..bottom {
        for px in left..right {
            target.put_pixel(px, py, color);
        }
    }
}

/// Pixelate `bounds` of the source into the target.
///
/// Cells of `block_size` start at the bounds origin; the last row and column
/// are clipped at the bounds edge. Each cell is the mean of the pixels it covers.
pub fn mosaic(target: &mut RgbaImage, source: &RgbaImage, bounds: &Rect, block_size: u32) {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return;
    }
    let block = block_size.max(1) as f32;

    let mut y = 0.0;
    while y < bounds.height {
        let mut x = 0.0;
        while x < bounds.width {
            let cell_w = block.min((bounds.width - x).trunc());
            let cell_h = block.min((bounds.height - y).trunc());
            let color = average_color(
                source,
                (bounds.x + x) as i32,
                (bounds.y + y) as i32,
                cell_w as i32,
                cell_h as i32,
            );

            let left = (bounds.x + x) as i32;
            let top = (bounds.y + y) as i32;
            let right = (bounds.x + (x + block).min(bounds.width)).ceil() as i32;
            let bottom = (bounds.y + (y + block).min(bounds.height)).ceil() as i32;
            fill_span(target, left, top, right, bottom, color);

            x += block;
        }
        y += block;
    }
}

/// Gaussian sigma for a blur radius; the kernel reaches about three sigma
pub fn blur_sigma(radius: f32) -> f32 {
    (radius / 3.0).max(0.5)
}

/// Blur the source pixels under `bounds` and place them at the bounds origin
pub fn blur(target: &mut RgbaImage, source: &RgbaImage, bounds: &Rect, radius: f32) {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return;
    }
    let Some((x, y, w, h)) = clamp_window(
        source,
        bounds.x as i32,
        bounds.y as i32,
        bounds.width as i32,
        bounds.height as i32,
    ) else {
        return;
    };

    let region = imageops::crop_imm(source, x, y, w, h).to_image();
    let blurred = imageops::blur(&region, blur_sigma(radius));
    imageops::replace(target, &blurred, bounds.x as i64, bounds.y as i64);
}

/// Circular zoomed copy of the magnifier's source region at its display bounds.
///
/// The source square is clamped to the image, stretched to the display square
/// and clipped to the inscribed circle. The border ring is drawn separately.
pub fn magnify(target: &mut RgbaImage, source: &RgbaImage, magnifier: &MagnifierAnnotation, display: &Rect) {
    let size = display.width.round() as i32;
    if size <= 0 {
        return;
    }
    let side = (magnifier.source_radius * 2.0) as i32;
    let Some((x, y, w, h)) = clamp_window(
        source,
        (magnifier.source_center.x - magnifier.source_radius) as i32,
        (magnifier.source_center.y - magnifier.source_radius) as i32,
        side,
        side,
    ) else {
        return;
    };

    let region = imageops::crop_imm(source, x, y, w, h).to_image();
    let zoomed = imageops::resize(
        &region,
        size as u32,
        size as u32,
        imageops::FilterType::Triangle,
    );

    let radius = size as f32 / 2.0;
    let origin_x = display.x.round() as i32;
    let origin_y = display.y.round() as i32;
    for (px, py, pixel) in zoomed.enumerate_pixels() {
        let dx = px as f32 + 0.5 - radius;
        let dy = py as f32 + 0.5 - radius;
        if dx * dx + dy * dy > radius * radius {
            continue;
        }
        let tx = origin_x + px as i32;
        let ty = origin_y + py as i32;
        if tx < 0 || ty < 0 || tx >= target.width() as i32 || ty >= target.height() as i32 {
            continue;
        }
        target.get_pixel_mut(tx as u32, ty as u32).blend(pixel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;

    fn split_image() -> RgbaImage {
        // Left half black, right half white
        RgbaImage::from_fn(20, 10, |x, _| {
            if x < 10 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn test_average_color_ignores_alpha() {
        let img = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([100, 0, 50, 0])
            } else {
                Rgba([200, 100, 50, 10])
            }
        });
        assert_eq!(average_color(&img, 0, 0, 2, 1), Rgba([150, 50, 50, 255]));
    }

    #[test]
    fn test_average_color_clamps_window() {
        let img = split_image();
        // Window starting left of the image is pulled onto it
        assert_eq!(average_color(&img, -10, -10, 5, 5), Rgba([0, 0, 0, 255]));
        // Window past the right edge shrinks to the last column
        assert_eq!(average_color(&img, 50, 0, 10, 10), Rgba([255, 255, 255, 255]));
        assert_eq!(average_color(&RgbaImage::new(0, 0), 0, 0, 1, 1), FALLBACK_GRAY);
    }

    #[test]
    fn test_mosaic_cells_average_source() {
        let source = split_image();
        let mut target = source.clone();
        mosaic(&mut target, &source, &Rect::new(5.0, 0.0, 10.0, 10.0), 10);

        // One cell spanning five black and five white columns
        let expected = Rgba([127, 127, 127, 255]);
        assert_eq!(*target.get_pixel(5, 0), expected);
        assert_eq!(*target.get_pixel(14, 9), expected);
        // Outside bounds untouched
        assert_eq!(*target.get_pixel(4, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*target.get_pixel(15, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_mosaic_clips_last_cell_at_bounds() {
        let source = split_image();
        let mut target = source.clone();
        mosaic(&mut target, &source, &Rect::new(0.0, 0.0, 12.0, 10.0), 10);

        assert_eq!(*target.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        // Second cell covers columns 10..12 only
        assert_eq!(*target.get_pixel(11, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*target.get_pixel(12, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_mosaic_resamples_current_source() {
        let mut source = split_image();
        let mut first = source.clone();
        mosaic(&mut first, &source, &Rect::new(0.0, 0.0, 4.0, 4.0), 4);
        assert_eq!(*first.get_pixel(0, 0), Rgba([0, 0, 0, 255]));

        for px in 0..4 {
            for py in 0..4 {
                source.put_pixel(px, py, Rgba([40, 40, 40, 255]));
            }
        }
        let mut second = source.clone();
        mosaic(&mut second, &source, &Rect::new(0.0, 0.0, 4.0, 4.0), 4);
        assert_eq!(*second.get_pixel(0, 0), Rgba([40, 40, 40, 255]));
    }

    #[test]
    fn test_blur_mixes_across_edge() {
        let source = split_image();
        let mut target = source.clone();
        blur(&mut target, &source, &Rect::new(0.0, 0.0, 20.0, 10.0), 9.0);

        let edge = target.get_pixel(9, 5);
        assert!(edge[0] > 0 && edge[0] < 255);
    }

    #[test]
    fn test_magnify_clips_to_circle() {
        let source = RgbaImage::from_pixel(40, 40, Rgba([255, 0, 0, 255]));
        let mut target = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 255, 255]));
        let magnifier = MagnifierAnnotation {
            source_center: Point::new(10.0, 10.0),
            source_radius: 5.0,
            display_position: Point::new(20.0, 20.0),
            zoom: 2.0,
        };
        let display = Rect::new(10.0, 10.0, 20.0, 20.0);
        magnify(&mut target, &source, &magnifier, &display);

        assert_eq!(*target.get_pixel(20, 20), Rgba([255, 0, 0, 255]));
        // Corner of the display square lies outside the circle
        assert_eq!(*target.get_pixel(10, 10), Rgba([0, 0, 255, 255]));
    }
}
