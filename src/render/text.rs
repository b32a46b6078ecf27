//! Text rasterization for Text annotations and Step labels
//!
//! Fonts are resolved from the system with font-kit and rasterized with
//! ab_glyph. Missing fonts degrade to skipping the label, never to an error.

use std::collections::HashMap;

use ab_glyph::{Font, FontArc, GlyphId, ScaleFont, point};
use image::{Pixel, Rgba, RgbaImage};

use crate::config::ShapeColor;
use crate::domain::{FontWeight, Point};

/// Load a font by family name and CSS weight from the system
pub fn load_system_font(family: &str, weight: u16) -> Option<FontArc> {
    use font_kit::family_name::FamilyName;
    use font_kit::properties::{Properties, Weight};
    use font_kit::source::SystemSource;

    let mut props = Properties::new();
    props.weight = Weight(weight as f32);

    let source = SystemSource::new();
    let handle = source
        .select_best_match(
            &[FamilyName::Title(family.to_string()), FamilyName::SansSerif],
            &props,
        )
        .ok()?;

    let font_data = handle.load().ok()?;
    let bytes: Vec<u8> = (*font_data.copy_font_data()?).clone();
    FontArc::try_from_vec(bytes).ok()
}

/// Fonts resolved so far, keyed by family and weight.
///
/// Lookups that fail are remembered too so a missing family is only
/// reported once.
#[derive(Default)]
pub struct FontCache {
    fonts: HashMap<(String, u16), Option<FontArc>>,
}

impl std::fmt::Debug for FontCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCache")
            .field("loaded", &self.fonts.len())
            .finish()
    }
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, family: &str, weight: FontWeight) -> Option<FontArc> {
        let key = (family.to_string(), weight.value());
        self.fonts
            .entry(key)
            .or_insert_with(|| {
                let font = load_system_font(family, weight.value());
                if font.is_none() {
                    log::warn!("No usable system font for '{}' ({})", family, weight.value());
                }
                font
            })
            .clone()
    }
}

/// Glyph ids with their x offsets along one line
fn layout(font: &FontArc, text: &str, size: f32) -> (Vec<(GlyphId, f32)>, f32) {
    let scaled = font.as_scaled(size);
    let mut glyphs = Vec::with_capacity(text.len());
    let mut cursor_x = 0.0f32;
    let mut last: Option<GlyphId> = None;

    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = last {
            cursor_x += scaled.kern(prev, id);
        }
        glyphs.push((id, cursor_x));
        cursor_x += scaled.h_advance(id);
        last = Some(id);
    }
    (glyphs, cursor_x)
}

/// Width and height of a single line of text
pub fn measure(font: &FontArc, text: &str, size: f32) -> (f32, f32) {
    let scaled = font.as_scaled(size);
    let (_, width) = layout(font, text, size);
    (width, scaled.ascent() - scaled.descent())
}

/// Draw one line of text with its top-left corner at `origin`
pub fn draw_text(
    target: &mut RgbaImage,
    font: &FontArc,
    text: &str,
    origin: Point,
    size: f32,
    color: ShapeColor,
) {
    if text.is_empty() || size <= 0.0 {
        return;
    }
    let [r, g, b, a] = color.to_rgba_u8();
    let baseline = origin.y + font.as_scaled(size).ascent();
    let (glyphs, _) = layout(font, text, size);
    let (w, h) = (target.width() as i32, target.height() as i32);

    for (id, x) in glyphs {
        let glyph = id.with_scale_and_position(size, point(origin.x + x, baseline));
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i32 + gx as i32;
            let py = bounds.min.y as i32 + gy as i32;
            if px < 0 || py < 0 || px >= w || py >= h {
                return;
            }
            let alpha = (coverage.clamp(0.0, 1.0) * a as f32).round() as u8;
            if alpha == 0 {
                return;
            }
            target
                .get_pixel_mut(px as u32, py as u32)
                .blend(&Rgba([r, g, b, alpha]));
        });
    }
}

/// Draw text centered on `center`
pub fn draw_text_centered(
    target: &mut RgbaImage,
    font: &FontArc,
    text: &str,
    center: Point,
    size: f32,
    color: ShapeColor,
) {
    let (width, height) = measure(font, text, size);
    let origin = Point::new(center.x - width / 2.0, center.y - height / 2.0);
    draw_text(target, font, text, origin, size, color);
}
