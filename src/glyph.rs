//! Drop-shadowed numeral rendering.
//!
//! A [`Face`] turns a string into a [`GlyphMask`], a trimmed coverage bitmap
//! with the ink offset relative to the text origin. Measuring and drawing both
//! work on the mask, so the glyph is stamped exactly where it was measured.

use anyhow::{Context, Result};
use image::{Pixel, Rgba, RgbaImage};
use rusttype::{point, Font, Rect, Scale};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Fraction of the canvas size used as the font pixel size.
pub const FONT_SIZE_FACTOR: f32 = 0.55;

/// The shadow is shifted by `size / SHADOW_DIVISOR` pixels, at least one.
pub const SHADOW_DIVISOR: u32 = 40;

pub const SHADOW_COLOR: Rgba<u8> = Rgba([0, 0, 0, 100]);
pub const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// System fonts tried before the built-in face.
pub const DEFAULT_FONT_PATHS: [&str; 2] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
];

/// One step of the font fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    File(PathBuf),
    Builtin,
}

impl FontSource {
    pub fn defaults() -> Vec<FontSource> {
        DEFAULT_FONT_PATHS
            .iter()
            .map(|path| FontSource::File(PathBuf::from(path)))
            .chain(std::iter::once(FontSource::Builtin))
            .collect()
    }
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::File(path) => write!(f, "{}", path.display()),
            FontSource::Builtin => f.write_str("built-in"),
        }
    }
}

/// Coverage bitmap of a rendered string, trimmed to its ink.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    /// Ink offset from the text origin.
    pub left: i64,
    pub top: i64,
    pub width: u32,
    pub height: u32,
    coverage: Vec<f32>,
}

impl GlyphMask {
    pub fn empty() -> Self {
        Self {
            left: 0,
            top: 0,
            width: 0,
            height: 0,
            coverage: Vec::new(),
        }
    }

    /// Builds a mask from a `width`×`height` coverage buffer whose top-left
    /// corner sits at `(left, top)`, dropping blank borders.
    fn trimmed(left: i64, top: i64, width: u32, height: u32, coverage: Vec<f32>) -> Self {
        let inked = |x: u32, y: u32| coverage[(y * width + x) as usize] > 0.0;

        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..height {
            for x in 0..width {
                if inked(x, y) {
                    bounds = Some(match bounds {
                        None => (x, y, x, y),
                        Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                    });
                }
            }
        }

        let Some((x0, y0, x1, y1)) = bounds else {
            return Self::empty();
        };

        let (trim_width, trim_height) = (x1 - x0 + 1, y1 - y0 + 1);
        let mut trimmed = Vec::with_capacity((trim_width * trim_height) as usize);
        for y in y0..=y1 {
            let row = (y * width) as usize;
            trimmed.extend_from_slice(&coverage[row + x0 as usize..=row + x1 as usize]);
        }

        Self {
            left: left + i64::from(x0),
            top: top + i64::from(y0),
            width: trim_width,
            height: trim_height,
            coverage: trimmed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn coverage_at(&self, x: u32, y: u32) -> f32 {
        self.coverage[(y * self.width + x) as usize]
    }

    /// Blends `color` through the mask with the text origin placed at `(x, y)`.
    pub fn stamp(&self, canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
        let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));

        for my in 0..self.height {
            let py = y + self.top + i64::from(my);
            if py < 0 || py >= height {
                continue;
            }
            for mx in 0..self.width {
                let px = x + self.left + i64::from(mx);
                if px < 0 || px >= width {
                    continue;
                }

                let alpha = (f32::from(color[3]) * self.coverage_at(mx, my)).round() as u8;
                if alpha == 0 {
                    continue;
                }
                let ink = Rgba([color[0], color[1], color[2], alpha]);
                canvas.get_pixel_mut(px as u32, py as u32).blend(&ink);
            }
        }
    }
}

/// A font able to rasterize text into a [`GlyphMask`].
pub enum Face {
    TrueType(Font<'static>),
    Builtin,
}

impl fmt::Debug for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Face::TrueType(_) => f.write_str("Face::TrueType"),
            Face::Builtin => f.write_str("Face::Builtin"),
        }
    }
}

impl Face {
    pub fn load(source: &FontSource) -> Result<Face> {
        match source {
            FontSource::File(path) => load_font_file(path).map(Face::TrueType),
            FontSource::Builtin => Ok(Face::Builtin),
        }
    }

    /// Rasterizes `text` at `px` pixels with the origin at the top of the
    /// ascent.
    pub fn rasterize(&self, text: &str, px: f32) -> GlyphMask {
        match self {
            Face::TrueType(font) => rasterize_truetype(font, text, px),
            Face::Builtin => rasterize_builtin(text, px),
        }
    }
}

fn load_font_file(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read font file: {}", path.display()))?;
    Font::try_from_vec(data)
        .with_context(|| format!("Failed to parse font file: {}", path.display()))
}

/// rusttype scales by the ascent-to-descent height; convert an em size in
/// pixels to that convention.
pub fn em_scale(font: &Font<'_>, px: f32) -> Scale {
    let v_metrics = font.v_metrics_unscaled();
    let height = v_metrics.ascent - v_metrics.descent;
    Scale::uniform(px * height / f32::from(font.units_per_em()))
}

fn rasterize_truetype(font: &Font<'static>, text: &str, px: f32) -> GlyphMask {
    let scale = em_scale(font, px);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<_> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let bounds = glyphs
        .iter()
        .filter_map(|glyph| glyph.pixel_bounding_box())
        .reduce(|a, b| Rect {
            min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
            max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
        });
    let Some(bounds) = bounds else {
        return GlyphMask::empty();
    };

    let width = (bounds.max.x - bounds.min.x) as u32;
    let height = (bounds.max.y - bounds.min.y) as u32;
    let mut coverage = vec![0.0f32; (width * height) as usize];

    for glyph in &glyphs {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        let (dx, dy) = ((bb.min.x - bounds.min.x) as u32, (bb.min.y - bounds.min.y) as u32);
        glyph.draw(|x, y, v| {
            let slot = &mut coverage[((y + dy) * width + x + dx) as usize];
            *slot = (*slot + v).min(1.0);
        });
    }

    GlyphMask::trimmed(
        i64::from(bounds.min.x),
        i64::from(bounds.min.y),
        width,
        height,
        coverage,
    )
}

const BUILTIN_COLUMNS: u32 = 5;
const BUILTIN_ROWS: u32 = 7;
const BUILTIN_ADVANCE: u32 = BUILTIN_COLUMNS + 1;

/// 5×7 dot-matrix digits, one byte per row, most significant of the five bits
/// on the left.
const BUILTIN_DIGITS: [[u8; BUILTIN_ROWS as usize]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
];

/// Dot size of the built-in face for a font of `px` pixels.
pub fn builtin_dot_size(px: f32) -> u32 {
    (px as u32 / 8).max(1)
}

fn rasterize_builtin(text: &str, px: f32) -> GlyphMask {
    let dot = builtin_dot_size(px);
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return GlyphMask::empty();
    }

    let width = chars * BUILTIN_ADVANCE * dot;
    let height = BUILTIN_ROWS * dot;
    let mut coverage = vec![0.0f32; (width * height) as usize];

    for (index, ch) in text.chars().enumerate() {
        // Characters outside the table advance the pen without ink.
        let Some(rows) = ch
            .to_digit(10)
            .map(|digit| &BUILTIN_DIGITS[digit as usize])
        else {
            continue;
        };
        let pen = index as u32 * BUILTIN_ADVANCE * dot;

        for (row, bits) in rows.iter().enumerate() {
            for column in 0..BUILTIN_COLUMNS {
                if bits & (1 << (BUILTIN_COLUMNS - 1 - column)) == 0 {
                    continue;
                }
                let (x0, y0) = (pen + column * dot, row as u32 * dot);
                for y in y0..y0 + dot {
                    for x in x0..x0 + dot {
                        coverage[(y * width + x) as usize] = 1.0;
                    }
                }
            }
        }
    }

    GlyphMask::trimmed(0, 0, width, height, coverage)
}

/// Draws a shadowed numeral centered on the canvas with a resolved face.
#[derive(Debug)]
pub struct GlyphRenderer {
    face: Face,
    source: FontSource,
}

impl GlyphRenderer {
    pub fn new(face: Face, source: FontSource) -> Self {
        Self { face, source }
    }

    pub fn builtin() -> Self {
        Self::new(Face::Builtin, FontSource::Builtin)
    }

    /// Tries each source in order and keeps the first face that loads.
    /// Falls back to the built-in face when none does.
    pub fn resolve(sources: &[FontSource]) -> Self {
        for source in sources {
            match Face::load(source) {
                Ok(face) => {
                    tracing::debug!(font = %source, "resolved font");
                    return Self::new(face, source.clone());
                }
                Err(err) => tracing::warn!(font = %source, "skipping font: {err:#}"),
            }
        }

        tracing::warn!("no font candidate loaded, using the built-in face");
        Self::builtin()
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    pub fn face(&self) -> &Face {
        &self.face
    }

    /// Ink mask of `text` at the font size used for a canvas of `size` pixels.
    pub fn measure(&self, text: &str, size: u32) -> GlyphMask {
        let px = (size as f32 * FONT_SIZE_FACTOR).floor();
        self.face.rasterize(text, px)
    }

    /// Renders `text` centered on the canvas with a translucent drop shadow.
    pub fn render(&self, canvas: &mut RgbaImage, text: &str) {
        let size = canvas.width();
        let mask = self.measure(text, size);
        if mask.is_empty() {
            return;
        }

        let size = i64::from(size);
        let x = (size - i64::from(mask.width)).div_euclid(2) - mask.left;
        let y = (size - i64::from(mask.height)).div_euclid(2) - mask.top;
        let shadow_offset = i64::from((canvas.width() / SHADOW_DIVISOR).max(1));

        tracing::debug!(
            text,
            x,
            y,
            width = mask.width,
            height = mask.height,
            "placing glyph"
        );

        mask.stamp(canvas, x + shadow_offset, y + shadow_offset, SHADOW_COLOR);
        mask.stamp(canvas, x, y, TEXT_COLOR);
    }
}
