//! Pixel-loop rasterization of the icon disc and its highlight.
//!
//! Both passes work the same way: concentric filled circles are drawn from the
//! largest radius down to the smallest, so the color a pixel ends up with is
//! the one computed for the smallest circle that still covers it.

use anyhow::Result;
use image::{Rgb, Rgba, RgbaImage};

/// Fraction of the canvas size used as the disc radius.
pub const DISC_RADIUS_FACTOR: f32 = 0.45;

/// Fraction of the canvas size the highlight center is shifted up and left.
pub const SHINE_OFFSET_FACTOR: f32 = 0.1;

/// Fraction of the canvas size used as the highlight radius.
pub const SHINE_RADIUS_FACTOR: f32 = 0.15;

/// Peak opacity of the highlight, reached at its center.
pub const SHINE_MAX_OPACITY: f32 = 100.0;

/// Geometry of the gradient disc for a canvas of the given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disc {
    pub center: i64,
    pub radius: i64,
}

impl Disc {
    pub fn for_size(size: u32) -> Self {
        Self {
            center: i64::from(size / 2),
            radius: (size as f32 * DISC_RADIUS_FACTOR) as i64,
        }
    }
}

/// Geometry of the highlight for a canvas of the given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shine {
    pub center: i64,
    pub radius: i64,
}

impl Shine {
    pub fn for_size(size: u32) -> Self {
        let center = (size / 2) as f32;
        Self {
            center: (center - size as f32 * SHINE_OFFSET_FACTOR) as i64,
            radius: (size as f32 * SHINE_RADIUS_FACTOR) as i64,
        }
    }

    /// Highlight opacity for the circle of radius `r`.
    ///
    /// The result is already inside `0..=SHINE_MAX_OPACITY` for every radius
    /// the compositor draws; the clamp only guards the conversion to `u8`.
    pub fn opacity(&self, r: i64) -> u8 {
        let opacity = SHINE_MAX_OPACITY * (1.0 - r as f32 / self.radius as f32);
        opacity.clamp(0.0, 255.0) as u8
    }
}

/// Whether the pixel at offset `(dx, dy)` from the center lies in the circle
/// of radius `r`.
///
/// `r² + r` is the integer form of a distance below `r + ½`, so the circle
/// spans `2r + 1` pixels with flat runs at its top, bottom, and sides.
pub fn covers(dx: i64, dy: i64, r: i64) -> bool {
    dx * dx + dy * dy <= r * r + r
}

/// Fills the circle of radius `r` centered on `(cx, cy)`, overwriting pixels.
///
/// Radius 0 covers the center pixel alone. Parts outside the canvas are
/// clipped.
pub fn fill_circle(canvas: &mut RgbaImage, cx: i64, cy: i64, r: i64, color: Rgba<u8>) {
    let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let y_range = (cy - r).max(0)..=(cy + r).min(height - 1);
    let x_range = (cx - r).max(0)..=(cx + r).min(width - 1);

    for y in y_range {
        let dy = y - cy;
        for x in x_range.clone() {
            let dx = x - cx;
            if covers(dx, dy, r) {
                canvas.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Linear interpolation between two stops, truncating each channel.
pub fn mix(start: Rgb<u8>, end: Rgb<u8>, ratio: f32) -> Rgb<u8> {
    let channel = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * ratio) as u8;
    Rgb([
        channel(start[0], end[0]),
        channel(start[1], end[1]),
        channel(start[2], end[2]),
    ])
}

/// Creates a transparent `size`×`size` canvas holding an opaque radial
/// gradient disc going from `start` at the rim to `end` at the center.
pub fn gradient_circle(size: u32, start: Rgb<u8>, end: Rgb<u8>) -> Result<RgbaImage> {
    if size == 0 {
        anyhow::bail!("Icon size must be greater than zero");
    }

    let mut canvas = RgbaImage::new(size, size);
    let disc = Disc::for_size(size);
    if disc.radius == 0 {
        return Ok(canvas);
    }

    // Radius 0 closes the gradient on the exact end stop at the center pixel.
    for r in (0..=disc.radius).rev() {
        let ratio = 1.0 - r as f32 / disc.radius as f32;
        let Rgb([red, green, blue]) = mix(start, end, ratio);
        fill_circle(
            &mut canvas,
            disc.center,
            disc.center,
            r,
            Rgba([red, green, blue, 255]),
        );
    }

    Ok(canvas)
}

/// Composites a soft white highlight up and to the left of the disc center.
pub fn add_shine(canvas: &mut RgbaImage) {
    let size = canvas.width();
    let shine = Shine::for_size(size);
    if shine.radius == 0 {
        return;
    }

    let mut layer = RgbaImage::new(canvas.width(), canvas.height());
    for r in (1..=shine.radius).rev() {
        let color = Rgba([255, 255, 255, shine.opacity(r)]);
        fill_circle(&mut layer, shine.center, shine.center, r, color);
    }

    image::imageops::overlay(canvas, &layer, 0, 0);
}
