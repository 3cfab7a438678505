use anyhow::{Context, Result};
use image::Pixel;
use lotto_icon_gen::{
    icon_gen::IconSet,
    raster::{covers, mix, Disc, Shine},
};

fn brightness(pixel: &image::Rgba<u8>) -> u32 {
    let alpha = u32::from(pixel[3]);
    (u32::from(pixel[0]) + u32::from(pixel[1]) + u32::from(pixel[2])) * alpha / 255
}

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "icons/icon128.png".to_string());

    let rgba_img = image::open(&path)
        .with_context(|| format!("Failed to open icon: {path}"))?
        .to_rgba8();
    let (width, height) = rgba_img.dimensions();

    println!("Checking icon: {}", path);
    println!("Image dimensions: {}x{}", width, height);
    if width != height {
        anyhow::bail!("Icon is not square: {width}x{height}");
    }

    let disc = Disc::for_size(width);
    let center = rgba_img.get_pixel(width / 2, height / 2);
    println!("\nCenter pixel (x={}, y={}):", width / 2, height / 2);
    println!("  RGBA: [{}, {}, {}, {}]", center[0], center[1], center[2], center[3]);

    // Area of the opaque region gives the disc radius back.
    let covered = rgba_img.pixels().filter(|p| p[3] > 0).count();
    let radius = (covered as f64 / std::f64::consts::PI).sqrt();
    println!("\nDisc analysis:");
    println!("  {} covered pixels, estimated radius {:.1}px", covered, radius);
    println!("  expected radius {}px", disc.radius);

    // The highlight must lift the spot above the bare gradient color there.
    let shine = Shine::for_size(width);
    let set = IconSet::lotto()?;
    let offset = disc.center - shine.center;
    let ring = (0..=disc.radius)
        .find(|&r| covers(offset, offset, r))
        .unwrap_or(disc.radius);
    let ratio = 1.0 - ring as f32 / disc.radius.max(1) as f32;
    let bare = mix(set.start, set.end, ratio).to_rgba();
    let spot = rgba_img.get_pixel(shine.center as u32, shine.center as u32);

    println!("\nHighlight analysis:");
    println!(
        "  spot (x={0}, y={0}) brightness {1}, bare gradient brightness {2}",
        shine.center,
        brightness(spot),
        brightness(&bare)
    );

    if brightness(spot) > brightness(&bare) {
        println!("✓ Highlight detected!");
    } else {
        println!("⚠ Highlight may not be properly applied");
    }

    Ok(())
}
