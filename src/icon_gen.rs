use crate::glyph::{FontSource, GlyphRenderer};
use crate::raster::{add_shine, gradient_circle};
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, Rgb, RgbaImage,
};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

/// Rim color of the disc (#667eea).
pub const START_COLOR: &str = "#667eea";

/// Center color of the disc (#764ba2).
pub const END_COLOR: &str = "#764ba2";

pub const ICON_SIZES: [u32; 4] = [16, 32, 48, 128];

pub const OUTPUT_DIR: &str = "icons";

pub const GLYPH: &str = "7";

/// Everything needed to produce one set of icons.
#[derive(Debug, Clone)]
pub struct IconSet {
    pub sizes: Vec<u32>,
    pub output: PathBuf,
    pub start: Rgb<u8>,
    pub end: Rgb<u8>,
    pub glyph: String,
    pub fonts: Vec<FontSource>,
}

impl IconSet {
    /// The lotto analyzer set: four sizes, purple stops, the numeral 7.
    pub fn lotto() -> Result<Self> {
        Ok(Self {
            sizes: ICON_SIZES.to_vec(),
            output: PathBuf::from(OUTPUT_DIR),
            start: parse_color_stop(START_COLOR)?,
            end: parse_color_stop(END_COLOR)?,
            glyph: GLYPH.to_string(),
            fonts: FontSource::defaults(),
        })
    }

    pub fn icon_path(&self, size: u32) -> PathBuf {
        self.output.join(icon_filename(size))
    }
}

pub fn icon_filename(size: u32) -> String {
    format!("icon{size}.png")
}

/// Parses a CSS color into an opaque gradient stop.
pub fn parse_color_stop(color: &str) -> Result<Rgb<u8>> {
    let color = css_color::Srgb::from_str(color)
        .map_err(|_| anyhow::anyhow!("Invalid color stop: {color}"))?;

    let channel = |value: f32| (value * 255.).round().clamp(0., 255.) as u8;
    Ok(Rgb([
        channel(color.red),
        channel(color.green),
        channel(color.blue),
    ]))
}

/// Renders one icon: gradient disc, highlight, then the shadowed glyph.
pub fn create_icon(size: u32, set: &IconSet, renderer: &GlyphRenderer) -> Result<RgbaImage> {
    let _span = tracing::debug_span!("icon", size).entered();

    let mut canvas = gradient_circle(size, set.start, set.end)?;
    add_shine(&mut canvas);
    renderer.render(&mut canvas, &set.glyph);

    Ok(canvas)
}

/// Generates every icon of the set, stopping at the first failure.
pub fn generate_icons(set: &IconSet) -> Result<Vec<PathBuf>> {
    println!("Generating lotto analyzer icons...");

    let renderer = GlyphRenderer::resolve(&set.fonts);
    tracing::debug!(font = %renderer.source(), "using font");

    create_dir_all(&set.output).context("Can't create output directory")?;

    let mut written = Vec::with_capacity(set.sizes.len());
    for &size in &set.sizes {
        let output_path = set.icon_path(size);
        println!("Generating {}...", output_path.display());

        let icon = create_icon(size, set, &renderer)
            .with_context(|| format!("Failed to render {size}x{size} icon"))?;
        save_png(&icon, &output_path)?;

        println!("  ✓ Generated {}", output_path.display());
        written.push(output_path);
    }

    println!("\nAll icons generated successfully!");
    Ok(written)
}

pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file: {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    write_png(image, &mut out_file).context("Failed to write PNG")?;
    out_file.flush()?;
    Ok(())
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image: &RgbaImage, w: W) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)?;
    Ok(())
}
