use image::{Rgb, Rgba, RgbaImage};
use lotto_icon_gen::glyph::{Face, FontSource, GlyphRenderer, DEFAULT_FONT_PATHS};
use lotto_icon_gen::raster::gradient_circle;
use std::path::PathBuf;
use tempfile::TempDir;

fn disc(size: u32) -> RgbaImage {
    gradient_circle(size, Rgb([102, 126, 234]), Rgb([118, 75, 162])).expect("Gradient should render")
}

#[test]
fn test_missing_fonts_fall_back_to_builtin() {
    let renderer = GlyphRenderer::resolve(&[
        FontSource::File(PathBuf::from("/nonexistent/fonts/Primary-Bold.ttf")),
        FontSource::File(PathBuf::from("/nonexistent/fonts/Secondary-Bold.ttf")),
    ]);

    assert_eq!(renderer.source(), &FontSource::Builtin);
    assert!(matches!(renderer.face(), Face::Builtin));
}

#[test]
fn test_invalid_font_file_is_skipped() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let bogus = temp_dir.path().join("Bogus.ttf");
    std::fs::write(&bogus, b"definitely not a font").expect("Failed to write bogus font");

    assert!(Face::load(&FontSource::File(bogus.clone())).is_err());

    let renderer = GlyphRenderer::resolve(&[FontSource::File(bogus), FontSource::Builtin]);
    assert_eq!(renderer.source(), &FontSource::Builtin);
}

#[test]
fn test_default_chain_ends_with_builtin() {
    let sources = FontSource::defaults();
    assert_eq!(sources.len(), DEFAULT_FONT_PATHS.len() + 1);
    assert_eq!(sources.last(), Some(&FontSource::Builtin));

    // Whatever the host has installed, resolution never fails.
    let renderer = GlyphRenderer::resolve(&sources);
    assert!(sources.contains(renderer.source()));
}

#[test]
fn test_rendering_is_deterministic() {
    let renderers = [
        GlyphRenderer::builtin(),
        GlyphRenderer::resolve(&FontSource::defaults()),
    ];

    for renderer in &renderers {
        for size in [16, 32, 48, 128] {
            let mut first = disc(size);
            let mut second = disc(size);
            renderer.render(&mut first, "7");
            renderer.render(&mut second, "7");
            assert_eq!(first, second, "{size}px glyph via {}", renderer.source());
        }
    }
}

#[test]
fn test_glyph_is_centered_with_shadow_below_right() {
    let renderer = GlyphRenderer::builtin();
    let mut canvas = RgbaImage::new(128, 128);
    renderer.render(&mut canvas, "7");

    // 70px builtin glyph: 8px dots, 40×56 ink placed at (44, 36).
    let mask = renderer.measure("7", 128);
    assert_eq!((mask.width, mask.height), (40, 56));
    assert_eq!(*canvas.get_pixel(44, 36), Rgba([255, 255, 255, 255]));
    assert_eq!(*canvas.get_pixel(83, 36), Rgba([255, 255, 255, 255]));

    // The shadow is offset by 128 / 40 = 3 pixels and only shows past the ink.
    let shadow = canvas.get_pixel(86, 39);
    assert_eq!((shadow[0], shadow[1], shadow[2]), (0, 0, 0));
    assert!((99..=100).contains(&shadow[3]), "Shadow alpha {}", shadow[3]);
    assert_eq!(canvas.get_pixel(43, 36)[3], 0);
}

#[test]
fn test_empty_glyph_leaves_canvas_untouched() {
    let renderer = GlyphRenderer::builtin();
    let mut canvas = disc(32);
    let before = canvas.clone();

    renderer.render(&mut canvas, "");
    assert_eq!(canvas, before);
}

#[test]
fn test_truetype_glyph_is_centered_when_available() {
    let renderer = GlyphRenderer::resolve(&FontSource::defaults());
    if matches!(renderer.face(), Face::Builtin) {
        eprintln!("No system font installed, skipping TrueType centering check");
        return;
    }

    let mut canvas = disc(32);
    renderer.render(&mut canvas, "7");

    let white: Vec<(u32, u32)> = canvas
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] >= 250 && p[1] >= 250 && p[2] >= 250)
        .map(|(x, y, _)| (x, y))
        .collect();
    assert!(!white.is_empty(), "Glyph should leave white pixels");

    let (min_x, max_x) = (white.iter().map(|p| p.0).min(), white.iter().map(|p| p.0).max());
    let (min_y, max_y) = (white.iter().map(|p| p.1).min(), white.iter().map(|p| p.1).max());
    let center_x = (min_x.unwrap_or(0) + max_x.unwrap_or(0)) as f32 / 2.0;
    let center_y = (min_y.unwrap_or(0) + max_y.unwrap_or(0)) as f32 / 2.0;
    assert!((center_x - 16.0).abs() <= 2.0, "Glyph center x {center_x}");
    assert!((center_y - 16.0).abs() <= 2.0, "Glyph center y {center_y}");
}

#[test]
fn test_truetype_size_is_the_em_size() {
    let renderer = GlyphRenderer::resolve(&FontSource::defaults());
    let Face::TrueType(font) = renderer.face() else {
        eprintln!("No system font installed, skipping em size check");
        return;
    };

    // Scaling by the unscaled ascent-to-descent height maps one font unit to one pixel.
    let v_metrics = font.v_metrics_unscaled();
    let unit_scale = rusttype::Scale::uniform(v_metrics.ascent - v_metrics.descent);
    let outline = font
        .glyph('7')
        .scaled(unit_scale)
        .exact_bounding_box()
        .expect("The digit 7 should have an outline");
    let units_per_em = f32::from(font.units_per_em());

    // A 128px icon uses a 70px em.
    let expected = outline.height() * 70.0 / units_per_em;
    let mask = renderer.measure("7", 128);
    assert!(
        (mask.height as f32 - expected).abs() <= 2.0,
        "Ink height {} should match the 70px em cap height {expected}",
        mask.height
    );
}
