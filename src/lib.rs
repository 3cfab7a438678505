//! Procedural generator for the lotto analyzer icon set: a radial gradient
//! disc with a specular highlight and a drop-shadowed numeral, written as PNG
//! at a few fixed sizes.

pub mod glyph;
pub mod icon_gen;
pub mod raster;
