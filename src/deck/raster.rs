//! Raster operations the package writer does not offer: aspect-fill crop
//! geometry, circular masking and SVG icon recolouring and rasterization.

use super::error::{DeckError, Result};
use crate::common::RGBColor;
use crate::common::unit::PERCENT_100;
use crate::ooxml::pptx::SrcRect;
use aho_corasick::AhoCorasick;
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use once_cell::sync::Lazy;
use resvg::{tiny_skia, usvg};
use std::io::Cursor;

static CURRENT_COLOR_STROKE: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build([r#"stroke="currentColor""#, "stroke='currentColor'"])
        .expect("Failed to build stroke matcher")
});

/// Pixel size of an encoded image without decoding it.
pub fn image_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

/// Crop that makes a `src_w x src_h` image fill a `dst_w x dst_h` box without
/// distortion, trimming the longer axis equally on both sides.
///
/// Degenerate sizes yield an empty crop.
pub fn center_crop(src_w: u32, src_h: u32, dst_w: i64, dst_h: i64) -> SrcRect {
    if src_w == 0 || src_h == 0 || dst_w <= 0 || dst_h <= 0 {
        return SrcRect::default();
    }
    let src_ratio = src_w as f64 / src_h as f64;
    let dst_ratio = dst_w as f64 / dst_h as f64;
    let full = PERCENT_100 as f64;

    if src_ratio > dst_ratio {
        // Too wide: trim left and right.
        let side = ((1.0 - dst_ratio / src_ratio) / 2.0 * full).round() as u32;
        SrcRect {
            left: side,
            right: side,
            ..Default::default()
        }
    } else if src_ratio < dst_ratio {
        let side = ((1.0 - src_ratio / dst_ratio) / 2.0 * full).round() as u32;
        SrcRect {
            top: side,
            bottom: side,
            ..Default::default()
        }
    } else {
        SrcRect::default()
    }
}

/// Square center crop of an image with everything outside the inscribed
/// circle made transparent, encoded as PNG.
pub fn circular_crop(data: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)?;
    let side = img.width().min(img.height());
    if side == 0 {
        return Err(DeckError::Image(image::ImageError::Limits(
            image::error::LimitError::from_kind(image::error::LimitErrorKind::DimensionError),
        )));
    }
    let x = (img.width() - side) / 2;
    let y = (img.height() - side) / 2;
    let mut square: RgbaImage = img.crop_imm(x, y, side, side).to_rgba8();

    apply_circle_mask(&mut square);
    encode_png(DynamicImage::ImageRgba8(square))
}

/// Scale each pixel's alpha by its coverage of the inscribed circle, with a
/// one pixel soft edge.
fn apply_circle_mask(img: &mut RgbaImage) {
    let radius = img.width() as f64 / 2.0;
    for (px, py, pixel) in img.enumerate_pixels_mut() {
        let dx = px as f64 + 0.5 - radius;
        let dy = py as f64 + 0.5 - radius;
        let distance = (dx * dx + dy * dy).sqrt();
        let coverage = (radius - distance + 0.5).clamp(0.0, 1.0);
        let Rgba([r, g, b, a]) = *pixel;
        *pixel = Rgba([r, g, b, (a as f64 * coverage).round() as u8]);
    }
}

fn encode_png(img: DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Replace `stroke="currentColor"` with a concrete colour.
pub fn recolor_svg_stroke(svg: &str, color: RGBColor) -> String {
    let double = format!(r##"stroke="#{}""##, color.to_hex());
    let single = format!("stroke='#{}'", color.to_hex());
    CURRENT_COLOR_STROKE.replace_all(svg, &[double.as_str(), single.as_str()])
}

/// Render SVG markup into a `size x size` PNG, scaled to fit and centered.
pub fn rasterize_svg(svg: &str, size: u32) -> Result<Vec<u8>> {
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|e| DeckError::Svg(e.to_string()))?;
    let mut pixmap = tiny_skia::Pixmap::new(size, size)
        .ok_or_else(|| DeckError::Svg(format!("Failed to allocate {0}x{0} pixmap", size)))?;

    let tree_size = tree.size();
    let scale = (size as f32 / tree_size.width()).min(size as f32 / tree_size.height());
    let dx = (size as f32 - tree_size.width() * scale) / 2.0;
    let dy = (size as f32 - tree_size.height() * scale) / 2.0;
    let transform = tiny_skia::Transform::from_scale(scale, scale).post_translate(dx, dy);

    resvg::render(&tree, transform, &mut pixmap.as_mut());
    pixmap.encode_png().map_err(|e| DeckError::Svg(e.to_string()))
}
