use super::{RenderContext, RenderedShape, describe};
use crate::deck::raster;
use crate::ooxml::pptx::{MutableSlide, Transform};
use crate::plan::Element;
use log::warn;

pub(super) fn render(
    ctx: &RenderContext<'_>,
    slide: &mut MutableSlide,
    element: &Element,
    keyword: &str,
    crop: Option<&str>,
    background: bool,
) -> Option<RenderedShape> {
    // Out-of-range values are logged by the mapper and replaced with opaque.
    let opacity = match element.style.opacity {
        Some(opacity) if ctx.mapper.alpha(&element.style).is_some() => opacity,
        _ => 1.0,
    };

    let Some(resource) = ctx.images.fetch(keyword, opacity) else {
        warn!("No image for keyword '{}', skipping {}", keyword, describe(element));
        return None;
    };
    let data = match resource.load() {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to load image for '{}': {}", keyword, e);
            return None;
        },
    };

    let xfrm = ctx.mapper.transform(element);
    let circle = match crop.map(|c| c.trim().to_ascii_lowercase()) {
        Some(c) if c == "circle" || c == "circular" => true,
        Some(c) if c.is_empty() || c == "none" || c == "fill" => false,
        Some(c) => {
            warn!("Unknown crop '{}', using aspect fill", c);
            false
        },
        None => false,
    };

    let inserted = if circle {
        let masked = match raster::circular_crop(&data) {
            Ok(masked) => masked,
            Err(e) => {
                warn!("Circular crop failed for '{}': {}", keyword, e);
                return None;
            },
        };
        let diameter = xfrm.cx.min(xfrm.cy);
        let xfrm = Transform::new(xfrm.x, xfrm.y, diameter, diameter);
        slide.add_picture(masked, xfrm, keyword, None)
    } else {
        let crop = match raster::image_dimensions(&data) {
            Ok((w, h)) => Some(raster::center_crop(w, h, xfrm.cx, xfrm.cy)),
            Err(e) => {
                warn!("Cannot read size of image for '{}', inserting uncropped: {}", keyword, e);
                None
            },
        };
        slide.add_picture(data, xfrm, keyword, crop)
    };

    let shape = match inserted {
        Ok(shape) => shape,
        Err(e) => {
            warn!("Failed to insert image for '{}': {}", keyword, e);
            return None;
        },
    };

    if background {
        slide.move_shape_to_back(shape.id);
    }
    Some(shape)
}
