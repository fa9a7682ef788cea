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
) -> Option<RenderedShape> {
    let Some(svg) = ctx.icons.fetch_svg(keyword) else {
        warn!("No icon for keyword '{}', skipping {}", keyword, describe(element));
        return None;
    };

    let color = ctx
        .mapper
        .resolve_color(element.style.color.as_deref(), ctx.mapper.theme().accent);
    let svg = raster::recolor_svg_stroke(&svg, color);
    let png = match raster::rasterize_svg(&svg, ctx.icon_raster_px) {
        Ok(png) => png,
        Err(e) => {
            warn!("Failed to rasterize icon '{}': {}", keyword, e);
            return None;
        },
    };

    let xfrm = ctx.mapper.transform(element);
    let side = xfrm.cx.min(xfrm.cy);
    match slide.add_picture(png, Transform::new(xfrm.x, xfrm.y, side, side), keyword, None) {
        Ok(shape) => Some(shape),
        Err(e) => {
            warn!("Failed to insert icon '{}': {}", keyword, e);
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::element;
    use super::*;
    use crate::common::unit::EMUS_PER_PX_96;
    use crate::deck::provider::NoResources;
    use crate::deck::style::StyleAndGeometryMapper;
    use crate::deck::theme::ResolvedTheme;
    use crate::ooxml::pptx::{MutablePresentation, ShapeKind};
    use crate::plan::{ElementKind, ElementStyle};

    const CHECK_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><path d="M4 12l5 5L20 6" fill="none" stroke="currentColor" stroke-width="2"/></svg>"#;

    fn icon_element() -> Element {
        element(
            ElementKind::Icon {
                icon_keyword: "check".into(),
            },
            ElementStyle::default(),
        )
    }

    #[test]
    fn test_icon_is_square_picture() {
        let theme = ResolvedTheme::default();
        let icons = |keyword: &str| (keyword == "check").then(|| CHECK_SVG.to_string());
        let ctx = RenderContext {
            mapper: StyleAndGeometryMapper::new(&theme, EMUS_PER_PX_96, 18.0),
            images: &NoResources,
            icons: &icons,
            icon_raster_px: 32,
        };
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide();

        let shape = render(&ctx, slide, &icon_element(), "check").unwrap();
        assert_eq!(shape.kind, ShapeKind::Picture);
        assert_eq!(raster::image_dimensions(&slide.images[0].data).unwrap(), (32, 32));

        let xml = slide.shape_node(shape.id).unwrap().to_xml_string().unwrap();
        let side = 100 * EMUS_PER_PX_96;
        assert!(xml.contains(&format!(r#"<a:ext cx="{side}" cy="{side}"/>"#)));
    }

    #[test]
    fn test_unknown_icon_is_skipped() {
        let theme = ResolvedTheme::default();
        let ctx = RenderContext {
            mapper: StyleAndGeometryMapper::new(&theme, EMUS_PER_PX_96, 18.0),
            images: &NoResources,
            icons: &NoResources,
            icon_raster_px: 32,
        };
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide();
        assert!(render(&ctx, slide, &icon_element(), "check").is_none());
        assert_eq!(slide.shape_count(), 0);
    }
}
