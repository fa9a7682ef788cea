use super::{RenderContext, RenderedShape, describe};
use crate::common::RGBColor;
use crate::common::unit::pt_to_emu_f64;
use crate::ooxml::pptx::{Fill, LineStyle, MutableSlide, PresetGeometry};
use crate::plan::Element;
use log::{debug, warn};

/// Gradient direction when none is given: top to bottom.
const DEFAULT_GRADIENT_ANGLE: f64 = 90.0;

pub(super) fn render(
    ctx: &RenderContext<'_>,
    slide: &mut MutableSlide,
    element: &Element,
    shape_type: Option<&str>,
) -> Option<RenderedShape> {
    let mapper = &ctx.mapper;
    let theme = mapper.theme();
    let style = &element.style;

    let geometry = match shape_type {
        Some(name) => PresetGeometry::parse(name).unwrap_or_else(|| {
            warn!("Unsupported shape type '{}', using rectangle", name);
            PresetGeometry::Rectangle
        }),
        None => PresetGeometry::Rectangle,
    };

    let fill = match (&style.gradient, &style.fill_color) {
        (Some(gradient), fill_color) => {
            let start_fallback = mapper.resolve_color(fill_color.as_deref(), theme.primary);
            Fill::Gradient {
                stops: vec![
                    mapper.resolve_color(gradient.start.as_deref(), start_fallback),
                    mapper.resolve_color(gradient.end.as_deref(), theme.secondary),
                ],
                angle_deg: gradient
                    .angle
                    .filter(|a| a.is_finite())
                    .unwrap_or(DEFAULT_GRADIENT_ANGLE),
            }
        },
        (None, Some(color)) => Fill::Solid(mapper.resolve_color(Some(color), RGBColor::BLACK)),
        (None, None) => Fill::None,
    };

    let line = style.line_color.as_deref().map(|color| {
        let width_pt = match style.line_width {
            Some(w) if w.is_finite() && w >= 0.0 => w,
            Some(w) => {
                warn!("Invalid line width {}, using 1pt", w);
                1.0
            },
            None => 1.0,
        };
        LineStyle {
            color: mapper.resolve_color(Some(color), RGBColor::BLACK),
            width_emu: pt_to_emu_f64(width_pt),
        }
    });

    let shape = slide.add_auto_shape(geometry, mapper.transform(element), &fill, line.as_ref());

    if let Some(alpha) = mapper.alpha(style) {
        if slide.set_fill_alpha(shape.id, alpha) == 0 {
            debug!("{} has no fill colour to apply opacity to", describe(element));
        }
    }
    Some(shape)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{element, with_context};
    use super::*;
    use crate::deck::theme::ResolvedTheme;
    use crate::ooxml::pptx::MutablePresentation;
    use crate::plan::{ElementKind, ElementStyle, GradientSpec};

    fn render_xml(shape_type: Option<&str>, style: ElementStyle) -> String {
        let theme = ResolvedTheme::default();
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide();
        let el = element(
            ElementKind::Shape {
                shape_type: shape_type.map(String::from),
            },
            style,
        );
        let shape = with_context(&theme, |ctx| render(ctx, slide, &el, shape_type)).unwrap();
        slide.shape_node(shape.id).unwrap().to_xml_string().unwrap()
    }

    #[test]
    fn test_solid_fill_with_opacity_and_border() {
        let xml = render_xml(
            Some("oval"),
            ElementStyle {
                fill_color: Some("#FFD700".into()),
                opacity: Some(0.8),
                line_color: Some("#1A2B3C".into()),
                line_width: Some(2.0),
                ..Default::default()
            },
        );
        assert!(xml.contains(r#"prst="ellipse""#));
        // 20% transparency is written as 80% opacity.
        assert!(xml.contains(r#"<a:srgbClr val="FFD700"><a:alpha val="80000"/></a:srgbClr>"#));
        assert!(xml.contains(r#"<a:ln w="25400"><a:solidFill><a:srgbClr val="1A2B3C"/></a:solidFill></a:ln>"#));
    }

    #[test]
    fn test_gradient_stops_carry_alpha() {
        let xml = render_xml(
            None,
            ElementStyle {
                gradient: Some(GradientSpec {
                    start: Some("#FF0000".into()),
                    end: Some("accent".into()),
                    angle: None,
                }),
                opacity: Some(0.5),
                ..Default::default()
            },
        );
        assert!(xml.contains("<a:gradFill"));
        assert!(xml.contains(r#"<a:srgbClr val="FF0000"><a:alpha val="50000"/></a:srgbClr>"#));
        assert!(xml.contains(r#"<a:srgbClr val="FFC107"><a:alpha val="50000"/></a:srgbClr>"#));
    }

    #[test]
    fn test_no_fill_and_unknown_type() {
        let xml = render_xml(
            Some("hexagon"),
            ElementStyle {
                opacity: Some(0.5),
                ..Default::default()
            },
        );
        assert!(xml.contains(r#"prst="rect""#));
        assert!(xml.contains("<a:noFill/>"));
        assert!(!xml.contains("a:alpha"));
    }

    #[test]
    fn test_out_of_range_opacity_stays_opaque() {
        let xml = render_xml(
            None,
            ElementStyle {
                fill_color: Some("#FFFFFF".into()),
                opacity: Some(1.7),
                ..Default::default()
            },
        );
        assert!(xml.contains(r#"<a:srgbClr val="FFFFFF"/>"#));
    }
}
