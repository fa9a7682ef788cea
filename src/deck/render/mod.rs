//! Element renderers.
//!
//! Each renderer places one plan element on a slide and returns the shape it
//! created. A renderer never fails the page: missing resources, malformed
//! payloads and raster errors are logged and the element is skipped.

mod chart;
mod icon;
mod picture;
mod shape;
mod table;
mod text;

pub use text::parse_bold_runs;

use super::provider::{IconProvider, ImageProvider};
use super::style::StyleAndGeometryMapper;
use crate::ooxml::pptx::{MutableSlide, ShapeHandle};
use crate::plan::{Element, ElementKind};
use log::debug;

/// Shape created for a plan element; lives only while its page is assembled.
pub type RenderedShape = ShapeHandle;

/// Everything a renderer consults besides the slide itself.
pub struct RenderContext<'a> {
    pub mapper: StyleAndGeometryMapper<'a>,
    pub images: &'a dyn ImageProvider,
    pub icons: &'a dyn IconProvider,
    /// Edge length of rasterized icons
    pub icon_raster_px: u32,
}

/// Human-readable element label for log lines.
pub(crate) fn describe(element: &Element) -> String {
    match element.id {
        Some(ref id) => format!("{} '{}'", element.kind.type_name(), id),
        None => element.kind.type_name().to_string(),
    }
}

/// Render one element onto `slide`.
pub fn render_element(
    ctx: &RenderContext<'_>,
    slide: &mut MutableSlide,
    element: &Element,
) -> Option<RenderedShape> {
    let rendered = match element.kind {
        ElementKind::TextBox { ref content } => text::render(ctx, slide, element, content),
        ElementKind::Image {
            ref image_keyword,
            ref crop,
            background,
        } => picture::render(ctx, slide, element, image_keyword, crop.as_deref(), background),
        ElementKind::Shape { ref shape_type } => {
            shape::render(ctx, slide, element, shape_type.as_deref())
        },
        ElementKind::Chart {
            ref chart_type,
            ref title,
            ref data,
        } => chart::render(
            ctx,
            slide,
            element,
            chart_type.as_deref(),
            title.as_deref(),
            data,
        ),
        ElementKind::Table {
            ref headers,
            ref rows,
        } => table::render(ctx, slide, element, headers, rows),
        ElementKind::Icon { ref icon_keyword } => icon::render(ctx, slide, element, icon_keyword),
    };

    if let Some(shape) = rendered {
        debug!("Rendered {} as shape {}", describe(element), shape.id);
    }
    rendered
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::deck::provider::NoResources;
    use crate::deck::theme::ResolvedTheme;
    use crate::common::unit::EMUS_PER_PX_96;
    use crate::plan::ElementStyle;

    pub fn element(kind: ElementKind, style: ElementStyle) -> Element {
        Element {
            id: None,
            x: 10.0,
            y: 20.0,
            width: 200.0,
            height: 100.0,
            z_index: None,
            style,
            kind,
        }
    }

    pub fn with_context<R>(theme: &ResolvedTheme, f: impl FnOnce(&RenderContext<'_>) -> R) -> R {
        let ctx = RenderContext {
            mapper: StyleAndGeometryMapper::new(theme, EMUS_PER_PX_96, 18.0),
            images: &NoResources,
            icons: &NoResources,
            icon_raster_px: 64,
        };
        f(&ctx)
    }
}
