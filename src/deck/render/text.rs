use super::{RenderContext, RenderedShape};
use crate::ooxml::pptx::{MutableSlide, Paragraph, TextBody, TextRun};
use crate::plan::{Element, TextContent};

const BOLD_DELIMITER: &str = "**";

/// Split text on `**` pairs, toggling bold for each segment.
///
/// An unmatched trailing `**` still toggles; empty segments are dropped.
///
/// ```rust
/// use deckweave::deck::render::parse_bold_runs;
///
/// let runs = parse_bold_runs("Revenue **up 40%** this year");
/// assert_eq!(runs.len(), 3);
/// assert!(runs[1].bold);
/// assert_eq!(runs[1].text, "up 40%");
/// ```
pub fn parse_bold_runs(text: &str) -> Vec<TextRun> {
    text.split(BOLD_DELIMITER)
        .enumerate()
        .filter(|(_, segment)| !segment.is_empty())
        .map(|(i, segment)| TextRun {
            text: segment.to_string(),
            bold: i % 2 == 1,
        })
        .collect()
}

fn paragraphs(content: &TextContent) -> Vec<Paragraph> {
    match content {
        TextContent::Single(text) => text
            .split('\n')
            .map(|line| Paragraph {
                runs: parse_bold_runs(line.trim_end_matches('\r')),
                bullet: false,
            })
            .collect(),
        TextContent::Bullets(items) => items
            .iter()
            .map(|item| Paragraph {
                runs: parse_bold_runs(item),
                bullet: true,
            })
            .collect(),
    }
}

pub(super) fn render(
    ctx: &RenderContext<'_>,
    slide: &mut MutableSlide,
    element: &Element,
    content: &TextContent,
) -> Option<RenderedShape> {
    let style = ctx.mapper.resolve_text_style(&element.style);
    let body = TextBody {
        paragraphs: paragraphs(content),
        style: style.run_style(),
        align: style.align,
        wrap: style.wrap,
    };
    Some(slide.add_text_box(ctx.mapper.transform(element), &body))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{element, with_context};
    use super::*;
    use crate::deck::theme::ResolvedTheme;
    use crate::ooxml::pptx::ShapeKind;
    use crate::plan::{ElementKind, ElementStyle};

    #[test]
    fn test_bold_runs() {
        let runs = parse_bold_runs("**Lead** in and **out");
        let flags: Vec<(&str, bool)> = runs.iter().map(|r| (r.text.as_str(), r.bold)).collect();
        assert_eq!(flags, [("Lead", true), (" in and ", false), ("out", true)]);
        assert!(parse_bold_runs("").is_empty());
    }

    #[test]
    fn test_single_string_splits_lines_without_bullets() {
        let paras = paragraphs(&TextContent::Single("one\ntwo".into()));
        assert_eq!(paras.len(), 2);
        assert!(paras.iter().all(|p| !p.bullet));
    }

    #[test]
    fn test_render_bullet_list() {
        let theme = ResolvedTheme::default();
        let mut pres = crate::ooxml::pptx::MutablePresentation::new();
        let slide = pres.add_slide();
        let content = TextContent::Bullets(vec!["First".into(), "**Second**".into()]);
        let el = element(
            ElementKind::TextBox {
                content: content.clone(),
            },
            ElementStyle {
                font_size: Some(24.0),
                ..Default::default()
            },
        );

        let shape = with_context(&theme, |ctx| render(ctx, slide, &el, &content)).unwrap();
        assert_eq!(shape.kind, ShapeKind::TextBox);

        let xml = slide.shape_node(shape.id).unwrap().to_xml_string().unwrap();
        assert_eq!(xml.matches("<a:buChar").count(), 2);
        assert_eq!(xml.matches(r#"sz="2400""#).count(), 2);
        assert!(xml.contains(r#"b="1""#));
        assert!(xml.contains(&format!(r#"<a:latin typeface="{}"/>"#, theme.body_font)));
    }
}
