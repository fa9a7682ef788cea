use super::{RenderContext, RenderedShape, describe};
use crate::common::RGBColor;
use crate::ooxml::pptx::{MutableSlide, RunStyle, TableCell, TableSpec};
use crate::plan::{CellValue, Element};
use log::warn;

/// Split `total` into `count` equal widths; the last column absorbs the remainder.
fn column_widths(total: i64, count: usize) -> Vec<i64> {
    let n = count as i64;
    let base = total / n;
    let mut widths = vec![base; count];
    if let Some(last) = widths.last_mut() {
        *last += total - base * n;
    }
    widths
}

pub(super) fn render(
    ctx: &RenderContext<'_>,
    slide: &mut MutableSlide,
    element: &Element,
    headers: &[CellValue],
    rows: &[Vec<CellValue>],
) -> Option<RenderedShape> {
    if headers.is_empty() && rows.is_empty() {
        warn!("Table without headers or rows, skipping {}", describe(element));
        return None;
    }

    let mapper = &ctx.mapper;
    let theme = mapper.theme();
    let text = mapper.resolve_text_style(&element.style);
    let xfrm = mapper.transform(element);

    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);
    if columns == 0 {
        warn!("Table has no columns, skipping {}", describe(element));
        return None;
    }

    let zebra: Vec<RGBColor> = element
        .style
        .zebra
        .iter()
        .flatten()
        .map(|c| mapper.resolve_color(Some(c), theme.background))
        .collect();

    let cell_style = |color: RGBColor, bold: bool, font: &str| RunStyle {
        font: Some(font.to_string()),
        size_pt: Some(text.size_pt),
        bold,
        italic: text.italic,
        color: Some(color),
    };
    let make_row = |values: &[CellValue], fill: Option<RGBColor>, style: &RunStyle| {
        (0..columns)
            .map(|i| TableCell {
                text: values.get(i).map(ToString::to_string).unwrap_or_default(),
                fill,
                style: style.clone(),
            })
            .collect::<Vec<_>>()
    };

    let mut table_rows = Vec::with_capacity(rows.len() + 1);
    let header_row = !headers.is_empty();
    if header_row {
        let heading_font = mapper.resolve_font(&element.style, "heading");
        let style = cell_style(theme.primary.contrasting_text(), true, &heading_font);
        table_rows.push(make_row(headers, Some(theme.primary), &style));
    }
    for (i, row) in rows.iter().enumerate() {
        let fill = (!zebra.is_empty()).then(|| zebra[i % zebra.len()]);
        let color = match fill {
            Some(fill) => fill.contrasting_text(),
            None => text.color,
        };
        let style = cell_style(color, text.bold, &text.font);
        table_rows.push(make_row(row, fill, &style));
    }

    let spec = TableSpec {
        column_widths: column_widths(xfrm.cx, columns),
        row_height: xfrm.cy / table_rows.len() as i64,
        rows: table_rows,
        header_row,
    };
    Some(slide.add_table(&spec, xfrm))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{element, with_context};
    use super::*;
    use crate::deck::theme::ResolvedTheme;
    use crate::ooxml::pptx::{MutablePresentation, ShapeKind};
    use crate::plan::{ElementKind, ElementStyle};

    fn cells(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::Text(v.to_string())).collect()
    }

    #[test]
    fn test_column_widths_keep_total() {
        assert_eq!(column_widths(100, 3), vec![33, 33, 34]);
        assert_eq!(column_widths(90, 1), vec![90]);
    }

    #[test]
    fn test_header_and_zebra_rows() {
        let theme = ResolvedTheme::default();
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide();
        let headers = cells(&["Name", "Score"]);
        let rows = vec![
            cells(&["Ada", "9"]),
            vec![CellValue::Text("Bob".into())],
            cells(&["Cy", "7"]),
        ];
        let el = element(
            ElementKind::Table {
                headers: headers.clone(),
                rows: rows.clone(),
            },
            ElementStyle {
                zebra: Some(vec!["#FFFFFF".into(), "#000000".into()]),
                ..Default::default()
            },
        );

        let shape = with_context(&theme, |ctx| render(ctx, slide, &el, &headers, &rows)).unwrap();
        assert_eq!(shape.kind, ShapeKind::Table);

        let xml = slide.shape_node(shape.id).unwrap().to_xml_string().unwrap();
        assert!(xml.contains(r#"firstRow="1""#));
        assert_eq!(xml.matches("<a:tr ").count(), 4);
        // Ragged rows are padded to the widest row.
        assert_eq!(xml.matches("<a:tc>").count(), 8);
        assert!(xml.contains(&format!(
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            theme.primary.to_hex()
        )));
        assert_eq!(xml.matches(r#"<a:srgbClr val="000000"/></a:solidFill></a:tcPr>"#).count(), 2);
        assert_eq!(xml.matches(r#"<a:srgbClr val="FFFFFF"/></a:solidFill></a:tcPr>"#).count(), 4);
    }

    #[test]
    fn test_empty_table_is_skipped() {
        let theme = ResolvedTheme::default();
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide();
        let el = element(
            ElementKind::Table {
                headers: Vec::new(),
                rows: Vec::new(),
            },
            ElementStyle::default(),
        );
        assert!(with_context(&theme, |ctx| render(ctx, slide, &el, &[], &[])).is_none());
        assert_eq!(slide.shape_count(), 0);
    }
}
