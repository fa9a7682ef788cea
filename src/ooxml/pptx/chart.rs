//! Chart parts.
//!
//! Charts are written with literal caches (`c:strLit` / `c:numLit`) so the
//! part is self-contained and needs no embedded workbook.

use crate::common::RGBColor;
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use std::io::Write;

/// Plot kinds a deck chart can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Horizontal bars
    Bar,
    /// Vertical bars
    Column,
    Line,
    Pie,
}

static CHART_KIND_NAMES: phf::Map<&'static str, ChartKind> = phf::phf_map! {
    "bar" => ChartKind::Bar,
    "bar_chart" => ChartKind::Bar,
    "column" => ChartKind::Column,
    "column_chart" => ChartKind::Column,
    "line" => ChartKind::Line,
    "line_chart" => ChartKind::Line,
    "pie" => ChartKind::Pie,
    "pie_chart" => ChartKind::Pie,
};

impl ChartKind {
    /// Parse a chart type name such as `bar_chart` or `pie`.
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        CHART_KIND_NAMES.get(key.as_str()).copied()
    }

    fn bar_direction(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            _ => "col",
        }
    }
}

/// Legend placement (`c:legendPos`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    #[default]
    Bottom,
    Top,
    Left,
    Right,
    TopRight,
}

impl LegendPosition {
    /// Parse a position name such as `bottom` or `corner`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bottom" | "b" => Some(LegendPosition::Bottom),
            "top" | "t" => Some(LegendPosition::Top),
            "left" | "l" => Some(LegendPosition::Left),
            "right" | "r" => Some(LegendPosition::Right),
            "corner" | "top_right" | "tr" => Some(LegendPosition::TopRight),
            _ => None,
        }
    }

    pub fn xml_value(&self) -> &'static str {
        match self {
            LegendPosition::Bottom => "b",
            LegendPosition::Top => "t",
            LegendPosition::Left => "l",
            LegendPosition::Right => "r",
            LegendPosition::TopRight => "tr",
        }
    }
}

/// One data series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
    /// Series fill (bars) or stroke (lines)
    pub color: Option<RGBColor>,
}

/// A complete chart part.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPart {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
    /// Per-point colours, used for pie slices
    pub point_colors: Vec<RGBColor>,
    pub data_labels: bool,
    pub legend: Option<LegendPosition>,
    /// Colour of titles, labels and legend text
    pub text_color: Option<RGBColor>,
    /// Colour of axis lines
    pub axis_color: Option<RGBColor>,
    pub font: Option<String>,
}

impl ChartPart {
    /// Create an empty chart of the given kind with a bottom legend.
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            title: None,
            categories: Vec::new(),
            series: Vec::new(),
            point_colors: Vec::new(),
            data_labels: false,
            legend: Some(LegendPosition::Bottom),
            text_color: None,
            axis_color: None,
            font: None,
        }
    }

    /// Generate the chart part XML.
    pub fn to_xml(&self) -> Result<String> {
        let mut buf = Vec::with_capacity(4096);
        write_chart(&mut buf, self)?;
        String::from_utf8(buf).map_err(|e| OoxmlError::Xml(e.to_string()))
    }
}

/// Write a chart to XML.
pub fn write_chart<W: Write>(writer: &mut W, chart: &ChartPart) -> std::io::Result<()> {
    write!(
        writer,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
    )?;
    write!(
        writer,
        r#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" "#
    )?;
    write!(
        writer,
        r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#
    )?;
    write!(
        writer,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#
    )?;
    write!(
        writer,
        r#"<c:date1904 val="0"/><c:lang val="en-US"/><c:roundedCorners val="0"/>"#
    )?;

    write!(writer, "<c:chart>")?;

    if let Some(ref title) = chart.title {
        write_title(writer, title, chart)?;
    }
    write!(
        writer,
        r#"<c:autoTitleDeleted val="{}"/>"#,
        if chart.title.is_some() { "0" } else { "1" }
    )?;

    write!(writer, "<c:plotArea><c:layout/>")?;
    match chart.kind {
        ChartKind::Bar | ChartKind::Column => write_bar_chart(writer, chart)?,
        ChartKind::Line => write_line_chart(writer, chart)?,
        ChartKind::Pie => write_pie_chart(writer, chart)?,
    }
    if chart.kind != ChartKind::Pie {
        write_axes(writer, chart)?;
    }
    write!(writer, "</c:plotArea>")?;

    if let Some(position) = chart.legend {
        write!(writer, "<c:legend>")?;
        write!(writer, r#"<c:legendPos val="{}"/>"#, position.xml_value())?;
        write!(writer, r#"<c:overlay val="0"/>"#)?;
        write_text_props(writer, chart, 1200)?;
        write!(writer, "</c:legend>")?;
    }

    write!(writer, r#"<c:plotVisOnly val="1"/><c:dispBlanksAs val="gap"/>"#)?;
    write!(writer, "</c:chart>")?;

    write_text_props(writer, chart, 1200)?;
    write!(writer, "</c:chartSpace>")?;

    Ok(())
}

fn write_title<W: Write>(writer: &mut W, title: &str, chart: &ChartPart) -> std::io::Result<()> {
    write!(writer, "<c:title><c:tx><c:rich><a:bodyPr/><a:lstStyle/><a:p>")?;
    write!(writer, r#"<a:pPr><a:defRPr sz="1600" b="1"/></a:pPr>"#)?;
    write!(writer, r#"<a:r><a:rPr lang="en-US" sz="1600" b="1">"#)?;
    write_run_fill_and_font(writer, chart)?;
    write!(writer, "</a:rPr><a:t>{}</a:t></a:r>", escape_xml(title))?;
    write!(writer, r#"</a:p></c:rich></c:tx><c:overlay val="0"/></c:title>"#)?;
    Ok(())
}

fn write_bar_chart<W: Write>(writer: &mut W, chart: &ChartPart) -> std::io::Result<()> {
    write!(writer, "<c:barChart>")?;
    write!(writer, r#"<c:barDir val="{}"/>"#, chart.kind.bar_direction())?;
    write!(writer, r#"<c:grouping val="clustered"/><c:varyColors val="0"/>"#)?;
    for (index, series) in chart.series.iter().enumerate() {
        write_series(writer, chart, series, index)?;
    }
    write_data_labels(writer, chart)?;
    write!(writer, r#"<c:gapWidth val="150"/>"#)?;
    write!(writer, r#"<c:axId val="1"/><c:axId val="2"/>"#)?;
    write!(writer, "</c:barChart>")?;
    Ok(())
}

fn write_line_chart<W: Write>(writer: &mut W, chart: &ChartPart) -> std::io::Result<()> {
    write!(writer, "<c:lineChart>")?;
    write!(writer, r#"<c:grouping val="standard"/><c:varyColors val="0"/>"#)?;
    for (index, series) in chart.series.iter().enumerate() {
        write_series(writer, chart, series, index)?;
    }
    write_data_labels(writer, chart)?;
    write!(writer, r#"<c:marker val="1"/>"#)?;
    write!(writer, r#"<c:axId val="1"/><c:axId val="2"/>"#)?;
    write!(writer, "</c:lineChart>")?;
    Ok(())
}

fn write_pie_chart<W: Write>(writer: &mut W, chart: &ChartPart) -> std::io::Result<()> {
    write!(writer, "<c:pieChart>")?;
    write!(writer, r#"<c:varyColors val="1"/>"#)?;
    // A pie plots exactly one series.
    if let Some(series) = chart.series.first() {
        write_series(writer, chart, series, 0)?;
    }
    write_data_labels(writer, chart)?;
    write!(writer, r#"<c:firstSliceAng val="0"/>"#)?;
    write!(writer, "</c:pieChart>")?;
    Ok(())
}

fn write_series<W: Write>(
    writer: &mut W,
    chart: &ChartPart,
    series: &ChartSeries,
    index: usize,
) -> std::io::Result<()> {
    write!(writer, "<c:ser>")?;
    write!(writer, r#"<c:idx val="{}"/><c:order val="{}"/>"#, index, index)?;
    write!(writer, "<c:tx><c:v>{}</c:v></c:tx>", escape_xml(&series.name))?;

    if let Some(color) = series.color {
        if chart.kind == ChartKind::Line {
            write!(
                writer,
                r#"<c:spPr><a:ln w="28575" cap="rnd"><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:round/></a:ln></c:spPr>"#,
                color.to_hex()
            )?;
        } else {
            write!(
                writer,
                r#"<c:spPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill></c:spPr>"#,
                color.to_hex()
            )?;
        }
    }

    match chart.kind {
        ChartKind::Bar | ChartKind::Column => {
            write!(writer, r#"<c:invertIfNegative val="0"/>"#)?;
        },
        ChartKind::Line => {
            write!(writer, r#"<c:marker><c:symbol val="circle"/><c:size val="6"/></c:marker>"#)?;
        },
        ChartKind::Pie => {
            for (point, color) in chart.point_colors.iter().enumerate() {
                write!(
                    writer,
                    r#"<c:dPt><c:idx val="{}"/><c:bubble3D val="0"/><c:spPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill></c:spPr></c:dPt>"#,
                    point,
                    color.to_hex()
                )?;
            }
        },
    }

    if !chart.categories.is_empty() {
        write!(writer, "<c:cat><c:strLit>")?;
        write!(writer, r#"<c:ptCount val="{}"/>"#, chart.categories.len())?;
        for (i, category) in chart.categories.iter().enumerate() {
            write!(
                writer,
                r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
                i,
                escape_xml(category)
            )?;
        }
        write!(writer, "</c:strLit></c:cat>")?;
    }

    write!(writer, "<c:val><c:numLit>")?;
    write!(writer, "<c:formatCode>General</c:formatCode>")?;
    write!(writer, r#"<c:ptCount val="{}"/>"#, series.values.len())?;
    let mut number = ryu::Buffer::new();
    for (i, value) in series.values.iter().enumerate() {
        // Non-finite values are left as gaps.
        if value.is_finite() {
            write!(
                writer,
                r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
                i,
                number.format_finite(*value)
            )?;
        }
    }
    write!(writer, "</c:numLit></c:val>")?;

    if chart.kind == ChartKind::Line {
        write!(writer, r#"<c:smooth val="0"/>"#)?;
    }

    write!(writer, "</c:ser>")?;
    Ok(())
}

fn write_data_labels<W: Write>(writer: &mut W, chart: &ChartPart) -> std::io::Result<()> {
    let show_value = if chart.data_labels { "1" } else { "0" };
    let show_percent = if chart.data_labels && chart.kind == ChartKind::Pie {
        "1"
    } else {
        "0"
    };

    write!(writer, "<c:dLbls>")?;
    if chart.data_labels {
        write_text_props(writer, chart, 1000)?;
    }
    write!(writer, r#"<c:showLegendKey val="0"/>"#)?;
    write!(writer, r#"<c:showVal val="{}"/>"#, show_value)?;
    write!(writer, r#"<c:showCatName val="0"/>"#)?;
    write!(writer, r#"<c:showSerName val="0"/>"#)?;
    write!(writer, r#"<c:showPercent val="{}"/>"#, show_percent)?;
    write!(writer, r#"<c:showBubbleSize val="0"/>"#)?;
    write!(writer, "</c:dLbls>")?;
    Ok(())
}

fn write_axes<W: Write>(writer: &mut W, chart: &ChartPart) -> std::io::Result<()> {
    let (cat_pos, val_pos) = if chart.kind == ChartKind::Bar {
        ("l", "b")
    } else {
        ("b", "l")
    };

    write!(writer, "<c:catAx>")?;
    write!(writer, r#"<c:axId val="1"/><c:scaling><c:orientation val="minMax"/></c:scaling>"#)?;
    write!(writer, r#"<c:delete val="0"/><c:axPos val="{}"/>"#, cat_pos)?;
    write!(writer, r#"<c:majorTickMark val="out"/><c:minorTickMark val="none"/><c:tickLblPos val="nextTo"/>"#)?;
    write_axis_line(writer, chart)?;
    write_text_props(writer, chart, 1000)?;
    write!(writer, r#"<c:crossAx val="2"/><c:crosses val="autoZero"/>"#)?;
    write!(writer, r#"<c:auto val="1"/><c:lblAlgn val="ctr"/><c:lblOffset val="100"/><c:noMultiLvlLbl val="0"/>"#)?;
    write!(writer, "</c:catAx>")?;

    write!(writer, "<c:valAx>")?;
    write!(writer, r#"<c:axId val="2"/><c:scaling><c:orientation val="minMax"/></c:scaling>"#)?;
    write!(writer, r#"<c:delete val="0"/><c:axPos val="{}"/>"#, val_pos)?;
    write!(
        writer,
        r#"<c:majorGridlines><c:spPr><a:ln w="6350"><a:solidFill><a:srgbClr val="D9D9D9"/></a:solidFill></a:ln></c:spPr></c:majorGridlines>"#
    )?;
    write!(writer, r#"<c:numFmt formatCode="General" sourceLinked="0"/>"#)?;
    write!(writer, r#"<c:majorTickMark val="out"/><c:minorTickMark val="none"/><c:tickLblPos val="nextTo"/>"#)?;
    write_axis_line(writer, chart)?;
    write_text_props(writer, chart, 1000)?;
    write!(writer, r#"<c:crossAx val="1"/><c:crosses val="autoZero"/><c:crossBetween val="between"/>"#)?;
    write!(writer, "</c:valAx>")?;

    Ok(())
}

fn write_axis_line<W: Write>(writer: &mut W, chart: &ChartPart) -> std::io::Result<()> {
    if let Some(color) = chart.axis_color {
        write!(
            writer,
            r#"<c:spPr><a:ln w="9525"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:ln></c:spPr>"#,
            color.to_hex()
        )?;
    }
    Ok(())
}

/// `c:txPr` carrying the chart text colour and font, if either is set.
fn write_text_props<W: Write>(writer: &mut W, chart: &ChartPart, size: u32) -> std::io::Result<()> {
    if chart.text_color.is_none() && chart.font.is_none() {
        return Ok(());
    }
    write!(writer, "<c:txPr><a:bodyPr/><a:lstStyle/><a:p><a:pPr>")?;
    write!(writer, r#"<a:defRPr sz="{}">"#, size)?;
    write_run_fill_and_font(writer, chart)?;
    write!(writer, "</a:defRPr></a:pPr>")?;
    write!(writer, r#"<a:endParaRPr lang="en-US"/></a:p></c:txPr>"#)?;
    Ok(())
}

fn write_run_fill_and_font<W: Write>(writer: &mut W, chart: &ChartPart) -> std::io::Result<()> {
    if let Some(color) = chart.text_color {
        write!(
            writer,
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            color.to_hex()
        )?;
    }
    if let Some(ref font) = chart.font {
        write!(writer, r#"<a:latin typeface="{}"/>"#, escape_xml(font))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: ChartKind) -> ChartPart {
        let mut chart = ChartPart::new(kind);
        chart.categories = vec!["Q1".into(), "Q2 & Q3".into()];
        chart.series.push(ChartSeries {
            name: "Revenue".into(),
            values: vec![1.5, f64::NAN],
            color: Some(RGBColor::new(0x0D, 0x47, 0xA1)),
        });
        chart
    }

    #[test]
    fn test_column_chart_xml() {
        let xml = sample(ChartKind::Column).to_xml().unwrap();
        assert!(xml.contains(r#"<c:barDir val="col"/>"#));
        assert!(xml.contains("<c:v>Q2 &amp; Q3</c:v>"));
        assert!(xml.contains(r#"<c:pt idx="0"><c:v>1.5</c:v></c:pt>"#));
        assert!(!xml.contains(r#"<c:pt idx="1"><c:v>NaN"#));
        assert!(xml.contains(r#"<a:srgbClr val="0D47A1"/>"#));
        assert!(xml.contains("<c:catAx>"));
        assert!(xml.contains(r#"<c:legendPos val="b"/>"#));
    }

    #[test]
    fn test_pie_chart_has_point_colors_and_no_axes() {
        let mut chart = sample(ChartKind::Pie);
        chart.point_colors = vec![RGBColor::new(1, 2, 3), RGBColor::new(4, 5, 6)];
        chart.data_labels = true;
        chart.legend = None;
        let xml = chart.to_xml().unwrap();
        assert_eq!(xml.matches("<c:dPt>").count(), 2);
        assert!(xml.contains(r#"<c:showPercent val="1"/>"#));
        assert!(!xml.contains("<c:catAx>"));
        assert!(!xml.contains("<c:legend>"));
    }

    #[test]
    fn test_title_and_text_props() {
        let mut chart = sample(ChartKind::Line);
        chart.title = Some("Growth".into());
        chart.text_color = Some(RGBColor::new(0x21, 0x21, 0x21));
        chart.font = Some("Arial".into());
        let xml = chart.to_xml().unwrap();
        assert!(xml.contains("<a:t>Growth</a:t>"));
        assert!(xml.contains(r#"<c:autoTitleDeleted val="0"/>"#));
        assert!(xml.contains(r#"<a:latin typeface="Arial"/>"#));
        assert!(xml.contains(r#"<c:smooth val="0"/>"#));
    }

    #[test]
    fn test_legend_position_parse() {
        assert_eq!(LegendPosition::parse("Corner"), Some(LegendPosition::TopRight));
        assert_eq!(LegendPosition::parse("nowhere"), None);
        assert_eq!(ChartKind::parse("Column Chart"), Some(ChartKind::Column));
        assert_eq!(ChartKind::parse("pie"), Some(ChartKind::Pie));
        assert_eq!(ChartKind::parse("radar_chart"), None);
    }
}
