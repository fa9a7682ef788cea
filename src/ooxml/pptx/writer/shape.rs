/// Shape element construction for PPTX slides.
///
/// Shapes are built as [`XmlNode`] trees so that they can still be edited
/// after insertion: fill alpha, arbitrary attributes and paint-order moves all
/// work on the stored nodes.
use crate::common::RGBColor;
use crate::common::unit::{PERCENT_100, degrees_to_angle, pt_to_centipoints};
use crate::common::xml::XmlNode;
use crate::ooxml::opc::constants::namespace as ns;

/// Kind of element a shape node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    TextBox,
    AutoShape,
    Picture,
    Chart,
    Table,
}

/// Handle to an inserted shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHandle {
    /// Shape id (`p:cNvPr/@id`), unique within the slide
    pub id: u32,
    pub kind: ShapeKind,
}

/// Position and size in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transform {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Transform {
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }

    /// `a:xfrm` (shapes) or `p:xfrm` (graphic frames).
    fn to_node(self, name: &str) -> XmlNode {
        XmlNode::new(name)
            .with_child(
                XmlNode::new("a:off")
                    .with_num_attr("x", self.x)
                    .with_num_attr("y", self.y),
            )
            .with_child(
                XmlNode::new("a:ext")
                    .with_num_attr("cx", self.cx.max(0))
                    .with_num_attr("cy", self.cy.max(0)),
            )
    }
}

/// Preset geometry (`a:prstGeom/@prst`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresetGeometry {
    #[default]
    Rectangle,
    RoundedRectangle,
    Oval,
    Triangle,
    Line,
    RightArrow,
}

impl PresetGeometry {
    /// Parse a shape name such as `rounded_rectangle` or `oval`.
    pub fn parse(name: &str) -> Option<Self> {
        let key = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        GEOMETRY_NAMES.get(key.as_str()).copied()
    }

    pub fn preset_name(&self) -> &'static str {
        match self {
            PresetGeometry::Rectangle => "rect",
            PresetGeometry::RoundedRectangle => "roundRect",
            PresetGeometry::Oval => "ellipse",
            PresetGeometry::Triangle => "triangle",
            PresetGeometry::Line => "line",
            PresetGeometry::RightArrow => "rightArrow",
        }
    }
}

static GEOMETRY_NAMES: phf::Map<&'static str, PresetGeometry> = phf::phf_map! {
    "rectangle" => PresetGeometry::Rectangle,
    "rect" => PresetGeometry::Rectangle,
    "rounded_rectangle" => PresetGeometry::RoundedRectangle,
    "round_rect" => PresetGeometry::RoundedRectangle,
    "roundrect" => PresetGeometry::RoundedRectangle,
    "oval" => PresetGeometry::Oval,
    "ellipse" => PresetGeometry::Oval,
    "circle" => PresetGeometry::Oval,
    "triangle" => PresetGeometry::Triangle,
    "line" => PresetGeometry::Line,
    "right_arrow" => PresetGeometry::RightArrow,
    "arrow" => PresetGeometry::RightArrow,
};

/// Shape fill.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Fill {
    #[default]
    None,
    Solid(RGBColor),
    /// Linear gradient with evenly spaced stops.
    Gradient { stops: Vec<RGBColor>, angle_deg: f64 },
}

impl Fill {
    fn to_node(&self) -> XmlNode {
        match self {
            Fill::None => XmlNode::new("a:noFill"),
            Fill::Solid(color) => XmlNode::new("a:solidFill").with_child(srgb(*color)),
            Fill::Gradient { stops, angle_deg } => {
                let last = stops.len().saturating_sub(1).max(1) as u64;
                let gs = stops.iter().enumerate().map(|(i, color)| {
                    let pos = i as u64 * PERCENT_100 as u64 / last;
                    XmlNode::new("a:gs")
                        .with_num_attr("pos", pos)
                        .with_child(srgb(*color))
                });
                XmlNode::new("a:gradFill")
                    .with_attr("rotWithShape", "1")
                    .with_child(XmlNode::new("a:gsLst").with_children(gs))
                    .with_child(
                        XmlNode::new("a:lin")
                            .with_num_attr("ang", degrees_to_angle(*angle_deg))
                            .with_attr("scaled", "0"),
                    )
            },
        }
    }
}

/// Outline of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    pub color: RGBColor,
    pub width_emu: i64,
}

/// Paragraph alignment (`a:pPr/@algn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Some(TextAlign::Left),
            "center" | "centre" | "ctr" => Some(TextAlign::Center),
            "right" | "r" => Some(TextAlign::Right),
            _ => None,
        }
    }

    fn xml_value(&self) -> &'static str {
        match self {
            TextAlign::Left => "l",
            TextAlign::Center => "ctr",
            TextAlign::Right => "r",
        }
    }
}

/// Character properties shared by all runs of a text body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunStyle {
    pub font: Option<String>,
    pub size_pt: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<RGBColor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    /// Bold on top of the body style
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    pub bullet: bool,
}

/// Text content of a text box or table cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBody {
    pub paragraphs: Vec<Paragraph>,
    pub style: RunStyle,
    pub align: TextAlign,
    pub wrap: bool,
}

/// Picture crop in thousandths of a percent of the source (`a:srcRect`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SrcRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl SrcRect {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCell {
    pub text: String,
    pub fill: Option<RGBColor>,
    pub style: RunStyle,
}

/// Table grid and cell content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableSpec {
    pub column_widths: Vec<i64>,
    pub row_height: i64,
    pub rows: Vec<Vec<TableCell>>,
    /// Marks the first row as a header row (`a:tblPr/@firstRow`)
    pub header_row: bool,
}

fn srgb(color: RGBColor) -> XmlNode {
    XmlNode::new("a:srgbClr").with_attr("val", color.to_hex())
}

fn prst_geom(geometry: PresetGeometry) -> XmlNode {
    XmlNode::new("a:prstGeom")
        .with_attr("prst", geometry.preset_name())
        .with_child(XmlNode::new("a:avLst"))
}

fn c_nv_pr(id: u32, name: &str) -> XmlNode {
    XmlNode::new("p:cNvPr")
        .with_num_attr("id", id)
        .with_attr("name", name)
}

fn run_properties(style: &RunStyle, bold: bool) -> XmlNode {
    let mut rpr = XmlNode::new("a:rPr").with_attr("lang", "en-US");
    if let Some(size) = style.size_pt {
        rpr.set_attr("sz", pt_to_centipoints(size).to_string());
    }
    if bold || style.bold {
        rpr.set_attr("b", "1");
    }
    if style.italic {
        rpr.set_attr("i", "1");
    }
    rpr.set_attr("dirty", "0");
    if let Some(color) = style.color {
        rpr.push(XmlNode::new("a:solidFill").with_child(srgb(color)));
    }
    if let Some(ref font) = style.font {
        rpr.push(XmlNode::new("a:latin").with_attr("typeface", font.as_str()));
        rpr.push(XmlNode::new("a:cs").with_attr("typeface", font.as_str()));
    }
    rpr
}

fn paragraph_node(paragraph: &Paragraph, style: &RunStyle, align: TextAlign) -> XmlNode {
    let mut ppr = XmlNode::new("a:pPr");
    if paragraph.bullet {
        ppr.set_attr("marL", "285750");
        ppr.set_attr("indent", "-285750");
    }
    ppr.set_attr("algn", align.xml_value());
    if paragraph.bullet {
        ppr.push(XmlNode::new("a:buFont").with_attr("typeface", "Arial"));
        ppr.push(XmlNode::new("a:buChar").with_attr("char", "\u{2022}"));
    } else {
        ppr.push(XmlNode::new("a:buNone"));
    }

    let mut p = XmlNode::new("a:p").with_child(ppr);
    for run in &paragraph.runs {
        p.push(
            XmlNode::new("a:r")
                .with_child(run_properties(style, run.bold))
                .with_child(XmlNode::new("a:t").with_text(run.text.as_str())),
        );
    }
    if paragraph.runs.is_empty() {
        p.push(XmlNode::new("a:endParaRPr").with_attr("lang", "en-US"));
    }
    p
}

fn text_body_node(name: &str, body: &TextBody) -> XmlNode {
    let body_pr = XmlNode::new("a:bodyPr")
        .with_attr("wrap", if body.wrap { "square" } else { "none" })
        .with_attr("rtlCol", "0")
        .with_child(XmlNode::new("a:normAutofit"));

    let mut tx_body = XmlNode::new(name)
        .with_child(body_pr)
        .with_child(XmlNode::new("a:lstStyle"));
    for paragraph in &body.paragraphs {
        tx_body.push(paragraph_node(paragraph, &body.style, body.align));
    }
    if body.paragraphs.is_empty() {
        tx_body.push(paragraph_node(&Paragraph::default(), &body.style, body.align));
    }
    tx_body
}

/// `p:sp` text box.
pub(crate) fn text_box_node(id: u32, xfrm: Transform, body: &TextBody) -> XmlNode {
    XmlNode::new("p:sp")
        .with_child(
            XmlNode::new("p:nvSpPr")
                .with_child(c_nv_pr(id, &format!("TextBox {}", id)))
                .with_child(XmlNode::new("p:cNvSpPr").with_attr("txBox", "1"))
                .with_child(XmlNode::new("p:nvPr")),
        )
        .with_child(
            XmlNode::new("p:spPr")
                .with_child(xfrm.to_node("a:xfrm"))
                .with_child(prst_geom(PresetGeometry::Rectangle))
                .with_child(XmlNode::new("a:noFill")),
        )
        .with_child(text_body_node("p:txBody", body))
}

/// `p:sp` preset-geometry shape.
pub(crate) fn auto_shape_node(
    id: u32,
    geometry: PresetGeometry,
    xfrm: Transform,
    fill: &Fill,
    line: Option<&LineStyle>,
) -> XmlNode {
    let ln = match line {
        Some(line) => XmlNode::new("a:ln")
            .with_num_attr("w", line.width_emu.max(0))
            .with_child(XmlNode::new("a:solidFill").with_child(srgb(line.color))),
        None => XmlNode::new("a:ln").with_child(XmlNode::new("a:noFill")),
    };

    XmlNode::new("p:sp")
        .with_child(
            XmlNode::new("p:nvSpPr")
                .with_child(c_nv_pr(id, &format!("Shape {}", id)))
                .with_child(XmlNode::new("p:cNvSpPr"))
                .with_child(XmlNode::new("p:nvPr")),
        )
        .with_child(
            XmlNode::new("p:spPr")
                .with_child(xfrm.to_node("a:xfrm"))
                .with_child(prst_geom(geometry))
                .with_child(fill.to_node())
                .with_child(ln),
        )
}

/// `p:pic` referencing an image relationship.
pub(crate) fn picture_node(
    id: u32,
    r_id: &str,
    xfrm: Transform,
    description: &str,
    crop: Option<SrcRect>,
) -> XmlNode {
    let mut blip_fill = XmlNode::new("p:blipFill")
        .with_child(XmlNode::new("a:blip").with_attr("r:embed", r_id));
    if let Some(crop) = crop.filter(|c| !c.is_empty()) {
        blip_fill.push(
            XmlNode::new("a:srcRect")
                .with_num_attr("l", crop.left)
                .with_num_attr("t", crop.top)
                .with_num_attr("r", crop.right)
                .with_num_attr("b", crop.bottom),
        );
    }
    blip_fill.push(XmlNode::new("a:stretch").with_child(XmlNode::new("a:fillRect")));

    XmlNode::new("p:pic")
        .with_child(
            XmlNode::new("p:nvPicPr")
                .with_child(c_nv_pr(id, &format!("Picture {}", id)).with_attr("descr", description))
                .with_child(
                    XmlNode::new("p:cNvPicPr").with_child(
                        XmlNode::new("a:picLocks").with_attr("noChangeAspect", "1"),
                    ),
                )
                .with_child(XmlNode::new("p:nvPr")),
        )
        .with_child(blip_fill)
        .with_child(
            XmlNode::new("p:spPr")
                .with_child(xfrm.to_node("a:xfrm"))
                .with_child(prst_geom(PresetGeometry::Rectangle)),
        )
}

fn graphic_frame(id: u32, name: &str, xfrm: Transform, uri: &str, data: XmlNode) -> XmlNode {
    XmlNode::new("p:graphicFrame")
        .with_child(
            XmlNode::new("p:nvGraphicFramePr")
                .with_child(c_nv_pr(id, name))
                .with_child(
                    XmlNode::new("p:cNvGraphicFramePr").with_child(
                        XmlNode::new("a:graphicFrameLocks").with_attr("noGrp", "1"),
                    ),
                )
                .with_child(XmlNode::new("p:nvPr")),
        )
        .with_child(xfrm.to_node("p:xfrm"))
        .with_child(
            XmlNode::new("a:graphic").with_child(
                XmlNode::new("a:graphicData")
                    .with_attr("uri", uri)
                    .with_child(data),
            ),
        )
}

/// `p:graphicFrame` hosting a chart part.
pub(crate) fn chart_frame_node(id: u32, r_id: &str, xfrm: Transform) -> XmlNode {
    let chart = XmlNode::new("c:chart")
        .with_attr("xmlns:c", ns::DML_CHART)
        .with_attr("r:id", r_id);
    graphic_frame(id, &format!("Chart {}", id), xfrm, ns::DML_CHART, chart)
}

/// `p:graphicFrame` hosting an inline table.
pub(crate) fn table_frame_node(id: u32, xfrm: Transform, table: &TableSpec) -> XmlNode {
    let mut tbl_pr = XmlNode::new("a:tblPr");
    if table.header_row {
        tbl_pr.set_attr("firstRow", "1");
    }
    tbl_pr.set_attr("bandRow", "1");

    let grid = XmlNode::new("a:tblGrid").with_children(
        table
            .column_widths
            .iter()
            .map(|w| XmlNode::new("a:gridCol").with_num_attr("w", (*w).max(0))),
    );

    let mut tbl = XmlNode::new("a:tbl").with_child(tbl_pr).with_child(grid);
    for row in &table.rows {
        let mut tr = XmlNode::new("a:tr").with_num_attr("h", table.row_height.max(0));
        for cell in row {
            let body = TextBody {
                paragraphs: vec![Paragraph {
                    runs: vec![TextRun {
                        text: cell.text.clone(),
                        bold: false,
                    }],
                    bullet: false,
                }],
                style: cell.style.clone(),
                align: TextAlign::Left,
                wrap: true,
            };
            let mut tc_pr = XmlNode::new("a:tcPr").with_attr("anchor", "ctr");
            if let Some(fill) = cell.fill {
                tc_pr.push(XmlNode::new("a:solidFill").with_child(srgb(fill)));
            }
            tr.push(
                XmlNode::new("a:tc")
                    .with_child(text_body_node("a:txBody", &body))
                    .with_child(tc_pr),
            );
        }
        tbl.push(tr);
    }

    graphic_frame(id, &format!("Table {}", id), xfrm, ns::DML_TABLE, tbl)
}

/// Colour nodes backing the fill of a shape properties element.
///
/// Returns the `a:srgbClr` of an `a:solidFill`, or the one inside every
/// `a:gs` stop of an `a:gradFill`. Other fills yield nothing.
pub fn fill_color_nodes_mut(sp_pr: &mut XmlNode) -> Vec<&mut XmlNode> {
    let mut colors = Vec::new();
    for fill in sp_pr.children_mut().iter_mut() {
        if fill.name() == "a:solidFill" {
            colors.extend(
                fill.children_mut()
                    .iter_mut()
                    .filter(|c| c.name() == "a:srgbClr"),
            );
        } else if fill.name() == "a:gradFill" {
            if let Some(stops) = fill.child_mut("a:gsLst") {
                for stop in stops.children_mut().iter_mut() {
                    colors.extend(
                        stop.children_mut()
                            .iter_mut()
                            .filter(|c| c.name() == "a:srgbClr"),
                    );
                }
            }
        }
    }
    colors
}

/// Write a transparency (`0` opaque .. `100000` invisible) onto a colour node.
///
/// DrawingML stores opacity, so the `a:alpha` child receives
/// `100000 - transparency`; a fully opaque colour carries no `a:alpha`.
pub fn set_color_alpha(color: &mut XmlNode, transparency: u32) {
    let transparency = transparency.min(PERCENT_100);
    if transparency == 0 {
        if let Some(index) = color.children().iter().position(|c| c.name() == "a:alpha") {
            color.remove(index);
        }
        return;
    }
    color
        .child_or_insert("a:alpha")
        .set_attr("val", (PERCENT_100 - transparency).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> RGBColor {
        RGBColor::new(255, 0, 0)
    }

    #[test]
    fn test_auto_shape_solid_fill_alpha() {
        let mut node = auto_shape_node(
            2,
            PresetGeometry::Oval,
            Transform::new(0, 0, 100, 100),
            &Fill::Solid(red()),
            None,
        );
        let sp_pr = node.child_mut("p:spPr").unwrap();
        let mut colors = fill_color_nodes_mut(sp_pr);
        assert_eq!(colors.len(), 1);
        set_color_alpha(colors[0], 25_000);
        set_color_alpha(colors[0], 50_000);

        let xml = node.to_xml_string().unwrap();
        assert!(xml.contains(r#"<a:srgbClr val="FF0000"><a:alpha val="50000"/></a:srgbClr>"#));
        assert!(xml.contains(r#"prst="ellipse""#));
        assert!(xml.contains("<a:ln><a:noFill/></a:ln>"));
    }

    #[test]
    fn test_gradient_stops_each_get_alpha() {
        let fill = Fill::Gradient {
            stops: vec![red(), RGBColor::WHITE],
            angle_deg: 90.0,
        };
        let mut node = auto_shape_node(
            3,
            PresetGeometry::Rectangle,
            Transform::default(),
            &fill,
            Some(&LineStyle {
                color: RGBColor::BLACK,
                width_emu: 12_700,
            }),
        );
        let sp_pr = node.child_mut("p:spPr").unwrap();
        for color in fill_color_nodes_mut(sp_pr) {
            set_color_alpha(color, 75_000);
        }
        let xml = node.to_xml_string().unwrap();
        assert_eq!(xml.matches(r#"<a:alpha val="25000"/>"#).count(), 2);
        assert!(xml.contains(r#"<a:gs pos="100000">"#));
        assert!(xml.contains(r#"<a:lin ang="5400000" scaled="0"/>"#));
        // The outline colour is not part of the fill.
        assert!(xml.contains(r#"<a:ln w="12700"><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:ln>"#));
    }

    #[test]
    fn test_opaque_alpha_removes_node() {
        let mut color = srgb(red());
        set_color_alpha(&mut color, 40_000);
        set_color_alpha(&mut color, 0);
        assert!(color.is_empty());
    }

    #[test]
    fn test_text_box_bullets_and_bold_runs() {
        let body = TextBody {
            paragraphs: vec![Paragraph {
                runs: vec![
                    TextRun {
                        text: "plain ".into(),
                        bold: false,
                    },
                    TextRun {
                        text: "strong".into(),
                        bold: true,
                    },
                ],
                bullet: true,
            }],
            style: RunStyle {
                font: Some("Arial".into()),
                size_pt: Some(20.0),
                color: Some(RGBColor::new(0x21, 0x21, 0x21)),
                ..Default::default()
            },
            align: TextAlign::Center,
            wrap: true,
        };
        let xml = text_box_node(4, Transform::default(), &body)
            .to_xml_string()
            .unwrap();
        assert!(xml.contains(r#"<a:buChar char="•"/>"#));
        assert!(xml.contains(r#"algn="ctr""#));
        assert_eq!(xml.matches(r#" b="1""#).count(), 1);
        assert!(xml.contains(r#"sz="2000""#));
        assert!(xml.contains(r#"<a:latin typeface="Arial"/>"#));
    }

    #[test]
    fn test_picture_crop() {
        let crop = SrcRect {
            left: 12_500,
            right: 12_500,
            ..Default::default()
        };
        let xml = picture_node(5, "rId2", Transform::default(), "sky", Some(crop))
            .to_xml_string()
            .unwrap();
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/><a:srcRect l="12500" t="0" r="12500" b="0"/>"#));

        let uncropped = picture_node(5, "rId2", Transform::default(), "", Some(SrcRect::default()))
            .to_xml_string()
            .unwrap();
        assert!(!uncropped.contains("a:srcRect"));
    }

    #[test]
    fn test_table_frame() {
        let table = TableSpec {
            column_widths: vec![100, 200],
            row_height: 50,
            rows: vec![vec![
                TableCell {
                    text: "A".into(),
                    fill: Some(red()),
                    ..Default::default()
                },
                TableCell {
                    text: "B".into(),
                    ..Default::default()
                },
            ]],
            header_row: true,
        };
        let xml = table_frame_node(6, Transform::default(), &table)
            .to_xml_string()
            .unwrap();
        assert!(xml.contains(r#"<a:tblPr firstRow="1" bandRow="1"/>"#));
        assert_eq!(xml.matches("<a:gridCol").count(), 2);
        assert!(xml.contains(r#"<a:tcPr anchor="ctr"><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></a:tcPr>"#));
    }

    #[test]
    fn test_preset_geometry_parse() {
        assert_eq!(PresetGeometry::parse("Rounded Rectangle"), Some(PresetGeometry::RoundedRectangle));
        assert_eq!(PresetGeometry::parse("hexagon"), None);
    }
}
