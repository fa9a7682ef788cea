/// Slide types and implementation for PPTX presentations.
use crate::common::RGBColor;
use crate::common::xml::XmlNode;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::chart::ChartPart;
use crate::ooxml::pptx::template::{PML_NAMESPACES, SP_TREE_GROUP_PROPS, XML_DECLARATION};
use std::fmt::Write as FmtWrite;

use super::super::format::ImageFormat;
use super::relmap::RelationshipMapper;
use super::shape::{
    self, Fill, LineStyle, PresetGeometry, ShapeHandle, ShapeKind, SrcRect, TableSpec, TextBody,
    Transform,
};

/// Image bytes embedded by a slide.
#[derive(Debug, Clone)]
pub(crate) struct SlideImage {
    pub(crate) data: Vec<u8>,
    pub(crate) format: ImageFormat,
}

/// A mutable slide in a presentation.
///
/// Shapes are kept as structured nodes in paint order: the first node is
/// painted first, the last one ends up on top.
#[derive(Debug, Clone)]
pub struct MutableSlide {
    /// Slide ID (unique identifier in `p:sldIdLst`)
    pub(crate) slide_id: u32,
    /// Next shape id; 1 is the shape tree root
    next_shape_id: u32,
    background: Option<RGBColor>,
    shapes: Vec<XmlNode>,
    pub(crate) images: Vec<SlideImage>,
    pub(crate) charts: Vec<ChartPart>,
    pub(crate) rels: RelationshipMapper,
    timing: Option<XmlNode>,
}

impl MutableSlide {
    /// Create a new empty slide.
    pub(crate) fn new(slide_id: u32) -> Self {
        Self {
            slide_id,
            next_shape_id: 2,
            background: None,
            shapes: Vec::new(),
            images: Vec::new(),
            charts: Vec::new(),
            rels: RelationshipMapper::new(),
            timing: None,
        }
    }

    /// Get the slide ID.
    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    /// Fill the slide background with a solid colour.
    pub fn set_background_color(&mut self, color: RGBColor) {
        self.background = Some(color);
    }

    pub fn background_color(&self) -> Option<RGBColor> {
        self.background
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    fn push_shape(&mut self, id: u32, kind: ShapeKind, node: XmlNode) -> ShapeHandle {
        self.shapes.push(node);
        ShapeHandle { id, kind }
    }

    /// Add a text box.
    pub fn add_text_box(&mut self, xfrm: Transform, body: &TextBody) -> ShapeHandle {
        let id = self.next_id();
        let node = shape::text_box_node(id, xfrm, body);
        self.push_shape(id, ShapeKind::TextBox, node)
    }

    /// Add a preset-geometry shape.
    ///
    /// # Arguments
    /// * `geometry` - Preset outline
    /// * `xfrm` - Position and size in EMUs
    /// * `fill` - Shape fill
    /// * `line` - Outline, or `None` for no outline
    pub fn add_auto_shape(
        &mut self,
        geometry: PresetGeometry,
        xfrm: Transform,
        fill: &Fill,
        line: Option<&LineStyle>,
    ) -> ShapeHandle {
        let id = self.next_id();
        let node = shape::auto_shape_node(id, geometry, xfrm, fill, line);
        self.push_shape(id, ShapeKind::AutoShape, node)
    }

    /// Add a picture from encoded image bytes.
    ///
    /// Fails with [`OoxmlError::InvalidFormat`] when the bytes are not a
    /// recognised raster format.
    pub fn add_picture(
        &mut self,
        data: Vec<u8>,
        xfrm: Transform,
        description: &str,
        crop: Option<SrcRect>,
    ) -> Result<ShapeHandle> {
        let format = ImageFormat::detect_from_bytes(&data)
            .ok_or_else(|| OoxmlError::InvalidFormat("unrecognised image data".to_string()))?;

        let r_id = self.rels.add_image(self.images.len());
        self.images.push(SlideImage { data, format });

        let id = self.next_id();
        let node = shape::picture_node(id, &r_id, xfrm, description, crop);
        Ok(self.push_shape(id, ShapeKind::Picture, node))
    }

    /// Add a chart hosted in a graphic frame.
    pub fn add_chart(&mut self, chart: ChartPart, xfrm: Transform) -> ShapeHandle {
        let r_id = self.rels.add_chart(self.charts.len());
        self.charts.push(chart);

        let id = self.next_id();
        let node = shape::chart_frame_node(id, &r_id, xfrm);
        self.push_shape(id, ShapeKind::Chart, node)
    }

    /// Add a table hosted in a graphic frame.
    pub fn add_table(&mut self, table: &TableSpec, xfrm: Transform) -> ShapeHandle {
        let id = self.next_id();
        let node = shape::table_frame_node(id, xfrm, table);
        self.push_shape(id, ShapeKind::Table, node)
    }

    /// Get the number of shapes on the slide.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Shape nodes in paint order.
    pub fn shapes(&self) -> &[XmlNode] {
        &self.shapes
    }

    /// Paint-order index of the shape with the given id.
    pub fn shape_index(&self, id: u32) -> Option<usize> {
        self.shapes.iter().position(|node| shape_id_of(node) == Some(id))
    }

    pub fn shape_node(&self, id: u32) -> Option<&XmlNode> {
        self.shape_index(id).map(|index| &self.shapes[index])
    }

    /// Structured node of a shape, for edits the builders do not cover.
    pub fn shape_node_mut(&mut self, id: u32) -> Option<&mut XmlNode> {
        let index = self.shape_index(id)?;
        self.shapes.get_mut(index)
    }

    /// Detach the shape at a paint-order index.
    pub fn remove_shape_at(&mut self, index: usize) -> Option<XmlNode> {
        (index < self.shapes.len()).then(|| self.shapes.remove(index))
    }

    /// Insert a shape node at a paint-order index, clamped to the shape count.
    pub fn insert_shape_at(&mut self, index: usize, node: XmlNode) {
        let index = index.min(self.shapes.len());
        self.shapes.insert(index, node);
    }

    /// Move a shape to the bottom of the paint order. Returns whether it exists.
    pub fn move_shape_to_back(&mut self, id: u32) -> bool {
        let Some(index) = self.shape_index(id) else {
            return false;
        };
        if let Some(node) = self.remove_shape_at(index) {
            self.insert_shape_at(0, node);
        }
        true
    }

    /// Apply a transparency (`0` opaque .. `100000` invisible) to the fill of a shape.
    ///
    /// Every colour backing the fill is updated: the solid colour, or each
    /// gradient stop. Returns the number of colour nodes touched; zero when the
    /// shape does not exist or has no colour fill.
    pub fn set_fill_alpha(&mut self, id: u32, alpha: u32) -> usize {
        let Some(sp_pr) = self
            .shape_node_mut(id)
            .and_then(|node| node.child_mut("p:spPr"))
        else {
            return 0;
        };
        let colors = shape::fill_color_nodes_mut(sp_pr);
        let count = colors.len();
        for color in colors {
            shape::set_color_alpha(color, alpha);
        }
        count
    }

    /// The slide timing tree, if one was created.
    pub fn timing(&self) -> Option<&XmlNode> {
        self.timing.as_ref()
    }

    pub fn timing_mut(&mut self) -> Option<&mut XmlNode> {
        self.timing.as_mut()
    }

    /// The slide timing tree, created with `init` when absent.
    pub fn timing_or_insert_with(&mut self, init: impl FnOnce() -> XmlNode) -> &mut XmlNode {
        self.timing.get_or_insert_with(init)
    }

    /// Install a timing tree, returning the one it replaces.
    pub fn set_timing(&mut self, timing: XmlNode) -> Option<XmlNode> {
        self.timing.replace(timing)
    }

    /// Generate the slide part XML.
    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(4096);

        xml.push_str(XML_DECLARATION);
        write!(xml, "<p:sld {}>", PML_NAMESPACES)?;
        xml.push_str("<p:cSld>");

        if let Some(color) = self.background {
            write!(
                xml,
                r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
                color.to_hex()
            )?;
        }

        xml.push_str("<p:spTree>");
        xml.push_str(SP_TREE_GROUP_PROPS);
        for node in &self.shapes {
            node.write_into(&mut xml)?;
        }
        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");

        if let Some(ref timing) = self.timing {
            timing.write_into(&mut xml)?;
        }

        xml.push_str("</p:sld>");
        Ok(xml)
    }
}

/// `p:cNvPr/@id` of a top-level shape node.
fn shape_id_of(node: &XmlNode) -> Option<u32> {
    node.children()
        .first()?
        .child("p:cNvPr")?
        .attr("id")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::animations;
    use crate::ooxml::pptx::chart::ChartKind;

    const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];

    fn rect(slide: &mut MutableSlide, color: RGBColor) -> ShapeHandle {
        slide.add_auto_shape(
            PresetGeometry::Rectangle,
            Transform::new(0, 0, 10, 10),
            &Fill::Solid(color),
            None,
        )
    }

    #[test]
    fn test_shape_ids_start_at_two() {
        let mut slide = MutableSlide::new(256);
        let a = rect(&mut slide, RGBColor::BLACK);
        let b = slide.add_text_box(Transform::default(), &TextBody::default());
        assert_eq!(a.id, 2);
        assert_eq!(b.id, 3);
        assert_eq!(b.kind, ShapeKind::TextBox);
        assert_eq!(slide.shape_index(3), Some(1));
    }

    #[test]
    fn test_move_shape_to_back() {
        let mut slide = MutableSlide::new(256);
        rect(&mut slide, RGBColor::BLACK);
        rect(&mut slide, RGBColor::WHITE);
        let pic = slide
            .add_picture(PNG_1X1.to_vec(), Transform::default(), "bg", None)
            .unwrap();
        assert_eq!(slide.shape_index(pic.id), Some(2));

        assert!(slide.move_shape_to_back(pic.id));
        assert_eq!(slide.shape_index(pic.id), Some(0));
        assert_eq!(slide.shape_index(2), Some(1));
        assert!(!slide.move_shape_to_back(99));
    }

    #[test]
    fn test_add_picture_rejects_unknown_bytes() {
        let mut slide = MutableSlide::new(256);
        assert!(slide.add_picture(b"not an image".to_vec(), Transform::default(), "", None).is_err());
        assert_eq!(slide.shape_count(), 0);
        assert!(slide.images.is_empty());
    }

    #[test]
    fn test_set_fill_alpha() {
        let mut slide = MutableSlide::new(256);
        let shape = rect(&mut slide, RGBColor::new(255, 0, 0));
        let text = slide.add_text_box(Transform::default(), &TextBody::default());

        assert_eq!(slide.set_fill_alpha(shape.id, 50_000), 1);
        assert_eq!(slide.set_fill_alpha(text.id, 50_000), 0);
        assert_eq!(slide.set_fill_alpha(42, 50_000), 0);

        let xml = slide.to_xml().unwrap();
        assert!(xml.contains(r#"<a:srgbClr val="FF0000"><a:alpha val="50000"/></a:srgbClr>"#));
    }

    #[test]
    fn test_slide_xml_layout() {
        let mut slide = MutableSlide::new(256);
        slide.set_background_color(RGBColor::new(0xF5, 0xF5, 0xF5));
        slide.add_chart(ChartPart::new(ChartKind::Bar), Transform::default());
        slide.set_timing(animations::timing_skeleton());

        let xml = slide.to_xml().unwrap();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(r#"<a:srgbClr val="F5F5F5"/>"#));
        assert!(xml.contains(r#"<c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="rId2"/>"#));

        let bg = xml.find("<p:bg>").unwrap();
        let tree = xml.find("<p:spTree>").unwrap();
        let clr = xml.find("<p:clrMapOvr>").unwrap();
        let timing = xml.find("<p:timing>").unwrap();
        assert!(bg < tree && tree < clr && clr < timing);
        assert!(xml.ends_with("</p:sld>"));
    }
}
