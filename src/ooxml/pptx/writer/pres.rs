/// Presentation writer for PPTX.
use crate::common::unit::{EMUS_PER_PX_96, px_to_emu};
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{PackageWriter, Relationships};
use crate::ooxml::pptx::template::{
    PML_NAMESPACES, ThemePart, XML_DECLARATION, blank_layout_xml, slide_master_xml,
};
use std::fmt::Write as FmtWrite;
use std::path::Path;

use super::slide::MutableSlide;

/// First `p:sldId/@id`; lower values are reserved by the format.
const FIRST_SLIDE_ID: u32 = 256;

/// A mutable PowerPoint presentation for writing.
///
/// Provides methods to add slides, set dimensions and the theme, and
/// serialize the whole package.
#[derive(Debug)]
pub struct MutablePresentation {
    /// Slides in the presentation
    pub(crate) slides: Vec<MutableSlide>,
    /// Slide width in EMUs (English Metric Units, 914400 EMU = 1 inch)
    slide_width: i64,
    /// Slide height in EMUs
    slide_height: i64,
    theme: ThemePart,
}

impl MutablePresentation {
    /// Create a new empty presentation.
    ///
    /// Default size is 1280 x 720 px at 96 DPI (13.333" x 7.5", 16:9).
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            slide_width: px_to_emu(1280.0, EMUS_PER_PX_96),
            slide_height: px_to_emu(720.0, EMUS_PER_PX_96),
            theme: ThemePart::default(),
        }
    }

    /// Set the slide size in EMUs.
    pub fn set_slide_size(&mut self, width: i64, height: i64) {
        self.slide_width = width.max(1);
        self.slide_height = height.max(1);
    }

    /// Get the slide width in EMUs.
    pub fn slide_width(&self) -> i64 {
        self.slide_width
    }

    /// Get the slide height in EMUs.
    pub fn slide_height(&self) -> i64 {
        self.slide_height
    }

    /// Replace the theme written to `ppt/theme/theme1.xml`.
    pub fn set_theme(&mut self, theme: ThemePart) {
        self.theme = theme;
    }

    pub fn theme(&self) -> &ThemePart {
        &self.theme
    }

    /// Add a new slide to the presentation.
    pub fn add_slide(&mut self) -> &mut MutableSlide {
        let slide_id = FIRST_SLIDE_ID + self.slides.len() as u32;
        self.slides.push(MutableSlide::new(slide_id));
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    /// Get the number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Get a reference to a slide by index (0-based).
    pub fn slide(&self, index: usize) -> Option<&MutableSlide> {
        self.slides.get(index)
    }

    /// Get a mutable reference to a slide by index (0-based).
    pub fn slide_mut(&mut self, index: usize) -> Option<&mut MutableSlide> {
        self.slides.get_mut(index)
    }

    /// Generate presentation.xml content.
    ///
    /// # Arguments
    /// * `slide_rel_ids` - Relationship IDs of the slides, in slide order
    pub(crate) fn generate_presentation_xml(&self, slide_rel_ids: &[String]) -> Result<String> {
        let mut xml = String::with_capacity(2048);

        xml.push_str(XML_DECLARATION);
        write!(xml, r#"<p:presentation {} saveSubsetFonts="1">"#, PML_NAMESPACES)?;

        xml.push_str("<p:sldMasterIdLst>");
        xml.push_str(r#"<p:sldMasterId id="2147483648" r:id="rId1"/>"#);
        xml.push_str("</p:sldMasterIdLst>");

        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (slide, rel_id) in self.slides.iter().zip(slide_rel_ids) {
                write!(
                    xml,
                    r#"<p:sldId id="{}" r:id="{}"/>"#,
                    slide.slide_id(),
                    rel_id
                )?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/>"#,
            self.slide_width, self.slide_height
        )?;
        xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str("</p:presentation>");

        Ok(xml)
    }

    /// Assemble every part into an OPC package.
    fn to_package(&self) -> Result<PackageWriter> {
        let mut pkg = PackageWriter::new();
        pkg.pkg_rels_mut()
            .add(rt::OFFICE_DOCUMENT, "ppt/presentation.xml");

        let mut pres_rels = Relationships::new();
        pres_rels.add(rt::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
        pres_rels.add(rt::THEME, "theme/theme1.xml");
        let slide_rel_ids: Vec<String> = (1..=self.slides.len())
            .map(|n| pres_rels.add(rt::SLIDE, format!("slides/slide{}.xml", n)))
            .collect();

        pkg.add_part(
            "/ppt/presentation.xml",
            ct::PML_PRESENTATION_MAIN,
            self.generate_presentation_xml(&slide_rel_ids)?.into_bytes(),
        );
        pkg.add_part_rels("/ppt/presentation.xml", &pres_rels);

        let master = "/ppt/slideMasters/slideMaster1.xml";
        pkg.add_part(master, ct::PML_SLIDE_MASTER, slide_master_xml().into_bytes());
        let mut master_rels = Relationships::new();
        master_rels.add(rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        master_rels.add(rt::THEME, "../theme/theme1.xml");
        pkg.add_part_rels(master, &master_rels);

        let layout = "/ppt/slideLayouts/slideLayout1.xml";
        pkg.add_part(layout, ct::PML_SLIDE_LAYOUT, blank_layout_xml().into_bytes());
        let mut layout_rels = Relationships::new();
        layout_rels.add(rt::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
        pkg.add_part_rels(layout, &layout_rels);

        pkg.add_part(
            "/ppt/theme/theme1.xml",
            ct::OFC_THEME,
            self.theme.to_xml()?.into_bytes(),
        );

        // Media and charts are numbered across the whole deck.
        let mut image_count = 0usize;
        let mut chart_count = 0usize;
        for (index, slide) in self.slides.iter().enumerate() {
            let partname = format!("/ppt/slides/slide{}.xml", index + 1);
            pkg.add_part(&partname, ct::PML_SLIDE, slide.to_xml()?.into_bytes());

            let mut image_targets = Vec::with_capacity(slide.images.len());
            for image in &slide.images {
                image_count += 1;
                let name = format!("image{}.{}", image_count, image.format.extension());
                pkg.add_part(
                    &format!("/ppt/media/{}", name),
                    image.format.mime_type(),
                    image.data.clone(),
                );
                image_targets.push(format!("../media/{}", name));
            }

            let mut chart_targets = Vec::with_capacity(slide.charts.len());
            for chart in &slide.charts {
                chart_count += 1;
                let name = format!("chart{}.xml", chart_count);
                pkg.add_part(
                    &format!("/ppt/charts/{}", name),
                    ct::DML_CHART,
                    chart.to_xml()?.into_bytes(),
                );
                chart_targets.push(format!("../charts/{}", name));
            }

            let rels = slide.rels.to_relationships(
                |i| image_targets.get(i).cloned().unwrap_or_default(),
                |i| chart_targets.get(i).cloned().unwrap_or_default(),
            );
            pkg.add_part_rels(&partname, &rels);
        }

        Ok(pkg)
    }

    /// Serialize the presentation to PPTX bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_package()?.to_bytes()
    }

    /// Save the presentation to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_package()?.write(path)
    }
}

impl Default for MutablePresentation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RGBColor;
    use crate::ooxml::pptx::chart::{ChartKind, ChartPart};
    use crate::ooxml::pptx::writer::shape::{Fill, PresetGeometry, Transform};
    use std::io::{Cursor, Read};

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_create_presentation() {
        let pres = MutablePresentation::new();
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_width(), 12_192_000);
        assert_eq!(pres.slide_height(), 6_858_000);
    }

    #[test]
    fn test_slide_ids() {
        let mut pres = MutablePresentation::new();
        assert_eq!(pres.add_slide().slide_id(), 256);
        assert_eq!(pres.add_slide().slide_id(), 257);
        assert_eq!(pres.slide_count(), 2);
    }

    #[test]
    fn test_package_parts() {
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide();
        slide.add_auto_shape(
            PresetGeometry::Rectangle,
            Transform::new(0, 0, 10, 10),
            &Fill::Solid(RGBColor::WHITE),
            None,
        );
        slide.add_chart(ChartPart::new(ChartKind::Pie), Transform::default());
        pres.add_slide().add_chart(ChartPart::new(ChartKind::Line), Transform::default());

        let bytes = pres.to_bytes().unwrap();

        let presentation = read_entry(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains(r#"<p:sldId id="256" r:id="rId3"/>"#));
        assert!(presentation.contains(r#"<p:sldId id="257" r:id="rId4"/>"#));
        assert!(presentation.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));

        let slide2_rels = read_entry(&bytes, "ppt/slides/_rels/slide2.xml.rels");
        assert!(slide2_rels.contains("../charts/chart2.xml"));
        assert!(slide2_rels.contains("../slideLayouts/slideLayout1.xml"));

        let types = read_entry(&bytes, "[Content_Types].xml");
        assert!(types.contains(r#"PartName="/ppt/charts/chart1.xml""#));
        assert!(types.contains(r#"PartName="/ppt/theme/theme1.xml""#));
    }

    #[test]
    fn test_save_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let mut pres = MutablePresentation::new();
        pres.add_slide();
        pres.save(&path).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"PK"));
    }
}
