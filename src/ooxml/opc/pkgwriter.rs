//! Package writer for OPC packages.
//!
//! Parts are collected in memory and serialized in one pass into a ZIP
//! container, with `[Content_Types].xml` and the package relationships
//! written first.

use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::rel::Relationships;
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Package writer that serializes parts to a ZIP file.
///
/// Part names are absolute package URIs such as `/ppt/slides/slide1.xml`.
///
/// # Example
///
/// ```
/// use deckweave::ooxml::opc::PackageWriter;
/// use deckweave::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
///
/// let mut pkg = PackageWriter::new();
/// pkg.pkg_rels_mut().add(rt::OFFICE_DOCUMENT, "ppt/presentation.xml");
/// pkg.add_part("/ppt/presentation.xml", ct::PML_PRESENTATION_MAIN, b"<p:presentation/>".to_vec());
/// let bytes = pkg.to_bytes()?;
/// assert!(bytes.starts_with(b"PK"));
/// # Ok::<(), deckweave::ooxml::OoxmlError>(())
/// ```
#[derive(Debug, Default)]
pub struct PackageWriter {
    parts: Vec<(String, Vec<u8>)>,
    content_types: ContentTypesItem,
    pkg_rels: Relationships,
}

impl PackageWriter {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Package-level relationships (`_rels/.rels`).
    pub fn pkg_rels_mut(&mut self) -> &mut Relationships {
        &mut self.pkg_rels
    }

    /// Add a part and register its content type.
    ///
    /// # Arguments
    /// * `partname` - Absolute part name, e.g. `/ppt/media/image1.png`
    /// * `content_type` - Content type of the part
    /// * `blob` - Serialized part content
    pub fn add_part(&mut self, partname: &str, content_type: &str, blob: Vec<u8>) {
        self.content_types.add_content_type(partname, content_type);
        self.parts.push((partname.to_string(), blob));
    }

    /// Add the relationships of a source part. Empty collections are skipped.
    pub fn add_part_rels(&mut self, partname: &str, rels: &Relationships) {
        if rels.is_empty() {
            return;
        }
        self.parts
            .push((rels_uri(partname), rels.to_xml().into_bytes()));
    }

    /// Number of parts added so far, relationship parts included.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(self.content_types.to_xml().as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(self.pkg_rels.to_xml().as_bytes())?;

        for (partname, blob) in &self.parts {
            zip.start_file(partname.trim_start_matches('/'), options)?;
            zip.write_all(blob)?;
        }

        Ok(zip.finish()?.into_inner())
    }

    /// Serialize the package and write it to a file.
    ///
    /// # Arguments
    /// * `path` - Path where the package should be written
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Zip entry name of the relationships part for `partname`.
///
/// `/ppt/slides/slide1.xml` maps to `/ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_uri(partname: &str) -> String {
    match partname.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", partname),
    }
}

/// Helper for building [Content_Types].xml content.
///
/// Manages Default and Override elements for content type mapping.
#[derive(Debug)]
struct ContentTypesItem {
    /// Default content types by extension
    defaults: BTreeMap<String, String>,

    /// Override content types by partname
    overrides: BTreeMap<String, String>,
}

impl Default for ContentTypesItem {
    fn default() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels".to_string(), ct::OPC_RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), ct::XML.to_string());

        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }
}

impl ContentTypesItem {
    /// Add a content type for a part.
    ///
    /// Well-known media extensions become `Default` entries, everything else
    /// an `Override` for the specific partname.
    fn add_content_type(&mut self, partname: &str, content_type: &str) {
        let ext = partname
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if Self::is_default_content_type(&ext, content_type) {
            self.defaults.insert(ext, content_type.to_string());
        } else {
            self.overrides
                .insert(partname.to_string(), content_type.to_string());
        }
    }

    /// Check if an extension/content-type pair is a standard default.
    fn is_default_content_type(ext: &str, content_type: &str) -> bool {
        matches!(
            (ext, content_type),
            ("rels", ct::OPC_RELATIONSHIPS)
                | ("xml", ct::XML)
                | ("png", ct::PNG)
                | ("jpg", ct::JPEG)
                | ("jpeg", ct::JPEG)
                | ("gif", ct::GIF)
                | ("bmp", ct::BMP)
                | ("tiff", ct::TIFF)
        )
    }

    /// Generate the XML for [Content_Types].xml.
    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(2048);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );

        for (ext, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            ));
        }

        for (partname, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            ));
        }

        xml.push_str("</Types>");

        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as rt;
    use std::io::Read;

    #[test]
    fn test_content_types_xml() {
        let mut cti = ContentTypesItem::default();
        cti.add_content_type("/ppt/media/image1.PNG", ct::PNG);
        cti.add_content_type("/ppt/slides/slide1.xml", ct::PML_SLIDE);

        let xml = cti.to_xml();

        assert!(xml.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(xml.contains(r#"<Override PartName="/ppt/slides/slide1.xml""#));
        assert!(!xml.contains(r#"PartName="/ppt/media/image1.PNG""#));
    }

    #[test]
    fn test_rels_uri() {
        assert_eq!(
            rels_uri("/ppt/slides/slide3.xml"),
            "/ppt/slides/_rels/slide3.xml.rels"
        );
        assert_eq!(
            rels_uri("/ppt/presentation.xml"),
            "/ppt/_rels/presentation.xml.rels"
        );
    }

    #[test]
    fn test_round_trip_through_zip_reader() {
        let mut pkg = PackageWriter::new();
        pkg.pkg_rels_mut()
            .add(rt::OFFICE_DOCUMENT, "ppt/presentation.xml");
        pkg.add_part("/ppt/presentation.xml", ct::PML_PRESENTATION_MAIN, b"<x/>".to_vec());
        let mut rels = Relationships::new();
        rels.add(rt::THEME, "theme/theme1.xml");
        pkg.add_part_rels("/ppt/presentation.xml", &rels);
        pkg.add_part_rels("/ppt/slides/slide1.xml", &Relationships::new());
        assert_eq!(pkg.part_count(), 2);

        let bytes = pkg.to_bytes().unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name("ppt/_rels/presentation.xml.rels")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert!(content.contains("theme/theme1.xml"));
        assert!(archive.by_name("[Content_Types].xml").is_ok());
        assert!(archive.by_name("_rels/.rels").is_ok());
    }
}
