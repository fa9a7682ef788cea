//! Relationship collections for package parts.
//!
//! Every part that references another part (a slide pointing at its layout,
//! an image or a chart) owns a set of relationships serialized into a sibling
//! `_rels/<part>.rels` file.

use super::constants::namespace;
use crate::common::xml::escape_xml;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    r_id: String,
    reltype: String,
    target_ref: String,
}

impl Relationship {
    pub fn new(r_id: impl Into<String>, reltype: &str, target_ref: impl Into<String>) -> Self {
        Self {
            r_id: r_id.into(),
            reltype: reltype.to_string(),
            target_ref: target_ref.into(),
        }
    }

    /// Get the relationship ID (e.g., "rId1").
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type URI.
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the target reference, relative to the source part's directory.
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }
}

/// Ordered relationships of one source part.
///
/// IDs are allocated sequentially (`rId1`, `rId2`, ...) unless a caller
/// supplies an id it reserved earlier.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty relationship collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship under the next free `rIdN` and return that id.
    pub fn add(&mut self, reltype: &str, target_ref: impl Into<String>) -> String {
        let r_id = self.next_r_id();
        self.rels
            .push(Relationship::new(r_id.clone(), reltype, target_ref));
        r_id
    }

    /// Add a relationship under a pre-assigned id.
    pub fn add_with_id(&mut self, r_id: &str, reltype: &str, target_ref: impl Into<String>) {
        self.rels.push(Relationship::new(r_id, reltype, target_ref));
    }

    /// Look up a relationship by id.
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id == r_id)
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    fn next_r_id(&self) -> String {
        let max = self
            .rels
            .iter()
            .filter_map(|rel| rel.r_id.strip_prefix("rId")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }

    /// Serialize to the content of a `.rels` part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<Relationships xmlns="{}">"#,
            namespace::OPC_RELATIONSHIPS
        ));

        for rel in &self.rels {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                escape_xml(&rel.r_id),
                escape_xml(&rel.reltype),
                escape_xml(&rel.target_ref)
            ));
        }

        xml.push_str("</Relationships>");

        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as rt;

    #[test]
    fn test_sequential_ids_skip_reserved() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add(rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"), "rId1");
        rels.add_with_id("rId5", rt::IMAGE, "../media/image1.png");
        assert_eq!(rels.add(rt::CHART, "../charts/chart1.xml"), "rId6");
        assert_eq!(rels.len(), 3);
        assert_eq!(rels.get("rId5").map(|r| r.reltype()), Some(rt::IMAGE));
    }

    #[test]
    fn test_to_xml() {
        let mut rels = Relationships::new();
        rels.add(rt::THEME, "theme/theme1.xml");
        let xml = rels.to_xml();
        assert!(xml.contains(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/>"#));
        assert!(xml.ends_with("</Relationships>"));
    }
}
