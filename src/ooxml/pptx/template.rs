//! Presentation template parts.
//!
//! A deck needs exactly one slide master, one layout and one theme. The master
//! and layout are blank (all styling lives on the slides); the theme is
//! generated from the deck palette so that scheme-colour references and the
//! `+mj-lt`/`+mn-lt` font aliases resolve to the deck's own choices.

use crate::common::RGBColor;
use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Namespace declarations shared by every PresentationML part root.
pub(crate) const PML_NAMESPACES: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

/// Non-visual and geometry properties of a shape tree root (shape id 1).
pub(crate) const SP_TREE_GROUP_PROPS: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

/// Colour and font scheme written to `ppt/theme/theme1.xml`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemePart {
    pub name: String,
    /// Dark text colour (`dk1`)
    pub dark1: RGBColor,
    /// Light background colour (`lt1`)
    pub light1: RGBColor,
    pub dark2: RGBColor,
    pub light2: RGBColor,
    /// `accent1` .. `accent6`
    pub accents: [RGBColor; 6],
    /// Heading font (`majorFont`)
    pub major_font: String,
    /// Body font (`minorFont`)
    pub minor_font: String,
}

impl Default for ThemePart {
    fn default() -> Self {
        Self {
            name: "Office Theme".to_string(),
            dark1: RGBColor::BLACK,
            light1: RGBColor::WHITE,
            dark2: RGBColor::new(0x44, 0x54, 0x6A),
            light2: RGBColor::new(0xE7, 0xE6, 0xE6),
            accents: [
                RGBColor::new(0x44, 0x72, 0xC4),
                RGBColor::new(0xED, 0x7D, 0x31),
                RGBColor::new(0xA5, 0xA5, 0xA5),
                RGBColor::new(0xFF, 0xC0, 0x00),
                RGBColor::new(0x5B, 0x9B, 0xD5),
                RGBColor::new(0x70, 0xAD, 0x47),
            ],
            major_font: "Calibri Light".to_string(),
            minor_font: "Calibri".to_string(),
        }
    }
}

impl ThemePart {
    /// Generate the theme part XML.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        let name = escape_xml(&self.name);

        xml.push_str(XML_DECLARATION);
        write!(
            xml,
            r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="{}">"#,
            name
        )?;
        xml.push_str("<a:themeElements>");

        write!(xml, r#"<a:clrScheme name="{}">"#, name)?;
        write_scheme_color(&mut xml, "dk1", self.dark1)?;
        write_scheme_color(&mut xml, "lt1", self.light1)?;
        write_scheme_color(&mut xml, "dk2", self.dark2)?;
        write_scheme_color(&mut xml, "lt2", self.light2)?;
        for (i, accent) in self.accents.iter().enumerate() {
            write_scheme_color(&mut xml, &format!("accent{}", i + 1), *accent)?;
        }
        write_scheme_color(&mut xml, "hlink", RGBColor::new(0x05, 0x63, 0xC1))?;
        write_scheme_color(&mut xml, "folHlink", RGBColor::new(0x95, 0x4F, 0x72))?;
        xml.push_str("</a:clrScheme>");

        write!(xml, r#"<a:fontScheme name="{}">"#, name)?;
        write!(
            xml,
            r#"<a:majorFont><a:latin typeface="{}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
            escape_xml(&self.major_font)
        )?;
        write!(
            xml,
            r#"<a:minorFont><a:latin typeface="{}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
            escape_xml(&self.minor_font)
        )?;
        xml.push_str("</a:fontScheme>");

        write!(xml, r#"<a:fmtScheme name="{}">"#, name)?;
        let ph_fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
        xml.push_str("<a:fillStyleLst>");
        for _ in 0..3 {
            xml.push_str(ph_fill);
        }
        xml.push_str("</a:fillStyleLst>");
        xml.push_str("<a:lnStyleLst>");
        for width in [6350, 12700, 19050] {
            write!(xml, r#"<a:ln w="{}">{}</a:ln>"#, width, ph_fill)?;
        }
        xml.push_str("</a:lnStyleLst>");
        xml.push_str("<a:effectStyleLst>");
        for _ in 0..3 {
            xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
        }
        xml.push_str("</a:effectStyleLst>");
        xml.push_str("<a:bgFillStyleLst>");
        for _ in 0..3 {
            xml.push_str(ph_fill);
        }
        xml.push_str("</a:bgFillStyleLst>");
        xml.push_str("</a:fmtScheme>");

        xml.push_str("</a:themeElements>");
        xml.push_str("<a:objectDefaults/><a:extraClrSchemeLst/>");
        xml.push_str("</a:theme>");

        Ok(xml)
    }
}

fn write_scheme_color(xml: &mut String, slot: &str, color: RGBColor) -> Result<()> {
    write!(
        xml,
        r#"<a:{slot}><a:srgbClr val="{}"/></a:{slot}>"#,
        color.to_hex()
    )?;
    Ok(())
}

/// Slide master with an empty shape tree and a single blank layout (`rId1`).
pub fn slide_master_xml() -> String {
    let mut xml = String::with_capacity(1536);
    xml.push_str(XML_DECLARATION);
    xml.push_str("<p:sldMaster ");
    xml.push_str(PML_NAMESPACES);
    xml.push('>');
    xml.push_str(r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    xml.push_str("<p:spTree>");
    xml.push_str(SP_TREE_GROUP_PROPS);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(concat!(
        r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" "#,
        r#"accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" "#,
        r#"accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#
    ));
    xml.push_str(r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#);
    xml.push_str("<p:txStyles>");
    xml.push_str(r#"<p:titleStyle><a:lvl1pPr><a:defRPr sz="4400"><a:latin typeface="+mj-lt"/></a:defRPr></a:lvl1pPr></p:titleStyle>"#);
    xml.push_str(r#"<p:bodyStyle><a:lvl1pPr><a:defRPr sz="1800"><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr></p:bodyStyle>"#);
    xml.push_str(r#"<p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr></p:otherStyle>"#);
    xml.push_str("</p:txStyles>");
    xml.push_str("</p:sldMaster>");
    xml
}

/// The blank layout every slide is based on.
pub fn blank_layout_xml() -> String {
    let mut xml = String::with_capacity(768);
    xml.push_str(XML_DECLARATION);
    xml.push_str("<p:sldLayout ");
    xml.push_str(PML_NAMESPACES);
    xml.push_str(r#" type="blank" preserve="1">"#);
    xml.push_str(r#"<p:cSld name="Blank"><p:spTree>"#);
    xml.push_str(SP_TREE_GROUP_PROPS);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_uses_palette_and_fonts() {
        let theme = ThemePart {
            name: "Deck & Co".to_string(),
            dark2: RGBColor::new(0x0D, 0x47, 0xA1),
            major_font: "Georgia".to_string(),
            ..Default::default()
        };
        let xml = theme.to_xml().unwrap();
        assert!(xml.contains(r#"name="Deck &amp; Co""#));
        assert!(xml.contains(r#"<a:dk2><a:srgbClr val="0D47A1"/></a:dk2>"#));
        assert!(xml.contains(r#"<a:majorFont><a:latin typeface="Georgia"/>"#));
        assert_eq!(xml.matches("<a:effectStyle>").count(), 3);
    }

    #[test]
    fn test_master_references_layout() {
        let xml = slide_master_xml();
        assert!(xml.contains(r#"r:id="rId1""#));
        assert!(blank_layout_xml().contains(r#"type="blank""#));
    }
}
