//! Primitives shared by the package writer and the deck layer.

pub mod color;
pub mod unit;
pub mod xml;

pub use color::RGBColor;
pub use xml::{XmlNode, escape_xml};
