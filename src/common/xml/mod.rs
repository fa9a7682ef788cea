//! XML helpers: escaping for hand-written parts and an owned element tree
//! for everything that is edited after it is built.

mod escape;
mod node;

pub use escape::escape_xml;
pub use node::XmlNode;
