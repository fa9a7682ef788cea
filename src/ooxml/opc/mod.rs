/// Open Packaging Conventions (OPC) writing.
///
/// A presentation is a ZIP container of parts, each with a content type
/// declared in `[Content_Types].xml` and linked from its source part through
/// a `.rels` relationship part.
pub mod constants;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use pkgwriter::PackageWriter;
pub use rel::{Relationship, Relationships};
