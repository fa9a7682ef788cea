//! PowerPoint (.pptx) presentation writing.
//!
//! Presentations are built in memory and serialized in one pass:
//!
//! - [`MutablePresentation`]: slide size, theme and the slide list
//! - [`MutableSlide`]: shapes as structured nodes plus an optional timing tree
//! - [`chart::ChartPart`]: embedded chart parts
//! - [`animations`]: click-triggered effect fragments and the build list
//!
//! # Example
//!
//! ```rust
//! use deckweave::common::RGBColor;
//! use deckweave::ooxml::pptx::{Fill, MutablePresentation, PresetGeometry, Transform};
//!
//! let mut pres = MutablePresentation::new();
//! let slide = pres.add_slide();
//! let handle = slide.add_auto_shape(
//!     PresetGeometry::Oval,
//!     Transform::new(914_400, 914_400, 1_828_800, 1_828_800),
//!     &Fill::Solid(RGBColor::new(0x0D, 0x47, 0xA1)),
//!     None,
//! );
//! slide.set_fill_alpha(handle.id, 40_000);
//! let bytes = pres.to_bytes()?;
//! assert!(bytes.starts_with(b"PK"));
//! # Ok::<(), deckweave::ooxml::OoxmlError>(())
//! ```

pub mod animations;
pub mod chart;
pub mod format;
pub mod template;
pub mod writer;

pub use chart::{ChartKind, ChartPart, ChartSeries, LegendPosition};
pub use format::ImageFormat;
pub use template::ThemePart;
pub use writer::{
    Fill, LineStyle, MutablePresentation, MutableSlide, Paragraph, PresetGeometry, RunStyle,
    ShapeHandle, ShapeKind, SrcRect, TableCell, TableSpec, TextAlign, TextBody, TextRun,
    Transform,
};
