//! Deck assembly: theme resolution, paint order, element rendering and
//! animation timelines on top of the PPTX writer.

pub mod animation;
pub mod assembler;
pub mod config;
pub mod error;
pub mod layer;
pub mod provider;
pub mod raster;
pub mod render;
pub mod style;
pub mod theme;

pub use animation::{AnimationEffect, AnimationTimelineBuilder};
pub use assembler::{AssemblyReport, DeckBuilder, PageAssembler};
pub use config::{BuilderConfig, LayerPriorities};
pub use error::{DeckError, Result};
pub use layer::LayerOrderResolver;
pub use provider::{
    DirectoryImageProvider, FsIconLibrary, IconProvider, ImageProvider, NoResources,
    ResourceHandle,
};
pub use render::{RenderContext, RenderedShape, render_element};
pub use style::{ResolvedStyle, StyleAndGeometryMapper};
pub use theme::{ResolvedTheme, ThemeStyleResolver};
