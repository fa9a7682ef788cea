//! Deck plans: the structured input a deck is assembled from.
//!
//! ```rust
//! use deckweave::plan::{DeckPlan, ElementKind};
//!
//! let plan = DeckPlan::from_json_str(r##"{
//!     "color_palette": ["#0D47A1", "#42A5F5"],
//!     "pages": [{"elements": [{"type": "icon", "icon_keyword": "rocket",
//!                              "x": 10, "y": 10, "width": 64, "height": 64}]}]
//! }"##)?;
//! assert!(matches!(plan.pages[0].elements[0].kind, ElementKind::Icon { .. }));
//! # Ok::<(), deckweave::deck::DeckError>(())
//! ```

mod model;
mod normalize;

pub use model::{
    AnimationSpec, AnimationStep, CellValue, ChartData, DeckPlan, Element, ElementKind,
    ElementStyle, FontPair, GradientSpec, Page, PaletteSpec, SeriesData, TextContent, ThemeSpec,
};

use crate::deck::error::Result;
use normalize::RawDeckPlan;
use std::path::Path;

impl DeckPlan {
    /// Parse and normalize a JSON plan.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawDeckPlan = serde_json::from_str(json)?;
        Ok(raw.into())
    }

    /// Read, parse and normalize a JSON plan file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
