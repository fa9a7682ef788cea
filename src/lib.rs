//! Deckweave - assembles PowerPoint decks from structured design plans.
//!
//! A [`plan::DeckPlan`] describes a theme and a list of pages made of typed
//! visual elements (text boxes, images, shapes, charts, tables and icons) plus
//! an optional click-by-click animation script per page. [`deck::DeckBuilder`]
//! resolves the theme, renders every element in paint order onto a slide of an
//! in-crate PPTX package writer, and then synthesizes the slide's
//! `p:timing` tree for the requested entrance and exit effects.
//!
//! # Example
//!
//! ```no_run
//! use deckweave::deck::{BuilderConfig, DeckBuilder};
//! use deckweave::plan::DeckPlan;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let plan = DeckPlan::from_json_file("plan.json")?;
//! let mut builder = DeckBuilder::new(BuilderConfig::default());
//! builder.build(&plan);
//! builder.save("deck.pptx")?;
//! # Ok(())
//! # }
//! ```
//!
//! Image and icon resources come from injected providers; see
//! [`deck::provider`].

pub mod common;
pub mod deck;
pub mod ooxml;
pub mod plan;
