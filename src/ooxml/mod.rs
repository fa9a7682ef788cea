//! Office Open XML package writing.
//!
//! Only the PresentationML subset needed to emit decks is implemented: the
//! OPC container ([`opc`]) and the slide, chart and theme parts ([`pptx`]).

pub mod error;
pub mod opc;
pub mod pptx;

pub use error::{OoxmlError, Result};
