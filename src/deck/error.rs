/// Error types for deck assembly.
use crate::ooxml::OoxmlError;
use thiserror::Error;

/// Result type for deck operations.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Errors surfaced by plan loading, configuration and saving.
///
/// Element and animation problems during a build are logged and absorbed;
/// these variants only reach callers from loading and [`super::DeckBuilder::save`],
/// or from the individual raster helpers.
#[derive(Error, Debug)]
pub enum DeckError {
    /// Package serialization error
    #[error("Package error: {0}")]
    Package(#[from] OoxmlError),

    /// Malformed deck plan
    #[error("Plan error: {0}")]
    Plan(#[from] serde_json::Error),

    /// Malformed builder configuration
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raster decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// SVG parsing or rasterization error
    #[error("SVG error: {0}")]
    Svg(String),
}
