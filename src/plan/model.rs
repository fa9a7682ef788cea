//! Canonical deck plan types.
//!
//! These are what the deck builder consumes. Input documents are first read
//! into the looser shapes in [`super::normalize`] and converted here, so the
//! builder never sees a palette list, a bare content string or an unknown
//! element type.

use serde::Deserialize;
use std::fmt;

/// A complete, already-decided presentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckPlan {
    pub theme: ThemeSpec,
    pub pages: Vec<Page>,
}

/// Raw theme values; colours are validated when the theme is resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeSpec {
    pub palette: PaletteSpec,
    pub fonts: FontPair,
}

/// The five palette roles as given in the plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaletteSpec {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub background: Option<String>,
    pub text: Option<String>,
    pub accent: Option<String>,
}

impl PaletteSpec {
    /// Build from a positional list: primary, secondary, background, text, accent.
    pub fn from_list(values: Vec<String>) -> Self {
        let mut iter = values.into_iter();
        Self {
            primary: iter.next(),
            secondary: iter.next(),
            background: iter.next(),
            text: iter.next(),
            accent: iter.next(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FontPair {
    pub heading: Option<String>,
    pub body: Option<String>,
}

/// One slide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub title: Option<String>,
    /// Background colour override (hex or palette role)
    pub background: Option<String>,
    pub elements: Vec<Element>,
    pub animation_sequence: Vec<AnimationStep>,
}

/// A positioned visual element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Explicit paint-order priority
    #[serde(default, alias = "layer_priority")]
    pub z_index: Option<i64>,
    #[serde(default)]
    pub style: ElementStyle,
    #[serde(flatten)]
    pub kind: ElementKind,
}

/// Type-specific payload, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    TextBox {
        #[serde(default)]
        content: TextContent,
    },
    Image {
        #[serde(alias = "keyword")]
        image_keyword: String,
        /// `circle` for a circular crop
        #[serde(default)]
        crop: Option<String>,
        /// Pin to the bottom of the paint order
        #[serde(default)]
        background: bool,
    },
    Shape {
        #[serde(default)]
        shape_type: Option<String>,
    },
    Chart {
        #[serde(default)]
        chart_type: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        data: ChartData,
    },
    Table {
        #[serde(default)]
        headers: Vec<CellValue>,
        #[serde(default)]
        rows: Vec<Vec<CellValue>>,
    },
    Icon {
        #[serde(alias = "keyword")]
        icon_keyword: String,
    },
}

impl ElementKind {
    /// The `type` tag of the element.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::TextBox { .. } => "text_box",
            ElementKind::Image { .. } => "image",
            ElementKind::Shape { .. } => "shape",
            ElementKind::Chart { .. } => "chart",
            ElementKind::Table { .. } => "table",
            ElementKind::Icon { .. } => "icon",
        }
    }
}

/// Text content: one paragraph, or one bullet paragraph per entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TextContent {
    Single(String),
    Bullets(Vec<String>),
}

impl Default for TextContent {
    fn default() -> Self {
        TextContent::Single(String::new())
    }
}

/// Chart data in either category/series or label/value form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartData {
    pub categories: Vec<String>,
    pub series: Vec<SeriesData>,
    /// Pie slice labels
    pub labels: Vec<String>,
    /// Pie slice values
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeriesData {
    pub name: String,
    pub values: Vec<f64>,
}

/// A table cell as written in the plan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Empty(()),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Empty(()) => Ok(()),
        }
    }
}

/// Style overrides; every field falls back to the theme.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ElementStyle {
    /// Explicit font name, wins over `font_role`
    pub font_name: Option<String>,
    /// `heading` or `body`
    #[serde(alias = "font")]
    pub font_role: Option<String>,
    pub font_size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Text colour: hex or palette role
    pub color: Option<String>,
    pub alignment: Option<String>,
    pub word_wrap: Option<bool>,
    /// `0.0` transparent .. `1.0` opaque
    pub opacity: Option<f64>,
    pub fill_color: Option<String>,
    pub gradient: Option<GradientSpec>,
    pub line_color: Option<String>,
    /// Border width in points
    pub line_width: Option<f64>,
    pub data_labels: Option<bool>,
    pub legend_position: Option<String>,
    /// Alternating body-row colours for tables
    #[serde(alias = "zebra_colors")]
    pub zebra: Option<Vec<String>>,
}

/// Two-stop linear gradient.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GradientSpec {
    pub start: Option<String>,
    pub end: Option<String>,
    /// Direction in degrees, 0 is left to right
    pub angle: Option<f64>,
}

/// One click of a page's animation script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimationStep {
    pub element_id: String,
    pub animation: AnimationSpec,
}

/// Effect parameters as written; parsed and defaulted by the deck builder.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub duration_ms: Option<f64>,
    pub direction: Option<String>,
}
