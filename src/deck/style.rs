//! Geometry conversion and style resolution against the theme.

use super::theme::ResolvedTheme;
use crate::common::RGBColor;
use crate::common::unit::{PERCENT_100, px_to_emu};
use crate::ooxml::pptx::{RunStyle, TextAlign, Transform};
use crate::plan::{Element, ElementStyle};
use log::warn;

/// Concrete style of one element after merging its overrides over the theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub color: RGBColor,
    pub font: String,
    pub size_pt: f64,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
    pub wrap: bool,
    /// Transparency, `0` opaque .. `100000` invisible; `None` when opaque by default
    pub alpha: Option<u32>,
}

impl ResolvedStyle {
    pub fn run_style(&self) -> RunStyle {
        RunStyle {
            font: Some(self.font.clone()),
            size_pt: Some(self.size_pt),
            bold: self.bold,
            italic: self.italic,
            color: Some(self.color),
        }
    }
}

/// Converts an opacity in `[0, 1]` to transparency: `round((1 - opacity) * 100000)`.
///
/// Values outside the range (or NaN) are ignored and logged; the element stays
/// fully opaque.
///
/// The result is a transparency, not the DrawingML `<a:alpha val>`: that
/// attribute stores opacity, so
/// [`set_color_alpha`](crate::ooxml::pptx::writer::shape::set_color_alpha)
/// writes `100000 - transparency` (opacity 0.8 gives 20000 here and
/// `val="80000"` in the slide).
pub fn opacity_to_alpha(opacity: f64) -> Option<u32> {
    if !(0.0..=1.0).contains(&opacity) {
        warn!("Opacity {} outside [0, 1], treating as opaque", opacity);
        return None;
    }
    let alpha = ((1.0 - opacity) * PERCENT_100 as f64).round();
    Some(alpha.clamp(0.0, PERCENT_100 as f64) as u32)
}

/// Maps plan geometry and style requests onto package values.
#[derive(Debug, Clone, Copy)]
pub struct StyleAndGeometryMapper<'a> {
    theme: &'a ResolvedTheme,
    emu_per_px: i64,
    default_font_size_pt: f64,
}

impl<'a> StyleAndGeometryMapper<'a> {
    pub fn new(theme: &'a ResolvedTheme, emu_per_px: i64, default_font_size_pt: f64) -> Self {
        Self {
            theme,
            emu_per_px,
            default_font_size_pt,
        }
    }

    pub fn theme(&self) -> &'a ResolvedTheme {
        self.theme
    }

    pub fn px_to_emu(&self, px: f64) -> i64 {
        if !px.is_finite() {
            warn!("Non-finite coordinate {}, using 0", px);
            return 0;
        }
        px_to_emu(px, self.emu_per_px)
    }

    /// Position and size of an element in EMUs; negative sizes become zero.
    pub fn transform(&self, element: &Element) -> Transform {
        Transform::new(
            self.px_to_emu(element.x),
            self.px_to_emu(element.y),
            self.px_to_emu(element.width).max(0),
            self.px_to_emu(element.height).max(0),
        )
    }

    /// Colour from a hex string or a palette role name.
    ///
    /// Unparseable values are logged and replaced by `fallback`.
    pub fn resolve_color(&self, value: Option<&str>, fallback: RGBColor) -> RGBColor {
        let Some(value) = value else {
            return fallback;
        };
        RGBColor::from_hex(value)
            .or_else(|| self.theme.color_for_role(value))
            .unwrap_or_else(|| {
                warn!("Invalid colour '{}', using #{}", value, fallback.to_hex());
                fallback
            })
    }

    /// Explicit font name, else the font of the requested role, else `role_default`.
    pub fn resolve_font(&self, style: &ElementStyle, role_default: &str) -> String {
        if let Some(name) = style.font_name.as_deref().map(str::trim)
            && !name.is_empty()
        {
            return name.to_string();
        }
        let role = style.font_role.as_deref().unwrap_or(role_default);
        match self.theme.font_for_role(role) {
            Some(font) => font.to_string(),
            None => {
                warn!("Unknown font role '{}', using body font", role);
                self.theme.body_font.clone()
            },
        }
    }

    /// Transparency requested by the element, if any.
    pub fn alpha(&self, style: &ElementStyle) -> Option<u32> {
        style.opacity.and_then(opacity_to_alpha)
    }

    /// Merge text overrides over the theme.
    pub fn resolve_text_style(&self, style: &ElementStyle) -> ResolvedStyle {
        let size_pt = match style.font_size {
            Some(size) if size.is_finite() && size > 0.0 => size,
            Some(size) => {
                warn!(
                    "Invalid font size {}, using {}",
                    size, self.default_font_size_pt
                );
                self.default_font_size_pt
            },
            None => self.default_font_size_pt,
        };
        let align = match style.alignment.as_deref() {
            Some(value) => TextAlign::parse(value).unwrap_or_else(|| {
                warn!("Unknown alignment '{}', using left", value);
                TextAlign::Left
            }),
            None => TextAlign::Left,
        };

        ResolvedStyle {
            color: self.resolve_color(style.color.as_deref(), self.theme.text),
            font: self.resolve_font(style, "body"),
            size_pt,
            bold: style.bold.unwrap_or(false),
            italic: style.italic.unwrap_or(false),
            align,
            wrap: style.word_wrap.unwrap_or(true),
            alpha: self.alpha(style),
        }
    }
}
