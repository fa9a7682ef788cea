//! Theme resolution: raw palette and font pair to concrete values.

use crate::common::RGBColor;
use crate::ooxml::pptx::ThemePart;
use crate::plan::{FontPair, PaletteSpec, ThemeSpec};
use log::{info, warn};

pub const DEFAULT_PRIMARY: RGBColor = RGBColor::new(0x0D, 0x47, 0xA1);
pub const DEFAULT_SECONDARY: RGBColor = RGBColor::new(0x42, 0xA5, 0xF5);
pub const DEFAULT_BACKGROUND: RGBColor = RGBColor::new(0xF5, 0xF5, 0xF5);
pub const DEFAULT_TEXT: RGBColor = RGBColor::new(0x21, 0x21, 0x21);
pub const DEFAULT_ACCENT: RGBColor = RGBColor::new(0xFF, 0xC1, 0x07);
pub const DEFAULT_HEADING_FONT: &str = "Calibri";
pub const DEFAULT_BODY_FONT: &str = "Arial";

/// Chart colours after the three theme colours.
pub const SUPPLEMENTARY_CHART_COLORS: [RGBColor; 5] = [
    RGBColor::new(0x4C, 0xAF, 0x50),
    RGBColor::new(0xE9, 0x1E, 0x63),
    RGBColor::new(0x9C, 0x27, 0xB0),
    RGBColor::new(0xFF, 0x57, 0x22),
    RGBColor::new(0x60, 0x7D, 0x8B),
];

/// Concrete theme every element is styled against.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub primary: RGBColor,
    pub secondary: RGBColor,
    pub background: RGBColor,
    pub text: RGBColor,
    pub accent: RGBColor,
    pub heading_font: String,
    pub body_font: String,
    /// Primary, secondary, accent, then the supplementary colours
    pub chart_colors: [RGBColor; 8],
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        ThemeStyleResolver::resolve(&ThemeSpec::default())
    }
}

impl ResolvedTheme {
    /// Colour of a palette role name such as `primary`.
    pub fn color_for_role(&self, role: &str) -> Option<RGBColor> {
        match role.trim().to_ascii_lowercase().as_str() {
            "primary" => Some(self.primary),
            "secondary" => Some(self.secondary),
            "background" => Some(self.background),
            "text" => Some(self.text),
            "accent" => Some(self.accent),
            _ => None,
        }
    }

    /// Font of a role name, `heading` or `body`.
    pub fn font_for_role(&self, role: &str) -> Option<&str> {
        match role.trim().to_ascii_lowercase().as_str() {
            "heading" | "title" => Some(&self.heading_font),
            "body" => Some(&self.body_font),
            _ => None,
        }
    }

    /// Chart colour for a series or slice index, cycling.
    pub fn chart_color(&self, index: usize) -> RGBColor {
        self.chart_colors[index % self.chart_colors.len()]
    }

    /// Package theme part carrying this palette and font pair.
    pub fn to_theme_part(&self) -> ThemePart {
        ThemePart {
            name: "Deck Theme".to_string(),
            dark1: self.text,
            light1: RGBColor::WHITE,
            dark2: self.primary,
            light2: self.background,
            accents: [
                self.primary,
                self.secondary,
                self.accent,
                self.chart_colors[3],
                self.chart_colors[4],
                self.chart_colors[5],
            ],
            major_font: self.heading_font.clone(),
            minor_font: self.body_font.clone(),
        }
    }
}

/// Resolves a plan theme; never fails.
pub struct ThemeStyleResolver;

impl ThemeStyleResolver {
    /// Resolve palette and fonts, replacing missing or malformed colours with
    /// the defaults and logging each replacement.
    pub fn resolve(spec: &ThemeSpec) -> ResolvedTheme {
        let PaletteSpec {
            primary,
            secondary,
            background,
            text,
            accent,
        } = &spec.palette;

        let primary = resolve_color("primary", primary.as_deref(), DEFAULT_PRIMARY);
        let secondary = resolve_color("secondary", secondary.as_deref(), DEFAULT_SECONDARY);
        let background = resolve_color("background", background.as_deref(), DEFAULT_BACKGROUND);
        let text = resolve_color("text", text.as_deref(), DEFAULT_TEXT);
        let accent = resolve_color("accent", accent.as_deref(), DEFAULT_ACCENT);

        let FontPair { heading, body } = &spec.fonts;
        let heading_font = resolve_font(heading.as_deref(), DEFAULT_HEADING_FONT);
        let body_font = resolve_font(body.as_deref(), DEFAULT_BODY_FONT);

        let [c3, c4, c5, c6, c7] = SUPPLEMENTARY_CHART_COLORS;
        ResolvedTheme {
            primary,
            secondary,
            background,
            text,
            accent,
            heading_font,
            body_font,
            chart_colors: [primary, secondary, accent, c3, c4, c5, c6, c7],
        }
    }
}

fn resolve_color(role: &str, value: Option<&str>, default: RGBColor) -> RGBColor {
    match value {
        Some(hex) => RGBColor::from_hex(hex).unwrap_or_else(|| {
            warn!(
                "Invalid {} colour '{}', using #{}",
                role,
                hex,
                default.to_hex()
            );
            default
        }),
        None => {
            info!("Missing {} colour, using #{}", role, default.to_hex());
            default
        },
    }
}

fn resolve_font(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_and_invalid() {
        let spec = ThemeSpec {
            palette: PaletteSpec {
                primary: Some("#123456".into()),
                secondary: Some("not a colour".into()),
                ..Default::default()
            },
            fonts: FontPair {
                heading: Some("  ".into()),
                body: Some("Inter".into()),
            },
        };
        let theme = ThemeStyleResolver::resolve(&spec);
        assert_eq!(theme.primary, RGBColor::new(0x12, 0x34, 0x56));
        assert_eq!(theme.secondary, DEFAULT_SECONDARY);
        assert_eq!(theme.accent, DEFAULT_ACCENT);
        assert_eq!(theme.heading_font, DEFAULT_HEADING_FONT);
        assert_eq!(theme.body_font, "Inter");
    }

    #[test]
    fn test_chart_colors_cycle() {
        let theme = ResolvedTheme::default();
        assert_eq!(theme.chart_color(0), DEFAULT_PRIMARY);
        assert_eq!(theme.chart_color(2), DEFAULT_ACCENT);
        assert_eq!(theme.chart_color(3), SUPPLEMENTARY_CHART_COLORS[0]);
        assert_eq!(theme.chart_color(8), theme.chart_color(0));
        assert_eq!(theme.chart_color(15), SUPPLEMENTARY_CHART_COLORS[4]);
    }

    #[test]
    fn test_role_lookup() {
        let theme = ResolvedTheme::default();
        assert_eq!(theme.color_for_role("Accent"), Some(DEFAULT_ACCENT));
        assert_eq!(theme.color_for_role("#FFFFFF"), None);
        assert_eq!(theme.font_for_role("heading"), Some(DEFAULT_HEADING_FONT));
        assert_eq!(theme.to_theme_part().minor_font, DEFAULT_BODY_FONT);
    }
}
