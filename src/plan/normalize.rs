//! Input shapes accepted at the plan boundary and their normalization.
//!
//! A plan may carry its palette as a role map or a positional list, under
//! `theme.palette` or the top-level `color_palette`; fonts likewise under
//! `theme.fonts` or `font_pairing`. Elements are parsed one by one so that a
//! single malformed or unsupported element is dropped instead of failing the
//! whole plan.

use super::model::{
    AnimationStep, DeckPlan, Element, FontPair, Page, PaletteSpec, ThemeSpec,
};
use log::{debug, warn};
use serde::Deserialize;

/// Palette given as a role map or a positional list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum PaletteInput {
    Map(PaletteSpec),
    List(Vec<String>),
}

impl From<PaletteInput> for PaletteSpec {
    fn from(input: PaletteInput) -> Self {
        match input {
            PaletteInput::Map(spec) => spec,
            PaletteInput::List(values) => PaletteSpec::from_list(values),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawTheme {
    #[serde(alias = "color_palette")]
    palette: Option<PaletteInput>,
    #[serde(alias = "font_pairing")]
    fonts: Option<FontPair>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawDeckPlan {
    theme: Option<RawTheme>,
    color_palette: Option<PaletteInput>,
    font_pairing: Option<FontPair>,
    design_concept: Option<String>,
    pages: Vec<RawPage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawPage {
    #[serde(alias = "page_title")]
    title: Option<String>,
    background: Option<String>,
    elements: Vec<serde_json::Value>,
    #[serde(alias = "animations")]
    animation_sequence: Vec<serde_json::Value>,
}

impl From<RawDeckPlan> for DeckPlan {
    fn from(raw: RawDeckPlan) -> Self {
        if let Some(ref concept) = raw.design_concept {
            debug!("Design concept: {}", concept);
        }

        let (theme_palette, theme_fonts) = match raw.theme {
            Some(theme) => (theme.palette, theme.fonts),
            None => (None, None),
        };
        let theme = ThemeSpec {
            palette: theme_palette
                .or(raw.color_palette)
                .map(PaletteSpec::from)
                .unwrap_or_default(),
            fonts: theme_fonts.or(raw.font_pairing).unwrap_or_default(),
        };

        let pages = raw
            .pages
            .into_iter()
            .enumerate()
            .map(|(index, page)| normalize_page(index, page))
            .collect();

        DeckPlan { theme, pages }
    }
}

fn normalize_page(index: usize, raw: RawPage) -> Page {
    let label = raw.title.as_deref().unwrap_or("untitled");

    let elements = raw
        .elements
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match Element::deserialize(value) {
            Ok(element) => Some(element),
            Err(e) => {
                warn!(
                    "Page {} ('{}'): skipping element {}: {}",
                    index + 1,
                    label,
                    i + 1,
                    e
                );
                None
            },
        })
        .collect();

    let animation_sequence = raw
        .animation_sequence
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match AnimationStep::deserialize(value) {
            Ok(step) => Some(step),
            Err(e) => {
                warn!(
                    "Page {} ('{}'): skipping animation step {}: {}",
                    index + 1,
                    label,
                    i + 1,
                    e
                );
                None
            },
        })
        .collect();

    Page {
        title: raw.title,
        background: raw.background,
        elements,
        animation_sequence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::{ElementKind, TextContent};

    fn parse(json: &str) -> DeckPlan {
        serde_json::from_str::<RawDeckPlan>(json).unwrap().into()
    }

    #[test]
    fn test_palette_map_and_list_normalize_alike() {
        let from_map = parse(
            r##"{"color_palette": {"primary": "#112233", "accent": "#445566"},
                 "font_pairing": {"heading": "Georgia"}}"##,
        );
        assert_eq!(from_map.theme.palette.primary.as_deref(), Some("#112233"));
        assert_eq!(from_map.theme.palette.secondary, None);
        assert_eq!(from_map.theme.fonts.heading.as_deref(), Some("Georgia"));

        let from_list = parse(r##"{"theme": {"palette": ["#112233", "#000000", "#FFFFFF"]}}"##);
        assert_eq!(from_list.theme.palette.primary.as_deref(), Some("#112233"));
        assert_eq!(from_list.theme.palette.background.as_deref(), Some("#FFFFFF"));
        assert_eq!(from_list.theme.palette.accent, None);
    }

    #[test]
    fn test_theme_section_wins_over_legacy_keys() {
        let plan = parse(
            r##"{"theme": {"palette": {"primary": "#010101"}},
                 "color_palette": {"primary": "#020202"}}"##,
        );
        assert_eq!(plan.theme.palette.primary.as_deref(), Some("#010101"));
    }

    #[test]
    fn test_bad_elements_are_dropped() {
        let plan = parse(
            r##"{"pages": [{"page_title": "One", "elements": [
                {"type": "text_box", "content": ["a", "b"], "x": 1, "y": 2, "width": 3, "height": 4, "layer_priority": 7},
                {"type": "hologram", "x": 0, "y": 0},
                {"type": "image", "x": 0, "y": 0},
                {"type": "shape", "shape_type": "oval", "id": "s1", "style": {"fill_color": "#FF0000", "line_color": null}}
            ], "animation_sequence": [
                {"element_id": "s1", "animation": {"type": "fadeIn"}},
                {"animation": {"type": "fadeIn"}}
            ]}]}"##,
        );
        let page = &plan.pages[0];
        assert_eq!(page.title.as_deref(), Some("One"));
        assert_eq!(page.elements.len(), 2);
        assert_eq!(page.elements[0].z_index, Some(7));
        assert_eq!(
            page.elements[0].kind,
            ElementKind::TextBox {
                content: TextContent::Bullets(vec!["a".into(), "b".into()])
            }
        );
        assert_eq!(page.elements[1].id.as_deref(), Some("s1"));
        assert_eq!(page.elements[1].style.line_color, None);
        assert_eq!(page.animation_sequence.len(), 1);
    }
}
