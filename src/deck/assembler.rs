//! Page and deck assembly.
//!
//! A page is assembled in three phases: background, elements in paint order,
//! then the animation script. Element ids are only meaningful within their
//! page; the id to shape map is discarded once the page is done.

use super::animation::AnimationTimelineBuilder;
use super::config::BuilderConfig;
use super::error::Result;
use super::layer::LayerOrderResolver;
use super::provider::{IconProvider, ImageProvider, NoResources};
use super::render::{RenderContext, describe, render_element};
use super::style::StyleAndGeometryMapper;
use super::theme::{ResolvedTheme, ThemeStyleResolver};
use crate::ooxml::pptx::{MutablePresentation, MutableSlide};
use crate::plan::{DeckPlan, Page};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;

/// Outcome of assembling one or more pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    pub pages: usize,
    pub rendered: usize,
    /// Elements a renderer declined
    pub skipped: usize,
    /// Clicks added to timing trees
    pub animations: usize,
}

impl AssemblyReport {
    fn merge(&mut self, other: AssemblyReport) {
        self.pages += other.pages;
        self.rendered += other.rendered;
        self.skipped += other.skipped;
        self.animations += other.animations;
    }
}

/// Renders a single page onto a slide.
pub struct PageAssembler<'a> {
    ctx: RenderContext<'a>,
    layers: LayerOrderResolver,
    timeline: AnimationTimelineBuilder,
}

impl<'a> PageAssembler<'a> {
    pub fn new(
        ctx: RenderContext<'a>,
        layers: LayerOrderResolver,
        timeline: AnimationTimelineBuilder,
    ) -> Self {
        Self {
            ctx,
            layers,
            timeline,
        }
    }

    /// Assemble `page` onto `slide`.
    ///
    /// # Arguments
    /// * `slide` - Freshly added slide to draw on
    /// * `page` - Page content and animation script
    pub fn assemble(&self, slide: &mut MutableSlide, page: &Page) -> AssemblyReport {
        let theme = self.ctx.mapper.theme();
        if let Some(ref title) = page.title {
            info!("Assembling slide {}: {}", slide.slide_id(), title);
        }

        let background = self
            .ctx
            .mapper
            .resolve_color(page.background.as_deref(), theme.background);
        slide.set_background_color(background);

        let mut report = AssemblyReport {
            pages: 1,
            ..Default::default()
        };
        let mut shape_ids: HashMap<String, u32> = HashMap::new();
        for element in self.layers.order(&page.elements) {
            let Some(shape) = render_element(&self.ctx, slide, element) else {
                warn!("Skipped {}", describe(element));
                report.skipped += 1;
                continue;
            };
            report.rendered += 1;
            if let Some(ref id) = element.id
                && shape_ids.insert(id.clone(), shape.id).is_some()
            {
                warn!("Duplicate element id '{}', animations target the later one", id);
            }
        }

        report.animations = self
            .timeline
            .apply_sequence(slide, &page.animation_sequence, &shape_ids);
        debug!(
            "Slide {}: {} rendered, {} skipped, {} animation steps",
            slide.slide_id(),
            report.rendered,
            report.skipped,
            report.animations
        );
        report
    }
}

/// Builds a presentation from a [`DeckPlan`].
///
/// ```rust
/// use deckweave::deck::{BuilderConfig, DeckBuilder};
/// use deckweave::plan::DeckPlan;
///
/// let plan = DeckPlan::from_json_str(r#"{"pages": [{"elements": [
///     {"type": "text_box", "id": "t", "content": "Hello", "x": 0, "y": 0, "width": 400, "height": 80}
/// ]}]}"#).unwrap();
/// let mut builder = DeckBuilder::new(BuilderConfig::default());
/// let report = builder.build(&plan);
/// assert_eq!(report.rendered, 1);
/// assert_eq!(builder.presentation().slide_count(), 1);
/// ```
pub struct DeckBuilder {
    config: BuilderConfig,
    images: Box<dyn ImageProvider>,
    icons: Box<dyn IconProvider>,
    presentation: MutablePresentation,
}

impl DeckBuilder {
    /// A builder without image or icon resources.
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            config,
            images: Box::new(NoResources),
            icons: Box::new(NoResources),
            presentation: MutablePresentation::new(),
        }
    }

    pub fn with_image_provider(mut self, provider: impl ImageProvider + 'static) -> Self {
        self.images = Box::new(provider);
        self
    }

    pub fn with_icon_provider(mut self, provider: impl IconProvider + 'static) -> Self {
        self.icons = Box::new(provider);
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Render every page of `plan` into a new presentation.
    ///
    /// Replaces the result of any earlier build. Element and animation
    /// problems are logged and absorbed.
    pub fn build(&mut self, plan: &DeckPlan) -> AssemblyReport {
        let theme: ResolvedTheme = ThemeStyleResolver::resolve(&plan.theme);
        let mapper = StyleAndGeometryMapper::new(
            &theme,
            self.config.emu_per_px,
            self.config.default_font_size_pt,
        );

        let mut presentation = MutablePresentation::new();
        presentation.set_slide_size(
            mapper.px_to_emu(self.config.slide_width_px),
            mapper.px_to_emu(self.config.slide_height_px),
        );
        presentation.set_theme(theme.to_theme_part());

        let assembler = PageAssembler::new(
            RenderContext {
                mapper,
                images: self.images.as_ref(),
                icons: self.icons.as_ref(),
                icon_raster_px: self.config.icon_raster_px,
            },
            LayerOrderResolver::new(self.config.layer_priorities),
            AnimationTimelineBuilder::new(self.config.default_animation_ms),
        );

        let mut report = AssemblyReport::default();
        for page in &plan.pages {
            let slide = presentation.add_slide();
            report.merge(assembler.assemble(slide, page));
        }
        info!(
            "Built {} slides: {} elements rendered, {} skipped, {} animation steps",
            report.pages, report.rendered, report.skipped, report.animations
        );

        self.presentation = presentation;
        report
    }

    /// The presentation produced by the last [`build`](Self::build).
    pub fn presentation(&self) -> &MutablePresentation {
        &self.presentation
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.presentation.to_bytes()?)
    }

    /// Write the presentation to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.presentation.save(path.as_ref())?;
        info!("Saved {}", path.as_ref().display());
        Ok(())
    }
}
