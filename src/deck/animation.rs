//! Click-triggered animation timelines.
//!
//! Steps from a page's animation sequence are appended to the slide's main
//! click sequence in plan order, one click per step. Every animated shape is
//! registered exactly once in the build list.

use crate::common::xml::XmlNode;
use crate::ooxml::pptx::MutableSlide;
use crate::ooxml::pptx::animations::{
    self, EffectFragment, EffectKind, FlyDirection, main_sequence, main_sequence_mut,
};
use crate::plan::{AnimationSpec, AnimationStep};
use log::{debug, warn};
use std::collections::HashMap;
use std::ops::Range;

/// Parsed and defaulted effect parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationEffect {
    pub kind: EffectKind,
    pub duration_ms: u32,
    /// Set only for fly effects
    pub direction: Option<FlyDirection>,
}

impl AnimationEffect {
    /// Parse a plan animation, replacing malformed parameters with defaults.
    ///
    /// Unknown kinds become a fade-in; missing or non-positive durations use
    /// `default_duration_ms`; fly effects without a usable direction fly from
    /// the bottom.
    pub fn from_spec(spec: &AnimationSpec, default_duration_ms: u32) -> Self {
        let kind = EffectKind::parse(&spec.kind).unwrap_or_else(|| {
            warn!("Unknown animation type '{}', using fadeIn", spec.kind);
            EffectKind::FadeIn
        });

        let duration_ms = match spec.duration_ms {
            Some(ms) if ms.is_finite() && ms >= 1.0 => ms.round().min(u32::MAX as f64) as u32,
            Some(ms) => {
                warn!("Invalid animation duration {}, using {}ms", ms, default_duration_ms);
                default_duration_ms.max(1)
            },
            None => default_duration_ms.max(1),
        };

        let direction = if kind.is_directional() {
            Some(match spec.direction.as_deref() {
                Some(name) => FlyDirection::parse(name).unwrap_or_else(|| {
                    warn!("Unknown fly direction '{}', using fromBottom", name);
                    FlyDirection::Bottom
                }),
                None => FlyDirection::Bottom,
            })
        } else {
            if let Some(ref name) = spec.direction {
                debug!("Ignoring direction '{}' for non-fly animation", name);
            }
            None
        };

        Self {
            kind,
            duration_ms,
            direction,
        }
    }
}

/// Builds the `p:timing` tree of a slide one click at a time.
#[derive(Debug, Clone, Copy)]
pub struct AnimationTimelineBuilder {
    default_duration_ms: u32,
}

impl Default for AnimationTimelineBuilder {
    fn default() -> Self {
        Self::new(animations::DEFAULT_DURATION_MS)
    }
}

impl AnimationTimelineBuilder {
    pub fn new(default_duration_ms: u32) -> Self {
        Self {
            default_duration_ms: default_duration_ms.max(1),
        }
    }

    /// The slide's timing tree, creating the skeleton on first use.
    ///
    /// A timing tree without a main click sequence is replaced.
    pub fn get_or_create_timeline<'s>(&self, slide: &'s mut MutableSlide) -> &'s mut XmlNode {
        if slide.timing().is_some_and(|t| main_sequence(t).is_none()) {
            warn!(
                "Slide {} has a timing tree without a main sequence, rebuilding it",
                slide.slide_id()
            );
            slide.set_timing(animations::timing_skeleton());
        }
        slide.timing_or_insert_with(animations::timing_skeleton)
    }

    /// First time node id for the next click appended to `sequence`.
    pub fn allocate_id_block(&self, sequence: &XmlNode) -> u32 {
        animations::next_block_id(sequence)
    }

    /// Build the click fragment for `effect` on `shape_id`.
    pub fn build_effect_fragment(
        &self,
        effect: &AnimationEffect,
        shape_id: u32,
        first_id: u32,
    ) -> EffectFragment {
        EffectFragment::build(
            effect.kind,
            shape_id,
            first_id,
            effect.duration_ms,
            effect.direction,
        )
    }

    /// Register `shape_id` in the build list once. Returns whether it was new.
    pub fn register_build(&self, timeline: &mut XmlNode, shape_id: u32) -> bool {
        animations::register_build(timeline, shape_id)
    }

    /// Append `effect` on `shape_id` as the next click.
    ///
    /// Returns the time node ids the new fragment occupies.
    pub fn add_animation(
        &self,
        slide: &mut MutableSlide,
        shape_id: u32,
        effect: &AnimationEffect,
    ) -> Option<Range<u32>> {
        let timeline = self.get_or_create_timeline(slide);
        let Some(sequence) = main_sequence_mut(timeline) else {
            warn!("Timing tree has no main sequence, dropping animation on shape {}", shape_id);
            return None;
        };
        let first_id = self.allocate_id_block(sequence);
        let fragment = self.build_effect_fragment(effect, shape_id, first_id);
        sequence.push(fragment.to_node());
        self.register_build(timeline, shape_id);

        debug!(
            "Added {:?} on shape {} with time nodes {:?}",
            effect.kind,
            shape_id,
            fragment.ids()
        );
        Some(fragment.ids())
    }

    /// Apply a page's animation steps in order.
    ///
    /// Steps naming an element that was not rendered are dropped and logged.
    /// Returns the number of clicks added.
    pub fn apply_sequence(
        &self,
        slide: &mut MutableSlide,
        steps: &[AnimationStep],
        shape_ids: &HashMap<String, u32>,
    ) -> usize {
        let mut added = 0;
        for step in steps {
            let Some(&shape_id) = shape_ids.get(&step.element_id) else {
                warn!(
                    "Dropping animation for unknown element '{}'",
                    step.element_id
                );
                continue;
            };
            let effect = AnimationEffect::from_spec(&step.animation, self.default_duration_ms);
            if self.add_animation(slide, shape_id, &effect).is_some() {
                added += 1;
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::MutablePresentation;
    use crate::ooxml::pptx::animations::{Axis, build_entries};
    use proptest::prelude::*;

    fn spec(kind: &str, duration_ms: Option<f64>, direction: Option<&str>) -> AnimationSpec {
        AnimationSpec {
            kind: kind.to_string(),
            duration_ms,
            direction: direction.map(String::from),
        }
    }

    fn step(element_id: &str, kind: &str) -> AnimationStep {
        AnimationStep {
            element_id: element_id.to_string(),
            animation: spec(kind, None, None),
        }
    }

    #[test]
    fn test_effect_defaults() {
        let effect = AnimationEffect::from_spec(&spec("spin", Some(-5.0), Some("left")), 400);
        assert_eq!(
            effect,
            AnimationEffect {
                kind: EffectKind::FadeIn,
                duration_ms: 400,
                direction: None,
            }
        );

        let effect = AnimationEffect::from_spec(&spec("flyIn", Some(750.4), Some("sideways")), 400);
        assert_eq!(effect.duration_ms, 750);
        assert_eq!(effect.direction, Some(FlyDirection::Bottom));
    }

    #[test]
    fn test_timeline_creation_is_idempotent() {
        let builder = AnimationTimelineBuilder::default();
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide();

        let first = builder.get_or_create_timeline(slide).to_xml_string().unwrap();
        let second = builder.get_or_create_timeline(slide).to_xml_string().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.matches("<p:timing>").count(), 1);
        assert_eq!(first.matches(r#"nodeType="mainSeq""#).count(), 1);
    }

    #[test]
    fn test_unknown_steps_are_dropped() {
        let builder = AnimationTimelineBuilder::new(500);
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide();
        let ids = HashMap::from([("title".to_string(), 2), ("chart".to_string(), 3)]);

        let steps = [
            step("title", "fadeIn"),
            step("missing", "fadeIn"),
            step("chart", "flyIn"),
        ];
        assert_eq!(builder.apply_sequence(slide, &steps, &ids), 2);

        let timing = slide.timing().unwrap();
        assert_eq!(main_sequence(timing).unwrap().len(), 2);
        assert_eq!(build_entries(timing), [2, 3]);
    }

    #[test]
    fn test_repeated_shape_has_single_build_entry() {
        let builder = AnimationTimelineBuilder::new(500);
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide();
        let fade_in = AnimationEffect::from_spec(&spec("fadeIn", None, None), 500);
        let fade_out = AnimationEffect::from_spec(&spec("fadeOut", None, None), 500);

        assert_eq!(builder.add_animation(slide, 4, &fade_in), Some(3..8));
        assert_eq!(builder.add_animation(slide, 4, &fade_out), Some(13..18));
        assert_eq!(build_entries(slide.timing().unwrap()), [4]);
    }

    #[test]
    fn test_fly_in_from_left_moves_x_only() {
        let builder = AnimationTimelineBuilder::new(500);
        let effect = AnimationEffect::from_spec(&spec("flyIn", None, Some("fromLeft")), 500);
        let fragment = builder.build_effect_fragment(&effect, 9, 3);
        assert_eq!(fragment.motion(Axis::X), Some(("-#ppt_w", "#ppt_x")));
        assert_eq!(fragment.motion(Axis::Y), Some(("#ppt_y", "#ppt_y")));

        let xml = fragment.to_node().to_xml_string().unwrap();
        assert!(xml.contains(r#"presetClass="entr" presetSubtype="8""#));
    }

    fn effect_strategy() -> impl Strategy<Value = AnimationEffect> {
        let kinds = prop::sample::select(vec![
            EffectKind::FadeIn,
            EffectKind::FadeOut,
            EffectKind::FlyIn,
            EffectKind::FlyOut,
            EffectKind::DissolveIn,
        ]);
        let directions = prop::sample::select(vec![
            FlyDirection::Bottom,
            FlyDirection::Left,
            FlyDirection::Right,
            FlyDirection::Top,
        ]);
        (kinds, 1u32..5000, directions).prop_map(|(kind, duration_ms, direction)| {
            AnimationEffect {
                kind,
                duration_ms,
                direction: kind.is_directional().then_some(direction),
            }
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_id_blocks_are_disjoint(
            effects in prop::collection::vec((effect_strategy(), 2u32..20), 1..12)
        ) {
            let builder = AnimationTimelineBuilder::default();
            let mut pres = MutablePresentation::new();
            let slide = pres.add_slide();

            let mut ranges: Vec<Range<u32>> = Vec::new();
            for (effect, shape_id) in &effects {
                let ids = builder.add_animation(slide, *shape_id, effect);
                prop_assert!(ids.is_some());
                ranges.push(ids.unwrap_or(0..0));
            }

            for (i, a) in ranges.iter().enumerate() {
                // Ids 1 and 2 belong to the root and main sequence.
                prop_assert!(a.start >= 3);
                for b in &ranges[i + 1..] {
                    prop_assert!(a.end <= b.start || b.end <= a.start, "{:?} overlaps {:?}", a, b);
                }
            }

            let mut shapes: Vec<u32> = effects.iter().map(|(_, id)| *id).collect();
            shapes.sort_unstable();
            shapes.dedup();
            let mut builds = build_entries(slide.timing().unwrap_or(&XmlNode::new("p:timing")));
            builds.sort_unstable();
            prop_assert_eq!(builds, shapes);
        }
    }
}
