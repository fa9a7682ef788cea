//! Slide timing (`p:timing`) for click-triggered entrance and exit effects.
//!
//! A slide's timing tree has one root time node, one main click sequence and
//! a build list. Every effect appended to the main sequence is a
//! self-contained `p:par` fragment:
//!
//! ```text
//! p:par / p:cTn (click trigger, delay="indefinite")
//!   p:par / p:cTn (zero-delay wrapper)
//!     p:par / p:cTn (clickEffect, presetID/presetClass/presetSubtype)
//!       behaviours: visibility set, animEffect filter, anim keyframes
//! ```
//!
//! Time node ids are handed out in blocks of [`ID_BLOCK_SIZE`] per click so
//! that fragments never share an id.

use crate::common::xml::XmlNode;
use crate::common::unit::PERCENT_100;
use std::ops::Range;

/// Id of the first block; 1 and 2 belong to the root and main sequence nodes.
pub const FIRST_BLOCK_ID: u32 = 3;

/// Time node ids reserved per click. A fragment uses at most six.
pub const ID_BLOCK_SIZE: u32 = 10;

pub const DEFAULT_DURATION_MS: u32 = 500;

/// Build group every effect is registered under.
pub const BUILD_GROUP_ID: u32 = 0;

/// Path from `p:timing` to the child list of the main click sequence.
const MAIN_SEQUENCE_PATH: [&str; 7] = [
    "p:tnLst",
    "p:par",
    "p:cTn",
    "p:childTnLst",
    "p:seq",
    "p:cTn",
    "p:childTnLst",
];

/// Effect kinds that can be synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    FadeIn,
    FadeOut,
    FlyIn,
    FlyOut,
    DissolveIn,
}

impl EffectKind {
    /// Parse an effect name such as `fadeIn` or `fly_out` (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "fadein" => Some(EffectKind::FadeIn),
            "fadeout" => Some(EffectKind::FadeOut),
            "flyin" => Some(EffectKind::FlyIn),
            "flyout" => Some(EffectKind::FlyOut),
            "dissolvein" => Some(EffectKind::DissolveIn),
            _ => None,
        }
    }

    /// Preset ID as defined in ECMA-376 Part 1.
    pub fn preset_id(&self) -> u32 {
        match self {
            EffectKind::FadeIn | EffectKind::FadeOut => 10,
            EffectKind::FlyIn | EffectKind::FlyOut => 2,
            EffectKind::DissolveIn => 9,
        }
    }

    pub fn preset_class(&self) -> &'static str {
        if self.is_exit() { "exit" } else { "entr" }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, EffectKind::FadeOut | EffectKind::FlyOut)
    }

    /// Whether the effect takes a [`FlyDirection`].
    pub fn is_directional(&self) -> bool {
        matches!(self, EffectKind::FlyIn | EffectKind::FlyOut)
    }
}

/// Screen edge a fly effect enters from or exits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlyDirection {
    #[default]
    Bottom,
    Left,
    Right,
    Top,
}

/// Position attribute animated by a motion behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn attr_name(&self) -> &'static str {
        match self {
            Axis::X => "ppt_x",
            Axis::Y => "ppt_y",
        }
    }
}

impl FlyDirection {
    /// Parse `fromLeft`, `toLeft` or `left` (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let edge = lower
            .strip_prefix("from")
            .or_else(|| lower.strip_prefix("to"))
            .unwrap_or(&lower);
        match edge.trim_start_matches(['_', '-']) {
            "bottom" => Some(FlyDirection::Bottom),
            "left" => Some(FlyDirection::Left),
            "right" => Some(FlyDirection::Right),
            "top" => Some(FlyDirection::Top),
            _ => None,
        }
    }

    pub fn preset_subtype(&self) -> u32 {
        match self {
            FlyDirection::Top => 1,
            FlyDirection::Right => 2,
            FlyDirection::Bottom => 4,
            FlyDirection::Left => 8,
        }
    }

    /// The axis whose position actually changes.
    pub fn axis(&self) -> Axis {
        match self {
            FlyDirection::Bottom | FlyDirection::Top => Axis::Y,
            FlyDirection::Left | FlyDirection::Right => Axis::X,
        }
    }

    /// Off-screen `(x, y)` start of an entrance, in `#`-prefixed form.
    fn entrance_origin(&self) -> (&'static str, &'static str) {
        match self {
            FlyDirection::Bottom => ("#ppt_x", "1+#ppt_h/2"),
            FlyDirection::Left => ("-#ppt_w", "#ppt_y"),
            FlyDirection::Right => ("1", "#ppt_y"),
            FlyDirection::Top => ("#ppt_x", "-#ppt_h"),
        }
    }

    /// Off-screen `(x, y)` end of an exit.
    fn exit_target(&self) -> (&'static str, &'static str) {
        match self {
            FlyDirection::Bottom => ("ppt_x", "1+ppt_h/2"),
            FlyDirection::Left => ("-ppt_w", "ppt_y"),
            FlyDirection::Right => ("1", "ppt_y"),
            FlyDirection::Top => ("ppt_x", "-ppt_h"),
        }
    }
}

/// Direction of a native filter transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    In,
    Out,
}

/// One behaviour inside a click effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Behavior {
    /// `p:set` of `style.visibility`, one millisecond long.
    Visibility { visible: bool, delay_ms: u32 },
    /// `p:animEffect` running a native filter such as `fade`.
    Filter {
        transition: Transition,
        filter: &'static str,
        duration_ms: u32,
    },
    /// `p:anim` moving a position attribute between two keyframes.
    Motion {
        axis: Axis,
        from: &'static str,
        to: &'static str,
        duration_ms: u32,
        hold: bool,
    },
}

impl Behavior {
    fn to_node(&self, id: u32, shape_id: u32) -> XmlNode {
        match self {
            Behavior::Visibility { visible, delay_ms } => {
                let ctn = XmlNode::new("p:cTn")
                    .with_num_attr("id", id)
                    .with_attr("dur", "1")
                    .with_attr("fill", "hold")
                    .with_child(start_condition(Delay::Ms(*delay_ms)));
                XmlNode::new("p:set")
                    .with_child(behavior_core(ctn, shape_id, Some("style.visibility")))
                    .with_child(XmlNode::new("p:to").with_child(string_value(if *visible {
                        "visible"
                    } else {
                        "hidden"
                    })))
            },
            Behavior::Filter {
                transition,
                filter,
                duration_ms,
            } => {
                let ctn = XmlNode::new("p:cTn")
                    .with_num_attr("id", id)
                    .with_num_attr("dur", *duration_ms);
                XmlNode::new("p:animEffect")
                    .with_attr(
                        "transition",
                        match transition {
                            Transition::In => "in",
                            Transition::Out => "out",
                        },
                    )
                    .with_attr("filter", *filter)
                    .with_child(behavior_core(ctn, shape_id, None))
            },
            Behavior::Motion {
                axis,
                from,
                to,
                duration_ms,
                hold,
            } => {
                let mut ctn = XmlNode::new("p:cTn")
                    .with_num_attr("id", id)
                    .with_num_attr("dur", *duration_ms);
                if *hold {
                    ctn.set_attr("fill", "hold");
                }
                let keyframe = |tm: u32, value: &str| {
                    XmlNode::new("p:tav")
                        .with_num_attr("tm", tm)
                        .with_child(XmlNode::new("p:val").with_child(string_value(value)))
                };
                XmlNode::new("p:anim")
                    .with_attr("calcmode", "lin")
                    .with_attr("valueType", "num")
                    .with_child(
                        behavior_core(ctn, shape_id, Some(axis.attr_name()))
                            .with_attr("additive", "base"),
                    )
                    .with_child(
                        XmlNode::new("p:tavLst")
                            .with_child(keyframe(0, from))
                            .with_child(keyframe(PERCENT_100, to)),
                    )
            },
        }
    }
}

enum Delay {
    Indefinite,
    Ms(u32),
}

fn start_condition(delay: Delay) -> XmlNode {
    let cond = match delay {
        Delay::Indefinite => XmlNode::new("p:cond").with_attr("delay", "indefinite"),
        Delay::Ms(ms) => XmlNode::new("p:cond").with_num_attr("delay", ms),
    };
    XmlNode::new("p:stCondLst").with_child(cond)
}

fn string_value(value: &str) -> XmlNode {
    XmlNode::new("p:strVal").with_attr("val", value)
}

/// `p:cBhvr` targeting a shape, with an optional animated attribute.
fn behavior_core(ctn: XmlNode, shape_id: u32, attr: Option<&str>) -> XmlNode {
    let mut core = XmlNode::new("p:cBhvr").with_child(ctn).with_child(
        XmlNode::new("p:tgtEl").with_child(XmlNode::new("p:spTgt").with_num_attr("spid", shape_id)),
    );
    if let Some(attr) = attr {
        core.push(
            XmlNode::new("p:attrNameLst").with_child(XmlNode::new("p:attrName").with_text(attr)),
        );
    }
    core
}

/// A complete click effect for one shape, before it is lowered to XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectFragment {
    pub kind: EffectKind,
    pub shape_id: u32,
    pub first_id: u32,
    pub duration_ms: u32,
    pub direction: Option<FlyDirection>,
    pub behaviors: Vec<Behavior>,
}

impl EffectFragment {
    /// Build the fragment for `kind`.
    ///
    /// # Arguments
    /// * `kind` - Effect to synthesize
    /// * `shape_id` - Target shape (`spid`)
    /// * `first_id` - First time node id of the allocated block
    /// * `duration_ms` - Effect duration, at least 1
    /// * `direction` - Fly edge; ignored by non-directional effects
    pub fn build(
        kind: EffectKind,
        shape_id: u32,
        first_id: u32,
        duration_ms: u32,
        direction: Option<FlyDirection>,
    ) -> Self {
        let duration_ms = duration_ms.max(1);
        let direction = kind
            .is_directional()
            .then(|| direction.unwrap_or_default());
        let edge = direction.unwrap_or_default();
        let hide_at = duration_ms - 1;

        let behaviors = match kind {
            EffectKind::FadeIn | EffectKind::DissolveIn => vec![
                Behavior::Visibility {
                    visible: true,
                    delay_ms: 0,
                },
                Behavior::Filter {
                    transition: Transition::In,
                    filter: if kind == EffectKind::FadeIn {
                        "fade"
                    } else {
                        "dissolve"
                    },
                    duration_ms,
                },
            ],
            EffectKind::FadeOut => vec![
                Behavior::Filter {
                    transition: Transition::Out,
                    filter: "fade",
                    duration_ms,
                },
                Behavior::Visibility {
                    visible: false,
                    delay_ms: hide_at,
                },
            ],
            EffectKind::FlyIn => {
                let (x, y) = edge.entrance_origin();
                vec![
                    Behavior::Visibility {
                        visible: true,
                        delay_ms: 0,
                    },
                    Behavior::Motion {
                        axis: Axis::X,
                        from: x,
                        to: "#ppt_x",
                        duration_ms,
                        hold: true,
                    },
                    Behavior::Motion {
                        axis: Axis::Y,
                        from: y,
                        to: "#ppt_y",
                        duration_ms,
                        hold: true,
                    },
                ]
            },
            EffectKind::FlyOut => {
                let (x, y) = edge.exit_target();
                vec![
                    Behavior::Motion {
                        axis: Axis::X,
                        from: "ppt_x",
                        to: x,
                        duration_ms,
                        hold: false,
                    },
                    Behavior::Motion {
                        axis: Axis::Y,
                        from: "ppt_y",
                        to: y,
                        duration_ms,
                        hold: false,
                    },
                    Behavior::Visibility {
                        visible: false,
                        delay_ms: hide_at,
                    },
                ]
            },
        };

        Self {
            kind,
            shape_id,
            first_id,
            duration_ms,
            direction,
            behaviors,
        }
    }

    /// Time node ids this fragment occupies.
    pub fn ids(&self) -> Range<u32> {
        self.first_id..self.first_id + 3 + self.behaviors.len() as u32
    }

    /// The motion behaviour on `axis`, if any.
    pub fn motion(&self, axis: Axis) -> Option<(&'static str, &'static str)> {
        self.behaviors.iter().find_map(|b| match b {
            Behavior::Motion {
                axis: a, from, to, ..
            } if *a == axis => Some((*from, *to)),
            _ => None,
        })
    }

    /// Lower the fragment to its `p:par` element.
    pub fn to_node(&self) -> XmlNode {
        let n = self.first_id;
        let subtype = self.direction.map_or(0, |d| d.preset_subtype());

        let behaviors = self
            .behaviors
            .iter()
            .enumerate()
            .map(|(i, b)| b.to_node(n + 3 + i as u32, self.shape_id));

        let effect = XmlNode::new("p:cTn")
            .with_num_attr("id", n + 2)
            .with_num_attr("presetID", self.kind.preset_id())
            .with_attr("presetClass", self.kind.preset_class())
            .with_num_attr("presetSubtype", subtype)
            .with_attr("fill", "hold")
            .with_num_attr("grpId", BUILD_GROUP_ID)
            .with_attr("nodeType", "clickEffect")
            .with_child(start_condition(Delay::Ms(0)))
            .with_child(XmlNode::new("p:childTnLst").with_children(behaviors));

        let wrapper = XmlNode::new("p:cTn")
            .with_num_attr("id", n + 1)
            .with_attr("fill", "hold")
            .with_child(start_condition(Delay::Ms(0)))
            .with_child(
                XmlNode::new("p:childTnLst").with_child(XmlNode::new("p:par").with_child(effect)),
            );

        let click = XmlNode::new("p:cTn")
            .with_num_attr("id", n)
            .with_attr("fill", "hold")
            .with_child(start_condition(Delay::Indefinite))
            .with_child(
                XmlNode::new("p:childTnLst").with_child(XmlNode::new("p:par").with_child(wrapper)),
            );

        XmlNode::new("p:par").with_child(click)
    }
}

/// The empty timing skeleton: root node, main click sequence, build list.
pub fn timing_skeleton() -> XmlNode {
    let slide_target = || XmlNode::new("p:tgtEl").with_child(XmlNode::new("p:sldTgt"));

    let main_seq = XmlNode::new("p:seq")
        .with_attr("concurrent", "1")
        .with_attr("nextAc", "seek")
        .with_child(
            XmlNode::new("p:cTn")
                .with_attr("id", "2")
                .with_attr("dur", "indefinite")
                .with_attr("nodeType", "mainSeq")
                .with_child(XmlNode::new("p:childTnLst")),
        )
        .with_child(
            XmlNode::new("p:prevCondLst").with_child(
                XmlNode::new("p:cond")
                    .with_attr("evt", "onPrev")
                    .with_attr("delay", "0")
                    .with_child(slide_target()),
            ),
        )
        .with_child(
            XmlNode::new("p:nextCondLst").with_child(
                XmlNode::new("p:cond")
                    .with_attr("evt", "onNext")
                    .with_attr("delay", "0")
                    .with_child(slide_target()),
            ),
        );

    let root = XmlNode::new("p:par").with_child(
        XmlNode::new("p:cTn")
            .with_attr("id", "1")
            .with_attr("dur", "indefinite")
            .with_attr("restart", "never")
            .with_attr("nodeType", "tmRoot")
            .with_child(XmlNode::new("p:childTnLst").with_child(main_seq)),
    );

    XmlNode::new("p:timing")
        .with_child(XmlNode::new("p:tnLst").with_child(root))
        .with_child(XmlNode::new("p:bldLst"))
}

/// Child list of the main click sequence.
pub fn main_sequence(timing: &XmlNode) -> Option<&XmlNode> {
    timing.find_path(&MAIN_SEQUENCE_PATH)
}

pub fn main_sequence_mut(timing: &mut XmlNode) -> Option<&mut XmlNode> {
    timing.find_path_mut(&MAIN_SEQUENCE_PATH)
}

/// First id of the next block: `clicks * 10 + 3`.
pub fn next_block_id(sequence: &XmlNode) -> u32 {
    sequence.len() as u32 * ID_BLOCK_SIZE + FIRST_BLOCK_ID
}

/// Add a `p:bldP` for `shape_id` unless one exists. Returns whether it was added.
pub fn register_build(timing: &mut XmlNode, shape_id: u32) -> bool {
    let spid = shape_id.to_string();
    let build_list = timing.child_or_insert("p:bldLst");
    if build_list
        .children()
        .iter()
        .any(|b| b.attr("spid") == Some(spid.as_str()))
    {
        return false;
    }
    build_list.push(
        XmlNode::new("p:bldP")
            .with_attr("spid", spid)
            .with_num_attr("grpId", BUILD_GROUP_ID),
    );
    true
}

/// Shape ids registered in the build list, in order.
pub fn build_entries(timing: &XmlNode) -> Vec<u32> {
    timing
        .child("p:bldLst")
        .map(|list| {
            list.children()
                .iter()
                .filter_map(|b| b.attr("spid")?.parse().ok())
                .collect()
        })
        .unwrap_or_default()
}
