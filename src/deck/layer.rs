//! Paint order of a page's elements.

use super::config::LayerPriorities;
use crate::plan::Element;

/// Sorts elements into paint order: ascending priority, first painted first.
///
/// An element's priority is its explicit `z_index` when present, otherwise the
/// configured default of its type. The sort is stable, so elements with equal
/// priority keep their plan order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerOrderResolver {
    priorities: LayerPriorities,
}

impl LayerOrderResolver {
    pub fn new(priorities: LayerPriorities) -> Self {
        Self { priorities }
    }

    /// Resolved priority of one element.
    pub fn priority(&self, element: &Element) -> i64 {
        element
            .z_index
            .unwrap_or_else(|| self.priorities.for_kind(&element.kind))
    }

    /// Elements in paint order.
    pub fn order<'a>(&self, elements: &'a [Element]) -> Vec<&'a Element> {
        let mut ordered: Vec<&Element> = elements.iter().collect();
        ordered.sort_by_key(|element| self.priority(element));
        ordered
    }
}
