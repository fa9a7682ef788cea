/// Relationship ID mapper for slide parts.
///
/// Relationship IDs are handed out eagerly, when a picture or chart is placed
/// on a slide, so the shape XML can reference them immediately. Part names are
/// only known once the whole deck is serialized and media gets its global
/// number; the mapper keeps the slide-local index until then.
use crate::ooxml::opc::Relationships;
use crate::ooxml::opc::constants::relationship_type as rt;

/// Target of a slide relationship before package part names are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideRelTarget {
    /// The blank slide layout (always `rId1`)
    Layout,
    /// N-th image placed on the slide
    Image(usize),
    /// N-th chart placed on the slide
    Chart(usize),
}

/// Maps relationship IDs of one slide to their pending targets.
#[derive(Debug, Clone)]
pub struct RelationshipMapper {
    entries: Vec<(String, SlideRelTarget)>,
}

impl Default for RelationshipMapper {
    fn default() -> Self {
        Self {
            entries: vec![("rId1".to_string(), SlideRelTarget::Layout)],
        }
    }
}

impl RelationshipMapper {
    /// Create a mapper with the layout relationship reserved as `rId1`.
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, target: SlideRelTarget) -> String {
        let r_id = format!("rId{}", self.entries.len() + 1);
        self.entries.push((r_id.clone(), target));
        r_id
    }

    /// Allocate the relationship ID for the `index`-th image of the slide.
    pub fn add_image(&mut self, index: usize) -> String {
        self.allocate(SlideRelTarget::Image(index))
    }

    /// Allocate the relationship ID for the `index`-th chart of the slide.
    pub fn add_chart(&mut self, index: usize) -> String {
        self.allocate(SlideRelTarget::Chart(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SlideRelTarget)> {
        self.entries.iter().map(|(id, target)| (id.as_str(), *target))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve pending targets into the slide's relationships part.
    ///
    /// # Arguments
    /// * `image_target` - Relative target of the slide's N-th image, e.g. `../media/image3.png`
    /// * `chart_target` - Relative target of the slide's N-th chart
    pub fn to_relationships<I, C>(&self, image_target: I, chart_target: C) -> Relationships
    where
        I: Fn(usize) -> String,
        C: Fn(usize) -> String,
    {
        let mut rels = Relationships::new();
        for (r_id, target) in self.iter() {
            match target {
                SlideRelTarget::Layout => {
                    rels.add_with_id(r_id, rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
                },
                SlideRelTarget::Image(index) => {
                    rels.add_with_id(r_id, rt::IMAGE, image_target(index));
                },
                SlideRelTarget::Chart(index) => {
                    rels.add_with_id(r_id, rt::CHART, chart_target(index));
                },
            }
        }
        rels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_allocated_in_order_after_layout() {
        let mut map = RelationshipMapper::new();
        assert_eq!(map.add_image(0), "rId2");
        assert_eq!(map.add_chart(0), "rId3");
        assert_eq!(map.add_image(1), "rId4");
        assert_eq!(map.len(), 4);

        let rels = map.to_relationships(
            |i| format!("../media/image{}.png", i + 10),
            |i| format!("../charts/chart{}.xml", i + 1),
        );
        assert_eq!(rels.get("rId1").unwrap().reltype(), rt::SLIDE_LAYOUT);
        assert_eq!(rels.get("rId4").unwrap().target_ref(), "../media/image11.png");
        assert_eq!(rels.get("rId3").unwrap().target_ref(), "../charts/chart1.xml");
    }
}
