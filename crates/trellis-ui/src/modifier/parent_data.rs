use super::{inspector_metadata, Modifier};
use crate::modifier_nodes::{LayoutIdElement, MatchParentSizeElement, WeightElement};

impl Modifier {
    /// Takes `weight` shares of the main-axis space left in a `Row` or `Column`.
    pub fn weight(self, weight: f32) -> Self {
        self.weight_with_fill(weight, true)
    }

    pub fn weight_with_fill(self, weight: f32, fill: bool) -> Self {
        let modifier = Self::with_element(WeightElement::new(weight, fill))
            .with_inspector_metadata(inspector_metadata("weight", move |info| {
                info.add_property("weight", weight.to_string());
                info.add_property("fill", fill.to_string());
            }));
        self.then(modifier)
    }

    /// Inside a `Stack`, sizes the child to the stack once the other
    /// children are measured.
    pub fn match_parent_size(self) -> Self {
        let modifier = Self::with_element(MatchParentSizeElement).with_inspector_metadata(
            inspector_metadata("matchParentSize", |_| {}),
        );
        self.then(modifier)
    }

    pub fn layout_id(self, id: impl Into<String>) -> Self {
        let id = id.into();
        let info = inspector_metadata("layoutId", |info| {
            info.add_property("layoutId", id.clone());
        });
        self.then(Self::with_element(LayoutIdElement { id }).with_inspector_metadata(info))
    }
}
