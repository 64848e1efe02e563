use super::{inspector_metadata, Modifier};
use crate::modifier_nodes::{AlphaElement, ClipToBoundsElement};

impl Modifier {
    /// Multiplies the opacity of the content, clamped to `[0, 1]`.
    pub fn alpha(self, alpha: f32) -> Self {
        let modifier = Self::with_element(AlphaElement::new(alpha)).with_inspector_metadata(
            inspector_metadata("alpha", |info| {
                info.add_property("alpha", alpha.to_string());
            }),
        );
        self.then(modifier)
    }

    /// Clips drawing and pointer areas to the node's bounds.
    pub fn clip_to_bounds(self) -> Self {
        let modifier = Self::with_element(ClipToBoundsElement).with_inspector_metadata(
            inspector_metadata("clipToBounds", |info| {
                info.add_property("clipToBounds", "true");
            }),
        );
        self.then(modifier)
    }
}
