use super::{inspector_metadata, Color, Modifier};
use crate::modifier_nodes::BackgroundElement;

impl Modifier {
    /// Fills the node's bounds with `color` behind the content.
    pub fn background(self, color: Color) -> Self {
        let modifier = Self::with_element(BackgroundElement::new(color)).with_inspector_metadata(
            inspector_metadata("background", |info| {
                info.add_property("color", format!("{color:?}"));
            }),
        );
        self.then(modifier)
    }
}
