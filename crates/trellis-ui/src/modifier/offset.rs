use super::{inspector_metadata, Modifier};
use crate::modifier_nodes::OffsetElement;

impl Modifier {
    /// Moves the content by `(x, y)` dp without changing its size.
    pub fn offset(self, x: f32, y: f32) -> Self {
        let modifier = Self::with_element(OffsetElement::new(x, y)).with_inspector_metadata(
            inspector_metadata("offset", |info| {
                info.add_property("x", x.to_string());
                info.add_property("y", y.to_string());
            }),
        );
        self.then(modifier)
    }
}
