use super::{inspector_metadata, Modifier};
use crate::modifier_nodes::PointerInputElement;
use trellis_ui_layout::PointerEvent;

impl Modifier {
    /// Receives every pointer event routed to the node's area.
    pub fn pointer_input(self, handler: impl Fn(PointerEvent) + 'static) -> Self {
        let modifier = Self::with_element(PointerInputElement::new(handler))
            .with_inspector_metadata(inspector_metadata("pointerInput", |info| {
                info.add_property("handler", "provided");
            }));
        self.then(modifier)
    }
}
