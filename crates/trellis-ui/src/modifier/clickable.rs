use super::{inspector_metadata, Modifier, Point};
use crate::modifier_nodes::ClickableElement;
use std::rc::Rc;

impl Modifier {
    /// Make the component clickable.
    ///
    /// Example: `Modifier::empty().clickable(|pt| println!("Clicked at {:?}", pt))`
    pub fn clickable(self, handler: impl Fn(Point) + 'static) -> Self {
        self.clickable_handler(Rc::new(handler))
    }

    /// Like [`clickable`](Self::clickable) with a shared handler; reusing the
    /// same `Rc` keeps the element equal across frames.
    pub fn clickable_handler(self, handler: Rc<dyn Fn(Point)>) -> Self {
        let modifier = Self::with_element(ClickableElement::with_handler(handler))
            .with_inspector_metadata(inspector_metadata("clickable", |info| {
                info.add_property("onClick", "provided");
            }));
        self.then(modifier)
    }
}
