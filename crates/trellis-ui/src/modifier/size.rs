use super::{inspector_metadata, InspectorInfo, Modifier};
use crate::modifier_nodes::SizeElement;

impl Modifier {
    /// Preferred size in dp, coerced into the incoming constraints.
    ///
    /// Example: `Modifier::empty().size(48.0, 48.0)`
    pub fn size(self, width: f32, height: f32) -> Self {
        self.then(sized(Some(width), Some(height)))
    }

    pub fn width(self, width: f32) -> Self {
        self.then(sized(Some(width), None))
    }

    pub fn height(self, height: f32) -> Self {
        self.then(sized(None, Some(height)))
    }
}

fn sized(width: Option<f32>, height: Option<f32>) -> Modifier {
    Modifier::with_element(SizeElement::new(width, height))
        .with_inspector_metadata(size_metadata(width, height))
}

fn size_metadata(width: Option<f32>, height: Option<f32>) -> InspectorInfo {
    let name = match (width, height) {
        (Some(_), None) => "width",
        (None, Some(_)) => "height",
        _ => "size",
    };
    inspector_metadata(name, |info| {
        if let Some(width) = width {
            info.add_property("width", width.to_string());
        }
        if let Some(height) = height {
            info.add_property("height", height.to_string());
        }
    })
}
