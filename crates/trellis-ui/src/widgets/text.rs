//! Text widget implementation
//!
//! Text is measured from font metrics alone: every character advances by
//! the font's average advance. Shaping and rasterization belong to the
//! backend consuming the recorded text ops.

#![allow(non_snake_case)]

use std::rc::Rc;

use trellis_assets::{FontCollection, FontMetrics};
use trellis_core::Identifier;
use trellis_foundation::LayoutWidget;
use trellis_ui_graphics::{Color, DrawOp, IntPoint, IntRect, Sp};
use trellis_ui_layout::{Dimensions, LayoutContext};

use super::layout::Layout;
use crate::composer::Composer;
use crate::locals::{static_composition_local_of, StaticCompositionLocal};
use crate::modifier::Modifier;
use crate::theme::{ColorDescriptor, LOCAL_CONTENT_COLOR};

pub const TEXT_SLOT: &str = "text";
pub const TEXT_COLOR_SLOT: &str = "text_color";

/// Shared font collection; equal when it is the same collection.
#[derive(Clone, Debug, Default)]
pub struct Fonts(pub Rc<FontCollection>);

impl PartialEq for Fonts {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Fonts available to text. Defaults to an empty collection, which
/// measures with fallback metrics.
pub static LOCAL_FONTS: StaticCompositionLocal<Fonts> =
    static_composition_local_of("trellis.fonts", Fonts::default);

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: Sp,
    pub font_family: Option<String>,
    /// Overrides the content color when set.
    pub color: Option<ColorDescriptor>,
}

impl TextStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font_size(mut self, size: Sp) -> Self {
        self.font_size = size;
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn color(mut self, color: impl Into<ColorDescriptor>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: Sp(14.0),
            font_family: None,
            color: None,
        }
    }
}

/// Measures `text` at `size_px`, in whole pixels.
pub fn measure_text(text: &str, size_px: f32, metrics: &FontMetrics) -> Dimensions {
    let chars = text.chars().count() as f32;
    let width = (chars * size_px * metrics.advance_ratio).ceil() as i32;
    let height = (size_px * metrics.line_height_ratio()).ceil() as i32;
    let below = (size_px * (metrics.descent_ratio + metrics.line_gap_ratio)).round() as i32;
    Dimensions {
        size: IntPoint::new(width, height),
        baseline: below.max(1),
    }
}

fn text_widget(
    text: String,
    font_size: Sp,
    metrics: FontMetrics,
    color: Color,
) -> impl Fn(&mut LayoutContext) -> Dimensions {
    move |gtx: &mut LayoutContext| {
        let size_px = font_size.to_px(gtx.px_per_dp, 1.0);
        let measured = measure_text(&text, size_px, &metrics);
        let size = gtx.constraints.constrain(measured.size);
        gtx.ops.push(DrawOp::Text {
            rect: IntRect::from_size(size),
            text: text.clone(),
            size_px,
            color,
        });
        Dimensions {
            size,
            baseline: measured.baseline.min(size.y),
        }
    }
}

/// A single line of text.
pub fn Text(
    composer: &mut Composer<'_>,
    modifier: Modifier,
    text: impl Into<String>,
    style: TextStyle,
) -> Identifier {
    let text: String = text.into();
    let color = match &style.color {
        Some(descriptor) => descriptor.resolve_current(composer),
        None => LOCAL_CONTENT_COLOR.current(composer),
    };
    let fonts = LOCAL_FONTS.current(composer);
    let metrics = fonts.0.resolve(style.font_family.as_deref());
    let font_size = style.font_size;

    Layout(
        composer,
        "Text",
        modifier,
        move |scope| -> LayoutWidget {
            let text = scope.slot::<String>(TEXT_SLOT).cloned().unwrap_or_default();
            Rc::new(text_widget(text, font_size, metrics, color))
        },
        move |composer| {
            composer.emit_slot(TEXT_SLOT, text);
            composer.emit_slot(TEXT_COLOR_SLOT, color);
        },
    )
}

/// Convenience for [`Text`] with the default style.
pub fn Label(composer: &mut Composer<'_>, text: impl Into<String>) -> Identifier {
    Text(composer, Modifier::empty(), text, TextStyle::default())
}
