//! Themes and color descriptors.
//!
//! A [`ColorDescriptor`] names a color either literally or by theme role and
//! carries an ordered list of adjustments. Descriptors are resolved against
//! a [`Theme`] when drawn, so the same descriptor follows theme switches.

#![allow(non_snake_case)]

use std::fmt;

use indexmap::IndexMap;
use trellis_ui_graphics::Color;

use crate::composer::Composer;
use crate::locals::{
    composition_local_of, composition_local_provider, static_composition_local_of,
    CompositionLocal, StaticCompositionLocal,
};

/// Failures resolving a color descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThemeError {
    UnknownRole(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::UnknownRole(role) => write!(f, "unknown color role {role:?}"),
        }
    }
}

impl std::error::Error for ThemeError {}

/// Role names of the default schemes.
pub mod roles {
    pub const PRIMARY: &str = "primary";
    pub const ON_PRIMARY: &str = "onPrimary";
    pub const SECONDARY: &str = "secondary";
    pub const ON_SECONDARY: &str = "onSecondary";
    pub const BACKGROUND: &str = "background";
    pub const ON_BACKGROUND: &str = "onBackground";
    pub const SURFACE: &str = "surface";
    pub const ON_SURFACE: &str = "onSurface";
    pub const ERROR: &str = "error";
    pub const ON_ERROR: &str = "onError";
}

/// Role name to color, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorScheme {
    colors: IndexMap<String, Color>,
}

impl ColorScheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Material-like light defaults.
    pub fn light() -> Self {
        Self::from_roles(&[
            (roles::PRIMARY, Color::from_hex(0x6750A4)),
            (roles::ON_PRIMARY, Color::WHITE),
            (roles::SECONDARY, Color::from_hex(0x625B71)),
            (roles::ON_SECONDARY, Color::WHITE),
            (roles::BACKGROUND, Color::from_hex(0xFFFBFE)),
            (roles::ON_BACKGROUND, Color::from_hex(0x1C1B1F)),
            (roles::SURFACE, Color::from_hex(0xFFFBFE)),
            (roles::ON_SURFACE, Color::from_hex(0x1C1B1F)),
            (roles::ERROR, Color::from_hex(0xB3261E)),
            (roles::ON_ERROR, Color::WHITE),
        ])
    }

    /// Material-like dark defaults.
    pub fn dark() -> Self {
        Self::from_roles(&[
            (roles::PRIMARY, Color::from_hex(0xD0BCFF)),
            (roles::ON_PRIMARY, Color::from_hex(0x381E72)),
            (roles::SECONDARY, Color::from_hex(0xCCC2DC)),
            (roles::ON_SECONDARY, Color::from_hex(0x332D41)),
            (roles::BACKGROUND, Color::from_hex(0x1C1B1F)),
            (roles::ON_BACKGROUND, Color::from_hex(0xE6E1E5)),
            (roles::SURFACE, Color::from_hex(0x1C1B1F)),
            (roles::ON_SURFACE, Color::from_hex(0xE6E1E5)),
            (roles::ERROR, Color::from_hex(0xF2B8B5)),
            (roles::ON_ERROR, Color::from_hex(0x601410)),
        ])
    }

    fn from_roles(roles: &[(&str, Color)]) -> Self {
        Self {
            colors: roles
                .iter()
                .map(|(role, color)| ((*role).to_owned(), *color))
                .collect(),
        }
    }

    pub fn get(&self, role: &str) -> Option<Color> {
        self.colors.get(role).copied()
    }

    /// Sets `role`, keeping its position when it already exists.
    pub fn set(&mut self, role: impl Into<String>, color: Color) {
        self.colors.insert(role.into(), color);
    }

    pub fn with(mut self, role: impl Into<String>, color: Color) -> Self {
        self.set(role, color);
        self
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub colors: ColorScheme,
}

impl Theme {
    pub fn new(colors: ColorScheme) -> Self {
        Self { colors }
    }

    pub fn light() -> Self {
        Self::new(ColorScheme::light())
    }

    pub fn dark() -> Self {
        Self::new(ColorScheme::dark())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// The theme in effect. Switching themes restyles the whole subtree.
pub static LOCAL_THEME: StaticCompositionLocal<Theme> =
    static_composition_local_of("trellis.theme", Theme::light);

/// Color for text and icons drawn on the current surface.
pub static LOCAL_CONTENT_COLOR: CompositionLocal<Color> =
    composition_local_of("trellis.content_color", || Color::BLACK);

#[derive(Clone, Debug, PartialEq)]
pub enum ColorBase {
    Literal(Color),
    Role(String),
}

/// One adjustment applied after the base color is looked up.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorUpdate {
    /// Replaces the alpha channel, clamped to `0..=1`.
    SetOpacity(f32),
    /// Raises HSL lightness, clamped.
    Lighten(f32),
    /// Lowers HSL lightness, clamped.
    Darken(f32),
    /// Interpolates toward another descriptor.
    Lerp(Box<ColorDescriptor>, f32),
}

/// Immutable color recipe: a base plus ordered updates.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorDescriptor {
    base: ColorBase,
    updates: Vec<ColorUpdate>,
}

impl ColorDescriptor {
    pub fn literal(color: Color) -> Self {
        Self {
            base: ColorBase::Literal(color),
            updates: Vec::new(),
        }
    }

    pub fn role(name: impl Into<String>) -> Self {
        Self {
            base: ColorBase::Role(name.into()),
            updates: Vec::new(),
        }
    }

    pub fn base(&self) -> &ColorBase {
        &self.base
    }

    pub fn updates(&self) -> &[ColorUpdate] {
        &self.updates
    }

    fn with_update(&self, update: ColorUpdate) -> Self {
        let mut next = self.clone();
        next.updates.push(update);
        next
    }

    pub fn set_opacity(&self, opacity: f32) -> Self {
        self.with_update(ColorUpdate::SetOpacity(opacity))
    }

    pub fn lighten(&self, amount: f32) -> Self {
        self.with_update(ColorUpdate::Lighten(amount))
    }

    pub fn darken(&self, amount: f32) -> Self {
        self.with_update(ColorUpdate::Darken(amount))
    }

    pub fn lerp(&self, other: ColorDescriptor, fraction: f32) -> Self {
        self.with_update(ColorUpdate::Lerp(Box::new(other), fraction))
    }

    pub fn try_resolve(&self, theme: &Theme) -> Result<Color, ThemeError> {
        let base = match &self.base {
            ColorBase::Literal(color) => *color,
            ColorBase::Role(role) => theme
                .colors
                .get(role)
                .ok_or_else(|| ThemeError::UnknownRole(role.clone()))?,
        };
        self.updates.iter().try_fold(base, |color, update| {
            Ok(match update {
                ColorUpdate::SetOpacity(opacity) => color.with_alpha(opacity.clamp(0.0, 1.0)),
                ColorUpdate::Lighten(amount) => color.lighten(*amount),
                ColorUpdate::Darken(amount) => color.darken(*amount),
                ColorUpdate::Lerp(other, fraction) => {
                    color.lerp(other.try_resolve(theme)?, *fraction)
                }
            })
        })
    }

    /// # Panics
    /// Panics when a role is missing from the theme.
    pub fn resolve(&self, theme: &Theme) -> Color {
        self.try_resolve(theme)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Resolves against the theme provided to `composer`.
    pub fn resolve_current(&self, composer: &Composer<'_>) -> Color {
        self.resolve(&LOCAL_THEME.current(composer))
    }
}

impl From<Color> for ColorDescriptor {
    fn from(color: Color) -> Self {
        Self::literal(color)
    }
}

/// Provides `theme` to `content`, with the background's content color.
pub fn ProvideTheme(composer: &mut Composer<'_>, theme: Theme, content: impl FnOnce(&mut Composer<'_>)) {
    let content_color = theme
        .colors
        .get(roles::ON_BACKGROUND)
        .unwrap_or(Color::BLACK);
    composition_local_provider(
        composer,
        vec![
            LOCAL_THEME.provides(theme),
            LOCAL_CONTENT_COLOR.provides(content_color),
        ],
        content,
    );
}

#[cfg(test)]
#[path = "tests/theme_tests.rs"]
mod tests;
