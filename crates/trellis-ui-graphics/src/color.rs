//! Color representation and color space utilities

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32, pub f32);

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self(r, g, b, 1.0)
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self(r, g, b, a)
    }

    pub const fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub const fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, 255)
    }

    /// Opaque color from `0xRRGGBB`.
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub fn r(&self) -> f32 {
        self.0
    }

    pub fn g(&self) -> f32 {
        self.1
    }

    pub fn b(&self) -> f32 {
        self.2
    }

    pub fn a(&self) -> f32 {
        self.3
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self(self.0, self.1, self.2, alpha.clamp(0.0, 1.0))
    }

    /// Converts to hue/saturation/lightness, all in `0.0..=1.0`.
    pub fn to_hsl(&self) -> Hsl {
        let (r, g, b) = (self.0, self.1, self.2);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;
        if max == min {
            return Hsl {
                hue: 0.0,
                saturation: 0.0,
                lightness,
                alpha: self.3,
            };
        }
        let delta = max - min;
        let saturation = if lightness > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };
        let sector = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        let hue = sector / 6.0;
        Hsl {
            hue,
            saturation,
            lightness,
            alpha: self.3,
        }
    }

    pub fn from_hsl(hsl: Hsl) -> Self {
        if hsl.saturation == 0.0 {
            return Self(hsl.lightness, hsl.lightness, hsl.lightness, hsl.alpha);
        }
        let q = if hsl.lightness < 0.5 {
            hsl.lightness * (1.0 + hsl.saturation)
        } else {
            hsl.lightness + hsl.saturation - hsl.lightness * hsl.saturation
        };
        let p = 2.0 * hsl.lightness - q;
        Self(
            hue_to_channel(p, q, hsl.hue + 1.0 / 3.0),
            hue_to_channel(p, q, hsl.hue),
            hue_to_channel(p, q, hsl.hue - 1.0 / 3.0),
            hsl.alpha,
        )
    }

    /// Raises HSL lightness by `amount`, clamped to white.
    pub fn lighten(&self, amount: f32) -> Self {
        let mut hsl = self.to_hsl();
        hsl.lightness = (hsl.lightness + amount).clamp(0.0, 1.0);
        Self::from_hsl(hsl)
    }

    /// Lowers HSL lightness by `amount`, clamped to black.
    pub fn darken(&self, amount: f32) -> Self {
        self.lighten(-amount)
    }

    /// Component-wise interpolation; `fraction` 0 yields `self`, 1 yields `other`.
    pub fn lerp(&self, other: Color, fraction: f32) -> Self {
        let t = fraction.clamp(0.0, 1.0);
        Self(
            self.0 + (other.0 - self.0) * t,
            self.1 + (other.1 - self.1) * t,
            self.2 + (other.2 - self.2) * t,
            self.3 + (other.3 - self.3) * t,
        )
    }

    /// Approximate equality, for values that went through HSL math.
    pub fn approx_eq(&self, other: &Color, epsilon: f32) -> bool {
        (self.0 - other.0).abs() <= epsilon
            && (self.1 - other.1).abs() <= epsilon
            && (self.2 - other.2).abs() <= epsilon
            && (self.3 - other.3).abs() <= epsilon
    }

    // Common color constants
    pub const BLACK: Color = Color(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color(0.0, 0.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Color::TRANSPARENT
    }
}

/// A color in HSL space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub alpha: f32,
}

fn hue_to_channel(p: f32, q: f32, hue: f32) -> f32 {
    let t = hue.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
#[path = "tests/color_tests.rs"]
mod tests;
