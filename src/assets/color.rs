use serde::{Deserialize, Serialize};

use crate::foundation::{
    error::{ThumbError, ThumbResult},
    math::{premultiply_px, unit_to_u8},
};

/// Straight-alpha sRGB color as authored in descriptors.
///
/// Serialized as `#RRGGBB` (opaque) or `#RRGGBBAA`. Deserialization also accepts a few CSS
/// color names, `{r,g,b,a}` objects with unit-range channels and `[r,g,b(,a)]` arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque red.
    pub const RED: Color = Color::rgb(255, 0, 0);
    /// Opaque yellow.
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    /// Opaque blue.
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Opaque color from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha scaled by `factor` (clamped to `[0, 1]`).
    pub fn with_alpha_factor(self, factor: f32) -> Self {
        let a = unit_to_u8(f32::from(self.a) / 255.0 * factor.clamp(0.0, 1.0));
        Self { a, ..self }
    }

    /// Straight channels as an array.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Premultiplied channels as stored in pixel buffers.
    pub fn to_premul(self) -> [u8; 4] {
        premultiply_px(self.to_array())
    }

    /// Parse `#RGB`, `#RRGGBB`, `#RRGGBBAA` or a basic CSS color name.
    pub fn parse(s: &str) -> ThumbResult<Self> {
        let s = s.trim();
        if let Some(named) = named_color(s) {
            return Ok(named);
        }
        parse_hex(s).map_err(ThumbError::invalid_spec)
    }

    /// Canonical hex representation.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => Color::parse(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Color::rgba(to_u8(r), to_u8(g), to_u8(b), to_u8(a))),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Color::rgb(to_u8(*r), to_u8(*g), to_u8(*b))),
                [r, g, b, a] => Ok(Color::rgba(to_u8(*r), to_u8(*g), to_u8(*b), to_u8(*a))),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn named_color(s: &str) -> Option<Color> {
    let c = match s.to_ascii_lowercase().as_str() {
        "white" => Color::WHITE,
        "black" => Color::BLACK,
        "red" => Color::RED,
        "yellow" => Color::YELLOW,
        "blue" => Color::BLUE,
        "green" => Color::rgb(0, 128, 0),
        "orange" => Color::rgb(255, 165, 0),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "transparent" => Color::TRANSPARENT,
        _ => return None,
    };
    Some(c)
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err(format!("invalid color \"{s}\""));
    }

    match s.len() {
        3 => {
            let r = hex_byte(&s[0..1].repeat(2))?;
            let g = hex_byte(&s[1..2].repeat(2))?;
            let b = hex_byte(&s[2..3].repeat(2))?;
            Ok(Color::rgb(r, g, b))
        }
        6 => Ok(Color::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Color::rgba(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        )),
        _ => Err("hex color must be #RGB, #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
