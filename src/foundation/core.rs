use std::str::FromStr;

use crate::foundation::error::{BlendError, BlendResult};

/// Integer position in the shared layer coordinate space.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Point {
    /// Horizontal coordinate (grows to the right).
    pub x: i64,
    /// Vertical coordinate (grows downwards).
    pub y: i64,
}

impl Point {
    /// Build a point from its coordinates.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned integer rectangle (`x`/`y` inclusive, `right`/`bottom` exclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CanvasRect {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasRect {
    /// Build a rectangle from its origin and size.
    pub const fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Exclusive right edge.
    pub fn right(self) -> i64 {
        self.x + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i64 {
        self.y + i64::from(self.height)
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains_rect(self, other: CanvasRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Straight (non-premultiplied) RGB8 color.
///
/// Deserializes from `"#RRGGBB"` strings or `[r, g, b]` arrays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Rgb8(pub [u8; 3]);

impl Rgb8 {
    /// Opaque black.
    pub const BLACK: Self = Self([0, 0, 0]);

    /// Channel values as reals, in `[0, 255]`.
    pub fn to_f64(self) -> [f64; 3] {
        self.0.map(f64::from)
    }
}

impl FromStr for Rgb8 {
    type Err = BlendError;

    fn from_str(s: &str) -> BlendResult<Self> {
        parse_hex_rgb(s).map_err(BlendError::validation)
    }
}

impl<'de> serde::Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr([u8; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex_rgb(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => Ok(Self(v)),
        }
    }
}

fn parse_hex_rgb(s: &str) -> Result<Rgb8, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if s.len() != 6 || !s.is_ascii() {
        return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
    }
    Ok(Rgb8([
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ]))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
