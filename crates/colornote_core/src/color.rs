//! Color catalog for note tags.
//!
//! # Responsibility
//! - Map the closed set of note color tags to renderable color values.
//! - Provide the inverse lookup and a defined fallback for unknown tags.
//!
//! # Invariants
//! - Tag matching is exact and case-sensitive.
//! - `reverse_lookup(resolve(tag)) == tag` for every known tag.
//! - Lookups never panic; unknown input yields an error or `None`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Color used for tags that are not part of the catalog.
pub const FALLBACK_COLOR: Color = Color::rgb(142, 142, 147);

/// Renderable sRGB color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque color from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `#RRGGBB`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `#RRGGBBAA`.
    pub fn to_hex_rgba(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

/// Named color category a note can be tagged with.
///
/// `Red` is the default, preselected for a new note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    #[default]
    Red,
    Yellow,
    Green,
    Blue,
    Purple,
    Orange,
    Brown,
}

impl ColorTag {
    /// All tags in picker order.
    pub const ALL: [ColorTag; 7] = [
        ColorTag::Red,
        ColorTag::Yellow,
        ColorTag::Green,
        ColorTag::Blue,
        ColorTag::Purple,
        ColorTag::Orange,
        ColorTag::Brown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::Brown => "brown",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Red => Color::rgb(255, 59, 48),
            Self::Yellow => Color::rgb(255, 204, 0),
            Self::Green => Color::rgb(52, 199, 89),
            Self::Blue => Color::rgb(0, 122, 255),
            Self::Purple => Color::rgb(175, 82, 222),
            Self::Orange => Color::rgb(255, 149, 0),
            Self::Brown => Color::rgb(162, 132, 94),
        }
    }
}

impl Display for ColorTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorTag {
    type Err = UnknownColorTag;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ColorTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == value)
            .ok_or_else(|| UnknownColorTag(value.to_string()))
    }
}

/// A color tag did not resolve through the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColorTag(pub String);

impl Display for UnknownColorTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown color tag: `{}`", self.0)
    }
}

impl Error for UnknownColorTag {}

/// Resolves a tag name to its color value.
pub fn resolve(tag: &str) -> Result<Color, UnknownColorTag> {
    tag.parse::<ColorTag>().map(ColorTag::color)
}

/// Finds the tag whose catalog color equals `color`.
pub fn reverse_lookup(color: Color) -> Option<ColorTag> {
    ColorTag::ALL.into_iter().find(|tag| tag.color() == color)
}

/// Resolves a tag for display, substituting `FALLBACK_COLOR` for unknown tags.
pub fn display_color(tag: &str) -> Color {
    resolve(tag).unwrap_or(FALLBACK_COLOR)
}

/// Returns whether `tag` names a catalog color.
pub fn is_known_tag(tag: &str) -> bool {
    tag.parse::<ColorTag>().is_ok()
}
