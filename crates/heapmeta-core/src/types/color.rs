//! Display color palette.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MetaError;

/// One entry of the fixed 16-color palette
///
/// Colors only affect how an address is rendered; they never show up in the
/// structured or verbose query output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color
{
    Red,
    Green,
    Yellow,
    Blue,
    Purple,
    Cyan,
    Gray,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightPurple,
    LightCyan,
    LightGray,
    White,
    Black,
}

impl Color
{
    /// Every palette entry, in the order they are listed to the user.
    pub const ALL: [Color; 16] = [
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Purple,
        Color::Cyan,
        Color::Gray,
        Color::LightRed,
        Color::LightGreen,
        Color::LightYellow,
        Color::LightBlue,
        Color::LightPurple,
        Color::LightCyan,
        Color::LightGray,
        Color::White,
        Color::Black,
    ];

    /// Canonical lowercase name, as typed by the user.
    pub const fn name(self) -> &'static str
    {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Cyan => "cyan",
            Color::Gray => "gray",
            Color::LightRed => "lightred",
            Color::LightGreen => "lightgreen",
            Color::LightYellow => "lightyellow",
            Color::LightBlue => "lightblue",
            Color::LightPurple => "lightpurple",
            Color::LightCyan => "lightcyan",
            Color::LightGray => "lightgray",
            Color::White => "white",
            Color::Black => "black",
        }
    }

    /// Names of the whole palette, for error messages.
    pub fn palette_names() -> Vec<&'static str>
    {
        Self::ALL.iter().map(|color| color.name()).collect()
    }
}

impl FromStr for Color
{
    type Err = MetaError;

    /// Exact match against the palette names. No case folding: `Red` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        Self::ALL
            .into_iter()
            .find(|color| color.name() == s)
            .ok_or_else(|| MetaError::UnsupportedColor { name: s.to_string() })
    }
}

impl fmt::Display for Color
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_every_name_parses_back()
    {
        for color in Color::ALL {
            assert_eq!(color.name().parse::<Color>().unwrap(), color);
        }
    }

    #[test]
    fn test_unknown_color_is_rejected()
    {
        let err = "ultraviolet".parse::<Color>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ultraviolet"));
        assert!(message.contains("lightpurple"));
        assert!("Green".parse::<Color>().is_err());
    }

    #[test]
    fn test_serde_uses_palette_names()
    {
        assert_eq!(serde_json::to_string(&Color::LightCyan).unwrap(), "\"lightcyan\"");
        let color: Color = serde_json::from_str("\"gray\"").unwrap();
        assert_eq!(color, Color::Gray);
    }
}
