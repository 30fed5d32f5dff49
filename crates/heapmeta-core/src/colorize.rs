//! Address colorizer.
//!
//! A [`Colorizer`] is the formatter a query hands back for rendering the
//! chunk address: either the identity, or the terminal style bound to one
//! palette entry.

use crossterm::style::{Color as TermColor, Stylize};
use serde::{Deserialize, Serialize};

use crate::types::Color;

/// Formatter applied to an address before it is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Colorizer
{
    /// Leave the text untouched.
    #[default]
    Identity,
    /// Render the text in a palette color.
    Palette(Color),
}

impl Colorizer
{
    /// Format `text` with this colorizer.
    pub fn apply(self, text: &str) -> String
    {
        match self {
            Colorizer::Identity => text.to_string(),
            Colorizer::Palette(color) => text.with(terminal_color(color)).to_string(),
        }
    }
}

impl From<Color> for Colorizer
{
    fn from(color: Color) -> Self
    {
        Colorizer::Palette(color)
    }
}

/// Terminal color used for each palette entry.
///
/// The plain names map to the normal-intensity ANSI colors and the `light`
/// names to the bright ones.
const fn terminal_color(color: Color) -> TermColor
{
    match color {
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Purple => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightPurple => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::LightGray => TermColor::Grey,
        Color::White => TermColor::White,
        Color::Black => TermColor::Black,
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_identity_leaves_text_alone()
    {
        assert_eq!(Colorizer::Identity.apply("0x10"), "0x10");
        assert_eq!(Colorizer::default(), Colorizer::Identity);
    }

    #[test]
    fn test_palette_wraps_text_in_escapes()
    {
        crossterm::style::force_color_output(true);
        let styled = Colorizer::Palette(Color::Green).apply("0x10");
        assert!(styled.contains("0x10"));
        assert!(styled.starts_with("\u{1b}["));
        assert_ne!(styled, "0x10");
    }

    #[test]
    fn test_every_palette_entry_is_distinct()
    {
        crossterm::style::force_color_output(true);
        let rendered: std::collections::HashSet<String> =
            Color::ALL.iter().map(|color| Colorizer::from(*color).apply("x")).collect();
        assert_eq!(rendered.len(), Color::ALL.len());
    }
}
