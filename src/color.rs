// SPDX-License-Identifier: MIT
//
// The named color palette and the paint seam.
//
// Spinner colors are a fixed 16-entry palette: the eight standard ANSI
// colors plus their bright variants (with `gray` standing in for bright
// black, as every terminal theme renders it). The engine never applies
// color itself — it calls through the [`Paint`] capability, so styling
// can be swapped out (or turned off) without touching the renderer.
//
// SGR encoding follows the compact standard codes: 30–37 for the normal
// range, 90–97 for the bright range. Only foreground color is ever set;
// each painted span is closed with SGR 39 (default foreground) rather
// than SGR 0 so no other terminal state is disturbed.

use std::fmt;

// ─── Color ───────────────────────────────────────────────────────────────────

/// A named foreground color from the fixed spinner palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    RedBright,
    GreenBright,
    YellowBright,
    BlueBright,
    MagentaBright,
    CyanBright,
    WhiteBright,
}

impl Color {
    /// The SGR foreground parameter for this color.
    ///
    /// Standard colors map to 30–37, bright colors to 90–97.
    #[must_use]
    pub const fn sgr(self) -> u8 {
        match self {
            Self::Black => 30,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
            Self::Gray => 90,
            Self::RedBright => 91,
            Self::GreenBright => 92,
            Self::YellowBright => 93,
            Self::BlueBright => 94,
            Self::MagentaBright => 95,
            Self::CyanBright => 96,
            Self::WhiteBright => 97,
        }
    }

    /// The palette name of this color.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
            Self::Gray => "gray",
            Self::RedBright => "redBright",
            Self::GreenBright => "greenBright",
            Self::YellowBright => "yellowBright",
            Self::BlueBright => "blueBright",
            Self::MagentaBright => "magentaBright",
            Self::CyanBright => "cyanBright",
            Self::WhiteBright => "whiteBright",
        }
    }

    /// Look up a palette color by name.
    ///
    /// Accepts the canonical names from [`name`](Self::name) plus the
    /// `grey` spelling. Returns `None` for anything outside the palette —
    /// the option normalizer turns that into the role's default.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "black" => Some(Self::Black),
            "red" => Some(Self::Red),
            "green" => Some(Self::Green),
            "yellow" => Some(Self::Yellow),
            "blue" => Some(Self::Blue),
            "magenta" => Some(Self::Magenta),
            "cyan" => Some(Self::Cyan),
            "white" => Some(Self::White),
            "gray" | "grey" => Some(Self::Gray),
            "redBright" => Some(Self::RedBright),
            "greenBright" => Some(Self::GreenBright),
            "yellowBright" => Some(Self::YellowBright),
            "blueBright" => Some(Self::BlueBright),
            "magentaBright" => Some(Self::MagentaBright),
            "cyanBright" => Some(Self::CyanBright),
            "whiteBright" => Some(Self::WhiteBright),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Paint ───────────────────────────────────────────────────────────────────

/// The color-application capability.
///
/// The render engine composes frames out of `paint(color, text)` calls and
/// never emits SGR sequences of its own. Implementations must return text
/// whose *visible* width equals the input's — the measurer strips CSI
/// sequences, nothing else.
pub trait Paint {
    /// Apply `color` to `text`, returning the styled string.
    fn paint(&self, color: Color, text: &str) -> String;
}

/// Default painter: plain SGR foreground coloring.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiPaint;

impl Paint for AnsiPaint {
    fn paint(&self, color: Color, text: &str) -> String {
        format!("\x1b[{}m{text}\x1b[39m", color.sgr())
    }
}

/// A painter that applies nothing. Useful for tests and monochrome output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPaint;

impl Paint for NoPaint {
    fn paint(&self, _color: Color, text: &str) -> String {
        text.to_string()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_colors_use_compact_codes() {
        assert_eq!(Color::Black.sgr(), 30);
        assert_eq!(Color::Red.sgr(), 31);
        assert_eq!(Color::White.sgr(), 37);
    }

    #[test]
    fn bright_colors_use_high_codes() {
        assert_eq!(Color::Gray.sgr(), 90);
        assert_eq!(Color::GreenBright.sgr(), 92);
        assert_eq!(Color::WhiteBright.sgr(), 97);
    }

    #[test]
    fn every_name_round_trips() {
        for color in [
            Color::Black,
            Color::Red,
            Color::Green,
            Color::Yellow,
            Color::Blue,
            Color::Magenta,
            Color::Cyan,
            Color::White,
            Color::Gray,
            Color::RedBright,
            Color::GreenBright,
            Color::YellowBright,
            Color::BlueBright,
            Color::MagentaBright,
            Color::CyanBright,
            Color::WhiteBright,
        ] {
            assert_eq!(Color::from_name(color.name()), Some(color));
        }
    }

    #[test]
    fn grey_is_an_alias() {
        assert_eq!(Color::from_name("grey"), Some(Color::Gray));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(Color::from_name("chartreuse"), None);
        assert_eq!(Color::from_name(""), None);
        assert_eq!(Color::from_name("GREEN"), None);
    }

    #[test]
    fn ansi_paint_wraps_with_sgr() {
        let painted = AnsiPaint.paint(Color::Green, "done");
        assert_eq!(painted, "\x1b[32mdone\x1b[39m");
    }

    #[test]
    fn ansi_paint_closes_with_default_foreground() {
        // SGR 39 resets only the foreground — painted spans must not
        // clobber surrounding terminal state with SGR 0.
        let painted = AnsiPaint.paint(Color::Gray, "x");
        assert!(painted.ends_with("\x1b[39m"));
        assert!(!painted.contains("\x1b[0m"));
    }

    #[test]
    fn no_paint_is_identity() {
        assert_eq!(NoPaint.paint(Color::Red, "text"), "text");
    }
}
