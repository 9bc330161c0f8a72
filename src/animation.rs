// SPDX-License-Identifier: MIT
//
// Built-in spinner animations: glyph sequences and their tick intervals.
//
// Two stock animations ship with the crate: braille dots for unicode
// terminals and a plain dash flip for everything else. Callers can pass
// their own [`SpinnerStyle`]; each field is validated independently so a
// caller may override just the frames or just the interval and inherit
// the rest from the terminal's default animation.

use spin_term::detect;

/// One spinner animation: an ordered glyph sequence and a tick interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinnerStyle {
    /// The glyphs cycled through, one per tick. Must be non-empty.
    pub frames: Vec<String>,
    /// Milliseconds between frame advances.
    pub interval: u64,
}

impl SpinnerStyle {
    /// Braille-dot animation for unicode-capable terminals.
    #[must_use]
    pub fn dots() -> Self {
        Self {
            frames: ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            interval: 80,
        }
    }

    /// ASCII dash animation for terminals without unicode glyphs.
    #[must_use]
    pub fn dashes() -> Self {
        Self {
            frames: ["-", "_"].iter().map(ToString::to_string).collect(),
            interval: 80,
        }
    }

    /// The default animation for the current terminal.
    #[must_use]
    pub fn default_for_terminal() -> Self {
        if detect::supports_unicode() {
            Self::dots()
        } else {
            Self::dashes()
        }
    }

    /// Validate each field independently against a fallback animation.
    ///
    /// Empty `frames` fall back to the fallback's frames; a zero
    /// `interval` falls back to the fallback's interval. A caller can
    /// therefore override one of the two and inherit the other.
    #[must_use]
    pub(crate) fn sanitized(self, fallback: &Self) -> Self {
        Self {
            frames: if self.frames.is_empty() {
                fallback.frames.clone()
            } else {
                self.frames
            },
            interval: if self.interval == 0 {
                fallback.interval
            } else {
                self.interval
            },
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
