// SPDX-License-Identifier: MIT
//
// Caller-facing option structs and their normalized internal form.
//
// Two layers: [`SetOptions`] and [`SpinnerOptions`] are the public,
// everything-optional builder surface; [`Config`] is the fully-populated
// internal form the engine reads, produced once at construction by
// filling every hole with the documented default. Per-spinner options are
// merged against the registry record at apply time, so an absent field
// always means "keep what's there", never "reset".

use crate::animation::SpinnerStyle;
use crate::color::Color;
use crate::registry::Status;
use spin_term::detect;

/// Indent values above this are ignored and treated as absent.
pub const MAX_INDENT: u16 = 100;

// Role defaults, applied wherever the caller leaves a color unset.
pub(crate) const DEFAULT_TEXT_COLOR: Color = Color::White;
pub(crate) const DEFAULT_SPINNER_COLOR: Color = Color::GreenBright;
pub(crate) const DEFAULT_SUCCEED_COLOR: Color = Color::Green;
pub(crate) const DEFAULT_FAIL_COLOR: Color = Color::Red;
pub(crate) const DEFAULT_STOPPED_COLOR: Color = Color::Gray;

// ─── Per-Spinner Options ────────────────────────────────────────────────────

/// Options for one spinner, passed to `add` and the mutation calls.
///
/// Every field is optional. At `add` time, unset fields take the set-wide
/// defaults; at update time, unset fields leave the record untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpinnerOptions {
    pub text: Option<String>,
    pub status: Option<Status>,
    pub indent: Option<u16>,
    pub color: Option<Color>,
    pub spinner_color: Option<Color>,
    pub succeed_color: Option<Color>,
    pub fail_color: Option<Color>,
}

impl SpinnerOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Columns of leading whitespace before the spinner glyph.
    ///
    /// Values above [`MAX_INDENT`] are dropped during normalization.
    #[must_use]
    pub fn indent(mut self, indent: u16) -> Self {
        self.indent = Some(indent);
        self
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn spinner_color(mut self, color: Color) -> Self {
        self.spinner_color = Some(color);
        self
    }

    #[must_use]
    pub fn succeed_color(mut self, color: Color) -> Self {
        self.succeed_color = Some(color);
        self
    }

    #[must_use]
    pub fn fail_color(mut self, color: Color) -> Self {
        self.fail_color = Some(color);
        self
    }

    /// Drop out-of-range values so downstream merging never sees them.
    #[must_use]
    pub(crate) fn normalized(mut self) -> Self {
        if self.indent.is_some_and(|i| i > MAX_INDENT) {
            self.indent = None;
        }
        self
    }
}

// ─── Set-Wide Options ───────────────────────────────────────────────────────

/// Construction-time options for a whole spinner set.
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    pub color: Option<Color>,
    pub spinner_color: Option<Color>,
    pub succeed_color: Option<Color>,
    pub fail_color: Option<Color>,
    pub succeed_prefix: Option<String>,
    pub fail_prefix: Option<String>,
    pub spinner: Option<SpinnerStyle>,
    /// Force the raw line-per-mutation fallback even on a terminal.
    pub disable_spins: bool,
}

impl SetOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn spinner_color(mut self, color: Color) -> Self {
        self.spinner_color = Some(color);
        self
    }

    #[must_use]
    pub fn succeed_color(mut self, color: Color) -> Self {
        self.succeed_color = Some(color);
        self
    }

    #[must_use]
    pub fn fail_color(mut self, color: Color) -> Self {
        self.fail_color = Some(color);
        self
    }

    #[must_use]
    pub fn succeed_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.succeed_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn fail_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fail_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn spinner(mut self, style: SpinnerStyle) -> Self {
        self.spinner = Some(style);
        self
    }

    #[must_use]
    pub fn disable_spins(mut self, disable: bool) -> Self {
        self.disable_spins = disable;
        self
    }
}

// ─── Resolved Configuration ─────────────────────────────────────────────────

/// Fully-populated set configuration; the engine reads only this.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub color: Color,
    pub spinner_color: Color,
    pub succeed_color: Color,
    pub fail_color: Color,
    pub succeed_prefix: String,
    pub fail_prefix: String,
    pub style: SpinnerStyle,
    pub disable_spins: bool,
}

impl Config {
    /// Resolve caller options into a complete configuration.
    ///
    /// Prefix glyphs pick unicode or ASCII variants based on the
    /// terminal; a caller-supplied animation is sanitized field-by-field
    /// against the terminal's default.
    pub(crate) fn from_options(opts: SetOptions) -> Self {
        let unicode = detect::supports_unicode();
        let default_style = SpinnerStyle::default_for_terminal();
        Self {
            color: opts.color.unwrap_or(DEFAULT_TEXT_COLOR),
            spinner_color: opts.spinner_color.unwrap_or(DEFAULT_SPINNER_COLOR),
            succeed_color: opts.succeed_color.unwrap_or(DEFAULT_SUCCEED_COLOR),
            fail_color: opts.fail_color.unwrap_or(DEFAULT_FAIL_COLOR),
            succeed_prefix: opts
                .succeed_prefix
                .unwrap_or_else(|| if unicode { "✓" } else { "√" }.to_string()),
            fail_prefix: opts
                .fail_prefix
                .unwrap_or_else(|| if unicode { "✖" } else { "×" }.to_string()),
            style: match opts.spinner {
                Some(style) => style.sanitized(&default_style),
                None => default_style,
            },
            disable_spins: opts.disable_spins,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
