// SPDX-License-Identifier: MIT
//
// Text wrapping and line measurement.
//
// Two pure functions back the renderer:
//
//   break_text — inserts line breaks so every visual line fits the
//   terminal, counting *display columns* (wide CJK glyphs are 2, combining
//   marks are 0) and never splitting a grapheme cluster across lines.
//
//   line_widths — the measuring mirror: one visible-column count per
//   visual line of already-wrapped text, with CSI sequences stripped so
//   colored text measures the same as plain text.
//
// Both take the column count as an argument. The engine reads the live
// terminal width on every frame and passes it in, which keeps these
// functions pure and means a resize mid-animation is honored on the
// next tick with no special handling.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Hard cap on break recursion per logical line.
///
/// Guarantees termination for pathological input (an unbroken run far
/// wider than the terminal times the cap): past this depth the remainder
/// is returned unwrapped.
pub const MAX_BREAKS: usize = 15;

/// CSI escape sequences — colors, cursor movement, erases.
static CSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\x1b\\[[0-9;?]*[ -/]*[@-~]").expect("CSI pattern is valid"));

// ─── Measurement ────────────────────────────────────────────────────────────

/// Remove CSI escape sequences, leaving only visible text.
#[must_use]
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    CSI.replace_all(text, "")
}

/// The display width of `text` in terminal columns.
///
/// Wide glyphs count 2, zero-width combining marks count 0. The input is
/// assumed free of escape sequences; strip first when measuring styled text.
#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Per-visual-line widths of (already wrapped) text.
///
/// CSI sequences are stripped before measuring, so the result reflects
/// what the terminal shows, not the byte count. `prefix_columns` is added
/// to the first line only — continuation lines start at column zero.
#[must_use]
pub fn line_widths(text: &str, prefix_columns: usize) -> Vec<usize> {
    strip_ansi(text)
        .split('\n')
        .enumerate()
        .map(|(i, line)| display_width(line) + if i == 0 { prefix_columns } else { 0 })
        .collect()
}

// ─── Wrapping ───────────────────────────────────────────────────────────────

/// Wrap `text` so every visual line fits within `columns`.
///
/// Existing line breaks are respected; each top-level line is wrapped
/// independently. `prefix_columns` is charged against the first line only
/// (the glyph-and-indent prefix the renderer will prepend); lines produced
/// by embedded breaks and by wrapping start at column zero.
#[must_use]
pub fn break_text(text: &str, prefix_columns: usize, columns: u16) -> String {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| break_line(line, if i == 0 { prefix_columns } else { 0 }, columns, 0))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap one logical line, recursing on the remainder with a depth cap.
fn break_line(line: &str, prefix_columns: usize, columns: u16, depth: usize) -> String {
    // Never let the budget collapse to zero: two columns is the floor even
    // on absurdly narrow terminals, so every call makes progress.
    let budget = (columns as usize)
        .saturating_sub(prefix_columns + 1)
        .max(2);

    if display_width(line) <= budget || depth > MAX_BREAKS {
        return line.to_string();
    }

    // Greedily consume grapheme clusters until the next one would overflow.
    // A cluster is taken whole or not at all — wide glyphs never split.
    let mut used = 0;
    let mut split = 0;
    for (idx, grapheme) in line.grapheme_indices(true) {
        let w = display_width(grapheme);
        if used + w > budget {
            break;
        }
        used += w;
        split = idx + grapheme.len();
    }

    // A single cluster wider than the whole budget: take it anyway rather
    // than loop forever on an unsplittable glyph.
    if split == 0 {
        if let Some(first) = line.graphemes(true).next() {
            split = first.len();
        }
    }

    let head = &line[..split];
    let rest = line[split..].trim_start();
    if rest.is_empty() {
        return head.to_string();
    }

    format!("{head}\n{}", break_line(rest, 0, columns, depth + 1))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
