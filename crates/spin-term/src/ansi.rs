// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — that's the render engine's job. This
// module just knows the byte-level encoding of every terminal command the
// spinner choreography needs.
//
// All cursor movement here is *relative* (CUU/CUD/CUF/CUB): the engine never
// learns its absolute position, it only walks up and down over the block it
// drew last frame. A count of zero emits nothing — the ANSI standard treats
// a `0` parameter as `1`, so suppressing the sequence is the only correct
// way to express "don't move".
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).

use std::io::{self, Write};

// ─── Cursor Visibility ──────────────────────────────────────────────────────

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Relative Cursor Movement ───────────────────────────────────────────────

/// Move the cursor up `n` rows (CUU). Emits nothing when `n == 0`.
#[inline]
pub fn cursor_up(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}A")
}

/// Move the cursor down `n` rows (CUD). Emits nothing when `n == 0`.
#[inline]
pub fn cursor_down(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}B")
}

/// Move the cursor right `n` columns (CUF). Emits nothing when `n == 0`.
#[inline]
pub fn cursor_forward(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}C")
}

/// Move the cursor left `n` columns (CUB). Emits nothing when `n == 0`.
#[inline]
pub fn cursor_back(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}D")
}

// ─── Erase ──────────────────────────────────────────────────────────────────

/// Clear from the cursor to the end of the current line (EL 0).
#[inline]
pub fn clear_line_right(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0K")
}

/// Clear from the cursor to the end of the screen (ED 0).
#[inline]
pub fn clear_screen_down(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0J")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor visibility ───────────────────────────────────────────────

    #[test]
    fn cursor_hide_sequence() {
        assert_eq!(emit(cursor_hide), "\x1b[?25l");
    }

    #[test]
    fn cursor_show_sequence() {
        assert_eq!(emit(cursor_show), "\x1b[?25h");
    }

    // ── Relative movement ───────────────────────────────────────────────

    #[test]
    fn cursor_up_sequence() {
        assert_eq!(emit(|w| cursor_up(w, 3)), "\x1b[3A");
    }

    #[test]
    fn cursor_down_sequence() {
        assert_eq!(emit(|w| cursor_down(w, 2)), "\x1b[2B");
    }

    #[test]
    fn cursor_forward_sequence() {
        assert_eq!(emit(|w| cursor_forward(w, 17)), "\x1b[17C");
    }

    #[test]
    fn cursor_back_sequence() {
        assert_eq!(emit(|w| cursor_back(w, 17)), "\x1b[17D");
    }

    #[test]
    fn zero_counts_emit_nothing() {
        assert_eq!(emit(|w| cursor_up(w, 0)), "");
        assert_eq!(emit(|w| cursor_down(w, 0)), "");
        assert_eq!(emit(|w| cursor_forward(w, 0)), "");
        assert_eq!(emit(|w| cursor_back(w, 0)), "");
    }

    #[test]
    fn large_counts_do_not_overflow() {
        assert_eq!(emit(|w| cursor_up(w, u16::MAX)), "\x1b[65535A");
    }

    // ── Erase ───────────────────────────────────────────────────────────

    #[test]
    fn clear_line_right_sequence() {
        assert_eq!(emit(clear_line_right), "\x1b[0K");
    }

    #[test]
    fn clear_screen_down_sequence() {
        assert_eq!(emit(clear_screen_down), "\x1b[0J");
    }

    // ── Composition ─────────────────────────────────────────────────────

    #[test]
    fn clean_pass_sequences_compose() {
        // One row of a clean-trailing pass: right, clear, back.
        let mut buf = Vec::new();
        cursor_forward(&mut buf, 5).unwrap();
        clear_line_right(&mut buf).unwrap();
        cursor_back(&mut buf, 5).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert_eq!(s, "\x1b[5C\x1b[0K\x1b[5D");
    }
}
