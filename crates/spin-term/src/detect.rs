// SPDX-License-Identifier: MIT
//
// Environment probes — read-only inputs the engine consumes.
//
// Safety: This module necessarily uses `unsafe` for ioctl (TIOCGWINSZ)
// and isatty. These are the standard POSIX interfaces for terminal
// queries — there is no safe alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// Everything here answers one question about the world and changes
// nothing. Spinner output goes to stderr, so every probe targets the
// stderr file descriptor — stdout may be piped somewhere useful while
// the progress narrative still animates on the terminal.
//
// Column count is deliberately *not* cached: the engine re-reads it on
// every frame so a resize mid-animation is picked up on the next tick
// without any SIGWINCH plumbing.

use std::env;

/// Column count assumed when the terminal size cannot be determined
/// (piped stderr, tests, exotic platforms).
pub const FALLBACK_COLUMNS: u16 = 95;

// ─── Terminal Geometry ──────────────────────────────────────────────────────

/// Query the current stderr terminal width via `ioctl(TIOCGWINSZ)`.
///
/// Falls back to [`FALLBACK_COLUMNS`] if stderr is not a terminal or the
/// query fails. Call this fresh on every frame — never cache the result
/// across ticks.
#[cfg(unix)]
#[must_use]
pub fn columns() -> u16 {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDERR_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 {
        ws.ws_col
    } else {
        FALLBACK_COLUMNS
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn columns() -> u16 {
    FALLBACK_COLUMNS
}

/// Check whether stderr is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_interactive() -> bool {
    unsafe { libc::isatty(libc::STDERR_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_interactive() -> bool {
    false
}

// ─── Environment Flags ──────────────────────────────────────────────────────

/// Whether a CI-like environment variable is present.
///
/// CI log collectors treat cursor movement as garbage; the engine forces
/// the raw line-per-mutation fallback when this returns true.
#[must_use]
pub fn ci_detected() -> bool {
    env::var_os("CI").is_some()
}

/// Whether the terminal is believed to render unicode glyphs correctly.
///
/// Selects between the unicode and ASCII variants of the default
/// animation and the succeed/fail prefix glyphs. Everything except
/// legacy Windows consoles qualifies; on Windows, modern hosts
/// (Windows Terminal, VS Code, anything announcing a TERM_PROGRAM)
/// are trusted.
#[cfg(not(windows))]
#[must_use]
pub fn supports_unicode() -> bool {
    true
}

#[cfg(windows)]
#[must_use]
pub fn supports_unicode() -> bool {
    env::var("TERM_PROGRAM").map_or(false, |v| !v.is_empty())
        || env::var_os("WT_SESSION").is_some()
        || env::var("TERM").is_ok_and(|v| v == "xterm-256color")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
