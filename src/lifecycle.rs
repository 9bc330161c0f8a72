// SPDX-License-Identifier: MIT
//
// Process-exit safety net for the hidden cursor.
//
// Safety: installing a signal handler requires `unsafe` (sigaction), and
// the handler itself may only call async-signal-safe functions. It does
// exactly three things: read an atomic, `write(2)` a short escape, and
// `_exit`. No allocation, no locks, no formatting.
#![cfg_attr(unix, allow(unsafe_code))]
//
// The engine hides the terminal cursor while animating. If the process
// dies in that window — SIGINT, SIGTERM, or a panic — the user's shell
// is left with an invisible cursor. Hooks installed here write the
// show-cursor sequence straight to stderr on those paths, gated on an
// atomic count of currently-hidden cursors so a process that never hid
// anything never writes anything.
//
// Hooks are installed once per process, on first spinner-set
// construction. Normal teardown does not go through here: `destroy` and
// `Drop` restore the cursor through the engine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

static CURSOR_USERS: AtomicUsize = AtomicUsize::new(0);
static HOOKS: Once = Once::new();

const SHOW_CURSOR: &[u8] = b"\x1b[?25h";

/// Record that the engine hid the cursor on its stream.
pub(crate) fn mark_cursor_hidden() {
    CURSOR_USERS.fetch_add(1, Ordering::SeqCst);
}

/// Record that the engine restored the cursor.
pub(crate) fn mark_cursor_restored() {
    // Saturating decrement: a stray extra restore must not wrap the
    // counter and convince the exit hooks the cursor is hidden forever.
    let _ = CURSOR_USERS.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
}

#[cfg(test)]
pub(crate) fn cursor_users() -> usize {
    CURSOR_USERS.load(Ordering::SeqCst)
}

/// Install the signal and panic hooks, once per process.
pub(crate) fn install_hooks() {
    HOOKS.call_once(|| {
        install_signal_handlers();
        install_panic_hook();
    });
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if CURSOR_USERS.load(Ordering::SeqCst) > 0 {
            emergency_show_cursor();
        }
        previous(info);
    }));
}

#[cfg(unix)]
fn install_signal_handlers() {
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handle_fatal_signal as usize;
        libc::sigemptyset(&mut action.sa_mask);
        action.sa_flags = 0;
        libc::sigaction(libc::SIGINT, &action, std::ptr::null_mut());
        libc::sigaction(libc::SIGTERM, &action, std::ptr::null_mut());
    }
}

/// Async-signal-safe: atomic load, raw write, `_exit`. Exits with the
/// conventional 128+signal status a default disposition would produce.
#[cfg(unix)]
extern "C" fn handle_fatal_signal(signal: libc::c_int) {
    if CURSOR_USERS.load(Ordering::SeqCst) > 0 {
        unsafe {
            libc::write(
                libc::STDERR_FILENO,
                SHOW_CURSOR.as_ptr().cast(),
                SHOW_CURSOR.len(),
            );
        }
    }
    unsafe { libc::_exit(128 + signal) };
}

#[cfg(unix)]
fn emergency_show_cursor() {
    unsafe {
        libc::write(
            libc::STDERR_FILENO,
            SHOW_CURSOR.as_ptr().cast(),
            SHOW_CURSOR.len(),
        );
    }
}

#[cfg(not(unix))]
fn install_signal_handlers() {}

#[cfg(not(unix))]
fn emergency_show_cursor() {
    use std::io::Write;
    let _ = std::io::stderr().write_all(SHOW_CURSOR);
}

// ─── Tests ───────────────────────────────────────────────────────────────────
