// SPDX-License-Identifier: MIT
//
// spin-term — Terminal control layer for spindrift.
//
// The mechanism half of the spinner renderer: byte-level ANSI escape
// emission for the cursor choreography, an output buffer that turns a
// whole frame into a single write() syscall, and read-only probes of
// the environment (TTY-ness, live column count, CI markers, unicode
// capability).
//
// This crate intentionally avoids external TUI frameworks (ratatui,
// crossterm) in favor of direct terminal control: the spinner engine
// needs exactly seven escape sequences and one ioctl, and it needs to
// know precisely when each byte is written. No policy lives here —
// deciding *when* to move the cursor is the engine's job.

pub mod ansi;
pub mod detect;
pub mod stream;
