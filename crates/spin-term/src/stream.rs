// SPDX-License-Identifier: MIT
//
// Output buffering — one frame, one write() syscall.
//
// A spinner frame is a burst of small pieces: padded text lines, cursor
// moves, per-row erases. Written piecemeal, those bursts flicker — the
// terminal may repaint between the erase and the rewrite. Accumulated
// here and flushed once, the frame lands atomically from the terminal's
// point of view.
//
// The buffer implements `Write` so the `ansi` emitters can target it
// directly; its own `flush` is a no-op because the real flush happens
// through `flush_to` against the destination stream.

use std::io::{self, Write};

/// A byte buffer that accumulates one frame's output for a single write.
///
/// Default capacity: 4 KB — a full redraw of a dozen wrapped spinner lines
/// plus the cursor choreography fits without reallocation.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 4096;

impl OutputBuffer {
    /// Create an empty buffer with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append a string slice.
    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write the accumulated frame to `w` and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to or flushing `w` fails. The buffer
    /// is left intact on error so the caller can inspect what was pending.
    pub fn flush_to(&mut self, w: &mut (impl Write + ?Sized)) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Real flushing happens via flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
