// SPDX-License-Identifier: MIT
//
// The render engine and the frame ticker.
//
// All mutable state lives in [`Inner`], which the facade wraps in an
// `Arc<Mutex<_>>`. Every mutation and every animation tick runs under
// that one lock, so a frame is never written concurrently with an update
// and the output stream only ever sees whole frames.
//
// The ticker is a named thread that sleeps for one animation interval,
// takes the lock, and advances the frame. It never holds the lock across
// a sleep. Lock-ordering rule: [`Inner`] methods must not join the ticker
// (the ticker thread takes the same lock); instead they return a
// [`TickerCmd`] and the facade acts on it after releasing the lock.
//
// Rendering composes each frame into an [`OutputBuffer`] and flushes it
// with a single write, ending with a cursor-up so the next frame paints
// over this one in place. Escape sequences are only emitted where the
// previous frame actually left residue: per-row widths of the last frame
// decide which rows need a clear-to-end-of-line, and rows the new frame
// no longer covers are erased with one clear-screen-down below the block.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use indexmap::IndexMap;
use spin_term::{ansi, detect, stream::OutputBuffer};

use crate::color::Paint;
use crate::error::{Error, Result};
use crate::options::Config;
use crate::registry::{Registry, SpinnerRecord, Status};
use crate::text::{break_text, display_width, line_widths};
use crate::{lifecycle, SpinnerOptions};

/// Floor on the animation interval. Anything faster burns CPU repainting
/// frames no terminal can show.
pub const MIN_INTERVAL_MS: u64 = 10;

/// What the facade should do with the ticker thread after an operation.
///
/// Computed under the lock, acted on after releasing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickerCmd {
    Keep,
    Start,
    Stop,
}

fn rows(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

// ─── Engine State ───────────────────────────────────────────────────────────

pub(crate) struct Inner {
    registry: Registry,
    config: Config,
    paint: Box<dyn Paint + Send>,
    stream: Box<dyn Write + Send>,
    /// Whether in-place animated rendering is active. When false the
    /// engine emits the raw line-per-mutation fallback instead.
    spin: bool,
    frame_index: usize,
    /// Visible column count of each row of the previous frame. Drives
    /// the residue-clearing pass of the next frame.
    last_line_widths: Vec<usize>,
    cursor_hidden: bool,
    destroyed: bool,
    /// Set after a stream write fails. The engine goes quiet rather than
    /// spraying errors into a half-working terminal.
    degraded: bool,
}

impl Inner {
    pub(crate) fn new(
        config: Config,
        paint: Box<dyn Paint + Send>,
        stream: Box<dyn Write + Send>,
        spin: bool,
    ) -> Self {
        Self {
            registry: Registry::new(),
            config,
            paint,
            stream,
            spin,
            frame_index: 0,
            last_line_widths: Vec::new(),
            cursor_hidden: false,
            destroyed: false,
            degraded: false,
        }
    }

    pub(crate) fn interval_ms(&self) -> u64 {
        self.config.style.interval.max(MIN_INTERVAL_MS)
    }

    fn guard(&self) -> Result<()> {
        if self.destroyed {
            return Err(Error::Destroyed);
        }
        Ok(())
    }

    // ── Operations ──────────────────────────────────────────────────────

    pub(crate) fn op_add(
        &mut self,
        name: &str,
        opts: SpinnerOptions,
    ) -> Result<(SpinnerRecord, TickerCmd)> {
        self.guard()?;
        let record = self.registry.add(name, opts, &self.config)?;
        let cmd = self.refresh();
        Ok((record, cmd))
    }

    pub(crate) fn op_update(
        &mut self,
        name: &str,
        opts: SpinnerOptions,
        forced: Option<Status>,
    ) -> Result<(SpinnerRecord, TickerCmd)> {
        self.guard()?;
        let record = self.registry.apply(name, opts, forced)?;
        let cmd = self.refresh();
        Ok((record, cmd))
    }

    pub(crate) fn op_remove(&mut self, name: &str) -> Result<(SpinnerRecord, TickerCmd)> {
        self.guard()?;
        let record = self.registry.remove(name)?;
        let cmd = self.refresh();
        Ok((record, cmd))
    }

    /// Settle every live spinner. Never fails: after `destroy` this is a
    /// no-op that reports an empty snapshot.
    pub(crate) fn op_stop_all(
        &mut self,
        verdict: Option<Status>,
    ) -> (IndexMap<String, SpinnerRecord>, TickerCmd) {
        if self.destroyed {
            return (IndexMap::new(), TickerCmd::Stop);
        }
        self.registry.stop_all(verdict);
        // Snapshot before refresh: settling clears the registry.
        let snapshot = self.registry.snapshot();
        let cmd = self.refresh();
        (snapshot, cmd)
    }

    pub(crate) fn op_pick(&self, name: &str) -> Option<SpinnerRecord> {
        self.registry.pick(name)
    }

    pub(crate) fn op_has_active(&self) -> bool {
        !self.destroyed && self.registry.has_active()
    }

    /// Tear down: finish the display, restore the cursor, refuse further
    /// mutations. Idempotent.
    pub(crate) fn op_destroy(&mut self) -> TickerCmd {
        if self.destroyed {
            return TickerCmd::Stop;
        }
        if self.spin && !self.degraded && !self.registry.is_empty() {
            // Park the cursor below whatever is on screen so the shell
            // prompt lands after the spinner block, not inside it.
            let mut buf = OutputBuffer::new();
            let _ = ansi::cursor_down(&mut buf, rows(self.last_line_widths.len()));
            if buf.flush_to(&mut self.stream).is_err() {
                self.degraded = true;
            }
        }
        self.show_cursor();
        self.registry.clear();
        self.last_line_widths.clear();
        self.destroyed = true;
        TickerCmd::Stop
    }

    // ── Frame Loop ──────────────────────────────────────────────────────

    /// One animation tick. Returns false when the ticker should exit.
    pub(crate) fn tick(&mut self) -> bool {
        if self.destroyed || self.degraded || !self.spin {
            return false;
        }
        if !self.registry.has_active() {
            return false;
        }
        let glyph = self.config.style.frames[self.frame_index].clone();
        self.frame_index = (self.frame_index + 1) % self.config.style.frames.len();
        self.render_frame(&glyph);
        true
    }

    /// Repaint after a mutation and decide the ticker's fate.
    fn refresh(&mut self) -> TickerCmd {
        if !self.spin {
            self.raw_output();
            // The settle contract holds in raw mode too: once nothing
            // spins, the records have been displayed and are forgotten.
            if !self.registry.has_active() {
                self.registry.clear();
            }
            return TickerCmd::Keep;
        }
        if self.degraded {
            return TickerCmd::Stop;
        }
        self.hide_cursor();
        let glyph = self.config.style.frames[self.frame_index].clone();
        self.render_frame(&glyph);
        if self.registry.has_active() {
            TickerCmd::Start
        } else {
            self.settle();
            TickerCmd::Stop
        }
    }

    /// Final frame: everything has settled. Leave the block on screen,
    /// park the cursor below it, show the cursor, and forget the records.
    fn settle(&mut self) {
        let mut buf = OutputBuffer::new();
        let _ = ansi::cursor_down(&mut buf, rows(self.last_line_widths.len()));
        if buf.flush_to(&mut self.stream).is_err() {
            self.degrade();
        }
        self.show_cursor();
        self.registry.clear();
        self.last_line_widths.clear();
    }

    fn render_frame(&mut self, glyph: &str) {
        self.render_frame_at(glyph, detect::columns());
    }

    /// Compose and write one frame against an explicit column count.
    ///
    /// The width is re-read by the caller on every frame, so a terminal
    /// resize takes effect on the next tick.
    fn render_frame_at(&mut self, glyph: &str, columns: u16) {
        if self.degraded {
            return;
        }
        let has_active = self.registry.has_active();
        let (output, widths) = self.compose_frame(glyph, columns, has_active);

        let mut buf = OutputBuffer::new();
        let write_result = (|| -> io::Result<()> {
            if !has_active {
                // Settling frame: wipe everything below the cursor once
                // instead of doing per-row cleanup.
                ansi::clear_screen_down(&mut buf)?;
            }
            buf.push_str(&output);
            ansi::cursor_up(&mut buf, rows(widths.len()))?;
            if has_active {
                Self::clean_trailing(&mut buf, &self.last_line_widths, &widths)?;
            }
            buf.flush_to(&mut self.stream)
        })();

        if write_result.is_err() {
            self.degrade();
            return;
        }
        self.last_line_widths = widths;
    }

    /// Erase residue the previous frame left beyond the new frame.
    ///
    /// Runs with the cursor at the top-left of the block. Only rows whose
    /// previous width exceeds the new width are touched, and each is
    /// cleared from the new width's column to the end of the line. Rows
    /// below the new block are wiped with a single clear-screen-down.
    fn clean_trailing(
        buf: &mut OutputBuffer,
        prev: &[usize],
        new: &[usize],
    ) -> io::Result<()> {
        for (row, (&old_w, &new_w)) in prev.iter().zip(new.iter()).enumerate() {
            if old_w <= new_w {
                continue;
            }
            ansi::cursor_down(buf, rows(row))?;
            ansi::cursor_forward(buf, rows(new_w))?;
            ansi::clear_line_right(buf)?;
            ansi::cursor_back(buf, rows(new_w))?;
            ansi::cursor_up(buf, rows(row))?;
        }
        if prev.len() > new.len() {
            ansi::cursor_down(buf, rows(new.len()))?;
            ansi::clear_screen_down(buf)?;
            ansi::cursor_up(buf, rows(new.len()))?;
        }
        Ok(())
    }

    /// Render every record into one frame string plus per-row widths.
    ///
    /// Settled and stopped lines are wrapped only while other spinners
    /// are still animating: a lone final line has no animation width to
    /// collide with, so it keeps the caller's text verbatim.
    fn compose_frame(&self, glyph: &str, columns: u16, has_active: bool) -> (String, Vec<usize>) {
        let mut output = String::new();
        let mut widths = Vec::new();

        for (_, record) in self.registry.iter() {
            let indent = record.indent as usize;
            let line = match record.status {
                Status::Spinning => {
                    let prefix = indent + display_width(glyph) + 1;
                    let text = break_text(&record.text, prefix, columns);
                    widths.extend(line_widths(&text, prefix));
                    format!(
                        "{}{} {}",
                        " ".repeat(indent),
                        self.paint.paint(record.spinner_color, glyph),
                        self.paint.paint(record.color, &text),
                    )
                }
                Status::Succeed => self.settled_line(
                    record,
                    &record.succeed_prefix,
                    record.succeed_color,
                    columns,
                    has_active,
                    &mut widths,
                ),
                Status::Fail => self.settled_line(
                    record,
                    &record.fail_prefix,
                    record.fail_color,
                    columns,
                    has_active,
                    &mut widths,
                ),
                Status::Stopped | Status::NonSpinnable => {
                    let text = if has_active {
                        break_text(&record.text, indent, columns)
                    } else {
                        record.text.clone()
                    };
                    widths.extend(line_widths(&text, indent));
                    format!("{}{}", " ".repeat(indent), self.paint.paint(record.color, &text))
                }
            };
            output.push_str(&line);
            output.push('\n');
        }
        (output, widths)
    }

    fn settled_line(
        &self,
        record: &SpinnerRecord,
        prefix_glyph: &str,
        color: crate::Color,
        columns: u16,
        has_active: bool,
        widths: &mut Vec<usize>,
    ) -> String {
        let indent = record.indent as usize;
        let prefix = indent + display_width(prefix_glyph) + 1;
        let text = if has_active {
            break_text(&record.text, prefix, columns)
        } else {
            record.text.clone()
        };
        widths.extend(line_widths(&text, prefix));
        format!(
            "{}{} {}",
            " ".repeat(indent),
            self.paint.paint(color, prefix_glyph),
            self.paint.paint(color, &text),
        )
    }

    /// Non-TTY fallback: one plain line per registered spinner, appended.
    /// Write errors are ignored — a closed pipe should not take the
    /// program down with it.
    fn raw_output(&mut self) {
        let mut buf = OutputBuffer::new();
        for (_, record) in self.registry.iter() {
            buf.push_str("- ");
            buf.push_str(&record.text);
            buf.push_str("\n");
        }
        if let Err(err) = buf.flush_to(&mut self.stream) {
            log::debug!("raw spinner output dropped: {err}");
        }
    }

    // ── Cursor and Failure Handling ─────────────────────────────────────

    fn hide_cursor(&mut self) {
        if self.cursor_hidden {
            return;
        }
        if ansi::cursor_hide(&mut self.stream).is_err() {
            self.degrade();
            return;
        }
        self.cursor_hidden = true;
        lifecycle::mark_cursor_hidden();
    }

    fn show_cursor(&mut self) {
        if !self.cursor_hidden {
            return;
        }
        // Restore even when degraded: leaving the cursor invisible is
        // worse than one more failed write.
        let _ = ansi::cursor_show(&mut self.stream);
        self.cursor_hidden = false;
        lifecycle::mark_cursor_restored();
    }

    fn degrade(&mut self) {
        if self.degraded {
            return;
        }
        log::debug!("spinner stream write failed; rendering disabled");
        self.degraded = true;
        self.show_cursor();
    }
}

// ─── Ticker ──────────────────────────────────────────────────────────────────

/// The frame-advance thread: sleep one interval, lock, tick, repeat.
///
/// Exits on its own when a tick reports no remaining activity, or when
/// [`Ticker::stop`] raises the stop flag.
pub(crate) struct Ticker {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl Ticker {
    pub(crate) fn spawn(inner: Arc<Mutex<Inner>>, interval: Duration) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("spindrift-tick".to_string())
            .spawn(move || loop {
                thread::sleep(interval);
                if stop_flag.load(Ordering::Relaxed) {
                    break;
                }
                let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                if !inner.tick() {
                    break;
                }
            })?;
        Ok(Self {
            handle: Some(handle),
            stop,
        })
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Raise the stop flag and wait for the thread to exit.
    ///
    /// Callers must not hold the engine lock here — the ticker thread
    /// takes it on every iteration.
    pub(crate) fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
