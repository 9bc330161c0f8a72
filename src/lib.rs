// SPDX-License-Identifier: MIT
//
// spindrift — multiple named terminal spinners with live updates.
//
// A [`SpinnerSet`] owns a registry of named spinners and renders them as
// a block of in-place-updating lines on stderr. Callers register
// spinners, push text and status updates at them by name, and settle
// them with a verdict; the set animates everything on a background
// thread until the last spinner settles.
//
// On a real terminal the set redraws the block in place, wrapping text
// to the live terminal width and hiding the cursor while animating. When
// stderr is piped, under CI, or on request, it falls back to appending
// one plain line per update so logs stay greppable.
//
//   let mut spinners = SpinnerSet::new(SetOptions::new());
//   spinners.add("build", SpinnerOptions::new().text("compiling"))?;
//   spinners.update("build", SpinnerOptions::new().text("linking"))?;
//   spinners.succeed("build", SpinnerOptions::new().text("built"))?;

pub mod animation;
pub mod color;
pub mod error;
pub mod options;
pub mod text;

mod engine;
mod lifecycle;
mod registry;

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indexmap::IndexMap;
use spin_term::detect;

use engine::{Inner, Ticker, TickerCmd};
use options::Config;

pub use animation::SpinnerStyle;
pub use color::{AnsiPaint, Color, NoPaint, Paint};
pub use engine::MIN_INTERVAL_MS;
pub use error::{Error, Result};
pub use options::{SetOptions, SpinnerOptions, MAX_INDENT};
pub use registry::{SpinnerRecord, Status};
pub use text::MAX_BREAKS;

// ─── SpinnerSet ─────────────────────────────────────────────────────────────

/// A set of named spinners sharing one output stream and one animation.
///
/// All methods are synchronous; the only background activity is the
/// frame-advance thread, which starts when a spinner begins animating
/// and exits when the last one settles. Dropping the set restores the
/// cursor and stops the thread.
pub struct SpinnerSet {
    inner: Arc<Mutex<Inner>>,
    ticker: Option<Ticker>,
    interval: Duration,
}

impl SpinnerSet {
    /// Create a spinner set rendering to stderr with ANSI colors.
    ///
    /// Animation is enabled only when stderr is an interactive terminal,
    /// no CI environment is detected, and the options allow it;
    /// otherwise the set uses the plain line-per-update fallback.
    #[must_use]
    pub fn new(options: SetOptions) -> Self {
        Self::build(options, Box::new(AnsiPaint), None)
    }

    /// Create a spinner set with a custom color implementation.
    #[must_use]
    pub fn with_paint(options: SetOptions, paint: impl Paint + Send + 'static) -> Self {
        Self::build(options, Box::new(paint), None)
    }

    /// Create a spinner set writing to an arbitrary stream.
    ///
    /// A custom stream is never assumed to be a terminal: the set always
    /// uses the plain line-per-update output and emits no escape
    /// sequences.
    #[must_use]
    pub fn with_stream(options: SetOptions, stream: impl Write + Send + 'static) -> Self {
        Self::build(options, Box::new(AnsiPaint), Some(Box::new(stream)))
    }

    fn build(
        options: SetOptions,
        paint: Box<dyn Paint + Send>,
        stream: Option<Box<dyn Write + Send>>,
    ) -> Self {
        let config = Config::from_options(options);
        let custom_stream = stream.is_some();
        let spin = !custom_stream
            && !config.disable_spins
            && !detect::ci_detected()
            && detect::is_interactive();
        if !spin && !config.disable_spins && !custom_stream {
            // Only worth a warning when the caller did not ask for it.
            log::warn!("stderr is not an interactive terminal; spinners fall back to plain lines");
        }

        lifecycle::install_hooks();

        let stream = stream.unwrap_or_else(|| Box::new(io::stderr()));
        let inner = Inner::new(config, paint, stream, spin);
        let interval = Duration::from_millis(inner.interval_ms());
        Self {
            inner: Arc::new(Mutex::new(inner)),
            ticker: None,
            interval,
        }
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Register a new spinner under `name` and start it spinning.
    ///
    /// The text defaults to the name. Fails on a blank name, a duplicate
    /// name, or after [`destroy`](Self::destroy).
    pub fn add(&mut self, name: &str, options: SpinnerOptions) -> Result<SpinnerRecord> {
        self.mutate(|inner| inner.op_add(name, options))
    }

    /// Merge `options` into the spinner registered under `name`.
    ///
    /// Only the supplied fields change. Setting the status back to
    /// [`Status::Spinning`] resumes a stopped spinner.
    pub fn update(&mut self, name: &str, options: SpinnerOptions) -> Result<SpinnerRecord> {
        self.mutate(|inner| inner.op_update(name, options, None))
    }

    /// Settle the spinner under `name` as succeeded.
    ///
    /// Any status in `options` is ignored; the other fields merge as in
    /// [`update`](Self::update).
    pub fn succeed(&mut self, name: &str, options: SpinnerOptions) -> Result<SpinnerRecord> {
        self.mutate(|inner| inner.op_update(name, options, Some(Status::Succeed)))
    }

    /// Settle the spinner under `name` as failed.
    pub fn fail(&mut self, name: &str, options: SpinnerOptions) -> Result<SpinnerRecord> {
        self.mutate(|inner| inner.op_update(name, options, Some(Status::Fail)))
    }

    /// Unregister the spinner under `name`. Remaining spinners keep
    /// their order and the block shrinks on the next frame.
    pub fn remove(&mut self, name: &str) -> Result<SpinnerRecord> {
        self.mutate(|inner| inner.op_remove(name))
    }

    /// Settle every live spinner at once.
    ///
    /// With `Some(Status::Succeed)` or `Some(Status::Fail)` each live
    /// spinner takes that verdict and the matching role color; with
    /// `None` (or a non-verdict status) they become [`Status::Stopped`].
    /// Returns the settled records in registration order — empty after
    /// [`destroy`](Self::destroy).
    pub fn stop_all(&mut self, verdict: Option<Status>) -> IndexMap<String, SpinnerRecord> {
        let (snapshot, cmd) = self.lock().op_stop_all(verdict);
        self.apply_cmd(cmd);
        snapshot
    }

    /// Tear the set down: stop the animation thread, restore the cursor,
    /// and reject all further mutations. Idempotent; also runs on drop.
    pub fn destroy(&mut self) {
        let cmd = self.lock().op_destroy();
        self.apply_cmd(cmd);
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// A copy of the record registered under `name`, if any.
    #[must_use]
    pub fn pick(&self, name: &str) -> Option<SpinnerRecord> {
        self.lock().op_pick(name)
    }

    /// Whether any spinner is still animating.
    #[must_use]
    pub fn has_active(&self) -> bool {
        self.lock().op_has_active()
    }

    // ── Plumbing ────────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate(
        &mut self,
        op: impl FnOnce(&mut Inner) -> Result<(SpinnerRecord, TickerCmd)>,
    ) -> Result<SpinnerRecord> {
        let (record, cmd) = op(&mut *self.lock())?; // guard drops before apply_cmd
        self.apply_cmd(cmd);
        Ok(record)
    }

    /// Act on a ticker decision. Must run with the engine lock released:
    /// stopping joins the ticker thread, and that thread takes the lock.
    fn apply_cmd(&mut self, cmd: TickerCmd) {
        match cmd {
            TickerCmd::Keep => {}
            TickerCmd::Start => {
                if self.ticker.as_ref().is_some_and(Ticker::is_finished) {
                    // The previous ticker exited on its own after a lull.
                    self.ticker = None;
                }
                if self.ticker.is_none() {
                    match Ticker::spawn(Arc::clone(&self.inner), self.interval) {
                        Ok(ticker) => self.ticker = Some(ticker),
                        Err(err) => {
                            log::warn!("could not start animation thread: {err}");
                        }
                    }
                }
            }
            TickerCmd::Stop => {
                if let Some(mut ticker) = self.ticker.take() {
                    ticker.stop();
                }
            }
        }
    }
}

impl Drop for SpinnerSet {
    fn drop(&mut self) {
        self.destroy();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex as StdMutex;

    /// A stream the test can read back after handing it over.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<StdMutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn set_with_buf() -> (SpinnerSet, SharedBuf) {
        let buf = SharedBuf::default();
        let set = SpinnerSet::with_stream(SetOptions::new(), buf.clone());
        (set, buf)
    }

    #[test]
    fn custom_streams_get_plain_line_output() {
        let (mut set, buf) = set_with_buf();
        set.add("fetch", SpinnerOptions::new().text("fetching sources"))
            .unwrap();
        assert_eq!(buf.contents(), "- fetching sources\n");
        assert!(!buf.contents().contains('\x1b'));
    }

    #[test]
    fn add_then_pick_round_trips_the_record() {
        let (mut set, _) = set_with_buf();
        set.add("a", SpinnerOptions::new().text("one").indent(2))
            .unwrap();
        let rec = set.pick("a").unwrap();
        assert_eq!(rec.text, "one");
        assert_eq!(rec.indent, 2);
        assert_eq!(rec.status, Status::Spinning);
        assert_eq!(set.pick("missing"), None);
    }

    #[test]
    fn duplicate_and_missing_names_error() {
        let (mut set, _) = set_with_buf();
        set.add("a", SpinnerOptions::new()).unwrap();
        assert_eq!(
            set.add("a", SpinnerOptions::new()),
            Err(Error::DuplicateName("a".into()))
        );
        assert_eq!(
            set.update("b", SpinnerOptions::new()),
            Err(Error::NotFound("b".into()))
        );
        assert_eq!(set.add(" ", SpinnerOptions::new()), Err(Error::InvalidName));
    }

    #[test]
    fn succeed_ignores_status_in_options() {
        let (mut set, _) = set_with_buf();
        set.add("a", SpinnerOptions::new()).unwrap();
        let rec = set
            .succeed("a", SpinnerOptions::new().status(Status::Stopped))
            .unwrap();
        assert_eq!(rec.status, Status::Succeed);
    }

    #[test]
    fn settling_every_spinner_clears_the_set() {
        let (mut set, _) = set_with_buf();
        set.add("a", SpinnerOptions::new()).unwrap();
        set.add("b", SpinnerOptions::new()).unwrap();
        assert!(set.has_active());

        set.succeed("a", SpinnerOptions::new()).unwrap();
        assert!(set.has_active());
        set.fail("b", SpinnerOptions::new()).unwrap();
        assert!(!set.has_active());
        // The set settled and forgot its records.
        assert_eq!(set.pick("a"), None);
    }

    #[test]
    fn stop_all_snapshot_is_in_registration_order() {
        let (mut set, _) = set_with_buf();
        for name in ["c", "a", "b"] {
            set.add(name, SpinnerOptions::new()).unwrap();
        }
        let snapshot = set.stop_all(None);
        let names: Vec<&String> = snapshot.keys().collect();
        assert_eq!(names, ["c", "a", "b"]);
        assert!(snapshot.values().all(|r| r.status == Status::Stopped));
    }

    #[test]
    fn destroy_is_idempotent_and_final() {
        let (mut set, _) = set_with_buf();
        set.add("a", SpinnerOptions::new()).unwrap();
        set.destroy();
        set.destroy();
        assert_eq!(set.add("b", SpinnerOptions::new()), Err(Error::Destroyed));
        assert!(set.stop_all(None).is_empty());
        assert!(!set.has_active());
    }

    #[test]
    fn update_after_remove_is_not_found() {
        let (mut set, _) = set_with_buf();
        set.add("a", SpinnerOptions::new()).unwrap();
        set.remove("a").unwrap();
        assert_eq!(
            set.fail("a", SpinnerOptions::new()),
            Err(Error::NotFound("a".into()))
        );
    }

    #[test]
    fn dropping_the_set_does_not_panic() {
        let (mut set, _) = set_with_buf();
        set.add("a", SpinnerOptions::new()).unwrap();
        drop(set);
    }
}
