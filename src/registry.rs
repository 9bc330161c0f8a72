// SPDX-License-Identifier: MIT
//
// The named spinner registry.
//
// An insertion-ordered map from reference name to record — registration
// order is render order, always. All mutation entry points funnel through
// here; the engine only ever reads. Nothing in this module touches the
// terminal, which keeps every rule (name validation, merge semantics,
// batch settling) testable without a TTY.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::options::{Config, SpinnerOptions, DEFAULT_STOPPED_COLOR};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The lifecycle state of one spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Animating; renders the current animation glyph.
    Spinning,
    /// Settled successfully; renders the succeed prefix.
    Succeed,
    /// Settled with failure; renders the fail prefix.
    Fail,
    /// Halted without a verdict; may be resumed by a later update.
    Stopped,
    /// A static line that never animates and never resumes.
    NonSpinnable,
}

impl Status {
    /// Terminal states are final: batch settling skips them and they
    /// contribute no animation activity.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeed | Self::Fail | Self::NonSpinnable)
    }

    /// Whether a spinner in this state drives the animation loop.
    #[must_use]
    pub const fn is_spinning(self) -> bool {
        matches!(self, Self::Spinning)
    }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// The fully-resolved state of one registered spinner.
///
/// Every field is concrete — option merging happens on the way in, so the
/// renderer never sees an absent value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinnerRecord {
    pub text: String,
    pub status: Status,
    pub indent: u16,
    pub color: crate::Color,
    pub spinner_color: crate::Color,
    pub succeed_color: crate::Color,
    pub fail_color: crate::Color,
    pub succeed_prefix: String,
    pub fail_prefix: String,
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// Insertion-ordered spinner store.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    records: IndexMap<String, SpinnerRecord>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidName);
        }
        Ok(())
    }

    /// Register a new spinner under `name`.
    ///
    /// The text defaults to the name itself, the status is always
    /// `Spinning` regardless of what the options say, and unset colors
    /// take the set-wide defaults.
    pub(crate) fn add(
        &mut self,
        name: &str,
        opts: SpinnerOptions,
        config: &Config,
    ) -> Result<SpinnerRecord> {
        Self::validate_name(name)?;
        if self.records.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }

        let opts = opts.normalized();
        let record = SpinnerRecord {
            text: opts.text.unwrap_or_else(|| name.to_string()),
            status: Status::Spinning,
            indent: opts.indent.unwrap_or(0),
            color: opts.color.unwrap_or(config.color),
            spinner_color: opts.spinner_color.unwrap_or(config.spinner_color),
            succeed_color: opts.succeed_color.unwrap_or(config.succeed_color),
            fail_color: opts.fail_color.unwrap_or(config.fail_color),
            succeed_prefix: config.succeed_prefix.clone(),
            fail_prefix: config.fail_prefix.clone(),
        };
        self.records.insert(name.to_string(), record.clone());
        Ok(record)
    }

    /// Merge `opts` into the record for `name`.
    ///
    /// Only the fields the caller supplied change; everything else keeps
    /// its current value. `forced` overrides any status in the options —
    /// the succeed/fail entry points use it so callers cannot smuggle a
    /// different status through the options argument.
    pub(crate) fn apply(
        &mut self,
        name: &str,
        opts: SpinnerOptions,
        forced: Option<Status>,
    ) -> Result<SpinnerRecord> {
        Self::validate_name(name)?;
        let record = self
            .records
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        let opts = opts.normalized();
        if let Some(text) = opts.text {
            record.text = text;
        }
        if let Some(indent) = opts.indent {
            record.indent = indent;
        }
        if let Some(color) = opts.color {
            record.color = color;
        }
        if let Some(color) = opts.spinner_color {
            record.spinner_color = color;
        }
        if let Some(color) = opts.succeed_color {
            record.succeed_color = color;
        }
        if let Some(color) = opts.fail_color {
            record.fail_color = color;
        }
        if let Some(status) = forced.or(opts.status) {
            record.status = status;
        }
        Ok(record.clone())
    }

    /// Remove the spinner registered under `name`, preserving the order
    /// of the remaining records.
    pub(crate) fn remove(&mut self, name: &str) -> Result<SpinnerRecord> {
        Self::validate_name(name)?;
        self.records
            .shift_remove(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Settle every non-terminal spinner in one pass.
    ///
    /// With a verdict (`Succeed` or `Fail`), each affected record takes
    /// that status and the matching role color; without one, records
    /// become `Stopped` in the stopped-text default color. Records already
    /// in a terminal state are untouched.
    pub(crate) fn stop_all(&mut self, verdict: Option<Status>) {
        for record in self.records.values_mut() {
            if record.status.is_terminal() {
                continue;
            }
            match verdict {
                Some(Status::Succeed) => {
                    record.status = Status::Succeed;
                    record.color = record.succeed_color;
                }
                Some(Status::Fail) => {
                    record.status = Status::Fail;
                    record.color = record.fail_color;
                }
                _ => {
                    record.status = Status::Stopped;
                    record.color = DEFAULT_STOPPED_COLOR;
                }
            }
        }
    }

    /// Look up a record by name without mutating anything.
    pub(crate) fn pick(&self, name: &str) -> Option<SpinnerRecord> {
        self.records.get(name).cloned()
    }

    /// Whether any registered spinner is still animating.
    pub(crate) fn has_active(&self) -> bool {
        self.records.values().any(|r| r.status.is_spinning())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &SpinnerRecord)> {
        self.records.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    /// An ordered copy of the whole registry.
    pub(crate) fn snapshot(&self) -> IndexMap<String, SpinnerRecord> {
        self.records.clone()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SetOptions;
    use crate::Color;
    use pretty_assertions::assert_eq;

    fn config() -> Config {
        Config::from_options(SetOptions::new())
    }

    // ── add ─────────────────────────────────────────────────────────────

    #[test]
    fn add_defaults_text_to_name() {
        let mut reg = Registry::new();
        let rec = reg.add("compile", SpinnerOptions::new(), &config()).unwrap();
        assert_eq!(rec.text, "compile");
        assert_eq!(rec.status, Status::Spinning);
        assert_eq!(rec.indent, 0);
    }

    #[test]
    fn add_forces_spinning_status() {
        let mut reg = Registry::new();
        let rec = reg
            .add(
                "done-already",
                SpinnerOptions::new().status(Status::Succeed),
                &config(),
            )
            .unwrap();
        assert_eq!(rec.status, Status::Spinning);
    }

    #[test]
    fn add_rejects_blank_names() {
        let mut reg = Registry::new();
        assert_eq!(
            reg.add("", SpinnerOptions::new(), &config()),
            Err(Error::InvalidName)
        );
        assert_eq!(
            reg.add("   ", SpinnerOptions::new(), &config()),
            Err(Error::InvalidName)
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn add_rejects_duplicates() {
        let mut reg = Registry::new();
        reg.add("a", SpinnerOptions::new(), &config()).unwrap();
        assert_eq!(
            reg.add("a", SpinnerOptions::new(), &config()),
            Err(Error::DuplicateName("a".into()))
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn add_applies_set_defaults_then_overrides() {
        let mut reg = Registry::new();
        let cfg = Config::from_options(SetOptions::new().color(Color::Cyan));
        let rec = reg
            .add("a", SpinnerOptions::new().spinner_color(Color::Magenta), &cfg)
            .unwrap();
        assert_eq!(rec.color, Color::Cyan); // from set config
        assert_eq!(rec.spinner_color, Color::Magenta); // per-spinner override
        assert_eq!(rec.succeed_color, Color::Green); // role default
    }

    // ── apply ───────────────────────────────────────────────────────────

    #[test]
    fn apply_merges_only_supplied_fields() {
        let mut reg = Registry::new();
        reg.add(
            "a",
            SpinnerOptions::new().text("first").color(Color::Blue),
            &config(),
        )
        .unwrap();

        let rec = reg
            .apply("a", SpinnerOptions::new().text("second"), None)
            .unwrap();
        assert_eq!(rec.text, "second");
        assert_eq!(rec.color, Color::Blue); // untouched
        assert_eq!(rec.status, Status::Spinning); // untouched
    }

    #[test]
    fn apply_forced_status_beats_options() {
        let mut reg = Registry::new();
        reg.add("a", SpinnerOptions::new(), &config()).unwrap();
        let rec = reg
            .apply(
                "a",
                SpinnerOptions::new().status(Status::Stopped),
                Some(Status::Fail),
            )
            .unwrap();
        assert_eq!(rec.status, Status::Fail);
    }

    #[test]
    fn apply_can_resume_a_stopped_spinner() {
        let mut reg = Registry::new();
        reg.add("a", SpinnerOptions::new(), &config()).unwrap();
        reg.apply("a", SpinnerOptions::new().status(Status::Stopped), None)
            .unwrap();
        assert!(!reg.has_active());

        let rec = reg
            .apply("a", SpinnerOptions::new().status(Status::Spinning), None)
            .unwrap();
        assert_eq!(rec.status, Status::Spinning);
        assert!(reg.has_active());
    }

    #[test]
    fn apply_unknown_name_fails() {
        let mut reg = Registry::new();
        assert_eq!(
            reg.apply("ghost", SpinnerOptions::new(), None),
            Err(Error::NotFound("ghost".into()))
        );
    }

    #[test]
    fn apply_drops_oversized_indent() {
        let mut reg = Registry::new();
        reg.add("a", SpinnerOptions::new().indent(4), &config())
            .unwrap();
        let rec = reg
            .apply("a", SpinnerOptions::new().indent(2000), None)
            .unwrap();
        assert_eq!(rec.indent, 4); // out-of-range update ignored
    }

    // ── remove ──────────────────────────────────────────────────────────

    #[test]
    fn remove_preserves_order_of_the_rest() {
        let mut reg = Registry::new();
        for name in ["a", "b", "c"] {
            reg.add(name, SpinnerOptions::new(), &config()).unwrap();
        }
        reg.remove("b").unwrap();
        let names: Vec<&String> = reg.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn remove_unknown_name_fails() {
        let mut reg = Registry::new();
        assert_eq!(reg.remove("x"), Err(Error::NotFound("x".into())));
    }

    // ── stop_all ────────────────────────────────────────────────────────

    #[test]
    fn stop_all_without_verdict_stops_and_grays() {
        let mut reg = Registry::new();
        reg.add("a", SpinnerOptions::new().color(Color::Blue), &config())
            .unwrap();
        reg.stop_all(None);
        let rec = reg.pick("a").unwrap();
        assert_eq!(rec.status, Status::Stopped);
        assert_eq!(rec.color, Color::Gray);
    }

    #[test]
    fn stop_all_with_verdict_applies_matching_color() {
        let mut reg = Registry::new();
        reg.add(
            "a",
            SpinnerOptions::new().succeed_color(Color::CyanBright),
            &config(),
        )
        .unwrap();
        reg.stop_all(Some(Status::Succeed));
        let rec = reg.pick("a").unwrap();
        assert_eq!(rec.status, Status::Succeed);
        assert_eq!(rec.color, Color::CyanBright);
    }

    #[test]
    fn stop_all_skips_terminal_records() {
        let mut reg = Registry::new();
        reg.add("done", SpinnerOptions::new().color(Color::Blue), &config())
            .unwrap();
        reg.apply("done", SpinnerOptions::new(), Some(Status::Succeed))
            .unwrap();
        reg.add("live", SpinnerOptions::new(), &config()).unwrap();

        reg.stop_all(Some(Status::Fail));
        assert_eq!(reg.pick("done").unwrap().status, Status::Succeed);
        assert_eq!(reg.pick("done").unwrap().color, Color::Blue);
        assert_eq!(reg.pick("live").unwrap().status, Status::Fail);
    }

    #[test]
    fn stop_all_nonsense_verdict_means_stopped() {
        // Spinning is not a settling verdict; treated like none.
        let mut reg = Registry::new();
        reg.add("a", SpinnerOptions::new(), &config()).unwrap();
        reg.stop_all(Some(Status::Spinning));
        assert_eq!(reg.pick("a").unwrap().status, Status::Stopped);
    }

    // ── activity ────────────────────────────────────────────────────────

    #[test]
    fn has_active_tracks_spinning_records_only() {
        let mut reg = Registry::new();
        assert!(!reg.has_active());
        reg.add("a", SpinnerOptions::new(), &config()).unwrap();
        assert!(reg.has_active());
        reg.apply("a", SpinnerOptions::new(), Some(Status::Succeed))
            .unwrap();
        assert!(!reg.has_active());
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let mut reg = Registry::new();
        for name in ["z", "m", "a"] {
            reg.add(name, SpinnerOptions::new(), &config()).unwrap();
        }
        let names: Vec<String> = reg.snapshot().keys().cloned().collect();
        assert_eq!(names, ["z", "m", "a"]);
    }
}
