// SPDX-License-Identifier: MIT
//
// Error taxonomy — the four conditions a caller can actually mishandle.
//
// Everything else the library encounters (malformed options, unwritable
// streams, absurd terminal widths) is recovered locally and never surfaces
// here. These four are raised synchronously at the offending call, because
// they all indicate a caller bug: reusing a name, typo'ing a name, writing
// after teardown, or passing a blank key.

use thiserror::Error;

/// Errors raised by spinner registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The spinner reference name was empty or blank.
    #[error("a spinner reference name must be a non-empty string")]
    InvalidName,

    /// `add` was called with a name that is already registered.
    #[error("spinner with name {0:?} already exists")]
    DuplicateName(String),

    /// A mutation or removal targeted a name with no registered spinner.
    #[error("no spinner registered under name {0:?}")]
    NotFound(String),

    /// A mutating operation was invoked after `destroy`.
    #[error("the spinner set has been destroyed")]
    Destroyed,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = Error::DuplicateName("build".into());
        assert!(err.to_string().contains("build"));

        let err = Error::NotFound("deploy".into());
        assert!(err.to_string().contains("deploy"));
    }

    #[test]
    fn errors_are_comparable() {
        assert_eq!(Error::InvalidName, Error::InvalidName);
        assert_ne!(
            Error::DuplicateName("a".into()),
            Error::DuplicateName("b".into())
        );
    }
}
