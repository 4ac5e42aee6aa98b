//! Configuration errors.
//!
//! The simulation itself has no recoverable failures: contract violations inside a
//! frame (bad power level, negative damage, stale index, empty weighted table) panic.
//! Loading balance data is the one place where bad input is expected, and it is
//! reported through [`TuningError`].

use std::fmt;

/// Why a [`crate::Tuning`] could not be loaded or was rejected.
#[derive(Debug)]
pub enum TuningError {
    /// Reading the tuning file failed.
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The JSON did not match the tuning schema.
    Parse(serde_json::Error),

    /// A weighted table has no rows, so nothing could ever be selected.
    EmptyTable {
        /// Which table (for logging).
        table: &'static str,
    },

    /// Every row of a weighted table has weight zero.
    ZeroWeight { table: &'static str },

    /// A scalar is outside the range the simulation can work with.
    InvalidValue {
        name: &'static str,
        value: f32,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read tuning file {path}: {source}"),
            Self::Parse(err) => write!(f, "invalid tuning JSON: {err}"),
            Self::EmptyTable { table } => write!(f, "weighted table `{table}` has no entries"),
            Self::ZeroWeight { table } => {
                write!(f, "weighted table `{table}` has a total weight of zero")
            }
            Self::InvalidValue {
                name,
                value,
                expected,
            } => write!(f, "tuning value `{name}` = {value} is invalid (expected {expected})"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
