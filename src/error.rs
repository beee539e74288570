use alloc::string::String;
use thiserror::Error;

/// Errors reported by the matcher.
///
/// Configuration errors are returned when constructing melodies, matchers and sessions.
/// `Precondition` and `UnknownSong` are returned by individual calls and never leave
/// the callee in a modified state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("reference melody '{name}' has no intervals")]
    EmptyMelody { name: String },
    #[error("reference melody '{name}' has {onsets} onsets, expected {expected} ({intervals} intervals + 1)", expected = .intervals + 1)]
    OnsetCountMismatch {
        name: String,
        intervals: usize,
        onsets: usize,
    },
    #[error("reference melody '{name}' has decreasing onsets at index {index}")]
    NonMonotonicOnsets { name: String, index: usize },
    #[error("reference melody '{name}' has a negative onset at index {index}")]
    NegativeOnset { name: String, index: usize },
    #[error("reference melody '{name}' has a non-finite {sequence} value at index {index}")]
    NonFiniteValue {
        name: String,
        sequence: &'static str,
        index: usize,
    },
    #[error("duplicate reference melody '{name}'")]
    DuplicateSong { name: String },
    #[error("no reference melodies given")]
    EmptyDatabase,
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("could not parse value '{token}' at position {index}")]
    ParseValue { token: String, index: usize },
    #[error("unknown song '{name}'")]
    UnknownSong { name: String },
    #[error("precondition violated: {0}")]
    Precondition(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
