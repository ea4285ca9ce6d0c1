use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while building a table or computing its statistic.
#[derive(Debug, Error)]
pub enum Error {
    /// An axis saw more distinct labels than the configured limit allows. This aborts the whole
    /// run; no statistic is computed from a partially built table.
    #[error("too many distinct items on axis {axis} (limit is {limit})")]
    CapacityExceeded {
        /// Zero-based axis number.
        axis: usize,
        /// The limit that was hit.
        limit: usize,
    },

    /// An input line did not have the expected shape.
    #[error("line {line}: {reason}")]
    MalformedRecord {
        /// One-based line number in the input stream.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// An input or output file could not be opened.
    #[error("unable to open {}: {source}", path.display())]
    StreamUnavailable {
        /// The file that could not be opened.
        path: PathBuf,
        /// The underlying failure.
        source: io::Error,
    },

    /// The observed counts add up to more than a `u64` can hold.
    #[error("observed counts add up to more than {}", u64::MAX)]
    CountOverflow,

    /// Reading or writing an already-open stream failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A label tuple didn't have one label per axis.
    #[error("expected {expected} labels per record but got {found}")]
    WrongArity {
        /// Number of axes in the table.
        expected: usize,
        /// Number of labels supplied.
        found: usize,
    },

    /// The requested expected-value model can't be used with this many axes.
    #[error("{model} cannot be used with a {axes}-way table")]
    UnsupportedModel {
        /// Human-readable name of the model or correction.
        model: &'static str,
        /// Number of axes in the table.
        axes: usize,
    },

    /// A numeric argument was outside the domain of the chi-squared distribution.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Shorthand for results whose error type is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
