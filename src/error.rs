//! Error types for draftcore.

use std::fmt;
use std::io;

/// Result type alias for draftcore operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for draftcore operations.
///
/// Only runtime conditions are reported here. Caller bugs such as an
/// unbalanced lock release are assertions, not errors.
#[derive(Debug)]
pub enum Error {
    /// I/O error while loading a dictionary.
    Io(io::Error),
    /// Location does not exist in the document.
    OutOfBounds {
        block: usize,
        offset: usize,
        blocks: usize,
        block_len: usize,
    },
    /// Text recorded in a history entry differs from the document.
    TextMismatch { expected: String, found: String },
    /// Malformed dictionary line (1-indexed).
    Dictionary { line: usize, reason: String },
    /// Dictionary contained no usable entries.
    EmptyDictionary,
    /// Unparsable configuration value.
    InvalidOption(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OutOfBounds {
                block,
                offset,
                blocks,
                block_len,
            } => {
                write!(
                    f,
                    "location {block}:{offset} out of bounds ({blocks} blocks, block length {block_len})"
                )
            }
            Self::TextMismatch { expected, found } => {
                write!(f, "text mismatch: expected {expected:?}, found {found:?}")
            }
            Self::Dictionary { line, reason } => {
                write!(f, "invalid dictionary entry at line {line}: {reason}")
            }
            Self::EmptyDictionary => write!(f, "dictionary has no entries"),
            Self::InvalidOption(s) => write!(f, "invalid option: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::OutOfBounds {
            block: 3,
            offset: 7,
            blocks: 2,
            block_len: 0,
        };
        assert!(err.to_string().contains("3:7"));

        let err = Error::Dictionary {
            line: 12,
            reason: "bad frequency".to_string(),
        };
        assert!(err.to_string().contains("line 12"));

        let err = Error::TextMismatch {
            expected: "ab".to_string(),
            found: "cd".to_string(),
        };
        assert!(err.to_string().contains("\"ab\""));

        let err = Error::InvalidOption("counter=fast".to_string());
        assert!(err.to_string().contains("counter=fast"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
