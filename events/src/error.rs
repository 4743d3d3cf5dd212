//! Error types for the upstream reader.
use std::error::Error as StdError;
use std::fmt;

/// Error that ends the input reader.
///
/// The reader never retries; once one of these is returned no further lines
/// are published. The `source` holds the underlying I/O failure.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ReaderErrorKind,
}

/// Kinds of failure the reader can hit.
#[derive(Debug, PartialEq)]
pub enum ReaderErrorKind {
    /// Reading from the upstream source failed.
    Io,
    /// Upstream sent bytes that are not valid UTF-8.
    InvalidEncoding,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "Reader Error ({:?}): {source}", self.error_kind),
            None => write!(f, "Reader Error ({:?})", self.error_kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::InvalidData => ReaderErrorKind::InvalidEncoding,
            _ => ReaderErrorKind::Io,
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}
