use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = core::result::Result<T, Error>;

/// Errors that stop the HTTP server. Per-client failures never surface here;
/// they end only that client's stream.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ServerErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ServerErrorKind {
    /// The listener could not bind to the configured address.
    Bind(String),
    /// The accept loop failed after startup.
    Serve,
}

impl Error {
    pub(crate) fn bind(address: &str, err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ServerErrorKind::Bind(address.to_string()),
        }
    }

    pub(crate) fn serve(err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ServerErrorKind::Serve,
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

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match (&self.error_kind, &self.source) {
            (ServerErrorKind::Bind(address), Some(source)) => {
                write!(fmt, "failed to bind {address}: {source}")
            }
            (ServerErrorKind::Bind(address), None) => write!(fmt, "failed to bind {address}"),
            (ServerErrorKind::Serve, Some(source)) => write!(fmt, "server error: {source}"),
            (ServerErrorKind::Serve, None) => write!(fmt, "server error"),
        }
    }
}
