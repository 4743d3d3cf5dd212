use axum::response::sse::Event;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A single payload relayed from upstream to every subscriber.
///
/// Lines are shared between mailboxes, so cloning one is a reference count
/// bump rather than a copy of the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line(Arc<str>);

impl Line {
    pub fn new(payload: impl Into<Arc<str>>) -> Self {
        Self(payload.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the payload has nothing worth relaying.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Converts the line into an SSE event carrying it as the `data` field,
    /// rendered on the wire as `data: <payload>\n\n`.
    pub fn to_event(&self) -> Event {
        Event::default().data(self.as_str())
    }

    /// Leading characters of the payload, for log lines.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.0.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl Deref for Line {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Line {
    fn from(payload: &str) -> Self {
        Self::new(payload)
    }
}

impl From<String> for Line {
    fn from(payload: String) -> Self {
        Self::new(payload)
    }
}
