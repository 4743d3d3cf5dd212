//! Incremental parser for SSE-framed upstream text.
//!
//! Lines are fed one at a time. A blank line completes the frame collected
//! so far; the parser then yields the frame's `data: ` payload, if it has one.
//! Frames without a `data: ` field are discarded.

use log::*;

const DATA_PREFIX: &str = "data: ";

/// Where the parser is between two completed frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    /// Collecting field lines for the current frame.
    Accumulating,
    /// The last line fed was the blank line that ended a frame.
    FrameReady,
}

#[derive(Debug)]
pub struct FrameParser {
    lines: Vec<String>,
    state: FrameState,
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            state: FrameState::Accumulating,
        }
    }

    /// True while part of a frame has been read but not yet terminated.
    pub fn has_partial_frame(&self) -> bool {
        self.state == FrameState::Accumulating && !self.lines.is_empty()
    }

    /// Feeds one raw line, with or without its `\n` / `\r\n` terminator.
    ///
    /// Returns the payload when this line completes a frame carrying data.
    pub fn push_line(&mut self, raw: &str) -> Option<String> {
        let line = raw.trim_end_matches(['\n', '\r']);

        if !line.is_empty() {
            self.state = FrameState::Accumulating;
            self.lines.push(line.to_owned());
            return None;
        }

        self.state = FrameState::FrameReady;
        let frame = std::mem::take(&mut self.lines);
        extract_payload(&frame)
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Value of the first `data: ` field in a completed frame, trimmed.
///
/// Empty payloads are treated as no payload at all. Any later `data: ` fields
/// in the same frame are dropped, since a line carries no embedded newline.
pub fn extract_payload(frame: &[String]) -> Option<String> {
    let mut data_fields = frame
        .iter()
        .filter_map(|line| line.trim_start().strip_prefix(DATA_PREFIX));
    let first = data_fields.next();

    let extra = data_fields.count();
    if extra > 0 {
        debug!("Discarding {extra} extra data field(s) in frame; only the first is published");
    }

    first
        .map(str::trim)
        .filter(|payload| !payload.is_empty())
        .map(str::to_owned)
}
