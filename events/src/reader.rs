use crate::error::Error;
use crate::frame::FrameParser;
use crate::LineHandler;
use log::*;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// Counters reported when the reader stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderSummary {
    /// Raw lines read from upstream.
    pub lines_read: usize,
    /// Payloads handed to the line handler.
    pub published: usize,
}

/// Reads SSE frames from an upstream source and hands each payload to a
/// [`LineHandler`].
pub struct InputReader<R> {
    source: R,
    parser: FrameParser,
}

impl InputReader<BufReader<Stdin>> {
    /// Reader over the process's standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> InputReader<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(source: R) -> Self {
        Self {
            source,
            parser: FrameParser::new(),
        }
    }

    /// Runs until upstream reaches EOF or a read fails.
    ///
    /// EOF is a normal stop. A read error is returned to the caller; either
    /// way the reader is consumed and nothing more is published.
    pub async fn run<H>(mut self, handler: &H) -> Result<ReaderSummary, Error>
    where
        H: LineHandler + ?Sized,
    {
        let mut summary = ReaderSummary::default();
        let mut line = String::new();

        loop {
            line.clear();
            if self.source.read_line(&mut line).await? == 0 {
                info!("EOF reached on upstream input, stopping input reading");
                break;
            }
            summary.lines_read += 1;

            if let Some(payload) = self.parser.push_line(&line) {
                trace!("Parsed upstream frame with {} byte payload", payload.len());
                handler.handle(&payload).await;
                summary.published += 1;
            }
        }

        if self.parser.has_partial_frame() {
            debug!("Discarding unterminated frame at end of upstream input");
        }

        Ok(summary)
    }
}
