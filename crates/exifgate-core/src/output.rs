//! Rendering lookup responses as JSON or JSON Lines.
//!
//! JSON output is buffered until [`OutputWriter::finish`]: a single response
//! is written as a bare envelope, several as an array. JSON Lines output is
//! streamed, one envelope per line, as soon as each lookup completes.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::LookupResponse;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// A response tagged with the URL it answers.
#[derive(Debug, Clone, Serialize)]
pub struct UrlResponse {
    pub url: String,
    #[serde(flatten)]
    pub response: LookupResponse,
}

/// Writes lookup responses to any `Write` sink.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    pending: Vec<UrlResponse>,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects JSON; JSON Lines is always compact.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            pending: Vec::new(),
            items_written: 0,
        }
    }

    /// Record the response for `url`.
    pub fn write(&mut self, url: &str, response: LookupResponse) -> io::Result<()> {
        let item = UrlResponse {
            url: url.to_string(),
            response,
        };
        match self.format {
            OutputFormat::Json => self.pending.push(item),
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, &item).map_err(io::Error::other)?;
                writeln!(self.writer)?;
                self.items_written += 1;
            }
        }
        Ok(())
    }

    /// Flush buffered JSON output and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        let pending = std::mem::take(&mut self.pending);
        match pending.len() {
            0 => {}
            1 => self.emit(&pending[0].response)?,
            n => {
                self.emit(&pending)?;
                self.items_written += n - 1;
            }
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Responses written so far (JSON responses count once flushed).
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    fn emit<T: Serialize + ?Sized>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)?;
        self.items_written += 1;
        Ok(())
    }
}
