//! JSON-lines frame source and decision sink
//!
//! One frame per line: `{"observations":[{"cx":..,"cy":..,"w":..,"h":..}]}`,
//! with an optional `"frame"` number. Blank lines are skipped.

use crate::error::{PrecogError, Result};
use crate::types::FrameDecision;
use centroidtrack::Observation;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<u64>,
    #[serde(default)]
    pub observations: Vec<Observation>,
}

impl FrameRecord {
    /// Check the optional input frame number against the pipeline's counter.
    ///
    /// Returns false (and logs a warning) when they disagree.
    pub fn frame_matches(&self, expected: u64) -> bool {
        match self.frame {
            Some(frame) if frame != expected => {
                log::warn!(
                    "Input frame {} replayed as frame {}; decisions keep the replay count",
                    frame,
                    expected
                );
                false
            }
            _ => true,
        }
    }
}

/// Parse one line. `Ok(None)` for a blank line.
///
/// Works on raw bytes, so invalid UTF-8 is a per-line replay error.
pub fn parse_line(line_no: usize, line: impl AsRef<[u8]>) -> Result<Option<FrameRecord>> {
    let bytes = line.as_ref();
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(bytes)
        .map(Some)
        .map_err(|e| PrecogError::replay(line_no, e.to_string()))
}

/// Iterator over the frames of a JSON-lines stream.
///
/// A malformed line yields `Err(PrecogError::ReplayError)` and reading goes
/// on with the next line, also when the line is not valid UTF-8. Only a
/// failing read ends the stream, after its `IoError` is yielded.
pub struct ReplayReader<R: BufRead> {
    reader: R,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> ReplayReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            done: false,
        }
    }

    /// 1-based number of the last line read
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for ReplayReader<R> {
    type Item = Result<FrameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        while !self.done {
            buf.clear();
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line_no += 1;
                    match parse_line(self.line_no, &buf) {
                        Ok(None) => continue,
                        Ok(Some(record)) => return Some(Ok(record)),
                        Err(e) => return Some(Err(e)),
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
        None
    }
}

/// Writes one JSON object per decision
pub struct DecisionWriter<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> DecisionWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn write(&mut self, decision: &FrameDecision) -> Result<()> {
        serde_json::to_writer(&mut self.writer, decision)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        Ok(self.writer.flush()?)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
