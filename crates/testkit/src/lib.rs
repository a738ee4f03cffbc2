#![warn(missing_docs)]
//! Headless testing surfaces for AR sessions: event logs, scripted
//! collaborators and run metrics.

mod metrics;
mod scripted;

use anyhow::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use waymark_scene::TimedEvent;

pub use metrics::*;
pub use scripted::*;

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: BufWriter<File>,
    written: usize,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self {
            file: BufWriter::new(file),
            written: 0,
        })
    }

    /// Append one record to the log.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Append a batch of session events in order.
    pub fn write_events(&mut self, events: &[TimedEvent]) -> Result<()> {
        for event in events {
            self.write(event)?;
        }
        Ok(())
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}

/// Read a JSONL log back as untyped values, skipping blank lines.
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<serde_json::Value>> {
    let reader = BufReader::new(File::open(path)?);
    let mut values = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        values.push(serde_json::from_str(&line)?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core::FrameTick;
    use waymark_scene::{NodeId, SessionEvent};

    #[test]
    fn jsonl_sink_round_trips_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("events.jsonl");
        let events = vec![
            TimedEvent {
                tick: FrameTick(0),
                event: SessionEvent::SurfaceAvailability { available: true },
            },
            TimedEvent {
                tick: FrameTick(2),
                event: SessionEvent::GeocodeRequested { object: NodeId(2) },
            },
        ];

        let mut sink = JsonlSink::create(&path).expect("sink create");
        sink.write_events(&events).expect("write succeeds");
        sink.flush().unwrap();
        assert_eq!(sink.written(), 2);

        let values = read_jsonl(&path).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["event"], "surface_availability");
        assert_eq!(values[0]["available"], true);
        assert_eq!(values[1]["tick"], 2);
        assert_eq!(values[1]["object"], 2);
    }
}
