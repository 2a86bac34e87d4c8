use std::io::{self, Result as IoResult, Stdout, Write};
use std::sync::{Arc, Mutex};

use super::event::Event;

/// Abstraction over an output target that consumes full Event objects.
pub trait EventSink: Sync + Send {
    /// Handle a structured event. The sink decides how to render it.
    fn handle(&mut self, event: &Event) -> IoResult<()>;
}

/// Line-oriented stdout sink.
pub struct StdOutSink {
    handle: Stdout,
}

impl Default for StdOutSink {
    fn default() -> Self {
        Self {
            handle: io::stdout(),
        }
    }
}

impl EventSink for StdOutSink {
    fn handle(&mut self, event: &Event) -> IoResult<()> {
        writeln!(
            self.handle,
            "{} {event}",
            event.timestamp().format("%H:%M:%S%.3f")
        )?;
        self.handle.flush()
    }
}

/// In-memory sink for testing and snapshots.
#[derive(Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<Event>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of all captured events.
    pub fn snapshot(&self) -> Vec<Event> {
        self.entries.lock().unwrap().clone()
    }

    /// Clear all captured events.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl EventSink for MemorySink {
    fn handle(&mut self, event: &Event) -> IoResult<()> {
        self.entries.lock().unwrap().push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_captures_and_clears() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer.handle(&Event::diagnostic("engine", "one")).unwrap();
        writer.handle(&Event::diagnostic("engine", "two")).unwrap();

        let events = sink.snapshot();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].message(), "two");

        sink.clear();
        assert!(sink.snapshot().is_empty());
    }
}
