//! Event bus utilities: structured run events, sinks, and the broadcast bus.
//!
//! Nodes and the engine publish [`Event`]s through cloned flume senders; a
//! background listener fans them out to every registered [`EventSink`].

pub mod bus;
pub mod event;
pub mod sink;

pub use bus::EventBus;
pub use event::{DiagnosticEvent, Event, NodeEvent};
pub use sink::{EventSink, MemorySink, StdOutSink};
