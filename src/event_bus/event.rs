use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A structured observation emitted while a run executes.
///
/// Node events carry the emitting station and step; diagnostics come from
/// the engine itself (routing choices, cap warnings, merge summaries).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    Node(NodeEvent),
    Diagnostic(DiagnosticEvent),
}

impl Event {
    pub fn node_message(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Event::Node(NodeEvent::new(None, None, scope.into(), message.into()))
    }

    pub fn node_message_with_meta(
        node_id: impl Into<String>,
        step: u64,
        scope: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Event::Node(NodeEvent::new(
            Some(node_id.into()),
            Some(step),
            scope.into(),
            message.into(),
        ))
    }

    pub fn diagnostic(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Event::Diagnostic(DiagnosticEvent {
            scope: scope.into(),
            message: message.into(),
            timestamp: Utc::now(),
        })
    }

    pub fn scope_label(&self) -> &str {
        match self {
            Event::Node(node) => node.scope(),
            Event::Diagnostic(diag) => diag.scope(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Event::Node(node) => node.message(),
            Event::Diagnostic(diag) => diag.message(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Event::Node(node) => node.timestamp(),
            Event::Diagnostic(diag) => diag.timestamp,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Node(node) => match (node.node_id(), node.step()) {
                (Some(id), Some(step)) => {
                    write!(f, "[{id}@{step}] {}: {}", node.scope(), node.message())
                }
                (Some(id), None) => write!(f, "[{id}] {}: {}", node.scope(), node.message()),
                (None, Some(step)) => {
                    write!(f, "[step {step}] {}: {}", node.scope(), node.message())
                }
                (None, None) => write!(f, "{}: {}", node.scope(), node.message()),
            },
            Event::Diagnostic(diag) => write!(f, "{}: {}", diag.scope(), diag.message()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeEvent {
    node_id: Option<String>,
    step: Option<u64>,
    scope: String,
    message: String,
    timestamp: DateTime<Utc>,
}

impl NodeEvent {
    pub fn new(node_id: Option<String>, step: Option<u64>, scope: String, message: String) -> Self {
        Self {
            node_id,
            step,
            scope,
            message,
            timestamp: Utc::now(),
        }
    }

    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    pub fn step(&self) -> Option<u64> {
        self.step
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosticEvent {
    scope: String,
    message: String,
    timestamp: DateTime<Utc>,
}

impl DiagnosticEvent {
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
