//! Core identifiers for the draftsmith workflow.
//!
//! The answering pipeline is a fixed state machine: a routed entry, a
//! retrieval stage, a grading stage, an optional web-search supplement, and
//! a generation stage that loops until its answer survives verification.
//! [`NodeKind`] names every station in that machine, including the virtual
//! `Start`/`End` endpoints that frame each run.
//!
//! Unlike frameworks that accept arbitrary string-named nodes, the vocabulary
//! here is closed on purpose: the engine's routing table, loop caps, and
//! channel logs all key off these variants, and an open set would push typos
//! into runtime errors.
//!
//! # Examples
//!
//! ```rust
//! use draftsmith::types::NodeKind;
//!
//! let entry = NodeKind::Start;
//! assert!(entry.is_start());
//! assert_eq!(NodeKind::GradeDocs.to_string(), "grade_docs");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a station in the answering workflow.
///
/// `Start` and `End` are virtual: they carry no executable behavior and exist
/// only as routing endpoints. The four interior variants each correspond to a
/// registered [`Node`](crate::node::Node) implementation.
///
/// # Examples
///
/// ```rust
/// use draftsmith::types::NodeKind;
///
/// // Virtual endpoints frame every run.
/// assert!(NodeKind::Start.is_start());
/// assert!(NodeKind::End.is_end());
///
/// // Interior stations are executable.
/// assert!(!NodeKind::Generate.is_start());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Virtual entry point. Has no implementation; the entry decision routes
    /// from here to either [`Retrieve`](Self::Retrieve) or
    /// [`WebSearch`](Self::WebSearch).
    Start,

    /// Fetches candidate passages from the evidence store.
    Retrieve,

    /// Grades retrieved passages for relevance and filters the misses.
    GradeDocs,

    /// Supplements the evidence with web search results.
    WebSearch,

    /// Drafts an answer from the accumulated evidence.
    Generate,

    /// Virtual terminal. Reaching it is the only successful way a run ends.
    End,
}

impl NodeKind {
    /// Stable lowercase name used in logs, events, and node contexts.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Retrieve => "retrieve",
            Self::GradeDocs => "grade_docs",
            Self::WebSearch => "web_search",
            Self::Generate => "generate",
            Self::End => "end",
        }
    }

    /// Returns `true` if this is the virtual [`Start`](Self::Start) endpoint.
    #[must_use]
    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }

    /// Returns `true` if this is the virtual [`End`](Self::End) endpoint.
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    /// Returns `true` for the executable interior stations.
    #[must_use]
    pub fn is_executable(&self) -> bool {
        !self.is_start() && !self.is_end()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
