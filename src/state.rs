//! Versioned workflow state and the read-only snapshots nodes receive.
//!
//! State is split into channels, each pairing a value with a version counter.
//! Nodes never see the live state: the engine hands every node a
//! [`StateSnapshot`] cloned at dispatch time and merges the node's partial
//! update afterwards, bumping a channel's version only when its content
//! actually changed. The versions are what make "did generation see new
//! evidence since last time" a cheap comparison instead of a deep diff.
//!
//! The question is deliberately not a channel. It is fixed when the run
//! starts and nothing downstream may rewrite it, so it is carried as a plain
//! immutable field and copied into every snapshot.
//!
//! # Snapshot independence
//!
//! ```rust
//! use draftsmith::evidence::Passage;
//! use draftsmith::state::WorkflowState;
//!
//! let mut state = WorkflowState::new("how do buffer overflows work?");
//! let before = state.snapshot();
//!
//! state
//!     .evidence
//!     .get_mut()
//!     .push(Passage::corpus("stack frames...", None));
//! state.evidence.bump();
//!
//! assert!(before.evidence.is_empty());
//! assert_eq!(before.evidence_version, 1);
//! assert_eq!(state.evidence.version(), 2);
//! ```

use crate::evidence::Passage;

/// A value paired with a version counter.
///
/// Versions start at 1 and only move forward; the engine bumps them when a
/// merged update changed the content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Channel<T> {
    value: T,
    version: u32,
}

impl<T> Channel<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self { value, version: 1 }
    }

    /// Read access to the current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Mutable access for the engine's merge step.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Current version of this channel.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Advances the version by one, saturating at `u32::MAX`.
    pub fn bump(&mut self) {
        self.version = self.version.saturating_add(1);
    }
}

/// Full mutable state for one workflow run.
#[derive(Clone, Debug)]
pub struct WorkflowState {
    /// The question being answered. Fixed for the lifetime of the run.
    pub question: String,
    /// Working set of evidence passages.
    pub evidence: Channel<Vec<Passage>>,
    /// Latest drafted answer, if generation has run.
    pub generation: Channel<Option<String>>,
    /// Set by grading when the evidence needs a web-search supplement;
    /// cleared once the supplement lands.
    pub needs_supplement: Channel<bool>,
}

impl WorkflowState {
    /// Fresh state for a run over `question`, with empty evidence, no
    /// generation, and the supplement flag unset.
    #[must_use]
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            evidence: Channel::new(Vec::new()),
            generation: Channel::new(None),
            needs_supplement: Channel::new(false),
        }
    }

    /// Clones the current state into an independent read-only view.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            question: self.question.clone(),
            evidence: self.evidence.get().clone(),
            evidence_version: self.evidence.version(),
            generation: self.generation.get().clone(),
            generation_version: self.generation.version(),
            needs_supplement: *self.needs_supplement.get(),
            supplement_version: self.needs_supplement.version(),
        }
    }
}

/// Read-only view of the state at one scheduling point.
///
/// Snapshots are genuinely detached: a node mutating its snapshot (it owns
/// it) has no effect on the live state, and later merges never reach back
/// into snapshots already handed out.
#[derive(Clone, Debug)]
pub struct StateSnapshot {
    pub question: String,
    pub evidence: Vec<Passage>,
    pub evidence_version: u32,
    pub generation: Option<String>,
    pub generation_version: u32,
    pub needs_supplement: bool,
    pub supplement_version: u32,
}
