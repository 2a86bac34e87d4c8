//! Evidence passages and the typed updates nodes emit for them.
//!
//! A [`Passage`] is one unit of supporting context: either a chunk pulled
//! from the curated evidence store or a synthesized web-search supplement.
//! Nodes never mutate the shared evidence list directly; they return an
//! [`EvidenceUpdate`] and the engine applies it between steps, which keeps
//! replace-vs-append semantics in one place.

use serde::{Deserialize, Serialize};

/// Where a passage came from. Grading only ever filters corpus passages;
/// web supplements are appended after grading and bypass it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassageOrigin {
    /// Retrieved from the curated evidence store.
    Corpus,
    /// Synthesized from web search results.
    WebSearch,
}

/// A single piece of evidence considered while drafting an answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// The passage text handed to graders and the generator.
    pub content: String,
    /// Optional provenance label (document id, URL), when the store has one.
    pub source: Option<String>,
    /// Which collaborator produced this passage.
    pub origin: PassageOrigin,
}

impl Passage {
    /// Passage retrieved from the evidence store.
    #[must_use]
    pub fn corpus(content: impl Into<String>, source: Option<String>) -> Self {
        Self {
            content: content.into(),
            source,
            origin: PassageOrigin::Corpus,
        }
    }

    /// Passage synthesized from web search snippets.
    #[must_use]
    pub fn web(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: None,
            origin: PassageOrigin::WebSearch,
        }
    }
}

/// Renders passages into the context block handed to the oracle, blank-line
/// separated in evidence order. Drafting and grounding both use this, so the
/// answer is always judged against exactly the text it was drafted from.
#[must_use]
pub fn render_context(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(|passage| passage.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Update to the evidence channel, applied by the engine after a node runs.
///
/// `Replace` resets the working set (retrieval, grading); `Append` extends it
/// (web search). Keeping the distinction in the type means a node cannot
/// accidentally clobber supplements gathered by an earlier step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvidenceUpdate {
    /// Discard the current passages and install these instead.
    Replace(Vec<Passage>),
    /// Keep the current passages and add these after them.
    Append(Vec<Passage>),
}

impl EvidenceUpdate {
    /// Applies the update in place, preserving the order of survivors and
    /// the relative order of appended passages.
    pub fn apply(self, passages: &mut Vec<Passage>) {
        match self {
            EvidenceUpdate::Replace(next) => *passages = next,
            EvidenceUpdate::Append(mut extra) => passages.append(&mut extra),
        }
    }

    /// Number of passages carried by this update.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            EvidenceUpdate::Replace(p) | EvidenceUpdate::Append(p) => p.len(),
        }
    }

    /// Returns `true` when the update carries no passages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
