//! Typed verdicts parsed from oracle JSON replies.
//!
//! Every control-flow decision in the workflow rests on a one-key JSON
//! object produced by the oracle in JSON mode: the router emits
//! `{"datasource": ...}` and the three graders emit `{"score": ...}`.
//! These parsers validate that contract strictly. A reply that is not JSON,
//! not an object, missing its key, or carrying an unrecognized label is a
//! [`VerdictError`] rather than a guessed default, because a misread verdict
//! silently reroutes the whole pipeline.
//!
//! Label matching is tolerant only of trivia: surrounding whitespace and
//! letter case. `"Yes"` and `" no "` parse; `"maybe"` and `1` do not.

use miette::Diagnostic;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// A verdict reply that could not be understood.
///
/// Carried through [`NodeError`](crate::node::NodeError) and fatal to the
/// run; the engine never substitutes a fallback branch for a bad verdict.
#[derive(Debug, Error, Diagnostic)]
pub enum VerdictError {
    /// The reply was not valid JSON at all.
    #[error("verdict reply for `{field}` is not valid JSON")]
    #[diagnostic(
        code(draftsmith::verdict::syntax),
        help("the oracle must be invoked in JSON mode for verdict prompts")
    )]
    Syntax {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The reply parsed, but into an array, string, or other non-object.
    #[error("verdict reply for `{field}` is not a JSON object")]
    #[diagnostic(code(draftsmith::verdict::not_an_object))]
    NotAnObject { field: &'static str },

    /// The object is missing the single key the prompt demanded.
    #[error("verdict reply is missing the `{field}` key")]
    #[diagnostic(code(draftsmith::verdict::missing_field))]
    MissingField { field: &'static str },

    /// The key is present but its value is not one of the allowed labels.
    #[error("unrecognized `{field}` label {label}: expected {expected}")]
    #[diagnostic(
        code(draftsmith::verdict::unknown_label),
        help("verdict labels are fixed; an unexpected label is never coerced to a default")
    )]
    UnknownLabel {
        field: &'static str,
        label: String,
        expected: &'static str,
    },
}

/// Pulls the labelled string out of a one-key verdict object and normalizes
/// it to trimmed lowercase.
fn extract_label(
    raw: &str,
    field: &'static str,
    expected: &'static str,
) -> Result<String, VerdictError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|source| VerdictError::Syntax { field, source })?;
    let object = value
        .as_object()
        .ok_or(VerdictError::NotAnObject { field })?;
    let label = object
        .get(field)
        .ok_or(VerdictError::MissingField { field })?;
    match label.as_str() {
        Some(s) => Ok(s.trim().to_ascii_lowercase()),
        None => Err(VerdictError::UnknownLabel {
            field,
            label: label.to_string(),
            expected,
        }),
    }
}

const YES_NO: &str = "\"yes\" or \"no\"";

fn yes_no(raw: &str) -> Result<bool, VerdictError> {
    match extract_label(raw, "score", YES_NO)?.as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        other => Err(VerdictError::UnknownLabel {
            field: "score",
            label: format!("\"{other}\""),
            expected: YES_NO,
        }),
    }
}

/// Entry routing verdict: which collaborator should seed the evidence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteVerdict {
    /// The question is outside the curated corpus; go straight to web search.
    WebSearch,
    /// The question is in the corpus's wheelhouse; retrieve from the store.
    Vectorstore,
}

impl RouteVerdict {
    /// Parses a `{"datasource": ...}` reply.
    pub fn parse(raw: &str) -> Result<Self, VerdictError> {
        const EXPECTED: &str = "\"web_search\" or \"vectorstore\"";
        match extract_label(raw, "datasource", EXPECTED)?.as_str() {
            "web_search" => Ok(Self::WebSearch),
            "vectorstore" => Ok(Self::Vectorstore),
            other => Err(VerdictError::UnknownLabel {
                field: "datasource",
                label: format!("\"{other}\""),
                expected: EXPECTED,
            }),
        }
    }
}

impl fmt::Display for RouteVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WebSearch => f.write_str("web_search"),
            Self::Vectorstore => f.write_str("vectorstore"),
        }
    }
}

/// Per-passage relevance verdict from the document grader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelevanceVerdict {
    Relevant,
    Irrelevant,
}

impl RelevanceVerdict {
    /// Parses a `{"score": ...}` reply.
    pub fn parse(raw: &str) -> Result<Self, VerdictError> {
        Ok(if yes_no(raw)? {
            Self::Relevant
        } else {
            Self::Irrelevant
        })
    }

    #[must_use]
    pub fn is_relevant(&self) -> bool {
        matches!(self, Self::Relevant)
    }
}

impl fmt::Display for RelevanceVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relevant => f.write_str("relevant"),
            Self::Irrelevant => f.write_str("irrelevant"),
        }
    }
}

/// Whether a drafted answer is supported by the evidence it was given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundingVerdict {
    Grounded,
    NotGrounded,
}

impl GroundingVerdict {
    /// Parses a `{"score": ...}` reply.
    pub fn parse(raw: &str) -> Result<Self, VerdictError> {
        Ok(if yes_no(raw)? {
            Self::Grounded
        } else {
            Self::NotGrounded
        })
    }

    #[must_use]
    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::Grounded)
    }
}

impl fmt::Display for GroundingVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grounded => f.write_str("grounded"),
            Self::NotGrounded => f.write_str("not_grounded"),
        }
    }
}

/// Whether a drafted answer actually resolves the question asked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionVerdict {
    Resolves,
    DoesNotResolve,
}

impl ResolutionVerdict {
    /// Parses a `{"score": ...}` reply.
    pub fn parse(raw: &str) -> Result<Self, VerdictError> {
        Ok(if yes_no(raw)? {
            Self::Resolves
        } else {
            Self::DoesNotResolve
        })
    }

    #[must_use]
    pub fn resolves(&self) -> bool {
        matches!(self, Self::Resolves)
    }
}

impl fmt::Display for ResolutionVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolves => f.write_str("resolves"),
            Self::DoesNotResolve => f.write_str("does_not_resolve"),
        }
    }
}
