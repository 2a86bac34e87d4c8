//! Oracle-facing layer: client, prompts, and the typed callers around them.
//!
//! The [`Oracle`] trait is the seam between the workflow and the language
//! model. [`QuestionRouter`], the graders, and [`AnswerGenerator`] each own
//! one prompt/parse pairing so nodes and decisions never handle raw model
//! output themselves.

pub mod generator;
pub mod graders;
pub mod ollama;
pub mod prompts;
pub mod router;

pub use generator::AnswerGenerator;
pub use graders::{GroundingGrader, RelevanceGrader, ResolutionGrader};
pub use ollama::{OllamaClient, Oracle, OracleError};
pub use router::QuestionRouter;

use crate::node::NodeError;

/// Maps a failed oracle call into the fatal node-error taxonomy.
pub(crate) fn provider_error(err: OracleError) -> NodeError {
    NodeError::Provider {
        provider: "ollama",
        message: err.to_string(),
    }
}
