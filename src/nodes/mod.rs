//! The four executable workflow stations.
//!
//! Each node owns the collaborator it talks to and nothing else; run-scoped
//! data arrives through the state snapshot and leaves as a partial update.

pub mod generate;
pub mod grade;
pub mod retrieve;
pub mod web_search;

pub use generate::GenerateNode;
pub use grade::GradeDocsNode;
pub use retrieve::RetrieveNode;
pub use web_search::WebSearchNode;
