use std::sync::Arc;

use async_trait::async_trait;

use crate::evidence::{EvidenceUpdate, Passage};
use crate::node::{Node, NodeContext, NodeError, NodePartial};
use crate::search::SearchProvider;
use crate::state::StateSnapshot;

/// Supplements the evidence with a synthesized web-search passage.
///
/// Snippets from one search are concatenated into a single passage and
/// appended, so local and web evidence coexist. The supplement passage is
/// appended even when the search comes back empty; generation downstream
/// must always find a non-empty evidence set after this node. Clearing the
/// needs-supplement flag here records that the supplement request was
/// served.
pub struct WebSearchNode {
    provider: Arc<dyn SearchProvider>,
}

impl WebSearchNode {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Node for WebSearchNode {
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        ctx.emit("web_search", "searching the web")?;
        let snippets = self
            .provider
            .search(&snapshot.question)
            .await
            .map_err(|e| NodeError::Provider {
                provider: "tavily",
                message: e.to_string(),
            })?;
        ctx.emit("web_search", format!("gathered {} snippet(s)", snippets.len()))?;

        let supplement = Passage::web(snippets.join("\n"));
        Ok(NodePartial::new()
            .with_evidence(EvidenceUpdate::Append(vec![supplement]))
            .with_needs_supplement(false))
    }
}
