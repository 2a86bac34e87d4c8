#[macro_use]
extern crate proptest;

use proptest::prelude::{Strategy, any, prop};

use std::sync::Arc;

use draftsmith::event_bus::EventBus;
use draftsmith::evidence::{EvidenceUpdate, Passage};
use draftsmith::llm::{Oracle, RelevanceGrader};
use draftsmith::node::{Node, NodeContext};
use draftsmith::nodes::GradeDocsNode;
use draftsmith::state::StateSnapshot;
use draftsmith::verdict::RelevanceVerdict;

mod common;
use common::*;

fn block_on<F: std::future::Future<Output = ()>>(fut: F) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    rt.block_on(fut);
}

/// Passage contents paired with the verdict the oracle will hand down.
fn passage_plan_strategy() -> impl Strategy<Value = Vec<(String, bool)>> {
    prop::collection::vec(
        (
            prop::string::string_regex("[a-z]{4,20}").unwrap(),
            any::<bool>(),
        ),
        0..6,
    )
}

/// A verdict label with random surrounding whitespace and case flips.
fn cased(label: &'static str) -> impl Strategy<Value = String> {
    let chars: Vec<char> = label.chars().collect();
    (
        prop::collection::vec(any::<bool>(), chars.len()),
        0usize..3,
        0usize..3,
    )
        .prop_map(move |(flips, lead, trail)| {
            let mut out = String::new();
            out.push_str(&" ".repeat(lead));
            for (c, flip) in chars.iter().zip(flips) {
                if flip {
                    out.extend(c.to_uppercase());
                } else {
                    out.push(*c);
                }
            }
            out.push_str(&" ".repeat(trail));
            out
        })
}

proptest! {
    /// Grading keeps exactly the relevant passages, in their original
    /// order, and requests a supplement iff something was rejected or
    /// nothing survived.
    #[test]
    fn prop_grading_filters_in_order_and_flags_insufficiency(plan in passage_plan_strategy()) {
        let replies: Vec<String> = plan
            .iter()
            .map(|(_, relevant)| score(if *relevant { "yes" } else { "no" }))
            .collect();
        let oracle = ScriptedOracle::new(replies);
        let node = GradeDocsNode::new(RelevanceGrader::new(oracle.clone() as Arc<dyn Oracle>));

        let passages: Vec<Passage> = plan
            .iter()
            .map(|(content, _)| Passage::corpus(content.clone(), None))
            .collect();
        let expected_kept: Vec<Passage> = plan
            .iter()
            .filter(|(_, relevant)| *relevant)
            .map(|(content, _)| Passage::corpus(content.clone(), None))
            .collect();
        let any_rejected = plan.iter().any(|(_, relevant)| !relevant);
        let expect_flag = any_rejected || expected_kept.is_empty();

        block_on(async move {
            let bus = EventBus::with_sinks(vec![]);
            let ctx = NodeContext {
                node_id: "grade_docs".into(),
                step: 1,
                event_bus_sender: bus.get_sender(),
            };
            let snapshot = StateSnapshot {
                question: "q".into(),
                evidence: passages,
                evidence_version: 1,
                generation: None,
                generation_version: 1,
                needs_supplement: false,
                supplement_version: 1,
            };

            let partial = node.run(snapshot, ctx).await.unwrap();

            assert_eq!(partial.evidence, Some(EvidenceUpdate::Replace(expected_kept)));
            assert_eq!(partial.needs_supplement, Some(expect_flag));

            // One relevance verdict per passage, asked in evidence order.
            let prompts = oracle.structured_prompts();
            assert_eq!(prompts.len(), plan.len());
            for (prompt, (content, _)) in prompts.iter().zip(&plan) {
                assert!(prompt.contains(content));
            }
        });
    }
}

proptest! {
    /// Whitespace and letter case never change a verdict.
    #[test]
    fn prop_relevance_labels_normalize(raw_yes in cased("yes"), raw_no in cased("no")) {
        let relevant = RelevanceVerdict::parse(&format!(r#"{{"score": "{raw_yes}"}}"#)).unwrap();
        prop_assert_eq!(relevant, RelevanceVerdict::Relevant);

        let irrelevant = RelevanceVerdict::parse(&format!(r#"{{"score": "{raw_no}"}}"#)).unwrap();
        prop_assert_eq!(irrelevant, RelevanceVerdict::Irrelevant);
    }

    /// Unknown labels are rejected, never defaulted.
    #[test]
    fn prop_junk_labels_never_parse(label in "[a-z]{1,12}") {
        prop_assume!(label != "yes" && label != "no");
        let raw = format!(r#"{{"score": "{label}"}}"#);
        prop_assert!(RelevanceVerdict::parse(&raw).is_err());
    }
}
