//! Benchmarks for graph assembly and a full scripted workflow run.
//!
//! The oracle here is a stateless stub that always routes to the
//! vectorstore and approves every verdict, so each run walks the
//! shortest full path: retrieve, grade each passage, generate once,
//! verify, end. No network is involved.

use std::sync::Arc;

use async_trait::async_trait;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tokio::runtime::Runtime;

use draftsmith::app::App;
use draftsmith::config::RunLimits;
use draftsmith::evidence::Passage;
use draftsmith::llm::{Oracle, OracleError};
use draftsmith::retrieval::{EvidenceStore, RetrievalError};
use draftsmith::search::{SearchError, SearchProvider};
use draftsmith::workflow;

const PASSAGE_COUNTS: &[usize] = &[1, 4, 16];

/// Approves everything: routes to the vectorstore, grades every
/// passage relevant, and passes both verification checks.
struct AgreeableOracle;

#[async_trait]
impl Oracle for AgreeableOracle {
    async fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
        Ok("A short grounded answer for benchmarking.".to_owned())
    }

    async fn complete_structured(&self, prompt: &str) -> Result<String, OracleError> {
        if prompt.contains("'datasource'") {
            Ok(r#"{"datasource": "vectorstore"}"#.to_owned())
        } else {
            Ok(r#"{"score": "yes"}"#.to_owned())
        }
    }
}

struct CannedStore {
    passages: Vec<Passage>,
}

#[async_trait]
impl EvidenceStore for CannedStore {
    async fn retrieve(&self, _question: &str) -> Result<Vec<Passage>, RetrievalError> {
        Ok(self.passages.clone())
    }
}

/// Never reached on the happy path; returns one snippet if it is.
struct IdleSearch;

#[async_trait]
impl SearchProvider for IdleSearch {
    async fn search(&self, _question: &str) -> Result<Vec<String>, SearchError> {
        Ok(vec!["supplementary snippet".to_owned()])
    }
}

fn assemble(passage_count: usize) -> App {
    let passages = (0..passage_count)
        .map(|i| Passage::corpus(format!("passage {i} describing the product tiers"), None))
        .collect();
    workflow::build(
        Arc::new(AgreeableOracle),
        Arc::new(CannedStore { passages }),
        Arc::new(IdleSearch),
        RunLimits::default(),
    )
    .expect("standard wiring compiles")
}

fn bench_assembly(c: &mut Criterion) {
    c.bench_function("workflow_assembly", |b| b.iter(|| assemble(4)));
}

fn bench_scripted_run(c: &mut Criterion) {
    let runtime = Runtime::new().expect("runtime");
    let mut group = c.benchmark_group("scripted_run");

    for &count in PASSAGE_COUNTS {
        let app = assemble(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &app, |b, app| {
            b.to_async(&runtime).iter(|| async {
                app.invoke_with_sinks("How many seats does the team plan include?", vec![])
                    .await
                    .expect("scripted run completes")
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_assembly, bench_scripted_run);
criterion_main!(benches);
