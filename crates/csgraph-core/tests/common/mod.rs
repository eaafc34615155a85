//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use csgraph_core::config::{AnalysisConfig, AnalysisResult, InputUnit, Relation};
use csgraph_core::graph::knowledge_graph::{KnowledgeGraph, NodeData};
use csgraph_core::graph::stats::Statistics;
use csgraph_core::pipeline;

// ---------------------------------------------------------------------------
// Fixture path resolution
// ---------------------------------------------------------------------------

/// Resolve `tests/fixtures/{name}` relative to the workspace root.
pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .join("../../tests/fixtures")
        .join(name)
        .canonicalize()
        .unwrap_or_else(|_| {
            Path::new(manifest_dir)
                .join("../../tests/fixtures")
                .join(name)
        })
}

pub fn fixture_config(name: &str) -> AnalysisConfig {
    AnalysisConfig {
        repo_path: fixture_path(name).to_string_lossy().to_string(),
        ..Default::default()
    }
}

/// Run the whole pipeline on a fixture directory.
pub fn run_fixture(name: &str, parallel: bool) -> AnalysisResult {
    let config = AnalysisConfig {
        parallel,
        ..fixture_config(name)
    };
    pipeline::run_pipeline(&config, None).expect("pipeline should succeed on fixture")
}

// ---------------------------------------------------------------------------
// In-memory extraction
// ---------------------------------------------------------------------------

/// Extract a single source text under the path `Test.cs`.
pub fn analyse_one(text: &str) -> (KnowledgeGraph, Statistics) {
    pipeline::analyse_inputs(&[InputUnit::new("Test.cs", text)], &[], false)
}

/// Extract several `(path, text)` sources.
pub fn analyse_many(sources: &[(&str, &str)], parallel: bool) -> (KnowledgeGraph, Statistics) {
    let units: Vec<InputUnit> = sources
        .iter()
        .map(|(path, text)| InputUnit::new(*path, *text))
        .collect();
    pipeline::analyse_inputs(&units, &[], parallel)
}

// ---------------------------------------------------------------------------
// Graph extractors
// ---------------------------------------------------------------------------

/// Targets of `source -[relation]->`, as owned strings.
pub fn targets(kg: &KnowledgeGraph, source: &str, relation: Relation) -> Vec<String> {
    kg.targets(source, relation)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Sorted node ids.
pub fn node_ids(kg: &KnowledgeGraph) -> Vec<String> {
    let mut ids: Vec<String> = kg.nodes().map(|n| n.id.clone()).collect();
    ids.sort();
    ids
}

/// Sorted `(source, target, relation)` triples.
pub fn edge_set(kg: &KnowledgeGraph) -> Vec<(String, String, Relation)> {
    let mut edges: Vec<_> = kg
        .edges()
        .into_iter()
        .map(|(s, t, r)| (s.to_string(), t.to_string(), r))
        .collect();
    edges.sort();
    edges
}

/// Node data for `id`, panicking with the id when absent.
pub fn node<'a>(kg: &'a KnowledgeGraph, id: &str) -> &'a NodeData {
    kg.get_node_data(id)
        .unwrap_or_else(|| panic!("missing node {id}"))
}
