//! Output document assembly and JSON writing.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use chrono::Utc;

use crate::config::{
    AnalysisConfig, AnalysisResult, GraphOutput, LinkOutput, MetadataOutput, NodeOutput,
};
use crate::graph::knowledge_graph::{KnowledgeGraph, NodeData};
use crate::graph::stats::Statistics;

/// `name version` of this library, recorded in every document.
pub fn generator() -> String {
    format!("csgraph {}", env!("CARGO_PKG_VERSION"))
}

/// Node-link form of the graph. Nodes and links keep insertion order.
pub fn graph_output(kg: &KnowledgeGraph) -> GraphOutput {
    let nodes = kg
        .nodes()
        .map(|node| NodeOutput {
            id: node.id.clone(),
            data: node.data.clone(),
        })
        .collect();
    let links = kg
        .edges()
        .into_iter()
        .map(|(source, target, relation)| LinkOutput {
            source: source.to_string(),
            target: target.to_string(),
            relation,
        })
        .collect();
    GraphOutput {
        directed: true,
        multigraph: true,
        nodes,
        links,
    }
}

/// Build the output document from the finished graph and counters.
pub fn build_result(
    config: &AnalysisConfig,
    kg: &KnowledgeGraph,
    stats: &Statistics,
    timings: &BTreeMap<String, f64>,
    total_ms: f64,
) -> AnalysisResult {
    let root = Path::new(&config.repo_path)
        .canonicalize()
        .unwrap_or_else(|_| Path::new(&config.repo_path).to_path_buf());

    // Method lookups come from the stored nodes, so they agree with the
    // node attributes.
    let mut method_params = BTreeMap::new();
    let mut method_returns = BTreeMap::new();
    for node in kg.nodes() {
        if let NodeData::Method(info) = &node.data {
            method_params.insert(node.id.clone(), info.parameters.clone());
            method_returns.insert(node.id.clone(), info.return_type.clone());
        }
    }

    AnalysisResult {
        graph: graph_output(kg),
        metadata: MetadataOutput {
            stats: stats.to_output(),
            method_params,
            method_returns,
            class_methods: kg.declared_methods().clone(),
            generator: generator(),
            root: root.to_string_lossy().to_string(),
            analysed_at: Utc::now().to_rfc3339(),
            analysis_duration_ms: total_ms,
            phase_timings: timings.clone(),
        },
    }
}

/// Write the analysis result to a JSON file.
pub fn write_output(result: &AnalysisResult, output_path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(output_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(result).map_err(std::io::Error::other)?;
    std::fs::write(output_path, json)
}

/// Emit the document to the configured `output_path`: a file, or stdout for
/// `-`. Without an output path nothing is written.
pub fn emit(result: &AnalysisResult, config: &AnalysisConfig) -> std::io::Result<()> {
    match config.output_path.as_deref() {
        None => Ok(()),
        Some("-") => {
            let mut out = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, result).map_err(std::io::Error::other)?;
            writeln!(out)
        }
        Some(path) => {
            write_output(result, path)?;
            log::info!("wrote {} nodes to {path}", result.graph.nodes.len());
            Ok(())
        }
    }
}
