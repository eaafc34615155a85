//! Phase 3: Read dependency manifests into the graph.

use crate::config::InputUnit;
use crate::dotnet::manifest::extract_manifest;
use crate::graph::knowledge_graph::KnowledgeGraph;
use crate::graph::stats::Statistics;

/// Run the dependency phase. A manifest that fails to parse is logged and
/// skipped. Returns the number of manifests read successfully.
pub fn run_dependencies_phase(
    manifests: &[InputUnit],
    kg: &mut KnowledgeGraph,
    stats: &mut Statistics,
) -> usize {
    let mut read = 0;
    for unit in manifests {
        match extract_manifest(kg, stats, &unit.path, &unit.text) {
            Ok(_) => read += 1,
            Err(e) => log::warn!("Skipping manifest {}: {e}", unit.path),
        }
    }
    read
}
