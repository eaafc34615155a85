//! C# structural extraction.
//!
//! Recognizers run over raw source text in a fixed order: using directives,
//! then namespaces (recursively), then the types of each scope, then the
//! members of each type. Nothing here builds a syntax tree.

pub mod block;
pub mod members;
pub mod params;
pub mod patterns;
pub mod types;

use crate::config::{NodeKey, NodeKind, Relation};
use crate::error::ExtractError;
use crate::graph::knowledge_graph::{KnowledgeGraph, NodeData};
use crate::graph::stats::Statistics;
use patterns::USING_RE;

/// The mutable state every recognizer writes into.
pub struct ExtractContext<'a> {
    pub graph: &'a mut KnowledgeGraph,
    pub stats: &'a mut Statistics,
}

impl<'a> ExtractContext<'a> {
    pub fn new(graph: &'a mut KnowledgeGraph, stats: &'a mut Statistics) -> Self {
        Self { graph, stats }
    }
}

/// Run every recognizer over one source unit. Returns the file node id.
pub fn analyse_source(cx: &mut ExtractContext<'_>, path: &str, text: &str) -> String {
    let file_id = cx.graph.upsert_node(
        &NodeKey::new(NodeKind::File, path),
        NodeData::File {
            name: path.to_string(),
            path: path.to_string(),
        },
    );
    cx.stats.files += 1;

    process_usings(cx, text, &file_id);
    types::process_scope(cx, text, &file_id, "");
    file_id
}

/// Using directives become `USES_NAMESPACE` edges from the file.
pub fn process_usings(cx: &mut ExtractContext<'_>, content: &str, file_id: &str) {
    for caps in USING_RE.captures_iter(content) {
        let namespace = &caps[1];
        if let Err(e) = record_using(cx, namespace, file_id) {
            report("using directive", file_id, &caps[0], &e);
        }
    }
}

fn record_using(
    cx: &mut ExtractContext<'_>,
    namespace: &str,
    file_id: &str,
) -> Result<(), ExtractError> {
    let ns_id = cx.graph.upsert_node(
        &NodeKey::new(NodeKind::Namespace, namespace),
        NodeData::Namespace {
            name: namespace.to_string(),
        },
    );
    cx.graph.add_edge(file_id, &ns_id, Relation::UsesNamespace)?;
    cx.stats.record_using(namespace);
    Ok(())
}

/// Log a skipped match. The fragment is cut to one short line.
pub(crate) fn report(construct: &str, enclosing: &str, fragment: &str, err: &ExtractError) {
    log::warn!(
        "Skipping {construct} in {enclosing}: {err} (near `{}`)",
        snippet(fragment)
    );
}

fn snippet(fragment: &str) -> String {
    const MAX_CHARS: usize = 80;
    let flat = patterns::normalize_ws(fragment);
    match flat.char_indices().nth(MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}
