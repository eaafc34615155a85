//! Graphviz DOT rendering, one fill colour per node kind.

use std::path::Path;

use petgraph::dot::Dot;

use crate::config::NodeKind;
use crate::graph::knowledge_graph::KnowledgeGraph;

pub fn kind_colour(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::File => "#ADD8E6",
        NodeKind::Namespace => "#87CEFA",
        NodeKind::Class => "#90EE90",
        NodeKind::Interface => "#32CD32",
        NodeKind::Struct => "#20B2AA",
        NodeKind::Enum => "#FFD700",
        NodeKind::EnumMember => "#FFA500",
        NodeKind::Method => "#FFE5B4",
        NodeKind::Property => "#FFB6C1",
        NodeKind::Event => "#E6E6FA",
        NodeKind::Field => "#DDA0DD",
        NodeKind::DependencyFile => "#C0C0C0",
        NodeKind::Dependency => "#8A2BE2",
    }
}

/// Render the graph as DOT. Nodes are labelled with their id, edges with
/// their relation.
pub fn render_dot(kg: &KnowledgeGraph) -> String {
    let dot = Dot::with_attr_getters(
        kg.inner_graph(),
        &[],
        &|_, _| String::new(),
        &|_, (_, node)| {
            format!(
                "style=filled, fillcolor=\"{}\"",
                kind_colour(node.data.kind())
            )
        },
    );
    format!("{dot}")
}

pub fn write_dot(kg: &KnowledgeGraph, path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_dot(kg))
}
