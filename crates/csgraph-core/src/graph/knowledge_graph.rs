//! In-memory knowledge graph backed by petgraph::DiGraph.
//!
//! Nodes are deduplicated by string id (first write wins, except that a stub
//! is upgraded by the first full declaration). Edges are a set keyed by
//! `(source, target, relation)`: re-adding a triple is a no-op, and two
//! different relations between the same pair are both kept.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::{AccessModifier, NodeKey, NodeKind, Parameter, Relation};
use crate::error::GraphError;

/// Attributes shared by classes, interfaces and structs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_modifier: Option<AccessModifier>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub inherits: Vec<String>,
    /// Created from a forward reference only.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stub: bool,
}

impl TypeInfo {
    pub fn stub(name: &str) -> Self {
        Self {
            name: name.to_string(),
            access_modifier: None,
            modifiers: Vec::new(),
            inherits: Vec::new(),
            stub: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    pub access_modifier: AccessModifier,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub return_type: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    pub access_modifier: AccessModifier,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub property_type: String,
    pub accessors: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    pub name: String,
    pub access_modifier: AccessModifier,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub event_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub access_modifier: AccessModifier,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub field_type: String,
}

/// Node data stored in the graph, tagged by `kind` when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeData {
    File {
        name: String,
        path: String,
    },
    DependencyFile {
        name: String,
        path: String,
    },
    Namespace {
        name: String,
    },
    Class(TypeInfo),
    Interface(TypeInfo),
    Struct(TypeInfo),
    Enum {
        name: String,
        access_modifier: AccessModifier,
    },
    EnumMember {
        name: String,
    },
    Method(MethodInfo),
    Property(PropertyInfo),
    Event(EventInfo),
    Field(FieldInfo),
    Dependency {
        name: String,
        version: String,
    },
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::File { .. } => NodeKind::File,
            NodeData::DependencyFile { .. } => NodeKind::DependencyFile,
            NodeData::Namespace { .. } => NodeKind::Namespace,
            NodeData::Class(_) => NodeKind::Class,
            NodeData::Interface(_) => NodeKind::Interface,
            NodeData::Struct(_) => NodeKind::Struct,
            NodeData::Enum { .. } => NodeKind::Enum,
            NodeData::EnumMember { .. } => NodeKind::EnumMember,
            NodeData::Method(_) => NodeKind::Method,
            NodeData::Property(_) => NodeKind::Property,
            NodeData::Event(_) => NodeKind::Event,
            NodeData::Field(_) => NodeKind::Field,
            NodeData::Dependency { .. } => NodeKind::Dependency,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            NodeData::File { name, .. }
            | NodeData::DependencyFile { name, .. }
            | NodeData::Namespace { name }
            | NodeData::Enum { name, .. }
            | NodeData::EnumMember { name }
            | NodeData::Dependency { name, .. } => name,
            NodeData::Class(info) | NodeData::Interface(info) | NodeData::Struct(info) => {
                &info.name
            }
            NodeData::Method(info) => &info.name,
            NodeData::Property(info) => &info.name,
            NodeData::Event(info) => &info.name,
            NodeData::Field(info) => &info.name,
        }
    }

    pub fn is_stub(&self) -> bool {
        match self {
            NodeData::Class(info) | NodeData::Interface(info) | NodeData::Struct(info) => {
                info.stub
            }
            _ => false,
        }
    }
}

/// The three declaration kinds that carry an inheritance list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
}

impl TypeKind {
    pub fn node_kind(&self) -> NodeKind {
        match self {
            TypeKind::Class => NodeKind::Class,
            TypeKind::Interface => NodeKind::Interface,
            TypeKind::Struct => NodeKind::Struct,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Struct => "struct",
        }
    }

    pub fn wrap(&self, info: TypeInfo) -> NodeData {
        match self {
            TypeKind::Class => NodeData::Class(info),
            TypeKind::Interface => NodeData::Interface(info),
            TypeKind::Struct => NodeData::Struct(info),
        }
    }

    /// Relation from a parent scope to a declaration of this kind.
    pub fn contains_relation(&self) -> Relation {
        match self {
            TypeKind::Class => Relation::ContainsClass,
            TypeKind::Interface => Relation::ContainsInterface,
            TypeKind::Struct => Relation::ContainsStruct,
        }
    }

    /// Relation from a declaration to each of its listed bases.
    pub fn inherits_relation(&self) -> Relation {
        match self {
            TypeKind::Interface => Relation::InheritsInterface,
            TypeKind::Class | TypeKind::Struct => Relation::Inherits,
        }
    }
}

/// Graph node weight: stable string id plus attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub data: NodeData,
}

impl std::fmt::Display for GraphNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

/// Wrapper around petgraph::DiGraph with upsert and relation-set semantics.
#[derive(Debug, Clone)]
pub struct KnowledgeGraph {
    graph: DiGraph<GraphNode, Relation>,
    /// O(1) string ID → NodeIndex lookup.
    id_index: HashMap<String, NodeIndex>,
    edge_index: HashSet<(NodeIndex, NodeIndex, Relation)>,
    /// Owner id → method names in declaration order, one entry per occurrence.
    declared_methods: BTreeMap<String, Vec<String>>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            id_index: HashMap::new(),
            edge_index: HashSet::new(),
            declared_methods: BTreeMap::new(),
        }
    }

    /// Create the node on first sight; later calls leave its attributes
    /// untouched unless the stored node is a stub and `data` is a full
    /// declaration. Returns the node id.
    pub fn upsert_node(&mut self, key: &NodeKey, data: NodeData) -> String {
        debug_assert_eq!(key.kind, data.kind());
        let id = key.id();
        self.insert(&id, data);
        id
    }

    /// Forward reference to a type that may never be declared. `label` is the
    /// qualified name; the stub's `name` is its last segment.
    pub fn ensure_stub(&mut self, kind: TypeKind, label: &str) -> String {
        let name = label.rsplit('.').next().unwrap_or(label);
        let key = NodeKey::new(kind.node_kind(), label);
        self.upsert_node(&key, kind.wrap(TypeInfo::stub(name)))
    }

    fn insert(&mut self, id: &str, data: NodeData) -> NodeIndex {
        if let Some(&idx) = self.id_index.get(id) {
            let node = &mut self.graph[idx];
            if node.data.is_stub() && !data.is_stub() && node.data.kind() == data.kind() {
                node.data = data;
            }
            idx
        } else {
            let idx = self.graph.add_node(GraphNode {
                id: id.to_string(),
                data,
            });
            self.id_index.insert(id.to_string(), idx);
            idx
        }
    }

    /// Add `source -[relation]-> target`. Returns `Ok(false)` when that exact
    /// triple already exists.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        relation: Relation,
    ) -> Result<bool, GraphError> {
        let from = self.index_of(source)?;
        let to = self.index_of(target)?;
        if !self.edge_index.insert((from, to, relation)) {
            return Ok(false);
        }
        self.graph.add_edge(from, to, relation);
        Ok(true)
    }

    fn index_of(&self, id: &str) -> Result<NodeIndex, GraphError> {
        self.id_index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))
    }

    /// Append a method name to its owner's declaration list.
    pub fn record_declared_method(&mut self, owner: &str, name: &str) {
        self.declared_methods
            .entry(owner.to_string())
            .or_default()
            .push(name.to_string());
    }

    /// Fold another graph into this one: nodes and edges in the other graph's
    /// insertion order, so merging per-unit fragments in input order matches
    /// a sequential pass.
    pub fn merge(&mut self, other: KnowledgeGraph) {
        let KnowledgeGraph {
            graph,
            declared_methods,
            ..
        } = other;

        let mut remap = HashMap::with_capacity(graph.node_count());
        for idx in graph.node_indices() {
            let node = &graph[idx];
            let new_idx = self.insert(&node.id, node.data.clone());
            remap.insert(idx, new_idx);
        }
        for edge in graph.edge_references() {
            let from = remap[&edge.source()];
            let to = remap[&edge.target()];
            let relation = *edge.weight();
            if self.edge_index.insert((from, to, relation)) {
                self.graph.add_edge(from, to, relation);
            }
        }
        for (owner, names) in declared_methods {
            self.declared_methods.entry(owner).or_default().extend(names);
        }
    }

    // --- Queries ---

    pub fn has_node(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    pub fn get_node_data(&self, id: &str) -> Option<&NodeData> {
        self.id_index
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
            .map(|n| &n.data)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// All edges as `(source id, target id, relation)` in insertion order.
    pub fn edges(&self) -> Vec<(&str, &str, Relation)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].id.as_str(),
                    self.graph[e.target()].id.as_str(),
                    *e.weight(),
                )
            })
            .collect()
    }

    pub fn edges_with_relation(&self, relation: Relation) -> Vec<(&str, &str)> {
        self.edges()
            .into_iter()
            .filter(|(_, _, r)| *r == relation)
            .map(|(s, t, _)| (s, t))
            .collect()
    }

    /// Targets reachable from `source` over edges labelled `relation`.
    pub fn targets(&self, source: &str, relation: Relation) -> Vec<&str> {
        let Some(&idx) = self.id_index.get(source) else {
            return Vec::new();
        };
        let mut out: Vec<(petgraph::graph::EdgeIndex, &str)> = self
            .graph
            .edges(idx)
            .filter(|e| *e.weight() == relation)
            .map(|e| (e.id(), self.graph[e.target()].id.as_str()))
            .collect();
        out.sort_by_key(|(edge, _)| *edge);
        out.into_iter().map(|(_, id)| id).collect()
    }

    /// Every relation recorded from `source` to `target`.
    pub fn relations_between(&self, source: &str, target: &str) -> Vec<Relation> {
        let (Some(&from), Some(&to)) = (self.id_index.get(source), self.id_index.get(target))
        else {
            return Vec::new();
        };
        let mut rels: Vec<Relation> = self
            .graph
            .edges_connecting(from, to)
            .map(|e| *e.weight())
            .collect();
        rels.sort();
        rels
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes().filter(|n| n.data.kind() == kind).count()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn declared_methods(&self) -> &BTreeMap<String, Vec<String>> {
        &self.declared_methods
    }

    /// Access the underlying petgraph for rendering and algorithms.
    pub fn inner_graph(&self) -> &DiGraph<GraphNode, Relation> {
        &self.graph
    }
}

impl Default for KnowledgeGraph {
    fn default() -> Self {
        Self::new()
    }
}
