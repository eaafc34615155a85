//! Core data types and configuration for csgraph analysis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::graph::knowledge_graph::NodeData;
use crate::graph::stats::StatsOutput;

/// Kind of node in the knowledge graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    File,
    DependencyFile,
    Namespace,
    Class,
    Interface,
    Struct,
    Enum,
    EnumMember,
    Method,
    Property,
    Event,
    Field,
    Dependency,
}

impl NodeKind {
    pub const ALL: [NodeKind; 13] = [
        Self::File,
        Self::DependencyFile,
        Self::Namespace,
        Self::Class,
        Self::Interface,
        Self::Struct,
        Self::Enum,
        Self::EnumMember,
        Self::Method,
        Self::Property,
        Self::Event,
        Self::Field,
        Self::Dependency,
    ];

    /// Returns the serialized `kind` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::DependencyFile => "dependency_file",
            Self::Namespace => "namespace",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::EnumMember => "enum_member",
            Self::Method => "method",
            Self::Property => "property",
            Self::Event => "event",
            Self::Field => "field",
            Self::Dependency => "dependency",
        }
    }

    /// Prefix used when rendering a node key as a string id.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::File => "File",
            Self::DependencyFile => "Dependency File",
            Self::Namespace => "Namespace",
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::Struct => "Struct",
            Self::Enum => "Enum",
            Self::EnumMember => "EnumMember",
            Self::Method => "Method",
            Self::Property => "Property",
            Self::Event => "Event",
            Self::Field => "Field",
            Self::Dependency => "Dependency",
        }
    }

    pub fn from_str_value(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite node identity: `(kind, qualified label)`.
///
/// Members embed their owner's id in the label, so two classes may each
/// declare a `Run` method without colliding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub kind: NodeKind,
    pub label: String,
}

impl NodeKey {
    pub fn new(kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
        }
    }

    /// Key for a member scoped under its owning node.
    pub fn member(kind: NodeKind, name: &str, owner_id: &str) -> Self {
        Self::new(kind, format!("{name} ({owner_id})"))
    }

    pub fn id(&self) -> String {
        format!("{}: {}", self.kind.id_prefix(), self.label)
    }
}

/// Typed relation label on a directed edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    ContainsNamespace,
    UsesNamespace,
    ContainsClass,
    ContainsInterface,
    ContainsStruct,
    ContainsEnum,
    Inherits,
    InheritsInterface,
    HasMethod,
    HasProperty,
    HasEvent,
    HasField,
    HasMember,
    HasDependency,
    HasLockedDependency,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContainsNamespace => "CONTAINS_NAMESPACE",
            Self::UsesNamespace => "USES_NAMESPACE",
            Self::ContainsClass => "CONTAINS_CLASS",
            Self::ContainsInterface => "CONTAINS_INTERFACE",
            Self::ContainsStruct => "CONTAINS_STRUCT",
            Self::ContainsEnum => "CONTAINS_ENUM",
            Self::Inherits => "INHERITS",
            Self::InheritsInterface => "INHERITS_INTERFACE",
            Self::HasMethod => "HAS_METHOD",
            Self::HasProperty => "HAS_PROPERTY",
            Self::HasEvent => "HAS_EVENT",
            Self::HasField => "HAS_FIELD",
            Self::HasMember => "HAS_MEMBER",
            Self::HasDependency => "HAS_DEPENDENCY",
            Self::HasLockedDependency => "HAS_LOCKED_DEPENDENCY",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// C# access modifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccessModifier {
    Public,
    Protected,
    Internal,
    Private,
}

impl AccessModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::Private => "private",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            "internal" => Some(Self::Internal),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    /// Parse an optional captured keyword, falling back to the C# default
    /// for the declaration context.
    pub fn or_default(captured: Option<&str>, default: AccessModifier) -> Self {
        captured.and_then(Self::parse).unwrap_or(default)
    }
}

impl std::fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter modifier keyword.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParameterModifier {
    Ref,
    Out,
    In,
    Params,
}

impl ParameterModifier {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ref" => Some(Self::Ref),
            "out" => Some(Self::Out),
            "in" => Some(Self::In),
            "params" => Some(Self::Params),
            _ => None,
        }
    }
}

/// One parsed method parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameter {
    /// Raw segment text as written.
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<ParameterModifier>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// A `(logical_path, text)` input unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputUnit {
    pub path: String,
    pub text: String,
}

impl InputUnit {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Configuration for an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub repo_path: String,
    /// Where `output::emit` writes the document; `-` is stdout.
    pub output_path: Option<String>,
    /// Optional Graphviz rendering target.
    pub dot_path: Option<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_max_file_size() -> u64 {
    1_000_000
}
fn default_parallel() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            repo_path: String::new(),
            output_path: None,
            dot_path: None,
            exclude_patterns: Vec::new(),
            max_file_size: default_max_file_size(),
            parallel: default_parallel(),
        }
    }
}

/// Result of an analysis run: the serialized output document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub graph: GraphOutput,
    pub metadata: MetadataOutput,
}

/// Node-link graph section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphOutput {
    #[serde(default = "default_true")]
    pub directed: bool,
    #[serde(default = "default_true")]
    pub multigraph: bool,
    #[serde(default)]
    pub nodes: Vec<NodeOutput>,
    #[serde(default)]
    pub links: Vec<LinkOutput>,
}

fn default_true() -> bool {
    true
}

impl Default for GraphOutput {
    fn default() -> Self {
        Self {
            directed: true,
            multigraph: true,
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }
}

/// Node in the output JSON: stable id plus kind-tagged attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeOutput {
    pub id: String,
    #[serde(flatten)]
    pub data: NodeData,
}

/// Edge in the output JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOutput {
    pub source: String,
    pub target: String,
    pub relation: Relation,
}

/// Metadata section of the output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataOutput {
    #[serde(default)]
    pub stats: StatsOutput,
    #[serde(default)]
    pub method_params: BTreeMap<String, Vec<Parameter>>,
    #[serde(default)]
    pub method_returns: BTreeMap<String, String>,
    #[serde(default)]
    pub class_methods: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub generator: String,
    #[serde(default)]
    pub root: String,
    #[serde(default)]
    pub analysed_at: String,
    #[serde(default)]
    pub analysis_duration_ms: f64,
    #[serde(default)]
    pub phase_timings: BTreeMap<String, f64>,
}
