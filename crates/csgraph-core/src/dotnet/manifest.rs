//! Dependency manifests: `.csproj`, `packages.config`, `packages.lock.json`.
//!
//! The XML formats are scanned as text, without an XML parser. The lock file
//! is JSON and goes through `serde_json`.

use serde_json::Value;

use crate::config::{NodeKey, NodeKind, Relation};
use crate::error::ManifestError;
use crate::graph::knowledge_graph::{KnowledgeGraph, NodeData};
use crate::graph::stats::Statistics;

/// Manifest format, chosen by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    Project,
    PackagesConfig,
    LockFile,
}

impl ManifestKind {
    pub fn from_path(path: &str) -> Option<Self> {
        if path.ends_with(".csproj") {
            Some(Self::Project)
        } else if path.ends_with("packages.config") {
            Some(Self::PackagesConfig)
        } else if path.ends_with("packages.lock.json") {
            Some(Self::LockFile)
        } else {
            None
        }
    }

    /// Relation from the manifest node to each dependency it lists.
    pub fn relation(&self) -> Relation {
        match self {
            Self::LockFile => Relation::HasLockedDependency,
            Self::Project | Self::PackagesConfig => Relation::HasDependency,
        }
    }
}

/// One `(name, version)` entry read from a manifest. `version` is empty when
/// the manifest does not state one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    pub name: String,
    pub version: String,
}

impl PackageRef {
    fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Parse one manifest and write its `dependency_file` node, `dependency`
/// nodes and edges into `graph`. Returns the number of entries read.
///
/// A lock file that fails to parse leaves the graph untouched.
pub fn extract_manifest(
    graph: &mut KnowledgeGraph,
    stats: &mut Statistics,
    path: &str,
    text: &str,
) -> Result<usize, ManifestError> {
    let kind =
        ManifestKind::from_path(path).ok_or_else(|| ManifestError::Unrecognised(path.to_string()))?;
    let packages = match kind {
        ManifestKind::Project => parse_package_references(text),
        ManifestKind::PackagesConfig => parse_packages_config(text),
        ManifestKind::LockFile => parse_lock_file(path, text)?,
    };

    let file_id = graph.upsert_node(
        &NodeKey::new(NodeKind::DependencyFile, path),
        NodeData::DependencyFile {
            name: path.to_string(),
            path: path.to_string(),
        },
    );

    let relation = kind.relation();
    for package in &packages {
        let dep_id = graph.upsert_node(
            &NodeKey::new(NodeKind::Dependency, package.name.as_str()),
            NodeData::Dependency {
                name: package.name.clone(),
                version: package.version.clone(),
            },
        );
        graph.add_edge(&file_id, &dep_id, relation)?;
        stats.record_dependency(&package.name);
    }

    log::debug!("{path}: {} package entries", packages.len());
    Ok(packages.len())
}

/// `<PackageReference Include="N" Version="V" />`, or with the version as a
/// `<Version>` child element.
pub fn parse_package_references(content: &str) -> Vec<PackageRef> {
    const OPEN: &str = "<PackageReference";
    const CLOSE: &str = "</PackageReference>";

    let mut results = Vec::new();
    let mut search_from = 0;

    while let Some(pos) = content[search_from..].find(OPEN) {
        let abs_pos = search_from + pos;
        search_from = abs_pos + OPEN.len();
        let rest = &content[abs_pos..];

        let Some(gt) = rest.find('>') else {
            continue;
        };
        let element = &rest[..=gt];
        let Some(name) = extract_attr(element, "Include") else {
            continue;
        };

        let mut version = extract_attr(element, "Version");
        let self_closing = element.ends_with("/>");
        if version.is_none() && !self_closing {
            if let Some(close) = rest.find(CLOSE) {
                version = extract_element_text(&rest[gt + 1..close], "Version");
            }
        }

        results.push(PackageRef::new(name, version.unwrap_or_default()));
    }
    results
}

/// `<package id="N" version="V" ... />` entries of a `packages.config`.
pub fn parse_packages_config(content: &str) -> Vec<PackageRef> {
    const OPEN: &str = "<package";

    let mut results = Vec::new();
    let mut search_from = 0;

    while let Some(pos) = content[search_from..].find(OPEN) {
        let abs_pos = search_from + pos;
        search_from = abs_pos + OPEN.len();
        let rest = &content[abs_pos..];

        // `<packages>` shares the prefix.
        if !rest[OPEN.len()..].starts_with(char::is_whitespace) {
            continue;
        }
        let Some(gt) = rest.find('>') else {
            continue;
        };
        let element = &rest[..=gt];
        if let Some(name) = extract_attr(element, "id") {
            let version = extract_attr(element, "version").unwrap_or_default();
            results.push(PackageRef::new(name, version));
        }
    }
    results
}

/// NuGet lock file. Accepts a flat `dependencies` map of
/// `name -> { "resolved": V }` as well as the per-framework layout
/// `dependencies -> { tfm -> { name -> { "resolved": V } } }`.
pub fn parse_lock_file(path: &str, content: &str) -> Result<Vec<PackageRef>, ManifestError> {
    let root: Value =
        serde_json::from_str(content).map_err(|source| ManifestError::MalformedLock {
            path: path.to_string(),
            source,
        })?;
    let Some(root) = root.as_object() else {
        return Err(ManifestError::NotAnObject(path.to_string()));
    };

    let mut results = Vec::new();
    let Some(dependencies) = root.get("dependencies").and_then(Value::as_object) else {
        return Ok(results);
    };

    for (name, info) in dependencies {
        if let Some(version) = resolved_version(info) {
            results.push(PackageRef::new(name.as_str(), version));
            continue;
        }
        let Some(nested) = info.as_object().filter(|m| !m.is_empty()) else {
            continue;
        };
        if nested.values().any(|v| resolved_version(v).is_some()) {
            for (dep_name, dep_info) in nested {
                let version = resolved_version(dep_info).unwrap_or_default();
                results.push(PackageRef::new(dep_name.as_str(), version));
            }
        } else {
            // Flat entry without a resolved version.
            results.push(PackageRef::new(name.as_str(), ""));
        }
    }
    Ok(results)
}

fn resolved_version(info: &Value) -> Option<String> {
    info.get("resolved")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Text content of the first `<tag>value</tag>` in `content`.
fn extract_element_text(content: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = content.find(&open)? + open.len();
    let end = content[start..].find(&close)?;
    let text = content[start..start + end].trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Attribute value from an element string, double or single quoted. The
/// attribute name must start at a word boundary.
fn extract_attr(element: &str, attr: &str) -> Option<String> {
    for quote in ['"', '\''] {
        let pattern = format!("{attr}={quote}");
        let mut from = 0;
        while let Some(pos) = element[from..].find(&pattern) {
            let start = from + pos;
            from = start + pattern.len();
            let preceded_by_space = element[..start]
                .chars()
                .next_back()
                .is_some_and(char::is_whitespace);
            if !preceded_by_space {
                continue;
            }
            let value = &element[from..];
            if let Some(end) = value.find(quote) {
                return Some(value[..end].to_string());
            }
        }
    }
    None
}
