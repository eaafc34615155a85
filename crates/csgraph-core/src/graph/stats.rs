//! Per-kind occurrence counters.
//!
//! Counters are bumped once per successfully processed source match, whether
//! or not the node already existed. External dependency names are the only
//! distinct-value tally.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Namespaces rooted here are treated as the standard library.
const RESERVED_PREFIX: &str = "System";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub files: usize,
    pub namespaces: usize,
    pub classes: usize,
    pub interfaces: usize,
    pub structs: usize,
    pub enums: usize,
    pub methods: usize,
    pub usings: usize,
    pub dependency_names: BTreeSet<String>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a using-directive target. Non-standard dotted namespaces
    /// contribute their first segment as an external dependency name.
    pub fn record_using(&mut self, namespace: &str) {
        self.usings += 1;
        if namespace.starts_with(RESERVED_PREFIX) {
            return;
        }
        if let Some((root, _)) = namespace.split_once('.') {
            self.dependency_names.insert(root.to_string());
        }
    }

    pub fn record_dependency(&mut self, name: &str) {
        self.dependency_names.insert(name.to_string());
    }

    pub fn merge(&mut self, other: Statistics) {
        self.files += other.files;
        self.namespaces += other.namespaces;
        self.classes += other.classes;
        self.interfaces += other.interfaces;
        self.structs += other.structs;
        self.enums += other.enums;
        self.methods += other.methods;
        self.usings += other.usings;
        self.dependency_names.extend(other.dependency_names);
    }

    pub fn to_output(&self) -> StatsOutput {
        StatsOutput {
            total_files: self.files,
            total_namespaces: self.namespaces,
            total_classes: self.classes,
            total_interfaces: self.interfaces,
            total_structs: self.structs,
            total_enums: self.enums,
            total_methods: self.methods,
            total_usings: self.usings,
            total_dependencies: self.dependency_names.len(),
        }
    }
}

/// Serialized form of [`Statistics`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsOutput {
    pub total_files: usize,
    pub total_namespaces: usize,
    pub total_classes: usize,
    pub total_interfaces: usize,
    pub total_structs: usize,
    pub total_enums: usize,
    pub total_methods: usize,
    pub total_usings: usize,
    pub total_dependencies: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_usings_are_not_dependencies() {
        let mut stats = Statistics::new();
        stats.record_using("System.Collections.Generic");
        stats.record_using("System");
        assert_eq!(stats.usings, 2);
        assert!(stats.dependency_names.is_empty());
    }

    #[test]
    fn external_using_records_root_segment() {
        let mut stats = Statistics::new();
        stats.record_using("Newtonsoft.Json.Linq");
        stats.record_using("Newtonsoft.Json");
        stats.record_using("Serilog"); // no dot segment
        assert_eq!(
            stats.dependency_names.iter().collect::<Vec<_>>(),
            vec!["Newtonsoft"]
        );
    }

    #[test]
    fn merge_sums_counts_and_unions_names() {
        let mut a = Statistics::new();
        a.classes = 2;
        a.record_dependency("Serilog");
        let mut b = Statistics::new();
        b.classes = 3;
        b.record_dependency("Serilog");
        b.record_dependency("Dapper");
        a.merge(b);
        assert_eq!(a.classes, 5);
        assert_eq!(a.to_output().total_dependencies, 2);
    }
}
