//! csgraph core: builds a typed knowledge graph of a C# codebase.
//!
//! Structural entities (namespaces, types, members, package dependencies) are
//! recovered from source text with pattern recognizers and a brace-balanced
//! block extractor, then collected into a directed multi-relation graph with
//! per-kind statistics.

pub mod config;
pub mod csharp;
pub mod dotnet;
pub mod error;
pub mod graph;
pub mod output;
pub mod phases;
pub mod pipeline;
pub mod render;
