//! Phase 1: Walk the root directory, collect C# sources and manifests.

use std::path::Path;

use walkdir::WalkDir;

use crate::config::{AnalysisConfig, InputUnit};
use crate::dotnet::manifest::ManifestKind;
use crate::error::{AnalysisError, Result};

/// Directory names never descended into.
const DEFAULT_EXCLUDES: &[&str] = &[
    "bin",
    "obj",
    ".vs",
    ".git",
    ".idea",
    ".vscode",
    "packages",
    "Properties",
    "node_modules",
    ".nuget",
    "TestResults",
    "Migrations",
];

/// File names never read.
const IGNORED_FILES: &[&str] = &[".gitignore", ".gitattributes", ".editorconfig"];

/// Everything the extraction phases read, in sorted path order.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub sources: Vec<InputUnit>,
    pub manifests: Vec<InputUnit>,
}

impl Inputs {
    pub fn len(&self) -> usize {
        self.sources.len() + self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.manifests.is_empty()
    }
}

enum InputKind {
    Source,
    Manifest,
}

fn classify(rel_path: &str) -> Option<InputKind> {
    if rel_path.ends_with(".cs") {
        Some(InputKind::Source)
    } else if ManifestKind::from_path(rel_path).is_some() {
        Some(InputKind::Manifest)
    } else {
        None
    }
}

/// Run the discovery phase. Only an unusable root is an error; unreadable
/// files are logged and skipped.
pub fn run_discovery_phase(config: &AnalysisConfig) -> Result<Inputs> {
    let repo_path = Path::new(&config.repo_path);
    if !repo_path.is_dir() {
        return Err(AnalysisError::InvalidRoot(config.repo_path.clone()));
    }

    let exclude_patterns: Vec<&str> = DEFAULT_EXCLUDES
        .iter()
        .copied()
        .chain(config.exclude_patterns.iter().map(|s| s.as_str()))
        .collect();

    let mut inputs = Inputs::default();

    for entry in WalkDir::new(repo_path)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !exclude_patterns.iter().any(|p| name == *p)
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if IGNORED_FILES.iter().any(|f| name == *f) {
            continue;
        }

        let abs_path = entry.path();
        let rel_path = abs_path
            .strip_prefix(repo_path)
            .unwrap_or(abs_path)
            .to_string_lossy()
            .replace('\\', "/");

        let Some(kind) = classify(&rel_path) else {
            continue;
        };

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        if size > config.max_file_size {
            log::debug!("Skipping {rel_path}: {size} bytes exceeds size limit");
            continue;
        }

        let text = match std::fs::read_to_string(abs_path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Skipping {rel_path}: {e}");
                continue;
            }
        };

        let unit = InputUnit::new(rel_path, text);
        match kind {
            InputKind::Source => inputs.sources.push(unit),
            InputKind::Manifest => inputs.manifests.push(unit),
        }
    }

    inputs.sources.sort_by(|a, b| a.path.cmp(&b.path));
    inputs.manifests.sort_by(|a, b| a.path.cmp(&b.path));

    log::info!(
        "Discovered {} source files and {} manifests",
        inputs.sources.len(),
        inputs.manifests.len()
    );
    Ok(inputs)
}
