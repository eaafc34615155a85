//! Discovery phase integration tests.

mod common;

use std::fs;
use std::path::Path;

use common::*;
use csgraph_core::config::AnalysisConfig;
use csgraph_core::phases::discovery::run_discovery_phase;
use pretty_assertions::assert_eq;

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn config_for(root: &Path) -> AnalysisConfig {
    AnalysisConfig {
        repo_path: root.to_string_lossy().to_string(),
        ..Default::default()
    }
}

fn paths(units: &[csgraph_core::config::InputUnit]) -> Vec<&str> {
    units.iter().map(|u| u.path.as_str()).collect()
}

#[test]
fn fixture_inputs_are_split_and_sorted() {
    let inputs = run_discovery_phase(&fixture_config("csharp_shop")).unwrap();
    assert_eq!(
        paths(&inputs.sources),
        vec![
            "Program.cs",
            "Shop.Core/Models/Entity.cs",
            "Shop.Core/Models/Order.cs",
            "Shop.Core/Services/Helper.cs",
        ]
    );
    assert_eq!(
        paths(&inputs.manifests),
        vec![
            "Shop.Core/Shop.Core.csproj",
            "Shop.Core/packages.lock.json",
            "Shop.Legacy/packages.config",
        ]
    );
    assert_eq!(inputs.len(), 7);
}

#[test]
fn build_and_tooling_directories_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "src/App.cs", "class App { }");
    write(root, "src/bin/Release/App.cs", "class Stale { }");
    write(root, "src/obj/App.AssemblyInfo.cs", "class Gen { }");
    write(root, ".git/hooks/pre-commit.cs", "class Hook { }");
    write(root, "packages/Lib/Lib.cs", "class Vendored { }");
    write(root, "src/Migrations/Init.cs", "class Init { }");

    let inputs = run_discovery_phase(&config_for(root)).unwrap();
    assert_eq!(paths(&inputs.sources), vec!["src/App.cs"]);
}

#[test]
fn user_excludes_extend_the_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "App/App.cs", "class App { }");
    write(root, "Generated/Proxy.cs", "class Proxy { }");

    let config = AnalysisConfig {
        exclude_patterns: vec!["Generated".to_string()],
        ..config_for(root)
    };
    let inputs = run_discovery_phase(&config).unwrap();
    assert_eq!(paths(&inputs.sources), vec!["App/App.cs"]);
}

#[test]
fn non_source_files_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "App.cs", "class App { }");
    write(root, "README.md", "# readme");
    write(root, "Views/Index.cshtml", "<p>hi</p>");
    write(root, ".editorconfig", "root = true");
    write(root, "appsettings.json", "{}");

    let inputs = run_discovery_phase(&config_for(root)).unwrap();
    assert_eq!(paths(&inputs.sources), vec!["App.cs"]);
    assert!(inputs.manifests.is_empty());
}

#[test]
fn oversized_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "Small.cs", "class Small { }");
    write(root, "Large.cs", &"// padding\n".repeat(100));

    let config = AnalysisConfig {
        max_file_size: 64,
        ..config_for(root)
    };
    let inputs = run_discovery_phase(&config).unwrap();
    assert_eq!(paths(&inputs.sources), vec!["Small.cs"]);
}

#[test]
fn file_as_root_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Only.cs", "class Only { }");
    let config = config_for(&dir.path().join("Only.cs"));
    assert!(run_discovery_phase(&config).is_err());
}
