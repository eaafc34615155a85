//! Sequential phase orchestrator with timing.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::config::{AnalysisConfig, AnalysisResult, InputUnit};
use crate::error::Result;
use crate::graph::knowledge_graph::KnowledgeGraph;
use crate::graph::stats::Statistics;
use crate::output::build_result;
use crate::phases;
use crate::phases::discovery::Inputs;
use crate::render;

/// Phase labels for progress reporting.
const PHASE_LABELS: &[(&str, &str)] = &[
    ("discovery", "Discovering source files"),
    ("parsing", "Extracting C# entities"),
    ("dependencies", "Reading package manifests"),
    ("render", "Rendering DOT graph"),
];

/// Progress callback type: (phase_name, label).
pub type ProgressCallback = Box<dyn FnMut(&str, &str)>;

/// State threaded through the phases.
#[derive(Default)]
struct PhaseState {
    inputs: Inputs,
    kg: KnowledgeGraph,
    stats: Statistics,
}

type PhaseFn = Box<dyn FnOnce(&AnalysisConfig, &mut PhaseState) -> Result<()>>;

/// Execute the analysis pipeline over `config.repo_path` and return the
/// output document. Only an invalid root aborts the run.
pub fn run_pipeline(
    config: &AnalysisConfig,
    mut progress_callback: Option<ProgressCallback>,
) -> Result<AnalysisResult> {
    let mut state = PhaseState::default();
    let mut timings: BTreeMap<String, f64> = BTreeMap::new();
    let total_start = Instant::now();

    let mut phase_fns: Vec<(&str, PhaseFn)> = vec![
        (
            "discovery",
            Box::new(|config: &AnalysisConfig, state: &mut PhaseState| {
                state.inputs = phases::discovery::run_discovery_phase(config)?;
                Ok(())
            }),
        ),
        (
            "parsing",
            Box::new(|config: &AnalysisConfig, state: &mut PhaseState| {
                phases::parsing::run_parsing_phase(
                    &state.inputs.sources,
                    config.parallel,
                    &mut state.kg,
                    &mut state.stats,
                );
                Ok(())
            }),
        ),
        (
            "dependencies",
            Box::new(|_config: &AnalysisConfig, state: &mut PhaseState| {
                phases::dependencies::run_dependencies_phase(
                    &state.inputs.manifests,
                    &mut state.kg,
                    &mut state.stats,
                );
                Ok(())
            }),
        ),
    ];

    if config.dot_path.is_some() {
        phase_fns.push((
            "render",
            Box::new(|config: &AnalysisConfig, state: &mut PhaseState| {
                if let Some(path) = &config.dot_path {
                    // A render failure does not fail the run.
                    if let Err(e) = render::write_dot(&state.kg, path) {
                        log::warn!("Failed to render DOT graph to {path}: {e}");
                    }
                }
                Ok(())
            }),
        ));
    }

    for (name, phase_fn) in phase_fns {
        if let Some(ref mut cb) = progress_callback {
            let label = PHASE_LABELS
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, l)| *l)
                .unwrap_or(name);
            cb(name, label);
        }

        let start = Instant::now();
        phase_fn(config, &mut state)?;
        let elapsed = start.elapsed().as_secs_f64();
        log::debug!("Phase {name} finished in {elapsed:.3}s");
        timings.insert(name.to_string(), elapsed);
    }

    let total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
    log::info!(
        "Graph has {} nodes and {} edges",
        state.kg.node_count(),
        state.kg.edge_count()
    );

    Ok(build_result(config, &state.kg, &state.stats, &timings, total_ms))
}

/// Extract from in-memory inputs, without touching the filesystem.
pub fn analyse_inputs(
    sources: &[InputUnit],
    manifests: &[InputUnit],
    parallel: bool,
) -> (KnowledgeGraph, Statistics) {
    let mut kg = KnowledgeGraph::new();
    let mut stats = Statistics::new();
    phases::parsing::run_parsing_phase(sources, parallel, &mut kg, &mut stats);
    phases::dependencies::run_dependencies_phase(manifests, &mut kg, &mut stats);
    (kg, stats)
}
