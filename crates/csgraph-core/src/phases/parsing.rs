//! Phase 2: Run the C# recognizers over every source unit.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::config::InputUnit;
use crate::csharp::{analyse_source, ExtractContext};
use crate::graph::knowledge_graph::KnowledgeGraph;
use crate::graph::stats::Statistics;

/// Run the parsing phase. A path seen twice is processed once.
///
/// With `parallel`, each unit is extracted into its own fragment and the
/// fragments are merged in input order, giving the same graph and counters
/// as the sequential pass.
pub fn run_parsing_phase(
    sources: &[InputUnit],
    parallel: bool,
    kg: &mut KnowledgeGraph,
    stats: &mut Statistics,
) {
    let mut seen = HashSet::new();
    let units: Vec<&InputUnit> = sources
        .iter()
        .filter(|unit| seen.insert(unit.path.as_str()))
        .collect();

    if !parallel {
        let mut cx = ExtractContext::new(kg, stats);
        for unit in units {
            log::debug!("Analysing {}", unit.path);
            analyse_source(&mut cx, &unit.path, &unit.text);
        }
        return;
    }

    let fragments: Vec<(KnowledgeGraph, Statistics)> = units
        .par_iter()
        .map(|unit| {
            let mut graph = KnowledgeGraph::new();
            let mut unit_stats = Statistics::new();
            analyse_source(
                &mut ExtractContext::new(&mut graph, &mut unit_stats),
                &unit.path,
                &unit.text,
            );
            (graph, unit_stats)
        })
        .collect();

    for (graph, unit_stats) in fragments {
        kg.merge(graph);
        stats.merge(unit_stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NodeKind, Relation};

    fn sample() -> Vec<InputUnit> {
        vec![
            InputUnit::new(
                "A.cs",
                "namespace Shop { class Order : Entity { void Ship() { } } }",
            ),
            InputUnit::new(
                "B.cs",
                "namespace Shop { class Entity { int Id; } class Order { string Note; } }",
            ),
            InputUnit::new("A.cs", "class Ignored { }"),
        ]
    }

    #[test]
    fn duplicate_paths_are_processed_once() {
        let mut kg = KnowledgeGraph::new();
        let mut stats = Statistics::new();
        run_parsing_phase(&sample(), false, &mut kg, &mut stats);
        assert_eq!(stats.files, 2);
        assert!(!kg.has_node("Class: Ignored"));
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut seq_kg = KnowledgeGraph::new();
        let mut seq_stats = Statistics::new();
        run_parsing_phase(&sample(), false, &mut seq_kg, &mut seq_stats);

        let mut par_kg = KnowledgeGraph::new();
        let mut par_stats = Statistics::new();
        run_parsing_phase(&sample(), true, &mut par_kg, &mut par_stats);

        assert_eq!(seq_stats, par_stats);
        assert_eq!(seq_kg.node_count(), par_kg.node_count());
        assert_eq!(seq_kg.edges(), par_kg.edges());
        let ids = |kg: &KnowledgeGraph| kg.nodes().map(|n| n.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&seq_kg), ids(&par_kg));
        assert_eq!(
            seq_kg.get_node_data("Class: Shop.Entity"),
            par_kg.get_node_data("Class: Shop.Entity")
        );
        assert_eq!(par_kg.count_kind(NodeKind::Class), 2);
        assert_eq!(
            par_kg.targets("Class: Shop.Order", Relation::HasField),
            vec!["Field: Note (Class: Shop.Order)"]
        );
    }
}
