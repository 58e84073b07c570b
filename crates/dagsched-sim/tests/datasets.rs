//! Catalog and random graphs run end to end through the engine.

use std::collections::BTreeSet;

use proptest::prelude::*;

use dagsched_core::ingest::{GraphDocument, parse_graph};
use dagsched_core::metrics::counters;
use dagsched_core::{Metrics, analyze, topo};
use dagsched_sim::{RandomGraphConfig, catalog, generate};

#[test]
fn every_catalog_dataset_analyzes() {
    for dataset in catalog::all().expect("catalog") {
        let document = GraphDocument::from_graph(&dataset.graph, Some(0));
        let json = document.to_json_pretty().expect("serialize");
        let input = parse_graph(&json).expect("reload");
        assert_eq!(input.graph, dataset.graph, "{}", dataset.name);

        let mut metrics = Metrics::new();
        let report = analyze(&input, &mut metrics).expect("valid dataset");
        assert!(report.component_count() > 0, "{}", dataset.name);
        assert!(!report.topological_order.has_cycle, "{}", dataset.name);
        assert_eq!(
            metrics.counter(counters::DFS_VISITS),
            i64::try_from(dataset.graph.vertex_count()).expect("fits"),
            "{}",
            dataset.name
        );
    }
}

#[test]
fn catalog_names_are_unique_and_ordered() {
    let names: Vec<String> = catalog::all()
        .expect("catalog")
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names.first().map(String::as_str), Some("small_graph_1"));
    assert_eq!(names.last().map(String::as_str), Some("large_graph_3"));
    assert_eq!(names.len(), 9);
    let unique: BTreeSet<&str> = names.iter().map(String::as_str).collect();
    assert_eq!(unique.len(), 9);
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(128))]

    #[test]
    fn acyclic_random_graphs_sort_completely(
        vertices in 2usize..60,
        edges in 0usize..200,
        seed in any::<u64>(),
    ) {
        let graph = generate(&RandomGraphConfig {
            vertices,
            edges,
            seed,
            acyclic: true,
            ..RandomGraphConfig::default()
        })
        .expect("valid config");
        prop_assert_eq!(graph.edge_count(), edges);
        let order = topo::sort(&graph);
        prop_assert!(!order.has_cycle);
        prop_assert_eq!(order.order.len(), vertices);
    }

    #[test]
    fn cyclic_random_graphs_condense_to_dags(
        vertices in 1usize..60,
        edges in 0usize..200,
        seed in any::<u64>(),
    ) {
        let graph = generate(&RandomGraphConfig {
            vertices,
            edges,
            seed,
            acyclic: false,
            ..RandomGraphConfig::default()
        })
        .expect("valid config");
        let input = dagsched_core::GraphInput { graph, source: Some(0) };
        let report = analyze(&input, &mut Metrics::new()).expect("valid input");
        prop_assert!(!report.topological_order.has_cycle);
        prop_assert_eq!(report.topological_order.order.len(), report.component_count());
    }
}
