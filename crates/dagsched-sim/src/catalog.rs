//! The fixed dataset catalog.
//!
//! Nine hand-built task graphs in three sizes, each with three variants that
//! stress a different part of the engine:
//!
//! | Dataset          | n  | Shape |
//! |------------------|----|-------|
//! | `small_graph_1`  | 8  | DAG (diamond feeding two branches) |
//! | `small_graph_2`  | 8  | one 3-cycle, then a chain |
//! | `small_graph_3`  | 10 | two disjoint cycles plus chains |
//! | `medium_graph_1` | 15 | branching DAG with one edge to a lower id |
//! | `medium_graph_2` | 18 | DAG: ladder merging into one sink |
//! | `medium_graph_3` | 20 | three cycles (3, 3 and 9 members) plus a tail |
//! | `large_graph_1`  | 30 | DAG: chain with skip edges |
//! | `large_graph_2`  | 40 | two chains, four cycles closed by back edges |
//! | `large_graph_3`  | 50 | chain with interleaved forward and back edges |
//!
//! Every catalog graph is directed, uses the `integer` weight model and
//! designates vertex 0 as its source.

use std::fmt;

use dagsched_core::Graph;
use serde::Serialize;

use crate::DatasetError;

/// Catalog size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named catalog graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub size: Size,
    pub variant: u8,
    pub graph: Graph,
}

/// Variants per size class.
pub const VARIANTS: [u8; 3] = [1, 2, 3];

/// Name of a catalog entry, e.g. `small_graph_1`.
#[must_use]
pub fn dataset_name(size: Size, variant: u8) -> String {
    format!("{size}_graph_{variant}")
}

/// Build catalog graph `variant` of `size`.
///
/// # Errors
///
/// Returns [`DatasetError::UnknownVariant`] outside `1..=3`.
pub fn graph(size: Size, variant: u8) -> Result<Graph, DatasetError> {
    match size {
        Size::Small => small_graph(variant),
        Size::Medium => medium_graph(variant),
        Size::Large => large_graph(variant),
    }
}

/// Every catalog graph, small to large, variants in order.
///
/// # Errors
///
/// Only if a catalog definition is itself broken.
pub fn all() -> Result<Vec<Dataset>, DatasetError> {
    let mut datasets = Vec::with_capacity(Size::ALL.len() * VARIANTS.len());
    for size in Size::ALL {
        for variant in VARIANTS {
            datasets.push(Dataset {
                name: dataset_name(size, variant),
                size,
                variant,
                graph: graph(size, variant)?,
            });
        }
    }
    Ok(datasets)
}

/// Look a catalog graph up by name.
///
/// # Errors
///
/// Returns [`DatasetError::UnknownDataset`] for a name not in the catalog.
pub fn by_name(name: &str) -> Result<Graph, DatasetError> {
    for size in Size::ALL {
        for variant in VARIANTS {
            if dataset_name(size, variant) == name {
                return graph(size, variant);
            }
        }
    }
    Err(DatasetError::UnknownDataset(name.to_string()))
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Small graphs: 8, 8 and 10 vertices.
///
/// # Errors
///
/// Returns [`DatasetError::UnknownVariant`] outside `1..=3`.
pub fn small_graph(variant: u8) -> Result<Graph, DatasetError> {
    match variant {
        1 => build(
            8,
            [
                (0, 1, 2),
                (0, 2, 1),
                (1, 3, 3),
                (2, 3, 1),
                (3, 4, 2),
                (2, 5, 4),
                (5, 6, 1),
                (4, 7, 5),
            ],
        ),
        2 => build(
            8,
            [
                (0, 1, 2),
                (1, 2, 2),
                (2, 0, 1),
                (2, 3, 3),
                (3, 4, 1),
                (4, 5, 2),
                (5, 6, 1),
                (6, 7, 2),
            ],
        ),
        3 => build(
            10,
            [
                (0, 1, 1),
                (1, 0, 1),
                (3, 4, 2),
                (4, 5, 2),
                (5, 3, 2),
                (2, 3, 1),
                (6, 7, 3),
                (7, 8, 2),
                (8, 9, 4),
                (2, 6, 1),
                (5, 9, 5),
            ],
        ),
        _ => Err(unknown(Size::Small, variant)),
    }
}

/// Medium graphs: 15, 18 and 20 vertices.
///
/// # Errors
///
/// Returns [`DatasetError::UnknownVariant`] outside `1..=3`.
pub fn medium_graph(variant: u8) -> Result<Graph, DatasetError> {
    match variant {
        1 => build(
            15,
            [
                (0, 1, 1),
                (1, 2, 2),
                (2, 3, 2),
                (3, 4, 1),
                (1, 5, 3),
                (5, 6, 2),
                (6, 2, 1),
                (4, 7, 4),
                (7, 8, 1),
                (8, 9, 2),
                (5, 10, 2),
                (10, 11, 3),
                (11, 12, 1),
                (9, 13, 2),
                (12, 14, 5),
            ],
        ),
        2 => build(
            18,
            chain(0..8, 1, 3).chain([
                (0, 2, 2),
                (1, 3, 2),
                (2, 4, 3),
                (3, 5, 1),
                (4, 9, 2),
                (5, 10, 2),
                (6, 11, 2),
                (7, 12, 2),
                (9, 13, 3),
                (10, 14, 1),
                (11, 15, 2),
                (12, 16, 2),
                (13, 17, 4),
                (14, 17, 2),
                (15, 17, 3),
                (16, 17, 1),
            ]),
        ),
        3 => build(
            20,
            [
                (0, 1, 1),
                (1, 2, 2),
                (2, 0, 1),
                (2, 3, 3),
                (3, 4, 2),
                (4, 5, 2),
                (5, 3, 1),
                (6, 7, 1),
                (7, 8, 2),
                (8, 9, 3),
                (4, 6, 2),
                (9, 10, 2),
                (10, 11, 1),
                (11, 12, 2),
                (12, 13, 3),
                (13, 14, 1),
                (14, 6, 2),
                (8, 15, 2),
                (15, 16, 2),
                (16, 17, 2),
                (17, 18, 2),
                (18, 19, 2),
            ],
        ),
        _ => Err(unknown(Size::Medium, variant)),
    }
}

/// Large graphs: 30, 40 and 50 vertices.
///
/// # Errors
///
/// Returns [`DatasetError::UnknownVariant`] outside `1..=3`.
pub fn large_graph(variant: u8) -> Result<Graph, DatasetError> {
    match variant {
        1 => build(
            30,
            chain(0..29, 1, 5).chain([
                (0, 5, 3),
                (5, 10, 2),
                (10, 15, 4),
                (15, 20, 2),
                (20, 25, 3),
                (3, 12, 2),
                (7, 18, 3),
                (11, 22, 2),
                (14, 27, 5),
            ]),
        ),
        2 => build(
            40,
            chain(0..20, 1, 3)
                .chain([(2, 0, 1), (6, 4, 1), (12, 10, 1)])
                .chain(chain(20..39, 2, 4))
                .chain([
                    (21, 25, 2),
                    (25, 28, 3),
                    (28, 21, 1),
                    (5, 23, 2),
                    (9, 30, 3),
                    (13, 35, 2),
                ]),
        ),
        3 => build(
            50,
            chain(0..49, 1, 7)
                .chain((0..50).step_by(5).map(|i| (i, (i + 7).min(49), 2)))
                .chain([(8, 4, 1), (22, 18, 1), (36, 32, 1)])
                .chain((10..50).step_by(10).map(|i| (i, i - 5, 3)))
                .chain([(3, 20, 2), (15, 33, 4), (27, 41, 3), (6, 44, 5)]),
        ),
        _ => Err(unknown(Size::Large, variant)),
    }
}

fn build(
    n: usize,
    edges: impl IntoIterator<Item = (usize, usize, i64)>,
) -> Result<Graph, DatasetError> {
    Ok(Graph::from_edges(n, edges)?)
}

/// Edges `i -> i + 1` for `i` in `range`, weighted `base + i % modulus`.
#[allow(clippy::cast_possible_wrap)]
fn chain(
    range: std::ops::Range<usize>,
    base: i64,
    modulus: usize,
) -> impl Iterator<Item = (usize, usize, i64)> {
    range.map(move |i| (i, i + 1, base + (i % modulus) as i64))
}

const fn unknown(size: Size, variant: u8) -> DatasetError {
    DatasetError::UnknownVariant {
        size: size.as_str(),
        variant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagsched_core::{find_critical_path, find_sccs, topo};

    fn expect(size: Size, variant: u8) -> Graph {
        graph(size, variant).expect("catalog graph")
    }

    #[test]
    fn vertex_counts_match_the_table() {
        let expected = [
            (Size::Small, [8, 8, 10]),
            (Size::Medium, [15, 18, 20]),
            (Size::Large, [30, 40, 50]),
        ];
        for (size, counts) in expected {
            for (variant, n) in VARIANTS.into_iter().zip(counts) {
                let g = expect(size, variant);
                assert_eq!(g.vertex_count(), n, "{size} {variant}");
                assert!(g.is_directed());
                assert_eq!(g.weight_model(), "integer");
                assert!(g.edge_count() > 0);
            }
        }
    }

    #[test]
    fn edge_counts_match_the_definitions() {
        let counts: Vec<usize> = all()
            .expect("catalog")
            .iter()
            .map(|d| d.graph.edge_count())
            .collect();
        assert_eq!(counts, vec![8, 8, 11, 15, 24, 22, 38, 48, 70]);
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert_eq!(
            small_graph(0),
            Err(DatasetError::UnknownVariant {
                size: "small",
                variant: 0
            })
        );
        assert!(medium_graph(4).is_err());
        assert!(large_graph(9).is_err());
    }

    #[test]
    fn names_round_trip_through_lookup() {
        for dataset in all().expect("catalog") {
            assert_eq!(by_name(&dataset.name).expect("known"), dataset.graph);
        }
        assert_eq!(
            by_name("huge_graph_1"),
            Err(DatasetError::UnknownDataset("huge_graph_1".to_string()))
        );
    }

    #[test]
    fn small_graph_1_is_acyclic() {
        let g = expect(Size::Small, 1);
        assert!(!topo::sort(&g).has_cycle);
        let cp = find_critical_path(&g).expect("valid");
        assert_eq!(cp.path, vec![0, 1, 3, 4, 7]);
        assert_eq!(cp.total_weight, 12);
    }

    #[test]
    fn cyclic_variants_have_expected_components() {
        // small_graph_2: {0,1,2} plus five singletons.
        assert_eq!(find_sccs(&expect(Size::Small, 2)).component_count(), 6);
        // small_graph_3: {0,1}, {3,4,5} plus five singletons.
        assert_eq!(find_sccs(&expect(Size::Small, 3)).component_count(), 7);
        // medium_graph_1: 6 -> 2 points backwards but 2 never reaches 6.
        assert_eq!(find_sccs(&expect(Size::Medium, 1)).component_count(), 15);
        // medium_graph_3: {0,1,2}, {3,4,5}, {6..14} plus the 15..19 tail.
        let sccs = find_sccs(&expect(Size::Medium, 3));
        assert_eq!(sccs.component_count(), 8);
        assert_eq!(sccs.nontrivial_components().count(), 3);
        // large_graph_2: {0,1,2}, {4,5,6}, {10,11,12}, {21..28}.
        let sccs = find_sccs(&expect(Size::Large, 2));
        assert_eq!(sccs.nontrivial_components().count(), 4);
        assert_eq!(sccs.component_count(), 40 - 3 * 2 - 7);
    }

    #[test]
    fn weighted_dags_have_positive_critical_paths() {
        for (size, variant) in [(Size::Medium, 2), (Size::Large, 1), (Size::Large, 3)] {
            let cp = find_critical_path(&expect(size, variant)).expect("valid");
            assert!(cp.total_weight > 0, "{size} {variant}");
        }
    }
}
