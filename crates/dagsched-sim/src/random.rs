//! Seeded random task graphs.
//!
//! Output depends only on the [`RandomGraphConfig`]: the generator draws from
//! a `StdRng` seeded with `config.seed`, so the same config always yields the
//! same edge list.

use dagsched_core::Graph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::DatasetError;

/// Parameters for [`generate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RandomGraphConfig {
    pub vertices: usize,
    pub edges: usize,
    /// Inclusive lower bound for edge weights.
    pub min_weight: i64,
    /// Inclusive upper bound for edge weights.
    pub max_weight: i64,
    /// Only emit edges `u -> v` with `u < v`.
    pub acyclic: bool,
    pub seed: u64,
}

impl Default for RandomGraphConfig {
    fn default() -> Self {
        Self {
            vertices: 20,
            edges: 40,
            min_weight: 1,
            max_weight: 10,
            acyclic: true,
            seed: 0,
        }
    }
}

impl RandomGraphConfig {
    /// Check the config can be generated.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidConfig`] when edges are requested with
    /// no room for them, or the weight range is empty.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.min_weight > self.max_weight {
            return Err(invalid(format!(
                "min_weight {} exceeds max_weight {}",
                self.min_weight, self.max_weight
            )));
        }
        if self.edges > 0 && self.vertices == 0 {
            return Err(invalid("edges requested on a graph with no vertices".to_string()));
        }
        if self.edges > 0 && self.acyclic && self.vertices < 2 {
            return Err(invalid(
                "an acyclic graph needs at least 2 vertices to hold an edge".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generate a directed graph of `config.vertices` vertices and exactly
/// `config.edges` edges.
///
/// Parallel edges may occur. Cyclic mode may also produce self-loops.
///
/// # Errors
///
/// See [`RandomGraphConfig::validate`].
#[instrument(skip_all, fields(vertices = config.vertices, edges = config.edges, seed = config.seed))]
pub fn generate(config: &RandomGraphConfig) -> Result<Graph, DatasetError> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut graph = Graph::directed(config.vertices);
    let n = config.vertices;

    for _ in 0..config.edges {
        let (u, v) = if config.acyclic {
            let u = rng.gen_range(0..n - 1);
            let v = rng.gen_range(u + 1..n);
            (u, v)
        } else {
            (rng.gen_range(0..n), rng.gen_range(0..n))
        };
        let w = rng.gen_range(config.min_weight..=config.max_weight);
        graph.add_edge(u, v, w)?;
    }

    debug!(edges = graph.edge_count(), "random graph generated");
    Ok(graph)
}

fn invalid(reason: String) -> DatasetError {
    DatasetError::InvalidConfig { reason }
}
