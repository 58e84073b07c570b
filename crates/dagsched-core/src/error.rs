//! Error type shared by every graph operation.

/// Errors raised by graph construction and the analysis algorithms.
///
/// Every variant is reported before any algorithmic work starts (or, for
/// [`GraphError::WeightOverflow`], instead of returning a wrapped value), so
/// callers never observe a partially mutated graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge endpoint or queried vertex lies outside `[0, vertex_count)`.
    #[error("vertex {vertex} out of range for graph with {vertex_count} vertices")]
    VertexOutOfRange { vertex: usize, vertex_count: usize },

    /// A single-source query named a source outside `[0, vertex_count)`.
    #[error("source vertex {vertex} out of range for graph with {vertex_count} vertices")]
    SourceOutOfRange { vertex: usize, vertex_count: usize },

    /// The component list handed to the condensation builder is not a
    /// partition of the graph's vertices.
    #[error("components do not partition the graph: {reason}")]
    InvalidPartition { reason: String },

    /// A path sum left the `i64` range.
    #[error("path weight overflow relaxing edge {from} -> {to}")]
    WeightOverflow { from: usize, to: usize },
}

impl GraphError {
    /// Stable short code for machine-readable reports.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::VertexOutOfRange { .. } => "vertex_out_of_range",
            Self::SourceOutOfRange { .. } => "source_out_of_range",
            Self::InvalidPartition { .. } => "invalid_partition",
            Self::WeightOverflow { .. } => "weight_overflow",
        }
    }

    /// `true` for the invalid-argument family (bad vertex, bad source, bad
    /// partition), as opposed to arithmetic failures.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        !matches!(self, Self::WeightOverflow { .. })
    }
}
