use dagsched_core::GraphError;

/// Errors raised while producing a dataset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    /// Catalog variants are numbered 1 to 3.
    #[error("unknown {size} variant {variant}: variant must be 1..3")]
    UnknownVariant { size: &'static str, variant: u8 },

    /// No catalog entry has this name.
    #[error("unknown dataset '{0}'")]
    UnknownDataset(String),

    /// A random-graph configuration that cannot be generated.
    #[error("invalid random graph config: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Graph(#[from] GraphError),
}
