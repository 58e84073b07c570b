#![forbid(unsafe_code)]
//! dagsched-sim library.
//!
//! Synthetic inputs for the engine: the fixed nine-graph [`catalog`] and
//! seeded [`random`] graphs.
//!
//! # Conventions
//!
//! - **Errors**: [`DatasetError`] for every fallible operation.
//! - **Logging**: `tracing` spans on generators.

pub mod catalog;
mod error;
pub mod random;

pub use catalog::{Dataset, Size};
pub use error::DatasetError;
pub use random::{RandomGraphConfig, generate};
