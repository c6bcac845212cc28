//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and its collaborators (scoring backend, datasets).

mod dataset;
mod model;

pub use dataset::DatasetSource;
pub use model::RiskModel;
