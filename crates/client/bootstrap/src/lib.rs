//! Shared bootstrap utilities for score front-ends.
//!
//! Provides configuration loading and the [`Statistics`] facade that wires the
//! high-score and recent-score collections to one store, so the CLI and any
//! other front-end assemble them the same way.
pub mod builder;
pub mod config;
pub mod statistics;

pub use builder::StatisticsBuilder;
pub use config::ScoresConfig;
pub use statistics::{Statistics, format_elapsed};
