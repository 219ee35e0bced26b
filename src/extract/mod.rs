//! Extraction stage: pure statistics aggregation and AI architecture
//! extraction over fetched repository contexts.

pub mod architecture;
pub mod stats;

pub use architecture::ArchitectureExtractor;
pub use stats::StatsExtractor;
