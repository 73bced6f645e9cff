//! # Collectors Module
//!
//! Query groups run against every instance on each scrape, and the
//! orchestrator that drives them.
//!
//! - **`Collector` trait**: one query group, its own failure boundary
//! - **`CustomCollector`**: user supplied probes, one family each
//! - **`ServerCollector`**: shared memory header counters
//! - **`ChunkCollector`**: per chunk file I/O
//! - **`DbspaceCollector`**: per dbspace free space
//! - **`Orchestrator`**: visits every instance and runs all groups

pub mod chunk_collector;
pub mod collector;
pub mod custom_collector;
pub mod dbspace_collector;
pub mod orchestrator;
pub mod server_collector;

// Re-export the main types for easy access
pub use chunk_collector::{
    ChunkCollector,
    CHUNK_QUERY,
};
pub use collector::{
    CollectReport,
    Collector,
};
pub use custom_collector::CustomCollector;
pub use dbspace_collector::{
    DbspaceCollector,
    DBSPACE_QUERY,
};
pub use orchestrator::{
    GroupOutcome,
    InstanceOutcome,
    InstanceReport,
    Orchestrator,
    ScrapeReport,
};
pub use server_collector::{
    ServerCollector,
    SERVER_COUNTERS_QUERY,
};
