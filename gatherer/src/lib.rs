//! # Informix Exporter Gatherer
//!
//! Polls Informix server instances and republishes engine counters as
//! Prometheus gauges.
//!
//! ## Architecture
//!
//! - **`metrics`**: built-in counter catalogs and the gauge family registry
//! - **`database`**: the driver capability (`Connector`/`Connection`), an
//!   in-memory implementation and, behind the `odbc` feature, the ODBC one
//! - **`collectors`**: the four query groups and the `Orchestrator` that runs
//!   them against every instance, isolating failures per instance and group
//! - **`exporter`**: `InformixExporter`, the `prometheus::core::Collector`
//!   that runs a scrape cycle on every collect
//!
//! ## Usage
//!
//! ```no_run
//! use informix_exporter_config::Config;
//! use informix_exporter_gatherer::{
//!     database::MemoryConnector,
//!     InformixExporter,
//! };
//! use std::sync::Arc;
//!
//! let config = Config::default();
//! let exporter = InformixExporter::new(&config, Arc::new(MemoryConnector::new())).unwrap();
//! let registry = prometheus::Registry::new();
//! registry.register(Box::new(exporter)).unwrap();
//! let families = registry.gather();
//! ```

#[macro_use]
extern crate tracing;

pub mod collectors;
pub mod database;
mod error;
pub mod exporter;
pub mod metrics;

pub use collectors::*;
pub use error::{
    DatabaseError,
    RegistryError,
};
pub use exporter::InformixExporter;
pub use metrics::*;
