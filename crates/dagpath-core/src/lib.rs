#![forbid(unsafe_code)]
//! dagpath-core library.
//!
//! The graph model every analysis stage reads, the per-run [`metrics`]
//! recorder they report into, and the collaborators that produce graphs:
//! [`ingest`] for JSON documents and [`config`] for `dagpath.toml`.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums per module, each mapping to an
//!   [`error::ErrorCode`]; binaries wrap them in `anyhow::Result`.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod metrics;
pub mod timing;

pub use graph::{Edge, Graph, GraphError};
pub use metrics::{Counter, Metrics, MetricsSnapshot};
