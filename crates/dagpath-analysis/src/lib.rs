#![forbid(unsafe_code)]
//! dagpath-analysis library.
//!
//! Graph algorithms over [`dagpath_core::Graph`]:
//!
//! - [`scc`]: Tarjan strongly connected components, iterative.
//! - [`condense`]: the component DAG.
//! - [`topo`]: Kahn topological sort with cycle detection.
//! - [`paths`]: single-source shortest paths and the critical path of a DAG.
//! - [`pipeline`]: all of the above in sequence, with per-stage metrics.
//!
//! # Conventions
//!
//! Every stage takes the graph by shared reference and a caller-owned
//! [`dagpath_core::Metrics`] by `&mut`. Stages that can fail return
//! [`dagpath_core::GraphError`]; the rest are infallible.

pub mod condense;
pub mod paths;
pub mod pipeline;
pub mod scc;
pub mod topo;

pub use paths::{CriticalPath, ShortestPaths};
pub use pipeline::{Analysis, Stage, StageReport, analyze};
pub use scc::SccPartition;
