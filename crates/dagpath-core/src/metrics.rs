//! Per-run operation counters and elapsed-time accumulator.
//!
//! A [`Metrics`] value is created by the caller for one algorithm invocation,
//! passed by `&mut` into the stage, and read through [`Metrics::snapshot`]
//! once the stage returns. There is no process-wide registry: two analyses
//! running on different threads each own their own recorder.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Named operation counters reported by the analysis stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Counter {
    /// Vertices entered by the SCC traversal.
    SccVerticesVisited,
    /// Edges traversed by the SCC traversal.
    SccEdgesExamined,
    /// Vertices enqueued on the Kahn frontier.
    TopoPushes,
    /// Vertices dequeued from the Kahn frontier.
    TopoPops,
    /// Edges examined while decrementing in-degrees.
    TopoEdgesExamined,
    /// Edges examined by the DAG path sweeps.
    PathRelaxations,
}

impl Counter {
    /// Stable dotted name used in snapshots and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SccVerticesVisited => "scc.vertices_visited",
            Self::SccEdgesExamined => "scc.edges_examined",
            Self::TopoPushes => "topo.pushes",
            Self::TopoPops => "topo.pops",
            Self::TopoEdgesExamined => "topo.edges_examined",
            Self::PathRelaxations => "paths.relaxations",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Counter and timer sink owned by a single analysis run.
#[derive(Debug, Default, Clone)]
pub struct Metrics {
    counters: BTreeMap<Counter, u64>,
    elapsed: Duration,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to `counter`.
    pub fn inc(&mut self, counter: Counter) {
        self.inc_by(counter, 1);
    }

    /// Add `delta` to `counter`, registering it even when `delta` is zero.
    pub fn inc_by(&mut self, counter: Counter, delta: u64) {
        *self.counters.entry(counter).or_insert(0) += delta;
    }

    /// Current value of `counter` (zero if never touched).
    #[must_use]
    pub fn get(&self, counter: Counter) -> u64 {
        self.counters.get(&counter).copied().unwrap_or(0)
    }

    /// Accumulated elapsed time.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Add the time since `started` to the elapsed accumulator.
    pub fn add_time_since(&mut self, started: Instant) {
        self.elapsed += started.elapsed();
    }

    /// Run `f`, adding its wall time to the elapsed accumulator.
    ///
    /// The closure receives the recorder so the timed stage can count into it.
    pub fn timed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let started = Instant::now();
        let result = f(self);
        self.add_time_since(started);
        result
    }

    /// Read-only copy of the current counters and elapsed time.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self
                .counters
                .iter()
                .map(|(counter, value)| (counter.name().to_string(), *value))
                .collect(),
            elapsed: self.elapsed,
        }
    }
}

/// Frozen view of a [`Metrics`] recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Counter name to count, sorted by counter.
    pub counters: BTreeMap<String, u64>,
    /// Accumulated elapsed time.
    #[serde(rename = "elapsed_ns", serialize_with = "serialize_nanos")]
    pub elapsed: Duration,
}

impl MetricsSnapshot {
    /// Count for `counter`, zero when absent.
    #[must_use]
    pub fn get(&self, counter: Counter) -> u64 {
        self.counters.get(counter.name()).copied().unwrap_or(0)
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (name, value) in &self.counters {
            write!(f, "{name}={value}, ")?;
        }
        write!(f, "time_ns={}}}", self.elapsed.as_nanos())
    }
}

fn serialize_nanos<S: serde::Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(value.as_nanos()).unwrap_or(u64::MAX))
}
