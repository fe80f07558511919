//! Simulator seam and the value types flowing across it.
//!
//! The simulator itself lives outside this crate; estimation only needs a
//! synchronous, pure `simulate` call plus the option/result shapes below.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::graph::{DependencyGraph, NodeId};

/// Network-condition overrides shared by both scenario runs.
///
/// Derived once per estimation from the network analysis and treated as
/// read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// Extra round-trip time per origin, in milliseconds.
    pub additional_rtt_by_origin: HashMap<String, f64>,
    /// Observed server response time per origin, in milliseconds.
    pub server_response_time_by_origin: HashMap<String, f64>,
}

/// Predicted start/end of one node within a simulated load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeTiming {
    pub start_ms: f64,
    pub end_ms: f64,
}

/// Output of one simulator run.
///
/// `time_in_ms` is the predicted completion time of the whole graph; the
/// per-node timings are carried through for variants that post-process them
/// but are otherwise opaque to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub time_in_ms: f64,
    pub node_timings: HashMap<NodeId, NodeTiming>,
}

/// Marks which bounding-case run an estimate came from, with any
/// caller-supplied extras folded in. Built once per run and never shared
/// mutably between the two scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTag {
    pub optimistic: bool,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extras: serde_json::Map<String, serde_json::Value>,
}

impl ScenarioTag {
    pub fn new(optimistic: bool) -> Self {
        Self {
            optimistic,
            extras: serde_json::Map::new(),
        }
    }

    /// Tag carrying a copy of the caller's extras.
    pub fn with_extras(
        optimistic: bool,
        extras: Option<&serde_json::Map<String, serde_json::Value>>,
    ) -> Self {
        Self {
            optimistic,
            extras: extras.cloned().unwrap_or_default(),
        }
    }
}

/// One scenario's estimate, possibly transformed by the metric variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEstimate {
    pub time_in_ms: f64,
    pub scenario: ScenarioTag,
    pub simulation: SimulationResult,
}

impl MetricEstimate {
    /// Identity mapping from a simulation run: the estimate is the run's
    /// whole-graph completion time, unchanged.
    pub fn from_simulation(simulation: SimulationResult, scenario: ScenarioTag) -> Self {
        Self {
            time_in_ms: simulation.time_in_ms,
            scenario,
            simulation,
        }
    }
}

/// External network/CPU simulator.
///
/// `simulate` must be a pure function of the graph and options: same inputs,
/// same result, no retained state between calls. The pipeline relies on this
/// to run the two scenarios in either order.
pub trait Simulator: Send + Sync {
    fn simulate(
        &self,
        graph: &DependencyGraph,
        options: &SimulationOptions,
    ) -> Result<SimulationResult>;
}
