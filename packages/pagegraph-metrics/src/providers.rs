//! Async seams to the upstream artifact producers.
//!
//! Trace parsing and network-log analysis happen outside this crate; the
//! pipeline only needs the three request operations below. Payloads the
//! pipeline never interprets (`Trace`, `NetworkLog`, `TraceSummary`) are
//! opaque JSON values passed through untouched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::simulation::SimulationOptions;

/// Raw trace of one page load. Opaque here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace(pub serde_json::Value);

/// Raw network log of one page load. Opaque here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkLog(pub serde_json::Value);

/// Trace-plus-network-log pair identifying one page load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadData {
    pub trace: Trace,
    pub network_log: NetworkLog,
}

/// Digest of the trace, passed through to the variant's graph builders
/// without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceSummary(pub serde_json::Value);

/// Per-origin network timing derived from the network log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkAnalysis {
    pub additional_rtt_by_origin: HashMap<String, f64>,
    pub server_response_time_by_origin: HashMap<String, f64>,
}

impl From<&NetworkAnalysis> for SimulationOptions {
    fn from(analysis: &NetworkAnalysis) -> Self {
        Self {
            additional_rtt_by_origin: analysis.additional_rtt_by_origin.clone(),
            server_response_time_by_origin: analysis.server_response_time_by_origin.clone(),
        }
    }
}

/// The three upstream fetch operations the pipeline depends on.
///
/// The requests are causally independent and the pipeline issues them
/// concurrently; implementations with interleaving-sensitive caching must
/// serialize internally.
#[async_trait]
pub trait ArtifactProvider: Send + Sync {
    async fn request_dependency_graph(&self, load_data: &LoadData) -> Result<DependencyGraph>;

    async fn request_trace_summary(&self, trace: &Trace) -> Result<TraceSummary>;

    async fn request_network_analysis(&self, network_log: &NetworkLog) -> Result<NetworkAnalysis>;
}
