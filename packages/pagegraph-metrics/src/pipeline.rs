//! Metric estimation pipeline.
//!
//! Fetches the three upstream artifacts, asks the variant for its two
//! bounding-case graphs, simulates both under the same network conditions,
//! and blends the scenario estimates through the variant's linear model.
//! Holds no state across invocations; every call is independent.

use tracing::debug;

use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::providers::{ArtifactProvider, LoadData};
use crate::simulation::{MetricEstimate, ScenarioTag, SimulationOptions, Simulator};
use crate::variant::MetricVariant;

/// Final artifact of one estimation. Constructed once per invocation.
#[derive(Debug, Clone)]
pub struct MetricComputationResult {
    /// Blended metric value in milliseconds.
    pub timing: f64,
    pub optimistic_estimate: MetricEstimate,
    pub pessimistic_estimate: MetricEstimate,
    pub optimistic_graph: DependencyGraph,
    pub pessimistic_graph: DependencyGraph,
}

/// Estimate `variant` for the page load identified by `load_data`.
///
/// The three artifact fetches are issued concurrently; all must succeed
/// before graph construction starts. Any fetch, build, or simulation failure
/// fails the whole computation with that error; there are no partial results
/// and no retries at this layer.
pub async fn compute_metric(
    variant: &dyn MetricVariant,
    load_data: &LoadData,
    provider: &dyn ArtifactProvider,
    simulator: &dyn Simulator,
    extras: Option<&serde_json::Map<String, serde_json::Value>>,
) -> Result<MetricComputationResult> {
    let (graph, trace_summary, network_analysis) = tokio::try_join!(
        provider.request_dependency_graph(load_data),
        provider.request_trace_summary(&load_data.trace),
        provider.request_network_analysis(&load_data.network_log),
    )?;

    debug!(
        "Fetched artifacts for metric {}: {} nodes, {} edges",
        variant.name(),
        graph.node_count(),
        graph.edge_count()
    );

    let options = SimulationOptions::from(&network_analysis);

    let optimistic_graph = variant.build_optimistic_graph(&graph, &trace_summary)?;
    let pessimistic_graph = variant.build_pessimistic_graph(&graph, &trace_summary)?;

    // The two runs share only immutable input; order is irrelevant.
    let optimistic_simulation = simulator.simulate(&optimistic_graph, &options)?;
    let pessimistic_simulation = simulator.simulate(&pessimistic_graph, &options)?;

    let optimistic_estimate = variant.extract_estimate(
        optimistic_simulation,
        ScenarioTag::with_extras(true, extras),
    );
    let pessimistic_estimate = variant.extract_estimate(
        pessimistic_simulation,
        ScenarioTag::with_extras(false, extras),
    );

    let timing = variant.coefficients().blend(
        optimistic_estimate.time_in_ms,
        pessimistic_estimate.time_in_ms,
    );

    debug!(
        "Metric {}: optimistic {:.1}ms, pessimistic {:.1}ms, blended {:.1}ms",
        variant.name(),
        optimistic_estimate.time_in_ms,
        pessimistic_estimate.time_in_ms,
        timing
    );

    Ok(MetricComputationResult {
        timing,
        optimistic_estimate,
        pessimistic_estimate,
        optimistic_graph,
        pessimistic_graph,
    })
}
