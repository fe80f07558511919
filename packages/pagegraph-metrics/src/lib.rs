/*
 * Pagegraph Metrics - Page-Load Metric Estimation
 *
 * Turns a page-load dependency graph into a single timing number for a named
 * performance metric by running two bounding-case simulations (optimistic and
 * pessimistic) and blending their results through a per-metric linear model.
 *
 * Architecture:
 * - Dependency graph snapshot (petgraph-backed, immutable per estimation)
 * - Metric variant contract (coefficients + scenario graph builders)
 * - Estimation pipeline (fetch, build, simulate twice, blend)
 * - Script-URL graph query for metric variants
 *
 * Trace parsing, network analysis, and the simulator live behind trait seams.
 */

// Public modules
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod providers;
pub mod query;
pub mod simulation;
pub mod variant;

// Re-exports
pub use error::{MetricError, Result};
pub use graph::{CpuTask, DependencyGraph, NetworkRequest, Node, NodeId, ResourceType};
pub use pipeline::{compute_metric, MetricComputationResult};
pub use providers::{
    ArtifactProvider, LoadData, NetworkAnalysis, NetworkLog, Trace, TraceSummary,
};
pub use query::collect_script_urls;
pub use simulation::{
    MetricEstimate, NodeTiming, ScenarioTag, SimulationOptions, SimulationResult, Simulator,
};
pub use variant::{
    MetricCoefficients, MetricVariant, VariantDefinition, VariantDefinitionBuilder,
};
