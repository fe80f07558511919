//! Metric variant contract.
//!
//! A metric variant supplies the linear-model coefficients and the two
//! scenario-graph builders; optionally it post-processes simulator output.
//! Statically written variants implement [`MetricVariant`] and get the
//! capability check from the compiler. Variants assembled at runtime go
//! through [`VariantDefinition`], which validates that every required
//! capability is present at construction time instead of failing on first
//! use.

use serde::{Deserialize, Serialize};

use crate::error::{MetricError, Result};
use crate::graph::DependencyGraph;
use crate::providers::TraceSummary;
use crate::simulation::{MetricEstimate, ScenarioTag, SimulationResult};

/// Linear model blending the two scenario estimates into one metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricCoefficients {
    pub intercept: f64,
    pub optimistic_weight: f64,
    pub pessimistic_weight: f64,
}

impl MetricCoefficients {
    /// `intercept + optimistic_weight * o + pessimistic_weight * p`, plain
    /// f64 arithmetic in exactly that order.
    pub fn blend(&self, optimistic_ms: f64, pessimistic_ms: f64) -> f64 {
        self.intercept
            + self.optimistic_weight * optimistic_ms
            + self.pessimistic_weight * pessimistic_ms
    }
}

/// Capability set every concrete metric must satisfy.
///
/// Both graph builders must be deterministic pure functions of their inputs;
/// the pipeline depends on that to make simulation outcomes reproducible.
pub trait MetricVariant: Send + Sync {
    fn name(&self) -> &str;

    fn coefficients(&self) -> MetricCoefficients;

    /// Best-case resource-loading scenario for this metric.
    fn build_optimistic_graph(
        &self,
        graph: &DependencyGraph,
        trace_summary: &TraceSummary,
    ) -> Result<DependencyGraph>;

    /// Worst-case scenario.
    fn build_pessimistic_graph(
        &self,
        graph: &DependencyGraph,
        trace_summary: &TraceSummary,
    ) -> Result<DependencyGraph>;

    /// Turn one simulation run into this metric's estimate. The default is
    /// the identity mapping; override only when the metric reads something
    /// other than whole-graph completion time.
    fn extract_estimate(
        &self,
        simulation: SimulationResult,
        scenario: ScenarioTag,
    ) -> MetricEstimate {
        MetricEstimate::from_simulation(simulation, scenario)
    }
}

type GraphBuilderFn =
    Box<dyn Fn(&DependencyGraph, &TraceSummary) -> Result<DependencyGraph> + Send + Sync>;
type ExtractEstimateFn = Box<dyn Fn(SimulationResult, ScenarioTag) -> MetricEstimate + Send + Sync>;

/// Closure-backed variant for metrics assembled at runtime (configuration,
/// experiments). All required capabilities are checked in
/// [`VariantDefinitionBuilder::build`]; a missing one fails with
/// [`MetricError::MissingCapability`] naming it, never with a silent default.
pub struct VariantDefinition {
    name: String,
    coefficients: MetricCoefficients,
    optimistic: GraphBuilderFn,
    pessimistic: GraphBuilderFn,
    extract: Option<ExtractEstimateFn>,
}

impl std::fmt::Debug for VariantDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantDefinition")
            .field("name", &self.name)
            .field("coefficients", &self.coefficients)
            .field("optimistic", &"<closure>")
            .field("pessimistic", &"<closure>")
            .field("extract", &self.extract.as_ref().map(|_| "<closure>"))
            .finish()
    }
}

impl VariantDefinition {
    pub fn builder(name: impl Into<String>) -> VariantDefinitionBuilder {
        VariantDefinitionBuilder {
            name: name.into(),
            coefficients: None,
            optimistic: None,
            pessimistic: None,
            extract: None,
        }
    }
}

impl MetricVariant for VariantDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn coefficients(&self) -> MetricCoefficients {
        self.coefficients
    }

    fn build_optimistic_graph(
        &self,
        graph: &DependencyGraph,
        trace_summary: &TraceSummary,
    ) -> Result<DependencyGraph> {
        (self.optimistic)(graph, trace_summary)
    }

    fn build_pessimistic_graph(
        &self,
        graph: &DependencyGraph,
        trace_summary: &TraceSummary,
    ) -> Result<DependencyGraph> {
        (self.pessimistic)(graph, trace_summary)
    }

    fn extract_estimate(
        &self,
        simulation: SimulationResult,
        scenario: ScenarioTag,
    ) -> MetricEstimate {
        match &self.extract {
            Some(extract) => extract(simulation, scenario),
            None => MetricEstimate::from_simulation(simulation, scenario),
        }
    }
}

pub struct VariantDefinitionBuilder {
    name: String,
    coefficients: Option<MetricCoefficients>,
    optimistic: Option<GraphBuilderFn>,
    pessimistic: Option<GraphBuilderFn>,
    extract: Option<ExtractEstimateFn>,
}

impl VariantDefinitionBuilder {
    pub fn coefficients(mut self, coefficients: MetricCoefficients) -> Self {
        self.coefficients = Some(coefficients);
        self
    }

    pub fn optimistic_graph(
        mut self,
        build: impl Fn(&DependencyGraph, &TraceSummary) -> Result<DependencyGraph>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.optimistic = Some(Box::new(build));
        self
    }

    pub fn pessimistic_graph(
        mut self,
        build: impl Fn(&DependencyGraph, &TraceSummary) -> Result<DependencyGraph>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.pessimistic = Some(Box::new(build));
        self
    }

    /// Optional; the identity mapping is used when absent.
    pub fn extract_estimate(
        mut self,
        extract: impl Fn(SimulationResult, ScenarioTag) -> MetricEstimate + Send + Sync + 'static,
    ) -> Self {
        self.extract = Some(Box::new(extract));
        self
    }

    /// Validate that every required capability was supplied.
    pub fn build(self) -> Result<VariantDefinition> {
        let Some(coefficients) = self.coefficients else {
            return Err(MetricError::missing_capability(self.name, "coefficients"));
        };
        let Some(optimistic) = self.optimistic else {
            return Err(MetricError::missing_capability(
                self.name,
                "optimistic graph builder",
            ));
        };
        let Some(pessimistic) = self.pessimistic else {
            return Err(MetricError::missing_capability(
                self.name,
                "pessimistic graph builder",
            ));
        };

        Ok(VariantDefinition {
            name: self.name,
            coefficients,
            optimistic,
            pessimistic,
            extract: self.extract,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn sample_coefficients() -> MetricCoefficients {
        MetricCoefficients {
            intercept: 1000.0,
            optimistic_weight: 0.5,
            pessimistic_weight: 0.5,
        }
    }

    fn identity_graph(
        graph: &DependencyGraph,
        _trace_summary: &TraceSummary,
    ) -> Result<DependencyGraph> {
        Ok(graph.clone())
    }

    #[test]
    fn test_blend_worked_example() {
        let timing = sample_coefficients().blend(2000.0, 4000.0);
        assert_eq!(timing, 4000.0);
    }

    #[test]
    fn test_missing_coefficients_fails_construction() {
        let err = VariantDefinition::builder("interactive")
            .optimistic_graph(identity_graph)
            .pessimistic_graph(identity_graph)
            .build()
            .unwrap_err();

        match err {
            MetricError::MissingCapability {
                variant,
                capability,
            } => {
                assert_eq!(variant, "interactive");
                assert_eq!(capability, "coefficients");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_optimistic_builder_fails_construction() {
        let err = VariantDefinition::builder("interactive")
            .coefficients(sample_coefficients())
            .pessimistic_graph(identity_graph)
            .build()
            .unwrap_err();

        match err {
            MetricError::MissingCapability { capability, .. } => {
                assert_eq!(capability, "optimistic graph builder");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_pessimistic_builder_fails_construction() {
        let err = VariantDefinition::builder("interactive")
            .coefficients(sample_coefficients())
            .optimistic_graph(identity_graph)
            .build()
            .unwrap_err();

        match err {
            MetricError::MissingCapability { capability, .. } => {
                assert_eq!(capability, "pessimistic graph builder");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_complete_definition_builds_and_delegates() {
        let variant = VariantDefinition::builder("interactive")
            .coefficients(sample_coefficients())
            .optimistic_graph(identity_graph)
            .pessimistic_graph(identity_graph)
            .build()
            .unwrap();

        assert_eq!(variant.name(), "interactive");
        assert_eq!(variant.coefficients(), sample_coefficients());

        let summary = TraceSummary::default();
        let graph = DependencyGraph::new();
        assert!(variant.build_optimistic_graph(&graph, &summary).is_ok());
        assert!(variant.build_pessimistic_graph(&graph, &summary).is_ok());
    }

    #[test]
    fn test_default_extract_is_identity_for_both_scenarios() {
        let variant = VariantDefinition::builder("interactive")
            .coefficients(sample_coefficients())
            .optimistic_graph(identity_graph)
            .pessimistic_graph(identity_graph)
            .build()
            .unwrap();

        let simulation = SimulationResult {
            time_in_ms: 777.0,
            node_timings: HashMap::new(),
        };

        for optimistic in [true, false] {
            let estimate =
                variant.extract_estimate(simulation.clone(), ScenarioTag::new(optimistic));
            assert_eq!(estimate.time_in_ms, 777.0);
            assert_eq!(estimate.scenario.optimistic, optimistic);
        }
    }

    #[test]
    fn test_overridden_extract_is_used() {
        let variant = VariantDefinition::builder("interactive")
            .coefficients(sample_coefficients())
            .optimistic_graph(identity_graph)
            .pessimistic_graph(identity_graph)
            .extract_estimate(|simulation, scenario| {
                let halved = simulation.time_in_ms / 2.0;
                let mut estimate = MetricEstimate::from_simulation(simulation, scenario);
                estimate.time_in_ms = halved;
                estimate
            })
            .build()
            .unwrap();

        let simulation = SimulationResult {
            time_in_ms: 1000.0,
            node_timings: HashMap::new(),
        };
        let estimate = variant.extract_estimate(simulation, ScenarioTag::new(true));
        assert_eq!(estimate.time_in_ms, 500.0);
    }

    proptest! {
        #[test]
        fn test_blend_matches_linear_model(
            intercept in -1.0e6..1.0e6f64,
            optimistic_weight in -10.0..10.0f64,
            pessimistic_weight in -10.0..10.0f64,
            optimistic_ms in 0.0..1.0e7f64,
            pessimistic_ms in 0.0..1.0e7f64,
        ) {
            let coefficients = MetricCoefficients {
                intercept,
                optimistic_weight,
                pessimistic_weight,
            };
            let expected = intercept
                + optimistic_weight * optimistic_ms
                + pessimistic_weight * pessimistic_ms;
            prop_assert_eq!(coefficients.blend(optimistic_ms, pessimistic_ms), expected);
        }
    }
}
