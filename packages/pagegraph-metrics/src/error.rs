use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetricError>;

#[derive(Error, Debug)]
pub enum MetricError {
    /// A dynamically assembled metric variant is missing a required
    /// capability. Raised at construction time, never at call time.
    #[error("metric variant `{variant}` is missing required capability `{capability}`")]
    MissingCapability {
        variant: String,
        capability: &'static str,
    },

    #[error("artifact fetch failed: {0}")]
    ArtifactFetch(String),

    #[error("simulation failed: {0}")]
    Simulation(String),

    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MetricError {
    pub fn artifact_fetch<E: std::fmt::Display>(e: E) -> Self {
        Self::ArtifactFetch(e.to_string())
    }

    pub fn simulation<E: std::fmt::Display>(e: E) -> Self {
        Self::Simulation(e.to_string())
    }

    pub fn invalid_graph<E: std::fmt::Display>(e: E) -> Self {
        Self::InvalidGraph(e.to_string())
    }

    pub fn missing_capability(variant: impl Into<String>, capability: &'static str) -> Self {
        Self::MissingCapability {
            variant: variant.into(),
            capability,
        }
    }
}
