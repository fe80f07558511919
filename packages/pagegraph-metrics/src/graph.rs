//! Page-load dependency graph snapshot.
//!
//! Directed graph where:
//! - Nodes are either CPU tasks or network requests
//! - Edges run dependency → dependent (A → B means B waits on A)
//!
//! The graph is built once from trace data and treated as an immutable
//! snapshot for the duration of an estimation. Scenario graphs are derived
//! with [`DependencyGraph::filtered`], never by mutating the original.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{MetricError, Result};

/// Stable node identifier assigned by the graph builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Resource classification carried on every network request node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Document,
    Stylesheet,
    Script,
    Image,
    Font,
    Xhr,
    Other,
}

/// Non-network computation (script execution, layout, etc). No URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuTask {
    pub id: NodeId,
    pub duration_ms: f64,
}

/// One fetched resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRequest {
    pub id: NodeId,
    pub url: String,
    pub resource_type: ResourceType,
    /// Transfer time under nominal network conditions.
    pub transfer_ms: f64,
}

impl NetworkRequest {
    /// Origin (`scheme://host`) of this request's URL, if the URL has one.
    pub fn origin(&self) -> Option<&str> {
        let scheme_end = self.url.find("://")?;
        let rest = &self.url[scheme_end + 3..];
        let host_end = rest.find('/').unwrap_or(rest.len());
        if host_end == 0 {
            return None;
        }
        Some(&self.url[..scheme_end + 3 + host_end])
    }
}

/// Tagged node variant. Exhaustive matching at every consumption site keeps
/// CPU tasks out of URL-bearing code paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Cpu(CpuTask),
    Network(NetworkRequest),
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Cpu(task) => task.id,
            Node::Network(request) => request.id,
        }
    }
}

/// Immutable dependency graph snapshot of one page load.
///
/// Backed by a petgraph digraph with a `NodeId` → `NodeIndex` map so callers
/// address nodes by their stable ids rather than petgraph internals.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<Node, ()>,
    id_to_index: HashMap<NodeId, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Ids must be unique within one graph.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        let id = node.id();
        if self.id_to_index.contains_key(&id) {
            return Err(MetricError::invalid_graph(format!("duplicate {id}")));
        }
        let index = self.graph.add_node(node);
        self.id_to_index.insert(id, index);
        Ok(())
    }

    /// Record that `dependent` cannot start before `dependency` completes.
    pub fn add_dependency(&mut self, dependency: NodeId, dependent: NodeId) -> Result<()> {
        let from = self.index_of(dependency)?;
        let to = self.index_of(dependent)?;
        self.graph.add_edge(from, to, ());
        Ok(())
    }

    fn index_of(&self, id: NodeId) -> Result<NodeIndex> {
        self.id_to_index
            .get(&id)
            .copied()
            .ok_or_else(|| MetricError::invalid_graph(format!("unknown {id}")))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.id_to_index.get(&id).map(|&index| &self.graph[index])
    }

    /// All nodes, in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Nodes with no dependencies; simulation starts here.
    pub fn root_ids(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .filter(|&index| {
                self.graph
                    .neighbors_directed(index, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|index| self.graph[index].id())
            .collect()
    }

    /// Ids of nodes that directly wait on `id`.
    pub fn dependents(&self, id: NodeId) -> Vec<NodeId> {
        match self.id_to_index.get(&id) {
            Some(&index) => self
                .graph
                .neighbors_directed(index, Direction::Outgoing)
                .map(|neighbor| self.graph[neighbor].id())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Derive a new snapshot containing the nodes that satisfy `keep`, with
    /// the edges whose endpoints both survive. The receiver is untouched.
    pub fn filtered(&self, keep: impl Fn(&Node) -> bool) -> DependencyGraph {
        let mut derived = DependencyGraph::new();
        for node in self.graph.node_weights() {
            if keep(node) {
                // Ids were unique in the source graph, so re-insertion
                // cannot collide.
                let _ = derived.add_node(node.clone());
            }
        }
        for edge in self.graph.edge_indices() {
            if let Some((from, to)) = self.graph.edge_endpoints(edge) {
                let from_id = self.graph[from].id();
                let to_id = self.graph[to].id();
                if derived.id_to_index.contains_key(&from_id)
                    && derived.id_to_index.contains_key(&to_id)
                {
                    let _ = derived.add_dependency(from_id, to_id);
                }
            }
        }
        derived
    }
}
