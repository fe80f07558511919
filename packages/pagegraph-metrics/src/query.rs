//! Deterministic graph queries used by metric variants.

use std::collections::HashSet;

use crate::graph::{DependencyGraph, NetworkRequest, Node, ResourceType};

/// Collect the distinct URLs of script requests in `graph`.
///
/// CPU tasks never contribute; a URL fetched by several nodes is counted
/// once, so the result does not depend on traversal order. When `predicate`
/// is supplied, only script requests it accepts are included.
///
/// Always returns a fresh set; an empty graph or no matching nodes yields an
/// empty set.
pub fn collect_script_urls(
    graph: &DependencyGraph,
    predicate: Option<&dyn Fn(&NetworkRequest) -> bool>,
) -> HashSet<String> {
    let mut script_urls = HashSet::new();

    for node in graph.nodes() {
        let request = match node {
            Node::Cpu(_) => continue,
            Node::Network(request) => request,
        };
        if request.resource_type != ResourceType::Script {
            continue;
        }
        if let Some(predicate) = predicate {
            if !predicate(request) {
                continue;
            }
        }
        script_urls.insert(request.url.clone());
    }

    script_urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CpuTask, NodeId};

    fn graph_with(nodes: Vec<Node>) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for node in nodes {
            graph.add_node(node).unwrap();
        }
        graph
    }

    fn script(id: u64, url: &str) -> Node {
        Node::Network(NetworkRequest {
            id: NodeId(id),
            url: url.to_string(),
            resource_type: ResourceType::Script,
            transfer_ms: 10.0,
        })
    }

    #[test]
    fn test_empty_graph_yields_empty_set() {
        let graph = DependencyGraph::new();
        assert!(graph.is_empty());
        assert!(collect_script_urls(&graph, None).is_empty());
    }

    #[test]
    fn test_cpu_nodes_are_always_excluded() {
        let graph = graph_with(vec![
            Node::Cpu(CpuTask {
                id: NodeId(1),
                duration_ms: 5.0,
            }),
            Node::Cpu(CpuTask {
                id: NodeId(2),
                duration_ms: 8.0,
            }),
        ]);

        assert!(collect_script_urls(&graph, None).is_empty());
        assert!(collect_script_urls(&graph, Some(&|_| true)).is_empty());
    }

    #[test]
    fn test_non_script_resources_are_excluded() {
        let graph = graph_with(vec![
            Node::Network(NetworkRequest {
                id: NodeId(1),
                url: "https://example.com/style.css".to_string(),
                resource_type: ResourceType::Stylesheet,
                transfer_ms: 10.0,
            }),
            script(2, "https://example.com/app.js"),
        ]);

        let urls = collect_script_urls(&graph, None);
        assert_eq!(urls.len(), 1);
        assert!(urls.contains("https://example.com/app.js"));
    }

    #[test]
    fn test_duplicate_urls_are_counted_once() {
        let graph = graph_with(vec![
            script(1, "https://example.com/app.js"),
            script(2, "https://example.com/app.js"),
            script(3, "https://example.com/vendor.js"),
        ]);

        let urls = collect_script_urls(&graph, None);
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn test_rejecting_predicate_yields_empty_set() {
        let graph = graph_with(vec![script(1, "https://example.com/app.js")]);
        let urls = collect_script_urls(&graph, Some(&|_| false));
        assert!(urls.is_empty());
    }

    #[test]
    fn test_predicate_filters_by_request_attributes() {
        let graph = graph_with(vec![
            script(1, "https://cdn.example.com/lib.js"),
            script(2, "https://example.com/app.js"),
        ]);

        let urls = collect_script_urls(
            &graph,
            Some(&|request: &NetworkRequest| request.url.contains("cdn.")),
        );
        assert_eq!(urls.len(), 1);
        assert!(urls.contains("https://cdn.example.com/lib.js"));
    }
}
