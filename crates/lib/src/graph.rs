//! Module dependency graph.
//!
//! Dependencies become library search paths and compile prerequisites in
//! the emitted script, so every name must resolve to a declared module and
//! the graph must be acyclic. Both are checked here, before any rule text
//! exists.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use thiserror::Error;

use crate::module::Module;

/// Errors in the inter-module dependency structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
  /// A module depends on a name that is not a declared kernel module.
  #[error("module '{module}' depends on '{dependency}', which is not a declared kernel module")]
  UnresolvedDependency { module: String, dependency: String },

  /// The dependency graph has a cycle through this module.
  #[error("dependency cycle detected involving module '{0}'")]
  Cycle(String),
}

/// Validated dependency graph over one run's modules.
///
/// Edges point from a dependency to its dependent.
#[derive(Debug)]
pub struct ModuleGraph {
  graph: DiGraph<String, ()>,
  nodes: HashMap<String, NodeIndex>,
}

impl ModuleGraph {
  /// Build the graph, failing on the first unresolved name (in declaration
  /// order, dependencies sorted) or on any cycle.
  pub fn new(modules: &[Module]) -> Result<Self, GraphError> {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();

    for module in modules {
      let idx = graph.add_node(module.name().to_string());
      nodes.insert(module.name().to_string(), idx);
    }

    for module in modules {
      let dependent = nodes[module.name()];
      for dependency in module.dependencies() {
        let Some(&dep_idx) = nodes.get(dependency) else {
          return Err(GraphError::UnresolvedDependency {
            module: module.name().to_string(),
            dependency: dependency.clone(),
          });
        };
        graph.add_edge(dep_idx, dependent, ());
      }
    }

    toposort(&graph, None).map_err(|cycle| GraphError::Cycle(graph[cycle.node_id()].clone()))?;

    Ok(Self { graph, nodes })
  }

  /// Module names with every dependency before its dependents.
  pub fn build_order(&self) -> Vec<String> {
    // Acyclicity was established in `new`.
    toposort(&self.graph, None)
      .map(|sorted| sorted.into_iter().map(|idx| self.graph[idx].clone()).collect())
      .unwrap_or_default()
  }

  /// Direct dependents of `name`, sorted.
  pub fn dependents(&self, name: &str) -> Vec<String> {
    let Some(&idx) = self.nodes.get(name) else {
      return Vec::new();
    };

    let mut dependents: Vec<String> = self
      .graph
      .neighbors_directed(idx, Direction::Outgoing)
      .map(|dep| self.graph[dep].clone())
      .collect();
    dependents.sort();
    dependents
  }
}
