//! Target dependency graph built with petgraph
//!
//! Edges point from the target that runs first to the target that runs after:
//! - `DependsOn`: prerequisite -> target (pulls the prerequisite into the plan)
//! - `Triggers`: target -> triggered (pulls the triggered target into the plan)
//! - `Before`: target -> other (ordering only)
//!
//! Ordering is Kahn's algorithm with ties broken by declaration order, so the
//! same invocation always yields the same sequence.

use crate::core::error::{PipelineError, PipelineResult};
use crate::pipeline::target::Target;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
  DependsOn,
  Triggers,
  Before,
}

/// Graph of every declared target
pub struct TargetGraph {
  graph: DiGraph<Target, EdgeKind>,
  nodes: HashMap<Target, NodeIndex>,
}

impl TargetGraph {
  pub fn new() -> Self {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();

    for target in Target::ALL {
      nodes.insert(target, graph.add_node(target));
    }

    for target in Target::ALL {
      let def = target.definition();
      let this = nodes[&target];
      for dep in def.depends_on {
        graph.add_edge(nodes[dep], this, EdgeKind::DependsOn);
      }
      for triggered in def.triggers {
        graph.add_edge(this, nodes[triggered], EdgeKind::Triggers);
      }
      for later in def.before {
        graph.add_edge(this, nodes[later], EdgeKind::Before);
      }
    }

    Self { graph, nodes }
  }

  /// Targets that take part when `invoked` is requested
  pub fn closure(&self, invoked: Target) -> BTreeSet<Target> {
    let mut included = BTreeSet::new();
    let mut stack = vec![self.nodes[&invoked]];

    while let Some(idx) = stack.pop() {
      if !included.insert(self.graph[idx]) {
        continue;
      }

      for edge in self.graph.edges_directed(idx, Direction::Incoming) {
        if *edge.weight() == EdgeKind::DependsOn {
          stack.push(edge.source());
        }
      }
      for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
        if *edge.weight() == EdgeKind::Triggers {
          stack.push(edge.target());
        }
      }
    }

    included
  }

  /// Execution order for `invoked` and everything it pulls in
  pub fn order(&self, invoked: Target) -> PipelineResult<Vec<Target>> {
    let included = self.closure(invoked);
    let included_nodes: HashSet<NodeIndex> = included.iter().map(|t| self.nodes[t]).collect();

    let mut in_degree: HashMap<Target, usize> = included.iter().map(|t| (*t, 0)).collect();
    for &idx in &included_nodes {
      for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
        if included_nodes.contains(&edge.target())
          && let Some(degree) = in_degree.get_mut(&self.graph[edge.target()])
        {
          *degree += 1;
        }
      }
    }

    let mut ready: BTreeSet<Target> = in_degree
      .iter()
      .filter(|(_, degree)| **degree == 0)
      .map(|(t, _)| *t)
      .collect();
    let mut order = Vec::with_capacity(included.len());

    while let Some(target) = ready.pop_first() {
      order.push(target);
      for edge in self.graph.edges_directed(self.nodes[&target], Direction::Outgoing) {
        let next = self.graph[edge.target()];
        if let Some(degree) = in_degree.get_mut(&next) {
          *degree -= 1;
          if *degree == 0 {
            ready.insert(next);
          }
        }
      }
    }

    if order.len() != included.len() {
      let stuck: Vec<String> = included
        .iter()
        .filter(|t| !order.contains(t))
        .map(|t| t.to_string())
        .collect();
      return Err(PipelineError::Validation(format!(
        "target graph has a cycle involving: {}",
        stuck.join(", ")
      )));
    }

    Ok(order)
  }
}

impl Default for TargetGraph {
  fn default() -> Self {
    Self::new()
  }
}
