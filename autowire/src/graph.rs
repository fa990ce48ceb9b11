//! The dependency graph discovered during wiring and its topological order.

use crate::key::ComponentKey;
use std::collections::{HashMap, HashSet, VecDeque};

/// Directed edges from providers to the consumers that wired them.
#[derive(Default)]
pub(crate) struct DependencyGraph {
  consumers: HashMap<ComponentKey, Vec<ComponentKey>>,
  in_degree: HashMap<ComponentKey, usize>,
}

impl DependencyGraph {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Records that `consumer` must come after `provider`.
  pub(crate) fn add_edge(&mut self, provider: ComponentKey, consumer: ComponentKey) {
    *self.in_degree.entry(consumer.clone()).or_insert(0) += 1;
    self.consumers.entry(provider).or_default().push(consumer);
  }

  pub(crate) fn edge_count(&self) -> usize {
    self.consumers.values().map(Vec::len).sum()
  }

  /// Orders `nodes` with Kahn's algorithm.
  ///
  /// Ready nodes are taken first-in first-out, seeded in the order of `nodes`,
  /// so the result is deterministic for a given registration order. Edges that
  /// touch a key outside `nodes` are ignored. The stored in-degrees are left
  /// untouched, so the order can be computed again for a later pass.
  ///
  /// On a cycle, returns the nodes that could not be ordered.
  pub(crate) fn topological_order(
    &self,
    nodes: &[ComponentKey],
  ) -> Result<Vec<ComponentKey>, Vec<ComponentKey>> {
    let known: HashSet<&ComponentKey> = nodes.iter().collect();

    let mut in_degree: HashMap<&ComponentKey, usize> = HashMap::with_capacity(nodes.len());
    for node in nodes {
      in_degree.entry(node).or_insert(0);
    }
    for (provider, consumers) in &self.consumers {
      if !known.contains(provider) {
        continue;
      }
      for consumer in consumers.iter().filter(|c| known.contains(c)) {
        *in_degree.entry(consumer).or_insert(0) += 1;
      }
    }

    let mut ready: VecDeque<&ComponentKey> = nodes
      .iter()
      .filter(|node| in_degree.get(node).copied() == Some(0))
      .collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(node) = ready.pop_front() {
      order.push(node.clone());

      let Some(consumers) = self.consumers.get(node) else {
        continue;
      };
      for consumer in consumers {
        if let Some(degree) = in_degree.get_mut(consumer) {
          *degree -= 1;
          if *degree == 0 {
            ready.push_back(consumer);
          }
        }
      }
    }

    if order.len() != in_degree.len() {
      let ordered: HashSet<&ComponentKey> = order.iter().collect();
      let unresolved = nodes
        .iter()
        .filter(|node| !ordered.contains(node))
        .cloned()
        .collect();
      return Err(unresolved);
    }

    Ok(order)
  }

  /// The raw in-degree recorded for `key`, counting every wiring lookup.
  pub(crate) fn in_degree(&self, key: &ComponentKey) -> usize {
    self.in_degree.get(key).copied().unwrap_or(0)
  }
}
