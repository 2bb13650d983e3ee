//! Layer assignment by Kahn's topological traversal.

use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;
use log::{debug, trace};
use thiserror::Error;

use proofviz_core::identifier::Id;

use crate::graph::Graph;

/// The graph contains at least one cycle.
///
/// Carries every node that could not be assigned a layer, in input order.
/// These are the nodes on a cycle plus everything downstream of one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Graph contains a cycle; {} node(s) could not be layered: {}", .unassigned.len(), format_ids(.unassigned))]
pub struct CycleError {
    unassigned: Vec<Id>,
}

impl CycleError {
    /// Nodes left without a layer.
    pub fn unassigned(&self) -> &[Id] {
        &self.unassigned
    }
}

fn format_ids(ids: &[Id]) -> String {
    ids.iter()
        .map(Id::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Mapping from node id to layer, in the order nodes were assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerAssignment {
    layers: IndexMap<Id, usize>,
}

impl LayerAssignment {
    /// Returns the layer of `id`, if it was assigned.
    pub fn layer(&self, id: Id) -> Option<usize> {
        self.layers.get(&id).copied()
    }

    /// `(id, layer)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (Id, usize)> + '_ {
        self.layers.iter().map(|(id, layer)| (*id, *layer))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of distinct layers.
    pub fn layer_count(&self) -> usize {
        self.layers.values().max().map_or(0, |deepest| deepest + 1)
    }

    /// Node ids grouped by layer; within a layer, in assignment order.
    pub fn by_layer(&self) -> Vec<Vec<Id>> {
        let mut grouped = vec![Vec::new(); self.layer_count()];
        for (id, layer) in self.iter() {
            grouped[layer].push(id);
        }
        grouped
    }
}

/// Assigns every node of `graph` to a layer.
///
/// Roots are seeded in input order at layer 0. A node is enqueued once all
/// of its predecessors have been popped, one layer below the predecessor
/// that released it. Identical input always yields the identical
/// assignment, including its order.
///
/// # Errors
///
/// Returns [`CycleError`] if any node is left unassigned. No partial
/// assignment is returned.
pub fn assign_layers(graph: &Graph) -> Result<LayerAssignment, CycleError> {
    let mut in_degree: HashMap<Id, usize> = graph
        .node_ids()
        .map(|id| (id, graph.in_degree(id)))
        .collect();

    let mut queue: VecDeque<(Id, usize)> = graph.roots().map(|id| (id, 0)).collect();
    let mut layers = IndexMap::with_capacity(graph.node_count());

    while let Some((id, layer)) = queue.pop_front() {
        trace!(node = id.to_string(), layer = layer; "Assigned layer");
        layers.insert(id, layer);

        for target in graph.successors(id) {
            if let Some(remaining) = in_degree.get_mut(&target) {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    queue.push_back((target, layer + 1));
                }
            }
        }
    }

    if layers.len() < graph.node_count() {
        let unassigned: Vec<Id> = graph
            .node_ids()
            .filter(|id| !layers.contains_key(id))
            .collect();
        debug!(unassigned = unassigned.len(); "Layering stopped on a cycle");
        return Err(CycleError { unassigned });
    }

    let assignment = LayerAssignment { layers };
    debug!(
        nodes = assignment.len(),
        layers = assignment.layer_count();
        "Layers assigned"
    );
    Ok(assignment)
}
