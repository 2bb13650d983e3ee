//! Incremental view-state synchronization.
//!
//! A [`ViewState`] records where every node currently sits on screen
//! (laid out or dragged), which layer it belongs to, and the metadata it
//! has accumulated. [`Synchronizer::reconcile`] takes the next graph and the
//! previous state and decides between two observably different outcomes:
//!
//! - **structural change** (node or edge id set differs, or there is no
//!   previous state): full relayout, previous positions discarded,
//!   `fresh_layout`;
//! - **data refresh** (same node and edge id sets): positions kept verbatim,
//!   incoming metadata merged shallowly into the stored bags.
//!
//! [`Synchronizer::with_relayout_on_edge_change`] can narrow the structural
//! test to the node id set alone.
//!
//! The state is an explicit value passed in and returned; nothing is kept
//! between calls.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, info};

use proofviz_core::{geometry::Point, identifier::Id, metadata::Metadata};

use crate::{
    error::ProofVizError,
    graph::Graph,
    layout::{Engine, assign_layers},
};

/// On-screen state of a single node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    position: Point,
    layer: usize,
    metadata: Metadata,
}

impl NodeState {
    /// Top-left corner of the node box.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Accumulated metadata: every key ever received, newest value wins.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// Per-session view state, keyed by node id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    nodes: IndexMap<Id, NodeState>,
    edges: HashSet<(Id, Id)>,
}

impl ViewState {
    pub fn node(&self, id: Id) -> Option<&NodeState> {
        self.nodes.get(&id)
    }

    pub fn position(&self, id: Id) -> Option<Point> {
        self.nodes.get(&id).map(NodeState::position)
    }

    /// `(id, state)` pairs in the order of the graph that created them.
    pub fn iter(&self) -> impl Iterator<Item = (Id, &NodeState)> {
        self.nodes.iter().map(|(id, state)| (*id, state))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Records a user drag. The position survives later data refreshes.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::UnknownNode`] if `id` is not in the state.
    pub fn move_node(&mut self, id: Id, position: Point) -> Result<(), ProofVizError> {
        let state = self
            .nodes
            .get_mut(&id)
            .ok_or(ProofVizError::UnknownNode { id })?;
        debug!(node = id.to_string(), x = position.x(), y = position.y(); "Node moved");
        state.position = position;
        Ok(())
    }

    fn has_same_nodes(&self, graph: &Graph) -> bool {
        self.nodes.len() == graph.node_count()
            && self.nodes.keys().copied().collect::<HashSet<_>>() == graph.node_id_set()
    }
}

/// Outcome of [`Synchronizer::reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    view_state: ViewState,
    fresh_layout: bool,
}

impl Reconciliation {
    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn into_view_state(self) -> ViewState {
        self.view_state
    }

    /// Returns true if positions were recomputed from scratch.
    pub fn is_fresh_layout(&self) -> bool {
        self.fresh_layout
    }
}

/// Reconciles incoming graphs against the previous [`ViewState`].
#[derive(Debug, Clone)]
pub struct Synchronizer {
    engine: Engine,
    relayout_on_edge_change: bool,
}

impl Synchronizer {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            relayout_on_edge_change: true,
        }
    }

    /// Whether a changed edge set with an unchanged node set is structural.
    ///
    /// Enabled by default. When disabled, such an update keeps positions and
    /// only refreshes layer indices, so a node may sit on a row that no
    /// longer matches its layer.
    pub fn with_relayout_on_edge_change(mut self, enabled: bool) -> Self {
        self.relayout_on_edge_change = enabled;
        self
    }

    /// Produces the view state for `graph`.
    ///
    /// Layering runs on every call, so a cyclic graph is rejected even on
    /// a data refresh. On a data refresh the layer indices are refreshed but
    /// no node moves.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::Cycle`] if `graph` is cyclic. `previous` is
    /// left untouched.
    pub fn reconcile(
        &self,
        graph: &Graph,
        previous: Option<&ViewState>,
    ) -> Result<Reconciliation, ProofVizError> {
        let previous = previous.filter(|state| !self.is_structural_change(state, graph));

        let Some(previous) = previous else {
            return self.fresh(graph);
        };

        let layers = assign_layers(graph)?;
        let nodes = graph
            .nodes()
            .filter_map(|node| {
                let stored = previous.nodes.get(&node.id())?;
                let state = NodeState {
                    position: stored.position,
                    layer: layers.layer(node.id()).unwrap_or(stored.layer),
                    metadata: stored.metadata.merged(node.metadata()),
                };
                Some((node.id(), state))
            })
            .collect();

        debug!(nodes = graph.node_count(); "Data refresh, keeping positions");
        Ok(Reconciliation {
            view_state: ViewState {
                nodes,
                edges: graph.edge_key_set(),
            },
            fresh_layout: false,
        })
    }

    fn fresh(&self, graph: &Graph) -> Result<Reconciliation, ProofVizError> {
        let layout = self.engine.calculate(graph)?;

        let nodes = graph
            .nodes()
            .map(|node| {
                let id = node.id();
                let state = NodeState {
                    position: layout.positions().get(id).unwrap_or_default(),
                    layer: layout.layers().layer(id).unwrap_or_default(),
                    metadata: node.metadata().clone(),
                };
                (id, state)
            })
            .collect();

        info!(nodes = graph.node_count(); "Structural change, fresh layout");
        Ok(Reconciliation {
            view_state: ViewState {
                nodes,
                edges: graph.edge_key_set(),
            },
            fresh_layout: true,
        })
    }

    fn is_structural_change(&self, previous: &ViewState, graph: &Graph) -> bool {
        if !previous.has_same_nodes(graph) {
            return true;
        }
        self.relayout_on_edge_change && previous.edges != graph.edge_key_set()
    }
}
