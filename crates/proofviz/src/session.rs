//! Sequential processing of graph, selection and drag events.
//!
//! A [`Session`] owns the current graph, its [`ViewState`] and the current
//! [`Focus`]. Events are applied strictly in call order and each one sees
//! the result of the previous one. A failed event leaves the session
//! exactly as it was.

use log::{debug, info, trace};

use proofviz_core::{
    geometry::{Point, Size},
    identifier::Id,
};

use crate::{
    config::AppConfig,
    error::ProofVizError,
    graph::Graph,
    highlight::{Focus, Selection, compute_visibility},
    layout::Engine,
    scene::Scene,
    sync::{Synchronizer, ViewState},
};

/// Event processor for one proof graph being viewed.
#[derive(Debug, Clone)]
pub struct Session {
    synchronizer: Synchronizer,
    node_size: Size,
    graph: Graph,
    view_state: Option<ViewState>,
    fresh_layout: bool,
    selection: Selection,
}

impl Session {
    /// Creates an empty session.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::Config`] if the layout configuration is invalid.
    pub fn new(config: &AppConfig) -> Result<Self, ProofVizError> {
        let metrics = config.layout().metrics().map_err(ProofVizError::Config)?;
        let node_size = metrics.node_size();
        let synchronizer = Synchronizer::new(Engine::new(metrics))
            .with_relayout_on_edge_change(config.sync().relayout_on_edge_change());

        Ok(Self {
            synchronizer,
            node_size,
            graph: Graph::default(),
            view_state: None,
            fresh_layout: false,
            selection: Selection::default(),
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The current view state; `None` until the first graph is applied.
    pub fn view_state(&self) -> Option<&ViewState> {
        self.view_state.as_ref()
    }

    pub fn focus(&self) -> &Focus {
        self.selection.focus()
    }

    /// Replaces the graph, reconciling it against the current view state.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::Cycle`] if the graph is cyclic.
    pub fn replace_graph(&mut self, graph: Graph) -> Result<Scene, ProofVizError> {
        let reconciliation = self
            .synchronizer
            .reconcile(&graph, self.view_state.as_ref())?;

        self.fresh_layout = reconciliation.is_fresh_layout();
        self.view_state = Some(reconciliation.into_view_state());
        self.graph = graph;
        self.selection.refresh(&self.graph);

        info!(
            nodes = self.graph.node_count(),
            fresh_layout = self.fresh_layout;
            "Graph replaced"
        );
        Ok(self.scene())
    }

    /// Clicks node `id`. See [`Selection::click_node`].
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::UnknownNode`] if `id` is not in the graph.
    pub fn click_node(&mut self, id: Id) -> Result<Scene, ProofVizError> {
        self.selection.click_node(&self.graph, id)?;
        Ok(self.scene())
    }

    /// Selects the key concept called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::UnknownConcept`] if there is no such concept.
    pub fn select_concept(&mut self, name: &str) -> Result<Scene, ProofVizError> {
        self.selection.select_concept(&self.graph, name)?;
        Ok(self.scene())
    }

    pub fn click_background(&mut self) -> Scene {
        debug!("Background clicked");
        self.selection.clear();
        self.scene()
    }

    /// Moves node `id` to `position`, as written back after a drag.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::UnknownNode`] if `id` is not in the graph.
    pub fn move_node(&mut self, id: Id, position: Point) -> Result<Scene, ProofVizError> {
        self.view_state
            .as_mut()
            .ok_or(ProofVizError::UnknownNode { id })?
            .move_node(id, position)?;
        Ok(self.scene())
    }

    /// Composes the current scene.
    pub fn scene(&self) -> Scene {
        let Some(view_state) = &self.view_state else {
            return Scene::default();
        };
        let visibility = compute_visibility(&self.graph, self.selection.focus());
        trace!(
            dimmed_nodes = visibility.dimmed_nodes(),
            dimmed_edges = visibility.dimmed_edges();
            "Scene composed"
        );
        Scene::compose(
            &self.graph,
            view_state,
            &visibility,
            self.node_size,
            self.fresh_layout,
        )
    }
}
