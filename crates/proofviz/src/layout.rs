//! Layered layout of proof graphs.
//!
//! Layout runs in two steps:
//!
//! 1. [`assign_layers`] ranks every node by its longest dependency chain
//!    from a root (Kahn's algorithm, FIFO, input-order tie-break) and
//!    rejects cyclic graphs with a [`CycleError`].
//! 2. [`assign_positions`] turns the ranks into top-left coordinates on a
//!    grid, centering each layer under the widest one.
//!
//! [`Engine`] bundles both steps with a fixed set of [`LayoutMetrics`].

mod layering;
mod positioning;

pub use layering::{CycleError, LayerAssignment, assign_layers};
pub use positioning::{LayoutMetrics, Positions, assign_positions};

use log::info;

use crate::graph::Graph;

/// Result of a full layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    layers: LayerAssignment,
    positions: Positions,
}

impl Layout {
    pub fn layers(&self) -> &LayerAssignment {
        &self.layers
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }
}

/// Layered layout engine.
#[derive(Debug, Clone)]
pub struct Engine {
    metrics: LayoutMetrics,
}

impl Engine {
    /// Create a new layout engine with the given metrics
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Computes layers and positions for every node of `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] if the graph is cyclic.
    pub fn calculate(&self, graph: &Graph) -> Result<Layout, CycleError> {
        info!(nodes = graph.node_count(), edges = graph.edges().len(); "Calculating layout");
        let layers = assign_layers(graph)?;
        let positions = assign_positions(&layers, &self.metrics);
        Ok(Layout { layers, positions })
    }
}
