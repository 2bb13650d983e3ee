//! Render-ready output: positioned, styled nodes and edges, plus the key
//! concepts a viewer offers for group selection.

use serde::Serialize;

use proofviz_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    metadata::Metadata,
};

use crate::{
    graph::{Graph, NodeKind},
    highlight::{Emphasis, Visibility},
    sync::ViewState,
};

/// A node as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedNode {
    id: Id,
    label: String,
    kind: Option<NodeKind>,
    position: Point,
    layer: usize,
    emphasis: Emphasis,
    metadata: Metadata,
}

impl RenderedNode {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.kind
    }

    /// Top-left corner of the node box.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// An edge as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedEdge {
    id: String,
    source: Id,
    target: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    emphasis: Emphasis,
}

impl RenderedEdge {
    /// The `"{source}->{target}"` identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }
}

/// A key concept as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedConcept {
    name: String,
    description: String,
    used_in: Vec<Id>,
}

impl RenderedConcept {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn used_in(&self) -> &[Id] {
        &self.used_in
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    nodes: Vec<RenderedNode>,
    edges: Vec<RenderedEdge>,
    concepts: Vec<RenderedConcept>,
    fresh_layout: bool,
    node_size: Size,
    size: Size,
}

impl Scene {
    /// Combines the graph content, the synchronized view state, and the
    /// current visibility.
    ///
    /// Labels, kinds and edges come from `graph`; positions, layers and
    /// merged metadata come from `view_state`.
    pub fn compose(
        graph: &Graph,
        view_state: &ViewState,
        visibility: &Visibility,
        node_size: Size,
        fresh_layout: bool,
    ) -> Self {
        let nodes: Vec<RenderedNode> = graph
            .nodes()
            .map(|node| {
                let state = view_state.node(node.id());
                RenderedNode {
                    id: node.id(),
                    label: node.label().to_string(),
                    kind: node.kind(),
                    position: state.map(|s| s.position()).unwrap_or_default(),
                    layer: state.map(|s| s.layer()).unwrap_or_default(),
                    emphasis: visibility.node(node.id()),
                    metadata: state
                        .map(|s| s.metadata().clone())
                        .unwrap_or_else(|| node.metadata().clone()),
                }
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| RenderedEdge {
                id: edge.id(),
                source: edge.source(),
                target: edge.target(),
                label: edge.label().map(str::to_string),
                emphasis: visibility.edge(edge.source(), edge.target()),
            })
            .collect();

        let concepts = graph
            .concepts()
            .iter()
            .map(|concept| RenderedConcept {
                name: concept.name().to_string(),
                description: concept.description().to_string(),
                used_in: concept.used_in().to_vec(),
            })
            .collect();

        let mut scene = Self {
            nodes,
            edges,
            concepts,
            fresh_layout,
            node_size,
            size: Size::default(),
        };
        let bounds = scene.bounds();
        scene.size = Size::new(bounds.width(), bounds.height());
        scene
    }

    pub fn nodes(&self) -> &[RenderedNode] {
        &self.nodes
    }

    pub fn node(&self, id: Id) -> Option<&RenderedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edges(&self) -> &[RenderedEdge] {
        &self.edges
    }

    /// Key concepts in document order.
    pub fn concepts(&self) -> &[RenderedConcept] {
        &self.concepts
    }

    /// Whether the positions come from a fresh layout rather than a data refresh.
    pub fn is_fresh_layout(&self) -> bool {
        self.fresh_layout
    }

    pub fn node_size(&self) -> Size {
        self.node_size
    }

    /// Extent of the bounding box of all node boxes.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Box of node `id`.
    pub fn node_bounds(&self, id: Id) -> Option<Bounds> {
        self.node(id)
            .map(|node| Bounds::new_from_top_left(node.position, self.node_size))
    }

    /// Bounding box of all node boxes; empty at the origin for an empty scene.
    pub fn bounds(&self) -> Bounds {
        self.nodes
            .iter()
            .map(|node| Bounds::new_from_top_left(node.position, self.node_size))
            .reduce(|acc, bounds| acc.merge(&bounds))
            .unwrap_or_default()
    }

    /// Serializes the scene as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
