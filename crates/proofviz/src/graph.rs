//! Normalized in-memory proof graph.
//!
//! A [`Graph`] is built once per incoming document through
//! [`GraphBuilder`], which enforces the data contract:
//!
//! - node ids are unique, otherwise the build fails with
//!   [`ProofVizError::DuplicateId`];
//! - edges whose endpoints are missing are dropped and recorded in
//!   [`Graph::dangling_edges`];
//! - repeated `(source, target)` pairs collapse to their first occurrence;
//! - concept references to missing nodes are dropped the same way.
//!
//! Nodes and edges keep their input order, which the layering engine uses
//! as its tie-break.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    str::FromStr,
};

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use proofviz_core::{identifier::Id, metadata::Metadata};

use crate::error::ProofVizError;

/// Role of a step in the proof, as reported by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Assumption,
    Deduction,
    Contradiction,
    Conclusion,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assumption => "assumption",
            Self::Deduction => "deduction",
            Self::Contradiction => "contradiction",
            Self::Conclusion => "conclusion",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assumption" => Ok(Self::Assumption),
            "deduction" => Ok(Self::Deduction),
            "contradiction" => Ok(Self::Contradiction),
            "conclusion" => Ok(Self::Conclusion),
            other => Err(other.to_string()),
        }
    }
}

/// A single proof step.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    label: String,
    kind: Option<NodeKind>,
    metadata: Metadata,
}

impl Node {
    pub fn new(id: Id, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            kind: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Display text, possibly containing `$...$` math. Opaque to the core.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.kind
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// Directed dependency: `target` follows from `source`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: Id,
    target: Id,
    label: Option<String>,
}

impl Edge {
    pub fn new(source: Id, target: Id) -> Self {
        Self {
            source,
            target,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
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

    /// Endpoint pair identifying this edge within a graph.
    pub fn key(&self) -> (Id, Id) {
        (self.source, self.target)
    }

    /// Identifier used in rendered output: `"{source}->{target}"`.
    pub fn id(&self) -> String {
        format!("{}->{}", self.source, self.target)
    }

    /// Returns true if either endpoint is `id`.
    pub fn touches(&self, id: Id) -> bool {
        self.source == id || self.target == id
    }
}

/// A definition, theorem, or axiom that justifies one or more steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Concept {
    name: String,
    description: String,
    used_in: Vec<Id>,
}

impl Concept {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            used_in: Vec::new(),
        }
    }

    pub fn with_used_in(mut self, used_in: impl IntoIterator<Item = Id>) -> Self {
        self.used_in = used_in.into_iter().collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Steps whose justification relies on this concept.
    pub fn used_in(&self) -> &[Id] {
        &self.used_in
    }
}

/// A reference that was dropped because its node does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingReference {
    /// An edge with at least one endpoint missing from the node set.
    Edge { source: Id, target: Id },
    /// A concept listing a node that is missing from the node set.
    Concept { name: String, node: Id },
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edge { source, target } => write!(f, "edge {source} -> {target}"),
            Self::Concept { name, node } => write!(f, "concept `{name}` used in {node}"),
        }
    }
}

/// Normalized proof graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: IndexMap<Id, Node>,
    edges: Vec<Edge>,
    concepts: Vec<Concept>,
    incoming: HashMap<Id, Vec<usize>>,
    outgoing: HashMap<Id, Vec<usize>>,
    dangling: Vec<DanglingReference>,
}

impl Graph {
    /// Returns a builder for a new graph.
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// Returns the node with the given id, if it exists.
    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Nodes in input order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Node ids in input order.
    pub fn node_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.nodes.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Valid, deduplicated edges in input order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    /// Looks up a concept by its exact name.
    pub fn concept(&self, name: &str) -> Option<&Concept> {
        self.concepts.iter().find(|concept| concept.name == name)
    }

    /// References dropped while building this graph.
    pub fn dangling_references(&self) -> &[DanglingReference] {
        &self.dangling
    }

    /// Edges dropped while building this graph, as `(source, target)`.
    pub fn dangling_edges(&self) -> impl Iterator<Item = (Id, Id)> + '_ {
        self.dangling.iter().filter_map(|reference| match reference {
            DanglingReference::Edge { source, target } => Some((*source, *target)),
            DanglingReference::Concept { .. } => None,
        })
    }

    /// Nodes with no incoming edges, in input order.
    pub fn roots(&self) -> impl Iterator<Item = Id> + '_ {
        self.node_ids().filter(|id| !self.incoming.contains_key(id))
    }

    /// Direct successors of `id` in edge order.
    pub fn successors(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        self.outgoing
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&idx| self.edges[idx].target)
    }

    /// Direct predecessors of `id` in edge order.
    pub fn predecessors(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        self.incoming
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&idx| self.edges[idx].source)
    }

    /// Number of incoming edges of `id`.
    pub fn in_degree(&self, id: Id) -> usize {
        self.incoming.get(&id).map_or(0, Vec::len)
    }

    /// Set of node ids, used to detect structural changes.
    pub fn node_id_set(&self) -> HashSet<Id> {
        self.node_ids().collect()
    }

    /// Set of edge endpoint pairs, used to detect structural changes.
    pub fn edge_key_set(&self) -> HashSet<(Id, Id)> {
        self.edges.iter().map(Edge::key).collect()
    }
}

/// Builder enforcing the [`Graph`] data contract.
///
/// # Examples
///
/// ```
/// use proofviz::graph::{Edge, Graph, Node};
/// use proofviz_core::identifier::Id;
///
/// let mut builder = Graph::builder();
/// builder.add_node(Node::new(Id::new("N1"), "Assume $x > 0$")).unwrap();
/// builder.add_node(Node::new(Id::new("N2"), "Hence $x^2 > 0$")).unwrap();
/// builder.add_edge(Edge::new(Id::new("N1"), Id::new("N2")));
/// builder.add_edge(Edge::new(Id::new("N2"), Id::new("N9")));
///
/// let graph = builder.build();
/// assert_eq!(graph.edges().len(), 1);
/// assert_eq!(graph.dangling_edges().count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: IndexMap<Id, Node>,
    edges: Vec<Edge>,
    concepts: Vec<Concept>,
}

impl GraphBuilder {
    /// Adds a node.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::DuplicateId`] if a node with the same id was
    /// already added.
    pub fn add_node(&mut self, node: Node) -> Result<&mut Self, ProofVizError> {
        if self.nodes.contains_key(&node.id) {
            return Err(ProofVizError::DuplicateId { id: node.id });
        }
        self.nodes.insert(node.id, node);
        Ok(self)
    }

    /// Adds an edge. Endpoints are checked in [`GraphBuilder::build`], so
    /// edges may be added before their nodes.
    pub fn add_edge(&mut self, edge: Edge) -> &mut Self {
        self.edges.push(edge);
        self
    }

    pub fn add_concept(&mut self, concept: Concept) -> &mut Self {
        self.concepts.push(concept);
        self
    }

    /// Finishes the graph, dropping and recording dangling references.
    pub fn build(self) -> Graph {
        let Self {
            nodes,
            edges: raw_edges,
            concepts: raw_concepts,
        } = self;

        let mut dangling = Vec::new();
        let mut seen = IndexSet::new();
        let mut edges = Vec::with_capacity(raw_edges.len());
        let mut incoming: HashMap<Id, Vec<usize>> = HashMap::new();
        let mut outgoing: HashMap<Id, Vec<usize>> = HashMap::new();

        for edge in raw_edges {
            if !nodes.contains_key(&edge.source) || !nodes.contains_key(&edge.target) {
                warn!(
                    from = edge.source.to_string(),
                    to = edge.target.to_string();
                    "Dropping edge with missing endpoint"
                );
                dangling.push(DanglingReference::Edge {
                    source: edge.source,
                    target: edge.target,
                });
                continue;
            }
            if !seen.insert(edge.key()) {
                debug!(edge = edge.id(); "Collapsing duplicate edge");
                continue;
            }

            let idx = edges.len();
            outgoing.entry(edge.source).or_default().push(idx);
            incoming.entry(edge.target).or_default().push(idx);
            edges.push(edge);
        }

        let concepts = raw_concepts
            .into_iter()
            .map(|mut concept| {
                let mut used_in = IndexSet::new();
                for node in concept.used_in.drain(..) {
                    if nodes.contains_key(&node) {
                        used_in.insert(node);
                    } else {
                        warn!(
                            concept = concept.name.as_str(),
                            node = node.to_string();
                            "Dropping concept reference to missing node"
                        );
                        dangling.push(DanglingReference::Concept {
                            name: concept.name.clone(),
                            node,
                        });
                    }
                }
                concept.used_in = used_in.into_iter().collect();
                concept
            })
            .collect();

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            dangling = dangling.len();
            "Graph built"
        );

        Graph {
            nodes,
            edges,
            concepts,
            incoming,
            outgoing,
            dangling,
        }
    }
}
