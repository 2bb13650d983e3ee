//! Focus-driven emphasis of nodes and edges.
//!
//! There are two ways to focus a proof graph, and each has its own
//! constructor on [`Focus`]:
//!
//! - [`Focus::neighborhood`]: clicking a step emphasizes the step, its
//!   direct premises and consequences, and the edges touching the step.
//! - [`Focus::group`] and [`Focus::concept`]: selecting a key concept
//!   emphasizes exactly the steps that use it, and the edges running
//!   between two of those steps.
//!
//! Both feed the same [`compute_visibility`]. [`Selection`] holds the
//! current focus and implements the click transitions.

use std::collections::HashMap;

use indexmap::IndexSet;
use log::debug;
use serde::{Deserialize, Serialize};

use proofviz_core::identifier::Id;

use crate::{
    error::ProofVizError,
    graph::{Edge, Graph},
};

/// Visual emphasis of a node or edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    #[default]
    Normal,
    Dimmed,
}

impl Emphasis {
    pub fn is_dimmed(self) -> bool {
        self == Self::Dimmed
    }

    fn from_member(is_member: bool) -> Self {
        if is_member { Self::Normal } else { Self::Dimmed }
    }
}

/// The current set of focal nodes and how it was formed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Focus {
    /// Nothing selected; everything is drawn normally.
    #[default]
    None,
    /// A clicked node and its direct neighbors.
    Neighborhood { anchor: Id, members: IndexSet<Id> },
    /// An externally supplied set of nodes, without neighbor expansion.
    Group { members: IndexSet<Id> },
}

impl Focus {
    /// Focus on `anchor` and every node sharing an edge with it.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::UnknownNode`] if `anchor` is not in `graph`.
    pub fn neighborhood(graph: &Graph, anchor: Id) -> Result<Self, ProofVizError> {
        if !graph.contains_node(anchor) {
            return Err(ProofVizError::UnknownNode { id: anchor });
        }

        let mut members = IndexSet::new();
        members.insert(anchor);
        members.extend(graph.predecessors(anchor));
        members.extend(graph.successors(anchor));

        Ok(Self::Neighborhood { anchor, members })
    }

    /// Focus on exactly `ids`. An empty set yields [`Focus::None`].
    pub fn group(ids: impl IntoIterator<Item = Id>) -> Self {
        let members: IndexSet<Id> = ids.into_iter().collect();
        if members.is_empty() {
            Self::None
        } else {
            Self::Group { members }
        }
    }

    /// Focus on the steps that use the concept called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::UnknownConcept`] if there is no such concept.
    pub fn concept(graph: &Graph, name: &str) -> Result<Self, ProofVizError> {
        let concept = graph
            .concept(name)
            .ok_or_else(|| ProofVizError::UnknownConcept {
                name: name.to_string(),
            })?;
        Ok(Self::group(concept.used_in().iter().copied()))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Focal node ids; empty for [`Focus::None`].
    pub fn members(&self) -> impl Iterator<Item = Id> + '_ {
        let members = match self {
            Self::None => None,
            Self::Neighborhood { members, .. } | Self::Group { members } => Some(members),
        };
        members.into_iter().flatten().copied()
    }

    pub fn contains(&self, id: Id) -> bool {
        match self {
            Self::None => false,
            Self::Neighborhood { members, .. } | Self::Group { members } => members.contains(&id),
        }
    }

    /// Adapts the focus to a replaced graph.
    ///
    /// A neighborhood is recomputed around its anchor, or cleared if the
    /// anchor is gone. A group keeps only the ids that still exist.
    pub fn refresh(&self, graph: &Graph) -> Self {
        match self {
            Self::None => Self::None,
            Self::Neighborhood { anchor, .. } => {
                Self::neighborhood(graph, *anchor).unwrap_or(Self::None)
            }
            Self::Group { members } => Self::group(
                members
                    .iter()
                    .copied()
                    .filter(|id| graph.contains_node(*id)),
            ),
        }
    }

    fn edge_emphasis(&self, edge: &Edge) -> Emphasis {
        match self {
            Self::None => Emphasis::Normal,
            Self::Neighborhood { anchor, .. } => Emphasis::from_member(edge.touches(*anchor)),
            Self::Group { members } => Emphasis::from_member(
                members.contains(&edge.source()) && members.contains(&edge.target()),
            ),
        }
    }
}

/// Emphasis of every node and edge of a graph under some [`Focus`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Visibility {
    nodes: HashMap<Id, Emphasis>,
    edges: HashMap<(Id, Id), Emphasis>,
}

impl Visibility {
    /// Emphasis of node `id`; `Normal` for unknown ids.
    pub fn node(&self, id: Id) -> Emphasis {
        self.nodes.get(&id).copied().unwrap_or_default()
    }

    /// Emphasis of the edge `source -> target`; `Normal` for unknown edges.
    pub fn edge(&self, source: Id, target: Id) -> Emphasis {
        self.edges.get(&(source, target)).copied().unwrap_or_default()
    }

    /// Number of dimmed nodes.
    pub fn dimmed_nodes(&self) -> usize {
        self.nodes.values().filter(|emphasis| emphasis.is_dimmed()).count()
    }

    /// Number of dimmed edges.
    pub fn dimmed_edges(&self) -> usize {
        self.edges.values().filter(|emphasis| emphasis.is_dimmed()).count()
    }
}

/// Computes the emphasis of every node and edge of `graph`.
///
/// With an empty focus everything is `Normal`. Otherwise a node is
/// `Normal` iff it is a focal member; an edge is `Normal` iff it touches
/// the anchor (neighborhood) or both its endpoints are members (group).
pub fn compute_visibility(graph: &Graph, focus: &Focus) -> Visibility {
    let nodes = graph
        .node_ids()
        .map(|id| {
            let emphasis = if focus.is_empty() {
                Emphasis::Normal
            } else {
                Emphasis::from_member(focus.contains(id))
            };
            (id, emphasis)
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|edge| (edge.key(), focus.edge_emphasis(edge)))
        .collect();

    Visibility { nodes, edges }
}

/// Current focus plus the click transitions that change it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    focus: Focus,
}

impl Selection {
    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    /// Clicking a node: clicking the current anchor again clears the focus,
    /// anything else focuses the node's neighborhood.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::UnknownNode`] and leaves the focus unchanged
    /// if `id` is not in `graph`.
    pub fn click_node(&mut self, graph: &Graph, id: Id) -> Result<&Focus, ProofVizError> {
        if matches!(self.focus, Focus::Neighborhood { anchor, .. } if anchor == id) {
            debug!(node = id.to_string(); "Deselecting node");
            self.focus = Focus::None;
        } else {
            self.focus = Focus::neighborhood(graph, id)?;
            debug!(node = id.to_string(); "Focusing node neighborhood");
        }
        Ok(&self.focus)
    }

    /// Selecting a key concept focuses the steps that use it.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::UnknownConcept`] and leaves the focus
    /// unchanged if there is no such concept.
    pub fn select_concept(&mut self, graph: &Graph, name: &str) -> Result<&Focus, ProofVizError> {
        self.focus = Focus::concept(graph, name)?;
        debug!(concept = name; "Focusing concept");
        Ok(&self.focus)
    }

    /// Clicking the background clears the focus.
    pub fn clear(&mut self) {
        self.focus = Focus::None;
    }

    /// Adapts the focus to a replaced graph. See [`Focus::refresh`].
    pub fn refresh(&mut self, graph: &Graph) {
        self.focus = self.focus.refresh(graph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Concept, Node};

    fn id(name: &str) -> Id {
        Id::new(name)
    }

    /// A -> X -> B, C -> D, plus a concept used in A and B.
    fn sample() -> Graph {
        let mut builder = Graph::builder();
        for name in ["A", "X", "B", "C", "D"] {
            builder.add_node(Node::new(id(name), name)).unwrap();
        }
        builder
            .add_edge(Edge::new(id("A"), id("X")))
            .add_edge(Edge::new(id("X"), id("B")))
            .add_edge(Edge::new(id("C"), id("D")))
            .add_edge(Edge::new(id("A"), id("B")));
        builder.add_concept(Concept::new("Lemma 1", "").with_used_in([id("A"), id("B")]));
        builder.build()
    }

    #[test]
    fn test_empty_focus_is_all_normal() {
        let graph = sample();
        let visibility = compute_visibility(&graph, &Focus::None);

        for id in graph.node_ids() {
            assert_eq!(visibility.node(id), Emphasis::Normal);
        }
        for edge in graph.edges() {
            assert_eq!(visibility.edge(edge.source(), edge.target()), Emphasis::Normal);
        }
        assert_eq!(visibility.dimmed_nodes(), 0);
        assert_eq!(visibility.dimmed_edges(), 0);
    }

    #[test]
    fn test_neighborhood_focus() {
        let graph = sample();
        let focus = Focus::neighborhood(&graph, id("X")).unwrap();
        let visibility = compute_visibility(&graph, &focus);

        assert_eq!(visibility.node(id("A")), Emphasis::Normal);
        assert_eq!(visibility.node(id("X")), Emphasis::Normal);
        assert_eq!(visibility.node(id("B")), Emphasis::Normal);
        assert_eq!(visibility.node(id("C")), Emphasis::Dimmed);
        assert_eq!(visibility.node(id("D")), Emphasis::Dimmed);

        assert_eq!(visibility.edge(id("A"), id("X")), Emphasis::Normal);
        assert_eq!(visibility.edge(id("X"), id("B")), Emphasis::Normal);
        assert_eq!(visibility.edge(id("C"), id("D")), Emphasis::Dimmed);
        // Both endpoints are neighbors, but the edge does not touch X
        assert_eq!(visibility.edge(id("A"), id("B")), Emphasis::Dimmed);
    }

    #[test]
    fn test_group_focus_has_no_neighbor_expansion() {
        let graph = sample();
        let focus = Focus::concept(&graph, "Lemma 1").unwrap();
        let visibility = compute_visibility(&graph, &focus);

        assert_eq!(visibility.node(id("A")), Emphasis::Normal);
        assert_eq!(visibility.node(id("B")), Emphasis::Normal);
        assert_eq!(visibility.node(id("X")), Emphasis::Dimmed);

        // Both endpoints in the group
        assert_eq!(visibility.edge(id("A"), id("B")), Emphasis::Normal);
        // Only one endpoint in the group
        assert_eq!(visibility.edge(id("A"), id("X")), Emphasis::Dimmed);
        assert_eq!(visibility.edge(id("X"), id("B")), Emphasis::Dimmed);
    }

    #[test]
    fn test_empty_group_is_no_focus() {
        assert_eq!(Focus::group([]), Focus::None);
    }

    #[test]
    fn test_unknown_anchor_and_concept() {
        let graph = sample();
        assert!(matches!(
            Focus::neighborhood(&graph, id("nope")),
            Err(ProofVizError::UnknownNode { .. })
        ));
        assert!(matches!(
            Focus::concept(&graph, "Lemma 2"),
            Err(ProofVizError::UnknownConcept { .. })
        ));
    }

    #[test]
    fn test_click_same_node_twice_clears() {
        let graph = sample();
        let mut selection = Selection::default();

        selection.click_node(&graph, id("X")).unwrap();
        assert!(selection.focus().contains(id("A")));

        selection.click_node(&graph, id("X")).unwrap();
        assert!(selection.focus().is_empty());
    }

    #[test]
    fn test_click_other_node_replaces_focus() {
        let graph = sample();
        let mut selection = Selection::default();

        selection.click_node(&graph, id("X")).unwrap();
        selection.click_node(&graph, id("C")).unwrap();

        let members: Vec<Id> = selection.focus().members().collect();
        assert_eq!(members, vec![id("C"), id("D")]);
    }

    #[test]
    fn test_click_member_of_group_focuses_neighborhood() {
        let graph = sample();
        let mut selection = Selection::default();

        selection.select_concept(&graph, "Lemma 1").unwrap();
        selection.click_node(&graph, id("A")).unwrap();

        assert!(matches!(selection.focus(), Focus::Neighborhood { anchor, .. } if *anchor == id("A")));
    }

    #[test]
    fn test_failed_click_keeps_focus() {
        let graph = sample();
        let mut selection = Selection::default();
        selection.click_node(&graph, id("X")).unwrap();

        assert!(selection.click_node(&graph, id("ghost")).is_err());
        assert!(selection.select_concept(&graph, "ghost").is_err());
        assert!(matches!(selection.focus(), Focus::Neighborhood { anchor, .. } if *anchor == id("X")));
    }

    #[test]
    fn test_clear() {
        let graph = sample();
        let mut selection = Selection::default();
        selection.select_concept(&graph, "Lemma 1").unwrap();
        selection.clear();
        assert!(selection.focus().is_empty());
    }

    #[test]
    fn test_refresh_after_graph_replacement() {
        let graph = sample();
        let mut neighborhood = Selection::default();
        neighborhood.click_node(&graph, id("C")).unwrap();

        let mut group = Selection::default();
        group.select_concept(&graph, "Lemma 1").unwrap();

        // D and B removed
        let mut builder = Graph::builder();
        for name in ["A", "X", "C"] {
            builder.add_node(Node::new(id(name), name)).unwrap();
        }
        builder.add_edge(Edge::new(id("C"), id("X")));
        let replaced = builder.build();

        neighborhood.refresh(&replaced);
        let members: Vec<Id> = neighborhood.focus().members().collect();
        assert_eq!(members, vec![id("C"), id("X")]);

        group.refresh(&replaced);
        let members: Vec<Id> = group.focus().members().collect();
        assert_eq!(members, vec![id("A")]);

        let mut gone = Selection::default();
        gone.click_node(&graph, id("D")).unwrap();
        gone.refresh(&replaced);
        assert!(gone.focus().is_empty());
    }
}
