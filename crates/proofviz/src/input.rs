//! JSON document produced by the upstream proof analyzer.
//!
//! ```json
//! {
//!   "nodes": [
//!     {"id": "N1", "label": "Assume $\\sqrt{2}$ is rational.", "type": "assumption"},
//!     {"id": "N2", "label": "Then $2 = p^2 / q^2$.", "type": "deduction", "valid": true}
//!   ],
//!   "edges": [{"source": "N1", "target": "N2"}],
//!   "key_concepts": [
//!     {"name": "Definition of rational", "description": "$x = p/q$", "used_in": ["N1"]}
//!   ]
//! }
//! ```
//!
//! Node fields other than `id`, `label`, and `type` are collected into the
//! node's metadata bag untouched.

use serde::{Deserialize, Serialize};

use proofviz_core::{identifier::Id, metadata::Metadata};

use crate::{
    error::ProofVizError,
    graph::{Concept, Edge, Graph, Node, NodeKind},
};

/// Whole graph document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    #[serde(default)]
    pub nodes: Vec<NodeInput>,

    #[serde(default)]
    pub edges: Vec<EdgeInput>,

    #[serde(default, rename = "key_concepts", alias = "concepts")]
    pub concepts: Vec<ConceptInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInput {
    pub id: String,

    #[serde(default)]
    pub label: String,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(flatten)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeInput {
    pub source: String,
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptInput {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub used_in: Vec<String>,
}

impl GraphInput {
    /// Parses a graph document.
    ///
    /// A surrounding markdown code fence (```` ```json ... ``` ````), as
    /// language models tend to emit, is stripped first.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::Input`] with the line and column of the
    /// first syntax or shape error.
    pub fn from_json(source: &str) -> Result<Self, ProofVizError> {
        let body = strip_code_fence(source);
        serde_json::from_str(body).map_err(|err| {
            let skipped = body.as_ptr() as usize - source.as_ptr() as usize;
            ProofVizError::from_json_error(&err, &source[..skipped])
        })
    }

    /// Converts the document into a normalized [`Graph`].
    ///
    /// # Errors
    ///
    /// Fails on duplicate node ids and unknown node kinds. Dangling edges
    /// and concept references are dropped and recorded on the graph.
    pub fn into_graph(self) -> Result<Graph, ProofVizError> {
        let mut builder = Graph::builder();

        for node in self.nodes {
            let id = Id::new(&node.id);
            let mut built = Node::new(id, node.label).with_metadata(node.metadata);
            if let Some(kind) = node.kind.as_deref() {
                let kind = kind
                    .parse::<NodeKind>()
                    .map_err(|kind| ProofVizError::UnknownKind { id, kind })?;
                built = built.with_kind(kind);
            }
            builder.add_node(built)?;
        }

        for edge in self.edges {
            let mut built = Edge::new(Id::new(&edge.source), Id::new(&edge.target));
            if let Some(label) = edge.label {
                built = built.with_label(label);
            }
            builder.add_edge(built);
        }

        for concept in self.concepts {
            let used_in = concept.used_in.iter().map(Id::from);
            builder.add_concept(Concept::new(concept.name, concept.description).with_used_in(used_in));
        }

        Ok(builder.build())
    }
}

/// Strips one surrounding markdown code fence, if present.
fn strip_code_fence(source: &str) -> &str {
    let trimmed = source.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return source;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return source;
    };
    // The `json` tag is dropped even when the document follows on the same line
    if let Some(document) = body.strip_prefix("json") {
        return document;
    }
    match body.find('\n') {
        Some(newline) if !body[..newline].trim_start().starts_with(['{', '[']) => {
            &body[newline + 1..]
        }
        _ => body,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SQRT2: &str = r#"{
        "nodes": [
            {"id": "N1", "label": "Assume $\\sqrt{2} = p/q$", "type": "assumption"},
            {"id": "N2", "label": "$p^2 = 2q^2$", "type": "deduction", "valid": true},
            {"id": "N3", "label": "Contradiction", "type": "contradiction", "critique": "fine"}
        ],
        "edges": [
            {"source": "N1", "target": "N2"},
            {"source": "N2", "target": "N3", "label": "parity"}
        ],
        "key_concepts": [
            {"name": "Even numbers", "description": "$n = 2k$", "used_in": ["N2", "N3"]}
        ]
    }"#;

    #[test]
    fn test_parse_analyzer_document() {
        let input = GraphInput::from_json(SQRT2).unwrap();
        assert_eq!(input.nodes.len(), 3);
        assert_eq!(input.nodes[1].metadata.get("valid"), Some(&json!(true)));
        assert_eq!(input.concepts[0].used_in, vec!["N2", "N3"]);

        let graph = input.into_graph().unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.edges()[1].label(), Some("parity"));

        let n1 = graph.node(Id::new("N1")).unwrap();
        assert_eq!(n1.kind(), Some(NodeKind::Assumption));
        assert!(n1.metadata().is_empty());

        let n3 = graph.node(Id::new("N3")).unwrap();
        assert_eq!(n3.metadata().get("critique"), Some(&json!("fine")));
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let fenced = format!("```json\n{SQRT2}\n```");
        let input = GraphInput::from_json(&fenced).unwrap();
        assert_eq!(input.nodes.len(), 3);
    }

    #[test]
    fn test_single_line_code_fence_is_stripped() {
        let input =
            GraphInput::from_json(r#"```json{"nodes": [{"id": "N1", "label": "p"}]}```"#).unwrap();
        assert_eq!(input.nodes.len(), 1);

        let err = GraphInput::from_json("```json{\"nodes\": [,]}```").unwrap_err();
        match err {
            ProofVizError::Input { line, column, .. } => {
                assert_eq!(line, 1);
                assert!(column > "```json".len());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let input = GraphInput::from_json("{}").unwrap();
        assert_eq!(input, GraphInput::default());
        assert!(input.into_graph().unwrap().is_empty());
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let err = GraphInput::from_json("{\n  \"nodes\": [,]\n}").unwrap_err();
        match err {
            ProofVizError::Input { line, column, .. } => {
                assert_eq!(line, 2);
                assert!(column > 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_syntax_error_inside_code_fence_reports_source_position() {
        let err = GraphInput::from_json("```json\n{\n  \"nodes\": [,]\n}\n```").unwrap_err();
        match err {
            ProofVizError::Input { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(!message.contains("at line"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let input = GraphInput::from_json(r#"{"nodes": [{"id": "N1", "type": "lemma"}]}"#).unwrap();
        let err = input.into_graph().unwrap_err();
        assert!(matches!(err, ProofVizError::UnknownKind { ref kind, .. } if kind == "lemma"));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let input =
            GraphInput::from_json(r#"{"nodes": [{"id": "N1"}, {"id": "N1"}]}"#).unwrap();
        assert!(matches!(
            input.into_graph(),
            Err(ProofVizError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_strip_code_fence_leaves_plain_json() {
        assert_eq!(strip_code_fence("{}"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```").trim(), "{}");
        assert_eq!(strip_code_fence("```{}```"), "{}");
    }
}
