//! ProofViz - Layered layout and incremental view state for proof graphs
//!
//! This library turns the step graph of a mathematical proof into a
//! top-to-bottom layered diagram. It keeps node positions stable while the
//! graph's metadata is refreshed, and emphasizes the part of the proof the
//! user is exploring.
//!
//! The usual flow is to parse an analyzer document with
//! [`ProofViz::parse`], feed the resulting [`graph::Graph`] into a
//! [`session::Session`], and render the returned [`scene::Scene`] as JSON
//! or SVG.

pub mod config;
pub mod export;
pub mod graph;
pub mod highlight;
pub mod input;
pub mod layout;
pub mod scene;
pub mod session;
pub mod sync;

mod error;

pub use proofviz_core::{color, draw, geometry, identifier, metadata};

pub use error::ProofVizError;

use log::{debug, info, trace};

use config::AppConfig;
use graph::Graph;
use input::GraphInput;
use scene::Scene;
use session::Session;

/// Entry point for parsing proof graphs and rendering scenes.
///
/// # Examples
///
/// ```rust
/// use proofviz::{ProofViz, config::AppConfig};
///
/// let source = r#"{
///     "nodes": [
///         {"id": "N1", "label": "Assume x", "type": "assumption"},
///         {"id": "N2", "label": "Therefore y", "type": "conclusion"}
///     ],
///     "edges": [{"source": "N1", "target": "N2"}]
/// }"#;
///
/// let proofviz = ProofViz::new(AppConfig::default());
/// let graph = proofviz.parse(source).expect("Failed to parse");
///
/// let mut session = proofviz.session().expect("Invalid config");
/// let scene = session.replace_graph(graph).expect("Failed to lay out");
///
/// let svg = proofviz.render_svg(&scene).expect("Failed to render");
/// assert!(svg.starts_with("<svg"));
/// ```
#[derive(Debug, Default)]
pub struct ProofViz {
    config: AppConfig,
}

impl ProofViz {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parses an analyzer JSON document into a normalized graph.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::Input`] for malformed JSON, and
    /// [`ProofVizError::DuplicateId`] or [`ProofVizError::UnknownKind`] for
    /// invalid content.
    pub fn parse(&self, source: &str) -> Result<Graph, ProofVizError> {
        info!("Parsing graph document");
        let input = GraphInput::from_json(source)?;
        let graph = input.into_graph()?;
        debug!(
            nodes = graph.node_count(),
            edges = graph.edges().len(),
            dropped = graph.dangling_references().len();
            "Graph document parsed"
        );
        trace!(graph:?; "Parsed graph");
        Ok(graph)
    }

    /// Starts a new session with this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::Config`] if the layout configuration is invalid.
    pub fn session(&self) -> Result<Session, ProofVizError> {
        Session::new(&self.config)
    }

    /// Renders `scene` to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::Export`] if the style configuration is invalid.
    pub fn render_svg(&self, scene: &Scene) -> Result<String, ProofVizError> {
        let svg = export::svg::SvgBuilder::new()
            .with_style(self.config.style().clone())
            .build()?;

        let doc = svg.render_scene(scene);
        let mut buffer = Vec::new();
        svg.write_document(&doc, &mut buffer)?;

        info!(nodes = scene.nodes().len(); "SVG rendered successfully");
        String::from_utf8(buffer).map_err(|err| ProofVizError::Export(Box::new(err)))
    }

    /// Renders `scene` to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProofVizError::Export`] if serialization fails.
    pub fn render_json(&self, scene: &Scene) -> Result<String, ProofVizError> {
        scene
            .to_json()
            .map_err(|err| ProofVizError::Export(Box::new(err)))
    }
}
