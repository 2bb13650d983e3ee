//! CLI logic for the ProofViz tool.
//!
//! Every input document is applied in order to a single session, so later
//! documents with the same node ids exercise the incremental path: positions
//! stay put and only metadata is merged.

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::{Args, Format};
pub use error::CliError;

use std::{
    fs,
    io::{self, Write},
};

use log::info;

use proofviz::{ProofViz, ProofVizError, identifier::Id};

/// Run the ProofViz CLI application
///
/// # Errors
///
/// Returns [`CliError::Document`] for failures tied to one input document
/// (I/O, malformed JSON, invalid graph, cycles) and
/// [`CliError::ProofViz`] for configuration, selection and output errors.
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        inputs = args.inputs.len(),
        format:? = args.format;
        "Processing proof graph"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let proofviz = ProofViz::new(app_config);
    let mut session = proofviz.session()?;

    let mut scene = session.scene();
    for path in &args.inputs {
        info!(input_path = path; "Applying graph document");
        let src = fs::read_to_string(path)
            .map_err(|err| CliError::document(path, String::new(), err.into()))?;

        let graph = match proofviz.parse(&src) {
            Ok(graph) => graph,
            Err(err) => return Err(CliError::document(path, src, err)),
        };
        for dropped in graph.dangling_references() {
            info!(input_path = path, reference = dropped.to_string(); "Dropped dangling reference");
        }

        scene = match session.replace_graph(graph) {
            Ok(scene) => scene,
            Err(err) => return Err(CliError::document(path, src, err)),
        };
        info!(input_path = path, fresh_layout = scene.is_fresh_layout(); "Graph applied");
    }

    if let Some(node) = &args.select {
        scene = session.click_node(Id::new(node))?;
    }
    if let Some(concept) = &args.concept {
        scene = session.select_concept(concept)?;
    }

    let rendered = match args.format {
        Format::Svg => proofviz.render_svg(&scene)?,
        Format::Json => proofviz.render_json(&scene)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered).map_err(ProofVizError::Io)?;
            info!(output_file = path; "Output written");
        }
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .map_err(ProofVizError::Io)?,
    }

    Ok(())
}
