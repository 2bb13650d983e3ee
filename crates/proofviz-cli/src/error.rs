//! Errors produced by a CLI run.

use thiserror::Error;

use proofviz::ProofVizError;

/// Error of a CLI run.
///
/// Failures tied to one input document keep the document's path and text
/// so they can be reported with a source snippet.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{path}: {err}")]
    Document {
        path: String,
        src: String,
        err: ProofVizError,
    },

    #[error(transparent)]
    ProofViz(#[from] ProofVizError),
}

impl CliError {
    pub fn document(path: impl Into<String>, src: String, err: ProofVizError) -> Self {
        Self::Document {
            path: path.into(),
            src,
            err,
        }
    }

    /// The underlying library error.
    pub fn inner(&self) -> &ProofVizError {
        match self {
            Self::Document { err, .. } => err,
            Self::ProofViz(err) => err,
        }
    }
}
