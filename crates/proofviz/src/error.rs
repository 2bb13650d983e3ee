//! Error types for ProofViz operations.
//!
//! This module provides the main error type [`ProofVizError`] which wraps
//! the error conditions that can occur while building, laying out,
//! synchronizing, highlighting, and exporting a proof graph.

use std::io;

use thiserror::Error;

use proofviz_core::identifier::Id;

use crate::layout::CycleError;

/// The main error type for ProofViz operations.
///
/// Every variant that concerns particular nodes carries their ids so the
/// caller can point at them.
#[derive(Debug, Error)]
pub enum ProofVizError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The graph document is not valid JSON or does not match the expected shape.
    #[error("Invalid graph input: {message} at line {line}, column {column}")]
    Input {
        message: String,
        line: usize,
        column: usize,
    },

    /// Two nodes share an id.
    #[error("Duplicate node id `{id}`")]
    DuplicateId { id: Id },

    /// A node declares a step kind that is not recognized.
    #[error("Node `{id}` has unknown kind `{kind}`")]
    UnknownKind { id: Id, kind: String },

    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// A selection or drag referenced a node that is not in the current graph.
    #[error("Unknown node `{id}`")]
    UnknownNode { id: Id },

    /// A selection referenced a key concept that is not in the current graph.
    #[error("Unknown key concept `{name}`")]
    UnknownConcept { name: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for ProofVizError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl ProofVizError {
    /// Create an `Input` error from a `serde_json` error.
    ///
    /// `prefix` is the source text skipped before the parsed document; the
    /// reported position is relative to the start of `prefix`.
    pub fn from_json_error(err: &serde_json::Error, prefix: &str) -> Self {
        let message = err.to_string();
        let position = format!(" at line {} column {}", err.line(), err.column());
        let message = message
            .strip_suffix(&position)
            .unwrap_or(&message)
            .to_string();

        let line_start = prefix.rfind('\n').map_or(0, |index| index + 1);
        let column = if err.line() <= 1 {
            err.column() + (prefix.len() - line_start)
        } else {
            err.column()
        };

        Self::Input {
            message,
            line: err.line() + prefix.matches('\n').count(),
            column,
        }
    }
}
