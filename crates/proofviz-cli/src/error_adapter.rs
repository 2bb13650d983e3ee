//! Error adapter for converting CLI errors to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use proofviz::ProofVizError;

use crate::error::CliError;

/// Adapter for a [`CliError`].
///
/// Errors tied to an input document carry its text, so JSON syntax errors
/// are rendered with a labeled snippet.
pub struct ErrorAdapter<'a> {
    err: &'a CliError,
}

impl<'a> ErrorAdapter<'a> {
    pub fn new(err: &'a CliError) -> Self {
        Self { err }
    }

    fn src(&self) -> Option<&'a String> {
        match self.err {
            CliError::Document { src, .. } => Some(src),
            CliError::ProofViz(_) => None,
        }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.err, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.err, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.err.inner() {
            ProofVizError::Io(_) => "proofviz::io",
            ProofVizError::Input { .. } => "proofviz::input",
            ProofVizError::DuplicateId { .. } => "proofviz::duplicate_id",
            ProofVizError::UnknownKind { .. } => "proofviz::unknown_kind",
            ProofVizError::Cycle(_) => "proofviz::cycle",
            ProofVizError::UnknownNode { .. } => "proofviz::unknown_node",
            ProofVizError::UnknownConcept { .. } => "proofviz::unknown_concept",
            ProofVizError::Config(_) => "proofviz::config",
            ProofVizError::Export(_) => "proofviz::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.err.inner() {
            ProofVizError::Cycle(_) => {
                "proof steps must form a DAG; remove an edge between the listed steps"
            }
            ProofVizError::DuplicateId { .. } => "node ids must be unique within a document",
            ProofVizError::UnknownKind { .. } => {
                "expected one of: assumption, deduction, contradiction, conclusion"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        let ProofVizError::Input { .. } = self.err.inner() else {
            return None;
        };
        self.src().map(|src| src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ProofVizError::Input {
            message,
            line,
            column,
        } = self.err.inner()
        else {
            return None;
        };
        let src = self.src()?;
        let span = position_to_span(src, *line, *column);
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some(message.clone()), span),
        )))
    }
}

/// Convert a [`CliError`] into a reportable diagnostic.
pub fn to_reportable(err: &CliError) -> ErrorAdapter<'_> {
    ErrorAdapter::new(err)
}

/// Convert a 1-based line and column into a one-character [`SourceSpan`].
///
/// Positions past the end of a line or of the source are clamped.
fn position_to_span(src: &str, line: usize, column: usize) -> SourceSpan {
    let mut offset = 0;
    for (index, text) in src.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let within = column.saturating_sub(1).min(text.trim_end_matches('\n').len());
            offset += within;
            let len = usize::from(offset < src.len());
            return SourceSpan::new(offset.into(), len);
        }
        offset += text.len();
    }
    SourceSpan::new(src.len().into(), 0)
}
