//! Export of composed scenes.
//!
//! ```text
//! Graph
//!     ↓ sync + highlight
//! Scene
//!     ↓ export (this module)
//! Output
//! ```

pub mod svg;

use crate::scene::Scene;

/// Abstraction for scene export backends.
pub trait Exporter {
    /// Exports `scene` to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the scene cannot be converted, or
    /// [`Error::Io`] if writing the output fails.
    fn export_scene(&mut self, scene: &Scene) -> Result<(), Error>;
}

/// Errors that can occur during export.
///
/// Converted into [`ProofVizError::Export`] at the crate boundary.
///
/// [`ProofVizError::Export`]: crate::ProofVizError::Export
#[derive(Debug)]
pub enum Error {
    Render(String),
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
