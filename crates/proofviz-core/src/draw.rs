//! Drawing primitives shared by ProofViz exporters.

mod layer;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
