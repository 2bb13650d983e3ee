//! ProofViz Core Types and Definitions
//!
//! This crate provides the foundational types shared by the ProofViz
//! layout engine and its front ends. It includes:
//!
//! - **Identifiers**: Efficient string-interned node identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Metadata**: The open per-node key/value bag ([`metadata::Metadata`])
//! - **Draw**: Z-ordered SVG output ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod metadata;
