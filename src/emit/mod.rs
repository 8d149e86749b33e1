//! Rendering of compiled route tables into target-specific artifacts.
//!
//! The [`Renderer`] trait is the seam between compilation and
//! presentation; [`SourceRenderer`] is the bundled Askama-based renderer
//! producing a Rust wiring module.

mod renderer;
mod source;

pub use renderer::{write_artifact, Artifact, ArtifactFile, Renderer};
pub use source::{stage_expr, SourceRenderer};
