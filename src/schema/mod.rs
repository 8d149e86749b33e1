//! Schema tree data model and the introspector seam.
//!
//! The tree itself ([`SchemaNode`]) carries only structure: segments,
//! dynamic-parameter bindings and children. Everything declared *on* a node
//! (methods, hooks, validators, controllers) is answered by a
//! [`SchemaIntrospector`], so the compiler never depends on where the schema
//! came from. [`manifest`] provides the bundled implementation backed by a
//! declarative YAML/JSON manifest or a per-segment directory tree.

mod introspect;
pub mod manifest;
mod types;

pub use introspect::{ManifestIntrospector, SchemaIntrospector};
pub use manifest::{build_schema, load_manifest, parse_segment, NodeManifest};
pub use types::*;
