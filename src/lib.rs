//! # Cascader
//!
//! **Cascader** is a build-time route compiler: it takes a hierarchical API
//! schema tree (one node per URL path segment, each node declaring methods,
//! hooks, path-parameter validators and a controller) and compiles a fully
//! wired, deterministically ordered request pipeline for every declared
//! route.
//!
//! ## Architecture
//!
//! Data flows one way, leaves first:
//!
//! ```text
//! Schema Introspector → Tree Walker → Pipeline Synthesizer → Route Table → Emitter
//! ```
//!
//! - **[`schema`]**: the immutable schema tree and the
//!   [`schema::SchemaIntrospector`] query seam; the bundled
//!   [`schema::ManifestIntrospector`] loads a declarative YAML/JSON
//!   manifest or a per-segment directory tree.
//! - **[`walker`]**: depth-first traversal with cascading hook/validator
//!   context passed down by value, enforcing the one-dynamic-child
//!   structural invariant with a fatal [`walker::CompileError`].
//! - **[`pipeline`]**: per-method assembly of tagged
//!   [`pipeline::PipelineStage`] sequences in a fixed thirteen-step order;
//!   stages are only ever omitted, never reordered.
//! - **[`routes`]**: the insertion-ordered route table with
//!   parameter-syntax-aware path templates.
//! - **[`emit`]**: the [`emit::Renderer`] seam plus an Askama-based
//!   [`emit::SourceRenderer`] producing a Rust wiring module.
//! - **[`scaffold`]**: idempotent creation of missing per-node
//!   declaration files, run as a separate preparatory pass.
//!
//! ## Cascading
//!
//! Hooks declared on a node apply to every route beneath it, root-first,
//! followed by the route node's own controller-level hooks. Validators
//! declared on dynamic segments combine down the tree by logical AND.
//! Context is cloned into each recursive call: siblings never see each
//! other's declarations.
//!
//! ## Compilation contract
//!
//! A run either produces a complete route table or fails fast on the first
//! structural violation; there is no partial output. The compiler never
//! executes requests; it guarantees the emitted stage ordering places all
//! validation before the final handler, and renderers must preserve the
//! strictly sequential, short-circuiting execution of each pipeline.
//!
//! ## Quick start
//!
//! ```no_run
//! use cascader::emit::{Renderer, SourceRenderer};
//! use cascader::routes::ParamStyle;
//! use cascader::schema::{build_schema, load_manifest};
//! use cascader::walker::walk;
//!
//! # fn main() -> anyhow::Result<()> {
//! let manifest = load_manifest(std::path::Path::new("api.yaml"))?;
//! let (root, introspector) = build_schema(&manifest)?;
//! let table = walk(&root, &introspector)?;
//! let artifact = SourceRenderer::new(ParamStyle::Colon).emit(&table)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod emit;
pub mod pipeline;
pub mod routes;
pub mod scaffold;
pub mod schema;
pub mod walker;

pub use pipeline::{CompiledPipeline, PipelineStage};
pub use routes::{ParamStyle, RouteTable, RouteTableEntry};
pub use schema::{
    build_schema, load_manifest, ManifestIntrospector, SchemaIntrospector, SchemaNode,
};
pub use walker::{walk, CompileError};
