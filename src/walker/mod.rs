//! Depth-first schema tree traversal with cascading context and
//! structural-constraint enforcement.

mod core;

#[cfg(test)]
mod tests;

pub use core::{walk, CompileError};
