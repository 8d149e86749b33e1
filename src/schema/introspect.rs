use std::collections::HashMap;

use super::types::{ControllerDecl, HookSet, MethodSignature, SchemaNode, ValidatorRef};

/// Read-only query interface over the declarations attached to schema nodes.
///
/// The walker consumes the tree purely through this trait, so any schema
/// representation (a declarative manifest, an IDL, reflection over an
/// existing service) can drive compilation. Implementations must be
/// deterministic for a fixed tree: the same node always yields the same
/// answers within one compiler run.
pub trait SchemaIntrospector {
    /// Declared method signatures of the node, in declaration order.
    /// Empty when the node declares no methods.
    fn methods(&self, node: &SchemaNode) -> Vec<MethodSignature>;

    /// Node-level hook declarations, if any.
    fn hooks(&self, node: &SchemaNode) -> Option<HookSet>;

    /// Path-parameter validator declared on this (dynamic) node, if any.
    fn validator(&self, node: &SchemaNode) -> Option<ValidatorRef>;

    /// Controller declaration of the node, if any.
    fn controller(&self, node: &SchemaNode) -> Option<ControllerDecl>;
}

/// Declarations of a single node, keyed by node path in
/// [`ManifestIntrospector`].
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeDecls {
    pub methods: Vec<MethodSignature>,
    pub hooks: Option<HookSet>,
    pub validator: Option<ValidatorRef>,
    pub controller: Option<ControllerDecl>,
}

/// Introspector backed by a loaded schema manifest.
///
/// Built together with the [`SchemaNode`] tree by
/// [`super::manifest::build_schema`]; lookups are by node path.
#[derive(Debug, Default)]
pub struct ManifestIntrospector {
    nodes: HashMap<String, NodeDecls>,
}

impl ManifestIntrospector {
    pub(crate) fn insert(&mut self, path: String, decls: NodeDecls) {
        self.nodes.insert(path, decls);
    }

    fn decls(&self, node: &SchemaNode) -> Option<&NodeDecls> {
        self.nodes.get(&node.path)
    }
}

impl SchemaIntrospector for ManifestIntrospector {
    fn methods(&self, node: &SchemaNode) -> Vec<MethodSignature> {
        self.decls(node).map(|d| d.methods.clone()).unwrap_or_default()
    }

    fn hooks(&self, node: &SchemaNode) -> Option<HookSet> {
        self.decls(node).and_then(|d| d.hooks.clone())
    }

    fn validator(&self, node: &SchemaNode) -> Option<ValidatorRef> {
        self.decls(node).and_then(|d| d.validator.clone())
    }

    fn controller(&self, node: &SchemaNode) -> Option<ControllerDecl> {
        self.decls(node).and_then(|d| d.controller.clone())
    }
}
