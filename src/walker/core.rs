use thiserror::Error;
use tracing::{debug, info};

use crate::pipeline::{synthesize, SynthInput};
use crate::routes::{PathSegment, RoutePath, RouteTable, RouteTableEntry};
use crate::schema::{
    HookLayer, ParamSpec, SchemaIntrospector, SchemaNode, ValidatorRef,
};

/// Fatal structural error. Compilation is all-or-nothing: the first
/// violation aborts the whole run with no partial route table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompileError {
    /// A node declares two or more dynamic-parameter children.
    #[error("node `{node}` has more than one dynamic parameter child")]
    MultipleParamChildren { node: String },
}

/// Context inherited down the tree, passed by value into every recursive
/// call. Each node sees its ancestors' declarations plus its own, and
/// never a sibling's.
#[derive(Debug, Clone, Default)]
struct CascadeContext {
    hooks: Vec<HookLayer>,
    validators: Vec<ValidatorRef>,
    params: Vec<ParamSpec>,
}

/// Compile the whole tree into a route table.
///
/// Depth-first, deterministic listing order, literal children before the
/// one permitted dynamic child. Nodes without method declarations still
/// contribute cascade context for their descendants.
pub fn walk<I: SchemaIntrospector>(
    root: &SchemaNode,
    introspector: &I,
) -> Result<RouteTable, CompileError> {
    let mut table = RouteTable::new();
    visit(
        root,
        introspector,
        CascadeContext::default(),
        RoutePath::root(),
        &mut table,
    )?;
    info!(routes = table.len(), "schema tree compiled");
    Ok(table)
}

fn visit<I: SchemaIntrospector>(
    node: &SchemaNode,
    introspector: &I,
    mut ctx: CascadeContext,
    path: RoutePath,
    table: &mut RouteTable,
) -> Result<(), CompileError> {
    if let Some(param) = &node.param {
        ctx.params.push(param.clone());
    }
    if let Some(set) = introspector.hooks(node) {
        ctx.hooks.push(HookLayer {
            node_path: node.path.clone(),
            set,
        });
    }
    if let Some(validator) = introspector.validator(node) {
        ctx.validators.push(validator);
    }

    let methods = introspector.methods(node);
    if !methods.is_empty() {
        let controller = introspector.controller(node);
        let input = SynthInput {
            node_path: &node.path,
            hook_layers: &ctx.hooks,
            validators: &ctx.validators,
            params: &ctx.params,
            controller: controller.as_ref(),
        };
        for sig in &methods {
            let pipeline = synthesize(&input, sig);
            debug!(
                node = %node.display_path(),
                method = %sig.method,
                stages = pipeline.len(),
                "route compiled"
            );
            table.push(RouteTableEntry {
                path: path.clone(),
                method: sig.method.clone(),
                pipeline,
            });
        }
    }

    let dynamic_children: Vec<&SchemaNode> =
        node.children.iter().filter(|c| c.is_dynamic()).collect();
    if dynamic_children.len() >= 2 {
        return Err(CompileError::MultipleParamChildren {
            node: node.display_path(),
        });
    }

    // Literal children first, then the single dynamic child, so emitted
    // route ordering never shadows a literal path with a parameter match.
    for child in node.children.iter().filter(|c| !c.is_dynamic()) {
        visit(
            child,
            introspector,
            ctx.clone(),
            path.child(PathSegment::Literal(child.segment.clone())),
            table,
        )?;
    }
    if let Some(child) = dynamic_children.first() {
        let name = child
            .param
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_default();
        visit(
            child,
            introspector,
            ctx,
            path.child(PathSegment::Param(name)),
            table,
        )?;
    }

    Ok(())
}
