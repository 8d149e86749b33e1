use tracing::debug;

use super::stage::{
    CompiledPipeline, HookRef, MultipartField, PipelineStage, QueryField,
};
use crate::schema::{
    ControllerDecl, HookLayer, HookStage, MethodSignature, ParamKind, ParamSpec, PropType,
    RequestFormat, ShapeRef, ValidateTarget, ValidatorRef,
};

/// Everything the synthesizer needs about a node and its accumulated
/// cascade context. Borrowed from the walker's per-call context; the
/// synthesizer never mutates it.
#[derive(Debug, Clone, Copy)]
pub struct SynthInput<'a> {
    /// Path of the node the method is declared on.
    pub node_path: &'a str,
    /// Hook cascade, root-first. Controller-level hooks are appended last.
    pub hook_layers: &'a [HookLayer],
    /// Ancestor path-parameter validators, root-first.
    pub validators: &'a [ValidatorRef],
    /// Dynamic segments on the path to this node, root-first.
    pub params: &'a [ParamSpec],
    /// Controller declaration of the node, if any.
    pub controller: Option<&'a ControllerDecl>,
}

/// Assemble the ordered stage sequence for one method signature.
///
/// Stages follow a fixed order; each is omitted when its triggering
/// condition is false, and never reordered:
///
/// 1. `onRequest` hooks, 2. `preParsing` hooks, 3. numeric query coercion,
/// 4. boolean query coercion, 5. multipart upload + normalization,
/// 6. JSON body parsing, 7. `preValidation` hooks, 8. structural
/// validation, 9. path-parameter type coercion, 10. AND-combined
/// path-parameter validators, 11. inline per-method validators,
/// 12. `preHandler` hooks, 13. the final handler.
pub fn synthesize(input: &SynthInput<'_>, sig: &MethodSignature) -> CompiledPipeline {
    let mut stages = Vec::new();

    push_hook_calls(&mut stages, input, HookStage::OnRequest);
    push_hook_calls(&mut stages, input, HookStage::PreParsing);

    if let Some(query) = &sig.query {
        let numbers = coercible_fields(query, PropType::Number);
        if !numbers.is_empty() {
            stages.push(PipelineStage::QueryNumberCoerce {
                fields: numbers,
                guarded: query.optional,
            });
        }
        let booleans = coercible_fields(query, PropType::Boolean);
        if !booleans.is_empty() {
            stages.push(PipelineStage::QueryBooleanCoerce {
                fields: booleans,
                guarded: query.optional,
            });
        }
    }

    match (sig.request_format, &sig.body) {
        (RequestFormat::Multipart, Some(body)) => {
            stages.push(PipelineStage::MultipartUpload);
            stages.push(PipelineStage::MultipartNormalize {
                fields: body
                    .properties
                    .iter()
                    .filter(|p| p.array)
                    .map(|p| MultipartField {
                        name: p.name.clone(),
                        optional: p.optional,
                    })
                    .collect(),
            });
        }
        (RequestFormat::Json, Some(_)) => stages.push(PipelineStage::JsonBodyParse),
        _ => {}
    }

    push_hook_calls(&mut stages, input, HookStage::PreValidation);

    let validate_targets = [
        (ValidateTarget::Query, &sig.query),
        (ValidateTarget::Body, &sig.body),
        (ValidateTarget::Headers, &sig.headers),
    ];
    for (target, shape) in validate_targets {
        if let Some(shape) = shape {
            if shape.validated {
                stages.push(PipelineStage::StructuralValidate {
                    target,
                    shape: shape.name.clone(),
                    guarded: shape.optional,
                });
            }
        }
    }

    let numeric_params: Vec<String> = input
        .params
        .iter()
        .filter(|p| p.kind == ParamKind::Number)
        .map(|p| p.name.clone())
        .collect();
    if !numeric_params.is_empty() {
        stages.push(PipelineStage::ParamTypeCoerce {
            params: numeric_params,
        });
    }

    if !input.validators.is_empty() {
        stages.push(PipelineStage::ParamValidatorAnd {
            validators: input.validators.to_vec(),
        });
    }

    if let Some(inline) = input
        .controller
        .and_then(|c| c.inline_validators(&sig.method))
    {
        for (target, validator) in inline {
            stages.push(PipelineStage::InlineValidator {
                target: *target,
                validator: validator.clone(),
            });
        }
    }

    push_hook_calls(&mut stages, input, HookStage::PreHandler);

    let response_schema = input
        .controller
        .map(|c| c.has_response_schema(&sig.method))
        .unwrap_or(false);
    stages.push(PipelineStage::FinalHandler {
        node_path: input.node_path.to_string(),
        method: sig.method.clone(),
        is_async: sig.is_async,
        response_schema,
    });

    debug!(
        node = input.node_path,
        method = %sig.method,
        stages = stages.len(),
        statuses = ?sig.response_by_status.keys().collect::<Vec<_>>(),
        "synthesized pipeline"
    );

    CompiledPipeline::new(stages)
}

/// Expand one hook stage across the cascade, then the controller-level
/// declaration. Plural declarations expand to one call per referenced hook,
/// in declared order, each marked for call-time spread.
fn push_hook_calls(stages: &mut Vec<PipelineStage>, input: &SynthInput<'_>, stage: HookStage) {
    let controller_layer = input.controller.and_then(|c| c.hooks.as_ref());
    let layers = input
        .hook_layers
        .iter()
        .map(|l| (l.node_path.as_str(), &l.set))
        .chain(controller_layer.map(|set| (input.node_path, set)));

    for (node_path, set) in layers {
        if let Some(decl) = set.stage(stage) {
            for name in &decl.refs {
                stages.push(PipelineStage::HookCall {
                    stage,
                    hook: HookRef {
                        node_path: node_path.to_string(),
                        name: name.clone(),
                    },
                    spread: decl.plural,
                });
            }
        }
    }
}

fn coercible_fields(shape: &ShapeRef, ty: PropType) -> Vec<QueryField> {
    shape
        .properties
        .iter()
        .filter(|p| p.ty == ty)
        .map(|p| QueryField {
            name: p.name.clone(),
            optional: p.optional,
            array: p.array,
        })
        .collect()
}
