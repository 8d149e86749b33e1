use askama::Template;
use std::path::PathBuf;

use super::renderer::{Artifact, ArtifactFile, Renderer};
use crate::pipeline::PipelineStage;
use crate::routes::{ParamStyle, RouteTable};

/// Renders the route table as a Rust wiring module: one `app.route(...)`
/// registration per entry, each pipeline as an ordered stage-constructor
/// list. Presentation only; the structural pipeline is the contract.
#[derive(Debug, Clone, Default)]
pub struct SourceRenderer {
    param_style: ParamStyle,
}

impl SourceRenderer {
    pub fn new(param_style: ParamStyle) -> Self {
        Self { param_style }
    }
}

#[derive(Template)]
#[template(path = "wiring.rs.txt", escape = "none")]
struct WiringTemplateData {
    routes: Vec<RouteRender>,
}

struct RouteRender {
    method: String,
    path: String,
    stages: Vec<String>,
}

impl Renderer for SourceRenderer {
    fn emit(&self, table: &RouteTable) -> anyhow::Result<Artifact> {
        let routes = table
            .iter()
            .map(|entry| RouteRender {
                method: entry.method.to_string(),
                path: entry.path.template(self.param_style),
                stages: entry.pipeline.stages().iter().map(stage_expr).collect(),
            })
            .collect();
        let contents = WiringTemplateData { routes }.render()?;
        Ok(Artifact {
            files: vec![ArtifactFile {
                path: PathBuf::from("routes.rs"),
                contents,
            }],
        })
    }
}

/// Render one stage as a constructor expression in the wiring module.
pub fn stage_expr(stage: &PipelineStage) -> String {
    match stage {
        PipelineStage::HookCall {
            stage,
            hook,
            spread,
        } => {
            let ctor = if *spread { "hook_spread" } else { "hook" };
            format!(
                "Stage::{ctor}(HookStage::{stage:?}, {:?}, {:?})",
                hook.node_path, hook.name
            )
        }
        PipelineStage::QueryNumberCoerce { fields, guarded } => format!(
            "Stage::query_number_coerce(vec![{}], {guarded})",
            field_triples(fields)
        ),
        PipelineStage::QueryBooleanCoerce { fields, guarded } => format!(
            "Stage::query_boolean_coerce(vec![{}], {guarded})",
            field_triples(fields)
        ),
        PipelineStage::MultipartUpload => "Stage::multipart_upload()".to_string(),
        PipelineStage::MultipartNormalize { fields } => {
            let pairs = fields
                .iter()
                .map(|f| format!("({:?}, {})", f.name, f.optional))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Stage::multipart_normalize(vec![{pairs}])")
        }
        PipelineStage::JsonBodyParse => "Stage::json_body_parse()".to_string(),
        PipelineStage::StructuralValidate {
            target,
            shape,
            guarded,
        } => format!("Stage::structural_validate(Target::{target:?}, {shape:?}, {guarded})"),
        PipelineStage::ParamTypeCoerce { params } => {
            let names = params
                .iter()
                .map(|p| format!("{p:?}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Stage::param_type_coerce(vec![{names}])")
        }
        PipelineStage::ParamValidatorAnd { validators } => {
            let refs = validators
                .iter()
                .map(|v| format!("{:?}", v.node_path))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Stage::param_validator_and(vec![{refs}])")
        }
        PipelineStage::InlineValidator { target, validator } => {
            format!("Stage::inline_validator(Target::{target:?}, {validator:?})")
        }
        PipelineStage::FinalHandler {
            node_path,
            method,
            is_async,
            response_schema,
        } => {
            let ctor = if *response_schema {
                "handler_with_schema"
            } else {
                "handler"
            };
            let invocation = if *is_async { "Async::Yes" } else { "Async::No" };
            format!("Stage::{ctor}({node_path:?}, Method::{method}, {invocation})")
        }
    }
}

fn field_triples(fields: &[crate::pipeline::QueryField]) -> String {
    fields
        .iter()
        .map(|f| format!("({:?}, {}, {})", f.name, f.optional, f.array))
        .collect::<Vec<_>>()
        .join(", ")
}
