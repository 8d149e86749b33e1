//! End-to-end compilation: manifest in, route table out.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use cascader::pipeline::PipelineStage;
use cascader::routes::{ParamStyle, RouteTable};
use cascader::schema::{build_schema, HookStage, NodeManifest, ValidateTarget};
use cascader::walker::walk;

fn compile(yaml: &str) -> RouteTable {
    let manifest: NodeManifest = serde_yaml::from_str(yaml).expect("manifest parses");
    let (root, introspector) = build_schema(&manifest).expect("schema builds");
    walk(&root, &introspector).expect("compilation succeeds")
}

fn templates(table: &RouteTable) -> Vec<(String, String)> {
    table
        .iter()
        .map(|e| (e.method.to_string(), e.path.template(ParamStyle::Colon)))
        .collect()
}

#[test]
fn optional_number_query_compiles_to_guarded_coercion_and_validation() {
    let table = compile(
        r#"
children:
  - segment: tasks
    methods:
      - method: get
        query:
          shape: ListQuery
          validated: true
          optional: true
          properties:
            - { name: limit, type: number, optional: true }
"#,
    );
    assert_eq!(table.len(), 1);
    let entry = &table.entries()[0];
    assert_eq!(
        entry.pipeline.tags(),
        vec!["QueryNumberCoerce", "StructuralValidate", "FinalHandler"]
    );
    assert!(matches!(
        &entry.pipeline.stages()[0],
        PipelineStage::QueryNumberCoerce { guarded: true, .. }
    ));
    assert!(matches!(
        &entry.pipeline.stages()[1],
        PipelineStage::StructuralValidate {
            target: ValidateTarget::Query,
            guarded: true,
            ..
        }
    ));
}

#[test]
fn numeric_ancestor_param_compiles_to_coercion_and_anded_validators() {
    let table = compile(
        r#"
children:
  - segment: tasks
    children:
      - segment: _id@number
        validator: true
        children:
          - segment: comments
            methods:
              - method: get
"#,
    );
    assert_eq!(table.len(), 1);
    let entry = &table.entries()[0];
    assert_eq!(entry.path.template(ParamStyle::Colon), "/tasks/:id/comments");
    assert_eq!(
        entry.pipeline.tags(),
        vec!["ParamTypeCoerce", "ParamValidatorAnd", "FinalHandler"]
    );
    match &entry.pipeline.stages()[1] {
        PipelineStage::ParamValidatorAnd { validators } => {
            assert_eq!(validators.len(), 1);
            assert_eq!(validators[0].node_path, "tasks/_id@number");
            assert_eq!(validators[0].param_name, "id");
        }
        other => panic!("expected ParamValidatorAnd, got {other:?}"),
    }
}

#[test]
fn multipart_post_compiles_to_upload_normalize_validate() {
    let table = compile(
        r#"
children:
  - segment: uploads
    methods:
      - method: post
        format: multipart
        body:
          shape: UploadBody
          validated: true
          properties:
            - { name: files, type: binary, array: true }
            - { name: note, optional: true }
"#,
    );
    let entry = &table.entries()[0];
    assert_eq!(
        entry.pipeline.tags(),
        vec![
            "MultipartUpload",
            "MultipartNormalize",
            "StructuralValidate",
            "FinalHandler"
        ]
    );
    match &entry.pipeline.stages()[1] {
        PipelineStage::MultipartNormalize { fields } => {
            let listed: Vec<(&str, bool)> =
                fields.iter().map(|f| (f.name.as_str(), f.optional)).collect();
            assert_eq!(listed, vec![("files", false)]);
        }
        other => panic!("expected MultipartNormalize, got {other:?}"),
    }
    assert!(matches!(
        &entry.pipeline.stages()[2],
        PipelineStage::StructuralValidate {
            target: ValidateTarget::Body,
            ..
        }
    ));
}

#[test]
fn hooks_cascade_across_three_levels_onto_the_leaf_route() {
    let table = compile(
        r#"
hooks:
  onRequest: verify_token
children:
  - segment: v1
    hooks:
      onRequest: [trace_in, trace_out]
      preHandler: audit
    children:
      - segment: tasks
        hooks:
          preHandler: load_task
        methods:
          - method: get
"#,
    );
    let entry = &table.entries()[0];
    let calls: Vec<(HookStage, &str, &str, bool)> = entry
        .pipeline
        .stages()
        .iter()
        .filter_map(|s| match s {
            PipelineStage::HookCall {
                stage,
                hook,
                spread,
            } => Some((*stage, hook.node_path.as_str(), hook.name.as_str(), *spread)),
            _ => None,
        })
        .collect();
    assert_eq!(
        calls,
        vec![
            (HookStage::OnRequest, "", "verify_token", false),
            (HookStage::OnRequest, "v1", "trace_in", true),
            (HookStage::OnRequest, "v1", "trace_out", true),
            (HookStage::PreHandler, "v1", "audit", false),
            (HookStage::PreHandler, "v1/tasks", "load_task", false),
        ]
    );
}

#[test]
fn routes_are_recorded_in_traversal_order_with_literals_first() {
    let table = compile(
        r#"
methods:
  - method: get
children:
  - segment: pets
    methods:
      - method: get
      - method: post
    children:
      - segment: _id
        methods:
          - method: get
      - segment: count
        methods:
          - method: get
"#,
    );
    assert_eq!(
        templates(&table),
        vec![
            ("GET".to_string(), "/".to_string()),
            ("GET".to_string(), "/pets".to_string()),
            ("POST".to_string(), "/pets".to_string()),
            ("GET".to_string(), "/pets/count".to_string()),
            ("GET".to_string(), "/pets/:id".to_string()),
        ]
    );
}

#[test]
fn controller_response_schema_marks_only_the_declared_method() {
    let table = compile(
        r#"
children:
  - segment: tasks
    controller:
      responseSchema: [get]
    methods:
      - method: get
        responses:
          200: Task
      - method: post
"#,
    );
    let schemas: Vec<bool> = table
        .iter()
        .map(|e| match e.pipeline.final_handler() {
            PipelineStage::FinalHandler {
                response_schema, ..
            } => *response_schema,
            other => panic!("expected FinalHandler, got {other:?}"),
        })
        .collect();
    assert_eq!(schemas, vec![true, false]);
}

#[test]
fn controller_inline_validators_land_on_their_method_only() {
    let table = compile(
        r#"
children:
  - segment: tasks
    controller:
      validators:
        post:
          body: reject_reserved_names
    methods:
      - method: get
      - method: post
        body:
          shape: CreateTask
"#,
    );
    let get = &table.entries()[0];
    let post = &table.entries()[1];
    assert_eq!(get.pipeline.tags(), vec!["FinalHandler"]);
    assert_eq!(
        post.pipeline.tags(),
        vec!["JsonBodyParse", "InlineValidator", "FinalHandler"]
    );
}
