#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::pipeline::PipelineStage;
use crate::routes::{ParamStyle, RouteTable};
use crate::schema::{build_schema, NodeManifest};

fn compile(yaml: &str) -> Result<RouteTable, CompileError> {
    let manifest: NodeManifest = serde_yaml::from_str(yaml).unwrap();
    let (root, introspector) = build_schema(&manifest).unwrap();
    walk(&root, &introspector)
}

#[test]
fn single_dynamic_child_compiles() {
    let table = compile(
        r#"
children:
  - segment: tasks
    methods:
      - method: get
    children:
      - segment: _id@number
        methods:
          - method: get
"#,
    )
    .unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn two_dynamic_children_fail_naming_the_node() {
    let err = compile(
        r#"
children:
  - segment: tasks
    children:
      - segment: _id@number
      - segment: _slug
"#,
    )
    .unwrap_err();
    assert_eq!(
        err,
        CompileError::MultipleParamChildren {
            node: "/tasks".to_string()
        }
    );
}

#[test]
fn structural_error_aborts_regardless_of_location() {
    // The offending node sits deep in the second branch; nothing is
    // produced for the valid first branch either.
    let err = compile(
        r#"
children:
  - segment: healthy
    methods:
      - method: get
  - segment: users
    children:
      - segment: _user_id
        children:
          - segment: _a
          - segment: _b
"#,
    )
    .unwrap_err();
    assert_eq!(
        err,
        CompileError::MultipleParamChildren {
            node: "/users/_user_id".to_string()
        }
    );
}

#[test]
fn literal_children_are_visited_before_the_dynamic_child() {
    let table = compile(
        r#"
children:
  - segment: pets
    children:
      - segment: _id
        methods:
          - method: get
      - segment: count
        methods:
          - method: get
"#,
    )
    .unwrap();
    let paths: Vec<String> = table
        .iter()
        .map(|e| e.path.template(ParamStyle::Colon))
        .collect();
    assert_eq!(paths, vec!["/pets/count", "/pets/:id"]);
}

#[test]
fn nodes_without_methods_cascade_but_emit_nothing() {
    let table = compile(
        r#"
hooks:
  onRequest: auth
children:
  - segment: api
    children:
      - segment: tasks
        methods:
          - method: get
"#,
    )
    .unwrap();
    assert_eq!(table.len(), 1);
    let entry = &table.entries()[0];
    assert_eq!(entry.path.template(ParamStyle::Colon), "/api/tasks");
    // Root hook cascades down through the method-less `api` node.
    match &entry.pipeline.stages()[0] {
        PipelineStage::HookCall { hook, .. } => {
            assert_eq!(hook.name, "auth");
            assert_eq!(hook.node_path, "");
        }
        other => panic!("expected HookCall first, got {other:?}"),
    }
}

#[test]
fn siblings_never_see_each_others_declarations() {
    let table = compile(
        r#"
children:
  - segment: a
    hooks:
      onRequest: only_for_a
    methods:
      - method: get
  - segment: b
    methods:
      - method: get
"#,
    )
    .unwrap();
    assert_eq!(table.len(), 2);
    let a = &table.entries()[0];
    let b = &table.entries()[1];
    assert!(matches!(
        &a.pipeline.stages()[0],
        PipelineStage::HookCall { hook, .. } if hook.name == "only_for_a"
    ));
    assert_eq!(b.pipeline.len(), 1, "sibling must not inherit a's hooks");
}

#[test]
fn ancestor_validators_combine_by_and() {
    let table = compile(
        r#"
children:
  - segment: orgs
    children:
      - segment: _org@number
        validator: true
        children:
          - segment: members
            children:
              - segment: _member@number
                validator: true
                methods:
                  - method: get
"#,
    )
    .unwrap();
    assert_eq!(table.len(), 1);
    let stages = table.entries()[0].pipeline.stages();
    let and = stages
        .iter()
        .find_map(|s| match s {
            PipelineStage::ParamValidatorAnd { validators } => Some(validators),
            _ => None,
        })
        .expect("validator stage missing");
    let sources: Vec<&str> = and.iter().map(|v| v.node_path.as_str()).collect();
    assert_eq!(
        sources,
        vec!["orgs/_org@number", "orgs/_org@number/members/_member@number"]
    );
}

#[test]
fn routes_are_recorded_in_traversal_order() {
    let table = compile(
        r#"
methods:
  - method: get
children:
  - segment: pets
    methods:
      - method: get
      - method: post
"#,
    )
    .unwrap();
    let listed: Vec<(String, String)> = table
        .iter()
        .map(|e| (e.method.to_string(), e.path.template(ParamStyle::Colon)))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("GET".to_string(), "/".to_string()),
            ("GET".to_string(), "/pets".to_string()),
            ("POST".to_string(), "/pets".to_string()),
        ]
    );
}
