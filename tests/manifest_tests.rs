//! Manifest loading: single files, directory trees, declaration errors.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use cascader::schema::{build_schema, load_manifest, parse_segment, NodeManifest, ParamKind};

fn build(yaml: &str) -> anyhow::Result<()> {
    let manifest: NodeManifest = serde_yaml::from_str(yaml)?;
    build_schema(&manifest)?;
    Ok(())
}

#[test]
fn yaml_file_manifest_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.yaml");
    fs::write(
        &path,
        r#"
children:
  - segment: tasks
    methods:
      - method: get
"#,
    )
    .unwrap();
    let manifest = load_manifest(&path).unwrap();
    assert_eq!(manifest.children.len(), 1);
    assert_eq!(manifest.children[0].segment, "tasks");
}

#[test]
fn json_file_manifest_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");
    fs::write(
        &path,
        r#"{"children": [{"segment": "tasks", "methods": [{"method": "get"}]}]}"#,
    )
    .unwrap();
    let manifest = load_manifest(&path).unwrap();
    assert_eq!(manifest.children[0].methods[0].method, "get");
}

#[test]
fn directory_tree_manifest_loads_with_sorted_children() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_node(root, "[]");
    write_node(&root.join("zebras"), "- method: get");
    write_node(&root.join("apes"), "- method: get");
    let param_dir = root.join("apes").join("_id@number");
    write_node(&param_dir, "- method: get");
    fs::write(param_dir.join("validators.yaml"), "").unwrap();

    let manifest = load_manifest(root).unwrap();
    let names: Vec<&str> = manifest.children.iter().map(|c| c.segment.as_str()).collect();
    assert_eq!(names, vec!["apes", "zebras"]);
    let param_node = &manifest.children[0].children[0];
    assert_eq!(param_node.segment, "_id@number");
    assert!(param_node.validator);
}

#[test]
fn directory_tree_picks_up_hook_and_controller_files() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_node(root, "[]");
    let tasks = root.join("tasks");
    write_node(&tasks, "- method: get");
    fs::write(tasks.join("hooks.yaml"), "onRequest: verify_token\n").unwrap();
    fs::write(tasks.join("controller.yaml"), "responseSchema: [get]\n").unwrap();

    let manifest = load_manifest(root).unwrap();
    let tasks_node = &manifest.children[0];
    assert!(tasks_node.hooks.is_some());
    assert!(tasks_node.controller.is_some());
    build_schema(&manifest).unwrap();
}

fn write_node(dir: &Path, methods_yaml: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("methods.yaml"), methods_yaml).unwrap();
}

#[test]
fn dynamic_segments_parse_name_and_kind() {
    let spec = parse_segment("_taskId@number").unwrap().unwrap();
    assert_eq!(spec.name, "taskId");
    assert_eq!(spec.kind, ParamKind::Number);

    let spec = parse_segment("_slug").unwrap().unwrap();
    assert_eq!(spec.name, "slug");
    assert_eq!(spec.kind, ParamKind::String);

    assert!(parse_segment("tasks").unwrap().is_none());
}

#[test]
fn unknown_parameter_kind_is_rejected() {
    let err = parse_segment("_id@uuid").unwrap_err();
    assert!(err.to_string().contains("unknown parameter kind `uuid`"));
}

#[test]
fn nameless_dynamic_segment_is_rejected() {
    assert!(parse_segment("_").is_err());
    assert!(parse_segment("_@number").is_err());
}

#[test]
fn validator_on_literal_segment_is_rejected() {
    let err = build(
        r#"
children:
  - segment: tasks
    validator: true
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("not a dynamic segment"));
}

#[test]
fn duplicate_child_segments_are_rejected() {
    let err = build(
        r#"
children:
  - segment: tasks
  - segment: tasks
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate child segment `tasks`"));
}

#[test]
fn invalid_http_method_is_rejected() {
    let err = build(
        r#"
children:
  - segment: tasks
    methods:
      - method: "fetch it"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("invalid HTTP method"));
}

#[test]
fn validated_shape_without_a_name_is_rejected() {
    let err = build(
        r#"
children:
  - segment: tasks
    methods:
      - method: post
        body:
          validated: true
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("needs a `shape` name"));
}

#[test]
fn empty_segment_below_the_root_is_rejected() {
    let err = build(
        r#"
children:
  - segment: tasks
    children:
      - methods:
          - method: get
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("empty segment"));
}
