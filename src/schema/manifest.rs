use anyhow::{bail, Context};
use http::Method;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use super::introspect::{ManifestIntrospector, NodeDecls};
use super::types::{
    ControllerDecl, HookDecl, HookSet, HookStage, MethodSignature, ParamKind, ParamSpec,
    PropType, PropertySpec, RequestFormat, SchemaNode, ShapeRef, ValidateTarget, ValidatorRef,
};

/// Per-node files recognized when the schema is a directory tree.
const METHODS_FILE: &str = "methods.yaml";
const HOOKS_FILE: &str = "hooks.yaml";
const CONTROLLER_FILE: &str = "controller.yaml";
const VALIDATORS_FILE: &str = "validators.yaml";

/// Raw manifest of one schema node, straight from YAML/JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeManifest {
    #[serde(default)]
    pub segment: String,
    #[serde(default)]
    pub hooks: Option<HookManifest>,
    /// Presence flag for a path-parameter validator on this dynamic node.
    #[serde(default)]
    pub validator: bool,
    #[serde(default)]
    pub methods: Vec<MethodManifest>,
    #[serde(default)]
    pub controller: Option<ControllerManifest>,
    #[serde(default)]
    pub children: Vec<NodeManifest>,
}

/// A hook declaration value: one name, or a list spread at call time.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HookRefs {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HookManifest {
    #[serde(default)]
    pub on_request: Option<HookRefs>,
    #[serde(default)]
    pub pre_parsing: Option<HookRefs>,
    #[serde(default)]
    pub pre_validation: Option<HookRefs>,
    #[serde(default)]
    pub pre_handler: Option<HookRefs>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodManifest {
    /// Lower-case HTTP method name (`get`, `post`, ...).
    pub method: String,
    #[serde(default)]
    pub query: Option<ShapeManifest>,
    #[serde(default)]
    pub body: Option<ShapeManifest>,
    #[serde(default)]
    pub headers: Option<ShapeManifest>,
    #[serde(default)]
    pub format: RequestFormat,
    #[serde(default, rename = "async")]
    pub is_async: bool,
    /// Status code to response shape name.
    #[serde(default)]
    pub responses: BTreeMap<u16, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeManifest {
    #[serde(default)]
    pub shape: String,
    #[serde(default)]
    pub validated: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub properties: Vec<PropertyManifest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyManifest {
    pub name: String,
    #[serde(default, rename = "type")]
    pub ty: PropType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub array: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ControllerManifest {
    #[serde(default)]
    pub hooks: Option<HookManifest>,
    /// Methods that declare a per-status response schema.
    #[serde(default)]
    pub response_schema: Vec<String>,
    /// Inline per-method validators, keyed by method name then target.
    #[serde(default)]
    pub validators: BTreeMap<String, InlineValidatorsManifest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InlineValidatorsManifest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub headers: Option<String>,
}

/// Load a schema manifest from a single YAML/JSON file or a directory tree.
///
/// A directory tree mirrors the original per-segment layout: one directory
/// per path segment (dynamic segments named `_param@kind`), with optional
/// `methods.yaml`, `hooks.yaml`, `controller.yaml` declaration files and a
/// `validators.yaml` presence marker.
pub fn load_manifest(path: &Path) -> anyhow::Result<NodeManifest> {
    if path.is_dir() {
        return load_dir(path, String::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema manifest {path:?}"))?;
    let file_name = path.to_string_lossy();
    let manifest: NodeManifest = if file_name.ends_with(".yaml") || file_name.ends_with(".yml") {
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML manifest {path:?}"))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON manifest {path:?}"))?
    };
    Ok(manifest)
}

fn load_dir(dir: &Path, segment: String) -> anyhow::Result<NodeManifest> {
    let mut manifest = NodeManifest {
        segment,
        ..NodeManifest::default()
    };

    let methods_path = dir.join(METHODS_FILE);
    if methods_path.exists() {
        let content = std::fs::read_to_string(&methods_path)
            .with_context(|| format!("failed to read {methods_path:?}"))?;
        manifest.methods = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid method declarations in {methods_path:?}"))?;
    }

    let hooks_path = dir.join(HOOKS_FILE);
    if hooks_path.exists() {
        let content = std::fs::read_to_string(&hooks_path)
            .with_context(|| format!("failed to read {hooks_path:?}"))?;
        manifest.hooks = Some(
            serde_yaml::from_str(&content)
                .with_context(|| format!("invalid hook declarations in {hooks_path:?}"))?,
        );
    }

    let controller_path = dir.join(CONTROLLER_FILE);
    if controller_path.exists() {
        let content = std::fs::read_to_string(&controller_path)
            .with_context(|| format!("failed to read {controller_path:?}"))?;
        manifest.controller = Some(
            serde_yaml::from_str(&content)
                .with_context(|| format!("invalid controller declaration in {controller_path:?}"))?,
        );
    }

    manifest.validator = dir.join(VALIDATORS_FILE).exists();

    // Deterministic listing order: sorted directory names.
    let mut child_dirs: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list schema directory {dir:?}"))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    child_dirs.sort();

    for name in child_dirs {
        manifest
            .children
            .push(load_dir(&dir.join(&name), name.clone())?);
    }

    Ok(manifest)
}

/// Parse a segment name into its dynamic-parameter spec, if any.
///
/// `_id@number` binds parameter `id` of kind `number`; a bare `_id` defaults
/// to `string`. Literal segments pass through unchanged.
pub fn parse_segment(segment: &str) -> anyhow::Result<Option<ParamSpec>> {
    let Some(rest) = segment.strip_prefix('_') else {
        return Ok(None);
    };
    let (name, kind) = match rest.split_once('@') {
        Some((name, kind_str)) => {
            let kind = match kind_str {
                "string" => ParamKind::String,
                "number" => ParamKind::Number,
                other => bail!("segment `{segment}`: unknown parameter kind `{other}`"),
            };
            (name, kind)
        }
        None => (rest, ParamKind::String),
    };
    if name.is_empty() {
        bail!("segment `{segment}`: dynamic segment is missing a parameter name");
    }
    Ok(Some(ParamSpec {
        name: name.to_string(),
        kind,
    }))
}

/// Build the immutable [`SchemaNode`] tree and its [`ManifestIntrospector`]
/// from a loaded manifest. All declaration-level problems (bad method names,
/// validated shapes without a name, validators on literal segments) are
/// reported here, before compilation starts.
pub fn build_schema(manifest: &NodeManifest) -> anyhow::Result<(SchemaNode, ManifestIntrospector)> {
    let mut introspector = ManifestIntrospector::default();
    let root = build_node(manifest, "", &mut introspector)?;
    Ok((root, introspector))
}

fn build_node(
    manifest: &NodeManifest,
    parent_path: &str,
    introspector: &mut ManifestIntrospector,
) -> anyhow::Result<SchemaNode> {
    if manifest.segment.contains('/') {
        bail!("segment `{}` must not contain `/`", manifest.segment);
    }
    let path = if parent_path.is_empty() {
        manifest.segment.clone()
    } else if manifest.segment.is_empty() {
        bail!("non-root node under `/{parent_path}` has an empty segment");
    } else {
        format!("{parent_path}/{}", manifest.segment)
    };
    let param = parse_segment(&manifest.segment)
        .with_context(|| format!("node `/{path}`"))?;

    let mut decls = NodeDecls {
        methods: manifest
            .methods
            .iter()
            .map(|m| convert_method(m, &path))
            .collect::<anyhow::Result<_>>()?,
        hooks: manifest.hooks.as_ref().map(convert_hooks),
        validator: None,
        controller: manifest
            .controller
            .as_ref()
            .map(|c| convert_controller(c, &path))
            .transpose()?,
    };

    if manifest.validator {
        let Some(param) = &param else {
            bail!("node `/{path}` declares a validator but is not a dynamic segment");
        };
        decls.validator = Some(ValidatorRef {
            node_path: path.clone(),
            param_name: param.name.clone(),
            kind: param.kind,
        });
    }

    introspector.insert(path.clone(), decls);

    let mut seen = HashSet::new();
    let mut children = Vec::with_capacity(manifest.children.len());
    for child in &manifest.children {
        if !seen.insert(child.segment.clone()) {
            bail!("node `/{path}` has duplicate child segment `{}`", child.segment);
        }
        children.push(build_node(child, &path, introspector)?);
    }

    Ok(SchemaNode {
        segment: manifest.segment.clone(),
        path,
        param,
        children,
    })
}

fn parse_method(name: &str, path: &str) -> anyhow::Result<Method> {
    Method::from_bytes(name.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("node `/{path}`: invalid HTTP method `{name}`"))
}

fn convert_method(manifest: &MethodManifest, path: &str) -> anyhow::Result<MethodSignature> {
    Ok(MethodSignature {
        method: parse_method(&manifest.method, path)?,
        query: manifest
            .query
            .as_ref()
            .map(|s| convert_shape(s, path, "query"))
            .transpose()?,
        body: manifest
            .body
            .as_ref()
            .map(|s| convert_shape(s, path, "body"))
            .transpose()?,
        headers: manifest
            .headers
            .as_ref()
            .map(|s| convert_shape(s, path, "headers"))
            .transpose()?,
        response_by_status: manifest.responses.clone(),
        request_format: manifest.format,
        is_async: manifest.is_async,
    })
}

fn convert_shape(manifest: &ShapeManifest, path: &str, target: &str) -> anyhow::Result<ShapeRef> {
    if manifest.validated && manifest.shape.is_empty() {
        bail!("node `/{path}`: validated {target} shape needs a `shape` name");
    }
    Ok(ShapeRef {
        name: manifest.shape.clone(),
        optional: manifest.optional,
        validated: manifest.validated,
        properties: manifest
            .properties
            .iter()
            .map(|p| PropertySpec {
                name: p.name.clone(),
                ty: p.ty,
                optional: p.optional,
                array: p.array,
            })
            .collect(),
    })
}

fn convert_hooks(manifest: &HookManifest) -> HookSet {
    let mut set = HookSet::new();
    let entries = [
        (HookStage::OnRequest, &manifest.on_request),
        (HookStage::PreParsing, &manifest.pre_parsing),
        (HookStage::PreValidation, &manifest.pre_validation),
        (HookStage::PreHandler, &manifest.pre_handler),
    ];
    for (stage, refs) in entries {
        match refs {
            Some(HookRefs::One(name)) => set.insert(
                stage,
                HookDecl {
                    refs: vec![name.clone()],
                    plural: false,
                },
            ),
            Some(HookRefs::Many(names)) => set.insert(
                stage,
                HookDecl {
                    refs: names.clone(),
                    plural: true,
                },
            ),
            None => {}
        }
    }
    set
}

fn convert_controller(manifest: &ControllerManifest, path: &str) -> anyhow::Result<ControllerDecl> {
    let mut decl = ControllerDecl {
        hooks: manifest.hooks.as_ref().map(convert_hooks),
        ..ControllerDecl::default()
    };
    for name in &manifest.response_schema {
        decl.response_schema_methods
            .insert(parse_method(name, path)?);
    }
    let mut validators = HashMap::new();
    for (name, targets) in &manifest.validators {
        let method = parse_method(name, path)?;
        let mut by_target = BTreeMap::new();
        if let Some(v) = &targets.query {
            by_target.insert(ValidateTarget::Query, v.clone());
        }
        if let Some(v) = &targets.body {
            by_target.insert(ValidateTarget::Body, v.clone());
        }
        if let Some(v) = &targets.headers {
            by_target.insert(ValidateTarget::Headers, v.clone());
        }
        if !by_target.is_empty() {
            validators.insert(method, by_target);
        }
    }
    decl.validators = validators;
    Ok(decl)
}
