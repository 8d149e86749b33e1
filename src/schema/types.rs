use http::Method;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Lifecycle stages at which cascading hooks can run.
///
/// Ordering of the variants matches the order the stages appear in a
/// compiled pipeline: `onRequest` hooks run first, `preHandler` hooks last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum HookStage {
    #[serde(rename = "onRequest")]
    OnRequest,
    #[serde(rename = "preParsing")]
    PreParsing,
    #[serde(rename = "preValidation")]
    PreValidation,
    #[serde(rename = "preHandler")]
    PreHandler,
}

impl HookStage {
    /// All stages in pipeline order.
    pub const ALL: [HookStage; 4] = [
        HookStage::OnRequest,
        HookStage::PreParsing,
        HookStage::PreValidation,
        HookStage::PreHandler,
    ];
}

impl std::fmt::Display for HookStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HookStage::OnRequest => "onRequest",
            HookStage::PreParsing => "preParsing",
            HookStage::PreValidation => "preValidation",
            HookStage::PreHandler => "preHandler",
        };
        write!(f, "{}", s)
    }
}

/// Declared type of a dynamic path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Number,
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamKind::String => write!(f, "string"),
            ParamKind::Number => write!(f, "number"),
        }
    }
}

/// A dynamic path parameter: name plus declared kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
}

/// One node of the schema tree, corresponding to a single URL path segment.
///
/// The tree is constructed once per compiler run and never mutated afterwards.
/// `path` is the slash-joined segment chain from the root (empty for the root
/// itself) and serves as the structural reference for everything declared on
/// this node: hook sources, validators, controllers.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    /// Raw segment name (`tasks`, or `_id@number` for a dynamic segment).
    pub segment: String,
    /// Slash-joined segment chain from the root. Empty for the root node.
    pub path: String,
    /// Present when this segment binds a runtime parameter.
    pub param: Option<ParamSpec>,
    /// Children in deterministic listing order.
    pub children: Vec<SchemaNode>,
}

impl SchemaNode {
    pub fn is_dynamic(&self) -> bool {
        self.param.is_some()
    }

    /// Node path suitable for error messages (`/` for the root).
    pub fn display_path(&self) -> String {
        if self.path.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", self.path)
        }
    }
}

/// Primitive classification of a shape property, as far as pipeline
/// synthesis cares: numbers and booleans drive query coercion, binary
/// parts and arrays drive multipart normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    String,
    Number,
    Boolean,
    Binary,
    Other,
}

impl Default for PropType {
    fn default() -> Self {
        PropType::String
    }
}

/// One declared property of a request shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: String,
    pub ty: PropType,
    pub optional: bool,
    pub array: bool,
}

/// Shape descriptor for a query/body/headers declaration.
///
/// `validated` distinguishes structurally validated record types from plain
/// structural types; it is supplied by the introspector and never inferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeRef {
    pub name: String,
    pub optional: bool,
    pub validated: bool,
    pub properties: Vec<PropertySpec>,
}

/// Wire format of a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestFormat {
    Json,
    Multipart,
}

impl Default for RequestFormat {
    fn default() -> Self {
        RequestFormat::Json
    }
}

/// Per-method signature of a schema node, as reported by the introspector.
#[derive(Debug, Clone)]
pub struct MethodSignature {
    pub method: Method,
    pub query: Option<ShapeRef>,
    pub body: Option<ShapeRef>,
    pub headers: Option<ShapeRef>,
    /// Status code to response shape name, for every declared response.
    pub response_by_status: BTreeMap<u16, String>,
    pub request_format: RequestFormat,
    pub is_async: bool,
}

/// Ordered hook references for one stage, plus whether the declaration was
/// plural (a list spread at call time) or singular.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookDecl {
    pub refs: Vec<String>,
    pub plural: bool,
}

/// Hook declarations of one node (or one controller), keyed by stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookSet {
    stages: BTreeMap<HookStage, HookDecl>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stage: HookStage, decl: HookDecl) {
        self.stages.insert(stage, decl);
    }

    pub fn stage(&self, stage: HookStage) -> Option<&HookDecl> {
        self.stages.get(&stage)
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// One layer of the hook cascade: the node that declared the hooks plus its
/// declarations. Layers accumulate root-first as the walker descends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookLayer {
    pub node_path: String,
    pub set: HookSet,
}

/// A path-parameter validator declared on a dynamic node.
///
/// Ancestor validators are combined per route by logical AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorRef {
    pub node_path: String,
    pub param_name: String,
    pub kind: ParamKind,
}

/// Targets an inline per-method validator or a structural validation stage
/// can apply to. The variant order fixes the emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidateTarget {
    Query,
    Body,
    Headers,
}

impl std::fmt::Display for ValidateTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidateTarget::Query => write!(f, "query"),
            ValidateTarget::Body => write!(f, "body"),
            ValidateTarget::Headers => write!(f, "headers"),
        }
    }
}

/// Controller declaration of a node: controller-level hooks, the methods
/// that carry a per-status response schema, and inline per-method validators.
#[derive(Debug, Clone, Default)]
pub struct ControllerDecl {
    pub hooks: Option<HookSet>,
    pub response_schema_methods: HashSet<Method>,
    pub validators: HashMap<Method, BTreeMap<ValidateTarget, String>>,
}

impl ControllerDecl {
    pub fn has_response_schema(&self, method: &Method) -> bool {
        self.response_schema_methods.contains(method)
    }

    pub fn inline_validators(&self, method: &Method) -> Option<&BTreeMap<ValidateTarget, String>> {
        self.validators.get(method)
    }
}
