use http::Method;

use crate::schema::{HookStage, ValidateTarget, ValidatorRef};

/// One query field listed by a coercion stage: name, whether the field is
/// optional, whether it is an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryField {
    pub name: String,
    pub optional: bool,
    pub array: bool,
}

/// One body field listed by the multipart normalization stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartField {
    pub name: String,
    pub optional: bool,
}

/// Structural reference to a declared hook: the node that declared it plus
/// the declared name. Replaces the original's free-floating import counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookRef {
    pub node_path: String,
    pub name: String,
}

/// One unit of a compiled route pipeline.
///
/// Stages are assembled in a fixed order and only ever omitted, never
/// reordered; the ordering is part of the compiler's observable contract.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineStage {
    /// A cascading or controller-level hook call.
    HookCall {
        stage: HookStage,
        hook: HookRef,
        /// The declaration was plural and is spread at call time.
        spread: bool,
    },
    /// Coerce string-transported query fields to numbers.
    QueryNumberCoerce {
        fields: Vec<QueryField>,
        /// Runs only when a query object is present at all.
        guarded: bool,
    },
    /// Coerce string-transported query fields to booleans.
    QueryBooleanCoerce {
        fields: Vec<QueryField>,
        guarded: bool,
    },
    /// Accept multipart uploads into request-scoped temporary storage.
    MultipartUpload,
    /// Normalize listed array fields and merge uploaded parts into the body.
    MultipartNormalize { fields: Vec<MultipartField> },
    /// Parse a JSON request body.
    JsonBodyParse,
    /// Structurally validate one request target against its declared shape.
    StructuralValidate {
        target: ValidateTarget,
        shape: String,
        /// Skipped without error when the optional target is absent.
        guarded: bool,
    },
    /// Coerce numeric-typed dynamic path segments before downstream stages.
    ParamTypeCoerce { params: Vec<String> },
    /// All ancestor path-parameter validators, combined by logical AND.
    ParamValidatorAnd { validators: Vec<ValidatorRef> },
    /// An inline per-method validator declared on the controller.
    InlineValidator {
        target: ValidateTarget,
        validator: String,
    },
    /// The business-logic handler. Always present, always last.
    FinalHandler {
        node_path: String,
        method: Method,
        is_async: bool,
        /// Response-schema-aware encoding replaces the default encode path.
        response_schema: bool,
    },
}

impl PipelineStage {
    /// Short tag for logs and the `inspect` listing.
    pub fn tag(&self) -> &'static str {
        match self {
            PipelineStage::HookCall { .. } => "HookCall",
            PipelineStage::QueryNumberCoerce { .. } => "QueryNumberCoerce",
            PipelineStage::QueryBooleanCoerce { .. } => "QueryBooleanCoerce",
            PipelineStage::MultipartUpload => "MultipartUpload",
            PipelineStage::MultipartNormalize { .. } => "MultipartNormalize",
            PipelineStage::JsonBodyParse => "JsonBodyParse",
            PipelineStage::StructuralValidate { .. } => "StructuralValidate",
            PipelineStage::ParamTypeCoerce { .. } => "ParamTypeCoerce",
            PipelineStage::ParamValidatorAnd { .. } => "ParamValidatorAnd",
            PipelineStage::InlineValidator { .. } => "InlineValidator",
            PipelineStage::FinalHandler { .. } => "FinalHandler",
        }
    }
}

/// Ordered stage sequence for one method of one node. Built once, immutable,
/// consumed by the emitter. The last stage is always [`PipelineStage::FinalHandler`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPipeline {
    stages: Vec<PipelineStage>,
}

impl CompiledPipeline {
    pub(crate) fn new(stages: Vec<PipelineStage>) -> Self {
        debug_assert!(matches!(
            stages.last(),
            Some(PipelineStage::FinalHandler { .. })
        ));
        Self { stages }
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The terminal handler stage.
    pub fn final_handler(&self) -> &PipelineStage {
        // Construction guarantees a non-empty sequence ending in FinalHandler.
        &self.stages[self.stages.len() - 1]
    }

    /// Stage tags in order, for logs and route listings.
    pub fn tags(&self) -> Vec<&'static str> {
        self.stages.iter().map(PipelineStage::tag).collect()
    }
}
