//! Pipeline synthesis: turning one method signature plus its cascade
//! context into an ordered, tagged stage sequence.
//!
//! The synthesizer produces structure, not text: a [`CompiledPipeline`] of
//! [`PipelineStage`] values that a renderer later turns into whatever the
//! hosting framework needs. [`multipart`] holds the one piece of runtime
//! semantics the compiler specifies itself: upload-field normalization.

pub mod multipart;
mod stage;
mod synth;


pub use stage::{CompiledPipeline, HookRef, MultipartField, PipelineStage, QueryField};
pub use synth::{synthesize, SynthInput};
