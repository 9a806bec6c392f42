//! Shader source synthesis for enumerated shading variants.
//!
//! Each [`Family`] pairs a label enumerator from the `labels` crate with a
//! synthesizer producing a [`Program`]: one vertex stage, one fragment stage
//! and a program block binding them. [`generate_family`] walks a family in
//! enumeration order, hands rendered modules to a [`SourceSink`] and collects
//! the batch manifest entries for the external compiler.

mod common;
mod error;
pub mod family;
pub mod forward;
pub mod generate;
pub mod manifest;
pub mod program;
pub mod shadow;
pub mod sink;

pub use error::SynthError;
pub use family::{Family, ShaderLabel};
pub use forward::ForwardFamily;
pub use generate::{generate_family, source_file_name, GenerateError, GenerationReport};
pub use manifest::{parse_manifest, render_manifest, ManifestEntry, ManifestError};
pub use program::{ModuleNaming, Program, Stage, StageKind, GENERATED_BANNER};
pub use shadow::ShadowFamily;
pub use sink::{DirectorySink, MemorySink, SourceSink};
