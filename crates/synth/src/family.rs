use crate::program::{ModuleNaming, Program};
use crate::SynthError;

/// What the generator needs to know about a label, independent of family.
pub trait ShaderLabel {
    /// Unique name; doubles as file stem suffix and batch target.
    fn code(&self) -> &str;
    fn implies_uv(&self) -> bool;
    /// Short structural variant name (`lit`, `unlit`, `opaque`, ...).
    fn kind(&self) -> &'static str;
}

/// A family of shader variants: an enumerator plus a synthesizer that is
/// total over everything the enumerator produces.
pub trait Family {
    type Label: ShaderLabel;

    fn name(&self) -> &'static str;

    fn naming(&self) -> &ModuleNaming;

    fn labels(&self) -> Vec<Self::Label>;

    fn synthesize(&self, label: &Self::Label) -> Result<Program, SynthError>;
}
