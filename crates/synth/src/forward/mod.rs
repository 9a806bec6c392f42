//! Forward-rendering family: one module per lit or unlit label.

mod fragment;
mod vertex;

use labels::{ForwardLabel, LitLabel, Normals};

use crate::family::{Family, ShaderLabel};
use crate::program::{ModuleNaming, Program};
use crate::SynthError;

pub const FAMILY_NAME: &str = "forward";

const IMPORTS: &[&str] = &[
    "core.Float as F",
    "core.Matrix3x3f as M3",
    "core.Matrix4x4f as M4",
    "core.Sampler2D as S2",
    "core.Vector3f as V3",
    "core.Vector4f as V4",
    "shading.Albedo",
    "shading.Emission",
    "shading.Environment",
    "shading.Light",
    "shading.Material",
    "shading.Normals",
    "shading.ShadowBasic",
    "shading.Specular",
];

/// Normal source of a lit label. Lit labels never carry `Normals::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NormalSource {
    Vertex,
    Mapped,
}

pub(crate) fn normal_source(label: &LitLabel) -> Result<NormalSource, SynthError> {
    match label.normals() {
        Normals::Vertex => Ok(NormalSource::Vertex),
        Normals::Mapped => Ok(NormalSource::Mapped),
        Normals::None => Err(SynthError::MissingNormals {
            code: label.code().to_string(),
        }),
    }
}

/// Builds the program for one forward label.
pub fn synthesize(label: &ForwardLabel, naming: &ModuleNaming) -> Result<Program, SynthError> {
    let fragment = fragment::stage(label)?;
    let uv = fragment.declares(crate::common::UV);
    if uv != label.implies_uv() {
        return Err(SynthError::UvMismatch {
            code: label.code().to_string(),
            implied: label.implies_uv(),
            used: uv,
        });
    }
    let vertex = vertex::stage(label, uv)?;
    Ok(Program::new(naming, label.code(), IMPORTS, vertex, fragment))
}

#[derive(Debug, Clone)]
pub struct ForwardFamily {
    naming: ModuleNaming,
}

impl ForwardFamily {
    pub fn new(naming: ModuleNaming) -> Self {
        Self { naming }
    }
}

impl Default for ForwardFamily {
    fn default() -> Self {
        Self::new(ModuleNaming::new("shaders.forward", "Fwd"))
    }
}

impl Family for ForwardFamily {
    type Label = ForwardLabel;

    fn name(&self) -> &'static str {
        FAMILY_NAME
    }

    fn naming(&self) -> &ModuleNaming {
        &self.naming
    }

    fn labels(&self) -> Vec<ForwardLabel> {
        labels::forward::all_labels()
    }

    fn synthesize(&self, label: &ForwardLabel) -> Result<Program, SynthError> {
        synthesize(label, &self.naming)
    }
}

impl ShaderLabel for ForwardLabel {
    fn code(&self) -> &str {
        ForwardLabel::code(self)
    }

    fn implies_uv(&self) -> bool {
        ForwardLabel::implies_uv(self)
    }

    fn kind(&self) -> &'static str {
        match self {
            ForwardLabel::Unlit(_) => "unlit",
            ForwardLabel::Lit(_) => "lit",
        }
    }
}
