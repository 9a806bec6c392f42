//! Shadow-map family: depth-only programs for shadow casters.

use labels::{Albedo, Alpha, ShadowCaster, ShadowLabel, ShadowMap};

use crate::common;
use crate::family::{Family, ShaderLabel};
use crate::program::{ModuleNaming, Program, Stage, StageKind};
use crate::SynthError;

pub const FAMILY_NAME: &str = "shadow";

const IMPORTS: &[&str] = &[
    "core.Float as F",
    "core.Matrix3x3f as M3",
    "core.Matrix4x4f as M4",
    "core.Sampler2D as S2",
    "core.Vector3f as V3",
    "core.Vector4f as V4",
    "shading.Albedo",
    "shading.Depth",
    "shading.ShadowVariance",
];

pub fn synthesize(label: &ShadowLabel, naming: &ModuleNaming) -> Result<Program, SynthError> {
    let fragment = fragment_stage(label);
    let uv = fragment.declares(common::UV);
    if uv != label.implies_uv() {
        return Err(SynthError::UvMismatch {
            code: label.code().to_string(),
            implied: label.implies_uv(),
            used: uv,
        });
    }
    let vertex = vertex_stage(uv);
    Ok(Program::new(naming, label.code(), IMPORTS, vertex, fragment))
}

fn vertex_stage(uv: bool) -> Stage {
    let mut stage = Stage::new(StageKind::Vertex);
    common::vertex_io(&mut stage);
    common::vertex_transform_parameters(&mut stage);
    common::vertex_transform_values(&mut stage);
    common::vertex_transform_writes(&mut stage);
    if uv {
        common::vertex_uv_parameters(&mut stage);
        common::vertex_uv_attributes(&mut stage);
        common::vertex_uv_values(&mut stage);
        common::vertex_uv_writes(&mut stage);
    }
    stage
}

fn fragment_stage(label: &ShadowLabel) -> Stage {
    let mut stage = Stage::new(StageKind::Fragment);
    common::fragment_io(&mut stage);

    stage.parameter("p_depth", "Depth.t");
    stage.value("depth", "Depth.linear (p_depth, f_position_eye [z])");

    match label.caster() {
        ShadowCaster::Opaque(_) => {}
        ShadowCaster::Translucent(_, albedo) => translucent(&mut stage, albedo),
    }

    match label.map() {
        ShadowMap::Basic => stage.value("rgba", "new vector_4f (depth, 0.0, 0.0, 1.0)"),
        ShadowMap::BasicPacked4444 => stage.value("rgba", "Depth.pack4444 (depth)"),
        ShadowMap::Variance => {
            stage.value("moments", "ShadowVariance.moments (depth)");
            stage.value("rgba", "new vector_4f (moments, 0.0, 1.0)");
        }
    }

    common::fragment_uv_attribute(&mut stage);
    stage.write("out_0", "rgba");
    stage
}

/// Casters with partial coverage discard fragments whose opacity falls below
/// the threshold instead of writing depth.
fn translucent(stage: &mut Stage, albedo: Albedo) {
    common::albedo_parameters(stage, albedo);
    common::alpha_parameters(stage, Alpha::Translucent);
    stage.parameter("p_alpha_threshold", "float");
    common::albedo_value(stage, albedo);
    stage.value("opacity", "F.multiply (albedo [w], p_opacity)");
    stage.discard("F.lesser (opacity, p_alpha_threshold)");
}

#[derive(Debug, Clone)]
pub struct ShadowFamily {
    naming: ModuleNaming,
}

impl ShadowFamily {
    pub fn new(naming: ModuleNaming) -> Self {
        Self { naming }
    }
}

impl Default for ShadowFamily {
    fn default() -> Self {
        Self::new(ModuleNaming::new("shaders.shadow", "Shd"))
    }
}

impl Family for ShadowFamily {
    type Label = ShadowLabel;

    fn name(&self) -> &'static str {
        FAMILY_NAME
    }

    fn naming(&self) -> &ModuleNaming {
        &self.naming
    }

    fn labels(&self) -> Vec<ShadowLabel> {
        labels::shadow::all_labels()
    }

    fn synthesize(&self, label: &ShadowLabel) -> Result<Program, SynthError> {
        synthesize(label, &self.naming)
    }
}

impl ShaderLabel for ShadowLabel {
    fn code(&self) -> &str {
        ShadowLabel::code(self)
    }

    fn implies_uv(&self) -> bool {
        ShadowLabel::implies_uv(self)
    }

    fn kind(&self) -> &'static str {
        match self.caster() {
            ShadowCaster::Opaque(_) => "opaque",
            ShadowCaster::Translucent(..) => "translucent",
        }
    }
}
