use labels::ForwardLabel;

use crate::common;
use crate::forward::{normal_source, NormalSource};
use crate::program::{Declaration, Stage, StageKind};
use crate::SynthError;

/// Builds the vertex stage. `uv` is whether the fragment stage reads texture
/// coordinates.
pub(super) fn stage(label: &ForwardLabel, uv: bool) -> Result<Stage, SynthError> {
    let lighting = Lighting::resolve(label)?;
    let mut stage = Stage::new(StageKind::Vertex);
    common::vertex_io(&mut stage);
    parameters(&mut stage, lighting, uv);
    attributes(&mut stage, lighting, uv);
    values(&mut stage, lighting, uv);
    writes(&mut stage, lighting, uv);
    Ok(stage)
}

/// The lighting-related dimensions a vertex stage cares about.
#[derive(Clone, Copy)]
struct Lighting {
    normals: Option<NormalSource>,
    projective: bool,
}

impl Lighting {
    fn resolve(label: &ForwardLabel) -> Result<Self, SynthError> {
        match label {
            ForwardLabel::Unlit(_) => Ok(Self {
                normals: None,
                projective: false,
            }),
            ForwardLabel::Lit(lit) => Ok(Self {
                normals: Some(normal_source(lit)?),
                projective: lit.light().is_projective(),
            }),
        }
    }
}

fn parameters(stage: &mut Stage, lighting: Lighting, uv: bool) {
    common::vertex_transform_parameters(stage);
    match lighting.normals {
        Some(NormalSource::Vertex) => stage.parameter("m_normal", "matrix_3x3f"),
        Some(NormalSource::Mapped) | None => {}
    }
    if uv {
        common::vertex_uv_parameters(stage);
    }
    if lighting.projective {
        stage.parameter("m_projective_modelview", "matrix_4x4f");
        stage.parameter("m_projective_projection", "matrix_4x4f");
    }
}

fn attributes(stage: &mut Stage, lighting: Lighting, uv: bool) {
    match lighting.normals {
        Some(NormalSource::Vertex) => {
            stage.attribute(Declaration::input("v_normal", "vector_3f"));
            stage.attribute(Declaration::output("f_normal_eye", "vector_3f"));
        }
        Some(NormalSource::Mapped) => {
            stage.attribute(Declaration::input("v_normal", "vector_3f"));
            stage.attribute(Declaration::input("v_tangent4", "vector_4f"));
            stage.attribute(Declaration::output("f_normal_model", "vector_3f"));
            stage.attribute(Declaration::output("f_tangent", "vector_3f"));
            stage.attribute(Declaration::output("f_bitangent", "vector_3f"));
        }
        None => {}
    }
    if uv {
        common::vertex_uv_attributes(stage);
    }
    if lighting.projective {
        stage.attribute(Declaration::output("f_position_light_clip", "vector_4f"));
    }
}

fn values(stage: &mut Stage, lighting: Lighting, uv: bool) {
    common::vertex_transform_values(stage);
    match lighting.normals {
        Some(NormalSource::Vertex) => {
            stage.value("normal_eye", "M3.multiply_vector (m_normal, v_normal)");
        }
        Some(NormalSource::Mapped) => {
            stage.value("tangent", "v_tangent4 [x y z]");
            stage.value("bitangent", "Normals.bitangent (v_normal, v_tangent4)");
        }
        None => {}
    }
    if uv {
        common::vertex_uv_values(stage);
    }
    if lighting.projective {
        stage.value(
            "position_light_eye",
            "M4.multiply_vector (m_projective_modelview, new vector_4f (v_position, 1.0))",
        );
        stage.value(
            "position_light_clip",
            "M4.multiply_vector (m_projective_projection, position_light_eye)",
        );
    }
}

fn writes(stage: &mut Stage, lighting: Lighting, uv: bool) {
    common::vertex_transform_writes(stage);
    match lighting.normals {
        Some(NormalSource::Vertex) => stage.write("f_normal_eye", "normal_eye"),
        Some(NormalSource::Mapped) => {
            stage.write("f_normal_model", "v_normal");
            stage.write("f_tangent", "tangent");
            stage.write("f_bitangent", "bitangent");
        }
        None => {}
    }
    if uv {
        common::vertex_uv_writes(stage);
    }
    if lighting.projective {
        stage.write("f_position_light_clip", "position_light_clip");
    }
}
