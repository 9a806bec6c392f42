//! Section fragments shared by every family: the object-to-clip transform,
//! texture-coordinate plumbing, albedo sampling and the final opacity write.

use labels::{Albedo, Alpha};

use crate::program::{Declaration, Stage};

pub(crate) const UV: &str = "f_uv";

pub(crate) fn vertex_io(stage: &mut Stage) {
    stage.standard(Declaration::input("v_position", "vector_3f"));
    stage.standard(Declaration::Position {
        name: "f_position_clip",
    });
    stage.standard(Declaration::output("f_position_eye", "vector_4f"));
}

pub(crate) fn vertex_transform_parameters(stage: &mut Stage) {
    stage.parameter("m_modelview", "matrix_4x4f");
    stage.parameter("m_projection", "matrix_4x4f");
}

pub(crate) fn vertex_transform_values(stage: &mut Stage) {
    stage.value(
        "position_eye",
        "M4.multiply_vector (m_modelview, new vector_4f (v_position, 1.0))",
    );
    stage.value(
        "position_clip",
        "M4.multiply_vector (m_projection, position_eye)",
    );
}

pub(crate) fn vertex_transform_writes(stage: &mut Stage) {
    stage.write("f_position_clip", "position_clip");
    stage.write("f_position_eye", "position_eye");
}

pub(crate) fn vertex_uv_parameters(stage: &mut Stage) {
    stage.parameter("m_uv", "matrix_3x3f");
}

pub(crate) fn vertex_uv_attributes(stage: &mut Stage) {
    stage.attribute(Declaration::input("v_uv", "vector_2f"));
    stage.attribute(Declaration::output(UV, "vector_2f"));
}

pub(crate) fn vertex_uv_values(stage: &mut Stage) {
    stage.value(
        "uv",
        "M3.multiply_vector (m_uv, new vector_3f (v_uv, 1.0)) [x y]",
    );
}

pub(crate) fn vertex_uv_writes(stage: &mut Stage) {
    stage.write(UV, "uv");
}

pub(crate) fn fragment_io(stage: &mut Stage) {
    stage.standard(Declaration::input("f_position_eye", "vector_4f"));
    stage.standard(Declaration::Target {
        name: "out_0",
        index: 0,
    });
}

/// Declares `f_uv` when a fragment binding samples with it. Must run after
/// every fragment value has been bound.
pub(crate) fn fragment_uv_attribute(stage: &mut Stage) -> bool {
    let used = stage.references(UV);
    if used {
        stage.attribute(Declaration::input(UV, "vector_2f"));
    }
    used
}

pub(crate) fn albedo_parameters(stage: &mut Stage, albedo: Albedo) {
    stage.parameter("p_albedo", "Albedo.t");
    match albedo {
        Albedo::Coloured => {}
        Albedo::Textured => stage.parameter("t_albedo", "sampler_2d"),
    }
}

pub(crate) fn albedo_value(stage: &mut Stage, albedo: Albedo) {
    match albedo {
        Albedo::Coloured => stage.value("albedo", "p_albedo.color"),
        Albedo::Textured => stage.value("albedo", "Albedo.textured (t_albedo, f_uv, p_albedo)"),
    }
}

pub(crate) fn alpha_parameters(stage: &mut Stage, alpha: Alpha) {
    match alpha {
        Alpha::Opaque => {}
        Alpha::Translucent => stage.parameter("p_opacity", "float"),
    }
}

/// Binds `rgba` from `rgb` and the alpha channel of `surface`.
pub(crate) fn alpha_values(stage: &mut Stage, alpha: Alpha, surface: &str) {
    match alpha {
        Alpha::Opaque => stage.value("rgba", "new vector_4f (rgb, 1.0)"),
        Alpha::Translucent => {
            stage.value("opacity", format!("F.multiply ({surface} [w], p_opacity)"));
            stage.value(
                "rgba",
                "new vector_4f (V3.multiply_scalar (rgb, opacity), opacity)",
            );
        }
    }
}
