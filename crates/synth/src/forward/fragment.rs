use labels::{Emissive, Environment, ForwardLabel, Light, LitLabel, Specular, UnlitLabel};

use crate::common;
use crate::forward::{normal_source, NormalSource};
use crate::program::{Declaration, Stage, StageKind};
use crate::SynthError;

/// Builds the fragment stage. Texture-coordinate input is declared from what
/// the value bindings actually sample, after they have all been written.
pub(super) fn stage(label: &ForwardLabel) -> Result<Stage, SynthError> {
    let mut stage = Stage::new(StageKind::Fragment);
    common::fragment_io(&mut stage);
    match label {
        ForwardLabel::Unlit(unlit) => {
            unlit_parameters(&mut stage, unlit);
            unlit_values(&mut stage, unlit);
            common::fragment_uv_attribute(&mut stage);
        }
        ForwardLabel::Lit(lit) => {
            let normals = normal_source(lit)?;
            lit_parameters(&mut stage, lit, normals);
            lit_values(&mut stage, lit, normals);
            common::fragment_uv_attribute(&mut stage);
            lit_attributes(&mut stage, lit, normals);
        }
    }
    stage.write("out_0", "rgba");
    Ok(stage)
}

fn unlit_parameters(stage: &mut Stage, label: &UnlitLabel) {
    common::albedo_parameters(stage, label.albedo());
    common::alpha_parameters(stage, label.alpha());
    emissive_parameters(stage, label.emissive());
}

fn unlit_values(stage: &mut Stage, label: &UnlitLabel) {
    common::albedo_value(stage, label.albedo());
    match emission(label.emissive()) {
        Some(amount) => {
            stage.value("emission", amount);
            stage.value(
                "rgb",
                "V3.add (albedo [x y z], V3.multiply_scalar (albedo [x y z], emission))",
            );
        }
        None => stage.value("rgb", "albedo [x y z]"),
    }
    common::alpha_values(stage, label.alpha(), "albedo");
}

fn lit_parameters(stage: &mut Stage, label: &LitLabel, normals: NormalSource) {
    common::albedo_parameters(stage, label.albedo());
    common::alpha_parameters(stage, label.alpha());
    emissive_parameters(stage, label.emissive());
    match normals {
        NormalSource::Vertex => {}
        NormalSource::Mapped => {
            stage.parameter("t_normal", "sampler_2d");
            stage.parameter("m_normal", "matrix_3x3f");
        }
    }
    match label.specular() {
        Specular::None => {}
        Specular::Constant | Specular::Mapped => stage.parameter("p_specular", "Specular.t"),
    }
    if label.samples_specular_map() {
        stage.parameter("t_specular", "sampler_2d");
    }
    match label.environment() {
        Environment::None => {}
        Environment::Reflective
        | Environment::Refractive
        | Environment::ReflectiveRefractive
        | Environment::ReflectiveMapped
        | Environment::RefractiveMapped
        | Environment::ReflectiveRefractiveMapped => {
            stage.parameter("p_environment", "Environment.t");
            stage.parameter("t_environment", "sampler_cube");
            stage.parameter("m_view_inverse", "matrix_4x4f");
        }
    }
    light_parameters(stage, label.light());
}

fn emissive_parameters(stage: &mut Stage, emissive: Emissive) {
    match emissive {
        Emissive::None => {}
        Emissive::Constant => stage.parameter("p_emission", "Emission.t"),
        Emissive::Mapped => {
            stage.parameter("p_emission", "Emission.t");
            stage.parameter("t_emission", "sampler_2d");
        }
    }
}

fn light_parameters(stage: &mut Stage, light: Light) {
    stage.parameter("p_light", "Light.t");
    match light {
        Light::Directional | Light::Spherical => {}
        Light::Projective => stage.parameter("t_light_projection", "sampler_2d"),
        Light::ProjectiveShadowBasic | Light::ProjectiveShadowBasicPacked4444 => {
            stage.parameter("t_light_projection", "sampler_2d");
            stage.parameter("p_shadow", "ShadowBasic.t");
            stage.parameter("t_shadow", "sampler_2d");
        }
    }
}

fn lit_attributes(stage: &mut Stage, label: &LitLabel, normals: NormalSource) {
    match normals {
        NormalSource::Vertex => stage.attribute(Declaration::input("f_normal_eye", "vector_3f")),
        NormalSource::Mapped => {
            stage.attribute(Declaration::input("f_normal_model", "vector_3f"));
            stage.attribute(Declaration::input("f_tangent", "vector_3f"));
            stage.attribute(Declaration::input("f_bitangent", "vector_3f"));
        }
    }
    if label.light().is_projective() {
        stage.attribute(Declaration::input("f_position_light_clip", "vector_4f"));
    }
}

fn lit_values(stage: &mut Stage, label: &LitLabel, normals: NormalSource) {
    match normals {
        NormalSource::Vertex => stage.value("n", "V3.normalize (f_normal_eye)"),
        NormalSource::Mapped => stage.value(
            "n",
            "Normals.unpack_and_transform (t_normal, m_normal, f_normal_model, f_tangent, f_bitangent, f_uv)",
        ),
    }
    common::albedo_value(stage, label.albedo());

    // Shared by the specular term and the mapped environment mix.
    if label.samples_specular_map() {
        stage.value("specular_sample", "S2.texture (t_specular, f_uv) [x y z]");
    }

    material_value(stage, label);
    environment_values(stage, label.environment());
    light_values(stage, label);
    common::alpha_values(stage, label.alpha(), "surface");
}

fn emission(emissive: Emissive) -> Option<&'static str> {
    match emissive {
        Emissive::None => None,
        Emissive::Constant => Some("p_emission.amount"),
        Emissive::Mapped => Some("F.multiply (p_emission.amount, S2.texture (t_emission, f_uv) [x])"),
    }
}

/// The effective material: emission and specular terms after any map has
/// been applied, bound once before lighting reads it.
fn material_value(stage: &mut Stage, label: &LitLabel) {
    let emission = emission(label.emissive()).unwrap_or("0.0");
    let specular = match label.specular() {
        Specular::None => "Specular.none".to_string(),
        Specular::Constant => "p_specular".to_string(),
        Specular::Mapped => [
            "record Specular.t {",
            "    exponent  = p_specular.exponent,",
            "    intensity = V3.multiply (p_specular.intensity, specular_sample)",
            "  }",
        ]
        .join("\n"),
    };
    stage.value(
        "material",
        format!(
            "record Material.t {{\n  emission = {emission},\n  specular = {specular}\n}}"
        ),
    );
}

fn environment_values(stage: &mut Stage, environment: Environment) {
    let (function, mix) = match environment {
        Environment::None => {
            stage.value("surface", "albedo");
            return;
        }
        Environment::Reflective => ("reflection", "p_environment.mix"),
        Environment::Refractive => ("refraction", "p_environment.mix"),
        Environment::ReflectiveRefractive => ("reflection_refraction", "p_environment.mix"),
        Environment::ReflectiveMapped => (
            "reflection",
            "F.multiply (p_environment.mix, specular_sample [x])",
        ),
        Environment::RefractiveMapped => (
            "refraction",
            "F.multiply (p_environment.mix, specular_sample [x])",
        ),
        Environment::ReflectiveRefractiveMapped => (
            "reflection_refraction",
            "F.multiply (p_environment.mix, specular_sample [x])",
        ),
    };
    stage.value(
        "environment",
        format!(
            "Environment.{function} (t_environment, m_view_inverse, p_environment, f_position_eye [x y z], n)"
        ),
    );
    stage.value(
        "surface",
        format!(
            "new vector_4f (V3.interpolate (albedo [x y z], environment, {mix}), albedo [w])"
        ),
    );
}

fn light_values(stage: &mut Stage, label: &LitLabel) {
    let (kind, position) = match label.light() {
        Light::Directional => ("directional", ""),
        Light::Spherical => ("spherical", ", f_position_eye [x y z]"),
        Light::Projective
        | Light::ProjectiveShadowBasic
        | Light::ProjectiveShadowBasicPacked4444 => ("projective", ", f_position_eye [x y z]"),
    };
    stage.value("light_diffuse", format!("Light.{kind}_diffuse (p_light, n{position})"));

    let mut light_term = "V3.multiply (surface [x y z], light_diffuse)".to_string();
    match label.specular() {
        Specular::None => {}
        Specular::Constant | Specular::Mapped => {
            stage.value(
                "light_specular",
                format!(
                    "Light.{kind}_specular (p_light, n, f_position_eye [x y z], material.specular)"
                ),
            );
            light_term = format!("V3.add ({light_term}, light_specular)");
        }
    }

    let shadow = match label.light() {
        Light::Directional | Light::Spherical | Light::Projective => None,
        Light::ProjectiveShadowBasic => Some("factor"),
        Light::ProjectiveShadowBasicPacked4444 => Some("factor_packed4444"),
    };
    if label.light().is_projective() {
        stage.value(
            "light_texture",
            "Light.projective_texture (t_light_projection, f_position_light_clip)",
        );
        match shadow {
            Some(function) => {
                stage.value(
                    "light_shadow",
                    format!("ShadowBasic.{function} (t_shadow, p_shadow, f_position_light_clip)"),
                );
                stage.value(
                    "light_scale",
                    "V3.multiply_scalar (light_texture, light_shadow)",
                );
            }
            None => stage.value("light_scale", "light_texture"),
        }
        light_term = format!("V3.multiply ({light_term}, light_scale)");
    }
    stage.value("light_term", light_term);

    match label.emissive() {
        Emissive::None => stage.value("rgb", "light_term"),
        Emissive::Constant | Emissive::Mapped => stage.value(
            "rgb",
            "V3.add (light_term, V3.multiply_scalar (surface [x y z], material.emission))",
        ),
    }
}
