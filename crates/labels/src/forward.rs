//! Labels for the forward-rendering family.
//!
//! A forward label is either unlit (no normal information, so every
//! lighting-related dimension collapses away) or lit (one value for every
//! dimension, with a normal source other than `Normals::None`). Both carry
//! their `code` and UV implication, computed once at construction.

use crate::taxonomy::{
    join_codes, Albedo, Alpha, Emissive, Environment, Light, Normals, Specular,
};

/// Name prefix shared by every unlit label.
pub const UNLIT_MARKER: &str = "U";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnlitLabel {
    alpha: Alpha,
    albedo: Albedo,
    emissive: Emissive,
    code: String,
    implies_uv: bool,
}

impl UnlitLabel {
    pub fn new(alpha: Alpha, albedo: Albedo, emissive: Emissive) -> Self {
        let code = join_codes([UNLIT_MARKER, albedo.code(), alpha.code(), emissive.code()]);
        let implies_uv = surface_implies_uv(albedo, emissive);
        Self {
            alpha,
            albedo,
            emissive,
            code,
            implies_uv,
        }
    }

    pub fn alpha(&self) -> Alpha {
        self.alpha
    }

    pub fn albedo(&self) -> Albedo {
        self.albedo
    }

    pub fn emissive(&self) -> Emissive {
        self.emissive
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn implies_uv(&self) -> bool {
        self.implies_uv
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LitLabel {
    alpha: Alpha,
    albedo: Albedo,
    emissive: Emissive,
    environment: Environment,
    light: Light,
    normals: Normals,
    specular: Specular,
    code: String,
    implies_uv: bool,
}

impl LitLabel {
    #[allow(clippy::too_many_arguments)]
    fn new(
        alpha: Alpha,
        albedo: Albedo,
        emissive: Emissive,
        environment: Environment,
        light: Light,
        normals: Normals,
        specular: Specular,
    ) -> Self {
        let code = join_codes([
            light.code(),
            albedo.code(),
            alpha.code(),
            emissive.code(),
            environment.code(),
            normals.code(),
            specular.code(),
        ]);
        let implies_uv = surface_implies_uv(albedo, emissive)
            || normals == Normals::Mapped
            || specular == Specular::Mapped
            || environment.is_mapped();
        Self {
            alpha,
            albedo,
            emissive,
            environment,
            light,
            normals,
            specular,
            code,
            implies_uv,
        }
    }

    pub fn alpha(&self) -> Alpha {
        self.alpha
    }

    pub fn albedo(&self) -> Albedo {
        self.albedo
    }

    pub fn emissive(&self) -> Emissive {
        self.emissive
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn light(&self) -> Light {
        self.light
    }

    pub fn normals(&self) -> Normals {
        self.normals
    }

    pub fn specular(&self) -> Specular {
        self.specular
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn implies_uv(&self) -> bool {
        self.implies_uv
    }

    /// True when either the specular term or the environment mix reads the
    /// specular map.
    pub fn samples_specular_map(&self) -> bool {
        self.specular == Specular::Mapped || self.environment.is_mapped()
    }
}

fn surface_implies_uv(albedo: Albedo, emissive: Emissive) -> bool {
    albedo == Albedo::Textured || emissive == Emissive::Mapped
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ForwardLabel {
    Unlit(UnlitLabel),
    Lit(LitLabel),
}

impl ForwardLabel {
    /// Builds the label for a full feature tuple. `Normals::None` selects the
    /// unlit variant and ignores the lighting dimensions.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        alpha: Alpha,
        albedo: Albedo,
        emissive: Emissive,
        environment: Environment,
        light: Light,
        normals: Normals,
        specular: Specular,
    ) -> Self {
        match normals {
            Normals::None => ForwardLabel::Unlit(UnlitLabel::new(alpha, albedo, emissive)),
            Normals::Vertex | Normals::Mapped => ForwardLabel::Lit(LitLabel::new(
                alpha,
                albedo,
                emissive,
                environment,
                light,
                normals,
                specular,
            )),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ForwardLabel::Unlit(label) => label.code(),
            ForwardLabel::Lit(label) => label.code(),
        }
    }

    pub fn implies_uv(&self) -> bool {
        match self {
            ForwardLabel::Unlit(label) => label.implies_uv(),
            ForwardLabel::Lit(label) => label.implies_uv(),
        }
    }

    pub fn alpha(&self) -> Alpha {
        match self {
            ForwardLabel::Unlit(label) => label.alpha,
            ForwardLabel::Lit(label) => label.alpha,
        }
    }

    pub fn albedo(&self) -> Albedo {
        match self {
            ForwardLabel::Unlit(label) => label.albedo,
            ForwardLabel::Lit(label) => label.albedo,
        }
    }

    pub fn emissive(&self) -> Emissive {
        match self {
            ForwardLabel::Unlit(label) => label.emissive,
            ForwardLabel::Lit(label) => label.emissive,
        }
    }

    pub fn normals(&self) -> Normals {
        match self {
            ForwardLabel::Unlit(_) => Normals::None,
            ForwardLabel::Lit(label) => label.normals,
        }
    }

    pub fn is_lit(&self) -> bool {
        matches!(self, ForwardLabel::Lit(_))
    }
}

/// Every legal forward label, in a fixed order.
///
/// Iterates Alpha × Albedo × Emissive × Normals. Unlit combinations produce a
/// single label; lit combinations fan out over Environment × Light × Specular.
pub fn all_labels() -> Vec<ForwardLabel> {
    let mut labels = Vec::new();
    for alpha in Alpha::ALL {
        for albedo in Albedo::ALL {
            for emissive in Emissive::ALL {
                for normals in Normals::ALL {
                    match normals {
                        Normals::None => {
                            labels.push(ForwardLabel::Unlit(UnlitLabel::new(
                                alpha, albedo, emissive,
                            )));
                        }
                        Normals::Vertex | Normals::Mapped => {
                            for environment in Environment::ALL {
                                for light in Light::ALL {
                                    for specular in Specular::ALL {
                                        labels.push(ForwardLabel::Lit(LitLabel::new(
                                            alpha,
                                            albedo,
                                            emissive,
                                            environment,
                                            light,
                                            normals,
                                            specular,
                                        )));
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn enumerates_expected_counts() {
        let labels = all_labels();
        let unlit = labels.iter().filter(|label| !label.is_lit()).count();
        let lit = labels.iter().filter(|label| label.is_lit()).count();
        assert_eq!(unlit, 2 * 2 * 3);
        assert_eq!(lit, 2 * 2 * 3 * 2 * 7 * 5 * 3);
        assert_eq!(labels.len(), 2532);
    }

    #[test]
    fn codes_are_unique() {
        let labels = all_labels();
        let codes: HashSet<&str> = labels.iter().map(|label| label.code()).collect();
        assert_eq!(codes.len(), labels.len());
    }

    #[test]
    fn codes_are_filename_safe() {
        for label in all_labels() {
            assert!(
                label
                    .code()
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || ch == '_'),
                "unsafe code {}",
                label.code()
            );
            assert!(!label.code().starts_with('_'));
            assert!(!label.code().ends_with('_'));
            assert!(!label.code().contains("__"));
        }
    }

    #[test]
    fn unlit_iff_no_normals() {
        for label in all_labels() {
            match &label {
                ForwardLabel::Unlit(_) => assert_eq!(label.normals(), Normals::None),
                ForwardLabel::Lit(lit) => assert_ne!(lit.normals(), Normals::None),
            }
        }
    }

    #[test]
    fn unlit_labels_do_not_vary_lighting() {
        let labels = all_labels();
        let unlit: Vec<_> = labels
            .iter()
            .filter_map(|label| match label {
                ForwardLabel::Unlit(unlit) => {
                    Some((unlit.alpha(), unlit.albedo(), unlit.emissive()))
                }
                ForwardLabel::Lit(_) => None,
            })
            .collect();
        let distinct: HashSet<_> = unlit.iter().collect();
        assert_eq!(distinct.len(), unlit.len());
    }

    #[test]
    fn enumeration_is_deterministic() {
        assert_eq!(all_labels(), all_labels());
    }

    #[test]
    fn constructor_collapses_lighting_without_normals() {
        let a = ForwardLabel::new(
            Alpha::Opaque,
            Albedo::Coloured,
            Emissive::None,
            Environment::Reflective,
            Light::Spherical,
            Normals::None,
            Specular::Mapped,
        );
        let b = ForwardLabel::new(
            Alpha::Opaque,
            Albedo::Coloured,
            Emissive::None,
            Environment::None,
            Light::Directional,
            Normals::None,
            Specular::None,
        );
        assert_eq!(a, b);
        assert_eq!(a.code(), "U_BC_O");
        assert!(!a.implies_uv());
    }

    #[test]
    fn names_lit_labels_with_light_prefix() {
        let label = ForwardLabel::new(
            Alpha::Translucent,
            Albedo::Coloured,
            Emissive::Mapped,
            Environment::ReflectiveMapped,
            Light::ProjectiveShadowBasic,
            Normals::Mapped,
            Specular::Constant,
        );
        assert_eq!(label.code(), "LPSMB_BC_A_EM_ELM_NM_SC");

        let plain = ForwardLabel::new(
            Alpha::Opaque,
            Albedo::Textured,
            Emissive::None,
            Environment::None,
            Light::Directional,
            Normals::Vertex,
            Specular::None,
        );
        assert_eq!(plain.code(), "LD_BT_O_NV");
    }

    #[test]
    fn uv_rule_follows_each_trigger() {
        let base = |albedo, emissive, environment, normals, specular| {
            ForwardLabel::new(
                Alpha::Opaque,
                albedo,
                emissive,
                environment,
                Light::Directional,
                normals,
                specular,
            )
            .implies_uv()
        };

        use Albedo::*;
        assert!(base(
            Textured,
            Emissive::None,
            Environment::None,
            Normals::Vertex,
            Specular::None
        ));
        assert!(base(
            Coloured,
            Emissive::Mapped,
            Environment::None,
            Normals::None,
            Specular::None
        ));
        assert!(base(
            Coloured,
            Emissive::None,
            Environment::None,
            Normals::Mapped,
            Specular::None
        ));
        assert!(base(
            Coloured,
            Emissive::None,
            Environment::None,
            Normals::Vertex,
            Specular::Mapped
        ));
        assert!(base(
            Coloured,
            Emissive::None,
            Environment::RefractiveMapped,
            Normals::Vertex,
            Specular::None
        ));
        assert!(!base(
            Coloured,
            Emissive::Constant,
            Environment::ReflectiveRefractive,
            Normals::Vertex,
            Specular::Constant
        ));
        assert!(!base(
            Coloured,
            Emissive::Constant,
            Environment::None,
            Normals::None,
            Specular::None
        ));
    }

    #[test]
    fn variant_labels_expose_the_same_code_and_uv() {
        for label in all_labels() {
            match &label {
                ForwardLabel::Unlit(unlit) => {
                    assert_eq!(unlit.code(), label.code());
                    assert_eq!(unlit.implies_uv(), label.implies_uv());
                }
                ForwardLabel::Lit(lit) => {
                    assert_eq!(lit.code(), label.code());
                    assert_eq!(lit.implies_uv(), label.implies_uv());
                }
            }
        }

        let ForwardLabel::Lit(lit) = ForwardLabel::new(
            Alpha::Opaque,
            Albedo::Textured,
            Emissive::None,
            Environment::None,
            Light::Directional,
            Normals::Vertex,
            Specular::None,
        ) else {
            panic!("vertex normals produce a lit label");
        };
        assert_eq!(lit.code(), "LD_BT_O_NV");
    }
}
