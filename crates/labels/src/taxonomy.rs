//! Feature dimensions that shading variants are built from.
//!
//! Each dimension is a closed enum with an `ALL` table in enumeration order
//! and a `code()` naming fragment. Fragments are unique across every
//! dimension and use only `[A-Z0-9]`, so joining them with `_` yields names
//! that are safe both as file stems and as compiler batch targets. An empty
//! fragment marks the "no feature" value and is dropped from names.

/// Source of the base surface colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Albedo {
    Coloured,
    Textured,
}

impl Albedo {
    pub const ALL: [Albedo; 2] = [Albedo::Coloured, Albedo::Textured];

    pub fn code(self) -> &'static str {
        match self {
            Albedo::Coloured => "BC",
            Albedo::Textured => "BT",
        }
    }
}

/// Whether the surface writes full opacity or premultiplied translucency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alpha {
    Opaque,
    Translucent,
}

impl Alpha {
    pub const ALL: [Alpha; 2] = [Alpha::Opaque, Alpha::Translucent];

    pub fn code(self) -> &'static str {
        match self {
            Alpha::Opaque => "O",
            Alpha::Translucent => "A",
        }
    }
}

/// Self-illumination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emissive {
    None,
    Constant,
    Mapped,
}

impl Emissive {
    pub const ALL: [Emissive; 3] = [Emissive::None, Emissive::Constant, Emissive::Mapped];

    pub fn code(self) -> &'static str {
        match self {
            Emissive::None => "",
            Emissive::Constant => "EC",
            Emissive::Mapped => "EM",
        }
    }
}

/// Environment mapping. The `*Mapped` variants scale the environment
/// contribution by the specular map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    None,
    Reflective,
    Refractive,
    ReflectiveRefractive,
    ReflectiveMapped,
    RefractiveMapped,
    ReflectiveRefractiveMapped,
}

impl Environment {
    pub const ALL: [Environment; 7] = [
        Environment::None,
        Environment::Reflective,
        Environment::Refractive,
        Environment::ReflectiveRefractive,
        Environment::ReflectiveMapped,
        Environment::RefractiveMapped,
        Environment::ReflectiveRefractiveMapped,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Environment::None => "",
            Environment::Reflective => "EL",
            Environment::Refractive => "ER",
            Environment::ReflectiveRefractive => "ELR",
            Environment::ReflectiveMapped => "ELM",
            Environment::RefractiveMapped => "ERM",
            Environment::ReflectiveRefractiveMapped => "ELRM",
        }
    }

    pub fn is_mapped(self) -> bool {
        match self {
            Environment::ReflectiveMapped
            | Environment::RefractiveMapped
            | Environment::ReflectiveRefractiveMapped => true,
            Environment::None
            | Environment::Reflective
            | Environment::Refractive
            | Environment::ReflectiveRefractive => false,
        }
    }
}

/// Light source type, including the shadow-mapped projective variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Light {
    Directional,
    Spherical,
    Projective,
    ProjectiveShadowBasic,
    ProjectiveShadowBasicPacked4444,
}

impl Light {
    pub const ALL: [Light; 5] = [
        Light::Directional,
        Light::Spherical,
        Light::Projective,
        Light::ProjectiveShadowBasic,
        Light::ProjectiveShadowBasicPacked4444,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Light::Directional => "LD",
            Light::Spherical => "LS",
            Light::Projective => "LP",
            Light::ProjectiveShadowBasic => "LPSMB",
            Light::ProjectiveShadowBasicPacked4444 => "LPSMBP4",
        }
    }

    /// Projective lights carry a light-space position through both stages.
    pub fn is_projective(self) -> bool {
        match self {
            Light::Projective
            | Light::ProjectiveShadowBasic
            | Light::ProjectiveShadowBasicPacked4444 => true,
            Light::Directional | Light::Spherical => false,
        }
    }
}

/// Source of surface normals. `None` means the surface is unlit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normals {
    None,
    Vertex,
    Mapped,
}

impl Normals {
    pub const ALL: [Normals; 3] = [Normals::None, Normals::Vertex, Normals::Mapped];

    pub fn code(self) -> &'static str {
        match self {
            Normals::None => "",
            Normals::Vertex => "NV",
            Normals::Mapped => "NM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Specular {
    None,
    Constant,
    Mapped,
}

impl Specular {
    pub const ALL: [Specular; 3] = [Specular::None, Specular::Constant, Specular::Mapped];

    pub fn code(self) -> &'static str {
        match self {
            Specular::None => "",
            Specular::Constant => "SC",
            Specular::Mapped => "SM",
        }
    }
}

/// Depth encoding written by shadow-map programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadowMap {
    Basic,
    BasicPacked4444,
    Variance,
}

impl ShadowMap {
    pub const ALL: [ShadowMap; 3] = [
        ShadowMap::Basic,
        ShadowMap::BasicPacked4444,
        ShadowMap::Variance,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ShadowMap::Basic => "SB",
            ShadowMap::BasicPacked4444 => "SBP4",
            ShadowMap::Variance => "SV",
        }
    }
}

/// Joins non-empty fragments with `_`.
pub(crate) fn join_codes<'a>(fragments: impl IntoIterator<Item = &'a str>) -> String {
    let mut code = String::new();
    for fragment in fragments
        .into_iter()
        .filter(|fragment| !fragment.is_empty())
    {
        if !code.is_empty() {
            code.push('_');
        }
        code.push_str(fragment);
    }
    code
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn every_fragment() -> Vec<&'static str> {
        let mut fragments = Vec::new();
        fragments.extend(Albedo::ALL.iter().map(|v| v.code()));
        fragments.extend(Alpha::ALL.iter().map(|v| v.code()));
        fragments.extend(Emissive::ALL.iter().map(|v| v.code()));
        fragments.extend(Environment::ALL.iter().map(|v| v.code()));
        fragments.extend(Light::ALL.iter().map(|v| v.code()));
        fragments.extend(Normals::ALL.iter().map(|v| v.code()));
        fragments.extend(Specular::ALL.iter().map(|v| v.code()));
        fragments.extend(ShadowMap::ALL.iter().map(|v| v.code()));
        fragments
    }

    #[test]
    fn fragments_are_unique_and_filename_safe() {
        let fragments: Vec<_> = every_fragment()
            .into_iter()
            .filter(|f| !f.is_empty())
            .collect();
        let unique: HashSet<_> = fragments.iter().collect();
        assert_eq!(unique.len(), fragments.len());
        for fragment in fragments {
            assert!(fragment
                .chars()
                .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit()));
        }
    }

    #[test]
    fn only_none_values_have_empty_codes() {
        assert_eq!(Emissive::None.code(), "");
        assert_eq!(Environment::None.code(), "");
        assert_eq!(Normals::None.code(), "");
        assert_eq!(Specular::None.code(), "");
        assert_eq!(every_fragment().iter().filter(|f| f.is_empty()).count(), 4);
    }

    #[test]
    fn mapped_environments() {
        let mapped: Vec<_> = Environment::ALL
            .into_iter()
            .filter(|env| env.is_mapped())
            .collect();
        assert_eq!(
            mapped,
            vec![
                Environment::ReflectiveMapped,
                Environment::RefractiveMapped,
                Environment::ReflectiveRefractiveMapped,
            ]
        );
    }

    #[test]
    fn join_skips_empty_fragments() {
        assert_eq!(join_codes(["LD", "", "BT", "", "O"]), "LD_BT_O");
        assert_eq!(join_codes(["", ""]), "");
    }
}
