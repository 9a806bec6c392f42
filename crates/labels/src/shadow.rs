//! Labels for the shadow-map family.
//!
//! Opaque casters only need depth, so their albedo collapses away. Translucent
//! casters read opacity from their albedo and discard fragments below a
//! threshold, which is why only they vary over `Albedo`.

use crate::taxonomy::{join_codes, Albedo, Alpha, ShadowMap};

/// What a shadow caster writes. Only translucent casters read an albedo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadowCaster {
    Opaque(ShadowMap),
    Translucent(ShadowMap, Albedo),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShadowLabel {
    caster: ShadowCaster,
    code: String,
}

impl ShadowLabel {
    pub fn new(caster: ShadowCaster) -> Self {
        let code = match caster {
            ShadowCaster::Opaque(map) => join_codes([map.code(), Alpha::Opaque.code()]),
            ShadowCaster::Translucent(map, albedo) => {
                join_codes([map.code(), albedo.code(), Alpha::Translucent.code()])
            }
        };
        Self { caster, code }
    }

    pub fn opaque(map: ShadowMap) -> Self {
        Self::new(ShadowCaster::Opaque(map))
    }

    pub fn translucent(map: ShadowMap, albedo: Albedo) -> Self {
        Self::new(ShadowCaster::Translucent(map, albedo))
    }

    pub fn caster(&self) -> ShadowCaster {
        self.caster
    }

    pub fn map(&self) -> ShadowMap {
        match self.caster {
            ShadowCaster::Opaque(map) | ShadowCaster::Translucent(map, _) => map,
        }
    }

    pub fn alpha(&self) -> Alpha {
        match self.caster {
            ShadowCaster::Opaque(_) => Alpha::Opaque,
            ShadowCaster::Translucent(..) => Alpha::Translucent,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn implies_uv(&self) -> bool {
        match self.caster {
            ShadowCaster::Opaque(_) => false,
            ShadowCaster::Translucent(_, albedo) => albedo == Albedo::Textured,
        }
    }
}

pub fn all_labels() -> Vec<ShadowLabel> {
    let mut labels = Vec::new();
    for map in ShadowMap::ALL {
        for alpha in Alpha::ALL {
            match alpha {
                Alpha::Opaque => labels.push(ShadowLabel::opaque(map)),
                Alpha::Translucent => {
                    for albedo in Albedo::ALL {
                        labels.push(ShadowLabel::translucent(map, albedo));
                    }
                }
            }
        }
    }
    labels
}
