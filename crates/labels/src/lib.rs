//! Shading-variant labels: the feature taxonomy, the exhaustive enumerators
//! for each variant family, the naming scheme and the UV-implication rule.
//!
//! Modules:
//!
//! - `taxonomy` holds the feature dimensions and their naming fragments.
//! - `forward` enumerates lit/unlit forward-rendering labels.
//! - `shadow` enumerates depth-only shadow-map labels.
pub mod forward;
pub mod shadow;
pub mod taxonomy;

pub use forward::{ForwardLabel, LitLabel, UnlitLabel};
pub use shadow::{ShadowCaster, ShadowLabel};
pub use taxonomy::{Albedo, Alpha, Emissive, Environment, Light, Normals, ShadowMap, Specular};
