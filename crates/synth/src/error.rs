use thiserror::Error;

/// Raised when the feature taxonomy and the section-writers disagree.
///
/// Neither variant can be produced by labels from the enumerators; they guard
/// against a dimension changing without every writer following.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthError {
    #[error("lit label '{code}' has no normal source")]
    MissingNormals { code: String },

    #[error(
        "label '{code}' implies texture coordinates = {implied}, but its fragment stage reads them = {used}"
    )]
    UvMismatch {
        code: String,
        implied: bool,
        used: bool,
    },
}
