use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

pub const FORWARD: &str = "forward";
pub const SHADOW: &str = "shadow";

/// Families the generator knows how to build, in generation order.
pub const KNOWN_FAMILIES: [&str; 2] = [FORWARD, SHADOW];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub compiler: CompilerConfig,
    #[serde(default)]
    pub compactor: CompactorConfig,
    #[serde(default)]
    pub families: BTreeMap<String, FamilyConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompilerConfig {
    #[serde(default = "default_compiler")]
    pub program: String,
    #[serde(default = "default_require_glsl")]
    pub require_glsl: String,
    #[serde(default = "default_require_glsles")]
    pub require_glsles: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompactorConfig {
    #[serde(default = "default_compactor")]
    pub program: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Per-family overrides. Anything left out falls back to the family's
/// built-in naming.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FamilyConfig {
    pub enabled: Option<bool>,
    pub package: Option<String>,
    pub prefix: Option<String>,
    pub extension: Option<String>,
    pub manifest: Option<String>,
}

/// A family's settings after defaults have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilySettings {
    pub name: String,
    pub enabled: bool,
    pub package: String,
    pub prefix: String,
    pub extension: String,
    pub manifest: String,
}

impl FamilySettings {
    /// Whether `file_name` matches this family's generated sources,
    /// `<prefix>_*.<extension>`.
    pub fn is_source_name(&self, file_name: &str) -> bool {
        file_name.starts_with(&format!("{}_", self.prefix))
            && file_name.ends_with(&format!(".{}", self.extension))
    }
}

fn default_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_compiler() -> String {
    "parasol-compiler".into()
}

fn default_compactor() -> String {
    "parasol-compactor".into()
}

fn default_require_glsl() -> String {
    ">=110".into()
}

fn default_require_glsles() -> String {
    ">=100".into()
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: default_compiler(),
            require_glsl: default_require_glsl(),
            require_glsles: default_require_glsles(),
        }
    }
}

impl Default for CompactorConfig {
    fn default() -> Self {
        Self {
            program: default_compactor(),
            enabled: true,
        }
    }
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            compiler: CompilerConfig::default(),
            compactor: CompactorConfig::default(),
            families: BTreeMap::new(),
        }
    }
}

fn builtin_family(name: &str) -> Option<(&'static str, &'static str)> {
    match name {
        FORWARD => Some(("shaders.forward", "Fwd")),
        SHADOW => Some(("shaders.shadow", "Shd")),
        _ => None,
    }
}

impl GenConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: GenConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Resolved settings for a known family, or `None` for an unknown name.
    pub fn family(&self, name: &str) -> Option<FamilySettings> {
        let (package, prefix) = builtin_family(name)?;
        let overrides = self.families.get(name).cloned().unwrap_or_default();
        Some(FamilySettings {
            name: name.to_string(),
            enabled: overrides.enabled.unwrap_or(true),
            package: overrides.package.unwrap_or_else(|| package.to_string()),
            prefix: overrides.prefix.unwrap_or_else(|| prefix.to_string()),
            extension: overrides.extension.unwrap_or_else(|| "p".to_string()),
            manifest: overrides
                .manifest
                .unwrap_or_else(|| format!("batch-{name}.txt")),
        })
    }

    /// Every known family, enabled or not, in generation order.
    pub fn families(&self) -> Vec<FamilySettings> {
        KNOWN_FAMILIES
            .iter()
            .filter_map(|name| self.family(name))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        if self.compiler.program.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "compiler.program may not be empty".into(),
            ));
        }
        if self.compiler.require_glsl.trim().is_empty()
            || self.compiler.require_glsles.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "compiler profile constraints may not be empty".into(),
            ));
        }
        if self.compactor.enabled && self.compactor.program.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "compactor.program may not be empty while the compactor is enabled".into(),
            ));
        }

        for name in self.families.keys() {
            if builtin_family(name).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "unknown family '{name}'; expected one of {}",
                    KNOWN_FAMILIES.join(", ")
                )));
            }
        }

        let families = self.families();
        let mut prefixes = BTreeSet::new();
        let mut manifests = BTreeSet::new();
        for family in &families {
            validate_family(family)?;
            if !prefixes.insert(family.prefix.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "family '{}' reuses prefix '{}'",
                    family.name, family.prefix
                )));
            }
            if !manifests.insert(family.manifest.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "family '{}' reuses manifest '{}'",
                    family.name, family.manifest
                )));
            }
        }

        // Stale-source cleanup for any family would delete a manifest that
        // matches its source pattern.
        for family in &families {
            if let Some(owner) = families
                .iter()
                .find(|other| other.is_source_name(&family.manifest))
            {
                return Err(ConfigError::Invalid(format!(
                    "family '{}' manifest '{}' collides with {} source names",
                    family.name, family.manifest, owner.name
                )));
            }
        }

        Ok(())
    }
}

fn validate_family(family: &FamilySettings) -> Result<(), ConfigError> {
    let name = &family.name;

    let package_ok = !family.package.is_empty()
        && family.package.split('.').all(|part| is_identifier(part, true));
    if !package_ok {
        return Err(ConfigError::Invalid(format!(
            "family '{name}' package '{}' must be dot-separated identifiers",
            family.package
        )));
    }

    // Module names are `<prefix>_<code>`; an underscore in the prefix would
    // make the split ambiguous.
    if !is_identifier(&family.prefix, false) {
        return Err(ConfigError::Invalid(format!(
            "family '{name}' prefix '{}' must be alphanumeric and start with a letter",
            family.prefix
        )));
    }

    if family.extension.is_empty()
        || !family.extension.chars().all(|ch| ch.is_ascii_alphanumeric())
    {
        return Err(ConfigError::Invalid(format!(
            "family '{name}' extension '{}' must be non-empty and alphanumeric",
            family.extension
        )));
    }

    let manifest = &family.manifest;
    let manifest_ok = !manifest.is_empty()
        && manifest != "."
        && manifest != ".."
        && manifest
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'));
    if !manifest_ok {
        return Err(ConfigError::Invalid(format!(
            "family '{name}' manifest '{manifest}' must be a plain file name"
        )));
    }
    Ok(())
}

fn is_identifier(raw: &str, allow_underscore: bool) -> bool {
    let mut chars = raw.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic()
        && chars.all(|ch| ch.is_ascii_alphanumeric() || (allow_underscore && ch == '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 1

[compiler]
program = "/opt/parasol/bin/parasol-compiler"

[compactor]
enabled = false

[families.forward]
package = "engine.forward"
prefix = "Fw"

[families.shadow]
enabled = false
extension = "psh"
"#;

    #[test]
    fn parses_sample_config() {
        let config = GenConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.compiler.program, "/opt/parasol/bin/parasol-compiler");
        assert_eq!(config.compiler.require_glsl, ">=110");
        assert_eq!(config.compiler.require_glsles, ">=100");
        assert!(!config.compactor.enabled);

        let forward = config.family(FORWARD).unwrap();
        assert_eq!(forward.package, "engine.forward");
        assert_eq!(forward.prefix, "Fw");
        assert_eq!(forward.extension, "p");
        assert_eq!(forward.manifest, "batch-forward.txt");
        assert!(forward.enabled);

        let shadow = config.family(SHADOW).unwrap();
        assert!(!shadow.enabled);
        assert_eq!(shadow.prefix, "Shd");
        assert_eq!(shadow.extension, "psh");
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = GenConfig::from_toml_str("").unwrap();
        assert_eq!(config.version, 1);
        assert!(config.compactor.enabled);
        let families = config.families();
        assert_eq!(
            families.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec![FORWARD, SHADOW]
        );
        assert_eq!(families[0].package, "shaders.forward");
        assert_eq!(families[1].manifest, "batch-shadow.txt");
        assert!(config.family("general").is_none());
        GenConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_unknown_family() {
        let err =
            GenConfig::from_toml_str("[families.deferred]\nenabled = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("deferred")));
    }

    #[test]
    fn rejects_unsupported_version() {
        let err = GenConfig::from_toml_str("version = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_empty_programs() {
        let err = GenConfig::from_toml_str("[compiler]\nprogram = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GenConfig::from_toml_str("[compactor]\nprogram = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        GenConfig::from_toml_str("[compactor]\nprogram = \"\"\nenabled = false\n").unwrap();
    }

    #[test]
    fn rejects_unsafe_names() {
        for body in [
            "prefix = \"F_w\"",
            "prefix = \"1Fwd\"",
            "prefix = \"\"",
            "extension = \"p/x\"",
            "extension = \"\"",
            "package = \"shaders..forward\"",
            "manifest = \"../batch.txt\"",
            "manifest = \"Fwd_batch.p\"",
        ] {
            let doc = format!("[families.forward]\n{body}\n");
            let err = GenConfig::from_toml_str(&doc).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{body}");
        }
    }

    #[test]
    fn rejects_manifest_matching_other_family_sources() {
        let err =
            GenConfig::from_toml_str("[families.forward]\nmanifest = \"Shd_batch.p\"\n")
                .unwrap_err();
        assert!(
            matches!(&err, ConfigError::Invalid(msg) if msg.contains("shadow source names")),
            "{err}"
        );

        let err = GenConfig::from_toml_str(
            "[families.shadow]\nextension = \"txt\"\nmanifest = \"Fwd_list.p\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        // Same prefix, different extension: not a source name.
        GenConfig::from_toml_str("[families.forward]\nmanifest = \"Shd_batch.txt\"\n")
            .unwrap();
    }

    #[test]
    fn source_names_follow_prefix_and_extension() {
        let forward = GenConfig::default().family(FORWARD).unwrap();
        assert!(forward.is_source_name("Fwd_LD_BT_O_NV.p"));
        assert!(!forward.is_source_name("Fwd_LD_BT_O_NV.px"));
        assert!(!forward.is_source_name("Fw_LD.p"));
        assert!(!forward.is_source_name("batch-forward.txt"));
    }

    #[test]
    fn rejects_duplicate_prefix_and_manifest() {
        let err =
            GenConfig::from_toml_str("[families.shadow]\nprefix = \"Fwd\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("prefix")));

        let err = GenConfig::from_toml_str(
            "[families.shadow]\nmanifest = \"batch-forward.txt\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("manifest")));
    }

    #[test]
    fn reports_parse_errors() {
        let err = GenConfig::from_toml_str("version = \"one\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
