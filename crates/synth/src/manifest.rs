//! Batch manifest consumed by the external shader compiler.
//!
//! One `target : module` line per generated program, in label order. Targets
//! are label codes; modules are the fully qualified names the generated
//! sources declare.

use std::fmt::Write as _;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub target: String,
    pub module: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("manifest line {line}: expected '<target> : <module>', found '{text}'")]
    Malformed { line: usize, text: String },

    #[error("manifest line {line}: duplicate target '{target}'")]
    DuplicateTarget { line: usize, target: String },
}

pub fn render_manifest(entries: &[ManifestEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{} : {}", entry.target, entry.module);
    }
    out
}

/// Parses manifest text back into entries. Blank lines are ignored.
pub fn parse_manifest(text: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
    let mut entries: Vec<ManifestEntry> = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some((target, module)) = trimmed.split_once(" : ") else {
            return Err(ManifestError::Malformed {
                line,
                text: trimmed.to_string(),
            });
        };
        let (target, module) = (target.trim(), module.trim());
        if target.is_empty() || module.is_empty() || module.contains(' ') {
            return Err(ManifestError::Malformed {
                line,
                text: trimmed.to_string(),
            });
        }
        if entries.iter().any(|entry| entry.target == target) {
            return Err(ManifestError::DuplicateTarget {
                line,
                target: target.to_string(),
            });
        }
        entries.push(ManifestEntry {
            target: target.to_string(),
            module: module.to_string(),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(target: &str, module: &str) -> ManifestEntry {
        ManifestEntry {
            target: target.into(),
            module: module.into(),
        }
    }

    #[test]
    fn renders_one_line_per_entry() {
        let text = render_manifest(&[
            entry("U_BC_O", "shaders.forward.Fwd_U_BC_O"),
            entry("LD_BT_O_NV", "shaders.forward.Fwd_LD_BT_O_NV"),
        ]);
        assert_eq!(
            text,
            "U_BC_O : shaders.forward.Fwd_U_BC_O\nLD_BT_O_NV : shaders.forward.Fwd_LD_BT_O_NV\n"
        );
        assert_eq!(render_manifest(&[]), "");
    }

    #[test]
    fn parses_rendered_text() {
        let entries = vec![entry("SB_O", "shaders.shadow.Shd_SB_O")];
        assert_eq!(parse_manifest(&render_manifest(&entries)).unwrap(), entries);
        assert_eq!(parse_manifest("\n\n").unwrap(), vec![]);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            parse_manifest("SB_O shaders.shadow.Shd_SB_O\n").unwrap_err(),
            ManifestError::Malformed {
                line: 1,
                text: "SB_O shaders.shadow.Shd_SB_O".into()
            }
        );
        assert!(matches!(
            parse_manifest("A : x.Y\n : x.Z\n").unwrap_err(),
            ManifestError::Malformed { line: 2, .. }
        ));
    }

    #[test]
    fn rejects_duplicate_targets() {
        let err = parse_manifest("A : x.Y\nA : x.Z\n").unwrap_err();
        assert_eq!(
            err,
            ManifestError::DuplicateTarget {
                line: 2,
                target: "A".into()
            }
        );
    }
}
