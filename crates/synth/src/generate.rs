//! Drives a family through enumeration, synthesis and output.

use std::collections::BTreeMap;
use std::io;

use thiserror::Error;
use tracing::{debug, info};

use crate::family::{Family, ShaderLabel};
use crate::manifest::ManifestEntry;
use crate::sink::SourceSink;
use crate::SynthError;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Synth(#[from] SynthError),

    #[error("failed to write generated source {name}")]
    Write {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Outcome of generating one family: one manifest entry and one file per
/// label, in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub family: String,
    pub entries: Vec<ManifestEntry>,
    pub files: Vec<String>,
    pub kinds: BTreeMap<&'static str, usize>,
}

impl GenerationReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// File name for one module: `<Prefix>_<code>.<extension>`.
pub fn source_file_name(module_name: &str, extension: &str) -> String {
    format!("{module_name}.{extension}")
}

/// Synthesizes every label of `family` and hands each rendered module to
/// `sink`. Stops at the first failure; files already written stay written.
pub fn generate_family<F, S>(
    family: &F,
    extension: &str,
    sink: &mut S,
) -> Result<GenerationReport, GenerateError>
where
    F: Family,
    S: SourceSink + ?Sized,
{
    let labels = family.labels();
    info!(family = family.name(), labels = labels.len(), "generating sources");

    let mut report = GenerationReport {
        family: family.name().to_string(),
        ..GenerationReport::default()
    };
    for label in &labels {
        let program = family.synthesize(label)?;
        let name = source_file_name(&program.module_name(), extension);
        debug!(code = label.code(), kind = label.kind(), file = %name, "writing module");
        sink.write(&name, &program.render())
            .map_err(|source| GenerateError::Write {
                name: name.clone(),
                source,
            })?;
        *report.kinds.entry(label.kind()).or_default() += 1;
        report.entries.push(ManifestEntry {
            target: label.code().to_string(),
            module: program.module_path(),
        });
        report.files.push(name);
    }
    Ok(report)
}
