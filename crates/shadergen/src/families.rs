use anyhow::{bail, Result};
use genconfig::{FamilySettings, GenConfig, FORWARD, KNOWN_FAMILIES, SHADOW};
use serde::Serialize;
use synth::{
    generate_family, Family, ForwardFamily, GenerationReport, ModuleNaming, ShaderLabel,
    ShadowFamily, SourceSink,
};

/// One row of `shadergen list`.
#[derive(Debug, Clone, Serialize)]
pub struct LabelRow {
    pub family: &'static str,
    pub code: String,
    pub kind: &'static str,
    pub implies_uv: bool,
    pub module: String,
}

/// Families to work on: the ones asked for by name, or every enabled one.
pub fn select(config: &GenConfig, requested: &[String]) -> Result<Vec<FamilySettings>> {
    for name in requested {
        if !KNOWN_FAMILIES.contains(&name.as_str()) {
            bail!(
                "unknown family '{name}'; expected one of {}",
                KNOWN_FAMILIES.join(", ")
            );
        }
    }
    let selected: Vec<FamilySettings> = config
        .families()
        .into_iter()
        .filter(|family| {
            if requested.is_empty() {
                family.enabled
            } else {
                requested.iter().any(|name| *name == family.name)
            }
        })
        .collect();
    if selected.is_empty() {
        bail!("no families selected; enable one in the config or pass --family");
    }
    Ok(selected)
}

fn naming(settings: &FamilySettings) -> ModuleNaming {
    ModuleNaming::new(settings.package.clone(), settings.prefix.clone())
}

pub fn generate<S: SourceSink>(
    settings: &FamilySettings,
    sink: &mut S,
) -> Result<GenerationReport> {
    let extension = &settings.extension;
    let report = match settings.name.as_str() {
        FORWARD => generate_family(&ForwardFamily::new(naming(settings)), extension, sink)?,
        SHADOW => generate_family(&ShadowFamily::new(naming(settings)), extension, sink)?,
        other => bail!("unknown family '{other}'"),
    };
    Ok(report)
}

pub fn rows(settings: &FamilySettings) -> Result<Vec<LabelRow>> {
    match settings.name.as_str() {
        FORWARD => Ok(rows_of(&ForwardFamily::new(naming(settings)))),
        SHADOW => Ok(rows_of(&ShadowFamily::new(naming(settings)))),
        other => bail!("unknown family '{other}'"),
    }
}

fn rows_of<F: Family>(family: &F) -> Vec<LabelRow> {
    family
        .labels()
        .iter()
        .map(|label| LabelRow {
            family: family.name(),
            code: label.code().to_string(),
            kind: label.kind(),
            implies_uv: label.implies_uv(),
            module: family.naming().module_path(label.code()),
        })
        .collect()
}

/// Rendered source for `code`, or `None` when the family has no such label.
pub fn render(settings: &FamilySettings, code: &str) -> Result<Option<String>> {
    match settings.name.as_str() {
        FORWARD => render_in(&ForwardFamily::new(naming(settings)), code),
        SHADOW => render_in(&ShadowFamily::new(naming(settings)), code),
        other => bail!("unknown family '{other}'"),
    }
}

fn render_in<F: Family>(family: &F, code: &str) -> Result<Option<String>> {
    let Some(label) = family
        .labels()
        .into_iter()
        .find(|label| label.code() == code)
    else {
        return Ok(None);
    };
    Ok(Some(family.synthesize(&label)?.render()))
}
