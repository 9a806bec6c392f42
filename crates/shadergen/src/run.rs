use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use genconfig::{FamilySettings, GenConfig};
use synth::{parse_manifest, render_manifest, DirectorySink};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Directories, RunArgs};
use crate::families;
use crate::tools::{Compactor, ExternalCompactor, ExternalCompiler, ShaderCompiler};

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Compiler plus optional compactor used after sources are written.
pub struct Toolchain<'a> {
    pub compiler: &'a dyn ShaderCompiler,
    pub compactor: Option<&'a dyn Compactor>,
}

pub fn run(args: &RunArgs, dirs: &Directories) -> Result<()> {
    let config = load_config(args.selection.config.as_deref())?;
    let selected = families::select(&config, &args.selection.families)?;

    for dir in [&dirs.source, &dirs.compiled, &dirs.compacted] {
        ensure_directory(dir)?;
    }
    if args.clean && !args.no_compile {
        clear_directory(&dirs.compiled)?;
        clear_directory(&dirs.compacted)?;
    }

    let compiler = ExternalCompiler::new(
        args.compiler
            .clone()
            .unwrap_or_else(|| config.compiler.program.clone()),
        config.compiler.require_glsl.clone(),
        config.compiler.require_glsles.clone(),
    );
    let compactor = match &args.compactor {
        Some(program) => Some(ExternalCompactor::new(program.clone())),
        None if config.compactor.enabled => {
            Some(ExternalCompactor::new(config.compactor.program.clone()))
        }
        None => None,
    };
    let toolchain = Toolchain {
        compiler: &compiler,
        compactor: compactor.as_ref().map(|c| c as &dyn Compactor),
    };
    let toolchain = if args.no_compile {
        info!("--no-compile requested; stopping after source generation");
        None
    } else {
        Some(toolchain)
    };

    for settings in &selected {
        build_family(settings, dirs, toolchain.as_ref())?;
    }
    Ok(())
}

pub fn load_config(path: Option<&Path>) -> Result<GenConfig> {
    let Some(path) = path else {
        debug!("no configuration supplied; using defaults");
        return Ok(GenConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read generator config at {}", path.display()))?;
    let config = GenConfig::from_toml_str(&contents)
        .with_context(|| format!("invalid generator config at {}", path.display()))?;
    info!(config = %path.display(), "loaded generator configuration");
    Ok(config)
}

/// Generates, writes and (when a toolchain is given) compiles one family.
pub fn build_family(
    settings: &FamilySettings,
    dirs: &Directories,
    toolchain: Option<&Toolchain<'_>>,
) -> Result<()> {
    let removed = remove_stale_sources(&dirs.source, settings)?;
    if removed > 0 {
        debug!(family = %settings.name, removed, "removed stale sources");
    }

    let mut sink = DirectorySink::new(&dirs.source);
    let report = families::generate(settings, &mut sink)
        .with_context(|| format!("failed to generate the {} family", settings.name))?;

    let manifest_path = dirs.source.join(&settings.manifest);
    fs::write(&manifest_path, render_manifest(&report.entries))
        .with_context(|| format!("failed to write manifest {}", manifest_path.display()))?;
    info!(
        family = %settings.name,
        labels = report.len(),
        kinds = ?report.kinds,
        manifest = %manifest_path.display(),
        "wrote sources"
    );

    let sources = list_sources(&dirs.source, settings)?;
    if sources.len() != report.len() {
        bail!(
            "expected {} {} sources in {}, found {}",
            report.len(),
            settings.name,
            dirs.source.display(),
            sources.len()
        );
    }

    let Some(toolchain) = toolchain else {
        return Ok(());
    };

    toolchain
        .compiler
        .compile_batch(&dirs.compiled, &manifest_path, &sources)?;
    info!(family = %settings.name, output = %dirs.compiled.display(), "compiled batch");

    let Some(compactor) = toolchain.compactor else {
        return Ok(());
    };
    let manifest = fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read manifest {}", manifest_path.display()))?;
    let entries = parse_manifest(&manifest)
        .with_context(|| format!("malformed manifest {}", manifest_path.display()))?;
    for entry in &entries {
        compactor.compact(
            &dirs.compiled.join(&entry.target),
            &dirs.compacted.join(&entry.target),
        )?;
    }
    info!(family = %settings.name, programs = entries.len(), "compacted programs");
    Ok(())
}

/// Family source files currently in `dir`, sorted by path.
pub fn list_sources(dir: &Path, settings: &FamilySettings) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to list source directory {}", dir.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if settings.is_source_name(name) && entry.path().is_file() {
            sources.push(entry.path());
        }
    }
    sources.sort();
    Ok(sources)
}

fn remove_stale_sources(dir: &Path, settings: &FamilySettings) -> Result<usize> {
    let stale = list_sources(dir, settings)?;
    for path in &stale {
        fs::remove_file(path)
            .with_context(|| format!("failed to remove stale source {}", path.display()))?;
    }
    Ok(stale.len())
}

fn ensure_directory(path: &Path) -> Result<()> {
    if path.exists() {
        if path.is_dir() {
            debug!(path = %path.display(), "reusing existing directory");
            Ok(())
        } else {
            bail!("filesystem entry at {} is not a directory", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory at {}", path.display()))?;
        debug!(path = %path.display(), "created directory");
        Ok(())
    }
}

fn clear_directory(path: &Path) -> Result<()> {
    let entries =
        fs::read_dir(path).with_context(|| format!("failed to list {}", path.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", path.display()))?;
        let target = entry.path();
        let result = if target.is_dir() {
            fs::remove_dir_all(&target)
        } else {
            fs::remove_file(&target)
        };
        result.with_context(|| format!("failed to remove {}", target.display()))?;
    }
    debug!(path = %path.display(), "cleared directory");
    Ok(())
}
