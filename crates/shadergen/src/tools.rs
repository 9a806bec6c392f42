//! External shader toolchain: the batch compiler and the per-program compactor.
//!
//! Both run as blocking child processes with inherited stdout/stderr, so their
//! diagnostics reach the terminal unchanged.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info_span};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {}", describe_code(.code))]
    Failed { program: String, code: Option<i32> },
}

fn describe_code(code: &Option<i32>) -> String {
    code.map(|code| format!("status {code}"))
        .unwrap_or_else(|| "no status (terminated by signal)".to_string())
}

pub trait ShaderCompiler {
    /// Compiles every module listed in `manifest` from `sources` into `output_dir`.
    fn compile_batch(
        &self,
        output_dir: &Path,
        manifest: &Path,
        sources: &[PathBuf],
    ) -> Result<(), ToolError>;
}

pub trait Compactor {
    fn compact(&self, input: &Path, output: &Path) -> Result<(), ToolError>;
}

#[derive(Debug, Clone)]
pub struct ExternalCompiler {
    program: String,
    require_glsl: String,
    require_glsles: String,
}

impl ExternalCompiler {
    pub fn new(
        program: impl Into<String>,
        require_glsl: impl Into<String>,
        require_glsles: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            require_glsl: require_glsl.into(),
            require_glsles: require_glsles.into(),
        }
    }

    pub fn arguments(
        &self,
        output_dir: &Path,
        manifest: &Path,
        sources: &[PathBuf],
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-require-glsl".into(),
            self.require_glsl.clone().into(),
            "-require-glsles".into(),
            self.require_glsles.clone().into(),
            "-compile-batch".into(),
            output_dir.into(),
            manifest.into(),
        ];
        args.extend(sources.iter().map(|source| source.as_os_str().to_owned()));
        args
    }
}

impl ShaderCompiler for ExternalCompiler {
    fn compile_batch(
        &self,
        output_dir: &Path,
        manifest: &Path,
        sources: &[PathBuf],
    ) -> Result<(), ToolError> {
        let _span = info_span!(
            "compile",
            program = %self.program,
            sources = sources.len()
        )
        .entered();
        invoke(&self.program, self.arguments(output_dir, manifest, sources))
    }
}

#[derive(Debug, Clone)]
pub struct ExternalCompactor {
    program: String,
}

impl ExternalCompactor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Compactor for ExternalCompactor {
    fn compact(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        let _span = info_span!(
            "compact",
            program = %self.program,
            input = %input.display()
        )
        .entered();
        invoke(
            &self.program,
            [input.as_os_str().to_owned(), output.as_os_str().to_owned()],
        )
    }
}

fn invoke(program: &str, args: impl IntoIterator<Item = OsString>) -> Result<(), ToolError> {
    let args: Vec<OsString> = args.into_iter().collect();
    debug!(?args, "spawning");
    let status = Command::new(program)
        .args(&args)
        .status()
        .map_err(|source| ToolError::Spawn {
            program: program.to_string(),
            source,
        })?;
    if !status.success() {
        return Err(ToolError::Failed {
            program: program.to_string(),
            code: status.code(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiler_arguments_follow_batch_layout() {
        let compiler = ExternalCompiler::new("pc", ">=110", ">=100");
        let args = compiler.arguments(
            Path::new("out"),
            Path::new("src/batch-forward.txt"),
            &[PathBuf::from("src/Fwd_A.p"), PathBuf::from("src/Fwd_B.p")],
        );
        let args: Vec<String> = args
            .into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-require-glsl",
                ">=110",
                "-require-glsles",
                ">=100",
                "-compile-batch",
                "out",
                "src/batch-forward.txt",
                "src/Fwd_A.p",
                "src/Fwd_B.p",
            ]
        );
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let compactor = ExternalCompactor::new("shadergen-no-such-compactor");
        let err = compactor
            .compact(Path::new("a"), Path::new("b"))
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn reports_exit_status() {
        ExternalCompactor::new("true")
            .compact(Path::new("a"), Path::new("b"))
            .unwrap();

        let err = ExternalCompactor::new("false")
            .compact(Path::new("a"), Path::new("b"))
            .unwrap_err();
        match err {
            ToolError::Failed { program, code } => {
                assert_eq!(program, "false");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(describe_code(&None), "no status (terminated by signal)");
    }
}
