use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const USAGE: &str = "usage: shadergen <SOURCE_DIR> <COMPILED_DIR> <COMPACTED_DIR>\n\
                         write a directory named `list` or `show` as `./list` or `./show`";

const AFTER_HELP: &str = "A first positional of `list` or `show` selects the subcommand. \
                          Write such a source directory as `./list` or `./show`.";

#[derive(Parser, Debug)]
#[command(
    name = "shadergen",
    author,
    version,
    about = "Shading-variant source generator",
    after_help = AFTER_HELP,
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory receiving generated sources and batch manifests.
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// Directory the compiler writes compiled programs into.
    #[arg(value_name = "COMPILED_DIR")]
    pub compiled_dir: Option<PathBuf>,

    /// Directory the compactor writes compacted programs into.
    #[arg(value_name = "COMPACTED_DIR")]
    pub compacted_dir: Option<PathBuf>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Shader compiler executable; overrides `compiler.program` from the config.
    #[arg(long, value_name = "PROGRAM", env = "SHADERGEN_COMPILER")]
    pub compiler: Option<String>,

    /// Compactor executable; overrides `compactor.program` and enables the compactor.
    #[arg(long, value_name = "PROGRAM", env = "SHADERGEN_COMPACTOR")]
    pub compactor: Option<String>,

    /// Write sources and manifests only; skip the compiler and compactor.
    #[arg(long)]
    pub no_compile: bool,

    /// Empty the compiled and compacted directories before compiling.
    #[arg(long)]
    pub clean: bool,
}

/// Which families to work on and where their naming comes from.
#[derive(Args, Debug, Default, Clone)]
pub struct SelectionArgs {
    /// Generator configuration (TOML).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Restrict to the named family; repeat for several (`forward`, `shadow`).
    #[arg(long = "family", value_name = "NAME")]
    pub families: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every label of the selected families.
    List(ListArgs),
    /// Print the generated source for one label.
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Label code, e.g. `LD_BT_O_NV` or `SB_O`.
    #[arg(value_name = "CODE")]
    pub code: String,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// The three output directories, once all of them have been supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directories {
    pub source: PathBuf,
    pub compiled: PathBuf,
    pub compacted: PathBuf,
}

impl RunArgs {
    pub fn directories(&self) -> Option<Directories> {
        Some(Directories {
            source: self.source_dir.clone()?,
            compiled: self.compiled_dir.clone()?,
            compacted: self.compacted_dir.clone()?,
        })
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_directories_only_when_all_present() {
        let cli = Cli::try_parse_from(["shadergen", "src", "out"]).unwrap();
        assert!(cli.run.directories().is_none());

        let cli = Cli::try_parse_from(["shadergen", "src", "out", "small"]).unwrap();
        assert_eq!(
            cli.run.directories(),
            Some(Directories {
                source: "src".into(),
                compiled: "out".into(),
                compacted: "small".into(),
            })
        );
    }

    #[test]
    fn parses_run_options() {
        let cli = Cli::try_parse_from([
            "shadergen",
            "a",
            "b",
            "c",
            "--family",
            "shadow",
            "--family",
            "forward",
            "--no-compile",
            "--clean",
            "--compiler",
            "/usr/bin/pc",
        ])
        .unwrap();
        assert_eq!(cli.run.selection.families, vec!["shadow", "forward"]);
        assert!(cli.run.no_compile);
        assert!(cli.run.clean);
        assert_eq!(cli.run.compiler.as_deref(), Some("/usr/bin/pc"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["shadergen", "list", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::List(ListArgs { json: true, .. }))
        ));

        let cli =
            Cli::try_parse_from(["shadergen", "show", "SB_O", "--family", "shadow"]).unwrap();
        match cli.command {
            Some(Command::Show(args)) => {
                assert_eq!(args.code, "SB_O");
                assert_eq!(args.selection.families, vec!["shadow"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn dotted_path_reaches_directories_named_like_subcommands() {
        let cli = Cli::try_parse_from(["shadergen", "./list", "out", "small"]).unwrap();
        assert!(cli.command.is_none());
        let dirs = cli.run.directories().unwrap();
        assert_eq!(dirs.source, PathBuf::from("./list"));

        let cli = Cli::try_parse_from(["shadergen", "./show", "out", "small"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.directories().unwrap().source, PathBuf::from("./show"));

        // The bare name is taken as the subcommand.
        assert!(Cli::try_parse_from(["shadergen", "list", "out", "small"]).is_err());
    }

    #[test]
    fn help_mentions_subcommand_names_workaround() {
        let help = <Cli as clap::CommandFactory>::command()
            .render_long_help()
            .to_string();
        assert!(help.contains("./list"), "{help}");
        assert!(USAGE.contains("./show"));
    }
}
