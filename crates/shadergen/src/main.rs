mod cli;
mod families;
mod run;
mod tools;

use anyhow::{bail, Context, Result};
use cli::{Command, ListArgs, ShowArgs};

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::List(args)) => run_list(&args),
        Some(Command::Show(args)) => run_show(&args),
        None => {
            let Some(dirs) = cli.run.directories() else {
                eprintln!("{}", cli::USAGE);
                std::process::exit(1);
            };
            run::run(&cli.run, &dirs)
        }
    }
}

fn run_list(args: &ListArgs) -> Result<()> {
    let config = run::load_config(args.selection.config.as_deref())?;
    let mut rows = Vec::new();
    for settings in families::select(&config, &args.selection.families)? {
        rows.extend(families::rows(&settings)?);
    }

    if args.json {
        let json =
            serde_json::to_string_pretty(&rows).context("failed to encode label list")?;
        println!("{json}");
        return Ok(());
    }

    for row in &rows {
        println!(
            "  {:<8} {:<24} {:<11} uv={:<5} {}",
            row.family, row.code, row.kind, row.implies_uv, row.module
        );
    }
    println!("{} labels", rows.len());
    Ok(())
}

fn run_show(args: &ShowArgs) -> Result<()> {
    let config = run::load_config(args.selection.config.as_deref())?;
    for settings in families::select(&config, &args.selection.families)? {
        if let Some(text) = families::render(&settings, &args.code)? {
            print!("{text}");
            return Ok(());
        }
    }
    bail!("no label with code '{}' in the selected families", args.code);
}
