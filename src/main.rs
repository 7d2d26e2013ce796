//! Cellgrid - apply edit scripts to a sheet, evaluate formulas, export CSV

mod logger;

use anyhow::{Context, Result};
use cellgrid_core::storage::{parse_edit_script, read_edit_script, write_csv};
use cellgrid_core::{CellRef, Config, Document};
use cellgrid_engine::engine::{ERROR_SENTINEL, FormulaFn, try_evaluate};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cellgrid")]
#[command(about = "Apply cell edits, evaluate formulas and export the sheet as CSV")]
#[command(version)]
#[command(after_help = functions_help())]
struct Cli {
    /// Edit script with one `CELLREF: VALUE` per line (`-` for stdin)
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Evaluate a formula against the sheet and print only its result
    #[arg(long, short = 'c', value_name = "FORMULA")]
    command: Option<String>,

    /// Write CSV to this file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Recalculate every formula after applying the script
    #[arg(long)]
    recalc: bool,

    /// Config file (defaults to config.toml in the platform config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn functions_help() -> String {
    let lines: Vec<String> = FormulaFn::all()
        .iter()
        .map(|func| format!("  {:<9}{}", func.name(), func.description()))
        .collect();
    format!(
        "Functions (one range argument, e.g. =SUM(A1:B5); AVG is short for AVERAGE):\n{}",
        lines.join("\n")
    )
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    logger::init(logger::level_for(cli.verbose, None));

    let config = Config::load(cli.config.as_deref()).context("loading config")?;
    logger::init(logger::level_for(cli.verbose, config.log_level));

    let mut doc = Document::with_config(config);
    for (cell, input) in load_edits(&cli)? {
        doc.set_cell_from_input(cell, &input);
    }
    if cli.recalc {
        doc.recalculate();
    }

    if let Some(formula) = &cli.command {
        println!("{}", command_result(&doc, formula));
        if let Some(path) = &cli.output {
            write_output(path, &doc)?;
        }
        return Ok(());
    }

    match &cli.output {
        Some(path) => write_output(path, &doc)?,
        None => println!("{}", doc.export_csv()),
    }
    Ok(())
}

fn load_edits(cli: &Cli) -> Result<Vec<(CellRef, String)>> {
    match &cli.script {
        Some(path) if path.as_os_str() != "-" => read_edit_script(path)
            .with_context(|| format!("reading edit script {}", path.display())),
        None if cli.command.is_some() => Ok(Vec::new()),
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("reading edit script from stdin")?;
            parse_edit_script(&content).context("parsing edit script from stdin")
        }
    }
}

fn command_result(doc: &Document, formula: &str) -> String {
    match try_evaluate(formula, &doc.grid) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("formula {:?} failed: {}", formula, err);
            ERROR_SENTINEL.to_string()
        }
    }
}

fn write_output(path: &Path, doc: &Document) -> Result<()> {
    write_csv(path, &doc.grid).with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}
