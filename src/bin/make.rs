//! Make-style dependency build driver.
//!
//! Reads a makefile and a fileinfo record, decides which targets need
//! rebuilding, and prints the command lines to run. With `--json` the
//! whole build plan is printed as JSON instead.

use clap::Parser;
use pathgraph::make::{parse_fileinfo, parse_makefile, MakeError, TargetBuilder};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Make-style dependency build driver.
#[derive(Parser, Debug)]
#[command(name = "pathgraph-make", version, about)]
struct Cli {
    /// Makefile to read
    #[arg(short = 'f', long = "file", default_value = "Makefile")]
    makefile: PathBuf,

    /// Recorded file change dates
    #[arg(short = 'D', long = "dates", default_value = "fileinfo")]
    fileinfo: PathBuf,

    /// Print the build plan as JSON
    #[arg(long)]
    json: bool,

    /// Targets to build; defaults to the first rule's target
    targets: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), MakeError> {
    let makefile = fs::read_to_string(&cli.makefile)?;
    let fileinfo = fs::read_to_string(&cli.fileinfo)?;

    let rules = parse_makefile(&makefile)?;
    let info = parse_fileinfo(&fileinfo)?;
    let mut builder = TargetBuilder::new(rules, info)?;
    let plan = builder.build(&cli.targets)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        for command in &plan.commands {
            println!("{command}");
        }
    }
    Ok(())
}
