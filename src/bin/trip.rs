//! Trip planner: turns a road map and a list of stops into driving
//! directions.

use clap::Parser;
use pathgraph::trip::{RoadMap, RoutePlanner, TripError};
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

/// Trip planner over a road map.
#[derive(Parser, Debug)]
#[command(name = "pathgraph-trip", version, about)]
struct Cli {
    /// Road map to read
    #[arg(short = 'm', long = "map", default_value = "Map")]
    map: PathBuf,

    /// Write directions to a file instead of stdout
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// Print the trip legs as JSON
    #[arg(long)]
    json: bool,

    /// Comma-separated stops, e.g. "A,B,C"; read from stdin when omitted
    request: Option<String>,
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

fn run(cli: &Cli) -> Result<(), TripError> {
    let text = fs::read_to_string(&cli.map)?;
    let mut planner = RoutePlanner::new(RoadMap::parse(&text)?);

    let request = match &cli.request {
        Some(request) => request.clone(),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let stops = RoutePlanner::parse_request(&request)?;
    let trip = planner.plan(&stops)?;

    let rendered = if cli.json {
        let mut body = serde_json::to_string_pretty(&trip.legs)?;
        body.push('\n');
        body
    } else {
        trip.to_string()
    };

    match &cli.out {
        Some(path) => fs::write(path, rendered)?,
        None => print!("{rendered}"),
    }
    Ok(())
}
