//! Tile Reassembler
//!
//! Reads a tile puzzle from the file named by the first argument and prints
//! two lines: the product of the four corner tile ids, then the roughness of
//! the reassembled image. With no argument the bundled sample is solved and
//! checked against its known answers.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{ArgAction, Parser};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use jigsaw::input;

/// Reassembles an image from edge-matched tiles and hunts for sea monsters.
#[derive(Parser)]
#[command(name = "jigsaw")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Puzzle input file; the bundled sample is self-tested when omitted.
    input: Option<PathBuf>,

    /// Log progress to stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Maps the repeat count of `-v` to a log level.
fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Sends log output to stderr so stdout carries only the answers.
fn init_logging(verbosity: u8) {
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    if let Err(e) = TermLogger::init(
        level_for(verbosity),
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialise logging: {e}");
    }
}

/// Solves the chosen input, prints the answers and self-tests the sample.
fn run(cli: &Cli) -> jigsaw::Result<()> {
    let started = Instant::now();

    let answers = match &cli.input {
        Some(path) => input::with_mapped_file(path, jigsaw::solve)?,
        None => jigsaw::solve(input::SAMPLE_INPUT)?,
    };
    println!("{answers}");
    log::info!("solved in {:.3?}", started.elapsed());

    if cli.input.is_none() {
        input::verify_sample(&answers)?;
        log::info!("sample answers match");
    }
    Ok(())
}
