use std::{
    io::{stderr, stdin, stdout},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use log::LevelFilter;

use lox_expr::{run_files, run_prompt, Notation};

/// Scans and parses Lox expressions and prints their syntax tree.
#[derive(clap::Parser)]
struct Args {
    /// Files to run. Starts an interactive prompt if none are given.
    files: Vec<PathBuf>,

    /// More log output, repeat for trace level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    #[arg(short, long, value_enum, default_value_t = Notation::Infix)]
    notation: Notation,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    match args.debug {
        0 => &mut logger,
        1 => logger.filter_level(LevelFilter::Debug),
        _ => logger.filter_level(LevelFilter::Trace),
    }
    .init();

    if args.files.is_empty() {
        run_prompt(stdin().lock(), args.notation, &mut stdout(), &mut stderr())?;
        Ok(ExitCode::SUCCESS)
    } else {
        let status = run_files(&args.files, args.notation, &mut stdout(), &mut stderr())?;
        Ok(ExitCode::from(status))
    }
}
