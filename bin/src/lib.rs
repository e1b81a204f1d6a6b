use std::{
    io::{BufRead, Write},
    path::Path,
};

use errors::Diagnostics;
use parser::{AstPrinter, Expr, InternalError, Parser, RpnPrinter};

/// Exit status for bad input (sysexits `EX_DATAERR`).
pub const EXIT_DATA_ERROR: u8 = 65;
/// Exit status for a broken internal invariant (sysexits `EX_SOFTWARE`).
pub const EXIT_INTERNAL_ERROR: u8 = 70;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Notation {
    #[default]
    Infix,
    Rpn,
}

impl Notation {
    pub fn render(self, expr: &Expr<'_>) -> String {
        match self {
            Notation::Infix => AstPrinter.render(expr),
            Notation::Rpn => RpnPrinter.render(expr),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("{0}")]
    Diagnostics(Diagnostics),
    #[error("{0}")]
    Internal(#[from] InternalError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RunError {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Diagnostics(_) | RunError::Io(_) => EXIT_DATA_ERROR,
            RunError::Internal(_) => EXIT_INTERNAL_ERROR,
        }
    }
}

/// Scans and parses `source` and writes the rendered expression to `out`.
///
/// Nothing is parsed if scanning failed. A parse that only hit recoverable
/// errors still writes its rendering before the diagnostics are returned.
pub fn run(source: &str, notation: Notation, out: &mut impl Write) -> Result<(), RunError> {
    let tokens = scanner::scan(source)
        .into_result()
        .map_err(|errors| RunError::Diagnostics(errors.into()))?;

    match Parser::new(&tokens).parse() {
        Ok(parsed) => {
            writeln!(out, "{}", notation.render(&parsed.expr))?;
            if parsed.diagnostics.is_empty() {
                Ok(())
            } else {
                Err(RunError::Diagnostics((&parsed.diagnostics).into()))
            }
        }
        Err(parser::Error::Syntax(errors)) => {
            for error in &errors.0 {
                if let Some(token) = &error.synced_to {
                    log::debug!("Parser resumed at {} on line {}", token.kind, token.line());
                }
            }
            Err(RunError::Diagnostics((&errors).into()))
        }
        Err(parser::Error::Internal(e)) => Err(e.into()),
    }
}

/// Runs every file in turn, each after a `-- <path>` banner on `out`.
/// Diagnostics and unreadable files are reported on `err` and never stop the
/// remaining files. Returns the exit status: the highest one any file asked
/// for, or 0.
pub fn run_files(
    files: &[impl AsRef<Path>],
    notation: Notation,
    out: &mut impl Write,
    err: &mut impl Write,
) -> std::io::Result<u8> {
    let mut status = 0;
    for file in files {
        let file: &Path = file.as_ref();
        writeln!(out, "-- {}", file.display())?;

        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                writeln!(err, "Could not read {}: {e}", file.display())?;
                status = status.max(EXIT_DATA_ERROR);
                continue;
            }
        };

        if let Err(e) = run(&source, notation, out) {
            writeln!(err, "{e}")?;
            status = status.max(e.exit_code());
        }
    }
    Ok(status)
}

/// Reads expressions line by line from `input` until it runs dry, showing a
/// `>> ` prompt on `out` before each one. Errors go to `err` and never end the
/// session.
pub fn run_prompt(
    mut input: impl BufRead,
    notation: Notation,
    out: &mut impl Write,
    err: &mut impl Write,
) -> std::io::Result<()> {
    let mut line = String::new();
    loop {
        write!(out, ">> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }

        if let Err(e) = run(&line, notation, out) {
            writeln!(err, "{e}")?;
        }
    }
}
