#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![forbid(unsafe_code)]

use colored::Colorize;
use error_iter::ErrorIter as _;
use rptx::{migrate, Error as RptxError, LogObserver};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing input argument\nUsage: rpt-migrate <input.rpt> [output.rpt]")]
    MissingInput,

    #[error("{0} not found")]
    MissingFile(PathBuf),

    #[error("RPTx error")]
    Rptx(#[from] RptxError),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match convert() {
        Err(e) => {
            eprintln!("{} {}", "error:".red(), e);

            for cause in e.sources().skip(1) {
                eprintln!("{} {}", "caused by:".bright_red(), cause);
            }

            ExitCode::FAILURE
        }
        Ok(()) => ExitCode::SUCCESS,
    }
}

/// `NEW_` prefixed to the input's file name, in the input's directory.
fn default_output(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    input.with_file_name(format!("NEW_{name}"))
}

fn convert() -> Result<(), Error> {
    let mut args = std::env::args_os().skip(1);
    let input = PathBuf::from(args.next().ok_or(Error::MissingInput)?);
    let output = args.next().map_or_else(|| default_output(&input), PathBuf::from);

    if !input.exists() {
        return Err(Error::MissingFile(input));
    }

    log::info!("Converting {} to {}", input.display(), output.display());

    // The input is closed before anything is written
    let data = {
        let mut reader = BufReader::new(File::open(&input)?);
        migrate(&mut reader, &mut LogObserver)?
    };
    std::fs::write(&output, &data)?;

    log::info!("Converted to RPT2: {} ({} bytes)", output.display(), data.len());

    Ok(())
}
