#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![forbid(unsafe_code)]

use colored::Colorize;
use error_iter::ErrorIter as _;
use rptx::{enhance, Error as RptxError, Format, LogObserver, Song};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

const DEFAULT_OUTPUT: &str = "DEMO_ENHANCED.RPT";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing input argument\nUsage: rpt-enhance <input.rpt> [output.rpt]")]
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

    match generate() {
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

fn generate() -> Result<(), Error> {
    let mut args = std::env::args_os().skip(1);
    let input = PathBuf::from(args.next().ok_or(Error::MissingInput)?);
    let output = args.next().map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from);

    if !input.exists() {
        return Err(Error::MissingFile(input));
    }

    let song = {
        let mut reader = BufReader::new(File::open(&input)?);
        Song::read_from(&mut reader, Format::Rpt2, &mut LogObserver)?
    };

    let song = enhance(song, &mut LogObserver);

    let data = song.to_vec(Format::Rpt2, &mut LogObserver)?;
    std::fs::write(&output, data)?;

    log::info!("Saved: {}", output.display());

    Ok(())
}
