use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use lighthisto_io::{AidaWrite, read_flat_file, to_aida_document};

pub fn run_flat2aida(matches: &ArgMatches) -> Result<()> {
    let mut histograms = Vec::new();
    for file in matches
        .get_many::<String>("files")
        .context("Must specify at least one flat histogram file")?
    {
        histograms.extend(
            read_flat_file(file).with_context(|| format!("Failed to read flat file {}", file))?,
        );
    }

    match matches.get_one::<String>("output") {
        Some(p) => {
            histograms
                .write_aida(p)
                .with_context(|| format!("Failed to write output to {}", p))?;
            info!("Output written to {}", p);
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            out.write_all(to_aida_document(&histograms).as_bytes())?;
        }
    }

    Ok(())
}
