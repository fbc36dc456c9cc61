use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use log::{error, info};

use lighthisto_core::{BinRanges, RangeSpec};
use lighthisto_io::{AidaWrite, read_aida_file};

use super::cli::DEFAULT_OUTDIR;
use super::config::ChopConfig;

///
/// Name of the chopped copy of `path`: `<stem>-chop<ext>`.
///
pub fn chop_file_name(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .with_context(|| format!("{} has no file name", path.display()))?
        .to_string_lossy();

    Ok(match path.extension() {
        Some(ext) => format!("{}-chop.{}", stem, ext.to_string_lossy()),
        None => format!("{}-chop", stem),
    })
}

///
/// Merge bin ranges from `--config` and `-b` options; `-b` wins for a path given in both.
///
pub fn collect_bin_ranges(matches: &ArgMatches) -> Result<BinRanges> {
    let mut bin_ranges = match matches.get_one::<String>("config") {
        Some(config) => ChopConfig::try_from(Path::new(config))
            .with_context(|| format!("Problem reading bin ranges from `{}`", config))?
            .into_bin_ranges(),
        None => BinRanges::new(),
    };

    if let Some(specs) = matches.get_many::<String>("bins") {
        for spec in specs {
            let spec: RangeSpec = spec
                .parse()
                .with_context(|| format!("Problem parsing bin definition `{}`", spec))?;
            bin_ranges.insert_spec(spec);
        }
    }

    Ok(bin_ranges)
}

pub fn run_chop(matches: &ArgMatches) -> Result<()> {
    let bin_ranges = collect_bin_ranges(matches)?;

    let outdir = PathBuf::from(
        matches
            .get_one::<String>("out")
            .map(String::as_str)
            .unwrap_or(DEFAULT_OUTDIR),
    );

    let files: Vec<&String> = matches
        .get_many::<String>("files")
        .context("Must specify at least one AIDA histogram file")?
        .collect();

    let mut failed = 0;
    for file in &files {
        let path = Path::new(file.as_str());

        let histograms = match read_aida_file(path) {
            Ok(histograms) => histograms,
            Err(e) => {
                error!("{} can not be read: {}", file, e);
                failed += 1;
                continue;
            }
        };

        let chopped = bin_ranges
            .apply(histograms)
            .with_context(|| format!("Problem chopping histograms from {}", file))?;

        let chop_file = outdir.join(chop_file_name(path)?);
        chopped
            .write_aida(&chop_file)
            .with_context(|| format!("Problem writing {}", chop_file.display()))?;

        info!("Wrote {} histograms to {}", chopped.len(), chop_file.display());
    }

    if failed > 0 {
        bail!("{} of {} input files could not be read", failed, files.len());
    }

    Ok(())
}
