use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use lighthisto_core::Histogram;
use lighthisto_core::utils::write_dynamic;
use lighthisto_io::{FlatMode, FlatWrite, plot_header, read_aida_file, to_flat, to_flat_document};

///
/// File name for one histogram in `--split` mode: the full path with the
/// leading slash dropped and the remaining slashes turned into underscores.
///
pub fn split_file_name(histogram: &Histogram) -> String {
    let full_path = histogram.full_path();
    format!("{}.dat", full_path.trim_start_matches('/').replace('/', "_"))
}

fn write_split(histograms: &[Histogram], dir: &Path, mode: FlatMode) -> Result<()> {
    for histogram in histograms {
        let path = dir.join(split_file_name(histogram));
        let contents = format!(
            "{}\n\n{}\n",
            plot_header(histogram),
            to_flat(histogram, mode)
        );
        write_dynamic(&path, &contents)
            .with_context(|| format!("Failed to write output to {}", path.display()))?;
    }
    info!("Wrote {} histograms to {}", histograms.len(), dir.display());
    Ok(())
}

pub fn run_aida2flat(matches: &ArgMatches) -> Result<()> {
    let mode = if matches.get_flag("gnuplot") {
        FlatMode::Gnuplot
    } else {
        FlatMode::Standard
    };

    let mut histograms = Vec::new();
    for file in matches
        .get_many::<String>("files")
        .context("Must specify at least one AIDA histogram file")?
    {
        histograms.extend(
            read_aida_file(file).with_context(|| format!("Failed to read AIDA file {}", file))?,
        );
    }

    if let Some(dir) = matches.get_one::<String>("split") {
        return write_split(&histograms, Path::new(dir), mode);
    }

    match matches.get_one::<String>("output") {
        Some(p) => {
            histograms
                .write_flat(p, mode)
                .with_context(|| format!("Failed to write output to {}", p))?;
            info!("Output written to {}", p);
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            out.write_all(to_flat_document(&histograms, mode).as_bytes())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::aida2flat::cli::create_aida2flat_cli;

    use lighthisto_io::read_flat_file;
    use pretty_assertions::assert_eq;
    use rstest::*;

    use std::path::PathBuf;

    fn get_test_path(file_name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../tests/data/histo")
            .join(file_name)
    }

    #[rstest]
    fn test_split_file_name() {
        let histogram = Histogram::new("/REF/TEST_2011_S1234", "d01-x01-y01");
        assert_eq!(
            split_file_name(&histogram),
            "REF_TEST_2011_S1234_d01-x01-y01.dat"
        );
    }

    #[rstest]
    fn test_run_aida2flat_to_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let output = tempdir.path().join("reference.dat");
        let input = get_test_path("reference.aida");

        let matches = create_aida2flat_cli()
            .try_get_matches_from([
                "aida2flat",
                "-o",
                output.to_str().unwrap(),
                input.to_str().unwrap(),
            ])
            .unwrap();
        run_aida2flat(&matches).unwrap();

        let histograms = read_flat_file(&output).unwrap();
        assert_eq!(histograms.len(), 2);
        assert_eq!(histograms[0].full_path(), "/REF/TEST_2011_S1234/d01-x01-y01");
        assert_eq!(histograms[0].num_bins(), 4);
    }

    #[rstest]
    fn test_run_aida2flat_split() {
        let tempdir = tempfile::tempdir().unwrap();
        let input = get_test_path("reference.aida");

        let matches = create_aida2flat_cli()
            .try_get_matches_from([
                "aida2flat",
                "--split",
                tempdir.path().to_str().unwrap(),
                input.to_str().unwrap(),
            ])
            .unwrap();
        run_aida2flat(&matches).unwrap();

        let path = tempdir.path().join("REF_TEST_2011_S1234_d02-x01-y01.dat");
        let histograms = read_flat_file(&path).unwrap();
        assert_eq!(histograms.len(), 1);
        assert_eq!(histograms[0].num_bins(), 2);
    }

    #[rstest]
    fn test_split_conflicts_with_output() {
        let result = create_aida2flat_cli().try_get_matches_from([
            "aida2flat",
            "--split",
            "dir",
            "-o",
            "out.dat",
            "in.aida",
        ]);
        assert!(result.is_err());
    }
}
