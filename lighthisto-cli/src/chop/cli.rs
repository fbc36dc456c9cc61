use clap::{Arg, ArgAction, Command, arg};

pub const CHOP_CMD: &str = "chop";
pub const DEFAULT_OUTDIR: &str = ".";

pub fn create_chop_cli() -> Command {
    Command::new(CHOP_CMD)
        .about("Strip bins from AIDA histograms. Histograms without a bin range are passed through unchanged.")
        .long_about(
            "Strip bins from AIDA histograms. Histograms without a bin range are passed through \
             unchanged. Bins to keep are given as `AIDAPATH:start:stop`, where start and stop are \
             x values contained in the first and last kept bins; either may be left empty. \
             Each input FILE is written to OUTDIR as `<name>-chop<ext>`.",
        )
        .arg(
            Arg::new("bins")
                .short('b')
                .long("bins")
                .value_name("AIDAPATH:start:stop")
                .action(ArgAction::Append)
                .help("Histogram and bin range to keep (repeatable, overrides --config)"),
        )
        .arg(
            arg!(--config <CONFIG> "TOML file with [[bins]] path/start/stop entries")
                .required(false),
        )
        .arg(
            arg!(-o --out <OUTDIR> "Output directory")
                .required(false)
                .default_value(DEFAULT_OUTDIR),
        )
        .arg(
            Arg::new("files")
                .value_name("AIDAFILE")
                .num_args(1..)
                .required(true)
                .help("AIDA histogram files to chop"),
        )
}
