use clap::{Arg, ArgAction, Command, arg};

pub const AIDA2FLAT_CMD: &str = "aida2flat";

pub fn create_aida2flat_cli() -> Command {
    Command::new(AIDA2FLAT_CMD)
        .about("Convert AIDA histogram files to the flat text format.")
        .arg(
            Arg::new("gnuplot")
                .long("gnuplot")
                .action(ArgAction::SetTrue)
                .help("Write `xval yval xlow xhigh ylow yhigh` rows for plotting with gnuplot"),
        )
        .arg(arg!(-o --output <OUTPUT> "Output file (default: stdout)").required(false))
        .arg(
            arg!(--split <DIR> "Write one file per histogram, with a plot header, into DIR")
                .required(false)
                .conflicts_with("output"),
        )
        .arg(
            Arg::new("files")
                .value_name("AIDAFILE")
                .num_args(1..)
                .required(true)
                .help("AIDA histogram files to convert"),
        )
}
