use clap::{Arg, Command, arg};

pub const FLAT2AIDA_CMD: &str = "flat2aida";

pub fn create_flat2aida_cli() -> Command {
    Command::new(FLAT2AIDA_CMD)
        .about("Convert flat histogram files to a single AIDA document.")
        .arg(arg!(-o --output <OUTPUT> "Output file (default: stdout)").required(false))
        .arg(
            Arg::new("files")
                .value_name("FLATFILE")
                .num_args(1..)
                .required(true)
                .help("Flat histogram files to convert"),
        )
}
