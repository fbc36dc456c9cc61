mod aida2flat;
mod chop;
mod flat2aida;

use std::io::Write;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "lighthisto";
    pub const BIN_NAME: &str = "lighthisto";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Chop bins out of histograms and convert between the AIDA and flat histogram formats.")
        .subcommand_required(true)
        // -V is taken by --verbose
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .long("version")
                .action(ArgAction::Version)
                .help("Print version"),
        )
        .arg(
            Arg::new("verbose")
                .short('V')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Print debug (very verbose) messages"),
        )
        .arg(
            Arg::new("quiet")
                .short('Q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .conflicts_with("verbose")
                .help("Be very quiet"),
        )
        .subcommand(chop::cli::create_chop_cli())
        .subcommand(aida2flat::cli::create_aida2flat_cli())
        .subcommand(flat2aida::cli::create_flat2aida_cli())
}

fn init_logging(matches: &ArgMatches) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if matches.get_flag("quiet") {
        builder.filter_level(LevelFilter::Warn);
    } else if matches.get_flag("verbose") {
        builder.filter_level(LevelFilter::Debug);
    }
    builder
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(&matches);

    match matches.subcommand() {
        //
        // CHOP
        //
        Some((chop::cli::CHOP_CMD, matches)) => {
            chop::handlers::run_chop(matches)?;
        }

        //
        // AIDA -> FLAT
        //
        Some((aida2flat::cli::AIDA2FLAT_CMD, matches)) => {
            aida2flat::handlers::run_aida2flat(matches)?;
        }

        //
        // FLAT -> AIDA
        //
        Some((flat2aida::cli::FLAT2AIDA_CMD, matches)) => {
            flat2aida::handlers::run_flat2aida(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    #[case(&["lighthisto", "-V", "chop", "in.aida"], true, false)]
    #[case(&["lighthisto", "chop", "--quiet", "in.aida"], false, true)]
    #[case(&["lighthisto", "flat2aida", "in.dat"], false, false)]
    fn test_global_verbosity_flags(
        #[case] argv: &[&str],
        #[case] verbose: bool,
        #[case] quiet: bool,
    ) {
        let matches = build_parser().try_get_matches_from(argv).unwrap();
        assert_eq!(matches.get_flag("verbose"), verbose);
        assert_eq!(matches.get_flag("quiet"), quiet);
    }

    #[rstest]
    fn test_verbose_and_quiet_conflict() {
        let result =
            build_parser().try_get_matches_from(["lighthisto", "-V", "-Q", "chop", "in.aida"]);
        assert!(result.is_err());
    }
}
