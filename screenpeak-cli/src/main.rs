mod call;
mod consensus;
mod track;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "screenpeak";
    pub const BIN_NAME: &str = "screenpeak";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Call statistically significant regulatory peaks from CRISPRi flow-sorting screen data, and build replicate-consensus peak sets.")
        .subcommand_required(true)
        .subcommand(call::cli::create_call_cli())
        .subcommand(consensus::cli::create_consensus_cli())
        .subcommand(track::cli::create_track_cli())
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // PEAK CALLING
        //
        Some((call::cli::CALL_CMD, matches)) => {
            call::handlers::run_call(matches)?;
        }

        //
        // REPLICATE CONSENSUS
        //
        Some((consensus::cli::CONSENSUS_CMD, matches)) => {
            consensus::handlers::run_consensus(matches)?;
        }

        //
        // GUIDE SIGNAL TRACK
        //
        Some((track::cli::TRACK_CMD, matches)) => {
            track::handlers::run_track(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
