use clap::{Arg, ArgAction, Command};

pub const TRACK_CMD: &str = "track";

pub fn create_track_cli() -> Command {
    Command::new(TRACK_CMD)
        .about("Summarize guide-wise counts as a segmented signal track. Outputs TSV: chrom, start, end, guide_count, score.")
        .arg(
            Arg::new("guides")
                .required(true)
                .value_name("GUIDES_TSV")
                .help("Guide-wise count table with Coordinates, HS_reads and LS_reads columns"),
        )
        .arg(
            Arg::new("output")
                .required(true)
                .value_name("OUT_TSV")
                .help("Output track file"),
        )
        .arg(
            Arg::new("median-shift")
                .long("median-shift")
                .short('m')
                .action(ArgAction::SetTrue)
                .help("Zero the median of guide-wise scores"),
        )
        .arg(
            Arg::new("no-offsets")
                .long("no-offsets")
                .action(ArgAction::SetTrue)
                .help("Use exact coordinates as the region of CRISPR activity"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .default_value("42")
                .value_parser(clap::value_parser!(u64))
                .help("Random seed for stochastic downsampling"),
        )
}
