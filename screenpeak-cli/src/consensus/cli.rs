use clap::{Arg, ArgAction, Command};

pub const CONSENSUS_CMD: &str = "consensus";

pub fn create_consensus_cli() -> Command {
    Command::new(CONSENSUS_CMD)
        .about("Compute replicate-consensus peaks for one assay. Outputs scored BED6 (chrom, start, end, summit score, assay, strand).")
        .arg(
            Arg::new("peaks")
                .long("peaks")
                .required(true)
                .num_args(1..)
                .value_name("BED")
                .help("Per-replicate peak files from `call`, one per replicate, in replicate order"),
        )
        .arg(
            Arg::new("guides")
                .long("guides")
                .required(true)
                .value_name("GUIDES_TSV")
                .help("The guide count table the replicates were called from"),
        )
        .arg(
            Arg::new("assay")
                .long("assay")
                .required(true)
                .help("Assay label written to the output (e.g. the target gene symbol)"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .required(true)
                .value_name("OUT_BED")
                .help("Output scored BED file"),
        )
        .arg(
            Arg::new("min-guide-coverage")
                .long("min-guide-coverage")
                .default_value("1")
                .value_parser(clap::value_parser!(u32))
                .help("Minimum guide effect regions overlapping a consensus peak"),
        )
        .arg(
            Arg::new("min-width")
                .long("min-width")
                .default_value("100")
                .value_parser(clap::value_parser!(u32))
                .help("Discard per-replicate merged peaks no wider than this"),
        )
        .arg(
            Arg::new("keep-singletons")
                .long("keep-singletons")
                .action(ArgAction::SetTrue)
                .help("Keep peaks supported by a single replicate when only one replicate is given"),
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
                .help("Random seed for the count normalization behind summit scoring"),
        )
}
