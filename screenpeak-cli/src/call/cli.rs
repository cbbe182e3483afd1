use clap::{Arg, ArgAction, Command};

pub const CALL_CMD: &str = "call";

pub fn create_call_cli() -> Command {
    Command::new(CALL_CMD)
        .about("Call peaks over CRISPRi screen windows. Outputs BED-like rows: chrom, start, end, credible interval, is_peak, strand.")
        .arg(
            Arg::new("guides")
                .required(true)
                .value_name("GUIDES_TSV")
                .help("Guide-wise count table with Coordinates, HS_reads and LS_reads columns"),
        )
        .arg(
            Arg::new("output")
                .required(true)
                .value_name("OUT_BED")
                .help("Output peak BED file"),
        )
        .arg(
            Arg::new("window-size")
                .long("window-size")
                .short('w')
                .default_value("100")
                .value_parser(clap::value_parser!(u32))
                .help("Window size for peak calling"),
        )
        .arg(
            Arg::new("step-size")
                .long("step-size")
                .short('s')
                .default_value("100")
                .value_parser(clap::value_parser!(u32))
                .help("Step size for peak calling; must not exceed the window size"),
        )
        .arg(
            Arg::new("rope-threshold")
                .long("rope-threshold")
                .short('r')
                .default_value("0.693")
                .value_parser(clap::value_parser!(f64))
                .help("ROPE half-width for peak calls, on the log fold-change scale"),
        )
        .arg(
            Arg::new("job-index")
                .long("job-index")
                .default_value("0")
                .value_parser(clap::value_parser!(usize))
                .help("Job chunk index. 0 <= job_index < job_range"),
        )
        .arg(
            Arg::new("job-range")
                .long("job-range")
                .default_value("1")
                .value_parser(clap::value_parser!(usize))
                .help("Number of chunks that peak calling will be split into"),
        )
        .arg(
            Arg::new("no-offsets")
                .long("no-offsets")
                .action(ArgAction::SetTrue)
                .help("Use exact coordinates as the region of CRISPR activity. Use if Coordinates are exactly the region of effect"),
        )
        .arg(
            Arg::new("per-fit-moments")
                .long("per-fit-moments")
                .action(ArgAction::SetTrue)
                .help("Derive empirical priors from each window's two-group subset instead of the whole run"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .default_value("42")
                .value_parser(clap::value_parser!(u64))
                .help("Random seed for stochastic downsampling and the sampler"),
        )
        .arg(
            Arg::new("draws")
                .long("draws")
                .default_value("1000")
                .value_parser(clap::value_parser!(usize))
                .help("Posterior draws kept per chain"),
        )
        .arg(
            Arg::new("warmup")
                .long("warmup")
                .default_value("1000")
                .value_parser(clap::value_parser!(usize))
                .help("Warm-up sweeps discarded per chain"),
        )
        .arg(
            Arg::new("chains")
                .long("chains")
                .default_value("4")
                .value_parser(clap::value_parser!(usize))
                .help("Independent sampler chains per window"),
        )
}
