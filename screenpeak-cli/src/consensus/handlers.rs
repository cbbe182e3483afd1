use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use rand::rngs::StdRng;
use rand::SeedableRng;

use screenpeak_calling::normalize::normalize_counts;
use screenpeak_calling::track::build_track;
use screenpeak_consensus::{
    filter_by_guide_coverage, replicate_consensus, score_by_summit, write_consensus_bed,
    ConsensusConfig, ReplicatePeaks,
};
use screenpeak_core::models::peak::read_peak_bed;
use screenpeak_core::table::read_guide_table;

pub fn run_consensus(matches: &ArgMatches) -> Result<()> {
    let peak_paths: Vec<&String> = matches
        .get_many::<String>("peaks")
        .expect("--peaks is required")
        .collect();
    let guide_path = matches.get_one::<String>("guides").expect("required");
    let assay = matches.get_one::<String>("assay").expect("required");
    let output_path = matches.get_one::<String>("output").expect("required");

    let config = ConsensusConfig {
        min_width: *matches.get_one::<u32>("min-width").unwrap(),
        keep_singletons: matches.get_flag("keep-singletons"),
        min_guide_coverage: *matches.get_one::<u32>("min-guide-coverage").unwrap(),
    };
    let use_offsets = !matches.get_flag("no-offsets");
    let seed = *matches.get_one::<u64>("seed").unwrap();

    // load each replicate's raw calls; replicate numbers follow file order
    let replicates: Vec<ReplicatePeaks> = peak_paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let calls = read_peak_bed(Path::new(path.as_str()))
                .with_context(|| format!("Failed to load peak file: {}", path))?;
            Ok(ReplicatePeaks::from_peak_calls(
                assay.clone(),
                i as u32 + 1,
                &calls,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let (mut guides, _) = read_guide_table(Path::new(guide_path), use_offsets)
        .with_context(|| format!("Failed to read guide table: {}", guide_path))?;

    eprintln!(
        "Computing consensus for {} across {} replicates...",
        assay,
        replicates.len(),
    );
    let peaks = replicate_consensus(&replicates, &config)?;
    let mut peaks = filter_by_guide_coverage(peaks, &guides, config.min_guide_coverage);

    // summit scores come from the normalized guide signal track
    let mut rng = StdRng::seed_from_u64(seed);
    normalize_counts(&mut guides, &mut rng);
    let track = build_track(&guides, false);
    score_by_summit(&mut peaks, &track);

    write_consensus_bed(Path::new(output_path), &peaks)
        .with_context(|| format!("Failed to create output file: {}", output_path))?;
    eprintln!("{} consensus peaks written to {}", peaks.len(), output_path);

    Ok(())
}
