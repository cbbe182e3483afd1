use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use rand::rngs::StdRng;
use rand::SeedableRng;

use screenpeak_calling::normalize::normalize_counts;
use screenpeak_calling::track::build_track;
use screenpeak_core::table::read_guide_table;

pub fn run_track(matches: &ArgMatches) -> Result<()> {
    let guide_path = matches.get_one::<String>("guides").expect("required");
    let output_path = matches.get_one::<String>("output").expect("required");
    let median_shift = matches.get_flag("median-shift");
    let use_offsets = !matches.get_flag("no-offsets");
    let seed = *matches.get_one::<u64>("seed").unwrap();

    let (mut guides, _) = read_guide_table(Path::new(guide_path), use_offsets)
        .with_context(|| format!("Failed to read guide table: {}", guide_path))?;

    let mut rng = StdRng::seed_from_u64(seed);
    normalize_counts(&mut guides, &mut rng);

    let track = build_track(&guides, median_shift);

    let mut out = BufWriter::new(
        File::create(Path::new(output_path))
            .with_context(|| format!("Failed to create output file: {}", output_path))?,
    );
    writeln!(out, "chrom\tstart\tend\tguide_count\tscore")?;
    for segment in &track {
        writeln!(out, "{}", segment.as_string())?;
    }
    eprintln!("{} track segments written to {}", track.len(), output_path);

    Ok(())
}
