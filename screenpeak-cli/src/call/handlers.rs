use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use screenpeak_calling::{call_peaks, CallConfig, MomentScope, SamplerConfig};
use screenpeak_core::models::peak::write_peak_bed;
use screenpeak_core::table::read_guide_table;

pub fn run_call(matches: &ArgMatches) -> Result<()> {
    let guide_path = matches.get_one::<String>("guides").expect("required");
    let output_path = matches.get_one::<String>("output").expect("required");
    let seed = *matches.get_one::<u64>("seed").unwrap();

    let config = CallConfig {
        window_size: *matches.get_one::<u32>("window-size").unwrap(),
        step_size: *matches.get_one::<u32>("step-size").unwrap(),
        rope_threshold: *matches.get_one::<f64>("rope-threshold").unwrap(),
        job_index: *matches.get_one::<usize>("job-index").unwrap(),
        job_range: *matches.get_one::<usize>("job-range").unwrap(),
        use_offsets: !matches.get_flag("no-offsets"),
        moment_scope: if matches.get_flag("per-fit-moments") {
            MomentScope::PerFit
        } else {
            MomentScope::Global
        },
        seed,
        sampler: SamplerConfig {
            draws: *matches.get_one::<usize>("draws").unwrap(),
            warmup: *matches.get_one::<usize>("warmup").unwrap(),
            chains: *matches.get_one::<usize>("chains").unwrap(),
            seed,
        },
        ..Default::default()
    };
    // surface bad parameters before touching any input
    config.validate()?;

    let (guides, stats) = read_guide_table(Path::new(guide_path), config.use_offsets)
        .with_context(|| format!("Failed to read guide table: {}", guide_path))?;
    eprintln!(
        "{} guides loaded ({} targeting, {} controls)",
        guides.len(),
        stats.targeting,
        stats.controls,
    );

    let calls = call_peaks(guides, &config)?;
    let peaks_found = calls.iter().filter(|c| c.is_peak).count();

    write_peak_bed(Path::new(output_path), &calls)
        .with_context(|| format!("Failed to write output file: {}", output_path))?;
    eprintln!(
        "{} windows processed, {} peaks called; output written to {}",
        calls.len(),
        peaks_found,
        output_path,
    );

    Ok(())
}
