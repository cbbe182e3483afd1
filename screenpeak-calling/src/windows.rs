//! Construction of candidate windows from guide target positions.

use std::collections::BTreeMap;

use screenpeak_core::algebra::overlaps_any;
use screenpeak_core::models::{GuideRecord, Region, Window};

/// Build the sliding-window set over every chromosome with targeting
/// guides.
///
/// For each chromosome, windows start at the leftmost guide target
/// position and advance by `step_size` until they reach the rightmost
/// target end; window ends are clipped to that rightmost end. Windows
/// overlapping no guide target (possible when guide density is uneven)
/// are discarded before indexing, so indices are dense. Output order,
/// and therefore the 1-based window index, is chromosome-lexicographic,
/// then positional, and fully reproducible.
pub fn build_windows(guides: &[GuideRecord], window_size: u32, step_size: u32) -> Vec<Window> {
    // Per-chromosome target regions. BTreeMap keeps chromosome order
    // deterministic.
    let mut targets: BTreeMap<&str, Vec<Region>> = BTreeMap::new();
    for guide in guides {
        if let Some(target) = &guide.target {
            targets
                .entry(target.chrom.as_str())
                .or_default()
                .push(target.clone());
        }
    }

    let mut windows = Vec::new();
    let mut index = 0;
    for (chrom, regions) in &targets {
        let lo = regions.iter().map(|r| r.start).min().unwrap();
        let hi = regions.iter().map(|r| r.end).max().unwrap();

        let mut start = lo;
        while start < hi {
            let end = (start + window_size).min(hi);
            let candidate = Region::new(*chrom, start, end);
            if overlaps_any(&candidate, regions) {
                index += 1;
                windows.push(Window::new(candidate, index));
            }
            start += step_size;
        }
    }
    windows
}
