//! Replicate consensus for peak calls.
//!
//! Given per-replicate peak sets grouped by assay, a peak survives when it
//! recurs: each replicate's passing peaks are merged independently, every
//! replicate's merged intervals are pooled and re-merged with contribution
//! counts, and only intervals supported by more than one replicate are
//! kept. Assays with a single replicate are dropped unless singletons are
//! explicitly allowed. Surviving peaks can then be filtered by guide
//! coverage and scored by the signal-track summit inside them.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use log::{info, warn};

use screenpeak_core::algebra::{intersect, merge, merge_with_counts};
use screenpeak_core::models::{GuideRecord, PeakCall, Region, TrackSegment};

/// One replicate's passing peaks, tagged with provenance.
#[derive(Debug, Clone)]
pub struct ReplicatePeaks {
    pub assay: String,
    pub replicate: u32,
    pub regions: Vec<Region>,
}

impl ReplicatePeaks {
    /// Keep only the passing calls from a raw peak file.
    pub fn from_peak_calls(
        assay: impl Into<String>,
        replicate: u32,
        calls: &[PeakCall],
    ) -> Self {
        ReplicatePeaks {
            assay: assay.into(),
            replicate,
            regions: calls
                .iter()
                .filter(|c| c.is_peak)
                .map(|c| c.region.clone())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsensusConfig {
    /// Merged per-replicate peaks no wider than this are discarded before
    /// support counting.
    pub min_width: u32,
    /// Keep assays with exactly one replicate (their peaks get support 1).
    pub keep_singletons: bool,
    /// Minimum number of guide effect regions that must overlap a
    /// consensus peak for it to be reported.
    pub min_guide_coverage: u32,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        ConsensusConfig {
            min_width: 100,
            keep_singletons: false,
            min_guide_coverage: 1,
        }
    }
}

/// A consensus peak with its replicate support and optional summit score.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusPeak {
    pub assay: String,
    pub region: Region,
    pub support: u32,
    pub score: Option<f64>,
}

impl ConsensusPeak {
    ///
    /// Get scored BED row of the peak
    ///
    pub fn as_string(&self) -> String {
        let score = match self.score {
            Some(s) => format!("{:.6}", s),
            None => "nan".to_string(),
        };
        format!(
            "{}\t{}\t{}\t{}\t{}\t.",
            self.region.chrom, self.region.start, self.region.end, score, self.assay,
        )
    }
}

/// Compute assay-level consensus peaks across replicates.
///
/// Output is ordered by assay, then (chrom, start). Replicates with no
/// passing peaks contribute nothing but still count toward the
/// replicate tally of their assay.
pub fn replicate_consensus(
    replicates: &[ReplicatePeaks],
    config: &ConsensusConfig,
) -> Result<Vec<ConsensusPeak>> {
    let mut by_assay: BTreeMap<&str, Vec<&ReplicatePeaks>> = BTreeMap::new();
    for replicate in replicates {
        by_assay
            .entry(replicate.assay.as_str())
            .or_default()
            .push(replicate);
    }

    let mut consensus = Vec::new();
    for (assay, assay_replicates) in &by_assay {
        if assay_replicates.len() < 2 && !config.keep_singletons {
            warn!(
                "assay {} has {} replicate(s); dropping (pass --keep-singletons to keep)",
                assay,
                assay_replicates.len(),
            );
            continue;
        }
        let support_needed: u32 = if assay_replicates.len() > 1 { 2 } else { 1 };

        // merge within each replicate first so a replicate with several
        // abutting windows contributes one interval, not many
        let mut pooled: Vec<Region> = Vec::new();
        for replicate in assay_replicates {
            if replicate.regions.is_empty() {
                warn!(
                    "assay {} replicate {} has no passing peaks",
                    assay, replicate.replicate,
                );
                continue;
            }
            let merged = merge(&replicate.regions)?;
            pooled.extend(
                merged
                    .into_iter()
                    .filter(|r| r.width() > config.min_width),
            );
        }
        if pooled.is_empty() {
            continue;
        }

        let counted = merge_with_counts(&pooled)?;
        consensus.extend(
            counted
                .into_iter()
                .filter(|m| m.count >= support_needed)
                .map(|m| ConsensusPeak {
                    assay: assay.to_string(),
                    region: m.region,
                    support: m.count,
                    score: None,
                }),
        );
    }

    info!("{} consensus peaks across {} assays", consensus.len(), by_assay.len());
    Ok(consensus)
}

/// Drop consensus peaks overlapped by fewer than `min_coverage` guide
/// effect regions.
pub fn filter_by_guide_coverage(
    peaks: Vec<ConsensusPeak>,
    guides: &[GuideRecord],
    min_coverage: u32,
) -> Vec<ConsensusPeak> {
    let guide_regions: Vec<Region> = guides
        .iter()
        .filter_map(|g| g.target.clone())
        .collect();

    peaks
        .into_iter()
        .filter(|peak| {
            let hits = intersect(std::slice::from_ref(&peak.region), &guide_regions);
            hits.len() as u32 >= min_coverage
        })
        .collect()
}

/// Attach the signal-track summit to each peak: the overlapping segment
/// score of largest magnitude, sign preserved.
pub fn score_by_summit(peaks: &mut [ConsensusPeak], track: &[TrackSegment]) {
    for peak in peaks.iter_mut() {
        let mut summit: Option<f64> = None;
        for segment in track {
            let segment_region = Region::new(&*segment.chrom, segment.start, segment.end);
            if !peak.region.overlaps(&segment_region) {
                continue;
            }
            if summit.map(|s| segment.score.abs() > s.abs()).unwrap_or(true) {
                summit = Some(segment.score);
            }
        }
        peak.score = summit;
    }
}

/// Write consensus peaks as a scored BED file:
/// `chrom  start  end  score  assay  strand`.
pub fn write_consensus_bed(path: &Path, peaks: &[ConsensusPeak]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for peak in peaks {
        writeln!(out, "{}", peak.as_string())?;
    }
    Ok(())
}
