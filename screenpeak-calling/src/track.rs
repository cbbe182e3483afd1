//! Guide-wise signal track construction.
//!
//! Summarizes normalized guide counts as a segmented track: between any
//! two consecutive breakpoints (the starts and ends of guide effect
//! regions) the covering guide set is constant, and the segment score is
//! the pooled `ln(sum(low) / sum(high))` over that set. Segments covered
//! by no guide are omitted, so the track is exactly the covered portion
//! of the genome.

use std::collections::BTreeMap;

use screenpeak_core::models::{GuideRecord, Region, TrackSegment};

/// Build the signal track for every chromosome with targeting guides.
///
/// With `median_shift`, the median guide-wise log-ratio across the whole
/// table (controls included) is subtracted from every segment score,
/// centering the track at zero for a typical guide.
pub fn build_track(guides: &[GuideRecord], median_shift: bool) -> Vec<TrackSegment> {
    let mut by_chrom: BTreeMap<&str, Vec<(&Region, u32, u32)>> = BTreeMap::new();
    for guide in guides {
        if let Some(target) = &guide.target {
            by_chrom
                .entry(target.chrom.as_str())
                .or_default()
                .push((target, guide.low_reads, guide.high_reads));
        }
    }

    let shift = if median_shift {
        median_log_ratio(guides)
    } else {
        0.0
    };

    let mut segments = Vec::new();
    for (chrom, chrom_guides) in &by_chrom {
        let mut breakpoints: Vec<u32> = chrom_guides
            .iter()
            .flat_map(|(r, _, _)| [r.start, r.end])
            .collect();
        breakpoints.sort_unstable();
        breakpoints.dedup();

        let mut pending: Option<(TrackSegment, Vec<usize>)> = None;
        for pair in breakpoints.windows(2) {
            let (seg_start, seg_end) = (pair[0], pair[1]);
            let covering: Vec<usize> = chrom_guides
                .iter()
                .enumerate()
                .filter(|(_, (r, _, _))| r.start <= seg_start && r.end >= seg_end)
                .map(|(i, _)| i)
                .collect();
            if covering.is_empty() {
                if let Some((done, _)) = pending.take() {
                    segments.push(done);
                }
                continue;
            }

            // extend the previous segment when the covering set is
            // unchanged (a guide starting and another ending on the same
            // breakpoint can leave the set identical)
            if let Some((ref mut seg, ref prev_covering)) = pending {
                if *prev_covering == covering && seg.end == seg_start {
                    seg.end = seg_end;
                    continue;
                }
            }
            if let Some((done, _)) = pending.take() {
                segments.push(done);
            }

            let low_sum: u64 = covering.iter().map(|&i| chrom_guides[i].1 as u64).sum();
            let high_sum: u64 = covering.iter().map(|&i| chrom_guides[i].2 as u64).sum();
            let score = (low_sum as f64 / high_sum as f64).ln() - shift;
            pending = Some((
                TrackSegment {
                    chrom: chrom.to_string(),
                    start: seg_start,
                    end: seg_end,
                    guide_count: covering.len() as u32,
                    score,
                },
                covering,
            ));
        }
        if let Some((done, _)) = pending.take() {
            segments.push(done);
        }
    }
    segments
}

/// Median of guide-wise `ln(low/high)` over every guide in the table.
fn median_log_ratio(guides: &[GuideRecord]) -> f64 {
    let mut ratios: Vec<f64> = guides.iter().map(|g| g.log_ratio()).collect();
    ratios.sort_by(|a, b| a.partial_cmp(b).expect("log ratios must be finite"));
    let n = ratios.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        ratios[n / 2]
    } else {
        (ratios[n / 2 - 1] + ratios[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use screenpeak_core::Strand;

    fn targeting(chrom: &str, start: u32, end: u32, low: u32, high: u32) -> GuideRecord {
        GuideRecord {
            tag: format!("{}:{}-{}:+", chrom, start, end),
            target: Some(Region::new(chrom, start, end)),
            strand: Strand::Plus,
            low_reads: low,
            high_reads: high,
        }
    }

    #[rstest]
    fn test_single_guide_single_segment() {
        let guides = vec![targeting("chr1", 100, 200, 150, 50)];
        let track = build_track(&guides, false);
        assert_eq!(track.len(), 1);
        assert_eq!((track[0].start, track[0].end), (100, 200));
        assert_eq!(track[0].guide_count, 1);
        assert!((track[0].score - 3.0f64.ln()).abs() < 1e-12);
    }

    #[rstest]
    fn test_overlapping_guides_pool_counts() {
        let guides = vec![
            targeting("chr1", 0, 100, 100, 100),
            targeting("chr1", 50, 150, 300, 100),
        ];
        let track = build_track(&guides, false);
        let spans: Vec<(u32, u32, u32)> = track
            .iter()
            .map(|s| (s.start, s.end, s.guide_count))
            .collect();
        assert_eq!(spans, vec![(0, 50, 1), (50, 100, 2), (100, 150, 1)]);
        // middle segment pools both guides: ln(400/200)
        assert!((track[1].score - 2.0f64.ln()).abs() < 1e-12);
    }

    #[rstest]
    fn test_segments_partition_covered_span() {
        let guides = vec![
            targeting("chr1", 0, 100, 10, 10),
            targeting("chr1", 200, 300, 10, 10),
        ];
        let track = build_track(&guides, false);
        assert_eq!(track.len(), 2);
        // the uncovered hole [100, 200) is absent
        assert_eq!((track[0].start, track[0].end), (0, 100));
        assert_eq!((track[1].start, track[1].end), (200, 300));
        // no overlaps between consecutive segments
        for pair in track.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[rstest]
    fn test_median_shift_centers_flat_track() {
        let guides = vec![
            targeting("chr1", 0, 100, 200, 100),
            targeting("chr1", 200, 300, 200, 100),
            GuideRecord::control("NT-1", 200, 100),
        ];
        let track = build_track(&guides, true);
        for segment in &track {
            assert!(segment.score.abs() < 1e-12);
        }
    }

    #[rstest]
    fn test_controls_do_not_produce_segments() {
        let guides = vec![GuideRecord::control("NT-1", 10, 10)];
        assert!(build_track(&guides, false).is_empty());
    }
}
