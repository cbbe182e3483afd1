//! Interval algebra for genomic regions.
//!
//! All operations use 0-based half-open coordinates (BED convention) with
//! strict overlap semantics: touching endpoints do not overlap. Merging
//! coalesces overlapping *and* adjacent intervals, independently per
//! chromosome. These primitives back both window assignment in the calling
//! engine and the replicate consensus engine.

use std::collections::HashMap;

use crate::errors::IntervalError;
use crate::models::region::Region;

/// Strict half-open overlap of two bare spans. Works for any ordered
/// coordinate type, including the floating-point intervals compared by
/// the ROPE decision rule.
#[inline]
pub fn spans_overlap<T: PartialOrd>(a: (T, T), b: (T, T)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// True if `query` overlaps at least one member of `set`.
pub fn overlaps_any(query: &Region, set: &[Region]) -> bool {
    set.iter().any(|r| query.overlaps(r))
}

/// A merged interval annotated with how many inputs coalesced into it.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRegion {
    pub region: Region,
    pub count: u32,
}

/// Merge overlapping and adjacent regions, independently per chromosome,
/// recording how many inputs contributed to each output.
///
/// Input order does not matter; output is sorted by (chrom, start).
/// An empty input is an error: downstream code assumes every chromosome
/// group produced at least one interval, so an empty set here means a
/// bug upstream rather than "nothing to do".
pub fn merge_with_counts(regions: &[Region]) -> Result<Vec<MergedRegion>, IntervalError> {
    if regions.is_empty() {
        return Err(IntervalError::EmptyIntervalSet);
    }

    let mut sorted: Vec<&Region> = regions.iter().collect();
    sorted.sort_by(|a, b| a.chrom.cmp(&b.chrom).then_with(|| a.start.cmp(&b.start)));

    let mut merged: Vec<MergedRegion> = Vec::new();
    let mut current = MergedRegion {
        region: sorted[0].clone(),
        count: 1,
    };

    for r in &sorted[1..] {
        if r.chrom == current.region.chrom && r.start <= current.region.end {
            current.region.end = current.region.end.max(r.end);
            current.count += 1;
        } else {
            merged.push(current);
            current = MergedRegion {
                region: (*r).clone(),
                count: 1,
            };
        }
    }
    merged.push(current);

    Ok(merged)
}

/// Merge overlapping and adjacent regions, discarding the counts.
pub fn merge(regions: &[Region]) -> Result<Vec<Region>, IntervalError> {
    Ok(merge_with_counts(regions)?
        .into_iter()
        .map(|m| m.region)
        .collect())
}

/// Pairwise bounded intersections between two region sets.
///
/// For each chromosome present in both sets, every strictly overlapping
/// pair emits `[max(starts), min(ends))`. The shorter per-chromosome set
/// is scanned against the longer one sorted by start; correctness does
/// not depend on that choice, only the scan cost does.
pub fn intersect(set_a: &[Region], set_b: &[Region]) -> Vec<Region> {
    let mut by_chrom_a: HashMap<&str, Vec<&Region>> = HashMap::new();
    for r in set_a {
        by_chrom_a.entry(r.chrom.as_str()).or_default().push(r);
    }
    let mut by_chrom_b: HashMap<&str, Vec<&Region>> = HashMap::new();
    for r in set_b {
        by_chrom_b.entry(r.chrom.as_str()).or_default().push(r);
    }

    let mut shared: Vec<&str> = by_chrom_a
        .keys()
        .filter(|c| by_chrom_b.contains_key(**c))
        .copied()
        .collect();
    shared.sort_unstable();

    let mut output = Vec::new();
    for chrom in shared {
        let group_a = &by_chrom_a[chrom];
        let group_b = &by_chrom_b[chrom];
        let (shorter, longer) = if group_a.len() <= group_b.len() {
            (group_a, group_b)
        } else {
            (group_b, group_a)
        };

        let mut longer: Vec<&Region> = longer.to_vec();
        longer.sort_by_key(|r| r.start);
        let mut shorter: Vec<&Region> = shorter.to_vec();
        shorter.sort_by_key(|r| r.start);

        for s in &shorter {
            for l in &longer {
                if l.start >= s.end {
                    break;
                }
                if l.end > s.start {
                    output.push(Region::new(
                        chrom,
                        s.start.max(l.start),
                        s.end.min(l.end),
                    ));
                }
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn make_regions(triples: Vec<(&str, u32, u32)>) -> Vec<Region> {
        triples
            .into_iter()
            .map(|(c, s, e)| Region::new(c, s, e))
            .collect()
    }

    #[rstest]
    fn test_spans_overlap_strictness() {
        assert!(spans_overlap((0u32, 10), (5, 15)));
        assert!(!spans_overlap((0u32, 10), (10, 20)));
        assert!(spans_overlap((-0.693f64, 0.693), (0.5, 1.5)));
        assert!(!spans_overlap((-0.693f64, 0.693), (1.0, 1.5)));
    }

    #[rstest]
    fn test_merge_empty_input_fails_fast() {
        let result = merge_with_counts(&[]);
        assert!(matches!(result, Err(IntervalError::EmptyIntervalSet)));
    }

    #[rstest]
    fn test_merge_counts_contributions() {
        let regions = make_regions(vec![
            ("chr1", 2, 6),
            ("chr1", 4, 7),
            ("chr1", 5, 9),
            ("chr1", 7, 12),
            ("chr1", 20, 30),
        ]);
        let merged = merge_with_counts(&regions).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].region, Region::new("chr1", 2, 12));
        assert_eq!(merged[0].count, 4);
        assert_eq!(merged[1].count, 1);
    }

    #[rstest]
    fn test_merge_is_per_chromosome() {
        let regions = make_regions(vec![("chr1", 0, 10), ("chr2", 5, 15)]);
        let merged = merge(&regions).unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[rstest]
    fn test_merge_is_idempotent() {
        let regions = make_regions(vec![
            ("chr2", 100, 200),
            ("chr1", 0, 10),
            ("chr1", 5, 25),
            ("chr1", 25, 40),
        ]);
        let once = merge(&regions).unwrap();
        let twice = merge(&once).unwrap();
        assert_eq!(once, twice);
        // No information loss: union of spans is preserved
        assert_eq!(once[0], Region::new("chr1", 0, 40));
        assert_eq!(once[1], Region::new("chr2", 100, 200));
    }

    #[rstest]
    fn test_merge_unsorted_input() {
        let regions = make_regions(vec![("chr1", 50, 60), ("chr1", 0, 10), ("chr1", 55, 70)]);
        let merged = merge(&regions).unwrap();
        assert_eq!(
            merged,
            make_regions(vec![("chr1", 0, 10), ("chr1", 50, 70)])
        );
    }

    #[rstest]
    fn test_intersect_bounds_pairs() {
        let a = make_regions(vec![("chr1", 0, 10), ("chr1", 20, 30)]);
        let b = make_regions(vec![("chr1", 5, 25)]);
        let result = intersect(&a, &b);
        assert_eq!(
            result,
            make_regions(vec![("chr1", 5, 10), ("chr1", 20, 25)])
        );
    }

    #[rstest]
    fn test_intersect_skips_unshared_chromosomes() {
        let a = make_regions(vec![("chr1", 0, 10)]);
        let b = make_regions(vec![("chr2", 0, 10)]);
        assert!(intersect(&a, &b).is_empty());
    }

    #[rstest]
    fn test_intersect_is_strict_at_boundaries() {
        let a = make_regions(vec![("chr1", 0, 10)]);
        let b = make_regions(vec![("chr1", 10, 20)]);
        assert!(intersect(&a, &b).is_empty());
    }

    #[rstest]
    fn test_overlaps_any() {
        let set = make_regions(vec![("chr1", 0, 10), ("chr1", 20, 30)]);
        assert!(overlaps_any(&Region::new("chr1", 8, 12), &set));
        assert!(!overlaps_any(&Region::new("chr1", 10, 20), &set));
        assert!(!overlaps_any(&Region::new("chrX", 0, 100), &set));
    }
}
