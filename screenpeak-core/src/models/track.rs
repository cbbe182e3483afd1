use std::fmt::{self, Display};

/// One segment of the guide signal track: a maximal span covered by a
/// constant set of guide effect regions, scored by the pooled
/// `ln(sum(low) / sum(high))` of the covering guides.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSegment {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
    pub guide_count: u32,
    pub score: f64,
}

impl TrackSegment {
    ///
    /// Get TSV row of the segment
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.chrom, self.start, self.end, self.guide_count, self.score
        )
    }
}

impl Display for TrackSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
