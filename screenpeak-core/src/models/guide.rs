use std::fmt::{self, Display};

use crate::errors::GuideTableError;
use crate::models::region::Region;

/// Offsets applied around the anchor nucleotide of a `+` strand guide to
/// obtain its region of CRISPRi effect: `[anchor - 152, anchor + 147)`.
pub const PLUS_OFFSETS: (u32, u32) = (152, 147);

/// Offsets applied around the anchor nucleotide of a `-` strand guide:
/// `[anchor - 146, anchor + 153)`.
pub const MINUS_OFFSETS: (u32, u32) = (146, 153);

/// Tag substrings marking non-targeting control guides.
const CONTROL_MARKERS: [&str; 2] = ["NT", "CTRL"];

/// Tag substrings marking filler constructs. Fillers are neither controls
/// nor targeting guides and are excluded from every fit.
const FILLER_MARKERS: [&str; 2] = ["FILLER-LV2", "FILLER-SgO"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Plus,
    Minus,
    Unstranded,
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Strand::Plus => "+",
            Strand::Minus => "-",
            Strand::Unstranded => ".",
        };
        write!(f, "{}", symbol)
    }
}

/// Classification of a guide by its coordinate tag, decided once at
/// ingestion. Downstream code never re-inspects the tag string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideClass {
    Targeting,
    Control,
    Filler,
}

/// Classify a coordinate tag. Control markers win over the coordinate
/// format: a tag like `NT-0421` is a control even though it parses as
/// nothing else.
pub fn classify_tag(tag: &str) -> GuideClass {
    if CONTROL_MARKERS.iter().any(|m| tag.contains(m)) {
        GuideClass::Control
    } else if FILLER_MARKERS.iter().any(|m| tag.contains(m)) {
        GuideClass::Filler
    } else {
        GuideClass::Targeting
    }
}

///
/// One guide RNA with its paired sort-bin read counts.
///
/// `target` is the guide's region of effect on the genome; `None` marks a
/// non-targeting control. Records are immutable after construction except
/// for the two read-count fields, which the count normalizer updates
/// exactly once.
///
#[derive(Debug, Clone, PartialEq)]
pub struct GuideRecord {
    /// Original coordinate tag, kept for display and provenance only.
    pub tag: String,
    pub target: Option<Region>,
    pub strand: Strand,
    /// Reads observed in the low-signal sort bin (`LS_reads`).
    pub low_reads: u32,
    /// Reads observed in the high-signal sort bin (`HS_reads`).
    pub high_reads: u32,
}

impl GuideRecord {
    /// Build a control (non-targeting) guide record.
    pub fn control(tag: impl Into<String>, low_reads: u32, high_reads: u32) -> Self {
        GuideRecord {
            tag: tag.into(),
            target: None,
            strand: Strand::Unstranded,
            low_reads,
            high_reads,
        }
    }

    /// Build a targeting guide record from its coordinate tag.
    ///
    /// With `use_offsets`, the region of effect is derived from the anchor
    /// nucleotide (the end coordinate of the tag's span) using the
    /// strand-specific offset constants; otherwise the tag's raw span is
    /// used verbatim.
    pub fn targeting(
        tag: impl Into<String>,
        low_reads: u32,
        high_reads: u32,
        use_offsets: bool,
        line: usize,
    ) -> Result<Self, GuideTableError> {
        let tag = tag.into();
        let (chrom, span_start, span_end, strand) = parse_coordinate_tag(&tag, line)?;
        let target = effect_region(chrom, span_start, span_end, strand, use_offsets);
        Ok(GuideRecord {
            tag,
            target: Some(target),
            strand,
            low_reads,
            high_reads,
        })
    }

    pub fn is_control(&self) -> bool {
        self.target.is_none()
    }

    /// Combined depth of both sort bins.
    pub fn total_reads(&self) -> u32 {
        self.low_reads + self.high_reads
    }

    /// `ln(low / high)`, the guide-wise activity log-odds. Only valid
    /// after normalization has made both counts strictly positive.
    pub fn log_ratio(&self) -> f64 {
        (self.low_reads as f64 / self.high_reads as f64).ln()
    }
}

/// Parse a coordinate tag of the form `chr1:10131-10151:+`.
fn parse_coordinate_tag(
    tag: &str,
    line: usize,
) -> Result<(String, u32, u32, Strand), GuideTableError> {
    let bad_tag = || GuideTableError::BadCoordinateTag {
        line,
        tag: tag.to_string(),
    };

    let mut fields = tag.split(':');
    let chrom = fields.next().ok_or_else(bad_tag)?;
    let span = fields.next().ok_or_else(bad_tag)?;
    let strand = match fields.next() {
        Some("+") => Strand::Plus,
        Some("-") => Strand::Minus,
        _ => return Err(bad_tag()),
    };
    if fields.next().is_some() || chrom.is_empty() {
        return Err(bad_tag());
    }

    let (start, end) = span.split_once('-').ok_or_else(bad_tag)?;
    let start: u32 = start.parse().map_err(|_| bad_tag())?;
    let end: u32 = end.parse().map_err(|_| bad_tag())?;
    if start >= end {
        return Err(bad_tag());
    }

    Ok((chrom.to_string(), start, end, strand))
}

/// Derive the region of CRISPRi effect for a targeting guide.
///
/// The anchor nucleotide is the end coordinate of the protospacer span;
/// the effect region extends asymmetrically around it depending on strand.
/// Coordinates saturate at zero near the chromosome start.
fn effect_region(
    chrom: String,
    span_start: u32,
    span_end: u32,
    strand: Strand,
    use_offsets: bool,
) -> Region {
    if !use_offsets {
        return Region {
            chrom,
            start: span_start,
            end: span_end,
        };
    }
    let anchor = span_end;
    let (upstream, downstream) = match strand {
        Strand::Minus => MINUS_OFFSETS,
        _ => PLUS_OFFSETS,
    };
    Region {
        chrom,
        start: anchor.saturating_sub(upstream),
        end: anchor + downstream,
    }
}
