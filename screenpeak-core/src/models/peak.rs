use std::fmt::{self, Display};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::PeakIoError;
use crate::models::region::Region;
use crate::utils::read_lines;

/// Bounds of a highest-density credible region for the enhancer boost
/// parameter, at a fixed mass level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CredibleInterval {
    pub low: f64,
    pub high: f64,
}

///
/// One peak call: a window, the credible interval of its enhancer boost,
/// and the boolean decision. Serialized as a six-column BED-like row:
///
/// `chrom  start  end  low,high  is_peak  .`
///
#[derive(Debug, Clone, PartialEq)]
pub struct PeakCall {
    pub region: Region,
    pub interval: CredibleInterval,
    pub is_peak: bool,
}

impl PeakCall {
    ///
    /// Get BED-like row of the peak call
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}\t{:.6},{:.6}\t{}\t.",
            self.region.chrom,
            self.region.start,
            self.region.end,
            self.interval.low,
            self.interval.high,
            self.is_peak,
        )
    }

    /// Parse one peak row written by [`PeakCall::as_string`]. Accepts
    /// Python-style capitalized booleans for compatibility with older
    /// peak files.
    pub fn from_bed_row(row: &str, line: usize) -> Result<Self, PeakIoError> {
        let malformed = |reason: &str| PeakIoError::Malformed {
            line,
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = row.trim_end().split('\t').collect();
        if fields.len() < 5 {
            return Err(malformed("expected at least 5 tab-separated columns"));
        }

        let start: u32 = fields[1]
            .parse()
            .map_err(|_| malformed("bad start coordinate"))?;
        let end: u32 = fields[2]
            .parse()
            .map_err(|_| malformed("bad end coordinate"))?;
        if start >= end {
            return Err(malformed("start must be less than end"));
        }

        let (low, high) = fields[3]
            .split_once(',')
            .ok_or_else(|| malformed("credible interval must be 'low,high'"))?;
        let low: f64 = low
            .trim_start_matches('[')
            .trim()
            .parse()
            .map_err(|_| malformed("bad credible interval low bound"))?;
        let high: f64 = high
            .trim_end_matches(']')
            .trim()
            .parse()
            .map_err(|_| malformed("bad credible interval high bound"))?;

        let is_peak = match fields[4].to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => return Err(malformed("is_peak must be true or false")),
        };

        Ok(PeakCall {
            region: Region::new(fields[0], start, end),
            interval: CredibleInterval { low, high },
            is_peak,
        })
    }
}

impl Display for PeakCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// Read a peak BED file (possibly gzipped), one [`PeakCall`] per row.
pub fn read_peak_bed(path: &Path) -> Result<Vec<PeakCall>, PeakIoError> {
    let rows = read_lines(path)
        .map_err(|e| PeakIoError::Io(std::io::Error::other(e.to_string())))?;
    let mut peaks = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        peaks.push(PeakCall::from_bed_row(row, i + 1)?);
    }
    if peaks.is_empty() {
        return Err(PeakIoError::EmptyPeakFile(path.display().to_string()));
    }
    Ok(peaks)
}

/// Write peak calls to disk as a headerless BED-like file.
pub fn write_peak_bed(path: &Path, peaks: &[PeakCall]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for peak in peaks {
        writeln!(out, "{}", peak.as_string())?;
    }
    Ok(())
}
