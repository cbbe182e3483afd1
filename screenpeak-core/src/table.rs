//! Ingestion of guide-wise count tables.
//!
//! The input is a tab-separated table with a header row carrying at least
//! `Coordinates`, `HS_reads` and `LS_reads` columns, in any order. Each
//! row is classified once (targeting / control / filler) from its
//! coordinate tag; filler constructs and rows with a non-positive count in
//! either bin are dropped before any downstream processing.

use std::io::BufRead;
use std::path::Path;

use log::{debug, info};

use crate::errors::GuideTableError;
use crate::models::guide::{classify_tag, GuideClass, GuideRecord};
use crate::utils::get_dynamic_reader;

const COORDINATES_COL: &str = "Coordinates";
const HIGH_BIN_COL: &str = "HS_reads";
const LOW_BIN_COL: &str = "LS_reads";

/// Row bookkeeping from one table read. Dropped-row tallies are reported,
/// not errors: missing guides are expected in real screens.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestStats {
    pub total_rows: usize,
    pub dropped_nonpositive: usize,
    pub dropped_filler: usize,
    pub controls: usize,
    pub targeting: usize,
}

/// Read a guide count table from disk.
///
/// # Arguments
/// - path: the TSV (optionally gzipped) to read
/// - use_offsets: derive regions of effect from the strand-specific offset
///   constants; if false, coordinate spans are taken verbatim
///
/// Malformed rows are fatal and identify the offending line; rows with a
/// non-positive count in either bin are dropped silently apart from the
/// returned tally.
pub fn read_guide_table(
    path: &Path,
    use_offsets: bool,
) -> Result<(Vec<GuideRecord>, IngestStats), GuideTableError> {
    let reader = get_dynamic_reader(path)
        .map_err(|e| GuideTableError::Io(std::io::Error::other(e.to_string())))?;
    let mut lines = reader.lines();

    let header = lines
        .next()
        .ok_or_else(|| GuideTableError::EmptyFile(path.display().to_string()))??;
    let columns = locate_columns(&header)?;

    let mut guides = Vec::new();
    let mut stats = IngestStats::default();

    for (i, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        // header is line 1
        let line_no = i + 2;
        stats.total_rows += 1;

        if let Some(guide) = parse_row(&line, line_no, &columns, use_offsets, &mut stats)? {
            guides.push(guide);
        }
    }

    if guides.is_empty() {
        return Err(GuideTableError::EmptyTable(path.display().to_string()));
    }

    info!(
        "read {} guides from {} ({} targeting, {} controls; dropped {} zero-count, {} filler)",
        guides.len(),
        path.display(),
        stats.targeting,
        stats.controls,
        stats.dropped_nonpositive,
        stats.dropped_filler,
    );

    Ok((guides, stats))
}

struct ColumnIndices {
    coordinates: usize,
    high_bin: usize,
    low_bin: usize,
    width: usize,
}

fn locate_columns(header: &str) -> Result<ColumnIndices, GuideTableError> {
    let names: Vec<&str> = header.trim_end().split('\t').collect();
    let find = |wanted: &'static str| {
        names
            .iter()
            .position(|n| *n == wanted)
            .ok_or(GuideTableError::MissingColumn(wanted))
    };
    Ok(ColumnIndices {
        coordinates: find(COORDINATES_COL)?,
        high_bin: find(HIGH_BIN_COL)?,
        low_bin: find(LOW_BIN_COL)?,
        width: names.len(),
    })
}

fn parse_row(
    line: &str,
    line_no: usize,
    columns: &ColumnIndices,
    use_offsets: bool,
    stats: &mut IngestStats,
) -> Result<Option<GuideRecord>, GuideTableError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < columns.width {
        return Err(GuideTableError::TruncatedRow {
            line: line_no,
            expected: columns.width,
            found: fields.len(),
        });
    }

    let tag = fields[columns.coordinates];
    let parse_count = |value: &str| -> Result<i64, GuideTableError> {
        value.trim().parse().map_err(|_| GuideTableError::BadCount {
            line: line_no,
            tag: tag.to_string(),
            value: value.to_string(),
        })
    };
    let high_reads = parse_count(fields[columns.high_bin])?;
    let low_reads = parse_count(fields[columns.low_bin])?;

    // Guides missing from either sorted library carry no usable signal.
    if high_reads <= 0 || low_reads <= 0 {
        stats.dropped_nonpositive += 1;
        debug!("line {}: dropping '{}' (non-positive count)", line_no, tag);
        return Ok(None);
    }
    let (low_reads, high_reads) = (low_reads as u32, high_reads as u32);

    match classify_tag(tag) {
        GuideClass::Filler => {
            stats.dropped_filler += 1;
            Ok(None)
        }
        GuideClass::Control => {
            stats.controls += 1;
            Ok(Some(GuideRecord::control(tag, low_reads, high_reads)))
        }
        GuideClass::Targeting => {
            stats.targeting += 1;
            let guide = GuideRecord::targeting(tag, low_reads, high_reads, use_offsets, line_no)?;
            Ok(Some(guide))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn write_table(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::with_suffix(".tsv").unwrap();
        write!(file, "{}", body).unwrap();
        file.flush().unwrap();
        file
    }

    #[rstest]
    fn test_reads_mixed_table() {
        let file = write_table(
            "Coordinates\tHS_reads\tLS_reads\n\
             chr1:10131-10151:+\t40\t80\n\
             NT-0001\t55\t50\n\
             FILLER-LV2_1\t10\t10\n\
             chr1:10900-10920:-\t0\t33\n",
        );
        let (guides, stats) = read_guide_table(file.path(), true).unwrap();
        assert_eq!(guides.len(), 2);
        assert_eq!(stats.targeting, 1);
        assert_eq!(stats.controls, 1);
        assert_eq!(stats.dropped_filler, 1);
        assert_eq!(stats.dropped_nonpositive, 1);
        assert!(guides[0].target.is_some());
        assert!(guides[1].is_control());
    }

    #[rstest]
    fn test_columns_located_by_name_in_any_order() {
        let file = write_table(
            "LS_reads\tCoordinates\tHS_reads\n\
             80\tchr1:10131-10151:+\t40\n",
        );
        let (guides, _) = read_guide_table(file.path(), true).unwrap();
        assert_eq!(guides[0].low_reads, 80);
        assert_eq!(guides[0].high_reads, 40);
    }

    #[rstest]
    fn test_missing_column_is_fatal() {
        let file = write_table("Coordinates\tHS_reads\nNT-1\t10\n");
        let err = read_guide_table(file.path(), true).unwrap_err();
        assert!(matches!(
            err,
            GuideTableError::MissingColumn("LS_reads")
        ));
    }

    #[rstest]
    fn test_bad_count_identifies_record() {
        let file = write_table(
            "Coordinates\tHS_reads\tLS_reads\n\
             chr1:100-120:+\tforty\t80\n",
        );
        let err = read_guide_table(file.path(), true).unwrap_err();
        match err {
            GuideTableError::BadCount { line, tag, .. } => {
                assert_eq!(line, 2);
                assert_eq!(tag, "chr1:100-120:+");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn test_bad_tag_identifies_record() {
        let file = write_table(
            "Coordinates\tHS_reads\tLS_reads\n\
             chr1:100-120:+\t40\t80\n\
             chr1_100_120\t40\t80\n",
        );
        let err = read_guide_table(file.path(), true).unwrap_err();
        assert!(matches!(
            err,
            GuideTableError::BadCoordinateTag { line: 3, .. }
        ));
    }

    #[rstest]
    fn test_all_rows_dropped_is_fatal() {
        let file = write_table(
            "Coordinates\tHS_reads\tLS_reads\n\
             NT-1\t0\t80\n",
        );
        let err = read_guide_table(file.path(), true).unwrap_err();
        assert!(matches!(err, GuideTableError::EmptyTable(_)));
    }
}
