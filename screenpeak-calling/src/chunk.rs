//! Partition of the window index range into independent jobs.

use crate::errors::ConfigError;

/// A job's slice of 1-based window indices: `start..end`, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowChunk {
    pub start: usize,
    pub end: usize,
}

impl WindowChunk {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Compute job `job_index`'s contiguous slice of windows.
///
/// `chunk_size = ceil(max_window_index / job_range)`; job `k` covers
/// `[1 + k * chunk_size, min(max_window_index + 1, 1 + (k+1) * chunk_size))`.
/// Concatenating all jobs' outputs in job order reconstructs the full
/// ordered window list, each index covered exactly once. Trailing jobs may
/// be empty when the division is uneven.
pub fn chunk_windows(
    max_window_index: usize,
    job_range: usize,
    job_index: usize,
) -> Result<WindowChunk, ConfigError> {
    if job_range == 0 {
        return Err(ConfigError::ZeroJobRange);
    }
    if job_index >= job_range {
        return Err(ConfigError::JobIndexOutOfRange {
            index: job_index,
            range: job_range,
        });
    }

    let chunk_size = max_window_index.div_ceil(job_range);
    let start = (1 + job_index * chunk_size).min(max_window_index + 1);
    let end = (start + chunk_size).min(max_window_index + 1);
    Ok(WindowChunk { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_uneven_division_clips_last_chunk() {
        let chunks: Vec<WindowChunk> = (0..5)
            .map(|k| chunk_windows(23, 5, k).unwrap())
            .collect();
        let spans: Vec<(usize, usize)> = chunks.iter().map(|c| (c.start, c.end)).collect();
        assert_eq!(spans, vec![(1, 6), (6, 11), (11, 16), (16, 21), (21, 24)]);
    }

    #[rstest]
    fn test_chunks_cover_every_index_exactly_once() {
        for (max, jobs) in [(23usize, 5usize), (10, 1), (7, 7), (100, 9), (3, 5)] {
            let mut seen = Vec::new();
            for k in 0..jobs {
                seen.extend(chunk_windows(max, jobs, k).unwrap().indices());
            }
            let expected: Vec<usize> = (1..=max).collect();
            assert_eq!(seen, expected, "max={} jobs={}", max, jobs);
        }
    }

    #[rstest]
    fn test_single_job_takes_everything() {
        let chunk = chunk_windows(10, 1, 0).unwrap();
        assert_eq!((chunk.start, chunk.end), (1, 11));
        assert_eq!(chunk.len(), 10);
    }

    #[rstest]
    fn test_excess_jobs_are_empty() {
        let chunk = chunk_windows(3, 5, 4).unwrap();
        assert!(chunk.is_empty());
    }

    #[rstest]
    fn test_bad_job_parameters() {
        assert_eq!(chunk_windows(10, 0, 0), Err(ConfigError::ZeroJobRange));
        assert_eq!(
            chunk_windows(10, 3, 3),
            Err(ConfigError::JobIndexOutOfRange { index: 3, range: 3 })
        );
    }
}
