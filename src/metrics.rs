//! File and cube metrics reported by the I/O collaborator

use crate::types::{SampleFormat, Sorting};
use crate::utils::format_bytes;
use serde::{Deserialize, Serialize};

/// Size of the textual file header
pub const TEXT_HEADER_SIZE: usize = 3200;

/// Size of the binary file header
pub const BINARY_HEADER_SIZE: usize = 400;

/// Size of a trace header
pub const TRACE_HEADER_SIZE: usize = 240;

/// Byte position of the first binary header field
pub const BINARY_HEADER_BASE: u16 = 3201;

/// Basic layout of a trace file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetrics {
    /// Sample encoding
    pub format: SampleFormat,

    /// Number of traces in the file
    pub tracecount: usize,

    /// Samples per trace
    pub sample_count: usize,

    /// Number of extended textual headers
    pub ext_headers: usize,
}

impl FileMetrics {
    pub fn new(format: SampleFormat, tracecount: usize, sample_count: usize) -> Self {
        Self {
            format,
            tracecount,
            sample_count,
            ext_headers: 0,
        }
    }

    /// Set the number of extended textual headers
    pub fn with_ext_headers(mut self, ext_headers: usize) -> Self {
        self.ext_headers = ext_headers;
        self
    }

    /// Size in bytes of the sample block of one trace
    pub fn trace_bsize(&self) -> usize {
        self.sample_count * self.format.size_in_bytes()
    }

    /// Byte position of the first trace header
    pub fn data_start(&self) -> u64 {
        (TEXT_HEADER_SIZE + BINARY_HEADER_SIZE + self.ext_headers * TEXT_HEADER_SIZE) as u64
    }

    /// Byte position of trace `index`
    pub fn trace_position(&self, index: usize) -> u64 {
        self.data_start() + (index * (TRACE_HEADER_SIZE + self.trace_bsize())) as u64
    }

    /// Total size of the file in bytes
    pub fn file_size(&self) -> u64 {
        self.trace_position(self.tracecount)
    }

    /// Get a summary string of the file layout
    pub fn summary(&self) -> String {
        format!(
            "{} traces x {} samples ({}), {} on disk",
            self.tracecount,
            self.sample_count,
            self.format,
            format_bytes(self.file_size() as usize)
        )
    }
}

/// Cube shape inferred from the trace headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeMetrics {
    pub sorting: Sorting,
    pub iline_count: usize,
    pub xline_count: usize,
    pub offset_count: usize,
}

impl CubeMetrics {
    /// Number of traces implied by the shape
    pub fn tracecount(&self) -> usize {
        self.iline_count * self.xline_count * self.offset_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_positions() {
        let metrics = FileMetrics::new(SampleFormat::IeeeFloat32, 10, 50);
        assert_eq!(metrics.trace_bsize(), 200);
        assert_eq!(metrics.data_start(), 3600);
        assert_eq!(metrics.trace_position(1), 3600 + 440);
        assert_eq!(metrics.file_size(), 3600 + 4400);

        let extended = metrics.with_ext_headers(2);
        assert_eq!(extended.data_start(), 3600 + 6400);
    }

    #[test]
    fn test_cube_tracecount() {
        let cube = CubeMetrics {
            sorting: Sorting::Inline,
            iline_count: 3,
            xline_count: 4,
            offset_count: 2,
        };
        assert_eq!(cube.tracecount(), 24);
    }

    #[test]
    fn test_summary_mentions_shape() {
        let metrics = FileMetrics::new(SampleFormat::Int16, 1000, 1000);
        let summary = metrics.summary();
        assert!(summary.starts_with("1000 traces x 1000 samples (Int16)"));
        assert!(summary.ends_with("MB on disk"));
    }
}
