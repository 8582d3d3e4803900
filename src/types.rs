//! Core data types for SEG-Y cube access

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sample encodings declared by the binary header format code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SampleFormat {
    /// 4-byte IBM hexadecimal floating point
    IbmFloat32 = 1,
    /// 4-byte two's complement integer
    Int32 = 2,
    /// 2-byte two's complement integer
    Int16 = 3,
    /// 4-byte IEEE floating point
    IeeeFloat32 = 5,
    /// 1-byte two's complement integer
    Int8 = 8,
}

impl SampleFormat {
    /// Map a binary header format code to a sample format
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(SampleFormat::IbmFloat32),
            2 => Some(SampleFormat::Int32),
            3 => Some(SampleFormat::Int16),
            5 => Some(SampleFormat::IeeeFloat32),
            8 => Some(SampleFormat::Int8),
            _ => None,
        }
    }

    /// The binary header format code
    pub fn code(&self) -> i64 {
        *self as i64
    }

    /// Size in bytes of one sample
    pub fn size_in_bytes(&self) -> usize {
        match self {
            SampleFormat::IbmFloat32 | SampleFormat::Int32 | SampleFormat::IeeeFloat32 => 4,
            SampleFormat::Int16 => 2,
            SampleFormat::Int8 => 1,
        }
    }

    /// Check if this is a floating point encoding
    pub fn is_float(&self) -> bool {
        matches!(self, SampleFormat::IbmFloat32 | SampleFormat::IeeeFloat32)
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Which of inline/crossline varies slowest in on-disk trace order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sorting {
    /// Traces grouped by inline; crossline varies fastest
    Inline,
    /// Traces grouped by crossline; inline varies fastest
    Crossline,
    /// No consistent ordering could be established
    Unknown,
}

impl Sorting {
    /// The sorting with inline and crossline roles swapped
    pub fn flipped(&self) -> Self {
        match self {
            Sorting::Inline => Sorting::Crossline,
            Sorting::Crossline => Sorting::Inline,
            Sorting::Unknown => Sorting::Unknown,
        }
    }
}

/// Horizontal line dimension of a survey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Dimension {
    Inline = 0,
    Crossline = 1,
}

impl Dimension {
    /// The orthogonal line dimension
    pub fn other(&self) -> Self {
        match self {
            Dimension::Inline => Dimension::Crossline,
            Dimension::Crossline => Dimension::Inline,
        }
    }

    /// Convert to usize index
    pub fn to_index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Inline => write!(f, "inline"),
            Dimension::Crossline => write!(f, "crossline"),
        }
    }
}

/// Axis descriptor with name, unit, and coordinate information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisDescriptor {
    /// Number of samples along this axis
    pub num_samples: usize,
    /// Name of the axis (e.g., "Time", "Depth")
    pub name: String,
    /// Unit of measurement (e.g., "ms", "m")
    pub unit: String,
    /// Coordinate of the first sample
    pub coord_min: f64,
    /// Distance between samples
    pub step: f64,
}

impl AxisDescriptor {
    /// Create a new axis descriptor
    pub fn new(
        num_samples: usize,
        name: impl Into<String>,
        unit: impl Into<String>,
        coord_min: f64,
        step: f64,
    ) -> Self {
        Self {
            num_samples,
            name: name.into(),
            unit: unit.into(),
            coord_min,
            step,
        }
    }

    /// Coordinate of the last sample
    pub fn coord_max(&self) -> f64 {
        self.index_to_coord(self.num_samples.saturating_sub(1))
    }

    /// Convert sample index to coordinate
    pub fn index_to_coord(&self, index: usize) -> f64 {
        self.coord_min + index as f64 * self.step
    }

    /// Convert coordinate to sample index (nearest)
    pub fn coord_to_index(&self, coord: f64) -> usize {
        if self.step == 0.0 || self.num_samples == 0 {
            return 0;
        }
        let normalized = (coord - self.coord_min) / self.step;
        normalized
            .round()
            .max(0.0)
            .min((self.num_samples - 1) as f64) as usize
    }

    /// All sample coordinates
    pub fn coords(&self) -> Vec<f64> {
        (0..self.num_samples).map(|i| self.index_to_coord(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_format_sizes() {
        assert_eq!(SampleFormat::IbmFloat32.size_in_bytes(), 4);
        assert_eq!(SampleFormat::Int16.size_in_bytes(), 2);
        assert_eq!(SampleFormat::Int8.size_in_bytes(), 1);
        assert_eq!(SampleFormat::from_code(5), Some(SampleFormat::IeeeFloat32));
        assert_eq!(SampleFormat::from_code(4), None);
        assert_eq!(SampleFormat::IeeeFloat32.code(), 5);
    }

    #[test]
    fn test_dimension_and_sorting() {
        assert_eq!(Dimension::Inline.other(), Dimension::Crossline);
        assert_eq!(Dimension::Crossline.to_index(), 1);
        assert_eq!(Sorting::Inline.flipped(), Sorting::Crossline);
        assert_eq!(Sorting::Unknown.flipped(), Sorting::Unknown);
    }

    #[test]
    fn test_axis_descriptor() {
        let axis = AxisDescriptor::new(101, "Time", "ms", 0.0, 4.0);
        assert_eq!(axis.coord_max(), 400.0);
        assert_eq!(axis.index_to_coord(10), 40.0);
        assert_eq!(axis.coord_to_index(41.0), 10);
        assert_eq!(axis.coords().len(), 101);
    }
}
