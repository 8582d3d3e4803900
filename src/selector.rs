//! Index selectors for line, gather, depth and trace access
//!
//! A [`LabelRange`] behaves like a list slice over the numeric label space:
//! open bounds default to the smallest/largest known label (reversed for a
//! negative step), the step counts in label units, and labels that do not
//! exist are skipped rather than reported. Scalar coordinates, in contrast,
//! are always checked.
//!
//! Over dense axes (trace numbers, sample depths) bounds are positions, not
//! labels: they must be non-negative, and a stop past the end is clamped.

use crate::error::{Result, SegyError};
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

/// Slice over a label axis, with Python-style open bounds
///
/// `stop` is exclusive and wider than a label so that inclusive ranges can
/// end at `i32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelRange {
    pub start: Option<i32>,
    pub stop: Option<i64>,
    pub step: Option<i32>,
}

impl LabelRange {
    /// Every known label, ascending
    pub fn full() -> Self {
        Self::default()
    }

    /// Labels in `start..stop`
    pub fn new(start: i32, stop: i32) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop as i64),
            step: None,
        }
    }

    /// Just `label`, if it exists
    pub fn single(label: i32) -> Self {
        Self {
            start: Some(label),
            stop: Some(label as i64 + 1),
            step: None,
        }
    }

    /// Set the step; negative steps walk labels in descending order
    pub fn with_step(mut self, step: i32) -> Self {
        self.step = Some(step);
        self
    }

    /// Every known label, descending
    pub fn reversed() -> Self {
        Self::full().with_step(-1)
    }

    fn step_value(&self) -> Result<i64> {
        match self.step {
            Some(0) => Err(SegyError::OutOfRange("slice step cannot be zero".to_string())),
            Some(step) => Ok(step as i64),
            None => Ok(1),
        }
    }

    /// The existing labels selected by this range, in traversal order
    pub fn resolve(&self, labels: &[i32]) -> Result<Vec<i32>> {
        let step = self.step_value()?;
        let (Some(&min), Some(&max)) = (labels.iter().min(), labels.iter().max()) else {
            return Ok(Vec::new());
        };

        let mut selected: Vec<i32> = if step > 0 {
            let start = self.start.map_or(min as i64, i64::from);
            let stop = self.stop.unwrap_or(max as i64 + 1);
            labels
                .iter()
                .copied()
                .filter(|&l| {
                    let l = l as i64;
                    start <= l && l < stop && (l - start) % step == 0
                })
                .collect()
        } else {
            let start = self.start.map_or(max as i64, i64::from);
            let stop = self.stop.unwrap_or(min as i64 - 1);
            labels
                .iter()
                .copied()
                .filter(|&l| {
                    let l = l as i64;
                    stop < l && l <= start && (start - l) % -step == 0
                })
                .collect()
        };

        if step > 0 {
            selected.sort_unstable();
        } else {
            selected.sort_unstable_by(|a, b| b.cmp(a));
        }
        Ok(selected)
    }

    /// Indices of a dense `0..count` axis selected by this range
    ///
    /// Negative bounds are rejected with [`SegyError::OutOfRange`], the same
    /// as a negative scalar index.
    pub fn resolve_dense(&self, count: usize) -> Result<Vec<usize>> {
        let step = self.step_value()?;
        let start = self.start.map(i64::from);
        if let Some(bound) = start.filter(|&v| v < 0).or(self.stop.filter(|&v| v < 0)) {
            return Err(SegyError::OutOfRange(format!(
                "negative slice bound {}",
                bound
            )));
        }

        let count = count as i64;
        if count == 0 {
            return Ok(Vec::new());
        }

        let clamp = |v: i64| v.clamp(-1, count);
        let indices: Vec<i64> = if step > 0 {
            let start = clamp(start.unwrap_or(0));
            let stop = clamp(self.stop.unwrap_or(count));
            (start..stop.max(start)).step_by(step as usize).collect()
        } else {
            let start = clamp(start.unwrap_or(count - 1)).min(count - 1);
            let stop = clamp(self.stop.unwrap_or(-1));
            let mut out = Vec::new();
            let mut i = start;
            while i > stop {
                out.push(i);
                i += step;
            }
            out
        };
        Ok(indices.into_iter().map(|i| i as usize).collect())
    }
}

impl From<Range<i32>> for LabelRange {
    fn from(r: Range<i32>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<RangeInclusive<i32>> for LabelRange {
    fn from(r: RangeInclusive<i32>) -> Self {
        Self {
            start: Some(*r.start()),
            stop: Some(*r.end() as i64 + 1),
            step: None,
        }
    }
}

impl From<RangeFrom<i32>> for LabelRange {
    fn from(r: RangeFrom<i32>) -> Self {
        Self {
            start: Some(r.start),
            ..Self::default()
        }
    }
}

impl From<RangeTo<i32>> for LabelRange {
    fn from(r: RangeTo<i32>) -> Self {
        Self {
            stop: Some(r.end as i64),
            ..Self::default()
        }
    }
}

impl From<RangeFull> for LabelRange {
    fn from(_: RangeFull) -> Self {
        Self::full()
    }
}

/// Line, depth or trace index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    /// One line (at the first offset), depth or trace
    Single(i32),
    /// A range of lines (at the first offset), depths or traces
    Range(LabelRange),
    /// One line at one offset
    SingleWithOffset(i32, i32),
    /// Lines crossed with offsets, offsets innermost
    RangeWithOffset(LabelRange, LabelRange),
}

impl From<i32> for Index {
    fn from(label: i32) -> Self {
        Index::Single(label)
    }
}

impl From<LabelRange> for Index {
    fn from(range: LabelRange) -> Self {
        Index::Range(range)
    }
}

impl From<(i32, i32)> for Index {
    fn from((label, offset): (i32, i32)) -> Self {
        Index::SingleWithOffset(label, offset)
    }
}

/// One coordinate of a gather index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coord {
    At(i32),
    Range(LabelRange),
}

impl Coord {
    /// Labels selected by this coordinate; scalars must exist
    pub(crate) fn resolve(
        &self,
        labels: &[i32],
        missing: impl Fn(i32) -> SegyError,
    ) -> Result<Vec<i32>> {
        match self {
            Coord::At(label) if labels.contains(label) => Ok(vec![*label]),
            Coord::At(label) => Err(missing(*label)),
            Coord::Range(range) => range.resolve(labels),
        }
    }
}

impl From<i32> for Coord {
    fn from(label: i32) -> Self {
        Coord::At(label)
    }
}

impl<R: Into<LabelRange>> From<R> for Coord
where
    R: RangeLike,
{
    fn from(range: R) -> Self {
        Coord::Range(range.into())
    }
}

/// Marker for the range types accepted as gather coordinates
pub trait RangeLike {}

impl RangeLike for LabelRange {}
impl RangeLike for Range<i32> {}
impl RangeLike for RangeInclusive<i32> {}
impl RangeLike for RangeFrom<i32> {}
impl RangeLike for RangeTo<i32> {}
impl RangeLike for RangeFull {}

/// Index into the gather accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatherIndex {
    pub iline: Coord,
    pub xline: Coord,
    /// `None` selects the first offset
    pub offset: Option<Coord>,
}

impl GatherIndex {
    pub fn new(iline: impl Into<Coord>, xline: impl Into<Coord>) -> Self {
        Self {
            iline: iline.into(),
            xline: xline.into(),
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: impl Into<Coord>) -> Self {
        self.offset = Some(offset.into());
        self
    }
}
