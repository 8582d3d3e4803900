//! Survey geometry - how a flat trace sequence maps onto an inline/crossline/offset grid

use crate::error::{Result, SegyError};
use crate::types::{Dimension, Sorting};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-dimension line lengths and strides
///
/// `length` is the number of traces in one line at one offset. `stride` is
/// the distance, in line positions, between consecutive traces of a line: 1
/// for the line that is contiguous on disk, the label count of the slow
/// dimension otherwise. The trace-index delta is `stride * offset_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMetrics {
    pub iline_length: usize,
    pub iline_stride: usize,
    pub xline_length: usize,
    pub xline_stride: usize,
}

impl LineMetrics {
    /// Length of a line along `dim`
    pub fn length(&self, dim: Dimension) -> usize {
        match dim {
            Dimension::Inline => self.iline_length,
            Dimension::Crossline => self.xline_length,
        }
    }

    /// Stride of a line along `dim`
    pub fn stride(&self, dim: Dimension) -> usize {
        match dim {
            Dimension::Inline => self.iline_stride,
            Dimension::Crossline => self.xline_stride,
        }
    }
}

/// Compute line lengths and strides for a sorting and grid shape
pub fn line_metrics(
    sorting: Sorting,
    tracecount: usize,
    iline_count: usize,
    xline_count: usize,
    offset_count: usize,
) -> Result<LineMetrics> {
    if iline_count * xline_count * offset_count != tracecount {
        return Err(SegyError::InconsistentGeometry(format!(
            "{} inlines x {} crosslines x {} offsets != {} traces",
            iline_count, xline_count, offset_count, tracecount
        )));
    }

    match sorting {
        Sorting::Inline => Ok(LineMetrics {
            iline_length: xline_count,
            iline_stride: 1,
            xline_length: iline_count,
            xline_stride: xline_count,
        }),
        Sorting::Crossline => Ok(LineMetrics {
            iline_length: xline_count,
            iline_stride: iline_count,
            xline_length: iline_count,
            xline_stride: 1,
        }),
        Sorting::Unknown => Err(SegyError::InconsistentGeometry(
            "sorting is unknown".to_string(),
        )),
    }
}

/// Label positions, rejecting duplicates
fn positions(name: &str, labels: &[i32]) -> Result<HashMap<i32, usize>> {
    if labels.is_empty() {
        return Err(SegyError::InconsistentGeometry(format!("no {} labels", name)));
    }

    let mut map = HashMap::with_capacity(labels.len());
    for (i, &label) in labels.iter().enumerate() {
        if map.insert(label, i).is_some() {
            return Err(SegyError::InconsistentGeometry(format!(
                "duplicate {} label {}",
                name, label
            )));
        }
    }
    Ok(map)
}

/// Inline/crossline/offset grid of a structured file
#[derive(Debug, Clone)]
pub struct Geometry {
    ilines: Vec<i32>,
    xlines: Vec<i32>,
    offsets: Vec<i32>,
    sorting: Sorting,
    metrics: LineMetrics,

    iline_pos: HashMap<i32, usize>,
    xline_pos: HashMap<i32, usize>,
    offset_pos: HashMap<i32, usize>,
}

impl Geometry {
    /// Validate label sets against the trace count and derive line metrics
    pub fn build(
        ilines: impl Into<Vec<i32>>,
        xlines: impl Into<Vec<i32>>,
        offsets: impl Into<Vec<i32>>,
        sorting: Sorting,
        tracecount: usize,
    ) -> Result<Self> {
        let (ilines, xlines, offsets) = (ilines.into(), xlines.into(), offsets.into());

        let iline_pos = positions("inline", &ilines)?;
        let xline_pos = positions("crossline", &xlines)?;
        let offset_pos = positions("offset", &offsets)?;
        let metrics = line_metrics(
            sorting,
            tracecount,
            ilines.len(),
            xlines.len(),
            offsets.len(),
        )?;

        Ok(Self {
            ilines,
            xlines,
            offsets,
            sorting,
            metrics,
            iline_pos,
            xline_pos,
            offset_pos,
        })
    }

    /// Replace the label sets and sorting, revalidating everything
    ///
    /// On failure the current geometry is left untouched.
    pub fn reinterpret(
        &mut self,
        ilines: impl Into<Vec<i32>>,
        xlines: impl Into<Vec<i32>>,
        offsets: impl Into<Vec<i32>>,
        sorting: Sorting,
    ) -> Result<()> {
        *self = Self::build(ilines, xlines, offsets, sorting, self.tracecount())?;
        Ok(())
    }

    pub fn ilines(&self) -> &[i32] {
        &self.ilines
    }

    pub fn xlines(&self) -> &[i32] {
        &self.xlines
    }

    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    pub fn sorting(&self) -> Sorting {
        self.sorting
    }

    pub fn metrics(&self) -> LineMetrics {
        self.metrics
    }

    /// Labels of the lines along `dim`
    pub fn labels(&self, dim: Dimension) -> &[i32] {
        match dim {
            Dimension::Inline => &self.ilines,
            Dimension::Crossline => &self.xlines,
        }
    }

    /// Number of traces covered by the grid
    pub fn tracecount(&self) -> usize {
        self.ilines.len() * self.xlines.len() * self.offsets.len()
    }

    /// Number of (inline, crossline) cells
    pub fn cell_count(&self) -> usize {
        self.ilines.len() * self.xlines.len()
    }

    pub fn offset_count(&self) -> usize {
        self.offsets.len()
    }

    /// More than one offset per cell
    pub fn is_prestack(&self) -> bool {
        self.offsets.len() > 1
    }

    /// Line dimension whose traces are contiguous on disk
    pub fn fast(&self) -> Dimension {
        match self.sorting {
            Sorting::Crossline => Dimension::Crossline,
            _ => Dimension::Inline,
        }
    }

    /// Line dimension whose traces are strided on disk
    pub fn slow(&self) -> Dimension {
        self.fast().other()
    }

    /// Position of `label` among the lines along `dim`
    pub fn position(&self, dim: Dimension, label: i32) -> Option<usize> {
        match dim {
            Dimension::Inline => self.iline_pos.get(&label).copied(),
            Dimension::Crossline => self.xline_pos.get(&label).copied(),
        }
    }

    /// Position of `offset` among the offsets
    pub fn offset_position(&self, offset: i32) -> Option<usize> {
        self.offset_pos.get(&offset).copied()
    }

    /// Get a summary string of the geometry
    pub fn summary(&self) -> String {
        format!(
            "{} inlines x {} crosslines x {} offsets, {:?} sorted",
            self.ilines.len(),
            self.xlines.len(),
            self.offsets.len(),
            self.sorting
        )
    }
}

impl PartialEq for Geometry {
    fn eq(&self, other: &Self) -> bool {
        self.ilines == other.ilines
            && self.xlines == other.xlines
            && self.offsets == other.offsets
            && self.sorting == other.sorting
    }
}
