//! Trace-index resolution
//!
//! Maps (line label, offset label) pairs to absolute trace indices. A line
//! along `dim` starts at
//!
//! ```text
//! trace0 = position(label) * (length if stride == 1 else 1) * offset_count
//! ```
//!
//! and consecutive traces of the line are `stride * offset_count` apart. The
//! offset position is added on top.

use crate::error::{Result, SegyError};
use crate::geometry::Geometry;
use crate::types::Dimension;
use std::collections::HashMap;

/// Distance between the first traces of consecutive lines along `dim`
fn line_step(geometry: &Geometry, dim: Dimension) -> usize {
    let metrics = geometry.metrics();
    let scale = if metrics.stride(dim) == 1 {
        metrics.length(dim)
    } else {
        1
    };
    scale * geometry.offset_count()
}

/// Index of the first trace of line `label` along `dim`, at the first offset
pub fn trace0(label: i32, dim: Dimension, geometry: &Geometry) -> Result<usize> {
    let position = geometry
        .position(dim, label)
        .ok_or(SegyError::UnknownLine(label))?;
    Ok(position * line_step(geometry, dim))
}

/// Position of an offset label; `None` selects the first offset
pub fn offset_position(offset: Option<i32>, geometry: &Geometry) -> Result<usize> {
    match offset {
        None => Ok(0),
        Some(offset) => geometry
            .offset_position(offset)
            .ok_or(SegyError::UnknownOffset(offset)),
    }
}

/// Index of the first trace of line `label` along `dim` at `offset`
pub fn resolve(
    label: i32,
    offset: Option<i32>,
    dim: Dimension,
    geometry: &Geometry,
) -> Result<usize> {
    Ok(trace0(label, dim, geometry)? + offset_position(offset, geometry)?)
}

/// Index of the trace at one (inline, crossline, offset) cell
pub fn resolve_cell(il: i32, xl: i32, offset: Option<i32>, geometry: &Geometry) -> Result<usize> {
    let line = resolve(il, offset, Dimension::Inline, geometry)?;
    let xl_pos = geometry
        .position(Dimension::Crossline, xl)
        .ok_or(SegyError::UnknownLine(xl))?;
    Ok(line + xl_pos * trace_step(geometry, Dimension::Inline))
}

/// Trace-index delta between consecutive traces of a line along `dim`
pub fn trace_step(geometry: &Geometry, dim: Dimension) -> usize {
    geometry.metrics().stride(dim) * geometry.offset_count()
}

/// Precomputed label -> trace0 table for the lines of one dimension
#[derive(Debug, Clone)]
pub struct LineIndex {
    dim: Dimension,
    trace0: HashMap<i32, usize>,
    offsets: HashMap<i32, usize>,
    length: usize,
    step: usize,
}

impl LineIndex {
    pub fn new(geometry: &Geometry, dim: Dimension) -> Self {
        let per_line = line_step(geometry, dim);
        let trace0 = geometry
            .labels(dim)
            .iter()
            .enumerate()
            .map(|(i, &label)| (label, i * per_line))
            .collect();
        let offsets = geometry
            .offsets()
            .iter()
            .enumerate()
            .map(|(i, &offset)| (offset, i))
            .collect();

        Self {
            dim,
            trace0,
            offsets,
            length: geometry.metrics().length(dim),
            step: trace_step(geometry, dim),
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    /// Traces per line
    pub fn length(&self) -> usize {
        self.length
    }

    /// Trace-index delta along a line
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn trace0(&self, label: i32) -> Result<usize> {
        self.trace0
            .get(&label)
            .copied()
            .ok_or(SegyError::UnknownLine(label))
    }

    pub fn offset_position(&self, offset: Option<i32>) -> Result<usize> {
        match offset {
            None => Ok(0),
            Some(offset) => self
                .offsets
                .get(&offset)
                .copied()
                .ok_or(SegyError::UnknownOffset(offset)),
        }
    }

    pub fn resolve(&self, label: i32, offset: Option<i32>) -> Result<usize> {
        Ok(self.trace0(label)? + self.offset_position(offset)?)
    }

    /// Absolute indices of every trace of one line at one offset
    pub fn traces(&self, label: i32, offset: Option<i32>) -> Result<Vec<usize>> {
        let first = self.resolve(label, offset)?;
        Ok((0..self.length).map(|i| first + i * self.step).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sorting;
    use std::collections::BTreeSet;

    #[test]
    fn test_toy_layout() {
        let geometry =
            Geometry::build(vec![1, 2, 3], vec![10, 20], vec![1], Sorting::Inline, 6).unwrap();
        assert_eq!(trace0(1, Dimension::Inline, &geometry).unwrap(), 0);
        assert_eq!(trace0(2, Dimension::Inline, &geometry).unwrap(), 2);
        assert_eq!(trace0(20, Dimension::Crossline, &geometry).unwrap(), 1);
        assert_eq!(resolve_cell(2, 10, Some(1), &geometry).unwrap(), 2);
        assert_eq!(resolve_cell(3, 20, None, &geometry).unwrap(), 5);
    }

    #[test]
    fn test_unknown_labels() {
        let geometry =
            Geometry::build(vec![1, 2], vec![10, 20], vec![5, 6], Sorting::Inline, 8).unwrap();
        assert!(matches!(
            trace0(3, Dimension::Inline, &geometry),
            Err(SegyError::UnknownLine(3))
        ));
        assert!(matches!(
            resolve(1, Some(7), Dimension::Inline, &geometry),
            Err(SegyError::UnknownOffset(7))
        ));
        assert!(matches!(
            resolve_cell(1, 30, Some(5), &geometry),
            Err(SegyError::UnknownLine(30))
        ));
    }

    fn assert_covers_all_traces(geometry: &Geometry) {
        assert_eq!(
            resolve_cell(geometry.ilines()[0], geometry.xlines()[0], Some(geometry.offsets()[0]), geometry)
                .unwrap(),
            0
        );
        let mut seen = BTreeSet::new();
        for &il in geometry.ilines() {
            for &xl in geometry.xlines() {
                for &off in geometry.offsets() {
                    assert!(seen.insert(resolve_cell(il, xl, Some(off), geometry).unwrap()));
                }
            }
        }
        assert_eq!(seen.len(), geometry.tracecount());
        assert_eq!(seen.iter().next_back().copied(), Some(geometry.tracecount() - 1));
    }

    #[test]
    fn test_cartesian_product_covers_all_traces() {
        for sorting in [Sorting::Inline, Sorting::Crossline] {
            for (n_il, n_xl, n_off) in [(3, 2, 1), (1, 4, 2), (4, 1, 3), (5, 3, 2)] {
                let ilines: Vec<i32> = (0..n_il).map(|i| 100 + i * 2).collect();
                let xlines: Vec<i32> = (0..n_xl).map(|i| 7 - i).collect();
                let offsets: Vec<i32> = (0..n_off).map(|i| i * 25).collect();
                let count = (n_il * n_xl * n_off) as usize;
                let geometry = Geometry::build(ilines, xlines, offsets, sorting, count).unwrap();
                assert_covers_all_traces(&geometry);
            }
        }
    }

    #[test]
    fn test_line_index_matches_resolver() {
        let geometry =
            Geometry::build(vec![1, 2, 3], vec![10, 20], vec![0, 5], Sorting::Crossline, 12)
                .unwrap();
        for dim in [Dimension::Inline, Dimension::Crossline] {
            let index = LineIndex::new(&geometry, dim);
            for &label in geometry.labels(dim) {
                for &off in geometry.offsets() {
                    assert_eq!(
                        index.resolve(label, Some(off)).unwrap(),
                        resolve(label, Some(off), dim, &geometry).unwrap()
                    );
                }
            }
        }

        let iline = LineIndex::new(&geometry, Dimension::Inline);
        // Crossline sorted: inline 2 crosses xline 10 at trace 2, xline 20 at trace 8
        assert_eq!(iline.traces(2, Some(0)).unwrap(), vec![2, 8]);
        assert_eq!(iline.traces(2, Some(5)).unwrap(), vec![3, 9]);
        assert_eq!(iline.step(), 6);
    }
}
