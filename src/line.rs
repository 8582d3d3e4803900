//! Inline and crossline access
//!
//! A [`Line`] addresses every trace sharing one inline (or crossline) label
//! at one offset, as a `[length, samples]` array. Ranges of lines are served
//! as double-buffered [`Stream`]s, label-outer and offset-inner.

use crate::error::{Result, SegyError};
use crate::field::TraceFieldMap;
use crate::geometry::Geometry;
use crate::index::LineIndex;
use crate::io::TraceIo;
use crate::selector::{Index, LabelRange};
use crate::stream::Stream;
use crate::types::Dimension;
use ndarray::{Array2, ArrayView2, ArrayViewMut2};
use std::sync::Arc;
use tracing::debug;

/// Result of [`Line::select`]
pub enum LineSelection {
    Line(Array2<f32>),
    Lines(Stream<(i32, i32), Array2<f32>>),
}

/// Accessor for the lines along one dimension
#[derive(Clone)]
pub struct Line {
    io: Arc<dyn TraceIo>,
    geometry: Arc<Geometry>,
    index: Arc<LineIndex>,
    samples: usize,
}

impl Line {
    pub(crate) fn new(io: Arc<dyn TraceIo>, geometry: Arc<Geometry>, dim: Dimension) -> Self {
        let samples = io.metrics().sample_count;
        let index = Arc::new(LineIndex::new(&geometry, dim));
        Self {
            io,
            geometry,
            index,
            samples,
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.index.dimension()
    }

    /// Labels of the lines, in file order
    pub fn labels(&self) -> &[i32] {
        self.geometry.labels(self.dimension())
    }

    pub fn offsets(&self) -> &[i32] {
        self.geometry.offsets()
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.labels().len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels().is_empty()
    }

    /// Shape of one line: traces x samples
    pub fn shape(&self) -> (usize, usize) {
        (self.index.length(), self.samples)
    }

    /// Read a line at the first offset
    pub fn get(&self, label: i32) -> Result<Array2<f32>> {
        self.read(label, None)
    }

    /// Read a line at a given offset
    pub fn get_at(&self, label: i32, offset: i32) -> Result<Array2<f32>> {
        self.read(label, Some(offset))
    }

    fn read(&self, label: i32, offset: Option<i32>) -> Result<Array2<f32>> {
        let mut out = Array2::zeros(self.shape());
        self.get_into(label, offset, out.view_mut())?;
        Ok(out)
    }

    /// Read a line into a caller-provided `[length, samples]` buffer
    pub fn get_into(&self, label: i32, offset: Option<i32>, out: ArrayViewMut2<f32>) -> Result<()> {
        let trace0 = self.index.resolve(label, offset)?;
        self.io
            .read_line(trace0, self.index.length(), self.index.step(), out)
    }

    /// Stream every existing (label, offset) pair in the ranges
    ///
    /// Missing labels and offsets are skipped.
    pub fn range(
        &self,
        labels: impl Into<LabelRange>,
        offsets: impl Into<LabelRange>,
    ) -> Result<Stream<(i32, i32), Array2<f32>>> {
        let labels = labels.into().resolve(self.labels())?;
        let offsets = offsets.into().resolve(self.offsets())?;
        Ok(self.stream(labels, offsets))
    }

    fn first_offset(&self) -> Vec<i32> {
        self.offsets().iter().take(1).copied().collect()
    }

    fn stream(&self, labels: Vec<i32>, offsets: Vec<i32>) -> Stream<(i32, i32), Array2<f32>> {
        let keys: Vec<(i32, i32)> = labels
            .iter()
            .flat_map(|&label| offsets.iter().map(move |&offset| (label, offset)))
            .collect();
        debug!(dim = %self.dimension(), lines = keys.len(), "Streaming lines");

        let line = self.clone();
        Stream::new(keys, Array2::zeros(self.shape()), move |&(label, offset), buf| {
            line.get_into(label, Some(offset), buf.view_mut())
        })
    }

    /// Dispatch on the index variant
    ///
    /// Label ranges without an offset range use the first offset only.
    pub fn select(&self, index: impl Into<Index>) -> Result<LineSelection> {
        match index.into() {
            Index::Single(label) => self.get(label).map(LineSelection::Line),
            Index::SingleWithOffset(label, offset) => {
                self.get_at(label, offset).map(LineSelection::Line)
            }
            Index::Range(labels) => {
                let labels = labels.resolve(self.labels())?;
                Ok(LineSelection::Lines(self.stream(labels, self.first_offset())))
            }
            Index::RangeWithOffset(labels, offsets) => {
                self.range(labels, offsets).map(LineSelection::Lines)
            }
        }
    }

    /// Write a line
    ///
    /// Rows beyond the line length are ignored; traces without a row are
    /// left untouched.
    pub fn put(&self, label: i32, offset: Option<i32>, values: ArrayView2<f32>) -> Result<()> {
        let trace0 = self.index.resolve(label, offset)?;
        if values.ncols() != self.samples {
            return Err(SegyError::OutOfRange(format!(
                "line rows hold {} samples, traces hold {}",
                values.ncols(),
                self.samples
            )));
        }
        let rows = values.nrows().min(self.index.length());
        self.io.write_line(trace0, rows, self.index.step(), values)
    }

    /// Write consecutive sources to the (label, offset) pairs of the ranges
    ///
    /// Not atomic: an error part-way leaves the earlier lines written.
    /// Returns the number of lines written; surplus sources are ignored.
    pub fn put_range<'a, I>(
        &self,
        labels: impl Into<LabelRange>,
        offsets: impl Into<LabelRange>,
        sources: I,
    ) -> Result<usize>
    where
        I: IntoIterator<Item = ArrayView2<'a, f32>>,
    {
        let labels = labels.into().resolve(self.labels())?;
        let offsets = offsets.into().resolve(self.offsets())?;
        let keys = labels
            .iter()
            .flat_map(|&label| offsets.iter().map(move |&offset| (label, offset)));

        let mut written = 0;
        for ((label, offset), values) in keys.zip(sources) {
            self.put(label, Some(offset), values)?;
            written += 1;
        }
        debug!(dim = %self.dimension(), written, "Wrote lines");
        Ok(written)
    }

    /// Stream the trace headers along a line
    pub fn headers(&self, label: i32, offset: Option<i32>) -> Result<Stream<usize, TraceFieldMap>> {
        let traces = self.index.traces(label, offset)?;
        let io = Arc::clone(&self.io);
        Ok(Stream::new(
            traces,
            TraceFieldMap::detached(),
            move |&trace, header| header.load_index(&io, trace),
        ))
    }
}
