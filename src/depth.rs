//! Depth (time) slices
//!
//! A depth slice takes one sample from every cell. Traces are stored
//! trace-major, so every slice touches every trace; nothing is cached
//! between calls.

use crate::error::{Result, SegyError};
use crate::geometry::Geometry;
use crate::io::TraceIo;
use crate::selector::{Index, LabelRange};
use crate::stream::Stream;
use ndarray::{ArrayD, IxDyn};
use std::sync::Arc;

/// Result of [`Depth::select`]
pub enum DepthSelection {
    Slice(ArrayD<f32>),
    Slices(Stream<usize, ArrayD<f32>>),
}

/// Accessor for horizontal slices through the cube
#[derive(Clone)]
pub struct Depth {
    io: Arc<dyn TraceIo>,
    geometry: Option<Arc<Geometry>>,
    samples: usize,
    tracecount: usize,
}

impl Depth {
    pub(crate) fn new(io: Arc<dyn TraceIo>, geometry: Option<Arc<Geometry>>) -> Self {
        let metrics = io.metrics();
        Self {
            io,
            geometry,
            samples: metrics.sample_count,
            tracecount: metrics.tracecount,
        }
    }

    /// Number of depth slices
    pub fn len(&self) -> usize {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// `[fast lines, slow lines]`, or `[tracecount]` without a geometry
    pub fn shape(&self) -> Vec<usize> {
        match &self.geometry {
            Some(geometry) => vec![
                geometry.labels(geometry.fast()).len(),
                geometry.labels(geometry.slow()).len(),
            ],
            None => vec![self.tracecount],
        }
    }

    /// Cells per slice and the trace distance between them
    fn cells(&self) -> (usize, usize) {
        match &self.geometry {
            Some(geometry) => (geometry.cell_count(), geometry.offset_count()),
            None => (self.tracecount, 1),
        }
    }

    fn check(&self, depth: usize) -> Result<()> {
        if depth >= self.samples {
            return Err(SegyError::OutOfRange(format!(
                "depth {} with {} samples per trace",
                depth, self.samples
            )));
        }
        Ok(())
    }

    /// Read one slice, taking the first offset of every cell
    pub fn get(&self, depth: usize) -> Result<ArrayD<f32>> {
        let mut out = ArrayD::zeros(IxDyn(&self.shape()));
        self.get_into(depth, &mut out)?;
        Ok(out)
    }

    /// Read one slice into a buffer of [`Depth::shape`]
    pub fn get_into(&self, depth: usize, out: &mut ArrayD<f32>) -> Result<()> {
        self.check(depth)?;
        let (count, offsets) = self.cells();
        let slice = out.as_slice_mut().ok_or_else(|| {
            SegyError::OutOfRange("depth buffer must be contiguous".to_string())
        })?;
        self.io.read_depth(depth, count, offsets, slice)
    }

    /// Stream the slices in a range of depths
    pub fn range(&self, depths: impl Into<LabelRange>) -> Result<Stream<usize, ArrayD<f32>>> {
        let depths = depths.into().resolve_dense(self.samples)?;
        let depth = self.clone();
        Ok(Stream::new(
            depths,
            ArrayD::zeros(IxDyn(&self.shape())),
            move |&d, buf: &mut ArrayD<f32>| depth.get_into(d, buf),
        ))
    }

    /// Dispatch on the index variant; offset variants do not apply
    pub fn select(&self, index: impl Into<Index>) -> Result<DepthSelection> {
        match index.into() {
            Index::Single(depth) => {
                let depth = usize::try_from(depth)
                    .map_err(|_| SegyError::OutOfRange(format!("depth {}", depth)))?;
                self.get(depth).map(DepthSelection::Slice)
            }
            Index::Range(range) => self.range(range).map(DepthSelection::Slices),
            Index::SingleWithOffset(..) | Index::RangeWithOffset(..) => Err(
                SegyError::TypeMismatch("depth slices are not indexed by offset".to_string()),
            ),
        }
    }

    /// Write one slice, into the first offset of every cell
    pub fn put(&self, depth: usize, values: &ArrayD<f32>) -> Result<()> {
        self.check(depth)?;
        let (count, offsets) = self.cells();
        if values.len() != count {
            return Err(SegyError::OutOfRange(format!(
                "depth slice holds {} values, {} cells",
                values.len(),
                count
            )));
        }
        let flat: Vec<f32> = values.iter().copied().collect();
        self.io.write_depth(depth, count, offsets, &flat)
    }
}
