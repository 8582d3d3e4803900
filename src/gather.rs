//! Gather access by (inline, crossline, offset)
//!
//! Scalar coordinates must exist; ranges silently skip labels that do not.
//! Ranged access reads each inline once, for every selected offset, and cuts
//! the requested crosslines out of that in-memory copy.

use crate::error::{Result, SegyError};
use crate::geometry::Geometry;
use crate::index::{self, LineIndex};
use crate::io::TraceIo;
use crate::selector::{Coord, GatherIndex, LabelRange};
use crate::stream::Stream;
use crate::types::Dimension;
use ndarray::{s, Array1, Array2, Array3, ArrayView2, Axis};
use std::sync::Arc;
use tracing::trace;

/// Result of [`Gather::select`]
pub enum GatherSelection {
    /// One trace
    Trace(Array1<f32>),
    /// One cell over a range of offsets, `[offsets, samples]`
    Offsets(Array2<f32>),
    /// One trace per (inline, crossline), il-outer, xl-inner
    Traces(Stream<(i32, i32), Array1<f32>>),
    /// One `[offsets, samples]` gather per (inline, crossline)
    Gathers(Stream<(i32, i32), Array2<f32>>),
}

/// Accessor for traces and gathers addressed by cube coordinates
#[derive(Clone)]
pub struct Gather {
    io: Arc<dyn TraceIo>,
    geometry: Arc<Geometry>,
    iline: Arc<LineIndex>,
    samples: usize,
}

/// Every trace of one inline, for a fixed set of offsets
struct InlineCache {
    io: Arc<dyn TraceIo>,
    geometry: Arc<Geometry>,
    iline: Arc<LineIndex>,
    offsets: Vec<i32>,
    label: Option<i32>,
    data: Array3<f32>,
}

impl InlineCache {
    fn gather(&mut self, il: i32, xl: i32) -> Result<ArrayView2<'_, f32>> {
        if self.label != Some(il) {
            self.label = None;
            for (k, &offset) in self.offsets.iter().enumerate() {
                let trace0 = self.iline.resolve(il, Some(offset))?;
                self.io.read_line(
                    trace0,
                    self.iline.length(),
                    self.iline.step(),
                    self.data.index_axis_mut(Axis(0), k),
                )?;
            }
            trace!(iline = il, offsets = self.offsets.len(), "Cached inline");
            self.label = Some(il);
        }

        let xl_pos = self
            .geometry
            .position(Dimension::Crossline, xl)
            .ok_or(SegyError::UnknownLine(xl))?;
        Ok(self.data.slice(s![.., xl_pos, ..]))
    }
}

impl Gather {
    pub(crate) fn new(io: Arc<dyn TraceIo>, geometry: Arc<Geometry>) -> Self {
        let samples = io.metrics().sample_count;
        let iline = Arc::new(LineIndex::new(&geometry, Dimension::Inline));
        Self {
            io,
            geometry,
            iline,
            samples,
        }
    }

    /// Read the trace at one cell; `None` selects the first offset
    pub fn get(&self, il: i32, xl: i32, offset: Option<i32>) -> Result<Array1<f32>> {
        let trace = index::resolve_cell(il, xl, offset, &self.geometry)?;
        let mut out = vec![0.0f32; self.samples];
        self.io.read_trace(trace, 0..self.samples, &mut out)?;
        Ok(Array1::from_vec(out))
    }

    /// Read one cell over a range of offsets
    ///
    /// The result has one row per matching offset and no rows when nothing
    /// matches.
    pub fn get_offsets(
        &self,
        il: i32,
        xl: i32,
        offsets: impl Into<LabelRange>,
    ) -> Result<Array2<f32>> {
        // Scalars are checked even when the offset range is empty
        index::resolve_cell(il, xl, None, &self.geometry)?;
        let offsets = offsets.into().resolve(self.geometry.offsets())?;

        let mut out = Array2::zeros((offsets.len(), self.samples));
        for (mut row, &offset) in out.rows_mut().into_iter().zip(&offsets) {
            let trace = index::resolve_cell(il, xl, Some(offset), &self.geometry)?;
            match row.as_slice_mut() {
                Some(slice) => self.io.read_trace(trace, 0..self.samples, slice)?,
                None => return Err(SegyError::OutOfRange("non-contiguous gather row".to_string())),
            }
        }
        Ok(out)
    }

    /// Stream `[offsets, samples]` gathers over ranges of inlines and crosslines
    pub fn range(
        &self,
        ilines: impl Into<LabelRange>,
        xlines: impl Into<LabelRange>,
        offsets: impl Into<LabelRange>,
    ) -> Result<Stream<(i32, i32), Array2<f32>>> {
        let ilines = ilines.into().resolve(self.geometry.ilines())?;
        let xlines = xlines.into().resolve(self.geometry.xlines())?;
        let offsets = offsets.into().resolve(self.geometry.offsets())?;
        Ok(self.gathers(ilines, xlines, offsets))
    }

    /// Dispatch on the coordinate variants
    pub fn select(&self, index: GatherIndex) -> Result<GatherSelection> {
        match (index.iline, index.xline, index.offset) {
            (Coord::At(il), Coord::At(xl), None) => self.get(il, xl, None).map(GatherSelection::Trace),
            (Coord::At(il), Coord::At(xl), Some(Coord::At(off))) => {
                self.get(il, xl, Some(off)).map(GatherSelection::Trace)
            }
            (Coord::At(il), Coord::At(xl), Some(Coord::Range(offsets))) => {
                self.get_offsets(il, xl, offsets).map(GatherSelection::Offsets)
            }
            (iline, xline, offset) => {
                let ilines = iline.resolve(self.geometry.ilines(), SegyError::UnknownLine)?;
                let xlines = xline.resolve(self.geometry.xlines(), SegyError::UnknownLine)?;
                match offset {
                    None => {
                        let first = self.geometry.offsets().iter().take(1).copied().collect();
                        Ok(GatherSelection::Traces(self.traces(ilines, xlines, first)))
                    }
                    Some(Coord::At(off)) => {
                        let offsets = Coord::At(off)
                            .resolve(self.geometry.offsets(), SegyError::UnknownOffset)?;
                        Ok(GatherSelection::Traces(self.traces(ilines, xlines, offsets)))
                    }
                    Some(Coord::Range(range)) => {
                        let offsets = range.resolve(self.geometry.offsets())?;
                        Ok(GatherSelection::Gathers(self.gathers(ilines, xlines, offsets)))
                    }
                }
            }
        }
    }

    fn cache(&self, offsets: Vec<i32>) -> InlineCache {
        let data = Array3::zeros((offsets.len(), self.iline.length(), self.samples));
        InlineCache {
            io: Arc::clone(&self.io),
            geometry: Arc::clone(&self.geometry),
            iline: Arc::clone(&self.iline),
            offsets,
            label: None,
            data,
        }
    }

    fn cells(ilines: &[i32], xlines: &[i32]) -> Vec<(i32, i32)> {
        ilines
            .iter()
            .flat_map(|&il| xlines.iter().map(move |&xl| (il, xl)))
            .collect()
    }

    fn gathers(
        &self,
        ilines: Vec<i32>,
        xlines: Vec<i32>,
        offsets: Vec<i32>,
    ) -> Stream<(i32, i32), Array2<f32>> {
        let buffer = Array2::zeros((offsets.len(), self.samples));
        let mut cache = self.cache(offsets);
        Stream::new(
            Self::cells(&ilines, &xlines),
            buffer,
            move |&(il, xl), buf: &mut Array2<f32>| {
                buf.assign(&cache.gather(il, xl)?);
                Ok(())
            },
        )
    }

    /// Single-offset traces; `offsets` holds exactly one label
    fn traces(
        &self,
        ilines: Vec<i32>,
        xlines: Vec<i32>,
        offsets: Vec<i32>,
    ) -> Stream<(i32, i32), Array1<f32>> {
        let mut cache = self.cache(offsets);
        Stream::new(
            Self::cells(&ilines, &xlines),
            Array1::zeros(self.samples),
            move |&(il, xl), buf: &mut Array1<f32>| {
                buf.assign(&cache.gather(il, xl)?.row(0));
                Ok(())
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryIo;
    use crate::types::Sorting;

    fn create_test_gather(sorting: Sorting) -> Gather {
        let io = MemoryIo::cube(&[1, 2, 3], &[10, 20], &[0, 5, 9], sorting, 2).unwrap();
        let geometry =
            Geometry::build(vec![1, 2, 3], vec![10, 20], vec![0, 5, 9], sorting, 18).unwrap();
        Gather::new(Arc::new(io), Arc::new(geometry))
    }

    #[test]
    fn test_single_trace() {
        let gather = create_test_gather(Sorting::Inline);
        // il pos 1, xl pos 1, off pos 2: 1*6 + 1*3 + 2
        assert_eq!(gather.get(2, 20, Some(9)).unwrap().to_vec(), vec![11000.0, 11001.0]);
        assert_eq!(gather.get(2, 20, None).unwrap()[0], 9000.0);
        assert!(matches!(gather.get(4, 20, None), Err(SegyError::UnknownLine(4))));
        assert!(matches!(gather.get(2, 20, Some(1)), Err(SegyError::UnknownOffset(1))));
    }

    #[test]
    fn test_offsets_of_one_cell() {
        let gather = create_test_gather(Sorting::Crossline);
        let data = gather.get_offsets(1, 20, 5..).unwrap();
        assert_eq!(data.dim(), (2, 2));
        // xl pos 1, il pos 0: 1*9 + 0 + off pos
        assert_eq!(data.column(0).to_vec(), vec![10000.0, 11000.0]);

        let none = gather.get_offsets(1, 20, 100..200).unwrap();
        assert_eq!(none.dim(), (0, 2));
        assert!(gather.get_offsets(7, 20, ..).is_err());
    }

    #[test]
    fn test_ranges_match_scalar_reads() {
        for sorting in [Sorting::Inline, Sorting::Crossline] {
            let gather = create_test_gather(sorting);
            let selection = gather
                .select(GatherIndex::new(.., LabelRange::reversed()).with_offset(5))
                .unwrap();
            let GatherSelection::Traces(mut stream) = selection else {
                panic!("expected a trace stream");
            };
            let mut cells = Vec::new();
            while let Some(trace) = stream.step() {
                let trace = trace.unwrap().clone();
                let (il, xl) = *stream.current_key().unwrap();
                assert_eq!(trace, gather.get(il, xl, Some(5)).unwrap());
                cells.push((il, xl));
            }
            assert_eq!(cells, vec![(1, 20), (1, 10), (2, 20), (2, 10), (3, 20), (3, 10)]);
        }
    }

    #[test]
    fn test_gather_stream() {
        let gather = create_test_gather(Sorting::Crossline);
        let gathers: Vec<Array2<f32>> = gather
            .range(2..=3, LabelRange::single(10), LabelRange::full().with_step(5))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(gathers.len(), 2);
        assert_eq!(gathers[0], gather.get_offsets(2, 10, LabelRange::full().with_step(5)).unwrap());
        assert_eq!(gathers[0].nrows(), 2);
    }

    #[test]
    fn test_scalars_inside_range_selectors_are_strict() {
        let gather = create_test_gather(Sorting::Inline);
        let missing_xline = gather.select(GatherIndex::new(.., 30));
        assert!(matches!(missing_xline, Err(SegyError::UnknownLine(30))));
        let missing_offset = gather.select(GatherIndex::new(.., ..).with_offset(2));
        assert!(matches!(missing_offset, Err(SegyError::UnknownOffset(2))));

        let GatherSelection::Traces(stream) = gather.select(GatherIndex::new(50..60, ..)).unwrap()
        else {
            panic!("expected a trace stream");
        };
        assert_eq!(stream.count(), 0);
    }
}
