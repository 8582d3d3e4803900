//! Raw trace access by index
//!
//! Works with or without a geometry. Besides plain reads and writes there is
//! a write-back mode: [`RefTraces`] hands out mutable trace buffers and
//! writes back the ones whose content changed, detected by a CRC32
//! fingerprint taken at load time.

use crate::error::{Result, SegyError};
use crate::io::TraceIo;
use crate::selector::{Index, LabelRange};
use crate::stream::Stream;
use crate::utils::fingerprint;
use ndarray::Array1;
use ndarray::Array2;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, error};

/// Result of [`Trace::select`]
pub enum TraceSelection {
    Trace(Array1<f32>),
    Traces(Stream<usize, Array1<f32>>),
}

/// Accessor for traces by 0-based index
#[derive(Clone)]
pub struct Trace {
    io: Arc<dyn TraceIo>,
    samples: usize,
    tracecount: usize,
}

impl Trace {
    pub(crate) fn new(io: Arc<dyn TraceIo>) -> Self {
        let metrics = io.metrics();
        Self {
            io,
            samples: metrics.sample_count,
            tracecount: metrics.tracecount,
        }
    }

    /// Number of traces
    pub fn len(&self) -> usize {
        self.tracecount
    }

    pub fn is_empty(&self) -> bool {
        self.tracecount == 0
    }

    /// Samples per trace
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn get(&self, index: usize) -> Result<Array1<f32>> {
        self.get_samples(index, 0..self.samples)
    }

    /// Read part of a trace
    pub fn get_samples(&self, index: usize, samples: Range<usize>) -> Result<Array1<f32>> {
        let mut out = vec![0.0f32; samples.len()];
        self.io.read_trace(index, samples, &mut out)?;
        Ok(Array1::from_vec(out))
    }

    /// Read a whole trace into `out`
    pub fn get_into(&self, index: usize, out: &mut [f32]) -> Result<()> {
        self.io.read_trace(index, 0..self.samples, out)
    }

    fn fill(&self, index: usize, out: &mut Array1<f32>) -> Result<()> {
        match out.as_slice_mut() {
            Some(slice) => self.get_into(index, slice),
            None => Err(SegyError::OutOfRange("trace buffer must be contiguous".to_string())),
        }
    }

    /// Stream a range of traces
    pub fn range(&self, indices: impl Into<LabelRange>) -> Result<Stream<usize, Array1<f32>>> {
        let indices = indices.into().resolve_dense(self.tracecount)?;
        let traces = self.clone();
        Ok(Stream::new(
            indices,
            Array1::zeros(self.samples),
            move |&i, buf: &mut Array1<f32>| traces.fill(i, buf),
        ))
    }

    /// Dispatch on the index variant; offset variants do not apply
    pub fn select(&self, index: impl Into<Index>) -> Result<TraceSelection> {
        match index.into() {
            Index::Single(i) => {
                let i = usize::try_from(i)
                    .map_err(|_| SegyError::OutOfRange(format!("trace {}", i)))?;
                self.get(i).map(TraceSelection::Trace)
            }
            Index::Range(range) => self.range(range).map(TraceSelection::Traces),
            Index::SingleWithOffset(..) | Index::RangeWithOffset(..) => Err(
                SegyError::TypeMismatch("traces are not indexed by offset".to_string()),
            ),
        }
    }

    /// Read a range of traces eagerly, one per row
    pub fn raw(&self, indices: impl Into<LabelRange>) -> Result<Array2<f32>> {
        let indices = indices.into().resolve_dense(self.tracecount)?;
        let mut out = Array2::zeros((indices.len(), self.samples));
        for (mut row, &i) in out.rows_mut().into_iter().zip(&indices) {
            match row.as_slice_mut() {
                Some(slice) => self.get_into(i, slice)?,
                None => return Err(SegyError::OutOfRange("non-contiguous trace row".to_string())),
            }
        }
        Ok(out)
    }

    /// Write a full trace
    pub fn put(&self, index: usize, values: &[f32]) -> Result<()> {
        if values.len() != self.samples {
            return Err(SegyError::OutOfRange(format!(
                "trace holds {} samples, got {}",
                self.samples,
                values.len()
            )));
        }
        self.io.write_trace(index, values)
    }

    /// Open a write-back view over the traces
    pub fn refs(&self) -> RefTraces {
        RefTraces {
            traces: self.clone(),
            cache: BTreeMap::new(),
        }
    }

    /// Visit a range of traces mutably, writing back every trace the
    /// closure changed as soon as it returns
    ///
    /// Returns the number of traces written.
    pub fn for_each_mut<F>(&self, indices: impl Into<LabelRange>, mut f: F) -> Result<usize>
    where
        F: FnMut(usize, &mut Array1<f32>) -> Result<()>,
    {
        if !self.io.is_writable() {
            return Err(SegyError::ReadOnly);
        }
        let indices = indices.into().resolve_dense(self.tracecount)?;
        let mut buf = Array1::zeros(self.samples);
        let mut written = 0;
        for i in indices {
            self.fill(i, &mut buf)?;
            let before = fingerprint(buf.iter());
            f(i, &mut buf)?;
            if fingerprint(buf.iter()) != before {
                self.write_back(i, &buf)?;
                written += 1;
            }
        }
        debug!(written, "Wrote back modified traces");
        Ok(written)
    }

    fn write_back(&self, index: usize, data: &Array1<f32>) -> Result<()> {
        match data.as_slice() {
            Some(slice) => self.put(index, slice),
            None => self.put(index, &data.to_vec()),
        }
    }
}

/// Write-back cache of mutable traces
///
/// Changed traces are written on [`RefTraces::flush`], on
/// [`RefTraces::close`] and when the guard is dropped. Drop cannot report
/// errors, so failures there are only logged; call `close` to see them.
pub struct RefTraces {
    traces: Trace,
    cache: BTreeMap<usize, (u32, Array1<f32>)>,
}

impl RefTraces {
    fn entry(&mut self, index: usize) -> Result<&mut (u32, Array1<f32>)> {
        if !self.cache.contains_key(&index) {
            let data = self.traces.get(index)?;
            self.cache.insert(index, (fingerprint(data.iter()), data));
        }
        self.cache
            .get_mut(&index)
            .ok_or_else(|| SegyError::OutOfRange(format!("trace {}", index)))
    }

    /// Trace `index`, loaded on first access
    pub fn get(&mut self, index: usize) -> Result<&Array1<f32>> {
        Ok(&self.entry(index)?.1)
    }

    /// Mutable trace `index`; edits are written back on flush
    pub fn get_mut(&mut self, index: usize) -> Result<&mut Array1<f32>> {
        Ok(&mut self.entry(index)?.1)
    }

    /// Indices of cached traces whose content changed since load or flush
    pub fn dirty(&self) -> Vec<usize> {
        self.cache
            .iter()
            .filter(|(_, (fp, data))| fingerprint(data.iter()) != *fp)
            .map(|(&i, _)| i)
            .collect()
    }

    /// Write every changed trace; returns how many were written
    pub fn flush(&mut self) -> Result<usize> {
        let mut written = 0;
        for (&index, (fp, data)) in self.cache.iter_mut() {
            let current = fingerprint(data.iter());
            if current != *fp {
                self.traces.write_back(index, data)?;
                *fp = current;
                written += 1;
            }
        }
        if written > 0 {
            debug!(written, cached = self.cache.len(), "Flushed trace edits");
        }
        Ok(written)
    }

    /// Flush and release the cache, reporting write errors
    pub fn close(mut self) -> Result<usize> {
        let written = self.flush();
        // Nothing left for drop to retry
        self.cache.clear();
        written
    }
}

impl Drop for RefTraces {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            error!(error = %err, "Failed to write back trace edits");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryIo;
    use crate::metrics::FileMetrics;
    use crate::types::Sorting;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that counts trace writes and fails every one of them
    struct RejectingIo {
        inner: MemoryIo,
        writes: Arc<AtomicUsize>,
    }

    impl TraceIo for RejectingIo {
        fn metrics(&self) -> FileMetrics {
            self.inner.metrics()
        }

        fn is_writable(&self) -> bool {
            true
        }

        fn read_binary_header(&self) -> Result<Bytes> {
            self.inner.read_binary_header()
        }

        fn write_binary_header(&self, header: &[u8]) -> Result<()> {
            self.inner.write_binary_header(header)
        }

        fn read_trace_header(&self, index: usize) -> Result<Bytes> {
            self.inner.read_trace_header(index)
        }

        fn write_trace_header(&self, index: usize, header: &[u8]) -> Result<()> {
            self.inner.write_trace_header(index, header)
        }

        fn read_trace(&self, index: usize, samples: Range<usize>, out: &mut [f32]) -> Result<()> {
            self.inner.read_trace(index, samples, out)
        }

        fn write_trace(&self, _index: usize, _data: &[f32]) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(SegyError::Io(std::io::Error::other("disk full")))
        }
    }

    fn create_test_traces() -> Trace {
        Trace::new(Arc::new(
            MemoryIo::cube(&[1, 2], &[1, 2, 3], &[0], Sorting::Inline, 3).unwrap(),
        ))
    }

    #[test]
    fn test_get_and_samples() {
        let traces = create_test_traces();
        assert_eq!(traces.len(), 6);
        assert_eq!(traces.get(4).unwrap().to_vec(), vec![4000.0, 4001.0, 4002.0]);
        assert_eq!(traces.get_samples(4, 1..3).unwrap().to_vec(), vec![4001.0, 4002.0]);
        assert!(matches!(traces.get(6), Err(SegyError::OutOfRange(_))));
    }

    #[test]
    fn test_select_and_raw() {
        let traces = create_test_traces();
        assert!(matches!(traces.select((0, 1)), Err(SegyError::TypeMismatch(_))));
        let TraceSelection::Trace(trace) = traces.select(2).unwrap() else {
            panic!("expected one trace");
        };
        assert_eq!(trace[0], 2000.0);

        let raw = traces.raw(LabelRange::full().with_step(2)).unwrap();
        assert_eq!(raw.dim(), (3, 3));
        assert_eq!(raw.column(0).to_vec(), vec![0.0, 2000.0, 4000.0]);
    }

    #[test]
    fn test_range_stream() {
        let traces = create_test_traces();
        let firsts: Vec<f32> = traces
            .range(LabelRange::from(4..))
            .unwrap()
            .map(|t| t.unwrap()[0])
            .collect();
        assert_eq!(firsts, vec![4000.0, 5000.0]);
    }

    #[test]
    fn test_ref_traces_write_only_changed() {
        let traces = create_test_traces();
        {
            let mut refs = traces.refs();
            refs.get(0).unwrap();
            refs.get_mut(1).unwrap()[0] = -1.0;
            // Unchanged value assignment is not a change
            refs.get_mut(2).unwrap()[0] = 2000.0;
            assert_eq!(refs.dirty(), vec![1]);
            assert_eq!(refs.flush().unwrap(), 1);
            assert!(refs.dirty().is_empty());

            refs.get_mut(3).unwrap()[2] = 7.0;
        }
        assert_eq!(traces.get(1).unwrap()[0], -1.0);
        assert_eq!(traces.get(3).unwrap()[2], 7.0);
    }

    #[test]
    fn test_close_reports_errors() {
        let traces = Trace::new(Arc::new(
            MemoryIo::cube(&[1], &[1], &[0], Sorting::Inline, 2)
                .unwrap()
                .read_only(),
        ));
        let mut refs = traces.refs();
        refs.get_mut(0).unwrap()[0] = 5.0;
        assert!(matches!(refs.close(), Err(SegyError::ReadOnly)));
    }

    #[test]
    fn test_failed_close_is_not_retried_on_drop() {
        let writes = Arc::new(AtomicUsize::new(0));
        let traces = Trace::new(Arc::new(RejectingIo {
            inner: MemoryIo::cube(&[1], &[1, 2], &[0], Sorting::Inline, 2).unwrap(),
            writes: Arc::clone(&writes),
        }));

        let mut refs = traces.refs();
        refs.get_mut(0).unwrap()[0] = 5.0;
        refs.get_mut(1).unwrap()[0] = 6.0;
        assert!(matches!(refs.close(), Err(SegyError::Io(_))));
        // The first failing write stops the flush; the guard is then gone
        assert_eq!(writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_range_rejects_negative_bounds() {
        let traces = create_test_traces();
        assert!(matches!(
            traces.range(LabelRange::from(-2..)),
            Err(SegyError::OutOfRange(_))
        ));
        assert!(matches!(traces.raw(..-1), Err(SegyError::OutOfRange(_))));
        assert!(matches!(traces.select(-1), Err(SegyError::OutOfRange(_))));

        let tail: Vec<f32> = traces
            .range(4..100)
            .unwrap()
            .map(|t| t.unwrap()[0])
            .collect();
        assert_eq!(tail, vec![4000.0, 5000.0]);
    }

    #[test]
    fn test_for_each_mut() {
        let traces = create_test_traces();
        let written = traces
            .for_each_mut(.., |i, trace| {
                if i % 2 == 1 {
                    trace.mapv_inplace(|v| -v);
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(written, 3);
        assert_eq!(traces.get(3).unwrap()[1], -3001.0);
        assert_eq!(traces.get(2).unwrap()[1], 2001.0);
    }
}
