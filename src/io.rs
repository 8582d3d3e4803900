//! Primitive trace I/O collaborators
//!
//! [`TraceIo`] is the boundary between the addressing layer and the bytes on
//! disk: whole headers, whole (or partial) traces, and the strided line and
//! depth reads built on top of them. Everything above this module works in
//! labels; everything below works in trace indices and byte positions.

use crate::error::{Result, SegyError};
use crate::fields::{self, binfield, tracefield, Field};
use crate::metrics::{
    CubeMetrics, FileMetrics, BINARY_HEADER_BASE, BINARY_HEADER_SIZE, TEXT_HEADER_SIZE,
    TRACE_HEADER_SIZE,
};
use crate::types::{SampleFormat, Sorting};
use crate::utils::{ibm_to_ieee, ieee_to_ibm};
use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use bytes::Bytes;
use ndarray::{Array2, ArrayViewMut2};
use parking_lot::{Mutex, RwLock};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Trait for primitive SEG-Y I/O against a file or any other trace store
///
/// Methods take `&self`; implementations serialise access internally. A
/// session assumes a single logical writer.
pub trait TraceIo: Send + Sync {
    /// Layout of the trace store
    fn metrics(&self) -> FileMetrics;

    /// Whether write operations are permitted
    fn is_writable(&self) -> bool;

    /// Read the 400-byte binary header
    fn read_binary_header(&self) -> Result<Bytes>;

    /// Write the 400-byte binary header
    fn write_binary_header(&self, header: &[u8]) -> Result<()>;

    /// Read the 240-byte header of trace `index`
    fn read_trace_header(&self, index: usize) -> Result<Bytes>;

    /// Write the 240-byte header of trace `index`
    fn write_trace_header(&self, index: usize, header: &[u8]) -> Result<()>;

    /// Read `samples` of trace `index` into the front of `out`
    fn read_trace(&self, index: usize, samples: Range<usize>, out: &mut [f32]) -> Result<()>;

    /// Write a full trace
    fn write_trace(&self, index: usize, data: &[f32]) -> Result<()>;

    /// Read `length` traces starting at `trace0`, `step` traces apart, one per
    /// row of `out`
    fn read_line(
        &self,
        trace0: usize,
        length: usize,
        step: usize,
        mut out: ArrayViewMut2<f32>,
    ) -> Result<()> {
        let samples = self.metrics().sample_count;
        check_shape(out.nrows(), out.ncols(), length, samples)?;

        let mut scratch = Vec::new();
        for (i, mut row) in out.rows_mut().into_iter().enumerate() {
            let index = trace0 + i * step;
            match row.as_slice_mut() {
                Some(slice) => self.read_trace(index, 0..samples, slice)?,
                None => {
                    scratch.resize(samples, 0.0);
                    self.read_trace(index, 0..samples, &mut scratch)?;
                    row.iter_mut().zip(&scratch).for_each(|(d, s)| *d = *s);
                }
            }
        }
        Ok(())
    }

    /// Write the first `length` rows of `data` as traces starting at `trace0`,
    /// `step` traces apart
    fn write_line(
        &self,
        trace0: usize,
        length: usize,
        step: usize,
        data: ndarray::ArrayView2<f32>,
    ) -> Result<()> {
        for (i, row) in data.rows().into_iter().take(length).enumerate() {
            let trace = row.to_vec();
            self.write_trace(trace0 + i * step, &trace)?;
        }
        Ok(())
    }

    /// Read sample `depth` of `count` traces, `offsets` traces apart
    fn read_depth(&self, depth: usize, count: usize, offsets: usize, out: &mut [f32]) -> Result<()> {
        if out.len() < count {
            return Err(SegyError::OutOfRange(format!(
                "depth buffer holds {} values, {} required",
                out.len(),
                count
            )));
        }
        for (i, value) in out.iter_mut().take(count).enumerate() {
            self.read_trace(i * offsets, depth..depth + 1, std::slice::from_mut(value))?;
        }
        Ok(())
    }

    /// Write sample `depth` of `count` traces, `offsets` traces apart
    fn write_depth(&self, depth: usize, count: usize, offsets: usize, values: &[f32]) -> Result<()> {
        let samples = self.metrics().sample_count;
        let mut trace = vec![0.0f32; samples];
        for (i, value) in values.iter().take(count).enumerate() {
            let index = i * offsets;
            self.read_trace(index, 0..samples, &mut trace)?;
            match trace.get_mut(depth) {
                Some(sample) => *sample = *value,
                None => {
                    return Err(SegyError::OutOfRange(format!(
                        "depth {} with {} samples per trace",
                        depth, samples
                    )))
                }
            }
            self.write_trace(index, &trace)?;
        }
        Ok(())
    }

    /// Read one trace header field
    fn read_field(&self, index: usize, field: Field) -> Result<i64> {
        let def = fields::find_in(fields::TRACE_FIELDS, field)
            .ok_or_else(|| SegyError::UnknownField(field.to_string()))?;
        let header = self.read_trace_header(index)?;
        Ok(crate::field::decode(def, &header, 1))
    }

    /// Infer sorting and cube dimensions from the trace headers
    ///
    /// The offset count is the run of traces sharing the first trace's
    /// (inline, crossline) pair; the sorting follows from which label changes
    /// between the first two cells; line counts follow from the run length of
    /// the first line.
    fn cube_metrics(
        &self,
        iline_field: Field,
        xline_field: Field,
        offset_field: Field,
    ) -> Result<CubeMetrics> {
        let tracecount = self.metrics().tracecount;
        if tracecount == 0 {
            return Err(SegyError::InconsistentGeometry("file has no traces".to_string()));
        }
        // Validates the offset field up front
        self.read_field(0, offset_field)?;

        let cell = |index: usize| -> Result<(i64, i64)> {
            Ok((
                self.read_field(index, iline_field)?,
                self.read_field(index, xline_field)?,
            ))
        };

        let first = cell(0)?;
        let mut offset_count = 1;
        while offset_count < tracecount && cell(offset_count)? == first {
            offset_count += 1;
        }

        if offset_count == tracecount {
            return Ok(CubeMetrics {
                sorting: Sorting::Inline,
                iline_count: 1,
                xline_count: 1,
                offset_count,
            });
        }

        let second = cell(offset_count)?;
        let sorting = if first.0 == second.0 && first.1 != second.1 {
            Sorting::Inline
        } else if first.1 == second.1 && first.0 != second.0 {
            Sorting::Crossline
        } else {
            Sorting::Unknown
        };

        let (fast_count, slow_count) = match sorting {
            Sorting::Unknown => (0, 0),
            _ => {
                let same_line = |c: (i64, i64)| match sorting {
                    Sorting::Inline => c.0 == first.0,
                    _ => c.1 == first.1,
                };
                let mut run = 1;
                while (run + 1) * offset_count <= tracecount
                    && same_line(cell(run * offset_count)?)
                {
                    run += 1;
                }
                (run, tracecount / (run * offset_count))
            }
        };

        let (iline_count, xline_count) = match sorting {
            Sorting::Inline => (slow_count, fast_count),
            _ => (fast_count, slow_count),
        };

        debug!(
            ?sorting,
            iline_count, xline_count, offset_count, "Inferred cube metrics"
        );

        Ok(CubeMetrics {
            sorting,
            iline_count,
            xline_count,
            offset_count,
        })
    }
}

fn check_shape(rows: usize, cols: usize, length: usize, samples: usize) -> Result<()> {
    if rows != length || cols != samples {
        return Err(SegyError::OutOfRange(format!(
            "line buffer is {}x{}, expected {}x{}",
            rows, cols, length, samples
        )));
    }
    Ok(())
}

fn check_trace(metrics: &FileMetrics, index: usize, samples: &Range<usize>) -> Result<()> {
    if index >= metrics.tracecount {
        return Err(SegyError::OutOfRange(format!(
            "trace {} of {}",
            index, metrics.tracecount
        )));
    }
    if samples.start > samples.end || samples.end > metrics.sample_count {
        return Err(SegyError::OutOfRange(format!(
            "samples {:?} of {}",
            samples, metrics.sample_count
        )));
    }
    Ok(())
}

fn check_len(what: &str, actual: usize, expected: usize) -> Result<()> {
    if actual < expected {
        return Err(SegyError::OutOfRange(format!(
            "{} holds {} values, {} required",
            what, actual, expected
        )));
    }
    Ok(())
}

/// In-memory trace store
///
/// Holds headers and samples in memory; used for building volumes in tests
/// and demos, and as a reference implementation of [`TraceIo`].
pub struct MemoryIo {
    metrics: FileMetrics,
    binary: RwLock<Vec<u8>>,
    headers: RwLock<Vec<u8>>,
    samples: RwLock<Array2<f32>>,
    writable: bool,
}

impl MemoryIo {
    /// Create a zero-filled store; the binary header carries format and
    /// sample count
    pub fn new(metrics: FileMetrics) -> Self {
        let mut binary = vec![0u8; BINARY_HEADER_SIZE];
        let rel = |f: Field| (f.byte() - BINARY_HEADER_BASE) as usize;
        BigEndian::write_i16(
            &mut binary[rel(binfield::FORMAT)..],
            metrics.format.code() as i16,
        );
        BigEndian::write_i16(
            &mut binary[rel(binfield::SAMPLES)..],
            metrics.sample_count as i16,
        );
        BigEndian::write_i16(&mut binary[rel(binfield::INTERVAL)..], 4000);

        Self {
            metrics,
            binary: RwLock::new(binary),
            headers: RwLock::new(vec![0u8; metrics.tracecount * TRACE_HEADER_SIZE]),
            samples: RwLock::new(Array2::zeros((metrics.tracecount, metrics.sample_count))),
            writable: true,
        }
    }

    /// Build a regular cube with inline, crossline and offset labels written
    /// to the standard header fields, in the given sorting
    ///
    /// Sample `s` of trace `t` holds `t * 1000 + s`.
    pub fn cube(
        ilines: &[i32],
        xlines: &[i32],
        offsets: &[i32],
        sorting: Sorting,
        sample_count: usize,
    ) -> Result<Self> {
        let (slow, fast) = match sorting {
            Sorting::Inline => (ilines, xlines),
            Sorting::Crossline => (xlines, ilines),
            Sorting::Unknown => {
                return Err(SegyError::InconsistentGeometry(
                    "cannot lay out a cube with unknown sorting".to_string(),
                ))
            }
        };

        let tracecount = ilines.len() * xlines.len() * offsets.len();
        let io = Self::new(FileMetrics::new(
            SampleFormat::IeeeFloat32,
            tracecount,
            sample_count,
        ));

        {
            let mut headers = io.headers.write();
            let mut samples = io.samples.write();
            let mut trace = 0;
            for &s in slow {
                for &f in fast {
                    let (il, xl) = match sorting {
                        Sorting::Inline => (s, f),
                        _ => (f, s),
                    };
                    for &off in offsets {
                        let header = &mut headers
                            [trace * TRACE_HEADER_SIZE..(trace + 1) * TRACE_HEADER_SIZE];
                        put_i32(header, tracefield::TRACE_SEQUENCE_FILE, trace as i32 + 1);
                        put_i32(header, tracefield::INLINE_3D, il);
                        put_i32(header, tracefield::CROSSLINE_3D, xl);
                        put_i32(header, tracefield::OFFSET, off);
                        let ns = (tracefield::TRACE_SAMPLE_COUNT.byte() - 1) as usize;
                        BigEndian::write_i16(&mut header[ns..ns + 2], sample_count as i16);
                        for (k, value) in samples.row_mut(trace).iter_mut().enumerate() {
                            *value = (trace * 1000 + k) as f32;
                        }
                        trace += 1;
                    }
                }
            }
        }

        Ok(io)
    }

    /// Reject writes from now on
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.writable {
            Ok(())
        } else {
            Err(SegyError::ReadOnly)
        }
    }
}

fn put_i32(header: &mut [u8], field: Field, value: i32) {
    let pos = (field.byte() - 1) as usize;
    BigEndian::write_i32(&mut header[pos..pos + 4], value);
}

impl TraceIo for MemoryIo {
    fn metrics(&self) -> FileMetrics {
        self.metrics
    }

    fn is_writable(&self) -> bool {
        self.writable
    }

    fn read_binary_header(&self) -> Result<Bytes> {
        Ok(Bytes::copy_from_slice(&self.binary.read()))
    }

    fn write_binary_header(&self, header: &[u8]) -> Result<()> {
        self.ensure_writable()?;
        check_len("binary header", header.len(), BINARY_HEADER_SIZE)?;
        self.binary
            .write()
            .copy_from_slice(&header[..BINARY_HEADER_SIZE]);
        Ok(())
    }

    fn read_trace_header(&self, index: usize) -> Result<Bytes> {
        check_trace(&self.metrics, index, &(0..0))?;
        let start = index * TRACE_HEADER_SIZE;
        Ok(Bytes::copy_from_slice(
            &self.headers.read()[start..start + TRACE_HEADER_SIZE],
        ))
    }

    fn write_trace_header(&self, index: usize, header: &[u8]) -> Result<()> {
        self.ensure_writable()?;
        check_trace(&self.metrics, index, &(0..0))?;
        check_len("trace header", header.len(), TRACE_HEADER_SIZE)?;
        let start = index * TRACE_HEADER_SIZE;
        self.headers.write()[start..start + TRACE_HEADER_SIZE]
            .copy_from_slice(&header[..TRACE_HEADER_SIZE]);
        Ok(())
    }

    fn read_trace(&self, index: usize, samples: Range<usize>, out: &mut [f32]) -> Result<()> {
        check_trace(&self.metrics, index, &samples)?;
        check_len("trace buffer", out.len(), samples.len())?;
        let data = self.samples.read();
        let row = data.row(index);
        for (dst, src) in out.iter_mut().zip(row.iter().skip(samples.start).take(samples.len())) {
            *dst = *src;
        }
        Ok(())
    }

    fn write_trace(&self, index: usize, data: &[f32]) -> Result<()> {
        self.ensure_writable()?;
        check_trace(&self.metrics, index, &(0..0))?;
        check_len("trace data", data.len(), self.metrics.sample_count)?;
        let mut samples = self.samples.write();
        for (dst, src) in samples.row_mut(index).iter_mut().zip(data) {
            *dst = *src;
        }
        Ok(())
    }
}

/// SEG-Y file on the local filesystem
///
/// Big-endian files with sample formats 1, 2, 3, 5 and 8. The trace count
/// is derived from the file size.
pub struct FileIo {
    path: PathBuf,
    file: Mutex<File>,
    metrics: FileMetrics,
    writable: bool,
}

impl FileIo {
    /// Open an existing SEG-Y file
    pub fn open(path: impl AsRef<Path>, writable: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new().read(true).write(writable).open(&path)?;

        let len = file.metadata()?.len();
        if len < (TEXT_HEADER_SIZE + BINARY_HEADER_SIZE) as u64 {
            return Err(SegyError::InvalidFormat(format!(
                "{} bytes is too short for a SEG-Y file",
                len
            )));
        }

        file.seek(SeekFrom::Start(TEXT_HEADER_SIZE as u64))?;
        let mut binary = vec![0u8; BINARY_HEADER_SIZE];
        file.read_exact(&mut binary)?;

        let rel = |f: Field| (f.byte() - BINARY_HEADER_BASE) as usize;
        let code = BigEndian::read_i16(&binary[rel(binfield::FORMAT)..]) as i64;
        let format = SampleFormat::from_code(code).ok_or(SegyError::UnsupportedFormat(code))?;
        let sample_count = BigEndian::read_i16(&binary[rel(binfield::SAMPLES)..]);
        if sample_count <= 0 {
            return Err(SegyError::InvalidFormat(format!(
                "invalid sample count {}",
                sample_count
            )));
        }
        let ext_headers = BigEndian::read_i16(&binary[rel(binfield::EXTENDED_HEADERS)..]).max(0);

        let mut metrics = FileMetrics::new(format, 0, sample_count as usize)
            .with_ext_headers(ext_headers as usize);
        let trace_size = (TRACE_HEADER_SIZE + metrics.trace_bsize()) as u64;
        let data_len = len.saturating_sub(metrics.data_start());
        if data_len % trace_size != 0 {
            return Err(SegyError::InvalidFormat(format!(
                "trace data of {} bytes is not a multiple of the {} byte trace size",
                data_len, trace_size
            )));
        }
        metrics.tracecount = (data_len / trace_size) as usize;

        info!(path = %path.display(), writable, "{}", metrics.summary());

        Ok(Self {
            path,
            file: Mutex::new(file),
            metrics,
            writable,
        })
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.writable {
            Ok(())
        } else {
            Err(SegyError::ReadOnly)
        }
    }

    fn read_at(&self, position: u64, buf: &mut [u8]) -> Result<()> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(position))?;
        file.read_exact(buf)?;
        Ok(())
    }

    fn write_at(&self, position: u64, buf: &[u8]) -> Result<()> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(position))?;
        file.write_all(buf)?;
        Ok(())
    }

    fn decode(&self, bytes: &[u8], out: &mut [f32]) -> Result<()> {
        let mut reader = bytes;
        for value in out.iter_mut() {
            *value = match self.metrics.format {
                SampleFormat::IbmFloat32 => ibm_to_ieee(reader.read_u32::<BigEndian>()?),
                SampleFormat::IeeeFloat32 => reader.read_f32::<BigEndian>()?,
                SampleFormat::Int32 => reader.read_i32::<BigEndian>()? as f32,
                SampleFormat::Int16 => reader.read_i16::<BigEndian>()? as f32,
                SampleFormat::Int8 => reader.read_i8()? as f32,
            };
        }
        Ok(())
    }

    fn encode(&self, data: &[f32]) -> Vec<u8> {
        let size = self.metrics.format.size_in_bytes();
        let mut bytes = vec![0u8; data.len() * size];
        for (chunk, &value) in bytes.chunks_exact_mut(size).zip(data) {
            match self.metrics.format {
                SampleFormat::IbmFloat32 => BigEndian::write_u32(chunk, ieee_to_ibm(value)),
                SampleFormat::IeeeFloat32 => BigEndian::write_f32(chunk, value),
                SampleFormat::Int32 => BigEndian::write_i32(chunk, value as i32),
                SampleFormat::Int16 => BigEndian::write_i16(chunk, value as i16),
                SampleFormat::Int8 => chunk[0] = value as i8 as u8,
            }
        }
        bytes
    }
}

impl TraceIo for FileIo {
    fn metrics(&self) -> FileMetrics {
        self.metrics
    }

    fn is_writable(&self) -> bool {
        self.writable
    }

    fn read_binary_header(&self) -> Result<Bytes> {
        let mut buf = vec![0u8; BINARY_HEADER_SIZE];
        self.read_at(TEXT_HEADER_SIZE as u64, &mut buf)?;
        Ok(Bytes::from(buf))
    }

    fn write_binary_header(&self, header: &[u8]) -> Result<()> {
        self.ensure_writable()?;
        check_len("binary header", header.len(), BINARY_HEADER_SIZE)?;
        self.write_at(TEXT_HEADER_SIZE as u64, &header[..BINARY_HEADER_SIZE])
    }

    fn read_trace_header(&self, index: usize) -> Result<Bytes> {
        check_trace(&self.metrics, index, &(0..0))?;
        let mut buf = vec![0u8; TRACE_HEADER_SIZE];
        self.read_at(self.metrics.trace_position(index), &mut buf)?;
        Ok(Bytes::from(buf))
    }

    fn write_trace_header(&self, index: usize, header: &[u8]) -> Result<()> {
        self.ensure_writable()?;
        check_trace(&self.metrics, index, &(0..0))?;
        check_len("trace header", header.len(), TRACE_HEADER_SIZE)?;
        self.write_at(
            self.metrics.trace_position(index),
            &header[..TRACE_HEADER_SIZE],
        )
    }

    fn read_trace(&self, index: usize, samples: Range<usize>, out: &mut [f32]) -> Result<()> {
        check_trace(&self.metrics, index, &samples)?;
        check_len("trace buffer", out.len(), samples.len())?;
        let size = self.metrics.format.size_in_bytes();
        let position = self.metrics.trace_position(index)
            + (TRACE_HEADER_SIZE + samples.start * size) as u64;
        let mut buf = vec![0u8; samples.len() * size];
        self.read_at(position, &mut buf)?;
        self.decode(&buf, &mut out[..samples.len()])
    }

    fn write_trace(&self, index: usize, data: &[f32]) -> Result<()> {
        self.ensure_writable()?;
        check_trace(&self.metrics, index, &(0..0))?;
        check_len("trace data", data.len(), self.metrics.sample_count)?;
        let bytes = self.encode(&data[..self.metrics.sample_count]);
        let position = self.metrics.trace_position(index) + TRACE_HEADER_SIZE as u64;
        debug!(trace = index, bytes = bytes.len(), "Writing trace");
        self.write_at(position, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_io_round_trip() {
        let io = MemoryIo::new(FileMetrics::new(SampleFormat::IeeeFloat32, 4, 3));
        io.write_trace(2, &[1.0, 2.0, 3.0]).unwrap();

        let mut out = [0.0f32; 2];
        io.read_trace(2, 1..3, &mut out).unwrap();
        assert_eq!(out, [2.0, 3.0]);

        assert!(matches!(
            io.read_trace(4, 0..3, &mut [0.0; 3]),
            Err(SegyError::OutOfRange(_))
        ));
        assert!(matches!(
            io.read_trace(0, 0..4, &mut [0.0; 4]),
            Err(SegyError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let io = MemoryIo::new(FileMetrics::new(SampleFormat::IeeeFloat32, 1, 1)).read_only();
        assert!(matches!(io.write_trace(0, &[1.0]), Err(SegyError::ReadOnly)));
        assert!(matches!(
            io.write_trace_header(0, &[0u8; TRACE_HEADER_SIZE]),
            Err(SegyError::ReadOnly)
        ));
    }

    #[test]
    fn test_cube_headers() {
        let io = MemoryIo::cube(&[1, 2], &[10, 20, 30], &[5], Sorting::Crossline, 4).unwrap();
        assert_eq!(io.metrics().tracecount, 6);
        // Crossline sorted: inline varies fastest
        assert_eq!(io.read_field(0, tracefield::INLINE_3D).unwrap(), 1);
        assert_eq!(io.read_field(1, tracefield::INLINE_3D).unwrap(), 2);
        assert_eq!(io.read_field(1, tracefield::CROSSLINE_3D).unwrap(), 10);
        assert_eq!(io.read_field(2, tracefield::CROSSLINE_3D).unwrap(), 20);
        assert_eq!(io.read_field(5, tracefield::OFFSET).unwrap(), 5);
        assert_eq!(io.read_field(3, tracefield::TRACE_SAMPLE_COUNT).unwrap(), 4);
    }

    #[test]
    fn test_cube_metrics_inference() {
        let io = MemoryIo::cube(&[1, 2, 3], &[10, 20], &[100, 200], Sorting::Inline, 2).unwrap();
        let cube = io
            .cube_metrics(tracefield::INLINE_3D, tracefield::CROSSLINE_3D, tracefield::OFFSET)
            .unwrap();
        assert_eq!(cube.sorting, Sorting::Inline);
        assert_eq!((cube.iline_count, cube.xline_count, cube.offset_count), (3, 2, 2));

        let io = MemoryIo::cube(&[1, 2, 3], &[10, 20], &[0], Sorting::Crossline, 2).unwrap();
        let cube = io
            .cube_metrics(tracefield::INLINE_3D, tracefield::CROSSLINE_3D, tracefield::OFFSET)
            .unwrap();
        assert_eq!(cube.sorting, Sorting::Crossline);
        assert_eq!((cube.iline_count, cube.xline_count, cube.offset_count), (3, 2, 1));
    }

    #[test]
    fn test_line_and_depth_defaults() {
        let io = MemoryIo::cube(&[1, 2], &[10, 20], &[0], Sorting::Inline, 3).unwrap();
        let mut line = Array2::zeros((2, 3));
        io.read_line(1, 2, 2, line.view_mut()).unwrap();
        assert_eq!(line[[0, 0]], 1000.0);
        assert_eq!(line[[1, 2]], 3002.0);

        let mut depth = [0.0f32; 4];
        io.read_depth(1, 4, 1, &mut depth).unwrap();
        assert_eq!(depth, [1.0, 1001.0, 2001.0, 3001.0]);

        io.write_depth(2, 2, 2, &[-1.0, -2.0]).unwrap();
        let mut trace = [0.0f32; 3];
        io.read_trace(2, 0..3, &mut trace).unwrap();
        assert_eq!(trace, [2000.0, 2001.0, -2.0]);
    }
}
