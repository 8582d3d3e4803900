//! SEG-Y file access - main API tying geometry, I/O and accessors together

use crate::config::SegyConfig;
use crate::depth::Depth;
use crate::error::{Result, SegyError};
use crate::field::BinaryFieldMap;
use crate::fields::{binfield, tracefield, Field};
use crate::gather::Gather;
use crate::geometry::Geometry;
use crate::header::Header;
use crate::io::{FileIo, TraceIo};
use crate::line::Line;
use crate::metrics::FileMetrics;
use crate::trace::Trace;
use crate::types::{AxisDescriptor, Dimension, Sorting};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An open SEG-Y file, structured or not
pub struct SegyFile {
    /// Primitive I/O shared by every accessor
    io: Arc<dyn TraceIo>,

    /// Layout reported by the I/O collaborator
    metrics: FileMetrics,

    /// Cube geometry; `None` for unstructured files
    geometry: Option<Arc<Geometry>>,

    /// Options the file was opened with
    config: SegyConfig,
}

impl SegyFile {
    /// Open a SEG-Y file from the local filesystem
    pub fn open(path: impl AsRef<Path>, config: SegyConfig) -> Result<Self> {
        let io = FileIo::open(path, config.writable)?;
        Self::from_io(Arc::new(io), config)
    }

    /// Wrap any trace store, inferring the geometry unless told not to
    pub fn from_io(io: Arc<dyn TraceIo>, config: SegyConfig) -> Result<Self> {
        let (iline, xline, offset) = config.label_fields()?;
        let metrics = io.metrics();

        let geometry = if config.ignore_geometry {
            None
        } else {
            match infer_geometry(io.as_ref(), iline, xline, offset) {
                Ok(geometry) => {
                    info!("Structured file: {}", geometry.summary());
                    Some(Arc::new(geometry))
                }
                Err(err) if config.strict => return Err(err),
                Err(err) => {
                    warn!(error = %err, "Could not infer geometry, opening unstructured");
                    None
                }
            }
        };

        Ok(Self {
            io,
            metrics,
            geometry,
            config,
        })
    }

    pub fn metrics(&self) -> FileMetrics {
        self.metrics
    }

    pub fn config(&self) -> &SegyConfig {
        &self.config
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_deref()
    }

    pub fn is_structured(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.io.is_writable()
    }

    /// Sorting of a structured file; `Unknown` otherwise
    pub fn sorting(&self) -> Sorting {
        self.geometry
            .as_ref()
            .map_or(Sorting::Unknown, |geometry| geometry.sorting())
    }

    pub fn tracecount(&self) -> usize {
        self.metrics.tracecount
    }

    fn structured(&self, what: &'static str) -> Result<Arc<Geometry>> {
        self.geometry
            .as_ref()
            .map(Arc::clone)
            .ok_or(SegyError::Unstructured(what))
    }

    fn line(&self, dim: Dimension) -> Result<Line> {
        let geometry = self.structured("line")?;
        Ok(Line::new(Arc::clone(&self.io), geometry, dim))
    }

    /// Lines of constant inline number
    pub fn iline(&self) -> Result<Line> {
        self.line(Dimension::Inline)
    }

    /// Lines of constant crossline number
    pub fn xline(&self) -> Result<Line> {
        self.line(Dimension::Crossline)
    }

    /// The lines that are contiguous on disk
    pub fn fast(&self) -> Result<Line> {
        let geometry = self.structured("line")?;
        self.line(geometry.fast())
    }

    /// The lines that are strided on disk
    pub fn slow(&self) -> Result<Line> {
        let geometry = self.structured("line")?;
        self.line(geometry.slow())
    }

    pub fn gather(&self) -> Result<Gather> {
        let geometry = self.structured("gather")?;
        Ok(Gather::new(Arc::clone(&self.io), geometry))
    }

    /// Depth slices; flat `[tracecount]` slices for unstructured files
    pub fn depth_slice(&self) -> Depth {
        Depth::new(Arc::clone(&self.io), self.geometry.clone())
    }

    pub fn trace(&self) -> Trace {
        Trace::new(Arc::clone(&self.io))
    }

    pub fn header(&self) -> Header {
        Header::new(Arc::clone(&self.io))
    }

    /// The binary header, backed by the file
    pub fn bin(&self) -> Result<BinaryFieldMap> {
        BinaryFieldMap::load(Arc::clone(&self.io), 0)
    }

    /// Sample (time) axis from the sample interval and the first trace's delay
    ///
    /// The interval comes from the binary header, falling back to the first
    /// trace header when the binary header holds zero.
    pub fn samples(&self) -> Result<AxisDescriptor> {
        let mut interval = self.bin()?.get(binfield::INTERVAL)?;
        let mut delay = 0;
        if self.metrics.tracecount > 0 {
            if interval <= 0 {
                interval = self.io.read_field(0, tracefield::TRACE_SAMPLE_INTERVAL)?;
            }
            delay = self.io.read_field(0, tracefield::DELAY_RECORDING_TIME)?;
        }
        if interval <= 0 {
            debug!(interval, "No usable sample interval, assuming 4 ms");
            interval = 4000;
        }

        Ok(AxisDescriptor::new(
            self.metrics.sample_count,
            "Time",
            "ms",
            delay as f64,
            interval as f64 / 1000.0,
        ))
    }

    /// Replace the geometry with explicit label sets and sorting
    ///
    /// Accessors created earlier keep the geometry they were created with.
    /// On failure the current geometry is kept.
    pub fn reinterpret(
        &mut self,
        ilines: impl Into<Vec<i32>>,
        xlines: impl Into<Vec<i32>>,
        offsets: impl Into<Vec<i32>>,
        sorting: Sorting,
    ) -> Result<()> {
        let geometry = Geometry::build(ilines, xlines, offsets, sorting, self.metrics.tracecount)?;
        info!("Reinterpreted geometry: {}", geometry.summary());
        self.geometry = Some(Arc::new(geometry));
        Ok(())
    }

    /// Get a summary string of the file
    pub fn summary(&self) -> String {
        match &self.geometry {
            Some(geometry) => format!("{}; {}", self.metrics.summary(), geometry.summary()),
            None => format!("{}; unstructured", self.metrics.summary()),
        }
    }
}

fn label(io: &dyn TraceIo, index: usize, field: Field) -> Result<i32> {
    let value = io.read_field(index, field)?;
    i32::try_from(value).map_err(|_| {
        SegyError::InconsistentGeometry(format!(
            "{} of trace {} is {}, not a valid label",
            field, index, value
        ))
    })
}

/// Infer sorting and label sets from the trace headers
///
/// Labels are read from the first trace of every line; the result is then
/// validated like any other geometry.
pub fn infer_geometry(
    io: &dyn TraceIo,
    iline: Field,
    xline: Field,
    offset: Field,
) -> Result<Geometry> {
    let cube = io.cube_metrics(iline, xline, offset)?;
    let n_off = cube.offset_count;

    let (ilines, xlines) = match cube.sorting {
        Sorting::Inline => (
            (0..cube.iline_count)
                .map(|i| label(io, i * cube.xline_count * n_off, iline))
                .collect::<Result<Vec<_>>>()?,
            (0..cube.xline_count)
                .map(|j| label(io, j * n_off, xline))
                .collect::<Result<Vec<_>>>()?,
        ),
        Sorting::Crossline => (
            (0..cube.iline_count)
                .map(|i| label(io, i * n_off, iline))
                .collect::<Result<Vec<_>>>()?,
            (0..cube.xline_count)
                .map(|j| label(io, j * cube.iline_count * n_off, xline))
                .collect::<Result<Vec<_>>>()?,
        ),
        Sorting::Unknown => {
            return Err(SegyError::InconsistentGeometry(
                "cannot determine trace sorting".to_string(),
            ))
        }
    };
    let offsets = (0..n_off)
        .map(|k| label(io, k, offset))
        .collect::<Result<Vec<_>>>()?;

    Geometry::build(ilines, xlines, offsets, cube.sorting, io.metrics().tracecount)
}
