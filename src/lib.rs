//! segycube - structured cube access over SEG-Y trace files
//!
//! SEG-Y stores seismic data as a flat sequence of traces. This crate
//! reinterprets that sequence as a cube addressed by inline, crossline,
//! offset and sample depth, for both inline- and crossline-sorted files.
//!
//! # Features
//!
//! - Geometry inference from trace headers, or explicit reinterpretation
//! - Inline/crossline lines, gathers and depth slices as `ndarray` arrays
//! - Double-buffered streams over ranges, with slice-style label ranges
//! - Validated, atomically updated header field maps
//! - Write-back trace editing
//!
//! # Example
//!
//! ```rust,no_run
//! use segycube::{SegyConfig, SegyFile};
//!
//! # fn example() -> segycube::Result<()> {
//! let file = SegyFile::open("survey.sgy", SegyConfig::default())?;
//!
//! // One inline at the first offset, as [crosslines, samples]
//! let line = file.iline()?.get(1200)?;
//!
//! // Every inline, one step at a time
//! let mut lines = file.iline()?.range(.., ..)?;
//! while let Some(line) = lines.step() {
//!     let line = line?;
//!     println!("{:?}", line.dim());
//! }
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod config;
pub mod depth;
pub mod error;
pub mod field;
pub mod fields;
pub mod gather;
pub mod geometry;
pub mod header;
pub mod index;
pub mod io;
pub mod line;
pub mod metrics;
pub mod selector;
pub mod stream;
pub mod trace;
pub mod types;
pub mod utils;

// Re-exports
pub use access::SegyFile;
pub use config::{FieldRef, SegyConfig};
pub use depth::{Depth, DepthSelection};
pub use error::{Result, SegyError};
pub use field::{BinaryFieldMap, FieldMap, TraceFieldMap};
pub use fields::{binfield, tracefield, Field};
pub use gather::{Gather, GatherSelection};
pub use geometry::{Geometry, LineMetrics};
pub use header::Header;
pub use io::{FileIo, MemoryIo, TraceIo};
pub use line::{Line, LineSelection};
pub use metrics::{CubeMetrics, FileMetrics};
pub use selector::{Coord, GatherIndex, Index, LabelRange};
pub use stream::{Stream, StreamState};
pub use trace::{RefTraces, Trace, TraceSelection};
pub use types::{AxisDescriptor, Dimension, SampleFormat, Sorting};

/// Version of the segycube crate
pub const SEGYCUBE_VERSION: &str = env!("CARGO_PKG_VERSION");
