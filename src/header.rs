//! Trace header access by index

use crate::error::Result;
use crate::field::TraceFieldMap;
use crate::fields::Field;
use crate::io::TraceIo;
use crate::selector::LabelRange;
use crate::stream::Stream;
use ndarray::Array1;
use std::sync::Arc;

/// Accessor for trace headers as field maps
#[derive(Clone)]
pub struct Header {
    io: Arc<dyn TraceIo>,
    tracecount: usize,
}

impl Header {
    pub(crate) fn new(io: Arc<dyn TraceIo>) -> Self {
        let tracecount = io.metrics().tracecount;
        Self { io, tracecount }
    }

    pub fn len(&self) -> usize {
        self.tracecount
    }

    pub fn is_empty(&self) -> bool {
        self.tracecount == 0
    }

    /// Header of trace `index`, backed by the file
    pub fn get(&self, index: usize) -> Result<TraceFieldMap> {
        TraceFieldMap::load(Arc::clone(&self.io), index)
    }

    /// Stream the headers of a range of traces through one reused map
    pub fn range(&self, indices: impl Into<LabelRange>) -> Result<Stream<usize, TraceFieldMap>> {
        let indices = indices.into().resolve_dense(self.tracecount)?;
        let io = Arc::clone(&self.io);
        Ok(Stream::new(
            indices,
            TraceFieldMap::detached(),
            move |&i, header| header.load_index(&io, i),
        ))
    }

    /// Update fields of one header; either every pair is written or none
    pub fn put<F, I>(&self, index: usize, pairs: I) -> Result<()>
    where
        F: Into<Field>,
        I: IntoIterator<Item = (F, i64)>,
    {
        self.get(index)?.update(pairs)
    }

    /// One field over a range of traces
    pub fn attributes(
        &self,
        field: impl Into<Field>,
        indices: impl Into<LabelRange>,
    ) -> Result<Array1<i64>> {
        let field = field.into();
        // Validate the key even if the range turns out empty
        TraceFieldMap::detached().get(field)?;

        let indices = indices.into().resolve_dense(self.tracecount)?;
        let values = indices
            .into_iter()
            .map(|i| self.io.read_field(i, field))
            .collect::<Result<Vec<_>>>()?;
        Ok(Array1::from_vec(values))
    }
}
