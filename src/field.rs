//! Structured field maps over fixed-size header buffers
//!
//! A [`FieldMap`] exposes a 240-byte trace header or the 400-byte binary
//! header as a validated `Field -> i64` mapping. Keys are checked against the
//! static tables in [`fields`](crate::fields): keys outside the header's byte
//! span are unknown, keys inside it that do not start a defined field are out
//! of range.
//!
//! Maps fetched from a file are *backed*: [`FieldMap::set`] and
//! [`FieldMap::update`] commit to the file immediately. [`FieldMap::update`]
//! is all-or-nothing.

use crate::error::{Result, SegyError};
use crate::fields::{self, Field, FieldDef};
use crate::io::TraceIo;
use crate::metrics::{BINARY_HEADER_BASE, BINARY_HEADER_SIZE, TRACE_HEADER_SIZE};
use byteorder::{BigEndian, ByteOrder};
use bytes::{Bytes, BytesMut};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A kind of fixed-size header with its own field table
pub trait HeaderKind: Send + Sync + 'static {
    /// Human-readable name used in errors
    const NAME: &'static str;
    /// Buffer size in bytes
    const SIZE: usize;
    /// Byte position (1-based) of the first byte of the buffer
    const BASE: u16;

    /// Static field table, ordered by byte position
    fn table() -> &'static [FieldDef];

    /// Read the header from the backing store
    fn read(io: &dyn TraceIo, index: usize) -> Result<Bytes>;

    /// Write the header to the backing store
    fn write(io: &dyn TraceIo, index: usize, buf: &[u8]) -> Result<()>;
}

/// The 240-byte header preceding every trace
#[derive(Debug, Clone, Copy)]
pub struct TraceHeader;

/// The 400-byte binary file header
#[derive(Debug, Clone, Copy)]
pub struct BinaryHeader;

impl HeaderKind for TraceHeader {
    const NAME: &'static str = "trace header";
    const SIZE: usize = TRACE_HEADER_SIZE;
    const BASE: u16 = 1;

    fn table() -> &'static [FieldDef] {
        fields::TRACE_FIELDS
    }

    fn read(io: &dyn TraceIo, index: usize) -> Result<Bytes> {
        io.read_trace_header(index)
    }

    fn write(io: &dyn TraceIo, index: usize, buf: &[u8]) -> Result<()> {
        io.write_trace_header(index, buf)
    }
}

impl HeaderKind for BinaryHeader {
    const NAME: &'static str = "binary header";
    const SIZE: usize = BINARY_HEADER_SIZE;
    const BASE: u16 = BINARY_HEADER_BASE;

    fn table() -> &'static [FieldDef] {
        fields::BINARY_FIELDS
    }

    fn read(io: &dyn TraceIo, _index: usize) -> Result<Bytes> {
        io.read_binary_header()
    }

    fn write(io: &dyn TraceIo, _index: usize, buf: &[u8]) -> Result<()> {
        io.write_binary_header(buf)
    }
}

/// Decode `def` from a buffer whose first byte sits at byte position `base`
pub(crate) fn decode(def: &FieldDef, buf: &[u8], base: u16) -> i64 {
    let pos = (def.field.byte() - base) as usize;
    let window = &buf[pos..pos + def.width as usize];
    match def.width {
        1 => window[0] as i64,
        2 => BigEndian::read_i16(window) as i64,
        4 => BigEndian::read_i32(window) as i64,
        _ => BigEndian::read_u64(window) as i64,
    }
}

fn encode(def: &FieldDef, buf: &mut [u8], base: u16, value: i64) {
    let pos = (def.field.byte() - base) as usize;
    let window = &mut buf[pos..pos + def.width as usize];
    match def.width {
        1 => window[0] = value as u8,
        2 => BigEndian::write_i16(window, value as i16),
        4 => BigEndian::write_i32(window, value as i32),
        _ => BigEndian::write_u64(window, value as u64),
    }
}

/// Mutable, validated mapping from header fields to integer values
pub struct FieldMap<K: HeaderKind> {
    buf: BytesMut,
    backing: Option<(Arc<dyn TraceIo>, usize)>,
    _kind: PhantomData<K>,
}

/// Field map over a trace header
pub type TraceFieldMap = FieldMap<TraceHeader>;

/// Field map over the binary header
pub type BinaryFieldMap = FieldMap<BinaryHeader>;

impl<K: HeaderKind> FieldMap<K> {
    /// An all-zero header not attached to any file
    pub fn detached() -> Self {
        Self {
            buf: BytesMut::zeroed(K::SIZE),
            backing: None,
            _kind: PhantomData,
        }
    }

    /// A detached header initialised from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != K::SIZE {
            return Err(SegyError::OutOfRange(format!(
                "{} must be {} bytes, got {}",
                K::NAME,
                K::SIZE,
                bytes.len()
            )));
        }
        Ok(Self {
            buf: BytesMut::from(bytes),
            backing: None,
            _kind: PhantomData,
        })
    }

    /// Fetch the header of trace `index` (ignored for the binary header)
    pub(crate) fn load(io: Arc<dyn TraceIo>, index: usize) -> Result<Self> {
        let mut map = Self::detached();
        map.backing = Some((io, index));
        map.reload()?;
        Ok(map)
    }

    /// Point a backed map at another trace and refill its buffer in place
    pub(crate) fn load_index(&mut self, io: &Arc<dyn TraceIo>, index: usize) -> Result<()> {
        let bytes = K::read(io.as_ref(), index)?;
        self.fill(&bytes)?;
        self.backing = Some((Arc::clone(io), index));
        Ok(())
    }

    /// Re-read the buffer from the backing store, discarding local state
    pub fn reload(&mut self) -> Result<()> {
        if let Some((io, index)) = &self.backing {
            let bytes = K::read(io.as_ref(), *index)?;
            self.fill(&bytes)?;
        }
        Ok(())
    }

    fn fill(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != K::SIZE {
            return Err(SegyError::InvalidFormat(format!(
                "{} read returned {} bytes",
                K::NAME,
                bytes.len()
            )));
        }
        self.buf.clear();
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Trace index of a backed trace header
    pub fn index(&self) -> Option<usize> {
        self.backing.as_ref().map(|(_, index)| *index)
    }

    /// Whether writes are committed to a file
    pub fn is_backed(&self) -> bool {
        self.backing.is_some()
    }

    /// The raw header bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    fn def(field: Field) -> Result<&'static FieldDef> {
        let end = K::BASE as usize + K::SIZE;
        if (field.byte() as usize) < K::BASE as usize || field.byte() as usize >= end {
            return Err(SegyError::UnknownField(format!("{} in {}", field, K::NAME)));
        }
        fields::find_in(K::table(), field).ok_or_else(|| {
            SegyError::OutOfRange(format!(
                "byte {} does not start a {} field",
                field.byte(),
                K::NAME
            ))
        })
    }

    /// Read one field
    pub fn get(&self, field: impl Into<Field>) -> Result<i64> {
        let def = Self::def(field.into())?;
        Ok(decode(def, &self.buf, K::BASE))
    }

    /// Read several fields; fails on the first invalid key
    pub fn get_many<F, I>(&self, fields: I) -> Result<BTreeMap<Field, i64>>
    where
        F: Into<Field>,
        I: IntoIterator<Item = F>,
    {
        fields
            .into_iter()
            .map(|f| {
                let field = f.into();
                Ok((field, self.get(field)?))
            })
            .collect()
    }

    /// Write one field and commit it
    pub fn set(&mut self, field: impl Into<Field>, value: i64) -> Result<()> {
        self.update([(field.into(), value)])
    }

    /// Write several fields and commit them together
    ///
    /// The writes are staged on a copy of the buffer; the copy replaces the
    /// buffer only once every pair has validated and the commit succeeded.
    pub fn update<F, I>(&mut self, pairs: I) -> Result<()>
    where
        F: Into<Field>,
        I: IntoIterator<Item = (F, i64)>,
    {
        let mut staged = self.buf.clone();
        for (field, value) in pairs {
            let field = field.into();
            let def = Self::def(field)?;
            if !def.accepts(value) {
                return Err(SegyError::OutOfRange(format!(
                    "value {} does not fit {} ({} bytes)",
                    value, field, def.width
                )));
            }
            encode(def, &mut staged, K::BASE, value);
        }

        if let Some((io, index)) = &self.backing {
            K::write(io.as_ref(), *index, &staged)?;
        }
        self.buf = staged;
        Ok(())
    }

    /// All defined field keys, in byte order
    pub fn keys(&self) -> impl Iterator<Item = Field> + '_ {
        K::table().iter().map(|def| def.field)
    }

    /// All `(field, value)` pairs, in byte order
    pub fn iter(&self) -> impl Iterator<Item = (Field, i64)> + '_ {
        K::table()
            .iter()
            .map(move |def| (def.field, decode(def, &self.buf, K::BASE)))
    }

    /// Number of defined fields
    pub fn len(&self) -> usize {
        K::table().len()
    }

    pub fn is_empty(&self) -> bool {
        K::table().is_empty()
    }

    /// Copy all fields into an ordered map
    pub fn to_map(&self) -> BTreeMap<Field, i64> {
        self.iter().collect()
    }

    /// Copy the buffer into a detached map
    pub fn detach(&self) -> Self {
        Self {
            buf: self.buf.clone(),
            backing: None,
            _kind: PhantomData,
        }
    }
}

impl<K: HeaderKind> Clone for FieldMap<K> {
    fn clone(&self) -> Self {
        Self {
            buf: self.buf.clone(),
            backing: self.backing.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: HeaderKind> Default for FieldMap<K> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<K: HeaderKind> PartialEq for FieldMap<K> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<K: HeaderKind> PartialEq<BTreeMap<Field, i64>> for FieldMap<K> {
    fn eq(&self, other: &BTreeMap<Field, i64>) -> bool {
        self.len() == other.len() && self.iter().all(|(f, v)| other.get(&f) == Some(&v))
    }
}

impl<K: HeaderKind> fmt::Debug for FieldMap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMap")
            .field("kind", &K::NAME)
            .field("index", &self.index())
            .field(
                "nonzero",
                &self.iter().filter(|(_, v)| *v != 0).collect::<Vec<_>>(),
            )
            .finish()
    }
}
