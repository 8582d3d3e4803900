//! Open-time configuration

use crate::error::{Result, SegyError};
use crate::fields::{self, tracefield, Field};
use serde::{Deserialize, Serialize};

/// A trace header field given by byte position or by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldRef {
    Byte(u16),
    Name(String),
}

impl FieldRef {
    /// The trace header field this refers to
    pub fn resolve(&self) -> Result<Field> {
        let field = match self {
            FieldRef::Byte(byte) => Field(*byte),
            FieldRef::Name(name) => Field::from_name(name).ok_or_else(|| {
                SegyError::Configuration(format!("unknown header field name '{}'", name))
            })?,
        };
        fields::find_in(fields::TRACE_FIELDS, field)
            .map(|def| def.field)
            .ok_or_else(|| {
                SegyError::Configuration(format!("{} is not a trace header field", field))
            })
    }
}

impl From<Field> for FieldRef {
    fn from(field: Field) -> Self {
        FieldRef::Byte(field.byte())
    }
}

impl From<&str> for FieldRef {
    fn from(name: &str) -> Self {
        FieldRef::Name(name.to_string())
    }
}

/// How to open a file and discover its geometry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegyConfig {
    /// Header field holding the inline number
    pub iline: FieldRef,

    /// Header field holding the crossline number
    pub xline: FieldRef,

    /// Header field holding the offset
    pub offset: FieldRef,

    /// Skip geometry inference and open unstructured
    pub ignore_geometry: bool,

    /// Fail instead of falling back to unstructured access
    pub strict: bool,

    /// Open for writing
    pub writable: bool,
}

impl Default for SegyConfig {
    fn default() -> Self {
        Self {
            iline: tracefield::INLINE_3D.into(),
            xline: tracefield::CROSSLINE_3D.into(),
            offset: tracefield::OFFSET.into(),
            ignore_geometry: false,
            strict: false,
            writable: false,
        }
    }
}

impl SegyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iline(mut self, field: impl Into<FieldRef>) -> Self {
        self.iline = field.into();
        self
    }

    pub fn with_xline(mut self, field: impl Into<FieldRef>) -> Self {
        self.xline = field.into();
        self
    }

    pub fn with_offset(mut self, field: impl Into<FieldRef>) -> Self {
        self.offset = field.into();
        self
    }

    pub fn with_ignore_geometry(mut self, ignore: bool) -> Self {
        self.ignore_geometry = ignore;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }

    /// Parse a configuration from JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve the (inline, crossline, offset) label fields
    pub fn label_fields(&self) -> Result<(Field, Field, Field)> {
        Ok((
            self.iline.resolve()?,
            self.xline.resolve()?,
            self.offset.resolve()?,
        ))
    }
}
