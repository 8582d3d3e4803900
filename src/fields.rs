//! Static header field tables
//!
//! Fields are keyed by their 1-based SEG-Y byte position: 1..=240 for trace
//! headers and 3201..=3600 for the binary header. The tables are immutable
//! process-wide data; [`FieldMap`](crate::field::FieldMap) validates keys
//! against them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A header field key: the 1-based byte position of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Field(pub u16);

impl Field {
    /// Canonical integer form of the key
    pub fn byte(&self) -> u16 {
        self.0
    }

    /// Resolve a field by canonical name (`"INLINE_3D"`) or short alias
    /// (`"iline"`). Binary header names are searched after trace names.
    pub fn from_name(name: &str) -> Option<Field> {
        ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
            .map(|(_, field)| *field)
            .or_else(|| {
                TRACE_FIELDS
                    .iter()
                    .chain(BINARY_FIELDS.iter())
                    .find(|def| def.name.eq_ignore_ascii_case(name))
                    .map(|def| def.field)
            })
    }
}

impl From<u16> for Field {
    fn from(byte: u16) -> Self {
        Field(byte)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match lookup(*self) {
            Some(def) => write!(f, "{} ({})", def.name, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// One entry of a static field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field: Field,
    /// Width in bytes: 1, 2, 4 or 8
    pub width: u8,
}

impl FieldDef {
    /// 2- and 4-byte fields are two's complement; 1- and 8-byte fields are unsigned
    pub fn is_signed(&self) -> bool {
        matches!(self.width, 2 | 4)
    }

    /// Check that `value` is representable in this field
    pub fn accepts(&self, value: i64) -> bool {
        match (self.width, self.is_signed()) {
            (1, _) => (0..=u8::MAX as i64).contains(&value),
            (2, true) => (i16::MIN as i64..=i16::MAX as i64).contains(&value),
            (4, true) => (i32::MIN as i64..=i32::MAX as i64).contains(&value),
            (8, _) => value >= 0,
            _ => false,
        }
    }
}

macro_rules! field_table {
    ($(#[$doc:meta])* $table:ident { $( $name:ident = $byte:literal : $width:literal ),* $(,)? }) => {
        $( pub const $name: Field = Field($byte); )*

        $(#[$doc])*
        pub static $table: &[FieldDef] = &[
            $( FieldDef { name: stringify!($name), field: Field($byte), width: $width }, )*
        ];
    };
}

/// Trace header field keys
pub mod tracefield {
    use super::{Field, FieldDef};

    field_table! {
        /// Trace header layout, ordered by byte position
        TABLE {
            TRACE_SEQUENCE_LINE = 1: 4,
            TRACE_SEQUENCE_FILE = 5: 4,
            FIELD_RECORD = 9: 4,
            TRACE_NUMBER = 13: 4,
            ENERGY_SOURCE_POINT = 17: 4,
            CDP = 21: 4,
            CDP_TRACE = 25: 4,
            TRACE_IDENTIFICATION_CODE = 29: 2,
            N_SUMMED_TRACES = 31: 2,
            N_STACKED_TRACES = 33: 2,
            DATA_USE = 35: 2,
            OFFSET = 37: 4,
            RECEIVER_GROUP_ELEVATION = 41: 4,
            SOURCE_SURFACE_ELEVATION = 45: 4,
            SOURCE_DEPTH = 49: 4,
            RECEIVER_DATUM_ELEVATION = 53: 4,
            SOURCE_DATUM_ELEVATION = 57: 4,
            SOURCE_WATER_DEPTH = 61: 4,
            GROUP_WATER_DEPTH = 65: 4,
            ELEVATION_SCALAR = 69: 2,
            SOURCE_GROUP_SCALAR = 71: 2,
            SOURCE_X = 73: 4,
            SOURCE_Y = 77: 4,
            GROUP_X = 81: 4,
            GROUP_Y = 85: 4,
            COORDINATE_UNITS = 89: 2,
            WEATHERING_VELOCITY = 91: 2,
            SUB_WEATHERING_VELOCITY = 93: 2,
            SOURCE_UPHOLE_TIME = 95: 2,
            GROUP_UPHOLE_TIME = 97: 2,
            SOURCE_STATIC_CORRECTION = 99: 2,
            GROUP_STATIC_CORRECTION = 101: 2,
            TOTAL_STATIC_APPLIED = 103: 2,
            LAG_TIME_A = 105: 2,
            LAG_TIME_B = 107: 2,
            DELAY_RECORDING_TIME = 109: 2,
            MUTE_TIME_START = 111: 2,
            MUTE_TIME_END = 113: 2,
            TRACE_SAMPLE_COUNT = 115: 2,
            TRACE_SAMPLE_INTERVAL = 117: 2,
            GAIN_TYPE = 119: 2,
            INSTRUMENT_GAIN_CONSTANT = 121: 2,
            INSTRUMENT_INITIAL_GAIN = 123: 2,
            CORRELATED = 125: 2,
            SWEEP_FREQUENCY_START = 127: 2,
            SWEEP_FREQUENCY_END = 129: 2,
            SWEEP_LENGTH = 131: 2,
            SWEEP_TYPE = 133: 2,
            SWEEP_TRACE_TAPER_LENGTH_START = 135: 2,
            SWEEP_TRACE_TAPER_LENGTH_END = 137: 2,
            TAPER_TYPE = 139: 2,
            ALIAS_FILTER_FREQUENCY = 141: 2,
            ALIAS_FILTER_SLOPE = 143: 2,
            NOTCH_FILTER_FREQUENCY = 145: 2,
            NOTCH_FILTER_SLOPE = 147: 2,
            LOW_CUT_FREQUENCY = 149: 2,
            HIGH_CUT_FREQUENCY = 151: 2,
            LOW_CUT_SLOPE = 153: 2,
            HIGH_CUT_SLOPE = 155: 2,
            YEAR_DATA_RECORDED = 157: 2,
            DAY_OF_YEAR = 159: 2,
            HOUR_OF_DAY = 161: 2,
            MINUTE_OF_HOUR = 163: 2,
            SECOND_OF_MINUTE = 165: 2,
            TIME_BASE_CODE = 167: 2,
            TRACE_WEIGHTING_FACTOR = 169: 2,
            GEOPHONE_GROUP_NUMBER_ROLL1 = 171: 2,
            GEOPHONE_GROUP_NUMBER_FIRST_TRACE_ORIG_FIELD = 173: 2,
            GEOPHONE_GROUP_NUMBER_LAST_TRACE_ORIG_FIELD = 175: 2,
            GAP_SIZE = 177: 2,
            OVER_TRAVEL = 179: 2,
            CDP_X = 181: 4,
            CDP_Y = 185: 4,
            INLINE_3D = 189: 4,
            CROSSLINE_3D = 193: 4,
            SHOT_POINT = 197: 4,
            SHOT_POINT_SCALAR = 201: 2,
            TRACE_VALUE_MEASUREMENT_UNIT = 203: 2,
            TRANSDUCTION_CONSTANT_MANTISSA = 205: 4,
            TRANSDUCTION_CONSTANT_POWER = 209: 2,
            TRANSDUCTION_UNIT = 211: 2,
            TRACE_IDENTIFIER = 213: 2,
            SCALAR_TRACE_HEADER = 215: 2,
            SOURCE_TYPE = 217: 2,
            SOURCE_ENERGY_DIRECTION_MANTISSA = 219: 4,
            SOURCE_ENERGY_DIRECTION_EXPONENT = 223: 2,
            SOURCE_MEASUREMENT_MANTISSA = 225: 4,
            SOURCE_MEASUREMENT_EXPONENT = 229: 2,
            SOURCE_MEASUREMENT_UNIT = 231: 2,
            UNASSIGNED_INT1 = 233: 4,
            UNASSIGNED_INT2 = 237: 4,
        }
    }
}

/// Binary header field keys
pub mod binfield {
    use super::{Field, FieldDef};

    field_table! {
        /// Binary header layout, ordered by byte position
        TABLE {
            JOB_ID = 3201: 4,
            LINE_NUMBER = 3205: 4,
            REEL_NUMBER = 3209: 4,
            TRACES = 3213: 2,
            AUX_TRACES = 3215: 2,
            INTERVAL = 3217: 2,
            INTERVAL_ORIGINAL = 3219: 2,
            SAMPLES = 3221: 2,
            SAMPLES_ORIGINAL = 3223: 2,
            FORMAT = 3225: 2,
            ENSEMBLE_FOLD = 3227: 2,
            SORTING_CODE = 3229: 2,
            VERTICAL_SUM = 3231: 2,
            SWEEP_FREQUENCY_START = 3233: 2,
            SWEEP_FREQUENCY_END = 3235: 2,
            SWEEP_LENGTH = 3237: 2,
            SWEEP = 3239: 2,
            SWEEP_CHANNEL = 3241: 2,
            SWEEP_TAPER_START = 3243: 2,
            SWEEP_TAPER_END = 3245: 2,
            TAPER = 3247: 2,
            CORRELATED_TRACES = 3249: 2,
            BINARY_GAIN_RECOVERY = 3251: 2,
            AMPLITUDE_RECOVERY = 3253: 2,
            MEASUREMENT_SYSTEM = 3255: 2,
            IMPULSE_SIGNAL_POLARITY = 3257: 2,
            VIBRATORY_POLARITY = 3259: 2,
            EXT_TRACES = 3261: 4,
            EXT_AUX_TRACES = 3265: 4,
            EXT_SAMPLES = 3269: 4,
            EXT_INTERVAL = 3273: 8,
            EXT_INTERVAL_ORIGINAL = 3281: 8,
            EXT_SAMPLES_ORIGINAL = 3289: 4,
            EXT_ENSEMBLE_FOLD = 3293: 4,
            INTEGER_CONSTANT = 3297: 4,
            SEGY_REVISION = 3501: 1,
            SEGY_REVISION_MINOR = 3502: 1,
            TRACE_FLAG = 3503: 2,
            EXTENDED_HEADERS = 3505: 2,
            MAX_ADDITIONAL_TRACE_HEADERS = 3507: 4,
            TIME_BASE_CODE = 3511: 2,
            NUMBER_OF_TRACES = 3513: 8,
            FIRST_TRACE_OFFSET = 3521: 8,
            TRAILER_STANZAS = 3529: 4,
        }
    }
}

pub use binfield::TABLE as BINARY_FIELDS;
pub use tracefield::TABLE as TRACE_FIELDS;

/// Short aliases accepted wherever a field is named in configuration
pub static ALIASES: &[(&str, Field)] = &[
    ("iline", tracefield::INLINE_3D),
    ("inline", tracefield::INLINE_3D),
    ("xline", tracefield::CROSSLINE_3D),
    ("crossline", tracefield::CROSSLINE_3D),
    ("offset", tracefield::OFFSET),
    ("cdp", tracefield::CDP),
    ("cdp_x", tracefield::CDP_X),
    ("cdp_y", tracefield::CDP_Y),
    ("sx", tracefield::SOURCE_X),
    ("sy", tracefield::SOURCE_Y),
    ("gx", tracefield::GROUP_X),
    ("gy", tracefield::GROUP_Y),
    ("ns", tracefield::TRACE_SAMPLE_COUNT),
    ("dt", tracefield::TRACE_SAMPLE_INTERVAL),
    ("delrt", tracefield::DELAY_RECORDING_TIME),
    ("fldr", tracefield::FIELD_RECORD),
    ("tracl", tracefield::TRACE_SEQUENCE_LINE),
    ("tracr", tracefield::TRACE_SEQUENCE_FILE),
    ("format", binfield::FORMAT),
    ("hns", binfield::SAMPLES),
    ("hdt", binfield::INTERVAL),
];

/// Find the table entry for a field in either header kind
pub fn lookup(field: Field) -> Option<&'static FieldDef> {
    find_in(TRACE_FIELDS, field).or_else(|| find_in(BINARY_FIELDS, field))
}

/// Binary search a byte-ordered table for a field start
pub(crate) fn find_in(table: &'static [FieldDef], field: Field) -> Option<&'static FieldDef> {
    table
        .binary_search_by_key(&field, |def| def.field)
        .ok()
        .map(|i| &table[i])
}
