/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Field primitives for ISO 8583 messages.
//!
//! This module provides:
//! - [`FieldType`]: character class of a data element's value
//! - [`LengthType`]: how a data element's length is signaled on the wire
//! - [`FieldValue`]: enumeration of possible field value shapes
//! - [`Stan`]: system trace audit number (field 11) wrapper
//! - [`TransmissionTime`]: transmission date/time (field 7) helper

use arrayvec::ArrayString;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Map of sub-element keys to raw values inside a composite field.
///
/// Keys are layout names for positional codecs, uppercase hex tags for
/// TLV/BER-TLV, and decimal bit numbers for bitmapped codecs. A `BTreeMap`
/// keeps packing deterministic.
pub type SubElementMap = BTreeMap<String, Bytes>;

/// Character class of an ISO 8583 data element.
///
/// The conventional single-letter notation from the standard is accepted by
/// [`FromStr`] (`n`, `a`, `an`, `ans`, `b`, `z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Decimal digits only (`n`).
    Numeric,
    /// Letters and space (`a`).
    Alpha,
    /// Letters, digits, and space (`an`).
    AlphaNumeric,
    /// Printable characters including specials (`ans`).
    AlphaNumericSpecial,
    /// Raw bytes (`b`).
    Binary,
    /// Magnetic track data: digits plus the track separators (`z`).
    Track,
}

impl FieldType {
    /// Returns true if the byte is legal for this character class.
    #[must_use]
    pub const fn is_valid_byte(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alpha => byte.is_ascii_alphabetic() || byte == b' ',
            Self::AlphaNumeric => byte.is_ascii_alphanumeric() || byte == b' ',
            Self::AlphaNumericSpecial => byte >= 0x20 && byte <= 0x7E,
            Self::Binary => true,
            Self::Track => byte.is_ascii_digit() || byte == b'=' || byte == b'D',
        }
    }

    /// Returns true if every byte of `value` is legal for this class.
    #[must_use]
    pub fn is_valid_text(&self, value: &str) -> bool {
        value.bytes().all(|b| self.is_valid_byte(b))
    }

    /// Returns true if values of this type carry decimal digits.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric)
    }

    /// Returns true if values of this type are textual (non-binary).
    #[must_use]
    pub const fn is_text(&self) -> bool {
        !matches!(self, Self::Binary)
    }

    /// Returns the pad character for under-length fixed values, if any.
    ///
    /// Numeric and track fields pad left with `'0'`; the alpha family pads
    /// right with `' '`; binary values are never padded.
    #[must_use]
    pub const fn pad_byte(&self) -> Option<u8> {
        match self {
            Self::Numeric | Self::Track => Some(b'0'),
            Self::Alpha | Self::AlphaNumeric | Self::AlphaNumericSpecial => Some(b' '),
            Self::Binary => None,
        }
    }

    /// Returns true if padding goes on the left (numeric-style).
    #[must_use]
    pub const fn pads_left(&self) -> bool {
        matches!(self, Self::Numeric | Self::Track)
    }

    /// Returns the conventional notation for this type.
    #[must_use]
    pub const fn notation(&self) -> &'static str {
        match self {
            Self::Numeric => "n",
            Self::Alpha => "a",
            Self::AlphaNumeric => "an",
            Self::AlphaNumericSpecial => "ans",
            Self::Binary => "b",
            Self::Track => "z",
        }
    }
}

impl FromStr for FieldType {
    type Err = std::convert::Infallible;

    /// Creates a `FieldType` from the conventional notation.
    ///
    /// Unknown notations resolve to the most permissive text class.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "n" => Self::Numeric,
            "a" => Self::Alpha,
            "an" => Self::AlphaNumeric,
            "b" => Self::Binary,
            "z" => Self::Track,
            _ => Self::AlphaNumericSpecial,
        })
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}

/// How a data element's length is signaled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthType {
    /// Fixed width; the payload carries the declared length.
    Fixed(usize),
    /// One-digit length prefix (max 9).
    LVar,
    /// Two-digit length prefix (max 99).
    LlVar,
    /// Three-digit length prefix (max 999).
    LllVar,
    /// Four-digit length prefix (max 9999).
    LlllVar,
}

impl LengthType {
    /// Number of decimal digits in the length prefix; 0 for fixed fields.
    #[must_use]
    pub const fn prefix_digits(&self) -> usize {
        match self {
            Self::Fixed(_) => 0,
            Self::LVar => 1,
            Self::LlVar => 2,
            Self::LllVar => 3,
            Self::LlllVar => 4,
        }
    }

    /// Maximum value length this length type can carry.
    ///
    /// For variable types this is `10^prefix_digits - 1`; for fixed fields
    /// it is the declared length itself.
    #[must_use]
    pub const fn max_length(&self) -> usize {
        match self {
            Self::Fixed(len) => *len,
            Self::LVar => 9,
            Self::LlVar => 99,
            Self::LllVar => 999,
            Self::LlllVar => 9999,
        }
    }

    /// Returns true if the length is signaled by a prefix.
    #[must_use]
    pub const fn is_variable(&self) -> bool {
        !matches!(self, Self::Fixed(_))
    }
}

impl fmt::Display for LengthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(len) => write!(f, "FIXED({len})"),
            Self::LVar => write!(f, "LVAR"),
            Self::LlVar => write!(f, "LLVAR"),
            Self::LllVar => write!(f, "LLLVAR"),
            Self::LlllVar => write!(f, "LLLLVAR"),
        }
    }
}

/// Value of one data element inside a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Textual value (numeric, alpha, track).
    Text(String),
    /// Raw binary value.
    Binary(Bytes),
    /// Composite value handled by a sub-element codec.
    Composite(SubElementMap),
}

impl FieldValue {
    /// Returns the value as a string slice, if it is textual.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as raw bytes, if it is binary.
    #[must_use]
    pub const fn as_binary(&self) -> Option<&Bytes> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a sub-element map, if it is composite.
    #[must_use]
    pub const fn as_composite(&self) -> Option<&SubElementMap> {
        match self {
            Self::Composite(m) => Some(m),
            _ => None,
        }
    }

    /// Parses a textual value as a decimal number.
    ///
    /// Convenient for amount fields, which travel as digit strings.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        self.as_text().and_then(|s| Decimal::from_str(s).ok())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Bytes> for FieldValue {
    fn from(value: Bytes) -> Self {
        Self::Binary(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(Bytes::from(value))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Binary(b) => write!(f, "<{} bytes>", b.len()),
            Self::Composite(m) => write!(f, "<{} sub-elements>", m.len()),
        }
    }
}

/// Maximum value of a system trace audit number.
pub const STAN_MAX: u32 = 999_999;

/// System trace audit number (field 11).
///
/// STANs identify a transaction leg within a business day. They run from
/// 1 to 999999 and wrap back to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Stan(u32);

impl Stan {
    /// Creates a new STAN.
    ///
    /// # Arguments
    /// * `value` - The trace number (must be in 1-999999)
    ///
    /// # Returns
    /// `Some(Stan)` if the value is in range, `None` otherwise.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value >= 1 && value <= STAN_MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the raw trace number.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the next STAN, wrapping from 999999 back to 1.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        if self.0 >= STAN_MAX {
            Self(1)
        } else {
            Self(self.0 + 1)
        }
    }

    /// Renders the STAN as the zero-padded six-digit wire form.
    #[must_use]
    pub fn to_field(self) -> ArrayString<6> {
        let mut buf = ArrayString::new();
        let _ = fmt::write(&mut buf, format_args!("{:06}", self.0));
        buf
    }
}

impl Default for Stan {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for Stan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_field())
    }
}

impl Stan {
    /// Parses a STAN from its wire form.
    ///
    /// # Returns
    /// `Some(Stan)` for an in-range digit string, `None` otherwise.
    #[must_use]
    pub fn from_field(field: &str) -> Option<Self> {
        field.parse::<u32>().ok().and_then(Self::new)
    }
}

/// Transmission date and time (field 7), `MMDDhhmmss` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransmissionTime {
    inner: DateTime<Utc>,
}

impl TransmissionTime {
    /// Returns the current UTC transmission time.
    #[must_use]
    pub fn now() -> Self {
        Self { inner: Utc::now() }
    }

    /// Wraps an existing UTC datetime.
    #[must_use]
    pub const fn from_datetime(inner: DateTime<Utc>) -> Self {
        Self { inner }
    }

    /// Renders the ten-digit `MMDDhhmmss` wire form.
    #[must_use]
    pub fn to_field(self) -> ArrayString<10> {
        let mut buf = ArrayString::new();
        let _ = fmt::write(
            &mut buf,
            format_args!("{}", self.inner.format("%m%d%H%M%S")),
        );
        buf
    }

    /// Parses a `MMDDhhmmss` field using the supplied year.
    ///
    /// The wire form carries no year, so the caller provides it from
    /// context (typically the current business date).
    #[must_use]
    pub fn parse_with_year(field: &str, year: i32) -> Option<Self> {
        if field.len() != 10 || !field.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let month: u32 = field[0..2].parse().ok()?;
        let day: u32 = field[2..4].parse().ok()?;
        let hour: u32 = field[4..6].parse().ok()?;
        let minute: u32 = field[6..8].parse().ok()?;
        let second: u32 = field[8..10].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let naive = date.and_hms_opt(hour, minute, second)?;
        Some(Self {
            inner: Utc.from_utc_datetime(&naive),
        })
    }

    /// Returns the wrapped UTC datetime.
    #[must_use]
    pub const fn datetime(self) -> DateTime<Utc> {
        self.inner
    }
}

impl fmt::Display for TransmissionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_field())
    }
}
