/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Error types for the Iron8583 ISO 8583 codec.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across all Iron8583 operations. Every failure is
//! local, synchronous, and terminal for the single pack/unpack call that
//! raised it; nothing is retried inside the codec.

use crate::encoding::Encoding;
use crate::types::FieldType;
use thiserror::Error;

/// Result type alias using [`IsoError`] as the error type.
pub type Result<T> = std::result::Result<T, IsoError>;

/// Top-level error type for all Iron8583 operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IsoError {
    /// Error while constructing a registry or dialect.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error during message packing.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error during message unpacking.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error in the declarative mapper.
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),
}

/// Errors raised while constructing a data element registry or dialect.
///
/// All of these surface at startup, before the first message is processed;
/// a successfully built [`crate::types::FieldType`]/encoding pairing is never
/// re-validated on the per-message path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Two definitions claim the same bit number.
    #[error("duplicate bit number: {bit}")]
    DuplicateBit {
        /// The contested bit number.
        bit: u8,
    },

    /// Bit number outside the data-element range 2-128.
    #[error("bit number out of range: {bit} (data elements occupy bits 2-128)")]
    BitOutOfRange {
        /// The offending bit number.
        bit: u8,
    },

    /// Registry construction was given no definitions.
    #[error("registry must contain at least one data element definition")]
    EmptyRegistry,

    /// A fixed-length field declared a zero length.
    #[error("invalid declared length for bit {bit}: fixed fields require a length > 0")]
    InvalidDeclaredLength {
        /// The bit number of the offending definition.
        bit: u8,
    },

    /// The effective encoding is not defined for the field's type.
    #[error("encoding {encoding} is not supported for {field_type} fields (bit {bit})")]
    UnsupportedEncoding {
        /// The bit number of the offending definition.
        bit: u8,
        /// The declared field type.
        field_type: FieldType,
        /// The effective (override or dialect default) encoding.
        encoding: Encoding,
    },

    /// Two sub-fields of a composite layout share a name.
    #[error("duplicate sub-field name: {name}")]
    DuplicateSubField {
        /// The contested sub-field name.
        name: String,
    },

    /// A composite layout declared a zero-width sub-field.
    #[error("invalid width for sub-field {name}: widths must be > 0")]
    InvalidSubFieldWidth {
        /// The offending sub-field name.
        name: String,
    },

    /// A bitmapped layout declared a sub-bit outside 2-64/2-128.
    #[error("sub-field bit out of range: {bit}")]
    SubBitOutOfRange {
        /// The offending sub-field bit number.
        bit: u8,
    },
}

/// Errors that occur while packing an [`crate::message::IsoMessage`] to bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A field in the message has no definition in the active registry.
    #[error("unknown field: bit {bit} has no registry definition")]
    UnknownField {
        /// The undefined bit number.
        bit: u8,
    },

    /// A variable-length value exceeds the maximum its prefix can express.
    #[error("field overflow on bit {bit}: length {length} exceeds maximum {max_length}")]
    FieldOverflow {
        /// The bit number of the field.
        bit: u8,
        /// Actual value length in characters or bytes.
        length: usize,
        /// Maximum length expressible by the field's length prefix.
        max_length: usize,
    },

    /// A fixed-length binary or composite value does not match its declared length.
    #[error("fixed length mismatch on bit {bit}: got {length}, declared {expected}")]
    FixedLengthMismatch {
        /// The bit number of the field.
        bit: u8,
        /// Actual value length in bytes.
        length: usize,
        /// Declared fixed length.
        expected: usize,
    },

    /// A value contains characters illegal for its field type or encoding.
    #[error("invalid value for bit {bit}: {value:?}")]
    InvalidFieldValue {
        /// The bit number of the field.
        bit: u8,
        /// A snippet of the offending value.
        value: String,
    },

    /// The value variant does not match the field definition.
    #[error("wrong value kind for bit {bit}: expected {expected}")]
    WrongValueKind {
        /// The bit number of the field.
        bit: u8,
        /// Human-readable description of the expected variant.
        expected: &'static str,
    },

    /// The message's MTI failed validation against the dialect version.
    #[error("mti error: {0}")]
    Mti(#[from] MtiError),

    /// A composite field's sub-element codec failed.
    #[error("sub-element encode failed on bit {bit}: {source}")]
    SubElement {
        /// The bit number of the composite field.
        bit: u8,
        /// The underlying sub-element failure.
        #[source]
        source: SubElementEncodeError,
    },
}

/// Errors that occur while unpacking raw bytes into an
/// [`crate::message::IsoMessage`].
///
/// Every variant carries the byte offset at which the failure was detected,
/// relative to the start of the message buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not enough bytes to decode the expected bitmap size.
    #[error("malformed bitmap at offset {offset}: expected {expected} bytes")]
    MalformedBitmap {
        /// Offset where the bitmap read began.
        offset: usize,
        /// Number of bitmap bytes the message promised.
        expected: usize,
    },

    /// The buffer ran out mid-field.
    #[error("insufficient bytes at offset {offset}: {needed} more required")]
    InsufficientBytes {
        /// Offset at which the shortfall was detected.
        offset: usize,
        /// Number of additional bytes required.
        needed: usize,
        /// The field being decoded, when one was in progress.
        field: Option<u8>,
    },

    /// A set bit has no definition in the active registry (strict mode).
    #[error("unsupported field at offset {offset}: bit {bit} has no registry definition")]
    UnsupportedField {
        /// The undefined bit number.
        bit: u8,
        /// Offset at which the field would have started.
        offset: usize,
    },

    /// Decoded bytes violate the field's type or encoding rules.
    #[error("invalid value for bit {bit} at offset {offset}: {reason}")]
    InvalidFieldValue {
        /// The bit number of the field.
        bit: u8,
        /// Offset of the offending bytes.
        offset: usize,
        /// Description of the violation.
        reason: String,
    },

    /// Bytes remain after the last field declared by the bitmap.
    #[error("trailing bytes at offset {offset}: {remaining} bytes after final field")]
    TrailingBytes {
        /// Offset of the first unconsumed byte.
        offset: usize,
        /// Number of unconsumed bytes.
        remaining: usize,
    },

    /// The MTI failed resolution against the dialect version.
    #[error("mti error: {0}")]
    Mti(#[from] MtiError),

    /// A composite field's sub-element codec failed.
    #[error("sub-element decode failed on bit {bit}: {source}")]
    SubElement {
        /// The bit number of the composite field.
        bit: u8,
        /// The underlying sub-element failure.
        #[source]
        source: SubElementDecodeError,
    },
}

impl DecodeError {
    /// Attaches the field being decoded to an insufficient-bytes error.
    ///
    /// Other variants already carry their field and pass through unchanged.
    #[must_use]
    pub fn with_field(self, bit: u8) -> Self {
        match self {
            Self::InsufficientBytes {
                offset,
                needed,
                field: None,
            } => Self::InsufficientBytes {
                offset,
                needed,
                field: Some(bit),
            },
            other => other,
        }
    }

    /// Rebases the carried offset by `base` bytes.
    ///
    /// Used when a component (e.g. the bitmap engine) reports offsets
    /// relative to its own slice rather than the whole message buffer.
    #[must_use]
    pub fn offset_by(self, base: usize) -> Self {
        match self {
            Self::MalformedBitmap { offset, expected } => Self::MalformedBitmap {
                offset: offset + base,
                expected,
            },
            Self::InsufficientBytes {
                offset,
                needed,
                field,
            } => Self::InsufficientBytes {
                offset: offset + base,
                needed,
                field,
            },
            Self::UnsupportedField { bit, offset } => Self::UnsupportedField {
                bit,
                offset: offset + base,
            },
            Self::InvalidFieldValue {
                bit,
                offset,
                reason,
            } => Self::InvalidFieldValue {
                bit,
                offset: offset + base,
                reason,
            },
            Self::TrailingBytes { offset, remaining } => Self::TrailingBytes {
                offset: offset + base,
                remaining,
            },
            other => other,
        }
    }
}

/// Errors raised while resolving a message type indicator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MtiError {
    /// Digit count does not match the dialect's configured version.
    #[error("unsupported version: expected {expected_digits}-digit mti, got {actual_digits}")]
    UnsupportedVersion {
        /// Digit count required by the dialect version.
        expected_digits: usize,
        /// Digit count actually presented.
        actual_digits: usize,
    },

    /// The leading version digit does not match the dialect version.
    #[error("version digit mismatch: expected '{expected}', got '{actual}'")]
    VersionDigitMismatch {
        /// Version digit required by the dialect.
        expected: char,
        /// Version digit actually presented.
        actual: char,
    },

    /// A digit position holds a reserved or non-numeric value.
    #[error("invalid {part} digit: '{digit}'")]
    InvalidDigit {
        /// The failing position: `version`, `class`, `function`, `origin`,
        /// or `mti` when the wire bytes could not be digit-decoded at all.
        part: &'static str,
        /// The offending character.
        digit: char,
    },
}

/// Errors raised by a sub-element codec while parsing composite field bytes.
///
/// Offsets are relative to the start of the composite field's value, not the
/// whole message; the wire layer wraps these with the owning bit number.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubElementDecodeError {
    /// The composite buffer ran out mid-element.
    #[error("unexpected end of sub-element data at offset {offset}: {needed} more required")]
    UnexpectedEof {
        /// Offset at which the shortfall was detected.
        offset: usize,
        /// Number of additional bytes required.
        needed: usize,
    },

    /// A TLV/BER-TLV tag could not be decoded.
    #[error("invalid tag at offset {offset}")]
    InvalidTag {
        /// Offset of the offending tag bytes.
        offset: usize,
    },

    /// A BER-TLV length field could not be decoded.
    #[error("invalid length at offset {offset}")]
    InvalidLength {
        /// Offset of the offending length bytes.
        offset: usize,
    },

    /// A nested bitmap could not be decoded.
    #[error("malformed nested bitmap at offset {offset}")]
    MalformedBitmap {
        /// Offset of the nested bitmap.
        offset: usize,
    },

    /// A nested bitmap sets a bit the layout does not declare.
    #[error("unknown sub-field bit: {bit}")]
    UnknownBit {
        /// The undeclared sub-field bit.
        bit: u8,
    },

    /// Bytes remain after the final declared sub-field.
    #[error("trailing bytes in composite field at offset {offset}")]
    TrailingBytes {
        /// Offset of the first unconsumed byte.
        offset: usize,
    },
}

/// Errors raised by a sub-element codec while packing a composite field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubElementEncodeError {
    /// A sub-field required by the layout is absent from the map.
    #[error("missing required sub-field: {key}")]
    MissingSubField {
        /// The absent sub-field key.
        key: String,
    },

    /// A map key does not name a valid tag, bit, or declared sub-field.
    #[error("invalid sub-field key: {key}")]
    InvalidKey {
        /// The offending key.
        key: String,
    },

    /// A sub-field value exceeds what its length encoding can express.
    #[error("sub-field {key} too long: {length} exceeds maximum {max}")]
    ValueTooLong {
        /// The offending sub-field key.
        key: String,
        /// Actual value length in bytes.
        length: usize,
        /// Maximum encodable length.
        max: usize,
    },

    /// A fixed-width sub-field value has the wrong width.
    #[error("sub-field {key} width mismatch: got {length}, declared {expected}")]
    WidthMismatch {
        /// The offending sub-field key.
        key: String,
        /// Actual value length in bytes.
        length: usize,
        /// Declared width.
        expected: usize,
    },
}

/// Errors raised by the declarative mapper.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A required binding found no value on the source side.
    #[error("missing required field: bit {bit}")]
    MissingField {
        /// The unmapped bit number.
        bit: u8,
    },

    /// A bound value has a variant the setter cannot accept.
    #[error("wrong value kind for bit {bit}: expected {expected}")]
    WrongKind {
        /// The bit number of the binding.
        bit: u8,
        /// Human-readable description of the expected variant.
        expected: &'static str,
    },
}
