/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Bitmapped sub-element codec.
//!
//! Some composite fields nest the message-level structure: a bitmap (same
//! rules as the outer one, indicator bit included) followed by fixed-width
//! sub-fields in ascending bit order. Keys in parsed maps are the decimal
//! sub-field bit numbers.

use bytes::Bytes;
use iron8583_core::bitmap::Bitmap;
use iron8583_core::error::{ConfigError, SubElementDecodeError, SubElementEncodeError};
use iron8583_core::types::SubElementMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One fixed-width sub-field addressed by a nested bitmap bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitmappedField {
    /// Sub-field bit number (2-128; bit 1 is the nested indicator).
    pub bit: u8,
    /// Descriptive name.
    pub name: String,
    /// Width in bytes.
    pub width: usize,
}

impl BitmappedField {
    /// Creates a new bitmapped sub-field.
    ///
    /// # Arguments
    /// * `bit` - The nested bitmap bit number
    /// * `name` - A descriptive name
    /// * `width` - The width in bytes
    #[must_use]
    pub fn new(bit: u8, name: impl Into<String>, width: usize) -> Self {
        Self {
            bit,
            name: name.into(),
            width,
        }
    }
}

/// Nested-bitmap sub-field layout for one composite field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitmappedLayout {
    fields: BTreeMap<u8, BitmappedField>,
}

impl BitmappedLayout {
    /// Builds a layout, validating the declarations.
    ///
    /// # Errors
    /// Returns [`ConfigError::SubBitOutOfRange`] for bits outside 2-128,
    /// [`ConfigError::DuplicateBit`] for repeated bits, and
    /// [`ConfigError::InvalidSubFieldWidth`] for zero widths.
    pub fn new(fields: Vec<BitmappedField>) -> Result<Self, ConfigError> {
        let mut map = BTreeMap::new();
        for field in fields {
            if !(2..=128).contains(&field.bit) {
                return Err(ConfigError::SubBitOutOfRange { bit: field.bit });
            }
            if field.width == 0 {
                return Err(ConfigError::InvalidSubFieldWidth { name: field.name });
            }
            if map.insert(field.bit, field.clone()).is_some() {
                return Err(ConfigError::DuplicateBit { bit: field.bit });
            }
        }
        Ok(Self { fields: map })
    }

    /// Looks up a sub-field declaration by bit.
    #[must_use]
    pub fn get(&self, bit: u8) -> Option<&BitmappedField> {
        self.fields.get(&bit)
    }

    /// Iterates declarations in ascending bit order.
    pub fn fields(&self) -> impl Iterator<Item = &BitmappedField> {
        self.fields.values()
    }

    /// Parses a nested bitmap plus its sub-fields.
    pub(crate) fn parse(&self, bytes: &[u8]) -> Result<SubElementMap, SubElementDecodeError> {
        let (bitmap, mut offset) = Bitmap::from_bytes(bytes)
            .map_err(|_| SubElementDecodeError::MalformedBitmap { offset: 0 })?;

        let mut map = SubElementMap::new();
        for bit in bitmap.bits() {
            let field = self
                .fields
                .get(&bit)
                .ok_or(SubElementDecodeError::UnknownBit { bit })?;
            let remaining = bytes.len() - offset;
            if remaining < field.width {
                return Err(SubElementDecodeError::UnexpectedEof {
                    offset,
                    needed: field.width - remaining,
                });
            }
            map.insert(
                bit.to_string(),
                Bytes::copy_from_slice(&bytes[offset..offset + field.width]),
            );
            offset += field.width;
        }

        if offset != bytes.len() {
            return Err(SubElementDecodeError::TrailingBytes { offset });
        }
        Ok(map)
    }

    /// Assembles a nested bitmap plus sub-fields from a map.
    pub(crate) fn pack(&self, map: &SubElementMap) -> Result<Vec<u8>, SubElementEncodeError> {
        let mut bitmap = Bitmap::new();
        let mut ordered: BTreeMap<u8, &Bytes> = BTreeMap::new();

        for (key, value) in map {
            let bit: u8 = key
                .parse()
                .map_err(|_| SubElementEncodeError::InvalidKey { key: key.clone() })?;
            let field = self
                .fields
                .get(&bit)
                .ok_or_else(|| SubElementEncodeError::InvalidKey { key: key.clone() })?;
            if value.len() != field.width {
                return Err(SubElementEncodeError::WidthMismatch {
                    key: key.clone(),
                    length: value.len(),
                    expected: field.width,
                });
            }
            bitmap.set(bit);
            ordered.insert(bit, value);
        }

        let image = bitmap.to_bytes();
        let mut out = Vec::with_capacity(image.len() + ordered.values().map(|v| v.len()).sum::<usize>());
        out.extend_from_slice(&image);
        for value in ordered.values() {
            out.extend_from_slice(value);
        }
        Ok(out)
    }
}
