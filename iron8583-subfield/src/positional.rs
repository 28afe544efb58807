/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Positional sub-element codec.
//!
//! A positional layout maps fixed byte ranges to named sub-fields. Offsets
//! are not stored; they fall out of declaration order at registry-build
//! time, so the layout is a plain ordered list of widths.

use bytes::Bytes;
use iron8583_core::error::{ConfigError, SubElementDecodeError, SubElementEncodeError};
use iron8583_core::types::SubElementMap;
use serde::{Deserialize, Serialize};

/// One named fixed-width sub-field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalField {
    /// Sub-field name; the key in parsed maps.
    pub name: String,
    /// Width in bytes.
    pub width: usize,
}

impl PositionalField {
    /// Creates a new positional sub-field.
    ///
    /// # Arguments
    /// * `name` - The sub-field name
    /// * `width` - The width in bytes
    #[must_use]
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// Ordered fixed-width sub-field layout for one composite field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalLayout {
    fields: Vec<PositionalField>,
}

impl PositionalLayout {
    /// Builds a layout, validating the declarations.
    ///
    /// # Errors
    /// Returns [`ConfigError::DuplicateSubField`] on a repeated name and
    /// [`ConfigError::InvalidSubFieldWidth`] on a zero width.
    pub fn new(fields: Vec<PositionalField>) -> Result<Self, ConfigError> {
        for (index, field) in fields.iter().enumerate() {
            if field.width == 0 {
                return Err(ConfigError::InvalidSubFieldWidth {
                    name: field.name.clone(),
                });
            }
            if fields[..index].iter().any(|f| f.name == field.name) {
                return Err(ConfigError::DuplicateSubField {
                    name: field.name.clone(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// Returns the declared sub-fields in wire order.
    #[must_use]
    pub fn fields(&self) -> &[PositionalField] {
        &self.fields
    }

    /// Total width of the composite value in bytes.
    #[must_use]
    pub fn total_width(&self) -> usize {
        self.fields.iter().map(|f| f.width).sum()
    }

    /// Splits composite bytes into the declared sub-fields.
    pub(crate) fn parse(&self, bytes: &[u8]) -> Result<SubElementMap, SubElementDecodeError> {
        let mut map = SubElementMap::new();
        let mut offset = 0;

        for field in &self.fields {
            let remaining = bytes.len() - offset;
            if remaining < field.width {
                return Err(SubElementDecodeError::UnexpectedEof {
                    offset,
                    needed: field.width - remaining,
                });
            }
            map.insert(
                field.name.clone(),
                Bytes::copy_from_slice(&bytes[offset..offset + field.width]),
            );
            offset += field.width;
        }

        if offset != bytes.len() {
            return Err(SubElementDecodeError::TrailingBytes { offset });
        }
        Ok(map)
    }

    /// Assembles composite bytes from a sub-element map.
    pub(crate) fn pack(&self, map: &SubElementMap) -> Result<Vec<u8>, SubElementEncodeError> {
        for key in map.keys() {
            if !self.fields.iter().any(|f| &f.name == key) {
                return Err(SubElementEncodeError::InvalidKey { key: key.clone() });
            }
        }

        let mut out = Vec::with_capacity(self.total_width());
        for field in &self.fields {
            let value = map
                .get(&field.name)
                .ok_or_else(|| SubElementEncodeError::MissingSubField {
                    key: field.name.clone(),
                })?;
            if value.len() != field.width {
                return Err(SubElementEncodeError::WidthMismatch {
                    key: field.name.clone(),
                    length: value.len(),
                    expected: field.width,
                });
            }
            out.extend_from_slice(value);
        }
        Ok(out)
    }
}
