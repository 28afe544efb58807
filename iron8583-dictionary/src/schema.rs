/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Schema definitions for ISO 8583 data elements.
//!
//! This module defines:
//! - [`DataElementDef`]: one field's rules (type, length, encoding, layout)
//! - [`DataElementRegistry`]: the validated bit-number to definition map

use iron8583_core::encoding::Encoding;
use iron8583_core::error::ConfigError;
use iron8583_core::types::{FieldType, LengthType};
use iron8583_subfield::SubElementCodec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Definition of one ISO 8583 data element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataElementDef {
    /// Bit number (2-128; bit 1 is the secondary-bitmap indicator).
    pub bit: u8,
    /// Field name (e.g. `"primary_account_number"`).
    pub name: String,
    /// Character class of the value.
    pub field_type: FieldType,
    /// Fixed width or variable-length prefix scheme.
    pub length_type: LengthType,
    /// Per-field encoding override; `None` uses the dialect default.
    pub encoding_override: Option<Encoding>,
    /// Sub-element codec for composite fields.
    pub sub_elements: Option<SubElementCodec>,
}

impl DataElementDef {
    /// Creates a new data element definition.
    ///
    /// # Arguments
    /// * `bit` - The bit number (2-128)
    /// * `name` - The field name
    /// * `field_type` - The character class
    /// * `length_type` - Fixed width or variable-length prefix
    #[must_use]
    pub fn new(
        bit: u8,
        name: impl Into<String>,
        field_type: FieldType,
        length_type: LengthType,
    ) -> Self {
        Self {
            bit,
            name: name.into(),
            field_type,
            length_type,
            encoding_override: None,
            sub_elements: None,
        }
    }

    /// Overrides the dialect's default encoding for this field.
    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding_override = Some(encoding);
        self
    }

    /// Attaches a sub-element codec, making this a composite field.
    #[must_use]
    pub fn with_sub_elements(mut self, codec: SubElementCodec) -> Self {
        self.sub_elements = Some(codec);
        self
    }
}

/// Validated, immutable collection of data element definitions.
///
/// Built once via [`DataElementRegistry::new`], then shared read-only; the
/// map is keyed by bit number and iterates in ascending wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataElementRegistry {
    /// Definitions indexed by bit number.
    defs: BTreeMap<u8, DataElementDef>,
    /// Bit numbers indexed by field name.
    by_name: HashMap<String, u8>,
}

impl DataElementRegistry {
    /// Builds a registry from a definition list, validating every entry.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyRegistry`] when `defs` is empty
    /// - [`ConfigError::BitOutOfRange`] for bits outside 2-128 (bit 1 is
    ///   the secondary-bitmap indicator; a tertiary bitmap is unsupported)
    /// - [`ConfigError::DuplicateBit`] for repeated bit numbers
    /// - [`ConfigError::InvalidDeclaredLength`] for zero-width fixed fields
    /// - [`ConfigError::UnsupportedEncoding`] when an encoding override is
    ///   not defined for the field's type
    pub fn new(defs: Vec<DataElementDef>) -> Result<Self, ConfigError> {
        if defs.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }

        let mut map = BTreeMap::new();
        let mut by_name = HashMap::new();
        for def in defs {
            if !(2..=128).contains(&def.bit) {
                return Err(ConfigError::BitOutOfRange { bit: def.bit });
            }
            if matches!(def.length_type, LengthType::Fixed(0)) {
                return Err(ConfigError::InvalidDeclaredLength { bit: def.bit });
            }
            if let Some(encoding) = def.encoding_override {
                if !encoding.is_supported_for(def.field_type) {
                    return Err(ConfigError::UnsupportedEncoding {
                        bit: def.bit,
                        field_type: def.field_type,
                        encoding,
                    });
                }
            }
            let bit = def.bit;
            by_name.insert(def.name.clone(), bit);
            if map.insert(bit, def).is_some() {
                return Err(ConfigError::DuplicateBit { bit });
            }
        }

        Ok(Self { defs: map, by_name })
    }

    /// Gets a definition by bit number.
    #[must_use]
    pub fn get(&self, bit: u8) -> Option<&DataElementDef> {
        self.defs.get(&bit)
    }

    /// Gets a definition by field name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&DataElementDef> {
        self.by_name.get(name).and_then(|bit| self.defs.get(bit))
    }

    /// Returns the number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns true if the registry holds no definitions.
    ///
    /// Construction guarantees this is never the case.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Iterates definitions in ascending bit order.
    pub fn iter(&self) -> impl Iterator<Item = &DataElementDef> {
        self.defs.values()
    }
}
