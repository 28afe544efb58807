/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Message type for parsed ISO 8583 content.
//!
//! [`IsoMessage`] is the structured form on both sides of the codec: the
//! packer consumes one, the unpacker produces one. It owns its data and can
//! be stored or sent across threads freely; insertion order of fields is
//! irrelevant because the map is keyed by bit number.

use crate::error::MtiError;
use crate::mti::{Mti, Version};
use crate::types::FieldValue;
use bytes::Bytes;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A parsed ISO 8583 message: MTI plus data elements.
///
/// Created fresh per message and discarded after use. The field map is
/// ordered by bit number, which is also the wire order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IsoMessage {
    /// The message type indicator digit string (e.g. `"0200"`).
    mti: String,
    /// Data elements keyed by bit number (2-128).
    fields: BTreeMap<u8, FieldValue>,
    /// The raw bitmap bytes as read off the wire, for diagnostics.
    /// Empty for messages built by hand.
    raw_bitmap: Bytes,
}

impl IsoMessage {
    /// Creates an empty message with the given MTI.
    ///
    /// # Arguments
    /// * `mti` - The message type indicator digit string
    #[must_use]
    pub fn new(mti: impl Into<String>) -> Self {
        Self {
            mti: mti.into(),
            fields: BTreeMap::new(),
            raw_bitmap: Bytes::new(),
        }
    }

    /// Adds a field, consuming and returning the message for chaining.
    #[must_use]
    pub fn with_field(mut self, bit: u8, value: impl Into<FieldValue>) -> Self {
        self.set_field(bit, value);
        self
    }

    /// Sets a field, replacing any existing value at that bit.
    pub fn set_field(&mut self, bit: u8, value: impl Into<FieldValue>) {
        self.fields.insert(bit, value.into());
    }

    /// Removes a field.
    ///
    /// # Returns
    /// The removed value, or `None` if the bit was not present.
    pub fn remove_field(&mut self, bit: u8) -> Option<FieldValue> {
        self.fields.remove(&bit)
    }

    /// Gets a field value by bit number.
    #[must_use]
    pub fn field(&self, bit: u8) -> Option<&FieldValue> {
        self.fields.get(&bit)
    }

    /// Gets a textual field value by bit number.
    #[must_use]
    pub fn field_str(&self, bit: u8) -> Option<&str> {
        self.field(bit).and_then(FieldValue::as_text)
    }

    /// Gets a numeric field parsed as a decimal, convenient for amounts.
    #[must_use]
    pub fn field_decimal(&self, bit: u8) -> Option<Decimal> {
        self.field(bit).and_then(FieldValue::as_decimal)
    }

    /// Returns the MTI digit string.
    #[inline]
    #[must_use]
    pub fn mti(&self) -> &str {
        &self.mti
    }

    /// Replaces the MTI digit string.
    pub fn set_mti(&mut self, mti: impl Into<String>) {
        self.mti = mti.into();
    }

    /// Resolves the MTI against a revision.
    ///
    /// # Errors
    /// Returns [`MtiError`] if the digit string is invalid for `version`.
    pub fn resolve_mti(&self, version: Version) -> Result<Mti, MtiError> {
        Mti::parse(&self.mti, version)
    }

    /// Iterates fields in ascending bit order.
    pub fn fields(&self) -> impl Iterator<Item = (u8, &FieldValue)> {
        self.fields.iter().map(|(&bit, value)| (bit, value))
    }

    /// Iterates the present bit numbers in ascending order.
    pub fn bits(&self) -> impl Iterator<Item = u8> + '_ {
        self.fields.keys().copied()
    }

    /// Returns the number of data elements present.
    #[inline]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no data elements are present.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the raw bitmap bytes recorded at unpack time.
    ///
    /// Empty for messages that were built rather than unpacked.
    #[inline]
    #[must_use]
    pub fn raw_bitmap(&self) -> &Bytes {
        &self.raw_bitmap
    }

    /// Records the raw bitmap bytes for diagnostics.
    pub fn set_raw_bitmap(&mut self, raw: Bytes) {
        self.raw_bitmap = raw;
    }
}

impl fmt::Display for IsoMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.mti)?;
        let mut first = true;
        for (bit, value) in self.fields() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{bit}={value}")?;
            first = false;
        }
        write!(f, "]")
    }
}
