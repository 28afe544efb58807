/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! # Iron8583 Subfield
//!
//! Composite-field sub-element codecs for the Iron8583 ISO 8583 codec.
//!
//! Some data elements are not scalar values but containers: EMV tag data,
//! additional-amounts lists, network-specific positional blocks. This crate
//! provides the four interchangeable strategies for them:
//! - **Positional**: named fixed-width sub-fields at declared offsets
//! - **TLV**: one-byte tag, one-byte length triplets
//! - **BER-TLV**: TLV with multi-byte tags and long-form lengths
//! - **Bitmapped**: a nested bitmap followed by fixed-width sub-fields
//!
//! All four are pure `parse`/`pack` pairs over byte slices with no shared
//! state; a strategy is selected per field in its registry definition.
//! Adding a strategy means adding a variant here, visible at compile time
//! to every consumer.

mod bertlv;
pub mod bitmapped;
pub mod positional;
mod tlv;

pub use bitmapped::{BitmappedField, BitmappedLayout};
pub use positional::{PositionalField, PositionalLayout};

use iron8583_core::error::{SubElementDecodeError, SubElementEncodeError};
use iron8583_core::types::SubElementMap;
use serde::{Deserialize, Serialize};

/// Strategy for parsing and packing one composite field.
///
/// Exactly four strategies exist; dispatch is a compile-time-visible match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubElementCodec {
    /// Named fixed-width sub-fields at offsets fixed by declaration order.
    Positional(PositionalLayout),
    /// One-byte tag, one-byte length, value triplets until exhaustion.
    Tlv,
    /// BER rules: multi-byte tags and long-form lengths.
    BerTlv,
    /// Nested bitmap followed by fixed-width sub-fields in bit order.
    Bitmapped(BitmappedLayout),
}

impl SubElementCodec {
    /// Parses a composite field's raw bytes into a sub-element map.
    ///
    /// # Errors
    /// Returns [`SubElementDecodeError`] carrying the offset of the failure
    /// on truncated or malformed input.
    pub fn parse(&self, bytes: &[u8]) -> Result<SubElementMap, SubElementDecodeError> {
        match self {
            Self::Positional(layout) => layout.parse(bytes),
            Self::Tlv => tlv::parse(bytes),
            Self::BerTlv => bertlv::parse(bytes),
            Self::Bitmapped(layout) => layout.parse(bytes),
        }
    }

    /// Packs a sub-element map back into composite field bytes.
    ///
    /// # Errors
    /// Returns [`SubElementEncodeError`] naming the offending key when a
    /// required sub-field is missing or a value cannot be represented.
    pub fn pack(&self, map: &SubElementMap) -> Result<Vec<u8>, SubElementEncodeError> {
        match self {
            Self::Positional(layout) => layout.pack(map),
            Self::Tlv => tlv::pack(map),
            Self::BerTlv => bertlv::pack(map),
            Self::Bitmapped(layout) => layout.pack(map),
        }
    }
}
