/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Dialect: one wire-format variant, fully determined.
//!
//! A [`Dialect`] bundles the revision, the data element registry, and the
//! encoding choices for MTI, bitmap, and fields. It is validated by a plain
//! constructor over a fully-populated [`DialectConfig`] and immutable from
//! then on: no method mutates it, so one instance serves any number of
//! concurrent pack/unpack calls without synchronization.

use crate::schema::DataElementRegistry;
use iron8583_core::encoding::Encoding;
use iron8583_core::error::ConfigError;
use iron8583_core::mti::Version;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the bitmap travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitmapEncoding {
    /// Raw bytes: 8 or 16.
    Binary,
    /// Uppercase hex characters: 16 or 32.
    AsciiHex,
}

/// How the unpacker treats a set bit with no registry definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationMode {
    /// Fail the unpack call.
    Strict,
    /// Record the remaining buffer raw under that bit and stop.
    Lenient,
}

/// Fully-populated dialect configuration, consumed by [`Dialect::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialectConfig {
    /// ISO 8583 revision.
    pub version: Version,
    /// Validated data element registry.
    pub registry: DataElementRegistry,
    /// Encoding of the MTI digits.
    pub mti_encoding: Encoding,
    /// Encoding of the bitmap image.
    pub bitmap_encoding: BitmapEncoding,
    /// Default field encoding; definitions may override per field.
    pub field_encoding: Encoding,
    /// Unknown-field handling during unpack.
    pub validation: ValidationMode,
    /// Emit the secondary bitmap on every message, set or not.
    /// Some interchanges mandate a 16-byte bitmap unconditionally.
    pub force_secondary_bitmap: bool,
}

/// Immutable wire-format configuration shared across concurrent callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialect {
    version: Version,
    registry: DataElementRegistry,
    mti_encoding: Encoding,
    bitmap_encoding: BitmapEncoding,
    field_encoding: Encoding,
    validation: ValidationMode,
    force_secondary_bitmap: bool,
}

impl Dialect {
    /// Validates a configuration and seals it into a dialect.
    ///
    /// Every definition's effective encoding (its override, or the dialect
    /// default) must be supported for its field type; this is the single
    /// point where encoding mismatches are caught, so the per-message path
    /// never re-checks them.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedEncoding`] naming the first
    /// offending bit.
    pub fn new(config: DialectConfig) -> Result<Self, ConfigError> {
        for def in config.registry.iter() {
            let effective = def.encoding_override.unwrap_or(config.field_encoding);
            if !effective.is_supported_for(def.field_type) {
                return Err(ConfigError::UnsupportedEncoding {
                    bit: def.bit,
                    field_type: def.field_type,
                    encoding: effective,
                });
            }
        }

        debug!(
            version = %config.version,
            elements = config.registry.len(),
            "dialect validated"
        );

        Ok(Self {
            version: config.version,
            registry: config.registry,
            mti_encoding: config.mti_encoding,
            bitmap_encoding: config.bitmap_encoding,
            field_encoding: config.field_encoding,
            validation: config.validation,
            force_secondary_bitmap: config.force_secondary_bitmap,
        })
    }

    /// Returns the ISO 8583 revision.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Returns the data element registry.
    #[inline]
    #[must_use]
    pub const fn registry(&self) -> &DataElementRegistry {
        &self.registry
    }

    /// Returns the MTI encoding.
    #[inline]
    #[must_use]
    pub const fn mti_encoding(&self) -> Encoding {
        self.mti_encoding
    }

    /// Returns the bitmap encoding.
    #[inline]
    #[must_use]
    pub const fn bitmap_encoding(&self) -> BitmapEncoding {
        self.bitmap_encoding
    }

    /// Returns the default field encoding.
    #[inline]
    #[must_use]
    pub const fn field_encoding(&self) -> Encoding {
        self.field_encoding
    }

    /// Returns the unknown-field handling mode.
    #[inline]
    #[must_use]
    pub const fn validation(&self) -> ValidationMode {
        self.validation
    }

    /// Returns true if every message carries a 16-byte bitmap.
    #[inline]
    #[must_use]
    pub const fn force_secondary_bitmap(&self) -> bool {
        self.force_secondary_bitmap
    }

    /// Resolves the effective encoding for a field type and override.
    #[inline]
    #[must_use]
    pub fn effective_encoding(&self, encoding_override: Option<Encoding>) -> Encoding {
        encoding_override.unwrap_or(self.field_encoding)
    }
}
