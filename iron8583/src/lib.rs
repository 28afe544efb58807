/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! # Iron8583
//!
//! An ISO 8583 financial message codec for Rust.
//!
//! Iron8583 is a pure, stateless transformation between raw wire bytes and a
//! structured field map, parameterized by an immutable [`dialect`] that
//! bundles the revision (1987, 1993, or 2021), the data element registry,
//! and the encoding choices (ASCII, BCD, EBCDIC; binary or hex bitmaps;
//! fixed and LVAR through LLLLVAR length schemes).
//!
//! ## Features
//!
//! - **Byte-exact wire formats**: fields pack and unpack in strictly
//!   ascending bit order with dialect-driven encodings
//! - **Validated configuration**: registries and dialects are checked once
//!   at startup; the per-message path never re-validates pairings
//! - **Composite fields**: positional, TLV, BER-TLV, and nested-bitmap
//!   sub-element codecs
//! - **No I/O, no global state**: dialects are passed by reference and are
//!   safe for unlimited concurrent pack/unpack calls
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use iron8583::prelude::*;
//!
//! let dialect = Dialect::new(DialectConfig {
//!     version: Version::V1987,
//!     registry,
//!     mti_encoding: Encoding::Ascii,
//!     bitmap_encoding: BitmapEncoding::Binary,
//!     field_encoding: Encoding::Ascii,
//!     validation: ValidationMode::Strict,
//!     force_secondary_bitmap: false,
//! })?;
//!
//! let message = IsoMessage::new("0200")
//!     .with_field(2, "4111111111111111")
//!     .with_field(4, "000000001000");
//! let wire = Packer::new(&dialect).pack(&message)?;
//! let back = Unpacker::new(&dialect).unpack(&wire)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: field primitives, encodings, bitmap engine, MTI resolver,
//!   message type, and error definitions
//! - [`dictionary`]: data element registry and dialect management
//! - [`subfield`]: composite-field sub-element codecs
//! - [`wire`]: message packing and unpacking
//! - [`mapper`]: declarative record to field-map translation

pub mod core {
    //! Field primitives, encodings, bitmap engine, MTI resolver, and errors.
    pub use iron8583_core::*;
}

pub mod dictionary {
    //! Data element registry and dialect management.
    pub use iron8583_dictionary::*;
}

pub mod subfield {
    //! Composite-field sub-element codecs.
    pub use iron8583_subfield::*;
}

pub mod wire {
    //! Message packing and unpacking.
    pub use iron8583_wire::*;
}

pub mod mapper {
    //! Declarative record to field-map translation.
    pub use iron8583_mapper::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use iron8583_core::{
        Bitmap, ConfigError, DecodeError, EncodeError, Encoding, FieldType, FieldValue,
        IsoError, IsoMessage, LengthType, MappingError, MessageClass, MessageFunction,
        MessageOrigin, Mti, MtiError, Result, Stan, SubElementDecodeError, SubElementEncodeError,
        SubElementMap, TransmissionTime, Version,
    };

    // Dictionary
    pub use iron8583_dictionary::{
        BitmapEncoding, DataElementDef, DataElementRegistry, Dialect, DialectConfig,
        ValidationMode,
    };

    // Sub-element codecs
    pub use iron8583_subfield::{
        BitmappedField, BitmappedLayout, PositionalField, PositionalLayout, SubElementCodec,
    };

    // Wire codec
    pub use iron8583_wire::{Cursor, Packer, Unpacker};

    // Mapper
    pub use iron8583_mapper::{FieldBinding, MessageMapping};
}
