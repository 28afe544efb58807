/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! # Iron8583 Core
//!
//! Core types, traits, and error definitions for the Iron8583 ISO 8583 codec.
//!
//! This crate provides the fundamental building blocks used across all Iron8583 crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Field primitives**: `FieldType`, `LengthType`, `FieldValue`
//! - **Encoding primitives**: ASCII, BCD, and EBCDIC (CP037) codecs
//! - **Bitmap engine**: primary/secondary presence bitmap
//! - **MTI resolver**: version-aware message type indicator handling
//! - **Message type**: `IsoMessage` field map with typed accessors
//!
//! ## Purity
//!
//! Nothing in this crate performs I/O, spawns tasks, or holds global state.
//! Every operation is a synchronous, bounded transformation over in-memory
//! buffers, which is what makes a shared `Dialect` safe for unlimited
//! concurrent pack/unpack calls.

pub mod bitmap;
pub mod encoding;
pub mod error;
pub mod message;
pub mod mti;
pub mod types;

pub use bitmap::Bitmap;
pub use encoding::{Encoding, bcd_pack, bcd_unpack, ebcdic_decode, ebcdic_encode};
pub use error::{
    ConfigError, DecodeError, EncodeError, IsoError, MappingError, MtiError, Result,
    SubElementDecodeError, SubElementEncodeError,
};
pub use message::IsoMessage;
pub use mti::{MessageClass, MessageFunction, MessageOrigin, Mti, Version};
pub use types::{FieldType, FieldValue, LengthType, Stan, SubElementMap, TransmissionTime};
