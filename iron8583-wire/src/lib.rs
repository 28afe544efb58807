/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! # Iron8583 Wire
//!
//! Message packing and unpacking for the Iron8583 ISO 8583 codec.
//!
//! This crate provides the two halves of the wire pipeline:
//! - [`Packer`]: MTI, bitmap, then fields in ascending bit order, out to a
//!   contiguous byte buffer
//! - [`Unpacker`]: the inverse, driven by a forward-only [`Cursor`] that
//!   reports the byte offset of every structural failure
//!
//! Both take their [`Dialect`](iron8583_dictionary::Dialect) by reference
//! per call; nothing here holds state between messages.

pub mod decoder;
pub mod encoder;
mod element;

pub use decoder::{Cursor, Unpacker};
pub use encoder::Packer;
