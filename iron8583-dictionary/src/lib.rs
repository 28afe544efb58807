/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! # Iron8583 Dictionary
//!
//! Data element registry and dialect management for the Iron8583 codec.
//!
//! This crate provides:
//! - **Schema definitions**: per-bit data element definitions
//! - **Registry**: the validated bit-number to definition mapping
//! - **Dialects**: immutable bundles of version, registry, and encoding
//!   choices that fully determine one wire-format variant
//!
//! Registries and dialects are constructed once at startup from static
//! tables, validated eagerly, and shared read-only across concurrent
//! pack/unpack callers. There is no global dialect state; every codec call
//! takes its dialect by reference.

pub mod dialect;
pub mod schema;

pub use dialect::{BitmapEncoding, Dialect, DialectConfig, ValidationMode};
pub use schema::{DataElementDef, DataElementRegistry};
