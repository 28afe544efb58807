/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Simple tag-length-value sub-element codec.
//!
//! Repeated `[1-byte tag][1-byte length][value]` triplets until the buffer
//! is exhausted. Keys are the tag rendered as two uppercase hex digits,
//! which keeps map order identical to numeric tag order.

use bytes::Bytes;
use iron8583_core::error::{SubElementDecodeError, SubElementEncodeError};
use iron8583_core::types::SubElementMap;

/// Maximum value length a one-byte length field can express.
const MAX_VALUE_LEN: usize = 255;

/// Parses TLV triplets until the buffer is exhausted.
pub(crate) fn parse(bytes: &[u8]) -> Result<SubElementMap, SubElementDecodeError> {
    let mut map = SubElementMap::new();
    let mut offset = 0;

    while offset < bytes.len() {
        if bytes.len() - offset < 2 {
            return Err(SubElementDecodeError::UnexpectedEof {
                offset,
                needed: 2 - (bytes.len() - offset),
            });
        }
        let tag = bytes[offset];
        let length = bytes[offset + 1] as usize;
        let value_start = offset + 2;

        if bytes.len() - value_start < length {
            return Err(SubElementDecodeError::UnexpectedEof {
                offset: value_start,
                needed: length - (bytes.len() - value_start),
            });
        }

        map.insert(
            format!("{tag:02X}"),
            Bytes::copy_from_slice(&bytes[value_start..value_start + length]),
        );
        offset = value_start + length;
    }

    Ok(map)
}

/// Packs a sub-element map as TLV triplets in ascending tag order.
pub(crate) fn pack(map: &SubElementMap) -> Result<Vec<u8>, SubElementEncodeError> {
    let mut out = Vec::new();

    for (key, value) in map {
        let tag = parse_tag_key(key)?;
        if value.len() > MAX_VALUE_LEN {
            return Err(SubElementEncodeError::ValueTooLong {
                key: key.clone(),
                length: value.len(),
                max: MAX_VALUE_LEN,
            });
        }
        out.push(tag);
        out.push(value.len() as u8);
        out.extend_from_slice(value);
    }

    Ok(out)
}

/// Parses a map key as a two-digit uppercase hex tag.
fn parse_tag_key(key: &str) -> Result<u8, SubElementEncodeError> {
    let valid = key.len() == 2
        && key
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b));
    if !valid {
        return Err(SubElementEncodeError::InvalidKey {
            key: key.to_string(),
        });
    }
    u8::from_str_radix(key, 16).map_err(|_| SubElementEncodeError::InvalidKey {
        key: key.to_string(),
    })
}
