/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! BER-TLV sub-element codec.
//!
//! TLV with the BER tag and length rules used by EMV data: a tag continues
//! into subsequent bytes when the low five bits of its first byte are all
//! ones (continuation bytes keep bit 8 set, the final byte clears it), and
//! a length whose first byte has bit 8 set is long-form, carrying the count
//! of big-endian length bytes in its low seven bits. Packing always emits
//! the minimal length form.

use bytes::Bytes;
use iron8583_core::error::{SubElementDecodeError, SubElementEncodeError};
use iron8583_core::types::SubElementMap;

/// Maximum encoded tag size in bytes.
const MAX_TAG_LEN: usize = 4;

/// Maximum count of long-form length bytes.
const MAX_LEN_BYTES: usize = 4;

/// Parses BER-TLV elements until the buffer is exhausted.
pub(crate) fn parse(bytes: &[u8]) -> Result<SubElementMap, SubElementDecodeError> {
    let mut map = SubElementMap::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let tag_start = offset;
        let tag_end = read_tag(bytes, &mut offset)?;
        let length = read_length(bytes, &mut offset)?;

        if bytes.len() - offset < length {
            return Err(SubElementDecodeError::UnexpectedEof {
                offset,
                needed: length - (bytes.len() - offset),
            });
        }

        let key: String = bytes[tag_start..tag_end]
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect();
        map.insert(key, Bytes::copy_from_slice(&bytes[offset..offset + length]));
        offset += length;
    }

    Ok(map)
}

/// Packs a sub-element map as BER-TLV elements in map order.
pub(crate) fn pack(map: &SubElementMap) -> Result<Vec<u8>, SubElementEncodeError> {
    let mut out = Vec::new();

    for (key, value) in map {
        let tag = parse_tag_key(key)?;
        out.extend_from_slice(&tag);
        push_length(&mut out, value.len(), key)?;
        out.extend_from_slice(value);
    }

    Ok(out)
}

/// Reads a BER tag, returning the end offset of its bytes.
fn read_tag(bytes: &[u8], offset: &mut usize) -> Result<usize, SubElementDecodeError> {
    let start = *offset;
    if start >= bytes.len() {
        return Err(SubElementDecodeError::UnexpectedEof {
            offset: start,
            needed: 1,
        });
    }
    let first = bytes[start];
    *offset += 1;

    if first & 0x1F == 0x1F {
        loop {
            if *offset >= bytes.len() {
                return Err(SubElementDecodeError::UnexpectedEof {
                    offset: *offset,
                    needed: 1,
                });
            }
            let byte = bytes[*offset];
            *offset += 1;
            if *offset - start > MAX_TAG_LEN {
                return Err(SubElementDecodeError::InvalidTag { offset: start });
            }
            if byte & 0x80 == 0 {
                break;
            }
        }
    }

    Ok(*offset)
}

/// Reads a BER length, short or long form.
fn read_length(bytes: &[u8], offset: &mut usize) -> Result<usize, SubElementDecodeError> {
    let start = *offset;
    if start >= bytes.len() {
        return Err(SubElementDecodeError::UnexpectedEof {
            offset: start,
            needed: 1,
        });
    }
    let first = bytes[start];
    *offset += 1;

    if first & 0x80 == 0 {
        return Ok(first as usize);
    }

    let count = (first & 0x7F) as usize;
    // Indefinite form (0x80) has no place in a definite-length wire format.
    if count == 0 || count > MAX_LEN_BYTES {
        return Err(SubElementDecodeError::InvalidLength { offset: start });
    }
    if bytes.len() - *offset < count {
        return Err(SubElementDecodeError::UnexpectedEof {
            offset: *offset,
            needed: count - (bytes.len() - *offset),
        });
    }

    let mut length = 0usize;
    for _ in 0..count {
        length = (length << 8) | bytes[*offset] as usize;
        *offset += 1;
    }
    Ok(length)
}

/// Parses a map key as uppercase hex tag bytes and checks BER canonicality.
fn parse_tag_key(key: &str) -> Result<Vec<u8>, SubElementEncodeError> {
    let invalid = || SubElementEncodeError::InvalidKey {
        key: key.to_string(),
    };

    let valid_chars = key
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b));
    if key.is_empty() || key.len() % 2 != 0 || key.len() > MAX_TAG_LEN * 2 || !valid_chars {
        return Err(invalid());
    }

    let tag: Vec<u8> = (0..key.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&key[i..i + 2], 16))
        .collect::<Result<_, _>>()
        .map_err(|_| invalid())?;

    if tag.len() == 1 {
        if tag[0] & 0x1F == 0x1F {
            return Err(invalid());
        }
    } else {
        if tag[0] & 0x1F != 0x1F {
            return Err(invalid());
        }
        let (last, middle) = tag[1..].split_last().expect("tag has at least two bytes");
        if middle.iter().any(|b| b & 0x80 == 0) || last & 0x80 != 0 {
            return Err(invalid());
        }
    }

    Ok(tag)
}

/// Appends a minimal BER length encoding.
fn push_length(out: &mut Vec<u8>, length: usize, key: &str) -> Result<(), SubElementEncodeError> {
    if length <= 0x7F {
        out.push(length as u8);
        return Ok(());
    }

    if length > u32::MAX as usize {
        return Err(SubElementEncodeError::ValueTooLong {
            key: key.to_string(),
            length,
            max: u32::MAX as usize,
        });
    }

    let be = (length as u32).to_be_bytes();
    let skip = be.iter().take_while(|&&b| b == 0).count();
    out.push(0x80 | (be.len() - skip) as u8);
    out.extend_from_slice(&be[skip..]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_byte_tag() {
        let bytes = [0x5A, 0x02, 0x41, 0x11];
        let map = parse(&bytes).unwrap();
        assert_eq!(map["5A"], Bytes::from_static(&[0x41, 0x11]));
    }

    #[test]
    fn test_parse_multi_byte_tag() {
        let bytes = [0x9F, 0x02, 0x06, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00];
        let map = parse(&bytes).unwrap();
        assert_eq!(
            map["9F02"],
            Bytes::from_static(&[0x00, 0x00, 0x00, 0x00, 0x10, 0x00])
        );
    }

    #[test]
    fn test_parse_long_form_length() {
        let mut bytes = vec![0x5F, 0x2A, 0x81, 0x90];
        bytes.extend(vec![0xAB; 0x90]);
        let map = parse(&bytes).unwrap();
        assert_eq!(map["5F2A"].len(), 0x90);
    }

    #[test]
    fn test_parse_rejects_indefinite_length() {
        let err = parse(&[0x5A, 0x80, 0x00]).unwrap_err();
        assert_eq!(err, SubElementDecodeError::InvalidLength { offset: 1 });
    }

    #[test]
    fn test_parse_truncated_value() {
        let err = parse(&[0x5A, 0x05, 0x01]).unwrap_err();
        assert_eq!(
            err,
            SubElementDecodeError::UnexpectedEof {
                offset: 2,
                needed: 4,
            }
        );
    }

    #[test]
    fn test_parse_overlong_tag() {
        let err = parse(&[0x9F, 0x81, 0x82, 0x83, 0x84, 0x00]).unwrap_err();
        assert_eq!(err, SubElementDecodeError::InvalidTag { offset: 0 });
    }

    #[test]
    fn test_pack_minimal_length_forms() {
        let mut map = SubElementMap::new();
        map.insert("5A".to_string(), Bytes::from(vec![0x11; 0x7F]));
        let packed = pack(&map).unwrap();
        assert_eq!(&packed[..2], &[0x5A, 0x7F]);

        let mut map = SubElementMap::new();
        map.insert("5A".to_string(), Bytes::from(vec![0x11; 0x80]));
        let packed = pack(&map).unwrap();
        assert_eq!(&packed[..3], &[0x5A, 0x81, 0x80]);

        let mut map = SubElementMap::new();
        map.insert("5A".to_string(), Bytes::from(vec![0x11; 0x1234]));
        let packed = pack(&map).unwrap();
        assert_eq!(&packed[..4], &[0x5A, 0x82, 0x12, 0x34]);
    }

    #[test]
    fn test_pack_rejects_non_canonical_tag_keys() {
        for key in ["", "5", "5a", "9F", "5A02", "9F029F02AA"] {
            let mut map = SubElementMap::new();
            map.insert(key.to_string(), Bytes::from_static(&[0x00]));
            assert!(
                matches!(
                    pack(&map).unwrap_err(),
                    SubElementEncodeError::InvalidKey { .. }
                ),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_round_trip_emv_block() {
        let mut map = SubElementMap::new();
        map.insert(
            "9F02".to_string(),
            Bytes::from_static(&[0x00, 0x00, 0x00, 0x00, 0x10, 0x00]),
        );
        map.insert("9A".to_string(), Bytes::from_static(&[0x26, 0x02, 0x14]));
        map.insert("82".to_string(), Bytes::from_static(&[0x39, 0x00]));

        let packed = pack(&map).unwrap();
        assert_eq!(parse(&packed).unwrap(), map);
    }
}
