/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Per-element value codec shared by the packer and unpacker.
//!
//! Length prefixes travel in the field's effective encoding: ASCII or
//! EBCDIC digits, or packed BCD. Text bodies are character-decoded; binary
//! and composite bodies are raw bytes whose length prefix counts bytes.
//! For BCD text the prefix counts digits and the body occupies
//! `ceil(digits / 2)` bytes.

use bytes::{BufMut, BytesMut};
use iron8583_core::encoding::{Encoding, bcd_len, bcd_pack, bcd_unpack, ebcdic_decode, ebcdic_encode};
use iron8583_core::error::{DecodeError, EncodeError};
use iron8583_core::types::FieldType;

/// Longest value excerpt carried inside an error.
const SNIPPET_LEN: usize = 16;

/// Truncates a value for error reporting.
pub(crate) fn snippet(value: &str) -> String {
    if value.len() <= SNIPPET_LEN {
        value.to_string()
    } else {
        format!("{}...", &value[..SNIPPET_LEN])
    }
}

/// Wire size of a text body of `count` characters under `encoding`.
pub(crate) const fn text_wire_len(count: usize, encoding: Encoding) -> usize {
    match encoding {
        Encoding::Ascii | Encoding::Ebcdic => count,
        Encoding::Bcd => bcd_len(count),
    }
}

/// Wire size of a length prefix of `prefix_digits` under `encoding`.
pub(crate) const fn prefix_wire_len(prefix_digits: usize, encoding: Encoding) -> usize {
    match encoding {
        Encoding::Ascii | Encoding::Ebcdic => prefix_digits,
        Encoding::Bcd => bcd_len(prefix_digits),
    }
}

/// Pads an under-length fixed value, or rejects an over-length one.
///
/// Numeric and track values pad left with `'0'`; the alpha family pads
/// right with `' '`.
pub(crate) fn pad_fixed(
    bit: u8,
    text: &str,
    field_type: FieldType,
    declared: usize,
) -> Result<String, EncodeError> {
    let length = text.len();
    if length > declared {
        return Err(EncodeError::FieldOverflow {
            bit,
            length,
            max_length: declared,
        });
    }
    if length == declared {
        return Ok(text.to_string());
    }

    let pad = field_type.pad_byte().unwrap_or(b' ') as char;
    let mut padded = String::with_capacity(declared);
    if field_type.pads_left() {
        for _ in length..declared {
            padded.push(pad);
        }
        padded.push_str(text);
    } else {
        padded.push_str(text);
        for _ in length..declared {
            padded.push(pad);
        }
    }
    Ok(padded)
}

/// Appends a text body in the given encoding.
///
/// The caller has already validated the character class.
pub(crate) fn encode_text_body(
    bit: u8,
    text: &str,
    encoding: Encoding,
    out: &mut BytesMut,
) -> Result<(), EncodeError> {
    match encoding {
        Encoding::Ascii => {
            out.put_slice(text.as_bytes());
            Ok(())
        }
        Encoding::Bcd => {
            let packed = bcd_pack(text).ok_or_else(|| EncodeError::InvalidFieldValue {
                bit,
                value: snippet(text),
            })?;
            out.put_slice(&packed);
            Ok(())
        }
        Encoding::Ebcdic => {
            let encoded = ebcdic_encode(text).ok_or_else(|| EncodeError::InvalidFieldValue {
                bit,
                value: snippet(text),
            })?;
            out.put_slice(&encoded);
            Ok(())
        }
    }
}

/// Appends a zero-padded length prefix in the given encoding.
pub(crate) fn encode_length_prefix(
    bit: u8,
    length: usize,
    prefix_digits: usize,
    encoding: Encoding,
    out: &mut BytesMut,
) -> Result<(), EncodeError> {
    let mut itoa_buf = itoa::Buffer::new();
    let formatted = itoa_buf.format(length);

    let mut digits = String::with_capacity(prefix_digits);
    for _ in formatted.len()..prefix_digits {
        digits.push('0');
    }
    digits.push_str(formatted);

    encode_text_body(bit, &digits, encoding, out)
}

/// Decodes a length prefix into a unit count.
pub(crate) fn decode_length_prefix(
    bit: u8,
    bytes: &[u8],
    prefix_digits: usize,
    encoding: Encoding,
    offset: usize,
) -> Result<usize, DecodeError> {
    let invalid = |reason: &str| DecodeError::InvalidFieldValue {
        bit,
        offset,
        reason: reason.to_string(),
    };

    let digits = match encoding {
        Encoding::Ascii => {
            if !bytes.iter().all(|b| b.is_ascii_digit()) {
                return Err(invalid("non-digit in length prefix"));
            }
            String::from_utf8_lossy(bytes).into_owned()
        }
        Encoding::Bcd => bcd_unpack(bytes, prefix_digits)
            .ok_or_else(|| invalid("invalid BCD nibble in length prefix"))?,
        Encoding::Ebcdic => {
            let text = ebcdic_decode(bytes)
                .ok_or_else(|| invalid("unmapped EBCDIC byte in length prefix"))?;
            if !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("non-digit in length prefix"));
            }
            text
        }
    };

    digits
        .parse()
        .map_err(|_| invalid("length prefix out of range"))
}

/// Decodes a text body of `count` characters in the given encoding and
/// validates the field's character class.
pub(crate) fn decode_text_body(
    bit: u8,
    bytes: &[u8],
    count: usize,
    field_type: FieldType,
    encoding: Encoding,
    offset: usize,
) -> Result<String, DecodeError> {
    let invalid = |reason: String| DecodeError::InvalidFieldValue {
        bit,
        offset,
        reason,
    };

    let text = match encoding {
        Encoding::Ascii => String::from_utf8(bytes.to_vec())
            .map_err(|_| invalid("non-ASCII byte".to_string()))?,
        Encoding::Bcd => bcd_unpack(bytes, count)
            .ok_or_else(|| invalid("invalid BCD nibble".to_string()))?,
        Encoding::Ebcdic => {
            ebcdic_decode(bytes).ok_or_else(|| invalid("unmapped EBCDIC byte".to_string()))?
        }
    };

    if !field_type.is_valid_text(&text) {
        return Err(invalid(format!(
            "character outside {field_type} class: {:?}",
            snippet(&text)
        )));
    }
    Ok(text)
}
