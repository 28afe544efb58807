/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Message unpacker and cursor.
//!
//! [`Unpacker`] turns wire bytes back into an [`IsoMessage`] under a
//! dialect: MTI, bitmap, then every announced field in ascending bit order.
//! All per-call state lives in a [`Cursor`] whose offset only ever moves
//! forward; consumed bytes are never re-read, and the whole buffer must be
//! present up front - unpacking is not resumable or streaming.

use crate::element::{decode_length_prefix, decode_text_body, prefix_wire_len, text_wire_len};
use bytes::Bytes;
use iron8583_core::bitmap::Bitmap;
use iron8583_core::encoding::{Encoding, bcd_len, bcd_unpack, ebcdic_decode};
use iron8583_core::error::{DecodeError, MtiError};
use iron8583_core::message::IsoMessage;
use iron8583_core::mti::Mti;
use iron8583_core::types::{FieldType, FieldValue, LengthType};
use iron8583_dictionary::{BitmapEncoding, DataElementDef, Dialect, ValidationMode};
use tracing::trace;

/// Unpacking progress over one message buffer.
///
/// Exists only for the duration of one unpack call; the offset increases
/// monotonically and consumed bytes are never revisited.
#[derive(Debug)]
pub struct Cursor<'a> {
    /// The whole message buffer.
    input: &'a [u8],
    /// Current read position.
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of a buffer.
    #[inline]
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// Consumes and returns the next `n` bytes.
    ///
    /// # Errors
    /// Returns [`DecodeError::InsufficientBytes`] carrying the current
    /// offset and the shortfall when fewer than `n` bytes remain.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.input.len() - self.offset;
        if remaining < n {
            return Err(DecodeError::InsufficientBytes {
                offset: self.offset,
                needed: n - remaining,
                field: None,
            });
        }
        let slice = &self.input[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    /// Returns the current offset in the buffer.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the unconsumed remainder of the buffer.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.offset..]
    }

    /// Returns the whole underlying buffer.
    #[inline]
    #[must_use]
    pub const fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Returns true if the buffer has been fully consumed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offset >= self.input.len()
    }
}

/// Unpacks messages under one dialect.
#[derive(Debug, Clone, Copy)]
pub struct Unpacker<'a> {
    dialect: &'a Dialect,
}

impl<'a> Unpacker<'a> {
    /// Creates an unpacker for the given dialect.
    #[inline]
    #[must_use]
    pub const fn new(dialect: &'a Dialect) -> Self {
        Self { dialect }
    }

    /// Unpacks a contiguous message buffer.
    ///
    /// The buffer must contain exactly one message body; framing is the
    /// transport's concern.
    ///
    /// # Errors
    /// Returns [`DecodeError`] with the failing byte offset: malformed
    /// bitmap, buffer exhaustion mid-field, unsupported fields under strict
    /// validation, character or sub-element violations, or trailing bytes.
    pub fn unpack(&self, input: &[u8]) -> Result<IsoMessage, DecodeError> {
        let mut cursor = Cursor::new(input);

        let mti = self.decode_mti(&mut cursor)?;
        let (bitmap, raw_bitmap) = self.decode_bitmap(&mut cursor)?;

        let mut message = IsoMessage::new(mti.encode().as_str());
        message.set_raw_bitmap(Bytes::copy_from_slice(raw_bitmap));

        let mut stopped_lenient = false;
        for bit in bitmap.bits() {
            let Some(def) = self.dialect.registry().get(bit) else {
                match self.dialect.validation() {
                    ValidationMode::Strict => {
                        return Err(DecodeError::UnsupportedField {
                            bit,
                            offset: cursor.offset(),
                        });
                    }
                    ValidationMode::Lenient => {
                        // Without a definition the field's extent is
                        // unknowable, so capture the rest raw and stop.
                        let rest = cursor.take(cursor.remaining().len())?;
                        message.set_field(bit, FieldValue::Binary(Bytes::copy_from_slice(rest)));
                        stopped_lenient = true;
                        break;
                    }
                }
            };
            let value = self
                .decode_field(&mut cursor, def)
                .map_err(|e| e.with_field(bit))?;
            message.set_field(bit, value);
        }

        if !stopped_lenient && !cursor.is_empty() {
            return Err(DecodeError::TrailingBytes {
                offset: cursor.offset(),
                remaining: cursor.remaining().len(),
            });
        }

        trace!(
            mti = %mti,
            fields = message.field_count(),
            bytes = input.len(),
            "unpacked message"
        );
        Ok(message)
    }

    /// Reads and resolves the MTI per the dialect's MTI encoding.
    fn decode_mti(&self, cursor: &mut Cursor<'_>) -> Result<Mti, DecodeError> {
        let version = self.dialect.version();
        let digit_count = version.digit_count();

        let text = match self.dialect.mti_encoding() {
            Encoding::Ascii => {
                let bytes = cursor.take(digit_count)?;
                String::from_utf8_lossy(bytes).into_owned()
            }
            Encoding::Ebcdic => {
                let bytes = cursor.take(digit_count)?;
                ebcdic_decode(bytes).unwrap_or_else(|| "?".repeat(digit_count))
            }
            Encoding::Bcd => {
                // Odd digit counts (the 2021 three-digit form) travel
                // left-padded with a zero digit.
                let padded = digit_count.next_multiple_of(2);
                let bytes = cursor.take(bcd_len(padded))?;
                let digits = bcd_unpack(bytes, padded).ok_or(DecodeError::Mti(
                    MtiError::InvalidDigit {
                        part: "mti",
                        digit: '?',
                    },
                ))?;
                let pad = padded - digit_count;
                if let Some(nonzero) = digits[..pad].chars().find(|&c| c != '0') {
                    return Err(DecodeError::Mti(MtiError::InvalidDigit {
                        part: "mti",
                        digit: nonzero,
                    }));
                }
                digits[pad..].to_string()
            }
        };

        Ok(Mti::parse(&text, version)?)
    }

    /// Reads the bitmap per the dialect's bitmap encoding.
    ///
    /// Returns the decoded bitmap plus the raw wire bytes it occupied.
    fn decode_bitmap<'b>(
        &self,
        cursor: &mut Cursor<'b>,
    ) -> Result<(Bitmap, &'b [u8]), DecodeError> {
        let start = cursor.offset();
        match self.dialect.bitmap_encoding() {
            BitmapEncoding::Binary => {
                let (bitmap, consumed) =
                    Bitmap::from_bytes(cursor.remaining()).map_err(|e| e.offset_by(start))?;
                let raw = cursor.take(consumed)?;
                Ok((bitmap, raw))
            }
            BitmapEncoding::AsciiHex => {
                let primary = cursor.take(16).map_err(|_| DecodeError::MalformedBitmap {
                    offset: start,
                    expected: 16,
                })?;
                let mut image = decode_hex_image(primary, start)?;
                if image[0] & 0x80 != 0 {
                    let secondary =
                        cursor.take(16).map_err(|_| DecodeError::MalformedBitmap {
                            offset: start,
                            expected: 32,
                        })?;
                    image.extend(decode_hex_image(secondary, start + 16)?);
                }
                let (bitmap, _) = Bitmap::from_bytes(&image).map_err(|e| e.offset_by(start))?;
                Ok((bitmap, &cursor.input()[start..cursor.offset()]))
            }
        }
    }

    /// Reads one field: prefix (for variable types) plus body.
    fn decode_field(
        &self,
        cursor: &mut Cursor<'_>,
        def: &DataElementDef,
    ) -> Result<FieldValue, DecodeError> {
        let bit = def.bit;
        let encoding = self.dialect.effective_encoding(def.encoding_override);

        let count = match def.length_type {
            LengthType::Fixed(declared) => declared,
            _ => {
                let prefix_digits = def.length_type.prefix_digits();
                let start = cursor.offset();
                let bytes = cursor.take(prefix_wire_len(prefix_digits, encoding))?;
                decode_length_prefix(bit, bytes, prefix_digits, encoding, start)?
            }
        };

        // Composite and binary bodies are raw bytes; their count is a byte
        // count regardless of the field's (prefix) encoding.
        if let Some(codec) = &def.sub_elements {
            let body = cursor.take(count)?;
            let map = codec
                .parse(body)
                .map_err(|source| DecodeError::SubElement { bit, source })?;
            return Ok(FieldValue::Composite(map));
        }
        if def.field_type == FieldType::Binary {
            let body = cursor.take(count)?;
            return Ok(FieldValue::Binary(Bytes::copy_from_slice(body)));
        }

        let start = cursor.offset();
        let body = cursor.take(text_wire_len(count, encoding))?;
        let text = decode_text_body(bit, body, count, def.field_type, encoding, start)?;
        Ok(FieldValue::Text(text))
    }
}

/// Decodes an ASCII-hex bitmap half into its binary image.
fn decode_hex_image(hex: &[u8], offset: usize) -> Result<Vec<u8>, DecodeError> {
    let nibble = |byte: u8, at: usize| -> Result<u8, DecodeError> {
        match byte {
            b'0'..=b'9' => Ok(byte - b'0'),
            b'A'..=b'F' => Ok(byte - b'A' + 10),
            b'a'..=b'f' => Ok(byte - b'a' + 10),
            _ => Err(DecodeError::MalformedBitmap {
                offset: offset + at,
                expected: hex.len(),
            }),
        }
    };

    let mut image = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let hi = nibble(hex[i], i)?;
        let lo = nibble(hex[i + 1], i + 1)?;
        image.push((hi << 4) | lo);
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Packer;
    use iron8583_core::mti::Version;
    use iron8583_core::types::SubElementMap;
    use iron8583_dictionary::{DataElementRegistry, DialectConfig};
    use iron8583_subfield::SubElementCodec;

    fn dialect(
        defs: Vec<DataElementDef>,
        field_encoding: Encoding,
        mti_encoding: Encoding,
        bitmap_encoding: BitmapEncoding,
        validation: ValidationMode,
    ) -> Dialect {
        Dialect::new(DialectConfig {
            version: Version::V1987,
            registry: DataElementRegistry::new(defs).unwrap(),
            mti_encoding,
            bitmap_encoding,
            field_encoding,
            validation,
            force_secondary_bitmap: false,
        })
        .unwrap()
    }

    fn financial_defs() -> Vec<DataElementDef> {
        vec![
            DataElementDef::new(
                2,
                "primary_account_number",
                FieldType::Numeric,
                LengthType::LlVar,
            ),
            DataElementDef::new(
                3,
                "processing_code",
                FieldType::Numeric,
                LengthType::Fixed(6),
            ),
            DataElementDef::new(
                4,
                "amount_transaction",
                FieldType::Numeric,
                LengthType::Fixed(12),
            ),
            DataElementDef::new(
                11,
                "system_trace_audit_number",
                FieldType::Numeric,
                LengthType::Fixed(6),
            ),
        ]
    }

    fn ascii_dialect() -> Dialect {
        dialect(
            financial_defs(),
            Encoding::Ascii,
            Encoding::Ascii,
            BitmapEncoding::Binary,
            ValidationMode::Strict,
        )
    }

    fn financial_request() -> IsoMessage {
        IsoMessage::new("0200")
            .with_field(2, "4111111111111111")
            .with_field(3, "000000")
            .with_field(4, "000000001000")
            .with_field(11, "123456")
    }

    #[test]
    fn test_cursor_take_and_offset() {
        let mut cursor = Cursor::new(b"abcdef");
        assert_eq!(cursor.take(2).unwrap(), b"ab");
        assert_eq!(cursor.offset(), 2);
        assert_eq!(cursor.remaining(), b"cdef");
        assert!(!cursor.is_empty());

        let err = cursor.take(10).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InsufficientBytes {
                offset: 2,
                needed: 6,
                field: None,
            }
        );
        // Offset is untouched by a failed read.
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_unpack_ascii_financial_request() {
        let mut wire = Vec::new();
        wire.extend_from_slice(b"0200");
        wire.extend_from_slice(&[0x70, 0x20, 0, 0, 0, 0, 0, 0]);
        wire.extend_from_slice(b"164111111111111111");
        wire.extend_from_slice(b"000000");
        wire.extend_from_slice(b"000000001000");
        wire.extend_from_slice(b"123456");

        let d = ascii_dialect();
        let message = Unpacker::new(&d).unpack(&wire).unwrap();

        assert_eq!(message.mti(), "0200");
        assert_eq!(message.field_str(2), Some("4111111111111111"));
        assert_eq!(message.field_str(3), Some("000000"));
        assert_eq!(message.field_str(4), Some("000000001000"));
        assert_eq!(message.field_str(11), Some("123456"));
        assert_eq!(message.field_count(), 4);
        assert_eq!(
            &message.raw_bitmap()[..],
            &[0x70, 0x20, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_ascii_round_trip() {
        let d = ascii_dialect();
        let original = financial_request();
        let packed = Packer::new(&d).pack(&original).unwrap();
        let unpacked = Unpacker::new(&d).unpack(&packed).unwrap();

        assert_eq!(unpacked.mti(), original.mti());
        assert_eq!(
            unpacked.fields().collect::<Vec<_>>(),
            original.fields().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_bcd_round_trip_with_exact_bytes() {
        let defs = vec![
            DataElementDef::new(
                2,
                "primary_account_number",
                FieldType::Numeric,
                LengthType::LlVar,
            ),
            DataElementDef::new(
                3,
                "processing_code",
                FieldType::Numeric,
                LengthType::Fixed(6),
            ),
        ];
        let d = dialect(
            defs,
            Encoding::Bcd,
            Encoding::Bcd,
            BitmapEncoding::Binary,
            ValidationMode::Strict,
        );

        let original = IsoMessage::new("0200")
            .with_field(2, "4111111111111111")
            .with_field(3, "201000");
        let packed = Packer::new(&d).pack(&original).unwrap();

        let mut expected = vec![0x02, 0x00];
        expected.extend_from_slice(&[0x60, 0, 0, 0, 0, 0, 0, 0]);
        expected.push(0x16);
        expected.extend_from_slice(&[0x41, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11]);
        expected.extend_from_slice(&[0x20, 0x10, 0x00]);
        assert_eq!(&packed[..], &expected[..]);

        let unpacked = Unpacker::new(&d).unpack(&packed).unwrap();
        assert_eq!(unpacked.field_str(2), Some("4111111111111111"));
        assert_eq!(unpacked.field_str(3), Some("201000"));
    }

    #[test]
    fn test_bcd_odd_length_variable_field() {
        let defs = vec![DataElementDef::new(
            2,
            "primary_account_number",
            FieldType::Numeric,
            LengthType::LlVar,
        )];
        let d = dialect(
            defs,
            Encoding::Bcd,
            Encoding::Bcd,
            BitmapEncoding::Binary,
            ValidationMode::Strict,
        );

        let original = IsoMessage::new("0200").with_field(2, "411111111111111");
        let packed = Packer::new(&d).pack(&original).unwrap();
        // Prefix 0x15, then 15 digits in 8 bytes with a zero pad nibble.
        assert_eq!(packed[10], 0x15);
        assert_eq!(packed[11], 0x04);

        let unpacked = Unpacker::new(&d).unpack(&packed).unwrap();
        assert_eq!(unpacked.field_str(2), Some("411111111111111"));
    }

    #[test]
    fn test_ebcdic_round_trip() {
        let defs = vec![DataElementDef::new(
            41,
            "terminal_id",
            FieldType::AlphaNumericSpecial,
            LengthType::Fixed(8),
        )];
        let d = dialect(
            defs,
            Encoding::Ebcdic,
            Encoding::Ebcdic,
            BitmapEncoding::Binary,
            ValidationMode::Strict,
        );

        let original = IsoMessage::new("0800").with_field(41, "TERM0001");
        let packed = Packer::new(&d).pack(&original).unwrap();
        // MTI "0800" in EBCDIC digits.
        assert_eq!(&packed[..4], &[0xF0, 0xF8, 0xF0, 0xF0]);

        let unpacked = Unpacker::new(&d).unpack(&packed).unwrap();
        assert_eq!(unpacked.mti(), "0800");
        assert_eq!(unpacked.field_str(41), Some("TERM0001"));
    }

    #[test]
    fn test_ascii_hex_bitmap_round_trip() {
        let d = dialect(
            financial_defs(),
            Encoding::Ascii,
            Encoding::Ascii,
            BitmapEncoding::AsciiHex,
            ValidationMode::Strict,
        );

        let original = financial_request();
        let packed = Packer::new(&d).pack(&original).unwrap();
        assert_eq!(&packed[4..20], b"7020000000000000");

        let unpacked = Unpacker::new(&d).unpack(&packed).unwrap();
        assert_eq!(unpacked.field_str(2), Some("4111111111111111"));
        assert_eq!(&unpacked.raw_bitmap()[..], b"7020000000000000");
    }

    #[test]
    fn test_unpack_truncated_bitmap() {
        let d = ascii_dialect();
        let mut wire = Vec::new();
        wire.extend_from_slice(b"0200");
        wire.extend_from_slice(&[0x70, 0x20, 0x00]);

        let err = Unpacker::new(&d).unpack(&wire).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedBitmap {
                offset: 4,
                expected: 8,
            }
        );
    }

    #[test]
    fn test_unpack_short_fixed_field() {
        let d = ascii_dialect();
        let mut wire = Vec::new();
        wire.extend_from_slice(b"0200");
        wire.extend_from_slice(&[0x30, 0, 0, 0, 0, 0, 0, 0]); // bits 3, 4
        wire.extend_from_slice(b"000000");
        wire.extend_from_slice(b"000000001"); // 3 bytes short of FIXED(12)

        let err = Unpacker::new(&d).unpack(&wire).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InsufficientBytes {
                offset: 18,
                needed: 3,
                field: Some(4),
            }
        );
    }

    #[test]
    fn test_unpack_unknown_bit_strict() {
        let d = ascii_dialect();
        let mut wire = Vec::new();
        wire.extend_from_slice(b"0200");
        wire.extend_from_slice(&[0x21, 0, 0, 0, 0, 0, 0, 0]); // bits 3, 8
        wire.extend_from_slice(b"000000");
        wire.extend_from_slice(b"12345678");

        let err = Unpacker::new(&d).unpack(&wire).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedField { bit: 8, offset: 18 });
    }

    #[test]
    fn test_unpack_unknown_bit_lenient_records_raw() {
        let d = dialect(
            financial_defs(),
            Encoding::Ascii,
            Encoding::Ascii,
            BitmapEncoding::Binary,
            ValidationMode::Lenient,
        );
        let mut wire = Vec::new();
        wire.extend_from_slice(b"0200");
        wire.extend_from_slice(&[0x21, 0, 0, 0, 0, 0, 0, 0]); // bits 3, 8
        wire.extend_from_slice(b"000000");
        wire.extend_from_slice(b"12345678");

        let message = Unpacker::new(&d).unpack(&wire).unwrap();
        assert_eq!(message.field_str(3), Some("000000"));
        assert_eq!(
            message.field(8).unwrap().as_binary().map(|b| &b[..]),
            Some(&b"12345678"[..])
        );
    }

    #[test]
    fn test_unpack_trailing_bytes() {
        let d = ascii_dialect();
        let mut wire = Vec::new();
        wire.extend_from_slice(b"0200");
        wire.extend_from_slice(&[0x20, 0, 0, 0, 0, 0, 0, 0]); // bit 3
        wire.extend_from_slice(b"000000");
        wire.extend_from_slice(b"JUNK");

        let err = Unpacker::new(&d).unpack(&wire).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TrailingBytes {
                offset: 18,
                remaining: 4,
            }
        );
    }

    #[test]
    fn test_unpack_invalid_mti_digit() {
        let d = ascii_dialect();
        let mut wire = Vec::new();
        wire.extend_from_slice(b"0900");
        wire.extend_from_slice(&[0x20, 0, 0, 0, 0, 0, 0, 0]);
        wire.extend_from_slice(b"000000");

        let err = Unpacker::new(&d).unpack(&wire).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Mti(MtiError::InvalidDigit { part: "class", .. })
        ));
    }

    #[test]
    fn test_composite_field_round_trip() {
        let defs = vec![
            DataElementDef::new(
                3,
                "processing_code",
                FieldType::Numeric,
                LengthType::Fixed(6),
            ),
            DataElementDef::new(
                55,
                "icc_system_related_data",
                FieldType::Binary,
                LengthType::LllVar,
            )
            .with_sub_elements(SubElementCodec::BerTlv),
        ];
        let d = dialect(
            defs,
            Encoding::Ascii,
            Encoding::Ascii,
            BitmapEncoding::Binary,
            ValidationMode::Strict,
        );

        let mut emv = SubElementMap::new();
        emv.insert(
            "9F02".to_string(),
            Bytes::from_static(&[0x00, 0x00, 0x00, 0x00, 0x10, 0x00]),
        );
        emv.insert("82".to_string(), Bytes::from_static(&[0x39, 0x00]));

        let original = IsoMessage::new("0200")
            .with_field(3, "000000")
            .with_field(55, FieldValue::Composite(emv.clone()));
        let packed = Packer::new(&d).pack(&original).unwrap();
        let unpacked = Unpacker::new(&d).unpack(&packed).unwrap();

        assert_eq!(unpacked.field(55).unwrap().as_composite(), Some(&emv));
        assert_eq!(unpacked.field_str(3), Some("000000"));
    }

    #[test]
    fn test_binary_field_with_ascii_override_in_bcd_dialect() {
        let defs = vec![
            DataElementDef::new(
                3,
                "processing_code",
                FieldType::Numeric,
                LengthType::Fixed(6),
            ),
            DataElementDef::new(
                52,
                "pin_data",
                FieldType::Binary,
                LengthType::Fixed(8),
            )
            .with_encoding(Encoding::Ascii),
        ];
        let d = dialect(
            defs,
            Encoding::Bcd,
            Encoding::Bcd,
            BitmapEncoding::Binary,
            ValidationMode::Strict,
        );

        let pin_block = Bytes::from_static(&[0x1A, 0x2B, 0x3C, 0x4D, 0x5E, 0x6F, 0x70, 0x81]);
        let original = IsoMessage::new("0200")
            .with_field(3, "000000")
            .with_field(52, pin_block.clone());
        let packed = Packer::new(&d).pack(&original).unwrap();
        let unpacked = Unpacker::new(&d).unpack(&packed).unwrap();

        assert_eq!(unpacked.field(52).unwrap().as_binary(), Some(&pin_block));
    }

    #[test]
    fn test_force_secondary_round_trip() {
        let config = DialectConfig {
            version: Version::V1987,
            registry: DataElementRegistry::new(financial_defs()).unwrap(),
            mti_encoding: Encoding::Ascii,
            bitmap_encoding: BitmapEncoding::Binary,
            field_encoding: Encoding::Ascii,
            validation: ValidationMode::Strict,
            force_secondary_bitmap: true,
        };
        let d = Dialect::new(config).unwrap();

        let original = financial_request();
        let packed = Packer::new(&d).pack(&original).unwrap();
        assert_eq!(packed.len(), 4 + 16 + 2 + 16 + 6 + 12 + 6);

        let unpacked = Unpacker::new(&d).unpack(&packed).unwrap();
        assert_eq!(unpacked.field_str(2), Some("4111111111111111"));
        assert_eq!(unpacked.raw_bitmap().len(), 16);
    }
}
