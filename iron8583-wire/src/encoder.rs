/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Message packer.
//!
//! [`Packer`] turns an [`IsoMessage`] into wire bytes under a dialect:
//! MTI first, then the bitmap built from the present bits, then every field
//! in strictly ascending bit order. Ascending order is a wire-format
//! requirement, not a preference. Packing is a pure transformation; the
//! only state is the output buffer under construction.

use crate::element::{
    encode_length_prefix, encode_text_body, pad_fixed, snippet,
};
use bytes::{BufMut, BytesMut};
use iron8583_core::bitmap::Bitmap;
use iron8583_core::encoding::{Encoding, bcd_pack, ebcdic_encode};
use iron8583_core::error::EncodeError;
use iron8583_core::message::IsoMessage;
use iron8583_core::mti::Mti;
use iron8583_core::types::{FieldType, FieldValue, LengthType};
use iron8583_dictionary::{BitmapEncoding, DataElementDef, Dialect};
use tracing::trace;

/// Packs messages under one dialect.
///
/// Cheap to construct; holds only the dialect reference. One packer may be
/// used from any number of threads because packing never mutates it.
#[derive(Debug, Clone, Copy)]
pub struct Packer<'a> {
    dialect: &'a Dialect,
}

impl<'a> Packer<'a> {
    /// Creates a packer for the given dialect.
    #[inline]
    #[must_use]
    pub const fn new(dialect: &'a Dialect) -> Self {
        Self { dialect }
    }

    /// Packs a message into a contiguous wire buffer.
    ///
    /// # Errors
    /// - [`EncodeError::Mti`] when the MTI fails validation for the
    ///   dialect's revision
    /// - [`EncodeError::UnknownField`] when a present bit has no registry
    ///   definition
    /// - [`EncodeError::FieldOverflow`], [`EncodeError::FixedLengthMismatch`],
    ///   [`EncodeError::InvalidFieldValue`], [`EncodeError::WrongValueKind`],
    ///   or [`EncodeError::SubElement`] per field
    pub fn pack(&self, message: &IsoMessage) -> Result<BytesMut, EncodeError> {
        let mti = Mti::parse(message.mti(), self.dialect.version())?;

        // Resolve every definition up front so the bitmap never announces
        // a field the registry cannot encode.
        let mut fields: Vec<(&DataElementDef, &FieldValue)> =
            Vec::with_capacity(message.field_count());
        let mut bitmap = Bitmap::new();
        for (bit, value) in message.fields() {
            let def = self
                .dialect
                .registry()
                .get(bit)
                .ok_or(EncodeError::UnknownField { bit })?;
            bitmap.set(bit);
            fields.push((def, value));
        }
        if self.dialect.force_secondary_bitmap() {
            bitmap.force_secondary();
        }

        let mut out = BytesMut::with_capacity(256);
        self.encode_mti(&mti, &mut out);
        self.encode_bitmap(&bitmap, &mut out);
        for (def, value) in fields {
            self.encode_field(def, value, &mut out)?;
        }

        trace!(
            mti = %mti,
            fields = message.field_count(),
            bytes = out.len(),
            "packed message"
        );
        Ok(out)
    }

    /// Appends the MTI in the dialect's MTI encoding.
    ///
    /// BCD left-pads the three-digit 2021 form to four digits (two bytes).
    fn encode_mti(&self, mti: &Mti, out: &mut BytesMut) {
        let digits = mti.encode();
        match self.dialect.mti_encoding() {
            Encoding::Ascii => out.put_slice(digits.as_bytes()),
            Encoding::Bcd => {
                let mut padded = String::with_capacity(4);
                if digits.len() % 2 == 1 {
                    padded.push('0');
                }
                padded.push_str(&digits);
                let packed = bcd_pack(&padded).expect("mti digits are decimal");
                out.put_slice(&packed);
            }
            Encoding::Ebcdic => {
                let encoded = ebcdic_encode(&digits).expect("mti digits are ascii");
                out.put_slice(&encoded);
            }
        }
    }

    /// Appends the bitmap image in the dialect's bitmap encoding.
    fn encode_bitmap(&self, bitmap: &Bitmap, out: &mut BytesMut) {
        let image = bitmap.to_bytes();
        match self.dialect.bitmap_encoding() {
            BitmapEncoding::Binary => out.put_slice(&image),
            BitmapEncoding::AsciiHex => {
                for byte in image {
                    let mut hex = [0u8; 2];
                    hex[0] = HEX_DIGITS[(byte >> 4) as usize];
                    hex[1] = HEX_DIGITS[(byte & 0x0F) as usize];
                    out.put_slice(&hex);
                }
            }
        }
    }

    /// Appends one field: prefix (for variable types) plus body.
    fn encode_field(
        &self,
        def: &DataElementDef,
        value: &FieldValue,
        out: &mut BytesMut,
    ) -> Result<(), EncodeError> {
        let bit = def.bit;
        match (&def.sub_elements, value) {
            (Some(codec), FieldValue::Composite(map)) => {
                let body = codec
                    .pack(map)
                    .map_err(|source| EncodeError::SubElement { bit, source })?;
                self.append_raw(def, &body, out)
            }
            (Some(_), _) => Err(EncodeError::WrongValueKind {
                bit,
                expected: "composite",
            }),
            (None, FieldValue::Composite(_)) => Err(EncodeError::WrongValueKind {
                bit,
                expected: "scalar",
            }),
            (None, FieldValue::Binary(body)) => {
                if def.field_type != FieldType::Binary {
                    return Err(EncodeError::WrongValueKind {
                        bit,
                        expected: "text",
                    });
                }
                self.append_raw(def, body, out)
            }
            (None, FieldValue::Text(text)) => {
                if def.field_type == FieldType::Binary {
                    return Err(EncodeError::WrongValueKind {
                        bit,
                        expected: "binary",
                    });
                }
                self.append_text(def, text, out)
            }
        }
    }

    /// Appends a textual value with character-class validation, padding,
    /// and length prefixing.
    fn append_text(
        &self,
        def: &DataElementDef,
        text: &str,
        out: &mut BytesMut,
    ) -> Result<(), EncodeError> {
        let bit = def.bit;
        if !def.field_type.is_valid_text(text) {
            return Err(EncodeError::InvalidFieldValue {
                bit,
                value: snippet(text),
            });
        }

        let encoding = self.dialect.effective_encoding(def.encoding_override);
        match def.length_type {
            LengthType::Fixed(declared) => {
                let padded = pad_fixed(bit, text, def.field_type, declared)?;
                encode_text_body(bit, &padded, encoding, out)
            }
            _ => {
                let length = text.len();
                let max_length = def.length_type.max_length();
                if length > max_length {
                    return Err(EncodeError::FieldOverflow {
                        bit,
                        length,
                        max_length,
                    });
                }
                encode_length_prefix(bit, length, def.length_type.prefix_digits(), encoding, out)?;
                encode_text_body(bit, text, encoding, out)
            }
        }
    }

    /// Appends a raw body (binary field or packed composite).
    ///
    /// Raw bodies are never character-encoded or padded; their length
    /// prefix counts bytes.
    fn append_raw(
        &self,
        def: &DataElementDef,
        body: &[u8],
        out: &mut BytesMut,
    ) -> Result<(), EncodeError> {
        let bit = def.bit;
        match def.length_type {
            LengthType::Fixed(declared) => {
                if body.len() != declared {
                    return Err(EncodeError::FixedLengthMismatch {
                        bit,
                        length: body.len(),
                        expected: declared,
                    });
                }
            }
            _ => {
                let max_length = def.length_type.max_length();
                if body.len() > max_length {
                    return Err(EncodeError::FieldOverflow {
                        bit,
                        length: body.len(),
                        max_length,
                    });
                }
                let encoding = self.dialect.effective_encoding(def.encoding_override);
                encode_length_prefix(
                    bit,
                    body.len(),
                    def.length_type.prefix_digits(),
                    encoding,
                    out,
                )?;
            }
        }
        out.put_slice(body);
        Ok(())
    }
}

/// Uppercase hex digit table for ASCII-hex bitmaps.
const HEX_DIGITS: [u8; 16] = *b"0123456789ABCDEF";

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use iron8583_core::mti::Version;
    use iron8583_dictionary::{DataElementRegistry, DialectConfig, ValidationMode};

    fn ascii_1987_dialect() -> Dialect {
        let registry = DataElementRegistry::new(vec![
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
            DataElementDef::new(
                65,
                "reserved_iso",
                FieldType::Numeric,
                LengthType::Fixed(1),
            ),
        ])
        .unwrap();
        Dialect::new(DialectConfig {
            version: Version::V1987,
            registry,
            mti_encoding: Encoding::Ascii,
            bitmap_encoding: BitmapEncoding::Binary,
            field_encoding: Encoding::Ascii,
            validation: ValidationMode::Strict,
            force_secondary_bitmap: false,
        })
        .unwrap()
    }

    fn financial_request() -> IsoMessage {
        IsoMessage::new("0200")
            .with_field(2, "4111111111111111")
            .with_field(3, "000000")
            .with_field(4, "000000001000")
            .with_field(11, "123456")
    }

    #[test]
    fn test_pack_ascii_financial_request() {
        let dialect = ascii_1987_dialect();
        let packed = Packer::new(&dialect).pack(&financial_request()).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"0200");
        expected.extend_from_slice(&[0x70, 0x20, 0, 0, 0, 0, 0, 0]);
        expected.extend_from_slice(b"164111111111111111");
        expected.extend_from_slice(b"000000");
        expected.extend_from_slice(b"000000001000");
        expected.extend_from_slice(b"123456");
        assert_eq!(&packed[..], &expected[..]);
    }

    #[test]
    fn test_pack_high_bit_forces_secondary_bitmap() {
        let dialect = ascii_1987_dialect();
        let message = IsoMessage::new("0200").with_field(65, "7");
        let packed = Packer::new(&dialect).pack(&message).unwrap();

        // MTI (4) + 16-byte bitmap + 1-byte field.
        assert_eq!(packed.len(), 4 + 16 + 1);
        assert_eq!(packed[4] & 0x80, 0x80);
    }

    #[test]
    fn test_pack_unknown_field() {
        let dialect = ascii_1987_dialect();
        let message = IsoMessage::new("0200").with_field(70, "301");
        assert_eq!(
            Packer::new(&dialect).pack(&message).unwrap_err(),
            EncodeError::UnknownField { bit: 70 }
        );
    }

    #[test]
    fn test_pack_invalid_mti_version() {
        let dialect = ascii_1987_dialect();
        let message = IsoMessage::new("200");
        assert!(matches!(
            Packer::new(&dialect).pack(&message).unwrap_err(),
            EncodeError::Mti(_)
        ));
    }

    #[test]
    fn test_pack_llvar_boundary() {
        let registry = DataElementRegistry::new(vec![DataElementDef::new(
            44,
            "additional_response_data",
            FieldType::AlphaNumericSpecial,
            LengthType::LlVar,
        )])
        .unwrap();
        let dialect = Dialect::new(DialectConfig {
            version: Version::V1987,
            registry,
            mti_encoding: Encoding::Ascii,
            bitmap_encoding: BitmapEncoding::Binary,
            field_encoding: Encoding::Ascii,
            validation: ValidationMode::Strict,
            force_secondary_bitmap: false,
        })
        .unwrap();
        let packer = Packer::new(&dialect);

        let ok = IsoMessage::new("0210").with_field(44, "x".repeat(99));
        assert!(packer.pack(&ok).is_ok());

        let too_long = IsoMessage::new("0210").with_field(44, "x".repeat(100));
        assert_eq!(
            packer.pack(&too_long).unwrap_err(),
            EncodeError::FieldOverflow {
                bit: 44,
                length: 100,
                max_length: 99,
            }
        );
    }

    #[test]
    fn test_pack_pads_fixed_fields() {
        let dialect = ascii_1987_dialect();
        let message = IsoMessage::new("0200").with_field(4, "1000");
        let packed = Packer::new(&dialect).pack(&message).unwrap();
        assert!(packed.ends_with(b"000000001000"));
    }

    #[test]
    fn test_pack_rejects_charset_violation() {
        let dialect = ascii_1987_dialect();
        let message = IsoMessage::new("0200").with_field(3, "00A000");
        assert_eq!(
            Packer::new(&dialect).pack(&message).unwrap_err(),
            EncodeError::InvalidFieldValue {
                bit: 3,
                value: "00A000".to_string(),
            }
        );
    }

    #[test]
    fn test_pack_rejects_wrong_value_kind() {
        let dialect = ascii_1987_dialect();
        let message = IsoMessage::new("0200").with_field(3, Bytes::from_static(b"000000"));
        assert_eq!(
            Packer::new(&dialect).pack(&message).unwrap_err(),
            EncodeError::WrongValueKind {
                bit: 3,
                expected: "text",
            }
        );
    }

    #[test]
    fn test_pack_forced_secondary_bitmap() {
        let registry = DataElementRegistry::new(vec![DataElementDef::new(
            3,
            "processing_code",
            FieldType::Numeric,
            LengthType::Fixed(6),
        )])
        .unwrap();
        let dialect = Dialect::new(DialectConfig {
            version: Version::V1987,
            registry,
            mti_encoding: Encoding::Ascii,
            bitmap_encoding: BitmapEncoding::Binary,
            field_encoding: Encoding::Ascii,
            validation: ValidationMode::Strict,
            force_secondary_bitmap: true,
        })
        .unwrap();

        let message = IsoMessage::new("0200").with_field(3, "000000");
        let packed = Packer::new(&dialect).pack(&message).unwrap();
        assert_eq!(packed.len(), 4 + 16 + 6);
        assert_eq!(packed[4], 0xA0); // indicator plus bit 3
        assert!(packed[12..20].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pack_ascii_hex_bitmap() {
        let registry = DataElementRegistry::new(vec![DataElementDef::new(
            3,
            "processing_code",
            FieldType::Numeric,
            LengthType::Fixed(6),
        )])
        .unwrap();
        let dialect = Dialect::new(DialectConfig {
            version: Version::V1987,
            registry,
            mti_encoding: Encoding::Ascii,
            bitmap_encoding: BitmapEncoding::AsciiHex,
            field_encoding: Encoding::Ascii,
            validation: ValidationMode::Strict,
            force_secondary_bitmap: false,
        })
        .unwrap();

        let message = IsoMessage::new("0200").with_field(3, "000000");
        let packed = Packer::new(&dialect).pack(&message).unwrap();
        assert_eq!(&packed[..], b"02002000000000000000000000");
    }
}
