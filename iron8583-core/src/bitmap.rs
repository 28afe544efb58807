/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Presence bitmap engine.
//!
//! An ISO 8583 message announces its fields through a 64-bit primary bitmap,
//! optionally followed by a 64-bit secondary bitmap. Bits are 1-indexed with
//! bit 1 at the most significant position of byte 0; bit 1 itself is reserved
//! as the secondary-bitmap indicator and is managed by the engine, never by
//! callers. Data elements occupy bits 2-128; a tertiary bitmap is not
//! supported and bit numbers above 128 are rejected at registry construction.

use crate::error::DecodeError;
use smallvec::SmallVec;
use std::fmt;

/// Mask of the secondary-bitmap indicator (bit 1) within the primary word.
const SECONDARY_FLAG: u64 = 1 << 63;

/// Presence bitmap for one message.
///
/// Created fresh per pack/unpack call and discarded afterwards; never shared
/// across calls or threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bitmap {
    /// Bits 1-64, bit 1 at the most significant position.
    primary: u64,
    /// Bits 65-128, bit 65 at the most significant position.
    secondary: u64,
}

impl Bitmap {
    /// Creates an empty bitmap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primary: 0,
            secondary: 0,
        }
    }

    /// Sets a data-element bit.
    ///
    /// Setting any bit in 65-128 raises the secondary-bitmap indicator
    /// automatically.
    ///
    /// # Panics
    /// Panics if `bit` is 0, 1 (reserved for the indicator), or above 128.
    pub fn set(&mut self, bit: u8) {
        assert!(
            (2..=128).contains(&bit),
            "data element bits occupy 2-128, got {bit}"
        );
        if bit <= 64 {
            self.primary |= 1u64 << (64 - u32::from(bit));
        } else {
            self.secondary |= 1u64 << (128 - u32::from(bit));
            self.primary |= SECONDARY_FLAG;
        }
    }

    /// Clears a data-element bit.
    ///
    /// The secondary-bitmap indicator drops automatically once no bit in
    /// 65-128 remains set.
    ///
    /// # Panics
    /// Panics if `bit` is 0, 1, or above 128.
    pub fn clear(&mut self, bit: u8) {
        assert!(
            (2..=128).contains(&bit),
            "data element bits occupy 2-128, got {bit}"
        );
        if bit <= 64 {
            self.primary &= !(1u64 << (64 - u32::from(bit)));
        } else {
            self.secondary &= !(1u64 << (128 - u32::from(bit)));
            if self.secondary == 0 {
                self.primary &= !SECONDARY_FLAG;
            }
        }
    }

    /// Returns true if the given bit is set.
    ///
    /// Bit 1 may be queried to inspect the secondary-bitmap indicator.
    ///
    /// # Panics
    /// Panics if `bit` is 0 or above 128.
    #[must_use]
    pub fn is_set(&self, bit: u8) -> bool {
        assert!(
            (1..=128).contains(&bit),
            "bitmap bits occupy 1-128, got {bit}"
        );
        if bit <= 64 {
            self.primary & (1u64 << (64 - u32::from(bit))) != 0
        } else {
            self.secondary & (1u64 << (128 - u32::from(bit))) != 0
        }
    }

    /// Returns true if the secondary-bitmap indicator is raised.
    #[inline]
    #[must_use]
    pub const fn has_secondary(&self) -> bool {
        self.primary & SECONDARY_FLAG != 0
    }

    /// Raises the secondary-bitmap indicator unconditionally.
    ///
    /// Used by dialects that mandate a 16-byte bitmap on every message.
    /// Call after the last `set`; clearing a bit in 65-128 afterwards may
    /// drop the indicator again.
    pub fn force_secondary(&mut self) {
        self.primary |= SECONDARY_FLAG;
    }

    /// Returns the wire size of this bitmap in bytes (8 or 16).
    #[inline]
    #[must_use]
    pub const fn wire_len(&self) -> usize {
        if self.has_secondary() { 16 } else { 8 }
    }

    /// Emits the bitmap image: 8 bytes, or 16 when the secondary-bitmap
    /// indicator is raised, most significant bit first.
    #[must_use]
    pub fn to_bytes(&self) -> SmallVec<[u8; 16]> {
        let mut out = SmallVec::new();
        out.extend_from_slice(&self.primary.to_be_bytes());
        if self.has_secondary() {
            out.extend_from_slice(&self.secondary.to_be_bytes());
        }
        out
    }

    /// Reads a bitmap image from the front of `input`.
    ///
    /// Reads 8 bytes, then 8 more when bit 1 of the first byte is set.
    ///
    /// # Returns
    /// The bitmap and the number of bytes consumed.
    ///
    /// # Errors
    /// Returns [`DecodeError::MalformedBitmap`] when `input` holds fewer
    /// bytes than the image requires; the carried offset is relative to
    /// `input` and rebasable via [`DecodeError::offset_by`].
    pub fn from_bytes(input: &[u8]) -> Result<(Self, usize), DecodeError> {
        if input.len() < 8 {
            return Err(DecodeError::MalformedBitmap {
                offset: 0,
                expected: 8,
            });
        }
        let primary = u64::from_be_bytes(input[0..8].try_into().expect("slice is 8 bytes"));

        if primary & SECONDARY_FLAG == 0 {
            return Ok((
                Self {
                    primary,
                    secondary: 0,
                },
                8,
            ));
        }

        if input.len() < 16 {
            return Err(DecodeError::MalformedBitmap {
                offset: 0,
                expected: 16,
            });
        }
        let secondary = u64::from_be_bytes(input[8..16].try_into().expect("slice is 8 bytes"));
        Ok((Self { primary, secondary }, 16))
    }

    /// Iterates the set data-element bits in ascending order.
    pub fn bits(&self) -> impl Iterator<Item = u8> + '_ {
        (2..=128).filter(move |&bit| self.is_set(bit))
    }
}

impl fmt::Display for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_only_image() {
        let mut bitmap = Bitmap::new();
        bitmap.set(2);
        bitmap.set(3);
        bitmap.set(4);
        bitmap.set(11);

        let bytes = bitmap.to_bytes();
        assert_eq!(bytes.len(), 8);
        assert_eq!(bytes[0], 0x70);
        assert_eq!(bytes[1], 0x20);
        assert_eq!(bitmap.to_string(), "7020000000000000");
    }

    #[test]
    fn test_secondary_trigger() {
        let mut bitmap = Bitmap::new();
        assert!(!bitmap.has_secondary());

        bitmap.set(65);
        assert!(bitmap.is_set(1));
        assert!(bitmap.has_secondary());

        let bytes = bitmap.to_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[0] & 0x80, 0x80);
        assert_eq!(bytes[8], 0x80);
    }

    #[test]
    fn test_secondary_clears_with_last_high_bit() {
        let mut bitmap = Bitmap::new();
        bitmap.set(70);
        bitmap.set(100);
        assert!(bitmap.is_set(1));

        bitmap.clear(70);
        assert!(bitmap.is_set(1));
        bitmap.clear(100);
        assert!(!bitmap.is_set(1));
        assert_eq!(bitmap.to_bytes().len(), 8);
    }

    #[test]
    fn test_force_secondary() {
        let mut bitmap = Bitmap::new();
        bitmap.set(2);
        bitmap.force_secondary();

        let bytes = bitmap.to_bytes();
        assert_eq!(bytes.len(), 16);
        assert!(bytes[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_bytes_round_trip() {
        let mut bitmap = Bitmap::new();
        for bit in [2, 7, 32, 64, 65, 128] {
            bitmap.set(bit);
        }
        let bytes = bitmap.to_bytes();
        let (decoded, consumed) = Bitmap::from_bytes(&bytes).unwrap();
        assert_eq!(consumed, 16);
        assert_eq!(decoded, bitmap);
        assert_eq!(decoded.bits().collect::<Vec<_>>(), vec![2, 7, 32, 64, 65, 128]);
    }

    #[test]
    fn test_from_bytes_truncated_primary() {
        let err = Bitmap::from_bytes(&[0x70; 5]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedBitmap {
                offset: 0,
                expected: 8,
            }
        );
    }

    #[test]
    fn test_from_bytes_truncated_secondary() {
        let mut image = vec![0u8; 12];
        image[0] = 0x80;
        let err = Bitmap::from_bytes(&image).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedBitmap {
                offset: 0,
                expected: 16,
            }
        );
    }

    #[test]
    fn test_from_bytes_accepts_empty_secondary() {
        let mut image = vec![0u8; 16];
        image[0] = 0xC0; // indicator plus bit 2
        let (decoded, consumed) = Bitmap::from_bytes(&image).unwrap();
        assert_eq!(consumed, 16);
        assert!(decoded.has_secondary());
        assert_eq!(decoded.bits().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    #[should_panic(expected = "data element bits occupy 2-128")]
    fn test_set_rejects_indicator_bit() {
        Bitmap::new().set(1);
    }
}
