/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Message type indicator resolution.
//!
//! This module provides:
//! - [`Version`]: the ISO 8583 revision a dialect speaks
//! - [`MessageClass`], [`MessageFunction`], [`MessageOrigin`]: the MTI digits
//! - [`Mti`]: version-aware parse, render, and request/response pairing
//!
//! The 1987 and 1993 revisions use four digits with a leading version digit;
//! the 2021 revision drops the version digit and uses three.

use crate::error::MtiError;
use arrayvec::ArrayString;
use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 8583 revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    /// ISO 8583:1987, four-digit MTI with version digit `0`.
    V1987,
    /// ISO 8583:1993, four-digit MTI with version digit `1`.
    V1993,
    /// ISO 8583:2021, three-digit MTI without a version digit.
    V2021,
}

impl Version {
    /// Number of digits an MTI carries under this revision.
    #[must_use]
    pub const fn digit_count(&self) -> usize {
        match self {
            Self::V1987 | Self::V1993 => 4,
            Self::V2021 => 3,
        }
    }

    /// The leading version digit, when the revision carries one.
    #[must_use]
    pub const fn version_digit(&self) -> Option<char> {
        match self {
            Self::V1987 => Some('0'),
            Self::V1993 => Some('1'),
            Self::V2021 => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1987 => write!(f, "1987"),
            Self::V1993 => write!(f, "1993"),
            Self::V2021 => write!(f, "2021"),
        }
    }
}

/// Message class digit of the MTI.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
pub enum MessageClass {
    /// Authorization (1xx).
    Authorization = 1,
    /// Financial presentment (2xx).
    Financial = 2,
    /// File action (3xx).
    FileAction = 3,
    /// Reversal or chargeback (4xx).
    Reversal = 4,
    /// Reconciliation (5xx).
    Reconciliation = 5,
    /// Administrative (6xx).
    Administrative = 6,
    /// Fee collection (7xx).
    FeeCollection = 7,
    /// Network management (8xx).
    NetworkManagement = 8,
}

impl MessageClass {
    /// Creates a class from its MTI digit; digit 9 is reserved.
    #[must_use]
    pub const fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Self::Authorization),
            '2' => Some(Self::Financial),
            '3' => Some(Self::FileAction),
            '4' => Some(Self::Reversal),
            '5' => Some(Self::Reconciliation),
            '6' => Some(Self::Administrative),
            '7' => Some(Self::FeeCollection),
            '8' => Some(Self::NetworkManagement),
            _ => None,
        }
    }

    /// Returns the MTI digit for this class.
    #[must_use]
    pub const fn as_digit(self) -> char {
        (b'0' + self as u8) as char
    }
}

/// Message function digit of the MTI.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
pub enum MessageFunction {
    /// Request (x0x).
    Request = 0,
    /// Request response (x1x).
    RequestResponse = 1,
    /// Advice (x2x).
    Advice = 2,
    /// Advice response (x3x).
    AdviceResponse = 3,
    /// Notification (x4x).
    Notification = 4,
    /// Notification acknowledgement (x5x).
    NotificationAck = 5,
    /// Instruction (x6x).
    Instruction = 6,
    /// Instruction acknowledgement (x7x).
    InstructionAck = 7,
}

impl MessageFunction {
    /// Creates a function from its MTI digit; digits 8 and 9 are reserved.
    #[must_use]
    pub const fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(Self::Request),
            '1' => Some(Self::RequestResponse),
            '2' => Some(Self::Advice),
            '3' => Some(Self::AdviceResponse),
            '4' => Some(Self::Notification),
            '5' => Some(Self::NotificationAck),
            '6' => Some(Self::Instruction),
            '7' => Some(Self::InstructionAck),
            _ => None,
        }
    }

    /// Returns the MTI digit for this function.
    #[must_use]
    pub const fn as_digit(self) -> char {
        (b'0' + self as u8) as char
    }

    /// Returns true if this function initiates an exchange.
    #[must_use]
    pub const fn is_request_kind(self) -> bool {
        matches!(
            self,
            Self::Request | Self::Advice | Self::Notification | Self::Instruction
        )
    }

    /// The function a responder answers this one with.
    ///
    /// The standard pairing increments the function digit: request goes to
    /// request response, advice to advice response, notification and
    /// instruction to their acknowledgements. Responses and acknowledgements
    /// have no successor.
    #[must_use]
    pub const fn response(self) -> Option<Self> {
        match self {
            Self::Request => Some(Self::RequestResponse),
            Self::Advice => Some(Self::AdviceResponse),
            Self::Notification => Some(Self::NotificationAck),
            Self::Instruction => Some(Self::InstructionAck),
            Self::RequestResponse
            | Self::AdviceResponse
            | Self::NotificationAck
            | Self::InstructionAck => None,
        }
    }
}

/// Message origin digit of the MTI.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
pub enum MessageOrigin {
    /// Acquirer (xx0).
    Acquirer = 0,
    /// Acquirer repeat (xx1).
    AcquirerRepeat = 1,
    /// Issuer (xx2).
    Issuer = 2,
    /// Issuer repeat (xx3).
    IssuerRepeat = 3,
    /// Other (xx4).
    Other = 4,
    /// Other repeat (xx5).
    OtherRepeat = 5,
}

impl MessageOrigin {
    /// Creates an origin from its MTI digit; digits 6-9 are reserved.
    #[must_use]
    pub const fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(Self::Acquirer),
            '1' => Some(Self::AcquirerRepeat),
            '2' => Some(Self::Issuer),
            '3' => Some(Self::IssuerRepeat),
            '4' => Some(Self::Other),
            '5' => Some(Self::OtherRepeat),
            _ => None,
        }
    }

    /// Returns the MTI digit for this origin.
    #[must_use]
    pub const fn as_digit(self) -> char {
        (b'0' + self as u8) as char
    }
}

/// A resolved message type indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mti {
    version: Version,
    class: MessageClass,
    function: MessageFunction,
    origin: MessageOrigin,
}

impl Mti {
    /// Assembles an MTI from its parts.
    #[must_use]
    pub const fn new(
        version: Version,
        class: MessageClass,
        function: MessageFunction,
        origin: MessageOrigin,
    ) -> Self {
        Self {
            version,
            class,
            function,
            origin,
        }
    }

    /// Parses and validates an MTI against the dialect's revision.
    ///
    /// The digit count must match the revision exactly, and for four-digit
    /// forms the leading digit must be the revision's version digit.
    ///
    /// # Errors
    /// Returns [`MtiError::UnsupportedVersion`] on a digit-count mismatch,
    /// [`MtiError::VersionDigitMismatch`] on the wrong leading digit, and
    /// [`MtiError::InvalidDigit`] on reserved or non-numeric digits.
    pub fn parse(text: &str, version: Version) -> Result<Self, MtiError> {
        let expected_digits = version.digit_count();
        if text.chars().count() != expected_digits {
            return Err(MtiError::UnsupportedVersion {
                expected_digits,
                actual_digits: text.chars().count(),
            });
        }

        let mut digits = text.chars();
        if let Some(expected) = version.version_digit() {
            let actual = digits.next().unwrap_or('?');
            if !actual.is_ascii_digit() {
                return Err(MtiError::InvalidDigit {
                    part: "version",
                    digit: actual,
                });
            }
            if actual != expected {
                return Err(MtiError::VersionDigitMismatch { expected, actual });
            }
        }

        let class_digit = digits.next().unwrap_or('?');
        let class = MessageClass::from_digit(class_digit).ok_or(MtiError::InvalidDigit {
            part: "class",
            digit: class_digit,
        })?;

        let function_digit = digits.next().unwrap_or('?');
        let function =
            MessageFunction::from_digit(function_digit).ok_or(MtiError::InvalidDigit {
                part: "function",
                digit: function_digit,
            })?;

        let origin_digit = digits.next().unwrap_or('?');
        let origin = MessageOrigin::from_digit(origin_digit).ok_or(MtiError::InvalidDigit {
            part: "origin",
            digit: origin_digit,
        })?;

        Ok(Self {
            version,
            class,
            function,
            origin,
        })
    }

    /// Renders the canonical digit string (three or four digits).
    #[must_use]
    pub fn encode(&self) -> ArrayString<4> {
        let mut out = ArrayString::new();
        if let Some(version_digit) = self.version.version_digit() {
            out.push(version_digit);
        }
        out.push(self.class.as_digit());
        out.push(self.function.as_digit());
        out.push(self.origin.as_digit());
        out
    }

    /// Returns the revision this MTI was resolved under.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Returns the message class.
    #[inline]
    #[must_use]
    pub const fn class(&self) -> MessageClass {
        self.class
    }

    /// Returns the message function.
    #[inline]
    #[must_use]
    pub const fn function(&self) -> MessageFunction {
        self.function
    }

    /// Returns the message origin.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> MessageOrigin {
        self.origin
    }

    /// Returns true if this MTI initiates an exchange.
    #[must_use]
    pub const fn is_request(&self) -> bool {
        self.function.is_request_kind()
    }

    /// Returns true if this MTI answers an exchange.
    #[must_use]
    pub const fn is_response(&self) -> bool {
        !self.function.is_request_kind()
    }

    /// Returns true if this MTI carries an advice.
    #[must_use]
    pub const fn is_advice(&self) -> bool {
        matches!(
            self.function,
            MessageFunction::Advice | MessageFunction::AdviceResponse
        )
    }

    /// The MTI a responder is expected to answer this one with.
    ///
    /// Pure function over the function-digit pairing; callers use it to
    /// validate request/response matching. Responses and acknowledgements
    /// yield `None`.
    #[must_use]
    pub fn expected_response(&self) -> Option<Self> {
        self.function.response().map(|function| Self {
            function,
            ..*self
        })
    }
}

impl fmt::Display for Mti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_financial_request() {
        let mti = Mti::parse("0200", Version::V1987).unwrap();
        assert_eq!(mti.class(), MessageClass::Financial);
        assert_eq!(mti.function(), MessageFunction::Request);
        assert_eq!(mti.origin(), MessageOrigin::Acquirer);
        assert!(mti.is_request());
        assert_eq!(mti.encode().as_str(), "0200");
    }

    #[test]
    fn test_parse_1993_network_management() {
        let mti = Mti::parse("1804", Version::V1993).unwrap();
        assert_eq!(mti.class(), MessageClass::NetworkManagement);
        assert_eq!(mti.origin(), MessageOrigin::Other);
    }

    #[test]
    fn test_parse_2021_three_digits() {
        let mti = Mti::parse("200", Version::V2021).unwrap();
        assert_eq!(mti.class(), MessageClass::Financial);
        assert_eq!(mti.encode().as_str(), "200");
    }

    #[test]
    fn test_digit_count_mismatch() {
        let err = Mti::parse("0200", Version::V2021).unwrap_err();
        assert_eq!(
            err,
            MtiError::UnsupportedVersion {
                expected_digits: 3,
                actual_digits: 4,
            }
        );

        let err = Mti::parse("200", Version::V1987).unwrap_err();
        assert_eq!(
            err,
            MtiError::UnsupportedVersion {
                expected_digits: 4,
                actual_digits: 3,
            }
        );
    }

    #[test]
    fn test_version_digit_mismatch() {
        let err = Mti::parse("1200", Version::V1987).unwrap_err();
        assert_eq!(
            err,
            MtiError::VersionDigitMismatch {
                expected: '0',
                actual: '1',
            }
        );
    }

    #[test]
    fn test_reserved_digits_rejected() {
        assert!(matches!(
            Mti::parse("0900", Version::V1987).unwrap_err(),
            MtiError::InvalidDigit { part: "class", .. }
        ));
        assert!(matches!(
            Mti::parse("0280", Version::V1987).unwrap_err(),
            MtiError::InvalidDigit {
                part: "function",
                ..
            }
        ));
        assert!(matches!(
            Mti::parse("0206", Version::V1987).unwrap_err(),
            MtiError::InvalidDigit { part: "origin", .. }
        ));
    }

    #[test]
    fn test_expected_response_pairs() {
        let pairs = [
            ("0200", "0210"),
            ("0220", "0230"),
            ("0400", "0410"),
            ("0420", "0430"),
            ("0800", "0810"),
            ("0240", "0250"),
            ("0260", "0270"),
        ];
        for (request, response) in pairs {
            let mti = Mti::parse(request, Version::V1987).unwrap();
            assert_eq!(
                mti.expected_response().unwrap().encode().as_str(),
                response,
                "response of {request}"
            );
        }
    }

    #[test]
    fn test_responses_have_no_successor() {
        let mti = Mti::parse("0210", Version::V1987).unwrap();
        assert!(mti.is_response());
        assert!(mti.expected_response().is_none());
    }
}
