/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! Static field bindings between record types and field maps.

use iron8583_core::error::MappingError;
use iron8583_core::types::FieldValue;
use std::collections::BTreeMap;
use std::fmt;

/// Reads one field out of a record; `None` means absent.
pub type Getter<T> = fn(&T) -> Option<FieldValue>;

/// Writes one field into a record; `Err` names the expected value kind.
pub type Setter<T> = fn(&mut T, &FieldValue) -> Result<(), &'static str>;

/// One registered bit-number to accessor binding.
pub struct FieldBinding<T> {
    bit: u8,
    required: bool,
    get: Getter<T>,
    set: Setter<T>,
}

impl<T> FieldBinding<T> {
    /// Returns the bound bit number.
    #[inline]
    #[must_use]
    pub const fn bit(&self) -> u8 {
        self.bit
    }

    /// Returns true if the binding must be present on both sides.
    #[inline]
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}

impl<T> fmt::Debug for FieldBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("bit", &self.bit)
            .field("required", &self.required)
            .finish()
    }
}

/// Registered bindings for one record type.
///
/// Built once at startup and shared read-only, like the registry it
/// complements.
pub struct MessageMapping<T> {
    bindings: Vec<FieldBinding<T>>,
}

impl<T> MessageMapping<T> {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Registers a binding that must be present on both sides.
    #[must_use]
    pub fn required(self, bit: u8, get: Getter<T>, set: Setter<T>) -> Self {
        self.bind(bit, true, get, set)
    }

    /// Registers a binding that may be absent.
    #[must_use]
    pub fn optional(self, bit: u8, get: Getter<T>, set: Setter<T>) -> Self {
        self.bind(bit, false, get, set)
    }

    fn bind(mut self, bit: u8, required: bool, get: Getter<T>, set: Setter<T>) -> Self {
        self.bindings.push(FieldBinding {
            bit,
            required,
            get,
            set,
        });
        self
    }

    /// Returns the registered bindings.
    #[must_use]
    pub fn bindings(&self) -> &[FieldBinding<T>] {
        &self.bindings
    }

    /// Projects a record into a field map.
    ///
    /// # Errors
    /// Returns [`MappingError::MissingField`] naming the bit when a
    /// required getter yields nothing.
    pub fn to_fields(&self, record: &T) -> Result<BTreeMap<u8, FieldValue>, MappingError> {
        let mut fields = BTreeMap::new();
        for binding in &self.bindings {
            match (binding.get)(record) {
                Some(value) => {
                    fields.insert(binding.bit, value);
                }
                None if binding.required => {
                    return Err(MappingError::MissingField { bit: binding.bit });
                }
                None => {}
            }
        }
        Ok(fields)
    }

    /// Builds a record from a field map.
    ///
    /// # Errors
    /// Returns [`MappingError::MissingField`] when a required bit is absent
    /// and [`MappingError::WrongKind`] when a value's variant is not what
    /// the setter accepts.
    pub fn to_record(&self, fields: &BTreeMap<u8, FieldValue>) -> Result<T, MappingError>
    where
        T: Default,
    {
        let mut record = T::default();
        for binding in &self.bindings {
            match fields.get(&binding.bit) {
                Some(value) => {
                    (binding.set)(&mut record, value).map_err(|expected| {
                        MappingError::WrongKind {
                            bit: binding.bit,
                            expected,
                        }
                    })?;
                }
                None if binding.required => {
                    return Err(MappingError::MissingField { bit: binding.bit });
                }
                None => {}
            }
        }
        Ok(record)
    }
}

impl<T> Default for MessageMapping<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MessageMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageMapping")
            .field("bindings", &self.bindings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Authorization {
        pan: String,
        amount: String,
        terminal_id: Option<String>,
    }

    fn mapping() -> MessageMapping<Authorization> {
        MessageMapping::new()
            .required(
                2,
                |a: &Authorization| Some(FieldValue::from(a.pan.as_str())),
                |a, v| {
                    a.pan = v.as_text().ok_or("text")?.to_string();
                    Ok(())
                },
            )
            .required(
                4,
                |a: &Authorization| Some(FieldValue::from(a.amount.as_str())),
                |a, v| {
                    a.amount = v.as_text().ok_or("text")?.to_string();
                    Ok(())
                },
            )
            .optional(
                41,
                |a: &Authorization| a.terminal_id.as_deref().map(FieldValue::from),
                |a, v| {
                    a.terminal_id = Some(v.as_text().ok_or("text")?.to_string());
                    Ok(())
                },
            )
    }

    fn sample() -> Authorization {
        Authorization {
            pan: "4111111111111111".to_string(),
            amount: "000000001000".to_string(),
            terminal_id: Some("TERM0001".to_string()),
        }
    }

    #[test]
    fn test_to_fields() {
        let fields = mapping().to_fields(&sample()).unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[&2].as_text(), Some("4111111111111111"));
        assert_eq!(fields[&41].as_text(), Some("TERM0001"));
    }

    #[test]
    fn test_round_trip() {
        let record = sample();
        let fields = mapping().to_fields(&record).unwrap();
        assert_eq!(mapping().to_record(&fields).unwrap(), record);
    }

    #[test]
    fn test_optional_absent_is_fine() {
        let record = Authorization {
            terminal_id: None,
            ..sample()
        };
        let fields = mapping().to_fields(&record).unwrap();
        assert!(!fields.contains_key(&41));
        assert_eq!(mapping().to_record(&fields).unwrap(), record);
    }

    #[test]
    fn test_missing_required_bit() {
        let mut fields = mapping().to_fields(&sample()).unwrap();
        fields.remove(&4);
        assert_eq!(
            mapping().to_record(&fields).unwrap_err(),
            MappingError::MissingField { bit: 4 }
        );
    }

    #[test]
    fn test_wrong_kind() {
        let mut fields = mapping().to_fields(&sample()).unwrap();
        fields.insert(4, FieldValue::from(vec![0x00]));
        assert_eq!(
            mapping().to_record(&fields).unwrap_err(),
            MappingError::WrongKind {
                bit: 4,
                expected: "text",
            }
        );
    }
}
