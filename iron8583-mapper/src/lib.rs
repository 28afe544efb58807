/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/2/26
******************************************************************************/

//! # Iron8583 Mapper
//!
//! Declarative translation between caller-defined record types and ISO 8583
//! field maps.
//!
//! Bindings are explicit, static metadata registered once at startup: a bit
//! number plus a getter and setter function for that field. No runtime
//! reflection or type scanning is involved; what is mapped is exactly what
//! was registered, visible at the registration site.
//!
//! ```
//! use iron8583_core::types::FieldValue;
//! use iron8583_mapper::MessageMapping;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Authorization {
//!     pan: String,
//!     amount: String,
//! }
//!
//! let mapping = MessageMapping::<Authorization>::new()
//!     .required(2, |a| Some(FieldValue::from(a.pan.as_str())), |a, v| {
//!         a.pan = v.as_text().ok_or("text")?.to_string();
//!         Ok(())
//!     })
//!     .required(4, |a| Some(FieldValue::from(a.amount.as_str())), |a, v| {
//!         a.amount = v.as_text().ok_or("text")?.to_string();
//!         Ok(())
//!     });
//!
//! let auth = Authorization {
//!     pan: "4111111111111111".to_string(),
//!     amount: "000000001000".to_string(),
//! };
//! let fields = mapping.to_fields(&auth).unwrap();
//! assert_eq!(mapping.to_record(&fields).unwrap(), auth);
//! ```

pub mod mapping;

pub use mapping::{FieldBinding, MessageMapping};
