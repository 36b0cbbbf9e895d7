//! # toontab-core
//!
//! Encoder and decoder for **TOON**, a compact tabular text notation for JSON
//! arrays of objects. Field names are declared once in a header line; each
//! record then costs one comma-joined row:
//!
//! ```text
//! data[2]{id,name,role}:
//!   1,Alice,admin
//!   2,Bob,user
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use serde_json::json;
//! use toontab_core::{decode, encode};
//!
//! let records = json!([
//!     {"id": 1, "name": "Alice", "role": "admin"},
//!     {"id": 2, "name": "Bob", "role": "user"}
//! ]);
//!
//! let toon = encode(&records).unwrap();
//! assert_eq!(toon, "data[2]{id,name,role}:\n  1,Alice,admin\n  2,Bob,user");
//!
//! let decoded = decode(&toon).unwrap();
//! assert_eq!(decoded.records.len(), 2);
//! assert!(decoded.count_mismatch.is_none());
//! ```
//!
//! ## Modules
//!
//! - [`encoder`] — JSON array of objects → TOON text
//! - [`decoder`] — TOON text → records plus an optional count advisory
//! - [`convert`] — request/response boundary for host applications
//! - [`error`] — typed encode/decode failures

pub mod convert;
pub mod decoder;
pub mod encoder;
pub mod error;

pub use convert::{convert, ConvertMode, ConvertRequest, ConvertResponse};
pub use decoder::{decode, CountMismatch, Decoded, Record};
pub use encoder::encode;
pub use error::{DecodeError, EncodeError};
