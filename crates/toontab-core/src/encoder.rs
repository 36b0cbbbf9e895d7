//! TOON encoder: converts a JSON array of objects into tabular TOON text.
//!
//! The output is a single header line naming the record fields once, followed
//! by one two-space-indented data line per record:
//!
//! ```text
//! data[2]{id,name,role}:
//!   1,Alice,admin
//!   2,Bob,user
//! ```
//!
//! - **Field union**: the header lists every field seen across the collection,
//!   in first-seen order; a record missing a field serializes `null` in that
//!   column, so every row has the same arity as the header.
//! - **Escaping**: backslash, comma, newline, and carriage return are escaped
//!   inside string values; everything else passes through untouched.
//! - **Compound values**: nested objects and arrays embed as compact JSON with
//!   their commas escaped, keeping the row separator unambiguous.
//!
//! # Example
//! ```
//! use serde_json::json;
//! use toontab_core::encode;
//!
//! let records = json!([{"id": 1, "name": "Alice"}]);
//! assert_eq!(encode(&records).unwrap(), "data[1]{id,name}:\n  1,Alice");
//! ```

use crate::error::EncodeError;
use indexmap::IndexSet;
use serde_json::{Map, Value};

/// Fixed collection name emitted in every header.
const COLLECTION_NAME: &str = "data";

/// Encode a JSON array of objects into TOON text.
///
/// The input must be an array whose elements are all objects (not null, not
/// nested arrays, not scalars). An empty array, or an array whose records
/// carry no fields at all, encodes to the empty string with no header.
///
/// The result never ends in a newline: rows are newline-separated, not
/// newline-terminated.
pub fn encode(value: &Value) -> Result<String, EncodeError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(EncodeError::NotAnArray {
                found: json_type_name(other),
            })
        }
    };
    if items.is_empty() {
        return Ok(String::new());
    }

    let mut records: Vec<&Map<String, Value>> = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(map) => records.push(map),
            None => {
                return Err(EncodeError::ElementNotObject {
                    index,
                    found: json_type_name(item),
                })
            }
        }
    }

    let fields = field_union(&records);
    if fields.is_empty() {
        return Ok(String::new());
    }

    let mut out = String::new();
    encode_header(items.len(), &fields, &mut out);
    for record in &records {
        out.push_str("\n  ");
        encode_row(record, &fields, &mut out);
    }
    Ok(out)
}

/// Collect the union of field names across all records, in first-seen order.
///
/// Relies on an insertion-ordered set; an unordered set would make the
/// column order nondeterministic across otherwise-identical inputs.
fn field_union<'a>(records: &[&'a Map<String, Value>]) -> IndexSet<&'a str> {
    let mut fields = IndexSet::new();
    for record in records {
        for key in record.keys() {
            fields.insert(key.as_str());
        }
    }
    fields
}

/// Emit the header line: `data[<count>]{<field1>,<field2>,...}:`
fn encode_header(count: usize, fields: &IndexSet<&str>, out: &mut String) {
    out.push_str(COLLECTION_NAME);
    out.push('[');
    out.push_str(&count.to_string());
    out.push_str("]{");
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(field);
    }
    out.push_str("}:");
}

/// Emit one data row: the record's value for every union field, in header
/// order, comma-joined. Absent fields serialize exactly like explicit nulls.
fn encode_row(record: &Map<String, Value>, fields: &IndexSet<&str>, out: &mut String) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        match record.get(*field) {
            Some(value) => encode_value(value, out),
            None => out.push_str("null"),
        }
    }
}

/// Serialize a single field value into its row cell.
fn encode_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(n)),
        Value::String(s) => escape_text(s, out),
        Value::Object(_) | Value::Array(_) => encode_compound(value, out),
    }
}

/// Format a JSON number as its shortest round-tripping decimal text.
///
/// Integers print directly. Float display already collapses whole values to
/// integer form (`1.0` prints as `1`); negative zero additionally normalizes
/// to `0`.
fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) => f.to_string(),
        None => "null".to_string(),
    }
}

/// Escape a string value for row embedding. Exactly four characters are
/// rewritten: backslash, comma, newline, carriage return. Any other
/// character, raw control characters and tabs included, passes through
/// unchanged.
fn escape_text(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
}

/// Embed a nested object or array as compact JSON with every literal comma
/// escaped to `\,`. The JSON text is not otherwise altered.
fn encode_compound(value: &Value, out: &mut String) {
    let json = value.to_string();
    for ch in json.chars() {
        if ch == ',' {
            out.push_str("\\,");
        } else {
            out.push(ch);
        }
    }
}

/// Human-readable JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
