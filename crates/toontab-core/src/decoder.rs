//! TOON decoder: parses tabular TOON text back into JSON records.
//!
//! A document is one header line followed by indented data lines:
//!
//! ```text
//! data[2]{id,name,price,inStock}:
//!   1,Product A,29.99,true
//!   2,Product B,49.99,false
//! ```
//!
//! Parsing is deliberately lenient everywhere except the header:
//!
//! - The header must match `name[count]{field1,field2,...}:` over the whole
//!   line; any deviation is fatal.
//! - Rows are tokenized with a two-state escape scanner; an unknown escape
//!   passes its character through unchanged.
//! - A short row fills missing columns with empty strings; a long row drops
//!   the surplus tokens.
//! - The declared count is advisory: a mismatch is reported alongside the
//!   records, never as an error.
//!
//! Token types are inferred in a fixed order: `null`, booleans, numbers,
//! embedded JSON compounds (`{...}` / `[...]`), and finally plain strings.

use crate::error::DecodeError;
use serde_json::{Map, Value};
use std::fmt;

/// One decoded record: field name to value, in header-field order.
pub type Record = Map<String, Value>;

/// Successful decode output: the parsed records plus an optional advisory
/// raised when the header's declared count disagrees with the rows found.
#[derive(Debug, Clone)]
pub struct Decoded {
    /// Records in data-line order.
    pub records: Vec<Record>,
    /// Present when the declared count and the parsed record count differ.
    pub count_mismatch: Option<CountMismatch>,
}

impl Decoded {
    /// Reassemble the records into a JSON array value.
    pub fn into_value(self) -> Value {
        Value::Array(self.records.into_iter().map(Value::Object).collect())
    }
}

/// Advisory diagnostic: the header declared one record count, the data lines
/// produced another. Decoding still returns every record found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountMismatch {
    /// Count declared in the header brackets.
    pub declared: usize,
    /// Records actually parsed from data lines.
    pub parsed: usize,
}

impl fmt::Display for CountMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "header declares {} record(s) but {} data line(s) were parsed",
            self.declared, self.parsed
        )
    }
}

/// Decode TOON text into records.
///
/// Fails only on a structurally unusable document: fewer than two lines
/// after trimming surrounding blank space, or a header line that does not
/// match the grammar. Everything below the header degrades gracefully (see
/// module docs).
pub fn decode(text: &str) -> Result<Decoded, DecodeError> {
    let document = text.trim();
    let lines: Vec<&str> = document.split('\n').collect();
    if lines.len() < 2 {
        return Err(DecodeError::TooFewLines {
            lines: if document.is_empty() { 0 } else { lines.len() },
        });
    }

    let header = parse_header(lines[0])?;

    let mut records = Vec::new();
    for line in &lines[1..] {
        let row = line.trim();
        if row.is_empty() {
            continue;
        }
        records.push(parse_row(row, &header.fields));
    }

    let count_mismatch = if records.len() == header.count {
        None
    } else {
        Some(CountMismatch {
            declared: header.count,
            parsed: records.len(),
        })
    };

    Ok(Decoded {
        records,
        count_mismatch,
    })
}

/// Parsed header metadata: the declared record count and the ordered field
/// names. The collection name is validated but not kept; nothing downstream
/// uses it.
struct Header {
    count: usize,
    fields: Vec<String>,
}

/// Parse the header line against `name[count]{field1,field2,...}:`, anchored
/// at both ends.
///
/// The name is one or more ASCII word characters, the count one or more
/// ASCII digits. Field names are trimmed but otherwise taken verbatim,
/// duplicates included; whatever the header claims is what rows are zipped
/// against.
fn parse_header(line: &str) -> Result<Header, DecodeError> {
    let malformed = || DecodeError::MalformedHeader {
        line: line.to_string(),
    };

    let open_bracket = line.find('[').ok_or_else(malformed)?;
    let name = &line[..open_bracket];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(malformed());
    }

    let rest = &line[open_bracket + 1..];
    let close_bracket = rest.find(']').ok_or_else(malformed)?;
    let count_text = &rest[..close_bracket];
    if count_text.is_empty() || !count_text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let count = count_text.parse::<usize>().map_err(|_| malformed())?;

    let body = rest[close_bracket + 1..]
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix("}:"))
        .ok_or_else(malformed)?;
    if body.is_empty() {
        return Err(malformed());
    }

    let fields = body.split(',').map(|name| name.trim().to_string()).collect();
    Ok(Header { count, fields })
}

/// Parse one data row into a record by zipping tokens against the header
/// fields. Missing tokens become empty strings, never null; surplus tokens
/// are dropped. A field name duplicated in the header keeps the last value
/// assigned to it.
fn parse_row(row: &str, fields: &[String]) -> Record {
    let tokens = split_row(row);
    let mut record = Record::new();
    for (index, field) in fields.iter().enumerate() {
        let value = match tokens.get(index) {
            Some(token) => infer_value(token),
            None => Value::String(String::new()),
        };
        record.insert(field.clone(), value);
    }
    record
}

/// Scanner state for row tokenization.
#[derive(Clone, Copy)]
enum Scan {
    Normal,
    Escaped,
}

/// Split a row into tokens on unescaped commas, resolving escapes as it goes.
///
/// `\\`, `\,`, `\n`, and `\r` produce backslash, comma, newline, and carriage
/// return; any other escaped character passes through unchanged. The trailing
/// in-progress token always counts, so a row with N unescaped commas yields
/// exactly N+1 tokens. A lone backslash at end of row emits nothing.
fn split_row(row: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut state = Scan::Normal;

    for ch in row.chars() {
        match state {
            Scan::Normal => match ch {
                '\\' => state = Scan::Escaped,
                ',' => tokens.push(std::mem::take(&mut current)),
                other => current.push(other),
            },
            Scan::Escaped => {
                match ch {
                    '\\' => current.push('\\'),
                    ',' => current.push(','),
                    'n' => current.push('\n'),
                    'r' => current.push('\r'),
                    other => current.push(other),
                }
                state = Scan::Normal;
            }
        }
    }
    tokens.push(current);
    tokens
}

/// Infer the JSON value of a single token.
///
/// The priority order is fixed: literal `null`, booleans, numbers (the empty
/// token is never numeric), embedded compounds for tokens starting with `{`
/// or `[`, then plain string. A failed compound parse falls back to the raw
/// string; the inner error is swallowed.
fn infer_value(token: &str) -> Value {
    match token {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if !token.is_empty() {
        if let Ok(int) = token.parse::<i64>() {
            return Value::Number(int.into());
        }
        if let Ok(float) = token.parse::<f64>() {
            // Float parsing accepts "inf" and "nan"; from_f64 rejects them,
            // so those tokens stay strings.
            if let Some(number) = serde_json::Number::from_f64(float) {
                return Value::Number(number);
            }
        }
    }

    if token.starts_with('{') || token.starts_with('[') {
        if let Ok(value) = serde_json::from_str(token) {
            return value;
        }
    }

    Value::String(token.to_string())
}
