//! # Record Codec
//!
//! Converts one entity to and from one line of comma-delimited text. All
//! knowledge of the column layout, timestamp format, and delimiter escaping
//! lives here; the store treats lines as opaque.
//!
//! The two tables deliberately do not share a splitting strategy. The
//! movements reader understands quoted fields (a quoted reason may contain
//! commas) and the movements writer quotes such reasons. Quote characters
//! are splitting syntax and cannot be escaped: a paired quote inside a
//! reason is dropped on decode, an unpaired one swallows the rest of the
//! line and corrupts the row. The products table is plain-split and never
//! quoted, byte-compatible with historical files; a comma inside a product
//! name corrupts that row on the next load, and the loader skips it.

use crate::model::{Category, Entity, MovementType, Product, StockMovement};
use chrono::NaiveDateTime;
use std::str::FromStr;
use thiserror::Error;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("expected at least {expected} fields, got {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("bad {field} value: `{value}`")]
    Field { field: &'static str, value: String },
}

/// One storable entity kind: a header line plus an encoding of each record
/// as a single delimited line.
pub trait Record: Entity + Sized {
    /// Header line written as the first line of the backing file.
    const HEADER: &'static str;

    fn encode(&self) -> String;

    fn decode(line: &str) -> Result<Self, DecodeError>;
}

impl Record for Product {
    const HEADER: &'static str = "Id,Name,Price,Category,Quantity,IsActive,CreatedAt";

    fn encode(&self) -> String {
        // Unquoted on purpose; see module docs.
        format!(
            "{},{},{},{},{},{},{}",
            self.id(),
            self.name(),
            self.price(),
            self.category().code(),
            self.quantity(),
            encode_bool(self.is_active()),
            self.created_at().format(TIMESTAMP_FORMAT),
        )
    }

    fn decode(line: &str) -> Result<Self, DecodeError> {
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < 7 {
            return Err(DecodeError::FieldCount {
                expected: 7,
                found: parts.len(),
            });
        }
        Ok(Product::from_parts(
            parse_field(parts[0], "Id")?,
            parts[1].to_string(),
            parse_field(parts[2], "Price")?,
            parse_category(parts[3])?,
            parse_field(parts[4], "Quantity")?,
            parse_bool(parts[5], "IsActive")?,
            parse_timestamp(parts[6], "CreatedAt")?,
        ))
    }
}

impl Record for StockMovement {
    const HEADER: &'static str =
        "Id,ProductId,QuantityChange,MovementType,Reason,Date,IsActive,CreatedAt";

    fn encode(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{}",
            self.id(),
            self.product_id(),
            self.quantity_change(),
            self.movement_type().code(),
            quote_if_needed(self.reason()),
            self.date().format(TIMESTAMP_FORMAT),
            encode_bool(self.is_active()),
            self.created_at().format(TIMESTAMP_FORMAT),
        )
    }

    fn decode(line: &str) -> Result<Self, DecodeError> {
        let parts = split_quoted(line);
        if parts.len() < 8 {
            return Err(DecodeError::FieldCount {
                expected: 8,
                found: parts.len(),
            });
        }
        Ok(StockMovement::from_parts(
            parse_field(&parts[0], "Id")?,
            parse_field(&parts[1], "ProductId")?,
            parse_field(&parts[2], "QuantityChange")?,
            parse_movement_type(&parts[3])?,
            parts[4].clone(),
            parse_timestamp(&parts[5], "Date")?,
            parse_bool(&parts[6], "IsActive")?,
            parse_timestamp(&parts[7], "CreatedAt")?,
        ))
    }
}

/// Splits a line on commas, honoring double quotes: a quote toggles an
/// "inside quotes" mode in which commas are literal. Quote characters
/// themselves are consumed, not kept.
pub fn split_quoted(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn quote_if_needed(field: &str) -> String {
    if field.contains(',') {
        format!("\"{field}\"")
    } else {
        field.to_string()
    }
}

fn encode_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn parse_field<T: FromStr>(raw: &str, field: &'static str) -> Result<T, DecodeError> {
    raw.trim().parse().map_err(|_| DecodeError::Field {
        field,
        value: raw.to_string(),
    })
}

fn parse_bool(raw: &str, field: &'static str) -> Result<bool, DecodeError> {
    match raw.trim() {
        s if s.eq_ignore_ascii_case("true") => Ok(true),
        s if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(DecodeError::Field {
            field,
            value: raw.to_string(),
        }),
    }
}

fn parse_timestamp(raw: &str, field: &'static str) -> Result<NaiveDateTime, DecodeError> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|_| DecodeError::Field {
        field,
        value: raw.to_string(),
    })
}

fn parse_category(raw: &str) -> Result<Category, DecodeError> {
    let code: u8 = parse_field(raw, "Category")?;
    Category::from_code(code).ok_or_else(|| DecodeError::Field {
        field: "Category",
        value: raw.to_string(),
    })
}

fn parse_movement_type(raw: &str) -> Result<MovementType, DecodeError> {
    let code: u8 = parse_field(raw, "MovementType")?;
    MovementType::from_code(code).ok_or_else(|| DecodeError::Field {
        field: "MovementType",
        value: raw.to_string(),
    })
}
