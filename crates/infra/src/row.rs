//! Result rows as returned by the external query layer.
//!
//! A row is a mapping of field alias → value. Nulls are kept as [`Value::Null`]
//! but every accessor treats them exactly like an absent field.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use softbridge_core::{ErpError, ErpResult};

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Decimal(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Decimal(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// One result row, labelled with the table it came from for error messages.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    source: String,
    fields: BTreeMap<String, Value>,
}

impl Row {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Raw access; `Null` reads as absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    fn missing(&self, field: &str) -> ErpError {
        ErpError::missing_field(&self.source, field)
    }

    /// Text value with fixed-width padding removed. Numbers are rendered as text.
    pub fn opt_text(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::Text(s) => Some(s.trim().to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Decimal(d) => Some(d.to_string()),
            Value::Date(d) => Some(d.to_string()),
            Value::Null => None,
        }
    }

    /// Text value, empty when absent.
    pub fn text_or_empty(&self, field: &str) -> String {
        self.opt_text(field).unwrap_or_default()
    }

    pub fn text(&self, field: &str) -> ErpResult<String> {
        self.opt_text(field).ok_or_else(|| self.missing(field))
    }

    /// Integer value. Numeric text (the ERP pads keys with blanks) is accepted.
    pub fn opt_int(&self, field: &str) -> ErpResult<Option<i64>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Int(i)) => Ok(Some(*i)),
            Some(Value::Decimal(d)) if d.fract() == 0.0 => Ok(Some(*d as i64)),
            Some(Value::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::Text(s)) => s.trim().parse().map(Some).map_err(|_| ErpError::FieldType {
                field: field.to_string(),
                expected: "an integer",
            }),
            Some(_) => Err(ErpError::FieldType {
                field: field.to_string(),
                expected: "an integer",
            }),
        }
    }

    pub fn int(&self, field: &str) -> ErpResult<i64> {
        self.opt_int(field)?.ok_or_else(|| self.missing(field))
    }

    /// Integer value narrowed to `u32` (record keys, positions, numbers).
    pub fn uint(&self, field: &str) -> ErpResult<u32> {
        let v = self.int(field)?;
        u32::try_from(v).map_err(|_| ErpError::FieldType {
            field: field.to_string(),
            expected: "an unsigned 32-bit integer",
        })
    }

    pub fn opt_uint(&self, field: &str) -> ErpResult<Option<u32>> {
        match self.opt_int(field)? {
            None => Ok(None),
            Some(v) => u32::try_from(v).map(Some).map_err(|_| ErpError::FieldType {
                field: field.to_string(),
                expected: "an unsigned 32-bit integer",
            }),
        }
    }

    /// Decimal value (amounts). Integers widen.
    pub fn decimal(&self, field: &str) -> ErpResult<f64> {
        match self.get(field) {
            None => Err(self.missing(field)),
            Some(Value::Decimal(d)) => Ok(*d),
            Some(Value::Int(i)) => Ok(*i as f64),
            Some(Value::Text(s)) => s.trim().parse().map_err(|_| ErpError::FieldType {
                field: field.to_string(),
                expected: "a decimal",
            }),
            Some(_) => Err(ErpError::FieldType {
                field: field.to_string(),
                expected: "a decimal",
            }),
        }
    }

    /// Date value; absent dates (the ERP stores 0 for "no date") read as `None`.
    pub fn opt_date(&self, field: &str) -> ErpResult<Option<NaiveDate>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Date(d)) => Ok(Some(*d)),
            Some(Value::Int(0)) => Ok(None),
            Some(Value::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(_) => Err(ErpError::FieldType {
                field: field.to_string(),
                expected: "a date",
            }),
        }
    }

    /// Truthiness of a flag column: non-zero numbers and any non-blank text (`"0"` included) are set.
    pub fn flag(&self, field: &str) -> bool {
        match self.get(field) {
            None | Some(Value::Null) => false,
            Some(Value::Int(i)) => *i != 0,
            Some(Value::Decimal(d)) => *d != 0.0,
            Some(Value::Text(s)) => !s.trim().is_empty(),
            Some(Value::Date(_)) => true,
        }
    }
}
