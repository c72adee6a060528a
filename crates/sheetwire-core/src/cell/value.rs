//! Cell value types

use std::fmt;

use serde_json::Value;

use crate::api::{ErrorValue, ExtendedValue};
use crate::error::{Error, Result};

/// The effective value of a cell as last confirmed by the service
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell (no value)
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value (all numbers are f64, including dates)
    Number(f64),

    /// String value
    String(String),

    /// Formula evaluation error
    Error(FormulaError),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell holds a formula error
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Boolean(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::String(_) => "string",
            CellValue::Error(_) => "error",
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl From<&ExtendedValue> for CellValue {
    fn from(value: &ExtendedValue) -> Self {
        match value {
            ExtendedValue::NumberValue(n) => CellValue::Number(*n),
            ExtendedValue::StringValue(s) => CellValue::String(s.clone()),
            ExtendedValue::BoolValue(b) => CellValue::Boolean(*b),
            // effective values never carry formulas; keep the text if one shows up
            ExtendedValue::FormulaValue(f) => CellValue::String(f.clone()),
            ExtendedValue::ErrorValue(e) => CellValue::Error(FormulaError::from(e)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

/// A formula evaluation error reported for a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaError {
    /// Error class, e.g. `DIVIDE_BY_ZERO`
    pub error_type: String,
    /// Message from the service
    pub message: String,
}

impl From<&ErrorValue> for FormulaError {
    fn from(e: &ErrorValue) -> Self {
        Self {
            error_type: e.error_type.clone(),
            message: e.message.clone(),
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {}", self.error_type, self.message)
    }
}

impl std::error::Error for FormulaError {}

/// Kind of a pending local edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    String,
    Number,
    Formula,
}

impl ValueKind {
    /// Name of the `userEnteredValue` key this kind is written under
    pub fn api_key(&self) -> &'static str {
        match self {
            ValueKind::Boolean => "boolValue",
            ValueKind::String => "stringValue",
            ValueKind::Number => "numberValue",
            ValueKind::Formula => "formulaValue",
        }
    }
}

/// An unsaved local edit of a cell
#[derive(Debug, Clone, PartialEq)]
pub enum PendingValue {
    Boolean(bool),
    String(String),
    Number(f64),
    Formula(String),
}

impl PendingValue {
    /// Kind of this edit
    pub fn kind(&self) -> ValueKind {
        match self {
            PendingValue::Boolean(_) => ValueKind::Boolean,
            PendingValue::String(_) => ValueKind::String,
            PendingValue::Number(_) => ValueKind::Number,
            PendingValue::Formula(_) => ValueKind::Formula,
        }
    }

    /// The value as it is written in an update request
    pub fn to_extended(&self) -> ExtendedValue {
        match self {
            PendingValue::Boolean(b) => ExtendedValue::BoolValue(*b),
            PendingValue::String(s) => ExtendedValue::StringValue(s.clone()),
            PendingValue::Number(n) => ExtendedValue::NumberValue(*n),
            PendingValue::Formula(f) => ExtendedValue::FormulaValue(f.clone()),
        }
    }

    /// Whether this edit clears the cell
    pub fn is_clear(&self) -> bool {
        matches!(self, PendingValue::String(s) if s.is_empty())
    }
}

/// Input accepted by [`CellRecord::set_value`](super::CellRecord::set_value)
///
/// Conversions never fail; validation (e.g. rejecting NaN) happens on assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum CellInput {
    /// Clears the cell
    Empty,
    Boolean(bool),
    Number(f64),
    /// Text; a leading `=` makes it a formula
    Text(String),
}

impl CellInput {
    /// Classify the input into a pending edit
    pub fn into_pending(self) -> Result<PendingValue> {
        match self {
            CellInput::Empty => Ok(PendingValue::String(String::new())),
            CellInput::Boolean(b) => Ok(PendingValue::Boolean(b)),
            CellInput::Number(n) if n.is_finite() => Ok(PendingValue::Number(n)),
            CellInput::Number(n) => Err(Error::InvalidValueType(format!(
                "{} is not a finite number",
                n
            ))),
            CellInput::Text(s) if s.starts_with('=') => Ok(PendingValue::Formula(s)),
            CellInput::Text(s) => Ok(PendingValue::String(s)),
        }
    }
}

impl From<bool> for CellInput {
    fn from(b: bool) -> Self {
        CellInput::Boolean(b)
    }
}

impl From<i32> for CellInput {
    fn from(n: i32) -> Self {
        CellInput::Number(n as f64)
    }
}

impl From<i64> for CellInput {
    fn from(n: i64) -> Self {
        CellInput::Number(n as f64)
    }
}

impl From<f64> for CellInput {
    fn from(n: f64) -> Self {
        CellInput::Number(n)
    }
}

impl From<&str> for CellInput {
    fn from(s: &str) -> Self {
        CellInput::Text(s.to_string())
    }
}

impl From<String> for CellInput {
    fn from(s: String) -> Self {
        CellInput::Text(s)
    }
}

impl From<()> for CellInput {
    fn from(_: ()) -> Self {
        CellInput::Empty
    }
}

impl<T: Into<CellInput>> From<Option<T>> for CellInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellInput::Empty, Into::into)
    }
}

impl TryFrom<Value> for CellInput {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(CellInput::Empty),
            Value::Bool(b) => Ok(CellInput::Boolean(b)),
            Value::Number(n) => n
                .as_f64()
                .map(CellInput::Number)
                .ok_or_else(|| Error::InvalidValueType(format!("unrepresentable number {}", n))),
            Value::String(s) => Ok(CellInput::Text(s)),
            Value::Array(_) => Err(Error::InvalidValueType(
                "set value to boolean, string, or number, not an array".into(),
            )),
            Value::Object(_) => Err(Error::InvalidValueType(
                "set value to boolean, string, or number, not an object".into(),
            )),
        }
    }
}
