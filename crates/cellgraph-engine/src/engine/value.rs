//! Evaluation results and spreadsheet error values.

use std::fmt;
use thiserror::Error;

use super::format::format_number;

/// Spreadsheet error produced while evaluating a formula.
///
/// Errors compare by kind only; they carry no payload.
#[derive(Clone, Copy, Debug, Error, Hash, Eq, PartialEq)]
pub enum CellError {
    /// Reference to a position outside the grid.
    #[error("#REF!")]
    Ref,
    /// Operand cannot be interpreted as a number.
    #[error("#VALUE!")]
    Value,
    /// Division by zero or a non-finite arithmetic result.
    #[error("#DIV/0!")]
    Div0,
}

impl CellError {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Ref => "#REF!",
            CellError::Value => "#VALUE!",
            CellError::Div0 => "#DIV/0!",
        }
    }
}

/// The value a cell presents to readers.
#[derive(Clone, Debug)]
pub enum Value {
    Number(f64),
    Text(String),
    Error(CellError),
}

impl Value {
    /// The value of an empty cell.
    pub fn empty() -> Value {
        Value::Text(String::new())
    }

    /// Interpret the value as a formula operand.
    ///
    /// Text must hold a number in its entirety (surrounding whitespace is
    /// ignored); empty text counts as zero. Error values propagate as-is.
    pub fn to_number(&self) -> Result<f64, CellError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(0.0);
                }
                match text.parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(n),
                    _ => Err(CellError::Value),
                }
            }
            Value::Error(err) => Err(*err),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<CellError> for Value {
    fn from(err: CellError) -> Self {
        Value::Error(err)
    }
}

impl From<Result<f64, CellError>> for Value {
    fn from(result: Result<f64, CellError>) -> Self {
        match result {
            Ok(n) => Value::Number(n),
            Err(err) => Value::Error(err),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Error(err) => f.write_str(err.as_str()),
        }
    }
}
