//! Dynamically-typed values and their coercion rules.
//!
//! Payloads are 32-bit to match what the external evaluator stores per
//! node. Coercions are explicit: nothing converts implicitly except the
//! accessors below, and a Boolean never yields a numeric or string view.

use crate::error::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The four value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Integer,
    Float,
    String,
}

impl DataType {
    /// Every data type, in declaration order.
    pub const ALL: [DataType; 4] = [
        DataType::Boolean,
        DataType::Integer,
        DataType::Float,
        DataType::String,
    ];

    /// One-letter tag used by the wire format (`CB{..}`, `CI{..}`, ...).
    pub fn tag(self) -> char {
        match self {
            Self::Boolean => 'B',
            Self::Integer => 'I',
            Self::Float => 'F',
            Self::String => 'S',
        }
    }

    /// Inverse of [`DataType::tag`].
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'B' => Some(Self::Boolean),
            'I' => Some(Self::Integer),
            'F' => Some(Self::Float),
            'S' => Some(Self::String),
            _ => None,
        }
    }

    /// Integer or Float: the types that compare with each other.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "Boolean"),
            Self::Integer => write!(f, "Integer"),
            Self::Float => write!(f, "Float"),
            Self::String => write!(f, "String"),
        }
    }
}

/// A tagged value carrying exactly one payload.
///
/// Values are immutable once built; `clone` is a deep copy, so a value
/// read out of a symbol table never aliases the table's entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Boolean(bool),
    Integer(i32),
    Float(f32),
    String(String),
}

impl Value {
    /// The type of the active payload.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Boolean(_) => DataType::Boolean,
            Self::Integer(_) => DataType::Integer,
            Self::Float(_) => DataType::Float,
            Self::String(_) => DataType::String,
        }
    }

    /// Integer view. Floats truncate toward zero (saturating at the `i32`
    /// bounds), strings are parsed.
    pub fn as_int(&self) -> EvalResult<i32> {
        match self {
            Self::Integer(i) => Ok(*i),
            Self::Float(x) => Ok(*x as i32),
            Self::String(s) => s.parse::<i32>().map_err(|_| EvalError::Parse {
                text: s.clone(),
                target: DataType::Integer,
            }),
            Self::Boolean(_) => Err(no_view(DataType::Integer)),
        }
    }

    /// Float view. Integers widen, strings are parsed.
    pub fn as_float(&self) -> EvalResult<f32> {
        match self {
            Self::Integer(i) => Ok(*i as f32),
            Self::Float(x) => Ok(*x),
            Self::String(s) => s.parse::<f32>().map_err(|_| EvalError::Parse {
                text: s.clone(),
                target: DataType::Float,
            }),
            Self::Boolean(_) => Err(no_view(DataType::Float)),
        }
    }

    /// String view of a numeric or string value.
    pub fn as_string(&self) -> EvalResult<String> {
        match self {
            Self::Boolean(_) => Err(no_view(DataType::String)),
            other => Ok(other.canonical_text()),
        }
    }

    /// Boolean view. Numbers are true when nonzero; strings must read
    /// `true` or `false`, ignoring ASCII case.
    pub fn as_bool(&self) -> EvalResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            Self::Integer(i) => Ok(*i != 0),
            Self::Float(x) => Ok(*x != 0.0),
            Self::String(s) => {
                if s.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(EvalError::Parse {
                        text: s.clone(),
                        target: DataType::Boolean,
                    })
                }
            }
        }
    }

    /// Same-type equality. Values of different types are never equal.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }

    /// Same-type ordering; `true > false`, floats use IEEE total order.
    pub fn compare(&self, other: &Value) -> EvalResult<Ordering> {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => Ok(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Ok(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => Ok(a.total_cmp(b)),
            (Self::String(a), Self::String(b)) => Ok(a.cmp(b)),
            _ => Err(EvalError::TypeMismatch(format!(
                "cannot order {} against {}",
                self.data_type(),
                other.data_type()
            ))),
        }
    }

    /// Convert to another type through the matching accessor. The target
    /// set is closed, so only the accessor's own coercion errors surface.
    pub fn convert_to(&self, target: DataType) -> EvalResult<Value> {
        match target {
            DataType::Boolean => self.as_bool().map(Value::Boolean),
            DataType::Integer => self.as_int().map(Value::Integer),
            DataType::Float => self.as_float().map(Value::Float),
            DataType::String => self.as_string().map(Value::String),
        }
    }

    /// Payload text as carried on the wire: `T`/`F`, decimal numbers (floats
    /// always with a `.` when finite), raw string contents.
    pub fn canonical_text(&self) -> String {
        match self {
            Self::Boolean(true) => "T".to_string(),
            Self::Boolean(false) => "F".to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(x) => {
                let text = x.to_string();
                if x.is_finite() && !text.contains('.') {
                    format!("{text}.0")
                } else {
                    text
                }
            }
            Self::String(s) => s.clone(),
        }
    }
}

fn no_view(target: DataType) -> EvalError {
    EvalError::TypeMismatch(format!("Boolean has no {target} view"))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s:?}"),
            other => write!(f, "{}", other.canonical_text()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Self::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}
