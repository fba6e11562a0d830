use crate::arena::{ArrayRef, ObjectRef, StrRef};

/// A single JSON node.
///
/// Scalars are stored inline, so constructing a null, bool, int or float
/// never touches the arena. Strings, arrays and objects hold index handles
/// into the [`Arena`](crate::Arena) that built them; copying a `Value` is a
/// shallow, constant-time operation and never copies the referenced data,
/// which stays owned by the arena. A value must not be used with an arena
/// other than the one it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(StrRef),
    Array(ArrayRef),
    Object(ObjectRef),
}

impl Value {
    /// The canonical empty array: no backing allocation, length 0. The
    /// first push allocates storage and rebinds the handle.
    pub const fn new_array() -> Value {
        Value::Array(ArrayRef::EMPTY)
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub const fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value as an `f64`; integers convert.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Handle to the backing string; resolve it through the owning arena.
    pub fn as_str_ref(&self) -> Option<StrRef> {
        match self {
            Value::String(s) => Some(*s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Value {
        Value::Float(f)
    }
}
