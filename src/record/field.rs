use std::hash::{Hash, Hasher};


/// A single field value of a data point.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A signed integer field.
    Int(i64),
    /// A floating point field.
    Float(f64),
    /// A text field.
    Str(String),
    /// A boolean field.
    Bool(bool),
    /// A missing value.
    Null,
}


// Floats compare by IEEE equality, so a NaN field never equals
// itself; such a record just misses the preprocessor cache.
impl Eq for FieldValue {}


impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Int(v) => v.hash(state),
            // `f64` has no `Hash`; the bit pattern is stable enough
            // for memoization keys.
            Self::Float(v) => v.to_bits().hash(state),
            Self::Str(v) => v.hash(state),
            Self::Bool(v) => v.hash(state),
            Self::Null => {},
        }
    }
}


impl From<i64> for FieldValue {
    fn from(v: i64) -> Self { Self::Int(v) }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self { Self::Float(v) }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self { Self::Str(v.to_string()) }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self { Self::Str(v) }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self { Self::Bool(v) }
}
