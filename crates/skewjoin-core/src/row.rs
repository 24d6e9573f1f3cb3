//! Row values. Lightweight scalars; a `Row` is an ordered list of scalars
//! matching some `Schema` positionally.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Ordinary SQL equality: false whenever either side is null.
    pub fn eq_value(&self, other: &Scalar) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        self == other
    }

    /// Null-safe equality: true when both sides are null, else ordinary
    /// equality.
    pub fn eq_null_safe(&self, other: &Scalar) -> bool {
        if self.is_null() && other.is_null() {
            return true;
        }
        self.eq_value(other)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub values: Vec<Scalar>,
}

impl Row {
    pub fn new(values: Vec<Scalar>) -> Self {
        Self { values }
    }

    pub fn get(&self, idx: usize) -> Option<&Scalar> {
        self.values.get(idx)
    }
}
