//! Logical schema types. Pure data; no backend dependency here.

use serde::{Deserialize, Serialize};

use crate::row::Scalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Utf8,
}

impl DataType {
    /// The non-null stand-in substituted for null values when partitioning
    /// the keys of a null-safe join, so that null keys co-locate.
    pub fn default_value(&self) -> Scalar {
        match self {
            DataType::Boolean => Scalar::Bool(false),
            DataType::Int32 => Scalar::I32(0),
            DataType::Int64 => Scalar::I64(0),
            DataType::Float32 => Scalar::F32(0.0),
            DataType::Float64 => Scalar::F64(0.0),
            DataType::Utf8 => Scalar::Str(String::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field_named(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
