//! Dynamic values read from and written to struct fields

use std::convert::TryFrom;

use crate::{
    error::{LayoutError, Result},
    structs::StructInstance,
};

/// A field value exchanged with a type descriptor
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    /// Raw address stored in a pointer-sized slot
    Pointer(usize),
    /// Elements of a fixed-length array field
    Array(Vec<Value>),
    /// Live view of a nested struct
    Struct(StructInstance),
    /// Ordered name/value pairs, used to assign several struct fields at once
    Record(Vec<(String, Value)>),
}

impl Value {
    /// Build a record from name/value pairs, keeping their order
    pub fn record<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Record(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::U8(_) => "u8",
            Value::I16(_) => "i16",
            Value::U16(_) => "u16",
            Value::I32(_) => "i32",
            Value::U32(_) => "u32",
            Value::I64(_) => "i64",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Pointer(_) => "pointer",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
            Value::Record(_) => "record",
        }
    }

    /// Integer payload widened to `i128`, if this is an integer value
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Value::I8(v) => Some(v.into()),
            Value::U8(v) => Some(v.into()),
            Value::I16(v) => Some(v.into()),
            Value::U16(v) => Some(v.into()),
            Value::I32(v) => Some(v.into()),
            Value::U32(v) => Some(v.into()),
            Value::I64(v) => Some(v.into()),
            Value::U64(v) => Some(v.into()),
            Value::Pointer(v) => Some(v as i128),
            _ => None,
        }
    }

    /// Numeric payload as `f64`, if this is a float or integer value
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(v) => Some(v.into()),
            Value::F64(v) => Some(v),
            _ => self.as_i128().map(|v| v as f64),
        }
    }

    /// Unwrap a nested struct view
    pub fn into_struct(self) -> Result<StructInstance> {
        match self {
            Value::Struct(instance) => Ok(instance),
            other => Err(LayoutError::type_mismatch("struct", other.kind())),
        }
    }

    /// Unwrap array elements
    pub fn into_array(self) -> Result<Vec<Value>> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(LayoutError::type_mismatch("array", other.kind())),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Pointer(a), Value::Pointer(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => {
                a.struct_type() == b.struct_type() && a.to_bytes() == b.to_bytes()
            }
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! scalar_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = LayoutError;

                fn try_from(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => match other.as_i128() {
                            Some(wide) => <$ty>::try_from(wide).map_err(|_| {
                                LayoutError::value_out_of_range(stringify!($ty), wide)
                            }),
                            None => Err(LayoutError::type_mismatch(
                                stringify!($ty),
                                other.kind(),
                            )),
                        },
                    }
                }
            }
        )*
    };
}

scalar_conversions! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl TryFrom<Value> for bool {
    type Error = LayoutError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(LayoutError::type_mismatch("bool", other.kind())),
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl TryFrom<Value> for f32 {
    type Error = LayoutError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::F32(v) => Ok(v),
            other => Err(LayoutError::type_mismatch("f32", other.kind())),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = LayoutError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            Value::F32(v) => Ok(v.into()),
            other => Err(LayoutError::type_mismatch("f64", other.kind())),
        }
    }
}

impl From<StructInstance> for Value {
    fn from(instance: StructInstance) -> Self {
        Value::Struct(instance)
    }
}

impl TryFrom<Value> for StructInstance {
    type Error = LayoutError;

    fn try_from(value: Value) -> Result<Self> {
        value.into_struct()
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}
