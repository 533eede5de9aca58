//! Primitive type descriptors
//!
//! Sizes, alignments and byte order are those of the host, matching what a
//! C compiler for the same target produces.

use std::{
    mem::{align_of, size_of},
    os::raw::{c_long, c_ulong},
    sync::Arc,
};

use super::{TypeDescriptor, TypeRef};
use crate::{
    buffer::ByteBuffer,
    error::{LayoutError, Result},
    value::Value,
};

/// Scalar types with a fixed native representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    ISize,
    USize,
    Float32,
    Float64,
    /// Untyped raw pointer
    Pointer,
}

impl Primitive {
    /// Name used in descriptions and error messages
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Int8 => "int8",
            Primitive::UInt8 => "uint8",
            Primitive::Int16 => "int16",
            Primitive::UInt16 => "uint16",
            Primitive::Int32 => "int32",
            Primitive::UInt32 => "uint32",
            Primitive::Int64 => "int64",
            Primitive::UInt64 => "uint64",
            Primitive::ISize => "isize",
            Primitive::USize => "usize",
            Primitive::Float32 => "float",
            Primitive::Float64 => "double",
            Primitive::Pointer => "pointer",
        }
    }

    /// Native size in bytes
    pub fn byte_size(self) -> usize {
        match self {
            Primitive::Bool => size_of::<bool>(),
            Primitive::Int8 | Primitive::UInt8 => 1,
            Primitive::Int16 | Primitive::UInt16 => 2,
            Primitive::Int32 | Primitive::UInt32 => 4,
            Primitive::Int64 | Primitive::UInt64 => 8,
            Primitive::ISize | Primitive::USize => size_of::<usize>(),
            Primitive::Float32 => size_of::<f32>(),
            Primitive::Float64 => size_of::<f64>(),
            Primitive::Pointer => size_of::<*const u8>(),
        }
    }

    /// Native alignment in bytes
    pub fn byte_alignment(self) -> usize {
        match self {
            Primitive::Bool => align_of::<bool>(),
            Primitive::Int8 => align_of::<i8>(),
            Primitive::UInt8 => align_of::<u8>(),
            Primitive::Int16 => align_of::<i16>(),
            Primitive::UInt16 => align_of::<u16>(),
            Primitive::Int32 => align_of::<i32>(),
            Primitive::UInt32 => align_of::<u32>(),
            Primitive::Int64 => align_of::<i64>(),
            Primitive::UInt64 => align_of::<u64>(),
            Primitive::ISize => align_of::<isize>(),
            Primitive::USize => align_of::<usize>(),
            Primitive::Float32 => align_of::<f32>(),
            Primitive::Float64 => align_of::<f64>(),
            Primitive::Pointer => align_of::<*const u8>(),
        }
    }

    /// Shared descriptor handle
    pub fn into_ref(self) -> TypeRef {
        Arc::new(self)
    }

    fn integer(self, value: &Value) -> Result<i128> {
        match value {
            Value::Bool(b) => Ok(i128::from(*b)),
            other => other
                .as_i128()
                .ok_or_else(|| LayoutError::type_mismatch(self.name(), other.kind())),
        }
    }

    fn out_of_range(self, value: i128) -> LayoutError {
        LayoutError::value_out_of_range(self.name(), value)
    }
}

macro_rules! encode_int {
    ($prim:expr, $ty:ty, $wide:expr) => {{
        let wide: i128 = $wide;
        <$ty>::try_from(wide)
            .map(|v| v.to_ne_bytes().to_vec())
            .map_err(|_| $prim.out_of_range(wide))
    }};
}

impl TypeDescriptor for Primitive {
    fn type_name(&self) -> String {
        self.name().to_string()
    }

    fn size(&self) -> usize {
        self.byte_size()
    }

    fn alignment(&self) -> Option<usize> {
        Some(self.byte_alignment())
    }

    fn get(&self, buffer: &ByteBuffer, offset: usize) -> Result<Value> {
        let value = match self {
            Primitive::Bool => Value::Bool(buffer.read_array::<1>(offset)?[0] != 0),
            Primitive::Int8 => Value::I8(i8::from_ne_bytes(buffer.read_array(offset)?)),
            Primitive::UInt8 => Value::U8(u8::from_ne_bytes(buffer.read_array(offset)?)),
            Primitive::Int16 => Value::I16(i16::from_ne_bytes(buffer.read_array(offset)?)),
            Primitive::UInt16 => Value::U16(u16::from_ne_bytes(buffer.read_array(offset)?)),
            Primitive::Int32 => Value::I32(i32::from_ne_bytes(buffer.read_array(offset)?)),
            Primitive::UInt32 => Value::U32(u32::from_ne_bytes(buffer.read_array(offset)?)),
            Primitive::Int64 => Value::I64(i64::from_ne_bytes(buffer.read_array(offset)?)),
            Primitive::UInt64 => Value::U64(u64::from_ne_bytes(buffer.read_array(offset)?)),
            Primitive::ISize => {
                let raw = isize::from_ne_bytes(buffer.read_array(offset)?);
                Value::I64(raw as i64)
            }
            Primitive::USize => {
                let raw = usize::from_ne_bytes(buffer.read_array(offset)?);
                Value::U64(raw as u64)
            }
            Primitive::Float32 => Value::F32(f32::from_ne_bytes(buffer.read_array(offset)?)),
            Primitive::Float64 => Value::F64(f64::from_ne_bytes(buffer.read_array(offset)?)),
            Primitive::Pointer => {
                Value::Pointer(usize::from_ne_bytes(buffer.read_array(offset)?))
            }
        };
        Ok(value)
    }

    fn set(&self, buffer: &ByteBuffer, offset: usize, value: Value) -> Result<()> {
        let prim = *self;
        let bytes = match prim {
            Primitive::Float32 => {
                let v = value
                    .as_f64()
                    .ok_or_else(|| LayoutError::type_mismatch(prim.name(), value.kind()))?;
                (v as f32).to_ne_bytes().to_vec()
            }
            Primitive::Float64 => {
                let v = value
                    .as_f64()
                    .ok_or_else(|| LayoutError::type_mismatch(prim.name(), value.kind()))?;
                v.to_ne_bytes().to_vec()
            }
            Primitive::Bool => vec![u8::from(prim.integer(&value)? != 0)],
            Primitive::Int8 => encode_int!(prim, i8, prim.integer(&value)?)?,
            Primitive::UInt8 => encode_int!(prim, u8, prim.integer(&value)?)?,
            Primitive::Int16 => encode_int!(prim, i16, prim.integer(&value)?)?,
            Primitive::UInt16 => encode_int!(prim, u16, prim.integer(&value)?)?,
            Primitive::Int32 => encode_int!(prim, i32, prim.integer(&value)?)?,
            Primitive::UInt32 => encode_int!(prim, u32, prim.integer(&value)?)?,
            Primitive::Int64 => encode_int!(prim, i64, prim.integer(&value)?)?,
            Primitive::UInt64 => encode_int!(prim, u64, prim.integer(&value)?)?,
            Primitive::ISize => encode_int!(prim, isize, prim.integer(&value)?)?,
            Primitive::USize | Primitive::Pointer => {
                encode_int!(prim, usize, prim.integer(&value)?)?
            }
        };
        buffer.write_bytes(offset, &bytes)
    }
}

/// `bool`
pub fn bool_type() -> TypeRef {
    Primitive::Bool.into_ref()
}

/// Signed 8-bit integer
pub fn int8() -> TypeRef {
    Primitive::Int8.into_ref()
}

/// Unsigned 8-bit integer
pub fn uint8() -> TypeRef {
    Primitive::UInt8.into_ref()
}

/// Signed 16-bit integer
pub fn int16() -> TypeRef {
    Primitive::Int16.into_ref()
}

/// Unsigned 16-bit integer
pub fn uint16() -> TypeRef {
    Primitive::UInt16.into_ref()
}

/// Signed 32-bit integer
pub fn int32() -> TypeRef {
    Primitive::Int32.into_ref()
}

/// Unsigned 32-bit integer
pub fn uint32() -> TypeRef {
    Primitive::UInt32.into_ref()
}

/// Signed 64-bit integer
pub fn int64() -> TypeRef {
    Primitive::Int64.into_ref()
}

/// Unsigned 64-bit integer
pub fn uint64() -> TypeRef {
    Primitive::UInt64.into_ref()
}

/// 32-bit float
pub fn float32() -> TypeRef {
    Primitive::Float32.into_ref()
}

/// 64-bit float
pub fn float64() -> TypeRef {
    Primitive::Float64.into_ref()
}

/// Untyped raw pointer (`void *`)
pub fn pointer() -> TypeRef {
    Primitive::Pointer.into_ref()
}

// C spellings

pub fn char() -> TypeRef {
    int8()
}

pub fn uchar() -> TypeRef {
    uint8()
}

pub fn short() -> TypeRef {
    int16()
}

pub fn ushort() -> TypeRef {
    uint16()
}

pub fn int() -> TypeRef {
    int32()
}

pub fn uint() -> TypeRef {
    uint32()
}

pub fn long() -> TypeRef {
    if size_of::<c_long>() == 8 {
        int64()
    } else {
        int32()
    }
}

pub fn ulong() -> TypeRef {
    if size_of::<c_ulong>() == 8 {
        uint64()
    } else {
        uint32()
    }
}

pub fn longlong() -> TypeRef {
    int64()
}

pub fn ulonglong() -> TypeRef {
    uint64()
}

pub fn size_t() -> TypeRef {
    Primitive::USize.into_ref()
}

pub fn ssize_t() -> TypeRef {
    Primitive::ISize.into_ref()
}

pub fn float() -> TypeRef {
    float32()
}

pub fn double() -> TypeRef {
    float64()
}
