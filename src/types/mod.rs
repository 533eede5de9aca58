//! Type descriptors
//!
//! Every field type, primitive or composite, is described by a
//! [`TypeDescriptor`]: how many bytes it occupies, how it must be aligned,
//! how many levels of pointer indirection separate the slot from the value,
//! and how to read or write it at an offset inside a [`ByteBuffer`].
//! Struct types implement the same trait, which is what lets them nest
//! inside other structs and arrays.

use std::{fmt, sync::Arc};

use crate::{
    buffer::ByteBuffer,
    config::{POINTER_ALIGNMENT, POINTER_SIZE},
    error::{LayoutError, Result},
    value::Value,
};

pub mod array;
pub mod pointer;
pub mod primitive;

pub use array::{array_of, ArrayType};
pub use pointer::{ref_type, PointerType};
pub use primitive::*;

/// Shared handle to a type descriptor
pub type TypeRef = Arc<dyn TypeDescriptor>;

/// Capabilities a type must expose to be embedded in a struct layout
pub trait TypeDescriptor: fmt::Debug + Send + Sync {
    /// Human readable type name
    fn type_name(&self) -> String;

    /// Bytes occupied when embedded by value
    fn size(&self) -> usize;

    /// Size, or `None` when it does not fit in `usize`
    fn checked_size(&self) -> Option<usize> {
        Some(self.size())
    }

    /// Required alignment; `None` falls back to the size
    fn alignment(&self) -> Option<usize> {
        None
    }

    /// Levels of pointer indirection; 1 means stored by value
    fn indirection(&self) -> usize {
        1
    }

    /// Read the value stored at `offset`
    fn get(&self, buffer: &ByteBuffer, offset: usize) -> Result<Value>;

    /// Write `value` at `offset`
    fn set(&self, buffer: &ByteBuffer, offset: usize, value: Value) -> Result<()>;
}

/// Bytes a field of this type occupies inside a struct
pub fn effective_size(ty: &dyn TypeDescriptor) -> usize {
    if ty.indirection() == 1 {
        ty.size()
    } else {
        POINTER_SIZE
    }
}

/// [`effective_size`], or `None` when the size overflows
pub fn checked_effective_size(ty: &dyn TypeDescriptor) -> Option<usize> {
    if ty.indirection() == 1 {
        ty.checked_size()
    } else {
        Some(POINTER_SIZE)
    }
}

/// Alignment a field of this type requires inside a struct
pub fn effective_alignment(ty: &dyn TypeDescriptor) -> usize {
    if ty.indirection() == 1 {
        ty.alignment().unwrap_or_else(|| ty.size()).max(1)
    } else {
        POINTER_ALIGNMENT
    }
}

/// Check that a descriptor can take part in a layout
pub fn validate_descriptor(field: &str, ty: &dyn TypeDescriptor) -> Result<()> {
    if ty.indirection() == 0 {
        return Err(LayoutError::invalid_type_descriptor(
            field,
            format!("{} has indirection 0, expected at least 1", ty.type_name()),
        ));
    }
    if checked_effective_size(ty).is_none() {
        return Err(LayoutError::invalid_type_descriptor(
            field,
            format!("size of {} overflows usize", ty.type_name()),
        ));
    }
    let (alignment, source) = match ty.alignment() {
        Some(alignment) => (alignment, "declares"),
        None => (effective_alignment(ty), "derives from its size"),
    };
    if ty.indirection() == 1 && !alignment.is_power_of_two() {
        return Err(LayoutError::invalid_type_descriptor(
            field,
            format!(
                "{} {} alignment {}, which is not a power of two",
                ty.type_name(),
                source,
                alignment
            ),
        ));
    }
    Ok(())
}
