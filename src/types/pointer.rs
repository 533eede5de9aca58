//! Pointer type descriptors

use std::sync::Arc;

use super::{TypeDescriptor, TypeRef};
use crate::{
    buffer::ByteBuffer,
    config::{POINTER_ALIGNMENT, POINTER_SIZE},
    error::Result,
    types::Primitive,
    value::Value,
};

/// Pointer to a value of another type
///
/// The slot holds an address; reading yields [`Value::Pointer`]. The
/// pointee is kept so that indirection levels compose: a pointer to a
/// pointer to `int` has indirection 3.
#[derive(Debug, Clone)]
pub struct PointerType {
    pointee: TypeRef,
}

impl PointerType {
    pub fn new(pointee: TypeRef) -> Self {
        Self { pointee }
    }

    /// Type of the value this pointer refers to
    pub fn pointee(&self) -> &TypeRef {
        &self.pointee
    }
}

impl TypeDescriptor for PointerType {
    fn type_name(&self) -> String {
        format!("{} *", self.pointee.type_name())
    }

    fn size(&self) -> usize {
        POINTER_SIZE
    }

    fn alignment(&self) -> Option<usize> {
        Some(POINTER_ALIGNMENT)
    }

    fn indirection(&self) -> usize {
        self.pointee.indirection() + 1
    }

    fn get(&self, buffer: &ByteBuffer, offset: usize) -> Result<Value> {
        Primitive::Pointer.get(buffer, offset)
    }

    fn set(&self, buffer: &ByteBuffer, offset: usize, value: Value) -> Result<()> {
        Primitive::Pointer.set(buffer, offset, value)
    }
}

/// Descriptor for a pointer to `ty`
pub fn ref_type(ty: TypeRef) -> TypeRef {
    Arc::new(PointerType::new(ty))
}
