//! Fixed-length array descriptors

use std::sync::Arc;

use super::{
    checked_effective_size, effective_alignment, effective_size, TypeDescriptor, TypeRef,
};
use crate::{
    buffer::ByteBuffer,
    error::{LayoutError, Result},
    value::Value,
};

/// `T[N]`: `length` consecutive elements with no padding between them
#[derive(Debug, Clone)]
pub struct ArrayType {
    element: TypeRef,
    length: usize,
}

impl ArrayType {
    pub fn new(element: TypeRef, length: usize) -> Self {
        Self { element, length }
    }

    /// Element type
    pub fn element(&self) -> &TypeRef {
        &self.element
    }

    /// Number of elements
    pub fn length(&self) -> usize {
        self.length
    }

    /// Distance in bytes between consecutive elements
    pub fn stride(&self) -> usize {
        effective_size(self.element.as_ref())
    }

    /// Read a single element
    pub fn get_element(&self, buffer: &ByteBuffer, offset: usize, index: usize) -> Result<Value> {
        self.check_index(index)?;
        self.element.get(buffer, self.element_offset(buffer, offset, index)?)
    }

    /// Write a single element
    pub fn set_element(
        &self,
        buffer: &ByteBuffer,
        offset: usize,
        index: usize,
        value: Value,
    ) -> Result<()> {
        self.check_index(index)?;
        self.element
            .set(buffer, self.element_offset(buffer, offset, index)?, value)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.length {
            return Err(LayoutError::out_of_bounds(index, 1, self.length));
        }
        Ok(())
    }

    fn element_offset(&self, buffer: &ByteBuffer, offset: usize, index: usize) -> Result<usize> {
        index
            .checked_mul(self.stride())
            .and_then(|rel| rel.checked_add(offset))
            .ok_or_else(|| LayoutError::out_of_bounds(offset, self.size(), buffer.len()))
    }
}

impl TypeDescriptor for ArrayType {
    fn type_name(&self) -> String {
        format!("{}[{}]", self.element.type_name(), self.length)
    }

    fn size(&self) -> usize {
        self.checked_size().unwrap_or(usize::MAX)
    }

    fn checked_size(&self) -> Option<usize> {
        checked_effective_size(self.element.as_ref())?.checked_mul(self.length)
    }

    fn alignment(&self) -> Option<usize> {
        Some(effective_alignment(self.element.as_ref()))
    }

    fn get(&self, buffer: &ByteBuffer, offset: usize) -> Result<Value> {
        let items = (0..self.length)
            .map(|i| self.element.get(buffer, self.element_offset(buffer, offset, i)?))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(items))
    }

    /// Accepts up to `length` elements; trailing elements keep their bytes.
    /// Elements are encoded into a scratch copy first, so a rejected element
    /// leaves `buffer` untouched.
    fn set(&self, buffer: &ByteBuffer, offset: usize, value: Value) -> Result<()> {
        let items = value.into_array()?;
        if items.len() > self.length {
            return Err(LayoutError::value_out_of_range(
                self.type_name(),
                format!("{} elements", items.len()),
            ));
        }
        let span = self.element_offset(buffer, 0, items.len())?;
        let mut bytes = vec![0u8; span];
        buffer.read_bytes(offset, &mut bytes)?;

        let scratch = ByteBuffer::from_vec(bytes);
        for (i, item) in items.into_iter().enumerate() {
            self.element
                .set(&scratch, self.element_offset(&scratch, 0, i)?, item)?;
        }
        buffer.write_bytes(offset, &scratch.to_vec())
    }
}

/// Descriptor for `ty[length]`
pub fn array_of(ty: TypeRef, length: usize) -> TypeRef {
    Arc::new(ArrayType::new(ty, length))
}
