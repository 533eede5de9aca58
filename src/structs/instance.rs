//! Buffer-backed struct instances

use std::{convert::TryFrom, fmt};

use super::StructType;
use crate::{
    buffer::ByteBuffer,
    error::{LayoutError, Result},
    value::Value,
};

/// A struct type bound to a byte buffer
///
/// The instance holds no field values of its own: every read and write goes
/// straight to the buffer through the field's type descriptor. Instances
/// created over a slice of another buffer are views; all views of the same
/// bytes observe each other's writes.
#[derive(Clone)]
pub struct StructInstance {
    struct_type: StructType,
    buffer: ByteBuffer,
}

impl StructInstance {
    /// Allocate a zero-filled buffer of exactly `ty.size()` bytes
    pub fn new(ty: &StructType) -> Self {
        ty.freeze();
        log::trace!("allocating {} bytes for {}", ty.size(), ty.name());
        Self {
            struct_type: ty.clone(),
            buffer: ByteBuffer::zeroed(ty.size()),
        }
    }

    /// Use `buffer` as backing storage; no bytes are copied
    pub fn with_buffer(ty: &StructType, buffer: ByteBuffer) -> Result<Self> {
        check_len(ty, &buffer)?;
        ty.freeze();
        log::trace!(
            "binding {} to {} byte buffer at storage offset {}",
            ty.name(),
            buffer.len(),
            buffer.storage_offset()
        );
        Ok(Self {
            struct_type: ty.clone(),
            buffer,
        })
    }

    /// Allocate a fresh instance and assign `values` in iteration order
    ///
    /// The type is only frozen once every value has been accepted.
    pub fn with_values<I, K, V>(ty: &StructType, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let bytes = encode_values(ty, vec![0u8; ty.size()], values)?;
        Self::with_buffer(ty, ByteBuffer::from_vec(bytes))
    }

    /// Bind to `buffer`, then assign `values` in iteration order
    ///
    /// On failure `buffer` is left as it was and the type is not frozen.
    pub fn with_buffer_and_values<I, K, V>(
        ty: &StructType,
        buffer: ByteBuffer,
        values: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        check_len(ty, &buffer)?;
        let mut current = vec![0u8; ty.size()];
        buffer.read_bytes(0, &mut current)?;
        let bytes = encode_values(ty, current, values)?;

        let instance = Self::with_buffer(ty, buffer)?;
        instance.buffer.write_bytes(0, &bytes)?;
        Ok(instance)
    }

    /// Type of this instance
    pub fn struct_type(&self) -> &StructType {
        &self.struct_type
    }

    /// Backing buffer handle
    pub fn pointer(&self) -> &ByteBuffer {
        &self.buffer
    }

    /// Owned handle to the backing buffer
    pub fn to_ref(&self) -> ByteBuffer {
        self.buffer.clone()
    }

    /// Read a field
    pub fn get(&self, name: &str) -> Result<Value> {
        let field = self.struct_type.lookup(name)?;
        field.field_type().get(&self.buffer, field.offset())
    }

    /// Read a field and convert it
    pub fn get_as<T>(&self, name: &str) -> Result<T>
    where
        T: TryFrom<Value, Error = LayoutError>,
    {
        T::try_from(self.get(name)?)
    }

    /// View of a nested struct field
    pub fn get_struct(&self, name: &str) -> Result<StructInstance> {
        self.get(name)?.into_struct()
    }

    /// Write a field
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let field = self.struct_type.lookup(name)?;
        field
            .field_type()
            .set(&self.buffer, field.offset(), value.into())
    }

    /// Read a field by declaration index
    pub fn get_at(&self, index: usize) -> Result<Value> {
        let field = self.struct_type.lookup_at(index)?;
        field.field_type().get(&self.buffer, field.offset())
    }

    /// Write a field by declaration index
    pub fn set_at(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let field = self.struct_type.lookup_at(index)?;
        field
            .field_type()
            .set(&self.buffer, field.offset(), value.into())
    }

    /// Assign several fields in iteration order
    ///
    /// All values are encoded before anything is written: an unknown name or
    /// a rejected value leaves the buffer untouched.
    pub fn assign<I, K, V>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let bytes = encode_values(&self.struct_type, self.to_bytes(), values)?;
        self.buffer.write_bytes(0, &bytes)
    }

    /// Overwrite this instance with the bytes of another instance of the
    /// same type
    pub fn copy_from(&self, other: &StructInstance) -> Result<()> {
        if other.struct_type != self.struct_type {
            return Err(LayoutError::type_mismatch(
                self.struct_type.name(),
                other.struct_type.name(),
            ));
        }
        self.buffer.write_bytes(0, &other.to_bytes())
    }

    /// Snapshot of every field, in declaration order
    pub fn to_values(&self) -> Result<Vec<(String, Value)>> {
        self.struct_type
            .fields()
            .iter()
            .map(|field| Ok((field.name().to_string(), self.get_at(field.index())?)))
            .collect()
    }

    /// Copy of the bytes covered by this instance
    pub fn to_bytes(&self) -> Vec<u8> {
        // the buffer may extend past the struct, never fall short of it
        let mut bytes = self.buffer.to_vec();
        bytes.truncate(self.struct_type.size());
        bytes
    }
}

fn check_len(ty: &StructType, buffer: &ByteBuffer) -> Result<()> {
    if buffer.len() < ty.size() {
        return Err(LayoutError::buffer_too_small(
            ty.name(),
            ty.size(),
            buffer.len(),
        ));
    }
    Ok(())
}

/// Apply `values` to a scratch copy of `base` and return the result
fn encode_values<I, K, V>(ty: &StructType, base: Vec<u8>, values: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let values: Vec<(String, Value)> = values
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect();

    let mut fields = Vec::with_capacity(values.len());
    for (name, _) in &values {
        fields.push(ty.lookup(name)?);
    }

    let scratch = ByteBuffer::from_vec(base);
    for (field, (_, value)) in fields.into_iter().zip(values) {
        field.field_type().set(&scratch, field.offset(), value)?;
    }
    Ok(scratch.to_vec())
}

impl fmt::Debug for StructInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.struct_type.name());
        for field in self.struct_type.fields() {
            match self.get_at(field.index()) {
                Ok(value) => out.field(field.name(), &value),
                Err(_) => out.field(field.name(), &"<unreadable>"),
            };
        }
        out.finish()
    }
}
