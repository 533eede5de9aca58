//! Struct types and their type-descriptor adapter

use std::{fmt, sync::Arc};

use super::{field::StructLayout, Field, StructInstance, StructTypeBuilder};
use crate::{
    buffer::ByteBuffer,
    error::{LayoutError, Result},
    types::{TypeDescriptor, TypeRef},
    value::Value,
};

/// A laid-out C struct
///
/// Cloning is cheap and yields another handle to the same type. Fields can
/// still be appended with [`define_field`](Self::define_field) as long as no
/// instance has been created and this handle is the only one; afterwards
/// the layout is fixed for good.
#[derive(Clone)]
pub struct StructType {
    layout: Arc<StructLayout>,
}

impl StructType {
    /// Start declaring a struct type
    pub fn builder(name: impl Into<String>) -> StructTypeBuilder {
        StructTypeBuilder::new(name)
    }

    /// Build a struct type from `(name, type)` pairs in iteration order
    pub fn new<I, K, T>(name: impl Into<String>, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<TypeRef>,
    {
        Ok(StructTypeBuilder::new(name).fields(fields)?.build())
    }

    pub(crate) fn from_layout(layout: Arc<StructLayout>) -> Self {
        Self { layout }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.layout.name
    }

    /// Total size in bytes, tail padding included
    pub fn size(&self) -> usize {
        self.layout.size
    }

    /// Alignment of the struct as a whole
    pub fn alignment(&self) -> usize {
        self.layout.alignment
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.layout.fields
    }

    pub fn field_count(&self) -> usize {
        self.layout.fields.len()
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.layout
            .position(name)
            .map(|index| &self.layout.fields[index])
    }

    /// Look up a field by declaration index
    pub fn field_at(&self, index: usize) -> Option<&Field> {
        self.layout.fields.get(index)
    }

    /// Offset of a field by name
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.field(name).map(Field::offset)
    }

    /// Whether an instance of this type has been created
    pub fn is_frozen(&self) -> bool {
        self.layout.is_frozen()
    }

    /// Append a field and lay the struct out again
    ///
    /// Fails with [`LayoutError::FrozenType`] once an instance exists, or
    /// while another handle (a clone, an instance, an enclosing struct)
    /// shares this type. A failed call leaves the type unchanged.
    pub fn define_field(
        &mut self,
        name: impl Into<String>,
        ty: impl Into<TypeRef>,
    ) -> Result<&mut Self> {
        let name = name.into();
        if self.layout.is_frozen() {
            return Err(LayoutError::frozen_type(
                self.name(),
                name,
                "an instance has already been created",
            ));
        }
        let type_name = self.layout.name.clone();
        let layout = Arc::get_mut(&mut self.layout).ok_or_else(|| {
            LayoutError::frozen_type(type_name, &name, "the type is shared with other handles")
        })?;
        layout.define(name, ty.into())?;
        Ok(self)
    }

    /// Allocate a zero-filled instance
    pub fn instantiate(&self) -> StructInstance {
        StructInstance::new(self)
    }

    /// Bind an instance to an existing buffer
    pub fn view(&self, buffer: ByteBuffer) -> Result<StructInstance> {
        StructInstance::with_buffer(self, buffer)
    }

    /// This type as a field descriptor for other structs and arrays
    pub fn as_type_ref(&self) -> TypeRef {
        Arc::new(self.clone())
    }

    pub(crate) fn freeze(&self) {
        if self.layout.freeze() {
            log::debug!("struct type {} frozen (size {})", self.name(), self.size());
        }
    }

    pub(crate) fn lookup(&self, name: &str) -> Result<&Field> {
        self.field(name)
            .ok_or_else(|| LayoutError::unknown_field(self.name(), name))
    }

    pub(crate) fn lookup_at(&self, index: usize) -> Result<&Field> {
        self.field_at(index)
            .ok_or_else(|| LayoutError::unknown_field(self.name(), format!("#{}", index)))
    }
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.layout, &other.layout)
    }
}

impl Eq for StructType {}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructType")
            .field("name", &self.name())
            .field("size", &self.size())
            .field("alignment", &self.alignment())
            .field(
                "fields",
                &self
                    .fields()
                    .iter()
                    .map(|field| (field.name(), field.offset()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl TypeDescriptor for StructType {
    fn type_name(&self) -> String {
        format!("struct {}", self.name())
    }

    fn size(&self) -> usize {
        self.layout.size
    }

    fn alignment(&self) -> Option<usize> {
        Some(self.layout.alignment)
    }

    /// A live view into `buffer` at `offset`; nothing is copied
    fn get(&self, buffer: &ByteBuffer, offset: usize) -> Result<Value> {
        let view = StructInstance::with_buffer(self, buffer.slice(offset)?)?;
        Ok(Value::Struct(view))
    }

    /// Copies an instance of this type byte for byte; instances of other
    /// struct types and records are assigned field by field
    fn set(&self, buffer: &ByteBuffer, offset: usize, value: Value) -> Result<()> {
        let view = StructInstance::with_buffer(self, buffer.slice(offset)?)?;
        match value {
            Value::Struct(source) if source.struct_type() == self => view.copy_from(&source),
            Value::Struct(source) => view.assign(source.to_values()?),
            Value::Record(pairs) => view.assign(pairs),
            other => Err(LayoutError::type_mismatch(self.type_name(), other.kind())),
        }
    }
}

impl From<StructType> for TypeRef {
    fn from(ty: StructType) -> Self {
        Arc::new(ty)
    }
}

impl From<&StructType> for TypeRef {
    fn from(ty: &StructType) -> Self {
        ty.as_type_ref()
    }
}
