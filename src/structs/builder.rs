//! Incremental construction of struct types

use std::sync::Arc;

use super::{field::StructLayout, Field, StructType};
use crate::{error::Result, types::TypeRef};

/// Accumulates field declarations and produces an immutable [`StructType`]
///
/// Every declaration re-runs the layout engine over the full field list, so
/// the intermediate `size`, `alignment` and offsets are always valid.
///
/// ```
/// use memlayout::{types, StructType};
///
/// let point = StructType::builder("Point")
///     .field("x", types::int32())?
///     .field("y", types::int32())?
///     .build();
/// assert_eq!(point.size(), 8);
/// # Ok::<(), memlayout::LayoutError>(())
/// ```
#[derive(Debug)]
pub struct StructTypeBuilder {
    layout: StructLayout,
}

impl StructTypeBuilder {
    /// Start an empty struct type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            layout: StructLayout::new(name.into()),
        }
    }

    /// Declare a field after the ones already declared
    pub fn define_field(
        &mut self,
        name: impl Into<String>,
        ty: impl Into<TypeRef>,
    ) -> Result<&mut Self> {
        self.layout.define(name.into(), ty.into())?;
        Ok(self)
    }

    /// By-value form of [`define_field`](Self::define_field) for chaining
    pub fn field(mut self, name: impl Into<String>, ty: impl Into<TypeRef>) -> Result<Self> {
        self.define_field(name, ty)?;
        Ok(self)
    }

    /// Declare several fields in iteration order
    pub fn fields<I, K, T>(mut self, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<TypeRef>,
    {
        for (name, ty) in fields {
            self.define_field(name, ty)?;
        }
        Ok(self)
    }

    /// Name of the type being built
    pub fn name(&self) -> &str {
        &self.layout.name
    }

    /// Current total size
    pub fn size(&self) -> usize {
        self.layout.size
    }

    /// Current struct alignment
    pub fn alignment(&self) -> usize {
        self.layout.alignment
    }

    /// Fields declared so far
    pub fn declared_fields(&self) -> &[Field] {
        &self.layout.fields
    }

    /// Current offset of a declared field
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.layout
            .position(name)
            .map(|i| self.layout.fields[i].offset())
    }

    /// Finish the declaration
    pub fn build(self) -> StructType {
        log::debug!(
            "built struct type {} ({} fields, size {}, align {})",
            self.layout.name,
            self.layout.fields.len(),
            self.layout.size,
            self.layout.alignment
        );
        StructType::from_layout(Arc::new(self.layout))
    }
}
