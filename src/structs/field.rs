//! Field records and the mutable layout state shared by builders and types

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    config::{EMPTY_STRUCT_ALIGNMENT, RESERVED_FIELD_NAMES},
    error::{LayoutError, Result},
    layout::compute_layout,
    types::{effective_alignment, effective_size, validate_descriptor, TypeRef},
};

/// A named, typed slot at a fixed offset inside a struct
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    ty: TypeRef,
    offset: usize,
    index: usize,
}

impl Field {
    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptor of the field's type
    pub fn field_type(&self) -> &TypeRef {
        &self.ty
    }

    /// Byte offset from the start of the struct
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Position in declaration order
    pub fn index(&self) -> usize {
        self.index
    }

    /// Bytes the field occupies
    pub fn size(&self) -> usize {
        effective_size(self.ty.as_ref())
    }

    /// Alignment the field requires
    pub fn alignment(&self) -> usize {
        effective_alignment(self.ty.as_ref())
    }
}

/// Ordered field list plus the layout computed from it
#[derive(Debug)]
pub(crate) struct StructLayout {
    pub(crate) name: String,
    pub(crate) fields: Vec<Field>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) size: usize,
    pub(crate) alignment: usize,
    pub(crate) frozen: AtomicBool,
}

impl StructLayout {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            fields: Vec::new(),
            index: HashMap::new(),
            size: 0,
            alignment: EMPTY_STRUCT_ALIGNMENT,
            frozen: AtomicBool::new(false),
        }
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Returns true when this call froze the layout
    pub(crate) fn freeze(&self) -> bool {
        !self.frozen.swap(true, Ordering::AcqRel)
    }

    /// Validate a field and lay out the whole struct again with it appended.
    /// Nothing is modified when validation or layout fails.
    pub(crate) fn define(&mut self, name: String, ty: TypeRef) -> Result<()> {
        validate_field_name(&name)?;
        if RESERVED_FIELD_NAMES.contains(&name.as_str()) {
            return Err(LayoutError::reserved_name(name));
        }
        if self.index.contains_key(&name) {
            return Err(LayoutError::duplicate_field(&self.name, name));
        }
        validate_descriptor(&name, ty.as_ref())?;

        let computed = compute_layout(
            self.fields
                .iter()
                .map(|f| &f.ty)
                .chain(std::iter::once(&ty)),
        )
        .ok_or_else(|| {
            LayoutError::invalid_type_descriptor(
                &name,
                format!("{} would grow past usize::MAX bytes", self.name),
            )
        })?;

        let index = self.fields.len();
        self.index.insert(name.clone(), index);
        self.fields.push(Field {
            name,
            ty,
            offset: 0,
            index,
        });
        for (field, offset) in self.fields.iter_mut().zip(computed.offsets) {
            field.offset = offset;
        }
        self.size = computed.size;
        self.alignment = computed.alignment;

        let field = &self.fields[index];
        log::debug!(
            "{}: field '{}' ({}) at offset {}, size now {} (align {})",
            self.name,
            field.name,
            field.ty.type_name(),
            field.offset,
            self.size,
            self.alignment
        );
        Ok(())
    }
}

/// Field names must be C identifiers
fn validate_field_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return Err(LayoutError::invalid_field_name(name, "name is empty")),
    };
    if !(first.is_alphabetic() || first == '_') {
        return Err(LayoutError::invalid_field_name(
            name,
            "must start with a letter or underscore",
        ));
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return Err(LayoutError::invalid_field_name(
            name,
            "may only contain letters, digits and underscores",
        ));
    }
    Ok(())
}
