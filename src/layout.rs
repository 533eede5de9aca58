//! Layout engine
//!
//! Computes field offsets, struct alignment and total size from an ordered
//! list of field types, following natural C alignment:
//!
//! 1. the struct alignment is the largest effective alignment of its fields
//!    (1 for a struct without fields);
//! 2. each field, in declaration order, is placed at the lowest offset past
//!    the previous field that is a multiple of its own alignment;
//! 3. the total size is rounded up to the struct alignment, so that arrays
//!    of the struct stay aligned.
//!
//! The computation is a pure function of the field types; running it again
//! on the same list yields the same layout.

use crate::{
    config::EMPTY_STRUCT_ALIGNMENT,
    types::{effective_alignment, effective_size, TypeRef},
};

/// Result of a layout pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedLayout {
    /// Byte offset of each field, in declaration order
    pub offsets: Vec<usize>,
    /// Total size including tail padding
    pub size: usize,
    /// Alignment of the struct as a whole
    pub alignment: usize,
}

impl ComputedLayout {
    /// Bytes of padding inserted between and after fields
    pub fn padding(&self, field_sizes: impl IntoIterator<Item = usize>) -> usize {
        self.size - field_sizes.into_iter().sum::<usize>()
    }
}

/// Round `value` up to the next multiple of `align`; `None` on overflow
pub fn align_up(value: usize, align: usize) -> Option<usize> {
    debug_assert!(align > 0);
    match value % align {
        0 => Some(value),
        rem => value.checked_add(align - rem),
    }
}

/// Lay out the given field types in declaration order
///
/// Returns `None` when the struct size does not fit in `usize`.
pub fn compute_layout<'a, I>(fields: I) -> Option<ComputedLayout>
where
    I: IntoIterator<Item = &'a TypeRef>,
    I::IntoIter: Clone,
{
    let fields = fields.into_iter();

    let alignment = fields
        .clone()
        .map(|ty| effective_alignment(ty.as_ref()))
        .max()
        .unwrap_or(EMPTY_STRUCT_ALIGNMENT);

    let mut size: usize = 0;
    let mut offsets = Vec::new();
    for ty in fields {
        let offset = align_up(size, effective_alignment(ty.as_ref()))?;
        offsets.push(offset);
        size = offset.checked_add(effective_size(ty.as_ref()))?;
    }

    Some(ComputedLayout {
        offsets,
        size: align_up(size, alignment)?,
        alignment,
    })
}
