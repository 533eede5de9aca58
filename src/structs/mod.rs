//! Struct types and instances
//!
//! A [`StructType`] is declared field by field, either through a
//! [`StructTypeBuilder`] or with [`StructType::define_field`] on a fresh
//! type. Each declaration re-runs the layout engine, so offsets, size and
//! alignment are valid at every step. Creating the first
//! [`StructInstance`] freezes the type.
//!
//! Struct types implement [`TypeDescriptor`](crate::types::TypeDescriptor)
//! themselves. Embedding one in another struct (or in an array) needs no
//! special casing: reading such a field yields a [`StructInstance`] that is
//! a live view into the parent's buffer.

mod builder;
mod field;
mod instance;
mod struct_type;

pub use builder::StructTypeBuilder;
pub use field::Field;
pub use instance::StructInstance;
pub use struct_type::StructType;
