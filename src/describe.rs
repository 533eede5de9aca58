//! Serializable layout descriptions
//!
//! A [`LayoutDescription`] is a plain-data snapshot of a struct type's
//! layout. Producers and consumers of the same shared region can exchange
//! descriptions and check that they agree on where every field lives before
//! touching the bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    structs::{Field, StructType},
};

/// Placement of one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescription {
    pub name: String,
    pub type_name: String,
    pub offset: usize,
    pub size: usize,
    pub alignment: usize,
    pub indirection: usize,
}

impl From<&Field> for FieldDescription {
    fn from(field: &Field) -> Self {
        Self {
            name: field.name().to_string(),
            type_name: field.field_type().type_name(),
            offset: field.offset(),
            size: field.size(),
            alignment: field.alignment(),
            indirection: field.field_type().indirection(),
        }
    }
}

/// Placement of every field of a struct type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDescription {
    pub name: String,
    pub size: usize,
    pub alignment: usize,
    pub fields: Vec<FieldDescription>,
}

impl LayoutDescription {
    /// Encode with bincode
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a description produced by [`to_bytes`](Self::to_bytes)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Whether both sides place the same fields at the same offsets.
    /// Type names are not compared.
    pub fn is_compatible_with(&self, other: &LayoutDescription) -> bool {
        self.size == other.size
            && self.alignment == other.alignment
            && self.fields.len() == other.fields.len()
            && self.fields.iter().zip(&other.fields).all(|(a, b)| {
                a.name == b.name
                    && a.offset == b.offset
                    && a.size == b.size
                    && a.indirection == b.indirection
            })
    }

    /// Bytes not covered by any field
    pub fn padding(&self) -> usize {
        self.size - self.fields.iter().map(|f| f.size).sum::<usize>()
    }
}

impl fmt::Display for LayoutDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "struct {} (size {}, align {})",
            self.name, self.size, self.alignment
        )?;
        for field in &self.fields {
            writeln!(
                f,
                "  {:>6}  {:<24} {} ({} bytes)",
                field.offset, field.name, field.type_name, field.size
            )?;
        }
        Ok(())
    }
}

impl StructType {
    /// Snapshot of this type's layout
    pub fn describe(&self) -> LayoutDescription {
        LayoutDescription {
            name: self.name().to_string(),
            size: self.size(),
            alignment: self.alignment(),
            fields: self.fields().iter().map(FieldDescription::from).collect(),
        }
    }
}
