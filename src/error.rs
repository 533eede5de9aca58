//! Error types and handling for memlayout

/// Result type alias for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors raised while declaring struct types or accessing struct instances
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// A field type does not satisfy the descriptor protocol
    #[error("Invalid type descriptor for field '{field}': {message}")]
    InvalidTypeDescriptor { field: String, message: String },

    /// Field name is empty or not an identifier
    #[error("Invalid field name '{name}': {message}")]
    InvalidFieldName { name: String, message: String },

    /// Field name already declared on the struct type
    #[error("Duplicate field: '{name}' is already declared on {type_name}")]
    DuplicateField { type_name: String, name: String },

    /// Field name collides with an instance accessor
    #[error("Reserved field name: '{name}' is used by struct instances")]
    ReservedName { name: String },

    /// Struct type can no longer be extended
    #[error("Frozen type: cannot add field '{field}' to {type_name} ({reason})")]
    FrozenType {
        type_name: String,
        field: String,
        reason: String,
    },

    /// Backing buffer is shorter than the struct type
    #[error("Buffer too small for {type_name}: requires {required} bytes, got {actual}")]
    BufferTooSmall {
        type_name: String,
        required: usize,
        actual: usize,
    },

    /// Field name not declared on the struct type
    #[error("Unknown field: {type_name} has no field '{name}'")]
    UnknownField { type_name: String, name: String },

    /// Value kind does not match the descriptor
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Value does not fit in the descriptor
    #[error("Value out of range for {type_name}: {value}")]
    ValueOutOfRange { type_name: String, value: String },

    /// Access beyond the end of a buffer
    #[error("Out of bounds: offset {offset} + {size} bytes exceeds buffer length {len}")]
    OutOfBounds {
        offset: usize,
        size: usize,
        len: usize,
    },

    /// Layout description encoding failures
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl LayoutError {
    /// Create an invalid type descriptor error
    pub fn invalid_type_descriptor(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTypeDescriptor {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid field name error
    pub fn invalid_field_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFieldName {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate field error
    pub fn duplicate_field(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateField {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    /// Create a reserved name error
    pub fn reserved_name(name: impl Into<String>) -> Self {
        Self::ReservedName { name: name.into() }
    }

    /// Create a frozen type error
    pub fn frozen_type(
        type_name: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::FrozenType {
            type_name: type_name.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a buffer too small error
    pub fn buffer_too_small(type_name: impl Into<String>, required: usize, actual: usize) -> Self {
        Self::BufferTooSmall {
            type_name: type_name.into(),
            required,
            actual,
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a value out of range error
    pub fn value_out_of_range(type_name: impl Into<String>, value: impl ToString) -> Self {
        Self::ValueOutOfRange {
            type_name: type_name.into(),
            value: value.to_string(),
        }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(offset: usize, size: usize, len: usize) -> Self {
        Self::OutOfBounds { offset, size, len }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<bincode::Error> for LayoutError {
    fn from(err: bincode::Error) -> Self {
        Self::serialization(format!("Bincode error: {}", err))
    }
}
