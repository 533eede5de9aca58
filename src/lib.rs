//! # memlayout - Dynamic C Struct Layouts
//!
//! memlayout describes C-style composite layouts at runtime and reads and
//! writes their fields directly inside a shared byte buffer, following the
//! native alignment and padding rules. It is meant for native-interop code
//! that needs structured memory regions (foreign call arguments, shared
//! memory headers) without hand-written offset arithmetic.
//!
//! ## Features
//!
//! - **Layout engine**: natural C alignment, inter-field and tail padding
//! - **Incremental declaration**: fields are added one by one; the type is
//!   frozen once the first instance exists
//! - **Zero-copy instances**: field access goes straight to the buffer
//! - **Composable descriptors**: structs nest in structs and arrays, with
//!   nested fields exposed as live views
//! - **Layout descriptions**: serde/bincode snapshots for cross-process checks
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐    ┌────────────────────────┐
//! │  StructTypeBuilder   │───▶│      Layout engine     │
//! │  (field declarations)│    │ (offsets, size, align) │
//! └──────────┬───────────┘    └────────────────────────┘
//!            ▼
//! ┌──────────────────────┐    ┌────────────────────────┐
//! │      StructType      │───▶│     StructInstance     │
//! │ (is a TypeDescriptor)│    │ (view over ByteBuffer) │
//! └──────────────────────┘    └───────────┬────────────┘
//!                                         ▼
//!                          field descriptors get/set bytes
//! ```
//!
//! ## Example
//!
//! ```
//! use memlayout::{types, StructInstance, StructType, Value};
//!
//! let point = StructType::new("Point", [("x", types::int32()), ("y", types::int32())])?;
//! let rect = StructType::new(
//!     "Rect",
//!     [("origin", point.as_type_ref()), ("flags", types::uchar())],
//! )?;
//!
//! let r = StructInstance::new(&rect);
//! r.get_struct("origin")?.set("y", 7)?;
//! assert_eq!(r.get_struct("origin")?.get("y")?, Value::I32(7));
//! assert_eq!(rect.size(), 12);
//! # Ok::<(), memlayout::LayoutError>(())
//! ```

pub mod buffer;
pub mod describe;
pub mod error;
pub mod layout;
pub mod structs;
pub mod types;
pub mod value;

// Main API re-exports
pub use buffer::ByteBuffer;
pub use describe::{FieldDescription, LayoutDescription};
pub use error::{LayoutError, Result};
pub use layout::{align_up, compute_layout, ComputedLayout};
pub use structs::{Field, StructInstance, StructType, StructTypeBuilder};
pub use types::{array_of, ref_type, ArrayType, PointerType, Primitive, TypeDescriptor, TypeRef};
pub use value::Value;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Layout constants
pub mod config {
    /// Size of a pointer slot on the host
    pub const POINTER_SIZE: usize = std::mem::size_of::<*const u8>();

    /// Alignment of a pointer slot on the host
    pub const POINTER_ALIGNMENT: usize = std::mem::align_of::<*const u8>();

    /// Alignment reported by a struct without fields
    pub const EMPTY_STRUCT_ALIGNMENT: usize = 1;

    /// Field names taken by the instance accessors: `ref` returns the
    /// backing buffer, `pointer` is the buffer handle itself
    pub const RESERVED_FIELD_NAMES: [&str; 2] = ["ref", "pointer"];
}
