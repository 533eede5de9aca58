//! Shared byte buffers backing struct instances
//!
//! A [`ByteBuffer`] is a handle to a fixed-length byte region. Cloning the
//! handle or slicing it produces another view of the same storage, so a
//! write through one view is immediately visible through every other view
//! that covers the same bytes. Nested struct fields rely on this: a nested
//! instance is nothing more than a slice of its parent's buffer.

use std::{cell::RefCell, fmt, rc::Rc};

use crate::error::{LayoutError, Result};

/// A sliceable, shared view over a fixed-length byte region
#[derive(Clone)]
pub struct ByteBuffer {
    storage: Rc<RefCell<Box<[u8]>>>,
    start: usize,
    len: usize,
}

impl ByteBuffer {
    /// Allocate a zero-filled buffer of `len` bytes
    pub fn zeroed(len: usize) -> Self {
        Self::from_vec(vec![0; len])
    }

    /// Take ownership of existing bytes
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let len = bytes.len();
        Self {
            storage: Rc::new(RefCell::new(bytes.into_boxed_slice())),
            start: 0,
            len,
        }
    }

    /// Length of this view in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this view covers no bytes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset of this view inside the underlying storage
    pub fn storage_offset(&self) -> usize {
        self.start
    }

    /// View from `offset` to the end of this view
    pub fn slice(&self, offset: usize) -> Result<Self> {
        if offset > self.len {
            return Err(LayoutError::out_of_bounds(offset, 0, self.len));
        }
        self.slice_range(offset, self.len - offset)
    }

    /// View of `len` bytes starting at `offset`
    pub fn slice_range(&self, offset: usize, len: usize) -> Result<Self> {
        self.check_bounds(offset, len)?;
        Ok(Self {
            storage: Rc::clone(&self.storage),
            start: self.start + offset,
            len,
        })
    }

    /// Copy `out.len()` bytes starting at `offset` into `out`
    pub fn read_bytes(&self, offset: usize, out: &mut [u8]) -> Result<()> {
        self.check_bounds(offset, out.len())?;
        let begin = self.start + offset;
        out.copy_from_slice(&self.storage.borrow()[begin..begin + out.len()]);
        Ok(())
    }

    /// Read a fixed number of bytes starting at `offset`
    pub fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        self.read_bytes(offset, &mut out)?;
        Ok(out)
    }

    /// Write `data` starting at `offset`
    pub fn write_bytes(&self, offset: usize, data: &[u8]) -> Result<()> {
        self.check_bounds(offset, data.len())?;
        let begin = self.start + offset;
        self.storage.borrow_mut()[begin..begin + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Set every byte of this view to `byte`
    pub fn fill(&self, byte: u8) {
        let begin = self.start;
        self.storage.borrow_mut()[begin..begin + self.len].fill(byte);
    }

    /// Copy the bytes of this view out
    pub fn to_vec(&self) -> Vec<u8> {
        self.storage.borrow()[self.start..self.start + self.len].to_vec()
    }

    /// Whether both views share the same underlying storage
    pub fn shares_storage(&self, other: &ByteBuffer) -> bool {
        Rc::ptr_eq(&self.storage, &other.storage)
    }

    fn check_bounds(&self, offset: usize, size: usize) -> Result<()> {
        match offset.checked_add(size) {
            Some(end) if end <= self.len => Ok(()),
            _ => Err(LayoutError::out_of_bounds(offset, size, self.len)),
        }
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("start", &self.start)
            .field("len", &self.len)
            .field("bytes", &self.to_vec())
            .finish()
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }
}
