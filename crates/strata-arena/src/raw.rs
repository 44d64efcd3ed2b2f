//! Low-level primitives for chunk storage.
//!
//! [`RawBuffer`] is the only place in the workspace that touches the
//! global allocator directly. Every `unsafe` block carries a `// SAFETY:`
//! comment; the rest of the crate sees a safe, owned byte buffer.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;

use strata_core::MAX_ALIGN;

/// An owned, zero-initialised byte buffer aligned to [`MAX_ALIGN`].
///
/// The buffer never moves or reallocates; its address is stable for its
/// whole lifetime, which is what lets arena blocks report fixed addresses.
pub struct RawBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl RawBuffer {
    /// Allocate `capacity` zeroed bytes at [`MAX_ALIGN`].
    ///
    /// Returns `None` if `capacity` is zero, does not form a valid layout,
    /// or the global allocator is out of memory. Never panics or aborts.
    pub fn zeroed(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        let layout = Layout::from_size_align(capacity, MAX_ALIGN).ok()?;
        // SAFETY: `layout` has a non-zero size (checked above).
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        NonNull::new(ptr).map(|ptr| Self { ptr, layout })
    }

    /// Length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.layout.size()
    }

    /// Always `false`: zero-length buffers are never constructed.
    pub fn is_empty(&self) -> bool {
        self.layout.size() == 0
    }

    /// Address of the first byte.
    pub fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// View the whole buffer.
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` is valid for reads of `layout.size()` bytes, all of
        // which were initialised by `alloc_zeroed`. The shared borrow of
        // `self` prevents concurrent mutation.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.layout.size()) }
    }

    /// Mutably view the whole buffer.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as for `as_slice`; the exclusive borrow of `self`
        // guarantees no other reference into the buffer is live.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.layout.size()) }
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        // SAFETY: `ptr` was returned by `alloc_zeroed` with exactly this
        // layout and has not been freed.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

// SAFETY: `RawBuffer` uniquely owns its allocation, like `Box<[u8]>`.
unsafe impl Send for RawBuffer {}
// SAFETY: shared access only hands out `&[u8]`.
unsafe impl Sync for RawBuffer {}

impl fmt::Debug for RawBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("addr", &format_args!("{:#x}", self.addr()))
            .field("len", &self.len())
            .finish()
    }
}
