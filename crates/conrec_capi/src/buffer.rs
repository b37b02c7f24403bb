//! Heap buffers handed across the C boundary.
//!
//! Every buffer is preceded by a 16 byte header recording the size of the whole allocation, so
//! [`release`] can free any of them given only the data pointer.

use std::{
    alloc::{self, Layout},
    mem,
    ptr::{self, NonNull},
};

const HEADER: usize = 16;

/// An exported buffer that is released on drop until ownership is passed to the caller.
#[derive(Debug)]
pub(crate) struct ExportBuffer<T> {
    data: NonNull<T>,
    len: usize,
}

impl<T: Copy> ExportBuffer<T> {
    /// Copies `items` into a fresh allocation. Returns `None` if the allocation fails.
    pub(crate) fn copy_from(items: &[T]) -> Option<Self> {
        debug_assert!(mem::align_of::<T>() <= HEADER);
        let bytes = mem::size_of::<T>()
            .checked_mul(items.len())?
            .checked_add(HEADER)?;
        let layout = Layout::from_size_align(bytes, HEADER).ok()?;
        // SAFETY: the layout is never zero-sized because it includes the header.
        let base = unsafe { alloc::alloc(layout) };
        if base.is_null() {
            return None;
        }
        // SAFETY: `base` points to `bytes` writable bytes aligned to `HEADER`, which is enough for
        // the size record and for `items.len()` values of `T` after the header.
        unsafe {
            base.cast::<usize>().write(bytes);
            let data = base.add(HEADER).cast::<T>();
            ptr::copy_nonoverlapping(items.as_ptr(), data, items.len());
            Some(Self {
                data: NonNull::new_unchecked(data),
                len: items.len(),
            })
        }
    }
}

impl<T> ExportBuffer<T> {
    #[cfg(test)]
    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: `data` holds `len` initialized values for as long as `self` lives.
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    /// Number of elements.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Gives up ownership. The pointer must eventually be passed to [`release`].
    pub(crate) fn into_raw(self) -> *mut T {
        let data = self.data.as_ptr();
        mem::forget(self);
        data
    }
}

impl<T> Drop for ExportBuffer<T> {
    fn drop(&mut self) {
        // SAFETY: `data` was produced by `copy_from` and has not been released.
        unsafe { release(self.data.as_ptr().cast()) }
    }
}

/// Frees a buffer produced by [`ExportBuffer`]. Null is ignored.
///
/// # Safety
///
/// `data` must be null or a pointer obtained from [`ExportBuffer::into_raw`] that has not been
/// released yet.
pub(crate) unsafe fn release(data: *mut u8) {
    if data.is_null() {
        return;
    }
    // SAFETY: the caller guarantees `data` sits `HEADER` bytes into a live allocation whose first
    // word is the size it was allocated with.
    unsafe {
        let base = data.sub(HEADER);
        let bytes = base.cast::<usize>().read();
        alloc::dealloc(base, Layout::from_size_align_unchecked(bytes, HEADER));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_items() {
        let buffer = ExportBuffer::copy_from(&[1.5_f64, -2.0, 3.25]).unwrap();
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.as_slice(), &[1.5, -2.0, 3.25]);
    }

    #[test]
    fn empty_buffer_is_not_null() {
        let buffer = ExportBuffer::<usize>::copy_from(&[]).unwrap();
        assert_eq!(buffer.len(), 0);
        let raw = buffer.into_raw();
        assert!(!raw.is_null());
        assert_eq!(raw as usize % HEADER, 0);
        unsafe { release(raw.cast()) };
    }

    #[test]
    fn released_after_into_raw() {
        let raw = ExportBuffer::copy_from(&[7_usize; 100]).unwrap().into_raw();
        assert_eq!(unsafe { *raw.add(99) }, 7);
        unsafe { release(raw.cast()) };
    }

    #[test]
    fn null_is_ignored() {
        unsafe { release(ptr::null_mut()) };
    }
}
