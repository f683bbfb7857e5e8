use core::{
    mem::{self, MaybeUninit},
    ptr::NonNull,
    slice,
};
use std::alloc::{alloc, dealloc, Layout};

use static_assertions::{assert_not_impl_any, const_assert_eq};

use crate::error::TryReserveError;

/// Owned, uninitialized storage for exactly `cap` elements of `T`.
///
/// The buffer tracks no element lifetime: from its own point of view every
/// slot is uninitialized at all times, and its destructor releases the raw
/// allocation without running a single element destructor. Whoever owns the
/// buffer is responsible for destroying anything it constructed in the slots
/// before letting the buffer go.
///
/// The buffer is not `Clone` (the handle is the sole owner of the
/// allocation); moving it transfers ownership, and [`swap`](Self::swap)
/// exchanges two allocations in constant time.
pub struct RawBuffer<T> {
    ptr : NonNull<T>,
    cap : usize,
}

unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    /// An empty buffer: dangling pointer, no allocation.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { ptr: NonNull::dangling(), cap: 0 }
    }

    /// Allocate storage for exactly `capacity` elements.
    ///
    /// A `capacity` of 0, or a zero-sized `T`, performs no allocation at all.
    /// On failure nothing has been allocated.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        if mem::size_of::<T>() == 0 || capacity == 0 {
            return Ok(Self::new());
        }

        let layout = Layout::array::<T>(capacity).map_err(|_| TryReserveError::CapacityOverflow)?;

        // SAFETY: `layout` has non-zero size, checked above.
        let ptr = unsafe { alloc(layout) };
        match NonNull::new(ptr as *mut T) {
            Some(ptr) => Ok(Self { ptr, cap: capacity }),
            None => Err(TryReserveError::AllocError { layout }),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).expect("Failed to allocate memory")
    }

    /// Number of elements the buffer can hold. A zero-sized `T` takes no
    /// storage, so the capacity for it is unbounded.
    #[inline]
    pub fn capacity(&self) -> usize {
        if mem::size_of::<T>() == 0 {
            usize::MAX
        } else {
            self.cap
        }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Address of the slot `offset` elements past the start.
    ///
    /// `offset == capacity` (one past the last slot) is a legal address for
    /// the next free slot, but must never be dereferenced.
    ///
    /// # Safety
    ///
    /// `offset <= capacity`.
    #[inline]
    pub unsafe fn ptr_at(&self, offset: usize) -> *const T {
        debug_assert!(offset <= self.cap || mem::size_of::<T>() == 0);
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// Mutable variant of [`ptr_at`](Self::ptr_at).
    ///
    /// # Safety
    ///
    /// `offset <= capacity`.
    #[inline]
    pub unsafe fn ptr_at_mut(&mut self, offset: usize) -> *mut T {
        debug_assert!(offset <= self.cap || mem::size_of::<T>() == 0);
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// View every slot as possibly-uninitialized memory.
    ///
    /// This is the only safe way to look at a slot: a `&T` into storage the
    /// owner has not constructed yet would be immediate undefined behavior,
    /// a `&MaybeUninit<T>` makes no claim about the contents.
    #[inline]
    pub fn as_uninit_slice(&self) -> &[MaybeUninit<T>] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr() as *const MaybeUninit<T>, self.cap) }
    }

    #[inline]
    pub fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<T>] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr() as *mut MaybeUninit<T>, self.cap) }
    }

    /// Exchange the two buffers' allocations in constant time. No element is
    /// touched.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.cap, &mut other.cap);
    }
}

impl<T> Default for RawBuffer<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if self.cap != 0 && mem::size_of::<T>() != 0 {
            // SAFETY: allocated in `try_with_capacity` with this exact layout.
            unsafe {
                dealloc(
                    self.ptr.as_ptr() as *mut u8,
                    Layout::from_size_align_unchecked(
                        mem::size_of::<T>() * self.cap,
                        mem::align_of::<T>(),
                    ),
                );
            }
        }
    }
}

//--------------------------------------------------------------

// Two owners of one allocation must stay inexpressible.
assert_not_impl_any!(RawBuffer<u8>: Clone, Copy);
const_assert_eq!(mem::size_of::<RawBuffer<u64>>(), 2 * mem::size_of::<usize>());

//--------------------------------------------------------------
