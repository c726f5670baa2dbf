use {
    std::{
        alloc::{alloc, dealloc, handle_alloc_error, Layout},
        marker::PhantomData,
        ptr::{self, copy, copy_nonoverlapping, NonNull},
    },
};

/// A fixed block of `capacity` slots of `T`, none of which are assumed to be
/// initialised.
///
/// `Array<T>` only owns the allocation. Which slots hold live values is the
/// owner's business, so dropping an `Array<T>` frees the memory without
/// running any destructors.
pub(crate) struct Array<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

impl<T> Array<T> {
    /// Allocates room for `capacity` values
    pub(crate) fn new(capacity: usize) -> Self {
        let layout = Self::layout_for_size(capacity);
        // zero sized layouts (no slots, or a zero sized T) never touch the allocator
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            let raw = unsafe { alloc(layout) } as *mut T;
            match NonNull::new(raw) {
                Some(ptr) => ptr,
                None => handle_alloc_error(layout),
            }
        };
        Array { ptr, capacity, _marker: PhantomData }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Moves the first `live` values into a fresh allocation of `new_capacity`
    /// slots and releases the old one.
    ///
    /// # Safety
    /// Slots `[0, live)` must be initialised and `live <= new_capacity`.
    pub(crate) unsafe fn resize(&mut self, new_capacity: usize, live: usize) {
        debug_assert!(live <= new_capacity && live <= self.capacity);
        let mut fresh = Self::new(new_capacity);
        copy_nonoverlapping(self.as_ptr(), fresh.as_mut_ptr(), live);
        // the old allocation goes away with `fresh` once swapped, values are already moved out
        std::mem::swap(self, &mut fresh);
    }

    /// # Safety
    /// `index` must be an initialised slot; it is logically uninitialised afterwards.
    pub(crate) unsafe fn read(&self, index: usize) -> T {
        ptr::read(self.as_ptr().add(index))
    }

    /// # Safety
    /// `index < capacity`. Whatever was in the slot is overwritten without being dropped.
    pub(crate) unsafe fn write(&mut self, index: usize, value: T) {
        ptr::write(self.as_mut_ptr().add(index), value);
    }

    /// # Safety
    /// `index` must be an initialised slot.
    pub(crate) unsafe fn get(&self, index: usize) -> &T {
        &*self.as_ptr().add(index)
    }

    /// # Safety
    /// `index` must be an initialised slot.
    pub(crate) unsafe fn get_mut(&mut self, index: usize) -> &mut T {
        &mut *self.as_mut_ptr().add(index)
    }

    /// Moves `count` slots starting at `from` so they start at `to`. The
    /// ranges may overlap.
    ///
    /// # Safety
    /// Both `[from, from + count)` and `[to, to + count)` must lie within the capacity.
    pub(crate) unsafe fn shift(&mut self, from: usize, to: usize, count: usize) {
        let base = self.as_mut_ptr();
        copy(base.add(from), base.add(to), count);
    }

    /// Drops the values in `[start, end)` in place.
    ///
    /// # Safety
    /// Every slot in the range must be initialised; they are uninitialised afterwards.
    pub(crate) unsafe fn drop_range(&mut self, start: usize, end: usize) {
        let slice = ptr::slice_from_raw_parts_mut(self.as_mut_ptr().add(start), end - start);
        ptr::drop_in_place(slice);
    }

    pub(crate) fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr() as *const T
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }
}

// Private methods
impl<T> Array<T> {
    /// Get a Layout for `size` slots of `T`.
    /// A size that doesn't fit in `isize` bytes is treated like `Vec` treats it.
    fn layout_for_size(size: usize) -> Layout {
        match Layout::array::<T>(size) {
            Ok(layout) => layout,
            Err(_) => panic!("capacity overflow"),
        }
    }
}

// Trait Implementations
impl<T> Drop for Array<T> {
    fn drop(&mut self) {
        let layout = Self::layout_for_size(self.capacity);
        if layout.size() != 0 {
            unsafe { dealloc(self.ptr.as_ptr() as *mut u8, layout) }
        }
    }
}

unsafe impl<T: Send> Send for Array<T> {}
unsafe impl<T: Sync> Sync for Array<T> {}
