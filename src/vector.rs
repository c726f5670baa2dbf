//! A contiguous, growable array with bidirectional cursors.
//!
//! Positions handed out by [`DynamicArray`] are plain indices tagged with
//! whether they sit at the beginning, in the middle or at the end of the
//! array. They do not borrow the array, so they can be fed back into
//! [`DynamicArray::insert`] and [`DynamicArray::erase`]. Any growth, insertion
//! or removal invalidates every outstanding position; using a stale one is a
//! logic error, never a memory error.

use {
    crate::{
        array::Array,
        error::{CollectionError, Result},
    },
    log::{debug, trace},
    std::{
        fmt::{Debug, Display, Formatter, Result as fmt_Result},
        mem,
        slice,
    },
};

/// Capacity of an array built with [`DynamicArray::new`].
pub const DEFAULT_INITIAL_CAPACITY: usize = 30;

/// Which boundary, if any, a [`Position`] is sitting on.
///
/// On an empty array the only position there is is tagged `End`, even
/// though it is also the beginning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionKind {
    Begin,
    Regular,
    End,
}

/// A detached position inside a [`DynamicArray`].
#[derive(Debug, Clone, Copy)]
pub struct Position {
    index: usize,
    kind: PositionKind,
}

impl Position {
    fn new(index: usize, kind: PositionKind) -> Self {
        Position { index, kind }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> PositionKind {
        self.kind
    }

    pub fn is_begin(&self) -> bool {
        self.kind == PositionKind::Begin
    }

    pub fn is_end(&self) -> bool {
        self.kind == PositionKind::End
    }
}

// all end positions are the same position
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        (self.is_end() && other.is_end()) || self.index == other.index
    }
}

impl Eq for Position {}

/// size: usize,
///   number of initialised slots at the front of `buf`
/// buf: Array<T>,
///   the backing storage, its capacity is the array's capacity
pub struct DynamicArray<T> {
    buf: Array<T>,
    size: usize,
}

// Public methods
impl<T> DynamicArray<T> {
    /// Creates an empty array with room for [`DEFAULT_INITIAL_CAPACITY`] values
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// Creates an empty array with room for exactly `capacity` values
    pub fn with_capacity(capacity: usize) -> Self {
        DynamicArray {
            buf: Array::new(capacity),
            size: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.size) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.size) }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Pushes `item` to the back of the array, amortised O(1)
    pub fn append(&mut self, item: T) {
        self.grow_if_full();
        unsafe { self.buf.write(self.size, item) }
        self.size += 1;
    }

    /// Pushes `item` to the front of the array, shifting everything right
    pub fn prepend(&mut self, item: T) {
        self.grow_if_full();
        unsafe {
            self.buf.shift(0, 1, self.size);
            self.buf.write(0, item);
        }
        self.size += 1;
    }

    /// Inserts `item` so that it ends up at `position`, shifting the rest right.
    pub fn insert(&mut self, position: Position, item: T) -> Result<()> {
        // the index has to be taken before growing, the buffer moves on reallocation
        let index = position.index();
        if index > self.size {
            return Err(CollectionError::position("insert position is past the end"));
        }
        self.grow_if_full();
        unsafe {
            self.buf.shift(index, index + 1, self.size - index);
            self.buf.write(index, item);
        }
        self.size += 1;
        Ok(())
    }

    /// Removes and returns the first value
    pub fn pop_first(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(CollectionError::empty("pop_first"));
        }
        Ok(self.remove_at(0))
    }

    /// Removes and returns the last value
    pub fn pop_last(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(CollectionError::empty("pop_last"));
        }
        self.size -= 1;
        Ok(unsafe { self.buf.read(self.size) })
    }

    /// Removes and returns the value at `position`.
    pub fn erase(&mut self, position: Position) -> Result<T> {
        if self.is_empty() {
            return Err(CollectionError::position("cannot erase from empty collection"));
        }
        if position.is_end() || position.index() >= self.size {
            return Err(CollectionError::position("cannot erase end"));
        }
        Ok(self.remove_at(position.index()))
    }

    /// Removes every value in `[first_included, last_excluded)`, closing the
    /// gap with a single move of the tail.
    pub fn erase_range(&mut self, first_included: Position, last_excluded: Position) -> Result<()> {
        if first_included == last_excluded {
            return Ok(());
        }
        let (start, end) = (first_included.index(), last_excluded.index());
        if start > end || end > self.size {
            return Err(CollectionError::position("range does not lie within the collection"));
        }
        trace!("erasing [{}, {}) of {} values", start, end, self.size);

        let tail = self.size - end;
        // if a destructor panics the tail leaks rather than being dropped twice
        self.size = start;
        unsafe {
            self.buf.drop_range(start, end);
            self.buf.shift(end, start, tail);
        }
        self.size = start + tail;
        Ok(())
    }

    /// Drops every value, keeping the capacity
    pub fn clear(&mut self) {
        let size = mem::replace(&mut self.size, 0);
        unsafe { self.buf.drop_range(0, size) }
    }

    /// Replaces the contents of `self` with those of `other`, leaving `other`
    /// empty. No value is copied or cloned.
    pub fn move_from(&mut self, other: &mut Self) {
        trace!("moving {} values out of another array", other.size);
        *self = mem::take(other);
    }

    /// The first position, which is also the end on an empty array
    pub fn begin_position(&self) -> Position {
        if self.is_empty() {
            Position::new(0, PositionKind::End)
        } else {
            Position::new(0, PositionKind::Begin)
        }
    }

    /// The position one past the last value, derived from the current size
    pub fn end_position(&self) -> Position {
        Position::new(self.size, PositionKind::End)
    }

    /// A correctly tagged position for `index`, which may be anything up to and including the size
    pub fn position_at(&self, index: usize) -> Result<Position> {
        if index > self.size {
            return Err(CollectionError::position("index is past the end"));
        }
        Ok(self.tag(index))
    }

    /// The position after `position`.
    pub fn advance(&self, position: Position) -> Result<Position> {
        if position.is_end() || position.index() >= self.size {
            return Err(CollectionError::position("cannot increment end iterator"));
        }
        Ok(self.tag(position.index() + 1))
    }

    /// The position before `position`.
    pub fn retreat(&self, position: Position) -> Result<Position> {
        if position.is_begin() || position.index() == 0 {
            return Err(CollectionError::position("cannot decrement begin iterator"));
        }
        if position.index() > self.size {
            return Err(CollectionError::position("position is past the end"));
        }
        Ok(self.tag(position.index() - 1))
    }

    pub fn get_at(&self, position: Position) -> Result<&T> {
        self.check_dereferenceable(position)?;
        Ok(unsafe { self.buf.get(position.index()) })
    }

    pub fn get_at_mut(&mut self, position: Position) -> Result<&mut T> {
        self.check_dereferenceable(position)?;
        Ok(unsafe { self.buf.get_mut(position.index()) })
    }

    pub fn begin(&self) -> Iter<'_, T> {
        Iter { array: self, position: self.begin_position() }
    }

    pub fn end(&self) -> Iter<'_, T> {
        Iter { array: self, position: self.end_position() }
    }

    pub fn begin_mut(&mut self) -> IterMut<'_, T> {
        let position = self.begin_position();
        IterMut { array: self, position }
    }

    pub fn end_mut(&mut self) -> IterMut<'_, T> {
        let position = self.end_position();
        IterMut { array: self, position }
    }

    /// Same as [`DynamicArray::begin`]
    pub fn iter(&self) -> Iter<'_, T> {
        self.begin()
    }
}

// Private methods
impl<T> DynamicArray<T> {
    fn grow_if_full(&mut self) {
        if self.size + 1 > self.capacity() {
            // doubling zero would never make room
            let new_capacity = match self.capacity().checked_mul(2) {
                Some(0) => 1,
                Some(n) => n,
                None => panic!("capacity overflow"),
            };
            debug!("growing DynamicArray from {} to {} slots", self.capacity(), new_capacity);
            unsafe { self.buf.resize(new_capacity, self.size) }
        }
    }

    /// Backend for the removals that close the gap
    /// reads out the value at `index` and shifts everything after it left
    fn remove_at(&mut self, index: usize) -> T {
        unsafe {
            let value = self.buf.read(index);
            self.buf.shift(index + 1, index, self.size - index - 1);
            self.size -= 1;
            value
        }
    }

    fn tag(&self, index: usize) -> Position {
        let kind = if index >= self.size {
            PositionKind::End
        } else if index == 0 {
            PositionKind::Begin
        } else {
            PositionKind::Regular
        };
        Position::new(index, kind)
    }

    fn check_dereferenceable(&self, position: Position) -> Result<()> {
        if position.is_end() || position.index() >= self.size {
            return Err(CollectionError::position("end iterator cannot be dereferenced"));
        }
        Ok(())
    }
}

/// A read-only cursor over a [`DynamicArray`].
///
/// As an [`Iterator`] it yields every value from its current position up to the end.
pub struct Iter<'a, T> {
    array: &'a DynamicArray<T>,
    position: Position,
}

impl<'a, T> Iter<'a, T> {
    /// The value under the cursor
    pub fn get(&self) -> Result<&'a T> {
        self.array.get_at(self.position)
    }

    pub fn move_next(&mut self) -> Result<()> {
        self.position = self.array.advance(self.position)?;
        Ok(())
    }

    pub fn move_prev(&mut self) -> Result<()> {
        self.position = self.array.retreat(self.position)?;
        Ok(())
    }

    /// A cursor `delta` slots away from this one
    pub fn offset(&self, delta: isize) -> Result<Self> {
        let index = offset_index(self.position.index(), delta)?;
        Ok(Iter { array: self.array, position: self.array.position_at(index)? })
    }

    /// Detaches the position, e.g. to pass it to [`DynamicArray::erase`]
    pub fn pos(&self) -> Position {
        self.position
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter { array: self.array, position: self.position }
    }
}

impl<'a, T> PartialEq for Iter<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.get().ok()?;
        self.position = self.array.tag(self.position.index() + 1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.size().saturating_sub(self.position.index());
        let remaining = if self.position.is_end() { 0 } else { remaining };
        (remaining, Some(remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

/// A cursor over a [`DynamicArray`] that can modify the value under it.
pub struct IterMut<'a, T> {
    array: &'a mut DynamicArray<T>,
    position: Position,
}

impl<'a, T> IterMut<'a, T> {
    pub fn get(&self) -> Result<&T> {
        self.array.get_at(self.position)
    }

    pub fn get_mut(&mut self) -> Result<&mut T> {
        self.array.get_at_mut(self.position)
    }

    pub fn move_next(&mut self) -> Result<()> {
        self.position = self.array.advance(self.position)?;
        Ok(())
    }

    pub fn move_prev(&mut self) -> Result<()> {
        self.position = self.array.retreat(self.position)?;
        Ok(())
    }

    /// Moves the cursor `delta` slots
    pub fn seek(&mut self, delta: isize) -> Result<()> {
        let index = offset_index(self.position.index(), delta)?;
        self.position = self.array.position_at(index)?;
        Ok(())
    }

    /// A read-only view of the same cursor
    pub fn as_iter(&self) -> Iter<'_, T> {
        Iter { array: &*self.array, position: self.position }
    }

    pub fn pos(&self) -> Position {
        self.position
    }
}

fn offset_index(index: usize, delta: isize) -> Result<usize> {
    let target = if delta < 0 {
        index.checked_sub(delta.unsigned_abs())
    } else {
        index.checked_add(delta as usize)
    };
    target.ok_or_else(|| CollectionError::position("offset moves before the beginning"))
}

/// An iterator that moves out of a [`DynamicArray`]
pub struct IntoIter<T> {
    array: DynamicArray<T>,
    next: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next == self.array.size {
            None
        } else {
            self.next += 1;
            Some(unsafe { self.array.buf.read(self.next - 1) })
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.size - self.next;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // the prefix was moved out, only the rest still needs dropping
        let (next, size) = (self.next, mem::replace(&mut self.array.size, 0));
        unsafe { self.array.buf.drop_range(next, size) }
    }
}

// Trait implementations
impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    fn clone(&self) -> Self {
        let mut arr = Self::with_capacity(self.capacity());
        arr.extend(self.iter().cloned());
        arr
    }

    fn clone_from(&mut self, other: &Self) {
        self.clear();
        if self.capacity() < other.size {
            unsafe { self.buf.resize(other.size, 0) }
        }
        self.extend(other.iter().cloned());
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: Debug> Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt_Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Display> Display for DynamicArray<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt_Result {
        write!(f, "[")?;
        for (index, value) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<U: IntoIterator<Item = T>>(&mut self, other: U) {
        for value in other {
            self.append(value);
        }
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<U: IntoIterator<Item = T>>(iter: U) -> Self {
        let iter = iter.into_iter();
        let mut arr = Self::with_capacity(iter.size_hint().0);
        arr.extend(iter);
        arr
    }
}

impl<T, const N: usize> From<[T; N]> for DynamicArray<T> {
    fn from(values: [T; N]) -> Self {
        let mut arr = Self::with_capacity(N);
        arr.extend(values);
        arr
    }
}

impl<T> From<Vec<T>> for DynamicArray<T> {
    fn from(values: Vec<T>) -> Self {
        let mut arr = Self::with_capacity(values.len());
        arr.extend(values);
        arr
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { array: self, next: 0 }
    }
}
