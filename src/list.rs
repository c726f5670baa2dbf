//! A doubly linked list bounded by two permanent guard nodes.
//!
//! Nodes live in an arena owned by the list and refer to each other by slot
//! index. Slot 0 is the front guard and slot 1 the back guard; neither ever
//! holds a value, so splicing next to the first or last element needs no
//! special casing. The back guard doubles as the end position.
//!
//! Erasing or popping a node invalidates positions that refer to it. A freed
//! slot may be reused by a later insertion, at which point a stale position
//! silently refers to the new node.

use {
    crate::error::{CollectionError, Result},
    log::trace,
    std::{
        fmt::{Debug, Display, Formatter, Result as fmt_Result},
        mem,
    },
};

type NodeId = usize;

const FRONT_GUARD: NodeId = 0;
const BACK_GUARD: NodeId = 1;

// room an emptied list keeps so push/pop churn around empty doesn't reallocate
const SLOTS_KEPT_WHEN_EMPTY: usize = 16;

#[derive(Debug, Clone, Copy)]
struct Links {
    prev: NodeId,
    next: NodeId,
}

enum Slot<T> {
    Guard(Links),
    Value { links: Links, value: T },
    Vacant { next_free: Option<NodeId> },
}

/// A detached position inside a [`LinkedList`]: the node it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    node: NodeId,
}

impl Position {
    pub fn is_end(&self) -> bool {
        self.node == BACK_GUARD
    }
}

/// slots: Vec<Slot<T>>,
///   the arena, the first two slots are the guards
/// free: Option<NodeId>,
///   head of the chain of vacant slots
/// size: usize,
///   number of value nodes linked between the guards
pub struct LinkedList<T> {
    slots: Vec<Slot<T>>,
    free: Option<NodeId>,
    size: usize,
}

// Public methods
impl<T> LinkedList<T> {
    /// Creates an empty list, guards collapsed onto each other
    pub fn new() -> Self {
        let collapsed = Links { prev: FRONT_GUARD, next: BACK_GUARD };
        LinkedList {
            slots: vec![Slot::Guard(collapsed), Slot::Guard(collapsed)],
            free: None,
            size: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn front(&self) -> Option<&T> {
        self.value(self.first())
    }

    pub fn back(&self) -> Option<&T> {
        self.value(self.last())
    }

    /// Pushes `item` to the back of the list
    pub fn append(&mut self, item: T) {
        self.insert_between(self.last(), BACK_GUARD, item);
    }

    /// Pushes `item` to the front of the list
    pub fn prepend(&mut self, item: T) {
        self.insert_between(FRONT_GUARD, self.first(), item);
    }

    /// Inserts `item` right before `position`, which may be the end.
    pub fn insert(&mut self, position: Position, item: T) -> Result<()> {
        let right = self.check_linked(position)?;
        let left = self.links(right).prev;
        self.insert_between(left, right, item);
        Ok(())
    }

    /// Removes and returns the first value
    pub fn pop_first(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(CollectionError::empty("pop_first"));
        }
        Ok(self.unlink(self.first()))
    }

    /// Removes and returns the last value
    pub fn pop_last(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(CollectionError::empty("pop_last"));
        }
        Ok(self.unlink(self.last()))
    }

    /// Removes and returns the value at `position`.
    pub fn erase(&mut self, position: Position) -> Result<T> {
        if self.is_empty() {
            return Err(CollectionError::position("cannot erase from empty collection"));
        }
        let node = self.check_linked(position)?;
        if node == BACK_GUARD {
            return Err(CollectionError::position("cannot erase element on end iterator"));
        }
        Ok(self.unlink(node))
    }

    /// Removes every value in `[first_included, last_excluded)`.
    ///
    /// The node before `first_included` is linked straight to `last_excluded`
    /// and only then are the detached nodes freed.
    pub fn erase_range(&mut self, first_included: Position, last_excluded: Position) -> Result<()> {
        let first = self.check_linked(first_included)?;
        let last = self.check_linked(last_excluded)?;

        let mut count = 0;
        let mut node = first;
        while node != last {
            if node == BACK_GUARD {
                return Err(CollectionError::position("range end is not reachable from its start"));
            }
            node = self.links(node).next;
            count += 1;
        }
        if count == 0 {
            return Ok(());
        }
        trace!("erasing {} of {} list nodes", count, self.size);

        let before = self.links(first).prev;
        self.collapse(before, last);
        // the detached nodes still point forward, walk them to free each one
        let mut node = first;
        while node != last {
            let next = self.links(node).next;
            self.release(node);
            node = next;
        }
        self.size -= count;
        self.reset_if_drained();
        Ok(())
    }

    /// Drops every value and collapses the guards
    pub fn clear(&mut self) {
        trace!("clearing {} list nodes", self.size);
        self.size = 0;
        self.reset_if_drained();
    }

    /// Replaces the contents of `self` with the chain of `other`, leaving
    /// `other` collapsed. Nodes are handed over as a whole, no value is moved
    /// one by one.
    pub fn move_from(&mut self, other: &mut Self) {
        trace!("moving {} list nodes out of another list", other.size);
        *self = mem::take(other);
    }

    /// The first value node, or the end on an empty list
    pub fn begin_position(&self) -> Position {
        Position { node: self.first() }
    }

    /// The back guard, which is the same node for the whole life of the list
    pub fn end_position(&self) -> Position {
        Position { node: BACK_GUARD }
    }

    /// The position after `position`.
    pub fn advance(&self, position: Position) -> Result<Position> {
        let node = self.check_linked(position)?;
        if node == BACK_GUARD {
            return Err(CollectionError::position("cannot increment end iterator"));
        }
        Ok(Position { node: self.links(node).next })
    }

    /// The position before `position`.
    pub fn retreat(&self, position: Position) -> Result<Position> {
        let node = self.check_linked(position)?;
        if node == self.first() {
            return Err(CollectionError::position("cannot decrement begin iterator"));
        }
        Ok(Position { node: self.links(node).prev })
    }

    pub fn get_at(&self, position: Position) -> Result<&T> {
        match self.slots.get(position.node) {
            Some(Slot::Value { value, .. }) => Ok(value),
            _ => Err(CollectionError::position("end iterator cannot be dereferenced")),
        }
    }

    pub fn get_at_mut(&mut self, position: Position) -> Result<&mut T> {
        match self.slots.get_mut(position.node) {
            Some(Slot::Value { value, .. }) => Ok(value),
            _ => Err(CollectionError::position("end iterator cannot be dereferenced")),
        }
    }

    pub fn begin(&self) -> Iter<'_, T> {
        Iter { list: self, position: self.begin_position() }
    }

    pub fn end(&self) -> Iter<'_, T> {
        Iter { list: self, position: self.end_position() }
    }

    pub fn begin_mut(&mut self) -> IterMut<'_, T> {
        let position = self.begin_position();
        IterMut { list: self, position }
    }

    pub fn end_mut(&mut self) -> IterMut<'_, T> {
        let position = self.end_position();
        IterMut { list: self, position }
    }

    /// Same as [`LinkedList::begin`]
    pub fn iter(&self) -> Iter<'_, T> {
        self.begin()
    }
}

// Private methods
impl<T> LinkedList<T> {
    fn first(&self) -> NodeId {
        self.links(FRONT_GUARD).next
    }

    fn last(&self) -> NodeId {
        self.links(BACK_GUARD).prev
    }

    fn value(&self, node: NodeId) -> Option<&T> {
        match &self.slots[node] {
            Slot::Value { value, .. } => Some(value),
            _ => None,
        }
    }

    fn links(&self, node: NodeId) -> Links {
        match &self.slots[node] {
            Slot::Guard(links) | Slot::Value { links, .. } => *links,
            Slot::Vacant { .. } => unreachable!("vacant slot {} is linked into the list", node),
        }
    }

    fn links_mut(&mut self, node: NodeId) -> &mut Links {
        match &mut self.slots[node] {
            Slot::Guard(links) | Slot::Value { links, .. } => links,
            Slot::Vacant { .. } => unreachable!("vacant slot {} is linked into the list", node),
        }
    }

    /// Accepts value nodes and the back guard, the only nodes a position may name
    fn check_linked(&self, position: Position) -> Result<NodeId> {
        match self.slots.get(position.node) {
            Some(Slot::Value { .. }) => Ok(position.node),
            Some(Slot::Guard(_)) if position.node == BACK_GUARD => Ok(position.node),
            _ => Err(CollectionError::position("position does not refer to a node of this list")),
        }
    }

    fn collapse(&mut self, left: NodeId, right: NodeId) {
        self.links_mut(left).next = right;
        self.links_mut(right).prev = left;
    }

    fn insert_between(&mut self, left: NodeId, right: NodeId, value: T) {
        let slot = Slot::Value { links: Links { prev: left, next: right }, value };
        let node = match self.free {
            Some(node) => {
                if let Slot::Vacant { next_free } = mem::replace(&mut self.slots[node], slot) {
                    self.free = next_free;
                }
                node
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };
        self.links_mut(left).next = node;
        self.links_mut(right).prev = node;
        self.size += 1;
    }

    /// Backend for the single node removals
    fn unlink(&mut self, node: NodeId) -> T {
        let Links { prev, next } = self.links(node);
        self.collapse(prev, next);
        self.size -= 1;
        let value = self.release(node);
        self.reset_if_drained();
        value
    }

    /// An empty list needs no vacant slots, give them back
    fn reset_if_drained(&mut self) {
        if self.size == 0 {
            self.slots.truncate(2);
            self.slots.shrink_to(SLOTS_KEPT_WHEN_EMPTY);
            self.collapse(FRONT_GUARD, BACK_GUARD);
            self.free = None;
        }
    }

    /// Frees a value node that is no longer reachable, returning its value
    fn release(&mut self, node: NodeId) -> T {
        let vacant = Slot::Vacant { next_free: self.free };
        match mem::replace(&mut self.slots[node], vacant) {
            Slot::Value { value, .. } => {
                self.free = Some(node);
                value
            }
            _ => unreachable!("slot {} released without holding a value", node),
        }
    }
}

/// A read-only cursor over a [`LinkedList`].
///
/// As an [`Iterator`] it yields every value from its current position up to the end.
pub struct Iter<'a, T> {
    list: &'a LinkedList<T>,
    position: Position,
}

impl<'a, T> Iter<'a, T> {
    pub fn get(&self) -> Result<&'a T> {
        self.list.get_at(self.position)
    }

    pub fn move_next(&mut self) -> Result<()> {
        self.position = self.list.advance(self.position)?;
        Ok(())
    }

    pub fn move_prev(&mut self) -> Result<()> {
        self.position = self.list.retreat(self.position)?;
        Ok(())
    }

    /// A cursor `delta` nodes away from this one, walking one node at a time
    pub fn offset(&self, delta: isize) -> Result<Self> {
        let mut it = self.clone();
        for _ in 0..delta.unsigned_abs() {
            if delta < 0 {
                it.move_prev()?;
            } else {
                it.move_next()?;
            }
        }
        Ok(it)
    }

    pub fn pos(&self) -> Position {
        self.position
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter { list: self.list, position: self.position }
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
        self.position = Position { node: self.list.links(self.position.node).next };
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.position.is_end() {
            (0, Some(0))
        } else {
            (1, Some(self.list.size))
        }
    }
}

/// A cursor over a [`LinkedList`] that can modify the value under it.
pub struct IterMut<'a, T> {
    list: &'a mut LinkedList<T>,
    position: Position,
}

impl<'a, T> IterMut<'a, T> {
    pub fn get(&self) -> Result<&T> {
        self.list.get_at(self.position)
    }

    pub fn get_mut(&mut self) -> Result<&mut T> {
        self.list.get_at_mut(self.position)
    }

    pub fn move_next(&mut self) -> Result<()> {
        self.position = self.list.advance(self.position)?;
        Ok(())
    }

    pub fn move_prev(&mut self) -> Result<()> {
        self.position = self.list.retreat(self.position)?;
        Ok(())
    }

    /// Moves the cursor `delta` nodes, one node at a time. On failure the
    /// cursor stays where it was.
    pub fn seek(&mut self, delta: isize) -> Result<()> {
        let mut position = self.position;
        for _ in 0..delta.unsigned_abs() {
            position = if delta < 0 {
                self.list.retreat(position)?
            } else {
                self.list.advance(position)?
            };
        }
        self.position = position;
        Ok(())
    }

    /// A read-only view of the same cursor
    pub fn as_iter(&self) -> Iter<'_, T> {
        Iter { list: &*self.list, position: self.position }
    }

    pub fn pos(&self) -> Position {
        self.position
    }
}

/// An iterator that moves out of a [`LinkedList`], from either end
pub struct IntoIter<T> {
    list: LinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_first().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.size, Some(self.list.size))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_last().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

// Trait implementations
impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for LinkedList<T> {
    fn clone(&self) -> Self {
        let mut list = Self::new();
        list.extend(self.iter().cloned());
        list
    }

    fn clone_from(&mut self, other: &Self) {
        self.clear();
        self.extend(other.iter().cloned());
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && Iterator::eq(self.iter(), other.iter())
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

impl<T: Debug> Debug for LinkedList<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt_Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Display> Display for LinkedList<T> {
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

impl<T> Extend<T> for LinkedList<T> {
    fn extend<U: IntoIterator<Item = T>>(&mut self, other: U) {
        for value in other {
            self.append(value);
        }
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<U: IntoIterator<Item = T>>(iter: U) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T, const N: usize> From<[T; N]> for LinkedList<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T> From<Vec<T>> for LinkedList<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}
