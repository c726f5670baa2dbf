//! Two linear sequence containers with the same interface:
//!
//! * [`DynamicArray`], a contiguous buffer that doubles when it runs out of room
//! * [`LinkedList`], a doubly linked chain bounded by two guard nodes
//!
//! Both hand out detached positions (`vector::Position`, `list::Position`)
//! and borrowing cursors (`Iter`, `IterMut`) with explicit begin/end
//! semantics. Stepping past either end, dereferencing the end or erasing it
//! fails with [`CollectionError::InvalidPosition`]; popping from an empty
//! container fails with [`CollectionError::EmptyCollection`].

mod array;
pub mod error;
pub mod list;
pub mod vector;

pub use {
    error::{CollectionError, Result},
    list::LinkedList,
    vector::DynamicArray,
};

#[cfg(test)]
mod tests {
    use {
        crate::{CollectionError, DynamicArray, LinkedList, Result},
        pretty_assertions::assert_eq,
        proptest::prelude::*,
        std::mem,
    };

    // Both containers spell every operation the same way, so one body of
    // tests is stamped out for each of them.
    macro_rules! sequence_contract {
        ($module:ident, $container:ident) => {
            mod $module {
                use super::*;
                use pretty_assertions::assert_eq;

                fn contents<T: Clone>(c: &$container<T>) -> Vec<T> {
                    c.iter().cloned().collect()
                }

                #[test]
                fn appends_keep_order() {
                    let mut c = $container::new();
                    for i in 0..100 {
                        c.append(i);
                    }
                    assert_eq!(c.size(), 100);
                    assert_eq!(contents(&c), (0..100).collect::<Vec<_>>());
                }

                #[test]
                fn pop_first_then_pop_last() -> Result<()> {
                    let mut c = $container::from([1, 2, 3, 4]);
                    assert_eq!(c.pop_first()?, 1);
                    assert_eq!(c.pop_last()?, 4);
                    assert_eq!(c.size(), 2);
                    Ok(())
                }

                #[test]
                fn erase_everything() -> Result<()> {
                    let mut c = $container::from([1, 2, 3]);
                    let (first, last) = (c.begin_position(), c.end_position());
                    c.erase_range(first, last)?;
                    assert!(c.is_empty());
                    assert!(c.begin() == c.end());
                    Ok(())
                }

                #[test]
                fn literal_traversal_and_middle_erase() -> Result<()> {
                    let mut c = $container::from([1, 2, 3]);
                    assert_eq!(contents(&c), vec![1, 2, 3]);
                    let middle = c.begin().offset(1)?.pos();
                    c.erase(middle)?;
                    assert_eq!(contents(&c), vec![1, 3]);
                    Ok(())
                }

                #[test]
                fn manual_cursor_walk() -> Result<()> {
                    let c = $container::from([1, 2, 3]);
                    let mut seen = Vec::new();
                    let mut it = c.begin();
                    while it != c.end() {
                        seen.push(*it.get()?);
                        it.move_next()?;
                    }
                    assert_eq!(seen, vec![1, 2, 3]);

                    let mut backwards = Vec::new();
                    let mut it = c.end();
                    while it != c.begin() {
                        it.move_prev()?;
                        backwards.push(*it.get()?);
                    }
                    assert_eq!(backwards, vec![3, 2, 1]);
                    Ok(())
                }

                #[test]
                fn concrete_scenario() -> Result<()> {
                    let mut c = $container::new();
                    c.append(0);
                    c.append(1);
                    c.append(2);
                    assert_eq!(c.size(), 3);
                    assert_eq!(c.pop_first()?, 0);
                    assert_eq!(contents(&c), vec![1, 2]);
                    c.prepend(9);
                    assert_eq!(contents(&c), vec![9, 1, 2]);
                    let begin = c.begin_position();
                    c.erase(begin)?;
                    assert_eq!(contents(&c), vec![1, 2]);
                    Ok(())
                }

                #[test]
                fn end_never_dereferences() {
                    let empty: $container<i32> = $container::new();
                    assert!(matches!(empty.end().get(), Err(CollectionError::InvalidPosition { .. })));
                    let full = $container::from([1]);
                    assert!(matches!(full.end().get(), Err(CollectionError::InvalidPosition { .. })));
                    assert!(matches!(full.get_at(full.end_position()), Err(CollectionError::InvalidPosition { .. })));
                }

                #[test]
                fn pops_on_empty_leave_size_alone() {
                    let mut c: $container<i32> = $container::new();
                    assert!(matches!(c.pop_first(), Err(CollectionError::EmptyCollection { .. })));
                    assert!(matches!(c.pop_last(), Err(CollectionError::EmptyCollection { .. })));
                    assert_eq!(c.size(), 0);
                    assert!(c.is_empty());
                }

                #[test]
                fn end_position_survives_the_first_append() -> Result<()> {
                    let mut c = $container::new();
                    assert!(c.begin_position().is_end());
                    let end = c.end_position();
                    c.insert(end, 'x')?;
                    assert!(!c.begin_position().is_end());
                    assert_eq!(*c.begin().get()?, 'x');
                    c.pop_last()?;
                    assert!(c.begin_position().is_end());
                    Ok(())
                }

                #[test]
                fn copies_are_independent() -> Result<()> {
                    let original = $container::from([1, 2, 3]);
                    let mut copy = original.clone();
                    copy.append(4);
                    copy.pop_first()?;
                    assert_eq!(contents(&original), vec![1, 2, 3]);
                    assert_eq!(contents(&copy), vec![2, 3, 4]);
                    Ok(())
                }

                #[test]
                fn mutable_cursor_seeks_both_ways() -> Result<()> {
                    let mut c = $container::from([1, 2, 3, 4]);
                    {
                        let mut it = c.begin_mut();
                        it.seek(2)?;
                        *it.get_mut()? = 30;
                        it.seek(-1)?;
                        *it.get_mut()? = 20;
                        it.seek(3)?;
                        assert!(it.pos().is_end());
                        assert!(matches!(it.seek(1), Err(CollectionError::InvalidPosition { .. })));
                        assert!(matches!(it.seek(-5), Err(CollectionError::InvalidPosition { .. })));
                        assert!(it.pos().is_end());
                        it.seek(-4)?;
                        assert_eq!(*it.get()?, 1);
                    }
                    assert_eq!(contents(&c), vec![1, 20, 30, 4]);
                    Ok(())
                }

                #[test]
                fn move_empties_the_source() {
                    let mut source = $container::from([1, 2, 3]);
                    let target = mem::take(&mut source);
                    assert!(source.is_empty());
                    assert_eq!(source.size(), 0);
                    assert_eq!(contents(&target), vec![1, 2, 3]);
                }

                #[derive(Debug, Clone)]
                enum Op {
                    Append(i32),
                    Prepend(i32),
                    PopFirst,
                    PopLast,
                    Insert(usize, i32),
                    Erase(usize),
                    EraseRange(usize, usize),
                }

                fn op() -> impl Strategy<Value = Op> {
                    prop_oneof![
                        any::<i32>().prop_map(Op::Append),
                        any::<i32>().prop_map(Op::Prepend),
                        Just(Op::PopFirst),
                        Just(Op::PopLast),
                        (any::<usize>(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
                        any::<usize>().prop_map(Op::Erase),
                        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::EraseRange(a, b)),
                    ]
                }

                fn apply(c: &mut $container<i32>, model: &mut Vec<i32>, op: Op) -> Result<()> {
                    match op {
                        Op::Append(v) => {
                            c.append(v);
                            model.push(v);
                        }
                        Op::Prepend(v) => {
                            c.prepend(v);
                            model.insert(0, v);
                        }
                        Op::PopFirst => {
                            let expected = if model.is_empty() { None } else { Some(model.remove(0)) };
                            assert_eq!(c.pop_first().ok(), expected);
                        }
                        Op::PopLast => assert_eq!(c.pop_last().ok(), model.pop()),
                        Op::Insert(i, v) => {
                            let i = i % (model.len() + 1);
                            let pos = c.begin().offset(i as isize)?.pos();
                            c.insert(pos, v)?;
                            model.insert(i, v);
                        }
                        Op::Erase(i) => {
                            if !model.is_empty() {
                                let i = i % model.len();
                                let pos = c.begin().offset(i as isize)?.pos();
                                assert_eq!(c.erase(pos)?, model.remove(i));
                            }
                        }
                        Op::EraseRange(a, b) => {
                            let (a, b) = (a % (model.len() + 1), b % (model.len() + 1));
                            let (a, b) = (a.min(b), a.max(b));
                            let first = c.begin().offset(a as isize)?.pos();
                            let last = c.begin().offset(b as isize)?.pos();
                            c.erase_range(first, last)?;
                            model.drain(a..b);
                        }
                    }
                    Ok(())
                }

                proptest! {
                    #[test]
                    fn appended_values_come_back_in_order(values in proptest::collection::vec(any::<i64>(), 0..200)) {
                        let mut c = $container::new();
                        for v in &values {
                            c.append(*v);
                        }
                        prop_assert_eq!(c.size(), values.len());
                        prop_assert_eq!(contents(&c), values);
                    }

                    #[test]
                    fn behaves_like_a_vec(ops in proptest::collection::vec(op(), 0..64)) {
                        let mut c = $container::new();
                        let mut model = Vec::new();
                        for op in ops {
                            apply(&mut c, &mut model, op)?;
                            prop_assert_eq!(c.size(), model.len());
                        }
                        prop_assert_eq!(contents(&c), model);
                    }
                }
            }
        };
    }

    sequence_contract!(dynamic_array, DynamicArray);
    sequence_contract!(linked_list, LinkedList);

    #[test]
    fn containers_agree_on_the_same_script() -> Result<()> {
        let mut arr = DynamicArray::new();
        let mut list = LinkedList::new();
        for i in 0..10 {
            arr.append(i);
            list.append(i);
            if i % 3 == 0 {
                arr.prepend(-i);
                list.prepend(-i);
            }
        }
        assert_eq!(arr.pop_first()?, list.pop_first()?);
        assert_eq!(arr.pop_last()?, list.pop_last()?);

        let at = arr.begin().offset(4)?.pos();
        arr.erase(at)?;
        let at = list.begin().offset(4)?.pos();
        list.erase(at)?;

        assert_eq!(arr.size(), list.size());
        assert!(Iterator::eq(arr.iter(), list.iter()));
        Ok(())
    }
}
