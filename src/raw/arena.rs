use alloc::vec::Vec;

use super::handle::Handle;

#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    // Vacant slots form an intrusive free list.
    Vacant { next_free: Option<Handle> },
}

/// Slot storage for tree nodes.
///
/// Handles stay valid until the element is taken; freed slots are reused last-in first-out.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<Handle>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        let handle = if let Some(handle) = self.free_head {
            let slot = &mut self.slots[handle.to_index()];
            match *slot {
                Slot::Vacant { next_free } => self.free_head = next_free,
                Slot::Occupied(_) => panic!("`Arena::alloc()` - free list points at an occupied slot!"),
            }
            *slot = Slot::Occupied(element);
            handle
        } else {
            assert!(
                self.slots.len() <= Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX + 1
            );
            let handle = Handle::from_index(self.slots.len());
            self.slots.push(Slot::Occupied(element));
            handle
        };
        self.len += 1;
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get()` - `handle` is vacant!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get_mut()` - `handle` is vacant!"),
        }
    }

    /// Removes the element, returning its slot to the free list.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match core::mem::replace(&mut self.slots[handle.to_index()], vacant) {
            Slot::Occupied(element) => {
                self.free_head = Some(handle);
                self.len -= 1;
                element
            }
            Slot::Vacant { next_free } => {
                // Undo before reporting so the free list stays intact.
                self.slots[handle.to_index()] = Slot::Vacant { next_free };
                panic!("`Arena::take()` - `handle` is vacant!");
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }

    /// Mutable access to every slot, indexed by `Handle::to_index`; vacant slots yield `None`.
    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = Option<&mut T>> {
        self.slots.iter_mut().map(|slot| match slot {
            Slot::Occupied(element) => Some(element),
            Slot::Vacant { .. } => None,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn with_capacity_preallocates() {
        let arena: Arena<u32> = Arena::with_capacity(10);
        assert!(arena.capacity() >= 10);
        assert!(arena.is_empty());
    }

    #[test]
    fn freed_slots_are_reused_last_in_first_out() {
        let mut arena = Arena::new();
        let a = arena.alloc('a');
        let b = arena.alloc('b');
        let _c = arena.alloc('c');

        assert_eq!(arena.take(a), 'a');
        assert_eq!(arena.take(b), 'b');
        assert_eq!(arena.len(), 1);

        assert_eq!(arena.alloc('d'), b);
        assert_eq!(arena.alloc('e'), a);
        assert_eq!(*arena.get(a), 'e');
        assert_eq!(*arena.get(b), 'd');
        assert_eq!(arena.len(), 3);
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is vacant!")]
    fn get_after_take_panics() {
        let mut arena = Arena::new();
        let handle = arena.alloc(1u8);
        arena.take(handle);
        let _ = arena.get(handle);
    }

    #[test]
    fn slots_mut_skips_vacant_slots() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        let _b = arena.alloc(2);
        arena.take(a);

        for value in arena.slots_mut().flatten() {
            *value *= 10;
        }
        let seen: Vec<Option<i32>> = arena.slots_mut().map(|slot| slot.copied()).collect();
        assert_eq!(seen, [None, Some(20)]);
    }

    proptest! {
        #[test]
        fn arena_matches_handle_model(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let handle = arena.alloc(value);
                        prop_assert!(model.iter().all(|&(h, _)| h != handle), "handle {:?} handed out twice", handle);
                        model.push((handle, value));
                    }
                    Operation::Overwrite(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        *arena.get_mut(model[index].0) = value;
                        model[index].1 = value;
                    }
                    Operation::Take(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let (handle, expected) = model.swap_remove(index);
                        prop_assert_eq!(arena.take(handle), expected);
                    }
                    Operation::Clear => {
                        arena.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());
                prop_assert_eq!(arena.is_empty(), model.is_empty());

                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        Overwrite(usize, u32),
        Take(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::Overwrite(which, value)),
            10 => any::<usize>().prop_map(Operation::Take),
            1 => Just(Operation::Clear),
        ]
    }
}
