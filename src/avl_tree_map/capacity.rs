use super::AvlTreeMap;
use crate::raw::RawAvlTree;

impl<K, V> AvlTreeMap<K, V> {
    /// Creates an empty map with capacity for at least `capacity` elements.
    ///
    /// Nodes live in one contiguous slot arena, so reserving up front avoids regrowing it while
    /// the map fills. Slots freed by removals are reused before the arena grows again.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, i32> = AvlTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        AvlTreeMap {
            raw: RawAvlTree::with_capacity(capacity),
        }
    }

    /// Returns the number of elements the map can hold without reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeMap;
    ///
    /// let mut map: AvlTreeMap<i32, i32> = AvlTreeMap::with_capacity(32);
    /// assert!(map.capacity() >= 32);
    ///
    /// map.insert(1, 1);
    /// map.remove(&1);
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
