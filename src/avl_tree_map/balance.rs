use super::AvlTreeMap;

impl<K, V> AvlTreeMap<K, V> {
    /// Returns the number of nodes on the longest path from the root to a leaf.
    ///
    /// An empty map has height 0 and a single entry has height 1. The AVL invariant keeps the
    /// height below 1.45 log<sub>2</sub>(n + 2), which bounds the number of comparisons any
    /// lookup performs.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.height(), 0);
    ///
    /// // Sorted input would turn an unbalanced tree into a list of height 7.
    /// for k in 1..=7 {
    ///     map.insert(k, ());
    /// }
    /// assert_eq!(map.height(), 3);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }
}
