use super::handle::Handle;

/// Which child slot of its parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    /// The mirror image of this side.
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// The change in the parent's balance factor when the subtree on this side grows by one.
    #[inline]
    pub(crate) const fn growth(self) -> i8 {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }
}

/// The structural part of a node: everything a position swap exchanges.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Links {
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl Links {
    /// Rewrites every link through `f`.
    pub(crate) fn map(self, f: impl Fn(Handle) -> Handle) -> Self {
        Self {
            parent: self.parent.map(&f),
            left: self.left.map(&f),
            right: self.right.map(&f),
        }
    }
}

/// A tree node carrying its AVL balance factor.
///
/// `balance` is height(right) - height(left). It may read ±2 only while the engine is in the
/// middle of rebalancing the node.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
    balance: i8,
}

impl<K, V> Node<K, V> {
    /// Creates a detached leaf with balance 0.
    pub(crate) const fn new(key: K, value: V, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
            balance: 0,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) const fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) const fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Splits the borrow so the key stays shared while the value is handed out mutably.
    #[inline]
    pub(crate) const fn entry_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    /// Replaces the value, returning the previous one.
    pub(crate) const fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) const fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns the side `child` hangs from, or `None` if it is not a child of this node.
    #[inline]
    pub(crate) fn side_of(&self, child: Handle) -> Option<Side> {
        if self.left == Some(child) {
            Some(Side::Left)
        } else if self.right == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) const fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    #[inline]
    pub(crate) const fn balance(&self) -> i8 {
        self.balance
    }

    #[inline]
    pub(crate) const fn set_balance(&mut self, balance: i8) {
        self.balance = balance;
    }

    /// Adds `delta` to the balance factor and returns the new value.
    #[inline]
    pub(crate) fn adjust_balance(&mut self, delta: i8) -> i8 {
        self.balance += delta;
        debug_assert!((-2..=2).contains(&self.balance), "balance {} out of range", self.balance);
        self.balance
    }

    /// Parent, left and right links, in that order.
    #[inline]
    pub(crate) const fn links(&self) -> Links {
        Links {
            parent: self.parent,
            left: self.left,
            right: self.right,
        }
    }

    /// Overwrites all three links at once, leaving key, value and balance alone.
    #[inline]
    pub(crate) const fn set_links(&mut self, links: Links) {
        self.parent = links.parent;
        self.left = links.left;
        self.right = links.right;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_balanced_leaf() {
        let node = Node::new(7, "seven", None);
        assert!(node.is_leaf());
        assert_eq!(node.balance(), 0);
        assert_eq!(node.parent(), None);
        assert_eq!(*node.key(), 7);
        assert_eq!(*node.value(), "seven");
    }

    #[test]
    fn adjust_balance_accumulates() {
        let mut node = Node::new(1, (), None);
        assert_eq!(node.adjust_balance(Side::Right.growth()), 1);
        assert_eq!(node.adjust_balance(Side::Right.growth()), 2);
        assert_eq!(node.adjust_balance(-3), -1);
        node.set_balance(0);
        assert_eq!(node.balance(), 0);
    }

    #[test]
    fn children_by_side() {
        let (a, b) = (Handle::from_index(3), Handle::from_index(4));
        let mut node = Node::new(1, (), None);
        node.set_child(Side::Left, Some(a));
        node.set_child(Side::Right.opposite().opposite(), Some(b));

        assert_eq!(node.left(), Some(a));
        assert_eq!(node.right(), Some(b));
        assert_eq!(node.side_of(a), Some(Side::Left));
        assert_eq!(node.side_of(b), Some(Side::Right));
        assert_eq!(node.side_of(Handle::from_index(9)), None);
        assert!(!node.is_leaf());
    }

    #[test]
    fn set_links_keeps_payload_and_balance() {
        let mut a = Node::new('a', 1, Some(Handle::from_index(0)));
        a.set_child(Side::Left, Some(Handle::from_index(1)));
        a.set_balance(-1);
        let mut b = Node::new('b', 2, None);
        b.set_child(Side::Right, Some(Handle::from_index(2)));

        let (a_links, b_links) = (a.links(), b.links());
        a.set_links(b_links);
        b.set_links(a_links);

        assert_eq!((*a.key(), *a.value(), a.balance()), ('a', 1, -1));
        assert_eq!(a.parent(), None);
        assert_eq!(a.right(), Some(Handle::from_index(2)));
        assert_eq!(b.parent(), Some(Handle::from_index(0)));
        assert_eq!(b.left(), Some(Handle::from_index(1)));
    }

    #[test]
    fn links_map_renames_handles() {
        let (x, y) = (Handle::from_index(0), Handle::from_index(1));
        let links = Links {
            parent: Some(x),
            left: None,
            right: Some(y),
        };
        let renamed = links.map(|h| if h == x { y } else { h });
        assert_eq!(renamed.parent, Some(y));
        assert_eq!(renamed.left, None);
        assert_eq!(renamed.right, Some(y));
    }
}
