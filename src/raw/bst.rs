//! Unbalanced binary-search-tree primitives.
//!
//! Nothing in here looks at balance factors. The balancing engine in `raw_avl_tree` calls these
//! to place, find, unlink and reposition nodes, then repairs balance on its own.

use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::vec::Vec;

use super::handle::Handle;
use super::node::{Node, Side};
use super::raw_avl_tree::RawAvlTree;

/// A child slot: the parent handle and which side of it.
pub(crate) type Slot = (Handle, Side);

/// Result of searching for a key.
pub(crate) enum SearchResult {
    /// The key is stored at this node.
    Found(Handle),
    /// The key is absent; a new leaf for it belongs in this slot (`None` for an empty tree).
    NotFound(Option<Slot>),
}

impl<K, V> RawAvlTree<K, V> {
    /// Walks down from the root comparing against `key`.
    pub(crate) fn search_slot<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut slot = None;
        let mut current = self.root();

        while let Some(handle) = current {
            let node = self.node(handle);
            let side = match key.cmp(node.key().borrow()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return SearchResult::Found(handle),
            };
            slot = Some((handle, side));
            current = node.child(side);
        }

        SearchResult::NotFound(slot)
    }

    /// Returns the handle of the node holding `key`, if any.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.search_slot(key) {
            SearchResult::Found(handle) => Some(handle),
            SearchResult::NotFound(_) => None,
        }
    }

    /// Allocates a leaf and hangs it in `slot`, or makes it the root when `slot` is `None`.
    pub(crate) fn attach_leaf(&mut self, key: K, value: V, slot: Option<Slot>) -> Handle {
        let parent = slot.map(|(parent, _)| parent);
        let leaf = self.nodes.alloc(Node::new(key, value, parent));
        match slot {
            Some((parent, side)) => {
                debug_assert!(self.node(parent).child(side).is_none(), "`attach_leaf()` - slot is occupied!");
                self.node_mut(parent).set_child(side, Some(leaf));
            }
            None => {
                debug_assert!(self.root.is_none(), "`attach_leaf()` - tree already has a root!");
                self.root = Some(leaf);
            }
        }
        leaf
    }

    /// The slot `handle` occupies in its parent, or `None` for the root.
    pub(crate) fn parent_slot(&self, handle: Handle) -> Option<Slot> {
        let parent = self.node(handle).parent()?;
        let side = self
            .node(parent)
            .side_of(handle)
            .expect("`parent_slot()` - parent does not link back to child!");
        Some((parent, side))
    }

    /// Puts `child` into `slot` (the root when `slot` is `None`) and points it back at the slot's
    /// parent.
    pub(crate) fn link_into(&mut self, slot: Option<Slot>, child: Option<Handle>) {
        match slot {
            Some((parent, side)) => self.node_mut(parent).set_child(side, child),
            None => self.root = child,
        }
        if let Some(child) = child {
            self.node_mut(child).set_parent(slot.map(|(parent, _)| parent));
        }
    }

    /// Leftmost node of the subtree rooted at `handle`.
    pub(crate) fn min_in(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.node(handle).left() {
            handle = left;
        }
        handle
    }

    /// Rightmost node of the subtree rooted at `handle`.
    pub(crate) fn max_in(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.node(handle).right() {
            handle = right;
        }
        handle
    }

    pub(crate) fn first(&self) -> Option<Handle> {
        self.root().map(|root| self.min_in(root))
    }

    pub(crate) fn last(&self) -> Option<Handle> {
        self.root().map(|root| self.max_in(root))
    }

    /// The next node in key order.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Right)
    }

    /// The previous node in key order.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Left)
    }

    // Successor for `Right`, predecessor for `Left`.
    fn neighbor(&self, handle: Handle, toward: Side) -> Option<Handle> {
        if let Some(child) = self.node(handle).child(toward) {
            return Some(match toward {
                Side::Right => self.min_in(child),
                Side::Left => self.max_in(child),
            });
        }

        // Climb until we arrive from the opposite side.
        let mut current = handle;
        while let Some((parent, side)) = self.parent_slot(current) {
            if side != toward {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// Handles of every node in key order.
    pub(crate) fn handles_in_order(&self) -> Vec<Handle> {
        let mut handles = Vec::with_capacity(self.len());
        let mut current = self.first();
        while let Some(handle) = current {
            handles.push(handle);
            current = self.successor(handle);
        }
        handles
    }

    /// Detaches a node that has at most one child, promoting that child into its slot.
    ///
    /// Returns the slot whose subtree just lost one level of height. The node stays allocated;
    /// the caller frees it.
    pub(crate) fn unlink(&mut self, handle: Handle) -> Option<Slot> {
        let node = self.node(handle);
        debug_assert!(
            node.left().is_none() || node.right().is_none(),
            "`unlink()` - node has two children!"
        );
        let child = node.left().or(node.right());
        let slot = self.parent_slot(handle);

        self.link_into(slot, child);

        let node = self.node_mut(handle);
        node.set_parent(None);
        node.set_child(Side::Left, None);
        node.set_child(Side::Right, None);
        slot
    }

    /// Exchanges the tree positions of `a` and `b`: each takes over the other's parent and
    /// children. Keys, values and balance factors stay with their nodes.
    ///
    /// Works when one node is the other's parent, and when either is the root.
    pub(crate) fn swap_positions(&mut self, a: Handle, b: Handle) {
        if a == b {
            return;
        }

        let a_slot = self.parent_slot(a);
        let b_slot = self.parent_slot(b);

        // A link that pointed at one of the pair now points at the other.
        let trade = |handle: Handle| {
            if handle == a {
                b
            } else if handle == b {
                a
            } else {
                handle
            }
        };
        let a_links = self.node(a).links().map(trade);
        let b_links = self.node(b).links().map(trade);
        self.node_mut(a).set_links(b_links);
        self.node_mut(b).set_links(a_links);

        // Outside parents: a parent that is one of the pair was already rewritten above.
        match a_slot {
            Some((parent, side)) if parent != b => self.node_mut(parent).set_child(side, Some(b)),
            Some(_) => {}
            None => self.root = Some(b),
        }
        match b_slot {
            Some((parent, side)) if parent != a => self.node_mut(parent).set_child(side, Some(a)),
            Some(_) => {}
            None => self.root = Some(a),
        }

        // Outside children.
        for (moved, links) in [(b, a_links), (a, b_links)] {
            for child in [links.left, links.right].into_iter().flatten() {
                if child != a && child != b {
                    self.node_mut(child).set_parent(Some(moved));
                }
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    /// Builds a plain (unbalanced) BST by attaching leaves in the given order.
    fn plain(keys: &[i32]) -> RawAvlTree<i32, ()> {
        let mut tree = RawAvlTree::new();
        for &key in keys {
            if let SearchResult::NotFound(slot) = tree.search_slot(&key) {
                tree.attach_leaf(key, (), slot);
            }
        }
        tree
    }

    fn key_of(tree: &RawAvlTree<i32, ()>, handle: Option<Handle>) -> Option<i32> {
        handle.map(|handle| *tree.node(handle).key())
    }

    fn assert_links_consistent(tree: &RawAvlTree<i32, ()>) {
        if let Some(root) = tree.root() {
            assert_eq!(tree.node(root).parent(), None);
        }
        for handle in tree.handles_in_order() {
            let node = tree.node(handle);
            for child in [node.left(), node.right()].into_iter().flatten() {
                assert_eq!(tree.node(child).parent(), Some(handle));
            }
        }
    }

    #[test]
    fn search_reports_insertion_slot() {
        let tree = plain(&[5, 3, 8]);
        let five = tree.search(&5).unwrap();
        let three = tree.search(&3).unwrap();

        assert!(matches!(tree.search_slot(&8), SearchResult::Found(_)));
        match tree.search_slot(&4) {
            SearchResult::NotFound(Some((parent, side))) => {
                assert_eq!(parent, three);
                assert_eq!(side, Side::Right);
            }
            _ => panic!("expected a vacant slot under 3"),
        }
        assert_eq!(tree.root(), Some(five));
        assert!(matches!(RawAvlTree::<i32, ()>::new().search_slot(&1), SearchResult::NotFound(None)));
    }

    #[test]
    fn successor_and_predecessor_walk_in_order() {
        let tree = plain(&[50, 30, 70, 20, 40, 60, 80, 35, 45]);
        let keys: Vec<i32> = tree.handles_in_order().into_iter().map(|h| *tree.node(h).key()).collect();
        assert_eq!(keys, [20, 30, 35, 40, 45, 50, 60, 70, 80]);

        let mut backwards = Vec::new();
        let mut current = tree.last();
        while let Some(handle) = current {
            backwards.push(*tree.node(handle).key());
            current = tree.predecessor(handle);
        }
        assert_eq!(backwards, [80, 70, 60, 50, 45, 40, 35, 30, 20]);

        let forty_five = tree.search(&45).unwrap();
        assert_eq!(key_of(&tree, tree.successor(forty_five)), Some(50));
        let fifty = tree.search(&50).unwrap();
        assert_eq!(key_of(&tree, tree.predecessor(fifty)), Some(45));
    }

    #[test]
    fn unlink_promotes_only_child() {
        let mut tree = plain(&[50, 30, 20, 25]);
        let thirty = tree.search(&30).unwrap();
        let fifty = tree.search(&50).unwrap();

        let slot = tree.unlink(thirty);
        assert_eq!(slot, Some((fifty, Side::Left)));
        assert_eq!(key_of(&tree, tree.node(fifty).left()), Some(20));
        tree.nodes.take(thirty);
        assert_links_consistent(&tree);
    }

    #[test]
    fn unlink_root_leaf_empties_tree() {
        let mut tree = plain(&[1]);
        let root = tree.root().unwrap();
        assert_eq!(tree.unlink(root), None);
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn swap_positions_with_distant_predecessor() {
        let mut tree = plain(&[50, 30, 70, 20, 40, 35, 45]);
        let fifty = tree.search(&50).unwrap();
        let forty_five = tree.search(&45).unwrap();

        tree.swap_positions(fifty, forty_five);

        assert_eq!(tree.root(), Some(forty_five));
        assert_eq!(key_of(&tree, tree.node(forty_five).left()), Some(30));
        assert_eq!(key_of(&tree, tree.node(forty_five).right()), Some(70));
        let forty = tree.search(&40).unwrap();
        assert_eq!(tree.node(forty).right(), Some(fifty));
        assert!(tree.node(fifty).is_leaf());
        assert_links_consistent(&tree);
    }

    #[test]
    fn swap_positions_with_adjacent_child() {
        let mut tree = plain(&[50, 30, 70, 20]);
        let fifty = tree.search(&50).unwrap();
        let thirty = tree.search(&30).unwrap();

        tree.swap_positions(fifty, thirty);

        assert_eq!(tree.root(), Some(thirty));
        assert_eq!(tree.node(thirty).left(), Some(fifty));
        assert_eq!(key_of(&tree, tree.node(thirty).right()), Some(70));
        assert_eq!(key_of(&tree, tree.node(fifty).left()), Some(20));
        assert_eq!(tree.node(fifty).right(), None);
        assert_links_consistent(&tree);

        // Swapping back restores the original layout.
        tree.swap_positions(thirty, fifty);
        assert_eq!(tree.root(), Some(fifty));
        assert_eq!(tree.node(fifty).left(), Some(thirty));
        assert_links_consistent(&tree);
    }

    #[test]
    fn swap_positions_of_siblings() {
        let mut tree = plain(&[2, 1, 3]);
        let one = tree.search(&1).unwrap();
        let three = tree.search(&3).unwrap();
        let two = tree.root().unwrap();

        tree.swap_positions(one, three);

        assert_eq!(tree.node(two).left(), Some(three));
        assert_eq!(tree.node(two).right(), Some(one));
        assert_links_consistent(&tree);
    }
}
