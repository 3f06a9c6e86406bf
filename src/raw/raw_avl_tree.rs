use core::borrow::Borrow;

use alloc::vec::Vec;

use smallvec::SmallVec;

use super::arena::Arena;
use super::bst::{SearchResult, Slot};
use super::handle::Handle;
use super::node::{Node, Side};

/// The AVL tree backing `AvlTreeMap`.
///
/// Every node stores its balance factor (height(right) - height(left)). Insertions and removals
/// go through the plain BST primitives in `bst`, then retrace the path back toward the root,
/// adjusting balance factors and rotating wherever a node reaches ±2.
#[derive(Clone)]
pub(crate) struct RawAvlTree<K, V> {
    /// Arena storing all tree nodes.
    pub(super) nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    pub(super) root: Option<Handle>,
}

impl<K, V> RawAvlTree<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Number of nodes on the longest root-to-leaf path.
    ///
    /// Follows the taller child at every level, so it costs O(log n) rather than a full walk.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            height += 1;
            let node = self.node(handle);
            current = if node.balance() < 0 {
                node.left()
            } else {
                node.right().or(node.left())
            };
        }
        height
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|handle| self.node(handle).value())
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.node_mut(handle).value_mut())
    }

    /// Returns the stored key and its value.
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|handle| self.entry(handle))
    }

    pub(crate) fn entry(&self, handle: Handle) -> (&K, &V) {
        let node = self.node(handle);
        (node.key(), node.value())
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        self.first().map(|handle| self.entry(handle))
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        self.last().map(|handle| self.entry(handle))
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// An existing key only has its value replaced; the shape of the tree does not change.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        match self.search_slot(&key) {
            SearchResult::Found(handle) => Some(self.node_mut(handle).replace_value(value)),
            SearchResult::NotFound(slot) => {
                let leaf = self.attach_leaf(key, value, slot);
                self.retrace_insert(leaf);
                None
            }
        }
    }

    /// Removes a key from the tree and returns the value.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the tree and returns the key-value pair. Absent keys leave the tree
    /// untouched.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.remove_handle(handle))
    }

    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.first()?;
        Some(self.remove_handle(first))
    }

    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.last()?;
        Some(self.remove_handle(last))
    }

    /// Removes a live node and rebalances.
    ///
    /// A node with two children first trades places with its in-order predecessor, so the node
    /// actually unlinked never has more than one child. Other handles stay valid.
    pub(crate) fn remove_handle(&mut self, handle: Handle) -> (K, V) {
        let node = self.node(handle);
        if let (Some(left), Some(_)) = (node.left(), node.right()) {
            let predecessor = self.max_in(left);
            self.node_swap(handle, predecessor);
        }

        let shrunk = self.unlink(handle);
        self.retrace_remove(shrunk);

        self.nodes.take(handle).into_entry()
    }

    /// Keeps only the entries for which `keep` returns `true`, visiting in key order.
    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut doomed: SmallVec<[Handle; 16]> = SmallVec::new();
        let mut current = self.first();
        while let Some(handle) = current {
            let (key, value) = self.node_mut(handle).entry_mut();
            if !keep(key, value) {
                doomed.push(handle);
            }
            current = self.successor(handle);
        }

        for handle in doomed {
            self.remove_handle(handle);
        }
    }

    /// Mutable views of every entry, in key order.
    pub(crate) fn entries_mut(&mut self) -> Vec<(&K, &mut V)> {
        let order = self.handles_in_order();
        let mut by_slot: Vec<Option<(&K, &mut V)>> =
            self.nodes.slots_mut().map(|slot| slot.map(Node::entry_mut)).collect();
        order
            .into_iter()
            .map(|handle| by_slot[handle.to_index()].take().expect("`entries_mut()` - node visited twice!"))
            .collect()
    }

    /// Moves every entry out in key order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let order = self.handles_in_order();
        let mut nodes = core::mem::replace(&mut self.nodes, Arena::new());
        self.root = None;
        order.into_iter().map(|handle| nodes.take(handle).into_entry()).collect()
    }

    /// Trades the tree positions of two nodes together with their balance factors, so each
    /// position keeps the balance it had.
    pub(crate) fn node_swap(&mut self, a: Handle, b: Handle) {
        self.swap_positions(a, b);
        let a_balance = self.node(a).balance();
        let b_balance = self.node(b).balance();
        self.node_mut(a).set_balance(b_balance);
        self.node_mut(b).set_balance(a_balance);
    }

    /// Walks up from a freshly attached leaf.
    ///
    /// Each ancestor's balance moves toward the side that grew. Reaching 0 means the subtree
    /// height did not change and the walk stops; ±1 means it grew and the walk continues; ±2 is
    /// repaired by a rotation, after which the subtree is back to its old height.
    fn retrace_insert(&mut self, leaf: Handle) {
        let mut child = leaf;
        while let Some((parent, side)) = self.parent_slot(child) {
            match self.node_mut(parent).adjust_balance(side.growth()) {
                0 => return,
                -1 | 1 => child = parent,
                _ => {
                    self.rebalance(parent);
                    return;
                }
            }
        }
    }

    /// Walks up from the slot whose subtree lost a level.
    ///
    /// ±1 means the parent kept its height and the walk stops; 0 means it shrank and the walk
    /// continues. After a rotation the walk continues only if the new subtree root is at 0,
    /// since only then did the rotated subtree end up shorter.
    fn retrace_remove(&mut self, mut shrunk: Option<Slot>) {
        while let Some((parent, side)) = shrunk {
            let subtree = match self.node_mut(parent).adjust_balance(-side.growth()) {
                -1 | 1 => return,
                0 => parent,
                _ => {
                    let subtree = self.rebalance(parent);
                    if self.node(subtree).balance() != 0 {
                        return;
                    }
                    subtree
                }
            };
            shrunk = self.parent_slot(subtree);
        }
    }

    /// Rotates `node` if its balance is ±2 and returns whatever now roots its subtree.
    fn rebalance(&mut self, node: Handle) -> Handle {
        match self.node(node).balance() {
            -2 => {
                let left = self.node(node).left().expect("`rebalance()` - left-heavy node has no left child!");
                if self.node(left).balance() > 0 {
                    self.rotate_left_right(node)
                } else {
                    self.rotate_right(node)
                }
            }
            2 => {
                let right = self.node(node).right().expect("`rebalance()` - right-heavy node has no right child!");
                if self.node(right).balance() < 0 {
                    self.rotate_right_left(node)
                } else {
                    self.rotate_left(node)
                }
            }
            _ => node,
        }
    }

    /// Lifts `pivot`'s left child into its place.
    ///
    /// Balance factors are recomputed from the old ones alone:
    /// `p' = p + 1 - min(n, 0)` and `n' = n + 1 + max(p', 0)`.
    pub(crate) fn rotate_right(&mut self, pivot: Handle) -> Handle {
        let riser = self.node(pivot).left().expect("`rotate_right()` - pivot has no left child!");
        self.relink_rotation(pivot, riser, Side::Right);

        let n = self.node(riser).balance();
        let p = self.node(pivot).balance() + 1 - n.min(0);
        self.node_mut(pivot).set_balance(p);
        self.node_mut(riser).set_balance(n + 1 + p.max(0));
        riser
    }

    /// Lifts `pivot`'s right child into its place. Mirror of [`Self::rotate_right`]:
    /// `p' = p - 1 - max(n, 0)` and `n' = n - 1 + min(p', 0)`.
    pub(crate) fn rotate_left(&mut self, pivot: Handle) -> Handle {
        let riser = self.node(pivot).right().expect("`rotate_left()` - pivot has no right child!");
        self.relink_rotation(pivot, riser, Side::Left);

        let n = self.node(riser).balance();
        let p = self.node(pivot).balance() - 1 - n.max(0);
        self.node_mut(pivot).set_balance(p);
        self.node_mut(riser).set_balance(n - 1 + p.min(0));
        riser
    }

    pub(crate) fn rotate_left_right(&mut self, pivot: Handle) -> Handle {
        let left = self.node(pivot).left().expect("`rotate_left_right()` - pivot has no left child!");
        self.rotate_left(left);
        self.rotate_right(pivot)
    }

    pub(crate) fn rotate_right_left(&mut self, pivot: Handle) -> Handle {
        let right = self.node(pivot).right().expect("`rotate_right_left()` - pivot has no right child!");
        self.rotate_right(right);
        self.rotate_left(pivot)
    }

    // `pivot` sinks toward `down`; `riser` (its child on the other side) takes its slot, and the
    // riser's inner subtree moves across to the pivot.
    fn relink_rotation(&mut self, pivot: Handle, riser: Handle, down: Side) {
        let slot = self.parent_slot(pivot);
        let inner = self.node(riser).child(down);

        self.node_mut(pivot).set_child(down.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner).set_parent(Some(pivot));
        }

        self.node_mut(riser).set_child(down, Some(pivot));
        self.node_mut(pivot).set_parent(Some(riser));

        self.link_into(slot, Some(riser));
    }
}
