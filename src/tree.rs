use std::fmt::Display;
use std::io;

use crate::index::{DefaultIx, Handle, IndexType, NodeIndex};
use crate::interval::IntervalLike;
use crate::iter::{FindIter, Iter};
use crate::node::{Color, Node};

/// An interval tree, which supports operations on dynamic sets of
/// possibly overlapping intervals.
///
/// Intervals are ordered by their `(low, high)` key; equal keys are
/// accepted and kept, with later insertions sorting after earlier ones.
/// Nodes live in a vector arena and reference each other by index, so
/// the handles returned by [`insert`](IntervalTree::insert) stay valid
/// until the node they name is erased.
#[derive(Debug)]
pub struct IntervalTree<I, Ix = DefaultIx> {
    /// Vector that stores nodes
    pub(crate) nodes: Vec<Node<I, Ix>>,
    /// Root of the interval tree
    pub(crate) root: NodeIndex<Ix>,
    /// Vacated slots available for reuse
    pub(crate) free: Vec<NodeIndex<Ix>>,
    /// Birth stamp handed to the next allocated node; never reused
    pub(crate) generation: u64,
    /// Number of intervals in the tree
    pub(crate) len: usize,
}

impl<I, Ix> IntervalTree<I, Ix>
where
    I: IntervalLike,
    Ix: IndexType,
{
    /// Creates a new `IntervalTree` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = vec![Self::new_sentinel()];
        nodes.reserve(capacity);
        IntervalTree {
            nodes,
            root: Self::sentinel(),
            free: Vec::new(),
            generation: 0,
            len: 0,
        }
    }

    /// Insert an interval into the tree and return the handle of the
    /// new node.
    ///
    /// Equal intervals may coexist; nothing is overwritten or merged.
    ///
    /// # Panics
    ///
    /// This method panics when the interval has `low > high`, or when
    /// the tree is at the maximum number of nodes for its index width.
    ///
    /// # Example
    /// ```rust
    /// use interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// let handle = tree.insert(Interval::new(1, 3));
    /// tree.insert(Interval::new(1, 3));
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.interval(handle), &Interval::new(1, 3));
    /// ```
    #[inline]
    pub fn insert(&mut self, interval: I) -> Handle<Ix> {
        assert!(
            interval.low() <= interval.high(),
            "invalid interval: low > high"
        );
        let z = self.alloc_node(interval);
        self.insert_inner(z);
        Handle {
            node: z,
            generation: self.node_ref(z, |n| n.generation),
        }
    }

    /// Remove the interval a handle refers to, returning it.
    ///
    /// Only the erased handle is invalidated; every other handle keeps
    /// referring to its interval.
    ///
    /// # Panics
    ///
    /// This method panics when the handle is out of range or refers to
    /// an already erased node, even if that node's slot has since been
    /// reused.
    ///
    /// # Example
    /// ```rust
    /// use interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// let handle = tree.insert(Interval::new(1, 3));
    /// tree.insert(Interval::new(2, 4));
    /// assert_eq!(tree.erase(handle), Interval::new(1, 3));
    /// assert_eq!(tree.len(), 1);
    /// ```
    #[inline]
    pub fn erase(&mut self, handle: Handle<Ix>) -> I {
        assert!(self.is_live(handle), "invalid or stale handle");
        self.remove_inner(handle.node);
        self.free_node(handle.node)
    }

    /// Return a reference to the interval a handle refers to.
    ///
    /// # Panics
    ///
    /// This method panics when the handle is invalid, see
    /// [`erase`](IntervalTree::erase).
    #[inline]
    #[must_use]
    pub fn interval(&self, handle: Handle<Ix>) -> &I {
        assert!(self.is_live(handle), "invalid or stale handle");
        self.node_ref(handle.node, Node::interval)
    }

    /// Check if any stored interval overlaps `[low, high]`.
    ///
    /// # Example
    /// ```rust
    /// use interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(1, 3));
    /// tree.insert(Interval::new(6, 7));
    /// tree.insert(Interval::new(9, 11));
    /// assert!(tree.overlaps(&3, &5));
    /// assert!(tree.overlaps(&7, &9));
    /// assert!(!tree.overlaps(&4, &5));
    /// assert!(!tree.overlaps(&12, &23));
    /// ```
    #[inline]
    #[must_use]
    pub fn overlaps(&self, low: &I::Endpoint, high: &I::Endpoint) -> bool {
        !self.node_ref(self.root, Node::is_sentinel)
            && !self.find_first_overlap(self.root, low, high).is_sentinel()
    }

    /// Enumerate every stored interval overlapping `[low, high]`, in
    /// non-decreasing `(low, high)` order. Overlap is inclusive on both
    /// ends: `[a, b]` matches iff `a <= high` and `low <= b`.
    ///
    /// The returned iterator is lazy; each advance walks only branches
    /// whose subtree maximum permits a hit.
    ///
    /// # Example
    /// ```rust
    /// use interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(1, 3));
    /// tree.insert(Interval::new(6, 7));
    /// tree.insert(Interval::new(9, 11));
    /// let hits: Vec<_> = tree.find(2, 6).collect();
    /// assert_eq!(hits, [&Interval::new(1, 3), &Interval::new(6, 7)]);
    /// assert!(tree.find(4, 5).next().is_none());
    /// ```
    #[inline]
    pub fn find(&self, low: I::Endpoint, high: I::Endpoint) -> FindIter<'_, I, Ix> {
        FindIter::new(self, low, high)
    }

    /// Get an iterator over all stored intervals, sorted by key.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, I, Ix> {
        Iter::new(self)
    }

    /// Remove all intervals from the tree.
    ///
    /// Every handle and every iterator is invalidated.
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(Self::new_sentinel());
        self.root = Self::sentinel();
        self.free.clear();
        // the stamp counter keeps running, so pre-clear handles stay dead
        self.len = 0;
    }

    /// Return the number of intervals in the tree.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the tree contains no intervals.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<I> IntervalTree<I>
where
    I: IntervalLike,
{
    /// Create an empty `IntervalTree`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Self::new_sentinel()],
            root: Self::sentinel(),
            free: Vec::new(),
            generation: 0,
            len: 0,
        }
    }
}

impl<I> Default for IntervalTree<I>
where
    I: IntervalLike,
{
    #[inline]
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<I, Ix> FromIterator<I> for IntervalTree<I, Ix>
where
    I: IntervalLike,
    Ix: IndexType,
{
    #[inline]
    fn from_iter<T: IntoIterator<Item = I>>(intervals: T) -> Self {
        let intervals = intervals.into_iter();
        let mut tree = Self::with_capacity(intervals.size_hint().0);
        for interval in intervals {
            let _ignore = tree.insert(interval);
        }
        tree
    }
}

// Node allocation
impl<I, Ix> IntervalTree<I, Ix>
where
    I: IntervalLike,
    Ix: IndexType,
{
    /// Create a new sentinel node
    fn new_sentinel() -> Node<I, Ix> {
        Node {
            interval: None,
            max_index: None,
            left: None,
            right: None,
            parent: None,
            color: Color::Black,
            generation: 0,
        }
    }

    /// Create a new tree node
    fn new_node(interval: I, index: NodeIndex<Ix>, generation: u64) -> Node<I, Ix> {
        Node {
            max_index: Some(index),
            interval: Some(interval),
            left: Some(Self::sentinel()),
            right: Some(Self::sentinel()),
            parent: Some(Self::sentinel()),
            color: Color::Red,
            generation,
        }
    }

    /// Get the sentinel node index
    pub(crate) fn sentinel() -> NodeIndex<Ix> {
        NodeIndex::new(0)
    }

    /// Place a node in a vacated slot, or grow the arena. Links are not
    /// touched until the node is allocated, so a failed allocation
    /// leaves the tree unchanged. Every occupant gets a fresh stamp,
    /// including the reuse of a vacated slot.
    fn alloc_node(&mut self, interval: I) -> NodeIndex<Ix> {
        let generation = self.generation;
        let node_idx = if let Some(node_idx) = self.free.pop() {
            self.nodes[node_idx.index()] = Self::new_node(interval, node_idx, generation);
            node_idx
        } else {
            let node_idx = NodeIndex::new(self.nodes.len());
            // check for max capacity, except if we use usize
            assert!(
                <Ix as IndexType>::max().index() == !0 || NodeIndex::end() != node_idx,
                "Reached maximum number of nodes"
            );
            self.nodes.push(Self::new_node(interval, node_idx, generation));
            node_idx
        };
        self.generation = self.generation.wrapping_add(1);
        node_idx
    }

    /// Vacate a node's slot and hand back its interval.
    fn free_node(&mut self, node: NodeIndex<Ix>) -> I {
        let slot = &mut self.nodes[node.index()];
        slot.left = None;
        slot.right = None;
        slot.parent = None;
        slot.color = Color::Black;
        slot.max_index = None;
        let interval = slot.interval.take().unwrap();
        self.free.push(node);
        interval
    }

    /// Check that a handle refers to the node it was issued for. A
    /// matching stamp rules out both vacated slots and slots reused by
    /// a later insert.
    fn is_live(&self, handle: Handle<Ix>) -> bool {
        let node = handle.node;
        !node.is_sentinel()
            && node.index() < self.nodes.len()
            && !self.nodes[node.index()].is_sentinel()
            && self.nodes[node.index()].generation == handle.generation
    }
}

// Tree structure operations
impl<I, Ix> IntervalTree<I, Ix>
where
    I: IntervalLike,
    Ix: IndexType,
{
    /// The `(low, high)` ordering key of a node.
    fn key(&self, node: NodeIndex<Ix>) -> (&I::Endpoint, &I::Endpoint) {
        self.node_ref(node, |n| (n.low(), n.high()))
    }

    /// Strict key order. Equal keys are not less, so a new node with an
    /// already present key descends into the right subtree and in-order
    /// traversal returns equal keys in insertion order.
    fn key_less(&self, a: NodeIndex<Ix>, b: NodeIndex<Ix>) -> bool {
        self.key(a) < self.key(b)
    }

    /// Insert a node into the tree.
    fn insert_inner(&mut self, z: NodeIndex<Ix>) {
        let mut y = Self::sentinel();
        let mut x = self.root;

        while !self.node_ref(x, Node::is_sentinel) {
            y = x;
            if self.key_less(z, x) {
                x = self.node_ref(x, Node::left);
            } else {
                x = self.node_ref(x, Node::right);
            }
        }
        self.node_mut(z, Node::set_parent(y));
        if self.node_ref(y, Node::is_sentinel) {
            self.root = z;
        } else {
            if self.key_less(z, y) {
                self.node_mut(y, Node::set_left(z));
            } else {
                self.node_mut(y, Node::set_right(z));
            }
            self.update_max_bottom_up(y);
        }

        self.insert_fixup(z);

        self.len = self.len.wrapping_add(1);
    }

    /// Remove a node from the tree.
    fn remove_inner(&mut self, z: NodeIndex<Ix>) {
        let mut y = z;
        let mut y_orig_color = self.node_ref(y, Node::color);
        let x;
        if self.left_ref(z, Node::is_sentinel) {
            x = self.node_ref(z, Node::right);
            self.transplant(z, x);
            self.update_max_bottom_up(self.node_ref(z, Node::parent));
        } else if self.right_ref(z, Node::is_sentinel) {
            x = self.node_ref(z, Node::left);
            self.transplant(z, x);
            self.update_max_bottom_up(self.node_ref(z, Node::parent));
        } else {
            y = self.tree_minimum(self.node_ref(z, Node::right));
            let mut p = y;
            y_orig_color = self.node_ref(y, Node::color);
            x = self.node_ref(y, Node::right);
            if self.node_ref(y, Node::parent) == z {
                self.node_mut(x, Node::set_parent(y));
            } else {
                self.transplant(y, x);
                p = self.node_ref(y, Node::parent);
                self.node_mut(y, Node::set_right(self.node_ref(z, Node::right)));
                self.right_mut(y, Node::set_parent(y));
            }
            self.transplant(z, y);
            self.node_mut(y, Node::set_left(self.node_ref(z, Node::left)));
            self.left_mut(y, Node::set_parent(y));
            self.node_mut(y, Node::set_color(self.node_ref(z, Node::color)));

            // Inconsistencies in the augmentation start at the deepest
            // touched node: y itself when its right child was spliced in
            // place, its former parent otherwise.
            self.update_max_bottom_up(p);
        }

        if matches!(y_orig_color, Color::Black) {
            self.remove_fixup(x);
        }

        self.len = self.len.wrapping_sub(1);
    }

    /// Restore red-black tree properties after an insert.
    fn insert_fixup(&mut self, mut z: NodeIndex<Ix>) {
        while self.parent_ref(z, Node::is_red) {
            if self.grand_parent_ref(z, Node::is_sentinel) {
                break;
            }
            if self.is_left_child(self.node_ref(z, Node::parent)) {
                let y = self.grand_parent_ref(z, Node::right);
                if self.node_ref(y, Node::is_red) {
                    // Case 1: the uncle is red, recolor and move up.
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.node_mut(y, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    z = self.parent_ref(z, Node::parent);
                } else {
                    if self.is_right_child(z) {
                        // Case 2: black uncle, z is an inner grandchild.
                        // Rotate into case 3.
                        z = self.node_ref(z, Node::parent);
                        self.left_rotate(z);
                    }
                    // Case 3: black uncle, z is an outer grandchild.
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    self.right_rotate(self.parent_ref(z, Node::parent));
                }
            } else {
                let y = self.grand_parent_ref(z, Node::left);
                if self.node_ref(y, Node::is_red) {
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.node_mut(y, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    z = self.parent_ref(z, Node::parent);
                } else {
                    if self.is_left_child(z) {
                        z = self.node_ref(z, Node::parent);
                        self.right_rotate(z);
                    }
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    self.left_rotate(self.parent_ref(z, Node::parent));
                }
            }
        }
        self.node_mut(self.root, Node::set_color(Color::Black));
    }

    /// Restore red-black tree properties after a remove.
    fn remove_fixup(&mut self, mut x: NodeIndex<Ix>) {
        while x != self.root && self.node_ref(x, Node::is_black) {
            let mut w;
            if self.is_left_child(x) {
                w = self.parent_ref(x, Node::right);
                if self.node_ref(w, Node::is_red) {
                    // Case 1: red sibling, rotate into cases 2-4.
                    self.node_mut(w, Node::set_color(Color::Black));
                    self.parent_mut(x, Node::set_color(Color::Red));
                    self.left_rotate(self.node_ref(x, Node::parent));
                    w = self.parent_ref(x, Node::right);
                }
                if self.node_ref(w, Node::is_sentinel) {
                    break;
                }
                if self.left_ref(w, Node::is_black) && self.right_ref(w, Node::is_black) {
                    // Case 2: black sibling with black children, move up.
                    self.node_mut(w, Node::set_color(Color::Red));
                    x = self.node_ref(x, Node::parent);
                } else {
                    if self.right_ref(w, Node::is_black) {
                        // Case 3: sibling's far child is black, rotate
                        // into case 4.
                        self.left_mut(w, Node::set_color(Color::Black));
                        self.node_mut(w, Node::set_color(Color::Red));
                        self.right_rotate(w);
                        w = self.parent_ref(x, Node::right);
                    }
                    // Case 4: sibling's far child is red. Rotate and stop.
                    self.node_mut(w, Node::set_color(self.parent_ref(x, Node::color)));
                    self.parent_mut(x, Node::set_color(Color::Black));
                    self.right_mut(w, Node::set_color(Color::Black));
                    self.left_rotate(self.node_ref(x, Node::parent));
                    x = self.root;
                }
            } else {
                w = self.parent_ref(x, Node::left);
                if self.node_ref(w, Node::is_red) {
                    self.node_mut(w, Node::set_color(Color::Black));
                    self.parent_mut(x, Node::set_color(Color::Red));
                    self.right_rotate(self.node_ref(x, Node::parent));
                    w = self.parent_ref(x, Node::left);
                }
                if self.node_ref(w, Node::is_sentinel) {
                    break;
                }
                if self.right_ref(w, Node::is_black) && self.left_ref(w, Node::is_black) {
                    self.node_mut(w, Node::set_color(Color::Red));
                    x = self.node_ref(x, Node::parent);
                } else {
                    if self.left_ref(w, Node::is_black) {
                        self.right_mut(w, Node::set_color(Color::Black));
                        self.node_mut(w, Node::set_color(Color::Red));
                        self.left_rotate(w);
                        w = self.parent_ref(x, Node::left);
                    }
                    self.node_mut(w, Node::set_color(self.parent_ref(x, Node::color)));
                    self.parent_mut(x, Node::set_color(Color::Black));
                    self.left_mut(w, Node::set_color(Color::Black));
                    self.right_rotate(self.node_ref(x, Node::parent));
                    x = self.root;
                }
            }
        }
        self.node_mut(x, Node::set_color(Color::Black));
    }

    /// Binary tree left rotate.
    fn left_rotate(&mut self, x: NodeIndex<Ix>) {
        if self.right_ref(x, Node::is_sentinel) {
            return;
        }
        let y = self.node_ref(x, Node::right);
        self.node_mut(x, Node::set_right(self.node_ref(y, Node::left)));
        if !self.left_ref(y, Node::is_sentinel) {
            self.left_mut(y, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_left(x));

        self.rotate_update_max(x, y);
    }

    /// Binary tree right rotate.
    fn right_rotate(&mut self, x: NodeIndex<Ix>) {
        if self.left_ref(x, Node::is_sentinel) {
            return;
        }
        let y = self.node_ref(x, Node::left);
        self.node_mut(x, Node::set_left(self.node_ref(y, Node::right)));
        if !self.right_ref(y, Node::is_sentinel) {
            self.right_mut(y, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_right(x));

        self.rotate_update_max(x, y);
    }

    /// Replace parent during a rotation.
    fn replace_parent(&mut self, x: NodeIndex<Ix>, y: NodeIndex<Ix>) {
        self.node_mut(y, Node::set_parent(self.node_ref(x, Node::parent)));
        if self.parent_ref(x, Node::is_sentinel) {
            self.root = y;
        } else if self.is_left_child(x) {
            self.parent_mut(x, Node::set_left(y));
        } else {
            self.parent_mut(x, Node::set_right(y));
        }
        self.node_mut(x, Node::set_parent(y));
    }

    /// Update the max indices after a rotation. Only the rotated pair's
    /// subtree composition changed: the new upper node inherits the old
    /// upper node's max, the demoted node is recomputed from scratch.
    fn rotate_update_max(&mut self, x: NodeIndex<Ix>, y: NodeIndex<Ix>) {
        self.node_mut(y, Node::set_max_index(self.node_ref(x, Node::max_index)));
        self.recalculate_max(x);
    }

    /// Update the max indices walking towards the root.
    fn update_max_bottom_up(&mut self, x: NodeIndex<Ix>) {
        let mut p = x;
        while !self.node_ref(p, Node::is_sentinel) {
            self.recalculate_max(p);
            p = self.node_ref(p, Node::parent);
        }
    }

    /// Recalculate the max index from the node and its children.
    fn recalculate_max(&mut self, x: NodeIndex<Ix>) {
        self.node_mut(x, Node::set_max_index(x));
        let x_left = self.node_ref(x, Node::left);
        let x_right = self.node_ref(x, Node::right);
        if self.max(x_left) > self.max(x) {
            self.node_mut(
                x,
                Node::set_max_index(self.node_ref(x_left, Node::max_index)),
            );
        }
        if self.max(x_right) > self.max(x) {
            self.node_mut(
                x,
                Node::set_max_index(self.node_ref(x_right, Node::max_index)),
            );
        }
    }

    /// Find the node with the minimum key in the subtree rooted at `x`.
    fn tree_minimum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while !self.left_ref(x, Node::is_sentinel) {
            x = self.node_ref(x, Node::left);
        }
        x
    }

    /// Replace one subtree as a child of its parent with another subtree.
    fn transplant(&mut self, u: NodeIndex<Ix>, v: NodeIndex<Ix>) {
        if self.parent_ref(u, Node::is_sentinel) {
            self.root = v;
        } else if self.is_left_child(u) {
            self.parent_mut(u, Node::set_left(v));
        } else {
            self.parent_mut(u, Node::set_right(v));
        }
        self.node_mut(v, Node::set_parent(self.node_ref(u, Node::parent)));
    }

    /// Check if a node is a left child of its parent.
    fn is_left_child(&self, node: NodeIndex<Ix>) -> bool {
        self.parent_ref(node, Node::left) == node
    }

    /// Check if a node is a right child of its parent.
    fn is_right_child(&self, node: NodeIndex<Ix>) -> bool {
        self.parent_ref(node, Node::right) == node
    }
}

// Overlap search
impl<I, Ix> IntervalTree<I, Ix>
where
    I: IntervalLike,
    Ix: IndexType,
{
    /// Find the overlapping node with the smallest key in the subtree
    /// rooted at `x`, or the sentinel when the subtree holds none.
    ///
    /// `x` must not be the sentinel.
    pub(crate) fn find_first_overlap(
        &self,
        mut x: NodeIndex<Ix>,
        low: &I::Endpoint,
        high: &I::Endpoint,
    ) -> NodeIndex<Ix> {
        loop {
            let x_left = self.node_ref(x, Node::left);
            if self.max(x_left).is_some_and(|left_max| low <= left_max) {
                // If the left subtree holds no overlap, nothing below x
                // does (CLRS theorem 14.2). Descend.
                x = x_left;
                continue;
            }
            if high < self.node_ref(x, Node::low) {
                // x and its whole right subtree start past the query.
                return Self::sentinel();
            }
            if low <= self.node_ref(x, Node::high) {
                return x;
            }
            let x_right = self.node_ref(x, Node::right);
            if self.max(x_right).is_some_and(|right_max| low <= right_max) {
                x = x_right;
                continue;
            }
            return Self::sentinel();
        }
    }

    /// Find the overlapping node with the smallest key greater than
    /// `x`'s, or the sentinel. `x` must be a node previously returned by
    /// [`Self::find_first_overlap`] or by this function.
    pub(crate) fn find_next_overlap(
        &self,
        mut x: NodeIndex<Ix>,
        low: &I::Endpoint,
        high: &I::Endpoint,
    ) -> NodeIndex<Ix> {
        loop {
            // Everything to the left of x has already been reported.
            let x_right = self.node_ref(x, Node::right);
            if self.max(x_right).is_some_and(|right_max| low <= right_max) {
                return self.find_first_overlap(x_right, low, high);
            }

            // Climb until arriving at a node from its left child; nodes
            // left behind on the way have been fully visited.
            loop {
                let p = self.node_ref(x, Node::parent);
                if self.node_ref(p, Node::is_sentinel) {
                    return Self::sentinel();
                }
                let from_right = self.node_ref(p, Node::right) == x;
                x = p;
                if !from_right {
                    break;
                }
            }

            if high < self.node_ref(x, Node::low) {
                return Self::sentinel();
            }
            if low <= self.node_ref(x, Node::high) {
                return x;
            }
        }
    }
}

// Diagnostics
impl<I, Ix> IntervalTree<I, Ix>
where
    I: IntervalLike,
    Ix: IndexType,
{
    /// Audit every structural invariant, panicking with a structural
    /// message on the first violation.
    ///
    /// Verifies the key order, the red-black properties (black root,
    /// no red-red edge, uniform black height), the subtree max
    /// augmentation, endpoint sanity, parent back-links and the node
    /// count. Linear time; meant for tests and debugging.
    pub fn check_invariants(&self) {
        assert!(self.node_ref(self.root, Node::is_black), "red root");
        if self.node_ref(self.root, Node::is_sentinel) {
            assert_eq!(self.len, 0, "empty tree with nonzero len");
            return;
        }
        assert!(
            self.parent_ref(self.root, Node::is_sentinel),
            "root has a parent"
        );
        let mut black_height = None;
        let mut count = 0;
        let _max = self.check_node(self.root, 0, &mut black_height, &mut count);
        assert_eq!(count, self.len, "node count diverged from len");
        assert_eq!(
            self.len + self.free.len() + 1,
            self.nodes.len(),
            "arena slot accounting broken"
        );
    }

    /// Check the subtree rooted at `x` and return its true maximum high
    /// endpoint.
    fn check_node(
        &self,
        x: NodeIndex<Ix>,
        cur_black_height: usize,
        black_height: &mut Option<usize>,
        count: &mut usize,
    ) -> &I::Endpoint {
        *count += 1;
        let x_left = self.node_ref(x, Node::left);
        let x_right = self.node_ref(x, Node::right);

        if self.node_ref(x, Node::is_red) {
            assert!(
                self.node_ref(x_left, Node::is_black) && self.node_ref(x_right, Node::is_black),
                "red node with a red child"
            );
        }
        assert!(
            self.node_ref(x, Node::low) <= self.node_ref(x, Node::high),
            "stored interval with low > high"
        );

        // Every path from the root to an absent child carries the same
        // number of black nodes.
        if self.node_ref(x_left, Node::is_sentinel) || self.node_ref(x_right, Node::is_sentinel) {
            match *black_height {
                None => *black_height = Some(cur_black_height),
                Some(h) => assert_eq!(h, cur_black_height, "unequal black heights"),
            }
        }

        let mut max = self.node_ref(x, Node::high);

        if !self.node_ref(x_left, Node::is_sentinel) {
            assert!(
                self.node_ref(x_left, Node::parent) == x,
                "broken parent link"
            );
            assert!(self.key(x_left) <= self.key(x), "left child out of order");
            let left_max = self.check_node(
                x_left,
                cur_black_height + usize::from(self.node_ref(x_left, Node::is_black)),
                black_height,
                count,
            );
            if max < left_max {
                max = left_max;
            }
        }
        if !self.node_ref(x_right, Node::is_sentinel) {
            assert!(
                self.node_ref(x_right, Node::parent) == x,
                "broken parent link"
            );
            assert!(self.key(x) <= self.key(x_right), "right child out of order");
            let right_max = self.check_node(
                x_right,
                cur_black_height + usize::from(self.node_ref(x_right, Node::is_black)),
                black_height,
                count,
            );
            if max < right_max {
                max = right_max;
            }
        }

        assert!(self.max(x) == Some(max), "stale subtree max");
        max
    }
}

impl<I, Ix> IntervalTree<I, Ix>
where
    I: IntervalLike,
    I::Endpoint: Display,
    Ix: IndexType,
{
    /// Write the tree shape to `writer` and audit the structure.
    ///
    /// One node per line in pre-order: an L/R edge marker below the
    /// root, the node color, `[low, high]` and the subtree max, with
    /// one column of indentation per level. An empty tree prints
    /// `(nil)`. After printing, [`check_invariants`] runs, so a dump
    /// of a corrupted tree does not return normally.
    ///
    /// [`check_invariants`]: IntervalTree::check_invariants
    ///
    /// # Errors
    ///
    /// Propagates errors of the underlying writer.
    pub fn dump<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.node_ref(self.root, Node::is_sentinel) {
            writeln!(writer, "(nil)")?;
        } else {
            self.dump_node(writer, self.root, 0, "")?;
        }
        self.check_invariants();
        Ok(())
    }

    /// Print node `x` and its descendants.
    fn dump_node<W: io::Write>(
        &self,
        writer: &mut W,
        x: NodeIndex<Ix>,
        depth: usize,
        edge: &str,
    ) -> io::Result<()> {
        writeln!(
            writer,
            "{:depth$}{}{} [{}, {}] | {}",
            "",
            edge,
            if self.node_ref(x, Node::is_black) {
                "B"
            } else {
                "R"
            },
            self.node_ref(x, Node::low),
            self.node_ref(x, Node::high),
            self.max(x).unwrap(),
        )?;
        if !self.left_ref(x, Node::is_sentinel) {
            self.dump_node(writer, self.node_ref(x, Node::left), depth + 1, "L")?;
        }
        if !self.right_ref(x, Node::is_sentinel) {
            self.dump_node(writer, self.node_ref(x, Node::right), depth + 1, "R")?;
        }
        Ok(())
    }
}

// Convenient methods for reference or mutate current/parent/left/right node
impl<'a, I, Ix> IntervalTree<I, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn node_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<I, Ix>) -> R,
    {
        op(&self.nodes[node.index()])
    }

    pub(crate) fn node_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<I, Ix>) -> R,
    {
        op(&mut self.nodes[node.index()])
    }

    fn left_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<I, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].left().index();
        op(&self.nodes[idx])
    }

    fn right_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<I, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].right().index();
        op(&self.nodes[idx])
    }

    fn parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<I, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&self.nodes[idx])
    }

    fn grand_parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<I, Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&self.nodes[grand_parent_idx])
    }

    fn left_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<I, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].left().index();
        op(&mut self.nodes[idx])
    }

    fn right_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<I, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].right().index();
        op(&mut self.nodes[idx])
    }

    fn parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<I, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&mut self.nodes[idx])
    }

    fn grand_parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<I, Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&mut self.nodes[grand_parent_idx])
    }

    pub(crate) fn max(&self, node: NodeIndex<Ix>) -> Option<&I::Endpoint>
    where
        I: IntervalLike,
    {
        let max_index = self.nodes[node.index()].max_index?.index();
        self.nodes[max_index].interval.as_ref().map(IntervalLike::high)
    }
}
