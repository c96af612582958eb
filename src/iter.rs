use crate::index::{IndexType, NodeIndex};
use crate::interval::IntervalLike;
use crate::node::Node;
use crate::tree::IntervalTree;

/// Pushes a link of nodes on the left to stack.
fn left_link<I, Ix>(tree_ref: &IntervalTree<I, Ix>, mut x: NodeIndex<Ix>) -> Vec<NodeIndex<Ix>>
where
    Ix: IndexType,
{
    let mut nodes = vec![];
    while !tree_ref.node_ref(x, Node::is_sentinel) {
        nodes.push(x);
        x = tree_ref.node_ref(x, Node::left);
    }
    nodes
}

/// An iterator over all intervals of an `IntervalTree`, sorted by key.
#[derive(Debug)]
pub struct Iter<'a, I, Ix> {
    /// Reference to the tree
    tree_ref: &'a IntervalTree<I, Ix>,
    /// Stack for iteration
    stack: Vec<NodeIndex<Ix>>,
}

impl<'a, I, Ix> Iter<'a, I, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(tree_ref: &'a IntervalTree<I, Ix>) -> Self {
        Iter {
            tree_ref,
            stack: left_link(tree_ref, tree_ref.root),
        }
    }
}

impl<'a, I, Ix> Iterator for Iter<'a, I, Ix>
where
    Ix: IndexType,
{
    type Item = &'a I;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        self.stack
            .extend(left_link(self.tree_ref, self.tree_ref.node_ref(x, Node::right)));
        Some(self.tree_ref.node_ref(x, Node::interval))
    }
}

/// A consuming iterator over all intervals of an `IntervalTree`, sorted
/// by key.
#[derive(Debug)]
pub struct IntoIter<I, Ix> {
    /// The consumed tree
    tree: IntervalTree<I, Ix>,
    /// Stack for iteration
    stack: Vec<NodeIndex<Ix>>,
}

impl<I, Ix> IntoIter<I, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(tree: IntervalTree<I, Ix>) -> Self {
        let stack = left_link(&tree, tree.root);
        IntoIter { tree, stack }
    }
}

impl<I, Ix> Iterator for IntoIter<I, Ix>
where
    Ix: IndexType,
{
    type Item = I;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        self.stack
            .extend(left_link(&self.tree, self.tree.node_ref(x, Node::right)));
        let slot = &mut self.tree.nodes[x.index()];
        Some(slot.interval.take().unwrap())
    }
}

impl<I, Ix> IntoIterator for IntervalTree<I, Ix>
where
    Ix: IndexType,
{
    type Item = I;
    type IntoIter = IntoIter<I, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, I, Ix> IntoIterator for &'a IntervalTree<I, Ix>
where
    Ix: IndexType,
{
    type Item = &'a I;
    type IntoIter = Iter<'a, I, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        Iter::new(self)
    }
}

/// An iterator over the intervals overlapping a query, in key order.
///
/// Created by [`IntervalTree::find`]. The walk is resumable: it carries
/// the query endpoints and the node to report next, and every advance
/// picks up exactly where the previous one stopped, descending only
/// into subtrees whose max endpoint permits an overlap.
pub struct FindIter<'a, I, Ix>
where
    I: IntervalLike,
{
    /// Reference to the tree
    tree_ref: &'a IntervalTree<I, Ix>,
    /// The node to report next; the sentinel once exhausted
    cur: NodeIndex<Ix>,
    /// Low endpoint of the query
    low: I::Endpoint,
    /// High endpoint of the query
    high: I::Endpoint,
}

impl<'a, I, Ix> FindIter<'a, I, Ix>
where
    I: IntervalLike,
    Ix: IndexType,
{
    pub(crate) fn new(
        tree_ref: &'a IntervalTree<I, Ix>,
        low: I::Endpoint,
        high: I::Endpoint,
    ) -> Self {
        let cur = if tree_ref.node_ref(tree_ref.root, Node::is_sentinel) {
            tree_ref.root
        } else {
            tree_ref.find_first_overlap(tree_ref.root, &low, &high)
        };
        FindIter {
            tree_ref,
            cur,
            low,
            high,
        }
    }
}

impl<'a, I, Ix> Iterator for FindIter<'a, I, Ix>
where
    I: IntervalLike,
    Ix: IndexType,
{
    type Item = &'a I;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.tree_ref.node_ref(self.cur, Node::is_sentinel) {
            return None;
        }
        let hit = self.cur;
        self.cur = self.tree_ref.find_next_overlap(hit, &self.low, &self.high);
        Some(self.tree_ref.node_ref(hit, Node::interval))
    }
}
