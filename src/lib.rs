//! `interval_tree` is an ordered container for possibly overlapping
//! closed intervals `[low, high]`.
//!
//! The tree stores any value type exposing a pair of totally ordered
//! endpoints, keeps intervals sorted by their `(low, high)` key, and
//! answers "which stored intervals overlap `[low, high]`?" in
//! O(log N + K) time for K hits. It is a red-black tree in which every
//! node also tracks the maximum high endpoint of its subtree, so
//! overlap queries can skip every branch that cannot contain a hit.
//!
//! Nodes are kept in a vector arena and reference each other by index
//! rather than by pointer. This keeps the rebalancing code in safe
//! Rust, makes the tree `Send` and `Unpin`, and gives insertion a
//! stable handle to return: a handle stays valid until the node it
//! names is erased, no matter how many other intervals come and go.
//!
//! # Example
//!
//! ```rust
//! use interval_tree::{Interval, IntervalTree};
//!
//! let mut tree = IntervalTree::new();
//! tree.insert(Interval::new(1, 4));
//! let handle = tree.insert(Interval::new(3, 9));
//! tree.insert(Interval::new(11, 12));
//!
//! let hits: Vec<_> = tree.find(2, 10).collect();
//! assert_eq!(hits, [&Interval::new(1, 4), &Interval::new(3, 9)]);
//!
//! tree.erase(handle);
//! assert!(!tree.overlaps(&5, &10));
//! ```

mod index;
mod interval;
mod iter;
mod node;
mod tree;


pub use index::{DefaultIx, Handle, IndexType, NodeIndex};
pub use interval::{Interval, IntervalLike};
pub use iter::{FindIter, IntoIter, Iter};
pub use tree::IntervalTree;
