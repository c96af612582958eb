use crate::index::{IndexType, NodeIndex};
use crate::interval::IntervalLike;

/// Node of the interval tree
#[derive(Debug)]
pub struct Node<I, Ix> {
    /// Left child
    pub left: Option<NodeIndex<Ix>>,
    /// Right child
    pub right: Option<NodeIndex<Ix>>,
    /// Parent
    pub parent: Option<NodeIndex<Ix>>,
    /// Color of the node
    pub color: Color,

    /// Interval of the node; `None` for the sentinel and for vacated slots
    pub interval: Option<I>,
    /// The index of the node holding the maximum high endpoint in this subtree
    pub max_index: Option<NodeIndex<Ix>>,
    /// Birth stamp of the current occupant, repeated in the handle
    /// issued for it
    pub generation: u64,
}

// Convenient getter/setter methods
impl<I, Ix> Node<I, Ix>
where
    Ix: IndexType,
{
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn interval(&self) -> &I {
        self.interval.as_ref().unwrap()
    }

    pub fn max_index(&self) -> NodeIndex<Ix> {
        self.max_index.unwrap()
    }

    pub fn left(&self) -> NodeIndex<Ix> {
        self.left.unwrap()
    }

    pub fn right(&self) -> NodeIndex<Ix> {
        self.right.unwrap()
    }

    pub fn parent(&self) -> NodeIndex<Ix> {
        self.parent.unwrap()
    }

    pub fn is_sentinel(&self) -> bool {
        self.interval.is_none()
    }

    pub fn is_black(&self) -> bool {
        matches!(self.color, Color::Black)
    }

    pub fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }

    pub fn set_color(color: Color) -> impl FnOnce(&mut Node<I, Ix>) {
        move |node: &mut Node<I, Ix>| {
            node.color = color;
        }
    }

    pub fn set_max_index(max_index: NodeIndex<Ix>) -> impl FnOnce(&mut Node<I, Ix>) {
        move |node: &mut Node<I, Ix>| {
            let _ignore = node.max_index.replace(max_index);
        }
    }

    pub fn set_left(left: NodeIndex<Ix>) -> impl FnOnce(&mut Node<I, Ix>) {
        move |node: &mut Node<I, Ix>| {
            let _ignore = node.left.replace(left);
        }
    }

    pub fn set_right(right: NodeIndex<Ix>) -> impl FnOnce(&mut Node<I, Ix>) {
        move |node: &mut Node<I, Ix>| {
            let _ignore = node.right.replace(right);
        }
    }

    pub fn set_parent(parent: NodeIndex<Ix>) -> impl FnOnce(&mut Node<I, Ix>) {
        move |node: &mut Node<I, Ix>| {
            let _ignore = node.parent.replace(parent);
        }
    }
}

// Key accessors, reading endpoints through the accessor trait
impl<I, Ix> Node<I, Ix>
where
    I: IntervalLike,
    Ix: IndexType,
{
    pub fn low(&self) -> &I::Endpoint {
        self.interval().low()
    }

    pub fn high(&self) -> &I::Endpoint {
        self.interval().high()
    }
}

/// The color of the node
#[derive(Debug, Clone, Copy)]
pub enum Color {
    /// Red node
    Red,
    /// Black node
    Black,
}
