//! An ordered set of unique values backed by a red-black tree.
//!
//! [`OrderedSet`] keeps its elements sorted under insertion and removal and
//! guarantees a tree height in O(log n). Lookups, insertions and removals
//! are all O(log n); the in-order [`iter`](OrderedSet::iter) walk is lazy
//! and yields values in ascending order.
//!
//! Nodes are heap-allocated and owned exclusively by the set. The `parent`
//! pointer on each node is a non-owning back-reference used only for the
//! upward walks the rebalancing fixups need; ownership always flows from
//! the root downwards through the child links.

mod iter;
mod node;
mod set;

pub use iter::Iter;

use std::ptr::NonNull;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

pub(crate) type NodePtr<T> = Option<NonNull<Node<T>>>;

/// Null-tolerant accessors over an optional node pointer.
///
/// An absent node reads as an implicit black nil: `is_black` holds and all
/// of its relations are absent. Setters are no-ops on `None`, which lets
/// the fixup code rewire whatever sits in a slot without unwrapping at
/// every step.
pub(crate) trait NodePtrExt {
    type Value;

    fn color(&self) -> Color;
    fn is_black(&self) -> bool;
    fn is_red(&self) -> bool;
    fn left(&self) -> NodePtr<Self::Value>;
    fn parent(&self) -> NodePtr<Self::Value>;
    fn right(&self) -> NodePtr<Self::Value>;
    fn set_color(&mut self, color: Color);
    fn set_left(&mut self, left: NodePtr<Self::Value>);
    fn set_parent(&mut self, parent: NodePtr<Self::Value>);
    fn set_right(&mut self, right: NodePtr<Self::Value>);
}

impl<T> NodePtrExt for NodePtr<T> {
    type Value = T;

    #[inline(always)]
    fn color(&self) -> Color {
        self.map_or(Color::Black, |v| unsafe { v.as_ref() }.color)
    }

    #[inline(always)]
    fn is_black(&self) -> bool {
        self.color() == Color::Black
    }

    #[inline(always)]
    fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    #[inline(always)]
    fn left(&self) -> NodePtr<T> {
        self.map_or(None, |v| unsafe { v.as_ref() }.left)
    }

    #[inline(always)]
    fn parent(&self) -> NodePtr<T> {
        self.map_or(None, |v| unsafe { v.as_ref() }.parent)
    }

    #[inline(always)]
    fn right(&self) -> NodePtr<T> {
        self.map_or(None, |v| unsafe { v.as_ref() }.right)
    }

    #[inline(always)]
    fn set_color(&mut self, color: Color) {
        if let Some(node) = self {
            unsafe { node.as_mut() }.color = color;
        }
    }

    #[inline(always)]
    fn set_left(&mut self, left: NodePtr<T>) {
        if let Some(node) = self {
            unsafe { node.as_mut() }.left = left;
        }
    }

    #[inline(always)]
    fn set_parent(&mut self, parent: NodePtr<T>) {
        if let Some(node) = self {
            unsafe { node.as_mut() }.parent = parent;
        }
    }

    #[inline(always)]
    fn set_right(&mut self, right: NodePtr<T>) {
        if let Some(node) = self {
            unsafe { node.as_mut() }.right = right;
        }
    }
}

impl<T> From<&Node<T>> for NodePtr<T> {
    fn from(node: &Node<T>) -> Self {
        NonNull::new(node as *const _ as *mut _)
    }
}

impl<T> From<&mut Node<T>> for NodePtr<T> {
    fn from(node: &mut Node<T>) -> Self {
        NonNull::new(node as *mut _)
    }
}

pub struct Node<T> {
    pub(crate) color: Color,
    pub(crate) left: NodePtr<T>,
    pub(crate) right: NodePtr<T>,
    // Non-owning back-reference; must mirror the owning child link.
    pub(crate) parent: NodePtr<T>,
    pub(crate) value: T,
}

/// A read-only handle on a node, for rendering and shape inspection.
///
/// Exposes the node's value, color and relations without any way to
/// mutate the tree. A handle is invalidated by any removal, since a
/// two-child removal relocates values between nodes.
#[derive(Clone, Copy)]
pub struct NodeRef<'a, T> {
    pub(crate) node: &'a Node<T>,
}

/// An ordered set of unique values, balanced as a red-black tree.
///
/// # Examples
///
/// ```
/// use carmine::OrderedSet;
///
/// let mut set = OrderedSet::new();
/// set.insert(3);
/// set.insert(1);
/// set.insert(2);
///
/// assert_eq!(3, set.len());
/// assert_eq!(vec![1, 2, 3], set.iter().copied().collect::<Vec<_>>());
/// ```
pub struct OrderedSet<T> {
    pub(crate) root: NodePtr<T>,
    pub(crate) len: usize,
}
