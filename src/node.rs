use std::fmt::Debug;

use crate::{Color, Node, NodePtr, NodeRef};

impl<T> Node<T> {
    pub(crate) fn new(value: T, color: Color) -> Self {
        Node {
            color,
            left: None,
            right: None,
            parent: None,
            value,
        }
    }

    #[inline(always)]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    /// In-order successor, or `None` when this is the largest node.
    pub(crate) fn next(&self) -> NodePtr<T> {
        // With a right subtree, the successor is its leftmost node.
        if let Some(mut current) = self.right {
            // SAFETY: child links always point at live nodes of this tree.
            while let Some(left) = unsafe { current.as_ref() }.left {
                current = left;
            }
            return Some(current);
        }

        // No right subtree: climb while we are a right child. The first
        // ancestor entered from its left side is the successor; running
        // out of ancestors means we were the rightmost node.
        let mut node: NodePtr<T> = NodePtr::from(self);
        let mut parent = self.parent;
        while let Some(ancestor) = parent {
            // SAFETY: parent links always point at live nodes of this tree.
            let ancestor = unsafe { ancestor.as_ref() };
            if ancestor.right != node {
                break;
            }
            node = parent;
            parent = ancestor.parent;
        }
        parent
    }

    /// In-order predecessor, or `None` when this is the smallest node.
    pub(crate) fn prev(&self) -> NodePtr<T> {
        if let Some(mut current) = self.left {
            // SAFETY: child links always point at live nodes of this tree.
            while let Some(right) = unsafe { current.as_ref() }.right {
                current = right;
            }
            return Some(current);
        }

        let mut node: NodePtr<T> = NodePtr::from(self);
        let mut parent = self.parent;
        while let Some(ancestor) = parent {
            // SAFETY: parent links always point at live nodes of this tree.
            let ancestor = unsafe { ancestor.as_ref() };
            if ancestor.left != node {
                break;
            }
            node = parent;
            parent = ancestor.parent;
        }
        parent
    }
}

impl<T: Debug> Debug for Node<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}::{:?}", self.color, self.value))
    }
}

impl<'a, T> NodeRef<'a, T> {
    pub fn value(&self) -> &'a T {
        &self.node.value
    }

    pub fn color(&self) -> Color {
        self.node.color
    }

    pub fn left(&self) -> Option<NodeRef<'a, T>> {
        // SAFETY: the set is borrowed shared for 'a, so every node it owns
        // stays alive and unaliased by writers for 'a.
        self.node.left.map(|n| NodeRef {
            node: unsafe { n.as_ref() },
        })
    }

    pub fn right(&self) -> Option<NodeRef<'a, T>> {
        // SAFETY: as in `left`.
        self.node.right.map(|n| NodeRef {
            node: unsafe { n.as_ref() },
        })
    }

    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        // SAFETY: as in `left`.
        self.node.parent.map(|n| NodeRef {
            node: unsafe { n.as_ref() },
        })
    }
}

impl<T: Debug> Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.node.fmt(f)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    // Links a parent to a child on the given side and mirrors the back
    // reference, for building small trees by hand.
    macro_rules! link {
        ($parent:expr, $child:expr, left) => {
            $parent.left = (&$child).into();
            $child.parent = (&$parent).into();
        };
        ($parent:expr, $child:expr, right) => {
            $parent.right = (&$child).into();
            $child.parent = (&$parent).into();
        };
    }

    #[test]
    fn next_of_single_node() {
        let node = Node::new(1, Color::Black);
        assert!(node.next().is_none());
        assert!(node.prev().is_none());
    }

    #[test]
    fn next_walks_in_order() {
        //      4
        //     / \
        //    2   6
        //   / \
        //  1   3
        let mut n4 = Node::new(4, Color::Black);
        let mut n2 = Node::new(2, Color::Red);
        let mut n6 = Node::new(6, Color::Black);
        let mut n1 = Node::new(1, Color::Black);
        let mut n3 = Node::new(3, Color::Black);

        link!(n4, n2, left);
        link!(n4, n6, right);
        link!(n2, n1, left);
        link!(n2, n3, right);

        let mut values = Vec::new();
        let mut current: NodePtr<i32> = (&n1).into();
        while let Some(n) = current {
            let n = unsafe { n.as_ref() };
            values.push(n.value);
            current = n.next();
        }
        assert_eq!(vec![1, 2, 3, 4, 6], values);

        let mut values = Vec::new();
        let mut current: NodePtr<i32> = (&n6).into();
        while let Some(n) = current {
            let n = unsafe { n.as_ref() };
            values.push(n.value);
            current = n.prev();
        }
        assert_eq!(vec![6, 4, 3, 2, 1], values);
    }
}
