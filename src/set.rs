use std::{borrow::Borrow, cmp::Ordering::*, fmt::Debug, ptr::NonNull};

use crate::{Color, Node, NodePtr, NodePtrExt, NodeRef, OrderedSet};

enum Side {
    Left,
    Right,
}

impl<T> OrderedSet<T> {
    pub fn new() -> Self {
        OrderedSet { root: None, len: 0 }
    }

    /// Number of live elements.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every element and resets the set to empty.
    pub fn clear(&mut self) {
        *self = OrderedSet::new();
    }

    /// The smallest value, or `None` on an empty set.
    pub fn min(&self) -> Option<&T> {
        self.first_node().map(|n| &unsafe { n.as_ref() }.value)
    }

    /// The largest value, or `None` on an empty set.
    pub fn max(&self) -> Option<&T> {
        self.last_node().map(|n| &unsafe { n.as_ref() }.value)
    }

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    ///
    /// For n elements this never exceeds 2·log2(n + 1).
    pub fn height(&self) -> usize {
        fn depth<T>(node: NodePtr<T>) -> usize {
            match node {
                None => 0,
                Some(node) => {
                    // SAFETY: child links always point at live nodes.
                    let node = unsafe { node.as_ref() };
                    1 + depth(node.left).max(depth(node.right))
                }
            }
        }
        depth(self.root)
    }

    pub(crate) fn first_node(&self) -> NodePtr<T> {
        let mut node = self.root?;
        // SAFETY: child links always point at live nodes.
        while let Some(left) = unsafe { node.as_ref() }.left {
            node = left;
        }
        Some(node)
    }

    pub(crate) fn last_node(&self) -> NodePtr<T> {
        let mut node = self.root?;
        // SAFETY: child links always point at live nodes.
        while let Some(right) = unsafe { node.as_ref() }.right {
            node = right;
        }
        Some(node)
    }

    fn leftmost(mut node: NonNull<Node<T>>) -> NonNull<Node<T>> {
        // SAFETY: child links always point at live nodes.
        while let Some(left) = unsafe { node.as_ref() }.left {
            node = left;
        }
        node
    }

    fn lookup<Q>(&self, value: &Q) -> NodePtr<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root;
        while let Some(candidate) = node {
            // SAFETY: child links always point at live nodes.
            let candidate = unsafe { candidate.as_ref() };
            match value.cmp(candidate.value.borrow()) {
                Equal => break,
                Less => node = candidate.left,
                Greater => node = candidate.right,
            }
        }
        node
    }

    /// Looks a value up and returns a read-only handle on its node.
    ///
    /// The handle exposes the node's color and relations for rendering;
    /// it is invalidated by any later removal.
    pub fn find<Q>(&self, value: &Q) -> Option<NodeRef<'_, T>>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.lookup(value).map(|n| NodeRef {
            // SAFETY: the node is owned by self and outlives the shared
            // borrow the handle carries.
            node: unsafe { n.as_ref() },
        })
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.lookup(value).is_some()
    }

    /// Inserts a value. Returns `false`, leaving the set untouched, when
    /// an equal value is already present.
    pub fn insert(&mut self, value: T) -> bool
    where
        T: Ord,
    {
        let Some(mut current) = self.root else {
            let node = Box::new(Node::new(value, Color::Black));
            self.root = Some(NonNull::from(Box::leak(node)));
            self.len = 1;
            return true;
        };

        // Descend to the attachment point. An equal value ends the
        // insert before anything is allocated.
        let side = loop {
            // SAFETY: child links always point at live nodes.
            let current_ref = unsafe { current.as_ref() };
            match value.cmp(&current_ref.value) {
                Equal => return false,
                Less => match current_ref.left {
                    Some(left) => current = left,
                    None => break Side::Left,
                },
                Greater => match current_ref.right {
                    Some(right) => current = right,
                    None => break Side::Right,
                },
            }
        };

        let mut node = Box::new(Node::new(value, Color::Red));
        node.parent = Some(current);
        let node = NonNull::from(Box::leak(node));
        match side {
            // SAFETY: current is live and the matched child slot is empty.
            Side::Left => unsafe { current.as_mut() }.left = Some(node),
            Side::Right => unsafe { current.as_mut() }.right = Some(node),
        }
        self.len += 1;

        // A black parent leaves every invariant intact; a red one means
        // a live red-red violation at the new node.
        if unsafe { current.as_ref() }.is_red() {
            self.insert_fixup(node);
        }
        true
    }

    /// Removes a value. Returns `false` when it was not present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(node) = self.lookup(value) else {
            return false;
        };
        self.remove_node(node);
        self.len -= 1;
        true
    }

    fn remove_node(&mut self, node: NonNull<Node<T>>) {
        let (left, right) = {
            // SAFETY: lookup only hands out live nodes.
            let node = unsafe { node.as_ref() };
            (node.left, node.right)
        };
        if let (Some(_), Some(right)) = (left, right) {
            // Two children: relocate the in-order successor's value here
            // and remove the successor node instead. The successor has no
            // left child by construction, so its removal is the one-child
            // shape below.
            let successor = Self::leftmost(right);
            let removed = self.splice(successor);
            // SAFETY: node is live and distinct from the spliced successor.
            unsafe {
                (*node.as_ptr()).value = removed.value;
            }
        } else {
            let _ = self.splice(node);
        }
    }

    /// Unlinks a node with at most one child, restores the color
    /// invariants, and hands the allocation back to the caller.
    fn splice(&mut self, node: NonNull<Node<T>>) -> Box<Node<T>> {
        let (parent, child, color) = {
            // SAFETY: the caller passes a live node.
            let node = unsafe { node.as_ref() };
            debug_assert!(node.left.is_none() || node.right.is_none());
            (node.parent, node.left.or(node.right), node.color)
        };

        let mut replacement = child;
        self.change_child(Some(node), replacement, parent);
        replacement.set_parent(parent);

        match color {
            // A red node has no lone child (that would break black-height
            // uniformity), so unlinking it changes no path's black count.
            Color::Red => {}
            // A black node replaced by its red child keeps every path's
            // black count once the replacement is recolored.
            Color::Black if replacement.is_red() => replacement.set_color(Color::Black),
            // Black replaced by black or by nothing: the spliced position
            // is one black short on every path through it. A missing
            // parent means the root was removed, which shortens all paths
            // alike.
            Color::Black => {
                if let Some(parent) = parent {
                    self.remove_fixup(parent, replacement);
                }
            }
        }

        // SAFETY: the node was allocated by insert via Box and is fully
        // unlinked, so ownership moves back into a Box exactly once.
        unsafe { Box::from_raw(node.as_ptr()) }
    }

    /// Insertion fixup: walks upward from a freshly inserted red node
    /// while its parent is red, restoring the no-red-red rule.
    fn insert_fixup(&mut self, node: NonNull<Node<T>>) {
        let mut node: NodePtr<T> = Some(node);

        loop {
            // Loop invariant: node is red.
            let mut parent = node.parent();
            if parent.is_none() || parent.is_black() {
                break;
            }

            // A red parent is never the root, so the grandparent exists.
            let mut gparent = parent.parent();
            let parent_is_left = gparent.left() == parent;
            let mut uncle = if parent_is_left {
                gparent.right()
            } else {
                gparent.left()
            };

            if uncle.is_red() {
                // Case A: red uncle. Recoloring may move the red-red pair
                // up to the grandparent, so re-examine from there.
                parent.set_color(Color::Black);
                uncle.set_color(Color::Black);
                gparent.set_color(Color::Red);
                node = gparent;
                continue;
            }

            let node_is_left = parent.left() == node;
            match (parent_is_left, node_is_left) {
                (true, true) => {
                    // Case B: straight line on the left. The parent takes
                    // the grandparent's slot and their colors swap.
                    gparent.set_color(Color::Red);
                    parent.set_color(Color::Black);
                    self.rotate_right(parent.expect("red parent is present"));
                    break;
                }
                (false, false) => {
                    // Case C: mirror of B.
                    gparent.set_color(Color::Red);
                    parent.set_color(Color::Black);
                    self.rotate_left(parent.expect("red parent is present"));
                    break;
                }
                (true, false) => {
                    // Case D: zig-zag. Rotate the node over its parent to
                    // straighten the line; the demoted parent re-enters as
                    // the current node and the next iteration is Case B.
                    self.rotate_left(node.expect("current node is present"));
                    node = parent;
                }
                (false, true) => {
                    // Case E: mirror of D.
                    self.rotate_right(node.expect("current node is present"));
                    node = parent;
                }
            }
        }

        if node == self.root {
            node.set_color(Color::Black);
        }
    }

    /// Deletion fixup at a position that is one black node short (the
    /// "double black"). `node` is the occupant of the deficient slot
    /// under `parent` and may be absent; `sibling` never is, on any tree
    /// that was valid before the removal.
    fn remove_fixup(&mut self, parent: NonNull<Node<T>>, node: NodePtr<T>) {
        let mut parent: NodePtr<T> = Some(parent);
        let sibling_is_left = parent.right() == node;
        let mut sibling = if sibling_is_left {
            parent.left()
        } else {
            parent.right()
        };
        let Some(sibling_ptr) = sibling else {
            unreachable!("double-black position with no sibling");
        };
        let mut sl = sibling.left();
        let mut sr = sibling.right();

        if sibling.is_black() && sl.is_black() && sr.is_black() {
            // Case 3a: black sibling, black nephews. Dropping the sibling
            // side's black count absorbs the deficiency into the parent:
            // a red parent pays for it by turning black, a black one
            // becomes the new deficient position (the root absorbs it).
            sibling.set_color(Color::Red);
            if parent.is_red() {
                parent.set_color(Color::Black);
            } else if let Some(gparent) = parent.parent() {
                self.remove_fixup(gparent, parent);
            }
        } else if sibling_is_left && sibling.is_black() && sl.is_red() {
            // Case 3b-LL: the sibling takes the parent's color and rises;
            // its red child and the demoted parent both turn black, which
            // restores the missing black on the deficient side.
            sibling.set_color(parent.color());
            sl.set_color(Color::Black);
            parent.set_color(Color::Black);
            self.rotate_right(sibling_ptr);
        } else if !sibling_is_left && sibling.is_black() && sr.is_red() {
            // Case 3b-RR: mirror of LL.
            sibling.set_color(parent.color());
            sr.set_color(Color::Black);
            parent.set_color(Color::Black);
            self.rotate_left(sibling_ptr);
        } else if sibling_is_left && sibling.is_black() {
            // Case 3b-LR: the only red nephew is on the sibling's right.
            // Lift it over the sibling to reach the LL shape, then finish
            // that shape in the same pass.
            let nephew_ptr = sr.expect("LR case requires a red right nephew");
            sr.set_color(Color::Black);
            sibling.set_color(Color::Red);
            self.rotate_left(nephew_ptr);
            sr.set_color(parent.color());
            sibling.set_color(Color::Black);
            parent.set_color(Color::Black);
            self.rotate_right(nephew_ptr);
        } else if !sibling_is_left && sibling.is_black() {
            // Case 3b-RL: mirror of LR.
            let nephew_ptr = sl.expect("RL case requires a red left nephew");
            sl.set_color(Color::Black);
            sibling.set_color(Color::Red);
            self.rotate_right(nephew_ptr);
            sl.set_color(parent.color());
            sibling.set_color(Color::Black);
            parent.set_color(Color::Black);
            self.rotate_left(nephew_ptr);
        } else {
            // Case 3c: red sibling, so the parent and both nephews are
            // black. Rotate the sibling over the parent to expose a black
            // sibling for the deficient slot, then rerun the analysis at
            // the same slot. The parent is red after the rotation, so
            // that second pass terminates in one of the cases above.
            sibling.set_color(Color::Black);
            parent.set_color(Color::Red);
            if sibling_is_left {
                self.rotate_right(sibling_ptr);
            } else {
                self.rotate_left(sibling_ptr);
            }
            self.remove_fixup(parent.expect("parent survives the rotation"), node);
        }
    }

    /// Rotates `node` up and to the left over its parent: the node takes
    /// the parent's slot (updating the root field through `change_child`
    /// when the parent was the root), its left child crosses over to the
    /// parent's right, and the parent becomes the node's left child.
    /// Never recolors; callers do.
    fn rotate_left(&mut self, node: NonNull<Node<T>>) {
        let mut node: NodePtr<T> = Some(node);
        let mut parent = node.parent();
        assert!(parent.is_some(), "cannot rotate the root");
        let gparent = parent.parent();

        node.set_parent(gparent);
        self.change_child(parent, node, gparent);

        let mut inner = node.left();
        parent.set_right(inner);
        inner.set_parent(parent);

        node.set_left(parent);
        parent.set_parent(node);
    }

    /// Mirror of [`Self::rotate_left`].
    fn rotate_right(&mut self, node: NonNull<Node<T>>) {
        let mut node: NodePtr<T> = Some(node);
        let mut parent = node.parent();
        assert!(parent.is_some(), "cannot rotate the root");
        let gparent = parent.parent();

        node.set_parent(gparent);
        self.change_child(parent, node, gparent);

        let mut inner = node.right();
        parent.set_left(inner);
        inner.set_parent(parent);

        node.set_right(parent);
        parent.set_parent(node);
    }

    /// Replaces `old` with `new` in `parent`'s child slot, falling back
    /// to the root field when there is no parent.
    fn change_child(&mut self, old: NodePtr<T>, new: NodePtr<T>, parent: NodePtr<T>) {
        if let Some(mut parent) = parent {
            // SAFETY: parent links always point at live nodes.
            let parent = unsafe { parent.as_mut() };
            if parent.left == old {
                parent.left = new;
            } else {
                parent.right = new;
            }
        } else {
            self.root = new;
        }
    }
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for OrderedSet<T> {
    fn drop(&mut self) {
        // Post-order teardown without recursion: walk down to a leaf,
        // detach it from its parent, free it, resume from the parent.
        let mut current = self.root;
        while let Some(node) = current {
            // SAFETY: every pointer reachable from the root is live until
            // the Box::from_raw below frees it.
            let node_ref = unsafe { node.as_ref() };
            if node_ref.left.is_some() {
                current = node_ref.left;
                continue;
            }
            if node_ref.right.is_some() {
                current = node_ref.right;
                continue;
            }
            let parent = node_ref.parent;
            if let Some(mut p) = parent {
                let p = unsafe { p.as_mut() };
                if p.left == current {
                    p.left = None;
                } else {
                    p.right = None;
                }
            }
            let _ = unsafe { Box::from_raw(node.as_ptr()) };
            current = parent;
        }
        self.root = None;
    }
}

impl<T: Debug> Debug for OrderedSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Clone + Ord> Clone for OrderedSet<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}
