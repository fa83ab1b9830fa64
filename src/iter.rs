use std::{iter::FusedIterator, marker::PhantomData};

use crate::{NodePtr, OrderedSet};

/// A lazy in-order iterator over the values of an [`OrderedSet`],
/// smallest first.
///
/// Created by [`OrderedSet::iter`]; restartable by calling `iter` again.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    front: NodePtr<T>,
    back: NodePtr<T>,
    remaining: usize,
    _phantom: PhantomData<&'a T>,
}

impl<T> OrderedSet<T> {
    /// Visits the values in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use carmine::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.insert(2);
    /// set.insert(1);
    ///
    /// let values: Vec<_> = set.iter().copied().collect();
    /// assert_eq!(values, [1, 2]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            front: self.first_node(),
            back: self.last_node(),
            remaining: self.len,
            _phantom: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.front.map(|n| {
            // SAFETY: the set is borrowed shared for 'a and the front
            // pointer came from it; `remaining` stops the walk before the
            // two ends can cross.
            let n = unsafe { n.as_ref() };
            self.remaining -= 1;
            self.front = n.next();
            &n.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.back.map(|n| {
            // SAFETY: as in `next`.
            let n = unsafe { n.as_ref() };
            self.remaining -= 1;
            self.back = n.prev();
            &n.value
        })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            front: self.front,
            back: self.back,
            remaining: self.remaining,
            _phantom: PhantomData,
        }
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: Ord> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> OrderedSet<T> {
        let mut set = OrderedSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for OrderedSet<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|v| {
            self.insert(v);
        });
    }
}

#[cfg(test)]
mod test {
    use crate::OrderedSet;
    use pretty_assertions::assert_eq;

    #[test]
    fn iter_empty() {
        let set = OrderedSet::<usize>::new();
        assert_eq!(None, set.iter().next());
        assert_eq!(None, set.iter().next_back());
        assert_eq!(0, set.iter().len());
    }

    #[test]
    fn iter_is_sorted_regardless_of_insertion_order() {
        let mut set = OrderedSet::new();
        for v in [100, 0, 42, 7, 99] {
            set.insert(v);
        }

        let mut iter = set.iter();
        assert_eq!((5, Some(5)), iter.size_hint());
        assert_eq!(Some(&0), iter.next());
        assert_eq!(Some(&7), iter.next());
        assert_eq!(Some(&42), iter.next());
        assert_eq!(Some(&99), iter.next());
        assert_eq!(Some(&100), iter.next());
        assert_eq!(None, iter.next());
        assert_eq!(None, iter.next());
    }

    #[test]
    fn iter_rev() {
        let mut set = OrderedSet::new();
        for v in 0..128 {
            set.insert(v);
        }
        let values: Vec<i32> = set.iter().rev().copied().collect();
        let expected: Vec<i32> = (0..128).rev().collect();
        assert_eq!(expected, values);
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let mut set = OrderedSet::new();
        for v in 0..4 {
            set.insert(v);
        }

        let mut iter = set.iter();
        assert_eq!(Some(&0), iter.next());
        assert_eq!(Some(&3), iter.next_back());
        assert_eq!(Some(&2), iter.next_back());
        assert_eq!(Some(&1), iter.next());
        assert_eq!(None, iter.next());
        assert_eq!(None, iter.next_back());
    }

    #[test]
    fn iter_restarts_from_scratch() {
        let mut set = OrderedSet::new();
        for v in [2, 1, 3] {
            set.insert(v);
        }
        let first: Vec<_> = set.iter().collect();
        let second: Vec<_> = set.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn collect_and_extend() {
        let set: OrderedSet<i32> = vec![3, 1, 2, 2].into_iter().collect();
        assert_eq!(3, set.len());
        assert_eq!(vec![1, 2, 3], set.iter().copied().collect::<Vec<_>>());

        let mut set = set;
        set.extend([0, 4]);
        assert_eq!(vec![0, 1, 2, 3, 4], set.iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn for_loop_over_a_reference() {
        let mut set = OrderedSet::new();
        set.insert(1);
        set.insert(2);

        let mut total = 0;
        for v in &set {
            total += v;
        }
        assert_eq!(3, total);
    }
}
