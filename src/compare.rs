//! Key orderings.
//!
//! A tree is parameterized by a [`Compare`] implementation. The default,
//! [`NaturalOrder`], defers to [`Ord`]. Any `Fn(&K, &K) -> Ordering` closure
//! works as well, and [`LessThan`] adapts a strict "less than" predicate.

use std::cmp::Ordering;

/// A total order over `K`.
///
/// Keys that compare [`Ordering::Equal`] are the same key as far as the tree
/// is concerned.
pub trait Compare<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The key type's own [`Ord`] order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Compare<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Ordering from a strict weak "less than" predicate.
///
/// `a` and `b` are equal when neither is less than the other.
///
/// ```rust
/// use avl_rank::{LessThan, OrderedTree};
///
/// let mut tree: OrderedTree<i32, _> =
///     OrderedTree::with_comparator(LessThan(|a: &i32, b: &i32| a > b));
/// tree.extend([1, 3, 2]);
/// assert_eq!(tree.in_order(), vec![&3, &2, &1]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct LessThan<F>(pub F);

impl<K: ?Sized, F> Compare<K> for LessThan<F>
where
    F: Fn(&K, &K) -> bool,
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        if (self.0)(a, b) {
            Ordering::Less
        } else if (self.0)(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}
