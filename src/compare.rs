//! Ordering strategies for [`FlatMap`](crate::FlatMap).
//!
//! A comparator is a strict weak ordering expressed as a single "is less"
//! predicate. Two keys are equal when neither is less than the other.

/// Strict weak ordering between an `L` and an `R`.
///
/// The map only ever calls `Compare<Q>` for a probe type `Q` that stored
/// keys borrow as, so a comparator for `str` serves a map keyed by `String`.
pub trait Compare<L: ?Sized, R: ?Sized = L> {
    fn less(&self, lhs: &L, rhs: &R) -> bool;
}

impl<L: ?Sized, R: ?Sized, C: Compare<L, R> + ?Sized> Compare<L, R> for &C {
    #[inline]
    fn less(&self, lhs: &L, rhs: &R) -> bool {
        (**self).less(lhs, rhs)
    }
}

/// Ascending order through `PartialOrd`. The default comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Less;

impl<L: ?Sized + PartialOrd<R>, R: ?Sized> Compare<L, R> for Less {
    #[inline]
    fn less(&self, lhs: &L, rhs: &R) -> bool {
        lhs < rhs
    }
}

/// Descending order through `PartialOrd`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Greater;

impl<L: ?Sized + PartialOrd<R>, R: ?Sized> Compare<L, R> for Greater {
    #[inline]
    fn less(&self, lhs: &L, rhs: &R) -> bool {
        lhs > rhs
    }
}

/// Flips another comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Compare<T>> Compare<T> for Reverse<C> {
    #[inline]
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        self.0.less(rhs, lhs)
    }
}

/// Adapts a `Fn(&T, &T) -> bool` "is less" closure.
///
/// ```
/// use flatmap::{ByFn, FlatMap, KeyValue};
///
/// let by_len = ByFn(|a: &&str, b: &&str| a.len() < b.len());
/// let mut map: FlatMap<&str, u32, Vec<KeyValue<&str, u32>>, _> = FlatMap::with_comparator(by_len);
/// map.set("three", 3);
/// map.set("a", 1);
/// map.set("b", 2); // same length as "a": overwrites it
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["a", "three"]);
/// assert_eq!(map.get(&"a"), Some(&2));
/// ```
#[derive(Clone, Copy, Default)]
pub struct ByFn<F>(pub F);

impl<T: ?Sized, F: Fn(&T, &T) -> bool> Compare<T> for ByFn<F> {
    #[inline]
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        (self.0)(lhs, rhs)
    }
}

impl<F> core::fmt::Debug for ByFn<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("ByFn(..)")
    }
}
