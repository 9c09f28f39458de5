//! Contiguous storage the map keeps its entries in.
//!
//! The map never allocates on its own: growth, shrinking and allocation
//! failure are all the backing store's business.

use core::mem::size_of;

use crate::error::{Error, Result};

/// A resizable array of `T`.
///
/// Out-of-range `insert`/`remove` indices panic, as they do on `Vec`.
/// Stores with a fixed capacity panic when `insert` runs out of room and
/// report [`Error::CapacityExceeded`] from `try_reserve`.
pub trait Backing<T> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn as_slice(&self) -> &[T];

    fn as_mut_slice(&mut self) -> &mut [T];

    fn insert(&mut self, index: usize, value: T);

    fn remove(&mut self, index: usize) -> T;

    /// Drops every element, keeping the allocation.
    fn clear(&mut self);

    /// Drops every element and gives the allocation back.
    fn release(&mut self);

    /// Makes room for `additional` more elements.
    ///
    /// # Panics
    ///
    /// A fixed-capacity store panics in debug builds when `additional`
    /// exceeds its remaining room, and does nothing in release builds.
    fn reserve(&mut self, additional: usize);

    fn try_reserve(&mut self, additional: usize) -> Result<()>;

    /// Bytes used by the store: its own struct plus any heap buffer.
    fn footprint(&self) -> usize;

    fn retain<F: FnMut(&mut T) -> bool>(&mut self, f: F);

    /// Moves `[at, len)` into a new store.
    fn split_off(&mut self, at: usize) -> Self
    where
        Self: Sized;
}

impl<T> Backing<T> for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    #[inline]
    fn insert(&mut self, index: usize, value: T) {
        Vec::insert(self, index, value);
    }

    #[inline]
    fn remove(&mut self, index: usize) -> T {
        Vec::remove(self, index)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn release(&mut self) {
        *self = Vec::new();
    }

    fn reserve(&mut self, additional: usize) {
        Vec::reserve(self, additional);
    }

    fn try_reserve(&mut self, additional: usize) -> Result<()> {
        Vec::try_reserve(self, additional).map_err(|_| Error::CapacityExceeded {
            requested: additional,
        })
    }

    fn footprint(&self) -> usize {
        size_of::<Self>() + Vec::capacity(self) * size_of::<T>()
    }

    fn retain<F: FnMut(&mut T) -> bool>(&mut self, f: F) {
        self.retain_mut(f);
    }

    fn split_off(&mut self, at: usize) -> Self {
        Vec::split_off(self, at)
    }
}

#[cfg(feature = "smallvec")]
impl<A: smallvec::Array> Backing<A::Item> for smallvec::SmallVec<A> {
    #[inline]
    fn len(&self) -> usize {
        smallvec::SmallVec::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        smallvec::SmallVec::capacity(self)
    }

    #[inline]
    fn as_slice(&self) -> &[A::Item] {
        self
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [A::Item] {
        self
    }

    #[inline]
    fn insert(&mut self, index: usize, value: A::Item) {
        smallvec::SmallVec::insert(self, index, value);
    }

    #[inline]
    fn remove(&mut self, index: usize) -> A::Item {
        smallvec::SmallVec::remove(self, index)
    }

    fn clear(&mut self) {
        smallvec::SmallVec::clear(self);
    }

    fn release(&mut self) {
        *self = smallvec::SmallVec::new();
    }

    fn reserve(&mut self, additional: usize) {
        smallvec::SmallVec::reserve(self, additional);
    }

    fn try_reserve(&mut self, additional: usize) -> Result<()> {
        smallvec::SmallVec::try_reserve(self, additional).map_err(|_| Error::CapacityExceeded {
            requested: additional,
        })
    }

    fn footprint(&self) -> usize {
        let heap = if self.spilled() {
            smallvec::SmallVec::capacity(self) * size_of::<A::Item>()
        } else {
            0
        };
        size_of::<Self>() + heap
    }

    fn retain<F: FnMut(&mut A::Item) -> bool>(&mut self, f: F) {
        smallvec::SmallVec::retain(self, f);
    }

    fn split_off(&mut self, at: usize) -> Self {
        self.drain(at..).collect()
    }
}

#[cfg(feature = "arrayvec")]
impl<T, const N: usize> Backing<T> for arrayvec::ArrayVec<T, N> {
    #[inline]
    fn len(&self) -> usize {
        arrayvec::ArrayVec::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        N
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    #[inline]
    fn insert(&mut self, index: usize, value: T) {
        arrayvec::ArrayVec::insert(self, index, value);
    }

    #[inline]
    fn remove(&mut self, index: usize) -> T {
        arrayvec::ArrayVec::remove(self, index)
    }

    fn clear(&mut self) {
        arrayvec::ArrayVec::clear(self);
    }

    // Inline storage: nothing to give back.
    fn release(&mut self) {
        arrayvec::ArrayVec::clear(self);
    }

    fn reserve(&mut self, additional: usize) {
        debug_assert!(
            additional <= self.remaining_capacity(),
            "ArrayVec<_, {}> cannot reserve {} more",
            N,
            additional
        );
    }

    fn try_reserve(&mut self, additional: usize) -> Result<()> {
        if additional <= self.remaining_capacity() {
            Ok(())
        } else {
            Err(Error::CapacityExceeded { requested: additional })
        }
    }

    fn footprint(&self) -> usize {
        size_of::<Self>()
    }

    fn retain<F: FnMut(&mut T) -> bool>(&mut self, f: F) {
        arrayvec::ArrayVec::retain(self, f);
    }

    fn split_off(&mut self, at: usize) -> Self {
        self.drain(at..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill<B: Backing<u32>>(store: &mut B, values: &[u32]) {
        for &value in values {
            let len = store.len();
            store.insert(len, value);
        }
    }

    #[test]
    fn vec_insert_and_remove_shift() {
        let mut store: Vec<u32> = Vec::new();
        fill(&mut store, &[1, 3]);
        Backing::insert(&mut store, 1, 2);
        assert_eq!(Backing::as_slice(&store), &[1, 2, 3]);
        assert_eq!(Backing::remove(&mut store, 0), 1);
        assert_eq!(Backing::as_slice(&store), &[2, 3]);
    }

    #[test]
    fn vec_clear_keeps_capacity_release_frees() {
        let mut store: Vec<u32> = Vec::new();
        Backing::reserve(&mut store, 32);
        fill(&mut store, &[1, 2, 3]);
        Backing::clear(&mut store);
        assert!(Backing::is_empty(&store));
        assert!(Backing::capacity(&store) >= 32);
        Backing::release(&mut store);
        assert_eq!(Backing::capacity(&store), 0);
        assert_eq!(Backing::footprint(&store), size_of::<Vec<u32>>());
    }

    #[test]
    fn vec_footprint_counts_capacity() {
        let mut store: Vec<u64> = Vec::with_capacity(10);
        let cap = Backing::capacity(&store);
        assert_eq!(Backing::footprint(&store), size_of::<Vec<u64>>() + cap * 8);
        Backing::insert(&mut store, 0, 7);
        assert_eq!(Backing::footprint(&store), size_of::<Vec<u64>>() + cap * 8);
    }

    #[test]
    fn vec_try_reserve_overflow_is_reported() {
        let mut store: Vec<u64> = Vec::new();
        assert_eq!(
            Backing::try_reserve(&mut store, usize::MAX),
            Err(Error::CapacityExceeded { requested: usize::MAX })
        );
    }

    #[test]
    fn vec_split_off_and_retain() {
        let mut store: Vec<u32> = (0..6).collect();
        let tail = Backing::split_off(&mut store, 4);
        assert_eq!(tail, [4, 5]);
        Backing::retain(&mut store, |v| *v % 2 == 0);
        assert_eq!(store, [0, 2]);
    }

    #[cfg(feature = "smallvec")]
    #[test]
    fn smallvec_footprint_tracks_spill() {
        let mut store: smallvec::SmallVec<[u32; 4]> = smallvec::SmallVec::new();
        fill(&mut store, &[1, 2, 3, 4]);
        assert_eq!(Backing::footprint(&store), size_of::<smallvec::SmallVec<[u32; 4]>>());
        fill(&mut store, &[5]);
        assert!(store.spilled());
        assert!(Backing::footprint(&store) > size_of::<smallvec::SmallVec<[u32; 4]>>());
        Backing::release(&mut store);
        assert!(!store.spilled());
    }

    #[cfg(feature = "arrayvec")]
    #[test]
    fn arrayvec_reports_full() {
        let mut store: arrayvec::ArrayVec<u32, 2> = arrayvec::ArrayVec::new();
        fill(&mut store, &[1]);
        assert_eq!(Backing::try_reserve(&mut store, 1), Ok(()));
        assert_eq!(
            Backing::try_reserve(&mut store, 2),
            Err(Error::CapacityExceeded { requested: 2 })
        );
        assert_eq!(Backing::footprint(&store), size_of::<arrayvec::ArrayVec<u32, 2>>());
    }
}
