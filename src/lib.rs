//! An ordered map kept in a single contiguous array sorted by key.
//!
//! Compared to `BTreeMap` a [`FlatMap`] has no per-node overhead, lookups
//! are a binary search over adjacent memory, and iteration is a slice walk.
//! Modifications cost O(n) because they shift the tail of the array, so the
//! map is meant for a few hundred entries at most.
//!
//! Every keyed operation is built on [`FlatMap::first_ge`], the lower-bound
//! search. Its result can be kept and handed back to
//! [`FlatMap::insert_at`] to insert without searching twice:
//!
//! ```
//! use flatmap::FlatMap;
//!
//! let mut map: FlatMap<u32, &str> = [(10, "ten"), (30, "thirty")].into();
//! let pos = map.first_ge(&20);
//! if map.get_index(pos).map(|(k, _)| *k) != Some(20) {
//!     map.insert_at(pos, 20, "twenty");
//! }
//! assert_eq!(map.values().copied().collect::<Vec<_>>(), ["ten", "twenty", "thirty"]);
//! ```
//!
//! The array type and the ordering are both type parameters. Any
//! [`Backing`] store works; `Vec` is the default, `SmallVec` and `ArrayVec`
//! are available behind the `smallvec` and `arrayvec` features. The
//! ordering is any [`Compare`] implementation, [`Less`] by default.
//!
//! The map does no locking. Mutation needs `&mut`, so sharing one across
//! threads takes an external lock like any other collection.

mod backing;
mod compare;
mod error;
mod map;
#[cfg(feature = "serde")]
mod serde_impl;

pub use backing::Backing;
pub use compare::{ByFn, Compare, Greater, Less, Reverse};
pub use error::{Error, Result};
pub use map::{
    FlatMap, IntoIter, IntoKeys, IntoValues, Iter, IterMut, KeyValue, Keys, Placement, Values,
    ValuesMut,
};

/// A flat map keeping up to `N` entries inline before spilling to the heap.
#[cfg(feature = "smallvec")]
pub type SmallFlatMap<K, V, const N: usize, C = Less> =
    FlatMap<K, V, smallvec::SmallVec<[KeyValue<K, V>; N]>, C>;

/// A flat map with a fixed capacity of `N` entries and no heap storage.
#[cfg(feature = "arrayvec")]
pub type StaticFlatMap<K, V, const N: usize, C = Less> =
    FlatMap<K, V, arrayvec::ArrayVec<KeyValue<K, V>, N>, C>;
