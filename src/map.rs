use core::borrow::Borrow;
use core::fmt;
use core::iter::{FusedIterator, Map};
use core::marker::PhantomData;
use core::mem::size_of;
use core::ops::{Bound, Index, RangeBounds};
use core::slice;

use crate::backing::Backing;
use crate::compare::{Compare, Less};
use crate::error::{Error, Result};

/// One stored entry. The key is fixed once the entry is in a map, the value
/// can be changed in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyValue<K, V> {
    key: K,
    pub value: V,
}

impl<K, V> KeyValue<K, V> {
    pub const fn new(key: K, value: V) -> Self {
        KeyValue { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    pub fn pair_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Where a keyed insertion landed.
///
/// `Inserted` means the key was absent and a new entry now sits at the
/// index; `Existing` means the key was already stored at the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    Inserted(usize),
    Existing(usize),
}

impl Placement {
    pub fn index(self) -> usize {
        match self {
            Placement::Inserted(pos) | Placement::Existing(pos) => pos,
        }
    }

    pub fn is_inserted(self) -> bool {
        matches!(self, Placement::Inserted(_))
    }
}

/// A map stored as one array of entries sorted by key.
///
/// Lookups are a binary search, insertions and removals shift the tail of the
/// array. That makes it compact and cache friendly for small maps and very
/// slow for big ones: keep it to a few hundred entries.
///
/// `S` is the array the entries live in (see [`Backing`]) and `C` the
/// ordering (see [`Compare`]).
///
/// # Invariants
///
/// 1. Entries are strictly ascending under `C`.
/// 2. No two entries have equal keys.
///
/// Every method keeps both, with two exceptions: [`insert_at`] trusts the
/// position it is given, and [`backing_mut_unchecked`] hands out the raw
/// array.
///
/// [`insert_at`]: FlatMap::insert_at
/// [`backing_mut_unchecked`]: FlatMap::backing_mut_unchecked
///
/// ```
/// use flatmap::FlatMap;
///
/// let mut map = FlatMap::new();
/// assert!(map.set(5, "a").is_inserted());
/// assert!(map.set(3, "b").is_inserted());
/// assert!(!map.set(5, "c").is_inserted());
///
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 5]);
/// assert_eq!(map.get(&5), Some(&"c"));
/// assert_eq!(map.first_ge(&4), 1);
/// ```
#[derive(Clone)]
pub struct FlatMap<K, V, S = Vec<KeyValue<K, V>>, C = Less> {
    backing: S,
    comp: C,
    entries: PhantomData<fn() -> KeyValue<K, V>>,
}

// Iterator types
pub struct Iter<'a, K: 'a, V: 'a>(slice::Iter<'a, KeyValue<K, V>>);
pub struct IterMut<'a, K: 'a, V: 'a>(slice::IterMut<'a, KeyValue<K, V>>);
pub struct Keys<'a, K: 'a, V: 'a>(Iter<'a, K, V>);
pub struct Values<'a, K: 'a, V: 'a>(Iter<'a, K, V>);
pub struct ValuesMut<'a, K: 'a, V: 'a>(IterMut<'a, K, V>);
pub struct IntoIter<I>(I);

pub type IntoKeys<I, K, V> = Map<IntoIter<I>, fn((K, V)) -> K>;
pub type IntoValues<I, K, V> = Map<IntoIter<I>, fn((K, V)) -> V>;

fn only_key<K, V>((k, _): (K, V)) -> K {k}
fn only_val<K, V>((_, v): (K, V)) -> V {v}

impl<K, V> FlatMap<K, V> {
    pub const fn new() -> Self {
        FlatMap {
            backing: Vec::new(),
            comp: Less,
            entries: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        FlatMap {
            backing: Vec::with_capacity(capacity),
            comp: Less,
            entries: PhantomData,
        }
    }
}

impl<K, V, S, C> FlatMap<K, V, S, C>
where
    S: Backing<KeyValue<K, V>> + Default,
{
    pub fn with_comparator(comp: C) -> Self {
        FlatMap {
            backing: S::default(),
            comp,
            entries: PhantomData,
        }
    }
}

impl<K, V, S, C> FlatMap<K, V, S, C>
where
    S: Backing<KeyValue<K, V>>,
{
    // --- Size and storage ---

    #[inline]
    pub fn len(&self) -> usize {
        self.backing.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.backing.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.backing.capacity()
    }

    /// Bytes taken by the map: its own fields plus the backing store's
    /// struct and heap buffer.
    pub fn footprint(&self) -> usize {
        size_of::<Self>() - size_of::<S>() + self.backing.footprint()
    }

    /// Removes every entry, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.backing.clear();
    }

    /// Removes every entry and releases the backing storage.
    pub fn reset(&mut self) {
        log::trace!("releasing flat map storage ({} entries)", self.len());
        self.backing.release();
    }

    /// Makes room for at least `additional` more entries.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`. A fixed-capacity store
    /// panics in debug builds when `additional` exceeds its remaining room;
    /// use [`try_reserve`](Self::try_reserve) to get an error instead.
    pub fn reserve(&mut self, additional: usize) {
        log::trace!("reserving {additional} entries on top of {}", self.len());
        self.backing.reserve(additional);
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.backing
            .try_reserve(additional)
            .inspect_err(|err| log::debug!("flat map reserve failed: {err}"))
    }

    /// Exchanges the contents (storage and comparator) of two maps without
    /// touching any entry.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    pub fn comparator(&self) -> &C {
        &self.comp
    }

    pub fn backing(&self) -> &S {
        &self.backing
    }

    /// Raw mutable access to the backing store.
    ///
    /// Nothing stops the caller from reordering or duplicating keys through
    /// this reference. Until order is restored every keyed operation on the
    /// map returns unspecified results; [`check_order`](Self::check_order)
    /// tells whether the map is usable again.
    pub fn backing_mut_unchecked(&mut self) -> &mut S {
        &mut self.backing
    }

    pub fn into_backing(self) -> S {
        self.backing
    }

    // --- Index based access ---

    /// The entries in ascending key order.
    #[inline]
    pub fn as_slice(&self) -> &[KeyValue<K, V>] {
        self.backing.as_slice()
    }

    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.as_slice().get(index).map(KeyValue::pair)
    }

    pub fn get_index_mut(&mut self, index: usize) -> Option<(&K, &mut V)> {
        self.backing.as_mut_slice().get_mut(index).map(KeyValue::pair_mut)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.as_slice().first().map(KeyValue::pair)
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.as_slice().last().map(KeyValue::pair)
    }

    /// Removes the entry at `pos`, shifting later entries left.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= len()`.
    pub fn remove_index(&mut self, pos: usize) -> KeyValue<K, V> {
        debug_assert!(
            pos < self.len(),
            "remove_index: position {pos} out of range for {} entries",
            self.len()
        );
        self.backing.remove(pos)
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            None
        } else {
            Some(self.backing.remove(0).into_pair())
        }
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.len().checked_sub(1)?;
        Some(self.backing.remove(last).into_pair())
    }

    /// Keeps only the entries for which `f` returns `true`.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.backing.retain(|kv| f(&kv.key, &mut kv.value));
    }

    // --- Traversal ---

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter(self.as_slice().iter())
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut(self.backing.as_mut_slice().iter_mut())
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }
}

impl<K, V, S, C> FlatMap<K, V, S, C>
where
    S: Backing<KeyValue<K, V>>,
{
    // --- Auxiliary Functions ---

    /// Whether the entry at `pos` exists and has a key equal to `key`.
    /// Only meaningful when `pos` came from `first_ge(key)`.
    #[inline]
    fn matches<Q>(&self, pos: usize, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.as_slice()
            .get(pos)
            .is_some_and(|kv| !self.comp.less(key, kv.key.borrow()))
    }

    // --- Positioning ---

    /// Index of the first entry whose key is not less than `key`, in
    /// `0..=len()`: where `key` is stored, or where it would be inserted.
    ///
    /// Equals the number of entries with keys strictly less than `key`.
    pub fn first_ge<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let entries = self.as_slice();
        // answer in [base, base + span)
        let mut base = 0;
        let mut span = entries.len() + 1;
        while span > 1 {
            let step = span >> 1;
            if self.comp.less(entries[base + step - 1].key.borrow(), key) {
                base += step;
            }
            span -= step;
        }
        base
    }

    /// Index of the first entry whose key is greater than `key`.
    pub fn first_gt<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let entries = self.as_slice();
        let mut base = 0;
        let mut span = entries.len() + 1;
        while span > 1 {
            let step = span >> 1;
            if !self.comp.less(key, entries[base + step - 1].key.borrow()) {
                base += step;
            }
            span -= step;
        }
        base
    }

    // --- Lookup ---

    pub fn find<Q>(&self, key: &Q) -> Option<&KeyValue<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.find_index(key).map(|pos| &self.as_slice()[pos])
    }

    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut KeyValue<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let pos = self.find_index(key)?;
        Some(&mut self.backing.as_mut_slice()[pos])
    }

    pub fn find_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let pos = self.first_ge(key);
        self.matches(pos, key).then_some(pos)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.find_index(key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.find(key).map(|kv| &kv.value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.find_mut(key).map(|kv| &mut kv.value)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.find(key).map(KeyValue::pair)
    }

    /// Copy of the value stored under `key`, or `default` when there is
    /// none. Never inserts.
    pub fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
        V: Clone,
    {
        match self.get(key) {
            Some(value) => value.clone(),
            None => default,
        }
    }

    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
        V: Clone + Default,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Entries with keys inside `range`, in ascending order.
    ///
    /// A range whose start lies past its end yields nothing.
    pub fn range<Q, R>(&self, range: R) -> Iter<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
        R: RangeBounds<Q>,
    {
        let (start, end) = self.range_indices(&range);
        Iter(self.as_slice()[start..end].iter())
    }

    pub fn range_mut<Q, R>(&mut self, range: R) -> IterMut<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
        R: RangeBounds<Q>,
    {
        let (start, end) = self.range_indices(&range);
        IterMut(self.backing.as_mut_slice()[start..end].iter_mut())
    }

    fn range_indices<Q, R>(&self, range: &R) -> (usize, usize)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
        R: RangeBounds<Q>,
    {
        let start = match range.start_bound() {
            Bound::Included(key) => self.first_ge(key),
            Bound::Excluded(key) => self.first_gt(key),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(key) => self.first_gt(key),
            Bound::Excluded(key) => self.first_ge(key),
            Bound::Unbounded => self.len(),
        };
        (start, end.max(start))
    }

    // --- Removal ---

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.remove_full(key).ok().map(|(_, kv)| kv.value)
    }

    /// Removes the entry for `key`.
    ///
    /// Returns `Ok` with the index the entry occupied and the entry itself,
    /// or `Err` with the index where the key would have been. The map is
    /// unchanged in the `Err` case.
    pub fn remove_full<Q>(&mut self, key: &Q) -> Result<(usize, KeyValue<K, V>), usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let pos = self.first_ge(key);
        if self.matches(pos, key) {
            Ok((pos, self.backing.remove(pos)))
        } else {
            Err(pos)
        }
    }

    /// Moves every entry with a key not less than `key` into a new map.
    pub fn split_off<Q>(&mut self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q> + Clone,
    {
        let at = self.first_ge(key);
        FlatMap {
            backing: self.backing.split_off(at),
            comp: self.comp.clone(),
            entries: PhantomData,
        }
    }
}

impl<K, V, S, C> FlatMap<K, V, S, C>
where
    S: Backing<KeyValue<K, V>>,
    C: Compare<K>,
{
    /// Adopts an already filled backing store.
    ///
    /// Fails with [`Error::Unordered`] or [`Error::Duplicate`] naming the
    /// first offending index if the entries are not strictly ascending.
    pub fn from_backing(backing: S, comp: C) -> Result<Self> {
        let map = FlatMap {
            backing,
            comp,
            entries: PhantomData,
        };
        map.check_order()
            .inspect_err(|err| log::debug!("rejected backing store: {err}"))?;
        Ok(map)
    }

    /// Verifies that keys are strictly ascending.
    pub fn check_order(&self) -> Result<()> {
        for (i, pair) in self.as_slice().windows(2).enumerate() {
            let (prev, next) = (&pair[0].key, &pair[1].key);
            if self.comp.less(next, prev) {
                return Err(Error::Unordered { pos: i + 1 });
            }
            if !self.comp.less(prev, next) {
                return Err(Error::Duplicate { pos: i + 1 });
            }
        }
        Ok(())
    }

    fn check_position(&self, pos: usize, key: &K) -> Result<()> {
        let entries = self.as_slice();
        if pos > entries.len() {
            return Err(Error::OutOfRange { pos, len: entries.len() });
        }
        if let Some(prev) = pos.checked_sub(1).map(|i| &entries[i]) {
            if self.comp.less(key, &prev.key) {
                return Err(Error::Unordered { pos });
            }
            if !self.comp.less(&prev.key, key) {
                return Err(Error::Duplicate { pos: pos - 1 });
            }
        }
        if let Some(next) = entries.get(pos) {
            if self.comp.less(&next.key, key) {
                return Err(Error::Unordered { pos });
            }
            if !self.comp.less(key, &next.key) {
                return Err(Error::Duplicate { pos });
            }
        }
        Ok(())
    }

    // --- Insertion ---

    /// Inserts at a position found earlier, typically by
    /// [`first_ge`](Self::first_ge). No search, no duplicate check.
    ///
    /// The entry before `pos` must be less than `key` and the entry at `pos`
    /// greater. Debug builds assert this; release builds trust the caller,
    /// and a wrong position leaves the map out of order.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len()`, if a fixed-capacity store is full, and, with
    /// debug assertions, if `pos` does not keep keys strictly ascending.
    pub fn insert_at(&mut self, pos: usize, key: K, value: V) {
        debug_assert_eq!(
            self.check_position(pos, &key),
            Ok(()),
            "insert_at: position {pos} does not fit the key"
        );
        self.backing.insert(pos, KeyValue { key, value });
    }

    /// [`insert_at`](Self::insert_at) with the position checked in every
    /// build. Nothing is inserted on error.
    pub fn try_insert_at(&mut self, pos: usize, key: K, value: V) -> Result<()> {
        self.check_position(pos, &key)
            .and_then(|()| self.backing.try_reserve(1))
            .inspect_err(|err| log::debug!("rejected insert at {pos}: {err}"))?;
        self.backing.insert(pos, KeyValue { key, value });
        Ok(())
    }

    /// Mutable reference to the value for `key`, inserting `V::default()`
    /// first if the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let pos = self.first_ge(&key);
        if !self.matches(pos, &key) {
            self.insert_at(pos, key, f());
        }
        &mut self.backing.as_mut_slice()[pos].value
    }

    /// Stores `value` under `key`, overwriting any previous value.
    ///
    /// The stored key is kept when the key was already present.
    pub fn set(&mut self, key: K, value: V) -> Placement {
        let pos = self.first_ge(&key);
        if self.matches(pos, &key) {
            self.backing.as_mut_slice()[pos].value = value;
            Placement::Existing(pos)
        } else {
            self.insert_at(pos, key, value);
            Placement::Inserted(pos)
        }
    }

    /// Like [`set`](Self::set), but fails instead of panicking when the
    /// backing store cannot grow.
    pub fn try_set(&mut self, key: K, value: V) -> Result<Placement> {
        let pos = self.first_ge(&key);
        if self.matches(pos, &key) {
            self.backing.as_mut_slice()[pos].value = value;
            return Ok(Placement::Existing(pos));
        }
        self.backing
            .try_reserve(1)
            .inspect_err(|err| log::debug!("rejected set at {pos}: {err}"))?;
        self.insert_at(pos, key, value);
        Ok(Placement::Inserted(pos))
    }

    /// Stores `value` under `key` and returns the value it replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let pos = self.first_ge(&key);
        if self.matches(pos, &key) {
            Some(core::mem::replace(&mut self.backing.as_mut_slice()[pos].value, value))
        } else {
            self.insert_at(pos, key, value);
            None
        }
    }

    /// Stores `value` only if `key` is absent; an existing entry is left
    /// untouched.
    pub fn add_if_new(&mut self, key: K, value: V) -> Placement {
        let pos = self.first_ge(&key);
        if self.matches(pos, &key) {
            Placement::Existing(pos)
        } else {
            self.insert_at(pos, key, value);
            Placement::Inserted(pos)
        }
    }

    /// Moves every entry of `other` into `self`. On equal keys the entry
    /// from `other` wins.
    ///
    /// Both runs are merged from the back in one pass; entries of `self`
    /// below the smallest key of `other` are never moved.
    ///
    /// # Panics
    ///
    /// Panics if a fixed-capacity store cannot hold the merged entries.
    pub fn append(&mut self, other: &mut Self) {
        if other.is_empty() {
            return;
        }
        log::trace!("merging {} entries into {}", other.len(), self.len());

        let mut ours = self.backing.len();
        let mut theirs = other.backing.len();
        let mut merged = Vec::with_capacity(ours + theirs);
        while theirs > 0 {
            let ours_is_last = ours > 0
                && self.comp.less(
                    &other.backing.as_slice()[theirs - 1].key,
                    &self.backing.as_slice()[ours - 1].key,
                );
            if ours_is_last {
                ours -= 1;
                merged.push(self.backing.remove(ours));
                continue;
            }
            theirs -= 1;
            let entry = other.backing.remove(theirs);
            if ours > 0 && !self.comp.less(&self.backing.as_slice()[ours - 1].key, &entry.key) {
                // Same key on both sides.
                ours -= 1;
                self.backing.remove(ours);
            }
            merged.push(entry);
        }

        // `merged` is descending and every key in it is above the `ours` kept
        // in place.
        self.reserve(merged.len());
        while let Some(entry) = merged.pop() {
            let end = self.backing.len();
            self.backing.insert(end, entry);
        }
    }
}

impl<K, V, S, C> Default for FlatMap<K, V, S, C>
where
    S: Backing<KeyValue<K, V>> + Default,
    C: Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, S, C> fmt::Debug for FlatMap<K, V, S, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    S: Backing<KeyValue<K, V>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S, C> PartialEq for FlatMap<K, V, S, C>
where
    K: PartialEq,
    V: PartialEq,
    S: Backing<KeyValue<K, V>>,
{
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<K: Eq, V: Eq, S: Backing<KeyValue<K, V>>, C> Eq for FlatMap<K, V, S, C> {}

impl<K, V, S, C, Q> Index<&Q> for FlatMap<K, V, S, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    S: Backing<KeyValue<K, V>>,
    C: Compare<Q>,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found in flat map"),
        }
    }
}

impl<K, V, S, C> Extend<(K, V)> for FlatMap<K, V, S, C>
where
    S: Backing<KeyValue<K, V>>,
    C: Compare<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K, V, S, C> FromIterator<(K, V)> for FlatMap<K, V, S, C>
where
    S: Backing<KeyValue<K, V>> + Default,
    C: Compare<K> + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for FlatMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        let mut map = FlatMap::with_capacity(N);
        map.extend(arr);
        map
    }
}

impl<K, V, S, C> FlatMap<K, V, S, C>
where
    S: Backing<KeyValue<K, V>> + IntoIterator<Item = KeyValue<K, V>>,
{
    pub fn into_keys(self) -> IntoKeys<S::IntoIter, K, V> {
        self.into_iter().map(only_key)
    }

    pub fn into_values(self) -> IntoValues<S::IntoIter, K, V> {
        self.into_iter().map(only_val)
    }
}

impl<K, V, S, C> IntoIterator for FlatMap<K, V, S, C>
where
    S: Backing<KeyValue<K, V>> + IntoIterator<Item = KeyValue<K, V>>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<S::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.backing.into_iter())
    }
}

impl<'a, K, V, S, C> IntoIterator for &'a FlatMap<K, V, S, C>
where
    S: Backing<KeyValue<K, V>>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S, C> IntoIterator for &'a mut FlatMap<K, V, S, C>
where
    S: Backing<KeyValue<K, V>>,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// --- Iterator Implementations ---

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(KeyValue::pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(KeyValue::pair)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter(self.0.clone())
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(KeyValue::pair_mut)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(KeyValue::pair_mut)
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V, I> Iterator for IntoIter<I>
where
    I: Iterator<Item = KeyValue<K, V>>,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(KeyValue::into_pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V, I> DoubleEndedIterator for IntoIter<I>
where
    I: DoubleEndedIterator<Item = KeyValue<K, V>>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(KeyValue::into_pair)
    }
}

impl<K, V, I> ExactSizeIterator for IntoIter<I>
where
    I: ExactSizeIterator<Item = KeyValue<K, V>>,
{
}

impl<K, V, I> FusedIterator for IntoIter<I>
where
    I: FusedIterator<Item = KeyValue<K, V>>,
{
}
