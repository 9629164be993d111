// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An unordered persistent map.
//!
//! An immutable hash map backed by a [hash array mapped trie][1]: a tree
//! branching 32 ways on successive 5-bit chunks of a key's 32-bit hash, with
//! every node keeping its occupants in a popcount-compacted array so empty
//! slots cost nothing. Keys whose hashes fully collide share a small linear
//! collision bucket at the bottom of the tree.
//!
//! Lookup, insertion and removal are O(log<sub>32</sub> n). Writes clone only
//! the nodes on the path from the root to the touched slot; the rest of the
//! tree is shared with the previous version, which remains valid forever.
//!
//! Keys must implement [`MapKey`], a sealed trait covering strings and the
//! primitive integers. The hash seed is owned by the map, so derived versions
//! of one map always agree on where a key lives, while two independently
//! created maps generally do not.
//!
//! [1]: https://en.wikipedia.org/wiki/Hash_array_mapped_trie
//! [`MapKey`]: ../trait.MapKey.html

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::{Debug, Error, Formatter};
use std::hash::BuildHasher;
use std::iter::{FromIterator, FusedIterator};
use std::ops::Index;

use archery::{SharedPointer, SharedPointerKind};

use crate::hash::MapKey;
use crate::nodes::hamt::{hash_key, Drain as NodeDrain, HashValue, Iter as NodeIter, Node};
use crate::shared_ptr::DefaultSharedPtr;

/// Construct a hash map from a sequence of key/value pairs.
///
/// # Examples
///
/// ```
/// # #[macro_use] extern crate verso;
/// # use verso::HashMap;
/// # fn main() {
/// assert_eq!(
///   hashmap!{
///     1 => 11,
///     2 => 22,
///     3 => 33
///   },
///   HashMap::from(vec![(1, 11), (2, 22), (3, 33)])
/// );
/// # }
/// ```
#[macro_export]
macro_rules! hashmap {
    () => { $crate::hash::map::HashMap::new() };

    ( $( $key:expr => $value:expr ),* ) => {{
        let mut map = $crate::hash::map::HashMap::new();
        $(
            map.insert($key, $value);
        )*
        map
    }};

    ( $( $key:expr => $value:expr ,)* ) => {{
        let mut map = $crate::hash::map::HashMap::new();
        $(
            map.insert($key, $value);
        )*
        map
    }};
}

/// Type alias for [`GenericHashMap`] that uses [`RandomState`] as the hasher
/// and [`DefaultSharedPtr`] as the pointer type.
///
/// [GenericHashMap]: ./struct.GenericHashMap.html
/// [RandomState]: https://doc.rust-lang.org/std/collections/hash_map/struct.RandomState.html
/// [DefaultSharedPtr]: ../../shared_ptr/type.DefaultSharedPtr.html
pub type HashMap<K, V> = GenericHashMap<K, V, RandomState, DefaultSharedPtr>;

/// An unordered persistent map.
///
/// Mutating methods like [`insert`][insert] work on a `&mut` handle through
/// copy-on-write, cloning only what is shared with other versions. The
/// persistent [`update`][update] and [`without`][without] methods return a new
/// map and leave the receiver untouched. Iteration visits entries in an
/// arbitrary but stable order: two maps derived from a common ancestor with
/// the same contents iterate identically.
///
/// [insert]: #method.insert
/// [update]: #method.update
/// [without]: #method.without
pub struct GenericHashMap<K, V, S, P: SharedPointerKind> {
    size: usize,
    root: Option<SharedPointer<Node<(K, V), P>, P>>,
    hasher: S,
}

impl<K: Eq, V> HashValue for (K, V) {
    type Key = K;

    fn extract_key(&self) -> &K {
        &self.0
    }
}

// We impl Clone instead of deriving it, because we want Clone even if K and V
// aren't.
impl<K, V, S: Clone, P: SharedPointerKind> Clone for GenericHashMap<K, V, S, P> {
    fn clone(&self) -> Self {
        GenericHashMap {
            size: self.size,
            root: self.root.clone(),
            hasher: self.hasher.clone(),
        }
    }
}

impl<K, V, S: Default, P: SharedPointerKind> GenericHashMap<K, V, S, P> {
    /// Construct an empty hash map.
    ///
    /// The hash seed is drawn from the hasher's `Default` instance; for the
    /// standard [`HashMap`] alias that means a fresh random seed per map.
    ///
    /// [`HashMap`]: ./type.HashMap.html
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S, P: SharedPointerKind> GenericHashMap<K, V, S, P> {
    /// Construct an empty hash map using a specific hasher.
    #[inline]
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        GenericHashMap {
            size: 0,
            root: None,
            hasher,
        }
    }

    /// Get a reference to the map's [`BuildHasher`][BuildHasher].
    ///
    /// [BuildHasher]: https://doc.rust-lang.org/std/hash/trait.BuildHasher.html
    #[must_use]
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Get the size of a hash map.
    ///
    /// Time: O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate verso;
    /// assert_eq!(3, hashmap!{1 => 11, 2 => 22, 3 => 33}.len());
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Test whether a hash map is empty.
    ///
    /// Time: O(1)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Test whether two maps refer to the same content in memory.
    ///
    /// This is true if the two sides are references to the same map, or if
    /// the two maps refer to the same root node.
    ///
    /// Time: O(1)
    pub fn ptr_eq(&self, other: &Self) -> bool {
        let roots = match (&self.root, &other.root) {
            (Some(a), Some(b)) => SharedPointer::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        roots && self.size == other.size
    }

    /// Get an iterator over the key/value pairs of a hash map.
    ///
    /// The order is arbitrary but stable between maps that share structure.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, P> {
        Iter {
            it: NodeIter::new(self.root.as_deref(), self.size),
        }
    }

    /// Get an iterator over a hash map's keys.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V, P> {
        Keys { it: self.iter() }
    }

    /// Get an iterator over a hash map's values.
    #[inline]
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V, P> {
        Values { it: self.iter() }
    }
}

impl<K, V, S, P> GenericHashMap<K, V, S, P>
where
    K: MapKey,
    S: BuildHasher,
    P: SharedPointerKind,
{
    /// Get the value for a key from a hash map.
    ///
    /// Time: O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate verso;
    /// let map = hashmap!{123 => "lol"};
    /// assert_eq!(Some(&"lol"), map.get(&123));
    /// ```
    #[must_use]
    pub fn get<BK>(&self, key: &BK) -> Option<&V>
    where
        BK: std::hash::Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Get the key/value pair for a key from a hash map.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn get_key_value<BK>(&self, key: &BK) -> Option<(&K, &V)>
    where
        BK: std::hash::Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        let root = self.root.as_ref()?;
        root.get(hash_key(&self.hasher, key), 0, key)
            .map(|(k, v)| (k, v))
    }

    /// Test for the presence of a key in a hash map.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn contains_key<BK>(&self, key: &BK) -> bool
    where
        BK: std::hash::Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        self.get(key).is_some()
    }
}

impl<K, V, S, P> GenericHashMap<K, V, S, P>
where
    K: MapKey + Clone,
    V: Clone,
    S: BuildHasher,
    P: SharedPointerKind,
{
    /// Construct a hash map with a single mapping.
    #[inline]
    #[must_use]
    pub fn unit(k: K, v: V) -> Self
    where
        S: Default,
    {
        let mut map = Self::new();
        map.insert(k, v);
        map
    }

    /// Get a mutable reference to the value for a key, if the key is present.
    ///
    /// This is a copy-on-write operation: nodes on the path to the value are
    /// cloned if they are shared with other versions, so those versions never
    /// observe the mutation.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn get_mut<BK>(&mut self, key: &BK) -> Option<&mut V>
    where
        BK: std::hash::Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        let hash = hash_key(&self.hasher, key);
        let root = self.root.as_mut()?;
        SharedPointer::make_mut(root)
            .get_mut(hash, 0, key)
            .map(|(_, v)| v)
    }

    /// Insert a key/value mapping into a map.
    ///
    /// If the map already has a mapping for the given key, the previous value
    /// is overwritten and returned.
    ///
    /// This is a copy-on-write operation: nodes shared with other versions
    /// are cloned before being written, so clones of this map are never
    /// affected.
    ///
    /// Time: O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate verso;
    /// # use verso::HashMap;
    /// let mut map = hashmap!{};
    /// map.insert(123, "123");
    /// map.insert(456, "456");
    /// assert_eq!(hashmap!{123 => "123", 456 => "456"}, map);
    /// ```
    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        let hash = hash_key(&self.hasher, &k);
        let hasher = &self.hasher;
        let root = self
            .root
            .get_or_insert_with(|| SharedPointer::new(Node::new()));
        let result = SharedPointer::make_mut(root).insert(hash, 0, (k, v), &|entry: &(K, V)| {
            hash_key(hasher, &entry.0)
        });
        match result {
            None => {
                self.size += 1;
                None
            }
            Some((_, old)) => Some(old),
        }
    }

    /// Remove a key/value pair from a map, if it exists, and return the
    /// removed value.
    ///
    /// Time: O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate verso;
    /// let mut map = hashmap!{123 => "123", 456 => "456"};
    /// assert_eq!(Some("123"), map.remove(&123));
    /// assert_eq!(None, map.remove(&789));
    /// assert_eq!(hashmap!{456 => "456"}, map);
    /// ```
    pub fn remove<BK>(&mut self, key: &BK) -> Option<V>
    where
        BK: std::hash::Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        self.remove_with_key(key).map(|(_, v)| v)
    }

    /// Remove a key/value pair from a map, if it exists, and return the
    /// removed key and value.
    ///
    /// Time: O(log n)
    pub fn remove_with_key<BK>(&mut self, key: &BK) -> Option<(K, V)>
    where
        BK: std::hash::Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        let hash = hash_key(&self.hasher, key);
        let root = self.root.as_mut()?;
        // Establish presence before going mutable: `make_mut` on a shared
        // root would clone it, and removing an absent key must leave the
        // map structurally untouched, not just observationally equal.
        root.get(hash, 0, key)?;
        let result = SharedPointer::make_mut(root).remove(hash, 0, key);
        if result.is_some() {
            self.size -= 1;
            if self.size == 0 {
                self.root = None;
            }
        }
        result
    }

    /// Construct a new map by inserting a key/value mapping into a map,
    /// leaving the current map unchanged.
    ///
    /// If the map already has a mapping for the given key, the previous value
    /// is overwritten in the new map.
    ///
    /// Time: O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate verso;
    /// let map = hashmap!{};
    /// assert_eq!(hashmap!{123 => "123"}, map.update(123, "123"));
    /// assert_eq!(hashmap!{}, map);
    /// ```
    #[must_use]
    pub fn update(&self, k: K, v: V) -> Self
    where
        S: Clone,
    {
        let mut out = self.clone();
        out.insert(k, v);
        out
    }

    /// Construct a new map without the given key, leaving the current map
    /// unchanged.
    ///
    /// If the key is not present, the new map is identical to the current
    /// one: **removing an absent key is a silent no-op, not an error.** Use
    /// [`remove`][remove] on a clone if you need to know whether anything was
    /// removed.
    ///
    /// Time: O(log n)
    ///
    /// [remove]: #method.remove
    #[must_use]
    pub fn without<BK>(&self, key: &BK) -> Self
    where
        BK: std::hash::Hash + Eq + ?Sized,
        K: Borrow<BK>,
        S: Clone,
    {
        let mut out = self.clone();
        out.remove(key);
        out
    }
}

impl<K, V, S: Default, P: SharedPointerKind> Default for GenericHashMap<K, V, S, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Debug, V: Debug, S, P: SharedPointerKind> Debug for GenericHashMap<K, V, S, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S, P> PartialEq for GenericHashMap<K, V, S, P>
where
    K: MapKey,
    V: PartialEq,
    S: BuildHasher,
    P: SharedPointerKind,
{
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size {
            return false;
        }
        if self.ptr_eq(other) {
            return true;
        }
        self.iter()
            .all(|(k, v)| other.get(k).map_or(false, |ov| v == ov))
    }
}

impl<K, V, S, P> Eq for GenericHashMap<K, V, S, P>
where
    K: MapKey,
    V: Eq,
    S: BuildHasher,
    P: SharedPointerKind,
{
}

impl<'a, BK, K, V, S, P> Index<&'a BK> for GenericHashMap<K, V, S, P>
where
    BK: std::hash::Hash + Eq + ?Sized,
    K: MapKey + Borrow<BK>,
    S: BuildHasher,
    P: SharedPointerKind,
{
    type Output = V;

    fn index(&self, key: &BK) -> &Self::Output {
        match self.get(key) {
            Some(value) => value,
            None => panic!("HashMap::index: invalid key"),
        }
    }
}

impl<K, V, S, P> FromIterator<(K, V)> for GenericHashMap<K, V, S, P>
where
    K: MapKey + Clone,
    V: Clone,
    S: BuildHasher + Default,
    P: SharedPointerKind,
{
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K, V, S, P> Extend<(K, V)> for GenericHashMap<K, V, S, P>
where
    K: MapKey + Clone,
    V: Clone,
    S: BuildHasher,
    P: SharedPointerKind,
{
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S, P> From<Vec<(K, V)>> for GenericHashMap<K, V, S, P>
where
    K: MapKey + Clone,
    V: Clone,
    S: BuildHasher + Default,
    P: SharedPointerKind,
{
    fn from(vec: Vec<(K, V)>) -> Self {
        vec.into_iter().collect()
    }
}

// Iterators

/// An iterator over the key/value pairs of a hash map.
pub struct Iter<'a, K, V, P: SharedPointerKind> {
    it: NodeIter<'a, (K, V), P>,
}

// We impl Clone instead of deriving it, because we want Clone even if K and V
// aren't.
impl<'a, K, V, P: SharedPointerKind> Clone for Iter<'a, K, V, P> {
    fn clone(&self) -> Self {
        Iter {
            it: self.it.clone(),
        }
    }
}

impl<'a, K, V, P: SharedPointerKind> Iterator for Iter<'a, K, V, P> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K, V, P: SharedPointerKind> ExactSizeIterator for Iter<'a, K, V, P> {}

impl<'a, K, V, P: SharedPointerKind> FusedIterator for Iter<'a, K, V, P> {}

/// An iterator over the keys of a hash map.
pub struct Keys<'a, K, V, P: SharedPointerKind> {
    it: Iter<'a, K, V, P>,
}

impl<'a, K, V, P: SharedPointerKind> Iterator for Keys<'a, K, V, P> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K, V, P: SharedPointerKind> ExactSizeIterator for Keys<'a, K, V, P> {}

impl<'a, K, V, P: SharedPointerKind> FusedIterator for Keys<'a, K, V, P> {}

/// An iterator over the values of a hash map.
pub struct Values<'a, K, V, P: SharedPointerKind> {
    it: Iter<'a, K, V, P>,
}

impl<'a, K, V, P: SharedPointerKind> Iterator for Values<'a, K, V, P> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K, V, P: SharedPointerKind> ExactSizeIterator for Values<'a, K, V, P> {}

impl<'a, K, V, P: SharedPointerKind> FusedIterator for Values<'a, K, V, P> {}

/// A consuming iterator over the key/value pairs of a hash map.
///
/// Pairs still shared with other versions are cloned out of the structure.
pub struct ConsumingIter<K, V, P: SharedPointerKind> {
    it: NodeDrain<(K, V), P>,
}

impl<K: Clone, V: Clone, P: SharedPointerKind> Iterator for ConsumingIter<K, V, P> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.it.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K: Clone, V: Clone, P: SharedPointerKind> ExactSizeIterator for ConsumingIter<K, V, P> {}

impl<K: Clone, V: Clone, P: SharedPointerKind> FusedIterator for ConsumingIter<K, V, P> {}

impl<'a, K, V, S, P: SharedPointerKind> IntoIterator for &'a GenericHashMap<K, V, S, P> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, P>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Clone, V: Clone, S, P: SharedPointerKind> IntoIterator for GenericHashMap<K, V, S, P> {
    type Item = (K, V);
    type IntoIter = ConsumingIter<K, V, P>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        ConsumingIter {
            it: NodeDrain::new(self.root, self.size),
        }
    }
}

// Tests
