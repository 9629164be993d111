// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An ordered, integer-indexed persistent vector.
//!
//! An immutable vector backed by a [bit-partitioned vector trie][1]: a 32-way
//! branching tree keyed by successive 5-bit chunks of the element index, plus
//! a small uncommitted tail buffer that amortises the cost of appends.
//!
//! Random access and update are O(log<sub>32</sub> n), which is effectively
//! constant for any realistic size. Updates clone only the handful of nodes
//! on the path from the root to the touched leaf; every other subtree is
//! shared by reference with the previous version, which stays valid and
//! unchanged forever.
//!
//! [1]: https://hypirion.com/musings/understanding-persistent-vector-pt-1

use std::fmt::{Debug, Error, Formatter};
use std::iter::{FromIterator, FusedIterator};
use std::mem;
use std::ops::Index;

use archery::{SharedPointer, SharedPointerKind};

use crate::nodes::vector::{Node, ValueChunk, NODE_MASK, NODE_SHIFT, NODE_WIDTH};
use crate::shared_ptr::DefaultSharedPtr;
use crate::util::clone_ref;

/// Construct a vector from a sequence of elements.
///
/// # Examples
///
/// ```
/// # #[macro_use] extern crate verso;
/// # use verso::Vector;
/// # fn main() {
/// assert_eq!(
///   vector![1, 2, 3],
///   Vector::from(vec![1, 2, 3])
/// );
/// # }
/// ```
#[macro_export]
macro_rules! vector {
    () => { $crate::vector::Vector::new() };

    ( $($x:expr),* ) => {{
        let mut l = $crate::vector::Vector::new();
        $(
            l.push_back($x);
        )*
        l
    }};

    ( $($x:expr ,)* ) => {{
        let mut l = $crate::vector::Vector::new();
        $(
            l.push_back($x);
        )*
        l
    }};
}

/// Type alias for [`GenericVector`] that uses [`DefaultSharedPtr`] as the
/// pointer type.
///
/// [GenericVector]: ./struct.GenericVector.html
/// [DefaultSharedPtr]: ../shared_ptr/type.DefaultSharedPtr.html
pub type Vector<A> = GenericVector<A, DefaultSharedPtr>;

/// An ordered, integer-indexed persistent vector.
///
/// Elements below the tail offset live in a 32-way trie; the trailing up-to-32
/// elements live in the tail buffer, so most appends never touch the tree at
/// all. Mutating operations either work on a `&mut` handle through
/// copy-on-write (cloning only what is shared) or, like [`update`][update],
/// hand back a brand new vector and leave the receiver untouched.
///
/// Any number of threads may read the same version concurrently: no operation
/// ever writes through a shared node.
///
/// [update]: #method.update
pub struct GenericVector<A, P: SharedPointerKind> {
    root: Option<SharedPointer<Node<A, P>, P>>,
    tail: SharedPointer<ValueChunk<A>, P>,
    length: usize,
    shift: usize,
}

// We impl Clone instead of deriving it, because we want Clone even if A isn't.
impl<A, P: SharedPointerKind> Clone for GenericVector<A, P> {
    fn clone(&self) -> Self {
        GenericVector {
            root: self.root.clone(),
            tail: self.tail.clone(),
            length: self.length,
            shift: self.shift,
        }
    }
}

impl<A, P: SharedPointerKind> GenericVector<A, P> {
    /// Construct an empty vector.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        GenericVector {
            root: None,
            tail: SharedPointer::new(ValueChunk::new()),
            length: 0,
            shift: NODE_SHIFT,
        }
    }

    /// Get the length of a vector.
    ///
    /// Time: O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate verso;
    /// assert_eq!(3, vector![1, 2, 3].len());
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Test whether a vector is empty.
    ///
    /// Time: O(1)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Test whether two vectors refer to the same content in memory.
    ///
    /// This is true if the two sides are references to the same vector, or if
    /// the two vectors refer to the same root node and tail.
    ///
    /// Time: O(1)
    pub fn ptr_eq(&self, other: &Self) -> bool {
        let roots = match (&self.root, &other.root) {
            (Some(a), Some(b)) => SharedPointer::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        roots && SharedPointer::ptr_eq(&self.tail, &other.tail) && self.length == other.length
    }

    /// The index of the first element held in the tail buffer. Everything
    /// below it lives in the trie.
    #[inline]
    fn tail_offset(&self) -> usize {
        if self.length < NODE_WIDTH {
            0
        } else {
            ((self.length - 1) >> NODE_SHIFT) << NODE_SHIFT
        }
    }

    /// Get a reference to the element at index `index` in a vector.
    ///
    /// Returns `None` if the index is out of bounds.
    ///
    /// Time: O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate verso;
    /// let vec = vector!["Joe", "Mike", "Robert"];
    /// assert_eq!(Some(&"Robert"), vec.get(2));
    /// assert_eq!(None, vec.get(5));
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&A> {
        if index >= self.length {
            return None;
        }
        let offset = self.tail_offset();
        if index >= offset {
            Some(&self.tail[index - offset])
        } else {
            let root = self.root.as_ref()?;
            Some(root.get(index, self.shift))
        }
    }

    /// Get the first element of a vector.
    ///
    /// If the vector is empty, `None` is returned.
    ///
    /// Time: O(log n)
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<&A> {
        self.get(0)
    }

    /// Get the last element of a vector.
    ///
    /// If the vector is empty, `None` is returned.
    ///
    /// Time: O(1)
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<&A> {
        if self.length == 0 {
            None
        } else {
            self.tail.last()
        }
    }

    /// The leaf (or tail) slice holding `index`, along with the index of the
    /// slice's first element. Callers keep `index` within bounds.
    fn chunk_at(&self, index: usize) -> (usize, &[A]) {
        let offset = self.tail_offset();
        if index >= offset {
            (offset, &self.tail[..])
        } else {
            match &self.root {
                Some(root) => (index & !NODE_MASK, &root.leaf_for(index, self.shift)[..]),
                None => panic!(
                    "vector::GenericVector::chunk_at: index below the tail offset with no trie"
                ),
            }
        }
    }

    /// Get an iterator over a vector, in index order.
    ///
    /// The iterator is cheap to restart: it borrows the vector and can simply
    /// be created again, or cloned mid-way.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, A, P> {
        Iter {
            vector: self,
            front: 0,
            back: self.length,
            front_chunk: None,
            back_chunk: None,
        }
    }
}

impl<A: Clone, P: SharedPointerKind> GenericVector<A, P> {
    /// Construct a vector with a single element.
    #[inline]
    #[must_use]
    pub fn unit(a: A) -> Self {
        let mut out = Self::new();
        out.push_back(a);
        out
    }

    /// Construct a new vector by replacing the element at index `index`,
    /// leaving the current vector unchanged.
    ///
    /// If `index` is out of bounds, the new vector is identical to the
    /// current one: **an out of range update is a silent no-op, not an
    /// error.** This is easy to mistake for a successful write; check
    /// [`len`][len] first if you need to tell the two apart.
    ///
    /// Time: O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate verso;
    /// let vec = vector!["Joe", "Mike", "Robert"];
    /// assert_eq!(vector!["Joe", "Lisa", "Robert"], vec.update(1, "Lisa"));
    /// // Out of range: quietly unchanged.
    /// assert_eq!(vec, vec.update(3, "Lisa"));
    /// ```
    ///
    /// [len]: #method.len
    #[must_use]
    pub fn update(&self, index: usize, value: A) -> Self {
        let mut out = self.clone();
        out.set(index, value);
        out
    }

    /// Replace the element at index `index` in place, through copy-on-write:
    /// only nodes shared with other versions are cloned.
    ///
    /// Like [`update`][update], an out of range index is a silent no-op.
    ///
    /// Time: O(log n)
    ///
    /// [update]: #method.update
    pub fn set(&mut self, index: usize, value: A) {
        if index >= self.length {
            return;
        }
        let offset = self.tail_offset();
        if index >= offset {
            let tail = SharedPointer::make_mut(&mut self.tail);
            tail[index - offset] = value;
        } else if let Some(root) = self.root.as_mut() {
            SharedPointer::make_mut(root).set(index, self.shift, value);
        }
    }

    /// Push an element to the back of a vector.
    ///
    /// This is a copy-on-write operation: nodes shared with other versions
    /// are cloned before being written, so clones of this vector are never
    /// affected.
    ///
    /// Time: O(1) amortised; O(log n) when the tail spills into the trie.
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate verso;
    /// let mut vec = vector![1, 2];
    /// vec.push_back(3);
    /// assert_eq!(vector![1, 2, 3], vec);
    /// ```
    pub fn push_back(&mut self, value: A) {
        if self.tail.len() < NODE_WIDTH {
            SharedPointer::make_mut(&mut self.tail).push_back(value);
            self.length += 1;
            return;
        }
        // The tail is full: it becomes the next leaf of the trie, and the new
        // value starts a fresh tail.
        let tail = mem::replace(&mut self.tail, SharedPointer::new(ValueChunk::unit(value)));
        let leaf = SharedPointer::new(Node::leaf(clone_ref(tail)));
        match self.root.take() {
            None => {
                self.root = Some(SharedPointer::new(Node::parent_unit(leaf)));
            }
            Some(mut root) => {
                if (self.length >> NODE_SHIFT) > (1 << self.shift) {
                    // Full at the current height: grow exactly one level. The
                    // old root becomes child 0 of the new root, and a fresh
                    // spine down to the pushed leaf becomes child 1.
                    let spine = Node::new_path(self.shift, leaf);
                    self.root = Some(SharedPointer::new(Node::parent_pair(root, spine)));
                    self.shift += NODE_SHIFT;
                } else {
                    SharedPointer::make_mut(&mut root).push_tail(self.shift, self.length, leaf);
                    self.root = Some(root);
                }
            }
        }
        self.length += 1;
    }

    /// Remove the last element of a vector and return it.
    ///
    /// Returns `None` if the vector is empty. Like [`push_back`][push_back],
    /// this is a copy-on-write operation and never disturbs other versions.
    ///
    /// Time: O(1) amortised; O(log n) when the tail has to be rehydrated from
    /// the trie.
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate verso;
    /// let mut vec = vector![1, 2, 3];
    /// assert_eq!(Some(3), vec.pop_back());
    /// assert_eq!(vector![1, 2], vec);
    /// ```
    ///
    /// [push_back]: #method.push_back
    pub fn pop_back(&mut self) -> Option<A> {
        if self.length == 0 {
            return None;
        }
        if self.length == 1 {
            let value = SharedPointer::make_mut(&mut self.tail).pop_back();
            *self = Self::new();
            return Some(value);
        }
        if self.tail.len() > 1 {
            self.length -= 1;
            return Some(SharedPointer::make_mut(&mut self.tail).pop_back());
        }
        // The tail is down to its last element: rehydrate it from the last
        // leaf of the trie, then detach that leaf.
        let value = SharedPointer::make_mut(&mut self.tail).pop_back();
        let index = self.length - 2;
        let new_tail = match self.root.as_ref() {
            Some(root) => root.leaf_for(index, self.shift).clone(),
            // Unreachable while the tail invariant holds.
            None => ValueChunk::new(),
        };
        let mut emptied = false;
        let mut shrunk = None;
        if let Some(root) = self.root.as_mut() {
            let node = SharedPointer::make_mut(root);
            if node.pop_tail(self.shift, index) {
                emptied = true;
            } else if self.shift > NODE_SHIFT && node.degree() == 1 {
                // Back at a 32^n boundary: the root has a single child again,
                // so drop a level. The exact mirror of the growth step.
                shrunk = Some(node.first_child());
            }
        }
        if emptied {
            self.root = None;
            self.shift = NODE_SHIFT;
        } else if let Some(child) = shrunk {
            self.root = Some(child);
            self.shift -= NODE_SHIFT;
        }
        self.tail = SharedPointer::new(new_tail);
        self.length -= 1;
        Some(value)
    }
}

impl<A, P: SharedPointerKind> Default for GenericVector<A, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Debug, P: SharedPointerKind> Debug for GenericVector<A, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<A: PartialEq, P: SharedPointerKind> PartialEq for GenericVector<A, P> {
    fn eq(&self, other: &Self) -> bool {
        if self.length != other.length {
            return false;
        }
        if self.ptr_eq(other) {
            return true;
        }
        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<A: Eq, P: SharedPointerKind> Eq for GenericVector<A, P> {}

impl<A, P: SharedPointerKind> Index<usize> for GenericVector<A, P> {
    type Output = A;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "Vector::index: index out of bounds: {} >= {}",
                index, self.length
            ),
        }
    }
}

impl<A: Clone, P: SharedPointerKind> FromIterator<A> for GenericVector<A, P> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = A>,
    {
        let mut out = Self::new();
        for value in iter {
            out.push_back(value);
        }
        out
    }
}

impl<A: Clone, P: SharedPointerKind> Extend<A> for GenericVector<A, P> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = A>,
    {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<A: Clone, P: SharedPointerKind> From<Vec<A>> for GenericVector<A, P> {
    fn from(vec: Vec<A>) -> Self {
        vec.into_iter().collect()
    }
}

impl<'a, A: Clone, P: SharedPointerKind> From<&'a [A]> for GenericVector<A, P> {
    fn from(slice: &'a [A]) -> Self {
        slice.iter().cloned().collect()
    }
}

// Iterators

/// An iterator over the elements of a vector, in index order.
///
/// The current leaf chunk is cached at each end, so a full pass descends the
/// trie once per 32 elements rather than once per element.
pub struct Iter<'a, A, P: SharedPointerKind> {
    vector: &'a GenericVector<A, P>,
    front: usize,
    back: usize,
    front_chunk: Option<(usize, &'a [A])>,
    back_chunk: Option<(usize, &'a [A])>,
}

// We impl Clone instead of deriving it, because we want Clone even if A isn't.
impl<'a, A, P: SharedPointerKind> Clone for Iter<'a, A, P> {
    fn clone(&self) -> Self {
        Iter {
            vector: self.vector,
            front: self.front,
            back: self.back,
            front_chunk: self.front_chunk,
            back_chunk: self.back_chunk,
        }
    }
}

fn cached<'a, A, P: SharedPointerKind>(
    vector: &'a GenericVector<A, P>,
    cache: &mut Option<(usize, &'a [A])>,
    index: usize,
) -> &'a A {
    let (start, chunk) = match *cache {
        Some((start, chunk)) if index >= start && index < start + chunk.len() => (start, chunk),
        _ => {
            let loaded = vector.chunk_at(index);
            *cache = Some(loaded);
            loaded
        }
    };
    &chunk[index - start]
}

impl<'a, A, P: SharedPointerKind> Iterator for Iter<'a, A, P> {
    type Item = &'a A;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let value = cached(self.vector, &mut self.front_chunk, self.front);
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<'a, A, P: SharedPointerKind> DoubleEndedIterator for Iter<'a, A, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(cached(self.vector, &mut self.back_chunk, self.back))
    }
}

impl<'a, A, P: SharedPointerKind> ExactSizeIterator for Iter<'a, A, P> {}

impl<'a, A, P: SharedPointerKind> FusedIterator for Iter<'a, A, P> {}

/// A consuming iterator over the elements of a vector.
///
/// Elements still shared with other versions are cloned out of the structure.
pub struct ConsumingIter<A, P: SharedPointerKind> {
    vector: GenericVector<A, P>,
    front: usize,
}

impl<A: Clone, P: SharedPointerKind> Iterator for ConsumingIter<A, P> {
    type Item = A;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.vector.get(self.front).cloned();
        self.front += 1;
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.len() - self.front.min(self.vector.len());
        (remaining, Some(remaining))
    }
}

impl<A: Clone, P: SharedPointerKind> ExactSizeIterator for ConsumingIter<A, P> {}

impl<A: Clone, P: SharedPointerKind> FusedIterator for ConsumingIter<A, P> {}

impl<'a, A, P: SharedPointerKind> IntoIterator for &'a GenericVector<A, P> {
    type Item = &'a A;
    type IntoIter = Iter<'a, A, P>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<A: Clone, P: SharedPointerKind> IntoIterator for GenericVector<A, P> {
    type Item = A;
    type IntoIter = ConsumingIter<A, P>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        ConsumingIter {
            vector: self,
            front: 0,
        }
    }
}

// Tests

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::seeded_rng;
    #[rustfmt::skip]
    use ::proptest::{collection, num::i32, proptest};
    use rand_core::RngCore;
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    assert_impl_all!(Vector<i32>: Send, Sync);
    assert_not_impl_any!(Vector<*const i32>: Send, Sync);
    assert_covariant!(Vector<T> in T);

    fn ranged(n: usize) -> Vector<usize> {
        (0..n).collect()
    }

    #[test]
    fn push_and_get_round_trip() {
        let w = NODE_WIDTH;
        for n in [0, 1, w - 1, w, w + 1, 1000, w * w + w + 1] {
            let vec = ranged(n);
            assert_eq!(n, vec.len());
            for i in 0..n {
                assert_eq!(Some(&i), vec.get(i), "index {} of {}", i, n);
            }
            assert_eq!(None, vec.get(n));
            assert_eq!(None, vec.get(n + w));
        }
    }

    #[test]
    fn update_and_get() {
        let base = ranged(1000);
        for i in (0..1000).step_by(37) {
            let updated = base.update(i, 9999);
            assert_eq!(Some(&9999), updated.get(i));
            assert_eq!(Some(&i), base.get(i));
            assert_eq!(base.len(), updated.len());
        }
    }

    #[test]
    fn update_out_of_range_is_noop() {
        let vec = ranged(10);
        assert_eq!(vec, vec.update(10, 42));
        assert_eq!(vec, vec.update(10_000, 42));
        let empty: Vector<usize> = Vector::new();
        assert_eq!(empty, empty.update(0, 42));
    }

    #[test]
    fn pop_is_the_inverse_of_push() {
        let w = NODE_WIDTH;
        for n in [0, 1, w - 1, w, w + 1, w * w, 1000] {
            let base = ranged(n);
            let mut branch = base.clone();
            branch.push_back(777_777);
            assert_eq!(Some(777_777), branch.pop_back());
            assert_eq!(base, branch);
        }
    }

    #[test]
    fn boundary_push_then_pop() {
        let w = NODE_WIDTH;
        let mut vec = ranged(w);
        assert_eq!(w, vec.len());
        vec.push_back(w);
        assert_eq!(w + 1, vec.len());
        assert_eq!(Some(&w), vec.get(w));
        assert_eq!(Some(w), vec.pop_back());
        assert_eq!(Some(w - 1), vec.pop_back());
        assert_eq!(w - 1, vec.len());
    }

    #[test]
    fn version_branching() {
        let base = vector![1, 2];
        let mut a = base.clone();
        a.push_back(3);
        let mut b = base.clone();
        b.push_back(100);
        assert_eq!(Some(&3), a.get(2));
        assert_eq!(Some(&100), b.get(2));
        assert_eq!(3, a.len());
        assert_eq!(3, b.len());
        assert_eq!(2, base.len());
    }

    #[test]
    fn old_versions_survive_every_mutator() {
        let w = NODE_WIDTH;
        let mut versions = vec![Vector::<usize>::new()];
        for i in 0..(w * w + 2 * w) {
            let mut next = versions.last().unwrap().clone();
            next.push_back(i);
            versions.push(next);
        }
        let last = versions.last().unwrap().clone();
        let _updated = last.update(3, 9000);
        let mut popper = last.clone();
        while popper.pop_back().is_some() {}
        for (n, version) in versions.iter().enumerate() {
            assert_eq!(n, version.len());
            for i in 0..n {
                assert_eq!(Some(&i), version.get(i));
            }
        }
    }

    #[test]
    fn shrinks_back_across_level_boundaries() {
        // Deep enough for two growth steps, then pop all the way down.
        let w = NODE_WIDTH;
        let n = w * w + 2 * w + 1;
        let mut vec = ranged(n);
        for expected in (0..n).rev() {
            assert_eq!(Some(expected), vec.pop_back());
            assert_eq!(expected, vec.len());
            if expected > 0 {
                assert_eq!(Some(&(expected - 1)), vec.back());
                assert_eq!(Some(&0), vec.front());
            }
        }
        assert_eq!(None, vec.pop_back());
        assert!(vec.is_empty());
    }

    #[test]
    fn random_sets_leave_the_base_alone() {
        let mut rng = seeded_rng(1984);
        let n = 4 * NODE_WIDTH;
        let base = ranged(n);
        let mut current = base.clone();
        for _ in 0..500 {
            let index = rng.next_u64() as usize % n;
            current = current.update(index, rng.next_u64() as usize);
        }
        for i in 0..n {
            assert_eq!(Some(&i), base.get(i));
        }
    }

    #[test]
    fn iterator_is_ordered_and_double_ended() {
        let vec = ranged(100);
        let forward: Vec<usize> = vec.iter().cloned().collect();
        assert_eq!((0..100).collect::<Vec<_>>(), forward);
        let backward: Vec<usize> = vec.iter().rev().cloned().collect();
        assert_eq!((0..100).rev().collect::<Vec<_>>(), backward);

        let mut it = vec.iter();
        assert_eq!(100, it.len());
        it.next();
        let restarted = it.clone();
        assert_eq!(it.collect::<Vec<_>>(), restarted.collect::<Vec<_>>());
    }

    #[test]
    fn alternating_double_ended_iteration() {
        // Crosses several leaf boundaries and the tail from both ends.
        let n = 3 * NODE_WIDTH + 5;
        let vec = ranged(n);
        let mut it = vec.iter();
        let mut lo = 0;
        let mut hi = n;
        loop {
            if lo >= hi {
                break;
            }
            assert_eq!(Some(&lo), it.next());
            lo += 1;
            if lo < hi {
                hi -= 1;
                assert_eq!(Some(&hi), it.next_back());
            }
        }
        assert_eq!(None, it.next());
        assert_eq!(None, it.next_back());
    }

    #[test]
    fn consuming_iterator() {
        let vec = ranged(100);
        let drained: Vec<usize> = vec.clone().into_iter().collect();
        assert_eq!((0..100).collect::<Vec<_>>(), drained);
        // The source version is unaffected.
        assert_eq!(100, vec.len());
    }

    #[test]
    fn index_operator() {
        let vec = vector![1, 2, 3];
        assert_eq!(2, vec[1]);
    }

    #[test]
    #[should_panic]
    fn index_operator_out_of_bounds() {
        let vec = vector![1, 2, 3];
        let _ = vec[3];
    }

    #[test]
    fn macro_allows_trailing_comma() {
        let vec1 = vector![1, 2, 3];
        let vec2 = vector![1, 2, 3,];
        assert_eq!(vec1, vec2);
    }

    proptest! {
        #[test]
        fn push_matches_model(ref input in collection::vec(i32::ANY, 0..200)) {
            let vec: Vector<i32> = input.iter().cloned().collect();
            assert_eq!(input.len(), vec.len());
            for (i, value) in input.iter().enumerate() {
                assert_eq!(Some(value), vec.get(i));
            }
            assert_eq!(input.clone(), vec.iter().cloned().collect::<Vec<_>>());
        }

        #[test]
        fn pop_matches_model(ref input in collection::vec(i32::ANY, 0..200)) {
            let mut model = input.clone();
            let mut vec: Vector<i32> = input.iter().cloned().collect();
            loop {
                assert_eq!(model.pop(), vec.pop_back());
                if model.is_empty() {
                    assert_eq!(None, vec.pop_back());
                    break;
                }
            }
        }

        #[test]
        fn update_matches_model(
            ref input in collection::vec(i32::ANY, 1..200),
            ref updates in collection::vec((::proptest::num::usize::ANY, i32::ANY), 0..100)
        ) {
            let mut model = input.clone();
            let mut vec: Vector<i32> = input.iter().cloned().collect();
            for (index, value) in updates {
                let index = index % (input.len() * 2);
                let next = vec.update(index, *value);
                if index < model.len() {
                    model[index] = *value;
                } else {
                    assert_eq!(vec, next);
                }
                vec = next;
            }
            assert_eq!(model, vec.iter().cloned().collect::<Vec<_>>());
        }

        #[test]
        fn exact_size_iterator(ref input in collection::vec(i32::ANY, 0..200)) {
            let vec: Vector<i32> = input.iter().cloned().collect();
            let mut should_be = vec.len();
            let mut it = vec.iter();
            loop {
                assert_eq!(should_be, it.len());
                match it.next() {
                    None => break,
                    Some(_) => should_be -= 1,
                }
            }
            assert_eq!(0, it.len());
        }
    }
}
