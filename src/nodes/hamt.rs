// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash, Hasher};
use std::iter::FusedIterator;
use std::mem;
use std::slice::Iter as SliceIter;

use archery::{SharedPointer, SharedPointerKind};
use bitmaps::{Bitmap, Bits, BitsImpl};
use imbl_sized_chunks::Chunk;

use crate::util::clone_ref;

pub(crate) use crate::config::HASH_LEVEL_SIZE as HASH_SHIFT;
pub(crate) const HASH_WIDTH: usize = 2_usize.pow(HASH_SHIFT as u32);
pub(crate) type HashBits = <BitsImpl<HASH_WIDTH> as Bits>::Store; // a uint of HASH_WIDTH bits
pub(crate) const HASH_MASK: HashBits = (HASH_WIDTH - 1) as HashBits;

pub(crate) fn hash_key<K: Hash + ?Sized, S: BuildHasher>(bh: &S, key: &K) -> HashBits {
    let mut hasher = bh.build_hasher();
    key.hash(&mut hasher);
    hasher.finish() as HashBits
}

#[inline]
fn mask(hash: HashBits, shift: usize) -> HashBits {
    hash >> shift & HASH_MASK
}

pub(crate) trait HashValue {
    type Key: Eq;

    fn extract_key(&self) -> &Self::Key;
}

/// A HAMT node: an occupancy bitmap over `HASH_WIDTH` slots plus a compact
/// array holding exactly one occupant per set bit, in ascending bit order.
/// The array position of bit `i` is the population count of the bits below
/// `i`, so the array never carries holes.
pub(crate) struct Node<A, P: SharedPointerKind> {
    bitmap: Bitmap<HASH_WIDTH>,
    entries: Chunk<Entry<A, P>, HASH_WIDTH>,
}

/// A slot occupant. Exactly three cases; nothing else ever appears in a node.
pub(crate) enum Entry<A, P: SharedPointerKind> {
    Value(A),
    Collision(SharedPointer<CollisionNode<A>, P>),
    Node(SharedPointer<Node<A, P>, P>),
}

/// Entries whose keys hash identically through every bit the hash provides.
/// Beyond that point keys are told apart by linear equality scan only.
pub(crate) struct CollisionNode<A> {
    data: Vec<A>,
}

impl<A: Clone, P: SharedPointerKind> Clone for Entry<A, P> {
    fn clone(&self) -> Self {
        match self {
            Entry::Value(value) => Entry::Value(value.clone()),
            Entry::Collision(coll) => Entry::Collision(coll.clone()),
            Entry::Node(node) => Entry::Node(node.clone()),
        }
    }
}

impl<A: Clone, P: SharedPointerKind> Clone for Node<A, P> {
    fn clone(&self) -> Self {
        Node {
            bitmap: self.bitmap,
            entries: self.entries.clone(),
        }
    }
}

impl<A: Clone> Clone for CollisionNode<A> {
    fn clone(&self) -> Self {
        CollisionNode {
            data: self.data.clone(),
        }
    }
}

impl<A, P: SharedPointerKind> Entry<A, P> {
    fn is_value(&self) -> bool {
        matches!(self, Entry::Value(_))
    }

    fn unwrap_value(self) -> A {
        match self {
            Entry::Value(a) => a,
            _ => panic!("nodes::hamt::Entry::unwrap_value: unwrapped a non-value"),
        }
    }
}

impl<A, P: SharedPointerKind> From<CollisionNode<A>> for Entry<A, P> {
    fn from(node: CollisionNode<A>) -> Self {
        Entry::Collision(SharedPointer::new(node))
    }
}

impl<A, P: SharedPointerKind> Default for Node<A, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, P: SharedPointerKind> Node<A, P> {
    #[inline(always)]
    pub(crate) fn new() -> Self {
        Node {
            bitmap: Bitmap::new(),
            entries: Chunk::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The compact array position for bit `index`: the number of occupied
    /// slots below it.
    #[inline]
    fn pos(&self, index: usize) -> usize {
        let below = ((1 as HashBits) << index) - 1;
        (self.bitmap.into_value() & below).count_ones() as usize
    }

    fn unit(index: usize, entry: Entry<A, P>) -> Self {
        let mut node = Node::new();
        node.bitmap.set(index, true);
        node.entries.push_back(entry);
        node
    }

    /// A node with two occupants, spliced in ascending bit order so that
    /// popcount indexing stays consistent with the bitmap.
    fn pair(index1: usize, entry1: Entry<A, P>, index2: usize, entry2: Entry<A, P>) -> Self {
        debug_assert_ne!(index1, index2);
        let mut node = Node::new();
        node.bitmap.set(index1, true);
        node.bitmap.set(index2, true);
        if index1 < index2 {
            node.entries.push_back(entry1);
            node.entries.push_back(entry2);
        } else {
            node.entries.push_back(entry2);
            node.entries.push_back(entry1);
        }
        node
    }

    /// Detach an arbitrary occupant, keeping the bitmap in step. Used by the
    /// consuming iterator and by single-entry collapse (where only one
    /// occupant is left to take).
    pub(crate) fn pop(&mut self) -> Option<Entry<A, P>> {
        let index = self.bitmap.last_index()?;
        self.bitmap.set(index, false);
        Some(self.entries.pop_back())
    }
}

impl<A: HashValue, P: SharedPointerKind> Node<A, P> {
    pub(crate) fn get<BK>(&self, hash: HashBits, shift: usize, key: &BK) -> Option<&A>
    where
        BK: Eq + ?Sized,
        A::Key: Borrow<BK>,
    {
        let index = mask(hash, shift) as usize;
        if !self.bitmap.get(index) {
            return None;
        }
        match &self.entries[self.pos(index)] {
            Entry::Value(value) => {
                if key == value.extract_key().borrow() {
                    Some(value)
                } else {
                    None
                }
            }
            Entry::Collision(coll) => coll.get(key),
            Entry::Node(child) => child.get(hash, shift + HASH_SHIFT, key),
        }
    }

    pub(crate) fn get_mut<BK>(&mut self, hash: HashBits, shift: usize, key: &BK) -> Option<&mut A>
    where
        A: Clone,
        BK: Eq + ?Sized,
        A::Key: Borrow<BK>,
    {
        let index = mask(hash, shift) as usize;
        if !self.bitmap.get(index) {
            return None;
        }
        let pos = self.pos(index);
        match &mut self.entries[pos] {
            Entry::Value(value) => {
                if key == value.extract_key().borrow() {
                    Some(value)
                } else {
                    None
                }
            }
            Entry::Collision(coll_ref) => {
                let coll = SharedPointer::make_mut(coll_ref);
                coll.get_mut(key)
            }
            Entry::Node(child_ref) => {
                let child = SharedPointer::make_mut(child_ref);
                child.get_mut(hash, shift + HASH_SHIFT, key)
            }
        }
    }

    /// Build the smallest subtree distinguishing two values whose hashes
    /// agree on all bits below `shift`. `hash1` is recomputed by the caller;
    /// entries deliberately don't cache their hash.
    fn merge_values(
        value1: A,
        hash1: HashBits,
        value2: A,
        hash2: HashBits,
        shift: usize,
    ) -> Self {
        let index1 = mask(hash1, shift) as usize;
        let index2 = mask(hash2, shift) as usize;
        if index1 != index2 {
            // Both values fit on this level.
            Node::pair(index1, Entry::Value(value1), index2, Entry::Value(value2))
        } else if shift + HASH_SHIFT >= HASH_WIDTH {
            // The hash is exhausted: a genuine collision.
            Node::unit(index1, Entry::from(CollisionNode::new(value1, value2)))
        } else {
            // Pass the values down a level.
            let node = Node::merge_values(value1, hash1, value2, hash2, shift + HASH_SHIFT);
            Node::unit(index1, Entry::Node(SharedPointer::new(node)))
        }
    }

    /// Insert or replace a value, returning the displaced one if the key was
    /// already present. `rehash` recovers the hash of a resident value when an
    /// occupied slot has to be split into a deeper node.
    pub(crate) fn insert<F>(
        &mut self,
        hash: HashBits,
        shift: usize,
        value: A,
        rehash: &F,
    ) -> Option<A>
    where
        A: Clone,
        F: Fn(&A) -> HashBits,
    {
        let index = mask(hash, shift) as usize;
        if !self.bitmap.get(index) {
            let pos = self.pos(index);
            self.bitmap.set(index, true);
            self.entries.insert(pos, Entry::Value(value));
            return None;
        }
        let pos = self.pos(index);
        match &mut self.entries[pos] {
            Entry::Node(child_ref) => {
                let child = SharedPointer::make_mut(child_ref);
                return child.insert(hash, shift + HASH_SHIFT, value, rehash);
            }
            Entry::Collision(coll_ref) => {
                let coll = SharedPointer::make_mut(coll_ref);
                return coll.insert(value);
            }
            Entry::Value(current) => {
                if current.extract_key() == value.extract_key() {
                    return Some(mem::replace(current, value));
                }
            }
        }
        // Same slot, different key: the resident entry has to move down into
        // a fresh subtree (or a collision node if the hash is spent).
        let old = self.entries.remove(pos).unwrap_value();
        let entry = if shift + HASH_SHIFT >= HASH_WIDTH {
            Entry::from(CollisionNode::new(old, value))
        } else {
            let old_hash = rehash(&old);
            let node = Node::merge_values(old, old_hash, value, hash, shift + HASH_SHIFT);
            Entry::Node(SharedPointer::new(node))
        };
        self.entries.insert(pos, entry);
        None
    }

    /// Remove a key, returning its value. Absent keys leave the node, and
    /// everything above it, untouched.
    pub(crate) fn remove<BK>(&mut self, hash: HashBits, shift: usize, key: &BK) -> Option<A>
    where
        A: Clone,
        BK: Eq + ?Sized,
        A::Key: Borrow<BK>,
    {
        enum Action<A, P: SharedPointerKind> {
            ClearSlot,
            Replace(Entry<A, P>),
        }

        let index = mask(hash, shift) as usize;
        if !self.bitmap.get(index) {
            return None;
        }
        let pos = self.pos(index);
        let mut removed = None;
        let action = match &mut self.entries[pos] {
            Entry::Value(value) => {
                if key != value.extract_key().borrow() {
                    return None;
                }
                Action::ClearSlot
            }
            Entry::Collision(coll_ref) => {
                let coll = SharedPointer::make_mut(coll_ref);
                match coll.remove(key) {
                    None => return None,
                    Some(value) => {
                        removed = Some(value);
                        if coll.len() == 1 {
                            // Two entries collapse back to a plain value slot.
                            Action::Replace(Entry::Value(coll.pop()))
                        } else {
                            return removed;
                        }
                    }
                }
            }
            Entry::Node(child_ref) => {
                let child = SharedPointer::make_mut(child_ref);
                match child.remove(hash, shift + HASH_SHIFT, key) {
                    None => return None,
                    Some(value) => {
                        removed = Some(value);
                        if child.is_empty() {
                            Action::ClearSlot
                        } else if child.len() == 1 && child.entries[0].is_value() {
                            // The child holds a single value: pull it up a
                            // level so chains of one-child nodes can't build
                            // up under repeated removes.
                            match child.pop() {
                                Some(entry) => Action::Replace(entry),
                                None => return removed,
                            }
                        } else {
                            return removed;
                        }
                    }
                }
            }
        };
        match action {
            Action::Replace(entry) => {
                self.entries[pos] = entry;
                removed
            }
            Action::ClearSlot => {
                self.bitmap.set(index, false);
                match self.entries.remove(pos) {
                    Entry::Value(value) => Some(value),
                    _ => removed,
                }
            }
        }
    }
}

impl<A: HashValue> CollisionNode<A> {
    fn new(value1: A, value2: A) -> Self {
        CollisionNode {
            data: vec![value1, value2],
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    fn get<BK>(&self, key: &BK) -> Option<&A>
    where
        BK: Eq + ?Sized,
        A::Key: Borrow<BK>,
    {
        self.data
            .iter()
            .find(|entry| key == entry.extract_key().borrow())
    }

    fn get_mut<BK>(&mut self, key: &BK) -> Option<&mut A>
    where
        BK: Eq + ?Sized,
        A::Key: Borrow<BK>,
    {
        self.data
            .iter_mut()
            .find(|entry| key == entry.extract_key().borrow())
    }

    fn insert(&mut self, value: A) -> Option<A> {
        for item in &mut self.data {
            if value.extract_key() == item.extract_key() {
                return Some(mem::replace(item, value));
            }
        }
        self.data.push(value);
        None
    }

    fn remove<BK>(&mut self, key: &BK) -> Option<A>
    where
        BK: Eq + ?Sized,
        A::Key: Borrow<BK>,
    {
        let loc = self
            .data
            .iter()
            .position(|item| key == item.extract_key().borrow())?;
        Some(self.data.remove(loc))
    }

    fn pop(&mut self) -> A {
        match self.data.pop() {
            Some(value) => value,
            None => panic!("nodes::hamt::CollisionNode::pop: empty collision node"),
        }
    }
}

// Ref iterator

pub(crate) struct Iter<'a, A, P: SharedPointerKind> {
    count: usize,
    stack: Vec<SliceIter<'a, Entry<A, P>>>,
    collision: Option<SliceIter<'a, A>>,
}

// We impl Clone instead of deriving it, because we want Clone even if A isn't.
impl<'a, A, P: SharedPointerKind> Clone for Iter<'a, A, P> {
    fn clone(&self) -> Self {
        Iter {
            count: self.count,
            stack: self.stack.clone(),
            collision: self.collision.clone(),
        }
    }
}

impl<'a, A, P: SharedPointerKind> Iter<'a, A, P> {
    pub(crate) fn new(root: Option<&'a Node<A, P>>, size: usize) -> Self {
        let mut result = Iter {
            count: size,
            stack: Vec::with_capacity((HASH_WIDTH / HASH_SHIFT) + 1),
            collision: None,
        };
        if let Some(root) = root {
            result.stack.push(root.entries.iter());
        }
        result
    }
}

impl<'a, A, P: SharedPointerKind> Iterator for Iter<'a, A, P> {
    type Item = &'a A;

    fn next(&mut self) -> Option<Self::Item> {
        'outer: loop {
            if let Some(coll) = &mut self.collision {
                match coll.next() {
                    None => self.collision = None,
                    Some(value) => {
                        self.count -= 1;
                        return Some(value);
                    }
                };
            }

            while let Some(current) = self.stack.last_mut() {
                match current.next() {
                    Some(Entry::Value(value)) => {
                        self.count -= 1;
                        return Some(value);
                    }
                    Some(Entry::Node(child)) => {
                        self.stack.push(child.entries.iter());
                    }
                    Some(Entry::Collision(coll)) => {
                        self.collision = Some(coll.data.iter());
                        continue 'outer;
                    }
                    None => {
                        self.stack.pop();
                    }
                }
            }
            return None;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count, Some(self.count))
    }
}

impl<'a, A, P: SharedPointerKind> ExactSizeIterator for Iter<'a, A, P> {}

impl<'a, A, P: SharedPointerKind> FusedIterator for Iter<'a, A, P> {}

// Consuming iterator

pub(crate) struct Drain<A, P: SharedPointerKind> {
    count: usize,
    stack: Vec<SharedPointer<Node<A, P>, P>>,
    collision: Option<CollisionNode<A>>,
}

impl<A, P: SharedPointerKind> Drain<A, P> {
    pub(crate) fn new(root: Option<SharedPointer<Node<A, P>, P>>, size: usize) -> Self {
        let mut result = Drain {
            count: size,
            stack: Vec::with_capacity((HASH_WIDTH / HASH_SHIFT) + 1),
            collision: None,
        };
        if let Some(root) = root {
            result.stack.push(root);
        }
        result
    }
}

impl<A, P: SharedPointerKind> Iterator for Drain<A, P>
where
    A: Clone,
{
    type Item = A;

    fn next(&mut self) -> Option<Self::Item> {
        'outer: loop {
            if let Some(coll) = &mut self.collision {
                match coll.data.pop() {
                    None => self.collision = None,
                    Some(value) => {
                        self.count -= 1;
                        return Some(value);
                    }
                };
            }

            while let Some(current) = self.stack.last_mut() {
                match SharedPointer::make_mut(current).pop() {
                    Some(Entry::Value(value)) => {
                        self.count -= 1;
                        return Some(value);
                    }
                    Some(Entry::Node(child)) => {
                        self.stack.push(child);
                    }
                    Some(Entry::Collision(coll)) => {
                        self.collision = Some(clone_ref(coll));
                        continue 'outer;
                    }
                    None => {
                        self.stack.pop();
                    }
                }
            }
            return None;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count, Some(self.count))
    }
}

impl<A: Clone, P: SharedPointerKind> ExactSizeIterator for Drain<A, P> {}

impl<A: Clone, P: SharedPointerKind> FusedIterator for Drain<A, P> {}
