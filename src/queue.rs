// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A persistent FIFO queue.
//!
//! A [banker's queue][1]: two persistent stacks, one holding the front of the
//! queue in pop order and one holding the rear in push order. Elements are
//! pushed onto the rear stack and popped off the front stack; when the front
//! runs dry the rear is reversed in one batch and becomes the new front.
//! Both operations are O(1) amortised, and old versions share their stack
//! nodes with new ones.
//!
//! [1]: https://en.wikipedia.org/wiki/Purely_functional_data_structure

use std::fmt::{Debug, Error, Formatter};
use std::iter::{FromIterator, FusedIterator};

use archery::{SharedPointer, SharedPointerKind};

use crate::shared_ptr::DefaultSharedPtr;
use crate::util::clone_ref;

/// Construct a queue from a sequence of elements, front first.
///
/// # Examples
///
/// ```
/// # #[macro_use] extern crate verso;
/// # use verso::Queue;
/// # fn main() {
/// let mut queue = queue![1, 2, 3];
/// assert_eq!(Some(1), queue.pop_front());
/// # }
/// ```
#[macro_export]
macro_rules! queue {
    () => { $crate::queue::Queue::new() };

    ( $($x:expr),* ) => {{
        let mut q = $crate::queue::Queue::new();
        $(
            q.push_back($x);
        )*
        q
    }};

    ( $($x:expr ,)* ) => {{
        let mut q = $crate::queue::Queue::new();
        $(
            q.push_back($x);
        )*
        q
    }};
}

/// Type alias for [`GenericQueue`] that uses [`DefaultSharedPtr`] as the
/// pointer type.
///
/// [GenericQueue]: ./struct.GenericQueue.html
/// [DefaultSharedPtr]: ../shared_ptr/type.DefaultSharedPtr.html
pub type Queue<A> = GenericQueue<A, DefaultSharedPtr>;

// A persistent cons list. Pushing never touches existing nodes, so any number
// of stacks can hang off a shared tail.
struct StackNode<A, P: SharedPointerKind> {
    value: A,
    below: Option<SharedPointer<StackNode<A, P>, P>>,
}

struct Stack<A, P: SharedPointerKind> {
    head: Option<SharedPointer<StackNode<A, P>, P>>,
}

impl<A: Clone, P: SharedPointerKind> Clone for StackNode<A, P> {
    fn clone(&self) -> Self {
        StackNode {
            value: self.value.clone(),
            below: self.below.clone(),
        }
    }
}

impl<A, P: SharedPointerKind> Clone for Stack<A, P> {
    fn clone(&self) -> Self {
        Stack {
            head: self.head.clone(),
        }
    }
}

impl<A, P: SharedPointerKind> Stack<A, P> {
    fn new() -> Self {
        Stack { head: None }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn push(&mut self, value: A) {
        let below = self.head.take();
        self.head = Some(SharedPointer::new(StackNode { value, below }));
    }

    fn peek(&self) -> Option<&A> {
        self.head.as_deref().map(|node| &node.value)
    }

    fn iter(&self) -> StackIter<'_, A, P> {
        StackIter {
            node: self.head.as_deref(),
        }
    }
}

impl<A: Clone, P: SharedPointerKind> Stack<A, P> {
    fn pop(&mut self) -> Option<A> {
        let node = clone_ref(self.head.take()?);
        self.head = node.below;
        Some(node.value)
    }

    /// A new stack holding the same elements in reverse order. Nothing is
    /// shared with the source; the reversal rebuilds every node.
    fn reversed(&self) -> Self {
        let mut out = Stack::new();
        for value in self.iter() {
            out.push(value.clone());
        }
        out
    }
}

// The derived drop would recurse once per node and blow the stack on long
// queues. Unlink nodes iteratively instead, stopping at the first node still
// shared with another version (which keeps its tail alive anyway).
impl<A, P: SharedPointerKind> Drop for Stack<A, P> {
    fn drop(&mut self) {
        let mut head = self.head.take();
        while let Some(node) = head {
            match SharedPointer::try_unwrap(node) {
                Ok(mut node) => head = node.below.take(),
                Err(_) => break,
            }
        }
    }
}

struct StackIter<'a, A, P: SharedPointerKind> {
    node: Option<&'a StackNode<A, P>>,
}

impl<'a, A, P: SharedPointerKind> Iterator for StackIter<'a, A, P> {
    type Item = &'a A;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.node?;
        self.node = node.below.as_deref();
        Some(&node.value)
    }
}

/// A persistent FIFO queue.
///
/// Invariant: if the front stack is empty, the whole queue is empty. This is
/// restored after every pop by reversing the rear into the front, and it's
/// what lets [`front`][front] return a plain reference without doing any
/// work.
///
/// [front]: #method.front
pub struct GenericQueue<A, P: SharedPointerKind> {
    front: Stack<A, P>,
    rear: Stack<A, P>,
    length: usize,
}

// We impl Clone instead of deriving it, because we want Clone even if A isn't.
impl<A, P: SharedPointerKind> Clone for GenericQueue<A, P> {
    fn clone(&self) -> Self {
        GenericQueue {
            front: self.front.clone(),
            rear: self.rear.clone(),
            length: self.length,
        }
    }
}

impl<A, P: SharedPointerKind> GenericQueue<A, P> {
    /// Construct an empty queue.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        GenericQueue {
            front: Stack::new(),
            rear: Stack::new(),
            length: 0,
        }
    }

    /// Get the length of a queue.
    ///
    /// Time: O(1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Test whether a queue is empty.
    ///
    /// Time: O(1)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Get the element at the front of the queue, the one a
    /// [`pop_front`][pop_front] would remove.
    ///
    /// Time: O(1)
    ///
    /// [pop_front]: #method.pop_front
    #[must_use]
    pub fn front(&self) -> Option<&A> {
        self.front.peek()
    }

    /// Push an element onto the back of a queue.
    ///
    /// Time: O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate verso;
    /// let mut queue = queue![1, 2];
    /// queue.push_back(3);
    /// assert_eq!(3, queue.len());
    /// assert_eq!(Some(&1), queue.front());
    /// ```
    pub fn push_back(&mut self, value: A) {
        if self.front.is_empty() {
            // The queue is empty, so the pushed element is also the front.
            self.front.push(value);
        } else {
            self.rear.push(value);
        }
        self.length += 1;
    }

    /// Get an iterator over a queue, front to back.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, A, P> {
        let mut rear: Vec<&A> = self.rear.iter().collect();
        rear.reverse();
        Iter {
            length: self.length,
            front: self.front.iter(),
            rear: rear.into_iter(),
        }
    }
}

impl<A: Clone, P: SharedPointerKind> GenericQueue<A, P> {
    /// Remove the element at the front of the queue and return it.
    ///
    /// Returns `None` if the queue is empty. Other versions of the queue are
    /// unaffected; an element still shared with them is cloned out.
    ///
    /// Time: O(1) amortised; O(n) on the pops that trigger a reversal of the
    /// rear stack.
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate verso;
    /// let mut queue = queue![1, 2, 3];
    /// assert_eq!(Some(1), queue.pop_front());
    /// assert_eq!(Some(2), queue.pop_front());
    /// assert_eq!(Some(3), queue.pop_front());
    /// assert_eq!(None, queue.pop_front());
    /// ```
    pub fn pop_front(&mut self) -> Option<A> {
        let value = self.front.pop()?;
        self.length -= 1;
        if self.front.is_empty() {
            // Restore the invariant: the buffered rear becomes the new front.
            self.front = self.rear.reversed();
            self.rear = Stack::new();
        }
        Some(value)
    }
}

impl<A, P: SharedPointerKind> Default for GenericQueue<A, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Debug, P: SharedPointerKind> Debug for GenericQueue<A, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<A: PartialEq, P: SharedPointerKind> PartialEq for GenericQueue<A, P> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<A: Eq, P: SharedPointerKind> Eq for GenericQueue<A, P> {}

impl<A, P: SharedPointerKind> FromIterator<A> for GenericQueue<A, P> {
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

impl<A, P: SharedPointerKind> Extend<A> for GenericQueue<A, P> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = A>,
    {
        for value in iter {
            self.push_back(value);
        }
    }
}

// Iterators

/// An iterator over the elements of a queue, front to back.
pub struct Iter<'a, A, P: SharedPointerKind> {
    length: usize,
    front: StackIter<'a, A, P>,
    rear: std::vec::IntoIter<&'a A>,
}

impl<'a, A, P: SharedPointerKind> Iterator for Iter<'a, A, P> {
    type Item = &'a A;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.front.next().or_else(|| self.rear.next());
        if value.is_some() {
            self.length -= 1;
        }
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.length, Some(self.length))
    }
}

impl<'a, A, P: SharedPointerKind> ExactSizeIterator for Iter<'a, A, P> {}

impl<'a, A, P: SharedPointerKind> FusedIterator for Iter<'a, A, P> {}

/// A consuming iterator over the elements of a queue, front to back.
pub struct ConsumingIter<A, P: SharedPointerKind> {
    queue: GenericQueue<A, P>,
}

impl<A: Clone, P: SharedPointerKind> Iterator for ConsumingIter<A, P> {
    type Item = A;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}

impl<A: Clone, P: SharedPointerKind> ExactSizeIterator for ConsumingIter<A, P> {}

impl<A: Clone, P: SharedPointerKind> FusedIterator for ConsumingIter<A, P> {}

impl<'a, A, P: SharedPointerKind> IntoIterator for &'a GenericQueue<A, P> {
    type Item = &'a A;
    type IntoIter = Iter<'a, A, P>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<A: Clone, P: SharedPointerKind> IntoIterator for GenericQueue<A, P> {
    type Item = A;
    type IntoIter = ConsumingIter<A, P>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        ConsumingIter { queue: self }
    }
}

// Tests
