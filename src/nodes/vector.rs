// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use archery::{SharedPointer, SharedPointerKind};
use imbl_sized_chunks::Chunk;

pub(crate) use crate::config::VECTOR_LEVEL_SIZE as NODE_SHIFT;
pub(crate) const NODE_WIDTH: usize = 2_usize.pow(NODE_SHIFT as u32);
pub(crate) const NODE_MASK: usize = NODE_WIDTH - 1;

/// A chunk of up to `NODE_WIDTH` vector elements, used both for leaf nodes
/// and for the uncommitted tail buffer.
pub(crate) type ValueChunk<A> = Chunk<A, NODE_WIDTH>;

type ChildChunk<A, P> = Chunk<SharedPointer<Node<A, P>, P>, NODE_WIDTH>;

/// A node in the bit-partitioned vector trie.
///
/// Which kind a node is follows from its depth: every node above the leaf
/// level is a `Parent`, every node at the leaf level is a `Leaf`. Parents are
/// left-packed: because elements are only ever appended and popped at the
/// back, the occupied child slots always form a dense prefix, so the chunk's
/// own length tracks the occupancy.
///
/// Nodes are never written through a shared pointer; all mutation goes via
/// [`SharedPointer::make_mut`], which clones the node first if anyone else
/// still references it. That is what makes every update a path copy.
pub(crate) enum Node<A, P: SharedPointerKind> {
    Parent(ChildChunk<A, P>),
    Leaf(ValueChunk<A>),
}

impl<A: Clone, P: SharedPointerKind> Clone for Node<A, P> {
    fn clone(&self) -> Self {
        match self {
            Node::Parent(children) => Node::Parent(children.clone()),
            Node::Leaf(values) => Node::Leaf(values.clone()),
        }
    }
}

impl<A, P: SharedPointerKind> Node<A, P> {
    pub(crate) fn leaf(values: ValueChunk<A>) -> Self {
        Node::Leaf(values)
    }

    pub(crate) fn parent_unit(child: SharedPointer<Self, P>) -> Self {
        Node::Parent(ChildChunk::unit(child))
    }

    pub(crate) fn parent_pair(
        child0: SharedPointer<Self, P>,
        child1: SharedPointer<Self, P>,
    ) -> Self {
        Node::Parent(ChildChunk::pair(child0, child1))
    }

    fn children(&self) -> &ChildChunk<A, P> {
        match self {
            Node::Parent(children) => children,
            Node::Leaf(_) => panic!("nodes::vector::Node::children: called on a leaf node"),
        }
    }

    fn children_mut(&mut self) -> &mut ChildChunk<A, P> {
        match self {
            Node::Parent(children) => children,
            Node::Leaf(_) => panic!("nodes::vector::Node::children_mut: called on a leaf node"),
        }
    }

    pub(crate) fn values(&self) -> &ValueChunk<A> {
        match self {
            Node::Leaf(values) => values,
            Node::Parent(_) => panic!("nodes::vector::Node::values: called on a parent node"),
        }
    }

    fn values_mut(&mut self) -> &mut ValueChunk<A> {
        match self {
            Node::Leaf(values) => values,
            Node::Parent(_) => panic!("nodes::vector::Node::values_mut: called on a parent node"),
        }
    }

    /// The number of occupied child slots. Only meaningful on parents.
    pub(crate) fn degree(&self) -> usize {
        self.children().len()
    }

    /// The first child, used when the root shrinks a level.
    pub(crate) fn first_child(&self) -> SharedPointer<Self, P> {
        self.children()[0].clone()
    }

    /// Build a left spine of parents of height `level`, terminating in `leaf`.
    pub(crate) fn new_path(level: usize, leaf: SharedPointer<Self, P>) -> SharedPointer<Self, P> {
        if level == NODE_SHIFT {
            SharedPointer::new(Node::parent_unit(leaf))
        } else {
            let below = Node::new_path(level - NODE_SHIFT, leaf);
            SharedPointer::new(Node::parent_unit(below))
        }
    }

    /// Find the leaf chunk holding `index`, starting from a node at `level`.
    pub(crate) fn leaf_for(&self, index: usize, level: usize) -> &ValueChunk<A> {
        if level == NODE_SHIFT {
            self.children()[(index >> NODE_SHIFT) & NODE_MASK].values()
        } else {
            self.children()[(index >> level) & NODE_MASK].leaf_for(index, level - NODE_SHIFT)
        }
    }

    pub(crate) fn get(&self, index: usize, level: usize) -> &A {
        &self.leaf_for(index, level)[index & NODE_MASK]
    }
}

impl<A: Clone, P: SharedPointerKind> Node<A, P> {
    /// Overwrite the element at `index`, cloning only the nodes on the path
    /// down to it. Every sibling subtree stays shared.
    pub(crate) fn set(&mut self, index: usize, level: usize, value: A) {
        if level == NODE_SHIFT {
            let sub = (index >> NODE_SHIFT) & NODE_MASK;
            let leaf = SharedPointer::make_mut(&mut self.children_mut()[sub]);
            leaf.values_mut()[index & NODE_MASK] = value;
        } else {
            let sub = (index >> level) & NODE_MASK;
            let child = SharedPointer::make_mut(&mut self.children_mut()[sub]);
            child.set(index, level - NODE_SHIFT, value);
        }
    }

    /// Attach a full leaf at the first free slot at the bottom of the trie,
    /// creating any missing parents on the way down. `length` is the total
    /// element count including the leaf being pushed, so `length - 1` indexes
    /// the leaf's last element.
    pub(crate) fn push_tail(
        &mut self,
        level: usize,
        length: usize,
        leaf: SharedPointer<Self, P>,
    ) {
        let sub = ((length - 1) >> level) & NODE_MASK;
        let children = self.children_mut();
        if level == NODE_SHIFT {
            debug_assert_eq!(sub, children.len());
            children.push_back(leaf);
        } else if sub < children.len() {
            let child = SharedPointer::make_mut(&mut children[sub]);
            child.push_tail(level - NODE_SHIFT, length, leaf);
        } else {
            children.push_back(Node::new_path(level - NODE_SHIFT, leaf));
        }
    }

    /// Detach the leaf holding `index` (always the last leaf in the trie),
    /// removing parents that run out of children on the way back up. Returns
    /// true if this node itself is now empty and should be dropped by the
    /// caller.
    pub(crate) fn pop_tail(&mut self, level: usize, index: usize) -> bool {
        let sub = (index >> level) & NODE_MASK;
        let children = self.children_mut();
        debug_assert_eq!(sub + 1, children.len());
        if level > NODE_SHIFT {
            let child = SharedPointer::make_mut(&mut children[sub]);
            if child.pop_tail(level - NODE_SHIFT, index) {
                children.remove(sub);
            }
        } else {
            children.remove(sub);
        }
        children.is_empty()
    }
}
