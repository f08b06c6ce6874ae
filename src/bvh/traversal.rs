//! Utilities to traverse the BVH structure.

use crate::bbox::BoundingBox;
use crate::bvh::index::Bvh;
use crate::bvh::util::upper_bound;

/// A node in the BVH, either a leaf or an internal node.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    /// The tree that this node is a reference onto
    tree: &'a Bvh,

    /// Position of this node in the tree's flat arrays.
    ///
    /// When this is `< self.tree.num_items()`, it is a leaf and `indices[id]` is the original
    /// insertion index. Otherwise `indices[id]` is the id of its first child.
    id: usize,
}

impl<'a> Node<'a> {
    fn new(tree: &'a Bvh, id: usize) -> Self {
        Self { tree, id }
    }

    pub(crate) fn from_root(tree: &'a Bvh) -> Self {
        Self::new(tree, tree.num_nodes() - 1)
    }

    /// The node id of this node.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The bounding box covering everything under this node.
    #[inline]
    pub fn bbox(&self) -> &'a BoundingBox {
        &self.tree.boxes[self.id]
    }

    /// The smallest leaf weight reachable under this node.
    #[inline]
    pub fn min_weight(&self) -> f64 {
        self.tree.min_weights[self.id]
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.id < self.tree.num_items()
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }

    /// Returns an iterator over the child nodes of this node, in construction order. This must
    /// only be called if `is_parent` is `true`.
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        debug_assert!(self.is_parent());

        // find the start and end ids of the children of this node
        let tree = self.tree;
        let start = tree.indices[self.id] as usize;
        let end = (start + tree.metadata.group_size(start))
            .min(upper_bound(start, tree.metadata.level_bounds()));

        (start..end).map(move |id| Node::new(tree, id))
    }

    /// The original insertion index. This is only valid when this is a leaf node, which you can
    /// check with `Self::is_leaf`.
    #[inline]
    pub fn index(&self) -> usize {
        debug_assert!(self.is_leaf());
        self.tree.indices[self.id] as usize
    }
}
