use crate::bbox::BoundingBox;
use crate::bvh::traversal::Node;
use crate::bvh::util::compute_num_nodes;

/// Common metadata to describe a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct BvhMetadata {
    pub(crate) leaf_node_size: usize,
    pub(crate) node_size: usize,
    pub(crate) num_items: usize,
    pub(crate) num_nodes: usize,
    pub(crate) level_bounds: Vec<usize>,
}

impl BvhMetadata {
    pub(crate) fn new(num_items: usize, leaf_node_size: usize, node_size: usize) -> Self {
        let (num_nodes, level_bounds) = compute_num_nodes(num_items, leaf_node_size, node_size);
        Self {
            leaf_node_size,
            node_size,
            num_items,
            num_nodes,
            level_bounds,
        }
    }

    /// The maximum number of leaves grouped under one node.
    pub fn leaf_node_size(&self) -> usize {
        self.leaf_node_size
    }

    /// The maximum number of children of each node above the leaf groups.
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// The maximum number of children of a node whose first child is `first_child`.
    #[inline]
    pub(crate) fn group_size(&self, first_child: usize) -> usize {
        if first_child < self.num_items {
            self.leaf_node_size
        } else {
            self.node_size
        }
    }

    /// The number of leaves.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// The total number of nodes, leaves included.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// The exclusive end node id of each level, from the leaves up to the root.
    pub fn level_bounds(&self) -> &[usize] {
        self.level_bounds.as_slice()
    }
}

/// An immutable bounding-volume hierarchy.
///
/// Nodes are stored in flat arrays indexed by node id. Ids `0..num_items` are the leaves in
/// insertion order, every level above is appended after the one below it, and the root is the last
/// node. Usually this is created via [`BvhBuilder`][crate::bvh::BvhBuilder].
#[derive(Debug, Clone, PartialEq)]
pub struct Bvh {
    /// Box of every node.
    pub(crate) boxes: Vec<BoundingBox>,
    /// Smallest leaf weight reachable under every node.
    pub(crate) min_weights: Vec<f64>,
    /// Insertion index for leaves, first child node id for internal nodes.
    pub(crate) indices: Vec<u32>,
    pub(crate) metadata: BvhMetadata,
}

impl Bvh {
    /// Access the metadata describing this tree.
    pub fn metadata(&self) -> &BvhMetadata {
        &self.metadata
    }

    /// The number of leaves in this tree.
    pub fn num_items(&self) -> usize {
        self.metadata.num_items
    }

    /// The total number of nodes in this tree, including both leaf and intermediate nodes.
    pub fn num_nodes(&self) -> usize {
        self.metadata.num_nodes
    }

    /// The maximum number of children of each node above the leaf groups.
    pub fn node_size(&self) -> usize {
        self.metadata.node_size
    }

    /// The maximum number of leaves grouped under one node.
    pub fn leaf_node_size(&self) -> usize {
        self.metadata.leaf_node_size
    }

    /// The number of levels (height) of the tree.
    pub fn num_levels(&self) -> usize {
        self.metadata.level_bounds.len()
    }

    /// The boxes of every node, leaves first and the root last.
    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    /// Access the root node for manual traversal.
    pub fn root(&self) -> Node<'_> {
        Node::from_root(self)
    }
}
