use crate::bbox::BoundingBox;
use crate::bvh::index::{Bvh, BvhMetadata};

/// The default node size used by [`BvhBuilder::new`]
pub const DEFAULT_BVH_NODE_SIZE: u16 = 16;

/// A builder to create a [`Bvh`].
///
/// Leaves are grouped strictly in insertion order, `node_size` at a time, and the resulting nodes
/// are grouped the same way until a single root remains. Nothing is sorted, so the quality of the
/// tree depends on the spatial locality of the insertion order.
///
/// ```
/// use polygon_bvh::bvh::BvhBuilder;
/// use polygon_bvh::BoundingBox;
///
/// let mut builder = BvhBuilder::new_with_node_size(3, 2);
/// builder.add(BoundingBox::new(0., 0., 2., 2.), 0.);
/// builder.add(BoundingBox::new(1., 1., 3., 3.), -1.);
/// builder.add(BoundingBox::new(2., 2., 4., 4.), 5.);
/// let tree = builder.finish();
///
/// assert_eq!(tree.num_nodes(), 6);
/// assert_eq!(tree.root().bbox(), &BoundingBox::new(0., 0., 4., 4.));
/// assert_eq!(tree.root().min_weight(), -1.);
/// ```
#[derive(Debug)]
pub struct BvhBuilder {
    boxes: Vec<BoundingBox>,
    min_weights: Vec<f64>,
    indices: Vec<u32>,
    metadata: BvhMetadata,
}

impl BvhBuilder {
    /// Create a new builder with the provided number of items and the default node size.
    pub fn new(num_items: usize) -> Self {
        Self::new_with_node_size(num_items, DEFAULT_BVH_NODE_SIZE)
    }

    /// Create a new builder with the provided number of items and node size.
    ///
    /// Panics if `num_items` is zero, does not fit in a `u32`, or if `node_size` is smaller than 2.
    pub fn new_with_node_size(num_items: usize, node_size: u16) -> Self {
        Self::new_with_node_sizes(num_items, node_size, node_size)
    }

    /// Create a new builder whose leaves are grouped `leaf_node_size` at a time, while every
    /// level above groups `node_size` children.
    ///
    /// Panics if `num_items` is zero, does not fit in a `u32`, or if either size is smaller than 2.
    pub fn new_with_node_sizes(num_items: usize, leaf_node_size: u16, node_size: u16) -> Self {
        assert!(num_items > 0, "A tree needs at least one item.");
        assert!(
            u32::try_from(num_items).is_ok(),
            "Too many items: {}.",
            num_items
        );
        assert!(leaf_node_size >= 2, "Leaf node size must be at least 2.");
        assert!(node_size >= 2, "Node size must be at least 2.");

        let metadata = BvhMetadata::new(num_items, leaf_node_size as usize, node_size as usize);
        Self {
            boxes: Vec::with_capacity(metadata.num_nodes()),
            min_weights: Vec::with_capacity(metadata.num_nodes()),
            indices: Vec::with_capacity(metadata.num_nodes()),
            metadata,
        }
    }

    /// Access the underlying [BvhMetadata] of this instance.
    pub fn metadata(&self) -> &BvhMetadata {
        &self.metadata
    }

    /// Add a leaf with the given box and weight.
    ///
    /// This returns the insertion index, which is the id that queries report back.
    #[inline]
    pub fn add(&mut self, bbox: BoundingBox, weight: f64) -> u32 {
        let index = self.boxes.len() as u32;
        self.boxes.push(bbox);
        self.min_weights.push(weight);
        self.indices.push(index);
        index
    }

    /// Consume this builder, grouping the leaves bottom-up into a tree ready for queries.
    pub fn finish(mut self) -> Bvh {
        assert_eq!(
            self.boxes.len(),
            self.metadata.num_items(),
            "Added {} items when expected {}.",
            self.boxes.len(),
            self.metadata.num_items()
        );

        let level_bounds = self.metadata.level_bounds().to_vec();

        // generate nodes at each tree level, bottom-up; the last level is the root itself
        let mut pos = 0;
        for end in level_bounds[..level_bounds.len() - 1].iter() {
            let group_size = self.metadata.group_size(pos);
            while pos < *end {
                let first_child = pos;
                let group_end = (pos + group_size).min(*end);

                let mut node_box = BoundingBox::EMPTY;
                let mut node_weight = f64::INFINITY;
                for child in first_child..group_end {
                    node_box = node_box.merge(&self.boxes[child]);
                    node_weight = node_weight.min(self.min_weights[child]);
                }
                pos = group_end;

                self.boxes.push(node_box);
                self.min_weights.push(node_weight);
                self.indices.push(first_child as u32);
            }
        }

        debug_assert_eq!(self.boxes.len(), self.metadata.num_nodes());

        Bvh {
            boxes: self.boxes,
            min_weights: self.min_weights,
            indices: self.indices,
            metadata: self.metadata,
        }
    }
}
