//! Utilities for laying out a packed BVH.

/// Calculate the total number of nodes in the tree and the exclusive end node id of each level.
///
/// Levels are counted from the leaves (level 0) up to the root, which is always the last node.
/// Leaves are grouped `leaf_node_size` at a time, every level above `node_size` at a time.
pub(crate) fn compute_num_nodes(
    num_items: usize,
    leaf_node_size: usize,
    node_size: usize,
) -> (usize, Vec<usize>) {
    debug_assert!(num_items > 0);
    debug_assert!(leaf_node_size >= 2 && node_size >= 2);

    let mut n = num_items;
    let mut num_nodes = n;
    let mut level_bounds = vec![n];
    let mut group_size = leaf_node_size;
    while n != 1 {
        n = n.div_ceil(group_size);
        num_nodes += n;
        level_bounds.push(num_nodes);
        group_size = node_size;
    }
    (num_nodes, level_bounds)
}

/// Binary search for the first value in `arr` bigger than `value`.
#[inline]
pub(crate) fn upper_bound(value: usize, arr: &[usize]) -> usize {
    let mut i = 0;
    let mut j = arr.len() - 1;

    while i < j {
        let m = (i + j) >> 1;
        if arr[m] > value {
            j = m;
        } else {
            i = m + 1;
        }
    }

    arr[i]
}
