//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over a slice of primitives (usually a mesh's triangles).
//! Leaves hold an index into that slice rather than the primitive itself, so
//! the tree can live next to the data it accelerates.

use crate::hittable::{Hittable, Intersection};
use prism_math::{Aabb, Interval, Ray, Vec3};

/// BVH node - either a branch with two children or a leaf with one primitive.
#[derive(Debug)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node referring to a single primitive.
    Leaf { index: usize, bbox: Aabb },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Build a BVH over `items`.
    ///
    /// Median split: sort by centroid on the longest axis of the node's box,
    /// split in half, recurse. Produces a balanced tree of depth O(log n).
    pub fn build<T: Hittable>(items: &[T]) -> Self {
        if items.is_empty() {
            return BvhNode::Empty;
        }

        let boxes: Vec<Aabb> = items.iter().map(|item| item.bounding_box()).collect();
        let centroids: Vec<Vec3> = boxes.iter().map(|b| b.centroid()).collect();
        let mut indices: Vec<usize> = (0..items.len()).collect();

        let root = Self::build_recursive(&boxes, &centroids, &mut indices);
        log::debug!(
            "Built BVH: {} primitives, depth {}",
            items.len(),
            root.depth()
        );
        root
    }

    fn build_recursive(boxes: &[Aabb], centroids: &[Vec3], indices: &mut [usize]) -> Self {
        if let [index] = *indices {
            return BvhNode::Leaf {
                index,
                bbox: boxes[index],
            };
        }

        let bounds = indices
            .iter()
            .fold(Aabb::EMPTY, |acc, &i| Aabb::surrounding(&acc, &boxes[i]));
        let axis = bounds.largest_axis();

        indices.sort_unstable_by(|&a, &b| centroids[a][axis].total_cmp(&centroids[b][axis]));

        let mid = indices.len() / 2;
        let (left_indices, right_indices) = indices.split_at_mut(mid);

        let left = Self::build_recursive(boxes, centroids, left_indices);
        let right = Self::build_recursive(boxes, centroids, right_indices);
        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Nearest hit among `items` (the slice this tree was built over).
    pub fn intersect<'a, T: Hittable>(
        &self,
        items: &'a [T],
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<Intersection<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { index, .. } => items[*index].intersect(ray, ray_t),

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.intersects(ray, ray_t) {
                    return None;
                }

                let hit_left = left.intersect(items, ray, ray_t);

                // Only check right up to closest hit
                let right_t = hit_left
                    .as_ref()
                    .map_or(ray_t, |hit| ray_t.with_max(hit.t));
                let hit_right = right.intersect(items, ray, right_t);

                hit_right.or(hit_left)
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}
