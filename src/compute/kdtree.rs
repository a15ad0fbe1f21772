//! Static 2-d tree over latitude/longitude keys.
//!
//! The tree is built once by recursive median partitioning and never
//! modified afterwards. Nodes live in a flat arena (`Vec<Node>`) and refer to
//! their children by position, while each node only carries an [`IndexKey`]:
//! the coordinate plus the position of the full record in the caller's
//! dataset.
//!
//! Split axes alternate with depth: latitude at even depths, longitude at
//! odd depths. For every node, keys in the left subtree are `<=` the node's
//! value on its split axis and keys in the right subtree are `>=` it.

use geodecode_types::coordinate::Coordinate;
use std::cmp::Ordering;

/// Coordinate axis a tree level partitions on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Axis used at the given tree depth.
    #[inline]
    pub const fn at_depth(depth: usize) -> Self {
        if depth % 2 == 0 {
            Axis::Latitude
        } else {
            Axis::Longitude
        }
    }

    #[inline]
    const fn component(self) -> usize {
        match self {
            Axis::Latitude => 0,
            Axis::Longitude => 1,
        }
    }
}

/// Coordinate of a dataset record together with its position in the dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexKey {
    pub coord: [f64; 2],
    pub index: usize,
}

impl IndexKey {
    pub fn new(coord: Coordinate, index: usize) -> Self {
        Self {
            coord: coord.to_array(),
            index,
        }
    }

    #[inline]
    pub fn value(&self, axis: Axis) -> f64 {
        self.coord[axis.component()]
    }

    #[inline]
    pub fn distance_squared(&self, query: &[f64; 2]) -> f64 {
        let d_lat = self.coord[0] - query[0];
        let d_lon = self.coord[1] - query[1];
        d_lat * d_lat + d_lon * d_lon
    }

    #[inline]
    fn cmp_on(&self, other: &IndexKey, axis: Axis) -> Ordering {
        self.value(axis).total_cmp(&other.value(axis))
    }
}

/// Closest key found by a nearest-neighbor search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub key: IndexKey,
    /// Squared planar distance in degrees, never square-rooted
    pub distance_squared: f64,
}

#[derive(Debug, Clone)]
struct Node {
    key: IndexKey,
    axis: Axis,
    left: Option<usize>,
    right: Option<usize>,
}

/// Immutable balanced 2-d tree.
#[derive(Debug, Clone, Default)]
pub struct KdTree {
    nodes: Vec<Node>,
}

impl KdTree {
    /// Build a tree over `keys`.
    ///
    /// Medians are chosen with `select_nth_unstable_by` (linear expected
    /// time per level), so the whole build is `O(n log n)` expected.
    ///
    /// # Examples
    ///
    /// ```
    /// use geodecode::compute::kdtree::{IndexKey, KdTree};
    /// use geodecode::Coordinate;
    ///
    /// let keys = vec![
    ///     IndexKey::new(Coordinate::new(0.0, 0.0), 0),
    ///     IndexKey::new(Coordinate::new(10.0, 10.0), 1),
    ///     IndexKey::new(Coordinate::new(-10.0, -10.0), 2),
    /// ];
    /// let tree = KdTree::build(keys);
    ///
    /// let nearest = tree.nearest(Coordinate::new(1.0, 1.0)).unwrap();
    /// assert_eq!(nearest.key.index, 0);
    /// assert_eq!(nearest.distance_squared, 2.0);
    /// ```
    pub fn build(mut keys: Vec<IndexKey>) -> Self {
        let mut nodes = Vec::with_capacity(keys.len());
        Self::build_recursive(&mut nodes, &mut keys, 0);
        Self { nodes }
    }

    fn build_recursive(
        nodes: &mut Vec<Node>,
        keys: &mut [IndexKey],
        depth: usize,
    ) -> Option<usize> {
        if keys.is_empty() {
            return None;
        }

        let axis = Axis::at_depth(depth);
        let mid = keys.len() / 2;
        keys.select_nth_unstable_by(mid, |a, b| a.cmp_on(b, axis));

        let node_idx = nodes.len();
        nodes.push(Node {
            key: keys[mid],
            axis,
            left: None,
            right: None,
        });

        let (lower, upper) = keys.split_at_mut(mid);
        let left = Self::build_recursive(nodes, lower, depth + 1);
        let right = Self::build_recursive(nodes, &mut upper[1..], depth + 1);

        let node = &mut nodes[node_idx];
        node.left = left;
        node.right = right;
        Some(node_idx)
    }

    /// Number of keys in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Height of the tree, 0 when empty.
    pub fn depth(&self) -> usize {
        fn walk(tree: &KdTree, node: Option<usize>) -> usize {
            match node {
                None => 0,
                Some(idx) => {
                    let n = &tree.nodes[idx];
                    1 + walk(tree, n.left).max(walk(tree, n.right))
                }
            }
        }
        walk(self, self.root())
    }

    #[inline]
    fn root(&self) -> Option<usize> {
        if self.nodes.is_empty() { None } else { Some(0) }
    }

    /// Find the key with the smallest squared distance to `query`.
    ///
    /// Returns `None` for an empty tree or when no finite distance exists
    /// (non-finite query components). When several keys are equally close,
    /// the first one reached is kept: a node is tested before its children and
    /// the near side is searched before the far side.
    pub fn nearest(&self, query: Coordinate) -> Option<Neighbor> {
        let root = self.root()?;
        let query = query.to_array();
        let mut best = None;
        self.search(root, &query, &mut best);
        best
    }

    fn search(&self, node_idx: usize, query: &[f64; 2], best: &mut Option<Neighbor>) {
        let node = &self.nodes[node_idx];

        let dist = node.key.distance_squared(query);
        if dist < Self::bound(best) {
            *best = Some(Neighbor {
                key: node.key,
                distance_squared: dist,
            });
        }

        let diff = query[node.axis.component()] - node.key.value(node.axis);
        let (near, far) = if diff <= 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near) = near {
            self.search(near, query, best);
        }

        // Only cross the splitting line if a closer key could lie beyond it.
        if let Some(far) = far
            && diff * diff < Self::bound(best)
        {
            self.search(far, query, best);
        }
    }

    /// Squared distance a candidate has to beat. Starts at infinity, so a
    /// non-finite distance is never accepted.
    #[inline]
    fn bound(best: &Option<Neighbor>) -> f64 {
        best.map_or(f64::INFINITY, |b| b.distance_squared)
    }

    /// Iterate over all keys in arena order (pre-order).
    pub fn keys(&self) -> impl Iterator<Item = &IndexKey> {
        self.nodes.iter().map(|n| &n.key)
    }
}

/// A built index in one of its three shapes.
///
/// A single key needs no tree, and an empty dataset has nothing to search.
/// Callers match on the shape instead of assuming a tree exists.
#[derive(Debug, Clone, Default)]
pub enum SpatialIndex {
    #[default]
    Empty,
    Single(IndexKey),
    Tree(KdTree),
}

impl SpatialIndex {
    pub fn build(keys: Vec<IndexKey>) -> Self {
        match keys.as_slice() {
            [] => SpatialIndex::Empty,
            [key] => SpatialIndex::Single(*key),
            _ => SpatialIndex::Tree(KdTree::build(keys)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SpatialIndex::Empty => 0,
            SpatialIndex::Single(_) => 1,
            SpatialIndex::Tree(tree) => tree.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SpatialIndex::Empty)
    }
}
