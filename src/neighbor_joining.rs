//! Neighbour-joining guide tree construction
//!
//! This module builds a binary guide tree from the all-pairs alignment scores
//! of the input sequences and then merges profiles bottom-up along that tree.
//!
//! Raw alignment scores are used as the distances. Higher scores mean more
//! similar sequences, which is the opposite of what neighbour-joining expects
//! from a distance; the reduction formulas are applied to them unchanged.

use crate::alignment::{align_profiles, score};
use crate::profile::Profile;
use crate::types::{AlignError, ScoringParams};
use rayon::prelude::*;

/// Square symmetric integer matrix over the live tree nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    size: usize,
    data: Vec<i64>,
}

impl DistanceMatrix {
    /// All-zero matrix
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![0; size * size],
        }
    }

    /// Build from the upper triangle; `value(i, j)` is called for `i < j` only
    pub fn from_upper<F>(size: usize, value: F) -> Self
    where
        F: Fn(usize, usize) -> i64,
    {
        let mut matrix = Self::new(size);
        for i in 0..size {
            for j in i + 1..size {
                matrix.set(i, j, value(i, j));
            }
        }
        matrix
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i64 {
        self.data[i * self.size + j]
    }

    /// Set both `(i, j)` and `(j, i)`
    pub fn set(&mut self, i: usize, j: usize, value: i64) {
        self.data[i * self.size + j] = value;
        self.data[j * self.size + i] = value;
    }

    pub fn row_sum(&self, i: usize) -> i64 {
        self.data[i * self.size..(i + 1) * self.size].iter().sum()
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (0..i).all(|j| self.get(i, j) == self.get(j, i)))
    }

    pub fn has_zero_diagonal(&self) -> bool {
        (0..self.size).all(|i| self.get(i, i) == 0)
    }
}

/// A node of the guide tree
#[derive(Debug, Clone)]
pub enum GuideTree {
    /// One input sequence; `id` is its input index
    Leaf { id: usize, profile: Profile },
    /// Join of two subtrees created during the reduction
    Internal {
        id: usize,
        left: Box<GuideTree>,
        right: Box<GuideTree>,
    },
}

impl GuideTree {
    pub fn leaf(id: usize, profile: Profile) -> Self {
        GuideTree::Leaf { id, profile }
    }

    pub fn internal(id: usize, left: GuideTree, right: GuideTree) -> Self {
        GuideTree::Internal {
            id,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn id(&self) -> usize {
        match self {
            GuideTree::Leaf { id, .. } | GuideTree::Internal { id, .. } => *id,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, GuideTree::Leaf { .. })
    }

    /// Input indices of all leaves in this subtree, left to right
    pub fn get_leaves(&self) -> Vec<usize> {
        match self {
            GuideTree::Leaf { id, .. } => vec![*id],
            GuideTree::Internal { left, right, .. } => {
                let mut leaves = left.get_leaves();
                leaves.extend(right.get_leaves());
                leaves
            }
        }
    }

    /// Total number of nodes, leaves and internal
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            if let GuideTree::Internal { left, right, .. } = node {
                stack.push(left);
                stack.push(right);
            }
        }
        count
    }

    /// Newick rendering with leaves labelled by their sequence id
    pub fn to_newick(&self) -> String {
        let mut out = String::new();
        self.write_newick(&mut out);
        out.push(';');
        out
    }

    fn write_newick(&self, out: &mut String) {
        match self {
            GuideTree::Leaf { profile, .. } => out.push_str(&profile.initial_sequence().id),
            GuideTree::Internal { left, right, .. } => {
                out.push('(');
                left.write_newick(out);
                out.push(',');
                right.write_newick(out);
                out.push(')');
            }
        }
    }

    /// Merge profiles bottom-up and return the root profile.
    ///
    /// Right subtrees are resolved before left ones; each internal node merges
    /// its left profile with its right profile.
    pub fn into_profile(self, params: &ScoringParams) -> Result<Profile, AlignError> {
        enum Step {
            Visit(GuideTree),
            Merge,
        }

        let mut stack = vec![Step::Visit(self)];
        let mut resolved: Vec<Profile> = Vec::new();

        while let Some(step) = stack.pop() {
            match step {
                Step::Visit(GuideTree::Leaf { profile, .. }) => resolved.push(profile),
                Step::Visit(GuideTree::Internal { left, right, .. }) => {
                    stack.push(Step::Merge);
                    stack.push(Step::Visit(*left));
                    stack.push(Step::Visit(*right));
                }
                Step::Merge => {
                    let (Some(left), Some(right)) = (resolved.pop(), resolved.pop()) else {
                        unreachable!("merge step without two resolved children");
                    };
                    resolved.push(align_profiles(left, right, params)?);
                }
            }
        }

        match resolved.pop() {
            Some(profile) => Ok(profile),
            None => unreachable!("guide tree resolved to nothing"),
        }
    }
}

/// State of the neighbour-joining reduction over the live nodes
#[derive(Debug)]
pub struct NeighbourJoining {
    nodes: Vec<GuideTree>,
    distances: DistanceMatrix,
    next_node_id: usize,
}

impl NeighbourJoining {
    /// Create one leaf per profile and score every pair of initial sequences
    pub fn new(profiles: Vec<Profile>, params: &ScoringParams) -> Result<Self, AlignError> {
        let n = profiles.len();
        if n < 2 {
            return Err(AlignError::InsufficientInput(n));
        }

        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();
        let scores: Vec<i64> = pairs
            .par_iter()
            .map(|&(i, j)| {
                let a = &profiles[i].initial_sequence().seq;
                let b = &profiles[j].initial_sequence().seq;
                score(a, b, params)
            })
            .collect();

        let mut distances = DistanceMatrix::new(n);
        for (&(i, j), &d) in pairs.iter().zip(&scores) {
            distances.set(i, j, d);
        }

        let nodes = profiles
            .into_iter()
            .enumerate()
            .map(|(id, profile)| GuideTree::leaf(id, profile))
            .collect();

        Ok(Self {
            nodes,
            distances,
            next_node_id: n,
        })
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Ids of the live nodes in matrix order
    pub fn node_ids(&self) -> Vec<usize> {
        self.nodes.iter().map(GuideTree::id).collect()
    }

    /// `N(i, j) = D(i, j) - (r(i) + r(j))` with `r(i) = sum_k D(i, k) / (size - 2)`.
    /// Only meaningful while more than two nodes are live.
    pub fn neighbour_matrix(&self) -> DistanceMatrix {
        let size = self.distances.size();
        let divisor = size.saturating_sub(2).max(1) as i64;
        let means: Vec<i64> = (0..size)
            .map(|i| self.distances.row_sum(i) / divisor)
            .collect();
        DistanceMatrix::from_upper(size, |i, j| {
            self.distances.get(i, j) - (means[i] + means[j])
        })
    }

    /// First pair `i < j` in row-major order with the smallest neighbour value.
    ///
    /// The zero diagonal is never selected: a node cannot be joined with itself.
    pub fn nearest_pair(neighbours: &DistanceMatrix) -> (usize, usize) {
        let mut smallest = i64::MAX;
        let mut pair = (0, 1);
        for i in 0..neighbours.size() {
            for j in i + 1..neighbours.size() {
                if neighbours.get(i, j) < smallest {
                    smallest = neighbours.get(i, j);
                    pair = (i, j);
                }
            }
        }
        pair
    }

    /// Join the nearest pair into a new node. Returns false once only two
    /// nodes are left.
    pub fn reduce_once(&mut self) -> bool {
        let size = self.nodes.len();
        if size <= 2 {
            return false;
        }

        let neighbours = self.neighbour_matrix();
        let (p, q) = Self::nearest_pair(&neighbours);
        log::debug!(
            "joining nodes {} and {} (neighbour value {}), {} nodes live",
            self.nodes[p].id(),
            self.nodes[q].id(),
            neighbours.get(p, q),
            size
        );

        // untouched nodes keep their order, the new node goes last
        let kept: Vec<usize> = (0..size).filter(|&k| k != p && k != q).collect();
        let mut distances = DistanceMatrix::new(size - 1);
        for (a, &k) in kept.iter().enumerate() {
            for (b, &l) in kept.iter().enumerate().skip(a + 1) {
                distances.set(a, b, self.distances.get(k, l));
            }
            let joined = (self.distances.get(p, k) + self.distances.get(q, k) - self.distances.get(p, q)) / 2;
            distances.set(a, size - 2, joined);
        }

        let right = self.nodes.remove(q);
        let left = self.nodes.remove(p);
        self.nodes.push(GuideTree::internal(self.next_node_id, left, right));
        self.next_node_id += 1;
        self.distances = distances;
        true
    }

    /// Run the reduction to completion and join the last two nodes at the root
    pub fn build_tree(mut self) -> GuideTree {
        let leaves = self.nodes.len();
        while self.reduce_once() {}
        log::debug!("reduced {} leaves, joining root {}", leaves, self.next_node_id);

        let right = self.nodes.pop();
        let left = self.nodes.pop();
        match (left, right) {
            (Some(left), Some(right)) => GuideTree::internal(self.next_node_id, left, right),
            _ => unreachable!("reduction always leaves two nodes"),
        }
    }
}

/// Build the neighbour-joining guide tree and merge profiles along it
pub fn neighbour_joining(profiles: Vec<Profile>, params: &ScoringParams) -> Result<Profile, AlignError> {
    log::info!("neighbour-joining alignment of {} profiles", profiles.len());
    let tree = NeighbourJoining::new(profiles, params)?.build_tree();
    log::debug!("guide tree: {}", tree.to_newick());
    tree.into_profile(params)
}
