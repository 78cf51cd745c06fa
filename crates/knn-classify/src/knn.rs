//! Brute-force k-nearest-neighbor scan
//!
//! Distances are exact integer squared Euclidean distances over the
//! `u8` feature domain. Squared distance is monotone in the true
//! distance, so rankings agree and no floating point is involved.
//!
//! Candidates are ranked by the lexicographic key `(dist_sq, index)`,
//! a total order over the scan. Equal distances therefore resolve to
//! the earlier training index, and the parallel scan retains exactly
//! the same candidates as the sequential one.

use rayon::prelude::*;
use std::collections::BinaryHeap;

use knn_features::{FeatureVector, Label, TrainingFeatures};

use crate::error::ClassifyError;

/// Training-set size at which the scan goes parallel
const PARALLEL_THRESHOLD: usize = 4096;

/// One retained nearest-neighbor candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    /// Index of the candidate in the training slice
    pub index: usize,
    /// Exact squared Euclidean distance to the query
    pub dist_sq: u64,
}

/// The classifier's decision for one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Majority label among the retained neighbors
    pub label: Label,
    /// Training-slice index of the rank-1 neighbor
    pub nearest: usize,
    /// Retained neighbors in ascending rank order
    pub neighbors: Vec<Neighbor>,
}

/// Exact squared Euclidean distance between equal-length byte vectors
fn dist_sq(a: &[u8], b: &[u8]) -> u64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = u64::from(x.abs_diff(y));
            d * d
        })
        .sum()
}

/// Bounded best-k tracker over `(dist_sq, index)` keys
///
/// A max-heap of at most k keys; the root is the worst retained
/// candidate, so a better candidate evicts it in O(log k). The retained
/// set is the k smallest keys of the whole scan regardless of arrival
/// order, which is what makes the fold/reduce merge deterministic.
struct TopK {
    k: usize,
    heap: BinaryHeap<(u64, usize)>,
}

impl TopK {
    fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k + 1),
        }
    }

    fn push(&mut self, dist_sq: u64, index: usize) {
        let key = (dist_sq, index);
        if self.heap.len() < self.k {
            self.heap.push(key);
        } else if let Some(&worst) = self.heap.peek() {
            if key < worst {
                self.heap.pop();
                self.heap.push(key);
            }
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for (d, i) in other.heap {
            self.push(d, i);
        }
        self
    }

    /// Ascending rank order
    fn into_ranked(self) -> Vec<Neighbor> {
        let mut ranked: Vec<Neighbor> = self
            .heap
            .into_iter()
            .map(|(dist_sq, index)| Neighbor { index, dist_sq })
            .collect();
        ranked.sort_unstable_by_key(|n| (n.dist_sq, n.index));
        ranked
    }
}

/// Classify a query against labeled training samples
///
/// Scans every training sample, retains the k nearest (fewer when the
/// training set is smaller than k), and returns the majority label
/// among them together with the rank-1 candidate's index. A frequency
/// tie goes to the tied label whose best-ranked supporter ranks
/// highest.
///
/// # Errors
/// `BadFormat` failures, checked eagerly before any distance work:
/// empty training set, zero k, or any candidate whose length disagrees
/// with the query's (even one a bounded scan could have skipped).
pub fn classify(
    query: &FeatureVector,
    training: &[TrainingFeatures],
    k: usize,
) -> Result<Classification, ClassifyError> {
    if training.is_empty() {
        return Err(ClassifyError::EmptyTrainingSet);
    }
    if k == 0 {
        return Err(ClassifyError::ZeroK);
    }
    for (index, candidate) in training.iter().enumerate() {
        if candidate.features.len() != query.len() {
            return Err(ClassifyError::DimensionMismatch {
                index,
                query: query.len(),
                candidate: candidate.features.len(),
            });
        }
    }

    let top = if training.len() >= PARALLEL_THRESHOLD {
        training
            .par_iter()
            .enumerate()
            .fold(
                || TopK::new(k),
                |mut top, (index, candidate)| {
                    top.push(dist_sq(query.as_bytes(), candidate.features.as_bytes()), index);
                    top
                },
            )
            .reduce(|| TopK::new(k), TopK::merge)
    } else {
        let mut top = TopK::new(k);
        for (index, candidate) in training.iter().enumerate() {
            top.push(dist_sq(query.as_bytes(), candidate.features.as_bytes()), index);
        }
        top
    };

    let neighbors = top.into_ranked();
    let nearest = match neighbors.first() {
        Some(neighbor) => neighbor.index,
        // Unreachable with the guards above; report as the nearest fault
        None => return Err(ClassifyError::EmptyTrainingSet),
    };
    let label = vote(&neighbors, training);
    Ok(Classification {
        label,
        nearest,
        neighbors,
    })
}

/// Majority label over ranked neighbors
///
/// Tallied in rank order with a strictly-greater comparison, so among
/// frequency-tied labels the one first reaching the top count, i.e. the
/// one with the best-ranked supporter, wins.
fn vote(neighbors: &[Neighbor], training: &[TrainingFeatures]) -> Label {
    let mut tally: Vec<(&str, usize)> = Vec::with_capacity(neighbors.len());
    for neighbor in neighbors {
        let label = training[neighbor.index].label.as_str();
        match tally.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => tally.push((label, 1)),
        }
    }
    let mut best = ("", 0usize);
    for &(label, count) in &tally {
        if count > best.1 {
            best = (label, count);
        }
    }
    best.0.to_owned()
}
