//! Core alignment functionality
//!
//! Global Needleman-Wunsch alignment of two sequences that may already carry
//! gaps from earlier merges, and the pair-guided merge of two profiles built
//! on top of it.

use crate::profile::Profile;
use crate::types::{AlignError, AlignmentResult, ScoringParams, GAP};

/// Dense row-major score matrix of size `(m + 1) x (n + 1)`, kept in `i64` so
/// any `i32` scoring values fit
#[derive(Debug, Clone)]
pub struct DpMatrix {
    data: Vec<i64>,
    rows: usize,
    cols: usize,
}

impl DpMatrix {
    /// Fill the matrix for `a` (rows) against `b` (columns)
    pub fn fill(a: &[u8], b: &[u8], params: &ScoringParams) -> Self {
        let rows = a.len() + 1;
        let cols = b.len() + 1;
        let gap = i64::from(params.gap_penalty);
        let mut data = vec![0; rows * cols];

        for i in 0..rows {
            data[i * cols] = -(i as i64) * gap;
        }
        for j in 0..cols {
            data[j] = -(j as i64) * gap;
        }

        for i in 1..rows {
            for j in 1..cols {
                let diagonal = data[(i - 1) * cols + j - 1] + params.substitution(a[i - 1], b[j - 1]);
                let up = data[(i - 1) * cols + j] - gap;
                let left = data[i * cols + j - 1] - gap;
                data[i * cols + j] = diagonal.max(up).max(left);
            }
        }

        Self { data, rows, cols }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.data[row * self.cols + col]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Score of the full global alignment
    pub fn final_score(&self) -> i64 {
        self.get(self.rows - 1, self.cols - 1)
    }
}

/// Optimal global alignment score of `a` against `b`
pub fn score(a: &[u8], b: &[u8], params: &ScoringParams) -> i64 {
    DpMatrix::fill(a, b, params).final_score()
}

/// Align `a` against `b` and record where new gaps were inserted.
///
/// Traceback prefers the diagonal, then a gap in `a`, then a gap in `b`, so
/// equal-scoring alignments always resolve the same way.
pub fn align(a: &[u8], b: &[u8], params: &ScoringParams) -> AlignmentResult {
    let matrix = DpMatrix::fill(a, b, params);
    let gap = i64::from(params.gap_penalty);

    let mut aligned_a = Vec::with_capacity(a.len() + b.len());
    let mut aligned_b = Vec::with_capacity(a.len() + b.len());
    let mut gaps_a = Vec::new();
    let mut gaps_b = Vec::new();

    let (mut i, mut j) = (a.len(), b.len());
    while i > 0 || j > 0 {
        let current = matrix.get(i, j);
        if i > 0 && j > 0 && current == matrix.get(i - 1, j - 1) + params.substitution(a[i - 1], b[j - 1]) {
            aligned_a.push(a[i - 1]);
            aligned_b.push(b[j - 1]);
            i -= 1;
            j -= 1;
        } else if j > 0 && current == matrix.get(i, j - 1) - gap {
            aligned_a.push(GAP);
            aligned_b.push(b[j - 1]);
            gaps_a.push(i);
            j -= 1;
        } else {
            // only the vertical move is left to explain this cell
            aligned_a.push(a[i - 1]);
            aligned_b.push(GAP);
            gaps_b.push(j);
            i -= 1;
        }
    }

    // built backwards
    aligned_a.reverse();
    aligned_b.reverse();
    gaps_a.reverse();
    gaps_b.reverse();

    AlignmentResult {
        aligned_a,
        aligned_b,
        score: matrix.final_score(),
        gaps_a,
        gaps_b,
    }
}

/// Merge two profiles by aligning their consensus sequences and propagating
/// the resulting gaps into every member sequence
pub fn align_profiles(first: Profile, second: Profile, params: &ScoringParams) -> Result<Profile, AlignError> {
    let consensus_first = first.consensus()?;
    let consensus_second = second.consensus()?;
    let result = align(&consensus_first, &consensus_second, params);
    log::trace!(
        "merged profiles of {} and {} sequences, score {}, length {}",
        first.len(),
        second.len(),
        result.score,
        result.alignment_length()
    );
    Ok(Profile::merge(first, second, &result.gaps_a, &result.gaps_b))
}

/// Fraction of positions at which two equal-length aligned sequences agree
pub fn percent_identity(a: &[u8], b: &[u8]) -> f64 {
    let length = a.len().min(b.len());
    if length == 0 {
        return 0.0;
    }
    let identical = a.iter().zip(b).filter(|(x, y)| x == y).count();
    identical as f64 / length as f64
}
