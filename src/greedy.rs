//! Greedy consensus guide order
//!
//! Each round scores every pair of live profiles by aligning their consensus
//! sequences and merges the best pair, until one profile remains.

use crate::alignment::{align_profiles, score};
use crate::profile::Profile;
use crate::types::{AlignError, ScoringParams};
use rayon::prelude::*;

/// Pick the pair to merge from row-major pair scores.
///
/// Only a strictly positive score that beats every earlier one is adopted;
/// when no pair scores above zero the first two profiles are merged.
pub fn select_pair(scores: &[(usize, usize, i64)]) -> (usize, usize) {
    let mut high_score = 0;
    let mut selected = (0, 1);
    for &(i, j, pair_score) in scores {
        if pair_score > high_score {
            high_score = pair_score;
            selected = (i, j);
        }
    }
    selected
}

/// Score all unordered pairs `(i, j)`, `i < j`, in row-major order
fn score_pairs(profiles: &[Profile], params: &ScoringParams) -> Result<Vec<(usize, usize, i64)>, AlignError> {
    let consensus: Vec<Vec<u8>> = profiles
        .par_iter()
        .map(Profile::consensus)
        .collect::<Result<_, _>>()?;

    let n = consensus.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();

    Ok(pairs
        .par_iter()
        .map(|&(i, j)| (i, j, score(&consensus[i], &consensus[j], params)))
        .collect())
}

/// Progressively merge `profiles` by best consensus score
pub fn greedy_consensus(mut profiles: Vec<Profile>, params: &ScoringParams) -> Result<Profile, AlignError> {
    if profiles.len() < 2 {
        return Err(AlignError::InsufficientInput(profiles.len()));
    }

    log::info!("greedy consensus alignment of {} profiles", profiles.len());

    while profiles.len() > 1 {
        let scores = score_pairs(&profiles, params)?;
        let (i, j) = select_pair(&scores);
        log::debug!(
            "{} profiles left, merging {} and {}",
            profiles.len(),
            i,
            j
        );

        // higher index first so the lower one stays in place
        let second = profiles.remove(j);
        let first = profiles.remove(i);
        profiles.push(align_profiles(first, second, params)?);
    }

    profiles.pop().ok_or(AlignError::InsufficientInput(0))
}
