//! Progalign - pair-guided progressive multiple sequence alignment
//!
//! Sequences are merged two at a time into growing profiles until a single
//! profile holding every input remains. The merge order comes either from a
//! greedy search over consensus alignment scores or from a neighbour-joining
//! guide tree.

pub mod alignment;
pub mod fasta;
pub mod greedy;
pub mod neighbor_joining;
pub mod occurrence;
pub mod profile;
pub mod types;

// Re-export main types and functions
pub use alignment::{align, align_profiles, percent_identity, score};
pub use greedy::greedy_consensus;
pub use neighbor_joining::{neighbour_joining, GuideTree, NeighbourJoining};
pub use profile::Profile;
pub use types::{AlignError, AlignmentResult, ScoringParams, Sequence, Strategy};

/// Compute a multiple sequence alignment of `sequences`
///
/// # Example
/// ```
/// use progalign::{progressive_alignment, ScoringParams, Sequence, Strategy};
///
/// let sequences = vec![
///     Sequence::new("seq1", "ACGT"),
///     Sequence::new("seq2", "AGT"),
/// ];
/// let params = ScoringParams::new(2, 1, 1).unwrap();
///
/// let msa = progressive_alignment(sequences, &params, Strategy::NeighbourJoining).unwrap();
/// assert_eq!(msa.sequences()[1].seq, b"A-GT".to_vec());
/// ```
pub fn progressive_alignment(
    sequences: Vec<Sequence>,
    params: &ScoringParams,
    strategy: Strategy,
) -> Result<Profile, AlignError> {
    if sequences.len() < 2 {
        return Err(AlignError::InsufficientInput(sequences.len()));
    }

    let profiles = Profile::leaves(sequences);
    match strategy {
        Strategy::GreedyConsensus => greedy_consensus(profiles, params),
        Strategy::NeighbourJoining => neighbour_joining(profiles, params),
    }
}

/// Format a profile as text: rows by ascending gap count, then the match
/// annotation line
pub fn format_profile(profile: &Profile) -> Result<String, AlignError> {
    let mut out = String::new();
    for sequence in profile.sorted_by_gaps() {
        out.push_str(&String::from_utf8_lossy(&sequence.seq));
        out.push('\n');
    }
    out.push_str(&profile.match_annotation()?);
    out.push('\n');
    Ok(out)
}
