//! Core types for the progalign library

use thiserror::Error;

/// A sequence with an identifier and data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: String,
    pub seq: Vec<u8>,
}

impl Sequence {
    pub fn new(id: impl Into<String>, seq: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            seq: seq.into(),
        }
    }

    /// Number of gap characters in the sequence
    pub fn gap_count(&self) -> usize {
        self.seq.iter().filter(|&&b| b == GAP).count()
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// The gap character
pub const GAP: u8 = b'-';

/// Scoring parameters shared by every alignment of a run
///
/// Both `match_score` and `mismatch_score` are added to the diagonal move as
/// positive rewards; only indels (and residues aligned against an existing gap)
/// are penalized, by `gap_penalty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringParams {
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap_penalty: i32,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            match_score: 4,
            mismatch_score: 2,
            gap_penalty: 1,
        }
    }
}

impl ScoringParams {
    /// Create validated parameters. The gap penalty is taken by absolute value.
    pub fn new(match_score: i32, mismatch_score: i32, gap_penalty: i32) -> Result<Self, AlignError> {
        if match_score <= 0 {
            return Err(AlignError::InvalidScore {
                name: "match score",
                value: match_score,
            });
        }
        if mismatch_score <= 0 {
            return Err(AlignError::InvalidScore {
                name: "mismatch score",
                value: mismatch_score,
            });
        }
        Ok(Self {
            match_score,
            mismatch_score,
            gap_penalty: gap_penalty.saturating_abs(),
        })
    }

    pub fn builder() -> ScoringParamsBuilder {
        ScoringParamsBuilder::default()
    }

    /// Contribution of aligning `x` against `y` on the diagonal
    #[inline]
    pub fn substitution(&self, x: u8, y: u8) -> i64 {
        if x == y {
            i64::from(self.match_score)
        } else if x == GAP || y == GAP {
            -i64::from(self.gap_penalty)
        } else {
            i64::from(self.mismatch_score)
        }
    }
}

/// Collects the three scoring values, each exactly once
#[derive(Debug, Default, Clone)]
pub struct ScoringParamsBuilder {
    match_score: Option<i32>,
    mismatch_score: Option<i32>,
    gap_penalty: Option<i32>,
}

impl ScoringParamsBuilder {
    pub fn match_score(mut self, value: i32) -> Result<Self, AlignError> {
        set_once(&mut self.match_score, value, "match score")?;
        Ok(self)
    }

    pub fn mismatch_score(mut self, value: i32) -> Result<Self, AlignError> {
        set_once(&mut self.mismatch_score, value, "mismatch score")?;
        Ok(self)
    }

    pub fn gap_penalty(mut self, value: i32) -> Result<Self, AlignError> {
        set_once(&mut self.gap_penalty, value, "gap penalty")?;
        Ok(self)
    }

    pub fn build(self) -> Result<ScoringParams, AlignError> {
        let match_score = self
            .match_score
            .ok_or(AlignError::ConfigurationNotSet("match score"))?;
        let mismatch_score = self
            .mismatch_score
            .ok_or(AlignError::ConfigurationNotSet("mismatch score"))?;
        let gap_penalty = self
            .gap_penalty
            .ok_or(AlignError::ConfigurationNotSet("gap penalty"))?;
        ScoringParams::new(match_score, mismatch_score, gap_penalty)
    }
}

fn set_once(slot: &mut Option<i32>, value: i32, name: &'static str) -> Result<(), AlignError> {
    if slot.is_some() {
        return Err(AlignError::ConfigurationAlreadySet(name));
    }
    *slot = Some(value);
    Ok(())
}

/// Result of a pairwise alignment
///
/// Gap positions are given in the coordinates of the unaligned input: a value
/// `p` in `gaps_a` means a new gap sits directly before residue `p` of the
/// first sequence (`p == len` appends). Runs of gaps repeat the same position.
/// Both lists are ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentResult {
    pub aligned_a: Vec<u8>,
    pub aligned_b: Vec<u8>,
    pub score: i64,
    pub gaps_a: Vec<usize>,
    pub gaps_b: Vec<usize>,
}

impl AlignmentResult {
    pub fn alignment_length(&self) -> usize {
        self.aligned_a.len()
    }

    /// Fraction of aligned columns holding the same character in both rows
    pub fn identity(&self) -> f64 {
        crate::alignment::percent_identity(&self.aligned_a, &self.aligned_b)
    }
}

/// Guide-order strategy used to merge profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Repeatedly merge the two profiles whose consensus sequences score highest
    GreedyConsensus,
    /// Merge profiles along a neighbour-joining guide tree
    #[default]
    NeighbourJoining,
}

/// Error type for alignment operations
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("at least 2 sequences are required, got {0}")]
    InsufficientInput(usize),
    #[error("{0} was already set")]
    ConfigurationAlreadySet(&'static str),
    #[error("{0} was not set")]
    ConfigurationNotSet(&'static str),
    #[error("invalid {name}: {value}")]
    InvalidScore { name: &'static str, value: i32 },
    #[error("unsupported symbol '{symbol}' in column {column}")]
    UnsupportedSymbol { symbol: char, column: usize },
    #[error("profile sequences differ in length: expected {expected}, found {found}")]
    UnequalLengths { expected: usize, found: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
