//! Groups of aligned sequences that are merged as one unit

use crate::occurrence::OccurrenceCounter;
use crate::types::{AlignError, Sequence, GAP};

/// An ordered group of sequences. Once a profile holds two or more sequences
/// they all have the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    sequences: Vec<Sequence>,
}

impl From<Sequence> for Profile {
    fn from(sequence: Sequence) -> Self {
        Self {
            sequences: vec![sequence],
        }
    }
}

impl Profile {
    /// Wrap a single unaligned input sequence
    pub fn single(sequence: Sequence) -> Self {
        sequence.into()
    }

    /// Build one leaf profile per input sequence
    pub fn leaves(sequences: Vec<Sequence>) -> Vec<Profile> {
        sequences.into_iter().map(Profile::from).collect()
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Number of sequences in the profile
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// First sequence; for a leaf this is the original input
    pub fn initial_sequence(&self) -> &Sequence {
        &self.sequences[0]
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.sequences.first().map_or(0, Sequence::len)
    }

    fn check_lengths(&self) -> Result<usize, AlignError> {
        let expected = self.width();
        match self.sequences.iter().find(|s| s.len() != expected) {
            Some(s) => Err(AlignError::UnequalLengths {
                expected,
                found: s.len(),
            }),
            None => Ok(expected),
        }
    }

    /// Fill `counter` with the symbols of column `column`
    fn count_column(&self, column: usize, counter: &mut OccurrenceCounter) -> Result<(), AlignError> {
        counter.reset();
        for sequence in &self.sequences {
            counter.increment(sequence.seq[column], column)?;
        }
        Ok(())
    }

    /// Per-column most frequent symbol
    pub fn consensus(&self) -> Result<Vec<u8>, AlignError> {
        let width = self.check_lengths()?;
        let mut counter = OccurrenceCounter::new();
        let mut consensus = Vec::with_capacity(width);
        for column in 0..width {
            self.count_column(column, &mut counter)?;
            consensus.push(counter.most_frequent());
        }
        Ok(consensus)
    }

    /// `*` for fully conserved columns, `.` where the top symbol reaches 80%,
    /// a space otherwise
    pub fn match_annotation(&self) -> Result<String, AlignError> {
        let width = self.check_lengths()?;
        let mut counter = OccurrenceCounter::new();
        let mut annotation = String::with_capacity(width);
        for column in 0..width {
            self.count_column(column, &mut counter)?;
            let frequency = counter.max_frequency();
            annotation.push(if frequency == 1.0 {
                '*'
            } else if frequency >= 0.8 {
                '.'
            } else {
                ' '
            });
        }
        Ok(annotation)
    }

    /// Sequences ordered by ascending gap count; equal counts keep profile order
    pub fn sorted_by_gaps(&self) -> Vec<&Sequence> {
        let mut sorted: Vec<&Sequence> = self.sequences.iter().collect();
        sorted.sort_by_key(|s| s.gap_count());
        sorted
    }

    /// Concatenate two profiles after propagating the new gaps of each side
    /// into every one of its sequences
    pub fn merge(first: Profile, second: Profile, gaps_first: &[usize], gaps_second: &[usize]) -> Profile {
        let mut sequences = Vec::with_capacity(first.len() + second.len());
        for (profile, gaps) in [(first, gaps_first), (second, gaps_second)] {
            sequences.extend(profile.sequences.into_iter().map(|mut s| {
                s.seq = insert_gaps(&s.seq, gaps);
                s
            }));
        }
        Profile { sequences }
    }
}

/// Insert a gap before each listed position of `seq`.
///
/// Positions refer to the original `seq` and must be ascending; repeated
/// positions produce runs of gaps.
pub fn insert_gaps(seq: &[u8], gaps: &[usize]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len() + gaps.len());
    let mut next = 0;
    for &position in gaps {
        out.extend_from_slice(&seq[next..position]);
        out.push(GAP);
        next = position;
    }
    out.extend_from_slice(&seq[next..]);
    out
}
