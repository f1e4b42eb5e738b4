//! Per-column symbol tallies over the supported amino-acid alphabet

use crate::types::AlignError;

/// Supported one-letter codes followed by the gap. The order is fixed and
/// decides consensus ties: the earliest symbol with the highest count wins.
pub const ALPHABET: [u8; 27] = [
    b'A', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'K', b'L', b'M', b'N', b'P', b'Q', b'R',
    b'S', b'T', b'V', b'W', b'Y', b'B', b'Z', b'X', b'J', b'U', b'O', b'-',
];

/// Position of `symbol` in [`ALPHABET`]
pub fn alphabet_index(symbol: u8) -> Option<usize> {
    ALPHABET.iter().position(|&s| s == symbol)
}

/// Counts symbol occurrences within one alignment column
#[derive(Debug, Clone, Default)]
pub struct OccurrenceCounter {
    counts: [usize; ALPHABET.len()],
    total: usize,
}

impl OccurrenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `symbol`; `column` is only used for error reporting
    pub fn increment(&mut self, symbol: u8, column: usize) -> Result<(), AlignError> {
        let index = alphabet_index(symbol).ok_or(AlignError::UnsupportedSymbol {
            symbol: symbol as char,
            column,
        })?;
        self.counts[index] += 1;
        self.total += 1;
        Ok(())
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn index_of_maximum(&self) -> usize {
        let mut best = 0;
        for (i, &count) in self.counts.iter().enumerate() {
            if count > self.counts[best] {
                best = i;
            }
        }
        best
    }

    /// Most frequent symbol; `A` for an empty counter
    pub fn most_frequent(&self) -> u8 {
        ALPHABET[self.index_of_maximum()]
    }

    /// Share of the most frequent symbol among all counted symbols
    pub fn max_frequency(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.counts[self.index_of_maximum()] as f64 / self.total as f64
    }

    pub fn reset(&mut self) {
        self.counts = [0; ALPHABET.len()];
        self.total = 0;
    }
}
