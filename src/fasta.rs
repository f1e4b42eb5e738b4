//! FASTA input and aligned FASTA output

use crate::profile::Profile;
use crate::types::{AlignError, Sequence};
use bio::io::fasta;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Read all records from `reader`; residues are upper-cased
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Sequence>, AlignError> {
    let mut sequences = Vec::new();
    for result in fasta::Reader::new(reader).records() {
        let record = result?;
        sequences.push(Sequence::new(record.id(), record.seq().to_ascii_uppercase()));
    }
    Ok(sequences)
}

/// Read a FASTA file (gzipped when the name ends in `.gz`) holding at least
/// two sequences
pub fn read_fasta(path: &Path) -> Result<Vec<Sequence>, AlignError> {
    let file = File::open(path)?;
    let sequences = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        read_records(GzDecoder::new(file))?
    } else {
        read_records(file)?
    };

    if sequences.len() < 2 {
        return Err(AlignError::InsufficientInput(sequences.len()));
    }
    log::info!("read {} sequences from {}", sequences.len(), path.display());
    Ok(sequences)
}

/// Write every row of `profile` as a FASTA record, in profile order
pub fn write_profile<W: Write>(out: W, profile: &Profile) -> io::Result<()> {
    let mut writer = fasta::Writer::new(out);
    for sequence in profile.sequences() {
        writer.write(&sequence.id, None, &sequence.seq)?;
    }
    writer.flush()
}
