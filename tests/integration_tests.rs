use progalign::fasta::{read_fasta, write_profile};
use progalign::profile::Profile;
use progalign::{
    format_profile, progressive_alignment, AlignError, NeighbourJoining, ScoringParams, Sequence,
    Strategy,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::process::Command;

/// Residues only, no gap
const RESIDUES: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

/// Generate a random protein sequence
fn generate_random_protein(length: usize, rng: &mut StdRng) -> Vec<u8> {
    (0..length)
        .map(|_| RESIDUES[rng.gen_range(0..RESIDUES.len())])
        .collect()
}

/// Copy `ancestor` with point substitutions and short indels
fn mutate(ancestor: &[u8], rate: f64, rng: &mut StdRng) -> Vec<u8> {
    let mut out = Vec::with_capacity(ancestor.len() + 8);
    for &residue in ancestor {
        let roll: f64 = rng.gen();
        if roll < rate {
            out.push(RESIDUES[rng.gen_range(0..RESIDUES.len())]);
        } else if roll < rate * 1.5 {
            // deletion
        } else if roll < rate * 2.0 {
            out.push(residue);
            out.push(RESIDUES[rng.gen_range(0..RESIDUES.len())]);
        } else {
            out.push(residue);
        }
    }
    if out.is_empty() {
        out.push(ancestor[0]);
    }
    out
}

fn protein_family(members: usize, length: usize, seed: u64) -> Vec<Sequence> {
    let mut rng = StdRng::seed_from_u64(seed);
    let ancestor = generate_random_protein(length, &mut rng);
    (0..members)
        .map(|i| Sequence::new(format!("member{i}"), mutate(&ancestor, 0.1, &mut rng)))
        .collect()
}

fn without_gaps(seq: &[u8]) -> Vec<u8> {
    seq.iter().copied().filter(|&b| b != b'-').collect()
}

/// Every input appears exactly once, all rows have one length, and stripping
/// gaps gives back the input residues
fn check_msa(input: &[Sequence], msa: &Profile) {
    assert_eq!(msa.len(), input.len());
    let width = msa.width();
    assert!(msa.sequences().iter().all(|s| s.len() == width));
    assert!(width >= input.iter().map(Sequence::len).max().unwrap_or(0));

    for original in input {
        let row = msa
            .sequences()
            .iter()
            .find(|s| s.id == original.id)
            .unwrap_or_else(|| panic!("missing {}", original.id));
        assert_eq!(without_gaps(&row.seq), without_gaps(&original.seq));
    }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("progalign-{}-{name}", std::process::id()))
}

#[test]
fn test_neighbour_joining_family() {
    println!("\n=== Test: neighbour-joining on a random protein family ===");
    let params = ScoringParams::new(2, 1, 1).unwrap();

    for seed in [7, 42, 1234] {
        let family = protein_family(8, 60, seed);
        let msa = progressive_alignment(family.clone(), &params, Strategy::NeighbourJoining).unwrap();
        check_msa(&family, &msa);
    }
}

#[test]
fn test_greedy_consensus_family() {
    println!("\n=== Test: greedy consensus on a random protein family ===");
    let params = ScoringParams::new(4, 2, 3).unwrap();

    for seed in [3, 99] {
        let family = protein_family(6, 50, seed);
        let msa = progressive_alignment(family.clone(), &params, Strategy::GreedyConsensus).unwrap();
        check_msa(&family, &msa);
    }
}

#[test]
fn test_guide_tree_size() {
    let params = ScoringParams::default();
    for k in 2..9 {
        let family = protein_family(k, 30, k as u64);
        let tree = NeighbourJoining::new(Profile::leaves(family), &params)
            .unwrap()
            .build_tree();
        assert_eq!(tree.node_count(), 2 * k - 1);
        assert_eq!(tree.get_leaves().len(), k);
    }
}

#[test]
fn test_greedy_is_order_independent_in_shape() {
    let params = ScoringParams::new(2, 1, 1).unwrap();
    let rows = ["MKTPLVGAIQV", "MKTPLVGWIQV", "MKTPLVGAIQW"];
    let orders = [[0, 1, 2], [2, 1, 0], [1, 2, 0], [0, 2, 1]];

    for order in orders {
        let input: Vec<Sequence> = order
            .iter()
            .map(|&i| Sequence::new(format!("s{i}"), rows[i]))
            .collect();
        let msa = progressive_alignment(input.clone(), &params, Strategy::GreedyConsensus).unwrap();
        check_msa(&input, &msa);
        // a single substitution never needs a gap
        assert_eq!(msa.width(), 11);
    }
}

#[test]
fn test_identical_sequences() {
    let params = ScoringParams::default();
    let input: Vec<Sequence> = (0..4)
        .map(|i| Sequence::new(format!("copy{i}"), "MKTAYIAKQR"))
        .collect();

    for strategy in [Strategy::GreedyConsensus, Strategy::NeighbourJoining] {
        let msa = progressive_alignment(input.clone(), &params, strategy).unwrap();
        assert!(msa.sequences().iter().all(|s| s.seq == b"MKTAYIAKQR".to_vec()));
        assert_eq!(msa.match_annotation().unwrap(), "*".repeat(10));
    }
}

#[test]
fn test_unsupported_symbol_surfaces() {
    let params = ScoringParams::default();
    let input = vec![
        Sequence::new("a", "MKT*LV"),
        Sequence::new("b", "MKTPLV"),
        Sequence::new("c", "MKTLV"),
    ];
    let result = progressive_alignment(input, &params, Strategy::GreedyConsensus);
    assert!(matches!(
        result,
        Err(AlignError::UnsupportedSymbol { symbol: '*', .. })
    ));
}

#[test]
fn test_fasta_round_trip() {
    let family = protein_family(4, 25, 11);
    let params = ScoringParams::default();
    let msa = progressive_alignment(family.clone(), &params, Strategy::NeighbourJoining).unwrap();

    let path = temp_path("round-trip.fa");
    let file = std::fs::File::create(&path).unwrap();
    write_profile(file, &msa).unwrap();

    let aligned = read_fasta(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(aligned.len(), family.len());
    for (row, read_back) in msa.sequences().iter().zip(&aligned) {
        assert_eq!(row, read_back);
    }
}

#[test]
fn test_fasta_needs_two_records() {
    let path = temp_path("single.fa");
    std::fs::write(&path, ">only\nMKTPLV\n").unwrap();
    let result = read_fasta(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(AlignError::InsufficientInput(1))));
}

#[test]
fn test_cli_text_output() {
    let path = temp_path("cli.fa");
    std::fs::write(&path, ">a\nACGT\n>b\nAGT\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_progalign"))
        .arg("-i")
        .arg(&path)
        .args(["-m", "2", "-x", "1", "-g", "-1", "-s", "greedy-consensus"])
        .output()
        .expect("Failed to run progalign");
    std::fs::remove_file(&path).ok();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "ACGT\nA-GT\n* **\n");
}

#[test]
fn test_cli_matches_library() {
    let family = protein_family(5, 40, 5);
    let path = temp_path("cli-nj.fa");
    let mut fasta = Vec::new();
    for sequence in &family {
        fasta.extend_from_slice(format!(">{}\n", sequence.id).as_bytes());
        fasta.extend_from_slice(&sequence.seq);
        fasta.push(b'\n');
    }
    std::fs::write(&path, fasta).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_progalign"))
        .arg("--input")
        .arg(&path)
        .args(["--strategy", "neighbour-joining"])
        .output()
        .expect("Failed to run progalign");
    std::fs::remove_file(&path).ok();
    assert!(output.status.success());

    let msa = progressive_alignment(family, &ScoringParams::default(), Strategy::NeighbourJoining).unwrap();
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format_profile(&msa).unwrap()
    );
}
