use clap::{Parser, ValueEnum};
use progalign::fasta::{read_fasta, write_profile};
use progalign::{format_profile, progressive_alignment, ScoringParams, Strategy};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input FASTA file with at least two sequences (may be gzipped)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Score added for identical residues
    #[arg(short, long, default_value = "4")]
    match_score: i32,

    /// Score added for differing residues
    #[arg(short = 'x', long, default_value = "2")]
    mismatch_score: i32,

    /// Penalty per gap; the sign is ignored
    #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
    gap_penalty: i32,

    /// Strategy deciding the order in which profiles are merged
    #[arg(short, long, value_enum, default_value_t = StrategyArg::NeighbourJoining)]
    strategy: StrategyArg,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Number of threads to use for parallel processing
    #[arg(short, long, default_value = "1")]
    threads: usize,

    /// Log every merge round
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    GreedyConsensus,
    NeighbourJoining,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::GreedyConsensus => Strategy::GreedyConsensus,
            StrategyArg::NeighbourJoining => Strategy::NeighbourJoining,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// Rows sorted by gap count followed by the conservation line
    Text,
    /// Aligned FASTA with the input headers
    Fasta,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    // Set the number of threads for rayon
    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()?;

    let params = ScoringParams::builder()
        .match_score(args.match_score)?
        .mismatch_score(args.mismatch_score)?
        .gap_penalty(args.gap_penalty)?
        .build()?;
    log::info!("{params:?}, strategy {:?}", args.strategy);

    let sequences = read_fasta(&args.input)?;
    let msa = progressive_alignment(sequences, &params, args.strategy.into())?;

    let mut output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };

    match args.format {
        OutputFormat::Text => output.write_all(format_profile(&msa)?.as_bytes())?,
        OutputFormat::Fasta => write_profile(&mut output, &msa)?,
    }
    output.flush()?;

    Ok(())
}
