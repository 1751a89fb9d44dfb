//! A binary to stress test the closure engine within `seqclosure`.
//!
//! ```shell
//! cargo run --release --bin=stress-closure --features=binaries -- --shape 6x2000
//! ```
//!
//! It achieves this by carrying out the following for a number of independent
//! trials (run in parallel):
//!
//! * Generating a set of sequences with random lengths.
//! * Proposing `n` random facts near the diagonal between two sequences and
//!   adding the ones that are consistent with the facts so far.
//! * Every so often, rebuilding a copy of the engine from scratch and ensuring
//!   that it matches the incrementally maintained engine exactly.

use std::fs::File;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Instant;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use flate2::Compression;
use flate2::write::GzEncoder;
use nonempty::NonEmpty;
use rand::Rng;
use rand::rngs::ThreadRng;
use rayon::prelude::*;
use regex::Regex;
use seqclosure::Engine;
use seqclosure::engine::Builder;
use seqclosure::fact::Fact;
use seqclosure::lengths::Lengths;
use seqclosure::reader::Problem;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;
use weighted_rand::builder::NewBuilder;
use weighted_rand::builder::WalkerTableBuilder;
use weighted_rand::table::WalkerTable;

////////////////////////////////////////////////////////////////////////////////////////
// Shapes
////////////////////////////////////////////////////////////////////////////////////////

/// The shape of a trial: how many sequences and how long they may be.
#[derive(Clone, Copy, Debug)]
struct Shape {
    /// The number of sequences.
    sequences: usize,

    /// The maximum length of a sequence.
    length: usize,
}

static REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)x(\d+)$").unwrap());

impl Shape {
    /// Attempts to create a new shape from a string such as `4x200`.
    ///
    /// [`None`] is returned if the shape is not valid.
    fn try_new(value: impl AsRef<str>) -> Option<Self> {
        let groups = REGEX.captures(value.as_ref())?;

        let sequences = groups.get(1)?.as_str().parse().ok()?;
        let length = groups.get(2)?.as_str().parse().ok()?;

        if sequences < 2 || length == 0 {
            return None;
        }

        Some(Self { sequences, length })
    }

    /// Draws random sequence lengths between half the maximum and the maximum.
    fn random_lengths(&self, rng: &mut ThreadRng) -> Vec<usize> {
        (0..self.sequences)
            .map(|_| rng.gen_range(self.length / 2..=self.length).max(1))
            .collect()
    }
}

#[cfg(test)]
mod shape_tests {
    use super::Shape;

    #[test]
    fn valid() {
        let shape = Shape::try_new("4x200").unwrap();

        assert_eq!(shape.sequences, 4);
        assert_eq!(shape.length, 200);

        let lengths = shape.random_lengths(&mut rand::thread_rng());
        assert_eq!(lengths.len(), 4);
        assert!(lengths.iter().all(|length| (100..=200).contains(length)));
    }

    #[test]
    fn invalid() {
        assert!(Shape::try_new("1x200").is_none());
        assert!(Shape::try_new("4x0").is_none());
        assert!(Shape::try_new("4by200").is_none());
        assert!(Shape::try_new("x200").is_none());
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Sequences
////////////////////////////////////////////////////////////////////////////////////////

/// The sequences of a trial along with a sampler that favors longer ones.
struct Sequences {
    /// The length of each sequence.
    lengths: Vec<usize>,

    /// The weighted distribution.
    weights: WalkerTable,

    /// The random number generator.
    rng: ThreadRng,
}

impl Sequences {
    /// Creates a new [`Sequences`].
    fn new(lengths: Vec<usize>) -> Result<Self> {
        let weights = lengths
            .iter()
            .map(|length| u32::try_from(*length).context("sequence length to fit into u32"))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            lengths,
            weights: WalkerTableBuilder::new(&weights).build(),
            rng: Default::default(),
        })
    }

    /// Proposes a random fact between two distinct sequences, each picked with
    /// a probability proportional to its length.
    ///
    /// The second position lands within `jitter` of where the first would be
    /// if the two sequences were aligned end to end.
    fn random_fact(&mut self, jitter: usize) -> Fact {
        let x = self.weights.next();
        let y = loop {
            let y = self.weights.next();

            if y != x {
                break y;
            }
        };

        let (length_x, length_y) = (self.lengths[x], self.lengths[y]);

        let i = self.rng.gen_range(0..length_x);
        let center = i * length_y / length_x;
        let j = self
            .rng
            .gen_range(center.saturating_sub(jitter)..=(center + jitter).min(length_y - 1));

        Fact::new(x, i, y, j)
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Trials
////////////////////////////////////////////////////////////////////////////////////////

/// The settings shared by every trial.
#[derive(Clone, Copy, Debug)]
struct Settings {
    /// The shape of each trial.
    shape: Shape,

    /// The number of facts proposed per trial.
    n: usize,

    /// How many proposals pass between rebuild checks.
    check_every: usize,

    /// How far from the diagonal a proposal may stray.
    jitter: usize,
}

/// The outcome of a single trial.
#[derive(Debug)]
struct Outcome {
    /// The trial number.
    trial: usize,

    /// The sequence lengths.
    lengths: Vec<usize>,

    /// The facts that were accepted, in order.
    accepted: Vec<Fact>,

    /// The number of live alignment sets at the end.
    sets: usize,

    /// The number of failed checks.
    mismatches: usize,
}

/// Compares an engine against a copy of itself rebuilt from scratch.
fn matches_rebuild(engine: &Engine) -> Result<bool> {
    let mut rebuilt = engine.clone();
    rebuilt.rebuild().context("rebuilding the engine")?;
    Ok(&rebuilt == engine)
}

/// Runs a single trial.
fn run(trial: usize, settings: Settings) -> Result<Outcome> {
    let mut rng = rand::thread_rng();
    let lengths = settings.shape.random_lengths(&mut rng);

    let mut engine = Builder::default()
        .lengths(lengths.iter().copied())?
        .try_build()
        .context("building the engine")?;
    let mut sequences = Sequences::new(lengths.clone())?;

    let mut accepted = Vec::new();
    let mut mismatches = 0usize;

    for k in 1..=settings.n {
        let fact = sequences.random_fact(settings.jitter);

        if engine
            .try_add_fact(&fact)
            .with_context(|| format!("adding {fact}"))?
        {
            let ((x, i), (y, j)) = fact.pair();

            if !engine.already_aligned(x, i, y, j)? {
                error!(trial, "{fact} was accepted but is not aligned afterwards");
                mismatches += 1;
            }

            accepted.push(fact);
        }

        if k % settings.check_every == 0 {
            if !matches_rebuild(&engine)? {
                error!(trial, k, "the rebuilt engine differs from the incremental one");
                mismatches += 1;
            }

            debug!(
                trial,
                k,
                accepted = accepted.len(),
                sets = engine.set_count(),
                "checked against a rebuild"
            );
        }
    }

    if !matches_rebuild(&engine)? {
        error!(trial, "the final rebuilt engine differs from the incremental one");
        mismatches += 1;
    }

    Ok(Outcome {
        trial,
        lengths,
        accepted,
        sets: engine.set_count(),
        mismatches,
    })
}

/// Writes the accepted facts of a trial as a gzipped problem file.
fn write_trace(path: &Path, outcome: &Outcome) -> Result<()> {
    let lengths = NonEmpty::from_vec(outcome.lengths.clone()).context("trial has no sequences")?;
    let problem = Problem::new(Lengths::new(lengths), Vec::new(), outcome.accepted.clone());

    let mut encoder = File::create(path)
        .map(|file| GzEncoder::new(file, Compression::default()))
        .context("creating trace file")?;

    write!(encoder, "{problem}").context("writing trace file")?;
    encoder.finish().context("finishing trace file")?;

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////
// Main
////////////////////////////////////////////////////////////////////////////////////////

/// Stress tests the closure engine with random facts.
#[derive(Parser)]
struct Args {
    /// The number of sequences and their maximum length (e.g., `4x200`).
    #[arg(long, default_value = "4x200")]
    shape: String,

    /// The number of facts to propose per trial.
    #[arg(short, default_value_t = 10_000)]
    n: usize,

    /// The number of independent trials.
    #[arg(short, long, default_value_t = 8)]
    trials: usize,

    /// How many proposals pass between checks against a full rebuild.
    #[arg(short, long, default_value_t = 1_000)]
    check_every: usize,

    /// How far from the diagonal a proposed fact may stray.
    #[arg(short, long, default_value_t = 4)]
    jitter: usize,

    /// If desired, a path to write the accepted facts of the first trial to
    /// (as a gzipped problem file).
    #[arg(long)]
    trace: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity,
}

fn stress(args: &Args) -> Result<()> {
    let shape = match Shape::try_new(&args.shape) {
        Some(shape) => shape,
        None => bail!("invalid shape: {}", args.shape),
    };

    let settings = Settings {
        shape,
        n: args.n,
        check_every: args.check_every,
        jitter: args.jitter,
    };

    info!(
        "running {} trial(s) of {} facts over {} sequences",
        args.trials, args.n, shape.sequences
    );

    let start = Instant::now();
    let outcomes = (0..args.trials)
        .into_par_iter()
        .map(|trial| run(trial, settings).with_context(|| format!("running trial {trial}")))
        .collect::<Result<Vec<_>>>()?;

    let mut mismatches = 0usize;

    for outcome in &outcomes {
        info!(
            "trial {}: lengths {:?}, {} of {} facts accepted, {} sets",
            outcome.trial,
            outcome.lengths,
            outcome.accepted.len(),
            args.n,
            outcome.sets
        );

        if outcome.mismatches > 0 {
            warn!(
                "trial {}: {} check(s) failed",
                outcome.trial, outcome.mismatches
            );
        }

        mismatches += outcome.mismatches;
    }

    info!("finished in {:.2?}", start.elapsed());

    if let (Some(path), Some(outcome)) = (&args.trace, outcomes.first()) {
        write_trace(path, outcome)
            .with_context(|| format!("writing trace to {}", path.display()))?;
        info!("wrote trace of trial {} to {}", outcome.trial, path.display());
    }

    if mismatches > 0 {
        error!("{mismatches} check(s) failed");
        std::process::exit(1);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    assert!(args.n > 0, "`n` must be greater than 0!");
    assert!(args.check_every > 0, "`check-every` must be greater than 0!");

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    };

    stress(&args)
}
