use std::fs::File;
use std::io::{prelude::*, BufReader};
use std::path::PathBuf;

use clap::Parser;
use ngtagger::{evaluate, parse_tagged_line, split_corpus, ChainBuilder, Model};

#[derive(Parser, Debug)]
#[command(about = "A program to train backoff tagger models.")]
struct Args {
    /// A tagged training corpus. Each line is a sentence of `word/TAG` pairs
    #[arg(long, required = true)]
    corpus: Vec<PathBuf>,

    /// The file to write the trained model to
    #[arg(long)]
    model: PathBuf,

    /// Context orders of the chain, in increasing order (1: unigram, 2: bigram, 3: trigram)
    #[arg(long = "order", default_values_t = [1, 2, 3])]
    orders: Vec<usize>,

    /// The tag assigned when no n-gram context is known
    #[arg(long, default_value = "NN")]
    default_tag: String,

    /// Contexts whose most frequent tag is seen this many times or fewer are ignored
    #[arg(long, default_value = "0")]
    cutoff: u64,

    /// Build the unigram level only from the likely tags of this many most frequent words
    #[arg(long)]
    lookup: Option<usize>,

    /// Train on this ratio of the corpus and report the accuracy on the rest
    #[arg(long)]
    split: Option<f64>,

    /// The number of workers for zstd (0 means multithreaded will be disabled)
    #[arg(long, default_value = "0")]
    zstd_workers: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    log::info!("Loading dataset...");
    let mut sents = vec![];
    for path in args.corpus {
        log::info!("Loading {path:?} ...");
        let f = BufReader::new(File::open(path)?);
        for line in f.lines() {
            let s = parse_tagged_line(&line?)?;
            if !s.is_empty() {
                sents.push(s);
            }
        }
        log::info!("# of sentences: {}", sents.len());
    }

    let (train_sents, test_sents) = match args.split {
        Some(ratio) => split_corpus(&sents, ratio)?,
        None => (&sents[..], &[][..]),
    };

    log::info!("Start training on {} sentences...", train_sents.len());
    let mut builder = ChainBuilder::new(args.default_tag).cutoff(args.cutoff);
    if let Some(n) = args.lookup {
        builder = builder.lookup_size(n);
    }
    let tagger = builder.build(&args.orders, train_sents)?;
    log::info!("Finish training.");

    if !test_sents.is_empty() {
        let report = evaluate(&tagger, test_sents)?;
        log::info!(
            "Accuracy on {} held-out sentences: {} ({}/{})",
            test_sents.len(),
            report.accuracy,
            report.correct,
            report.total
        );
    }

    let mut f = zstd::Encoder::new(File::create(args.model)?, 19)?;
    f.multithread(args.zstd_workers)?;
    Model::new(tagger).write(&mut f)?;
    f.finish()?;

    Ok(())
}
