use std::fs::File;
use std::io::{prelude::*, stdin};
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser};
use ngtagger::{
    confusion, evaluate, parse_tagged_line, top_n_by_count, AnyTagger, Model, RegexTagger,
};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(
    about = "A program to evaluate the accuracy of taggers.",
    group = ArgGroup::new("tagger").required(true),
)]
struct Args {
    /// The model file to evaluate
    #[arg(long, group = "tagger")]
    model: Option<PathBuf>,

    /// A tab-separated file of `pattern<TAB>tag` rules to evaluate instead of a model
    #[arg(long, group = "tagger")]
    rules: Option<PathBuf>,

    /// Print the confusion matrix.
    #[arg(long)]
    confusion: bool,

    /// Order the matrix by gold tag frequency.
    #[arg(long)]
    sort_by_count: bool,

    /// Show only this many tags in the matrix.
    #[arg(long)]
    truncate: Option<usize>,

    /// Show matrix cells as percentages.
    #[arg(long)]
    show_percents: bool,

    /// Print this many most frequent (gold, predicted) pairs.
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Deserialize)]
struct RuleRecord {
    pattern: String,
    tag: String,
}

fn load_rules(path: &Path) -> Result<RegexTagger, Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .from_path(path)?;
    let mut rules = vec![];
    for result in rdr.deserialize() {
        let record: RuleRecord = result?;
        rules.push((record.pattern, record.tag));
    }
    Ok(RegexTagger::new(rules)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let tagger: AnyTagger = if let Some(path) = &args.model {
        log::info!("Loading model file...");
        let mut f = zstd::Decoder::new(File::open(path)?)?;
        Model::read(&mut f)?.into_tagger()
    } else if let Some(path) = &args.rules {
        log::info!("Loading rule file...");
        load_rules(path)?.into()
    } else {
        unreachable!("clap requires either --model or --rules")
    };

    log::info!("Loading gold sentences...");
    let mut gold = vec![];
    for line in stdin().lock().lines() {
        let s = parse_tagged_line(&line?)?;
        if !s.is_empty() {
            gold.push(s);
        }
    }
    log::info!("# of sentences: {}", gold.len());

    let matrix = if args.confusion || args.top.is_some() {
        Some(confusion(&tagger, &gold)?)
    } else {
        None
    };
    let report = match &matrix {
        Some(matrix) => matrix.report()?,
        None => evaluate(&tagger, &gold)?,
    };
    println!("Accuracy: {}", report.accuracy);
    println!("Correct: {}, Total: {}", report.correct, report.total);

    if let Some(matrix) = matrix {
        if args.confusion {
            print!(
                "{}",
                matrix.pretty_format(args.sort_by_count, args.truncate, args.show_percents)
            );
        }
        if let Some(n) = args.top {
            for (gold_tag, predicted, count) in top_n_by_count(&matrix, n) {
                println!(
                    "{}\t{}\t{}",
                    gold_tag,
                    predicted.as_deref().unwrap_or("-"),
                    count
                );
            }
        }
    }

    Ok(())
}
