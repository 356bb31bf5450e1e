use std::fs::File;
use std::io::{prelude::*, stdin, stdout, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{ArgGroup, Parser};
use ngtagger::{to_tagged_string, AnyTagger, Model, RegexTagger, Tagger};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(
    about = "A program to tag whitespace-separated sentences.",
    group = ArgGroup::new("tagger").required(true),
)]
struct Args {
    /// The model file to use when tagging text
    #[arg(long, group = "tagger")]
    model: Option<PathBuf>,

    /// A tab-separated file of `pattern<TAB>tag` rules to use instead of a model
    #[arg(long, group = "tagger")]
    rules: Option<PathBuf>,
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

    let tagger: AnyTagger = if let Some(path) = args.model {
        log::info!("Loading model file...");
        let mut f = zstd::Decoder::new(File::open(path)?)?;
        Model::read(&mut f)?.into_tagger()
    } else if let Some(path) = args.rules {
        log::info!("Loading rule file...");
        load_rules(&path)?.into()
    } else {
        unreachable!("clap requires either --model or --rules")
    };

    log::info!("Start tagging");
    let mut n_tokens = 0;
    let start = Instant::now();
    let mut out = BufWriter::new(stdout().lock());
    for line in stdin().lock().lines() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let tagged = tagger.tag(&tokens)?;
        n_tokens += tagged.len();
        writeln!(out, "{}", to_tagged_string(&tagged))?;
    }
    out.flush()?;
    let duration = start.elapsed();
    log::info!("Elapsed: {} [sec]", duration.as_secs_f64());
    log::info!(
        "Speed: {} [tokens/sec]",
        n_tokens as f64 / duration.as_secs_f64()
    );

    Ok(())
}
