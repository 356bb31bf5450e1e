use std::fs;
use std::path::PathBuf;

use clap::Parser;
use ngtagger::{AnyTagger, Model, Tagger};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "A program to manipulate trained models.")]
struct Args {
    /// Input path of the model file
    #[arg(long)]
    model_in: PathBuf,

    /// Output path of the model file
    #[arg(long)]
    model_out: Option<PathBuf>,

    /// Output the frequency tables contained in the model as CSV.
    #[arg(long)]
    dump_tables: Option<PathBuf>,
}

#[derive(Serialize)]
struct TableRecord {
    order: usize,
    history: String,
    token: String,
    tag: String,
    count: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    log::info!("Loading model file...");
    let mut f = zstd::Decoder::new(fs::File::open(args.model_in)?)?;
    let model = Model::read(&mut f)?;

    for tagger in model.tagger().chain() {
        match tagger {
            AnyTagger::Default(t) => log::info!("order 0: default tag {:?}", t.default_tag()),
            AnyTagger::Ngram(t) => log::info!(
                "order {}: {} contexts, cutoff {}",
                t.order(),
                t.table().len(),
                t.table().cutoff()
            ),
            AnyTagger::Regex(t) => log::info!("order 0: {} regex rules", t.rules().len()),
        }
    }

    if let Some(path) = args.dump_tables {
        log::info!("Saving frequency tables...");
        let file = fs::File::create(path)?;
        let mut wtr = csv::Writer::from_writer(file);
        for tagger in model.tagger().chain() {
            let AnyTagger::Ngram(tagger) = tagger else {
                continue;
            };
            for (context, counts) in tagger.table().entries() {
                let history = context
                    .history()
                    .iter()
                    .map(|t| t.as_deref().unwrap_or("-"))
                    .collect::<Vec<_>>()
                    .join(" ");
                for (tag, count) in counts {
                    wtr.serialize(TableRecord {
                        order: tagger.order(),
                        history: history.clone(),
                        token: context.token().to_string(),
                        tag: tag.clone(),
                        count: *count,
                    })?;
                }
            }
        }
        wtr.flush()?;
    }

    if let Some(path) = args.model_out {
        log::info!("Saving model file...");
        let mut f = zstd::Encoder::new(fs::File::create(path)?, 19)?;
        model.write(&mut f)?;
        f.finish()?;
    }

    Ok(())
}
