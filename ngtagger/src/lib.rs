#![cfg_attr(docsrs, feature(doc_cfg))]

//! # ngtagger
//!
//! ngtagger is a part-of-speech tagger built from a chain of n-gram taggers. Each tagger in
//! the chain backs off to a tagger with a shorter context when it has not seen the current
//! context, and the chain ends in a default tagger that always assigns a tag.
//!
//! ## Examples
//!
//! ```
//! use ngtagger::{evaluate, split_corpus, ChainBuilder, Model, TaggedToken, Tagger};
//!
//! let corpus = vec![
//!     vec![TaggedToken::new("the", "AT"), TaggedToken::new("tutor", "NN")],
//!     vec![TaggedToken::new("to", "TO"), TaggedToken::new("tutor", "VB")],
//!     vec![TaggedToken::new("the", "AT"), TaggedToken::new("jury", "NN")],
//!     vec![TaggedToken::new("to", "TO"), TaggedToken::new("say", "VB")],
//! ];
//! let (train, test) = split_corpus(&corpus, 0.5).unwrap();
//!
//! let tagger = ChainBuilder::new("NN").build(&[1, 2], train).unwrap();
//! let report = evaluate(&tagger, test).unwrap();
//! assert_eq!(3, report.correct);
//!
//! let mut buf = vec![];
//! Model::new(tagger).write(&mut buf).unwrap();
//! let model = Model::read(&mut buf.as_slice()).unwrap();
//! let tagged = model.tagger().tag(&["to", "tutor"]).unwrap();
//! assert_eq!(Some("VB"), tagged[1].1.as_deref());
//! ```

pub mod errors;

mod chain;
mod evaluator;
mod frequency;
mod model;
mod regex_tagger;
mod sentence;
mod tagger;

pub use chain::ChainBuilder;
pub use evaluator::{confusion, evaluate, top_n_by_count, AccuracyReport, ConfusionMatrix};
pub use frequency::{likely_tags, Context, FrequencyTable, TagCounts};
pub use model::Model;
pub use regex_tagger::{RegexRule, RegexTagger};
pub use sentence::{parse_tagged_line, split_corpus, to_tagged_string, untagged, TaggedToken};
pub use tagger::{AnyTagger, DefaultTagger, NgramTagger, Tagger};
