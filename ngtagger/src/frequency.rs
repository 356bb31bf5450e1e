use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TaggerError};
use crate::sentence::TaggedToken;

/// Context of a token: the current surface and the tags assigned before it.
///
/// `history` holds `order - 1` tags, oldest first. Positions before the start of the sentence
/// are `None`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
pub struct Context {
    pub(crate) token: String,
    pub(crate) history: Vec<Option<String>>,
}

impl Context {
    /// Builds the context of `token` for the given order.
    ///
    /// # Arguments
    ///
    /// * `order` - Context order. Must be at least 1.
    /// * `token` - The current surface.
    /// * `history` - Tags of all preceding positions in the sentence.
    pub fn from_history(order: usize, token: &str, history: &[Option<&str>]) -> Self {
        let n_prev = order.saturating_sub(1);
        let history = (1..=n_prev)
            .rev()
            .map(|offset| {
                history
                    .len()
                    .checked_sub(offset)
                    .and_then(|i| history[i])
                    .map(str::to_string)
            })
            .collect();
        Self {
            token: token.to_string(),
            history,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn history(&self) -> &[Option<String>] {
        &self.history
    }
}

/// Tag counts of a context, in the order the tags were first seen.
pub type TagCounts = Vec<(String, u64)>;

/// Frequency table that maps contexts to tag counts for a single context order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyTable {
    order: usize,
    cutoff: u64,
    frozen: bool,
    counts: HashMap<Context, TagCounts>,
}

impl FrequencyTable {
    /// Creates an empty table for the given context order.
    pub fn new(order: usize) -> Self {
        Self {
            order,
            cutoff: 0,
            frozen: false,
            counts: HashMap::new(),
        }
    }

    /// Creates a frozen unigram table from `(token, tag)` pairs.
    ///
    /// If a token appears more than once, the first pair wins.
    pub fn from_lookup<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut counts = HashMap::new();
        for (token, tag) in pairs {
            let context = Context {
                token: token.into(),
                history: vec![],
            };
            counts.entry(context).or_insert_with(|| vec![(tag.into(), 1)]);
        }
        Self {
            order: 1,
            cutoff: 0,
            frozen: true,
            counts,
        }
    }

    /// Sets the cutoff. Contexts whose best tag is seen `cutoff` times or fewer are ignored by
    /// [`FrequencyTable::lookup`].
    ///
    /// # Errors
    ///
    /// If the table is already frozen, an error variant will be returned.
    pub fn set_cutoff(&mut self, cutoff: u64) -> Result<()> {
        if self.frozen {
            return Err(TaggerError::already_trained(self.order));
        }
        self.cutoff = cutoff;
        Ok(())
    }

    /// Counts every position of the given sentences and freezes the table.
    ///
    /// # Errors
    ///
    /// If the table is already frozen, an error variant will be returned.
    pub fn train<S>(&mut self, sentences: &[S]) -> Result<()>
    where
        S: AsRef<[TaggedToken]>,
    {
        if self.frozen {
            return Err(TaggerError::already_trained(self.order));
        }
        for sentence in sentences {
            let sentence = sentence.as_ref();
            let tags: Vec<Option<&str>> = sentence.iter().map(|t| Some(t.tag.as_str())).collect();
            for (i, TaggedToken { token, tag }) in sentence.iter().enumerate() {
                let context = Context::from_history(self.order, token, &tags[..i]);
                let tag_counts = self.counts.entry(context).or_default();
                if let Some((_, count)) = tag_counts.iter_mut().find(|(t, _)| t == tag) {
                    *count += 1;
                } else {
                    tag_counts.push((tag.clone(), 1));
                }
            }
        }
        self.frozen = true;
        Ok(())
    }

    /// Returns the most frequent tag of the context.
    ///
    /// Ties are broken by the order in which the tags were first seen during training.
    pub fn lookup(&self, context: &Context) -> Option<&str> {
        let tag_counts = self.counts.get(context)?;
        let mut best: Option<&(String, u64)> = None;
        for entry in tag_counts {
            if best.map_or(true, |(_, count)| entry.1 > *count) {
                best = Some(entry);
            }
        }
        best.filter(|(_, count)| *count > self.cutoff)
            .map(|(tag, _)| tag.as_str())
    }

    pub const fn order(&self) -> usize {
        self.order
    }

    pub const fn cutoff(&self) -> u64 {
        self.cutoff
    }

    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Number of distinct contexts.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns all entries sorted by context.
    pub fn entries(&self) -> Vec<(&Context, &[(String, u64)])> {
        let mut entries: Vec<_> = self
            .counts
            .iter()
            .map(|(context, counts)| (context, counts.as_slice()))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Computes the most likely tag of each of the `n` most frequent words.
///
/// Words with equal frequency are ordered by first occurrence, and so are tags with equal
/// counts.
pub fn likely_tags<S>(sentences: &[S], n: usize) -> Vec<(String, String)>
where
    S: AsRef<[TaggedToken]>,
{
    let mut ids = HashMap::new();
    let mut words: Vec<(&str, u64, Vec<(&str, u64)>)> = vec![];
    for sentence in sentences {
        for TaggedToken { token, tag } in sentence.as_ref() {
            let id = *ids.entry(token.as_str()).or_insert_with(|| {
                words.push((token.as_str(), 0, vec![]));
                words.len() - 1
            });
            let (_, total, tags) = &mut words[id];
            *total += 1;
            if let Some((_, count)) = tags.iter_mut().find(|(t, _)| *t == tag.as_str()) {
                *count += 1;
            } else {
                tags.push((tag.as_str(), 1));
            }
        }
    }
    // stable sort keeps first occurrence order among equal totals
    words.sort_by(|a, b| b.1.cmp(&a.1));
    words
        .into_iter()
        .take(n)
        .filter_map(|(word, _, tags)| {
            let mut best: Option<(&str, u64)> = None;
            for (tag, count) in tags {
                if best.map_or(true, |(_, c)| count > c) {
                    best = Some((tag, count));
                }
            }
            best.map(|(tag, _)| (word.to_string(), tag.to_string()))
        })
        .collect()
}
