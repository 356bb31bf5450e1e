use serde::{Deserialize, Serialize};

use crate::errors::{Result, TaggerError};
use crate::frequency::{Context, FrequencyTable};
use crate::regex_tagger::RegexTagger;
use crate::sentence::TaggedToken;

/// Common interface of all taggers.
///
/// A tagger decides tags from left to right. When [`Tagger::choose_tag`] returns `None`, the
/// position is delegated to the backoff tagger, which computes its own context from the same
/// history.
pub trait Tagger {
    /// Context order. The default and regex taggers use order 0.
    fn order(&self) -> usize;

    /// Decides a tag of `tokens[index]` using only this tagger.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Surfaces of the whole sentence.
    /// * `index` - Position to tag.
    /// * `history` - Tags already assigned to `tokens[..index]`.
    ///
    /// Returns `None` if `index` is out of range.
    fn choose_tag<'a>(
        &'a self,
        tokens: &[&str],
        index: usize,
        history: &[Option<&'a str>],
    ) -> Option<&'a str>;

    /// Backoff tagger used when [`Tagger::choose_tag`] fails.
    fn backoff(&self) -> Option<&dyn Tagger>;

    /// Returns `false` if this tagger still requires training.
    fn is_trained(&self) -> bool {
        true
    }

    /// Decides a tag of `tokens[index]`, consulting the backoff chain.
    fn tag_one<'a>(
        &'a self,
        tokens: &[&str],
        index: usize,
        history: &[Option<&'a str>],
    ) -> Option<&'a str> {
        self.choose_tag(tokens, index, history).or_else(|| {
            self.backoff()
                .and_then(|backoff| backoff.tag_one(tokens, index, history))
        })
    }

    /// Checks that every tagger in the chain is trained.
    ///
    /// # Errors
    ///
    /// If any tagger in the chain is untrained, an error variant will be returned.
    fn check_trained(&self) -> Result<()> {
        if !self.is_trained() {
            return Err(TaggerError::untrained_tagger(self.order()));
        }
        self.backoff().map_or(Ok(()), |backoff| backoff.check_trained())
    }

    /// Tags a sentence.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Surfaces of the sentence.
    ///
    /// # Returns
    ///
    /// Pairs of each surface and its tag. `None` is assigned when no tagger in the chain can
    /// decide the tag.
    ///
    /// # Errors
    ///
    /// If any tagger in the chain is untrained, an error variant will be returned.
    fn tag(&self, tokens: &[&str]) -> Result<Vec<(String, Option<String>)>> {
        self.check_trained()?;
        let mut history = Vec::with_capacity(tokens.len());
        for i in 0..tokens.len() {
            let tag = self.tag_one(tokens, i, &history);
            history.push(tag);
        }
        Ok(tokens
            .iter()
            .zip(history)
            .map(|(token, tag)| (token.to_string(), tag.map(str::to_string)))
            .collect())
    }
}

/// Tagger that assigns the same tag to every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultTagger {
    tag: String,
}

impl DefaultTagger {
    pub fn new<S>(tag: S) -> Self
    where
        S: Into<String>,
    {
        Self { tag: tag.into() }
    }

    pub fn default_tag(&self) -> &str {
        &self.tag
    }
}

impl Tagger for DefaultTagger {
    fn order(&self) -> usize {
        0
    }

    fn choose_tag<'a>(
        &'a self,
        tokens: &[&str],
        index: usize,
        _history: &[Option<&'a str>],
    ) -> Option<&'a str> {
        tokens.get(index).map(|_| self.tag.as_str())
    }

    fn backoff(&self) -> Option<&dyn Tagger> {
        None
    }
}

/// Tagger that predicts the most frequent tag of the current token and the preceding tags.
///
/// Order 1 is a unigram tagger, 2 a bigram tagger, and 3 a trigram tagger.
///
/// # Examples
///
/// ```
/// use ngtagger::{DefaultTagger, NgramTagger, TaggedToken, Tagger};
///
/// let corpus = vec![
///     vec![TaggedToken::new("the", "DT"), TaggedToken::new("dog", "NN")],
///     vec![TaggedToken::new("the", "DT"), TaggedToken::new("cat", "NN")],
/// ];
/// let mut tagger = NgramTagger::new(1)
///     .unwrap()
///     .with_backoff(DefaultTagger::new("NN"))
///     .unwrap();
/// tagger.train(&corpus).unwrap();
///
/// let tagged = tagger.tag(&["a", "dog"]).unwrap();
/// assert_eq!(Some("NN"), tagged[0].1.as_deref());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NgramTagger {
    table: FrequencyTable,
    backoff: Option<Box<AnyTagger>>,
}

impl NgramTagger {
    /// Creates an untrained tagger.
    ///
    /// # Errors
    ///
    /// If `order` is 0, an error variant will be returned.
    pub fn new(order: usize) -> Result<Self> {
        if order == 0 {
            return Err(TaggerError::invalid_chain_order(
                "n-gram order must be at least 1",
            ));
        }
        Ok(Self {
            table: FrequencyTable::new(order),
            backoff: None,
        })
    }

    /// Creates a trained unigram tagger from a `(token, tag)` lookup.
    ///
    /// The tagger is frozen on creation, so its backoff tagger is given here.
    ///
    /// # Errors
    ///
    /// If `backoff` is not an order-0 chain, an error variant will be returned.
    pub fn from_lookup<I, S, T>(pairs: I, backoff: Option<AnyTagger>) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        if let Some(backoff) = &backoff {
            check_backoff_order(1, backoff.order())?;
            backoff.check_chain()?;
        }
        Ok(Self {
            table: FrequencyTable::from_lookup(pairs),
            backoff: backoff.map(Box::new),
        })
    }

    /// Sets the backoff tagger.
    ///
    /// # Errors
    ///
    /// If this tagger is already trained, or the order of `backoff` is not lower than this
    /// tagger's, an error variant will be returned.
    pub fn with_backoff<T>(mut self, backoff: T) -> Result<Self>
    where
        T: Into<AnyTagger>,
    {
        if self.table.is_frozen() {
            return Err(TaggerError::already_trained(self.order()));
        }
        let backoff = backoff.into();
        check_backoff_order(self.order(), backoff.order())?;
        backoff.check_chain()?;
        self.backoff = Some(Box::new(backoff));
        Ok(self)
    }

    /// Ignores contexts whose most frequent tag is seen `cutoff` times or fewer.
    ///
    /// # Errors
    ///
    /// If this tagger is already trained, an error variant will be returned.
    pub fn with_cutoff(mut self, cutoff: u64) -> Result<Self> {
        self.table.set_cutoff(cutoff)?;
        Ok(self)
    }

    /// Trains the tagger on tagged sentences. The tagger is frozen afterwards.
    ///
    /// # Errors
    ///
    /// If the tagger is already trained, an error variant will be returned.
    pub fn train<S>(&mut self, sentences: &[S]) -> Result<()>
    where
        S: AsRef<[TaggedToken]>,
    {
        self.table.train(sentences)?;
        log::debug!(
            "order-{} tagger: {} contexts",
            self.table.order(),
            self.table.len()
        );
        Ok(())
    }

    pub const fn table(&self) -> &FrequencyTable {
        &self.table
    }
}

impl Tagger for NgramTagger {
    fn order(&self) -> usize {
        self.table.order()
    }

    fn choose_tag<'a>(
        &'a self,
        tokens: &[&str],
        index: usize,
        history: &[Option<&'a str>],
    ) -> Option<&'a str> {
        let context = Context::from_history(self.order(), tokens.get(index)?, history);
        self.table.lookup(&context)
    }

    fn backoff(&self) -> Option<&dyn Tagger> {
        self.backoff.as_deref().map(|t| t as &dyn Tagger)
    }

    fn is_trained(&self) -> bool {
        self.table.is_frozen()
    }
}

/// Any tagger that can be placed in a backoff chain and stored in a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnyTagger {
    Default(DefaultTagger),
    Ngram(NgramTagger),
    Regex(RegexTagger),
}

impl AnyTagger {
    fn as_dyn(&self) -> &dyn Tagger {
        match self {
            Self::Default(t) => t,
            Self::Ngram(t) => t,
            Self::Regex(t) => t,
        }
    }

    /// Checks the orders along the backoff chain.
    ///
    /// Orders never increase from the head to the tail, and n-gram orders strictly decrease.
    /// Order-0 taggers may back off only to other order-0 taggers.
    ///
    /// # Errors
    ///
    /// If a backoff tagger violates the ordering, an error variant will be returned.
    pub fn check_chain(&self) -> Result<()> {
        for (upper, lower) in self.chain().zip(self.chain().skip(1)) {
            check_backoff_order(upper.order(), lower.order())?;
        }
        Ok(())
    }

    /// Iterates over this tagger and its backoff chain, head first.
    pub fn chain(&self) -> impl Iterator<Item = &AnyTagger> {
        core::iter::successors(Some(self), |&t| match t {
            Self::Default(_) => None,
            Self::Ngram(t) => t.backoff.as_deref(),
            Self::Regex(t) => t.backoff_tagger(),
        })
    }
}

impl Tagger for AnyTagger {
    fn order(&self) -> usize {
        self.as_dyn().order()
    }

    fn choose_tag<'a>(
        &'a self,
        tokens: &[&str],
        index: usize,
        history: &[Option<&'a str>],
    ) -> Option<&'a str> {
        self.as_dyn().choose_tag(tokens, index, history)
    }

    fn backoff(&self) -> Option<&dyn Tagger> {
        self.as_dyn().backoff()
    }

    fn is_trained(&self) -> bool {
        self.as_dyn().is_trained()
    }
}

pub(crate) fn check_backoff_order(order: usize, backoff: usize) -> Result<()> {
    if backoff < order || (order == 0 && backoff == 0) {
        Ok(())
    } else {
        Err(TaggerError::invalid_chain_order(format!(
            "backoff order {backoff} is not lower than {order}"
        )))
    }
}

impl From<DefaultTagger> for AnyTagger {
    fn from(tagger: DefaultTagger) -> Self {
        Self::Default(tagger)
    }
}

impl From<NgramTagger> for AnyTagger {
    fn from(tagger: NgramTagger) -> Self {
        Self::Ngram(tagger)
    }
}

impl From<RegexTagger> for AnyTagger {
    fn from(tagger: RegexTagger) -> Self {
        Self::Regex(tagger)
    }
}
