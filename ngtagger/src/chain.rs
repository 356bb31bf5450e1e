use crate::errors::{Result, TaggerError};
use crate::frequency::likely_tags;
use crate::sentence::TaggedToken;
use crate::tagger::{AnyTagger, DefaultTagger, NgramTagger, Tagger};

/// Builder of backoff chains.
///
/// The chain starts from a [`DefaultTagger`] and adds one [`NgramTagger`] per order, each
/// backing off to the previously added tagger.
///
/// # Examples
///
/// ```
/// use ngtagger::{ChainBuilder, TaggedToken, Tagger};
///
/// let corpus = vec![
///     vec![TaggedToken::new("the", "DT"), TaggedToken::new("dog", "NN")],
///     vec![TaggedToken::new("a", "DT"), TaggedToken::new("run", "NN")],
///     vec![TaggedToken::new("dogs", "NNS"), TaggedToken::new("run", "VB")],
/// ];
/// let tagger = ChainBuilder::new("NN").build(&[1, 2, 3], &corpus).unwrap();
///
/// assert_eq!(3, tagger.order());
/// let tagged = tagger.tag(&["dogs", "run"]).unwrap();
/// assert_eq!(Some("VB"), tagged[1].1.as_deref());
/// ```
pub struct ChainBuilder {
    default_tag: String,
    cutoff: u64,
    lookup_size: Option<usize>,
}

impl ChainBuilder {
    /// Creates a builder whose chain ends in a default tagger assigning `default_tag`.
    pub fn new<S>(default_tag: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            default_tag: default_tag.into(),
            cutoff: 0,
            lookup_size: None,
        }
    }

    /// Sets the cutoff of every n-gram level.
    pub fn cutoff(mut self, cutoff: u64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Builds the unigram level from the likely tags of the `n` most frequent words only.
    pub fn lookup_size(mut self, n: usize) -> Self {
        self.lookup_size = Some(n);
        self
    }

    /// Trains one tagger per order on the full training data and chains them.
    ///
    /// # Arguments
    ///
    /// * `orders` - Strictly increasing context orders, each at least 1.
    /// * `sentences` - Training data.
    ///
    /// # Returns
    ///
    /// The head of the chain, i.e., the tagger with the highest order. If `orders` is empty,
    /// the default tagger itself.
    ///
    /// # Errors
    ///
    /// If `orders` contains 0, or is not strictly increasing, an error variant will be returned
    /// before any training.
    pub fn build<S>(&self, orders: &[usize], sentences: &[S]) -> Result<AnyTagger>
    where
        S: AsRef<[TaggedToken]>,
    {
        if orders.first() == Some(&0) {
            return Err(TaggerError::invalid_chain_order(
                "n-gram order must be at least 1",
            ));
        }
        if let Some(w) = orders.windows(2).find(|w| w[0] >= w[1]) {
            return Err(TaggerError::invalid_chain_order(format!(
                "orders must be strictly increasing: {} is followed by {}",
                w[0], w[1]
            )));
        }

        let mut head = AnyTagger::from(DefaultTagger::new(self.default_tag.clone()));
        for &order in orders {
            let tagger = match (order, self.lookup_size) {
                (1, Some(n)) => {
                    NgramTagger::from_lookup(likely_tags(sentences, n), Some(head))?
                }
                _ => {
                    let mut tagger = NgramTagger::new(order)?
                        .with_cutoff(self.cutoff)?
                        .with_backoff(head)?;
                    tagger.train(sentences)?;
                    tagger
                }
            };
            head = tagger.into();
        }
        log::info!(
            "built a backoff chain of orders {:?}",
            head.chain().map(|t| t.order()).collect::<Vec<_>>()
        );
        Ok(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Vec<TaggedToken>> {
        vec![
            vec![TaggedToken::new("the", "DT"), TaggedToken::new("dog", "NN")],
            vec![TaggedToken::new("the", "DT"), TaggedToken::new("cat", "NN")],
        ]
    }

    #[test]
    fn test_build_default_unigram() {
        let tagger = ChainBuilder::new("NN").build(&[1], &corpus()).unwrap();

        assert_eq!(
            vec![
                ("a".to_string(), Some("NN".to_string())),
                ("dog".to_string(), Some("NN".to_string())),
            ],
            tagger.tag(&["a", "dog"]).unwrap()
        );
    }

    #[test]
    fn test_build_empty_orders() {
        let tagger = ChainBuilder::new("NN").build(&[], &corpus()).unwrap();

        assert!(matches!(tagger, AnyTagger::Default(_)));
    }

    #[test]
    fn test_build_chain_topology() {
        let tagger = ChainBuilder::new("NN").build(&[1, 2, 3], &corpus()).unwrap();

        assert_eq!(
            vec![3, 2, 1, 0],
            tagger.chain().map(|t| t.order()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_build_skipping_orders() {
        let tagger = ChainBuilder::new("NN").build(&[1, 3], &corpus()).unwrap();

        assert_eq!(
            vec![3, 1, 0],
            tagger.chain().map(|t| t.order()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_build_invalid_orders() {
        let builder = ChainBuilder::new("NN");

        for orders in [&[2, 1][..], &[1, 1], &[0, 1], &[1, 3, 2]] {
            assert!(matches!(
                builder.build(orders, &corpus()),
                Err(TaggerError::InvalidChainOrder(_))
            ));
        }
    }

    #[test]
    fn test_build_never_untagged() {
        let tagger = ChainBuilder::new("NN").build(&[1, 2, 3], &corpus()).unwrap();
        let tagged = tagger
            .tag(&["colorless", "green", "the", "ideas", "sleep"])
            .unwrap();

        assert!(tagged.iter().all(|(_, tag)| tag.is_some()));
    }

    #[test]
    fn test_build_lookup() {
        let sents = vec![
            vec![TaggedToken::new("the", "AT"), TaggedToken::new("jury", "NN")],
            vec![TaggedToken::new("the", "AT"), TaggedToken::new("said", "VBD")],
        ];
        let tagger = ChainBuilder::new("NN")
            .lookup_size(1)
            .build(&[1], &sents)
            .unwrap();

        assert_eq!(
            vec![
                ("the".to_string(), Some("AT".to_string())),
                ("said".to_string(), Some("NN".to_string())),
            ],
            tagger.tag(&["the", "said"]).unwrap()
        );
    }

    #[test]
    fn test_build_cutoff() {
        let tagger = ChainBuilder::new("XX")
            .cutoff(1)
            .build(&[1], &corpus())
            .unwrap();

        assert_eq!(
            vec![
                ("the".to_string(), Some("DT".to_string())),
                ("dog".to_string(), Some("XX".to_string())),
            ],
            tagger.tag(&["the", "dog"]).unwrap()
        );
    }
}
