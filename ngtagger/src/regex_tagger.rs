use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::tagger::{check_backoff_order, AnyTagger, Tagger};

#[derive(Serialize, Deserialize)]
struct RuleSource {
    pattern: String,
    tag: String,
}

/// A pattern and the tag assigned to tokens matching it.
///
/// Only the pattern source is stored in a model; the expression is compiled again on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RuleSource", into = "RuleSource")]
pub struct RegexRule {
    pattern: String,
    tag: String,
    regex: Regex,
}

impl RegexRule {
    /// Creates a rule. The pattern must match the whole token.
    ///
    /// # Errors
    ///
    /// If `pattern` is not a valid regular expression, an error variant will be returned.
    pub fn new<P, T>(pattern: P, tag: T) -> Result<Self>
    where
        P: Into<String>,
        T: Into<String>,
    {
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            pattern,
            tag: tag.into(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_match(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }
}

impl TryFrom<RuleSource> for RegexRule {
    type Error = regex::Error;

    fn try_from(source: RuleSource) -> Result<Self, Self::Error> {
        let regex = Regex::new(&format!("^(?:{})$", source.pattern))?;
        Ok(Self {
            pattern: source.pattern,
            tag: source.tag,
            regex,
        })
    }
}

impl From<RegexRule> for RuleSource {
    fn from(rule: RegexRule) -> Self {
        Self {
            pattern: rule.pattern,
            tag: rule.tag,
        }
    }
}

/// Rule based tagger using regular expressions.
///
/// Rules are tried from top to bottom and the first rule whose pattern matches the entire
/// token wins. Put a catch-all rule such as `.*` last to tag every token.
///
/// # Examples
///
/// ```
/// use ngtagger::{RegexTagger, Tagger};
///
/// let tagger = RegexTagger::new([(r".*ing$", "VBG"), (r".*", "NN")]).unwrap();
/// let tagged = tagger.tag(&["running", "cat"]).unwrap();
///
/// assert_eq!(Some("VBG"), tagged[0].1.as_deref());
/// assert_eq!(Some("NN"), tagged[1].1.as_deref());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegexTagger {
    rules: Vec<RegexRule>,
    backoff: Option<Box<AnyTagger>>,
}

impl RegexTagger {
    /// Creates a tagger from `(pattern, tag)` pairs.
    ///
    /// # Errors
    ///
    /// If any pattern is invalid, an error variant will be returned.
    pub fn new<I, P, T>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<String>,
        T: Into<String>,
    {
        let rules = rules
            .into_iter()
            .map(|(pattern, tag)| RegexRule::new(pattern, tag))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rules,
            backoff: None,
        })
    }

    /// Sets the tagger used for tokens that match no rule.
    ///
    /// # Errors
    ///
    /// If `backoff` is not an order-0 chain, an error variant will be returned.
    pub fn with_backoff<T>(mut self, backoff: T) -> Result<Self>
    where
        T: Into<AnyTagger>,
    {
        let backoff = backoff.into();
        check_backoff_order(0, backoff.order())?;
        backoff.check_chain()?;
        self.backoff = Some(Box::new(backoff));
        Ok(self)
    }

    pub fn rules(&self) -> &[RegexRule] {
        &self.rules
    }

    pub(crate) fn backoff_tagger(&self) -> Option<&AnyTagger> {
        self.backoff.as_deref()
    }
}

impl Tagger for RegexTagger {
    fn order(&self) -> usize {
        0
    }

    fn choose_tag<'a>(
        &'a self,
        tokens: &[&str],
        index: usize,
        _history: &[Option<&'a str>],
    ) -> Option<&'a str> {
        let token = tokens.get(index)?;
        self.rules
            .iter()
            .find(|rule| rule.is_match(token))
            .map(|rule| rule.tag.as_str())
    }

    fn backoff(&self) -> Option<&dyn Tagger> {
        self.backoff.as_deref().map(|t| t as &dyn Tagger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::errors::TaggerError;
    use crate::tagger::DefaultTagger;

    fn brown_rules() -> RegexTagger {
        RegexTagger::new([
            (r".*ing$", "VBG"),
            (r".*ed$", "VBD"),
            (r".*es$", "VBZ"),
            (r".*ould$", "MD"),
            (r".*'s$", "NN$"),
            (r".*s$", "NNS"),
            (r"^-?[0-9]+(.[0-9]+)?$", "CD"),
            (r".*", "NN"),
        ])
        .unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let tagger = RegexTagger::new([(r".*ing$", "VBG"), (r".*", "NN")]).unwrap();

        assert_eq!(
            vec![
                ("running".to_string(), Some("VBG".to_string())),
                ("cat".to_string(), Some("NN".to_string())),
            ],
            tagger.tag(&["running", "cat"]).unwrap()
        );
    }

    #[test]
    fn test_rule_order() {
        let tagger = brown_rules();
        let tags: Vec<_> = tagger
            .tag(&["goes", "cats", "would", "John's", "-3.5", "walked", "table"])
            .unwrap()
            .into_iter()
            .map(|(_, tag)| tag.unwrap())
            .collect();

        assert_eq!(vec!["VBZ", "NNS", "MD", "NN$", "CD", "VBD", "NN"], tags);
    }

    #[test]
    fn test_anchored_match() {
        let tagger = RegexTagger::new([("ing", "VBG"), ("[0-9]+", "CD")]).unwrap();
        let tagged = tagger.tag(&["singing", "ing", "a1", "42"]).unwrap();

        assert_eq!(None, tagged[0].1);
        assert_eq!(Some("VBG".to_string()), tagged[1].1);
        assert_eq!(None, tagged[2].1);
        assert_eq!(Some("CD".to_string()), tagged[3].1);
    }

    #[test]
    fn test_backoff() {
        let tagger = RegexTagger::new([(r".*ly", "RB")])
            .unwrap()
            .with_backoff(DefaultTagger::new("NN"))
            .unwrap();
        let tagged = tagger.tag(&["quickly", "fox"]).unwrap();

        assert_eq!(Some("RB".to_string()), tagged[0].1);
        assert_eq!(Some("NN".to_string()), tagged[1].1);
    }

    #[test]
    fn test_backoff_must_be_order_zero() {
        let unigram = crate::tagger::NgramTagger::new(1).unwrap();
        let result = RegexTagger::new([(r".*ly", "RB")])
            .unwrap()
            .with_backoff(unigram);

        assert!(matches!(result, Err(TaggerError::InvalidChainOrder(_))));
    }

    #[test]
    fn test_index_out_of_range() {
        let tagger = brown_rules();

        assert_eq!(None, tagger.choose_tag(&["cats"], 1, &[]));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = RegexTagger::new([("(", "NN")]);

        assert!(matches!(result, Err(TaggerError::Regex(_))));
    }

    #[test]
    fn test_rules() {
        let tagger = brown_rules();

        assert_eq!(8, tagger.rules().len());
        assert_eq!(".*", tagger.rules()[7].pattern());
        assert_eq!("NN", tagger.rules()[7].tag());
    }
}
