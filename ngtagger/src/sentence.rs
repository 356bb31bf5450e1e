use serde::{Deserialize, Serialize};

use crate::errors::{Result, TaggerError};

/// A token paired with its part-of-speech tag.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct TaggedToken {
    /// Surface string.
    pub token: String,

    /// Tag assigned to the surface.
    pub tag: String,
}

impl TaggedToken {
    /// Creates a new tagged token.
    pub fn new<S, T>(token: S, tag: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            token: token.into(),
            tag: tag.into(),
        }
    }
}

/// Strips tags from a tagged sentence.
///
/// # Examples
///
/// ```
/// use ngtagger::{untagged, TaggedToken};
///
/// let s = vec![TaggedToken::new("the", "DT"), TaggedToken::new("dog", "NN")];
/// assert_eq!(vec!["the", "dog"], untagged(&s));
/// ```
pub fn untagged(sentence: &[TaggedToken]) -> Vec<&str> {
    sentence.iter().map(|t| t.token.as_str()).collect()
}

/// Parses a line of whitespace-separated `word/TAG` pairs.
///
/// The tag is taken after the last slash, so words may contain slashes.
///
/// # Errors
///
/// This function will return an error variant when a token has no slash, or when either side
/// of the last slash is empty.
///
/// # Examples
///
/// ```
/// use ngtagger::{parse_tagged_line, TaggedToken};
///
/// let s = parse_tagged_line("the/DT 1/2/CD").unwrap();
/// assert_eq!(vec![TaggedToken::new("the", "DT"), TaggedToken::new("1/2", "CD")], s);
///
/// assert!(parse_tagged_line("the dog/NN").is_err());
/// ```
pub fn parse_tagged_line(line: &str) -> Result<Vec<TaggedToken>> {
    let mut sentence = vec![];
    for item in line.split_whitespace() {
        let (token, tag) = item.rsplit_once('/').ok_or_else(|| {
            TaggerError::invalid_argument("line", format!("missing tag: {item:?}"))
        })?;
        if token.is_empty() || tag.is_empty() {
            return Err(TaggerError::invalid_argument(
                "line",
                format!("empty token or tag: {item:?}"),
            ));
        }
        sentence.push(TaggedToken::new(token, tag));
    }
    Ok(sentence)
}

/// Formats a tagged sentence as whitespace-separated `word/TAG` pairs.
///
/// Positions without a tag are written as `word/`.
pub fn to_tagged_string(sentence: &[(String, Option<String>)]) -> String {
    let mut result = String::new();
    for (i, (token, tag)) in sentence.iter().enumerate() {
        if i != 0 {
            result.push(' ');
        }
        result.push_str(token);
        result.push('/');
        if let Some(tag) = tag {
            result.push_str(tag);
        }
    }
    result
}

/// Splits a corpus into a training part and a test part.
///
/// The first `floor(len * ratio)` sentences are used for training.
///
/// # Errors
///
/// If `ratio` is not in `[0, 1]`, an error variant will be returned.
pub fn split_corpus<T>(sentences: &[T], ratio: f64) -> Result<(&[T], &[T])> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(TaggerError::invalid_argument(
            "ratio",
            format!("must be in [0, 1], got {ratio}"),
        ));
    }
    let cutoff = (sentences.len() as f64 * ratio) as usize;
    Ok(sentences.split_at(cutoff.min(sentences.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_line() {
        let s = parse_tagged_line("The/AT  jury/NN said/VBD ./.").unwrap();

        assert_eq!(
            vec![
                TaggedToken::new("The", "AT"),
                TaggedToken::new("jury", "NN"),
                TaggedToken::new("said", "VBD"),
                TaggedToken::new(".", "."),
            ],
            s
        );
    }

    #[test]
    fn test_parse_tagged_line_empty() {
        assert!(parse_tagged_line("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_tagged_line_missing_tag() {
        let s = parse_tagged_line("The/AT jury");

        assert!(s.is_err());
        assert_eq!(
            "InvalidArgumentError: line: missing tag: \"jury\"",
            &s.err().unwrap().to_string()
        );
    }

    #[test]
    fn test_parse_tagged_line_empty_tag() {
        assert!(parse_tagged_line("The/").is_err());
        assert!(parse_tagged_line("/AT").is_err());
    }

    #[test]
    fn test_to_tagged_string() {
        let s = vec![
            ("running".to_string(), Some("VBG".to_string())),
            ("a/b".to_string(), None),
        ];

        assert_eq!("running/VBG a/b/", to_tagged_string(&s));
    }

    #[test]
    fn test_split_corpus() {
        let corpus: Vec<usize> = (0..10).collect();
        let (train, test) = split_corpus(&corpus, 0.9).unwrap();

        assert_eq!(&[0, 1, 2, 3, 4, 5, 6, 7, 8], train);
        assert_eq!(&[9], test);
    }

    #[test]
    fn test_split_corpus_floor() {
        let corpus: Vec<usize> = (0..7).collect();
        let (train, test) = split_corpus(&corpus, 0.5).unwrap();

        assert_eq!(3, train.len());
        assert_eq!(4, test.len());
    }

    #[test]
    fn test_split_corpus_invalid_ratio() {
        let corpus = vec![1, 2, 3];

        assert!(split_corpus(&corpus, 1.5).is_err());
        assert!(split_corpus(&corpus, -0.1).is_err());
        assert!(split_corpus(&corpus, f64::NAN).is_err());
    }
}
