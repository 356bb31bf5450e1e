use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::errors::{Result, TaggerError};
use crate::sentence::{untagged, TaggedToken};
use crate::tagger::Tagger;

const UNTAGGED_LABEL: &str = "-";

/// Result of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyReport {
    /// Number of tokens whose predicted tag equals the gold tag.
    pub correct: usize,

    /// Number of evaluated tokens.
    pub total: usize,

    /// `correct / total`.
    pub accuracy: f64,
}

/// Tags every gold sentence and folds each `(gold, predicted)` pair into an accumulator.
fn fold_predictions<T, S, A, F>(tagger: &T, gold: &[S], init: A, mut f: F) -> Result<A>
where
    T: Tagger + ?Sized,
    S: AsRef<[TaggedToken]>,
    F: FnMut(A, &TaggedToken, Option<&str>) -> A,
{
    if gold.is_empty() {
        return Err(TaggerError::empty_gold_set());
    }
    let mut acc = init;
    for sentence in gold {
        let sentence = sentence.as_ref();
        let predicted = tagger.tag(&untagged(sentence))?;
        for (g, (_, p)) in sentence.iter().zip(&predicted) {
            acc = f(acc, g, p.as_deref());
        }
    }
    Ok(acc)
}

/// Measures the accuracy of a tagger on gold sentences.
///
/// Tokens left untagged count as errors.
///
/// # Errors
///
/// If `gold` contains no tokens, or the tagger is untrained, an error variant will be
/// returned.
///
/// # Examples
///
/// ```
/// use ngtagger::{evaluate, DefaultTagger, TaggedToken};
///
/// let gold = vec![vec![TaggedToken::new("x", "A")]];
/// let report = evaluate(&DefaultTagger::new("B"), &gold).unwrap();
///
/// assert_eq!(0, report.correct);
/// assert_eq!(1, report.total);
/// assert_eq!(0.0, report.accuracy);
/// ```
pub fn evaluate<T, S>(tagger: &T, gold: &[S]) -> Result<AccuracyReport>
where
    T: Tagger + ?Sized,
    S: AsRef<[TaggedToken]>,
{
    let (correct, total) = fold_predictions(tagger, gold, (0, 0), |(correct, total), g, p| {
        if p == Some(g.tag.as_str()) {
            (correct + 1, total + 1)
        } else {
            (correct, total + 1)
        }
    })?;
    if total == 0 {
        return Err(TaggerError::empty_gold_set());
    }
    Ok(AccuracyReport {
        correct,
        total,
        accuracy: correct as f64 / total as f64,
    })
}

/// Counts how often each gold tag was predicted as each tag.
///
/// # Errors
///
/// If `gold` contains no tokens, or the tagger is untrained, an error variant will be
/// returned.
pub fn confusion<T, S>(tagger: &T, gold: &[S]) -> Result<ConfusionMatrix>
where
    T: Tagger + ?Sized,
    S: AsRef<[TaggedToken]>,
{
    let matrix = fold_predictions(tagger, gold, ConfusionMatrix::new(), |mut m, g, p| {
        m.add(&g.tag, p);
        m
    })?;
    if matrix.total() == 0 {
        return Err(TaggerError::empty_gold_set());
    }
    Ok(matrix)
}

/// Returns the `n` non-zero cells whose gold tags are the most frequent.
///
/// Cells are ordered by the row total of the gold tag (descending), the gold tag, the cell
/// count (descending), and the predicted tag.
pub fn top_n_by_count(matrix: &ConfusionMatrix, n: usize) -> Vec<(String, Option<String>, usize)> {
    let mut cells: Vec<_> = matrix
        .iter()
        .map(|(gold, predicted, count)| (matrix.row_total(gold), gold, predicted, count))
        .collect();
    cells.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.1.cmp(b.1))
            .then_with(|| b.3.cmp(&a.3))
            .then_with(|| a.2.cmp(&b.2))
    });
    cells
        .into_iter()
        .take(n)
        .map(|(_, gold, predicted, count)| {
            (gold.to_string(), predicted.map(str::to_string), count)
        })
        .collect()
}

/// Counts of `(gold tag, predicted tag)` pairs. A predicted tag of `None` means the token was
/// left untagged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    cells: BTreeMap<(String, Option<String>), usize>,
    total: usize,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the cell of `(gold, predicted)`.
    pub fn add(&mut self, gold: &str, predicted: Option<&str>) {
        *self
            .cells
            .entry((gold.to_string(), predicted.map(str::to_string)))
            .or_insert(0) += 1;
        self.total += 1;
    }

    pub fn get(&self, gold: &str, predicted: Option<&str>) -> usize {
        self.cells
            .get(&(gold.to_string(), predicted.map(str::to_string)))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all cells.
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Sum of the diagonal.
    pub fn correct(&self) -> usize {
        self.iter()
            .filter(|(gold, predicted, _)| Some(*gold) == *predicted)
            .map(|(_, _, count)| count)
            .sum()
    }

    /// Ratio of the diagonal to the total. `None` if the matrix is empty.
    pub fn accuracy(&self) -> Option<f64> {
        (self.total != 0).then(|| self.correct() as f64 / self.total as f64)
    }

    /// Summarizes the diagonal as an accuracy report.
    ///
    /// # Errors
    ///
    /// If the matrix is empty, an error variant will be returned.
    pub fn report(&self) -> Result<AccuracyReport> {
        let accuracy = self.accuracy().ok_or_else(TaggerError::empty_gold_set)?;
        Ok(AccuracyReport {
            correct: self.correct(),
            total: self.total,
            accuracy,
        })
    }

    /// Number of tokens whose gold tag is `gold`.
    pub fn row_total(&self, gold: &str) -> usize {
        self.cells
            .range((gold.to_string(), None)..)
            .take_while(|((g, _), _)| g == gold)
            .map(|(_, count)| count)
            .sum()
    }

    /// All gold and predicted tags in lexical order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels = BTreeSet::new();
        for (gold, predicted) in self.cells.keys() {
            labels.insert(gold.as_str());
            if let Some(predicted) = predicted {
                labels.insert(predicted.as_str());
            }
        }
        labels.into_iter().collect()
    }

    /// Returns `true` if some token was left untagged.
    pub fn has_untagged(&self) -> bool {
        self.cells.keys().any(|(_, predicted)| predicted.is_none())
    }

    /// Iterates over non-zero cells as `(gold, predicted, count)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>, usize)> {
        self.cells
            .iter()
            .map(|((gold, predicted), &count)| (gold.as_str(), predicted.as_deref(), count))
    }

    /// Renders the matrix as a text table. Rows are gold tags, columns are predicted tags, and
    /// diagonal cells are enclosed in `<>`. Untagged predictions are shown in the `-` column.
    ///
    /// # Arguments
    ///
    /// * `sort_by_count` - Orders tags by their gold frequency instead of lexically.
    /// * `truncate` - Shows only the first `truncate` tags.
    /// * `show_percents` - Shows each cell as a percentage of the total.
    pub fn pretty_format(
        &self,
        sort_by_count: bool,
        truncate: Option<usize>,
        show_percents: bool,
    ) -> String {
        let mut labels = self.labels();
        if sort_by_count {
            // stable, so equal totals keep lexical order
            labels.sort_by_key(|label| core::cmp::Reverse(self.row_total(label)));
        }
        if let Some(n) = truncate {
            labels.truncate(n);
        }
        let mut columns: Vec<Option<&str>> = labels.iter().copied().map(Some).collect();
        if self.has_untagged() {
            columns.push(None);
        }
        PrettyFormat {
            matrix: self,
            labels,
            columns,
            show_percents,
        }
        .to_string()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.pretty_format(false, None, false))
    }
}

struct PrettyFormat<'a> {
    matrix: &'a ConfusionMatrix,
    labels: Vec<&'a str>,
    columns: Vec<Option<&'a str>>,
    show_percents: bool,
}

impl PrettyFormat<'_> {
    fn cell(&self, gold: &str, predicted: Option<&str>) -> String {
        let count = self.matrix.get(gold, predicted);
        if count == 0 {
            ".".to_string()
        } else if self.show_percents {
            format!("{:.1}%", count as f64 * 100.0 / self.matrix.total() as f64)
        } else {
            count.to_string()
        }
    }
}

impl fmt::Display for PrettyFormat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rows: Vec<Vec<String>> = self
            .labels
            .iter()
            .map(|gold| self.columns.iter().map(|&p| self.cell(gold, p)).collect())
            .collect();
        let mut widths: Vec<usize> = self
            .columns
            .iter()
            .map(|c| c.unwrap_or(UNTAGGED_LABEL).chars().count())
            .collect();
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }
        let label_width = self
            .labels
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let separator = format!(
            "{}+{}+",
            "-".repeat(label_width + 1),
            "-".repeat(widths.iter().map(|w| w + 2).sum())
        );

        write!(f, "{:>label_width$} |", "")?;
        for (c, &w) in self.columns.iter().zip(&widths) {
            write!(f, " {:>w$} ", c.unwrap_or(UNTAGGED_LABEL))?;
        }
        writeln!(f, "|")?;
        writeln!(f, "{separator}")?;
        for (gold, row) in self.labels.iter().zip(&rows) {
            write!(f, "{gold:>label_width$} |")?;
            for ((c, cell), &w) in self.columns.iter().zip(row).zip(&widths) {
                if *c == Some(*gold) {
                    write!(f, "<{cell:>w$}>")?;
                } else {
                    write!(f, " {cell:>w$} ")?;
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{separator}")?;
        writeln!(f, "(row = reference; col = test)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::chain::ChainBuilder;
    use crate::regex_tagger::RegexTagger;
    use crate::tagger::{DefaultTagger, NgramTagger};

    fn gold() -> Vec<Vec<TaggedToken>> {
        vec![vec![
            TaggedToken::new("x", "A"),
            TaggedToken::new("y", "B"),
            TaggedToken::new("z", "B"),
        ]]
    }

    fn partial_tagger() -> RegexTagger {
        RegexTagger::new([("x", "A"), ("y", "A")]).unwrap()
    }

    #[test]
    fn test_evaluate_always_wrong() {
        let gold = vec![vec![TaggedToken::new("x", "A")]];
        let report = evaluate(&DefaultTagger::new("B"), &gold).unwrap();

        assert_eq!(
            AccuracyReport {
                correct: 0,
                total: 1,
                accuracy: 0.0,
            },
            report
        );
    }

    #[test]
    fn test_evaluate_perfect() {
        let corpus = vec![
            vec![TaggedToken::new("the", "DT"), TaggedToken::new("dog", "NN")],
            vec![TaggedToken::new("the", "DT"), TaggedToken::new("cat", "NN")],
        ];
        let tagger = ChainBuilder::new("NN").build(&[1, 2], &corpus).unwrap();
        let report = evaluate(&tagger, &corpus).unwrap();

        assert_eq!(4, report.correct);
        assert_eq!(4, report.total);
        assert_eq!(1.0, report.accuracy);
    }

    #[test]
    fn test_evaluate_untagged_is_wrong() {
        let report = evaluate(&partial_tagger(), &gold()).unwrap();

        assert_eq!(1, report.correct);
        assert_eq!(3, report.total);
        assert!((0.0..=1.0).contains(&report.accuracy));
    }

    #[test]
    fn test_evaluate_empty_gold() {
        let gold: Vec<Vec<TaggedToken>> = vec![];
        let result = evaluate(&DefaultTagger::new("NN"), &gold);

        assert!(matches!(result, Err(TaggerError::EmptyGoldSet(_))));
    }

    #[test]
    fn test_evaluate_gold_without_tokens() {
        let gold: Vec<Vec<TaggedToken>> = vec![vec![], vec![]];

        assert!(matches!(
            evaluate(&DefaultTagger::new("NN"), &gold),
            Err(TaggerError::EmptyGoldSet(_))
        ));
        assert!(matches!(
            confusion(&DefaultTagger::new("NN"), &gold),
            Err(TaggerError::EmptyGoldSet(_))
        ));
    }

    #[test]
    fn test_evaluate_untrained() {
        let tagger = NgramTagger::new(1).unwrap();

        assert!(matches!(
            evaluate(&tagger, &gold()),
            Err(TaggerError::UntrainedTagger(_))
        ));
    }

    #[test]
    fn test_confusion() {
        let matrix = confusion(&partial_tagger(), &gold()).unwrap();

        assert_eq!(1, matrix.get("A", Some("A")));
        assert_eq!(1, matrix.get("B", Some("A")));
        assert_eq!(1, matrix.get("B", None));
        assert_eq!(0, matrix.get("B", Some("B")));
        assert_eq!(3, matrix.total());
        assert_eq!(1, matrix.correct());
        assert_eq!(2, matrix.row_total("B"));
        assert_eq!(vec!["A", "B"], matrix.labels());
        assert!(matrix.has_untagged());
    }

    #[test]
    fn test_confusion_sum_equals_tokens() {
        let gold = vec![
            vec![TaggedToken::new("the", "DT"), TaggedToken::new("dog", "NN")],
            vec![TaggedToken::new("runs", "VBZ")],
            vec![],
            vec![
                TaggedToken::new("a", "DT"),
                TaggedToken::new("cat", "NN"),
                TaggedToken::new("sleeps", "VBZ"),
            ],
        ];
        let tagger = ChainBuilder::new("NN").build(&[1], &gold[..1]).unwrap();
        let matrix = confusion(&tagger, &gold).unwrap();

        assert_eq!(6, matrix.total());
        assert_eq!(6, matrix.iter().map(|(_, _, c)| c).sum::<usize>());
        assert_eq!(
            evaluate(&tagger, &gold).unwrap().accuracy,
            matrix.accuracy().unwrap()
        );
    }

    #[test]
    fn test_report_from_matrix() {
        let matrix = confusion(&partial_tagger(), &gold()).unwrap();

        assert_eq!(
            evaluate(&partial_tagger(), &gold()).unwrap(),
            matrix.report().unwrap()
        );
        assert!(matches!(
            ConfusionMatrix::new().report(),
            Err(TaggerError::EmptyGoldSet(_))
        ));
    }

    #[test]
    fn test_top_n_by_count() {
        let matrix = confusion(&partial_tagger(), &gold()).unwrap();

        assert_eq!(
            vec![
                ("B".to_string(), None, 1),
                ("B".to_string(), Some("A".to_string()), 1),
            ],
            top_n_by_count(&matrix, 2)
        );
        assert_eq!(3, top_n_by_count(&matrix, 10).len());
    }

    #[test]
    fn test_top_n_by_count_tie_by_gold() {
        let mut matrix = ConfusionMatrix::new();
        matrix.add("NN", Some("NN"));
        matrix.add("JJ", Some("NN"));
        matrix.add("VB", Some("VB"));
        matrix.add("VB", Some("NN"));

        assert_eq!(
            vec![
                ("VB".to_string(), Some("NN".to_string()), 1),
                ("VB".to_string(), Some("VB".to_string()), 1),
                ("JJ".to_string(), Some("NN".to_string()), 1),
                ("NN".to_string(), Some("NN".to_string()), 1),
            ],
            top_n_by_count(&matrix, 4)
        );
    }

    #[test]
    fn test_pretty_format() {
        let matrix = confusion(&partial_tagger(), &gold()).unwrap();

        assert_eq!(
            concat!(
                "  | A  B  - |\n",
                "--+---------+\n",
                "A |<1> .  . |\n",
                "B | 1 <.> 1 |\n",
                "--+---------+\n",
                "(row = reference; col = test)\n",
            ),
            matrix.to_string()
        );
    }

    #[test]
    fn test_pretty_format_sorted_truncated() {
        let matrix = confusion(&partial_tagger(), &gold()).unwrap();

        assert_eq!(
            concat!(
                "  | B  - |\n",
                "--+------+\n",
                "B |<.> 1 |\n",
                "--+------+\n",
                "(row = reference; col = test)\n",
            ),
            matrix.pretty_format(true, Some(1), false)
        );
    }

    #[test]
    fn test_pretty_format_percents() {
        let matrix = confusion(&partial_tagger(), &gold()).unwrap();
        let table = matrix.pretty_format(false, None, true);

        assert!(table.contains("<33.3%>"));
    }
}
