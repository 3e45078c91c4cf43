//! Defines `LfAnalysis`, the label matrix analyzer.
use polars::prelude::*;

use crate::error::{Result, WeakLabelError};
use crate::matrix::LabelMatrix;


/// Diagnostic statistics for a set of labeling functions,
/// computed from their label matrix alone
/// (plus optional gold labels for the empirical statistics).
///
/// All statistics are pure functions of the matrix:
/// calling them repeatedly yields identical results,
/// and every ratio with a structurally zero denominator is `0`,
/// never `NaN`.
///
/// # Example
/// ```
/// use weaklabel::prelude::*;
///
/// let labels = LabelMatrix::from_rows(vec![
///     vec![1, 0],
///     vec![1, 2],
///     vec![0, 0],
/// ]).unwrap();
///
/// let analysis = LfAnalysis::new(&labels);
/// assert_eq!(analysis.label_coverage(), 2.0 / 3.0);
/// assert_eq!(analysis.lf_coverages(), vec![2.0 / 3.0, 1.0 / 3.0]);
/// ```
pub struct LfAnalysis<'a> {
    labels: &'a LabelMatrix,

    // Per-row vote counts and conflict flags, computed once.
    votes_per_row: Vec<usize>,
    conflicted: Vec<bool>,
}


impl<'a> LfAnalysis<'a> {
    /// Prepares the analyzer for the given label matrix.
    pub fn new(labels: &'a LabelMatrix) -> Self {
        let votes_per_row = labels.rows()
            .map(|row| row.iter().filter(|&&v| v > 0).count())
            .collect::<Vec<_>>();

        let conflicted = labels.rows()
            .map(|row| {
                let mut it = row.iter().filter(|&&v| v > 0);
                match it.next() {
                    Some(first) => it.any(|v| v != first),
                    None => false,
                }
            })
            .collect::<Vec<_>>();

        Self { labels, votes_per_row, conflicted }
    }


    /// Fraction of data points with at least one non-abstain vote.
    pub fn label_coverage(&self) -> f64 {
        let n = self.votes_per_row.len();
        let covered = self.votes_per_row.iter().filter(|&&c| c > 0).count();
        covered as f64 / n as f64
    }


    /// Fraction of data points where at least two functions vote.
    pub fn label_overlap(&self) -> f64 {
        let n = self.votes_per_row.len();
        let overlapped = self.votes_per_row.iter().filter(|&&c| c > 1).count();
        overlapped as f64 / n as f64
    }


    /// Fraction of data points where at least two functions vote
    /// with different non-abstain labels.
    pub fn label_conflict(&self) -> f64 {
        let n = self.conflicted.len();
        let conflicted = self.conflicted.iter().filter(|&&c| c).count();
        conflicted as f64 / n as f64
    }


    /// Per-function sorted sets of the distinct non-abstain labels
    /// ever emitted.
    pub fn lf_polarities(&self) -> Vec<Vec<i64>> {
        let (_, m) = self.labels.shape();
        (0..m).map(|j| {
                let mut labels = self.labels.column(j);
                labels.retain(|&v| v > 0);
                labels.sort_unstable();
                labels.dedup();
                labels
            })
            .collect()
    }


    /// Per-function fraction of data points labeled.
    pub fn lf_coverages(&self) -> Vec<f64> {
        let (n, m) = self.labels.shape();
        (0..m).map(|j| {
                let votes = (0..n)
                    .filter(|&i| self.labels.get(i, j) > 0)
                    .count();
                votes as f64 / n as f64
            })
            .collect()
    }


    /// Per-function fraction of data points where the function voted
    /// and at least one other function voted too.
    /// With `normalize_by_coverage`, the fraction is taken over the
    /// points the function labeled instead of all points.
    pub fn lf_overlaps(&self, normalize_by_coverage: bool) -> Vec<f64> {
        let (n, m) = self.labels.shape();
        (0..m).map(|j| {
                let mut voted = 0_usize;
                let mut overlapped = 0_usize;
                for i in 0..n {
                    if self.labels.get(i, j) > 0 {
                        voted += 1;
                        if self.votes_per_row[i] > 1 {
                            overlapped += 1;
                        }
                    }
                }
                let denom = if normalize_by_coverage { voted } else { n };
                ratio(overlapped, denom)
            })
            .collect()
    }


    /// Per-function fraction of data points where the function voted
    /// on a point with conflicting non-abstain labels.
    /// With `normalize_by_overlaps`, the fraction is taken over the
    /// points where the function overlapped instead of all points.
    pub fn lf_conflicts(&self, normalize_by_overlaps: bool) -> Vec<f64> {
        let (n, m) = self.labels.shape();
        (0..m).map(|j| {
                let mut overlapped = 0_usize;
                let mut conflicted = 0_usize;
                for i in 0..n {
                    if self.labels.get(i, j) > 0 {
                        if self.votes_per_row[i] > 1 {
                            overlapped += 1;
                        }
                        if self.conflicted[i] {
                            conflicted += 1;
                        }
                    }
                }
                let denom = if normalize_by_overlaps { overlapped } else { n };
                ratio(conflicted, denom)
            })
            .collect()
    }


    /// Per-function counts of non-abstain votes matching and
    /// missing the gold labels.
    ///
    /// Gold labels must be `1`-indexed class ids, one per data point;
    /// anything else is an invalid-label-matrix error.
    pub fn lf_correct_incorrect(&self, golds: &[i64])
        -> Result<(Vec<usize>, Vec<usize>)>
    {
        self.validated_golds(golds, None)?;
        let (n, m) = self.labels.shape();
        let mut correct = vec![0; m];
        let mut incorrect = vec![0; m];
        for i in 0..n {
            for j in 0..m {
                let vote = self.labels.get(i, j);
                if vote > 0 {
                    if vote == golds[i] {
                        correct[j] += 1;
                    } else {
                        incorrect[j] += 1;
                    }
                }
            }
        }
        Ok((correct, incorrect))
    }


    /// Per-function empirical accuracy against gold labels,
    /// restricted to the points the function labeled.
    pub fn lf_empirical_accuracies(&self, golds: &[i64]) -> Result<Vec<f64>> {
        let (correct, incorrect) = self.lf_correct_incorrect(golds)?;
        let accuracies = correct.into_iter()
            .zip(incorrect)
            .map(|(c, w)| ratio(c, c + w))
            .collect();
        Ok(accuracies)
    }


    /// Per-function empirical conditional probability tables.
    ///
    /// For each function the table is `cardinality × (cardinality + 1)`:
    /// entry `[true_class - 1][vote]` is the empirical probability of
    /// emitting `vote` (`0` = abstain) on points of that true class.
    /// Each row sums to `1` when its class occurs in `golds`.
    /// Gold labels outside `1..=cardinality` are rejected.
    pub fn lf_empirical_probs(&self, golds: &[i64], cardinality: usize)
        -> Result<Vec<Vec<Vec<f64>>>>
    {
        self.validated_golds(golds, Some(cardinality))?;
        let (n, m) = self.labels.shape();

        let mut class_counts = vec![0_usize; cardinality];
        for &y in golds {
            class_counts[y as usize - 1] += 1;
        }

        let tables = (0..m).map(|j| {
                let mut table = vec![vec![0.0; cardinality + 1]; cardinality];
                for i in 0..n {
                    let vote = self.labels.get(i, j) as usize;
                    let truth = golds[i] as usize - 1;
                    table[truth][vote] += 1.0;
                }
                for (row, &count) in table.iter_mut().zip(&class_counts) {
                    if count > 0 {
                        row.iter_mut()
                            .for_each(|p| { *p /= count as f64; });
                    }
                }
                table
            })
            .collect();
        Ok(tables)
    }


    /// A single summary table, one row per labeling function:
    /// polarity, coverage, overlaps, conflicts, and, when gold labels
    /// are supplied, correct/incorrect counts and empirical accuracy.
    /// Externally estimated accuracies appear as a `Learned Acc.` column.
    ///
    /// Rows follow definition order; `lf_names` relabels them.
    pub fn lf_summary(
        &self,
        golds: Option<&[i64]>,
        lf_names: Option<&[&str]>,
        est_accs: Option<&[f64]>,
    ) -> Result<DataFrame>
    {
        let (_, m) = self.labels.shape();
        if let Some(golds) = golds {
            self.validated_golds(golds, None)?;
        }

        let polarities = self.lf_polarities()
            .into_iter()
            .map(|labels| {
                let inner = labels.iter()
                    .map(|l| l.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{inner}]")
            })
            .collect::<Vec<_>>();

        let mut columns = vec![
            Series::new("j", (0..m as u32).collect::<Vec<_>>()),
            Series::new("Polarity", polarities),
            Series::new("Coverage", self.lf_coverages()),
            Series::new("Overlaps", self.lf_overlaps(false)),
            Series::new("Conflicts", self.lf_conflicts(false)),
        ];

        if let Some(names) = lf_names {
            let names = names.iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>();
            columns.insert(0, Series::new("LF", names));
        }

        if let Some(golds) = golds {
            let (correct, incorrect) = self.lf_correct_incorrect(golds)?;
            let correct = correct.into_iter()
                .map(|c| c as u32)
                .collect::<Vec<_>>();
            let incorrect = incorrect.into_iter()
                .map(|c| c as u32)
                .collect::<Vec<_>>();
            columns.push(Series::new("Correct", correct));
            columns.push(Series::new("Incorrect", incorrect));
            columns.push(
                Series::new("Emp. Acc.", self.lf_empirical_accuracies(golds)?)
            );
        }

        if let Some(est_accs) = est_accs {
            columns.push(Series::new("Learned Acc.", est_accs.to_vec()));
        }

        let summary = DataFrame::new(columns)?;
        Ok(summary)
    }


    /// Gold labels are `1`-indexed class ids, one per data point.
    /// `0` is not a class here; abstain is a vote value, never a truth.
    fn validated_golds(&self, golds: &[i64], cardinality: Option<usize>)
        -> Result<()>
    {
        let (n, _) = self.labels.shape();
        if golds.len() != n {
            let msg = format!(
                "expected {n} gold labels, got {}", golds.len(),
            );
            return Err(WeakLabelError::InvalidLabelMatrix(msg));
        }
        if let Some(&bad) = golds.iter().find(|&&y| y < 1) {
            let msg = format!(
                "gold label {bad} is not a valid class; \
                 gold labels must be in {{1, ..., k}}"
            );
            return Err(WeakLabelError::InvalidLabelMatrix(msg));
        }
        if let Some(k) = cardinality {
            if let Some(&bad) = golds.iter().find(|&&y| y > k as i64) {
                let msg = format!(
                    "gold label {bad} exceeds cardinality {k}"
                );
                return Err(WeakLabelError::InvalidLabelMatrix(msg));
            }
        }
        Ok(())
    }
}


/// `0` whenever the denominator is structurally zero.
fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}
