//! The metric registry and its dispatch entry point.
use crate::error::{Result, WeakLabelError};
use super::convert::filter_labels;


/// The inputs a metric consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricInput {
    /// Gold labels.
    Golds,
    /// Hard predictions.
    Preds,
    /// Probabilistic labels.
    Probs,
}


/// Extra arguments for the parametrized metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricParams {
    /// The class treated as positive by
    /// precision, recall, f1, and fbeta.
    pub pos_label: i64,
    /// The `β` of fbeta.
    pub beta: f64,
}


impl Default for MetricParams {
    fn default() -> Self {
        Self { pos_label: 1, beta: 1.0 }
    }
}


/// The fixed registry of named metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Fraction of predictions matching the gold labels.
    Accuracy,
    /// Fraction of non-abstain predictions.
    Coverage,
    /// Positive predictive value of `pos_label`.
    Precision,
    /// True positive rate of `pos_label`.
    Recall,
    /// Harmonic mean of precision and recall.
    F1,
    /// Weighted harmonic mean of precision and recall.
    FBeta,
    /// Matthews correlation coefficient.
    MatthewsCorrcoef,
    /// Area under the ROC curve (binary).
    RocAuc,
}


impl Metric {
    /// Looks a metric up by its registry name.
    pub fn from_name(name: &str) -> Result<Self> {
        let metric = match name {
            "accuracy" => Self::Accuracy,
            "coverage" => Self::Coverage,
            "precision" => Self::Precision,
            "recall" => Self::Recall,
            "f1" => Self::F1,
            "fbeta" => Self::FBeta,
            "matthews_corrcoef" => Self::MatthewsCorrcoef,
            "roc_auc" => Self::RocAuc,
            _ => return Err(WeakLabelError::UnknownMetric(name.to_string())),
        };
        Ok(metric)
    }


    /// Which of golds / preds / probs this metric consumes.
    pub fn inputs(&self) -> &'static [MetricInput] {
        use MetricInput::*;
        match self {
            Self::Coverage => &[Preds],
            Self::RocAuc => &[Golds, Probs],
            _ => &[Golds, Preds],
        }
    }
}


/// Scores predictions with the named metric.
///
/// Data points whose gold label is in `ignore_in_golds` or whose
/// predicted label is in `ignore_in_preds` are removed before scoring.
/// Unknown metric names fail fast;
/// so does a metric called without an input it consumes.
///
/// # Example
/// ```
/// use weaklabel::prelude::*;
///
/// let golds = [1, 1, 1, 2, 2];
/// let preds = [1, 1, 1, 2, 1];
/// let score = metric_score(
///     Some(&golds), Some(&preds), None,
///     "accuracy", &[], &[], &MetricParams::default(),
/// ).unwrap();
/// assert!((score - 0.8).abs() < 1e-12);
/// ```
pub fn metric_score(
    golds: Option<&[i64]>,
    preds: Option<&[i64]>,
    probs: Option<&[Vec<f64>]>,
    metric: &str,
    ignore_in_golds: &[i64],
    ignore_in_preds: &[i64],
    params: &MetricParams,
) -> Result<f64>
{
    let metric = Metric::from_name(metric)?;

    let (golds, preds, probs) =
        filter_labels(golds, preds, probs, ignore_in_golds, ignore_in_preds);

    let need = |input: MetricInput,
                present: bool| -> Result<()> {
        if present {
            Ok(())
        } else {
            let msg = format!("{metric:?} requires {input:?}");
            Err(WeakLabelError::MetricInput(msg))
        }
    };
    for &input in metric.inputs() {
        match input {
            MetricInput::Golds => need(input, golds.is_some())?,
            MetricInput::Preds => need(input, preds.is_some())?,
            MetricInput::Probs => need(input, probs.is_some())?,
        }
    }

    let score = match metric {
        Metric::Accuracy => {
            accuracy(&golds.unwrap(), &preds.unwrap())
        },
        Metric::Coverage => {
            coverage(&preds.unwrap())
        },
        Metric::Precision => {
            precision(&golds.unwrap(), &preds.unwrap(), params.pos_label)
        },
        Metric::Recall => {
            recall(&golds.unwrap(), &preds.unwrap(), params.pos_label)
        },
        Metric::F1 => {
            fbeta(&golds.unwrap(), &preds.unwrap(), params.pos_label, 1.0)
        },
        Metric::FBeta => {
            fbeta(
                &golds.unwrap(), &preds.unwrap(),
                params.pos_label, params.beta,
            )
        },
        Metric::MatthewsCorrcoef => {
            matthews_corrcoef(&golds.unwrap(), &preds.unwrap())
        },
        Metric::RocAuc => {
            roc_auc(&golds.unwrap(), &probs.unwrap())?
        },
    };
    Ok(score)
}


fn accuracy(golds: &[i64], preds: &[i64]) -> f64 {
    if golds.is_empty() {
        return 0.0;
    }
    let hits = golds.iter()
        .zip(preds)
        .filter(|(g, p)| g == p)
        .count();
    hits as f64 / golds.len() as f64
}


fn coverage(preds: &[i64]) -> f64 {
    if preds.is_empty() {
        return 0.0;
    }
    let votes = preds.iter().filter(|&&p| p != 0).count();
    votes as f64 / preds.len() as f64
}


fn precision(golds: &[i64], preds: &[i64], pos: i64) -> f64 {
    let tp = golds.iter()
        .zip(preds)
        .filter(|&(&g, &p)| g == pos && p == pos)
        .count();
    let predicted = preds.iter().filter(|&&p| p == pos).count();
    safe_div(tp as f64, predicted as f64)
}


fn recall(golds: &[i64], preds: &[i64], pos: i64) -> f64 {
    let tp = golds.iter()
        .zip(preds)
        .filter(|&(&g, &p)| g == pos && p == pos)
        .count();
    let actual = golds.iter().filter(|&&g| g == pos).count();
    safe_div(tp as f64, actual as f64)
}


fn fbeta(golds: &[i64], preds: &[i64], pos: i64, beta: f64) -> f64 {
    let p = precision(golds, preds, pos);
    let r = recall(golds, preds, pos);
    let b2 = beta.powi(2);
    safe_div((1.0 + b2) * p * r, b2 * p + r)
}


/// Multi-class Matthews correlation coefficient
/// from the confusion matrix counts.
fn matthews_corrcoef(golds: &[i64], preds: &[i64]) -> f64 {
    let mut classes = golds.iter()
        .chain(preds)
        .copied()
        .collect::<Vec<_>>();
    classes.sort_unstable();
    classes.dedup();
    let index = |label: i64| {
        classes.binary_search(&label).unwrap()
    };

    let k = classes.len();
    let mut confusion = vec![vec![0.0_f64; k]; k];
    for (&g, &p) in golds.iter().zip(preds) {
        confusion[index(g)][index(p)] += 1.0;
    }

    let n = golds.len() as f64;
    let trace = (0..k).map(|i| confusion[i][i]).sum::<f64>();
    let pred_counts = (0..k)
        .map(|j| (0..k).map(|i| confusion[i][j]).sum::<f64>())
        .collect::<Vec<_>>();
    let gold_counts = (0..k)
        .map(|i| confusion[i].iter().sum::<f64>())
        .collect::<Vec<_>>();

    let dot = pred_counts.iter()
        .zip(&gold_counts)
        .map(|(p, t)| p * t)
        .sum::<f64>();
    let pred_sq = pred_counts.iter().map(|p| p * p).sum::<f64>();
    let gold_sq = gold_counts.iter().map(|t| t * t).sum::<f64>();

    let numer = trace * n - dot;
    let denom = ((n * n - pred_sq) * (n * n - gold_sq)).sqrt();
    safe_div(numer, denom)
}


/// Binary area under the ROC curve via the mid-rank
/// Mann–Whitney statistic.
/// Gold label `2` is the positive class,
/// scored by the second probability column.
fn roc_auc(golds: &[i64], probs: &[Vec<f64>]) -> Result<f64> {
    if probs.iter().any(|row| row.len() != 2) {
        return Err(WeakLabelError::MetricInput(
            "roc_auc requires binary probabilities (two columns)".to_string()
        ));
    }

    let n = golds.len();
    let scores = probs.iter()
        .map(|row| row[1])
        .collect::<Vec<_>>();

    let mut order = (0..n).collect::<Vec<_>>();
    order.sort_by(|&i, &j| scores[i].partial_cmp(&scores[j]).unwrap());

    // Mid-ranks for tied scores.
    let mut ranks = vec![0.0; n];
    let mut lo = 0;
    while lo < n {
        let mut hi = lo;
        while hi + 1 < n && scores[order[hi + 1]] == scores[order[lo]] {
            hi += 1;
        }
        let rank = (lo + hi) as f64 / 2.0 + 1.0;
        for &i in &order[lo..=hi] {
            ranks[i] = rank;
        }
        lo = hi + 1;
    }

    let n_pos = golds.iter().filter(|&&g| g == 2).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(WeakLabelError::MetricInput(
            "roc_auc requires both classes in the gold labels".to_string()
        ));
    }

    let rank_sum = golds.iter()
        .zip(&ranks)
        .filter(|&(&g, _)| g == 2)
        .map(|(_, &r)| r)
        .sum::<f64>();

    let auc = (rank_sum - n_pos as f64 * (n_pos as f64 + 1.0) / 2.0)
        / (n_pos as f64 * n_neg as f64);
    Ok(auc)
}


fn safe_div(numer: f64, denom: f64) -> f64 {
    if denom == 0.0 {
        0.0
    } else {
        numer / denom
    }
}
