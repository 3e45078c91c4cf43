//! Label vector helpers shared by the metric registry and the model.
use crate::error::{Result, WeakLabelError};


/// A label encoding convention for binary problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelConvention {
    /// `0` = abstain, `1` = positive, `2` = negative.
    Categorical,
    /// `0` = abstain, `1` = positive, `-1` = negative.
    PlusMinus,
}


impl LabelConvention {
    fn negative(self) -> i64 {
        match self {
            Self::Categorical => 2,
            Self::PlusMinus => -1,
        }
    }
}


/// Rewrites a label vector from one binary convention to another.
pub fn convert_labels(
    labels: &[i64],
    source: LabelConvention,
    target: LabelConvention,
) -> Vec<i64>
{
    let from = source.negative();
    let to = target.negative();
    labels.iter()
        .map(|&y| if y == from { to } else { y })
        .collect()
}


/// Converts probabilistic labels into hard predictions.
///
/// Each row must be a distribution over `k` classes;
/// the prediction is the `1`-indexed argmax
/// (ties resolve to the smaller class).
pub fn prob_to_pred(probs: &[Vec<f64>]) -> Vec<i64> {
    probs.iter()
        .map(|row| {
            let (best, _) = row.iter()
                .enumerate()
                .fold((0, f64::MIN), |(bi, bv), (i, &v)| {
                    if v > bv { (i, v) } else { (bi, bv) }
                });
            best as i64 + 1
        })
        .collect()
}


/// Converts hard predictions into one-hot probabilistic labels.
///
/// Predictions must be class ids in `1..=cardinality`;
/// an abstain (`0`) carries no class information and is rejected
/// rather than given a made-up distribution.
pub fn pred_to_prob(preds: &[i64], cardinality: usize)
    -> Result<Vec<Vec<f64>>>
{
    preds.iter()
        .map(|&y| {
            if y < 1 || y > cardinality as i64 {
                let msg = format!(
                    "prediction {y} is outside the class range \
                     1..={cardinality}"
                );
                return Err(WeakLabelError::MetricInput(msg));
            }
            let mut row = vec![0.0; cardinality];
            row[y as usize - 1] = 1.0;
            Ok(row)
        })
        .collect()
}


/// Removes every data point whose gold label is in `ignore_in_golds`
/// or whose predicted label is in `ignore_in_preds`,
/// keeping golds, predictions, and probabilities aligned.
pub fn filter_labels(
    golds: Option<&[i64]>,
    preds: Option<&[i64]>,
    probs: Option<&[Vec<f64>]>,
    ignore_in_golds: &[i64],
    ignore_in_preds: &[i64],
) -> (Option<Vec<i64>>, Option<Vec<i64>>, Option<Vec<Vec<f64>>>)
{
    let n = golds.map(<[i64]>::len)
        .or(preds.map(<[i64]>::len))
        .or(probs.map(<[Vec<f64>]>::len))
        .unwrap_or(0);

    let keep = (0..n)
        .filter(|&i| {
            let gold_ok = golds
                .map(|g| !ignore_in_golds.contains(&g[i]))
                .unwrap_or(true);
            let pred_ok = preds
                .map(|p| !ignore_in_preds.contains(&p[i]))
                .unwrap_or(true);
            gold_ok && pred_ok
        })
        .collect::<Vec<_>>();

    let take_ints = |xs: Option<&[i64]>| {
        xs.map(|xs| keep.iter().map(|&i| xs[i]).collect::<Vec<_>>())
    };
    let probs = probs.map(|ps| {
        keep.iter().map(|&i| ps[i].clone()).collect::<Vec<_>>()
    });

    (take_ints(golds), take_ints(preds), probs)
}
