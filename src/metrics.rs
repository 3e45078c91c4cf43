//! Scoring predictions against gold labels.
//!
//! [`metric_score`](metric_score) is the single entry point:
//! it filters ignored labels, dispatches to the registry of named
//! metrics, and hands each metric exactly the inputs it declares.

pub(crate) mod score;
pub(crate) mod convert;


pub use score::{metric_score, Metric, MetricInput, MetricParams};
pub use convert::{
    filter_labels,
    prob_to_pred,
    pred_to_prob,
    convert_labels,
    LabelConvention,
};
