#![warn(missing_docs)]

//!
//! A crate for weak supervision:
//! combining many noisy, possibly-correlated labeling functions
//! into one probabilistic label per data point,
//! without any ground truth.
//!
//! The pipeline has three stages.
//!
//! - Applying labeling functions.
//!     A [`LfApplier`](crate::labeling::LfApplier) backend runs a
//!     list of [`LabelingFunction`](crate::labeling::LabelingFunction)s
//!     over a collection of data points and produces the
//!     [`LabelMatrix`](crate::matrix::LabelMatrix)
//!     (`0` meaning abstain).
//!
//! - Diagnostics.
//!     [`LfAnalysis`](crate::analysis::LfAnalysis) reports coverage,
//!     overlap, conflict, and empirical accuracy per labeling
//!     function, and [`metric_score`](crate::metrics::metric_score)
//!     scores predictions against gold labels.
//!
//! - The generative label model.
//!     [`LabelModel`](crate::model::LabelModel) estimates each
//!     function's class-conditional vote probabilities purely from
//!     agreement statistics, by matching the empirical second
//!     moments of the one-hot expanded matrix, and infers a
//!     posterior class distribution per data point.

pub mod error;
pub mod record;
pub mod labeling;
pub mod matrix;
pub mod analysis;
pub mod model;
pub mod metrics;
pub mod prelude;

mod common;


pub use error::{LfError, Result, WeakLabelError};

pub use record::{FieldValue, Record};

pub use labeling::{LabelingFunction, LfApplier, LfBuilder};

pub use matrix::{AugmentedMatrix, LabelMatrix};

pub use analysis::LfAnalysis;

pub use model::LabelModel;

pub use metrics::metric_score;
