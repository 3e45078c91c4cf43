//! Error types shared across the crate.
use thiserror::Error;


/// Failure of a labeling function body.
///
/// These are recoverable at the applier level:
/// a fault-tolerant labeling function maps any of them to an abstain.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LfError {
    /// The data point has no field of the requested name.
    #[error("missing field `{0}`")]
    MissingField(String),

    /// The field exists but holds a value of another type.
    #[error("field `{field}` is not of type {expected}")]
    WrongType {
        /// Name of the offending field.
        field: String,
        /// The type the labeling function asked for.
        expected: &'static str,
    },

    /// Any other failure raised by the labeling function body.
    #[error("{0}")]
    Custom(String),
}


/// The error type for every fallible operation of this crate.
#[derive(Debug, Error)]
pub enum WeakLabelError {
    /// A preprocessor produced a null result.
    /// Fatal for the application run; never retried.
    #[error("preprocessor `{preprocessor}` returned no record")]
    Preprocessor {
        /// Name of the offending preprocessor.
        preprocessor: String,
    },

    /// A labeling function without the fault-tolerance flag failed.
    #[error("labeling function `{lf}` failed: {source}")]
    LfExecution {
        /// Name of the offending labeling function.
        lf: String,
        /// The original failure.
        source: LfError,
    },

    /// The label matrix violates the {0, 1, ..., k} contract.
    #[error("invalid label matrix: {0}")]
    InvalidLabelMatrix(String),

    /// The requested metric is not in the registry.
    #[error("unknown metric `{0}`")]
    UnknownMetric(String),

    /// A metric was called without an input it consumes.
    #[error("metric input error: {0}")]
    MetricInput(String),

    /// The requested optimizer is not implemented.
    #[error("unknown optimizer `{0}`")]
    UnknownOptimizer(String),

    /// `predict_proba` was called on a model that was never fitted.
    #[error("the label model is not fitted; call `fit` first")]
    ModelNotFitted,

    /// The label matrix at inference time disagrees with the one
    /// the model was trained on.
    #[error("shape mismatch: expected {expected} {what}, got {got}")]
    ShapeMismatch {
        /// The dimension that disagrees.
        what: &'static str,
        /// The value at training time.
        expected: usize,
        /// The value in the given matrix.
        got: usize,
    },

    /// Reading or writing model parameters failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Model parameters could not be (de)serialized.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    /// Building the summary DataFrame failed.
    #[error(transparent)]
    DataFrame(#[from] polars::prelude::PolarsError),
}


/// A `Result` alias with [`WeakLabelError`](WeakLabelError) baked in.
pub type Result<T> = std::result::Result<T, WeakLabelError>;
