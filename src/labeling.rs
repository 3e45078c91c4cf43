//! Labeling functions and their execution.
//!
//! This module provides the construction surface for labeling functions
//! ([`LfBuilder`](LfBuilder)), their preprocessor chains, and the
//! appliers turning a collection of data points into a
//! [`LabelMatrix`](crate::matrix::LabelMatrix).

pub(crate) mod preprocess;
pub(crate) mod lf;
pub(crate) mod apply;


pub use preprocess::{
    Preprocessor,
    LambdaPreprocessor,
    MemoizedPreprocessor,
    PreprocessCache,
};

pub use lf::{
    LabelingFunction,
    LfBuilder,
    Resources,
    ABSTAIN,
};

pub use apply::{
    LfApplier,
    SequentialApplier,
    ParallelApplier,
    DataFrameApplier,
    ApplyDiagnostics,
};
