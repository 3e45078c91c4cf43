//! Exports the standard weak supervision surface.
//!
pub use crate::record::{
    FieldValue,
    Record,
    records_from_dataframe,
};


pub use crate::labeling::{
    // Construction surface
    LabelingFunction,
    LfBuilder,
    Resources,
    ABSTAIN,

    // Preprocessing
    Preprocessor,
    LambdaPreprocessor,
    MemoizedPreprocessor,
    PreprocessCache,

    // Execution backends ------------------------
    LfApplier,
    SequentialApplier,
    ParallelApplier,
    DataFrameApplier,
    ApplyDiagnostics,
};


pub use crate::matrix::{
    LabelMatrix,
    AugmentedMatrix,
    ColumnLayout,
    moment_matrix,
};


pub use crate::analysis::LfAnalysis;


pub use crate::model::{
    LabelModel,
    LabelModelParams,
    OptimizerKind,
};


pub use crate::metrics::{
    metric_score,
    Metric,
    MetricInput,
    MetricParams,
    filter_labels,
    prob_to_pred,
    pred_to_prob,
    convert_labels,
    LabelConvention,
};


pub use crate::error::{
    LfError,
    Result,
    WeakLabelError,
};
