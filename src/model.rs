//! The generative label model.
//!
//! [`LabelModel`](LabelModel) estimates per-function accuracy
//! parameters from labeling function agreement statistics alone
//! and produces calibrated probabilistic labels.

pub(crate) mod label_model;
pub(crate) mod optimizer;
pub(crate) mod params;
pub(crate) mod train_logger;


pub use label_model::LabelModel;
pub use optimizer::OptimizerKind;
pub use params::LabelModelParams;
