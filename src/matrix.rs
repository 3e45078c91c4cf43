//! Label matrices and their derived representations.
//!
//! [`LabelMatrix`](LabelMatrix) is the `n × m` integer matrix
//! produced by an applier (`0` = abstain).
//! [`AugmentedMatrix`](AugmentedMatrix) expands it into the one-hot
//! indicator form the generative model consumes,
//! and [`moment_matrix`](moment_matrix) reduces that to the
//! empirical second-moment matrix `O`.

pub(crate) mod label_matrix;
pub(crate) mod augmented;
pub(crate) mod moment;


pub use label_matrix::LabelMatrix;
pub use augmented::{AugmentedMatrix, ColumnLayout, ColumnInfo};
pub use moment::moment_matrix;
