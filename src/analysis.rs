//! Diagnostic statistics over a label matrix.

pub(crate) mod lf_analysis;


pub use lf_analysis::LfAnalysis;
