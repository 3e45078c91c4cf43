//! Learned parameters of a fitted label model.
use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::matrix::ColumnLayout;


/// Everything a fitted [`LabelModel`](crate::model::LabelModel)
/// needs for inference:
/// the class-conditional vote probabilities, the class prior,
/// and the column layout the parameters are indexed against.
///
/// Parameters round-trip through JSON,
/// reconstructing an inference-ready model without retraining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelModelParams {
    /// Number of classes (excluding abstain).
    pub cardinality: usize,
    /// Number of labeling functions at training time.
    pub n_lf: usize,
    /// `d × k`: row `(j, c)` holds `P(λ_j = c | Y = y)` per class `y`.
    pub mu: Vec<Vec<f64>>,
    /// The class prior `P(Y = y)`.
    pub class_balance: Vec<f64>,
    /// The positional column layout `mu` is indexed against.
    pub layout: ColumnLayout,
}


impl LabelModelParams {
    /// Writes the parameters as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }


    /// Reads parameters written by
    /// [`save`](LabelModelParams::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let params = serde_json::from_str(&json)?;
        Ok(params)
    }
}
