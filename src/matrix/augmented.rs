use serde::{Serialize, Deserialize};

use crate::error::{Result, WeakLabelError};
use super::label_matrix::LabelMatrix;


/// Describes one column of an augmented matrix:
/// which labeling functions it involves and which vote pattern
/// sets it to `1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Labeling function indices, in declaration order.
    pub lfs: Vec<usize>,
    /// The votes (one per member of `lfs`) this column indicates.
    pub classes: Vec<i64>,
}


/// The positional column layout of an augmented matrix.
///
/// Learned model parameters are indexed against this layout,
/// so it is fully determined by
/// (labeling function order, class order, clique declaration order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// Number of classes (excluding abstain).
    pub cardinality: usize,
    /// Number of labeling functions.
    pub n_lf: usize,
    /// One entry per column.
    pub columns: Vec<ColumnInfo>,
}


impl ColumnLayout {
    /// Total number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }


    /// Index of the base indicator column for
    /// labeling function `lf` voting `class`.
    pub fn base_column(&self, lf: usize, class: i64) -> usize {
        lf * self.cardinality + (class as usize - 1)
    }
}


/// The one-hot expansion of a label matrix.
///
/// Each labeling function column becomes `cardinality` indicator
/// columns, one per class; abstains stay all-zero.
/// Declared cliques add product-of-indicator columns for every
/// vote combination actually observed,
/// exposing pairwise and higher-order agreement to the moment matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedMatrix {
    rows: Vec<Vec<f64>>,
    layout: ColumnLayout,
}


impl AugmentedMatrix {
    /// Expands `labels` with the given cardinality and clique set.
    ///
    /// Clique members must be valid labeling function indices;
    /// a clique needs at least two members.
    pub fn build(
        labels: &LabelMatrix,
        cardinality: usize,
        cliques: &[Vec<usize>],
    ) -> Result<Self>
    {
        let (n_row, n_lf) = labels.shape();

        if cardinality < 2 {
            let msg = format!(
                "cardinality must be at least 2, got {cardinality}"
            );
            return Err(WeakLabelError::InvalidLabelMatrix(msg));
        }
        let max_label = labels.max_label();
        if max_label > cardinality as i64 {
            let msg = format!(
                "label {max_label} exceeds cardinality {cardinality}"
            );
            return Err(WeakLabelError::InvalidLabelMatrix(msg));
        }
        for clique in cliques {
            if clique.len() < 2 {
                return Err(WeakLabelError::InvalidLabelMatrix(
                    "a clique needs at least two members".to_string()
                ));
            }
            if let Some(&bad) = clique.iter().find(|&&j| j >= n_lf) {
                let msg = format!(
                    "clique member {bad} is not a valid \
                     labeling function index (m = {n_lf})"
                );
                return Err(WeakLabelError::InvalidLabelMatrix(msg));
            }
        }

        let mut columns = Vec::with_capacity(n_lf * cardinality);
        for lf in 0..n_lf {
            for class in 1..=cardinality as i64 {
                columns.push(ColumnInfo { lfs: vec![lf], classes: vec![class] });
            }
        }

        // One product column per vote pattern the clique actually
        // realizes; never-observed patterns would be all-zero columns.
        // Sorting keeps the layout independent of the row order.
        for clique in cliques {
            let mut patterns = Vec::new();
            for row in labels.rows() {
                let votes = clique.iter()
                    .map(|&j| row[j])
                    .collect::<Vec<_>>();
                if votes.iter().all(|&v| v > 0) && !patterns.contains(&votes) {
                    patterns.push(votes);
                }
            }
            patterns.sort();

            for classes in patterns {
                columns.push(ColumnInfo { lfs: clique.clone(), classes });
            }
        }

        let layout = ColumnLayout { cardinality, n_lf, columns };

        let rows = (0..n_row)
            .map(|i| {
                let row = labels.row(i);
                layout.columns.iter()
                    .map(|col| {
                        let hit = col.lfs.iter()
                            .zip(&col.classes)
                            .all(|(&j, &c)| row[j] == c);
                        if hit { 1.0 } else { 0.0 }
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        Ok(Self { rows, layout })
    }


    /// Returns the pair of the number of data points
    /// and the number of columns.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.layout.width())
    }


    /// The indicator rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }


    /// The positional column layout.
    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }
}
