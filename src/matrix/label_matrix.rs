use crate::error::{Result, WeakLabelError};


/// An `n × m` matrix of integer labels in `{0, 1, ..., k}`,
/// rows indexing data points and columns labeling functions.
/// `0` means abstain.
///
/// The matrix is immutable after construction;
/// analysis and modeling never relabel it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatrix {
    values: Vec<i64>,
    n_row: usize,
    n_col: usize,
}


impl LabelMatrix {
    /// Builds a label matrix from row vectors.
    ///
    /// Fails with an invalid-label-matrix error when rows are ragged,
    /// the matrix is empty, or any entry is negative.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self> {
        let n_row = rows.len();
        if n_row == 0 {
            return Err(WeakLabelError::InvalidLabelMatrix(
                "the matrix has no rows".to_string()
            ));
        }
        let n_col = rows[0].len();
        if n_col == 0 {
            return Err(WeakLabelError::InvalidLabelMatrix(
                "the matrix has no columns".to_string()
            ));
        }

        let mut values = Vec::with_capacity(n_row * n_col);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_col {
                let msg = format!(
                    "row {i} has {} entries, expected {n_col}", row.len(),
                );
                return Err(WeakLabelError::InvalidLabelMatrix(msg));
            }
            if let Some(bad) = row.iter().find(|&&v| v < 0) {
                let msg = format!(
                    "negative label {bad} at row {i}; \
                     labels must be in {{0, 1, ..., k}}"
                );
                return Err(WeakLabelError::InvalidLabelMatrix(msg));
            }
            values.extend(row);
        }

        Ok(Self { values, n_row, n_col })
    }


    /// Returns the pair of the number of data points
    /// and the number of labeling functions.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_row, self.n_col)
    }


    /// The entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.values[row * self.n_col + col]
    }


    /// The `row`-th label vector.
    pub fn row(&self, row: usize) -> &[i64] {
        let lo = row * self.n_col;
        &self.values[lo..lo + self.n_col]
    }


    /// Iterates over all rows.
    pub fn rows(&self) -> impl Iterator<Item = &[i64]> {
        self.values.chunks(self.n_col)
    }


    /// The `col`-th column as a fresh vector.
    pub fn column(&self, col: usize) -> Vec<i64> {
        (0..self.n_row)
            .map(|i| self.get(i, col))
            .collect()
    }


    /// The largest label in the matrix.
    /// Used to infer cardinality when the caller declares none.
    pub fn max_label(&self) -> i64 {
        self.values.iter().copied().max().unwrap_or(0)
    }
}
