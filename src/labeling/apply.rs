//! Appliers: the execution backends that turn labeling functions
//! and a collection of data points into a label matrix.
use polars::prelude::*;
use rayon::prelude::*;

use crate::error::Result;
use crate::matrix::LabelMatrix;
use crate::record::{records_from_dataframe, Record};
use super::lf::LabelingFunction;


/// Per-run side-channel counts collected while applying
/// labeling functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyDiagnostics {
    failures: Vec<usize>,
}


impl ApplyDiagnostics {
    fn new(n_lf: usize) -> Self {
        Self { failures: vec![0; n_lf] }
    }


    fn merge(mut self, other: Self) -> Self {
        self.failures.iter_mut()
            .zip(other.failures)
            .for_each(|(a, b)| { *a += b; });
        self
    }


    /// Number of body failures recovered to abstain,
    /// per labeling function in definition order.
    pub fn failures(&self) -> &[usize] {
        &self.failures
    }
}


/// An execution backend for labeling functions.
///
/// Every implementation must produce a bit-identical label matrix
/// for the same labeling functions and data ordering;
/// only the row-materialization strategy differs.
pub trait LfApplier {
    /// Applies the given labeling functions to every data point,
    /// producing the label matrix and its diagnostics.
    fn apply(&self, lfs: &[LabelingFunction])
        -> Result<(LabelMatrix, ApplyDiagnostics)>;
}


/// Labels one record with every labeling function in order.
fn label_record(
    lfs: &[LabelingFunction],
    x: &Record,
) -> Result<(Vec<i64>, Vec<usize>)>
{
    let mut row = Vec::with_capacity(lfs.len());
    let mut failures = vec![0; lfs.len()];
    for (j, lf) in lfs.iter().enumerate() {
        let (label, failed) = lf.label_counted(x)?;
        if failed {
            failures[j] += 1;
        }
        row.push(label);
    }
    Ok((row, failures))
}


fn merge_rows(
    n_lf: usize,
    labeled: Vec<(Vec<i64>, Vec<usize>)>,
) -> Result<(LabelMatrix, ApplyDiagnostics)>
{
    let mut diagnostics = ApplyDiagnostics::new(n_lf);
    let mut rows = Vec::with_capacity(labeled.len());
    for (row, failures) in labeled {
        diagnostics = diagnostics.merge(ApplyDiagnostics { failures });
        rows.push(row);
    }
    let matrix = LabelMatrix::from_rows(rows)?;
    Ok((matrix, diagnostics))
}


/// Applies labeling functions by in-memory sequential iteration.
pub struct SequentialApplier<'a> {
    records: &'a [Record],
}


impl<'a> SequentialApplier<'a> {
    /// Creates an applier over the given records.
    pub fn new(records: &'a [Record]) -> Self {
        Self { records }
    }
}


impl LfApplier for SequentialApplier<'_> {
    fn apply(&self, lfs: &[LabelingFunction])
        -> Result<(LabelMatrix, ApplyDiagnostics)>
    {
        let labeled = self.records.iter()
            .map(|x| label_record(lfs, x))
            .collect::<Result<Vec<_>>>()?;
        merge_rows(lfs.len(), labeled)
    }
}


/// Applies labeling functions row-partitioned over a thread pool.
///
/// Output is identical to [`SequentialApplier`](SequentialApplier);
/// rows share no mutable state beyond the preprocessor caches,
/// which are safe for concurrent use.
pub struct ParallelApplier<'a> {
    records: &'a [Record],
}


impl<'a> ParallelApplier<'a> {
    /// Creates an applier over the given records.
    pub fn new(records: &'a [Record]) -> Self {
        Self { records }
    }
}


impl LfApplier for ParallelApplier<'_> {
    fn apply(&self, lfs: &[LabelingFunction])
        -> Result<(LabelMatrix, ApplyDiagnostics)>
    {
        let labeled = self.records.par_iter()
            .map(|x| label_record(lfs, x))
            .collect::<Result<Vec<_>>>()?;
        merge_rows(lfs.len(), labeled)
    }
}


/// Applies labeling functions over the rows of a `polars::DataFrame`.
pub struct DataFrameApplier<'a> {
    data: &'a DataFrame,
}


impl<'a> DataFrameApplier<'a> {
    /// Creates an applier over the given DataFrame.
    pub fn new(data: &'a DataFrame) -> Self {
        Self { data }
    }
}


impl LfApplier for DataFrameApplier<'_> {
    fn apply(&self, lfs: &[LabelingFunction])
        -> Result<(LabelMatrix, ApplyDiagnostics)>
    {
        let records = records_from_dataframe(self.data)?;
        SequentialApplier::new(&records).apply(lfs)
    }
}
