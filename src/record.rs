//! Data-point representation for labeling functions.
//!
//! A [`Record`](Record) is a collection of named fields,
//! the only thing a labeling function is allowed to see.
//! Records are built directly, from `(name, value)` pairs,
//! or materialized from the rows of a `polars::DataFrame`.

pub(crate) mod field;
pub(crate) mod record_struct;


pub use field::FieldValue;
pub use record_struct::{Record, records_from_dataframe};
