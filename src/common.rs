//! Defines some common functions used in this library.

/// Defines some useful functions such as dense matrix products.
pub(crate) mod utils;
