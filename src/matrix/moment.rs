use crate::common::utils;
use super::augmented::AugmentedMatrix;


/// Computes the empirical second-moment matrix
/// `O = L_augᵀ L_aug / n` of an augmented label matrix.
///
/// `O` is symmetric positive semi-definite;
/// its diagonal holds per-column coverage rates and its
/// off-diagonal entries pairwise co-occurrence rates.
/// Together with the layout dimensions it is the sufficient
/// statistic the generative model fits against.
pub fn moment_matrix(l_aug: &AugmentedMatrix) -> Vec<Vec<f64>> {
    utils::gram_matrix(l_aug.rows())
}
