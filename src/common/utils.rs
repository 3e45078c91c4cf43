//! This file provides some common functions
//! such as dense matrix products over `Vec<Vec<f64>>`.
use rayon::prelude::*;


/// Compute the inner-product of the given two slices.
#[inline(always)]
pub(crate) fn inner_product(v1: &[f64], v2: &[f64]) -> f64 {
    v1.iter()
        .zip(v2)
        .map(|(a, b)| a * b)
        .sum::<f64>()
}


/// Computes `Aᵀ A / n` for an `n × d` matrix `A`,
/// where `n == a.len()`.
/// The result is a symmetric `d × d` matrix.
#[inline(always)]
pub(crate) fn gram_matrix(a: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = a.len();
    assert!(n > 0);
    let d = a[0].len();

    let mut ans = (0..d).into_par_iter()
        .map(|i| {
            (0..d).map(|j| {
                    if j < i { return 0.0; }
                    a.iter()
                        .map(|row| row[i] * row[j])
                        .sum::<f64>() / n as f64
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    // Mirror the upper triangle.
    for i in 0..d {
        for j in 0..i {
            ans[i][j] = ans[j][i];
        }
    }
    ans
}


/// Computes `A B` for matrices `A` and `B`.
#[inline(always)]
pub(crate) fn matrix_product(m1: &[Vec<f64>], m2: &[Vec<f64>])
    -> Vec<Vec<f64>>
{
    // Check the shape condition.
    assert_eq!(m1[0].len(), m2.len());

    let nrow = m1.len();
    let ncol = m2[0].len();
    let nmid = m1[0].len();

    let mut ans = vec![vec![0.0; ncol]; nrow];
    for i in 0..nrow {
        for j in 0..ncol {
            for k in 0..nmid {
                ans[i][j] += m1[i][k] * m2[k][j];
            }
        }
    }
    ans
}


/// Computes `A diag(p) Aᵀ` for a `d × k` matrix `A`
/// and a `k`-dimensional vector `p`.
#[inline(always)]
pub(crate) fn quadratic_form(a: &[Vec<f64>], p: &[f64]) -> Vec<Vec<f64>> {
    let d = a.len();

    (0..d).into_par_iter()
        .map(|i| {
            (0..d).map(|j| {
                    a[i].iter()
                        .zip(&a[j])
                        .zip(p)
                        .map(|((&ai, &aj), &w)| ai * w * aj)
                        .sum::<f64>()
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
}


/// Normalize `items` so that its entries sum to `1`.
#[inline(always)]
pub(crate) fn normalize(items: &mut [f64]) {
    let z = items.iter()
        .map(|it| it.abs())
        .sum::<f64>();

    assert_ne!(z, 0.0);

    items.iter_mut()
        .for_each(|item| { *item /= z; });
}
