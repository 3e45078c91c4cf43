//! Defines `LabelModel`, the generative label model.
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use rayon::prelude::*;

use std::path::Path;

use crate::common::utils;
use crate::error::{Result, WeakLabelError};
use crate::matrix::{moment_matrix, AugmentedMatrix, LabelMatrix};
use crate::metrics::prob_to_pred;
use super::optimizer::{Optimizer, OptimizerKind};
use super::params::LabelModelParams;
use super::train_logger::TrainLogger;


// Initial accuracy assigned to every labeling function
// before training.
const PREC_INIT: f64 = 0.7;

// Scale of the symmetry-breaking noise on the initial parameters.
const INIT_NOISE: f64 = 0.01;

// Learned probabilities are clamped away from {0, 1} so that
// log-space inference stays finite for classes that were
// never covered.
const MU_CLAMP: f64 = 0.01;


/// The generative label model.
///
/// `LabelModel` consumes a label matrix (one row per data point,
/// one column per labeling function, `0` meaning abstain)
/// and, without any gold labels, learns per-function
/// class-conditional vote probabilities by matching the empirical
/// second moments of the one-hot expanded matrix.
/// Inference combines the learned parameters and the class prior
/// into a posterior distribution per data point.
///
/// The model must be fitted before predicting;
/// refitting resets all learned state.
///
/// # Example
/// ```no_run
/// use weaklabel::prelude::*;
///
/// let labels = LabelMatrix::from_rows(vec![
///     vec![1, 1, 0],
///     vec![2, 0, 2],
///     vec![1, 1, 1],
/// ]).unwrap();
///
/// let mut model = LabelModel::new()
///     .cardinality(2)
///     .n_epochs(500)
///     .lr(0.01)
///     .seed(1234);
/// model.fit(&labels).unwrap();
///
/// let probs = model.predict_proba(&labels).unwrap();
/// assert_eq!(probs.len(), 3);
/// ```
pub struct LabelModel {
    cardinality: Option<usize>,
    n_epochs: usize,
    lr: f64,
    l2: f64,
    tolerance: f64,
    seed: Option<u64>,
    optimizer: OptimizerKind,
    class_balance: Option<Vec<f64>>,
    dependencies: Vec<Vec<usize>>,
    verbose: bool,
    log_every: usize,

    fitted: Option<LabelModelParams>,
}


impl Default for LabelModel {
    fn default() -> Self {
        Self::new()
    }
}


impl LabelModel {
    /// Initializes an unfitted model with default training settings.
    pub fn new() -> Self {
        Self {
            cardinality: None,
            n_epochs: 100,
            lr: 0.01,
            l2: 0.0,
            tolerance: 1e-10,
            seed: None,
            optimizer: OptimizerKind::Sgd,
            class_balance: None,
            dependencies: Vec::new(),
            verbose: false,
            log_every: 10,
            fitted: None,
        }
    }


    /// Declares the number of classes.
    /// Without a declaration the cardinality is inferred from the
    /// largest label in the training matrix.
    pub fn cardinality(mut self, cardinality: usize) -> Self {
        self.cardinality = Some(cardinality);
        self
    }


    /// Sets the iteration budget.
    /// Training never exceeds it, converged or not.
    pub fn n_epochs(mut self, n_epochs: usize) -> Self {
        self.n_epochs = n_epochs;
        self
    }


    /// Sets the learning rate.
    pub fn lr(mut self, lr: f64) -> Self {
        self.lr = lr;
        self
    }


    /// Sets the strength of the pull toward the initial parameters.
    pub fn l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }


    /// Sets the loss-decrease tolerance that stops training early.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }


    /// Seeds the parameter initialization for reproducible training.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }


    /// Selects the optimizer by registry name (`"sgd"` or `"adam"`).
    pub fn optimizer(mut self, name: &str) -> Result<Self> {
        self.optimizer = OptimizerKind::from_name(name)?;
        Ok(self)
    }


    /// Declares the class prior.
    /// Defaults to the uniform distribution.
    pub fn class_balance(mut self, balance: &[f64]) -> Self {
        self.class_balance = Some(balance.to_vec());
        self
    }


    /// Declares cliques of labeling functions whose agreement is
    /// explained by dependence rather than accuracy;
    /// their pairwise moments are excluded from the objective.
    pub fn dependencies(mut self, cliques: &[Vec<usize>]) -> Self {
        self.dependencies = cliques.to_vec();
        self
    }


    /// Prints training progress.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }


    /// Sets the epoch cadence of progress lines.
    pub fn log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }


    /// Whether the model has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }


    /// The learned parameters, once fitted.
    pub fn params(&self) -> Option<&LabelModelParams> {
        self.fitted.as_ref()
    }


    /// Fits the model to the given label matrix.
    ///
    /// Builds the one-hot expansion, reduces it to the empirical
    /// moment matrix `O`, and minimizes the moment-matching loss
    /// over the class-conditional vote probabilities `μ`:
    /// the masked discrepancy between `O` and `μ P μᵀ`,
    /// plus the marginal constraint `μ p = diag(O)`.
    /// Stops on the loss tolerance or the epoch budget,
    /// whichever comes first.
    pub fn fit(&mut self, labels: &LabelMatrix) -> Result<()> {
        // Refitting starts from scratch.
        self.fitted = None;

        let (_, n_lf) = labels.shape();
        let cardinality = self.infer_cardinality(labels)?;
        let balance = self.validated_balance(cardinality)?;

        for clique in &self.dependencies {
            if let Some(&bad) = clique.iter().find(|&&j| j >= n_lf) {
                let msg = format!(
                    "dependency member {bad} is not a valid \
                     labeling function index (m = {n_lf})"
                );
                return Err(WeakLabelError::InvalidLabelMatrix(msg));
            }
        }

        // Declared dependencies act through the moment mask,
        // so the model itself trains on the base indicator blocks.
        let l_aug = AugmentedMatrix::build(labels, cardinality, &[])?;
        let o = moment_matrix(&l_aug);
        let (_, d) = l_aug.shape();

        let mask = self.moment_mask(n_lf, cardinality, d);
        let mu_init = self.initial_mu(&o, n_lf, cardinality, &balance);
        let mut mu = self.perturbed(&mu_init);

        let logger = TrainLogger::new(self.log_every, self.verbose);
        let mut optimizer =
            Optimizer::new(self.optimizer, d, cardinality);

        let mut previous = f64::INFINITY;
        let mut last_loss = f64::INFINITY;
        let mut last_epoch = 0;
        for epoch in 1..=self.n_epochs {
            let (loss, grad) =
                self.loss_and_grad(&mu, &mu_init, &o, &mask, &balance);
            logger.log(epoch, loss);
            last_loss = loss;
            last_epoch = epoch;

            if (previous - loss).abs() < self.tolerance {
                break;
            }
            previous = loss;

            optimizer.step(&mut mu, &grad, self.lr);
            clamp_matrix(&mut mu, 0.0, 1.0);
        }
        logger.finish(last_epoch, last_loss);

        clamp_matrix(&mut mu, MU_CLAMP, 1.0 - MU_CLAMP);

        self.fitted = Some(LabelModelParams {
            cardinality,
            n_lf,
            mu,
            class_balance: balance,
            layout: l_aug.layout().clone(),
        });
        Ok(())
    }


    /// Returns the posterior class distribution per data point.
    ///
    /// Rows sum to `1` within floating tolerance;
    /// a row without any vote falls back to the class prior.
    /// The matrix must have the same labeling function count and
    /// label range as the training matrix.
    pub fn predict_proba(&self, labels: &LabelMatrix)
        -> Result<Vec<Vec<f64>>>
    {
        let params = self.fitted.as_ref()
            .ok_or(WeakLabelError::ModelNotFitted)?;

        let (_, n_lf) = labels.shape();
        if n_lf != params.n_lf {
            return Err(WeakLabelError::ShapeMismatch {
                what: "labeling functions",
                expected: params.n_lf,
                got: n_lf,
            });
        }
        let max_label = labels.max_label() as usize;
        if max_label > params.cardinality {
            return Err(WeakLabelError::ShapeMismatch {
                what: "classes",
                expected: params.cardinality,
                got: max_label,
            });
        }

        let log_prior = params.class_balance.iter()
            .map(|&p| p.ln())
            .collect::<Vec<_>>();

        let probs = (0..labels.shape().0).into_par_iter()
            .map(|i| {
                let row = labels.row(i);
                let mut logits = log_prior.clone();
                for (j, &vote) in row.iter().enumerate() {
                    if vote > 0 {
                        let col = params.layout.base_column(j, vote);
                        logits.iter_mut()
                            .zip(&params.mu[col])
                            .for_each(|(l, &m)| { *l += m.ln(); });
                    }
                }
                softmax(&logits)
            })
            .collect::<Vec<_>>();
        Ok(probs)
    }


    /// Returns hard predictions, the `1`-indexed posterior argmax.
    pub fn predict(&self, labels: &LabelMatrix) -> Result<Vec<i64>> {
        let probs = self.predict_proba(labels)?;
        Ok(prob_to_pred(&probs))
    }


    /// Per-function learned accuracy estimates:
    /// the probability of voting the true class, given a vote.
    pub fn learned_accuracies(&self) -> Result<Vec<f64>> {
        let params = self.fitted.as_ref()
            .ok_or(WeakLabelError::ModelNotFitted)?;
        let k = params.cardinality;

        let accuracies = (0..params.n_lf)
            .map(|j| {
                let mut correct = 0.0;
                let mut voted = 0.0;
                for (y, &p) in params.class_balance.iter().enumerate() {
                    for c in 1..=k {
                        let col = params.layout.base_column(j, c as i64);
                        voted += p * params.mu[col][y];
                        if c == y + 1 {
                            correct += p * params.mu[col][y];
                        }
                    }
                }
                if voted == 0.0 { 0.0 } else { correct / voted }
            })
            .collect();
        Ok(accuracies)
    }


    /// Writes the learned parameters as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let params = self.fitted.as_ref()
            .ok_or(WeakLabelError::ModelNotFitted)?;
        params.save(path)
    }


    /// Reconstructs an inference-ready model from saved parameters.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let params = LabelModelParams::load(path)?;
        let model = Self {
            cardinality: Some(params.cardinality),
            fitted: Some(params),
            ..Self::new()
        };
        Ok(model)
    }


    fn infer_cardinality(&self, labels: &LabelMatrix) -> Result<usize> {
        if let Some(cardinality) = self.cardinality {
            return Ok(cardinality);
        }
        let max_label = labels.max_label();
        if max_label < 2 {
            let msg = format!(
                "cannot infer cardinality from a matrix with \
                 maximum label {max_label}; declare it explicitly"
            );
            return Err(WeakLabelError::InvalidLabelMatrix(msg));
        }
        Ok(max_label as usize)
    }


    fn validated_balance(&self, cardinality: usize) -> Result<Vec<f64>> {
        match &self.class_balance {
            None => Ok(vec![1.0 / cardinality as f64; cardinality]),
            Some(balance) => {
                if balance.len() != cardinality {
                    let msg = format!(
                        "class balance has {} entries, expected {cardinality}",
                        balance.len(),
                    );
                    return Err(WeakLabelError::InvalidLabelMatrix(msg));
                }
                let total = balance.iter().sum::<f64>();
                if balance.iter().any(|&p| p <= 0.0)
                    || (total - 1.0).abs() > 1e-6
                {
                    return Err(WeakLabelError::InvalidLabelMatrix(
                        "class balance must be a distribution \
                         with positive entries".to_string()
                    ));
                }
                Ok(balance.clone())
            },
        }
    }


    /// The objective only matches moments between columns of
    /// different, non-dependent labeling functions.
    fn moment_mask(&self, n_lf: usize, cardinality: usize, d: usize)
        -> Vec<Vec<bool>>
    {
        let mut dependent = vec![vec![false; n_lf]; n_lf];
        for clique in &self.dependencies {
            for &a in clique {
                for &b in clique {
                    dependent[a][b] = true;
                }
            }
        }

        (0..d).map(|a| {
                let lf_a = a / cardinality;
                (0..d).map(|b| {
                        let lf_b = b / cardinality;
                        lf_a != lf_b && !dependent[lf_a][lf_b]
                    })
                    .collect()
            })
            .collect()
    }


    /// Initial `μ`: each function votes its observed rate,
    /// assumed correct with probability `PREC_INIT`.
    fn initial_mu(
        &self,
        o: &[Vec<f64>],
        n_lf: usize,
        cardinality: usize,
        balance: &[f64],
    ) -> Vec<Vec<f64>>
    {
        let d = n_lf * cardinality;
        let mut mu = vec![vec![0.0; cardinality]; d];
        for (a, row) in mu.iter_mut().enumerate() {
            let class = a % cardinality;
            let rate = o[a][a] * PREC_INIT / balance[class];
            row[class] = rate.clamp(0.0, 1.0);
        }
        mu
    }


    fn perturbed(&self, mu_init: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let noise = Normal::<f64>::new(0.0, INIT_NOISE).unwrap();

        mu_init.iter()
            .map(|row| {
                row.iter()
                    .map(|&m| (m + noise.sample(&mut rng)).clamp(0.0, 1.0))
                    .collect()
            })
            .collect()
    }


    /// The loss and its closed-form gradient.
    ///
    /// `loss = ‖(O − μPμᵀ) ⊙ mask‖² + ‖μp − diag(O)‖²
    ///         + l2 ‖μ − μ₀‖²`
    fn loss_and_grad(
        &self,
        mu: &[Vec<f64>],
        mu_init: &[Vec<f64>],
        o: &[Vec<f64>],
        mask: &[Vec<bool>],
        balance: &[f64],
    ) -> (f64, Vec<Vec<f64>>)
    {
        let d = mu.len();
        let k = balance.len();

        // D = (μPμᵀ − O) ⊙ mask, symmetric.
        let z = utils::quadratic_form(mu, balance);
        let diff = (0..d)
            .map(|a| {
                (0..d).map(|b| {
                        if mask[a][b] { z[a][b] - o[a][b] } else { 0.0 }
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let loss_1 = diff.iter()
            .flatten()
            .map(|v| v * v)
            .sum::<f64>();

        // Marginal residual: μp − diag(O).
        let residual = mu.iter()
            .enumerate()
            .map(|(a, row)| utils::inner_product(row, balance) - o[a][a])
            .collect::<Vec<_>>();
        let loss_2 = residual.iter().map(|r| r * r).sum::<f64>();

        let loss_reg = self.l2 * mu.iter()
            .zip(mu_init)
            .flat_map(|(row, row0)| row.iter().zip(row0))
            .map(|(m, m0)| (m - m0).powi(2))
            .sum::<f64>();

        // ∂loss₁/∂μ = 4 (D μ) diag(p);
        // ∂loss₂/∂μ = 2 r pᵀ;  ∂reg/∂μ = 2 l2 (μ − μ₀).
        let dmu = utils::matrix_product(&diff, mu);
        let grad = (0..d)
            .map(|a| {
                (0..k).map(|y| {
                        4.0 * dmu[a][y] * balance[y]
                            + 2.0 * residual[a] * balance[y]
                            + 2.0 * self.l2 * (mu[a][y] - mu_init[a][y])
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        (loss_1 + loss_2 + loss_reg, grad)
    }
}


fn clamp_matrix(matrix: &mut [Vec<f64>], lo: f64, hi: f64) {
    matrix.iter_mut()
        .for_each(|row| {
            row.iter_mut()
                .for_each(|v| { *v = v.clamp(lo, hi); });
        });
}


/// Numerically stable softmax; the output sums to `1`.
fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter()
        .copied()
        .fold(f64::MIN, f64::max);
    let mut probs = logits.iter()
        .map(|&l| (l - max).exp())
        .collect::<Vec<_>>();
    utils::normalize(&mut probs);
    probs
}
