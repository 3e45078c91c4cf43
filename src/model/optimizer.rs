//! Gradient steppers for the moment-matching objective.
use crate::error::{Result, WeakLabelError};


const ADAM_BETA1: f64 = 0.9;
const ADAM_BETA2: f64 = 0.999;
const ADAM_EPS: f64 = 1e-8;


/// The optimizers the label model can train with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerKind {
    /// Plain gradient descent.
    Sgd,
    /// Adam with the usual default moment decays.
    Adam,
}


impl OptimizerKind {
    /// Looks an optimizer up by name.
    /// Unrecognized names fail fast.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "sgd" => Ok(Self::Sgd),
            "adam" => Ok(Self::Adam),
            _ => Err(WeakLabelError::UnknownOptimizer(name.to_string())),
        }
    }
}


/// A stepper holding any per-parameter state the optimizer needs.
pub(crate) struct Optimizer {
    kind: OptimizerKind,
    step_count: usize,

    // Adam first/second moment estimates, one per parameter.
    moment1: Vec<Vec<f64>>,
    moment2: Vec<Vec<f64>>,
}


impl Optimizer {
    pub(crate) fn new(kind: OptimizerKind, n_row: usize, n_col: usize)
        -> Self
    {
        Self {
            kind,
            step_count: 0,
            moment1: vec![vec![0.0; n_col]; n_row],
            moment2: vec![vec![0.0; n_col]; n_row],
        }
    }


    /// Applies one gradient step to `params` in place.
    pub(crate) fn step(
        &mut self,
        params: &mut [Vec<f64>],
        grad: &[Vec<f64>],
        rate: f64,
    )
    {
        self.step_count += 1;
        match self.kind {
            OptimizerKind::Sgd => {
                params.iter_mut()
                    .zip(grad)
                    .for_each(|(row, drow)| {
                        row.iter_mut()
                            .zip(drow)
                            .for_each(|(p, dp)| { *p -= rate * dp; });
                    });
            },
            OptimizerKind::Adam => {
                let t = self.step_count as i32;
                let bias1 = 1.0 - ADAM_BETA1.powi(t);
                let bias2 = 1.0 - ADAM_BETA2.powi(t);
                for (i, row) in params.iter_mut().enumerate() {
                    for (j, p) in row.iter_mut().enumerate() {
                        let g = grad[i][j];
                        let m = &mut self.moment1[i][j];
                        *m = ADAM_BETA1 * *m + (1.0 - ADAM_BETA1) * g;
                        let v = &mut self.moment2[i][j];
                        *v = ADAM_BETA2 * *v + (1.0 - ADAM_BETA2) * g * g;

                        let m_hat = *m / bias1;
                        let v_hat = *v / bias2;
                        *p -= rate * m_hat / (v_hat.sqrt() + ADAM_EPS);
                    }
                }
            },
        }
    }
}
