use crate::types::Cov;
use na::SVector;

/// Mean and covariance of a multivariate normal distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian<const S: usize> {
    pub mean: SVector<f64, S>,
    pub cov: Cov<S>,
}

impl<const S: usize> Gaussian<S> {
    pub fn new(mean: SVector<f64, S>, cov: Cov<S>) -> Self {
        Self { mean, cov }
    }

    /// Zero mean distribution, used for additive noise terms.
    pub fn zero_mean(cov: Cov<S>) -> Self {
        Self {
            mean: SVector::zeros(),
            cov,
        }
    }

    pub fn is_symmetric(&self, eps: f64) -> bool {
        (self.cov - self.cov.transpose()).abs().max() <= eps
    }

    // 対称性の維持
    pub fn symmetrized(self) -> Self {
        Self {
            mean: self.mean,
            cov: (self.cov + self.cov.transpose()) / 2.0,
        }
    }
}

/// Sum of two independent gaussians.
impl<const S: usize> core::ops::Add for Gaussian<S> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            mean: self.mean + rhs.mean,
            cov: self.cov + rhs.cov,
        }
    }
}
