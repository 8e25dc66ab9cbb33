//! Correction step: folds a measurement into the predicted state.

use crate::error::UkfError;
use crate::gaussian::Gaussian;
use crate::observation::{MeasurementPrediction, ObservationModel};
use crate::sigma::residual;
use crate::types::{CrossCov, Sigma, N_SIGMA, N_X, YAW};
use na::SVector;

/// Posterior distribution and the normalized innovation squared of the measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    pub posterior: Gaussian<N_X>,
    pub nis: f64,
}

/// Cross covariance between the state and measurement sigma points.
pub fn cross_covariance<const Z: usize, H: ObservationModel<Z>>(
    sigma_f: &Sigma<N_X>,
    prior: &Gaussian<N_X>,
    pred: &MeasurementPrediction<Z>,
    w: &Sigma<1>,
) -> CrossCov<Z> {
    let mut tc = CrossCov::<Z>::zeros();
    for i in 0..N_SIGMA {
        let dx = residual(&sigma_f.column(i).into_owned(), &prior.mean, Some(YAW));
        let dz = residual(&pred.sigma.column(i).into_owned(), &pred.belief.mean, H::ANGLE);
        tc += w[i] * dx * dz.transpose();
    }
    tc
}

/// Updates `prior` with measurement `z`.
///
/// `sigma_f` must be the sigma points the prior was recovered from and `pred`
/// the measurement prediction made from those same points.
pub fn correct<const Z: usize, H: ObservationModel<Z>>(
    z: &SVector<f64, Z>,
    sigma_f: &Sigma<N_X>,
    prior: &Gaussian<N_X>,
    pred: &MeasurementPrediction<Z>,
    w: &Sigma<1>,
) -> Result<Correction, UkfError> {
    let tc = cross_covariance::<Z, H>(sigma_f, prior, pred, w);
    let s = pred.belief.cov;
    let si = s
        .try_inverse()
        .ok_or(UkfError::SingularInnovation(H::NAME))?;

    let k = tc * si;
    let y = residual(z, &pred.belief.mean, H::ANGLE);

    let x = prior.mean + k * y;
    let p = prior.cov - k * s * k.transpose();
    let nis = (y.transpose() * si * y)[(0, 0)];

    Ok(Correction {
        posterior: Gaussian::new(x, p).symmetrized(),
        nis,
    })
}
