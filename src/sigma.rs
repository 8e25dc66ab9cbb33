//! Sigma point weights and generation of augmented sigma points.

use crate::config::ProcessNoise;
use crate::error::UkfError;
use crate::gaussian::Gaussian;
use crate::types::{AugmentedVector, Cov, Sigma, N_AUG, N_SIGMA, N_X};
use core::f64::consts::{PI, TAU};
use na::SVector;

/// Weights of the sigma points for a spread parameter `lambda`.
///
/// The central point gets `lambda / (lambda + n_aug)`, every other point
/// `0.5 / (lambda + n_aug)`. The same weights are used for the mean and the
/// covariance.
pub fn sigma_weight(lambda: f64) -> Sigma<1> {
    let c = lambda + N_AUG as f64;
    let mut w = Sigma::<1>::from_element(0.5 / c);
    w[0] = lambda / c;
    w
}

/// Wraps an angle into (-pi, pi].
pub fn normalize_angle(a: f64) -> f64 {
    let r = a.rem_euclid(TAU);
    if r > PI {
        r - TAU
    } else {
        r
    }
}

/// Difference `a - b` with the component at `angle` (if any) wrapped into (-pi, pi].
pub fn residual<const S: usize>(
    a: &SVector<f64, S>,
    b: &SVector<f64, S>,
    angle: Option<usize>,
) -> SVector<f64, S> {
    let mut d = a - b;
    if let Some(i) = angle {
        d[i] = normalize_angle(d[i]);
    }
    d
}

/// Weighted mean of a sigma point set. Angles are summed as is.
pub fn weighted_mean<const S: usize>(sigmas: &Sigma<S>, w: &Sigma<1>) -> SVector<f64, S> {
    sigmas * w.transpose()
}

/// Weighted covariance of a sigma point set around `mean`.
pub fn weighted_cov<const S: usize>(
    sigmas: &Sigma<S>,
    mean: &SVector<f64, S>,
    w: &Sigma<1>,
    angle: Option<usize>,
) -> Cov<S> {
    let mut p = Cov::<S>::zeros();
    for i in 0..N_SIGMA {
        let d = residual(&sigmas.column(i).into_owned(), mean, angle);
        p += w[i] * d * d.transpose();
    }
    p
}

/// Generates the 2 * n_aug + 1 augmented sigma points of `state`.
///
/// The covariance is embedded in the top-left block of the augmented
/// covariance and the process noise variances fill the remaining diagonal.
/// Fails if the augmented covariance has no Cholesky decomposition.
pub fn augmented_sigma_points(
    state: &Gaussian<N_X>,
    noise: &ProcessNoise,
    lambda: f64,
) -> Result<Sigma<N_AUG>, UkfError> {
    let mut x_aug = AugmentedVector::zeros();
    x_aug.fixed_rows_mut::<N_X>(0).copy_from(&state.mean);

    let mut p_aug = Cov::<N_AUG>::zeros();
    p_aug
        .fixed_view_mut::<N_X, N_X>(0, 0)
        .copy_from(&state.cov);
    p_aug[(N_X, N_X)] = noise.std_a * noise.std_a;
    p_aug[(N_X + 1, N_X + 1)] = noise.std_yawdd * noise.std_yawdd;

    let l = p_aug.cholesky().ok_or(UkfError::NotPositiveDefinite)?.l();
    let scale = (lambda + N_AUG as f64).sqrt();

    let mut sigma_points = Sigma::<N_AUG>::zeros();
    sigma_points.set_column(0, &x_aug);
    for i in 0..N_AUG {
        let offset = scale * l.column(i);
        sigma_points.set_column(1 + i, &(x_aug + &offset));
        sigma_points.set_column(1 + N_AUG + i, &(x_aug - &offset));
    }
    Ok(sigma_points)
}
