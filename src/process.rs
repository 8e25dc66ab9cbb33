//! CTRV (constant turn rate and velocity) process model and the predict half
//! of the unscented transform.

use crate::config::ProcessNoise;
use crate::error::UkfError;
use crate::gaussian::Gaussian;
use crate::sigma::{augmented_sigma_points, weighted_cov, weighted_mean};
use crate::types::{AugmentedVector, Sigma, StateVector, N_AUG, N_SIGMA, N_X, YAW};

/// Below this yaw rate the object is propagated along a straight line.
pub const MIN_YAW_RATE: f64 = 1e-3;

/// Predicted sigma points together with the distribution recovered from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub sigma: Sigma<N_X>,
    pub belief: Gaussian<N_X>,
}

/// Propagates one augmented sigma point `[px, py, v, yaw, yawd, nu_a, nu_yawdd]` by `dt` seconds.
pub fn ctrv(x: &AugmentedVector, dt: f64) -> StateVector {
    let (px, py, v, yaw, yawd) = (x[0], x[1], x[2], x[3], x[4]);
    let (nu_a, nu_yawdd) = (x[5], x[6]);

    let (mut px_p, mut py_p) = if yawd.abs() > MIN_YAW_RATE {
        (
            px + v / yawd * ((yaw + yawd * dt).sin() - yaw.sin()),
            py + v / yawd * (yaw.cos() - (yaw + yawd * dt).cos()),
        )
    } else {
        (px + v * dt * yaw.cos(), py + v * dt * yaw.sin())
    };
    let mut v_p = v;
    let mut yaw_p = yaw + yawd * dt;
    let mut yawd_p = yawd;

    // ノイズの寄与
    let dt2 = dt * dt;
    px_p += 0.5 * nu_a * dt2 * yaw.cos();
    py_p += 0.5 * nu_a * dt2 * yaw.sin();
    v_p += nu_a * dt;
    yaw_p += 0.5 * nu_yawdd * dt2;
    yawd_p += nu_yawdd * dt;

    StateVector::new(px_p, py_p, v_p, yaw_p, yawd_p)
}

/// Pushes every augmented sigma point through the CTRV model.
pub fn predict_sigma_points(sigma_aug: &Sigma<N_AUG>, dt: f64) -> Sigma<N_X> {
    let mut sigma_f = Sigma::<N_X>::zeros();
    for i in 0..N_SIGMA {
        sigma_f.set_column(i, &ctrv(&sigma_aug.column(i).into_owned(), dt));
    }
    sigma_f
}

/// Recovers mean and covariance of predicted sigma points, wrapping yaw differences.
pub fn predict_mean_and_covariance(sigma_f: &Sigma<N_X>, w: &Sigma<1>) -> Gaussian<N_X> {
    let x = weighted_mean(sigma_f, w);
    let p = weighted_cov(sigma_f, &x, w, Some(YAW));
    Gaussian::new(x, p)
}

/// One full predict step of `dt` seconds.
pub fn predict(
    state: &Gaussian<N_X>,
    noise: &ProcessNoise,
    w: &Sigma<1>,
    lambda: f64,
    dt: f64,
) -> Result<Prediction, UkfError> {
    let sigma_aug = augmented_sigma_points(state, noise, lambda)?;
    let sigma = predict_sigma_points(&sigma_aug, dt);
    let belief = predict_mean_and_covariance(&sigma, w);
    Ok(Prediction { sigma, belief })
}
