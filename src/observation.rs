//! Sensor observation models and measurement prediction.

use crate::config::UkfConfig;
use crate::gaussian::Gaussian;
use crate::sigma::{weighted_cov, weighted_mean};
use crate::types::{Cov, Sigma, StateVector, N_SIGMA, N_X};
use na::{vector, SVector};

/// Ranges below this are treated as zero when computing the range rate.
pub const MIN_RANGE: f64 = 1e-6;

/// Observation model of a sensor producing measurements of dimension `Z`.
pub trait ObservationModel<const Z: usize> {
    /// Name used in logs and errors
    const NAME: &'static str;
    /// Index of the component holding an angle, wrapped whenever it is differenced
    const ANGLE: Option<usize>;

    /// Measurement function
    fn observe(&self, x: &StateVector) -> SVector<f64, Z>;
    /// Additive measurement noise covariance
    fn noise(&self) -> Cov<Z>;
}

/// Lidar: direct observation of `[px, py]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LidarModel {
    pub std_px: f64,
    pub std_py: f64,
}

impl From<&UkfConfig> for LidarModel {
    fn from(c: &UkfConfig) -> Self {
        Self {
            std_px: c.std_laspx,
            std_py: c.std_laspy,
        }
    }
}

impl ObservationModel<2> for LidarModel {
    const NAME: &'static str = "lidar";
    const ANGLE: Option<usize> = None;

    fn observe(&self, x: &StateVector) -> SVector<f64, 2> {
        vector![x[0], x[1]]
    }

    fn noise(&self) -> Cov<2> {
        Cov::<2>::from_diagonal(&vector![self.std_px.powi(2), self.std_py.powi(2)])
    }
}

/// Radar: `[range, bearing, range rate]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarModel {
    pub std_range: f64,
    pub std_bearing: f64,
    pub std_range_rate: f64,
}

impl From<&UkfConfig> for RadarModel {
    fn from(c: &UkfConfig) -> Self {
        Self {
            std_range: c.std_radr,
            std_bearing: c.std_radphi,
            std_range_rate: c.std_radrd,
        }
    }
}

impl ObservationModel<3> for RadarModel {
    const NAME: &'static str = "radar";
    const ANGLE: Option<usize> = Some(1);

    fn observe(&self, x: &StateVector) -> SVector<f64, 3> {
        let (px, py, v, yaw) = (x[0], x[1], x[2], x[3]);
        let rho = px.hypot(py);
        let phi = py.atan2(px);
        let rho_dot = if rho < MIN_RANGE {
            0.0
        } else {
            (px * v * yaw.cos() + py * v * yaw.sin()) / rho
        };
        vector![rho, phi, rho_dot]
    }

    fn noise(&self) -> Cov<3> {
        Cov::<3>::from_diagonal(&vector![
            self.std_range.powi(2),
            self.std_bearing.powi(2),
            self.std_range_rate.powi(2)
        ])
    }
}

/// Predicted measurement sigma points and the measurement distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementPrediction<const Z: usize> {
    pub sigma: Sigma<Z>,
    pub belief: Gaussian<Z>,
}

/// Maps predicted state sigma points into measurement space.
pub fn predict_measurement<const Z: usize, H: ObservationModel<Z>>(
    model: &H,
    sigma_f: &Sigma<N_X>,
    w: &Sigma<1>,
) -> MeasurementPrediction<Z> {
    let mut sigma_h = Sigma::<Z>::zeros();
    for i in 0..N_SIGMA {
        sigma_h.set_column(i, &model.observe(&sigma_f.column(i).into_owned()));
    }
    let zp = weighted_mean(&sigma_h, w);
    let pz = weighted_cov(&sigma_h, &zp, w, H::ANGLE);
    MeasurementPrediction {
        sigma: sigma_h,
        belief: Gaussian::new(zp, pz) + Gaussian::zero_mean(model.noise()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sigma::sigma_weight;
    use crate::types::LAMBDA;
    use approx::assert_abs_diff_eq;
    use core::f64::consts::{FRAC_PI_2, PI};

    fn radar() -> RadarModel {
        RadarModel::from(&UkfConfig::default())
    }

    #[test]
    fn lidar_observes_position() {
        let m = LidarModel::from(&UkfConfig::default());
        let z = m.observe(&vector![3.0, -4.0, 1.0, 0.3, 0.1]);
        assert_abs_diff_eq!(z, vector![3.0, -4.0]);
        assert_abs_diff_eq!(m.noise(), Cov::<2>::from_diagonal(&vector![0.0225, 0.0225]), epsilon = 1e-15);
    }

    #[test]
    fn radar_observes_polar_coordinates() {
        // moving straight away from the sensor
        let z = radar().observe(&vector![3.0, 4.0, 2.0, (4.0f64).atan2(3.0), 0.0]);
        assert_abs_diff_eq!(z[0], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(z[1], (4.0f64).atan2(3.0), epsilon = 1e-12);
        assert_abs_diff_eq!(z[2], 2.0, epsilon = 1e-12);

        // tangential motion has no range rate
        let z = radar().observe(&vector![0.0, 2.0, 5.0, 0.0, 0.0]);
        assert_abs_diff_eq!(z[1], FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(z[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn radar_at_origin_has_zero_range_rate() {
        let z = radar().observe(&vector![0.0, 0.0, 3.0, 0.7, 0.0]);
        assert_eq!(z[0], 0.0);
        assert_eq!(z[2], 0.0);
        assert!(z.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn radar_prediction_matches_reference() {
        let w = sigma_weight(LAMBDA);
        let sigma_f = na::matrix![
            5.9374, 6.0640, 5.925, 5.9436, 5.9266, 5.9374, 5.9389, 5.9374, 5.8106, 5.9457, 5.9310, 5.9465, 5.9374, 5.9359, 5.93744;
            1.48, 1.4436, 1.660, 1.4934, 1.5036, 1.48, 1.4868, 1.48, 1.5271, 1.3104, 1.4787, 1.4674, 1.48, 1.4851, 1.486;
            2.204, 2.2841, 2.2455, 2.2958, 2.204, 2.204, 2.2395, 2.204, 2.1256, 2.1642, 2.1139, 2.204, 2.204, 2.1702, 2.2049;
            0.5367, 0.47338, 0.67809, 0.55455, 0.64364, 0.54337, 0.5367, 0.53851, 0.60017, 0.39546, 0.51900, 0.42991, 0.530188, 0.5367, 0.535048;
            0.352, 0.29997, 0.46212, 0.37633, 0.4841, 0.41923, 0.352, 0.38744, 0.40562, 0.24347, 0.32926, 0.2214, 0.28477, 0.352, 0.33427;
        ];
        let model = RadarModel {
            std_range: 0.3,
            std_bearing: 0.0175,
            std_range_rate: 0.1,
        };
        let pred = predict_measurement(&model, &sigma_f, &w);
        assert_abs_diff_eq!(pred.belief.mean, vector![6.12155, 0.245993, 2.10313], epsilon = 1e-3);
        let s = na::matrix![
            0.0946171, -0.000139448, 0.00407016;
            -0.000139448, 0.000617548, -0.000770652;
            0.00407016, -0.000770652, 0.0180917;
        ];
        assert_abs_diff_eq!(pred.belief.cov, s, epsilon = 1e-4);
        assert_abs_diff_eq!(pred.sigma[(0, 0)], 5.9374f64.hypot(1.48), epsilon = 1e-12);
    }

    #[test]
    fn bearing_differences_are_wrapped() {
        // target behind the sensor: sigma bearings straddle +-pi
        let w = sigma_weight(LAMBDA);
        let mut sigma_f = Sigma::<N_X>::zeros();
        for i in 0..N_SIGMA {
            let dy = if i % 2 == 0 { 0.05 } else { -0.05 };
            sigma_f.set_column(i, &vector![-10.0, dy, 0.0, 0.0, 0.0]);
        }
        let pred = predict_measurement(&radar(), &sigma_f, &w);
        // raw differences of ~2pi would drive the variance negative
        let var_phi = pred.belief.cov[(1, 1)];
        assert!(var_phi > 0.0, "bearing variance {var_phi}");
        assert!(var_phi < 2.0 * PI * PI);
    }

    #[test]
    fn identical_sigma_points_give_pure_noise_covariance() {
        let w = sigma_weight(LAMBDA);
        let sigma_f = Sigma::<N_X>::from_columns(&[vector![1.0, 1.0, 1.0, 0.0, 0.0]; N_SIGMA]);
        let pred = predict_measurement(&LidarModel::from(&UkfConfig::default()), &sigma_f, &w);
        assert_abs_diff_eq!(pred.belief.mean, vector![1.0, 1.0], epsilon = 1e-12);
        assert_abs_diff_eq!(pred.belief.cov, Cov::<2>::from_diagonal(&vector![0.0225, 0.0225]), epsilon = 1e-12);
    }
}
