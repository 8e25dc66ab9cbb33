use crate::config::{ProcessNoise, UkfConfig};
use crate::error::UkfError;
use crate::gaussian::Gaussian;
use crate::measurement::{Measurement, SensorKind, SensorReading};
use crate::observation::{predict_measurement, LidarModel, ObservationModel, RadarModel};
use crate::process::{predict, Prediction};
use crate::sigma::sigma_weight;
use crate::types::{Cov, Sigma, StateVector, LAMBDA, N_X};
use crate::update::correct;
use na::SVector;

/// Predictions longer than this are split into sub-steps [s].
pub const MAX_STEP: f64 = 0.1;
/// Length of each sub-step [s].
pub const SUB_STEP: f64 = 0.05;
/// Upper bound on the sub-steps of one prediction. Longer gaps are divided
/// into `MAX_SUB_STEPS + 1` equal steps instead.
pub const MAX_SUB_STEPS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first measurement
    Uninitialized,
    Running,
}

/// Unscented Kalman filter tracking one object with a CTRV model,
/// fusing lidar and radar measurements.
#[derive(Debug, Clone)]
pub struct UnscentedKalmanFilter {
    config: UkfConfig,
    noise: ProcessNoise,
    lidar: LidarModel,
    radar: RadarModel,
    wm: Sigma<1>,
    phase: Phase,
    x: StateVector,
    p: Cov<N_X>,
    sigma_f: Sigma<N_X>,
    prev_timestamp: u64,
    nis_lidar: f64,
    nis_radar: f64,
}

impl UnscentedKalmanFilter {
    pub fn new(config: UkfConfig) -> Result<Self, UkfError> {
        config.validate()?;
        Ok(Self {
            noise: ProcessNoise::from(&config),
            lidar: LidarModel::from(&config),
            radar: RadarModel::from(&config),
            wm: sigma_weight(LAMBDA),
            phase: Phase::Uninitialized,
            x: StateVector::zeros(),
            p: Cov::<N_X>::zeros(),
            sigma_f: Sigma::<N_X>::from_element(f64::NAN),
            prev_timestamp: 0,
            nis_lidar: 0.0,
            nis_radar: 0.0,
            config,
        })
    }

    /// Feeds one measurement to the filter.
    ///
    /// The first measurement only initializes the state. Afterwards each
    /// measurement of an enabled sensor runs a prediction up to its timestamp
    /// followed by an update. On error the filter is left untouched.
    pub fn process_measurement(&mut self, m: &Measurement) -> Result<(), UkfError> {
        if self.phase == Phase::Uninitialized {
            self.initialize(m);
            return Ok(());
        }

        let kind = m.sensor_kind();
        if !self.is_enabled(kind) {
            log::trace!("skipping {kind:?} measurement at {}", m.timestamp);
            return Ok(());
        }

        let dt = elapsed(self.prev_timestamp, m.timestamp);
        let result = self.step(m, dt);
        match result {
            Ok((prediction, posterior, nis)) => {
                self.x = posterior.mean;
                self.p = posterior.cov;
                self.sigma_f = prediction.sigma;
                self.prev_timestamp = m.timestamp;
                match kind {
                    SensorKind::Lidar => self.nis_lidar = nis,
                    SensorKind::Radar => self.nis_radar = nis,
                }
                log::debug!("{kind:?} update: dt {dt:.3}s, nis {nis:.3}");
                Ok(())
            }
            Err(e) => {
                log::warn!("{kind:?} measurement at {} rejected: {e}", m.timestamp);
                Err(e)
            }
        }
    }

    fn initialize(&mut self, m: &Measurement) {
        let pos = m.position();
        self.x = StateVector::new(pos[0], pos[1], 0.0, 0.0, 0.0);
        self.p = Cov::<N_X>::identity();
        self.prev_timestamp = m.timestamp;
        self.phase = Phase::Running;
        log::info!(
            "initialized from {:?} at t={}: x = [{:.3}, {:.3}, 0, 0, 0]",
            m.sensor_kind(),
            m.timestamp,
            pos[0],
            pos[1]
        );
    }

    fn is_enabled(&self, kind: SensorKind) -> bool {
        match kind {
            SensorKind::Lidar => self.config.use_lidar,
            SensorKind::Radar => self.config.use_radar,
        }
    }

    fn step(&self, m: &Measurement, dt: f64) -> Result<(Prediction, Gaussian<N_X>, f64), UkfError> {
        let prediction = self.predict(dt)?;
        let (posterior, nis) = match m.reading {
            SensorReading::Lidar(z) => self.update(&self.lidar, &z, &prediction)?,
            SensorReading::Radar(z) => self.update(&self.radar, &z, &prediction)?,
        };
        Ok((prediction, posterior, nis))
    }

    /// Predicts `dt` seconds ahead, see [`sub_steps`].
    fn predict(&self, dt: f64) -> Result<Prediction, UkfError> {
        let (steps, h, last) = sub_steps(dt);
        let mut belief = Gaussian::new(self.x, self.p);
        for _ in 0..steps {
            belief = predict(&belief, &self.noise, &self.wm, LAMBDA, h)?.belief;
        }
        let prediction = predict(&belief, &self.noise, &self.wm, LAMBDA, last)?;
        log::trace!("predicted {dt:.3}s in {} steps", steps + 1);
        Ok(prediction)
    }

    fn update<const Z: usize, H: ObservationModel<Z>>(
        &self,
        model: &H,
        z: &SVector<f64, Z>,
        prediction: &Prediction,
    ) -> Result<(Gaussian<N_X>, f64), UkfError> {
        let zp = predict_measurement(model, &prediction.sigma, &self.wm);
        let c = correct::<Z, H>(z, &prediction.sigma, &prediction.belief, &zp, &self.wm)?;
        Ok((c.posterior, c.nis))
    }

    /// Drops the current estimate. The next measurement initializes the filter again.
    pub fn reset(&mut self) {
        self.phase = Phase::Uninitialized;
        self.x = StateVector::zeros();
        self.p = Cov::<N_X>::zeros();
        self.sigma_f = Sigma::<N_X>::from_element(f64::NAN);
        self.prev_timestamp = 0;
        self.nis_lidar = 0.0;
        self.nis_radar = 0.0;
    }

    // 推定した状態を返す
    pub fn state(&self) -> StateVector {
        self.x
    }

    pub fn covariance(&self) -> Cov<N_X> {
        self.p
    }

    /// Sigma points of the last prediction
    pub fn predicted_sigma_points(&self) -> Sigma<N_X> {
        self.sigma_f
    }

    pub fn nis_lidar(&self) -> f64 {
        self.nis_lidar
    }

    pub fn nis_radar(&self) -> f64 {
        self.nis_radar
    }

    pub fn weights(&self) -> Sigma<1> {
        self.wm
    }

    pub fn config(&self) -> &UkfConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_initialized(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Timestamp of the last processed measurement, `None` before initialization.
    pub fn last_timestamp(&self) -> Option<u64> {
        (self.phase == Phase::Running).then_some(self.prev_timestamp)
    }
}

/// Signed time from `prev` to `now` in seconds, for any pair of µs timestamps.
fn elapsed(prev: u64, now: u64) -> f64 {
    (now as i128 - prev as i128) as f64 / 1e6
}

/// Splits a prediction of `dt` seconds into `(n, h, last)`: `n` steps of
/// length `h` followed by one step of length `last`.
///
/// Steps of `SUB_STEP` are taken while more than `MAX_STEP` remains. Gaps
/// that would need more than `MAX_SUB_STEPS` of them are divided evenly.
pub fn sub_steps(mut dt: f64) -> (usize, f64, f64) {
    if dt > MAX_STEP + MAX_SUB_STEPS as f64 * SUB_STEP {
        let h = dt / (MAX_SUB_STEPS + 1) as f64;
        return (MAX_SUB_STEPS, h, h);
    }
    let mut n = 0;
    while dt > MAX_STEP && n < MAX_SUB_STEPS {
        dt -= SUB_STEP;
        n += 1;
    }
    (n, SUB_STEP, dt)
}
