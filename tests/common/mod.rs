#![allow(dead_code)]

use ctrv_ukf::observation::{ObservationModel, RadarModel};
use ctrv_ukf::process::ctrv;
use ctrv_ukf::types::{AugmentedVector, StateVector};
use ctrv_ukf::{Measurement, UkfConfig};
use na::Vector4;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_xoshiro::Xoshiro256PlusPlus;

pub const DT: f64 = 0.05;

/// Noise free CTRV trajectory sampled every `dt` seconds.
pub fn trajectory(x0: StateVector, dt: f64, steps: usize) -> Vec<StateVector> {
    let mut xs = Vec::with_capacity(steps);
    let mut x = x0;
    for _ in 0..steps {
        xs.push(x);
        let mut aug = AugmentedVector::zeros();
        aug.fixed_rows_mut::<5>(0).copy_from(&x);
        x = ctrv(&aug, dt);
    }
    xs
}

/// Alternating lidar / radar measurements of `x0`'s trajectory, lidar first.
pub fn simulate(seed: u64, x0: StateVector, steps: usize) -> Vec<(Measurement, StateVector)> {
    let cfg = UkfConfig::default();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let unit = Normal::new(0.0, 1.0).unwrap();
    let radar = RadarModel::from(&cfg);

    trajectory(x0, DT, steps)
        .into_iter()
        .enumerate()
        .map(|(k, x)| {
            let t = (k as f64 * DT * 1e6).round() as u64;
            let m = if k % 2 == 0 {
                Measurement::lidar(
                    t,
                    x[0] + cfg.std_laspx * unit.sample(&mut rng),
                    x[1] + cfg.std_laspy * unit.sample(&mut rng),
                )
            } else {
                let z = radar.observe(&x);
                Measurement::radar(
                    t,
                    z[0] + cfg.std_radr * unit.sample(&mut rng),
                    z[1] + cfg.std_radphi * unit.sample(&mut rng),
                    z[2] + cfg.std_radrd * unit.sample(&mut rng),
                )
            };
            (m, x)
        })
        .collect()
}

/// `[px, py, vx, vy]` of a CTRV state.
pub fn cartesian(x: &StateVector) -> Vector4<f64> {
    Vector4::new(x[0], x[1], x[2] * x[3].cos(), x[2] * x[3].sin())
}
