extern crate nalgebra as na;

use ctrv_ukf::consistency::{rmse, NisMonitor};
use ctrv_ukf::observation::{ObservationModel, RadarModel};
use ctrv_ukf::process::ctrv;
use ctrv_ukf::types::{AugmentedVector, StateVector};
use ctrv_ukf::{Measurement, SensorKind, UkfConfig, UnscentedKalmanFilter};
use na::{vector, Vector4};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_xoshiro::Xoshiro256PlusPlus;

const DT: f64 = 0.05;
const STEPS: usize = 500;

// 真値の運動 (CTRV, ノイズなし)
fn fx(x: &StateVector) -> StateVector {
    let mut aug = AugmentedVector::zeros();
    aug.fixed_rows_mut::<5>(0).copy_from(x);
    ctrv(&aug, DT)
}

fn cartesian(x: &StateVector) -> Vector4<f64> {
    Vector4::new(x[0], x[1], x[2] * x[3].cos(), x[2] * x[3].sin())
}

// センサ出力をシミュレーション
fn sensor(
    k: usize,
    x_act: &StateVector,
    cfg: &UkfConfig,
    rng: &mut Xoshiro256PlusPlus,
) -> anyhow::Result<Measurement> {
    let t = (k as f64 * DT * 1e6).round() as u64;
    let unit = Normal::new(0.0, 1.0)?;
    let m = if k % 2 == 0 {
        Measurement::lidar(
            t,
            x_act[0] + cfg.std_laspx * unit.sample(rng),
            x_act[1] + cfg.std_laspy * unit.sample(rng),
        )
    } else {
        let z = RadarModel::from(cfg).observe(x_act);
        Measurement::radar(
            t,
            z[0] + cfg.std_radr * unit.sample(rng),
            z[1] + cfg.std_radphi * unit.sample(rng),
            z[2] + cfg.std_radrd * unit.sample(rng),
        )
    };
    Ok(m)
}

fn main() -> anyhow::Result<()> {
    simple_logger::init_with_env()?;

    let cfg = UkfConfig::default();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    let mut ukf = UnscentedKalmanFilter::new(cfg)?;
    let mut monitor = NisMonitor::new();
    let mut est = Vec::with_capacity(STEPS);
    let mut gt = Vec::with_capacity(STEPS);

    let mut x_act = vector![10.0, 5.0, 5.0, 0.5, 0.2];
    for k in 0..STEPS {
        let m = sensor(k, &x_act, &cfg, &mut rng)?;
        ukf.process_measurement(&m)?;
        let x_est = ukf.state();
        let kind = m.sensor_kind();
        let nis = match kind {
            SensorKind::Lidar => ukf.nis_lidar(),
            SensorKind::Radar => ukf.nis_radar(),
        };
        if k > 0 {
            monitor.record(kind, nis);
        }
        est.push(cartesian(&x_est));
        gt.push(cartesian(&x_act));

        print!("t: {:5.2} ", k as f64 * DT);
        print!("{:>5} ", format!("{kind:?}"));
        print!(
            "x_act: ({:7.2},{:7.2},{:6.2},{:6.2}) ",
            x_act[0], x_act[1], x_act[2], x_act[3]
        );
        print!(
            "x_est: ({:7.2},{:7.2},{:6.2},{:6.2}) ",
            x_est[0], x_est[1], x_est[2], x_est[3]
        );
        println!("nis: {:6.3}", nis);

        x_act = fx(&x_act);
    }

    if let Some(r) = rmse(&est, &gt) {
        println!(
            "rmse: px {:.4} py {:.4} vx {:.4} vy {:.4}",
            r[0], r[1], r[2], r[3]
        );
    }
    for kind in [SensorKind::Lidar, SensorKind::Radar] {
        if let Some(f) = monitor.fraction_above(kind) {
            println!("{kind:?} nis above 95%: {:.1}%", f * 100.0);
        }
    }
    Ok(())
}
