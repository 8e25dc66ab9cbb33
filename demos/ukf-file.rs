extern crate nalgebra as na;

use anyhow::{bail, Context, Result};
use ctrv_ukf::consistency::{rmse, NisMonitor};
use ctrv_ukf::measurement::Record;
use ctrv_ukf::{SensorKind, SensorReading, UkfConfig, UnscentedKalmanFilter};
use na::Vector4;

// usage: ukf-file <input.txt> [output.csv]
fn main() -> Result<()> {
    simple_logger::init_with_env()?;

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        bail!("usage: {} <input.txt> [output.csv]", args[0]);
    }
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(&args[1])
        .with_context(|| format!("failed to open {}", args[1]))?;
    let out: Box<dyn std::io::Write> = match args.get(2) {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "time_stamp", "px_state", "py_state", "v_state", "yaw_angle_state", "yaw_rate_state",
        "sensor_type", "NIS", "px_measured", "py_measured", "px_ground_truth", "py_ground_truth",
        "vx_ground_truth", "vy_ground_truth",
    ])?;

    let mut ukf = UnscentedKalmanFilter::new(UkfConfig::default())?;
    let mut monitor = NisMonitor::new();
    let mut est = Vec::new();
    let mut gt = Vec::new();

    for (line, row) in reader.records().enumerate() {
        let row = row?;
        let record = Record::try_from(&row).with_context(|| format!("line {}", line + 1))?;
        let m = record.measurement;
        let was_initialized = ukf.is_initialized();
        ukf.process_measurement(&m)?;

        let x = ukf.state();
        let kind = m.sensor_kind();
        let nis = match kind {
            SensorKind::Lidar => ukf.nis_lidar(),
            SensorKind::Radar => ukf.nis_radar(),
        };
        if was_initialized {
            monitor.record(kind, nis);
        }
        let pos = m.position();
        let tag = match m.reading {
            SensorReading::Lidar(_) => "lidar",
            SensorReading::Radar(_) => "radar",
        };

        let mut fields = vec![
            m.timestamp.to_string(),
            x[0].to_string(),
            x[1].to_string(),
            x[2].to_string(),
            x[3].to_string(),
            x[4].to_string(),
            tag.to_string(),
            nis.to_string(),
            pos[0].to_string(),
            pos[1].to_string(),
        ];
        if let Some(g) = record.ground_truth {
            fields.extend([g.px, g.py, g.vx, g.vy].iter().map(|v| v.to_string()));
            est.push(Vector4::new(x[0], x[1], x[2] * x[3].cos(), x[2] * x[3].sin()));
            gt.push(Vector4::from(g));
        } else {
            fields.extend(std::iter::repeat(String::new()).take(4));
        }
        writer.write_record(&fields)?;
    }
    writer.flush()?;

    if let Some(r) = rmse(&est, &gt) {
        eprintln!(
            "rmse: px {:.4} py {:.4} vx {:.4} vy {:.4}",
            r[0], r[1], r[2], r[3]
        );
    }
    for kind in [SensorKind::Lidar, SensorKind::Radar] {
        if let Some(f) = monitor.fraction_above(kind) {
            eprintln!("{kind:?} nis above 95%: {:.1}%", f * 100.0);
        }
    }
    Ok(())
}
