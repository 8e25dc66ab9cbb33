use crate::error::UkfError;
use na::{Vector2, Vector3, Vector4};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Lidar,
    Radar,
}

/// Raw sensor output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorReading {
    /// 位置 `[px, py]` [m]
    Lidar(Vector2<f64>),
    /// `[range [m], bearing [rad], range rate [m/s]]`
    Radar(Vector3<f64>),
}

/// A timestamped sensor reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Timestamp in microseconds
    pub timestamp: u64,
    pub reading: SensorReading,
}

impl Measurement {
    pub fn lidar(timestamp: u64, px: f64, py: f64) -> Self {
        Self {
            timestamp,
            reading: SensorReading::Lidar(Vector2::new(px, py)),
        }
    }

    pub fn radar(timestamp: u64, rho: f64, phi: f64, rho_dot: f64) -> Self {
        Self {
            timestamp,
            reading: SensorReading::Radar(Vector3::new(rho, phi, rho_dot)),
        }
    }

    pub fn sensor_kind(&self) -> SensorKind {
        match self.reading {
            SensorReading::Lidar(_) => SensorKind::Lidar,
            SensorReading::Radar(_) => SensorKind::Radar,
        }
    }

    /// Cartesian position implied by the reading.
    pub fn position(&self) -> Vector2<f64> {
        match self.reading {
            SensorReading::Lidar(z) => z,
            SensorReading::Radar(z) => Vector2::new(z[0] * z[1].cos(), z[0] * z[1].sin()),
        }
    }
}

/// Ground truth `[px, py, vx, vy]` accompanying a recorded measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundTruth {
    pub px: f64,
    pub py: f64,
    pub vx: f64,
    pub vy: f64,
}

impl From<GroundTruth> for Vector4<f64> {
    fn from(g: GroundTruth) -> Self {
        Vector4::new(g.px, g.py, g.vx, g.vy)
    }
}

/// One line of a recorded measurement file.
///
/// Lidar lines are `L px py timestamp [gt_px gt_py gt_vx gt_vy ...]`, radar
/// lines are `R rho phi rho_dot timestamp [gt_px gt_py gt_vx gt_vy ...]`.
/// The field delimiter is whatever the `csv::Reader` producing the record was
/// built with (tab for the recorded data sets); columns past the ground truth
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub measurement: Measurement,
    pub ground_truth: Option<GroundTruth>,
}

fn field<T: std::str::FromStr>(record: &csv::StringRecord, i: usize) -> Result<T, UkfError> {
    let raw = record
        .get(i)
        .ok_or_else(|| UkfError::InvalidRecord(format!("missing field {i}")))?;
    raw.trim()
        .parse()
        .map_err(|_| UkfError::InvalidRecord(format!("field {i}: cannot parse {raw:?}")))
}

impl TryFrom<&csv::StringRecord> for Record {
    type Error = UkfError;

    fn try_from(record: &csv::StringRecord) -> Result<Self, Self::Error> {
        let tag: String = field(record, 0)?;
        let (measurement, next) = match tag.as_str() {
            "L" => {
                let m = Measurement::lidar(field(record, 3)?, field(record, 1)?, field(record, 2)?);
                (m, 4)
            }
            "R" => {
                let m = Measurement::radar(
                    field(record, 4)?,
                    field(record, 1)?,
                    field(record, 2)?,
                    field(record, 3)?,
                );
                (m, 5)
            }
            other => {
                return Err(UkfError::InvalidRecord(format!(
                    "unknown sensor tag {other:?}"
                )))
            }
        };
        let ground_truth = if record.len() >= next + 4 {
            Some(GroundTruth {
                px: field(record, next)?,
                py: field(record, next + 1)?,
                vx: field(record, next + 2)?,
                vy: field(record, next + 3)?,
            })
        } else {
            None
        };
        Ok(Record {
            measurement,
            ground_truth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn parses_lidar_line_with_ground_truth() {
        let r = Record::try_from(&record(&[
            "L", "3.122427e-01", "5.803398e-01", "1477010443000000", "6.000000e-01",
            "6.000000e-01", "5.199937e+00", "0", "0", "6.911322e-03",
        ]))
        .unwrap();
        assert_eq!(r.measurement.sensor_kind(), SensorKind::Lidar);
        assert_eq!(r.measurement.timestamp, 1477010443000000);
        assert_abs_diff_eq!(r.measurement.position(), Vector2::new(0.3122427, 0.5803398));
        let gt = r.ground_truth.unwrap();
        assert_abs_diff_eq!(gt.vx, 5.199937);
        assert_abs_diff_eq!(gt.vy, 0.0);
    }

    #[test]
    fn parses_radar_line_without_ground_truth() {
        let r = Record::try_from(&record(&["R", "1.014892e+00", "5.543292e-01", "4.892807e+00", "1477010443050000"]))
            .unwrap();
        assert_eq!(r.measurement.sensor_kind(), SensorKind::Radar);
        assert_eq!(r.measurement.timestamp, 1477010443050000);
        assert!(r.ground_truth.is_none());
        match r.measurement.reading {
            SensorReading::Radar(z) => assert_abs_diff_eq!(z[2], 4.892807),
            SensorReading::Lidar(_) => panic!("expected radar"),
        }
    }

    #[test]
    fn radar_position_is_polar_to_cartesian() {
        let m = Measurement::radar(0, 2.0, core::f64::consts::FRAC_PI_2, 0.0);
        assert_abs_diff_eq!(m.position(), Vector2::new(0.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!(
            Record::try_from(&record(&["X", "1", "2", "3"])),
            Err(UkfError::InvalidRecord(_))
        ));
        assert!(Record::try_from(&record(&["L", "1.0", "abc", "3"])).is_err());
        assert!(Record::try_from(&record(&["R", "1.0", "2.0"])).is_err());
    }

    #[test]
    fn fields_are_split_by_the_reader_delimiter() {
        let data = "L\t1.0\t2.0\t100\nL 1.0 2.0 200\n";
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_bytes());
        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();

        let r = Record::try_from(&rows[0]).unwrap();
        assert_eq!(r.measurement.timestamp, 100);
        // spaces are not a separator for a tab-delimited reader
        assert_eq!(rows[1].len(), 1);
        assert!(matches!(
            Record::try_from(&rows[1]),
            Err(UkfError::InvalidRecord(_))
        ));
    }
}
