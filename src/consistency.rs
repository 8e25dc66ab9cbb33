//! Filter consistency diagnostics. Nothing in here feeds back into the filter.

use crate::measurement::SensorKind;
use na::SVector;

/// 95% quantile of the chi-squared distribution with 2 degrees of freedom.
pub const CHI2_95_2DOF: f64 = 5.991;
/// 95% quantile of the chi-squared distribution with 3 degrees of freedom.
pub const CHI2_95_3DOF: f64 = 7.815;

/// NIS threshold for a sensor's measurement dimension.
pub fn nis_threshold(kind: SensorKind) -> f64 {
    match kind {
        SensorKind::Lidar => CHI2_95_2DOF,
        SensorKind::Radar => CHI2_95_3DOF,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Counter {
    total: usize,
    above: usize,
}

/// Counts how often the NIS of each sensor exceeds its 95% threshold.
///
/// For a consistent filter roughly 5% of the values end up above it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NisMonitor {
    lidar: Counter,
    radar: Counter,
}

impl NisMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: SensorKind, nis: f64) {
        let c = match kind {
            SensorKind::Lidar => &mut self.lidar,
            SensorKind::Radar => &mut self.radar,
        };
        c.total += 1;
        if nis > nis_threshold(kind) {
            c.above += 1;
        }
    }

    pub fn count(&self, kind: SensorKind) -> usize {
        match kind {
            SensorKind::Lidar => self.lidar.total,
            SensorKind::Radar => self.radar.total,
        }
    }

    /// Fraction of recorded values above the threshold, `None` before the first value.
    pub fn fraction_above(&self, kind: SensorKind) -> Option<f64> {
        let c = match kind {
            SensorKind::Lidar => self.lidar,
            SensorKind::Radar => self.radar,
        };
        (c.total > 0).then(|| c.above as f64 / c.total as f64)
    }
}

/// Root mean squared error per component, `None` when the inputs are empty or differ in length.
pub fn rmse<const S: usize>(
    estimations: &[SVector<f64, S>],
    ground_truth: &[SVector<f64, S>],
) -> Option<SVector<f64, S>> {
    if estimations.is_empty() || estimations.len() != ground_truth.len() {
        return None;
    }
    let sum = estimations
        .iter()
        .zip(ground_truth)
        .fold(SVector::<f64, S>::zeros(), |acc, (e, g)| {
            let d = e - g;
            acc + d.component_mul(&d)
        });
    Some((sum / estimations.len() as f64).map(f64::sqrt))
}
