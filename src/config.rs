use crate::error::UkfError;

/// Tuning of the filter. Immutable once the filter has been constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UkfConfig {
    /// If false, lidar measurements are ignored (except for initialization)
    pub use_lidar: bool,
    /// If false, radar measurements are ignored (except for initialization)
    pub use_radar: bool,
    /// Process noise standard deviation of the longitudinal acceleration [m/s^2]
    pub std_a: f64,
    /// Process noise standard deviation of the yaw acceleration [rad/s^2]
    pub std_yawdd: f64,
    /// Lidar noise standard deviation of px [m]
    pub std_laspx: f64,
    /// Lidar noise standard deviation of py [m]
    pub std_laspy: f64,
    /// Radar noise standard deviation of the range [m]
    pub std_radr: f64,
    /// Radar noise standard deviation of the bearing [rad]
    pub std_radphi: f64,
    /// Radar noise standard deviation of the range rate [m/s]
    pub std_radrd: f64,
}

impl Default for UkfConfig {
    fn default() -> Self {
        Self {
            use_lidar: true,
            use_radar: true,
            std_a: 1.8,
            std_yawdd: 0.7,
            std_laspx: 0.15,
            std_laspy: 0.15,
            std_radr: 0.3,
            std_radphi: 0.03,
            std_radrd: 0.3,
        }
    }
}

impl UkfConfig {
    /// Rejects standard deviations that are not finite and strictly positive.
    pub fn validate(&self) -> Result<(), UkfError> {
        let params = [
            ("std_a", self.std_a),
            ("std_yawdd", self.std_yawdd),
            ("std_laspx", self.std_laspx),
            ("std_laspy", self.std_laspy),
            ("std_radr", self.std_radr),
            ("std_radphi", self.std_radphi),
            ("std_radrd", self.std_radrd),
        ];
        for (name, value) in params {
            if !value.is_finite() || value <= 0.0 {
                return Err(UkfError::InvalidConfig(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Process noise standard deviations fed into the augmented state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessNoise {
    pub std_a: f64,
    pub std_yawdd: f64,
}

impl From<&UkfConfig> for ProcessNoise {
    fn from(c: &UkfConfig) -> Self {
        Self {
            std_a: c.std_a,
            std_yawdd: c.std_yawdd,
        }
    }
}
