//! Unscented Kalman filter tracking a single object with a CTRV
//! (constant turn rate and velocity) model, fusing lidar position fixes and
//! radar range/bearing/range-rate measurements.
//!
//! ```
//! use ctrv_ukf::{Measurement, UkfConfig, UnscentedKalmanFilter};
//!
//! let mut ukf = UnscentedKalmanFilter::new(UkfConfig::default())?;
//! ukf.process_measurement(&Measurement::lidar(0, 1.0, 2.0))?;
//! ukf.process_measurement(&Measurement::radar(50_000, 2.3, 1.1, 0.4))?;
//! let x = ukf.state();
//! # assert!(x.iter().all(|v| v.is_finite()));
//! # Ok::<(), ctrv_ukf::UkfError>(())
//! ```

extern crate nalgebra as na;

pub mod config;
pub mod consistency;
pub mod error;
pub mod gaussian;
pub mod measurement;
pub mod observation;
pub mod process;
pub mod sigma;
pub mod types;
pub mod ukf;
pub mod update;

pub use config::UkfConfig;
pub use error::UkfError;
pub use measurement::{Measurement, SensorKind, SensorReading};
pub use ukf::{Phase, UnscentedKalmanFilter};
