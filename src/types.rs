use na::{SMatrix, SVector};

/// Dimension of the CTRV state `[px, py, v, yaw, yawd]`
pub const N_X: usize = 5;
/// Dimension of the augmented state (state plus two process-noise terms)
pub const N_AUG: usize = N_X + 2;
/// Number of sigma points
pub const N_SIGMA: usize = 2 * N_AUG + 1;
/// Sigma point spread parameter
pub const LAMBDA: f64 = 3.0 - N_AUG as f64;

/// Index of the heading angle in the state vector
pub const YAW: usize = 3;

/// Type for state vectors
pub type StateVector = SVector<f64, N_X>;
/// Type for augmented state vectors
pub type AugmentedVector = SVector<f64, N_AUG>;
/// Type for covariance matricies of dimension SxS
pub type Cov<const S: usize> = SMatrix<f64, S, S>;
/// Type for sigma point sets, one point per column
pub type Sigma<const S: usize> = SMatrix<f64, S, N_SIGMA>;
/// Type for cross covariance matrices between the state and a measurement of dimension Z
pub type CrossCov<const Z: usize> = SMatrix<f64, N_X, Z>;
