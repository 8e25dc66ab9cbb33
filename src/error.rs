use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UkfError {
    /// Cholesky decomposition of the augmented covariance failed.
    #[error("augmented covariance is not positive definite")]
    NotPositiveDefinite,
    /// The predicted measurement covariance could not be inverted.
    #[error("innovation covariance of the {0} measurement is singular")]
    SingularInnovation(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid measurement record: {0}")]
    InvalidRecord(String),
}
