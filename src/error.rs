use thiserror::Error;

/// Error types for the relaxfit library.
///
/// Every variant is fatal to the fit that raised it and to nothing else: a
/// batch of independent fits carries on when one of them fails.
#[derive(Error, Debug)]
pub enum FitError {
    /// Two arrays expected to be co-indexed differ in length, or a matrix
    /// is not the shape its operation requires.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// No nonzero pivot was available during Gauss-Jordan reduction. The
    /// current parameter region is not locally identifiable; retrying with
    /// a larger damping factor is the usual caller response.
    #[error("Singular matrix encountered during Gauss-Jordan elimination")]
    SingularMatrix,

    /// The iteration ceiling was reached before the stopping rule fired.
    #[error("Failed to converge within {0} iterations")]
    NonConvergence(usize),

    /// A non-finite value reached the normal equations, the step vector,
    /// or the chi-squared statistic.
    #[error("Non-finite value: {0}")]
    NonFinite(String),

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error during a derived computation (covariance, Monte Carlo).
    #[error("Computation error: {0}")]
    ComputationError(String),

    /// The fit was cancelled through its cancellation flag.
    #[error("Fit cancelled")]
    Cancelled,
}

/// Result type alias for relaxfit operations.
pub type Result<T> = std::result::Result<T, FitError>;
