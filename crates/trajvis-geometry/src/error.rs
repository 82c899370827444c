use trajvis_linalg::LinalgError;

use crate::parallel::ParallelError;

/// An error type for the geometry module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GeometryError {
    /// The configured points do not define a unique perspective transform.
    #[error("no perspective transform for the configured points: {0}")]
    Singular(#[from] LinalgError),

    /// A size used to fit a rectangle is zero, negative or not finite.
    #[error("invalid size ({0}, {1})")]
    InvalidSize(f64, f64),

    /// Error raised while running a batch operation.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
